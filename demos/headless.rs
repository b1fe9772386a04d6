use livegraph::{
    AxisModifier, BufferUpdate, Graph, GraphConfig, GraphEvent, LineStyle, PixelPoint, Point,
    ViewportSize,
};
use tracing_subscriber::EnvFilter;

fn main() -> livegraph::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = match std::env::var("LIVEGRAPH_CONFIG") {
        Ok(path) => {
            let json = std::fs::read_to_string(path)
                .map_err(|err| livegraph::GraphError::Config(err.to_string()))?;
            GraphConfig::from_json(&json)?
        }
        Err(_) => GraphConfig::default(),
    };
    let mut graph = Graph::with_config(config)?;
    let sensor = graph.add_series(std::iter::empty(), LineStyle::default(), 500)?;
    graph.mark_initialized();

    let mut shifted = 0_usize;
    for i in 0..2_000 {
        let x = i as f64;
        let update = graph.append_point(sensor, Point::new(x, (x * 0.01).sin() * 40.0))?;
        if update == BufferUpdate::Shifted {
            shifted += 1;
        }
        if i % 500 == 0 {
            let frame = graph.prepare_frame()?;
            println!(
                "x: [{:.2}, {:.2}] y: [{:.2}, {:.2}]",
                frame.bounds.x.min, frame.bounds.x.max, frame.bounds.y.min, frame.bounds.y.max
            );
        }
    }
    println!("shifted uploads: {shifted}");

    let size = ViewportSize::new(800.0, 400.0);
    graph.on_wheel(PixelPoint::new(400.0, 200.0), 1.0, AxisModifier::Both, size);
    graph.follow_latest()?;
    graph.prepare_frame()?;

    for event in graph.take_events() {
        match event {
            GraphEvent::Initialized => println!("initialized"),
            GraphEvent::BoundsChanged(bounds) => {
                println!("bounds changed: x max {:.2}", bounds.x.max)
            }
            GraphEvent::AutoScaleCleared => println!("auto-scale cleared"),
        }
    }
    Ok(())
}
