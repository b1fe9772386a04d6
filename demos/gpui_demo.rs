use std::time::Duration;

use gpui::{
    AppContext, Application, AsyncWindowContext, Bounds, Timer, WindowBounds, WindowOptions, px,
    size,
};

use livegraph::{Color, GpuiGraphView, Graph, GraphHandle, GraphEvent, LineStyle, Point};

struct LiveDemo {
    view: gpui::Entity<GpuiGraphView>,
    handle: GraphHandle,
}

impl LiveDemo {
    fn new(cx: &mut gpui::Context<Self>) -> Self {
        let (view, handle) = build_view(cx);
        Self { view, handle }
    }
}

impl gpui::Render for LiveDemo {
    fn render(
        &mut self,
        _window: &mut gpui::Window,
        _cx: &mut gpui::Context<Self>,
    ) -> impl gpui::IntoElement {
        self.view.clone()
    }
}

fn build_view(cx: &mut gpui::Context<LiveDemo>) -> (gpui::Entity<GpuiGraphView>, GraphHandle) {
    let mut graph = Graph::new();
    let style = LineStyle::new(Color::new(0.2, 0.8, 0.95, 1.0), 2.0);
    let seed = (0..200).map(|i| Point::new(i as f64, (i as f64 * 0.03).sin()));
    if let Err(err) = graph.add_series(seed, style, 4_000) {
        eprintln!("failed to create series: {err}");
    }
    if let Err(err) = graph.set_follow_window(2_000.0) {
        eprintln!("failed to follow: {err}");
    }
    graph.set_auto_scale_y(true);

    let view = GpuiGraphView::new(graph).on_event(|event| {
        if event == GraphEvent::AutoScaleCleared {
            println!("manual view");
        }
    });
    let handle = view.graph_handle();
    let entity = cx.new(|_| view);
    (entity, handle)
}

fn spawn_updates(
    window: &mut gpui::Window,
    cx: &mut gpui::App,
    view: gpui::Entity<GpuiGraphView>,
    handle: GraphHandle,
) {
    window
        .spawn(cx, move |cx: &mut AsyncWindowContext| {
            let mut cx = cx.clone();
            async move {
                let mut x = 200.0_f64;
                loop {
                    Timer::after(Duration::from_millis(16)).await;
                    handle.write(|graph| {
                        let Some(id) = graph.series().first().map(|series| series.id()) else {
                            return;
                        };
                        let batch = (0..20).map(|i| {
                            let x = x + i as f64;
                            Point::new(x, (x * 0.03).sin() + 0.1 * (x * 0.7).cos())
                        });
                        let _ = graph.extend_points(id, batch);
                    });
                    x += 20.0;
                    let _ = cx.update(|_, cx| {
                        view.update(cx, |_view, view_cx| view_cx.notify());
                    });
                }
            }
        })
        .detach();
}

fn main() {
    Application::new().run(|cx| {
        let options = WindowOptions {
            window_bounds: Some(WindowBounds::Windowed(Bounds::centered(
                None,
                size(px(900.0), px(520.0)),
                cx,
            ))),
            ..Default::default()
        };

        cx.open_window(options, |window, cx| {
            let demo = cx.new(LiveDemo::new);
            let handle = demo.read(cx).handle.clone();
            let view = demo.read(cx).view.clone();
            spawn_updates(window, cx, view, handle);
            demo
        })
        .unwrap();
    });
}
