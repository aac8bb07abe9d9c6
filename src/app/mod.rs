use std::sync::Arc;

use anyhow::{Context, Result};
use log::info;
use vello::Scene;
use vello::kurbo::Point;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::components::Button;
use crate::event::PointerEvent;
use crate::render::{PollsterBlockOn, RenderContext};
use crate::ui::Ui;

/// Windowed application hosting a tree of buttons.
pub struct App {
    ui: Ui,
    use_cpu: bool,
}

impl App {
    pub fn new() -> Self {
        env_logger::init();
        Self {
            ui: Ui::new(),
            use_cpu: false,
        }
    }

    pub fn with_use_cpu(mut self, use_cpu: bool) -> Self {
        self.use_cpu = use_cpu;
        self
    }

    /// Add a button to the window (chain style).
    pub fn with_button(mut self, button: Button) -> Self {
        self.ui.push(button);
        self
    }

    /// Open the window and drive the event loop until it exits.
    pub fn run(self) -> Result<()> {
        let event_loop = EventLoop::new().context("failed to create event loop")?;
        // Nothing animates; wake only for input and redraw requests.
        event_loop.set_control_flow(ControlFlow::Wait);

        info!("starting with {} button(s)", self.ui.len());
        let mut state = AppState::new(self.ui, self.use_cpu);
        event_loop
            .run_app(&mut state)
            .context("event loop terminated with an error")?;
        Ok(())
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

struct AppState {
    window: Option<Arc<Window>>,
    render_context: Option<RenderContext>,
    ui: Ui,
    cursor: Point,
    resize_request: Option<winit::dpi::PhysicalSize<u32>>,
    use_cpu: bool,
}

impl AppState {
    fn new(ui: Ui, use_cpu: bool) -> Self {
        Self {
            window: None,
            render_context: None,
            ui,
            cursor: Point::ZERO,
            resize_request: None,
            use_cpu,
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            let window_attributes = WindowAttributes::default().with_title("jalebi");

            let window = Arc::new(
                event_loop
                    .create_window(window_attributes)
                    .expect("failed to create window"),
            );
            self.window = Some(window.clone());

            let render_context = RenderContext::new(window.clone(), self.use_cpu)
                .pollster_block_on()
                .expect("failed to initialize renderer");
            self.render_context = Some(render_context);

            // First layout happens on the initial redraw.
            self.resize_request = Some(window.inner_size());
            window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = &self.window else { return };
        if window.id() != window_id {
            return;
        }
        match event {
            WindowEvent::CloseRequested => {
                info!("close requested");
                // Explicitly drop resources to ensure clean shutdown
                self.render_context = None;
                self.window = None;
                event_loop.exit();
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Point::new(position.x, position.y);
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                let event = match state {
                    ElementState::Pressed => PointerEvent::Pressed(self.cursor),
                    ElementState::Released => PointerEvent::Released(self.cursor),
                };
                if self.ui.dispatch(event) {
                    window.request_redraw();
                }
            }
            WindowEvent::Resized(size) => {
                // Defer resize to RedrawRequested to avoid blocking event loop
                self.resize_request = Some(size);
                window.request_redraw();
            }
            WindowEvent::RedrawRequested => {
                if let Some(render_context) = &mut self.render_context {
                    if let Some(size) = self.resize_request.take() {
                        render_context.resize(size);
                        self.ui
                            .layout(f64::from(size.width), f64::from(size.height))
                            .expect("layout failed");
                    }
                    let mut scene = Scene::new();
                    self.ui.draw(&mut scene);
                    render_context.render(&scene);
                }
            }
            _ => {}
        }
    }
}
