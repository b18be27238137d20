#![deny(clippy::all)]
#![forbid(unsafe_code)]

use epidemic_grid::{CellState, Epidemic, GridSize};
use log::{debug, error, info};
use pixels::wgpu::Color;
use pixels::{Pixels, PixelsBuilder, SurfaceTexture};
use std::sync::Arc;
use std::time::{Duration, Instant};
use winit::application::ApplicationHandler;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::error::{EventLoopError, OsError};
use winit::event::{ElementState, KeyEvent, StartCause, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Cursor, CursorIcon, Window, WindowId};

const WINDOW_TITLE: &str = "Disease";
const BACKGROUND_COLOR: Color = Color::BLACK;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("event loop failed: {0}")]
    EventLoop(#[from] EventLoopError),

    #[error("could not create window: {0}")]
    Window(#[from] OsError),

    #[error("could not create pixel buffer: {0}")]
    Pixels(#[from] pixels::Error),

    #[error("a {width}x{height} grid at {cell_size} pixels per cell is too large for a window")]
    WindowTooLarge {
        width: u32,
        height: u32,
        cell_size: u32,
    },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationConfig {
    /// Window pixels per grid cell along each axis.
    pub cell_size: u32,
    /// Pause between simulation steps.
    pub time_step: Duration,
    /// State a mouse click forces onto the clicked cell.
    pub cursor_state: CellState,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            cell_size: 4,
            time_step: Duration::from_millis(60),
            cursor_state: CellState::Infected,
        }
    }
}

pub fn cell_color_rgba(state: CellState) -> [u8; 4] {
    match state {
        CellState::Wall => [0x00, 0x00, 0x00, 0xff],
        CellState::Susceptible => [0x00, 0x50, 0x50, 0xff],
        CellState::Infected => [0xff, 0x80, 0x00, 0xff],
        CellState::Removed => [0x40, 0x00, 0x00, 0xff],
    }
}

/// Window size in physical pixels for a grid drawn `cell_size` pixels per
/// cell.
pub fn window_size(grid_size: GridSize, cell_size: u32) -> Result<PhysicalSize<u32>, AppError> {
    match (
        grid_size.width.checked_mul(cell_size),
        grid_size.height.checked_mul(cell_size),
    ) {
        (Some(width), Some(height)) => Ok(PhysicalSize::new(width, height)),
        _ => Err(AppError::WindowTooLarge {
            width: grid_size.width,
            height: grid_size.height,
            cell_size,
        }),
    }
}

/// First tick time after `now` on the `scheduled + k * time_step` grid, or
/// `now` itself when there is no delay.
fn next_update_after(scheduled: Instant, now: Instant, time_step: Duration) -> Instant {
    if time_step.is_zero() {
        return now;
    }
    let mut next = scheduled;
    while next < now {
        next += time_step;
    }
    next
}

/// Opens a window showing `epidemic` and steps it every `config.time_step`
/// until the window is closed.
pub fn animate(epidemic: Epidemic, config: AnimationConfig) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);
    let mut handler = AppEventHandler::new(epidemic, config);
    event_loop.run_app(&mut handler)?;
    handler.failure.map_or(Ok(()), Err)
}

struct App {
    epidemic: Epidemic,
    config: AnimationConfig,
    window: Arc<Window>,
    pixels: Pixels<'static>,
    next_update: Instant,
    cursor: Option<PhysicalPosition<f64>>,
    last_drawn_tick: Option<u64>,
}

impl App {
    fn new(
        event_loop: &ActiveEventLoop,
        epidemic: Epidemic,
        config: AnimationConfig,
    ) -> Result<Self, AppError> {
        let grid = epidemic.grid();
        let inner_size = window_size(grid.size(), config.cell_size)?;
        let window = Arc::new(Self::build_window(event_loop, inner_size)?);
        let pixels = Self::build_pixels(&window, grid.width(), grid.height())?;
        info!(
            "{}x{} grid, {:?}, step every {:?}",
            grid.width(),
            grid.height(),
            epidemic.params(),
            config.time_step
        );
        Ok(Self {
            epidemic,
            config,
            window,
            pixels,
            next_update: Instant::now(),
            cursor: None,
            last_drawn_tick: None,
        })
    }

    fn build_window(event_loop: &ActiveEventLoop, size: PhysicalSize<u32>) -> Result<Window, OsError> {
        let window_attributes = Window::default_attributes()
            .with_title(WINDOW_TITLE)
            .with_inner_size(size)
            .with_resizable(false)
            .with_cursor(Cursor::Icon(CursorIcon::Crosshair))
            .with_visible(false);
        event_loop.create_window(window_attributes)
    }

    fn build_pixels(
        window: &Arc<Window>,
        width: u32,
        height: u32,
    ) -> Result<Pixels<'static>, pixels::Error> {
        let window_size = window.inner_size();
        let surface_texture =
            SurfaceTexture::new(window_size.width, window_size.height, window.clone());
        PixelsBuilder::new(width, height, surface_texture)
            .clear_color(BACKGROUND_COLOR)
            .build()
    }

    fn on_create(&mut self) {
        self.window.request_redraw();
        self.window.set_visible(true);
    }

    fn on_time_step(&mut self) {
        self.epidemic.update();
        self.window.request_redraw();

        self.next_update =
            next_update_after(self.next_update, Instant::now(), self.config.time_step);
    }

    fn on_click(&mut self) {
        let Some(position) = self.cursor else {
            return;
        };
        let Ok((x, y)) = self
            .pixels
            .window_pos_to_pixel((position.x as f32, position.y as f32))
        else {
            return;
        };
        let (x, y) = (x as u32, y as u32);
        let state = self.config.cursor_state;
        match self.epidemic.intervene(x, y, state) {
            Ok(()) => {
                debug!("forced ({x}, {y}) to {state:?}");
                self.paint_cell(x, y, state);
                self.window.request_redraw();
            }
            Err(err) => debug!("ignoring click: {err}"),
        }
    }

    fn on_resize(&mut self, size: PhysicalSize<u32>) {
        if let Err(err) = self.pixels.resize_surface(size.width, size.height) {
            error!("could not resize surface: {err}");
        }
        self.last_drawn_tick = None;
        self.window.request_redraw();
    }

    /// Repaints only cells that changed in the last step, unless the frame
    /// is new or more than one step behind.
    fn on_redraw(&mut self) -> Result<(), pixels::Error> {
        let tick = self.epidemic.tick();
        let full_redraw = self
            .last_drawn_tick
            .is_none_or(|drawn| tick > drawn + 1);

        let grid = self.epidemic.grid();
        let previous = self.epidemic.previous();
        let frame = self.pixels.frame_mut();
        debug_assert_eq!(frame.len(), 4 * grid.num_cells());

        for ((cell, old), pixel) in grid
            .cells_iter()
            .zip(previous.cells_iter())
            .zip(frame.chunks_exact_mut(4))
        {
            if full_redraw || cell != old {
                pixel.copy_from_slice(&cell_color_rgba(*cell));
            }
        }
        self.last_drawn_tick = Some(tick);
        self.pixels.render()
    }

    fn paint_cell(&mut self, x: u32, y: u32, state: CellState) {
        let index = 4 * (y as usize * self.epidemic.grid().width() as usize + x as usize);
        if let Some(pixel) = self.pixels.frame_mut().get_mut(index..index + 4) {
            pixel.copy_from_slice(&cell_color_rgba(state));
        }
    }
}

struct AppEventHandler {
    pending: Option<(Epidemic, AnimationConfig)>,
    app: Option<App>,
    failure: Option<AppError>,
}

impl AppEventHandler {
    fn new(epidemic: Epidemic, config: AnimationConfig) -> Self {
        Self {
            pending: Some((epidemic, config)),
            app: None,
            failure: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: AppError) {
        error!("{err}");
        self.failure = Some(err);
        event_loop.exit();
    }
}

impl ApplicationHandler for AppEventHandler {
    fn new_events(&mut self, _event_loop: &ActiveEventLoop, cause: StartCause) {
        if let (StartCause::ResumeTimeReached { .. }, Some(app)) = (cause, self.app.as_mut()) {
            app.on_time_step();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Some((epidemic, config)) = self.pending.take() else {
            return;
        };
        match App::new(event_loop, epidemic, config) {
            Ok(mut app) => {
                app.on_create();
                self.app = Some(app);
            }
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(app) = self.app.as_mut() else {
            return;
        };
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Released,
                        repeat: false,
                        ..
                    },
                ..
            } => match code {
                KeyCode::Escape | KeyCode::KeyQ | KeyCode::KeyX => {
                    event_loop.exit();
                }
                _ => (),
            },
            WindowEvent::CursorMoved { position, .. } => {
                app.cursor = Some(position);
            }
            WindowEvent::CursorLeft { .. } => {
                app.cursor = None;
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                ..
            } => {
                app.on_click();
            }
            WindowEvent::Resized(size) => {
                app.on_resize(size);
            }
            WindowEvent::RedrawRequested => {
                if let Err(err) = app.on_redraw() {
                    self.fail(event_loop, err.into());
                }
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(app) = self.app.as_ref() {
            event_loop.set_control_flow(ControlFlow::WaitUntil(app.next_update));
        }
    }
}
