// Driver modules: window, GPU and input glue around the simulation core
mod config;
mod input;
mod overlay;
mod render;
mod state;

use crate::config::Config;
use crate::state::{DriverError, State};

use grain_life::{Flow, Grid, Session};
use std::sync::Arc;
use std::time::Instant;
use winit::{
    dpi::PhysicalSize,
    event::{ElementState, Event, KeyEvent, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{Window, WindowBuilder},
};

async fn run(
    event_loop: EventLoop<()>,
    window: Arc<Window>,
    grid: Grid,
    session: Session,
) -> Result<(), DriverError> {
    let mut state = State::new(window, grid, session).await?;

    event_loop.run(move |event, window_target| {
        match event {
            Event::WindowEvent { window_id, ref event }
                if window_id == state.window.id() =>
            {
                // Pass window-specific events to egui_winit FIRST
                let response = state.egui_winit_state.on_window_event(&state.window, event);
                if response.repaint {
                    state.window.request_redraw();
                }

                // Resizes must reach the surface even when egui claims them
                if response.consumed && !matches!(event, WindowEvent::Resized(_)) {
                    return;
                }

                match event {
                    WindowEvent::CloseRequested => {
                        window_target.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        state.resize(*new_size);
                    }
                    WindowEvent::KeyboardInput {
                        event:
                            KeyEvent {
                                physical_key: PhysicalKey::Code(key),
                                state: ElementState::Pressed,
                                repeat: false,
                                ..
                            },
                        ..
                    } => {
                        if input::handle_key(&mut state, *key) == Flow::Exit {
                            window_target.exit();
                        }
                    }
                    WindowEvent::MouseInput { state: element_state, button, .. } => {
                        input::handle_mouse_input(&mut state, *button, *element_state);
                    }
                    WindowEvent::CursorMoved { position, .. } => {
                        input::handle_cursor_move(&mut state, *position);
                    }
                    WindowEvent::CursorLeft { .. } => {
                        input::handle_cursor_left(&mut state);
                    }
                    WindowEvent::RedrawRequested => match state.render() {
                        Ok(()) => {}
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::OutOfMemory) => {
                            // resize() was called internally if Lost
                            log::warn!("Skipping frame due to surface error.");
                            state.window.request_redraw();
                        }
                        Err(e @ (wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Outdated)) => {
                            log::warn!("Skipping frame due to surface {:?}", e);
                            state.window.request_redraw();
                        }
                    },
                    _ => (),
                }
            }
            Event::AboutToWait => {
                let next_tick = state.tick(Instant::now());
                window_target.set_control_flow(ControlFlow::WaitUntil(next_tick));
            }
            _ => (),
        }
    })?;

    Ok(())
}

fn start() -> Result<(), DriverError> {
    let config = Config::from_env();
    log::info!("Starting with {:?}", config);

    let mut grid = Grid::new(config.width, config.height, config.cell_size)?;
    grid.set_seed_strategy(config.seed_strategy(grid.x_cells(), grid.y_cells()));
    grid.reseed();
    let session = Session::new(config.fps);

    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("Grain Life")
            .with_inner_size(PhysicalSize::new(config.width, config.height))
            .with_resizable(false)
            .build(&event_loop)?,
    );

    pollster::block_on(run(event_loop, window, grid, session))
}

fn main() {
    env_logger::init();

    if let Err(e) = start() {
        log::error!("{e}");
        std::process::exit(1);
    }
}
