use anyhow::Context;
use clap::Parser;
use log::{debug, error, info, warn};
use simd_mandelbrot::{
    config::Config,
    frame::{FrameClock, FrameDriver},
    input::Controller,
    present::Presenter,
    screen,
};
use winit::{
    dpi::PhysicalSize,
    event::{ElementState, Event, KeyboardInput, VirtualKeyCode, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::WindowBuilder,
};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::parse();
    let params = config.iteration_parameters()?;
    let mut driver = FrameDriver::new(config.kernel.build(), config.size(), params);

    if let Some(frames) = config.bench {
        driver.bench(frames);
        return Ok(());
    }

    let event_loop = EventLoop::new();
    let window = WindowBuilder::new()
        .with_title("Mandelbrot")
        .with_inner_size(PhysicalSize::new(config.width, config.height))
        .build(&event_loop)
        .context("could not create window")?;

    let mut presenter = Presenter::new(&window)?;
    driver.resize(window.inner_size().into());

    let mut controller = Controller::new(config.control_mode());
    let mut clock = FrameClock::new();
    let mut elapsed = 0.0;

    info!("arrows pan, +/- zoom, shift for larger steps, escape quits");

    event_loop.run(move |event, _, control_flow| {
        match event {
            Event::MainEventsCleared => {
                window.request_redraw();
            }
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => {
                    *control_flow = ControlFlow::Exit;
                }
                WindowEvent::Resized(size) => resize(&mut presenter, &mut driver, size.into()),
                WindowEvent::ScaleFactorChanged { new_inner_size, .. } => {
                    resize(&mut presenter, &mut driver, (*new_inner_size).into())
                }
                WindowEvent::ModifiersChanged(modifiers) => controller.modifiers_changed(modifiers),
                WindowEvent::KeyboardInput {
                    input:
                        KeyboardInput {
                            virtual_keycode: Some(VirtualKeyCode::Escape),
                            state: ElementState::Pressed,
                            ..
                        },
                    ..
                } => {
                    *control_flow = ControlFlow::Exit;
                }
                WindowEvent::KeyboardInput {
                    input:
                        KeyboardInput {
                            virtual_keycode: Some(key),
                            state,
                            ..
                        },
                    ..
                } => {
                    if controller.key(key, state, &mut driver.view) {
                        driver.invalidate();
                    }
                }
                _ => {}
            },
            Event::RedrawRequested(window_id) if window_id == window.id() => {
                if controller.advance(elapsed, &mut driver.view) {
                    driver.invalidate();
                }
                driver.render_if_stale();

                match presenter.present(driver.raster()) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        presenter.reconfigure()
                    }
                    Err(wgpu::SurfaceError::Timeout) => warn!("timed out acquiring a frame"),
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        error!("out of memory presenting a frame");
                        *control_flow = ControlFlow::Exit;
                    }
                }

                elapsed = clock.tick();
            }
            _ => {}
        }
    });
}

fn resize(presenter: &mut Presenter, driver: &mut FrameDriver, size: screen::Size) {
    debug!("resizing to {:?}", size);
    presenter.resize(size);
    driver.resize(size);
}
