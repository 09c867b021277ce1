//! Platform layer: windowing, event loop, camera control.
//!
//! Owns the winit event loop and wires input to the fly camera and the
//! renderer: WASD to move, mouse to look, Escape to quit. The assembled
//! model is uploaded once after GPU init and drawn every frame.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use winit::{
    dpi::PhysicalSize,
    event::{DeviceEvent, Event, WindowEvent},
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

use corelib::camera::FlyCamera;
use corelib::transform::Transform;
use corelib::vec3;
use renderer::GpuState;

pub mod input;

use input::InputState;

/// Settings forwarded from the CLI.
#[derive(Clone, Copy, Debug)]
pub struct RunOptions {
    pub backends: wgpu::Backends,
    pub width: u32,
    pub height: u32,
    /// Slowly spin the model about +Y.
    pub spin: bool,
}

/// Open a window, upload `model` and run the render loop until close.
#[allow(deprecated)] // winit 0.30 still ships EventLoop::run / EventLoop::create_window
pub fn run(opts: RunOptions, model: asset::mesh::Model) -> Result<()> {
    let event_loop: EventLoop<()> = EventLoop::new().map_err(|e| anyhow::anyhow!("{e}"))?;

    let attrs = Window::default_attributes()
        .with_title("Perun3D")
        .with_inner_size(PhysicalSize::new(opts.width.max(1), opts.height.max(1)));
    let window = Arc::new(event_loop.create_window(attrs)?);
    log::info!(
        "Window created: {}x{}",
        window.inner_size().width,
        window.inner_size().height
    );

    let mut state = pollster::block_on(GpuState::new(window.clone(), opts.backends));
    let scene = state.upload_model(&model);
    log::info!("Scene ready: {} GPU mesh(es).", scene.mesh_count());
    drop(model);

    let mut camera = FlyCamera::new(vec3(0.0, 1.0, 4.0), state.aspect());
    let mut input = InputState::new();
    let mut placement = Transform::identity();
    let mut last_frame = Instant::now();

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    log::info!("Close requested. Exiting event loop.");
                    window_target.exit();
                }
                WindowEvent::Resized(new_size) => {
                    log::info!("Resized: {}x{}", new_size.width, new_size.height);
                    state.resize(new_size.width, new_size.height);
                    camera.set_aspect(state.aspect());
                }
                WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                    log::info!("Scale factor changed: {scale_factor:.3}");
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    if matches!(event.physical_key, PhysicalKey::Code(KeyCode::Escape)) {
                        window_target.exit();
                        return;
                    }
                    input.handle_key(&event);
                }
                WindowEvent::RedrawRequested => {
                    let now = Instant::now();
                    let dt = (now - last_frame).as_secs_f32().min(0.1);
                    last_frame = now;

                    let (dx, dy) = input.take_mouse_delta();
                    camera.look(dx, dy);
                    camera.advance(input.forward_axis(), input.strafe_axis(), dt);
                    if opts.spin {
                        placement.yaw += 0.5 * dt;
                    }

                    match state.render(camera.proj_view(), placement.matrix(), &scene) {
                        Ok(()) => {}
                        Err(err) if GpuState::is_surface_lost(&err) => {
                            log::warn!("Surface lost/outdated; recreating.");
                            state.recreate_surface();
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            log::error!("Out of GPU memory; exiting.");
                            window_target.exit();
                        }
                        Err(err) => log::warn!("Frame dropped: {err:?}"),
                    }
                }
                _ => {}
            },
            Event::DeviceEvent {
                event: DeviceEvent::MouseMotion { delta: (dx, dy) },
                ..
            } => {
                input.add_mouse_delta(dx, dy);
            }
            Event::AboutToWait => {
                window.request_redraw();
            }
            _ => {}
        })
        .map_err(|e| anyhow::anyhow!("Event loop error: {e:?}"))?;

    Ok(())
}
