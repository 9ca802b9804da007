use rand::rngs::StdRng;
use rand::SeedableRng;
use winit::{
    event::*,
    event_loop::EventLoop,
    keyboard::{Key, NamedKey},
    window::WindowBuilder,
};

use tree_core::{FrameClock, FrameInput, Mode, OrbitCamera, Scene, SceneConfig};

mod geometry;
mod input;
mod render;

use input::PointerState;
use render::GpuState;

fn window_title(mode: Mode) -> String {
    format!(
        "Grand Luxury Tree | {} | Space: {}",
        mode.label(),
        mode.toggle_action()
    )
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = SceneConfig::default();
    let mut mode = config.initial_mode;
    let seed: u64 = rand::random();
    let mut rng = StdRng::seed_from_u64(seed);
    let mut scene = Scene::new(config, &mut rng)?;
    log::info!("[native] layout seed={seed:#018x}");

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title(window_title(mode))
        .build(&event_loop)?;

    let mut gpu = pollster::block_on(GpuState::new(&window, &scene))?;
    let mut orbit = OrbitCamera::default();
    let mut clock = FrameClock::new();
    let mut pointer = PointerState::default();

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::Resized(size) => gpu.resize(size),
            WindowEvent::CloseRequested => elwt.exit(),
            WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                match &event.logical_key {
                    Key::Named(NamedKey::Space) | Key::Named(NamedKey::Enter) if !event.repeat => {
                        mode = mode.toggled();
                        log::info!("[native] mode -> {}", mode.label());
                        gpu.window.set_title(&window_title(mode));
                    }
                    Key::Named(NamedKey::Escape) => elwt.exit(),
                    _ => {}
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let size = gpu.window.inner_size();
                if let Some(delta) = pointer.move_to(position.x, position.y, size.width, size.height)
                {
                    orbit.orbit(
                        delta.x * input::ORBIT_RADIANS_PER_PX,
                        delta.y * input::ORBIT_RADIANS_PER_PX,
                    );
                }
            }
            WindowEvent::CursorLeft { .. } => pointer.leave(),
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => pointer.dragging = state == ElementState::Pressed,
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / input::PIXELS_PER_LINE,
                };
                orbit.zoom(input::zoom_factor(lines));
            }
            WindowEvent::RedrawRequested => {
                let t = clock.tick();
                orbit.advance(mode, t.delta);
                scene.frame(&FrameInput {
                    delta: t.delta,
                    elapsed: t.elapsed,
                    pointer: pointer.ndc,
                    mode,
                });
                let camera = orbit.camera(gpu.aspect());
                match gpu.render(&scene, &camera) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        gpu.resize(gpu.window.inner_size())
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("[native] GPU out of memory");
                        elwt.exit()
                    }
                    Err(e) => log::warn!("[native] frame skipped: {e:?}"),
                }
            }
            _ => {}
        },
        Event::AboutToWait => gpu.window.request_redraw(),
        _ => {}
    })?;
    Ok(())
}
