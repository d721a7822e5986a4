// Interactive aquarium: a player fish, a small school and swaying seaweed,
// drawn with one uniform slot per object.

mod engine;

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use winit::{
    event::{Event as WinitEvent, WindowEvent},
    event_loop::EventLoop,
    window::Window,
};

use engine::animation::tooth_progress;
use engine::{
    Aquarium, AquariumConfig, DebugStats, DrawList, FrameTimer, InputState, Renderer, TankCamera,
};

fn collect_stats(aquarium: &Aquarium, renderer: &Renderer, draw_calls: usize, stats: &mut DebugStats) {
    let player = aquarium.player();
    stats.entity_count = aquarium.entity_count();
    stats.draw_calls = draw_calls;
    stats.resolution = (renderer.size.width, renderer.size.height);
    stats.sim_time = aquarium.clock().elapsed;
    stats.player_position = (player.position.x, player.position.y, player.position.z);
    stats.player_heading_deg = player.heading.to_degrees();
    stats.mouth_open = player.mouth_open;
    stats.tooth_progress = if player.mouth_open {
        tooth_progress(player.mouth_elapsed, player.mouth_duration)
    } else {
        0.0
    };
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = AquariumConfig::load().context("failed to load aquarium config")?;

    let event_loop = EventLoop::new().context("failed to create event loop")?;

    let window_attributes = Window::default_attributes()
        .with_title("Aquarium")
        .with_inner_size(winit::dpi::LogicalSize::new(config.window_width, config.window_height));

    let window = Arc::new(
        event_loop
            .create_window(window_attributes)
            .context("failed to create window")?,
    );

    let mut renderer = pollster::block_on(Renderer::new(window.clone()))
        .context("failed to initialise renderer")?;
    let camera = TankCamera::from_config(&config);
    let mut aquarium = Aquarium::new(config);
    let mut input = InputState::new();
    let mut draws = DrawList::new();
    let mut stats = DebugStats::default();
    let mut frame_timer = FrameTimer::new();
    let mut last_frame = Instant::now();

    event_loop.run(move |event, control_flow| {
        match event {
            WinitEvent::WindowEvent {
                ref event,
                window_id,
            } if window_id == window.id() => {
                let _ = renderer.overlay.handle_window_event(&window, event);
                if input.process_event(event) {
                    log::info!("Window closed, shutting down");
                    control_flow.exit();
                    return;
                }

                match event {
                    WindowEvent::Resized(physical_size) => {
                        renderer.resize(*physical_size);
                    }
                    WindowEvent::RedrawRequested => {
                        let now = Instant::now();
                        let dt = (now - last_frame).as_secs_f32();
                        last_frame = now;

                        let signals = aquarium.handle_events(&input.drain_events());
                        if signals.close_requested {
                            log::info!("Escape pressed, shutting down");
                            control_flow.exit();
                            return;
                        }
                        if signals.toggle_overlay {
                            renderer.overlay.toggle();
                        }

                        aquarium.update(dt, &input.intent());

                        draws.clear();
                        let frame = renderer.frame_matrices(&camera);
                        let draw_calls = aquarium.render(&frame, &mut draws);

                        if let Some(timings) = frame_timer.record(dt) {
                            stats.fps = timings.fps;
                            stats.frame_time_avg_ms = timings.avg_ms;
                            stats.frame_time_min_ms = timings.min_ms;
                            stats.frame_time_max_ms = timings.max_ms;
                            log::info!(
                                "FPS: {} | Frame: {:.2} ms | Draw calls: {}",
                                timings.fps, timings.avg_ms, draw_calls
                            );
                        }
                        collect_stats(&aquarium, &renderer, draw_calls, &mut stats);

                        let overlay_stats = renderer.overlay.visible.then_some(&stats);
                        match renderer.render(&draws, overlay_stats) {
                            Ok(_) => {}
                            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                                renderer.resize(renderer.size)
                            }
                            Err(wgpu::SurfaceError::OutOfMemory) => {
                                log::error!("Out of GPU memory, exiting");
                                control_flow.exit();
                            }
                            Err(e) => log::warn!("Surface error: {:?}", e),
                        }
                    }
                    _ => {}
                }
            }
            WinitEvent::AboutToWait => {
                window.request_redraw();
            }
            _ => {}
        }
    })?;

    Ok(())
}
