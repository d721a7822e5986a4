use egui::epaint::Shadow;

/// Numbers shown in the F3 panel. Filled in once per frame by the app.
#[derive(Debug, Clone, Default)]
pub struct DebugStats {
    pub fps: u32,
    pub frame_time_avg_ms: f32,
    pub frame_time_min_ms: f32,
    pub frame_time_max_ms: f32,
    pub entity_count: usize,
    pub draw_calls: usize,
    pub resolution: (u32, u32),
    pub sim_time: f32,
    pub player_position: (f32, f32, f32),
    pub player_heading_deg: f32,
    pub mouth_open: bool,
    pub tooth_progress: f32,
}

/// Rolling frame-time window, flushed once per second into fps/min/avg/max.
#[derive(Debug, Clone)]
pub struct FrameTimer {
    window_secs: f32,
    frames: u32,
    sum_ms: f32,
    min_ms: f32,
    max_ms: f32,
}

/// Result of one completed timing window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTimings {
    pub fps: u32,
    pub avg_ms: f32,
    pub min_ms: f32,
    pub max_ms: f32,
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameTimer {
    pub fn new() -> Self {
        Self {
            window_secs: 0.0,
            frames: 0,
            sum_ms: 0.0,
            min_ms: f32::MAX,
            max_ms: 0.0,
        }
    }

    /// Record one frame. Returns the summary when a full second has elapsed.
    pub fn record(&mut self, frame_secs: f32) -> Option<FrameTimings> {
        let ms = frame_secs * 1000.0;
        self.window_secs += frame_secs;
        self.frames += 1;
        self.sum_ms += ms;
        self.min_ms = self.min_ms.min(ms);
        self.max_ms = self.max_ms.max(ms);

        if self.window_secs < 1.0 {
            return None;
        }
        let timings = FrameTimings {
            fps: self.frames,
            avg_ms: self.sum_ms / self.frames as f32,
            min_ms: self.min_ms,
            max_ms: self.max_ms,
        };
        *self = Self::new();
        Some(timings)
    }
}

pub struct DebugOverlay {
    pub visible: bool,
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl DebugOverlay {
    pub fn new(
        window: &winit::window::Window,
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
    ) -> Self {
        let egui_ctx = egui::Context::default();

        // Style: dark, semi-transparent, small monospace white font
        let mut visuals = egui::Visuals::dark();
        visuals.window_fill = egui::Color32::from_rgba_premultiplied(0, 0, 0, 180);
        visuals.window_stroke = egui::Stroke::NONE;
        visuals.window_shadow = Shadow::NONE;
        visuals.override_text_color = Some(egui::Color32::WHITE);
        egui_ctx.set_visuals(visuals);

        let mut style = (*egui_ctx.style()).clone();
        style.override_font_id = Some(egui::FontId::monospace(13.0));
        egui_ctx.set_style(style);

        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );

        let egui_renderer = egui_wgpu::Renderer::new(
            device,
            surface_format,
            None,  // drawn after the scene, no depth test
            1,     // msaa samples
            false, // no dithering
        );

        Self {
            visible: false,
            egui_ctx,
            egui_state,
            egui_renderer,
        }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
        log::debug!("Debug overlay {}", if self.visible { "shown" } else { "hidden" });
    }

    pub fn handle_window_event(
        &mut self,
        window: &winit::window::Window,
        event: &winit::event::WindowEvent,
    ) -> egui_winit::EventResponse {
        self.egui_state.on_window_event(window, event)
    }

    /// Render the stats panel on top of the already-drawn scene.
    #[allow(clippy::too_many_arguments)]
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        window: &winit::window::Window,
        view: &wgpu::TextureView,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
        stats: &DebugStats,
    ) {
        let raw_input = self.egui_state.take_egui_input(window);

        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            egui::Area::new(egui::Id::new("debug_overlay"))
                .fixed_pos(egui::pos2(10.0, 10.0))
                .show(ctx, |ui| {
                    egui::Frame::none()
                        .fill(egui::Color32::from_rgba_premultiplied(0, 0, 0, 180))
                        .inner_margin(egui::Margin::same(8.0))
                        .rounding(4.0)
                        .show(ui, |ui: &mut egui::Ui| {
                            ui.label(format!("FPS: {}", stats.fps));
                            ui.label(format!(
                                "Frame: {:.2} ms (min: {:.1} | max: {:.1})",
                                stats.frame_time_avg_ms,
                                stats.frame_time_min_ms,
                                stats.frame_time_max_ms
                            ));
                            ui.label(format!("Entities: {}", stats.entity_count));
                            ui.label(format!("Draw calls: {}", stats.draw_calls));
                            ui.label(format!(
                                "Resolution: {} x {}",
                                stats.resolution.0, stats.resolution.1
                            ));
                            ui.label(format!("Time: {:.1} s", stats.sim_time));
                            ui.label(format!(
                                "Player: ({:.1}, {:.1}, {:.1})  heading {:.0}°",
                                stats.player_position.0,
                                stats.player_position.1,
                                stats.player_position.2,
                                stats.player_heading_deg
                            ));
                            ui.label(format!(
                                "Mouth: {}  teeth {:.0}%",
                                if stats.mouth_open { "open" } else { "closed" },
                                stats.tooth_progress * 100.0
                            ));
                        });
                });
        });

        self.egui_state
            .handle_platform_output(window, full_output.platform_output);

        let tris = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        self.egui_renderer
            .update_buffers(device, queue, encoder, &tris, screen_descriptor);

        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            self.egui_renderer
                .render(&mut render_pass.forget_lifetime(), &tris, screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_timer_flushes_each_second() {
        let mut timer = FrameTimer::new();
        for _ in 0..59 {
            assert_eq!(timer.record(1.0 / 60.0), None);
        }
        let timings = timer.record(1.0 / 60.0 + 0.001).unwrap();
        assert_eq!(timings.fps, 60);
        assert!(timings.min_ms <= timings.avg_ms && timings.avg_ms <= timings.max_ms);
        assert!((timings.min_ms - 1000.0 / 60.0).abs() < 1e-3);

        // Window restarts after a flush.
        assert_eq!(timer.record(0.5), None);
    }
}
