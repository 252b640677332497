//! Debug panel
//!
//! An egui window with sliders for the camera distance, the Earth's rotation
//! and spin speed, and the sun's intensity. H shows and hides it.

use std::f32::consts::TAU;
use std::ops::RangeInclusive;

use winit::event::WindowEvent;
use winit::window::Window;

use crate::config::DebugConfig;

pub const CAMERA_Z_RANGE: RangeInclusive<f32> = 1.0..=10.0;
pub const EARTH_ROTATION_RANGE: RangeInclusive<f32> = 0.0..=TAU;
pub const EARTH_SPEED_RANGE: RangeInclusive<f32> = 1.0..=100.0;
pub const LIGHT_INTENSITY_RANGE: RangeInclusive<f32> = 0.0..=10.0;

/// Values shown by the debug panel
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DebugSettings {
    pub camera_z: f32,
    /// Earth Y rotation in radians
    pub earth_rotation: f32,
    /// Multiplier on the Earth's spin rate
    pub earth_speed: f32,
    /// Intensity of the primary directional light
    pub light_intensity: f32,
}

impl Default for DebugSettings {
    fn default() -> Self {
        Self {
            camera_z: 6.0,
            earth_rotation: 0.0,
            earth_speed: 1.0,
            light_intensity: 2.2,
        }
    }
}

impl DebugSettings {
    pub fn from_config(config: &DebugConfig) -> Self {
        Self {
            earth_speed: config.earth_speed,
            ..Default::default()
        }
        .clamped()
    }

    /// Pull every value into its slider range
    pub fn clamp(&mut self) {
        self.camera_z = clamp_to(self.camera_z, &CAMERA_Z_RANGE);
        self.earth_rotation = clamp_to(self.earth_rotation, &EARTH_ROTATION_RANGE);
        self.earth_speed = clamp_to(self.earth_speed, &EARTH_SPEED_RANGE);
        self.light_intensity = clamp_to(self.light_intensity, &LIGHT_INTENSITY_RANGE);
    }

    pub fn clamped(mut self) -> Self {
        self.clamp();
        self
    }
}

fn clamp_to(value: f32, range: &RangeInclusive<f32>) -> f32 {
    if value.is_nan() {
        return *range.start();
    }
    value.clamp(*range.start(), *range.end())
}

/// Which settings the user changed this frame
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PanelEdits {
    pub camera_z: bool,
    pub earth_rotation: bool,
    pub light_intensity: bool,
}

impl PanelEdits {
    pub fn any(&self) -> bool {
        self.camera_z || self.earth_rotation || self.light_intensity
    }
}

/// Tessellated panel waiting to be painted
struct PendingFrame {
    jobs: Vec<egui::ClippedPrimitive>,
    textures: egui::TexturesDelta,
    pixels_per_point: f32,
}

/// egui context plus the output not yet handed to the GPU
///
/// Texture deltas of frames that were laid out but never painted are
/// carried into the next frame; egui sends the font atlas only once.
struct PanelFrames {
    ctx: egui::Context,
    pending: Option<PendingFrame>,
}

impl PanelFrames {
    fn new(ctx: egui::Context) -> Self {
        Self { ctx, pending: None }
    }

    /// Lay out one frame and queue it for painting
    fn run(
        &mut self,
        raw_input: egui::RawInput,
        visible: bool,
        settings: &mut DebugSettings,
    ) -> (PanelEdits, egui::PlatformOutput) {
        let mut edits = PanelEdits::default();
        let output = self.ctx.run(raw_input, |ctx| {
            if visible {
                edits = panel(ctx, settings);
            }
        });

        let jobs = self.ctx.tessellate(output.shapes, output.pixels_per_point);
        let mut textures = output.textures_delta;
        if let Some(unpainted) = self.pending.take() {
            let mut carried = unpainted.textures;
            carried.append(textures);
            textures = carried;
        }
        self.pending = Some(PendingFrame {
            jobs,
            textures,
            pixels_per_point: output.pixels_per_point,
        });

        (edits, output.platform_output)
    }

    fn take(&mut self) -> Option<PendingFrame> {
        self.pending.take()
    }
}

/// egui context, winit glue and wgpu renderer for the debug panel
pub struct DebugUi {
    frames: PanelFrames,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
    visible: bool,
}

impl DebugUi {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        window: &Window,
        visible: bool,
    ) -> Self {
        let ctx = egui::Context::default();
        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let renderer = egui_wgpu::Renderer::new(device, surface_format, None, 1, false);

        Self {
            frames: PanelFrames::new(ctx),
            state,
            renderer,
            visible,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn toggle(&mut self) -> bool {
        self.visible = !self.visible;
        log::info!("Debug panel {}", if self.visible { "shown" } else { "hidden" });
        self.visible
    }

    /// Feed a window event to egui
    ///
    /// Returns true when the panel used the event and the orbit controls
    /// should not see it.
    pub fn on_window_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        let response = self.state.on_window_event(window, event);
        self.visible && response.consumed
    }

    /// Lay out the panel and tessellate it for [`paint`](Self::paint)
    pub fn run(&mut self, window: &Window, settings: &mut DebugSettings) -> PanelEdits {
        let raw_input = self.state.take_egui_input(window);
        let (edits, platform_output) = self.frames.run(raw_input, self.visible, settings);
        self.state.handle_platform_output(window, platform_output);

        settings.clamp();
        edits
    }

    /// Draw the last laid out panel over `target`
    pub fn paint(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        size_in_pixels: [u32; 2],
    ) {
        let Some(frame) = self.frames.take() else {
            return;
        };

        for (id, delta) in &frame.textures.set {
            self.renderer.update_texture(device, queue, *id, delta);
        }

        let screen = egui_wgpu::ScreenDescriptor {
            size_in_pixels,
            pixels_per_point: frame.pixels_per_point,
        };
        let user_buffers = self
            .renderer
            .update_buffers(device, queue, encoder, &frame.jobs, &screen);
        if !user_buffers.is_empty() {
            queue.submit(user_buffers);
        }

        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Debug UI Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: target,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                })
                .forget_lifetime();
            self.renderer.render(&mut pass, &frame.jobs, &screen);
        }

        for id in &frame.textures.free {
            self.renderer.free_texture(id);
        }
    }
}

fn panel(ctx: &egui::Context, settings: &mut DebugSettings) -> PanelEdits {
    let mut edits = PanelEdits::default();

    egui::Window::new("Debug")
        .default_pos([12.0, 12.0])
        .resizable(false)
        .show(ctx, |ui| {
            ui.collapsing("Camera", |ui| {
                edits.camera_z = ui
                    .add(egui::Slider::new(&mut settings.camera_z, CAMERA_Z_RANGE).text("z"))
                    .changed();
            });

            ui.collapsing("Earth", |ui| {
                edits.earth_rotation = ui
                    .add(
                        egui::Slider::new(&mut settings.earth_rotation, EARTH_ROTATION_RANGE)
                            .text("Earth rotation"),
                    )
                    .changed();
                ui.add(
                    egui::Slider::new(&mut settings.earth_speed, EARTH_SPEED_RANGE)
                        .text("Earth rotation speed"),
                );
            });

            ui.collapsing("Sun", |ui| {
                edits.light_intensity = ui
                    .add(
                        egui::Slider::new(&mut settings.light_intensity, LIGHT_INTENSITY_RANGE)
                            .text("intensity"),
                    )
                    .changed();
            });

            ui.separator();
            ui.label("H: hide panel    R: reset camera    F: fullscreen");
        });

    edits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_in_range() {
        let settings = DebugSettings::default();
        assert_eq!(settings, settings.clamped());
    }

    #[test]
    fn test_clamp_each_range() {
        let settings = DebugSettings {
            camera_z: 0.2,
            earth_rotation: 7.0,
            earth_speed: 500.0,
            light_intensity: -1.0,
        }
        .clamped();
        assert_eq!(settings.camera_z, 1.0);
        assert_eq!(settings.earth_rotation, TAU);
        assert_eq!(settings.earth_speed, 100.0);
        assert_eq!(settings.light_intensity, 0.0);
    }

    #[test]
    fn test_nan_clamps_to_range_start() {
        let settings = DebugSettings {
            camera_z: f32::NAN,
            ..Default::default()
        }
        .clamped();
        assert_eq!(settings.camera_z, 1.0);
    }

    #[test]
    fn test_from_config_clamps_speed() {
        let config = DebugConfig {
            show_panel: true,
            earth_speed: 0.0,
        };
        assert_eq!(DebugSettings::from_config(&config).earth_speed, 1.0);
    }

    #[test]
    fn test_unpainted_textures_carried_forward() {
        let mut frames = PanelFrames::new(egui::Context::default());
        let mut settings = DebugSettings::default();

        frames.run(egui::RawInput::default(), true, &mut settings);
        let first = &frames.pending.as_ref().unwrap().textures;
        assert!(first.set.iter().any(|(_, delta)| delta.is_whole()));

        // Second frame laid out before the first was painted
        frames.run(egui::RawInput::default(), true, &mut settings);
        let frame = frames.take().unwrap();
        assert!(frame.textures.set.iter().any(|(_, delta)| delta.is_whole()));
        assert!(frames.take().is_none());
    }

    #[test]
    fn test_painted_frame_not_carried() {
        let mut frames = PanelFrames::new(egui::Context::default());
        let mut settings = DebugSettings::default();

        frames.run(egui::RawInput::default(), true, &mut settings);
        assert!(frames.take().is_some());

        frames.run(egui::RawInput::default(), true, &mut settings);
        let frame = frames.take().unwrap();
        assert!(!frame.textures.set.iter().any(|(_, delta)| delta.is_whole()));
    }

    #[test]
    fn test_hidden_panel_reports_no_edits() {
        let mut frames = PanelFrames::new(egui::Context::default());
        let mut settings = DebugSettings::default();
        let (edits, _) = frames.run(egui::RawInput::default(), false, &mut settings);
        assert!(!edits.any());
        assert_eq!(settings, DebugSettings::default());
    }

    #[test]
    fn test_panel_edits_any() {
        assert!(!PanelEdits::default().any());
        let edits = PanelEdits {
            earth_rotation: true,
            ..Default::default()
        };
        assert!(edits.any());
    }
}
