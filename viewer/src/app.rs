//! Viewer application state and per-frame update

use eframe::egui;
use glam::{Mat4, Vec2, Vec3, Vec4Swizzles};
use nanovis_core::{
    DebugImage, EguiToolkit, Modifiers, OverlayConfig, OverlayWindow, PointerEvent,
    PointerTracker, ValueKey,
};

/// Half-width of the ground grid in world units
const GRID_EXTENT: i32 = 10;
const NEAR: f32 = 0.1;
const FAR: f32 = 1000.0;
const IMAGE_SIZE: [u32; 2] = [64, 48];
const SPECTRUM_LEN: usize = 32;

pub struct ViewerApp {
    overlay: OverlayWindow<EguiToolkit>,
    pointer: PointerTracker,
    animate: ValueKey<bool>,
    wave: ValueKey<f64>,
    spectrum: ValueKey<Vec<f64>>,
    image: ValueKey<DebugImage>,
    phase: f64,
}

impl ViewerApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: OverlayConfig) -> Self {
        let size = [config.window.width, config.window.height];
        let toolkit = EguiToolkit::new(cc.egui_ctx.clone(), size);
        let mut overlay = OverlayWindow::new(toolkit, config);

        let animate = overlay.bind(true);
        let wave = overlay.bind(0.0_f64);
        let spectrum = overlay.bind(vec![0.0; SPECTRUM_LEN]);
        let image = overlay.bind(gradient(IMAGE_SIZE[0], IMAGE_SIZE[1], 0));
        let steps = overlay.bind(0.0_f64);

        overlay.add_bound_toggle(
            "Controls",
            "animate",
            animate,
            Some(Box::new(|_, on| {
                tracing::info!("Animation {}", if on { "resumed" } else { "paused" });
            })),
        );
        overlay.add_label("Controls", "animate", animate);
        overlay.add_repeat("Controls", "step", move |values| {
            if let Some(count) = values.get_mut(steps) {
                *count += 1.0;
            }
            true
        });
        overlay.add_label("Controls", "steps", steps);
        overlay.add_button("Controls", "reset", move |values| {
            if let Some(count) = values.get_mut(steps) {
                *count = 0.0;
            }
        });

        overlay.add_graph("Signals", "sine", wave, 1.0, -1.0);
        overlay.add_series_graph("Signals", "spectrum", spectrum, 0.0, 0.0);
        overlay.add_image("Images", "gradient", image);

        overlay.show();

        Self {
            overlay,
            pointer: PointerTracker::new(),
            animate,
            wave,
            spectrum,
            image,
            phase: 0.0,
        }
    }

    fn animate_values(&mut self) {
        let phase = self.phase;
        if let Some(wave) = self.overlay.value_mut(self.wave) {
            *wave = (phase * 2.0).sin();
        }
        if let Some(spectrum) = self.overlay.value_mut(self.spectrum) {
            for (i, v) in spectrum.iter_mut().enumerate() {
                let i = i as f64;
                *v = ((i * 0.4 + phase * 3.0).sin() * 0.5 + 0.5) * (1.0 + i * 0.05);
            }
        }
        if let Some(image) = self.overlay.value_mut(self.image) {
            *image = gradient(IMAGE_SIZE[0], IMAGE_SIZE[1], (phase * 60.0) as u32);
        }
    }

    /// Feed pointer input egui did not claim to the camera
    fn forward_pointer(&mut self, ctx: &egui::Context) {
        let (events, modifiers) = ctx.input(|i| (i.events.clone(), i.modifiers));
        let pixels_per_point = ctx.pixels_per_point();
        let over_ui = ctx.is_pointer_over_area() || ctx.is_using_pointer();
        self.pointer.set_modifiers(Modifiers::from_egui(modifiers));

        let pointers: Vec<PointerEvent> = events
            .iter()
            .flat_map(|event| self.pointer.handle_egui_event(event, pixels_per_point))
            .collect();
        for pointer in pointers {
            // Releases always go through so a drag never sticks
            let starts_gesture = matches!(
                pointer,
                PointerEvent::Button { pressed: true, .. } | PointerEvent::Scroll { .. }
            );
            if starts_gesture && over_ui {
                continue;
            }
            self.overlay.handle_pointer(&pointer);
        }
    }

    /// Ground grid on the z = 0 plane
    fn draw_grid(&self, ctx: &egui::Context) {
        let pixels_per_point = ctx.pixels_per_point();
        let width = self.overlay.width() as f32;
        let height = self.overlay.height() as f32;
        let mvp = self.overlay.projection_matrix(NEAR, FAR)
            * self.overlay.view_matrix()
            * self.overlay.world_matrix()
            * Mat4::from_scale(Vec3::splat(self.overlay.scale()));

        let painter = ctx.layer_painter(egui::LayerId::background());
        let stroke = egui::Stroke::new(1.0, egui::Color32::from_gray(70));
        let extent = GRID_EXTENT as f32;
        let segments = 2 * GRID_EXTENT;

        for i in -GRID_EXTENT..=GRID_EXTENT {
            let t = i as f32;
            let lines = [
                (Vec3::new(t, -extent, 0.0), Vec3::new(t, extent, 0.0)),
                (Vec3::new(-extent, t, 0.0), Vec3::new(extent, t, 0.0)),
            ];
            for (start, end) in lines {
                // Short segments so a line crossing the near plane keeps its visible part
                for s in 0..segments {
                    let a = start.lerp(end, s as f32 / segments as f32);
                    let b = start.lerp(end, (s + 1) as f32 / segments as f32);
                    if let (Some(a), Some(b)) =
                        (project(mvp, a, width, height), project(mvp, b, width, height))
                    {
                        let a = a / pixels_per_point;
                        let b = b / pixels_per_point;
                        painter.line_segment([egui::pos2(a.x, a.y), egui::pos2(b.x, b.y)], stroke);
                    }
                }
            }
        }
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.forward_pointer(ctx);

        if self.overlay.value(self.animate).copied().unwrap_or(false) {
            self.phase += ctx.input(|i| i.stable_dt) as f64;
            self.animate_values();
        }

        self.overlay.tick();
        self.overlay.toolkit_mut().show(ctx);
        self.draw_grid(ctx);

        ctx.request_repaint();
    }
}

/// Diagonal gray ramp scrolled by `offset`
fn gradient(width: u32, height: u32, offset: u32) -> DebugImage {
    let data = (0..height)
        .flat_map(|y| (0..width).map(move |x| (x.wrapping_add(y).wrapping_add(offset) % 256) as u8))
        .collect();
    DebugImage::gray(width, height, data).unwrap_or_else(DebugImage::empty)
}

/// Clip-space projection to pixel coordinates; `None` behind the near plane
fn project(mvp: Mat4, point: Vec3, width: f32, height: f32) -> Option<Vec2> {
    let clip = mvp * point.extend(1.0);
    if clip.w <= NEAR {
        return None;
    }
    let ndc = clip.xy() / clip.w;
    Some(Vec2::new(
        (ndc.x * 0.5 + 0.5) * width,
        (ndc.y * 0.5 + 0.5) * height,
    ))
}
