//! Windowing toolkit seam
//!
//! The overlay never drives a UI library directly. Widget creation, layout,
//! draw submission, texture upload and user interaction all go through the
//! [`Toolkit`] trait.
//!
//! - [`HeadlessToolkit`] - in-memory toolkit that counts every mutation
//! - [`EguiToolkit`] - renders panels as egui windows

mod egui_toolkit;
mod headless;

pub use egui_toolkit::EguiToolkit;
pub use headless::{HeadlessElement, HeadlessTexture, HeadlessToolkit};

use crate::panel::GridLayout;

/// Handle to a toolkit-native element (panel, button, graph, image, label)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u32);

/// Handle to a GPU texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u32);

/// Button behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonKind {
    /// Fires [`UiEvent::Activated`] on click
    Momentary,
    /// Keeps a pushed state and fires [`UiEvent::Changed`] when the user flips it
    Toggle,
}

/// User interaction reported by the toolkit
///
/// Programmatic changes (e.g. [`Toolkit::set_pushed`]) never produce events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    Activated(ElementId),
    Changed { element: ElementId, pushed: bool },
}

/// Texture sampling filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    Nearest,
    Linear,
}

/// Texture coordinate wrapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wrap {
    ClampToEdge,
    Repeat,
}

/// Sampling parameters applied on upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sampler {
    pub magnification: Filter,
    pub minification: Filter,
    pub wrap: Wrap,
}

impl Sampler {
    /// Crisp pixels when zoomed in, smooth when zoomed out, no tiling
    pub const IMAGE_VIEW: Sampler = Sampler {
        magnification: Filter::Nearest,
        minification: Filter::Linear,
        wrap: Wrap::ClampToEdge,
    };
}

/// Source pixel layout of an upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// 3 bytes per pixel, blue first
    Bgr8,
}

impl PixelFormat {
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelFormat::Bgr8 => 3,
        }
    }
}

/// A 2D texture upload
#[derive(Debug, Clone, Copy)]
pub struct TextureUpload<'a> {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub pixels: &'a [u8],
    pub sampler: Sampler,
}

/// Everything the overlay needs from a windowing/rendering toolkit
pub trait Toolkit {
    /// Show or hide the top-level surface
    fn set_visible(&mut self, visible: bool);
    /// Force a full layout pass
    fn perform_layout(&mut self);
    /// Force a full redraw
    fn redraw(&mut self);
    /// Current surface size in pixels, `[width, height]`
    fn size(&self) -> [u32; 2];

    /// Create a titled grouping container
    fn create_panel(&mut self, title: &str) -> ElementId;
    /// Replace the grid layout of a panel
    fn apply_layout(&mut self, panel: ElementId, layout: &GridLayout);

    fn create_button(&mut self, parent: ElementId, caption: &str, kind: ButtonKind) -> ElementId;
    fn create_graph(&mut self, parent: ElementId, caption: &str) -> ElementId;
    fn create_image_view(&mut self, parent: ElementId, texture: TextureId, size: [u32; 2]) -> ElementId;
    fn create_label(&mut self, parent: ElementId, text: &str) -> ElementId;

    fn pushed(&self, element: ElementId) -> bool;
    fn set_pushed(&mut self, element: ElementId, pushed: bool);
    fn set_graph_values(&mut self, element: ElementId, values: &[f32]);
    fn set_footer(&mut self, element: ElementId, footer: &str);
    fn set_text(&mut self, element: ElementId, text: &str);

    fn allocate_texture(&mut self) -> TextureId;
    fn upload_texture(&mut self, texture: TextureId, upload: &TextureUpload<'_>);
    fn release_texture(&mut self, texture: TextureId);
    /// Point an image view at a texture
    fn bind_texture(&mut self, element: ElementId, texture: TextureId);

    /// Take all user interaction since the last call
    fn drain_events(&mut self) -> Vec<UiEvent>;
}
