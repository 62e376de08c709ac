//! Bound widgets
//!
//! A [`Widget`] pairs one toolkit element with the logic that pulls its
//! bound value out of the [`ValueStore`] and pushes a visual representation
//! into the toolkit. Refreshing must be idempotent: running it twice without
//! the value changing leaves the element as it was.

mod graph;
mod image;
mod label;
mod toggle;

pub use graph::{ScalarGraph, SeriesGraph, normalize_series};
pub use image::ImageView;
pub use label::{LabelSource, ValueLabel};
pub use toggle::ToggleView;

use crate::toolkit::{ElementId, TextureId, Toolkit};
use crate::values::ValueStore;

/// A visual element kept in sync with one bound value
pub trait Widget {
    /// The toolkit element this widget drives
    fn element(&self) -> ElementId;

    /// Re-read the bound value and update the element
    ///
    /// If the value is missing or empty the element keeps its last state.
    fn refresh(&mut self, values: &ValueStore, toolkit: &mut dyn Toolkit);

    /// GPU texture owned by this widget, if any
    fn texture(&self) -> Option<TextureId> {
        None
    }

    /// Free toolkit resources owned by this widget
    fn release(&mut self, _toolkit: &mut dyn Toolkit) {}
}
