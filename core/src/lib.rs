//! nanovis core - live debugging overlay
//!
//! A host program hands values to an [`OverlayWindow`] and gets back typed
//! keys. Widgets bound to those keys are refreshed from the values once per
//! frame, and user interaction is written back through the same keys. An
//! orbit/pan [`CameraController`] turns pointer gestures into view, world
//! and projection matrices for the host's own scene.
//!
//! # Architecture
//!
//! - [`ValueStore`] - arena owning every observed value
//! - [`BindingRegistry`] - value identity to bound widgets
//! - [`PanelRegistry`] - titled panels with an append-only grid
//! - [`Scheduler`] - tick-driven cancellable repeating tasks
//! - [`Toolkit`] - windowing/rendering seam ([`HeadlessToolkit`], [`EguiToolkit`])

pub mod binding;
pub mod camera;
pub mod config;
pub mod error;
pub mod input;
pub mod panel;
pub mod scheduler;
pub mod toolkit;
pub mod values;
pub mod widget;
pub mod window;

pub use binding::BindingRegistry;
pub use camera::{CameraController, CameraMode};
pub use config::OverlayConfig;
pub use error::{OverlayError, Result};
pub use input::{Modifiers, PointerButton, PointerEvent, PointerTracker};
pub use panel::{Anchor, GridLayout, PanelRegistry};
pub use scheduler::{Scheduler, TaskToken};
pub use toolkit::{EguiToolkit, ElementId, HeadlessToolkit, TextureId, Toolkit, UiEvent};
pub use values::{BindableValue, DebugImage, ValueId, ValueKey, ValueStore};
pub use widget::Widget;
pub use window::{ButtonCallback, OverlayWindow, RepeatAction, ToggleCallback};
