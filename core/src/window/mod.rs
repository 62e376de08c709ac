//! Overlay window
//!
//! [`OverlayWindow`] is what a host program talks to. It owns the value
//! arena, the bindings, the panels, the camera and a toolkit, and drives
//! them once per frame through [`OverlayWindow::tick`]:
//!
//! 1. drain user interaction from the toolkit and dispatch it
//! 2. advance the scheduler and run due repeat actions
//! 3. refresh every binding, then redraw

use glam::Mat4;
use hashbrown::HashMap;

use crate::binding::BindingRegistry;
use crate::camera::CameraController;
use crate::config::OverlayConfig;
use crate::error::Result;
use crate::input::PointerEvent;
use crate::panel::PanelRegistry;
use crate::scheduler::{Scheduler, TaskToken};
use crate::toolkit::{ButtonKind, ElementId, Toolkit, UiEvent};
use crate::values::{BindableValue, DebugImage, ValueId, ValueKey, ValueStore};
use crate::widget::{
    ImageView, LabelSource, ScalarGraph, SeriesGraph, ToggleView, ValueLabel, Widget,
};


/// Called when a momentary button is clicked
pub type ButtonCallback = Box<dyn FnMut(&mut ValueStore)>;
/// Called with the new pushed state of a toggle
pub type ToggleCallback = Box<dyn FnMut(&mut ValueStore, bool)>;
/// Run while a repeat button is held; returning false releases it
pub type RepeatAction = Box<dyn FnMut(&mut ValueStore) -> bool>;

enum Handler {
    Button(ButtonCallback),
    Toggle(ToggleCallback),
    BoundToggle {
        key: ValueKey<bool>,
        callback: Option<ToggleCallback>,
    },
    Repeat {
        action: RepeatAction,
        task: Option<TaskToken>,
    },
}

pub struct OverlayWindow<T: Toolkit> {
    toolkit: T,
    config: OverlayConfig,
    values: ValueStore,
    bindings: BindingRegistry,
    panels: PanelRegistry,
    handlers: HashMap<ElementId, Handler>,
    scheduler: Scheduler,
    task_owner: HashMap<TaskToken, ElementId>,
    camera: CameraController,
}

impl<T: Toolkit> OverlayWindow<T> {
    pub fn new(toolkit: T, config: OverlayConfig) -> Self {
        log::debug!(
            "overlay: creating window '{}' ({}x{})",
            config.window.title,
            config.window.width,
            config.window.height
        );
        Self {
            toolkit,
            panels: PanelRegistry::new(config.layout.clone()),
            camera: CameraController::new(config.camera.clone()),
            config,
            values: ValueStore::new(),
            bindings: BindingRegistry::new(),
            handlers: HashMap::new(),
            scheduler: Scheduler::new(),
            task_owner: HashMap::new(),
        }
    }

    // ----- values -----

    /// Hand a value to the overlay and get its key back
    pub fn bind<V: BindableValue>(&mut self, value: V) -> ValueKey<V> {
        self.values.insert(value)
    }

    pub fn value<V: BindableValue>(&self, key: ValueKey<V>) -> Option<&V> {
        self.values.get(key)
    }

    pub fn value_mut<V: BindableValue>(&mut self, key: ValueKey<V>) -> Option<&mut V> {
        self.values.get_mut(key)
    }

    /// Replace a bound value; widgets pick it up on the next refresh
    pub fn set_value<V: BindableValue>(&mut self, key: ValueKey<V>, value: V) -> Result<()> {
        self.values.set(key, value)
    }

    pub fn values(&self) -> &ValueStore {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut ValueStore {
        &mut self.values
    }

    // ----- widget factories -----

    /// Momentary button calling `callback` on every click
    pub fn add_button(
        &mut self,
        panel: &str,
        name: &str,
        callback: impl FnMut(&mut ValueStore) + 'static,
    ) -> ElementId {
        let element = self.create_button(panel, name, ButtonKind::Momentary);
        self.handlers.insert(element, Handler::Button(Box::new(callback)));
        element
    }

    /// Toggle not bound to any value
    pub fn add_toggle(
        &mut self,
        panel: &str,
        name: &str,
        callback: impl FnMut(&mut ValueStore, bool) + 'static,
    ) -> ElementId {
        let element = self.create_button(panel, name, ButtonKind::Toggle);
        self.handlers.insert(element, Handler::Toggle(Box::new(callback)));
        element
    }

    /// Toggle kept in sync with a bound flag in both directions
    ///
    /// A user flip that changes the flag writes it back, refreshes every
    /// binding of the flag, then calls `callback`. A flip that reports the
    /// value the flag already holds does nothing.
    pub fn add_bound_toggle(
        &mut self,
        panel: &str,
        name: &str,
        key: ValueKey<bool>,
        callback: Option<ToggleCallback>,
    ) -> ElementId {
        let element = self.create_button(panel, name, ButtonKind::Toggle);
        self.attach(key.id(), Box::new(ToggleView::new(element, key)));
        self.handlers
            .insert(element, Handler::BoundToggle { key, callback });
        element
    }

    /// Toggle-style button running `action` on every tick while held
    pub fn add_repeat(
        &mut self,
        panel: &str,
        name: &str,
        action: impl FnMut(&mut ValueStore) -> bool + 'static,
    ) -> ElementId {
        let element = self.create_button(panel, name, ButtonKind::Toggle);
        self.handlers.insert(
            element,
            Handler::Repeat {
                action: Box::new(action),
                task: None,
            },
        );
        element
    }

    /// Scrolling history graph of a bound scalar
    pub fn add_graph(
        &mut self,
        panel: &str,
        name: &str,
        key: ValueKey<f64>,
        max: f64,
        min: f64,
    ) -> ElementId {
        let parent = self.panels.panel(panel, &mut self.toolkit);
        let element = self.toolkit.create_graph(parent, name);
        let initial = match self.values.get(key) {
            Some(&value) => value,
            None => {
                log::warn!("overlay: graph '{}' bound to unknown {}", name, key.id());
                0.0
            }
        };
        let graph = ScalarGraph::new(
            element,
            key,
            max,
            min,
            self.config.graph.history_len,
            initial,
        );
        self.attach(key.id(), Box::new(graph));
        self.panels.add_widget(panel, element, &mut self.toolkit);
        element
    }

    /// Graph mirroring a bound sequence; `max <= min` derives bounds from the data
    pub fn add_series_graph(
        &mut self,
        panel: &str,
        name: &str,
        key: ValueKey<Vec<f64>>,
        max: f64,
        min: f64,
    ) -> ElementId {
        let parent = self.panels.panel(panel, &mut self.toolkit);
        let element = self.toolkit.create_graph(parent, name);
        self.attach(key.id(), Box::new(SeriesGraph::new(element, key, max, min)));
        self.panels.add_widget(panel, element, &mut self.toolkit);
        element
    }

    /// Image view owning one texture
    pub fn add_image(&mut self, panel: &str, name: &str, key: ValueKey<DebugImage>) -> ElementId {
        let parent = self.panels.panel(panel, &mut self.toolkit);
        let texture = self.toolkit.allocate_texture();
        let element = self
            .toolkit
            .create_image_view(parent, texture, self.config.image.view_size);
        log::debug!(
            "overlay: image '{}' allocated texture {:?}",
            name,
            texture
        );
        self.attach(key.id(), Box::new(ImageView::new(element, key, texture)));
        self.panels.add_widget(panel, element, &mut self.toolkit);
        element
    }

    /// Caption on the left, the bound value's text on the right
    pub fn add_label<V: LabelSource + 'static>(
        &mut self,
        panel: &str,
        name: &str,
        key: ValueKey<V>,
    ) -> ElementId {
        let parent = self.panels.panel(panel, &mut self.toolkit);
        let caption = self.toolkit.create_label(parent, name);
        let element = self.toolkit.create_label(parent, "");
        self.attach(key.id(), Box::new(ValueLabel::new(element, key)));
        self.panels
            .add_pair(panel, Some(caption), Some(element), &mut self.toolkit);
        element
    }

    fn create_button(&mut self, panel: &str, name: &str, kind: ButtonKind) -> ElementId {
        let parent = self.panels.panel(panel, &mut self.toolkit);
        let element = self.toolkit.create_button(parent, name, kind);
        self.panels.add_widget(panel, element, &mut self.toolkit);
        element
    }

    /// Establish the initial visual state, then register
    fn attach(&mut self, value: ValueId, mut widget: Box<dyn Widget>) {
        widget.refresh(&self.values, &mut self.toolkit);
        self.bindings.register(value, widget);
    }

    // ----- refresh driver -----

    /// Make the surface visible and bring every widget up to date
    pub fn show(&mut self) {
        self.toolkit.set_visible(true);
        self.toolkit.perform_layout();
        self.refresh();
    }

    /// Refresh every binding, then redraw
    pub fn refresh(&mut self) {
        log::trace!("overlay: refreshing {} bindings", self.bindings.len());
        self.bindings.refresh_all(&self.values, &mut self.toolkit);
        self.toolkit.redraw();
    }

    /// Run one frame: dispatch interaction, run due tasks, refresh
    pub fn tick(&mut self) {
        for event in self.toolkit.drain_events() {
            self.dispatch(event);
        }
        for token in self.scheduler.tick() {
            self.run_task(token);
        }
        self.refresh();
    }

    /// Re-run the bindings of one value now
    pub fn notify(&mut self, value: ValueId) {
        self.bindings.refresh(value, &self.values, &mut self.toolkit);
    }

    /// Drop every binding of a value, releasing owned textures
    ///
    /// With `image.retain_textures` set, textures stay allocated. Returns the
    /// number of bindings removed.
    pub fn unbind(&mut self, value: ValueId) -> usize {
        let widgets = self.bindings.unregister(value);
        let removed = widgets.len();
        for widget in widgets {
            self.release(widget);
        }
        self.handlers.retain(
            |_, handler| !matches!(handler, Handler::BoundToggle { key, .. } if key.id() == value),
        );
        log::debug!("overlay: unbound {} ({} bindings)", value, removed);
        removed
    }

    fn release(&mut self, mut widget: Box<dyn Widget>) {
        match widget.texture() {
            Some(texture) if self.config.image.retain_textures => {
                log::warn!(
                    "overlay: retaining texture {:?} of element {:?}",
                    texture,
                    widget.element()
                );
            }
            _ => widget.release(&mut self.toolkit),
        }
    }

    fn dispatch(&mut self, event: UiEvent) {
        match event {
            UiEvent::Activated(element) => match self.handlers.get_mut(&element) {
                Some(Handler::Button(callback)) => callback(&mut self.values),
                _ => log::trace!("overlay: unhandled click on {:?}", element),
            },
            UiEvent::Changed { element, pushed } => self.changed(element, pushed),
        }
    }

    fn changed(&mut self, element: ElementId, pushed: bool) {
        let Some(handler) = self.handlers.get_mut(&element) else {
            log::trace!("overlay: unhandled change on {:?}", element);
            return;
        };

        match handler {
            Handler::Toggle(callback) => callback(&mut self.values, pushed),
            Handler::BoundToggle { key, callback } => {
                let key = *key;
                match self.values.get_mut(key) {
                    Some(value) if *value == pushed => return,
                    Some(value) => *value = pushed,
                    None => {
                        log::warn!("overlay: toggle {:?} bound to unknown {}", element, key.id());
                        return;
                    }
                }
                self.bindings
                    .refresh(key.id(), &self.values, &mut self.toolkit);
                if let Some(callback) = callback {
                    callback(&mut self.values, pushed);
                }
            }
            Handler::Repeat { task, .. } => {
                if let Some(old) = task.take() {
                    self.scheduler.cancel(old);
                    self.task_owner.remove(&old);
                }
                if pushed {
                    let token = self.scheduler.schedule(1);
                    *task = Some(token);
                    self.task_owner.insert(token, element);
                }
            }
            Handler::Button(_) => {}
        }
    }

    fn run_task(&mut self, token: TaskToken) {
        let Some(&element) = self.task_owner.get(&token) else {
            return;
        };
        let Some(Handler::Repeat { action, task }) = self.handlers.get_mut(&element) else {
            return;
        };

        let keep = self.toolkit.pushed(element) && action(&mut self.values);
        if !keep {
            self.toolkit.set_pushed(element, false);
            self.scheduler.cancel(token);
            self.task_owner.remove(&token);
            *task = None;
        }
    }

    // ----- camera -----

    /// Feed a pointer event to the camera controller
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> bool {
        self.camera.handle(event)
    }

    pub fn width(&self) -> u32 {
        self.toolkit.size()[0]
    }

    pub fn height(&self) -> u32 {
        self.toolkit.size()[1]
    }

    /// Perspective projection for the current surface size
    pub fn projection_matrix(&self, near: f32, far: f32) -> Mat4 {
        self.camera
            .projection_matrix(self.width() as f32, self.height() as f32, near, far)
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.camera.view_matrix()
    }

    pub fn world_matrix(&self) -> Mat4 {
        self.camera.world_matrix()
    }

    pub fn scale(&self) -> f32 {
        self.camera.scale()
    }

    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut CameraController {
        &mut self.camera
    }

    // ----- inspection -----

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    pub fn bindings(&self) -> &BindingRegistry {
        &self.bindings
    }

    pub fn panels(&self) -> &PanelRegistry {
        &self.panels
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn toolkit(&self) -> &T {
        &self.toolkit
    }

    pub fn toolkit_mut(&mut self) -> &mut T {
        &mut self.toolkit
    }
}

impl<T: Toolkit> Drop for OverlayWindow<T> {
    fn drop(&mut self) {
        for widget in self.bindings.unregister_all() {
            self.release(widget);
        }
    }
}
