//! In-memory toolkit
//!
//! Keeps every element's visual state in plain structs and counts
//! mutations, so refresh behavior can be observed without a display.
//! User interaction is injected with [`HeadlessToolkit::click`] and
//! [`HeadlessToolkit::user_toggle`].

use hashbrown::HashMap;

use super::{
    ButtonKind, ElementId, PixelFormat, Sampler, TextureId, TextureUpload, Toolkit, UiEvent,
};
use crate::panel::GridLayout;

/// Kind-specific state of a headless element
#[derive(Debug, Clone, PartialEq)]
pub enum HeadlessElement {
    Panel {
        title: String,
        layout: GridLayout,
    },
    Button {
        parent: ElementId,
        caption: String,
        kind: ButtonKind,
        pushed: bool,
    },
    Graph {
        parent: ElementId,
        caption: String,
        values: Vec<f32>,
        footer: String,
    },
    ImageView {
        parent: ElementId,
        texture: TextureId,
        size: [u32; 2],
    },
    Label {
        parent: ElementId,
        text: String,
    },
}

/// Last upload received by a texture
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessTexture {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub pixels: Vec<u8>,
    pub sampler: Sampler,
}

#[derive(Debug, Clone, Default)]
pub struct HeadlessToolkit {
    size: [u32; 2],
    visible: bool,
    elements: Vec<HeadlessElement>,
    textures: HashMap<TextureId, Option<HeadlessTexture>>,
    next_texture: u32,
    events: Vec<UiEvent>,
    pushed_writes: usize,
    uploads: usize,
    binds: usize,
    redraws: usize,
    layouts: usize,
}

impl HeadlessToolkit {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: [width, height],
            ..Self::default()
        }
    }

    pub fn set_size(&mut self, width: u32, height: u32) {
        self.size = [width, height];
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn element(&self, element: ElementId) -> Option<&HeadlessElement> {
        self.elements.get(element.0 as usize)
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Layout of a panel element
    pub fn layout(&self, panel: ElementId) -> Option<&GridLayout> {
        match self.element(panel) {
            Some(HeadlessElement::Panel { layout, .. }) => Some(layout),
            _ => None,
        }
    }

    /// Values last pushed into a graph
    pub fn graph_values(&self, element: ElementId) -> Option<&[f32]> {
        match self.element(element) {
            Some(HeadlessElement::Graph { values, .. }) => Some(values),
            _ => None,
        }
    }

    pub fn footer(&self, element: ElementId) -> Option<&str> {
        match self.element(element) {
            Some(HeadlessElement::Graph { footer, .. }) => Some(footer),
            _ => None,
        }
    }

    pub fn text(&self, element: ElementId) -> Option<&str> {
        match self.element(element) {
            Some(HeadlessElement::Label { text, .. }) => Some(text),
            _ => None,
        }
    }

    /// Texture currently bound to an image view
    pub fn bound_texture(&self, element: ElementId) -> Option<TextureId> {
        match self.element(element) {
            Some(HeadlessElement::ImageView { texture, .. }) => Some(*texture),
            _ => None,
        }
    }

    /// Last upload of a live texture (`None` if never uploaded or released)
    pub fn texture(&self, texture: TextureId) -> Option<&HeadlessTexture> {
        self.textures.get(&texture).and_then(|t| t.as_ref())
    }

    /// Number of allocated, unreleased textures
    pub fn live_textures(&self) -> usize {
        self.textures.len()
    }

    /// Programmatic pushed-state writes (user toggles are not counted)
    pub fn pushed_writes(&self) -> usize {
        self.pushed_writes
    }

    pub fn uploads(&self) -> usize {
        self.uploads
    }

    pub fn binds(&self) -> usize {
        self.binds
    }

    pub fn redraws(&self) -> usize {
        self.redraws
    }

    pub fn layouts(&self) -> usize {
        self.layouts
    }

    /// Simulate a click on a momentary button
    pub fn click(&mut self, element: ElementId) {
        self.events.push(UiEvent::Activated(element));
    }

    /// Simulate the user flipping a toggle-flavored button
    pub fn user_toggle(&mut self, element: ElementId, pushed: bool) {
        if let Some(HeadlessElement::Button { pushed: state, .. }) =
            self.elements.get_mut(element.0 as usize)
        {
            *state = pushed;
        }
        self.events.push(UiEvent::Changed { element, pushed });
    }

    fn push(&mut self, element: HeadlessElement) -> ElementId {
        let id = ElementId(self.elements.len() as u32);
        self.elements.push(element);
        id
    }

    fn element_mut(&mut self, element: ElementId) -> Option<&mut HeadlessElement> {
        self.elements.get_mut(element.0 as usize)
    }
}

impl Toolkit for HeadlessToolkit {
    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn perform_layout(&mut self) {
        self.layouts += 1;
    }

    fn redraw(&mut self) {
        self.redraws += 1;
    }

    fn size(&self) -> [u32; 2] {
        self.size
    }

    fn create_panel(&mut self, title: &str) -> ElementId {
        self.push(HeadlessElement::Panel {
            title: title.to_string(),
            layout: GridLayout::default(),
        })
    }

    fn apply_layout(&mut self, panel: ElementId, layout: &GridLayout) {
        if let Some(HeadlessElement::Panel { layout: current, .. }) = self.element_mut(panel) {
            *current = layout.clone();
        }
    }

    fn create_button(&mut self, parent: ElementId, caption: &str, kind: ButtonKind) -> ElementId {
        self.push(HeadlessElement::Button {
            parent,
            caption: caption.to_string(),
            kind,
            pushed: false,
        })
    }

    fn create_graph(&mut self, parent: ElementId, caption: &str) -> ElementId {
        self.push(HeadlessElement::Graph {
            parent,
            caption: caption.to_string(),
            values: Vec::new(),
            footer: String::new(),
        })
    }

    fn create_image_view(&mut self, parent: ElementId, texture: TextureId, size: [u32; 2]) -> ElementId {
        self.push(HeadlessElement::ImageView {
            parent,
            texture,
            size,
        })
    }

    fn create_label(&mut self, parent: ElementId, text: &str) -> ElementId {
        self.push(HeadlessElement::Label {
            parent,
            text: text.to_string(),
        })
    }

    fn pushed(&self, element: ElementId) -> bool {
        matches!(
            self.element(element),
            Some(HeadlessElement::Button { pushed: true, .. })
        )
    }

    fn set_pushed(&mut self, element: ElementId, pushed: bool) {
        if let Some(HeadlessElement::Button { pushed: state, .. }) =
            self.elements.get_mut(element.0 as usize)
        {
            *state = pushed;
            self.pushed_writes += 1;
        }
    }

    fn set_graph_values(&mut self, element: ElementId, new_values: &[f32]) {
        if let Some(HeadlessElement::Graph { values, .. }) = self.element_mut(element) {
            values.clear();
            values.extend_from_slice(new_values);
        }
    }

    fn set_footer(&mut self, element: ElementId, new_footer: &str) {
        if let Some(HeadlessElement::Graph { footer, .. }) = self.element_mut(element) {
            *footer = new_footer.to_string();
        }
    }

    fn set_text(&mut self, element: ElementId, new_text: &str) {
        if let Some(HeadlessElement::Label { text, .. }) = self.element_mut(element) {
            *text = new_text.to_string();
        }
    }

    fn allocate_texture(&mut self) -> TextureId {
        let id = TextureId(self.next_texture);
        self.next_texture += 1;
        self.textures.insert(id, None);
        id
    }

    fn upload_texture(&mut self, texture: TextureId, upload: &TextureUpload<'_>) {
        if let Some(slot) = self.textures.get_mut(&texture) {
            *slot = Some(HeadlessTexture {
                width: upload.width,
                height: upload.height,
                format: upload.format,
                pixels: upload.pixels.to_vec(),
                sampler: upload.sampler,
            });
            self.uploads += 1;
        }
    }

    fn release_texture(&mut self, texture: TextureId) {
        self.textures.remove(&texture);
    }

    fn bind_texture(&mut self, element: ElementId, new_texture: TextureId) {
        if let Some(HeadlessElement::ImageView { texture, .. }) =
            self.elements.get_mut(element.0 as usize)
        {
            *texture = new_texture;
            self.binds += 1;
        }
    }

    fn drain_events(&mut self) -> Vec<UiEvent> {
        std::mem::take(&mut self.events)
    }
}
