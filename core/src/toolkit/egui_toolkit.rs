//! egui-backed toolkit
//!
//! Each panel is drawn as an `egui::Window`, one grid row at a time, inside
//! the layout's margin. Separator rows become vertical space; a full-span
//! row holds one element, a split row holds a label cell and a content cell
//! side by side. Columns keep their fixed widths, and stretchable columns
//! share whatever width the panel's widest full-span element adds. Element
//! state lives here between frames; user interaction is queued as
//! [`UiEvent`]s during [`EguiToolkit::show`].

use hashbrown::HashMap;

use super::{
    ButtonKind, ElementId, Filter, PixelFormat, Sampler, TextureId, TextureUpload, Toolkit,
    UiEvent, Wrap,
};
use crate::panel::{Anchor, GridLayout};

/// Height of a painted graph in points
const GRAPH_HEIGHT: f32 = 60.0;

enum EguiElement {
    Panel { title: String, layout: GridLayout },
    Button { caption: String, kind: ButtonKind, pushed: bool },
    Graph { caption: String, values: Vec<f32>, footer: String },
    ImageView { texture: TextureId, size: [u32; 2] },
    Label { text: String },
}

pub struct EguiToolkit {
    ctx: egui::Context,
    visible: bool,
    fallback_size: [u32; 2],
    elements: Vec<EguiElement>,
    /// Allocated textures; the egui handle is created on first upload
    textures: HashMap<TextureId, Option<egui::TextureHandle>>,
    next_texture: u32,
    events: Vec<UiEvent>,
    /// Widest full-span content of each panel on the last frame
    content_widths: HashMap<ElementId, f32>,
}

impl EguiToolkit {
    /// `size` is reported until the context knows its viewport
    pub fn new(ctx: egui::Context, size: [u32; 2]) -> Self {
        Self {
            ctx,
            visible: false,
            fallback_size: size,
            elements: Vec::new(),
            textures: HashMap::new(),
            next_texture: 0,
            events: Vec::new(),
            content_widths: HashMap::new(),
        }
    }

    /// Draw every panel; call once per frame from inside the egui pass
    pub fn show(&mut self, ctx: &egui::Context) {
        if !self.visible {
            return;
        }

        let panels: Vec<ElementId> = self
            .elements
            .iter()
            .enumerate()
            .filter(|(_, e)| matches!(e, EguiElement::Panel { .. }))
            .map(|(i, _)| ElementId(i as u32))
            .collect();

        for (index, panel) in panels.into_iter().enumerate() {
            let Some(EguiElement::Panel { title, layout }) = self.elements.get(panel.0 as usize)
            else {
                continue;
            };
            let title = title.clone();
            let layout = layout.clone();

            egui::Window::new(title)
                .id(egui::Id::new(("nanovis_panel", panel.0)))
                .default_pos([10.0 + 20.0 * index as f32, 10.0 + 20.0 * index as f32])
                .frame(panel_frame(&ctx.style(), &layout))
                .resizable(false)
                .collapsible(true)
                .show(ctx, |ui| self.draw_panel(ui, panel, &layout));
        }
    }

    fn draw_panel(&mut self, ui: &mut egui::Ui, panel: ElementId, layout: &GridLayout) {
        let content_width = self.content_widths.get(&panel).copied().unwrap_or(0.0);
        let widths = column_widths(layout, content_width);
        let row_height = ui.spacing().interact_size.y;
        let mut widest = 0.0_f32;

        for (row, &height) in layout.rows().iter().enumerate() {
            if height > 0 {
                ui.add_space(height as f32);
                continue;
            }

            let cells = layout.row_elements(row);
            match cells.as_slice() {
                [] => {}
                [(element, anchor)] if anchor.width >= layout.col_count() => {
                    let cell = span_width(&widths, 0, layout.col_count());
                    let drawn = ui
                        .allocate_ui_with_layout(
                            egui::vec2(cell, row_height),
                            egui::Layout::top_down(egui::Align::Min),
                            |ui| self.draw_element(ui, *element),
                        )
                        .response
                        .rect
                        .width();
                    widest = widest.max(drawn);
                }
                _ => {
                    ui.horizontal(|ui| {
                        ui.spacing_mut().item_spacing.x = 0.0;
                        let mut next_col = 0;
                        for (element, anchor) in &cells {
                            let gap = span_width(&widths, next_col, anchor.col.saturating_sub(next_col));
                            if gap > 0.0 {
                                ui.add_space(gap);
                            }
                            let cell = cell_width(&widths, *anchor);
                            ui.allocate_ui_with_layout(
                                egui::vec2(cell, row_height),
                                egui::Layout::left_to_right(egui::Align::Center),
                                |ui| {
                                    ui.set_min_width(cell);
                                    self.draw_element(ui, *element);
                                },
                            );
                            next_col = anchor.col + anchor.width;
                        }
                    });
                }
            }
        }

        self.content_widths.insert(panel, widest);
    }

    fn draw_element(&mut self, ui: &mut egui::Ui, element: ElementId) {
        let Self {
            elements,
            textures,
            events,
            ..
        } = self;

        match elements.get_mut(element.0 as usize) {
            Some(EguiElement::Button {
                caption,
                kind: ButtonKind::Momentary,
                ..
            }) => {
                if ui.button(caption.as_str()).clicked() {
                    events.push(UiEvent::Activated(element));
                }
            }
            Some(EguiElement::Button {
                caption,
                kind: ButtonKind::Toggle,
                pushed,
            }) => {
                if ui.toggle_value(pushed, caption.as_str()).changed() {
                    events.push(UiEvent::Changed {
                        element,
                        pushed: *pushed,
                    });
                }
            }
            Some(EguiElement::Graph {
                caption,
                values,
                footer,
            }) => draw_graph(ui, caption, values, footer),
            Some(EguiElement::ImageView { texture, size }) => {
                let size = egui::vec2(size[0] as f32, size[1] as f32);
                match textures.get(&*texture).and_then(|t| t.as_ref()) {
                    Some(handle) => {
                        ui.add(egui::Image::from_texture(egui::load::SizedTexture::new(
                            handle.id(),
                            size,
                        )));
                    }
                    None => {
                        let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
                        ui.painter()
                            .rect_filled(rect, 0.0, egui::Color32::from_gray(20));
                    }
                }
            }
            Some(EguiElement::Label { text }) => {
                ui.label(text.as_str());
            }
            Some(EguiElement::Panel { .. }) | None => {}
        }
    }

    fn push(&mut self, element: EguiElement) -> ElementId {
        let id = ElementId(self.elements.len() as u32);
        self.elements.push(element);
        id
    }

    /// egui handle of an uploaded texture
    pub fn texture_handle(&self, texture: TextureId) -> Option<&egui::TextureHandle> {
        self.textures.get(&texture).and_then(|t| t.as_ref())
    }
}

/// Window frame with the layout's margin on every side
fn panel_frame(style: &egui::Style, layout: &GridLayout) -> egui::Frame {
    egui::Frame::window(style).inner_margin(layout.margin() as f32)
}

/// Width of every column for a panel whose widest full-span element is
/// `content_width` wide. Width past the fixed columns' sum is split
/// between the stretchable columns in proportion to their stretch.
fn column_widths(layout: &GridLayout, content_width: f32) -> Vec<f32> {
    let columns = layout.columns();
    let fixed: f32 = columns.iter().map(|&w| w as f32).sum();
    let stretch: f32 = (0..columns.len()).map(|col| layout.col_stretch(col).max(0.0)).sum();
    let extra = (content_width - fixed).max(0.0);

    columns
        .iter()
        .enumerate()
        .map(|(col, &width)| {
            let share = if stretch > 0.0 {
                extra * layout.col_stretch(col).max(0.0) / stretch
            } else {
                0.0
            };
            width as f32 + share
        })
        .collect()
}

fn span_width(widths: &[f32], col: usize, span: usize) -> f32 {
    widths.iter().skip(col).take(span).sum()
}

fn cell_width(widths: &[f32], anchor: Anchor) -> f32 {
    span_width(widths, anchor.col, anchor.width)
}

/// Normalized samples as a polyline, caption top-left, footer bottom-right
fn draw_graph(ui: &mut egui::Ui, caption: &str, values: &[f32], footer: &str) {
    let (rect, _response) = ui.allocate_exact_size(
        egui::vec2(ui.available_width(), GRAPH_HEIGHT),
        egui::Sense::hover(),
    );
    if !ui.is_rect_visible(rect) {
        return;
    }

    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 2.0, egui::Color32::from_gray(30));

    if !values.is_empty() {
        let step = if values.len() > 1 {
            rect.width() / (values.len() - 1) as f32
        } else {
            0.0
        };
        let points: Vec<egui::Pos2> = values
            .iter()
            .enumerate()
            .map(|(i, &v)| egui::pos2(rect.left() + i as f32 * step, rect.bottom() - v * rect.height()))
            .collect();
        painter.add(egui::Shape::line(
            points,
            egui::Stroke::new(1.5, egui::Color32::from_rgb(255, 192, 0)),
        ));
    }

    let font = egui::FontId::proportional(11.0);
    let text_color = egui::Color32::from_gray(220);
    painter.text(
        rect.left_top() + egui::vec2(4.0, 2.0),
        egui::Align2::LEFT_TOP,
        caption,
        font.clone(),
        text_color,
    );
    painter.text(
        rect.right_bottom() - egui::vec2(4.0, 2.0),
        egui::Align2::RIGHT_BOTTOM,
        footer,
        font,
        text_color,
    );
}

fn texture_options(sampler: Sampler) -> egui::TextureOptions {
    let filter = |f: Filter| match f {
        Filter::Nearest => egui::TextureFilter::Nearest,
        Filter::Linear => egui::TextureFilter::Linear,
    };
    let mut options = egui::TextureOptions::LINEAR;
    options.magnification = filter(sampler.magnification);
    options.minification = filter(sampler.minification);
    options.wrap_mode = match sampler.wrap {
        Wrap::ClampToEdge => egui::TextureWrapMode::ClampToEdge,
        Wrap::Repeat => egui::TextureWrapMode::Repeat,
    };
    options
}

/// Reorder BGR pixels into the RGB layout egui expects
fn bgr_to_rgb(pixels: &[u8]) -> Vec<u8> {
    pixels
        .chunks_exact(3)
        .flat_map(|p| [p[2], p[1], p[0]])
        .collect()
}

impl Toolkit for EguiToolkit {
    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        self.ctx.request_repaint();
    }

    fn perform_layout(&mut self) {
        // egui lays out every frame
        self.ctx.request_repaint();
    }

    fn redraw(&mut self) {
        self.ctx.request_repaint();
    }

    fn size(&self) -> [u32; 2] {
        let pixels_per_point = self.ctx.pixels_per_point();
        match self.ctx.input(|i| i.viewport().inner_rect) {
            Some(rect) => [
                (rect.width() * pixels_per_point).round() as u32,
                (rect.height() * pixels_per_point).round() as u32,
            ],
            None => self.fallback_size,
        }
    }

    fn create_panel(&mut self, title: &str) -> ElementId {
        self.push(EguiElement::Panel {
            title: title.to_string(),
            layout: GridLayout::default(),
        })
    }

    fn apply_layout(&mut self, panel: ElementId, new_layout: &GridLayout) {
        if let Some(EguiElement::Panel { layout, .. }) = self.elements.get_mut(panel.0 as usize) {
            *layout = new_layout.clone();
        }
    }

    fn create_button(&mut self, _parent: ElementId, caption: &str, kind: ButtonKind) -> ElementId {
        self.push(EguiElement::Button {
            caption: caption.to_string(),
            kind,
            pushed: false,
        })
    }

    fn create_graph(&mut self, _parent: ElementId, caption: &str) -> ElementId {
        self.push(EguiElement::Graph {
            caption: caption.to_string(),
            values: Vec::new(),
            footer: String::new(),
        })
    }

    fn create_image_view(&mut self, _parent: ElementId, texture: TextureId, size: [u32; 2]) -> ElementId {
        self.push(EguiElement::ImageView { texture, size })
    }

    fn create_label(&mut self, _parent: ElementId, text: &str) -> ElementId {
        self.push(EguiElement::Label {
            text: text.to_string(),
        })
    }

    fn pushed(&self, element: ElementId) -> bool {
        matches!(
            self.elements.get(element.0 as usize),
            Some(EguiElement::Button { pushed: true, .. })
        )
    }

    fn set_pushed(&mut self, element: ElementId, new_pushed: bool) {
        if let Some(EguiElement::Button { pushed, .. }) = self.elements.get_mut(element.0 as usize) {
            *pushed = new_pushed;
        }
    }

    fn set_graph_values(&mut self, element: ElementId, new_values: &[f32]) {
        if let Some(EguiElement::Graph { values, .. }) = self.elements.get_mut(element.0 as usize) {
            values.clear();
            values.extend_from_slice(new_values);
        }
    }

    fn set_footer(&mut self, element: ElementId, new_footer: &str) {
        if let Some(EguiElement::Graph { footer, .. }) = self.elements.get_mut(element.0 as usize) {
            *footer = new_footer.to_string();
        }
    }

    fn set_text(&mut self, element: ElementId, new_text: &str) {
        if let Some(EguiElement::Label { text }) = self.elements.get_mut(element.0 as usize) {
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
        let Some(slot) = self.textures.get_mut(&texture) else {
            log::warn!("overlay: upload to unknown texture {:?}", texture);
            return;
        };

        let expected =
            upload.width as usize * upload.height as usize * upload.format.bytes_per_pixel();
        if upload.pixels.len() != expected {
            log::warn!(
                "overlay: texture {:?} upload has {} bytes, expected {}",
                texture,
                upload.pixels.len(),
                expected
            );
            return;
        }

        let rgb = match upload.format {
            PixelFormat::Bgr8 => bgr_to_rgb(upload.pixels),
        };
        let image = egui::ColorImage::from_rgb([upload.width as usize, upload.height as usize], &rgb);
        let options = texture_options(upload.sampler);

        match slot {
            Some(handle) => handle.set(image, options),
            None => {
                *slot = Some(
                    self.ctx
                        .load_texture(format!("nanovis-texture-{}", texture.0), image, options),
                );
                log::debug!("overlay: created egui texture for {:?}", texture);
            }
        }
    }

    fn release_texture(&mut self, texture: TextureId) {
        // Dropping the handle frees the GPU texture
        self.textures.remove(&texture);
    }

    fn bind_texture(&mut self, element: ElementId, new_texture: TextureId) {
        if let Some(EguiElement::ImageView { texture, .. }) = self.elements.get_mut(element.0 as usize)
        {
            *texture = new_texture;
        }
    }

    fn drain_events(&mut self) -> Vec<UiEvent> {
        std::mem::take(&mut self.events)
    }
}
