//! Panel registry and grid layout
//!
//! Each panel title maps to exactly one container, created on first use.
//! Widgets are appended as rows of a three-column grid (label, spacer,
//! content); every row after the first is preceded by a thin separator row.

use hashbrown::HashMap;

use crate::config::LayoutConfig;
use crate::toolkit::{ElementId, Toolkit};

/// Grid cell placement of one element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    pub col: usize,
    pub row: usize,
    pub width: usize,
    pub height: usize,
}

impl Anchor {
    pub fn new(col: usize, row: usize, width: usize, height: usize) -> Self {
        Self {
            col,
            row,
            width,
            height,
        }
    }
}

/// Append-only grid with fixed column widths
///
/// A row height of 0 means "size to content".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridLayout {
    columns: Vec<u32>,
    col_stretch: Vec<f32>,
    rows: Vec<u32>,
    margin: u32,
    anchors: Vec<(ElementId, Anchor)>,
}

impl GridLayout {
    pub fn new(columns: Vec<u32>, margin: u32) -> Self {
        let col_stretch = vec![0.0; columns.len()];
        Self {
            columns,
            col_stretch,
            rows: Vec::new(),
            margin,
            anchors: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[u32] {
        &self.columns
    }

    pub fn rows(&self) -> &[u32] {
        &self.rows
    }

    pub fn col_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn margin(&self) -> u32 {
        self.margin
    }

    pub fn col_stretch(&self, col: usize) -> f32 {
        self.col_stretch.get(col).copied().unwrap_or(0.0)
    }

    pub fn set_col_stretch(&mut self, col: usize, stretch: f32) {
        if let Some(s) = self.col_stretch.get_mut(col) {
            *s = stretch;
        }
    }

    pub fn append_row(&mut self, height: u32) {
        self.rows.push(height);
    }

    pub fn set_anchor(&mut self, element: ElementId, anchor: Anchor) {
        match self.anchors.iter_mut().find(|(e, _)| *e == element) {
            Some((_, a)) => *a = anchor,
            None => self.anchors.push((element, anchor)),
        }
    }

    pub fn anchor(&self, element: ElementId) -> Option<Anchor> {
        self.anchors
            .iter()
            .find(|(e, _)| *e == element)
            .map(|(_, a)| *a)
    }

    pub fn anchors(&self) -> &[(ElementId, Anchor)] {
        &self.anchors
    }

    /// Elements anchored in a row, left to right
    pub fn row_elements(&self, row: usize) -> Vec<(ElementId, Anchor)> {
        let mut cells: Vec<_> = self
            .anchors
            .iter()
            .filter(|(_, a)| a.row == row)
            .copied()
            .collect();
        cells.sort_by_key(|(_, a)| a.col);
        cells
    }
}

/// A titled container and its layout
#[derive(Debug, Clone)]
pub struct Panel {
    pub title: String,
    pub element: ElementId,
    pub layout: GridLayout,
}

/// Lazily created panels keyed by title
#[derive(Debug, Clone)]
pub struct PanelRegistry {
    panels: Vec<Panel>,
    by_title: HashMap<String, usize>,
    config: LayoutConfig,
}

impl PanelRegistry {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            panels: Vec::new(),
            by_title: HashMap::new(),
            config,
        }
    }

    /// Look up the panel with this title, creating it if needed
    pub fn panel(&mut self, title: &str, toolkit: &mut dyn Toolkit) -> ElementId {
        let index = self.index(title, toolkit);
        self.panels[index].element
    }

    pub fn get(&self, title: &str) -> Option<&Panel> {
        self.by_title.get(title).map(|&i| &self.panels[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Panel> {
        self.panels.iter()
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    /// Append a row holding one element across the full width
    pub fn add_widget(&mut self, title: &str, element: ElementId, toolkit: &mut dyn Toolkit) -> Anchor {
        let separator = self.config.separator_height;
        let index = self.index(title, toolkit);
        let panel = &mut self.panels[index];
        let layout = &mut panel.layout;
        if layout.row_count() > 0 {
            layout.append_row(separator);
        }
        layout.append_row(0);
        let anchor = Anchor::new(0, layout.row_count() - 1, layout.col_count(), 1);
        layout.set_anchor(element, anchor);
        toolkit.apply_layout(panel.element, &panel.layout);
        anchor
    }

    /// Append a row split into a left cell (column 0) and a right cell (column 2)
    pub fn add_pair(
        &mut self,
        title: &str,
        left: Option<ElementId>,
        right: Option<ElementId>,
        toolkit: &mut dyn Toolkit,
    ) -> usize {
        let separator = self.config.separator_height;
        let index = self.index(title, toolkit);
        let panel = &mut self.panels[index];
        let layout = &mut panel.layout;
        if layout.row_count() > 0 {
            layout.append_row(separator);
        }
        layout.append_row(0);
        let row = layout.row_count() - 1;
        if let Some(left) = left {
            layout.set_anchor(left, Anchor::new(0, row, 1, 1));
        }
        if let Some(right) = right {
            layout.set_anchor(right, Anchor::new(2, row, 1, 1));
        }
        toolkit.apply_layout(panel.element, &panel.layout);
        row
    }

    fn index(&mut self, title: &str, toolkit: &mut dyn Toolkit) -> usize {
        if let Some(&index) = self.by_title.get(title) {
            return index;
        }

        let mut layout = GridLayout::new(self.config.columns.to_vec(), self.config.margin);
        layout.set_col_stretch(2, 1.0);

        let element = toolkit.create_panel(title);
        toolkit.apply_layout(element, &layout);
        log::debug!("overlay: created panel '{}'", title);

        let index = self.panels.len();
        self.panels.push(Panel {
            title: title.to_string(),
            element,
            layout,
        });
        self.by_title.insert(title.to_string(), index);
        index
    }
}
