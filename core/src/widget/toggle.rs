//! Toggle button bound to a flag

use super::Widget;
use crate::toolkit::{ElementId, Toolkit};
use crate::values::{ValueKey, ValueStore};

/// Pushes a bound `bool` into a toggle's pushed state
///
/// Writes only when the two differ. The reverse direction (user click to
/// value) is handled by the window's event dispatch.
#[derive(Debug, Clone)]
pub struct ToggleView {
    element: ElementId,
    key: ValueKey<bool>,
}

impl ToggleView {
    pub fn new(element: ElementId, key: ValueKey<bool>) -> Self {
        Self { element, key }
    }
}

impl Widget for ToggleView {
    fn element(&self) -> ElementId {
        self.element
    }

    fn refresh(&mut self, values: &ValueStore, toolkit: &mut dyn Toolkit) {
        let Some(&value) = values.get(self.key) else {
            return;
        };
        if toolkit.pushed(self.element) != value {
            toolkit.set_pushed(self.element, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolkit::{ButtonKind, HeadlessToolkit};

    #[test]
    fn test_refresh_writes_only_on_difference() {
        let mut toolkit = HeadlessToolkit::new(100, 100);
        let panel = toolkit.create_panel("p");
        let button = toolkit.create_button(panel, "flag", ButtonKind::Toggle);
        let mut values = ValueStore::new();
        let flag = values.insert(true);

        let mut view = ToggleView::new(button, flag);
        view.refresh(&values, &mut toolkit);
        assert!(toolkit.pushed(button));
        assert_eq!(toolkit.pushed_writes(), 1);

        view.refresh(&values, &mut toolkit);
        view.refresh(&values, &mut toolkit);
        assert_eq!(toolkit.pushed_writes(), 1);

        values.set(flag, false).unwrap();
        view.refresh(&values, &mut toolkit);
        assert!(!toolkit.pushed(button));
        assert_eq!(toolkit.pushed_writes(), 2);
    }
}
