//! Text label bound to a value

use super::Widget;
use crate::toolkit::{ElementId, Toolkit};
use crate::values::{BindableValue, ValueKey, ValueStore};

/// Values that can be shown as label text
pub trait LabelSource: BindableValue {
    fn label_text(&self) -> String;
}

impl LabelSource for bool {
    fn label_text(&self) -> String {
        let text = if *self { "on" } else { "off" };
        text.to_string()
    }
}

impl LabelSource for f64 {
    fn label_text(&self) -> String {
        format!("{:.6}", self)
    }
}

/// Shows the current value of a bound flag or scalar
#[derive(Debug, Clone)]
pub struct ValueLabel<T> {
    element: ElementId,
    key: ValueKey<T>,
    shown: Option<String>,
}

impl<T: LabelSource> ValueLabel<T> {
    pub fn new(element: ElementId, key: ValueKey<T>) -> Self {
        Self {
            element,
            key,
            shown: None,
        }
    }
}

impl<T: LabelSource> Widget for ValueLabel<T> {
    fn element(&self) -> ElementId {
        self.element
    }

    fn refresh(&mut self, values: &ValueStore, toolkit: &mut dyn Toolkit) {
        let Some(value) = values.get(self.key) else {
            return;
        };
        let text = value.label_text();
        if self.shown.as_deref() != Some(text.as_str()) {
            toolkit.set_text(self.element, &text);
            self.shown = Some(text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolkit::HeadlessToolkit;

    #[test]
    fn test_label_text() {
        assert_eq!(true.label_text(), "on");
        assert_eq!(false.label_text(), "off");
        assert_eq!(0.5_f64.label_text(), "0.500000");
    }

    #[test]
    fn test_label_follows_value() {
        let mut toolkit = HeadlessToolkit::new(100, 100);
        let panel = toolkit.create_panel("p");
        let element = toolkit.create_label(panel, "");
        let mut values = ValueStore::new();
        let speed = values.insert(1.25_f64);

        let mut label = ValueLabel::new(element, speed);
        label.refresh(&values, &mut toolkit);
        assert_eq!(toolkit.text(element), Some("1.250000"));

        values.set(speed, -3.0).unwrap();
        label.refresh(&values, &mut toolkit);
        assert_eq!(toolkit.text(element), Some("-3.000000"));
    }
}
