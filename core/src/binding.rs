//! Binding registry
//!
//! Maps each bound value's identity to the widgets that display it. Within
//! one identity, widgets refresh in registration order; across identities
//! the order is unspecified.

use hashbrown::HashMap;

use crate::toolkit::{ElementId, Toolkit};
use crate::values::{ValueId, ValueStore};
use crate::widget::Widget;

#[derive(Default)]
pub struct BindingRegistry {
    bindings: HashMap<ValueId, Vec<Box<dyn Widget>>>,
}

impl BindingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a widget to the bindings of a value
    pub fn register(&mut self, value: ValueId, widget: Box<dyn Widget>) {
        log::debug!(
            "overlay: bound element {:?} to {}",
            widget.element(),
            value
        );
        self.bindings.entry(value).or_default().push(widget);
    }

    /// Refresh every widget bound to one value
    pub fn refresh(&mut self, value: ValueId, values: &ValueStore, toolkit: &mut dyn Toolkit) {
        match self.bindings.get_mut(&value) {
            Some(widgets) => {
                for widget in widgets.iter_mut() {
                    widget.refresh(values, toolkit);
                }
            }
            None => log::trace!("overlay: no bindings for {}", value),
        }
    }

    /// Refresh every registered widget
    pub fn refresh_all(&mut self, values: &ValueStore, toolkit: &mut dyn Toolkit) {
        for widgets in self.bindings.values_mut() {
            for widget in widgets.iter_mut() {
                widget.refresh(values, toolkit);
            }
        }
    }

    /// Remove and return every widget bound to a value
    pub fn unregister(&mut self, value: ValueId) -> Vec<Box<dyn Widget>> {
        self.bindings.remove(&value).unwrap_or_default()
    }

    /// Remove and return every registered widget
    pub fn unregister_all(&mut self) -> Vec<Box<dyn Widget>> {
        self.bindings.drain().flat_map(|(_, widgets)| widgets).collect()
    }

    /// Elements bound to a value, in registration order
    pub fn elements_for(&self, value: ValueId) -> Vec<ElementId> {
        self.bindings
            .get(&value)
            .map(|widgets| widgets.iter().map(|w| w.element()).collect())
            .unwrap_or_default()
    }

    /// Total number of bindings
    pub fn len(&self) -> usize {
        self.bindings.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::toolkit::HeadlessToolkit;

    /// Records its element into a shared log on every refresh
    struct Probe {
        element: ElementId,
        log: Rc<RefCell<Vec<ElementId>>>,
    }

    impl Widget for Probe {
        fn element(&self) -> ElementId {
            self.element
        }

        fn refresh(&mut self, _values: &ValueStore, _toolkit: &mut dyn Toolkit) {
            self.log.borrow_mut().push(self.element);
        }
    }

    fn probe(id: u32, log: &Rc<RefCell<Vec<ElementId>>>) -> Box<dyn Widget> {
        Box::new(Probe {
            element: ElementId(id),
            log: Rc::clone(log),
        })
    }

    #[test]
    fn test_refresh_runs_one_identity_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut values = ValueStore::new();
        let flag = values.insert(true);
        let other = values.insert(false);
        let mut toolkit = HeadlessToolkit::new(10, 10);

        let mut registry = BindingRegistry::new();
        registry.register(flag.id(), probe(3, &log));
        registry.register(flag.id(), probe(1, &log));
        registry.register(other.id(), probe(2, &log));

        registry.refresh(flag.id(), &values, &mut toolkit);
        assert_eq!(*log.borrow(), vec![ElementId(3), ElementId(1)]);
        assert_eq!(registry.elements_for(flag.id()), vec![ElementId(3), ElementId(1)]);
    }

    #[test]
    fn test_refresh_all_runs_every_binding() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut values = ValueStore::new();
        let a = values.insert(1.0_f64);
        let b = values.insert(2.0_f64);
        let mut toolkit = HeadlessToolkit::new(10, 10);

        let mut registry = BindingRegistry::new();
        registry.register(a.id(), probe(0, &log));
        registry.register(b.id(), probe(1, &log));
        registry.register(b.id(), probe(2, &log));
        assert_eq!(registry.len(), 3);

        registry.refresh_all(&values, &mut toolkit);
        let mut seen = log.borrow().clone();
        seen.sort();
        assert_eq!(seen, vec![ElementId(0), ElementId(1), ElementId(2)]);

        // Within an identity, registration order holds
        let order = log.borrow();
        let i1 = order.iter().position(|&e| e == ElementId(1)).unwrap();
        let i2 = order.iter().position(|&e| e == ElementId(2)).unwrap();
        assert!(i1 < i2);
    }

    #[test]
    fn test_unregister_removes_identity() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut values = ValueStore::new();
        let a = values.insert(1.0_f64);
        let b = values.insert(2.0_f64);

        let mut registry = BindingRegistry::new();
        registry.register(a.id(), probe(0, &log));
        registry.register(b.id(), probe(1, &log));

        let removed = registry.unregister(a.id());
        assert_eq!(removed.len(), 1);
        assert_eq!(registry.len(), 1);
        assert!(registry.unregister(a.id()).is_empty());
        assert_eq!(registry.unregister_all().len(), 1);
        assert!(registry.is_empty());
    }
}
