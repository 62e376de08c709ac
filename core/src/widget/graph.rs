//! Time-series graphs
//!
//! [`ScalarGraph`] keeps a fixed-length history of one scalar, scrolling
//! left by one sample per refresh. [`SeriesGraph`] mirrors a whole sequence
//! every refresh. Both normalize to `[0, 1]` against their bounds without
//! clamping.

use super::Widget;
use crate::toolkit::{ElementId, Toolkit};
use crate::values::{ValueKey, ValueStore};

/// Scrolling history of a bound scalar
#[derive(Debug, Clone)]
pub struct ScalarGraph {
    element: ElementId,
    key: ValueKey<f64>,
    max: f64,
    min: f64,
    history: Vec<f32>,
}

impl ScalarGraph {
    /// Create a graph whose whole history is the normalized `initial` value
    pub fn new(
        element: ElementId,
        key: ValueKey<f64>,
        max: f64,
        min: f64,
        history_len: usize,
        initial: f64,
    ) -> Self {
        let fill = normalize(initial, max, min);
        Self {
            element,
            key,
            max,
            min,
            history: vec![fill; history_len],
        }
    }

    pub fn history(&self) -> &[f32] {
        &self.history
    }
}

impl Widget for ScalarGraph {
    fn element(&self) -> ElementId {
        self.element
    }

    fn refresh(&mut self, values: &ValueStore, toolkit: &mut dyn Toolkit) {
        let Some(&value) = values.get(self.key) else {
            return;
        };
        if let Some(last) = self.history.len().checked_sub(1) {
            self.history.copy_within(1.., 0);
            self.history[last] = normalize(value, self.max, self.min);
        }
        toolkit.set_graph_values(self.element, &self.history);
        toolkit.set_footer(self.element, &format!("{:.6}", value));
    }
}

fn normalize(value: f64, max: f64, min: f64) -> f32 {
    ((value - min) / (max - min)) as f32
}

/// Mirror of a bound sequence
#[derive(Debug, Clone)]
pub struct SeriesGraph {
    element: ElementId,
    key: ValueKey<Vec<f64>>,
    max: f64,
    min: f64,
}

impl SeriesGraph {
    /// `max <= min` means "derive the bounds from the data on every refresh"
    pub fn new(element: ElementId, key: ValueKey<Vec<f64>>, max: f64, min: f64) -> Self {
        Self {
            element,
            key,
            max,
            min,
        }
    }
}

impl Widget for SeriesGraph {
    fn element(&self) -> ElementId {
        self.element
    }

    fn refresh(&mut self, values: &ValueStore, toolkit: &mut dyn Toolkit) {
        let Some(series) = values.get(self.key) else {
            return;
        };
        let normalized = normalize_series(series, self.max, self.min);
        toolkit.set_graph_values(self.element, &normalized);
    }
}

/// Normalize a sequence against `[min, max]`
///
/// When `max <= min` the bounds come from the data instead. The range is
/// floored at `f64::EPSILON`, so a constant sequence maps to all zeros.
pub fn normalize_series(series: &[f64], max: f64, min: f64) -> Vec<f32> {
    let (max, min) = if max <= min {
        series
            .iter()
            .fold((-f64::MAX, f64::MAX), |(hi, lo), &v| (hi.max(v), lo.min(v)))
    } else {
        (max, min)
    };
    let range = (max - min).max(f64::EPSILON);
    series.iter().map(|&v| ((v - min) / range) as f32).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolkit::HeadlessToolkit;

    fn graph_fixture() -> (HeadlessToolkit, ElementId) {
        let mut toolkit = HeadlessToolkit::new(100, 100);
        let panel = toolkit.create_panel("p");
        let element = toolkit.create_graph(panel, "g");
        (toolkit, element)
    }

    #[test]
    fn test_scalar_history_scrolls_and_keeps_length() {
        let (mut toolkit, element) = graph_fixture();
        let mut values = ValueStore::new();
        let key = values.insert(0.0_f64);
        let mut graph = ScalarGraph::new(element, key, 10.0, 0.0, 60, 0.0);

        let inputs: Vec<f64> = (0..75).map(|i| (i % 11) as f64).collect();
        for (i, &v) in inputs.iter().enumerate() {
            values.set(key, v).unwrap();
            graph.refresh(&values, &mut toolkit);

            assert_eq!(graph.history().len(), 60);
            assert_eq!(graph.history()[59], (v / 10.0) as f32);
            if i + 1 >= 60 {
                let expected: Vec<f32> = inputs[i + 1 - 60..=i]
                    .iter()
                    .map(|&x| (x / 10.0) as f32)
                    .collect();
                assert_eq!(graph.history(), expected.as_slice());
            }
        }
        assert_eq!(toolkit.graph_values(element).unwrap(), graph.history());
    }

    #[test]
    fn test_scalar_initial_fill_and_footer() {
        let (mut toolkit, element) = graph_fixture();
        let mut values = ValueStore::new();
        let key = values.insert(5.0_f64);
        let mut graph = ScalarGraph::new(element, key, 10.0, 0.0, 4, 5.0);
        assert_eq!(graph.history(), &[0.5, 0.5, 0.5, 0.5]);

        values.set(key, 12.5).unwrap();
        graph.refresh(&values, &mut toolkit);
        // Out-of-range values are not clamped
        assert_eq!(graph.history(), &[0.5, 0.5, 0.5, 1.25]);
        assert_eq!(toolkit.footer(element), Some("12.500000"));
    }

    #[test]
    fn test_series_uses_given_bounds() {
        assert_eq!(normalize_series(&[0.0, 5.0, 10.0], 10.0, 0.0), vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_series_bound_fallback() {
        assert_eq!(normalize_series(&[1.0, 3.0, 2.0], 0.0, 0.0), vec![0.0, 1.0, 0.5]);
        // Inverted bounds also fall back to the data
        assert_eq!(normalize_series(&[1.0, 3.0, 2.0], -1.0, 1.0), vec![0.0, 1.0, 0.5]);
    }

    #[test]
    fn test_series_constant_data_is_flat() {
        let normalized = normalize_series(&[5.0, 5.0, 5.0], 0.0, 0.0);
        assert_eq!(normalized, vec![0.0, 0.0, 0.0]);
        assert!(normalized.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_series_graph_resizes_with_data() {
        let (mut toolkit, element) = graph_fixture();
        let mut values = ValueStore::new();
        let key = values.insert(vec![1.0, 2.0]);
        let mut graph = SeriesGraph::new(element, key, 0.0, 0.0);

        graph.refresh(&values, &mut toolkit);
        assert_eq!(toolkit.graph_values(element).unwrap().len(), 2);

        values.set(key, vec![4.0, 2.0, 0.0, 2.0]).unwrap();
        graph.refresh(&values, &mut toolkit);
        assert_eq!(toolkit.graph_values(element).unwrap(), &[1.0, 0.5, 0.0, 0.5]);

        values.set(key, Vec::new()).unwrap();
        graph.refresh(&values, &mut toolkit);
        assert!(toolkit.graph_values(element).unwrap().is_empty());
    }
}
