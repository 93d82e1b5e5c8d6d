use super::error::EngineError;
use ndarray::{Array2, ArrayView1, Axis};
use std::fmt;

/// An element of a structure (atom, group or chain) and its short label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementLabel {
    pub index: usize,
    pub label: String,
}

impl ElementLabel {
    pub fn new(index: usize, label: impl Into<String>) -> Self {
        Self {
            index,
            label: label.into(),
        }
    }

    /// Pairs element indices with provider labels.
    pub(crate) fn zip(
        indices: &[usize],
        labels: Vec<String>,
        context: &'static str,
    ) -> Result<Vec<Self>, EngineError> {
        if indices.len() != labels.len() {
            return Err(EngineError::ShapeMismatch {
                context,
                expected: indices.len(),
                found: labels.len(),
            });
        }
        Ok(indices
            .iter()
            .zip(labels)
            .map(|(&index, label)| Self { index, label })
            .collect())
    }
}

impl fmt::Display for ElementLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Per-frame values of a labelled set of elements, indexed `[frame, element]`.
///
/// The element axis always has exactly one column per label.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledSeries<T> {
    labels: Vec<ElementLabel>,
    values: Array2<T>,
}

impl<T> LabeledSeries<T> {
    pub fn new(labels: Vec<ElementLabel>, values: Array2<T>) -> Result<Self, EngineError> {
        if values.ncols() != labels.len() {
            return Err(EngineError::ShapeMismatch {
                context: "labeled series",
                expected: labels.len(),
                found: values.ncols(),
            });
        }
        Ok(Self { labels, values })
    }

    pub fn labels(&self) -> &[ElementLabel] {
        &self.labels
    }

    pub fn values(&self) -> &Array2<T> {
        &self.values
    }

    pub fn n_frames(&self) -> usize {
        self.values.nrows()
    }

    pub fn n_elements(&self) -> usize {
        self.labels.len()
    }

    /// The per-frame values of the element labelled `label`.
    pub fn column(&self, label: &str) -> Option<ArrayView1<'_, T>> {
        self.labels
            .iter()
            .position(|l| l.label == label)
            .map(|i| self.values.column(i))
    }

    /// Iterates `(label, per-frame values)` pairs in element order.
    pub fn iter(&self) -> impl Iterator<Item = (&ElementLabel, ArrayView1<'_, T>)> {
        self.labels.iter().zip(self.values.axis_iter(Axis(1)))
    }

    pub fn into_parts(self) -> (Vec<ElementLabel>, Array2<T>) {
        (self.labels, self.values)
    }
}
