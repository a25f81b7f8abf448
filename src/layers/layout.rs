use ndarray::{s, ArrayView1, ArrayView2, ArrayViewMut1, ArrayViewMut2};
use serde::{Serialize, Deserialize};

use crate::error::{EngineError, Result};

/// Ordered layer widths `[d, h1, ..., k]`, at least two entries, all non-zero.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Architecture {
    widths: Vec<usize>,
}

impl Architecture {
    pub fn new(widths: &[usize]) -> Result<Self> {
        if widths.len() < 2 {
            return Err(EngineError::invalid_architecture(format!(
                "need at least an input and an output layer, got {} widths",
                widths.len()
            )));
        }
        if let Some(position) = widths.iter().position(|&w| w == 0) {
            return Err(EngineError::invalid_architecture(format!(
                "layer {} has zero width",
                position
            )));
        }
        Ok(Architecture { widths: widths.to_vec() })
    }

    /// `[input_dim] ++ hidden ++ [output_dim]`
    pub fn from_parts(input_dim: usize, hidden: &[usize], output_dim: usize) -> Result<Self> {
        let mut widths = Vec::with_capacity(hidden.len() + 2);
        widths.push(input_dim);
        widths.extend_from_slice(hidden);
        widths.push(output_dim);
        Self::new(&widths)
    }

    pub fn widths(&self) -> &[usize] {
        &self.widths
    }

    pub fn input_dim(&self) -> usize {
        self.widths[0]
    }

    pub fn output_dim(&self) -> usize {
        self.widths[self.widths.len() - 1]
    }

    /// Number of weight matrices, `widths.len() - 1`.
    pub fn num_layers(&self) -> usize {
        self.widths.len() - 1
    }

    pub fn encoded_len(&self) -> usize {
        encoded_len(&self.widths)
    }
}

/// Length of the flat buffer for `widths`: `Σ (in + 1) * out` over consecutive pairs.
pub fn encoded_len(widths: &[usize]) -> usize {
    widths.windows(2).map(|w| (w[0] + 1) * w[1]).sum()
}

/// One layer's matrix inside the flat buffer: `rows = out`, `cols = in + 1`,
/// row-major, column 0 holding the bias.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayerView {
    pub offset: usize,
    pub rows: usize,
    pub cols: usize,
}

impl LayerView {
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn input_width(&self) -> usize {
        self.cols - 1
    }

    fn view<'a>(&self, flat: ArrayView1<'a, f64>) -> Result<ArrayView2<'a, f64>> {
        let slice = flat.slice_move(s![self.offset..self.offset + self.len()]);
        Ok(slice.into_shape((self.rows, self.cols))?)
    }

    fn view_mut<'a>(&self, flat: ArrayViewMut1<'a, f64>) -> Result<ArrayViewMut2<'a, f64>> {
        let slice = flat.slice_move(s![self.offset..self.offset + self.len()]);
        Ok(slice.into_shape((self.rows, self.cols))?)
    }
}

/// Arena of matrix views over one flat buffer, computed once per architecture.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeightLayout {
    views: Vec<LayerView>,
    len: usize,
}

impl WeightLayout {
    pub fn new(architecture: &Architecture) -> Self {
        let mut offset = 0;
        let views = architecture
            .widths()
            .windows(2)
            .map(|w| {
                let view = LayerView { offset, rows: w[1], cols: w[0] + 1 };
                offset += view.len();
                view
            })
            .collect();
        WeightLayout { views, len: offset }
    }

    /// Total number of doubles the buffer must hold.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn views(&self) -> &[LayerView] {
        &self.views
    }

    pub fn check_len(&self, actual: usize) -> Result<()> {
        if actual != self.len {
            return Err(EngineError::LayoutError { expected: self.len, actual });
        }
        Ok(())
    }

    /// Slice `flat` into one `[out, in + 1]` view per layer, in architecture order.
    pub fn decode<'a>(&self, flat: ArrayView1<'a, f64>) -> Result<Vec<ArrayView2<'a, f64>>> {
        self.check_len(flat.len())?;
        self.views.iter().map(|v| v.view(flat)).collect()
    }

    /// Mutable counterpart of [`WeightLayout::decode`]; the views are disjoint.
    pub fn decode_mut<'a>(&self, flat: ArrayViewMut1<'a, f64>) -> Result<Vec<ArrayViewMut2<'a, f64>>> {
        self.check_len(flat.len())?;
        let mut rest = flat;
        let mut out = Vec::with_capacity(self.views.len());
        for view in &self.views {
            let (head, tail) = rest.split_at(ndarray::Axis(0), view.len());
            out.push(LayerView { offset: 0, ..*view }.view_mut(head)?);
            rest = tail;
        }
        Ok(out)
    }

    /// View of a single layer.
    pub fn layer<'a>(&self, flat: ArrayView1<'a, f64>, index: usize) -> Result<ArrayView2<'a, f64>> {
        self.check_len(flat.len())?;
        let view = self.views.get(index).ok_or_else(|| {
            EngineError::shape_mismatch(
                "layer index".to_string(),
                format!("< {}", self.views.len()),
                index.to_string(),
            )
        })?;
        view.view(flat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array1;

    #[test]
    fn test_views_are_contiguous_and_cover_buffer() {
        let arch = Architecture::new(&[3, 4, 2]).unwrap();
        let layout = WeightLayout::new(&arch);
        assert_eq!(layout.views()[0], LayerView { offset: 0, rows: 4, cols: 4 });
        assert_eq!(layout.views()[1], LayerView { offset: 16, rows: 2, cols: 5 });
        assert_eq!(layout.len(), 26);
    }

    #[test]
    fn test_decode_mut_writes_through() {
        let arch = Architecture::new(&[1, 2, 1]).unwrap();
        let layout = WeightLayout::new(&arch);
        let mut flat = Array1::zeros(layout.len());
        {
            let mut layers = layout.decode_mut(flat.view_mut()).unwrap();
            layers[0].fill(1.0);
            layers[1][[0, 0]] = 7.0;
        }
        assert_eq!(flat.to_vec(), vec![1.0, 1.0, 1.0, 1.0, 7.0, 0.0, 0.0]);
    }
}
