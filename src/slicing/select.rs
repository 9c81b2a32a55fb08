//! Applying a dimension spec to an n-dimensional array.

use super::spec::{DimEntry, DimRange};
use ndarray::{ArrayD, IxDyn};
use thiserror::Error;

/// Reasons a spec cannot be applied to an array.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SliceError {
    /// More entries than array axes.
    #[error("too many indices: {given} given for {ndim} axes")]
    TooManyIndices {
        /// Entries supplied.
        given: usize,
        /// Array rank.
        ndim: usize,
    },
    /// Fixed index outside the axis.
    #[error("index {index} is out of bounds for axis {axis} with size {extent}")]
    IndexOutOfRange {
        /// Axis position.
        axis: usize,
        /// Requested index.
        index: i64,
        /// Axis extent.
        extent: usize,
    },
    /// Range with a zero stride.
    #[error("slice step cannot be zero (axis {axis})")]
    ZeroStep {
        /// Axis position.
        axis: usize,
    },
}

/// Resolve a range against an axis of length `len`, returning the selected
/// indices in order. Bounds clamp; negative bounds count from the end.
pub fn range_indices(range: &DimRange, len: usize) -> Option<Vec<usize>> {
    let step = range.step.unwrap_or(1);
    if step == 0 {
        return None;
    }
    let n = len as i64;

    let adjust = |v: i64, lower: i64, upper: i64| {
        let v = if v < 0 { v + n } else { v };
        v.clamp(lower, upper)
    };

    let mut out = Vec::new();
    if step > 0 {
        let start = range.start.map(|v| adjust(v, 0, n)).unwrap_or(0);
        let stop = range.stop.map(|v| adjust(v, 0, n)).unwrap_or(n);
        let mut i = start;
        while i < stop {
            out.push(i as usize);
            match i.checked_add(step) {
                Some(next) => i = next,
                None => break,
            }
        }
    } else {
        let start = range.start.map(|v| adjust(v, -1, n - 1)).unwrap_or(n - 1);
        let stop = range.stop.map(|v| adjust(v, -1, n - 1)).unwrap_or(-1);
        let mut i = start;
        while i > stop {
            out.push(i as usize);
            match i.checked_add(step) {
                Some(next) => i = next,
                None => break,
            }
        }
    }
    Some(out)
}

/// Resolve a fixed index, wrapping negatives once.
pub fn resolve_index(index: i64, len: usize, axis: usize) -> Result<usize, SliceError> {
    let n = len as i64;
    let i = if index < 0 { index + n } else { index };
    if i < 0 || i >= n {
        return Err(SliceError::IndexOutOfRange {
            axis,
            index,
            extent: len,
        });
    }
    Ok(i as usize)
}

/// How one source axis maps into a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AxisPick {
    /// Axis collapsed at this index.
    Fixed(usize),
    /// Axis kept, visiting these indices.
    Kept(Vec<usize>),
}

impl AxisPick {
    /// The indices visited along a kept axis.
    pub fn kept(&self) -> Option<&[usize]> {
        match self {
            AxisPick::Kept(v) => Some(v),
            AxisPick::Fixed(_) => None,
        }
    }
}

/// Resolve every axis of `shape` against `entries`. Missing trailing entries
/// select the whole axis.
pub fn resolve(entries: &[DimEntry], shape: &[usize]) -> Result<Vec<AxisPick>, SliceError> {
    if entries.len() > shape.len() {
        return Err(SliceError::TooManyIndices {
            given: entries.len(),
            ndim: shape.len(),
        });
    }

    shape
        .iter()
        .enumerate()
        .map(|(axis, &len)| match entries.get(axis) {
            Some(DimEntry::Index(i)) => resolve_index(*i, len, axis).map(AxisPick::Fixed),
            Some(DimEntry::Range(r)) => range_indices(r, len)
                .map(AxisPick::Kept)
                .ok_or(SliceError::ZeroStep { axis }),
            None => Ok(AxisPick::Kept((0..len).collect())),
        })
        .collect()
}

/// Slice `array` with `entries`, producing a new owned array whose rank is
/// the number of kept axes.
pub fn select<T: Clone>(array: &ArrayD<T>, entries: &[DimEntry]) -> Result<ArrayD<T>, SliceError> {
    let picks = resolve(entries, array.shape())?;
    Ok(take(array, &picks))
}

/// Gather the elements described by `picks`.
pub fn take<T: Clone>(array: &ArrayD<T>, picks: &[AxisPick]) -> ArrayD<T> {
    let out_shape: Vec<usize> = picks
        .iter()
        .filter_map(|p| p.kept().map(<[usize]>::len))
        .collect();

    let mut src = vec![0usize; picks.len()];
    ArrayD::from_shape_fn(IxDyn(&out_shape), |idx| {
        let mut k = 0;
        for (axis, pick) in picks.iter().enumerate() {
            src[axis] = match pick {
                AxisPick::Fixed(i) => *i,
                AxisPick::Kept(v) => {
                    let i = v[idx[k]];
                    k += 1;
                    i
                },
            };
        }
        array[IxDyn(&src)].clone()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slicing::parse_dims;

    fn r(start: Option<i64>, stop: Option<i64>, step: Option<i64>) -> DimRange {
        DimRange::new(start, stop, step)
    }

    #[test]
    fn full_range_visits_every_index() {
        assert_eq!(range_indices(&DimRange::FULL, 4), Some(vec![0, 1, 2, 3]));
    }

    #[test]
    fn ranges_clamp_like_half_open_slices() {
        assert_eq!(range_indices(&r(Some(3), Some(8), Some(2)), 10), Some(vec![3, 5, 7]));
        assert_eq!(range_indices(&r(Some(2), None, None), 4), Some(vec![2, 3]));
        assert_eq!(range_indices(&r(Some(5), Some(100), None), 7), Some(vec![5, 6]));
        assert_eq!(range_indices(&r(Some(9), None, None), 3), Some(vec![]));
        assert_eq!(range_indices(&r(Some(-2), None, None), 5), Some(vec![3, 4]));
    }

    #[test]
    fn negative_step_walks_backwards() {
        assert_eq!(range_indices(&r(None, None, Some(-1)), 4), Some(vec![3, 2, 1, 0]));
        assert_eq!(range_indices(&r(Some(5), Some(1), Some(-2)), 8), Some(vec![5, 3]));
        assert_eq!(range_indices(&r(Some(100), None, Some(-3)), 5), Some(vec![4, 1]));
    }

    #[test]
    fn huge_steps_stop_after_one_element() {
        assert_eq!(range_indices(&r(Some(1), None, Some(i64::MAX)), 5), Some(vec![1]));
        assert_eq!(range_indices(&r(Some(-1), None, Some(i64::MIN)), 5), Some(vec![4]));
        assert_eq!(
            range_indices(&r(Some(i64::MAX), Some(i64::MIN), Some(-1)), 3),
            Some(vec![2, 1, 0])
        );
    }

    #[test]
    fn zero_step_is_rejected() {
        assert_eq!(range_indices(&r(None, None, Some(0)), 4), None);
    }

    #[test]
    fn negative_index_wraps_once() {
        assert_eq!(resolve_index(-1, 5, 0), Ok(4));
        assert!(resolve_index(-6, 5, 0).is_err());
        assert!(resolve_index(5, 5, 0).is_err());
    }

    #[test]
    fn select_collapses_fixed_axes() {
        let a = ArrayD::from_shape_fn(IxDyn(&[2, 3, 4]), |i| i[0] * 100 + i[1] * 10 + i[2]);
        let v = select(&a, parse_dims(&["1", ":", "1:4:2"]).entries()).unwrap();
        assert_eq!(v.shape(), &[3, 2]);
        assert_eq!(v[IxDyn(&[0, 0])], 101);
        assert_eq!(v[IxDyn(&[2, 1])], 123);
    }

    #[test]
    fn short_spec_keeps_trailing_axes() {
        let a = ArrayD::from_shape_fn(IxDyn(&[2, 3]), |i| i[0] * 10 + i[1]);
        let v = select(&a, parse_dims(&["1"]).entries()).unwrap();
        assert_eq!(v.shape(), &[3]);
        assert_eq!(v[IxDyn(&[2])], 12);
    }

    #[test]
    fn all_fixed_gives_scalar() {
        let a = ArrayD::from_shape_fn(IxDyn(&[2, 3]), |i| i[0] * 10 + i[1]);
        let v = select(&a, parse_dims(&["1", "2"]).entries()).unwrap();
        assert_eq!(v.ndim(), 0);
        assert_eq!(v[IxDyn(&[])], 12);
    }

    #[test]
    fn too_many_entries_is_an_error() {
        let a = ArrayD::from_elem(IxDyn(&[2]), 0u8);
        let err = select(&a, parse_dims(&[":", ":"]).entries()).unwrap_err();
        assert_eq!(err, SliceError::TooManyIndices { given: 2, ndim: 1 });
    }
}
