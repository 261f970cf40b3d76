//! Pairwise IoU for box sets with sizes that are fixed up front.
//!
//! This is the form used inside a larger batched computation: every pair is laid out as one row
//! of two tiled `(N1 * N2, 4)` arrays and the IoU is evaluated column-wise, without any
//! data-dependent branching.
//!
//! It deliberately follows a different convention than [`crate::iou`]:
//!
//! - widths and heights count pixels inclusively, `x2 - x1 + 1`,
//! - negative overlaps are clamped to zero with a ReLU,
//! - there is no guard against a zero union, which yields `NaN`.

use ndarray::{Array1, Array2, ArrayBase, ArrayView1, Data, Ix2, Zip};

use crate::error::{Error, Result};

fn check_set<S>(set: &ArrayBase<S, Ix2>, name: &'static str, expected: usize) -> Result<()>
where
    S: Data<Elem = f32>,
{
    if set.ncols() != 4 {
        return Err(Error::BoxWidth { len: set.ncols() });
    }

    if set.nrows() != expected {
        return Err(Error::BatchSize {
            set: name,
            expected,
            actual: set.nrows(),
        });
    }

    Ok(())
}

fn maximum(a: &Array1<f32>, b: &Array1<f32>) -> Array1<f32> {
    Zip::from(a).and(b).map_collect(|a, b| a.max(*b))
}

fn minimum(a: &Array1<f32>, b: &Array1<f32>) -> Array1<f32> {
    Zip::from(a).and(b).map_collect(|a, b| a.min(*b))
}

fn relu(x: Array1<f32>) -> Array1<f32> {
    x.mapv_into(|v| v.max(0.0))
}

/// Lower and upper bounds of the boxes along one axis, from their centers and extents.
fn bounds(center: ArrayView1<'_, f32>, extent: ArrayView1<'_, f32>) -> (Array1<f32>, Array1<f32>) {
    let half = &extent * 0.5;
    (&center - &half, &center + &half)
}

/// Pairwise IoU between a set of `N1` and a set of `N2` boxes in center form.
///
/// The set sizes are part of the type, a set of any other size is a configuration error.
///
/// ```
/// use ndarray::array;
/// use rpn::batched::BatchedIou;
///
/// let anchors = array![[5.0, 5.0, 10.0, 10.0], [50.0, 50.0, 10.0, 10.0]];
/// let truths = array![[5.0, 5.0, 10.0, 10.0]];
///
/// let iou = BatchedIou::<2, 1>.compute(&anchors, &truths).unwrap();
/// assert_eq!(iou, array![[1.0], [0.0]]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchedIou<const N1: usize, const N2: usize>;

impl<const N1: usize, const N2: usize> BatchedIou<N1, N2> {
    /// Compute the `(N1, N2)` IoU matrix.
    pub fn compute<S1, S2>(
        &self,
        set1: &ArrayBase<S1, Ix2>,
        set2: &ArrayBase<S2, Ix2>,
    ) -> Result<Array2<f32>>
    where
        S1: Data<Elem = f32>,
        S2: Data<Elem = f32>,
    {
        check_set(set1, "set1", N1)?;
        check_set(set2, "set2", N2)?;

        // pair `i * N2 + j` holds box `i` of set1 and box `j` of set2
        let bb1 = Array2::from_shape_fn((N1 * N2, 4), |(row, col)| set1[[row / N2, col]]);
        let bb2 = Array2::from_shape_fn((N1 * N2, 4), |(row, col)| set2[[row % N2, col]]);

        let (x1_min, x1_max) = bounds(bb1.column(0), bb1.column(2));
        let (y1_min, y1_max) = bounds(bb1.column(1), bb1.column(3));
        let (x2_min, x2_max) = bounds(bb2.column(0), bb2.column(2));
        let (y2_min, y2_max) = bounds(bb2.column(1), bb2.column(3));

        let x1 = maximum(&x1_min, &x2_min);
        let y1 = maximum(&y1_min, &y2_min);
        let x2 = minimum(&x1_max, &x2_max);
        let y2 = minimum(&y1_max, &y2_max);

        let w = relu(x2 - &x1 + 1.0);
        let h = relu(y2 - &y1 + 1.0);

        let intersection = w * h;
        let area1 = (&bb1.column(3) + 1.0) * (&bb1.column(2) + 1.0);
        let area2 = (&bb2.column(3) + 1.0) * (&bb2.column(2) + 1.0);

        let iou = &intersection / &(area1 + area2 - &intersection);

        tracing::trace!(n1 = N1, n2 = N2, "computed batched iou");

        Ok(iou.into_shape_with_order((N1, N2))?)
    }
}

/// Compute the batched IoU of `N1` and `N2` boxes, see [`BatchedIou`].
pub fn iou_batched<const N1: usize, const N2: usize, S1, S2>(
    set1: &ArrayBase<S1, Ix2>,
    set2: &ArrayBase<S2, Ix2>,
) -> Result<Array2<f32>>
where
    S1: Data<Elem = f32>,
    S2: Data<Elem = f32>,
{
    BatchedIou::<N1, N2>.compute(set1, set2)
}
