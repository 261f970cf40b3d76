//! Pairwise Intersection over Union (IoU) between two sets of boxes.
//!
//! The `iou_matrix_*` functions take box sets and always return an `(n1, n2)` matrix. The
//! [`iou_center_form`] and [`iou_corner_form`] functions also accept single boxes and squeeze
//! the result, so two single boxes produce a 0-dimensional array.

use ndarray::{Array2, ArrayBase, ArrayD, ArrayView2, Axis, Data, Dimension};

use crate::{
    bbox::{Bbox, ConvertBbox, Cxcywh, Xyxy},
    convert::as_box_set,
    error::Result,
};

/// IoU of two boxes given their corners and areas.
///
/// Pairs that do not overlap on an axis, and pairs whose union area is zero, have an IoU of `0.0`.
fn pair_iou(a: Bbox<Xyxy>, area_a: f32, b: Bbox<Xyxy>, area_b: f32) -> f32 {
    let (w, h) = a.overlap(&b);
    if w <= 0.0 || h <= 0.0 {
        return 0.0;
    }

    let intersection = w * h;
    let union = area_a + area_b - intersection;
    if union == 0.0 {
        return 0.0;
    }

    intersection / union
}

/// Read every row of a box set as corners and an area.
fn prepare<T, F>(set: ArrayView2<'_, f32>, corners_and_area: &F) -> Vec<(Bbox<Xyxy>, f32)>
where
    F: Fn(Bbox<T>) -> (Bbox<Xyxy>, f32),
{
    set.rows()
        .into_iter()
        .map(|row| corners_and_area(Bbox::from_row(row)))
        .collect()
}

fn pairwise<T, F>(
    set1: ArrayView2<'_, f32>,
    set2: ArrayView2<'_, f32>,
    corners_and_area: F,
) -> Array2<f32>
where
    F: Fn(Bbox<T>) -> (Bbox<Xyxy>, f32),
{
    let boxes1 = prepare(set1, &corners_and_area);
    let boxes2 = prepare(set2, &corners_and_area);

    tracing::trace!(n1 = boxes1.len(), n2 = boxes2.len(), "computing pairwise iou");

    Array2::from_shape_fn((boxes1.len(), boxes2.len()), |(i, j)| {
        let (a, area_a) = boxes1[i];
        let (b, area_b) = boxes2[j];
        pair_iou(a, area_a, b, area_b)
    })
}

/// Remove every axis of length one.
fn squeeze(matrix: Array2<f32>) -> ArrayD<f32> {
    let mut squeezed = matrix.into_dyn();
    for axis in (0..squeezed.ndim()).rev() {
        if squeezed.len_of(Axis(axis)) == 1 {
            squeezed = squeezed.index_axis_move(Axis(axis), 0);
        }
    }

    squeezed
}

/// IoU matrix of two box sets in center form.
///
/// Entry `(i, j)` holds the IoU of box `i` of `set1` with box `j` of `set2`.
pub fn iou_matrix_center_form<S1, S2, D1, D2>(
    set1: &ArrayBase<S1, D1>,
    set2: &ArrayBase<S2, D2>,
) -> Result<Array2<f32>>
where
    S1: Data<Elem = f32>,
    S2: Data<Elem = f32>,
    D1: Dimension,
    D2: Dimension,
{
    // the area comes from the width and height directly, not from the converted corners
    let corners_and_area =
        |center: Bbox<Cxcywh>| (ConvertBbox::<Xyxy>::convert(&center), center.area());

    Ok(pairwise(
        as_box_set(set1)?,
        as_box_set(set2)?,
        corners_and_area,
    ))
}

/// IoU matrix of two box sets in corner form.
///
/// Entry `(i, j)` holds the IoU of box `i` of `set1` with box `j` of `set2`.
pub fn iou_matrix_corner_form<S1, S2, D1, D2>(
    set1: &ArrayBase<S1, D1>,
    set2: &ArrayBase<S2, D2>,
) -> Result<Array2<f32>>
where
    S1: Data<Elem = f32>,
    S2: Data<Elem = f32>,
    D1: Dimension,
    D2: Dimension,
{
    Ok(pairwise(
        as_box_set(set1)?,
        as_box_set(set2)?,
        |corners: Bbox<Xyxy>| (corners, corners.area()),
    ))
}

/// Compute the IoU of every box in `set1` with every box in `set2`, both in center form.
///
/// Either argument may be a single box `(cx, cy, w, h)` or a box set of shape `(n, 4)`. The
/// `(n1, n2)` result is squeezed: axes of length one are dropped, so two single boxes produce
/// a 0-dimensional array holding the IoU.
///
/// ```
/// use ndarray::array;
///
/// let iou = rpn::iou::iou_center_form(
///     &array![5.0, 5.0, 10.0, 10.0],
///     &array![10.0, 10.0, 10.0, 10.0],
/// )
/// .unwrap();
///
/// assert_eq!(iou.ndim(), 0);
/// assert_eq!(iou.first(), Some(&(25.0 / 175.0)));
/// ```
pub fn iou_center_form<S1, S2, D1, D2>(
    set1: &ArrayBase<S1, D1>,
    set2: &ArrayBase<S2, D2>,
) -> Result<ArrayD<f32>>
where
    S1: Data<Elem = f32>,
    S2: Data<Elem = f32>,
    D1: Dimension,
    D2: Dimension,
{
    iou_matrix_center_form(set1, set2).map(squeeze)
}

/// Compute the IoU of every box in `set1` with every box in `set2`, both in corner form.
///
/// Same contract as [`iou_center_form`], with boxes given as `(x_min, y_min, x_max, y_max)`.
pub fn iou_corner_form<S1, S2, D1, D2>(
    set1: &ArrayBase<S1, D1>,
    set2: &ArrayBase<S2, D2>,
) -> Result<ArrayD<f32>>
where
    S1: Data<Elem = f32>,
    S2: Data<Elem = f32>,
    D1: Dimension,
    D2: Dimension,
{
    iou_matrix_corner_form(set1, set2).map(squeeze)
}
