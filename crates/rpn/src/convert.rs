//! Conversions of box sets between center form and corner form.
//!
//! A box set is an `(n, 4)` array with one box per row. Every conversion comes in two flavours:
//! one that leaves the input untouched and returns a freshly allocated set, and an `_in_place`
//! variant that rewrites a buffer owned by the caller and hands it back.

use ndarray::{Array2, ArrayBase, ArrayView2, Axis, Data, DataMut, Dimension, Ix1, Ix2};
use serde::{Deserialize, Serialize};

use crate::{
    bbox::{Bbox, ConvertBbox, Cxcywh, Xyxy},
    error::{Error, Result},
};

/// The coordinate convention used by a box set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoxFormat {
    /// `(x_center, y_center, width, height)`
    Center,
    /// `(x_min, y_min, x_max, y_max)`
    Corner,
}

fn check_width(len: usize) -> Result<()> {
    if len == 4 {
        Ok(())
    } else {
        Err(Error::BoxWidth { len })
    }
}

/// View a single box or a box set as a box set.
///
/// A single box (1-D, length 4) becomes a set of size one. Any other dimensionality, or a
/// trailing dimension other than 4, is rejected.
pub fn as_box_set<S, D>(boxes: &ArrayBase<S, D>) -> Result<ArrayView2<'_, f32>>
where
    S: Data<Elem = f32>,
    D: Dimension,
{
    let view = boxes.view().into_dyn();

    match view.ndim() {
        1 => {
            let single = view.into_dimensionality::<Ix1>()?;
            check_width(single.len())?;
            Ok(single.insert_axis(Axis(0)))
        }
        2 => {
            let set = view.into_dimensionality::<Ix2>()?;
            check_width(set.ncols())?;
            Ok(set)
        }
        ndim => Err(Error::BoxDimension { ndim }),
    }
}

/// Convert every box from center form to corner form, rewriting `boxes`.
pub fn to_min_max_in_place<S>(boxes: &mut ArrayBase<S, Ix2>) -> Result<&mut ArrayBase<S, Ix2>>
where
    S: DataMut<Elem = f32>,
{
    check_width(boxes.ncols())?;

    for row in boxes.rows_mut() {
        let corner: Bbox<Xyxy> = Bbox::<Cxcywh>::from_row(row.view()).convert();
        corner.write_row(row);
    }

    Ok(boxes)
}

/// Convert every box from center form to corner form, returning a new box set.
pub fn to_min_max<S>(boxes: &ArrayBase<S, Ix2>) -> Result<Array2<f32>>
where
    S: Data<Elem = f32>,
{
    let mut converted = boxes.to_owned();
    to_min_max_in_place(&mut converted)?;
    Ok(converted)
}

/// Convert every box from corner form to center form, rewriting `boxes`.
pub fn to_center_form_in_place<S>(
    boxes: &mut ArrayBase<S, Ix2>,
) -> Result<&mut ArrayBase<S, Ix2>>
where
    S: DataMut<Elem = f32>,
{
    check_width(boxes.ncols())?;

    for row in boxes.rows_mut() {
        let center: Bbox<Cxcywh> = Bbox::<Xyxy>::from_row(row.view()).convert();
        center.write_row(row);
    }

    Ok(boxes)
}

/// Convert every box from corner form to center form, returning a new box set.
pub fn to_center_form<S>(boxes: &ArrayBase<S, Ix2>) -> Result<Array2<f32>>
where
    S: Data<Elem = f32>,
{
    let mut converted = boxes.to_owned();
    to_center_form_in_place(&mut converted)?;
    Ok(converted)
}

/// Convert a box set from one format to another.
///
/// Converting to the format the boxes are already in returns an unchanged copy.
pub fn convert<S>(boxes: &ArrayBase<S, Ix2>, from: BoxFormat, to: BoxFormat) -> Result<Array2<f32>>
where
    S: Data<Elem = f32>,
{
    match (from, to) {
        (BoxFormat::Center, BoxFormat::Corner) => to_min_max(boxes),
        (BoxFormat::Corner, BoxFormat::Center) => to_center_form(boxes),
        _ => {
            check_width(boxes.ncols())?;
            Ok(boxes.to_owned())
        }
    }
}

#[cfg(test)]
mod tests {
    use ndarray::{array, Array3};

    use super::*;

    #[test]
    fn min_max_copy_leaves_input_untouched() {
        let boxes = array![[8.0, 8.0, 16.0, 16.0], [0.0, 0.0, 4.0, 2.0]];
        let converted = to_min_max(&boxes).unwrap();

        assert_eq!(converted, array![[0.0, 0.0, 16.0, 16.0], [-2.0, -1.0, 2.0, 1.0]]);
        assert_eq!(boxes, array![[8.0, 8.0, 16.0, 16.0], [0.0, 0.0, 4.0, 2.0]]);
    }

    #[test]
    fn min_max_in_place_rewrites_buffer() {
        let mut boxes = array![[10.0, 20.0, 4.0, 8.0]];
        let converted = to_min_max_in_place(&mut boxes).unwrap();
        assert_eq!(*converted, array![[8.0, 16.0, 12.0, 24.0]]);

        assert_eq!(boxes, array![[8.0, 16.0, 12.0, 24.0]]);
    }

    #[test]
    fn center_form() {
        let mut boxes = array![[0.0, 0.0, 10.0, 4.0], [-4.0, 2.0, 4.0, 6.0]];
        let copy = to_center_form(&boxes).unwrap();
        to_center_form_in_place(&mut boxes).unwrap();

        assert_eq!(copy, array![[5.0, 2.0, 10.0, 4.0], [0.0, 4.0, 8.0, 4.0]]);
        assert_eq!(boxes, copy);
    }

    #[test]
    fn in_place_on_a_view() {
        let mut boxes = array![[1.0, 1.0, 2.0, 2.0], [5.0, 5.0, 2.0, 2.0]];
        to_min_max_in_place(&mut boxes.slice_mut(ndarray::s![1.., ..])).unwrap();

        assert_eq!(boxes, array![[1.0, 1.0, 2.0, 2.0], [4.0, 4.0, 6.0, 6.0]]);
    }

    #[test]
    fn convert_same_format_is_a_copy() {
        let boxes = array![[1.0, 2.0, 3.0, 4.0]];

        assert_eq!(
            convert(&boxes, BoxFormat::Corner, BoxFormat::Corner).unwrap(),
            boxes
        );
        assert_eq!(
            convert(&boxes, BoxFormat::Center, BoxFormat::Corner).unwrap(),
            array![[-0.5, 0.0, 2.5, 4.0]]
        );
    }

    #[test]
    fn rejects_wrong_width() {
        let boxes = array![[1.0, 2.0, 3.0]];

        assert!(matches!(
            to_min_max(&boxes),
            Err(Error::BoxWidth { len: 3 })
        ));
        assert!(matches!(
            convert(&boxes, BoxFormat::Center, BoxFormat::Center),
            Err(Error::BoxWidth { len: 3 })
        ));
    }

    #[test]
    fn box_set_from_single_box() {
        let single = array![1.0, 2.0, 3.0, 4.0];
        let set = as_box_set(&single).unwrap();

        assert_eq!(set.dim(), (1, 4));
        assert_eq!(set.row(0), single);
    }

    #[test]
    fn box_set_rejects_bad_shapes() {
        let cube = Array3::<f32>::zeros((2, 2, 4));
        let short = array![1.0, 2.0];

        assert!(matches!(
            as_box_set(&cube),
            Err(Error::BoxDimension { ndim: 3 })
        ));
        assert!(matches!(
            as_box_set(&short),
            Err(Error::BoxWidth { len: 2 })
        ));
    }
}
