use std::marker::PhantomData;

use ndarray::{ArrayView1, ArrayViewMut1};

/// A type-safe bounding box.
///
/// It is a wrapper around a tuple of four `f32` values representing the coordinates of the bounding box.
/// The type parameter `T` is used to specify the format of the bounding box, and is used to enforce type safety.
///
/// # Conversion
///
/// The bounding box can be converted between different formats using the [`ConvertBbox`] trait.
///
/// ```
/// use rpn::bbox::*;
///
/// let cxcywh = Bbox::cxcywh(5.0, 5.0, 10.0, 10.0);
/// let xyxy: Bbox<Xyxy> = cxcywh.convert();
///
/// assert_eq!(xyxy.inner, (0.0, 0.0, 10.0, 10.0));
/// ```
///
/// # Formats
///
/// The following formats are supported:
///
/// - [`Xyxy`] (x_min, y_min, x_max, y_max), also called corner form
/// - [`Cxcywh`] (center_x, center_y, width, height), also called center form
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bbox<T> {
    pub inner: (f32, f32, f32, f32),
    _marker: PhantomData<T>,
}

impl<T> Bbox<T> {
    fn new(bbox: (f32, f32, f32, f32)) -> Self {
        Bbox {
            inner: bbox,
            _marker: PhantomData,
        }
    }

    /// Read a bounding box from a row of a box set.
    ///
    /// The row must hold at least four values; box sets are validated before rows are read.
    pub(crate) fn from_row(row: ArrayView1<'_, f32>) -> Self {
        Bbox::new((row[0], row[1], row[2], row[3]))
    }

    /// Write the coordinates of this bounding box into a row of a box set.
    pub(crate) fn write_row(&self, mut row: ArrayViewMut1<'_, f32>) {
        let (a, b, c, d) = self.inner;
        row[0] = a;
        row[1] = b;
        row[2] = c;
        row[3] = d;
    }

    /// The coordinates as an array, in the order of the format.
    #[must_use]
    pub fn to_array(&self) -> [f32; 4] {
        let (a, b, c, d) = self.inner;
        [a, b, c, d]
    }
}

impl<T> From<Bbox<T>> for (f32, f32, f32, f32) {
    fn from(bbox: Bbox<T>) -> Self {
        bbox.inner
    }
}

/// Trait for converting a bounding box to a different representation.
pub trait ConvertBbox<T> {
    fn convert(&self) -> Bbox<T>;
}

/// Marker type for bounding boxes with coordinates of the top-left and bottom-right corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Xyxy;

impl Bbox<Xyxy> {
    /// Create a bounding box from the coordinates of the top-left and bottom-right corners.
    #[must_use]
    pub fn xyxy(x1: f32, y1: f32, x2: f32, y2: f32) -> Bbox<Xyxy> {
        Bbox::new((x1, y1, x2, y2))
    }

    /// Compute the area of the bounding box.
    ///
    /// Boxes with `x_max < x_min` or `y_max < y_min` yield a negative area.
    #[must_use]
    pub fn area(&self) -> f32 {
        let (x1, y1, x2, y2) = self.inner;
        (x2 - x1) * (y2 - y1)
    }

    /// Compute the extent of the overlap between two bounding boxes along each axis.
    ///
    /// The returned width or height is zero or negative when the boxes do not overlap on that axis.
    #[must_use]
    pub fn overlap(&self, other: &Bbox<Xyxy>) -> (f32, f32) {
        let (x1, y1, x2, y2) = self.inner;
        let (x3, y3, x4, y4) = other.inner;

        let width = x2.min(x4) - x1.max(x3);
        let height = y2.min(y4) - y1.max(y3);

        (width, height)
    }
}

impl ConvertBbox<Xyxy> for Bbox<Xyxy> {
    fn convert(&self) -> Bbox<Xyxy> {
        *self
    }
}

impl ConvertBbox<Cxcywh> for Bbox<Xyxy> {
    fn convert(&self) -> Bbox<Cxcywh> {
        let (x1, y1, x2, y2) = self.inner;
        let w = x2 - x1;
        let h = y2 - y1;
        Bbox::new((x1 + 0.5 * w, y1 + 0.5 * h, w, h))
    }
}

/// Marker type for bounding boxes with coordinates of the center and the width and height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cxcywh;

impl Bbox<Cxcywh> {
    /// Create a bounding box from the coordinates of the center and the width and height.
    #[must_use]
    pub fn cxcywh(cx: f32, cy: f32, w: f32, h: f32) -> Bbox<Cxcywh> {
        Bbox::new((cx, cy, w, h))
    }

    /// Compute the area of the bounding box.
    #[must_use]
    pub fn area(&self) -> f32 {
        let (_, _, w, h) = self.inner;
        w * h
    }

    /// Move the center of the bounding box by the given offset.
    #[must_use]
    pub fn shifted(&self, dx: f32, dy: f32) -> Bbox<Cxcywh> {
        let (cx, cy, w, h) = self.inner;
        Bbox::new((cx + dx, cy + dy, w, h))
    }
}

impl ConvertBbox<Xyxy> for Bbox<Cxcywh> {
    // the width and height are consumed before the corners are formed,
    // so x_max is derived from x_min rather than from the center
    fn convert(&self) -> Bbox<Xyxy> {
        let (cx, cy, w, h) = self.inner;
        let x1 = cx - 0.5 * w;
        let y1 = cy - 0.5 * h;
        Bbox::new((x1, y1, x1 + w, y1 + h))
    }
}

impl ConvertBbox<Cxcywh> for Bbox<Cxcywh> {
    fn convert(&self) -> Bbox<Cxcywh> {
        *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cxcywh_to_xyxy() {
        let bbox = Bbox::cxcywh(8.0, 8.0, 16.0, 4.0);
        let xyxy: Bbox<Xyxy> = bbox.convert();

        assert_eq!(xyxy.inner, (0.0, 6.0, 16.0, 10.0));
    }

    #[test]
    fn xyxy_to_cxcywh() {
        let bbox = Bbox::xyxy(-2.0, 4.0, 6.0, 10.0);
        let cxcywh: Bbox<Cxcywh> = bbox.convert();

        assert_eq!(cxcywh.inner, (2.0, 7.0, 8.0, 6.0));
    }

    #[test]
    fn area_matches_across_formats() {
        let bbox = Bbox::cxcywh(3.0, 3.0, 4.0, 5.0);
        let xyxy: Bbox<Xyxy> = bbox.convert();

        assert_eq!(bbox.area(), 20.0);
        assert_eq!(xyxy.area(), 20.0);
    }

    #[test]
    fn overlap() {
        let bbox1 = Bbox::xyxy(0.0, 0.0, 10.0, 10.0);
        let bbox2 = Bbox::xyxy(5.0, 5.0, 15.0, 15.0);
        let bbox3 = Bbox::xyxy(20.0, 0.0, 30.0, 10.0);

        assert_eq!(bbox1.overlap(&bbox2), (5.0, 5.0));
        assert_eq!(bbox1.overlap(&bbox3), (-10.0, 10.0));
    }

    #[test]
    fn shifted() {
        let bbox = Bbox::cxcywh(8.0, 8.0, 16.0, 16.0).shifted(-16.0, 32.0);

        assert_eq!(bbox.to_array(), [-8.0, 40.0, 16.0, 16.0]);
    }
}
