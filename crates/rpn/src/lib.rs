//! Anchor generation and Intersection over Union (IoU) utilities for region proposal networks.
//!
//! Boxes are stored as rows of `(n, 4)` [`ndarray`] arrays, either in center form
//! `(cx, cy, w, h)` or in corner form `(x_min, y_min, x_max, y_max)`.
//!
//! ## Example
//! ```
//! use rpn::prelude::*;
//!
//! let generator = AnchorGenerator::new(AnchorConfig::default()).unwrap();
//! let anchors = generator.tiled().unwrap();
//! assert_eq!(anchors.nrows(), 9 * 32 * 32);
//!
//! let truths = ndarray::array![[100.0, 100.0, 181.0, 362.0]];
//! let iou = iou_matrix_center_form(&anchors, &truths).unwrap();
//! assert_eq!(iou.dim(), (anchors.nrows(), 1));
//! ```

pub mod anchor;
pub mod batched;
pub mod bbox;
pub mod config;
pub mod convert;
pub mod error;
pub mod iou;
pub mod meshgrid;

#[allow(missing_docs)]
pub mod prelude {
    pub use crate::anchor::{generate_anchors, tile_anchors, AnchorGenerator};
    pub use crate::batched::{iou_batched, BatchedIou};
    pub use crate::bbox::{Bbox, ConvertBbox, Cxcywh, Xyxy};
    pub use crate::config::{AnchorConfig, GridConfig};
    pub use crate::convert::{
        as_box_set, convert, to_center_form, to_center_form_in_place, to_min_max,
        to_min_max_in_place, BoxFormat,
    };
    pub use crate::error::{Error, Result};
    pub use crate::iou::{
        iou_center_form, iou_corner_form, iou_matrix_center_form, iou_matrix_corner_form,
    };
}
