//! See [`Error`].

use miette::Diagnostic;
use thiserror::Error;

/// Error types for this crate.
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Box input must be a single box (1-D) or a box set (2-D), got {ndim} dimensions")]
    #[diagnostic(code(rpn::box_dimension))]
    BoxDimension { ndim: usize },

    #[error("Boxes must have exactly 4 coordinates, got {len}")]
    #[diagnostic(
        code(rpn::box_width),
        help("boxes are (cx, cy, w, h) in center form or (x_min, y_min, x_max, y_max) in corner form")
    )]
    BoxWidth { len: usize },

    #[error("Batched IoU was declared for {expected} boxes in {set}, got {actual}")]
    #[diagnostic(code(rpn::batch_size))]
    BatchSize {
        set: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Failed to reshape array")]
    Shape(#[from] ndarray::ShapeError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to parse anchor configuration")]
    Deserialize(#[from] toml::de::Error),

    #[error("Invalid anchor configuration: {0}")]
    #[diagnostic(code(rpn::invalid_config))]
    InvalidConfig(String),
}

/// Type alias for [`Result<T, Error>`].
pub type Result<T> = std::result::Result<T, Error>;
