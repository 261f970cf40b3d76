use itertools::Itertools;
use ndarray::{Array, Array1, ArrayD, IxDyn};

use crate::error::Result;

/// Indexing convention of the grids returned by [`meshgrid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indexing {
    /// Cartesian indexing, the first two axes are swapped.
    Xy,
    /// Matrix indexing, axis `i` of every grid follows input `i`.
    Ij,
}

/// Build coordinate grids from one-dimensional coordinate vectors.
///
/// With [`Indexing::Ij`], iterating any of the returned grids in logical order visits the
/// coordinates with the first input varying slowest and the last input varying fastest.
pub fn meshgrid<T>(xi: &[Array1<T>], indexing: Indexing) -> Result<Vec<ArrayD<T>>>
where
    T: Copy,
{
    let ndim = xi.len();
    let product = xi.iter().map(|x| x.iter()).multi_cartesian_product();

    let mut grids: Vec<ArrayD<T>> = Vec::with_capacity(ndim);

    for dim_index in 0..ndim {
        // flat vector with the repeated pattern for this dimension
        let values: Vec<T> = product.clone().map(|p| *p[dim_index]).collect();

        let grid_shape: Vec<usize> = xi.iter().map(|x| x.len()).collect();

        let grid = Array::from_shape_vec(IxDyn(&grid_shape), values)?;
        grids.push(grid);
    }

    if indexing == Indexing::Xy && ndim > 1 {
        for grid in &mut grids {
            grid.swap_axes(0, 1);
        }
    }

    Ok(grids)
}
