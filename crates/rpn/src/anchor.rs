use itertools::Itertools;
use ndarray::{Array1, Array2, ArrayBase, ArrayView2, Data, Ix2};

use crate::{
    bbox::{Bbox, Cxcywh},
    config::AnchorConfig,
    convert::{as_box_set, to_min_max_in_place},
    error::Result,
    meshgrid::{meshgrid, Indexing},
};

/// Generate the anchor template for a single feature map position.
///
/// For each scale and ratio, there will be an anchor with an area of `(scale * base_size)^2`,
/// centered at `(base_size / 2, base_size / 2)` (truncated to an integer), with a width to
/// height ratio of `ratio`. The coordinates are rounded to the nearest integer, ties to even.
///
/// The anchors are returned in center form, ordered with the scales as the outer dimension and
/// the ratios as the inner dimension: anchor `k` has scale `scales[k / ratios.len()]` and ratio
/// `ratios[k % ratios.len()]`.
#[must_use]
pub fn generate_anchors(base_size: f32, ratios: &[f32], scales: &[f32]) -> Array2<f32> {
    let center = (base_size * 0.5).trunc();

    let mut anchors = Array2::zeros((scales.len() * ratios.len(), 4));

    let template = scales
        .iter()
        .cartesian_product(ratios)
        .map(|(scale, ratio)| {
            let side = base_size * scale;
            let sqrt_ratio = ratio.sqrt();

            Bbox::cxcywh(
                center,
                center,
                (side * sqrt_ratio).round_ties_even(),
                (side * (1.0 / sqrt_ratio)).round_ties_even(),
            )
        });

    for (row, anchor) in anchors.rows_mut().into_iter().zip(template) {
        anchor.write_row(row);
    }

    tracing::debug!(
        base_size,
        ?ratios,
        ?scales,
        num_anchors = anchors.nrows(),
        "generated anchor template"
    );

    anchors
}

/// Repeat an anchor template over a `tiles_x` by `tiles_y` grid.
///
/// The template must be in center form. For tile `(i, j)`, every anchor center is moved by
/// `(i * stride_x, j * stride_y)`. Negative strides pad the anchors in the negative direction,
/// no bounds checking is performed.
///
/// The result holds `template.nrows() * tiles_x * tiles_y` anchors. Anchor `k` of tile `(i, j)`
/// is found at row `(i * tiles_y + j) * template.nrows() + k`, so the tile-x index varies
/// slowest and the anchor index fastest.
pub fn tile_anchors<S>(
    template: &ArrayBase<S, Ix2>,
    tiles_x: usize,
    tiles_y: usize,
    stride_x: f32,
    stride_y: f32,
) -> Result<Array2<f32>>
where
    S: Data<Elem = f32>,
{
    let template = as_box_set(template)?;
    let num_anchors = template.nrows();

    let offsets_x = Array1::from_iter((0..tiles_x).map(|i| i as f32 * stride_x));
    let offsets_y = Array1::from_iter((0..tiles_y).map(|j| j as f32 * stride_y));

    let grids = meshgrid(&[offsets_x, offsets_y], Indexing::Ij)?;
    let shifts = grids[0]
        .iter()
        .copied()
        .zip(grids[1].iter().copied())
        .collect_vec();

    let values = shifts
        .iter()
        .cartesian_product(0..num_anchors)
        .flat_map(|(&(dx, dy), k)| {
            Bbox::<Cxcywh>::from_row(template.row(k))
                .shifted(dx, dy)
                .to_array()
        })
        .collect_vec();

    let tiled = Array2::from_shape_vec((shifts.len() * num_anchors, 4), values)?;

    tracing::debug!(
        tiles_x,
        tiles_y,
        stride_x,
        stride_y,
        num_anchors = tiled.nrows(),
        "tiled anchor template"
    );

    Ok(tiled)
}

/// Produces the anchors described by an [`AnchorConfig`].
///
/// The template is generated once when the generator is created, the tiled set is derived from
/// it on request.
#[derive(Debug, Clone)]
pub struct AnchorGenerator {
    config: AnchorConfig,
    template: Array2<f32>,
}

impl AnchorGenerator {
    /// Validate the configuration and generate its anchor template.
    pub fn new(config: AnchorConfig) -> Result<Self> {
        config.validate()?;
        let template = generate_anchors(config.base_size, &config.ratios, &config.scales);

        Ok(Self { config, template })
    }

    #[must_use]
    pub fn config(&self) -> &AnchorConfig {
        &self.config
    }

    /// The anchor template, in center form.
    #[must_use]
    pub fn template(&self) -> ArrayView2<'_, f32> {
        self.template.view()
    }

    /// The template tiled over the configured grid, in center form.
    pub fn tiled(&self) -> Result<Array2<f32>> {
        let grid = &self.config.grid;
        tile_anchors(
            &self.template,
            grid.tiles_x,
            grid.tiles_y,
            grid.stride_x,
            grid.stride_y,
        )
    }

    /// The template tiled over the configured grid, in corner form.
    pub fn tiled_corners(&self) -> Result<Array2<f32>> {
        let mut tiled = self.tiled()?;
        to_min_max_in_place(&mut tiled)?;
        Ok(tiled)
    }

    /// The scale and ratio used for anchor `k` of the template.
    #[must_use]
    pub fn template_params(&self, k: usize) -> Option<(f32, f32)> {
        let num_ratios = self.config.ratios.len();
        if k >= self.template.nrows() {
            return None;
        }

        Some((self.config.scales[k / num_ratios], self.config.ratios[k % num_ratios]))
    }

    /// Row of anchor `k` of tile `(tile_x, tile_y)` in the tiled set.
    #[must_use]
    pub fn anchor_index(&self, tile_x: usize, tile_y: usize, k: usize) -> Option<usize> {
        let grid = &self.config.grid;
        if tile_x >= grid.tiles_x || tile_y >= grid.tiles_y || k >= self.template.nrows() {
            return None;
        }

        Some((tile_x * grid.tiles_y + tile_y) * self.template.nrows() + k)
    }

    /// The `(tile_x, tile_y, k)` position of a row of the tiled set.
    #[must_use]
    pub fn anchor_position(&self, index: usize) -> Option<(usize, usize, usize)> {
        let num_anchors = self.template.nrows();
        if index >= self.config.num_tiled_anchors() {
            return None;
        }

        let tile = index / num_anchors;
        let tiles_y = self.config.grid.tiles_y;

        Some((tile / tiles_y, tile % tiles_y, index % num_anchors))
    }
}
