use ndarray::{array, Axis};
use rpn::prelude::*;

fn main() -> Result<()> {
    let generator = AnchorGenerator::new(AnchorConfig::default())?;
    let anchors = generator.tiled()?;

    let truths = array![[120.0, 96.0, 200.0, 300.0], [400.0, 380.0, 500.0, 260.0]];
    let iou = iou_matrix_center_form(&anchors, &truths)?;

    for (truth, column) in iou.axis_iter(Axis(1)).enumerate() {
        let (best, overlap) = column
            .iter()
            .enumerate()
            .fold((0, f32::MIN), |acc, (i, &v)| if v > acc.1 { (i, v) } else { acc });

        let (tile_x, tile_y, k) = generator
            .anchor_position(best)
            .expect("index comes from the tiled set");
        let (scale, ratio) = generator
            .template_params(k)
            .expect("index comes from the template");

        println!(
            "truth {truth}: anchor {best} (tile ({tile_x}, {tile_y}), scale {scale}, ratio {ratio}) with iou {overlap:.3}"
        );
    }

    Ok(())
}
