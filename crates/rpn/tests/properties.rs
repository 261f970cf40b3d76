use ndarray::{Array2, Axis};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rpn::prelude::*;

const TOLERANCE: f32 = 1e-4;

/// A random box set in center form with strictly positive extents.
fn random_boxes(rng: &mut StdRng, n: usize) -> Array2<f32> {
    Array2::from_shape_fn((n, 4), |(_, col)| match col {
        0 | 1 => rng.random_range(-100.0..100.0),
        _ => rng.random_range(1.0..80.0),
    })
}

fn assert_close(a: &Array2<f32>, b: &Array2<f32>) {
    assert_eq!(a.dim(), b.dim());
    for (x, y) in a.iter().zip(b.iter()) {
        assert!((x - y).abs() <= TOLERANCE * (1.0 + x.abs()), "{x} != {y}");
    }
}

#[test]
fn conversion_round_trip() {
    let mut rng = StdRng::seed_from_u64(1);
    let boxes = random_boxes(&mut rng, 64);

    let round_trip = to_center_form(&to_min_max(&boxes).unwrap()).unwrap();
    assert_close(&round_trip, &boxes);

    let mut in_place = boxes.clone();
    to_min_max_in_place(&mut in_place).unwrap();
    to_center_form_in_place(&mut in_place).unwrap();
    assert_close(&in_place, &boxes);
}

#[test]
fn iou_is_symmetric() {
    let mut rng = StdRng::seed_from_u64(2);
    let a = random_boxes(&mut rng, 17);
    let b = random_boxes(&mut rng, 23);

    let ab = iou_matrix_center_form(&a, &b).unwrap();
    let ba = iou_matrix_center_form(&b, &a).unwrap();

    assert_close(&ab, &ba.t().to_owned());
}

#[test]
fn self_iou_is_one_on_the_diagonal() {
    let mut rng = StdRng::seed_from_u64(3);
    let boxes = random_boxes(&mut rng, 32);

    let iou = iou_matrix_center_form(&boxes, &boxes).unwrap();

    for value in iou.diag() {
        assert!((value - 1.0).abs() < TOLERANCE);
    }
}

#[test]
fn iou_stays_within_unit_interval() {
    let mut rng = StdRng::seed_from_u64(4);
    let a = random_boxes(&mut rng, 40);
    let b = random_boxes(&mut rng, 40);

    let host = iou_matrix_center_form(&a, &b).unwrap();
    let batched = BatchedIou::<40, 40>.compute(&a, &b).unwrap();

    assert!(host.iter().all(|v| (0.0..=1.0).contains(v)));
    assert!(batched.iter().all(|v| (0.0..=1.0).contains(v)));
}

#[test]
fn corner_form_agrees_with_center_form() {
    let mut rng = StdRng::seed_from_u64(5);
    let a = random_boxes(&mut rng, 12);
    let b = random_boxes(&mut rng, 9);

    let from_centers = iou_matrix_center_form(&a, &b).unwrap();
    let from_corners =
        iou_matrix_corner_form(&to_min_max(&a).unwrap(), &to_min_max(&b).unwrap()).unwrap();

    assert_close(&from_centers, &from_corners);
}

#[test]
fn disjoint_boxes_have_no_overlap() {
    let mut rng = StdRng::seed_from_u64(6);
    let left = random_boxes(&mut rng, 8);
    let mut right = left.clone();
    // every right box starts past the far edge of every left box
    right.column_mut(0).mapv_inplace(|cx| cx + 500.0);

    let iou = iou_center_form(&left, &right).unwrap();
    assert!(iou.iter().all(|v| *v == 0.0));
}

#[test]
fn squeezed_and_matrix_forms_agree() {
    let mut rng = StdRng::seed_from_u64(7);
    let set = random_boxes(&mut rng, 5);
    let single = set.row(2);

    let squeezed = iou_center_form(&single, &set).unwrap();
    let matrix = iou_matrix_center_form(&single, &set).unwrap();

    assert_eq!(squeezed.shape(), &[5]);
    assert_eq!(squeezed.iter().collect::<Vec<_>>(), matrix.iter().collect::<Vec<_>>());

    let scalar = iou_center_form(&single, &set.row(2)).unwrap();
    assert_eq!(scalar.ndim(), 0);
    assert_eq!(scalar.first().copied(), Some(matrix[[0, 2]]));
}

#[test]
fn tiled_anchors_cover_the_grid() {
    let template = generate_anchors(16.0, &[0.5, 1.0, 2.0], &[16.0, 32.0, 64.0]);
    assert_eq!(template.nrows(), 9);

    let (tiles_x, tiles_y) = (5, 7);
    let tiled = tile_anchors(&template, tiles_x, tiles_y, 16.0, -16.0).unwrap();

    assert_eq!(tiled.nrows(), template.nrows() * tiles_x * tiles_y);

    for (tile, chunk) in tiled.axis_chunks_iter(Axis(0), template.nrows()).enumerate() {
        let (i, j) = (tile / tiles_y, tile % tiles_y);
        let mut expected = template.clone();
        expected.column_mut(0).mapv_inplace(|cx| cx + 16.0 * i as f32);
        expected.column_mut(1).mapv_inplace(|cy| cy - 16.0 * j as f32);

        assert_eq!(chunk, expected);
    }
}

#[test]
fn generator_matches_free_functions() {
    let config: AnchorConfig = r"
        base_size = 8.0
        ratios = [1.0, 3.0]
        scales = [2.0]

        [grid]
        tiles_x = 3
        tiles_y = 2
        stride_x = 8.0
        stride_y = 8.0
    "
    .parse()
    .unwrap();

    let generator = AnchorGenerator::new(config).unwrap();
    let template = generate_anchors(8.0, &[1.0, 3.0], &[2.0]);
    let tiled = tile_anchors(&template, 3, 2, 8.0, 8.0).unwrap();

    assert_eq!(generator.template(), template);
    assert_eq!(generator.tiled().unwrap(), tiled);
    assert_eq!(generator.tiled_corners().unwrap(), to_min_max(&tiled).unwrap());
}
