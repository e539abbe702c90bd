mod common;

use circletransform::filters::field::select_field;
use circletransform::filters::gradient::estimate_gradient;
use circletransform::transform::vote::{global_range, mean_range};
use circletransform::transform::{cast_votes, collect_candidates, gradient_magnitude, uncertainty_bound};
use circletransform::{circle_transform, circle_transform_dyn, Error, Field, TransformConfig};
use common::accumulator::strongest_cell;
use common::synthetic_image::{point, soft_disk, texture, vertical_step};
use ndarray::{s, Array1, Array2, Array3};

const DISK_NOISE: f64 = 5.0;

fn disk() -> Array2<f64> {
    soft_disk(48, 40, 20.0, 18.0, 8.0, 100.0)
}

fn peak(acc: &Array2<u32>) -> (usize, usize) {
    strongest_cell(acc.view()).expect("accumulator is not empty").0
}

fn assert_near(found: (usize, usize), expected: (usize, usize)) {
    let dx = (found.0 as i64 - expected.0 as i64).abs();
    let dy = (found.1 as i64 - expected.1 as i64).abs();
    assert!(
        dx <= 1 && dy <= 1,
        "peak at {:?}, expected within 1 pixel of {:?}",
        found,
        expected
    );
}

#[test]
fn accumulator_has_input_shape() {
    for &(h, w) in &[(1usize, 1usize), (3, 17), (13, 7), (40, 48)] {
        let img = texture(w, h, 50.0, 7);
        for field in [None, Some(Field::Even), Some(Field::Odd)] {
            let config = TransformConfig {
                noise: Some(1.0),
                deinterlace: field,
                max_range: None,
            };
            let out = circle_transform(img.view(), &config).unwrap();
            assert_eq!(out.accumulator.dim(), (h, w));
        }
    }
}

#[test]
fn flat_images_cast_no_votes() {
    let zeros = Array2::<f64>::zeros((16, 12));
    let constant = Array2::<f64>::from_elem((16, 12), 123.0);

    for img in [&zeros, &constant] {
        for config in [TransformConfig::default(), TransformConfig::new().with_noise(0.0)] {
            let out = circle_transform(img.view(), &config).unwrap();
            assert_eq!(out.accumulator.sum(), 0);
            assert_eq!(out.candidates, 0);
            assert_eq!(out.mean_range, None);
            assert_eq!(out.range, 0);
        }
    }
}

#[test]
fn disk_centre_is_global_maximum() {
    let config = TransformConfig::new().with_noise(DISK_NOISE);
    let out = circle_transform(disk().view(), &config).unwrap();

    assert!(out.candidates > 0);
    assert_near(peak(&out.accumulator), (20, 18));

    let mean = out.mean_range.unwrap();
    assert!(mean >= 8.0 && mean <= out.range as f64);
}

#[test]
fn integer_input_matches_float_input() {
    let img = disk();
    let as_u8 = img.mapv(|v| v.round() as u8);
    let as_f64 = as_u8.mapv(f64::from);
    let config = TransformConfig::new().with_noise(DISK_NOISE);

    let a = circle_transform(as_u8.view(), &config).unwrap();
    let b = circle_transform(as_f64.view(), &config).unwrap();
    assert_eq!(a, b);
}

#[test]
fn transpose_transposes_accumulator() {
    let img = disk();
    let transposed = img.t().to_owned();
    let config = TransformConfig::new().with_noise(DISK_NOISE);

    let a = circle_transform(img.view(), &config).unwrap();
    let b = circle_transform(transposed.view(), &config).unwrap();

    assert_eq!(a.accumulator.t(), b.accumulator.view());
    assert_eq!(a.candidates, b.candidates);
    assert_eq!(a.mean_range, b.mean_range);
}

#[test]
fn peak_follows_rotation() {
    let img = disk();
    let (h, w) = img.dim();
    let (cx, cy) = (20usize, 18usize);
    let config = TransformConfig::new().with_noise(DISK_NOISE);

    // new[y][x] = img[h-1-x][y]
    let rot90 = img.t().slice(s![.., ..;-1]).to_owned();
    let rot180 = img.slice(s![..;-1, ..;-1]).to_owned();
    // new[y][x] = img[x][w-1-y]
    let rot270 = img.t().slice(s![..;-1, ..]).to_owned();

    let cases = [
        (rot90, (h - 1 - cy, cx)),
        (rot180, (w - 1 - cx, h - 1 - cy)),
        (rot270, (cy, w - 1 - cx)),
    ];
    for (rotated, centre) in cases.iter() {
        let out = circle_transform(rotated.view(), &config).unwrap();
        assert_eq!(out.accumulator.dim(), rotated.dim());
        assert_near(peak(&out.accumulator), *centre);
    }
}

#[test]
fn more_noise_never_adds_candidates() {
    let img = disk();
    let counts: Vec<usize> = [0.25, 0.5, 1.0, 2.0, 4.0, 8.0, 16.0]
        .iter()
        .map(|&noise| {
            circle_transform(img.view(), &TransformConfig::new().with_noise(noise))
                .unwrap()
                .candidates
        })
        .collect();

    for pair in counts.windows(2) {
        assert!(pair[1] <= pair[0], "candidate counts {:?}", counts);
    }
    assert!(counts[counts.len() - 1] < counts[0]);
}

#[test]
fn deinterlaced_votes_land_on_frame_rows() {
    let (w, h) = (16, 21);
    let img = vertical_step(w, h, 8, 100.0);

    for field in [Field::Even, Field::Odd] {
        let config = TransformConfig::new().with_noise(1.0).with_deinterlace(field);
        let out = circle_transform(img.view(), &config).unwrap();
        assert_eq!(out.accumulator.dim(), (h, w));

        let voted: Vec<usize> = (0..h)
            .filter(|&y| out.accumulator.row(y).sum() > 0)
            .collect();
        let mut expected: Vec<usize> = (0..field.height(h))
            .map(|row| (field.frame_row(row) + 1).min(h - 1))
            .collect();
        expected.dedup();
        assert_eq!(voted, expected, "field {:?}", field);
    }
}

#[test]
fn deinterlace_reads_only_its_field() {
    // Feature only on odd rows; even rows are blank
    let disk = soft_disk(40, 40, 20.0, 20.0, 8.0, 100.0);
    let odd_only = Array2::from_shape_fn((40, 40), |(y, x)| if y % 2 == 1 { disk[[y, x]] } else { 0.0 });

    let even = circle_transform(
        odd_only.view(),
        &TransformConfig::new().with_noise(1.0).with_deinterlace(Field::Even),
    )
    .unwrap();
    assert_eq!(even.candidates, 0);
    assert_eq!(even.accumulator.sum(), 0);

    let odd = circle_transform(
        odd_only.view(),
        &TransformConfig::new().with_noise(1.0).with_deinterlace_parity(1),
    )
    .unwrap();
    assert!(odd.candidates > 0);
    assert!(odd.accumulator.sum() > 0);
}

#[test]
fn deinterlaced_disk_peak_is_rescaled() {
    let img = soft_disk(48, 48, 22.0, 24.0, 10.0, 100.0);
    let config = TransformConfig::new().with_noise(DISK_NOISE).with_deinterlace(Field::Even);
    let out = circle_transform(img.view(), &config).unwrap();

    let (x, y) = peak(&out.accumulator);
    assert!((x as i64 - 22).abs() <= 1, "peak x {}", x);
    assert!((y as i64 - 24).abs() <= 2, "peak y {}", y);
}

#[test]
fn repeated_calls_are_identical() {
    let img = &disk() + &texture(48, 40, 4.0, 99);
    let config = TransformConfig::default();

    let first = circle_transform(img.view(), &config).unwrap();
    let second = circle_transform(img.view(), &config).unwrap();
    assert!(first.candidates > 0);
    assert_eq!(first, second);
}

#[test]
fn border_point_votes_inside_image() {
    let (w, h) = (20, 15);
    for &(x, y) in &[(0usize, 0usize), (w - 1, h - 1), (0, 7)] {
        let img = point(w, h, x, y, 100.0);
        let out = circle_transform(img.view(), &TransformConfig::new().with_noise(1.0)).unwrap();
        assert_eq!(out.accumulator.dim(), (h, w));
        assert!(out.candidates > 0);
        assert!(out.accumulator.sum() > 0);
    }
}

#[test]
fn range_cap_limits_every_candidate() {
    let img = disk();
    let config = TransformConfig::new().with_noise(0.0).with_max_range(6);
    let out = circle_transform(img.view(), &config).unwrap();

    assert_eq!(out.range, 6);
    assert_eq!(out.mean_range, Some(6.0));
    assert_eq!(out.accumulator.sum() as usize, out.candidates * 13);
}

#[test]
fn stages_compose_to_transform() {
    let img = disk();
    let noise = 2.0;

    let source = select_field(img.view(), None);
    let gradient = estimate_gradient(source);
    let magnitude = gradient_magnitude(&gradient);
    let delta = uncertainty_bound(noise);
    let candidates = collect_candidates(&gradient, &magnitude, delta, None, usize::MAX);
    let accumulator = cast_votes(&candidates, img.dim());

    let votes: u32 = candidates.iter().map(|c| 2 * c.rng as u32 + 1).sum();
    assert_eq!(accumulator.sum(), votes);

    let out = circle_transform(img.view(), &TransformConfig::new().with_noise(noise)).unwrap();
    assert_eq!(out.accumulator, accumulator);
    assert_eq!(out.candidates, candidates.len());
    assert_eq!(out.range, global_range(&candidates));
    assert_eq!(out.mean_range, mean_range(&candidates));
}

#[test]
fn default_ranges_are_uncapped() {
    let img = disk();
    let noise = 0.5;

    let gradient = estimate_gradient(img.view());
    let magnitude = gradient_magnitude(&gradient);
    let candidates = collect_candidates(&gradient, &magnitude, uncertainty_bound(noise), None, usize::MAX);

    let out = circle_transform(img.view(), &TransformConfig::new().with_noise(noise)).unwrap();
    assert_eq!(out.candidates, 500);
    assert_eq!(out.range, 300);
    assert_eq!(out.range, global_range(&candidates));
    assert_eq!(out.mean_range, mean_range(&candidates));
    assert!((out.mean_range.unwrap() - 122.76).abs() < 1e-9);
    // Ranges reach far past the 48x40 frame; the overshoot piles up on the border
    assert_eq!(out.accumulator.sum(), 123_260);
}

#[test]
fn low_noise_step_piles_votes_on_border() {
    let (w, h) = (16, 4);
    let img = vertical_step(w, h, 8, 50.0);
    let noise = 0.5;
    let out = circle_transform(img.view(), &TransformConfig::new().with_noise(noise)).unwrap();

    // Column sums of the kernel's two right-hand columns
    let strong = 50.0 * (0.6667 - 0.0833);
    let weak = 50.0 * 0.0833;
    let delta = uncertainty_bound(noise);
    let rng = |g: f64| (2.0 / (delta / g / 2.0).tan()).round() as u32;
    assert_eq!((rng(strong), rng(weak)), (361, 51));

    // Columns 6..=9 vote, origins one pixel right and down
    let votes = [(7u32, rng(weak)), (8, rng(strong)), (9, rng(strong)), (10, rng(weak))];
    let right = w as u32 - 1;
    let left_pile: u32 = votes.iter().map(|&(o, r)| r - o + 1).sum();
    let right_pile: u32 = votes.iter().map(|&(o, r)| r - (right - o) + 1).sum();
    assert_eq!((left_pile, right_pile), (794, 802));

    assert_eq!(out.candidates, 16);
    assert_eq!(out.range, 361);
    assert_eq!(out.mean_range, Some(206.0));

    let row = |scale: u32| {
        let mut row = vec![4 * scale; w];
        row[0] = left_pile * scale;
        row[w - 1] = right_pile * scale;
        row
    };
    let expected = [vec![0; w], row(1), row(1), row(2)].concat();
    assert_eq!(out.accumulator, Array2::from_shape_vec((h, w), expected).unwrap());
}

#[test]
fn wrong_rank_is_an_error() {
    let line = Array1::<f64>::zeros(10);
    assert_eq!(
        circle_transform_dyn(line.view().into_dyn(), &TransformConfig::default()),
        Err(Error::InvalidRank(1))
    );

    let cube = Array3::<u8>::zeros((4, 4, 3));
    assert_eq!(
        circle_transform_dyn(cube.view().into_dyn(), &TransformConfig::default()),
        Err(Error::InvalidRank(3))
    );

    let img = disk().into_dyn();
    let out = circle_transform_dyn(img.view(), &TransformConfig::new().with_noise(DISK_NOISE)).unwrap();
    assert_near(peak(&out.accumulator), (20, 18));
}
