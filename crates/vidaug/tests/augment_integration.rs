//! Integration tests for augmentation pipelines.
//!
//! These tests run whole pipelines over synthetic batches on the ndarray
//! backend and check the shape and per-clip guarantees end to end.

use burn::prelude::*;
use burn_ndarray::NdArray;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use vidaug::prelude::*;

type TestBackend = NdArray;

/// Synthetic batch with uniform noise in `[0, 1)`.
fn random_batch<const D: usize>(dims: [usize; D], seed: u64) -> VideoBatch<TestBackend, D> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let n: usize = dims.iter().product();
    let values: Vec<f32> = (0..n).map(|_| rng.gen::<f32>()).collect();
    let tensor = Tensor::from_data(TensorData::new(values, dims), &Default::default());
    VideoBatch::new(tensor).unwrap()
}

/// Batch whose clip `i` is filled with the value `i`.
fn indexed_batch(dims: [usize; 5]) -> VideoBatch<TestBackend, 5> {
    let per_clip: usize = dims[1..].iter().product();
    let values: Vec<f32> = (0..dims[0])
        .flat_map(|i| std::iter::repeat(i as f32).take(per_clip))
        .collect();
    let tensor = Tensor::from_data(TensorData::new(values, dims), &Default::default());
    VideoBatch::new(tensor).unwrap()
}

/// Batch of `n` copies of the same random clip.
fn repeated_batch(n: usize, clip: [usize; 4], seed: u64) -> VideoBatch<TestBackend, 5> {
    let single = random_batch([1, clip[0], clip[1], clip[2], clip[3]], seed).into_inner();
    VideoBatch::new(Tensor::cat(vec![single; n], 0)).unwrap()
}

fn values<const D: usize>(batch: VideoBatch<TestBackend, D>) -> Vec<f32> {
    batch.into_inner().into_data().to_vec::<f32>().unwrap()
}

fn seeded_pipeline<const D: usize>(seed: u64) -> Compose<TestBackend, D> {
    let mut config = PipelineConfig::default();
    config.seed = Some(seed);
    config.build().unwrap()
}

#[test]
fn test_default_pipeline_on_video_batch() {
    let pipeline = seeded_pipeline::<5>(1);
    let out = pipeline.apply(random_batch([4, 8, 3, 128, 171], 0)).unwrap();
    assert_eq!(out.shape().dims(), &[4, 8, 3, 112, 112]);
    assert!(values(out).iter().all(|v| v.is_finite()));
}

#[test]
fn test_default_pipeline_on_image_batch() {
    let pipeline = seeded_pipeline::<4>(2);
    let out = pipeline.apply(random_batch([3, 3, 120, 140], 0)).unwrap();
    assert_eq!(out.shape().dims(), &[3, 3, 112, 112]);
}

#[test]
fn test_shape_preserving_transforms() {
    let dims = [3, 4, 3, 20, 24];
    let transforms: Vec<Box<dyn Transform<TestBackend, 5>>> = vec![
        Box::new(HorizontalFlip::new(0.5).unwrap().with_seed(Seed::new(0))),
        Box::new(RandomErasing::new(1.0).unwrap().with_seed(Seed::new(0))),
        Box::new(Normalize::kinetics()),
    ];
    for transform in transforms {
        let out = transform.apply(random_batch(dims, 5)).unwrap();
        assert_eq!(out.shape().dims(), &dims, "{}", transform.name());
    }
}

#[test]
fn test_clip_order_is_preserved() {
    let crop = ResizedCrop::new(SizeSpec::new(5, 7).unwrap()).with_seed(Seed::new(8));
    let out = crop.apply(indexed_batch([6, 2, 1, 16, 16])).unwrap();
    assert_eq!(out.shape().dims(), &[6, 2, 1, 5, 7]);

    for (i, clip) in values(out).chunks(2 * 5 * 7).enumerate() {
        assert!(clip.iter().all(|&v| (v - i as f32).abs() < 1e-4), "clip {i}");
    }
}

#[test]
fn test_identical_clips_get_different_crops() {
    let crop = FixedCrop::new(SizeSpec::square(8).unwrap()).with_seed(Seed::new(13));
    let out = values(crop.apply(repeated_batch(8, [2, 1, 24, 24], 4)).unwrap());
    let clips: Vec<&[f32]> = out.chunks(2 * 8 * 8).collect();
    assert!(clips.iter().any(|clip| *clip != clips[0]));

    let crop = ResizedCrop::new(SizeSpec::square(8).unwrap()).with_seed(Seed::new(13));
    let out = values(crop.apply(repeated_batch(8, [2, 1, 24, 24], 4)).unwrap());
    let clips: Vec<&[f32]> = out.chunks(2 * 8 * 8).collect();
    assert!(clips.iter().any(|clip| *clip != clips[0]));
}

#[test]
fn test_identical_clips_get_different_erasures() {
    let erasing = RandomErasing::new(1.0).unwrap().with_value(-1.0).with_seed(Seed::new(21));
    let out = values(erasing.apply(repeated_batch(8, [1, 1, 32, 32], 6)).unwrap());
    let masks: Vec<Vec<bool>> = out
        .chunks(32 * 32)
        .map(|clip| clip.iter().map(|&v| v == -1.0).collect())
        .collect();
    assert!(masks.iter().any(|mask| *mask != masks[0]));
}

#[test]
fn test_flip_pairing_restores_input() {
    let flip = HorizontalFlip::new(1.0).unwrap().with_seed(Seed::new(0));
    let input = random_batch([2, 3, 3, 6, 9], 12);
    let expected = values(VideoBatch::new(input.inner().clone()).unwrap());
    let twice = flip.apply(flip.apply(input).unwrap()).unwrap();
    assert_eq!(values(twice), expected);
}

#[test]
fn test_padding_order_end_to_end() {
    let config = PipelineConfig::from_json_str(
        r#"{
            "seed": 0,
            "transforms": [
                {"type": "FixedCrop", "size": [11, 8], "padding": [2, 1, 4, 3]}
            ]
        }"#,
    )
    .unwrap();
    let pipeline = config.build::<TestBackend, 5>().unwrap();
    let ones = VideoBatch::new(Tensor::<TestBackend, 5>::ones([1, 1, 1, 4, 5], &Default::default()))
        .unwrap();
    let out = values(pipeline.apply(ones).unwrap());

    let rows: Vec<&[f32]> = out.chunks(8).collect();
    assert_eq!(rows.len(), 11);
    for row in &rows[..4] {
        assert!(row.iter().all(|&v| v == 0.0));
    }
    for row in &rows[4..8] {
        assert_eq!(*row, &[0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.0]);
    }
}

#[test]
fn test_impossible_ratio_fallbacks() {
    let batch = || {
        VideoBatch::new(Tensor::<TestBackend, 5>::ones([2, 1, 1, 16, 16], &Default::default()))
            .unwrap()
    };

    let crop = ResizedCrop::new(SizeSpec::square(4).unwrap())
        .with_scale((0.9, 1.0))
        .unwrap()
        .with_ratio((4.0, 8.0))
        .unwrap();
    let mut rng = Seed::new(0).to_rng();
    assert_eq!(crop.sample_window(&mut rng, 16, 16), CropWindow::new(6, 0, 4, 16));
    let out = crop.with_seed(Seed::new(0)).apply(batch()).unwrap();
    assert_eq!(out.shape().dims(), &[2, 1, 1, 4, 4]);

    let erasing = RandomErasing::new(1.0)
        .unwrap()
        .with_ratio((100.0, 200.0))
        .unwrap()
        .with_seed(Seed::new(0));
    assert!(values(erasing.apply(batch()).unwrap()).iter().all(|&v| v == 0.0));
}

#[test]
fn test_normalize_round_trip_and_zero_std() {
    let mean = [0.1, 0.2, 0.3];
    let std = [0.5, 0.25, 2.0];
    let input = random_batch([2, 2, 3, 4, 4], 9);
    let original = values(VideoBatch::new(input.inner().clone()).unwrap());

    let out = values(Normalize::new(&mean, &std).unwrap().apply(input).unwrap());
    for (i, (&y, &x)) in out.iter().zip(&original).enumerate() {
        let c = (i / 16) % 3;
        assert!((y as f64 * std[c] + mean[c] - x as f64).abs() < 1e-5);
    }

    let zero = Normalize::new(&mean, &[0.5, 0.0, 2.0]).unwrap();
    let err = zero.apply(random_batch([1, 1, 3, 2, 2], 0)).unwrap_err();
    assert!(err.is_invalid_argument());
}

#[test]
fn test_compose_stops_at_first_error() {
    let pipeline = Compose::<TestBackend, 5>::new()
        .with(FixedCrop::new(SizeSpec::square(64).unwrap()).with_seed(Seed::new(0)))
        .with(HorizontalFlip::new(1.0).unwrap().with_seed(Seed::new(0)));
    let err = pipeline.apply(random_batch([1, 1, 1, 8, 8], 0)).unwrap_err();
    assert!(matches!(err, AugmentError::InvalidArgument(_)));
}

#[test]
fn test_manual_seed_reproduces_global_stream() {
    let config = PipelineConfig::from_json_str(
        r#"{"transforms": [
            {"type": "ResizedCrop", "size": 6},
            {"type": "HorizontalFlip"},
            {"type": "RandomErasing", "p": 0.7}
        ]}"#,
    )
    .unwrap();
    let pipeline = config.build::<TestBackend, 5>().unwrap();
    assert_eq!(pipeline.len(), 3);

    let run = || {
        manual_seed(2024);
        values(pipeline.apply(random_batch([4, 2, 3, 20, 20], 1)).unwrap())
    };
    assert_eq!(run(), run());
}

#[test]
fn test_pipeline_config_from_json_value() {
    let value = serde_json::json!({
        "seed": 3,
        "transforms": [
            {"type": "FixedCrop", "size": 8, "padding": 2},
            {"type": "HorizontalFlip", "p": 1.0},
            {"type": "Normalize", "mean": [0.5], "std": [0.5]}
        ]
    });
    let config = PipelineConfig::from_json_str(&value.to_string()).unwrap();
    assert_eq!(config.seed, Some(3));

    let written: serde_json::Value =
        serde_json::from_str(&config.to_json_string().unwrap()).unwrap();
    let stages: Vec<&str> = written["transforms"]
        .as_array()
        .unwrap()
        .iter()
        .map(|stage| stage["type"].as_str().unwrap())
        .collect();
    assert_eq!(stages, ["FixedCrop", "HorizontalFlip", "Normalize"]);

    let pipeline = config.build::<TestBackend, 5>().unwrap();
    let out = pipeline.apply(random_batch([2, 2, 1, 10, 10], 7)).unwrap();
    assert_eq!(out.shape().dims(), &[2, 2, 1, 8, 8]);
}
