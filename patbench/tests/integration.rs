//! Integration tests for patbench
//!
//! These tests exercise the patterns and kernels end to end through the
//! public facade, under every execution backend.

use patbench::prelude::*;
use patbench::{BmpImage, DataGen, Rgb, Sensor, blur, io, merge, sensor};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use std::sync::LazyLock;

static POLICIES: LazyLock<Vec<ExecutionPolicy>> = LazyLock::new(|| {
    Backend::ALL
        .iter()
        .map(|&b| ExecutionPolicy::new(b, 4).unwrap())
        .collect()
});

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("patbench-{}-{}", name, std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn is_sorted<T: Ord>(seq: &[T]) -> bool {
    seq.windows(2).all(|w| w[0] <= w[1])
}

proptest! {
    /// Sorting yields a non-decreasing permutation under every backend
    #[test]
    fn prop_sort_is_sorted_permutation(seq in prop::collection::vec(any::<i32>(), 0..6000)) {
        let mut expected = seq.clone();
        expected.sort();
        for policy in POLICIES.iter() {
            let sorted = merge_sort(&seq, policy);
            prop_assert!(is_sorted(&sorted));
            prop_assert_eq!(&sorted, &expected);
        }
    }

    /// Merging two sorted runs keeps every element
    #[test]
    fn prop_merge_is_sorted_union(
        mut left in prop::collection::vec(-50i32..50, 0..200),
        mut right in prop::collection::vec(-50i32..50, 0..200),
    ) {
        left.sort();
        right.sort();
        let mut expected = [left.clone(), right.clone()].concat();
        expected.sort();
        let merged = merge(left, right);
        prop_assert_eq!(merged, expected);
    }

    /// A single pixel is its own blur for any odd kernel
    #[test]
    fn prop_single_pixel_stencil(
        pixel in any::<u8>(),
        kernel in prop::collection::vec(-8i64..8, 0..4).prop_map(|mut k| {
            // pad to an odd length
            if k.len() % 2 == 0 {
                k.push(1);
            }
            k
        }),
    ) {
        let table = KernelTable::from_separable(&kernel).unwrap();
        for policy in POLICIES.iter() {
            prop_assert_eq!(map_stencil(&[pixel], 1, &table, policy).unwrap(), vec![pixel]);
        }
    }
}

/// Equal keys keep their input order
#[test]
fn test_sort_stability_across_policies() {
    let mut rng = StdRng::seed_from_u64(3);
    let pairs: Vec<(u8, usize)> = (0..10_000).map(|tag| (rng.gen_range(0..16), tag)).collect();
    for policy in POLICIES.iter() {
        let sorted = patbench::merge_sort_by_key(&pairs, |p| p.0, policy);
        for w in sorted.windows(2) {
            assert!(w[0].0 < w[1].0 || (w[0].0 == w[1].0 && w[0].1 < w[1].1));
        }
    }
}

/// Stencil output is byte-identical across backends
#[test]
fn test_stencil_determinism() {
    let mut rng = StdRng::seed_from_u64(17);
    let (width, height) = (97, 61);
    let plane: Vec<u8> = (0..width * height).map(|_| rng.r#gen()).collect();
    let kernel = KernelTable::from_separable(&[1, 4, 6, 4, 1]).unwrap();
    let reference = map_stencil(&plane, width, &kernel, &ExecutionPolicy::sequential()).unwrap();
    for policy in POLICIES.iter() {
        assert_eq!(map_stencil(&plane, width, &kernel, policy).unwrap(), reference);
    }
}

/// Reducing nothing yields the identity
#[test]
fn test_reduce_identity_law() {
    for policy in POLICIES.iter() {
        assert_eq!(reduce(&[] as &[i64], 0, |a, b| a + b, policy), 0);
        assert_eq!(reduce(&[] as &[i64], 1, |a, b| a * b, policy), 1);
        assert_eq!(reduce(&[] as &[i64], i64::MIN, i64::max, policy), i64::MIN);
    }
}

/// Integer sums agree exactly across backends
#[test]
fn test_reduce_matches_sequential() {
    let data = DataGen::new(Some(5)).integers(100_003);
    let data: Vec<i64> = data.into_iter().map(i64::from).collect();
    let expected: i64 = data.iter().sum();
    for policy in POLICIES.iter() {
        assert_eq!(reduce(&data, 0, |a, b| a + b, policy), expected);
        assert_eq!(
            map_reduce(&data, 0i64, |x| x * 2, |a, b| a + b, policy),
            expected * 2
        );
    }
}

/// Window 5, slide 2 over 1, 2, 3, ... yields 3, 5, 7, ...
#[test]
fn test_window_eviction_sequence() {
    let config = WindowConfig {
        window_size: 5,
        slide: 2,
        item_count: 30,
    };
    for policy in POLICIES.iter() {
        let mut averages = Vec::new();
        sensor::moving_average(
            config,
            CancelToken::new(),
            &mut Sensor::starting_at(1),
            |avg| averages.push(avg),
            policy,
        )
        .unwrap();
        assert!(averages.len() >= 4);
        assert_eq!(&averages[..4], &[3.0, 5.0, 7.0, 9.0]);
    }
}

/// A cancelled stream emits nothing
#[test]
fn test_cancelled_stream() {
    let cancel = CancelToken::new();
    cancel.cancel();
    let stream = StreamWindow::new(
        WindowConfig {
            window_size: 4,
            slide: 1,
            item_count: 100,
        },
        cancel,
    )
    .unwrap();
    let mut count = 0;
    let stats = stream.run(|| 1i64, |_| count += 1, &ExecutionPolicy::sequential());
    assert!(stats.cancelled);
    assert_eq!((count, stats.windows), (0, 0));
}

/// Custom divide-and-conquer algorithms fork under every backend
#[test]
fn test_divide_and_conquer_max() {
    struct MaxOf<'a>(&'a [u32]);

    impl DivideConquer for MaxOf<'_> {
        type Problem = Span;
        type Solution = u32;

        fn is_base(&self, span: &Span) -> bool {
            span.size() <= 64
        }
        fn solve(&self, span: Span) -> u32 {
            span.slice(self.0).iter().copied().max().unwrap_or(0)
        }
        fn divide(&self, span: Span) -> (Span, Span) {
            span.split()
        }
        fn combine(&self, left: u32, right: u32) -> u32 {
            left.max(right)
        }
    }

    let mut rng = StdRng::seed_from_u64(9);
    let data: Vec<u32> = (0..50_000).map(|_| rng.gen_range(0..1_000_000)).collect();
    let expected = data.iter().copied().max().unwrap();
    for policy in POLICIES.iter() {
        assert_eq!(
            divide_and_conquer(&MaxOf(&data), Span::full(data.len()), policy),
            expected
        );
    }
}

/// Kernel "1 1 1" leaves a uniform 4x4 image unchanged
#[test]
fn test_blur_uniform_image_end_to_end() {
    let dir = scratch_dir("blur");
    let kernel_path = dir.join("kernel.txt");
    let input_path = dir.join("input.bmp");
    let output_path = dir.join("output.bmp");

    std::fs::write(&kernel_path, "1 1 1\n").unwrap();
    let gray = Rgb {
        r: 100,
        g: 100,
        b: 100,
    };
    BmpImage::from_rgb(4, 4, &[gray; 16])
        .unwrap()
        .write(&input_path)
        .unwrap();

    let kernel = io::load_kernel(&kernel_path).unwrap();
    assert_eq!(kernel.side(), 3);
    let input = BmpImage::read(&input_path).unwrap();

    for policy in POLICIES.iter() {
        let blurred = blur::blur(&input, &kernel, policy).unwrap();
        blurred.write(&output_path).unwrap();
        let written = std::fs::read(&output_path).unwrap();
        assert_eq!(written, std::fs::read(&input_path).unwrap());
    }

    std::fs::remove_dir_all(&dir).unwrap();
}

/// Even-length kernel files are rejected before any work
#[test]
fn test_even_kernel_file_rejected() {
    let dir = scratch_dir("even-kernel");
    let path = dir.join("kernel.txt");
    std::fs::write(&path, "1 2 1 0").unwrap();
    assert!(matches!(
        io::load_kernel(&path),
        Err(patbench::FormatError::KernelParity(4))
    ));
    std::fs::remove_dir_all(&dir).unwrap();
}

/// Unknown backend names are configuration errors
#[test]
fn test_unknown_backend() {
    assert_eq!(
        resolve("cuda", 2).unwrap_err(),
        PatternError::UnknownBackend("cuda".to_string())
    );
    assert!(resolve("omp", 0).unwrap().width() >= 1);
}
