// =========================================================================
// FALSIFY-PAL: palette k-means contract
//
// Each test names the property it tries to break. A failure message
// starting with FALSIFIED identifies the broken clause.
//
// References:
//   - Lloyd (1982) "Least Squares Quantization in PCM"
// =========================================================================

use super::*;

fn sequence(indices: Vec<usize>) -> impl FnMut(usize) -> usize {
    let mut it = indices.into_iter();
    move |len| it.next().map_or(0, |i| i % len)
}

/// FALSIFY-PAL-001: Two-tone data splits into black and white in one step
#[test]
fn falsify_pal_001_two_tone() {
    let data = vec![0x0000_0000u32, 0x0000_0000, 0xFFFF_FFFF, 0xFFFF_FFFF];
    let report = run(&data, 2, 50, &mut sequence(vec![])).expect("valid k");

    assert_eq!(report.iterations, 1, "FALSIFIED PAL-001: iterations");
    assert!(report.converged);
    assert_eq!(
        report.centroids,
        vec![
            Centroid {
                channels: [0.0; 4],
                weight: 2,
                color: Some(0x0000_0000),
            },
            Centroid {
                channels: [255.0; 4],
                weight: 2,
                color: Some(0xFFFF_FFFF),
            },
        ],
        "FALSIFIED PAL-001: centroids"
    );
}

/// FALSIFY-PAL-002: A uniform image reproduces its single color exactly
#[test]
fn falsify_pal_002_uniform() {
    let data = vec![0x1122_3344u32; 100];
    let report = run(&data, 1, 50, &mut sequence(vec![])).expect("valid k");

    assert_eq!(report.iterations, 1);
    let c = &report.centroids[0];
    assert_eq!(c.channels, [68.0, 51.0, 34.0, 17.0], "FALSIFIED PAL-002: channels");
    assert_eq!(c.weight, 100);
    assert_eq!(c.color, Some(0x1122_3344));
}

/// FALSIFY-PAL-003: K=1 centroid is the per-channel mean of all colors
#[test]
fn falsify_pal_003_single_cluster_mean() {
    let data = vec![0x0000_0000u32, 0x0102_0304, 0x0A0B_0C0D, 0xFF00_FF00];
    let report = run(&data, 1, 50, &mut sequence(vec![])).expect("valid k");

    let mut expected = [0.0f64; 4];
    for &color in &data {
        for (e, v) in expected.iter_mut().zip(expand(color)) {
            *e += v;
        }
    }
    let expected = expected.map(|s| s / data.len() as f64);

    assert_eq!(report.iterations, 1, "FALSIFIED PAL-003: K=1 must converge in 1 step");
    assert_eq!(
        report.centroids[0].channels, expected,
        "FALSIFIED PAL-003: centroid is not the mean"
    );
}

/// FALSIFY-PAL-004: K=len with distinct colors gives one color per centroid
#[test]
fn falsify_pal_004_one_color_each() {
    let data: Vec<u32> = vec![0x0000_0000, 0x0000_0040, 0x0000_8000, 0x00C0_0000, 0xFF00_0000];
    let report = run(&data, data.len(), 50, &mut sequence(vec![])).expect("valid k");

    for (i, c) in report.centroids.iter().enumerate() {
        assert_eq!(c.weight, 1, "FALSIFIED PAL-004: weight of centroid {i}");
        assert_eq!(c.color, Some(data[i]), "FALSIFIED PAL-004: color of centroid {i}");
        assert_eq!(c.channels, expand(data[i]));
    }
}

/// FALSIFY-PAL-005: Weights of every update sum to the dataset length
#[test]
fn falsify_pal_005_weight_conservation() {
    let data: Vec<u32> = (0..257u32).map(|i| i.wrapping_mul(0x9E37_79B9)).collect();
    let mut previous = initial_centroids(&data, 6);
    let mut sampler = sequence((0..64).collect());

    for step in 0..10 {
        let next = update_centroids(&data, &mut previous, &mut sampler);
        let total: usize = next.iter().map(|c| c.weight).sum();
        assert_eq!(total, data.len(), "FALSIFIED PAL-005: step {step} total {total}");
        previous = next;
    }
}

/// FALSIFY-PAL-006: Every color is assigned to a centroid at least as close
/// as any other
#[test]
fn falsify_pal_006_nearest_assignment() {
    let data: Vec<u32> = (0..40u32).map(|i| ((i * 37) % 256) | (((i * 91) % 256) << 16)).collect();
    let centroids = cluster_with(&data, 3, 50, &mut sequence(vec![1, 2, 3])).expect("valid k");

    for &color in &data {
        let v = expand(color);
        let assigned = nearest_centroid(&centroids, &v);
        let d_assigned = distance_squared(&centroids[assigned].channels, &v);
        for (j, other) in centroids.iter().enumerate() {
            let d_other = distance_squared(&other.channels, &v);
            assert!(
                !(d_other < d_assigned),
                "FALSIFIED PAL-006: color {color:#010x} assigned to {assigned} \
                 (d={d_assigned}) but {j} is closer (d={d_other})"
            );
        }
    }
}

/// FALSIFY-PAL-007: Same data and same sampler give bit-identical output
#[test]
fn falsify_pal_007_determinism() {
    let data: Vec<u32> = (0..500u32).map(|i| i.wrapping_mul(0x0101_0101) ^ (i << 3)).collect();

    let a = run(&data, 9, 50, &mut RngSampler::seeded(7)).expect("valid k");
    let b = run(&data, 9, 50, &mut RngSampler::seeded(7)).expect("valid k");

    assert_eq!(a.iterations, b.iterations);
    for (x, y) in a.centroids.iter().zip(&b.centroids) {
        for ch in 0..4 {
            assert_eq!(
                x.channels[ch].to_bits(),
                y.channels[ch].to_bits(),
                "FALSIFIED PAL-007: non-deterministic channel"
            );
        }
        assert_eq!(x.weight, y.weight);
    }
}

/// FALSIFY-PAL-008: A converged list is a fixed point of the update
#[test]
fn falsify_pal_008_fixed_point() {
    let data: Vec<u32> = (0..120u32).map(|i| (i / 20) * 0x0030_3030 + (i % 5)).collect();
    let report = run(&data, 4, 50, &mut RngSampler::seeded(3)).expect("valid k");
    assert!(report.converged, "FALSIFIED PAL-008: did not converge");

    let mut converged = report.centroids.clone();
    if converged.iter().all(|c| c.weight > 0) {
        let again = update_centroids(&data, &mut converged, &mut sequence(vec![]));
        assert!(
            centroids_equal(&report.centroids, &again),
            "FALSIFIED PAL-008: update moved a converged centroid"
        );
    }
}

/// FALSIFY-PAL-009: Invalid cluster counts are rejected before any work
#[test]
fn falsify_pal_009_rejects_bad_k() {
    let data = vec![1u32, 2, 3];
    for k in [0, 4, 100] {
        let mut calls = 0;
        let result = run(&data, k, 50, &mut |_: usize| {
            calls += 1;
            0
        });
        assert!(
            matches!(result, Err(PaletteError::InvalidArgument { .. })),
            "FALSIFIED PAL-009: k = {k} accepted"
        );
        assert_eq!(calls, 0);
    }
}

/// FALSIFY-PAL-010: A cluster that stays empty is reported, not repaired,
/// and keeps the loop running to the cap
#[test]
fn falsify_pal_010_degenerate_runs_to_cap() {
    // Both chunks start at R = 10; the reseed lands on 10 again and the
    // first centroid wins every tie.
    let data = vec![0u32, 20, 10, 10];
    let report = run(&data, 2, 50, &mut |_: usize| 2).expect("valid k");

    assert_eq!(report.iterations, 50, "FALSIFIED PAL-010: stopped before the cap");
    assert!(!report.converged, "FALSIFIED PAL-010: NaN centroid reported converged");

    let kept = &report.centroids[0];
    assert_eq!(kept.channels, [10.0, 0.0, 0.0, 0.0]);
    assert_eq!(kept.weight, 4);
    assert_eq!(kept.color, Some(10));

    let empty = &report.centroids[1];
    assert!(empty.is_degenerate(), "FALSIFIED PAL-010: empty cluster has finite channels");
    assert_eq!(empty.weight, 0);
    assert_eq!(empty.color, Some(0));

    let total: usize = report.centroids.iter().map(|c| c.weight).sum();
    assert_eq!(total, data.len(), "FALSIFIED PAL-010: weight lost");
}
