// The Monte-Carlo ambient occlusion estimator.
//
// A single batch of directions is drawn per call and shared by every point. This trades
// independence between the points for not having to sample per point.

use crate::error::{AoError, AoResult};
use crate::hit_test::RayHitTest;
use crate::param::AoParam;
use crate::sampler::DirectionSampler;
use crate::threading::parallel_rows;
use log::{debug, warn};
use pmath::vector::Vec3;

// Normals shorter than this make the hemisphere flip meaningless:
const DEGENERATE_NORMAL_LENGTH2: f32 = 1e-12;

/// Estimates, for every point, the fraction of its hemisphere (around its normal) that
/// is blocked according to `hit_test`.
///
/// # Arguments
/// * `hit_test` - Answers whether a ray is blocked.
/// * `sampler` - Draws the `num_samples` directions shared by every point.
/// * `points` - Where to estimate occlusion.
/// * `normals` - The outward normal of each point. Must be as long as `points`.
/// * `num_samples` - The number of rays per point. Must be at least 1.
/// * `param` - Threading options (the rest is ignored here).
pub fn estimate<H, S>(
    hit_test: &H,
    sampler: &S,
    points: &[Vec3<f64>],
    normals: &[Vec3<f64>],
    num_samples: usize,
    param: &AoParam,
) -> AoResult<Vec<f64>>
where
    H: RayHitTest + ?Sized,
    S: DirectionSampler + ?Sized,
{
    check_args(points, normals, num_samples)?;

    let dirs = sampler.sample(num_samples);
    if dirs.len() != num_samples {
        return Err(AoError::InvalidArgument(format!(
            "sampler returned {} directions instead of {}",
            dirs.len(),
            num_samples
        )));
    }

    estimate_with_dirs(hit_test, &dirs, points, normals, param)
}

/// Same as `estimate`, but with the direction batch given explicitly. Each direction is
/// flipped into a point's hemisphere before it's used, and the result for each point is
/// exactly `hits / dirs.len()`.
pub fn estimate_with_dirs<H>(
    hit_test: &H,
    dirs: &[Vec3<f32>],
    points: &[Vec3<f64>],
    normals: &[Vec3<f64>],
    param: &AoParam,
) -> AoResult<Vec<f64>>
where
    H: RayHitTest + ?Sized,
{
    check_args(points, normals, dirs.len())?;

    let num_degenerate = count_degenerate_normals(normals);
    if num_degenerate > 0 {
        warn!(
            "{} of {} normals have (close to) zero or NaN length, their hemispheres are arbitrary",
            num_degenerate,
            normals.len()
        );
    }

    debug!(
        "estimating occlusion of {} points with {} directions on up to {} threads",
        points.len(),
        dirs.len(),
        param.num_threads
    );

    let num_samples = dirs.len() as f64;
    let mut occlusion = vec![0.; points.len()];
    parallel_rows(
        &mut occlusion,
        param.num_threads,
        param.bind_threads,
        |i| {
            let org = points[i].to_f32();
            let normal = normals[i].to_f32();
            let num_hits = dirs
                .iter()
                .filter(|&&dir| hit_test.hit_test(org, dir.face_forward(normal)))
                .count();
            (num_hits as f64) / num_samples
        },
    );

    Ok(occlusion)
}

/// Normals that can't orient a hemisphere: too short, or not a number at all.
fn count_degenerate_normals(normals: &[Vec3<f64>]) -> usize {
    normals
        .iter()
        .filter(|n| !(n.to_f32().length2() >= DEGENERATE_NORMAL_LENGTH2))
        .count()
}

/// Everything that makes a call invalid, checked up front so no work is wasted on it.
pub(crate) fn check_args(
    points: &[Vec3<f64>],
    normals: &[Vec3<f64>],
    num_samples: usize,
) -> AoResult<()> {
    if num_samples == 0 {
        return Err(AoError::InvalidArgument(
            "num_samples must be at least 1".to_string(),
        ));
    }
    if points.len() != normals.len() {
        return Err(AoError::InvalidArgument(format!(
            "got {} points but {} normals",
            points.len(),
            normals.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::StratifiedSampler;
    use std::sync::Mutex;

    fn points_and_normals() -> (Vec<Vec3<f64>>, Vec<Vec3<f64>>) {
        let points = vec![
            Vec3::new(0., 0., 0.),
            Vec3::new(1., 2., 3.),
            Vec3::new(-4., 0.5, 2.),
        ];
        let normals = vec![
            Vec3::new(0., 0., 1.),
            Vec3::new(1., 1., 0.).normalize(),
            Vec3::new(0., -1., 0.),
        ];
        (points, normals)
    }

    fn serial() -> AoParam {
        AoParam::default().with_num_threads(1)
    }

    #[test]
    fn test_rejects_zero_samples() {
        let (points, normals) = points_and_normals();
        let result = estimate(
            &|_: Vec3<f32>, _: Vec3<f32>| true,
            &StratifiedSampler::new(0),
            &points,
            &normals,
            0,
            &serial(),
        );
        assert!(matches!(result, Err(AoError::InvalidArgument(_))));
    }

    #[test]
    fn test_rejects_mismatched_lengths() {
        let (points, mut normals) = points_and_normals();
        normals.pop();
        let result = estimate(
            &|_: Vec3<f32>, _: Vec3<f32>| true,
            &StratifiedSampler::new(0),
            &points,
            &normals,
            16,
            &serial(),
        );
        assert!(matches!(result, Err(AoError::InvalidArgument(_))));
    }

    #[test]
    fn test_rejects_short_sampler() {
        struct Short;
        impl DirectionSampler for Short {
            fn sample(&self, num_samples: usize) -> Vec<Vec3<f32>> {
                vec![Vec3::new(0., 0., 1.); num_samples - 1]
            }
        }

        let (points, normals) = points_and_normals();
        let result = estimate(
            &|_: Vec3<f32>, _: Vec3<f32>| false,
            &Short,
            &points,
            &normals,
            8,
            &serial(),
        );
        assert!(matches!(result, Err(AoError::InvalidArgument(_))));
    }

    #[test]
    fn test_extremes() {
        let (points, normals) = points_and_normals();
        let sampler = StratifiedSampler::new(2);
        for &num_samples in &[1, 5, 64] {
            let never = |_: Vec3<f32>, _: Vec3<f32>| false;
            let always = |_: Vec3<f32>, _: Vec3<f32>| true;
            let s = estimate(&never, &sampler, &points, &normals, num_samples, &serial()).unwrap();
            assert_eq!(s, vec![0.; 3]);
            let s = estimate(&always, &sampler, &points, &normals, num_samples, &serial()).unwrap();
            assert_eq!(s, vec![1.; 3]);
        }
    }

    #[test]
    fn test_directions_stay_in_hemisphere() {
        let (points, normals) = points_and_normals();
        let num_samples = 50;
        let seen = Mutex::new(Vec::new());
        let recorder = |org: Vec3<f32>, dir: Vec3<f32>| {
            seen.lock().unwrap().push((org, dir));
            false
        };

        estimate(
            &recorder,
            &StratifiedSampler::new(8),
            &points,
            &normals,
            num_samples,
            &AoParam::default().with_num_threads(3),
        )
        .unwrap();

        let seen = seen.into_inner().unwrap();
        assert_eq!(seen.len(), points.len() * num_samples);
        for (point, normal) in points.iter().zip(normals.iter()) {
            let org = point.to_f32();
            let dirs: Vec<_> = seen.iter().filter(|(o, _)| *o == org).collect();
            assert_eq!(dirs.len(), num_samples);
            for (_, dir) in dirs {
                assert!(dir.dot(normal.to_f32()) >= 0.);
            }
        }
    }

    #[test]
    fn test_result_is_exact_hit_fraction() {
        let (points, normals) = points_and_normals();
        let dirs = StratifiedSampler::new(21).sample(37);
        let blocked = |dir: Vec3<f32>| dir.x > 0.3 || dir.y < -0.5;

        let s = estimate_with_dirs(
            &|_: Vec3<f32>, dir: Vec3<f32>| blocked(dir),
            &dirs,
            &points,
            &normals,
            &serial(),
        )
        .unwrap();

        for (i, normal) in normals.iter().enumerate() {
            let k = dirs
                .iter()
                .filter(|d| blocked(d.face_forward(normal.to_f32())))
                .count();
            assert_eq!(s[i], (k as f64) / 37.);
        }
    }

    #[test]
    fn test_thread_count_does_not_change_result() {
        let points: Vec<_> = (0..97)
            .map(|i| Vec3::new(i as f64 * 0.1, (i % 7) as f64, 0.))
            .collect();
        let normals: Vec<_> = (0..97)
            .map(|i| Vec3::new((i as f64).sin(), (i as f64).cos(), 0.5))
            .collect();
        let dirs = StratifiedSampler::new(1).sample(32);
        let hit = |org: Vec3<f32>, dir: Vec3<f32>| org.x * dir.y + dir.z > 0.2;

        let one_thread = estimate_with_dirs(&hit, &dirs, &points, &normals, &serial()).unwrap();
        let parallel = estimate_with_dirs(
            &hit,
            &dirs,
            &points,
            &normals,
            &AoParam::default().with_num_threads(5),
        )
        .unwrap();
        assert_eq!(one_thread, parallel);
    }

    #[test]
    fn test_counts_degenerate_normals() {
        let normals = vec![
            Vec3::new(0., 0., 1.),
            Vec3::new(0., 0., 0.),
            Vec3::new(1e-9, 0., 0.),
            Vec3::new(std::f64::NAN, 0., 1.),
            Vec3::new(0.5, -0.5, 0.),
        ];
        assert_eq!(count_degenerate_normals(&normals), 3);
        assert_eq!(count_degenerate_normals(&[]), 0);
    }

    #[test]
    fn test_zero_normal_is_not_an_error() {
        let points = vec![Vec3::new(0., 0., 0.)];
        let normals = vec![Vec3::new(0., 0., 0.)];
        let s = estimate(
            &|_: Vec3<f32>, dir: Vec3<f32>| dir.z > 0.,
            &StratifiedSampler::new(4),
            &points,
            &normals,
            16,
            &serial(),
        )
        .unwrap();
        assert!(s[0] >= 0. && s[0] <= 1.);
    }
}
