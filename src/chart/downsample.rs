//! Largest-Triangle-Three-Buckets downsampling.
//!
//! A full run at 1 kHz is far more points than pixels. LTTB keeps the
//! visual shape (peaks included) while cutting the draw cost to a fixed
//! budget. Non-finite points are gaps in the line and are never merged
//! away: each finite stretch is downsampled on its own.

use crate::series::NormalizedPoint;

/// Downsample a single finite stretch to `target_points`
pub fn downsample_lttb(points: &[NormalizedPoint], target_points: usize) -> Vec<NormalizedPoint> {
    let n = points.len();

    if n <= target_points || target_points < 3 {
        return points.to_vec();
    }

    let mut result = Vec::with_capacity(target_points);

    // Always include first point
    result.push(points[0]);

    let bucket_size = (n - 2) as f64 / (target_points - 2) as f64;
    let mut a_index = 0usize;

    for i in 0..(target_points - 2) {
        let bucket_start = ((i as f64 + 1.0) * bucket_size).floor() as usize + 1;
        let bucket_end = ((((i + 2) as f64) * bucket_size).floor() as usize + 1).min(n - 1);

        // Average of the next bucket is the third triangle vertex
        let next_start = bucket_end;
        let next_end = ((((i + 3) as f64) * bucket_size).floor() as usize + 1).min(n);
        let (avg_x, avg_y) = if next_start < next_end {
            let count = (next_end - next_start) as f64;
            let (sx, sy) = points[next_start..next_end]
                .iter()
                .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
            (sx / count, sy / count)
        } else {
            (points[n - 1].x, points[n - 1].y)
        };

        let a = points[a_index];
        let mut max_area = -1.0f64;
        let mut max_index = bucket_start;

        for (j, p) in points.iter().enumerate().take(bucket_end).skip(bucket_start) {
            let area = ((a.x - avg_x) * (p.y - a.y) - (a.x - p.x) * (avg_y - a.y)).abs();
            if area > max_area {
                max_area = area;
                max_index = j;
            }
        }

        result.push(points[max_index]);
        a_index = max_index;
    }

    // Always include last point
    result.push(points[n - 1]);

    result
}

fn is_finite(p: &NormalizedPoint) -> bool {
    p.x.is_finite() && p.y.is_finite()
}

/// Split a series into its finite stretches
pub fn finite_segments(points: &[NormalizedPoint]) -> Vec<&[NormalizedPoint]> {
    points
        .split(|p| !is_finite(p))
        .filter(|segment| !segment.is_empty())
        .collect()
}

/// Downsample a series to at most `target_points`, keeping gaps.
///
/// Returns the finite stretches; each one becomes its own path. Every stretch
/// keeps its endpoints and the rest of the budget is shared by length. When
/// there are more stretches than the budget can give two points each, an
/// evenly spaced subset of them is drawn.
pub fn downsample_segments(points: &[NormalizedPoint], target_points: usize) -> Vec<Vec<NormalizedPoint>> {
    let segments = finite_segments(points);
    let finite: usize = segments.iter().map(|s| s.len()).sum();

    if finite <= target_points {
        return segments.into_iter().map(<[NormalizedPoint]>::to_vec).collect();
    }

    let max_segments = (target_points / 2).max(1);
    let stride = segments.len().div_ceil(max_segments).max(1);
    let kept: Vec<&[NormalizedPoint]> = segments.into_iter().step_by(stride).collect();
    let kept_points: usize = kept.iter().map(|s| s.len()).sum();
    if kept_points <= target_points {
        return kept.into_iter().map(<[NormalizedPoint]>::to_vec).collect();
    }

    let base = |s: &[NormalizedPoint]| s.len().min(2);
    let base_total: usize = kept.iter().map(|s| base(s)).sum();
    let spare = target_points.saturating_sub(base_total);
    let rest: usize = kept.iter().map(|s| s.len() - base(s)).sum();

    kept.into_iter()
        .map(|segment| {
            let extra = if rest == 0 {
                0
            } else {
                (segment.len() - base(segment)) * spare / rest
            };
            let share = base(segment) + extra;
            match share {
                _ if share >= segment.len() => segment.to_vec(),
                0 | 1 => segment[..1].to_vec(),
                2 => vec![segment[0], segment[segment.len() - 1]],
                _ => downsample_lttb(segment, share),
            }
        })
        .collect()
}
