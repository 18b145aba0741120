use chrono::{DateTime, Utc};

use crate::data::types::ProbPoint;

/// Upper bound on points handed to the renderer for the full chart.
pub const CHART_MAX_POINTS: usize = 400;

/// Visual decimation by uniform stride: slot `i` takes the source point at
/// `floor(i * len / max)`. Not an aggregation; no averaging or min/max
/// bucketing. When `len` is not a multiple of `max` the last source point
/// can fall between strides and be omitted; that is the intended behavior.
pub fn downsample(pts: &[ProbPoint], max: usize) -> Vec<ProbPoint> {
    if pts.len() <= max || max == 0 {
        return pts.to_vec();
    }
    let step = pts.len() as f64 / max as f64;
    (0..max)
        .map(|i| pts[(i as f64 * step).floor() as usize])
        .collect()
}

/// Vertical domain for the visible points: min/max padded by 15% of the
/// span, clamped to [0, 100]. A flat series pads a fixed 10 pp each side so
/// the domain never collapses to zero height.
pub fn y_domain(visible: &[ProbPoint]) -> (f64, f64) {
    if visible.is_empty() {
        return (0.0, 100.0);
    }
    let min_p = visible.iter().map(|p| p.p).min().unwrap_or(0) as f64;
    let max_p = visible.iter().map(|p| p.p).max().unwrap_or(100) as f64;
    let span = max_p - min_p;
    let pad = if span > 0.0 { span * 0.15 } else { 10.0 };
    ((min_p - pad).max(0.0), (max_p + pad).min(100.0))
}

/// Gridline levels: the fixed probability levels that fall inside the
/// padded visible domain (with a 5 pp tolerance at each edge).
pub fn grid_levels(y_min: f64, y_max: f64) -> Vec<u8> {
    [0u8, 25, 50, 75, 100]
        .into_iter()
        .filter(|&v| f64::from(v) >= y_min - 5.0 && f64::from(v) <= y_max + 5.0)
        .collect()
}

/// Up iff the last visible value is >= the first; ties count as up.
pub fn is_up(visible: &[ProbPoint]) -> bool {
    match (visible.first(), visible.last()) {
        (Some(first), Some(last)) => last.p >= first.p,
        _ => true,
    }
}

/// Inverse of the horizontal scale: map a pixel offset inside the plot back
/// to the nearest point index, clamped to the valid range.
pub fn hover_index(offset_x: f64, plot_width: f64, len: usize) -> Option<usize> {
    if len == 0 || plot_width <= 0.0 {
        return None;
    }
    let max_idx = (len - 1) as f64;
    let idx = (offset_x / plot_width * max_idx).round();
    Some(idx.clamp(0.0, max_idx) as usize)
}

/// Horizontal label anchoring within the plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

/// A time label pinned to a visible point index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XLabel {
    pub index: usize,
    pub text: String,
    pub anchor: Anchor,
}

/// Three time labels at the first, middle, and last visible indices.
pub fn x_labels(visible: &[ProbPoint]) -> Vec<XLabel> {
    if visible.len() < 2 {
        return Vec::new();
    }
    let indices = [0, visible.len() / 2, visible.len() - 1];
    let anchors = [Anchor::Start, Anchor::Middle, Anchor::End];
    indices
        .iter()
        .zip(anchors)
        .map(|(&index, anchor)| XLabel {
            index,
            text: format_day(visible[index].t),
            anchor,
        })
        .collect()
}

/// "Mar 5" style label for an ms-epoch timestamp.
pub fn format_day(t_ms: i64) -> String {
    match DateTime::<Utc>::from_timestamp_millis(t_ms) {
        Some(dt) => dt.format("%b %-d").to_string(),
        None => "—".to_string(),
    }
}

/// "Mar 5, 2026" style label, used by the hover headline.
pub fn format_date(t_ms: i64) -> String {
    match DateTime::<Utc>::from_timestamp_millis(t_ms) {
        Some(dt) => dt.format("%b %-d, %Y").to_string(),
        None => "—".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(t: i64, p: u8) -> ProbPoint {
        ProbPoint { t, p }
    }

    fn run(len: usize) -> Vec<ProbPoint> {
        (0..len as i64).map(|i| pt(i, (i % 100) as u8)).collect()
    }

    #[test]
    fn test_downsample_identity_when_short() {
        let pts = run(10);
        assert_eq!(downsample(&pts, 10), pts);
        assert_eq!(downsample(&pts, 400), pts);
    }

    #[test]
    fn test_downsample_exact_length_and_first_point() {
        let pts = run(1000);
        let out = downsample(&pts, 400);
        assert_eq!(out.len(), 400);
        assert_eq!(out[0], pts[0]);
    }

    #[test]
    fn test_downsample_may_omit_final_point() {
        // 7 points into 3 slots: indices floor(0*7/3)=0, floor(1*7/3)=2,
        // floor(2*7/3)=4 — the last source point (index 6) is skipped.
        let pts = run(7);
        let out = downsample(&pts, 3);
        assert_eq!(
            out.iter().map(|p| p.t).collect::<Vec<_>>(),
            vec![0, 2, 4]
        );
    }

    #[test]
    fn test_y_domain_pads_by_fifteen_percent() {
        let pts = vec![pt(0, 20), pt(1, 60)];
        let (lo, hi) = y_domain(&pts);
        assert!((lo - 14.0).abs() < 1e-9);
        assert!((hi - 66.0).abs() < 1e-9);
    }

    #[test]
    fn test_flat_series_domain_spans_twenty_points() {
        let pts = vec![pt(0, 40), pt(1, 40), pt(2, 40)];
        let (lo, hi) = y_domain(&pts);
        assert!((lo - 30.0).abs() < 1e-9);
        assert!((hi - 50.0).abs() < 1e-9);
        assert!(hi - lo >= 20.0);
    }

    #[test]
    fn test_y_domain_clamped_to_percent_bounds() {
        let pts = vec![pt(0, 2), pt(1, 98)];
        let (lo, hi) = y_domain(&pts);
        assert_eq!(lo, 0.0);
        assert_eq!(hi, 100.0);
    }

    #[test]
    fn test_grid_levels_follow_domain() {
        assert_eq!(grid_levels(0.0, 100.0), vec![0, 25, 50, 75, 100]);
        assert_eq!(grid_levels(30.0, 50.0), vec![25, 50]);
        assert_eq!(grid_levels(47.0, 53.0), vec![50]);
    }

    #[test]
    fn test_tie_classifies_as_up() {
        let pts = vec![pt(0, 30), pt(1, 30)];
        assert!(is_up(&pts));
        assert!(!is_up(&[pt(0, 31), pt(1, 30)]));
    }

    #[test]
    fn test_hover_index_round_trip_and_clamp() {
        // 5 points across a 100-cell plot: every quarter is one index.
        assert_eq!(hover_index(0.0, 100.0, 5), Some(0));
        assert_eq!(hover_index(50.0, 100.0, 5), Some(2));
        assert_eq!(hover_index(100.0, 100.0, 5), Some(4));
        assert_eq!(hover_index(-20.0, 100.0, 5), Some(0));
        assert_eq!(hover_index(500.0, 100.0, 5), Some(4));
        assert_eq!(hover_index(10.0, 100.0, 0), None);
    }

    #[test]
    fn test_three_x_labels_at_first_middle_last() {
        let pts = run(11);
        let labels = x_labels(&pts);
        assert_eq!(labels.len(), 3);
        assert_eq!(labels[0].index, 0);
        assert_eq!(labels[1].index, 5);
        assert_eq!(labels[2].index, 10);
        assert_eq!(labels[0].anchor, Anchor::Start);
        assert_eq!(labels[2].anchor, Anchor::End);
    }

    #[test]
    fn test_format_day() {
        // 2026-03-05T00:00:00Z
        assert_eq!(format_day(1_772_668_800_000), "Mar 5");
    }
}
