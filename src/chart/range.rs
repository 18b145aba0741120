use crate::data::types::ProbPoint;

const DAY_MS: i64 = 86_400_000;

/// Lookback window selecting which part of a series is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Range {
    OneDay,
    OneWeek,
    OneMonth,
    ThreeMonths,
    OneYear,
    All,
}

/// Narrowest-first, matching the order the UI presents the pills in.
pub const RANGES: [Range; 6] = [
    Range::OneDay,
    Range::OneWeek,
    Range::OneMonth,
    Range::ThreeMonths,
    Range::OneYear,
    Range::All,
];

impl Range {
    /// Window size in ms; `None` means unbounded.
    pub fn window_ms(self) -> Option<i64> {
        match self {
            Range::OneDay => Some(DAY_MS),
            Range::OneWeek => Some(7 * DAY_MS),
            Range::OneMonth => Some(30 * DAY_MS),
            Range::ThreeMonths => Some(90 * DAY_MS),
            Range::OneYear => Some(365 * DAY_MS),
            Range::All => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Range::OneDay => "1D",
            Range::OneWeek => "1W",
            Range::OneMonth => "1M",
            Range::ThreeMonths => "3M",
            Range::OneYear => "1Y",
            Range::All => "ALL",
        }
    }

    /// One notch narrower (zoom in); saturates at 1D.
    pub fn narrower(self) -> Range {
        let idx = self.index();
        if idx == 0 {
            self
        } else {
            RANGES[idx - 1]
        }
    }

    /// One notch wider (zoom out); saturates at ALL.
    pub fn wider(self) -> Range {
        let idx = self.index();
        if idx + 1 >= RANGES.len() {
            self
        } else {
            RANGES[idx + 1]
        }
    }

    fn index(self) -> usize {
        RANGES.iter().position(|r| *r == self).unwrap_or(0)
    }
}

/// Restrict a series to the selected lookback window.
///
/// Keeps points with `t >= now - window`. A filtered result with fewer than
/// 2 points is not renderable as a line, so the full series is returned
/// instead. `All` applies no filter.
pub fn filter_range(series: &[ProbPoint], range: Range, now_ms: i64) -> Vec<ProbPoint> {
    let Some(window) = range.window_ms() else {
        return series.to_vec();
    };

    let cutoff = now_ms - window;
    let filtered: Vec<ProbPoint> = series.iter().copied().filter(|p| p.t >= cutoff).collect();

    if filtered.len() >= 2 {
        filtered
    } else {
        series.to_vec()
    }
}
