use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Sparkline},
    Frame,
};

use crate::app::App;
use crate::chart::scale::is_up;
use crate::data::types::{Market, ProbPoint};

pub const UP_COLOR: Color = Color::Green;
pub const DOWN_COLOR: Color = Color::Red;
pub const DIM: Color = Color::DarkGray;

/// Points per sparkline; the most recent tail of the series.
pub const SPARKLINE_POINTS: usize = 30;
const ROW_HEIGHT: u16 = 2;

/// Sparkline input: the most recent values shifted down by the visible
/// minimum (plain min-max scaling, no padding), plus the up/down
/// classification of that same window.
///
/// The widget draws one value per cell from the front of the slice, so the
/// window is capped at the rendered width as well as `SPARKLINE_POINTS`;
/// otherwise the newest points would be the ones truncated away.
pub fn sparkline_values(series: &[ProbPoint], max_points: usize) -> (Vec<u64>, bool) {
    let take = SPARKLINE_POINTS.min(max_points);
    let tail = &series[series.len().saturating_sub(take)..];
    let min = tail.iter().map(|p| p.p).min().unwrap_or(0);
    let values = tail.iter().map(|p| u64::from(p.p - min)).collect();
    (values, is_up(tail))
}

fn trend_color(up: bool) -> Color {
    if up {
        UP_COLOR
    } else {
        DOWN_COLOR
    }
}

/// Delta in percentage points between the last and first series values.
fn series_delta(series: &[ProbPoint]) -> f64 {
    match (series.first(), series.last()) {
        (Some(first), Some(last)) if series.len() >= 2 => {
            f64::from(last.p) - f64::from(first.p)
        }
        _ => 0.0,
    }
}

/// Thousands-separated integer, e.g. 1234567 -> "1,234,567".
pub fn fmt_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Length(4), // summary bar
            Constraint::Min(0),    // rows
        ])
        .split(area);

    render_header(frame, chunks[0]);
    render_summary(frame, chunks[1], app);

    if app.loading {
        let loading = Paragraph::new("Loading markets…")
            .alignment(Alignment::Center)
            .style(Style::default().fg(DIM));
        frame.render_widget(loading, chunks[2]);
        return;
    }

    render_rows(frame, chunks[2], app);
}

fn render_header(frame: &mut Frame, area: Rect) {
    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            "AGI Markets",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "● Live · Manifold Markets",
            Style::default().fg(DIM),
        )),
    ]);
    frame.render_widget(header, area);
}

fn render_summary(frame: &mut Frame, area: Rect, app: &App) {
    let avg = app.average_percent();
    let avg_span = match avg {
        Some(pct) => Span::styled(
            format!("{}%", pct),
            Style::default()
                .fg(trend_color(pct >= 50))
                .add_modifier(Modifier::BOLD),
        ),
        None => Span::styled("—", Style::default().fg(DIM)),
    };
    let count_span = if app.loading {
        Span::styled("—", Style::default().fg(DIM))
    } else {
        Span::styled(
            app.markets.len().to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )
    };

    let line = Line::from(vec![
        avg_span,
        Span::styled(" avg probability   ", Style::default().fg(DIM)),
        count_span,
        Span::styled(" markets", Style::default().fg(DIM)),
    ]);
    let summary = Paragraph::new(line)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(summary, area);
}

fn render_rows(frame: &mut Frame, area: Rect, app: &App) {
    if app.markets.is_empty() {
        let empty = Paragraph::new("No markets")
            .alignment(Alignment::Center)
            .style(Style::default().fg(DIM));
        frame.render_widget(empty, area);
        return;
    }

    let visible_rows = (area.height / ROW_HEIGHT) as usize;
    if visible_rows == 0 {
        return;
    }
    // Keep the cursor row on screen.
    let offset = app.cursor.saturating_sub(visible_rows.saturating_sub(1));

    for (slot, (idx, market)) in app
        .markets
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible_rows)
        .enumerate()
    {
        let row_area = Rect {
            x: area.x,
            y: area.y + slot as u16 * ROW_HEIGHT,
            width: area.width,
            height: ROW_HEIGHT,
        };
        render_row(frame, row_area, app, market, idx == app.cursor);
    }
}

fn render_row(frame: &mut Frame, area: Rect, app: &App, market: &Market, selected: bool) {
    let series = app.series_for(&market.id);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(20),    // question + volume
            Constraint::Length(14), // sparkline
            Constraint::Length(10), // probability + delta
        ])
        .split(area);

    let base = if selected {
        Style::default().bg(Color::Rgb(28, 28, 30))
    } else {
        Style::default()
    };

    let delta = series_delta(series);
    let text = Paragraph::new(vec![
        Line::from(Span::styled(market.question.clone(), base)),
        Line::from(Span::styled(
            format!(
                "${} · {} traders",
                fmt_thousands(market.volume.round().max(0.0) as u64),
                market.unique_bettor_count
            ),
            base.fg(DIM),
        )),
    ])
    .style(base);
    frame.render_widget(text, columns[0]);

    if series.len() >= 2 && columns[1].width > 0 {
        let (values, up) = sparkline_values(series, columns[1].width as usize);
        let spark = Sparkline::default()
            .data(&values)
            .style(base.fg(trend_color(up)));
        frame.render_widget(spark, columns[1]);
    }

    let pct = market.percent();
    let prob = Paragraph::new(vec![
        Line::from(Span::styled(
            format!("{}%", pct),
            base.fg(trend_color(pct >= 50)).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("{}{:.1}", if delta >= 0.0 { "+" } else { "" }, delta),
            base.fg(trend_color(delta >= 0.0)),
        )),
    ])
    .alignment(Alignment::Right)
    .style(base);
    frame.render_widget(prob, columns[2]);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(t: i64, p: u8) -> ProbPoint {
        ProbPoint { t, p }
    }

    #[test]
    fn test_sparkline_takes_last_thirty_points() {
        let series: Vec<ProbPoint> = (0..50).map(|i| pt(i, (30 + i % 20) as u8)).collect();
        let (values, _) = sparkline_values(&series, 30);
        assert_eq!(values.len(), 30);
    }

    #[test]
    fn test_sparkline_min_shifted() {
        let series = vec![pt(0, 40), pt(1, 45), pt(2, 42)];
        let (values, up) = sparkline_values(&series, 30);
        assert_eq!(values, vec![0, 5, 2]);
        assert!(up);
    }

    #[test]
    fn test_sparkline_downtrend() {
        let series = vec![pt(0, 60), pt(1, 55)];
        let (_, up) = sparkline_values(&series, 30);
        assert!(!up);
    }

    #[test]
    fn test_sparkline_window_capped_at_rendered_width() {
        // 16 flat points followed by 14 rising ones. A 14-cell column must
        // show the rising tail, not the flat head of the 30-point window.
        let mut series: Vec<ProbPoint> = (0..16).map(|i| pt(i, 0)).collect();
        series.extend((0..14).map(|i| pt(16 + i, (i + 1) as u8)));

        let (values, up) = sparkline_values(&series, 14);
        assert_eq!(values.len(), 14);
        assert_eq!(values, (0..14).collect::<Vec<u64>>());
        assert!(up);
    }

    #[test]
    fn test_sparkline_trend_follows_rendered_window() {
        // Down across the full 30-point tail, but rising over the last 14;
        // the color has to agree with what is actually drawn.
        let mut series: Vec<ProbPoint> = (0..16).map(|i| pt(i, 80)).collect();
        series.extend((0..14).map(|i| pt(16 + i, 40 + i as u8)));

        let (_, up_full) = sparkline_values(&series, 30);
        let (_, up_window) = sparkline_values(&series, 14);
        assert!(!up_full);
        assert!(up_window);
    }

    #[test]
    fn test_sparkline_recent_points_reach_the_widget() {
        use ratatui::{backend::TestBackend, widgets::Sparkline, Terminal};

        let mut series: Vec<ProbPoint> = (0..16).map(|i| pt(i, 0)).collect();
        series.extend((0..14).map(|i| pt(16 + i, (i + 1) as u8)));

        let backend = TestBackend::new(14, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.size();
                let (values, _) = sparkline_values(&series, area.width as usize);
                frame.render_widget(Sparkline::default().data(&values), area);
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        // The newest (maximum) value lands in the rightmost cell at full
        // height, and the rise is visible rather than a blank row.
        assert_eq!(buffer.get(13, 0).symbol(), "█");
        let drawn = (0..14)
            .filter(|&x| buffer.get(x, 0).symbol() != " ")
            .count();
        assert!(drawn >= 12);
    }

    #[test]
    fn test_fmt_thousands() {
        assert_eq!(fmt_thousands(0), "0");
        assert_eq!(fmt_thousands(999), "999");
        assert_eq!(fmt_thousands(1_000), "1,000");
        assert_eq!(fmt_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn test_series_delta() {
        let series = vec![pt(0, 60), pt(1, 65), pt(2, 73)];
        assert!((series_delta(&series) - 13.0).abs() < 1e-9);
        assert_eq!(series_delta(&[pt(0, 50)]), 0.0);
    }
}
