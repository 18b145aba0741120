use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::chart::range::{Range, RANGES};
use crate::chart::scale::{format_date, grid_levels, is_up, x_labels, y_domain};
use crate::data::types::ProbPoint;
use crate::ui::list::{fmt_thousands, DIM, DOWN_COLOR, UP_COLOR};

/// What the headline shows: the hovered point while a hover is active,
/// otherwise the latest visible point.
#[derive(Debug, PartialEq, Eq)]
pub struct Headline {
    pub value: String,
    pub delta: String,
    pub context: String,
    pub up: bool,
}

pub fn headline(visible: &[ProbPoint], hover: Option<usize>, range: Range) -> Headline {
    let hovered = hover.and_then(|i| visible.get(i));
    let display = hovered.or(visible.last());
    let first = visible.first();

    let value = display
        .map(|p| format!("{}%", p.p))
        .unwrap_or_else(|| "--".to_string());

    let delta = match (display, first) {
        (Some(d), Some(f)) => f64::from(d.p) - f64::from(f.p),
        _ => 0.0,
    };
    let delta_text = format!("{}{:.1} pp", if delta >= 0.0 { "+" } else { "" }, delta);

    let context = match hovered {
        Some(p) => format_date(p.t),
        None => match range {
            Range::All => "all time".to_string(),
            other => other.label().to_string(),
        },
    };

    Headline {
        value,
        delta: delta_text,
        context,
        up: is_up(visible),
    }
}

pub fn render(frame: &mut Frame, area: Rect, app: &mut App) {
    let Some(market) = app.selected_market().cloned() else {
        return;
    };
    let visible = app.visible_points();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // back bar
            Constraint::Length(2), // question
            Constraint::Length(2), // headline
            Constraint::Min(8),    // chart
            Constraint::Length(1), // range pills
            Constraint::Length(6), // stats grid
            Constraint::Length(1), // trade link
        ])
        .split(area);

    let back = Paragraph::new(Line::from(vec![
        Span::styled("‹ Markets", Style::default().fg(Color::Blue)),
        Span::styled("  (Esc)", Style::default().fg(DIM)),
        Span::styled(format!("   {}", market.slug), Style::default().fg(DIM)),
    ]));
    frame.render_widget(back, chunks[0]);

    let question = Paragraph::new(market.question.clone())
        .style(Style::default().add_modifier(Modifier::BOLD))
        .wrap(Wrap { trim: true });
    frame.render_widget(question, chunks[1]);

    let head = headline(&visible, app.detail.hover, app.detail.range);
    let color = if head.up { UP_COLOR } else { DOWN_COLOR };
    let head_widget = Paragraph::new(vec![
        Line::from(Span::styled(
            head.value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled(
                head.delta.clone(),
                Style::default().fg(if head.delta.starts_with('+') {
                    UP_COLOR
                } else {
                    DOWN_COLOR
                }),
            ),
            Span::styled(format!(" · {}", head.context), Style::default().fg(DIM)),
        ]),
    ]);
    frame.render_widget(head_widget, chunks[2]);

    render_chart(frame, chunks[3], app, &visible, color);
    render_range_pills(frame, chunks[4], app.detail.range);
    render_stats(frame, chunks[5], app);

    let trade = Paragraph::new(Line::from(Span::styled(
        format!("Trade on Manifold → {}", market.url),
        Style::default().fg(Color::Blue),
    )));
    frame.render_widget(trade, chunks[6]);
}

fn render_chart(
    frame: &mut Frame,
    area: Rect,
    app: &mut App,
    visible: &[ProbPoint],
    color: Color,
) {
    if visible.len() < 2 {
        app.detail.plot_area = None;
        let empty = Paragraph::new("No history")
            .alignment(Alignment::Center)
            .style(Style::default().fg(DIM));
        frame.render_widget(empty, area);
        return;
    }

    let (y_min, y_max) = y_domain(visible);
    let x_max = (visible.len() - 1) as f64;

    // Index-linear x positions, matching the hover inverse mapping.
    let line: Vec<(f64, f64)> = visible
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, f64::from(p.p)))
        .collect();

    let guide;
    let marker;
    let mut datasets = vec![Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(color))
        .data(&line)];

    if let Some(hovered) = app.detail.hover.and_then(|i| visible.get(i).map(|p| (i, *p))) {
        let x = hovered.0 as f64;
        guide = [(x, y_min), (x, y_max)];
        marker = [(x, f64::from(hovered.1.p))];
        datasets.push(
            Dataset::default()
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(DIM))
                .data(&guide),
        );
        datasets.push(
            Dataset::default()
                .marker(symbols::Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
                .data(&marker),
        );
    }

    let y_label_texts: Vec<String> = grid_levels(y_min, y_max)
        .into_iter()
        .map(|v| format!("{}%", v))
        .collect();
    let y_label_width = y_label_texts.iter().map(String::len).max().unwrap_or(0) as u16;
    let y_axis_labels: Vec<Span> = y_label_texts
        .iter()
        .map(|t| Span::styled(t.clone(), Style::default().fg(DIM)))
        .collect();
    let x_axis_labels: Vec<Span> = x_labels(visible)
        .into_iter()
        .map(|l| Span::styled(l.text, Style::default().fg(DIM)))
        .collect();

    let chart = Chart::new(datasets)
        .block(Block::default().borders(Borders::NONE))
        .x_axis(
            Axis::default()
                .bounds([0.0, x_max])
                .labels(x_axis_labels),
        )
        .y_axis(
            Axis::default()
                .bounds([y_min, y_max])
                .labels(y_axis_labels),
        );
    frame.render_widget(chart, area);

    // Approximate inner plot rect (axis labels on the left, x labels on the
    // bottom) for mapping mouse positions back to indices.
    let left = y_label_width + 1;
    app.detail.plot_area = Some(Rect {
        x: area.x + left,
        y: area.y,
        width: area.width.saturating_sub(left),
        height: area.height.saturating_sub(2),
    });
}

fn render_range_pills(frame: &mut Frame, area: Rect, active: Range) {
    let mut spans = Vec::with_capacity(RANGES.len() * 2);
    for range in RANGES {
        let style = if range == active {
            Style::default()
                .fg(Color::White)
                .bg(Color::Rgb(44, 44, 46))
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(DIM)
        };
        spans.push(Span::styled(format!(" {} ", range.label()), style));
        spans.push(Span::raw(" "));
    }
    let pills = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
    frame.render_widget(pills, area);
}

fn render_stats(frame: &mut Frame, area: Rect, app: &App) {
    let Some(market) = app.selected_market() else {
        return;
    };
    let full_len = app.series_for(&market.id).len();
    let pct = market.percent();

    let cards: [(&str, String, Option<Color>); 6] = [
        (
            "Probability",
            format!("{}%", pct),
            Some(if pct >= 50 { UP_COLOR } else { DOWN_COLOR }),
        ),
        (
            "Volume",
            format!("${}", fmt_thousands(market.volume.round().max(0.0) as u64)),
            None,
        ),
        ("Traders", fmt_thousands(market.unique_bettor_count), None),
        ("Bets", fmt_thousands(full_len as u64), None),
        (
            "Closes",
            market
                .close_time
                .map(format_date)
                .unwrap_or_else(|| "N/A".to_string()),
            None,
        ),
        ("Created", format_date(market.created_time), None),
    ];

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2); 3])
        .split(area);

    for (row_idx, row_area) in rows.iter().enumerate() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(*row_area);
        for (col_idx, col_area) in cols.iter().enumerate() {
            let (label, value, color) = &cards[row_idx * 2 + col_idx];
            let card = Paragraph::new(vec![
                Line::from(Span::styled(*label, Style::default().fg(DIM))),
                Line::from(Span::styled(
                    value.clone(),
                    Style::default()
                        .fg((*color).unwrap_or(Color::White))
                        .add_modifier(Modifier::BOLD),
                )),
            ]);
            frame.render_widget(card, *col_area);
        }
    }
}
