mod app;
mod chart;
mod config;
mod data;
mod ui;

use std::io;
use std::sync::Arc;

use anyhow::Result;
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyCode, KeyEvent,
        KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use app::{App, LoadOutcome, Screen};
use chart::scale::hover_index;
use chart::RANGES;
use config::Config;
use data::manifold_api::ManifoldClient;

const LOG_PATH: &str = "manifold-dash.log";

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing()?;
    tracing::info!("manifold-dash starting");

    let config = Config::load("config.toml")?;
    let client = ManifoldClient::new(config.api.base_url.clone());
    let mut app = App::new(config);

    // Kick off the initial load; the result arrives as a single message.
    // If the user quits first the send fails, which is the intended no-op.
    let (tx, mut rx) = mpsc::channel::<LoadOutcome>(1);
    let load_config = app.config.clone();
    tokio::spawn(async move {
        let outcome = app::load_dashboard(&client, &load_config).await;
        let _ = tx.send(outcome).await;
    });

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app, &mut rx).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    tracing::info!("manifold-dash exiting");
    result
}

/// The terminal owns stdout while the TUI runs, so logs go to a file.
fn init_tracing() -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(LOG_PATH)?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    rx: &mut mpsc::Receiver<LoadOutcome>,
) -> Result<()> {
    let mut events = EventStream::new();

    loop {
        terminal.draw(|frame| ui::draw(frame, app))?;

        tokio::select! {
            Some(outcome) = rx.recv() => {
                app.apply_load(outcome);
            }
            maybe_event = events.next() => {
                match maybe_event {
                    Some(Ok(event)) => {
                        if handle_event(app, event) {
                            return Ok(());
                        }
                    }
                    Some(Err(err)) => return Err(err.into()),
                    None => return Ok(()),
                }
            }
        }
    }
}

/// Returns true when the app should quit.
fn handle_event(app: &mut App, event: Event) -> bool {
    match event {
        Event::Key(key) => handle_key(app, key),
        Event::Mouse(mouse) => {
            handle_mouse(app, mouse);
            false
        }
        // Resize needs no handling: scales are remeasured every frame.
        _ => false,
    }
}

fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    // Some terminals also deliver key release events.
    if key.kind != KeyEventKind::Press {
        return false;
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    match app.screen {
        Screen::List => match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Up | KeyCode::Char('k') => app.cursor_up(),
            KeyCode::Down | KeyCode::Char('j') => app.cursor_down(),
            KeyCode::Enter => app.select_cursor(),
            _ => {}
        },
        Screen::Detail => match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => app.back_to_list(),
            KeyCode::Char(c @ '1'..='6') => {
                let idx = (c as u8 - b'1') as usize;
                app.set_range(RANGES[idx]);
            }
            KeyCode::Left => {
                let wider = app.detail.range.wider();
                app.set_range(wider);
            }
            KeyCode::Right => {
                let narrower = app.detail.range.narrower();
                app.set_range(narrower);
            }
            _ => {}
        },
    }
    false
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if app.screen != Screen::Detail {
        return;
    }
    let Some(plot) = app.detail.plot_area else {
        return;
    };
    let inside = rect_contains(plot, mouse.column, mouse.row);

    match mouse.kind {
        MouseEventKind::Moved | MouseEventKind::Drag(MouseButton::Left) => {
            if inside {
                let offset = f64::from(mouse.column - plot.x);
                let width = f64::from(plot.width.saturating_sub(1).max(1));
                app.detail.hover = hover_index(offset, width, app.visible_points().len());
            } else {
                app.detail.hover = None;
            }
        }
        // Right-button drag zooms like a pinch: the press anchor and the
        // pointer are the two contacts, so spreading them steps narrower
        // and closing them steps wider.
        MouseEventKind::Down(MouseButton::Right) if inside => {
            app.detail.pinch_anchor = Some((mouse.column, mouse.row));
            app.detail.pinch.reset();
        }
        MouseEventKind::Drag(MouseButton::Right) => {
            if let Some(anchor) = app.detail.pinch_anchor {
                let contacts = [
                    (f64::from(anchor.0), f64::from(anchor.1)),
                    (f64::from(mouse.column), f64::from(mouse.row)),
                ];
                if contacts[0] == contacts[1] {
                    // Zero reference distance cannot produce a ratio.
                } else if !app.detail.pinch.is_active() {
                    app.detail.pinch.touch_start(&contacts, app.detail.range);
                } else if let Some(next) = app.detail.pinch.touch_move(&contacts) {
                    app.set_range(next);
                }
            }
        }
        MouseEventKind::Up(MouseButton::Right) => {
            app.detail.pinch_anchor = None;
            app.detail.pinch.reset();
        }
        MouseEventKind::ScrollUp if inside => {
            let narrower = app.detail.range.narrower();
            app.set_range(narrower);
        }
        MouseEventKind::ScrollDown if inside => {
            let wider = app.detail.range.wider();
            app.set_range(wider);
        }
        _ => {}
    }
}

fn rect_contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x
        && column < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}
