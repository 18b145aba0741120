pub mod detail;
pub mod list;

use ratatui::Frame;

use crate::app::{App, Screen};

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.size();
    match app.screen {
        Screen::List => list::render(frame, area, app),
        Screen::Detail => detail::render(frame, area, app),
    }
}
