use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use ratatui::Frame;

use crate::error::Result;
use crate::fmt::rupees;

pub const ACCENT: Color = Color::Rgb(249, 115, 22);

pub const HEADER_STYLE: Style = Style::new().fg(ACCENT).add_modifier(Modifier::BOLD);

pub const FOOTER_STYLE: Style = Style::new().fg(Color::DarkGray);

pub const TOTAL_STYLE: Style = Style::new()
    .fg(Color::Rgb(80, 220, 100))
    .add_modifier(Modifier::BOLD);
pub const SPEND_STYLE: Style = Style::new().fg(Color::Red);

pub const SELECTED_STYLE: Style = Style::new()
    .fg(Color::White)
    .bg(ACCENT)
    .add_modifier(Modifier::BOLD);

pub const FOCUS_STYLE: Style = Style::new().fg(ACCENT);

pub const ERROR_STYLE: Style = Style::new().fg(Color::Yellow);

/// An expense amount rendered in the spend color.
pub fn money_span(amount: u64) -> Span<'static> {
    Span::styled(rupees(amount), SPEND_STYLE)
}

/// Parse a `#RRGGBB` category color. Anything else falls back to gray.
pub fn hex_color(hex: &str) -> Color {
    let parse = |range: std::ops::Range<usize>| {
        hex.get(range).and_then(|s| u8::from_str_radix(s, 16).ok())
    };
    match (hex.strip_prefix('#').map(str::len), parse(1..3), parse(3..5), parse(5..7)) {
        (Some(6), Some(r), Some(g), Some(b)) => Color::Rgb(r, g, b),
        _ => Color::Gray,
    }
}

/// Wrap text to a given width. Returns (wrapped_string, line_count).
pub fn wrap_text(text: &str, width: usize) -> (String, u16) {
    if width == 0 {
        return (text.to_string(), 1);
    }
    let wrapped = textwrap::fill(text, width);
    let lines = wrapped.lines().count().max(1) as u16;
    (wrapped, lines)
}

// ---------------------------------------------------------------------------
// Screen infrastructure
// ---------------------------------------------------------------------------

pub enum ScreenAction {
    Continue,
    Quit,
}

pub trait Screen {
    fn draw(&mut self, frame: &mut Frame);
    fn handle_key(&mut self, code: KeyCode) -> ScreenAction;
}

/// Run an interactive ratatui screen. Sets up the terminal, event loop,
/// and panic hook, then restores the terminal on exit.
pub fn run_screen(screen: &mut dyn Screen) -> Result<()> {
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        ratatui::restore();
        hook(info);
    }));

    let mut terminal = ratatui::init();

    let result: Result<()> = loop {
        if let Err(e) = terminal.draw(|frame| screen.draw(frame)) {
            break Err(e.into());
        }

        match event::read() {
            Err(e) => break Err(e.into()),
            Ok(Event::Key(key)) => {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if key.modifiers.contains(KeyModifiers::CONTROL)
                    && key.code == KeyCode::Char('c')
                {
                    break Ok(());
                }
                match screen.handle_key(key.code) {
                    ScreenAction::Quit => break Ok(()),
                    ScreenAction::Continue => {}
                }
            }
            _ => {}
        }
    };

    drop(terminal);
    ratatui::restore();
    result
}
