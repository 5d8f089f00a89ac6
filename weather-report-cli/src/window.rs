//! Interactive terminal window: a city entry, a scrollable report pane, a
//! theme toggle and modal error dialogs.
//!
//! Key handling lives on [`WindowState`] and returns an [`Action`]; the event
//! loop turns `Action::Submit` into a fetch, so the state logic has no I/O.

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use std::{
    io::{self, Stdout},
    time::Duration,
};
use weather_report_core::{
    Config, Location, WeatherReportBuilder, render::render_text, source_from_config,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    fn toggle(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    fn base(self) -> Style {
        match self {
            Theme::Dark => Style::default().fg(Color::White).bg(Color::Black),
            Theme::Light => Style::default().fg(Color::Black).bg(Color::White),
        }
    }

    fn accent(self) -> Color {
        match self {
            Theme::Dark => Color::Cyan,
            Theme::Light => Color::Blue,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    pub title: String,
    pub message: String,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    None,
    Submit(Location),
    Quit,
}

#[derive(Debug)]
pub struct WindowState {
    pub input: String,
    pub output: String,
    pub scroll: u16,
    pub theme: Theme,
    pub dialog: Option<Dialog>,
    pub busy: bool,
}

impl Default for WindowState {
    fn default() -> Self {
        Self {
            input: String::new(),
            output: String::new(),
            scroll: 0,
            theme: Theme::Dark,
            dialog: None,
            busy: false,
        }
    }
}

impl WindowState {
    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if self.dialog.is_some() {
            if ctrl && key.code == KeyCode::Char('c') {
                return Action::Quit;
            }
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                self.dialog = None;
            }
            return Action::None;
        }

        match key.code {
            KeyCode::Char('c') if ctrl => return Action::Quit,
            KeyCode::Esc => return Action::Quit,
            KeyCode::Char('t') if ctrl => self.theme = self.theme.toggle(),
            KeyCode::F(2) => self.theme = self.theme.toggle(),
            KeyCode::Enter => match Location::parse(&self.input) {
                Ok(location) => return Action::Submit(location),
                Err(err) => self.show_error("Input Error", err.to_string()),
            },
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) if !ctrl => self.input.push(c),
            KeyCode::Up => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::Down => self.scroll = self.scroll.saturating_add(1),
            KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(10),
            KeyCode::PageDown => self.scroll = self.scroll.saturating_add(10),
            _ => {}
        }

        Action::None
    }

    /// Replace the output pane; the previous report is discarded.
    pub fn show_report(&mut self, text: String) {
        self.output = text;
        self.scroll = 0;
    }

    pub fn show_error(&mut self, title: &str, message: String) {
        self.dialog = Some(Dialog {
            title: title.to_string(),
            message,
        });
    }
}

pub async fn run(config: &Config) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, config).await;
    restore_terminal(&mut terminal)?;
    result
}

async fn event_loop(term: &mut Terminal<CrosstermBackend<Stdout>>, config: &Config) -> Result<()> {
    let mut state = WindowState::default();

    loop {
        term.draw(|f| draw(f, &state))?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match state.handle_key(key) {
            Action::Quit => break,
            Action::Submit(location) => {
                state.busy = true;
                term.draw(|f| draw(f, &state))?;

                match fetch_report_text(config, &location).await {
                    Ok(text) => state.show_report(text),
                    Err(err) => state.show_error("Error", format!("{err:#}")),
                }
                state.busy = false;
            }
            Action::None => {}
        }
    }

    Ok(())
}

/// The window shows current conditions only.
async fn fetch_report_text(config: &Config, location: &Location) -> Result<String> {
    let credential = config.credential()?;
    let source = source_from_config(config, credential);
    let report = WeatherReportBuilder::new(source.as_ref())
        .build_current_only(location)
        .await?;
    Ok(render_text(&report))
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    terminal::enable_raw_mode()?;
    let mut out = io::stdout();
    execute!(out, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(out))?;
    terminal.clear()?;
    Ok(terminal)
}

fn restore_terminal(term: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    terminal::disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    term.show_cursor()?;
    Ok(())
}

fn draw(f: &mut Frame, st: &WindowState) {
    let base = st.theme.base();
    let accent = Style::default().fg(st.theme.accent());
    let area = f.area();

    f.render_widget(Block::default().style(base), area);

    let rows = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(0),
        Constraint::Length(3),
    ])
    .split(area);

    let input = Paragraph::new(st.input.as_str()).style(base).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(accent)
            .title(" Enter city name, then press Enter "),
    );
    f.render_widget(input, rows[0]);

    f.set_cursor_position((input_cursor_x(rows[0], &st.input), rows[0].y + 1));

    let title = if st.busy {
        " Weather (fetching...) "
    } else {
        " Weather "
    };
    let output_block = Block::default()
        .borders(Borders::ALL)
        .border_style(accent)
        .title(title);
    let output = Paragraph::new(st.output.as_str())
        .style(base)
        .wrap(Wrap { trim: false })
        .scroll((st.scroll, 0))
        .block(output_block);
    f.render_widget(output, rows[1]);

    let footer = Paragraph::new(Line::from(vec![
        Span::styled("Enter", accent.add_modifier(Modifier::BOLD)),
        Span::raw(" get weather  "),
        Span::styled("↑/↓ PgUp/PgDn", accent.add_modifier(Modifier::BOLD)),
        Span::raw(" scroll  "),
        Span::styled("F2/Ctrl-T", accent.add_modifier(Modifier::BOLD)),
        Span::raw(format!(" theme ({})  ", st.theme.label())),
        Span::styled("Esc", accent.add_modifier(Modifier::BOLD)),
        Span::raw(" quit"),
    ]))
    .style(base)
    .block(Block::default().borders(Borders::ALL).border_style(accent));
    f.render_widget(footer, rows[2]);

    if let Some(dialog) = &st.dialog {
        render_dialog(f, area, dialog, base);
    }
}

/// Cursor column inside the bordered input box, clamped to its right edge.
fn input_cursor_x(area: Rect, input: &str) -> u16 {
    let typed = u16::try_from(input.chars().count()).unwrap_or(u16::MAX);
    let last = area.right().saturating_sub(2);
    area.x.saturating_add(1).saturating_add(typed).min(last)
}

fn render_dialog(f: &mut Frame, area: Rect, dialog: &Dialog, base: Style) {
    let popup = centered(area, 60, 7);
    let hint = Style::default().add_modifier(Modifier::DIM);
    let body = Paragraph::new(vec![
        Line::from(dialog.message.as_str()),
        Line::from(""),
        Line::from(Span::styled("Press Enter to close", hint)),
    ])
    .style(base)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red))
            .title(format!(" {} ", dialog.title)),
    );

    f.render_widget(Clear, popup);
    f.render_widget(body, popup);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect {
        x: area.x + (area.width - w) / 2,
        y: area.y + (area.height - h) / 2,
        width: w,
        height: h,
    }
}
