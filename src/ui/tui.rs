//! Ratatui-based picker wired to a [`PickerRuntime`].

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use crossterm::{ExecutableCommand, execute};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListState, Paragraph};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::UiConfig;
use crate::model::types::Asset;
use crate::provider::PhotoProvider;
use crate::runtime::{PickerEvent, PickerHost, PickerRuntime};
use crate::search::{Arrow, PickerError, PickerView, ScrollTrigger};
use crate::ui::components::theme::ThemePalette;
use crate::ui::components::widgets::{photo_item, search_bar, status_text};
use crate::ui::shortcuts;

#[derive(Serialize, Deserialize, Default, Debug, PartialEq)]
struct TuiStatePersisted {
    theme: Option<String>,
    last_query: Option<String>,
}

fn state_path_for(data_dir: &Path) -> PathBuf {
    data_dir.join("tui_state.json")
}

fn load_state(path: &Path) -> TuiStatePersisted {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or_default()
}

fn save_state(path: &Path, state: &TuiStatePersisted) {
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    if let Ok(body) = serde_json::to_string_pretty(state) {
        let _ = std::fs::write(path, body);
    }
}

pub fn footer_legend() -> String {
    format!(
        "{} select | {} move | {} page | {} clear | {} theme | {} quit",
        shortcuts::SELECT,
        shortcuts::NAVIGATE,
        shortcuts::PAGE,
        shortcuts::CLEAR_QUERY,
        shortcuts::THEME,
        shortcuts::QUIT
    )
}

/// Host side of the TUI: remembers the outcome so the loop can exit.
#[derive(Default)]
struct TuiHost {
    chosen: Option<Asset>,
    closed: bool,
}

impl PickerHost for TuiHost {
    fn on_select(&mut self, assets: Vec<Asset>) {
        self.chosen = assets.into_iter().next();
    }

    fn on_close(&mut self) {
        self.closed = true;
    }

    fn on_error(&mut self, error: &PickerError) {
        debug!(error = %error, "picker_error");
    }
}

impl TuiHost {
    fn done(&self) -> bool {
        self.closed || self.chosen.is_some()
    }
}

/// Draw one frame and return the exclusive index of the last visible row.
pub fn draw_picker(
    frame: &mut Frame,
    view: &PickerView<'_>,
    input: &str,
    palette: ThemePalette,
    list_state: &mut ListState,
) -> usize {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // search bar
            Constraint::Min(0),    // results
            Constraint::Length(1), // status
            Constraint::Length(1), // footer
        ])
        .split(frame.area());

    frame.render_widget(search_bar(input, palette, view.loading), chunks[0]);

    let items: Vec<_> = view
        .tiles()
        .map(|(photo, active)| photo_item(photo, palette, active))
        .collect();
    let title = if view.query.is_empty() {
        " Latest ".to_string()
    } else {
        format!(" Results for {:?} ", view.query)
    };
    let list = List::new(items).block(
        Block::default()
            .title(Span::styled(title, palette.title()))
            .borders(Borders::ALL)
            .border_style(palette.border_style()),
    );
    list_state.select(view.active);
    frame.render_stateful_widget(list, chunks[1], list_state);

    let (status, kind) = status_text(view);
    frame.render_widget(
        Paragraph::new(Span::styled(status, palette.status_style(kind))),
        chunks[2],
    );
    frame.render_widget(
        Paragraph::new(Span::styled(footer_legend(), palette.hint_style())),
        chunks[3],
    );

    let rows = chunks[1].height.saturating_sub(2) as usize;
    list_state.offset() + rows
}

enum KeyAction {
    Event(PickerEvent),
    Edit,
    Page(Arrow),
    ToggleTheme,
    None,
}

fn map_key(key: KeyEvent, input: &mut String) -> KeyAction {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => KeyAction::Event(PickerEvent::CloseRequested),
            KeyCode::Char('u') => {
                input.clear();
                KeyAction::Edit
            }
            _ => KeyAction::None,
        };
    }
    match key.code {
        KeyCode::Esc => KeyAction::Event(PickerEvent::CloseRequested),
        KeyCode::Enter => KeyAction::Event(PickerEvent::SelectActive),
        KeyCode::Up => KeyAction::Event(PickerEvent::ArrowKey(Arrow::Up)),
        KeyCode::Down => KeyAction::Event(PickerEvent::ArrowKey(Arrow::Down)),
        KeyCode::Left => KeyAction::Event(PickerEvent::ArrowKey(Arrow::Left)),
        KeyCode::Right => KeyAction::Event(PickerEvent::ArrowKey(Arrow::Right)),
        KeyCode::PageDown => KeyAction::Page(Arrow::Down),
        KeyCode::PageUp => KeyAction::Page(Arrow::Up),
        KeyCode::F(2) => KeyAction::ToggleTheme,
        KeyCode::Backspace => {
            if input.pop().is_some() {
                KeyAction::Edit
            } else {
                KeyAction::None
            }
        }
        KeyCode::Char(c) => {
            input.push(c);
            KeyAction::Edit
        }
        _ => KeyAction::None,
    }
}

/// Run the interactive picker. Returns the chosen asset, if any.
///
/// Must be called from within a multi-thread tokio runtime. The key poll
/// blocks, so the loop runs under `block_in_place` and fetches spawned from
/// it are driven by the other workers.
pub fn run_tui<P: PhotoProvider>(
    provider: Arc<P>,
    ui: &UiConfig,
    data_dir: &Path,
) -> Result<Option<Asset>> {
    let state_path = state_path_for(data_dir);
    let persisted = load_state(&state_path);

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let outcome = off_reactor(|| picker_loop(&mut terminal, provider, ui, &persisted));
    teardown_terminal()?;
    let (chosen, state_out) = outcome?;
    save_state(&state_path, &state_out);
    Ok(chosen)
}

/// Run a blocking front-end loop without stalling the worker it was called on.
fn off_reactor<T>(f: impl FnOnce() -> T) -> T {
    tokio::task::block_in_place(f)
}

fn picker_loop<P: PhotoProvider>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    provider: Arc<P>,
    ui: &UiConfig,
    persisted: &TuiStatePersisted,
) -> Result<(Option<Asset>, TuiStatePersisted)> {
    let tick_rate = Duration::from_millis(30);
    let mut palette = ThemePalette::for_name(persisted.theme.as_deref().unwrap_or("dark"));
    let mut input = persisted.last_query.clone().unwrap_or_default();
    let mut dirty_since = (!input.is_empty()).then(Instant::now);
    let mut list_state = ListState::default();
    let mut trigger = ScrollTrigger::new();
    let mut host = TuiHost::default();
    let mut runtime = PickerRuntime::new(provider);
    let mut page_rows = 1usize;

    runtime.activate();
    info!("tui_started");

    while !host.done() {
        runtime.drain(&mut host);
        if host.done() {
            break;
        }

        if let Some(since) = dirty_since
            && since.elapsed() >= ui.debounce
        {
            dirty_since = None;
            list_state = ListState::default();
            trigger = ScrollTrigger::new();
            runtime.handle(PickerEvent::QueryChanged(input.trim().to_string()), &mut host);
        }

        let mut visible_end = 0;
        terminal.draw(|f| {
            let view = runtime.view();
            visible_end = draw_picker(f, &view, &input, palette, &mut list_state);
        })?;
        page_rows = page_rows.max(visible_end.saturating_sub(list_state.offset()));

        let search = runtime.search();
        if !search.is_exhausted()
            && trigger.fire(
                visible_end,
                search.photos().len(),
                ui.scroll_threshold,
                search.last_error().is_some(),
            )
        {
            runtime.handle(PickerEvent::ScrollThresholdReached, &mut host);
        }

        if event::poll(tick_rate)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            trigger.rearm();
            match map_key(key, &mut input) {
                KeyAction::Event(ev) => runtime.handle(ev, &mut host),
                KeyAction::Edit => dirty_since = Some(Instant::now()),
                KeyAction::Page(arrow) => {
                    for _ in 0..page_rows {
                        runtime.handle(PickerEvent::ArrowKey(arrow), &mut host);
                    }
                }
                KeyAction::ToggleTheme => palette = palette.toggled(),
                KeyAction::None => {}
            }
        }
    }

    runtime.shutdown();
    let state_out = TuiStatePersisted {
        theme: Some(palette.name().to_string()),
        last_query: Some(input),
    };
    Ok((host.chosen, state_out))
}

fn teardown_terminal() -> Result<()> {
    let mut stdout = io::stdout();
    disable_raw_mode()?;
    execute!(stdout, LeaveAlternateScreen)?;
    Ok(())
}
