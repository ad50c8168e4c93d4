use std::io::Stdout;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossbeam_channel::Receiver;
use crossterm::event::{
    self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::Terminal;
use time::UtcOffset;

use crate::config::AppConfig;
use crate::store::StoreEvent;
use crate::ui::{self, Hit, ViewLayout};

pub mod actions;
pub mod editor;
pub mod state;

pub use actions::{Action, DoubleActivation};
pub use editor::{DraftEditor, EditorMode};
pub use state::AppState;

pub struct App {
    pub config: Arc<AppConfig>,
    state: AppState,
    events: Receiver<StoreEvent>,
    layout: ViewLayout,
    mouse_clicks: DoubleActivation,
    key_presses: DoubleActivation,
    should_quit: bool,
    needs_redraw: bool,
    tick_rate: Duration,
}

impl App {
    pub fn new(config: Arc<AppConfig>) -> Self {
        let offset = UtcOffset::current_local_offset().unwrap_or_else(|err| {
            tracing::warn!(?err, "local UTC offset unavailable, showing times in UTC");
            UtcOffset::UTC
        });
        Self::with_offset(config, offset)
    }

    pub fn with_offset(config: Arc<AppConfig>, offset: UtcOffset) -> Self {
        let mut state = AppState::new(&config, offset);
        let events = state.subscribe();
        let window = config.gestures.double_activation_window();
        let tick_rate = config.tick_rate();
        Self {
            config,
            state,
            events,
            layout: ViewLayout::default(),
            mouse_clicks: DoubleActivation::new(window),
            key_presses: DoubleActivation::new(window),
            should_quit: false,
            needs_redraw: true,
            tick_rate,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn run(&mut self) -> Result<()> {
        let mut terminal = setup_terminal()?;
        let result = self.event_loop(&mut terminal);
        restore_terminal(&mut terminal)?;
        result
    }

    fn event_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        loop {
            self.drain_store_events();
            if self.needs_redraw {
                self.draw(terminal)?;
            }

            if self.should_quit {
                break;
            }

            if event::poll(self.tick_rate).context("polling for terminal events")? {
                let event = event::read().context("reading terminal event")?;
                self.handle_event(event);
            }
        }
        Ok(())
    }

    fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let state = &self.state;
        let mut layout = ViewLayout::default();
        terminal
            .draw(|frame| layout = ui::draw_app(frame, state))
            .context("rendering frame")?;
        self.layout = layout;
        self.needs_redraw = false;
        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse_at(mouse, Instant::now()),
            Event::Paste(text) => {
                if self.state.editor_mut().insert_str(&text) {
                    self.needs_redraw = true;
                }
            }
            Event::Resize(_, _) => self.needs_redraw = true,
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.handle_action(Action::Quit);
            return;
        }

        if self.state.is_editor_open() {
            self.handle_editor_key(key);
            return;
        }

        let columns = self.layout.columns() as isize;
        let action = match key.code {
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Char('a') | KeyCode::Char('n') | KeyCode::Char('+') => Action::OpenEditor,
            KeyCode::Left | KeyCode::Char('h') => Action::MoveSelection(-1),
            KeyCode::Right | KeyCode::Char('l') => Action::MoveSelection(1),
            KeyCode::Up | KeyCode::Char('k') => Action::MoveSelection(-columns),
            KeyCode::Down | KeyCode::Char('j') => Action::MoveSelection(columns),
            KeyCode::Char('d') | KeyCode::Delete => {
                self.handle_delete_key(Instant::now());
                return;
            }
            KeyCode::Esc => {
                self.key_presses.reset();
                self.state.set_status_message(None::<String>);
                self.needs_redraw = true;
                return;
            }
            _ => return,
        };
        self.handle_action(action);
    }

    fn handle_delete_key(&mut self, at: Instant) {
        let Some(id) = self.state.selected_note().map(|note| note.id().clone()) else {
            return;
        };
        if self.key_presses.register(&id, at) {
            self.handle_action(Action::DeleteNote(id));
        } else {
            self.state
                .set_status_message(Some("Press d again to delete this note"));
            self.needs_redraw = true;
        }
    }

    fn handle_editor_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            if key.code == KeyCode::Char('s') {
                self.handle_action(Action::SaveDraft);
            }
            return;
        }
        if key.code == KeyCode::Esc {
            self.handle_action(Action::CancelEditor);
            return;
        }

        let editor = self.state.editor_mut();
        let changed = match key.code {
            KeyCode::Enter => editor.insert_newline(),
            KeyCode::Tab => editor.insert_char('\t'),
            KeyCode::Backspace => editor.backspace(),
            KeyCode::Delete => editor.delete(),
            KeyCode::Left => editor.move_left(),
            KeyCode::Right => editor.move_right(),
            KeyCode::Up => editor.move_up(),
            KeyCode::Down => editor.move_down(),
            KeyCode::Home => editor.move_home(),
            KeyCode::End => editor.move_end(),
            KeyCode::Char(ch)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::ALT | KeyModifiers::SUPER) =>
            {
                editor.insert_char(ch)
            }
            _ => false,
        };
        if changed {
            self.needs_redraw = true;
        }
    }

    fn handle_mouse_at(&mut self, mouse: MouseEvent, at: Instant) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                match self.layout.hit_test(mouse.column, mouse.row) {
                    Some(Hit::AddButton) => self.handle_action(Action::OpenEditor),
                    Some(Hit::CloseEditor) | Some(Hit::CancelEditor) => {
                        self.handle_action(Action::CancelEditor)
                    }
                    Some(Hit::SaveDraft) => self.handle_action(Action::SaveDraft),
                    Some(Hit::Card(id)) => {
                        if self.mouse_clicks.register(&id, at) {
                            self.handle_action(Action::DeleteNote(id));
                        } else {
                            self.handle_action(Action::SelectNote(id));
                        }
                    }
                    Some(Hit::Modal) | None => {}
                }
            }
            MouseEventKind::Moved => {
                let target = self.layout.card_at(mouse.column, mouse.row).cloned();
                self.handle_action(Action::Hover(target));
            }
            MouseEventKind::ScrollUp if !self.state.is_editor_open() => {
                let columns = self.layout.columns() as isize;
                self.handle_action(Action::MoveSelection(-columns));
            }
            MouseEventKind::ScrollDown if !self.state.is_editor_open() => {
                let columns = self.layout.columns() as isize;
                self.handle_action(Action::MoveSelection(columns));
            }
            _ => {}
        }
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => {
                self.should_quit = true;
                return;
            }
            Action::SaveDraft => {
                if self.state.apply(Action::SaveDraft) {
                    self.state.set_status_message(Some("Note saved"));
                } else if self.state.is_editor_open() {
                    self.state
                        .set_status_message(Some("Write something before saving"));
                }
                self.needs_redraw = true;
                return;
            }
            Action::CancelEditor => {
                if self.state.apply(Action::CancelEditor) {
                    self.state.set_status_message(Some("Discarded draft"));
                    self.needs_redraw = true;
                }
                return;
            }
            Action::DeleteNote(id) => {
                self.mouse_clicks.reset();
                self.key_presses.reset();
                if self.state.apply(Action::DeleteNote(id)) {
                    self.state.set_status_message(Some("Note removed"));
                    self.needs_redraw = true;
                }
                return;
            }
            Action::OpenEditor => {
                self.mouse_clicks.reset();
                self.key_presses.reset();
            }
            _ => {}
        }
        if self.state.apply(action) {
            self.needs_redraw = true;
        }
    }

    fn drain_store_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            tracing::debug!(?event, "note store changed");
            self.needs_redraw = true;
        }
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode().context("enabling raw mode")?;
    let mut stdout = std::io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )
    .context("switching to alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("creating terminal backend")?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    terminal.show_cursor().ok();
    disable_raw_mode().context("disabling raw mode")?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        DisableMouseCapture,
        LeaveAlternateScreen
    )
    .context("restoring screen state")?;
    Ok(())
}
