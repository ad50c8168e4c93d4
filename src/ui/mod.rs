use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::block::Title;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;
use time::{macros::format_description, OffsetDateTime, UtcOffset};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::app::state::AppState;
use crate::config::{ClockStyle, Palette, ThemeRegistry};
use crate::store::{Note, NoteId};

const DELETE_HINT: &str = "Double-click to delete";
const PLACEHOLDER: &str = "Start writing your note here...";
const ADD_BUTTON_WIDTH: u16 = 7;
const ADD_BUTTON_HEIGHT: u16 = 3;

/// Screen regions produced by the last render, used to route mouse gestures.
#[derive(Debug, Clone, Default)]
pub struct ViewLayout {
    pub columns: usize,
    pub cards: Vec<(NoteId, Rect)>,
    pub add_button: Option<Rect>,
    pub modal: Option<ModalLayout>,
}

#[derive(Debug, Clone, Copy)]
pub struct ModalLayout {
    pub area: Rect,
    pub close: Rect,
    pub cancel: Rect,
    pub save: Rect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hit {
    Card(NoteId),
    AddButton,
    CloseEditor,
    CancelEditor,
    SaveDraft,
    Modal,
}

impl ViewLayout {
    pub fn columns(&self) -> usize {
        self.columns.max(1)
    }

    /// Resolves a terminal cell to the control drawn there. An open modal
    /// swallows everything behind it.
    pub fn hit_test(&self, column: u16, row: u16) -> Option<Hit> {
        if let Some(modal) = &self.modal {
            if contains(modal.close, column, row) {
                return Some(Hit::CloseEditor);
            }
            if contains(modal.cancel, column, row) {
                return Some(Hit::CancelEditor);
            }
            if contains(modal.save, column, row) {
                return Some(Hit::SaveDraft);
            }
            if contains(modal.area, column, row) {
                return Some(Hit::Modal);
            }
            return None;
        }
        if let Some(button) = self.add_button {
            if contains(button, column, row) {
                return Some(Hit::AddButton);
            }
        }
        self.cards
            .iter()
            .find(|(_, rect)| contains(*rect, column, row))
            .map(|(id, _)| Hit::Card(id.clone()))
    }

    pub fn card_at(&self, column: u16, row: u16) -> Option<&NoteId> {
        if self.modal.is_some() {
            return None;
        }
        self.cards
            .iter()
            .find(|(_, rect)| contains(*rect, column, row))
            .map(|(id, _)| id)
    }
}

fn contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x && column < rect.right() && row >= rect.y && row < rect.bottom()
}

pub fn draw_app(frame: &mut Frame, state: &AppState) -> ViewLayout {
    let palette = ThemeRegistry::default().palette(state.theme);
    let area = frame.size();
    frame.render_widget(
        Block::default().style(Style::default().bg(palette.backdrop)),
        area,
    );

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(2),
        ])
        .split(area);

    render_header(frame, vertical[0], &palette);

    let (grid_area, button_bar) = split_button_bar(vertical[1]);
    let mut layout = ViewLayout::default();
    let grid = render_grid(frame, grid_area, state, &palette, &mut layout);
    render_status(frame, vertical[2], state, &palette, grid);

    if state.is_editor_open() {
        layout.modal = Some(render_modal(frame, area, state, &palette));
    } else if let Some(bar) = button_bar {
        layout.add_button = render_add_button(frame, bar);
    }
    layout
}

/// Carves a strip below the grid for the add button so it never covers a
/// card. Boards too short for both get no button bar.
fn split_button_bar(area: Rect) -> (Rect, Option<Rect>) {
    if area.height < ADD_BUTTON_HEIGHT + 3 {
        return (area, None);
    }
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(ADD_BUTTON_HEIGHT)])
        .split(area);
    (parts[0], Some(parts[1]))
}

fn render_header(frame: &mut Frame, area: Rect, palette: &Palette) {
    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            "Note App",
            Style::default()
                .fg(palette.header)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Double click on note to remove",
            Style::default().fg(palette.hint),
        )),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(header, area);
}

#[derive(Debug, Clone, Copy, Default)]
struct GridWindow {
    first_row: usize,
    shown_rows: usize,
    total_rows: usize,
}

fn render_grid(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    palette: &Palette,
    layout: &mut ViewLayout,
) -> GridWindow {
    let columns = columns_for_width(area.width, state.max_columns);
    layout.columns = columns;

    if state.is_empty() {
        let empty = Paragraph::new(Text::from(vec![
            Line::from(""),
            Line::from(Span::styled(
                "No notes yet. Press `a` or click [ + ] to write one.",
                Style::default().fg(palette.hint),
            )),
        ]))
        .alignment(Alignment::Center);
        frame.render_widget(empty, area);
        return GridWindow::default();
    }

    let column_areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, columns as u32); columns])
        .split(area);

    let card_height = state.card_height.clamp(3, area.height.max(3));
    let visible_rows = usize::from((area.height / card_height).max(1));
    let total_rows = state.len().div_ceil(columns);
    let selected_row = state.selected() / columns;
    let first_row = (selected_row + 1).saturating_sub(visible_rows);
    let shown_rows = visible_rows.min(total_rows - first_row);

    for (offset, row) in (first_row..first_row + shown_rows).enumerate() {
        let y = area.y + offset as u16 * card_height;
        let height = card_height.min(area.bottom().saturating_sub(y));
        for (col, column_area) in column_areas.iter().enumerate() {
            let index = row * columns + col;
            let Some(note) = state.store().get(index) else {
                break;
            };
            let rect = Rect {
                x: column_area.x,
                y,
                width: column_area.width.saturating_sub(1).max(1),
                height,
            };
            let selected = index == state.selected();
            let hovered = state.hovered() == Some(note.id());
            render_card(frame, rect, note, state, palette, selected, hovered);
            layout.cards.push((note.id().clone(), rect));
        }
    }

    GridWindow {
        first_row,
        shown_rows,
        total_rows,
    }
}

fn render_card(
    frame: &mut Frame,
    area: Rect,
    note: &Note,
    state: &AppState,
    palette: &Palette,
    selected: bool,
    hovered: bool,
) {
    let border_style = if selected {
        Style::default()
            .fg(palette.card_selected)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(palette.card_meta)
    };
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .style(Style::default().bg(palette.card_bg).fg(palette.card_fg))
        .title(Span::styled(
            format_timestamp(note.timestamp(), state.display_offset, state.clock),
            Style::default().fg(palette.card_meta),
        ));
    if selected || hovered {
        block = block.title(
            Title::from(Span::styled(
                DELETE_HINT,
                Style::default()
                    .fg(palette.card_meta)
                    .add_modifier(Modifier::ITALIC),
            ))
            .alignment(Alignment::Right),
        );
    }

    let body = Paragraph::new(Text::raw(note.content()))
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(Clear, area);
    frame.render_widget(body, area);
}

fn render_add_button(frame: &mut Frame, bar: Rect) -> Option<Rect> {
    if bar.width < ADD_BUTTON_WIDTH + 1 || bar.height < ADD_BUTTON_HEIGHT {
        return None;
    }
    let rect = Rect {
        x: bar.right() - ADD_BUTTON_WIDTH - 1,
        y: bar.bottom() - ADD_BUTTON_HEIGHT,
        width: ADD_BUTTON_WIDTH,
        height: ADD_BUTTON_HEIGHT,
    };
    let style = Style::default()
        .bg(Color::White)
        .fg(Color::Black)
        .add_modifier(Modifier::BOLD);
    let button = Paragraph::new("+")
        .alignment(Alignment::Center)
        .style(style)
        .block(Block::default().borders(Borders::ALL).border_style(style));
    frame.render_widget(Clear, rect);
    frame.render_widget(button, rect);
    Some(rect)
}

fn render_modal(frame: &mut Frame, screen: Rect, state: &AppState, palette: &Palette) -> ModalLayout {
    let area = modal_rect(screen);
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(Span::styled(
            " Write a Note ",
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.accent))
        .style(Style::default().bg(palette.modal_bg).fg(palette.modal_fg));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let close = Rect {
        x: area.right().saturating_sub(5),
        y: area.y,
        width: 3,
        height: 1,
    };
    frame.render_widget(
        Paragraph::new("[x]").style(
            Style::default()
                .fg(palette.modal_fg)
                .add_modifier(Modifier::BOLD),
        ),
        close,
    );

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(inner);
    render_draft_input(frame, sections[0], state, palette);

    let buttons = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(10),
            Constraint::Length(1),
            Constraint::Length(13),
        ])
        .split(sections[1]);
    let cancel = buttons[1];
    let save = buttons[3];

    let cancel_style = Style::default().fg(palette.modal_fg);
    frame.render_widget(
        Paragraph::new("Cancel")
            .alignment(Alignment::Center)
            .style(cancel_style)
            .block(Block::default().borders(Borders::ALL).border_style(cancel_style)),
        cancel,
    );

    let save_style = if state.can_save() {
        Style::default()
            .fg(palette.accent)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(palette.disabled)
            .add_modifier(Modifier::DIM)
    };
    frame.render_widget(
        Paragraph::new("Save Note")
            .alignment(Alignment::Center)
            .style(save_style)
            .block(Block::default().borders(Borders::ALL).border_style(save_style)),
        save,
    );

    ModalLayout {
        area,
        close,
        cancel,
        save,
    }
}

fn render_draft_input(frame: &mut Frame, area: Rect, state: &AppState, palette: &Palette) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.accent));
    let inner = block.inner(area);
    let draft = state.draft();

    if draft.is_empty() {
        let placeholder = Paragraph::new(Span::styled(
            PLACEHOLDER,
            Style::default().fg(palette.disabled),
        ))
        .block(block);
        frame.render_widget(placeholder, area);
        if inner.width > 0 && inner.height > 0 {
            frame.set_cursor(inner.x, inner.y);
        }
        return;
    }

    // Rows are pre-split so the caret and the text share one wrapping model.
    let (row, col) = cursor_offset(draft, state.editor().cursor(), inner.width);
    let scroll = row.saturating_sub(inner.height.saturating_sub(1));
    let rows: Vec<Line> = wrap_draft(draft, inner.width)
        .into_iter()
        .map(Line::from)
        .collect();
    let paragraph = Paragraph::new(rows).block(block).scroll((scroll, 0));
    frame.render_widget(paragraph, area);
    if inner.width > 0 && inner.height > 0 {
        let col = col.min(inner.width - 1);
        frame.set_cursor(inner.x + col, inner.y + (row - scroll));
    }
}

/// Splits `text` into rows at most `width` cells wide, breaking at hard
/// newlines and at whichever grapheme would overflow the row.
fn wrap_draft(text: &str, width: u16) -> Vec<String> {
    let width = usize::from(width.max(1));
    let mut rows = Vec::new();
    let mut current = String::new();
    let mut col = 0usize;
    for grapheme in text.graphemes(true) {
        if grapheme == "\n" || grapheme == "\r\n" {
            rows.push(std::mem::take(&mut current));
            col = 0;
            continue;
        }
        let glyph = UnicodeWidthStr::width(grapheme);
        if glyph > 0 && col + glyph > width {
            rows.push(std::mem::take(&mut current));
            col = 0;
        }
        current.push_str(grapheme);
        col += glyph;
    }
    rows.push(current);
    rows
}

/// Row and column of `cursor` within the rows produced by `wrap_draft`.
fn cursor_offset(text: &str, cursor: usize, width: u16) -> (u16, u16) {
    let width = usize::from(width.max(1));
    let mut row = 0usize;
    let mut col = 0usize;
    for grapheme in text[..cursor.min(text.len())].graphemes(true) {
        if grapheme == "\n" {
            row += 1;
            col = 0;
            continue;
        }
        let glyph = UnicodeWidthStr::width(grapheme);
        if glyph > 0 && col + glyph > width {
            row += 1;
            col = 0;
        }
        col += glyph;
    }
    if col >= width {
        row += 1;
        col = 0;
    }
    (
        u16::try_from(row).unwrap_or(u16::MAX),
        u16::try_from(col).unwrap_or(u16::MAX),
    )
}

fn render_status(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    palette: &Palette,
    grid: GridWindow,
) {
    let mut spans = vec![Span::raw(format!("Notes: {}", state.len()))];
    if grid.first_row > 0 {
        spans.push(Span::styled(" | more above", Style::default().fg(palette.hint)));
    }
    if grid.first_row + grid.shown_rows < grid.total_rows {
        spans.push(Span::styled(" | more below", Style::default().fg(palette.hint)));
    }
    if let Some(message) = state.status_message() {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(
            message.to_string(),
            Style::default().fg(palette.header),
        ));
    }

    let keys = if state.is_editor_open() {
        "Keys: type to write • Ctrl-s save • Esc cancel • Ctrl-c quit"
    } else {
        "Keys: a add • arrows/hjkl move • dd or double-click delete • q quit"
    };
    let status = Paragraph::new(vec![
        Line::from(spans),
        Line::from(Span::styled(keys, Style::default().fg(palette.hint))),
    ]);
    frame.render_widget(status, area);
}

/// Card columns for a grid `width` cells wide, never more than `max_columns`.
pub fn columns_for_width(width: u16, max_columns: u16) -> usize {
    let by_width: u16 = match width {
        0..=59 => 1,
        60..=89 => 2,
        90..=119 => 3,
        _ => 4,
    };
    usize::from(by_width.min(max_columns.max(1)))
}

pub fn format_timestamp(timestamp: OffsetDateTime, offset: UtcOffset, clock: ClockStyle) -> String {
    let local = timestamp.to_offset(offset);
    let formatted = match clock {
        ClockStyle::TwelveHour => local.format(&format_description!(
            "[month repr:short] [day padding:none], [hour repr:12]:[minute] [period]"
        )),
        ClockStyle::TwentyFourHour => local.format(&format_description!(
            "[month repr:short] [day padding:none], [hour]:[minute]"
        )),
    };
    formatted.unwrap_or_else(|_| timestamp.unix_timestamp().to_string())
}

fn modal_rect(area: Rect) -> Rect {
    if area.width < 40 || area.height < 14 {
        return area;
    }
    centered_rect(70, 60, area)
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Percentage((100 - percent_y) / 2),
                Constraint::Percentage(percent_y),
                Constraint::Percentage((100 - percent_y) / 2),
            ]
            .as_ref(),
        )
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Percentage((100 - percent_x) / 2),
                Constraint::Percentage(percent_x),
                Constraint::Percentage((100 - percent_x) / 2),
            ]
            .as_ref(),
        )
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;
    use ratatui::Terminal;
    use time::macros::datetime;

    fn state() -> AppState {
        AppState::new(&AppConfig::default(), UtcOffset::UTC)
    }

    fn buffer_text(buffer: &Buffer) -> String {
        buffer
            .content()
            .chunks(usize::from(buffer.area.width))
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn render(state: &AppState, width: u16, height: u16) -> (String, ViewLayout, Buffer) {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).expect("terminal");
        let mut layout = ViewLayout::default();
        terminal
            .draw(|frame| layout = draw_app(frame, state))
            .expect("draw");
        let buffer = terminal.backend().buffer().clone();
        (buffer_text(&buffer), layout, buffer)
    }

    fn row_of(text: &str, needle: &str) -> Option<usize> {
        text.lines().position(|line| line.contains(needle))
    }

    #[test]
    fn empty_board_shows_header_and_add_control() {
        let (text, layout, _) = render(&state(), 80, 24);
        assert!(text.contains("Note App"));
        assert!(text.contains("Double click on note to remove"));
        assert!(text.contains("No notes yet"));
        assert!(layout.cards.is_empty());
        let button = layout.add_button.expect("add button");
        assert_eq!(
            layout.hit_test(button.x + 1, button.y + 1),
            Some(Hit::AddButton)
        );
    }

    #[test]
    fn cards_render_newest_first() {
        let mut state = state();
        state.max_columns = 1;
        let first = state.add_note("first note").expect("note id");
        let second = state.add_note("second note").expect("note id");

        let (text, layout, _) = render(&state, 60, 30);

        assert_eq!(layout.cards.len(), 2);
        assert_eq!(layout.cards[0].0, second);
        assert_eq!(layout.cards[1].0, first);
        let second_row = row_of(&text, "second note").expect("second card");
        let first_row = row_of(&text, "first note").expect("first card");
        assert!(second_row < first_row);
    }

    #[test]
    fn card_preserves_line_breaks_and_shows_timestamp() {
        let mut state = state();
        state.max_columns = 1;
        state
            .store_mut()
            .add_note_at("line one\nline two", datetime!(2024-10-16 14:34 UTC));

        let (text, _, _) = render(&state, 80, 24);

        let one = row_of(&text, "line one").expect("line one");
        let two = row_of(&text, "line two").expect("line two");
        assert_eq!(two, one + 1);
        assert!(text.contains("Oct 16, 02:34 PM"));
    }

    #[test]
    fn long_words_wrap_inside_the_card() {
        let mut state = state();
        state.max_columns = 1;
        let word = "x".repeat(70);
        state.add_note(&word);

        let (text, layout, _) = render(&state, 50, 24);

        let card = layout.cards[0].1;
        assert!(card.width < 70);
        let rows_with_x = text.lines().filter(|line| line.contains("xxxx")).count();
        assert!(rows_with_x >= 2, "expected wrapped rows, got:\n{text}");
    }

    #[test]
    fn hint_follows_selection_and_hover() {
        let mut state = state();
        state.max_columns = 1;
        let older = state.add_note("older").expect("note id");
        state.add_note("newer");

        let (text, _, _) = render(&state, 80, 30);
        assert_eq!(text.matches(DELETE_HINT).count(), 1);

        state.set_hovered(Some(older));
        let (text, _, _) = render(&state, 80, 30);
        assert_eq!(text.matches(DELETE_HINT).count(), 2);
    }

    #[test]
    fn modal_replaces_add_control_and_blocks_cards() {
        let mut state = state();
        state.add_note("behind the modal");
        state.open_editor();

        let (text, layout, _) = render(&state, 100, 30);

        assert!(text.contains("Write a Note"));
        assert!(text.contains(PLACEHOLDER));
        assert!(text.contains("Save Note"));
        assert!(text.contains("Cancel"));
        assert!(layout.add_button.is_none());
        let modal = layout.modal.expect("modal layout");
        assert_eq!(
            layout.hit_test(modal.save.x + 1, modal.save.y + 1),
            Some(Hit::SaveDraft)
        );
        assert_eq!(
            layout.hit_test(modal.close.x, modal.close.y),
            Some(Hit::CloseEditor)
        );
        assert_eq!(layout.hit_test(0, 0), None);
        assert_eq!(layout.card_at(0, 4), None);
    }

    #[test]
    fn save_control_is_dimmed_until_draft_has_text() {
        let palette = ThemeRegistry::default().palette(AppConfig::default().theme);
        let mut state = state();
        state.open_editor();
        state.update_draft("   ");

        let (_, layout, buffer) = render(&state, 100, 30);
        let save = layout.modal.expect("modal").save;
        assert_eq!(buffer.get(save.x, save.y).fg, palette.disabled);

        state.update_draft("ready");
        let (text, layout, buffer) = render(&state, 100, 30);
        let save = layout.modal.expect("modal").save;
        assert_eq!(buffer.get(save.x, save.y).fg, palette.accent);
        assert!(!text.contains(PLACEHOLDER));
    }

    #[test]
    fn responsive_columns_respect_the_cap() {
        assert_eq!(columns_for_width(40, 4), 1);
        assert_eq!(columns_for_width(70, 4), 2);
        assert_eq!(columns_for_width(100, 4), 3);
        assert_eq!(columns_for_width(200, 4), 4);
        assert_eq!(columns_for_width(200, 2), 2);
        assert_eq!(columns_for_width(200, 0), 1);
    }

    #[test]
    fn grid_scrolls_to_keep_selection_visible() {
        let mut state = state();
        state.max_columns = 1;
        for i in 0..10 {
            state.add_note(&format!("note {i}"));
        }
        state.move_selection(9);

        let (text, layout, _) = render(&state, 50, 24);

        assert!(text.contains("note 0"));
        assert!(!text.contains("note 9"));
        assert!(text.contains("more above"));
        assert_eq!(
            layout.cards.last().map(|(id, _)| id),
            state.selected_note().map(Note::id)
        );
    }

    #[test]
    fn timestamps_follow_clock_style_and_offset() {
        let ts = datetime!(2024-10-16 14:34 UTC);
        assert_eq!(
            format_timestamp(ts, UtcOffset::UTC, ClockStyle::TwelveHour),
            "Oct 16, 02:34 PM"
        );
        assert_eq!(
            format_timestamp(ts, UtcOffset::UTC, ClockStyle::TwentyFourHour),
            "Oct 16, 14:34"
        );
        let eastern = UtcOffset::from_hms(-4, 0, 0).expect("offset");
        assert_eq!(
            format_timestamp(ts, eastern, ClockStyle::TwelveHour),
            "Oct 16, 10:34 AM"
        );
    }

    #[test]
    fn caret_follows_a_wrapped_second_word() -> anyhow::Result<()> {
        let mut state = state();
        state.open_editor();
        state.update_draft(&format!("{} bbbbb", "a".repeat(35)));

        let mut terminal = Terminal::new(TestBackend::new(60, 30))?;
        terminal.draw(|frame| {
            draw_app(frame, &state);
        })?;
        let (x, y) = terminal.get_cursor()?;
        let buffer = terminal.backend().buffer();

        assert_eq!(buffer.get(x - 1, y).symbol(), "b");
        assert_eq!(buffer.get(x, y).symbol(), " ");
        Ok(())
    }

    #[test]
    fn long_drafts_scroll_to_keep_the_caret_row_visible() -> anyhow::Result<()> {
        let mut state = state();
        state.open_editor();
        let lines: Vec<String> = (0..30).map(|i| format!("row {i:02}")).collect();
        state.update_draft(&lines.join("\n"));

        let mut terminal = Terminal::new(TestBackend::new(60, 30))?;
        let mut layout = ViewLayout::default();
        terminal.draw(|frame| layout = draw_app(frame, &state))?;
        let (x, y) = terminal.get_cursor()?;
        let buffer = terminal.backend().buffer().clone();
        let text = buffer_text(&buffer);

        let modal = layout.modal.expect("modal layout");
        assert!(y > modal.area.y && y < modal.area.bottom());
        assert_eq!(row_of(&text, "row 29"), Some(usize::from(y)));
        assert_eq!(buffer.get(x - 1, y).symbol(), "9");
        Ok(())
    }

    #[test]
    fn draft_rows_break_where_the_caret_does() {
        assert_eq!(wrap_draft("abcdef", 4), vec!["abcd", "ef"]);
        assert_eq!(wrap_draft("ab\ncd", 10), vec!["ab", "cd"]);
        assert_eq!(wrap_draft("aaa bb", 5), vec!["aaa b", "b"]);
        assert_eq!(cursor_offset("aaa bb", 6, 5), (1, 1));
    }

    #[test]
    fn add_button_never_covers_a_card() {
        let mut state = state();
        for i in 0..12 {
            state.add_note(&format!("note {i}"));
        }

        let (_, layout, _) = render(&state, 100, 30);

        let button = layout.add_button.expect("add button");
        assert!(!layout.cards.is_empty());
        for (id, rect) in &layout.cards {
            assert!(!rect.intersects(button), "card {id} under the add button");
            assert_eq!(
                layout.hit_test(rect.right() - 1, rect.bottom() - 1),
                Some(Hit::Card(id.clone()))
            );
        }
    }

    #[test]
    fn cursor_offset_wraps_at_box_edge() {
        assert_eq!(cursor_offset("abc", 3, 10), (0, 3));
        assert_eq!(cursor_offset("ab\ncd", 4, 10), (1, 1));
        assert_eq!(cursor_offset("abcdef", 6, 4), (1, 2));
    }
}
