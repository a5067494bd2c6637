//! Buffer helpers for ratatui `TestBackend` assertions.

#![cfg(test)]

use crate::render::GridView;
use crate::tui::GridWidget;
use ratatui::{backend::TestBackend, buffer::Buffer, style::Color, Terminal};

/// Terminal backed by a `width` x `height` [`TestBackend`].
pub fn test_terminal(width: u16, height: u16) -> Terminal<TestBackend> {
    Terminal::new(TestBackend::new(width, height)).expect("test terminal")
}

/// Draws `view` full-screen and returns the resulting buffer.
pub fn draw_grid(view: &GridView, width: u16, height: u16) -> Buffer {
    let mut terminal = test_terminal(width, height);
    terminal
        .draw(|frame| frame.render_widget(GridWidget::new(view), frame.area()))
        .expect("draw grid");
    terminal.backend().buffer().clone()
}

/// All text of one buffer row.
pub fn row_text(buffer: &Buffer, row: u16) -> String {
    let area = buffer.area();
    if row >= area.height {
        return String::new();
    }
    (0..area.width)
        .map(|col| {
            buffer
                .cell((col, row))
                .map(|cell| cell.symbol())
                .unwrap_or(" ")
        })
        .collect()
}

/// First row containing `text`.
pub fn find_row_with_text(buffer: &Buffer, text: &str) -> Option<u16> {
    (0..buffer.area().height).find(|&row| row_text(buffer, row).contains(text))
}

/// Column of the first occurrence of `text` in `row`, counted in cells.
pub fn text_column(buffer: &Buffer, row: u16, text: &str) -> Option<u16> {
    let line = row_text(buffer, row);
    let byte = line.find(text)?;
    u16::try_from(line[..byte].chars().count()).ok()
}

/// Asserts the first character of `text` in `row` has foreground `color`.
pub fn assert_text_fg_in_row(buffer: &Buffer, row: u16, text: &str, color: Color) {
    let col = text_column(buffer, row, text).unwrap_or_else(|| {
        panic!(
            "text '{}' not found in row {}: '{}'",
            text,
            row,
            row_text(buffer, row)
        )
    });
    let cell = buffer
        .cell((col, row))
        .unwrap_or_else(|| panic!("cell at ({}, {}) does not exist", col, row));
    assert_eq!(
        cell.fg, color,
        "expected fg color {:?} at ({}, {}), got {:?}",
        color, col, row, cell.fg
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::widgets::Paragraph;

    #[test]
    fn row_text_reads_rendered_content() {
        let mut terminal = test_terminal(20, 3);
        terminal
            .draw(|frame| frame.render_widget(Paragraph::new("Hello World"), frame.area()))
            .expect("draw failed");
        let buffer = terminal.backend().buffer();
        assert!(row_text(buffer, 0).contains("Hello World"));
        assert_eq!(row_text(buffer, 7), "");
        assert_eq!(find_row_with_text(buffer, "World"), Some(0));
        assert_eq!(find_row_with_text(buffer, "Missing"), None);
    }

    #[test]
    fn text_column_counts_cells_not_bytes() {
        let mut terminal = test_terminal(20, 1);
        terminal
            .draw(|frame| frame.render_widget(Paragraph::new("│█ ok"), frame.area()))
            .expect("draw failed");
        let buffer = terminal.backend().buffer();
        assert_eq!(text_column(buffer, 0, "ok"), Some(3));
    }
}
