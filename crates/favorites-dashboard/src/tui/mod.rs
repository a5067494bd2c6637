//! Terminal rendering of the grid view model.
//!
//! [`GridWidget`] draws a [`GridView`] with ratatui; [`render_lines`] turns
//! the result into plain text for the `favd render` command.

pub mod grid;

#[cfg(test)]
pub mod test_utils;

pub use grid::{GridWidget, Palette, CELL_HEIGHT};

use crate::render::GridView;
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

/// Draws `view` into a buffer `width` columns wide and as tall as needed.
pub fn render_buffer(view: &GridView, width: u16) -> Buffer {
    let widget = GridWidget::new(view);
    let area = Rect::new(0, 0, width, widget.required_height().max(1));
    let mut buffer = Buffer::empty(area);
    widget.render(area, &mut buffer);
    buffer
}

/// Draws `view` and returns its rows with trailing blanks trimmed.
pub fn render_lines(view: &GridView, width: u16) -> Vec<String> {
    let buffer = render_buffer(view, width);
    let area = buffer.area;
    (0..area.height)
        .map(|row| {
            let line: String = (0..area.width)
                .map(|col| buffer.cell((col, row)).map_or(" ", |c| c.symbol()))
                .collect();
            line.trim_end().to_string()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridConfig;
    use crate::test_utils::sample_home;

    #[test]
    fn render_lines_fits_every_item() {
        let home = sample_home();
        let view = GridView::build(&home.user_favorites(), Some(&home), &GridConfig::default());
        let lines = render_lines(&view, 50);
        assert_eq!(lines.len(), 1 + 2 * usize::from(CELL_HEIGHT));
        assert!(lines[0].starts_with("Favorites"));
        for name in ["Kitchen", "Living room", "Blind"] {
            assert!(lines.iter().any(|l| l.contains(name)), "missing {}", name);
        }
        assert!(lines.iter().all(|l| !l.ends_with(' ')));
    }

    #[test]
    fn render_buffer_handles_empty_view() {
        let config = GridConfig {
            title: String::new(),
            show_empty_message: false,
            ..GridConfig::default()
        };
        let view = GridView::build(&[], None, &config);
        let buffer = render_buffer(&view, 10);
        assert_eq!(buffer.area.height, 1);
    }
}
