//! Grid widget: header plus one bordered cell per favorite.

use crate::config::Theme;
use crate::render::{ClimateView, CoverView, GridBody, GridView, ItemKind, ItemView};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};

/// Rows taken by one cell, borders included.
pub const CELL_HEIGHT: u16 = 5;

/// Width of the cover position gauge.
const GAUGE_WIDTH: usize = 10;

/// Colours of one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Header title.
    pub title: Color,
    /// Active items.
    pub on: Color,
    /// Inactive items.
    pub off: Color,
    /// Cell borders.
    pub border: Color,
    /// Drop target and glow highlight.
    pub highlight: Color,
}

impl Palette {
    /// Palette for `theme`.
    pub fn of(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                title: Color::Cyan,
                on: Color::Yellow,
                off: Color::DarkGray,
                border: Color::Gray,
                highlight: Color::LightYellow,
            },
            Theme::Light => Self {
                title: Color::Blue,
                on: Color::Rgb(0xd9, 0x77, 0x06),
                off: Color::Gray,
                border: Color::DarkGray,
                highlight: Color::Magenta,
            },
            Theme::Glass => Self {
                title: Color::White,
                on: Color::LightYellow,
                off: Color::Gray,
                border: Color::White,
                highlight: Color::LightCyan,
            },
            Theme::Midnight => Self {
                title: Color::LightBlue,
                on: Color::LightMagenta,
                off: Color::DarkGray,
                border: Color::Blue,
                highlight: Color::LightCyan,
            },
        }
    }
}

/// Renders a [`GridView`] into a buffer.
#[derive(Debug, Clone, Copy)]
pub struct GridWidget<'a> {
    view: &'a GridView,
}

impl<'a> GridWidget<'a> {
    /// Widget drawing `view`.
    pub fn new(view: &'a GridView) -> Self {
        Self { view }
    }

    /// Rows needed to draw the whole view.
    pub fn required_height(&self) -> u16 {
        let header = u16::from(self.view.header.is_some());
        let body = match &self.view.body {
            GridBody::Empty { .. } => 1,
            GridBody::Items(items) => {
                let columns = usize::from(self.view.columns.max(1));
                let rows = items.len().div_ceil(columns);
                u16::try_from(rows)
                    .unwrap_or(u16::MAX)
                    .saturating_mul(CELL_HEIGHT)
            }
        };
        header.saturating_add(body)
    }
}

impl Widget for GridWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let palette = Palette::of(self.view.theme);
        let mut body = area;

        if let Some(header) = &self.view.header {
            let [title, rest] =
                Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);
            let padding = usize::from(title.width)
                .saturating_sub(header.title.chars().count() + header.count_label.len());
            Paragraph::new(Line::from(vec![
                Span::styled(
                    header.title.as_str(),
                    Style::default()
                        .fg(palette.title)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(" ".repeat(padding)),
                Span::styled(
                    header.count_label.as_str(),
                    Style::default().fg(palette.off),
                ),
            ]))
            .render(title, buf);
            body = rest;
        }

        match &self.view.body {
            GridBody::Empty { message } => {
                Paragraph::new(message.as_str())
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(palette.off))
                    .render(body, buf);
            }
            GridBody::Items(items) => render_items(items, self.view.columns, palette, body, buf),
        }
    }
}

fn render_items(items: &[ItemView], columns: u16, palette: Palette, area: Rect, buf: &mut Buffer) {
    let columns = columns.max(1);
    let rows = items.chunks(usize::from(columns));
    let mut y = area.y;
    for row in rows {
        if y.saturating_add(CELL_HEIGHT) > area.bottom() {
            break;
        }
        let row_area = Rect::new(area.x, y, area.width, CELL_HEIGHT);
        let cells = Layout::horizontal(vec![
            Constraint::Ratio(1, u32::from(columns));
            usize::from(columns)
        ])
        .split(row_area);
        for (item, cell) in row.iter().zip(cells.iter()) {
            render_item(item, palette, *cell, buf);
        }
        y += CELL_HEIGHT;
    }
}

fn render_item(item: &ItemView, palette: Palette, area: Rect, buf: &mut Buffer) {
    let accent = if item.is_on() { palette.on } else { palette.off };
    let mut border = Style::default().fg(palette.border);
    let mut border_type = BorderType::Plain;
    if item.flags.drop_target || item.flags.glowing {
        border = border.fg(palette.highlight);
        border_type = BorderType::Thick;
    }
    if item.flags.dragging {
        border_type = BorderType::Double;
    }

    let mut lines = vec![Line::from(Span::styled(
        item.name.as_str(),
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    lines.extend(detail_lines(&item.kind, accent));

    let mut paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(border_type)
            .border_style(border),
    );
    if item.flags.removing {
        paragraph = paragraph.style(Style::default().add_modifier(Modifier::DIM));
    }
    paragraph.render(area, buf);
}

fn detail_lines(kind: &ItemKind, accent: Color) -> Vec<Line<'_>> {
    let state = Style::default().fg(accent);
    match kind {
        ItemKind::Climate(view) => climate_lines(view, state),
        ItemKind::Light(view) => vec![Line::from(Span::styled(view.state_text.as_str(), state))],
        ItemKind::Cover(view) => cover_lines(view, state),
        ItemKind::Standard(view) => vec![Line::from(Span::styled(view.state_text.as_str(), state))],
    }
}

fn climate_lines(view: &ClimateView, state: Style) -> Vec<Line<'_>> {
    let mut lines = vec![Line::from(vec![
        Span::styled(view.mode_text.as_str(), state),
        Span::raw(" "),
        Span::styled(
            view.temperature_text.as_str(),
            state.add_modifier(Modifier::BOLD),
        ),
    ])];
    if let Some(controls) = &view.controls {
        let text = if controls.disabled { "[-] [+] off" } else { "[-] [+]" };
        let mut spans = vec![Span::raw(text)];
        if view.hvac_open {
            spans.push(Span::raw(" ▾mode"));
        }
        if view.fan_open {
            spans.push(Span::raw(" ▾fan"));
        }
        lines.push(Line::from(spans));
    }
    lines
}

fn cover_lines(view: &CoverView, state: Style) -> Vec<Line<'_>> {
    let mut lines = vec![Line::from(Span::styled(view.state_text.as_str(), state))];
    if view.controls {
        let mut spans = Vec::new();
        if let Some(fill) = view.fill {
            spans.push(Span::styled(gauge(fill), state));
            spans.push(Span::raw(" "));
        }
        spans.push(Span::raw("▲ ■ ▼"));
        lines.push(Line::from(spans));
    }
    lines
}

/// Bar of [`GAUGE_WIDTH`] cells filled to `percent`.
pub fn gauge(percent: u8) -> String {
    let filled = (usize::from(percent.min(100)) * GAUGE_WIDTH + 50) / 100;
    format!(
        "{}{}",
        "█".repeat(filled),
        "░".repeat(GAUGE_WIDTH - filled)
    )
}
