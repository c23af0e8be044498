// src/ui/mod.rs
use crate::app::{App, Mode};
use crate::convert::TargetFormat;
use crate::filesystem::Category;
use crate::rows::{Column, Row, FOLDER_LABEL};
use crate::utils::formatter::{format_modified, format_size};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap};
use ratatui::Frame;

pub const SIZE_WIDTH: u16 = 10;
pub const TYPE_WIDTH: u16 = 10;
pub const MODIFIED_WIDTH: u16 = 16;

/// Screen regions, shared between rendering and mouse hit-testing.
pub struct Areas {
    pub header: Rect,
    pub list: Rect,
    pub status: Rect,
}

pub fn compute(area: Rect) -> Areas {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);
    Areas { header: chunks[0], list: chunks[1], status: chunks[2] }
}

/// Rows visible at once inside the list block (borders and the column
/// header line excluded).
pub fn page_height(list: Rect) -> usize {
    list.height.saturating_sub(3) as usize
}

/// First terminal row occupied by file rows.
pub fn rows_top(list: Rect) -> u16 {
    list.y + 2
}

pub fn name_width(total: u16) -> u16 {
    total.saturating_sub(SIZE_WIDTH + TYPE_WIDTH + MODIFIED_WIDTH + 3)
}

/// Maps an x offset inside the list block to the column under it.
pub fn column_at(x: u16, total: u16) -> Option<Column> {
    if x >= total {
        return None;
    }
    let nw = name_width(total);
    if x < nw {
        Some(Column::Name)
    } else if x < nw + 1 + SIZE_WIDTH {
        Some(Column::Size)
    } else if x < nw + 2 + SIZE_WIDTH + TYPE_WIDTH {
        Some(Column::Type)
    } else {
        Some(Column::Modified)
    }
}

/// Maps an x offset inside the category line to the category label under
/// it. Labels are separated by two spaces.
pub fn category_at(x: u16) -> Option<Category> {
    let mut start = 0u16;
    for (i, category) in Category::ALL.iter().enumerate() {
        if i > 0 {
            start += 2;
        }
        let end = start + category.label().len() as u16;
        if x >= start && x < end {
            return Some(*category);
        }
        start = end;
    }
    None
}

pub fn header_line(total: u16, active: Option<(Column, bool)>) -> String {
    let marker = |column: Column| match active {
        Some((c, descending)) if c == column => {
            if descending { " v" } else { " ^" }
        }
        _ => "",
    };
    let nw = name_width(total) as usize;
    let titled = |column: Column| format!("{}{}", column.title(), marker(column));
    format!(
        "{:<nw$} {:>10} {:<10} {:<16}",
        clip(&titled(Column::Name), nw),
        titled(Column::Size),
        titled(Column::Type),
        titled(Column::Modified),
        nw = nw
    )
}

pub fn row_line(row: &Row, total: u16) -> String {
    let nw = name_width(total) as usize;
    let size = if row.type_label == FOLDER_LABEL {
        "-".to_string()
    } else {
        format_size(row.size_bytes)
    };
    format!(
        "{:<nw$} {:>10} {:<10} {:<16}",
        clip(&row.name, nw),
        size,
        clip(&row.type_label, TYPE_WIDTH as usize),
        format_modified(row.modified),
        nw = nw
    )
}

fn clip(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        text.chars().take(width).collect()
    } else {
        text.to_string()
    }
}

pub fn draw(f: &mut Frame, app: &App) {
    let areas = compute(f.size());
    draw_header(f, areas.header, app);
    draw_list(f, areas.list, app);
    draw_status(f, areas.status, app);
    if app.mode != Mode::Browse {
        draw_dialog(f, app);
    }
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().borders(Borders::ALL).title(" filtui ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut path_line = format!("Folder: {}", app.lister.current_path.display());
    if let Some(ref filter) = app.lister.name_filter {
        path_line.push_str(&format!("   filter: {}", filter));
    }
    if app.lister.show_hidden {
        path_line.push_str("   [hidden shown]");
    }

    let lines = vec![Line::from(path_line), category_line(app.lister.category)];
    f.render_widget(Paragraph::new(lines), inner);
}

fn category_line(active: Category) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, category) in Category::ALL.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        let style = if *category == active {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(category.label(), style));
    }
    Line::from(spans)
}

fn draw_list(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let width = inner.width;
    let mut items: Vec<ListItem> = Vec::new();
    items.push(ListItem::new(Line::from(Span::styled(
        header_line(width, app.store.active()),
        Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
    ))));

    let page = page_height(area);
    let end = (app.scroll + page).min(app.rows.len());
    for index in app.scroll..end {
        let row = &app.rows[index];
        let mut style = if row.type_label == FOLDER_LABEL {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };
        if app.selection.is_selected(index) {
            style = style.add_modifier(Modifier::REVERSED);
        }
        if app.selection.anchor() == Some(index) {
            style = style.add_modifier(Modifier::BOLD);
        }
        items.push(ListItem::new(Line::from(Span::styled(row_line(row, width), style))));
    }

    f.render_widget(List::new(items), inner);
}

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
    let mut status = format!(
        " {} item(s)   {} selected   [{}]",
        app.rows.len(),
        app.selection.count(),
        app.lister.category.label()
    );
    if let Some(ref message) = app.message {
        status.push_str("   ");
        status.push_str(message);
    }
    f.render_widget(
        Paragraph::new(status).style(Style::default().fg(Color::Gray)),
        area,
    );
}

fn draw_dialog(f: &mut Frame, app: &App) {
    let (title, lines) = dialog_content(&app.mode);
    let area = centered_rect(60, 50, f.size());
    f.render_widget(Clear, area);
    let block = Block::default().borders(Borders::ALL).title(title);
    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

fn dialog_content(mode: &Mode) -> (&'static str, Vec<Line<'static>>) {
    match mode {
        Mode::ConfirmDelete { names } => {
            let mut lines = vec![Line::from(format!("Delete {} item(s)?", names.len()))];
            for name in names.iter().take(5) {
                lines.push(Line::from(format!("  {}", name)));
            }
            if names.len() > 5 {
                lines.push(Line::from(format!("  ...and {} more", names.len() - 5)));
            }
            lines.push(Line::from(""));
            lines.push(Line::from("y = delete    n/Esc = cancel"));
            (" Confirm delete ", lines)
        }
        Mode::RenameInput { original, input } => (
            " Rename ",
            vec![
                Line::from(format!("Renaming: {}", original)),
                Line::from(format!("New name: {}_", input)),
                Line::from(""),
                Line::from("Enter = confirm    Esc = cancel"),
            ],
        ),
        Mode::MoveInput { input } => (
            " Move ",
            vec![
                Line::from(format!("Destination: {}_", input)),
                Line::from(""),
                Line::from("Enter = confirm    Esc = cancel"),
            ],
        ),
        Mode::ConvertPick => {
            let mut lines = vec![Line::from("Convert selected images to:")];
            for format in TargetFormat::ALL {
                lines.push(Line::from(format!("  {} = {}", format.key(), format.label())));
            }
            lines.push(Line::from(""));
            lines.push(Line::from("Esc = cancel"));
            (" Convert images ", lines)
        }
        Mode::FilterInput { input } => (
            " Name filter ",
            vec![
                Line::from(format!("Filter: {}_", input)),
                Line::from(""),
                Line::from("Enter = apply    Esc = cancel"),
            ],
        ),
        Mode::Help => (
            " Help ",
            vec![
                Line::from("click        select row"),
                Line::from("ctrl+click   toggle row"),
                Line::from("shift+click  select range"),
                Line::from("drag         sweep rows into selection"),
                Line::from("column head  sort by column (click again to flip)"),
                Line::from(""),
                Line::from("Enter  open / enter folder    Backspace  parent folder"),
                Line::from("Tab    next category          .          toggle hidden"),
                Line::from("/      name filter            1-4        sort columns"),
                Line::from("o open   v reveal   d delete   r rename   m move   c convert"),
                Line::from("?      this help              q          quit"),
            ],
        ),
        Mode::Browse => ("", Vec::new()),
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
