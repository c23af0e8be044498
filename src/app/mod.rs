// src/app/mod.rs
use crate::convert::{self, TargetFormat};
use crate::filesystem::{launch, ops, Category, DirLister};
use crate::rows::{Column, Row, RowStore, FOLDER_LABEL};
use crate::selection::SelectionModel;
use crate::ui;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Browse,
    ConfirmDelete { names: Vec<String> },
    RenameInput { original: String, input: String },
    MoveInput { input: String },
    ConvertPick,
    FilterInput { input: String },
    Help,
}

/// Host layer tying the two cores together: the lister supplies the row
/// sequence, the selection model interprets pointer events against it,
/// and every change to the sequence invalidates the selection.
pub struct App {
    pub lister: DirLister,
    pub store: RowStore,
    pub rows: Vec<Row>,
    pub selection: SelectionModel,
    pub scroll: usize,
    pub mode: Mode,
    pub message: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(start: PathBuf, category: Category, show_hidden: bool) -> Self {
        let lister = DirLister::new(start, category, show_hidden);
        let rows = lister.rows();
        let selection = SelectionModel::new(rows.len());
        App {
            lister,
            store: RowStore::new(),
            rows,
            selection,
            scroll: 0,
            mode: Mode::Browse,
            message: None,
            should_quit: false,
        }
    }

    /// Relists the current directory, keeping the scroll position sane.
    pub fn refresh(&mut self) {
        self.lister.refresh();
        self.sync_rows(false);
    }

    pub fn sort_by(&mut self, column: Column) {
        self.rows = self.store.sort(&self.rows, column);
        // Sorting reorders the sequence and indices are positional.
        self.selection.set_len(self.rows.len());
    }

    fn sync_rows(&mut self, reset_scroll: bool) {
        self.rows = self.lister.rows();
        self.selection.set_len(self.rows.len());
        self.scroll = if reset_scroll {
            0
        } else {
            self.scroll.min(self.rows.len().saturating_sub(1))
        };
    }

    fn toast(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    fn path_at(&self, index: usize) -> PathBuf {
        self.lister.current_path.join(&self.rows[index].name)
    }

    fn selected_indices(&self) -> Vec<usize> {
        self.selection.indices().collect()
    }

    fn selected_paths(&self) -> Vec<PathBuf> {
        self.selected_indices().iter().map(|&i| self.path_at(i)).collect()
    }

    fn focused_index(&self) -> Option<usize> {
        self.selection.anchor().or_else(|| self.selection.indices().next())
    }

    // --- keyboard ---

    pub fn handle_key(&mut self, key: KeyEvent, frame: Rect) {
        match self.mode.clone() {
            Mode::Browse => self.handle_browse_key(key, frame),
            Mode::ConfirmDelete { .. } => self.handle_confirm_delete_key(key),
            Mode::RenameInput { original, input } => self.handle_rename_key(key, original, input),
            Mode::MoveInput { input } => self.handle_move_key(key, input),
            Mode::ConvertPick => self.handle_convert_key(key),
            Mode::FilterInput { input } => self.handle_filter_key(key, input),
            Mode::Help => self.mode = Mode::Browse,
        }
    }

    fn handle_browse_key(&mut self, key: KeyEvent, frame: Rect) {
        let areas = ui::compute(frame);
        let page = ui::page_height(areas.list);
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Up => self.move_cursor(-1, shift, page),
            KeyCode::Down => self.move_cursor(1, shift, page),
            KeyCode::Enter => self.open_focused(),
            KeyCode::Backspace => {
                self.lister.navigate_up();
                self.sync_rows(true);
            }
            KeyCode::Tab => {
                let next = self.lister.category.next();
                self.lister.set_category(next);
                self.sync_rows(true);
            }
            KeyCode::BackTab => {
                let prev = self.lister.category.prev();
                self.lister.set_category(prev);
                self.sync_rows(true);
            }
            KeyCode::Char('.') => {
                self.lister.show_hidden = !self.lister.show_hidden;
                self.lister.refresh();
                self.sync_rows(true);
            }
            KeyCode::Char('/') => {
                let input = self.lister.name_filter.clone().unwrap_or_default();
                self.mode = Mode::FilterInput { input };
            }
            KeyCode::Char('d') => self.begin_delete(),
            KeyCode::Char('r') => self.begin_rename(),
            KeyCode::Char('m') => self.begin_move(),
            KeyCode::Char('c') => self.begin_convert(),
            KeyCode::Char('v') => self.reveal_focused(),
            KeyCode::Char('o') => self.launch_focused(),
            KeyCode::Char('1') => self.sort_by(Column::Name),
            KeyCode::Char('2') => self.sort_by(Column::Size),
            KeyCode::Char('3') => self.sort_by(Column::Type),
            KeyCode::Char('4') => self.sort_by(Column::Modified),
            KeyCode::Char('?') => self.mode = Mode::Help,
            KeyCode::Esc => {
                if self.lister.name_filter.is_some() {
                    self.lister.set_name_filter(None);
                    self.sync_rows(true);
                }
            }
            _ => {}
        }
    }

    fn move_cursor(&mut self, delta: i64, extend: bool, page: usize) {
        if self.rows.is_empty() {
            return;
        }
        let last = self.rows.len() as i64 - 1;
        let target = match self.focused_index() {
            Some(current) => (current as i64 + delta).clamp(0, last) as usize,
            None if delta >= 0 => 0,
            None => last as usize,
        };
        if extend {
            self.selection.shift_click(target);
        } else {
            self.selection.plain_click(target);
        }
        self.ensure_visible(target, page);
    }

    fn ensure_visible(&mut self, index: usize, page: usize) {
        if page == 0 {
            return;
        }
        if index < self.scroll {
            self.scroll = index;
        } else if index >= self.scroll + page {
            self.scroll = index + 1 - page;
        }
    }

    // --- actions ---

    fn open_focused(&mut self) {
        let Some(index) = self.focused_index() else {
            self.toast("No files selected.");
            return;
        };
        let path = self.path_at(index);
        if self.rows[index].type_label == FOLDER_LABEL {
            self.lister.navigate_to(&path);
            self.sync_rows(true);
        } else if let Err(e) = launch::open_path(&path) {
            warn!("open {} failed: {}", path.display(), e);
            self.toast(format!("Open failed: {}", e));
        }
    }

    fn launch_focused(&mut self) {
        let Some(index) = self.focused_index() else {
            self.toast("No files selected.");
            return;
        };
        let path = self.path_at(index);
        if let Err(e) = launch::open_path(&path) {
            warn!("open {} failed: {}", path.display(), e);
            self.toast(format!("Open failed: {}", e));
        }
    }

    fn reveal_focused(&mut self) {
        let Some(index) = self.focused_index() else {
            self.toast("No files selected.");
            return;
        };
        let path = self.path_at(index);
        if let Err(e) = launch::reveal(&path) {
            warn!("reveal {} failed: {}", path.display(), e);
            self.toast(format!("Reveal failed: {}", e));
        }
    }

    fn begin_delete(&mut self) {
        let names: Vec<String> = self
            .selected_indices()
            .iter()
            .map(|&i| self.rows[i].name.clone())
            .collect();
        if names.is_empty() {
            self.toast("No files selected.");
            return;
        }
        self.mode = Mode::ConfirmDelete { names };
    }

    fn handle_confirm_delete_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => self.delete_selected(),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => self.mode = Mode::Browse,
            _ => {}
        }
    }

    fn delete_selected(&mut self) {
        let paths = self.selected_paths();
        let mut deleted = 0usize;
        let mut failed = 0usize;
        for path in &paths {
            match ops::delete(path) {
                Ok(()) => {
                    deleted += 1;
                    info!("deleted {}", path.display());
                }
                Err(e) => {
                    failed += 1;
                    warn!("delete {} failed: {}", path.display(), e);
                }
            }
        }
        self.mode = Mode::Browse;
        self.refresh();
        self.toast(summary("Deleted", deleted, failed));
    }

    fn begin_rename(&mut self) {
        let indices = self.selected_indices();
        if indices.len() != 1 {
            self.toast("Select a single item to rename.");
            return;
        }
        let index = indices[0];
        let original = self.rows[index].name.clone();
        let input = if self.rows[index].type_label == FOLDER_LABEL {
            original.clone()
        } else {
            Path::new(&original)
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| original.clone())
        };
        self.mode = Mode::RenameInput { original, input };
    }

    fn handle_rename_key(&mut self, key: KeyEvent, original: String, mut input: String) {
        match key.code {
            KeyCode::Enter => {
                self.mode = Mode::Browse;
                if input.is_empty() {
                    self.toast("Name cannot be empty.");
                    return;
                }
                let path = self.lister.current_path.join(&original);
                match ops::rename(&path, &input) {
                    Ok(dest) => {
                        info!("renamed {} -> {}", path.display(), dest.display());
                        self.toast("Renamed 1 item(s)");
                    }
                    Err(e) => {
                        warn!("rename {} failed: {}", path.display(), e);
                        self.toast(format!("Rename failed: {}", e));
                    }
                }
                self.refresh();
            }
            KeyCode::Esc => self.mode = Mode::Browse,
            KeyCode::Backspace => {
                input.pop();
                self.mode = Mode::RenameInput { original, input };
            }
            KeyCode::Char(c) => {
                input.push(c);
                self.mode = Mode::RenameInput { original, input };
            }
            _ => {}
        }
    }

    fn begin_move(&mut self) {
        if self.selection.count() == 0 {
            self.toast("No files selected.");
            return;
        }
        self.mode = Mode::MoveInput { input: String::new() };
    }

    fn handle_move_key(&mut self, key: KeyEvent, mut input: String) {
        match key.code {
            KeyCode::Enter => {
                self.mode = Mode::Browse;
                let dest = expand_tilde(&input);
                if !dest.is_dir() {
                    self.toast(format!("Not a directory: {}", dest.display()));
                    return;
                }
                let paths = self.selected_paths();
                let mut moved = 0usize;
                let mut failed = 0usize;
                for path in &paths {
                    match ops::move_to(path, &dest) {
                        Ok(to) => {
                            moved += 1;
                            info!("moved {} -> {}", path.display(), to.display());
                        }
                        Err(e) => {
                            failed += 1;
                            warn!("move {} failed: {}", path.display(), e);
                        }
                    }
                }
                self.refresh();
                self.toast(summary("Moved", moved, failed));
            }
            KeyCode::Esc => self.mode = Mode::Browse,
            KeyCode::Backspace => {
                input.pop();
                self.mode = Mode::MoveInput { input };
            }
            KeyCode::Char(c) => {
                input.push(c);
                self.mode = Mode::MoveInput { input };
            }
            _ => {}
        }
    }

    fn begin_convert(&mut self) {
        let any_file = self
            .selected_indices()
            .iter()
            .any(|&i| self.rows[i].type_label != FOLDER_LABEL);
        if !any_file {
            self.toast("No files selected.");
            return;
        }
        self.mode = Mode::ConvertPick;
    }

    fn handle_convert_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.mode = Mode::Browse,
            KeyCode::Char(c) => {
                if let Some(target) = TargetFormat::from_key(c) {
                    self.convert_selected(target);
                }
            }
            _ => {}
        }
    }

    fn convert_selected(&mut self, target: TargetFormat) {
        let indices = self.selected_indices();
        let mut converted = 0usize;
        let mut failed = 0usize;
        for &index in &indices {
            if self.rows[index].type_label == FOLDER_LABEL {
                continue;
            }
            let path = self.path_at(index);
            match convert::convert_image(&path, target) {
                Ok(output) => {
                    converted += 1;
                    info!("converted {} -> {}", path.display(), output.display());
                }
                Err(e) => {
                    failed += 1;
                    warn!("convert {} failed: {}", path.display(), e);
                }
            }
        }
        self.mode = Mode::Browse;
        self.refresh();
        self.toast(summary("Converted", converted, failed));
    }

    fn handle_filter_key(&mut self, key: KeyEvent, mut input: String) {
        match key.code {
            KeyCode::Enter => {
                self.mode = Mode::Browse;
                self.lister.set_name_filter(Some(input));
                self.sync_rows(true);
            }
            KeyCode::Esc => self.mode = Mode::Browse,
            KeyCode::Backspace => {
                input.pop();
                self.mode = Mode::FilterInput { input };
            }
            KeyCode::Char(c) => {
                input.push(c);
                self.mode = Mode::FilterInput { input };
            }
            _ => {}
        }
    }

    // --- mouse ---

    pub fn handle_mouse(&mut self, mouse: MouseEvent, frame: Rect) {
        if self.mode != Mode::Browse {
            return;
        }
        let areas = ui::compute(frame);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.mouse_down(mouse, &areas),
            MouseEventKind::Drag(MouseButton::Left) => self.mouse_drag(mouse, &areas),
            MouseEventKind::ScrollUp => self.scroll = self.scroll.saturating_sub(3),
            MouseEventKind::ScrollDown => {
                if !self.rows.is_empty() {
                    self.scroll = (self.scroll + 3).min(self.rows.len() - 1);
                }
            }
            _ => {}
        }
    }

    fn mouse_down(&mut self, mouse: MouseEvent, areas: &ui::Areas) {
        // Category line inside the header block.
        if mouse.row == areas.header.y + 2 {
            let x = mouse.column.saturating_sub(areas.header.x + 1);
            if let Some(category) = ui::category_at(x) {
                self.lister.set_category(category);
                self.sync_rows(true);
            }
            return;
        }

        let list = areas.list;
        // Column header line sorts the clicked column.
        if mouse.row == list.y + 1 {
            let inner_x = list.x + 1;
            if mouse.column >= inner_x {
                if let Some(column) =
                    ui::column_at(mouse.column - inner_x, list.width.saturating_sub(2))
                {
                    self.sort_by(column);
                }
            }
            return;
        }

        let Some(index) = self.row_at(mouse.row, areas) else { return };
        if mouse.modifiers.contains(KeyModifiers::SHIFT) {
            self.selection.shift_click(index);
        } else if mouse.modifiers.contains(KeyModifiers::CONTROL) {
            self.selection.ctrl_click(index);
        } else {
            self.selection.plain_click(index);
        }
    }

    fn mouse_drag(&mut self, mouse: MouseEvent, areas: &ui::Areas) {
        if let Some(index) = self.row_at(mouse.row, areas) {
            self.selection.drag(index);
        }
    }

    fn row_at(&self, y: u16, areas: &ui::Areas) -> Option<usize> {
        row_index_at(
            y,
            ui::rows_top(areas.list),
            ui::page_height(areas.list),
            self.scroll,
            self.rows.len(),
        )
    }
}

/// Nearest-row mapping for pointer events: clicks below the last visible
/// row clamp to the last row, clicks outside the row band resolve to
/// nothing.
fn row_index_at(y: u16, rows_top: u16, page: usize, scroll: usize, len: usize) -> Option<usize> {
    if len == 0 || y < rows_top {
        return None;
    }
    let offset = (y - rows_top) as usize;
    if offset >= page {
        return None;
    }
    Some((scroll + offset).min(len - 1))
}

fn summary(verb: &str, done: usize, failed: usize) -> String {
    if failed > 0 {
        format!("{} {} item(s), {} failed", verb, done, failed)
    } else {
        format!("{} {} item(s)", verb, done)
    }
}

fn expand_tilde(input: &str) -> PathBuf {
    if let Some(rest) = input.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const FRAME: Rect = Rect { x: 0, y: 0, width: 80, height: 24 };

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn click(column: u16, row: u16, modifiers: KeyModifiers) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers,
        }
    }

    fn fixture() -> (tempfile::TempDir, App) {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.png", "b.png", "c.png", "d.png"] {
            fs::write(dir.path().join(name), b"png").unwrap();
        }
        let app = App::new(dir.path().to_path_buf(), Category::Images, false);
        (dir, app)
    }

    #[test]
    fn test_row_index_at_clamps_below_last_row() {
        assert_eq!(row_index_at(6, 6, 10, 0, 3), Some(0));
        assert_eq!(row_index_at(8, 6, 10, 0, 3), Some(2));
        assert_eq!(row_index_at(12, 6, 10, 0, 3), Some(2));
        assert_eq!(row_index_at(5, 6, 10, 0, 3), None);
        assert_eq!(row_index_at(16, 6, 10, 0, 3), None);
        assert_eq!(row_index_at(6, 6, 10, 0, 0), None);
    }

    #[test]
    fn test_mouse_clicks_drive_selection() {
        let (_dir, mut app) = fixture();
        assert_eq!(app.rows.len(), 4);

        // With an 80x24 frame the first file row sits at terminal row 6.
        app.handle_mouse(click(2, 6, KeyModifiers::NONE), FRAME);
        assert!(app.selection.is_selected(0));
        assert_eq!(app.selection.count(), 1);

        app.handle_mouse(click(2, 8, KeyModifiers::SHIFT), FRAME);
        let selected: Vec<usize> = app.selection.indices().collect();
        assert_eq!(selected, vec![0, 1, 2]);

        app.handle_mouse(click(2, 7, KeyModifiers::CONTROL), FRAME);
        let selected: Vec<usize> = app.selection.indices().collect();
        assert_eq!(selected, vec![0, 2]);
    }

    #[test]
    fn test_header_click_sorts_and_clears_selection() {
        let (_dir, mut app) = fixture();
        app.selection.plain_click(1);

        // Terminal row 5 is the column header line.
        app.handle_mouse(click(2, 5, KeyModifiers::NONE), FRAME);
        assert_eq!(app.store.active(), Some((Column::Name, false)));
        assert_eq!(app.selection.count(), 0);

        app.handle_mouse(click(2, 5, KeyModifiers::NONE), FRAME);
        assert_eq!(app.store.active(), Some((Column::Name, true)));
        assert_eq!(app.rows[0].name, "d.png");
    }

    #[test]
    fn test_arrow_keys_move_anchor_cursor() {
        let (_dir, mut app) = fixture();
        app.handle_key(key(KeyCode::Down), FRAME);
        assert!(app.selection.is_selected(0));
        app.handle_key(key(KeyCode::Down), FRAME);
        assert!(app.selection.is_selected(1));
        assert_eq!(app.selection.count(), 1);

        let shift_down = KeyEvent::new(KeyCode::Down, KeyModifiers::SHIFT);
        app.handle_key(shift_down, FRAME);
        let selected: Vec<usize> = app.selection.indices().collect();
        assert_eq!(selected, vec![1, 2]);
    }

    #[test]
    fn test_delete_flow_removes_files() {
        let (dir, mut app) = fixture();
        app.selection.plain_click(0);
        app.handle_key(key(KeyCode::Char('d')), FRAME);
        assert!(matches!(app.mode, Mode::ConfirmDelete { .. }));

        app.handle_key(key(KeyCode::Char('y')), FRAME);
        assert_eq!(app.mode, Mode::Browse);
        assert_eq!(app.rows.len(), 3);
        assert!(!dir.path().join("a.png").exists());
        assert_eq!(app.selection.count(), 0);
    }

    #[test]
    fn test_rename_flow_keeps_extension() {
        let (dir, mut app) = fixture();
        app.selection.plain_click(1);
        app.handle_key(key(KeyCode::Char('r')), FRAME);
        assert_eq!(
            app.mode,
            Mode::RenameInput { original: "b.png".to_string(), input: "b".to_string() }
        );

        app.handle_key(key(KeyCode::Backspace), FRAME);
        for c in "zz".chars() {
            app.handle_key(key(KeyCode::Char(c)), FRAME);
        }
        app.handle_key(key(KeyCode::Enter), FRAME);
        assert!(dir.path().join("zz.png").exists());
        assert!(!dir.path().join("b.png").exists());
    }

    #[test]
    fn test_actions_require_selection() {
        let (_dir, mut app) = fixture();
        app.handle_key(key(KeyCode::Char('d')), FRAME);
        assert_eq!(app.mode, Mode::Browse);
        assert_eq!(app.message.as_deref(), Some("No files selected."));
    }

    #[test]
    fn test_category_switch_resets_selection() {
        let (_dir, mut app) = fixture();
        app.selection.plain_click(0);
        app.handle_key(key(KeyCode::Tab), FRAME);
        assert_eq!(app.lister.category, Category::Videos);
        assert_eq!(app.selection.count(), 0);
        assert!(app.rows.is_empty());
    }

    #[test]
    fn test_filter_flow_narrows_rows() {
        let (_dir, mut app) = fixture();
        app.handle_key(key(KeyCode::Char('/')), FRAME);
        assert!(matches!(app.mode, Mode::FilterInput { .. }));
        app.handle_key(key(KeyCode::Char('a')), FRAME);
        app.handle_key(key(KeyCode::Enter), FRAME);
        assert_eq!(app.rows.len(), 1);
        assert_eq!(app.rows[0].name, "a.png");

        app.handle_key(key(KeyCode::Esc), FRAME);
        assert_eq!(app.rows.len(), 4);
    }

    #[test]
    fn test_expand_tilde_falls_back_to_literal() {
        assert_eq!(expand_tilde("/tmp/x"), PathBuf::from("/tmp/x"));
    }
}
