// src/rows/mod.rs
use chrono::{DateTime, Utc};
use std::cmp::Ordering;

/// Type label used for directory rows.
pub const FOLDER_LABEL: &str = "Folder";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Name,
    Size,
    Type,
    Modified,
}

impl Column {
    pub fn title(&self) -> &'static str {
        match self {
            Column::Name => "Name",
            Column::Size => "Size",
            Column::Type => "Type",
            Column::Modified => "Modified",
        }
    }
}

/// One displayable file-system entry. Rows are immutable snapshots taken
/// at listing time; their only identity is their position in the current
/// sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub name: String,
    pub size_bytes: u64,
    pub type_label: String,
    pub modified: Option<DateTime<Utc>>,
}

/// Per-column direction toggles. Every column starts ascending and flips
/// each time it is sorted, independently of the others.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortState {
    name_descending: bool,
    size_descending: bool,
    type_descending: bool,
    modified_descending: bool,
}

impl SortState {
    pub fn next_descending(&self, column: Column) -> bool {
        match column {
            Column::Name => self.name_descending,
            Column::Size => self.size_descending,
            Column::Type => self.type_descending,
            Column::Modified => self.modified_descending,
        }
    }

    fn flag_mut(&mut self, column: Column) -> &mut bool {
        match column {
            Column::Name => &mut self.name_descending,
            Column::Size => &mut self.size_descending,
            Column::Type => &mut self.type_descending,
            Column::Modified => &mut self.modified_descending,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RowStore {
    state: SortState,
    active: Option<(Column, bool)>,
}

impl RowStore {
    pub fn new() -> Self {
        RowStore { state: SortState::default(), active: None }
    }

    /// The last applied sort, for the header indicator.
    pub fn active(&self) -> Option<(Column, bool)> {
        self.active
    }

    /// Produces a freshly ordered sequence for display. Size compares the
    /// byte count and Modified the timestamp, never the formatted strings.
    /// The sort is stable so ties keep their prior relative order, and the
    /// column's direction flips after each use.
    pub fn sort(&mut self, rows: &[Row], column: Column) -> Vec<Row> {
        let flag = self.state.flag_mut(column);
        let descending = *flag;
        *flag = !descending;
        self.active = Some((column, descending));

        let mut sorted = rows.to_vec();
        sorted.sort_by(|a, b| {
            let ord = compare(column, a, b);
            if descending { ord.reverse() } else { ord }
        });
        sorted
    }
}

fn compare(column: Column, a: &Row, b: &Row) -> Ordering {
    match column {
        Column::Name => a.name.cmp(&b.name),
        Column::Size => a.size_bytes.cmp(&b.size_bytes),
        Column::Type => a.type_label.cmp(&b.type_label),
        Column::Modified => a.modified.cmp(&b.modified),
    }
}
