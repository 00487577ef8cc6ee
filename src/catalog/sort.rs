// Column sorting for the file catalog
use crate::error::{Error, Result};
use crate::storage::remote::FileRecord;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Columns of the catalog table, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Column {
    Name,
    Timestamp,
    Size,
    Persisted,
    Exists,
}

impl Column {
    pub const ALL: [Column; 5] = [
        Column::Name,
        Column::Timestamp,
        Column::Size,
        Column::Persisted,
        Column::Exists,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn title(self) -> &'static str {
        match self {
            Column::Name => "Name",
            Column::Timestamp => "Timestamp",
            Column::Size => "Size",
            Column::Persisted => "Persisted",
            Column::Exists => "Exists",
        }
    }

    /// Typed cell of `record` in this column.
    pub fn cell(self, record: &FileRecord) -> CellValue<'_> {
        match self {
            Column::Name => CellValue::Text(&record.name),
            Column::Timestamp => record
                .last_modified
                .map_or(CellValue::Empty, CellValue::Timestamp),
            Column::Size => CellValue::Size(record.size),
            Column::Persisted => CellValue::Flag(record.is_persisted),
            Column::Exists => CellValue::Flag(record.exists),
        }
    }
}

impl FromStr for Column {
    type Err = Error;

    /// Accepts a column title (any case) or its zero-based index.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if let Ok(index) = trimmed.parse::<usize>() {
            return Self::from_index(index).ok_or_else(|| Error::InvalidConfig {
                key: "column".to_string(),
                value: s.to_string(),
            });
        }
        Self::ALL
            .into_iter()
            .find(|column| column.title().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| Error::InvalidConfig {
                key: "column".to_string(),
                value: s.to_string(),
            })
    }
}

/// A single typed table cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellValue<'a> {
    Text(&'a str),
    Timestamp(DateTime<Utc>),
    Size(u64),
    Flag(bool),
    /// A value the backend did not report.
    Empty,
}

impl CellValue<'_> {
    /// Natural ordering, if both cells carry comparable values.
    pub fn natural_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (CellValue::Text(a), CellValue::Text(b)) => Some(a.cmp(b)),
            (CellValue::Timestamp(a), CellValue::Timestamp(b)) => Some(a.cmp(b)),
            (CellValue::Size(a), CellValue::Size(b)) => Some(a.cmp(b)),
            (CellValue::Flag(a), CellValue::Flag(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(text) => f.write_str(text),
            CellValue::Timestamp(ts) => write!(f, "{}", ts.format(TIMESTAMP_FORMAT)),
            CellValue::Size(size) => write!(f, "{size}"),
            CellValue::Flag(flag) => write!(f, "{flag}"),
            CellValue::Empty => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub column: Column,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn new(column: Column, direction: SortDirection) -> Self {
        Self { column, direction }
    }
}

/// Column-click state of the table.
///
/// Clicking the current column toggles the direction; clicking another
/// column makes it current and sorts ascending. Starts on the first column,
/// unsorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    column: Column,
    direction: Option<SortDirection>,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            column: Column::Name,
            direction: None,
        }
    }
}

impl SortState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn click(&mut self, column: Column) -> SortKey {
        let direction = if self.column != column {
            self.column = column;
            SortDirection::Ascending
        } else {
            self.direction
                .map_or(SortDirection::Ascending, SortDirection::toggled)
        };
        self.direction = Some(direction);
        SortKey::new(column, direction)
    }

    /// Force a key, as if the user had clicked their way to it.
    pub fn set(&mut self, key: SortKey) {
        self.column = key.column;
        self.direction = Some(key.direction);
    }

    pub fn current_column(&self) -> Column {
        self.column
    }

    /// Active key, or `None` while the table is still in fetch order.
    pub fn key(&self) -> Option<SortKey> {
        self.direction.map(|direction| SortKey::new(self.column, direction))
    }
}

/// Build the row comparison for `key`.
///
/// Cells compare by natural order when both have one and by display text
/// otherwise. Ties fall back to display text, then to the file name, so two
/// distinct rows never compare equal.
pub fn comparator(key: SortKey) -> impl Fn(&FileRecord, &FileRecord) -> Ordering {
    move |a, b| {
        let (left, right) = (key.column.cell(a), key.column.cell(b));
        let ordering = match left.natural_cmp(&right) {
            Some(Ordering::Equal) | None => left.to_string().cmp(&right.to_string()),
            Some(ordering) => ordering,
        };
        key.direction.apply(ordering.then_with(|| a.name.cmp(&b.name)))
    }
}

pub fn sort_records(records: &mut [FileRecord], key: SortKey) {
    records.sort_by(comparator(key));
}
