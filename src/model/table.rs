use crate::model::Cell;
use std::collections::HashMap;
use tracing::{trace, warn};

/// Represents the tabular contents of one source file: a header row followed by data rows.
///
/// Rows are normalized to the width of the header. Short rows are padded with `Cell::Empty` and
/// cells beyond the last header are dropped.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct RawSourceTable {
    headers: Vec<Header>,
    header_map: HashMap<Header, usize>,
    rows: Vec<Vec<Cell>>,
}

impl RawSourceTable {
    /// Creates a table from rows of cells where the first row holds the headers. An empty
    /// iterator produces an empty table with no columns.
    pub fn new<C, R, I>(data: I) -> Self
    where
        C: Into<Cell>,
        R: IntoIterator<Item = C>,
        I: IntoIterator<Item = R>,
    {
        let mut rows = data.into_iter();
        let headers: Vec<Header> = match rows.next() {
            Some(header_row) => header_row
                .into_iter()
                .map(|c| Header::from(c.into().to_dimension()))
                .collect(),
            None => return Self::default(),
        };
        Self::with_headers(headers, rows)
    }

    /// Creates a table from an explicit list of headers and the data rows that follow them.
    pub fn with_headers<H, C, R, I>(headers: impl IntoIterator<Item = H>, rows: I) -> Self
    where
        H: Into<Header>,
        C: Into<Cell>,
        R: IntoIterator<Item = C>,
        I: IntoIterator<Item = R>,
    {
        let headers: Vec<Header> = headers.into_iter().map(|h| h.into()).collect();

        let mut header_map = HashMap::with_capacity(headers.len());
        for (idx, header) in headers.iter().enumerate() {
            if header_map.contains_key(header) {
                warn!(
                    "Duplicate header '{}' at column {idx}, the first occurrence is kept",
                    header.as_ref()
                );
                continue;
            }
            header_map.insert(header.clone(), idx);
        }

        let width = headers.len();
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(row_ix, row)| {
                let mut cells: Vec<Cell> = row.into_iter().map(|c| c.into()).collect();
                if cells.len() > width {
                    trace!(
                        "Row {} has {} cells but there are only {width} headers",
                        row_ix + 2,
                        cells.len()
                    );
                }
                cells.resize(width, Cell::Empty);
                cells
            })
            .collect();

        Self {
            headers,
            header_map,
            rows,
        }
    }

    /// The number of data rows, not counting the header row.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.rows.iter().map(|r| r.as_slice())
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.header_map.contains_key(name)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header_map.get(name).copied()
    }

    /// Returns the cells of the named column in row order, or `None` if there is no such column.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &Cell> + '_> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| &row[idx]))
    }
}

/// Represents a column header in a source spreadsheet, for example, `DataAdmissao`. Headers are
/// trimmed when created.
#[derive(Default, Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Header(String);

impl AsRef<str> for Header {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl std::borrow::Borrow<str> for Header {
    fn borrow(&self) -> &str {
        self.0.as_str()
    }
}

impl<S: Into<String>> From<S> for Header {
    fn from(value: S) -> Self {
        let s: String = value.into();
        Self(s.trim().to_string())
    }
}
