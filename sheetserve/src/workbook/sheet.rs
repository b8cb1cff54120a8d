//! Loaded sheet representation: named columns of numeric-or-absent cells

use std::collections::HashMap;

use calamine::Data;

/// A single sheet as a table of named columns.
///
/// Cells are kept only in their numeric reading: non-numeric cells are
/// recorded as absent, so aggregates skip them the same way a spreadsheet
/// library's numeric coercion would when summing a mixed column.
#[derive(Debug, Clone)]
pub struct Sheet {
    name: String,
    headers: Vec<String>,
    columns: HashMap<String, Vec<Option<f64>>>,
}

impl Sheet {
    /// Build a sheet directly from named columns. Mostly useful for fixtures.
    pub fn from_columns(name: impl Into<String>, columns: Vec<(String, Vec<Option<f64>>)>) -> Self {
        let mut headers = Vec::with_capacity(columns.len());
        let mut map = HashMap::with_capacity(columns.len());
        for (header, values) in columns {
            if !map.contains_key(&header) {
                headers.push(header.clone());
            }
            map.insert(header, values);
        }
        Sheet {
            name: name.into(),
            headers,
            columns: map,
        }
    }

    /// Build a sheet from raw rows; the first row is the header row.
    ///
    /// Non-string headers and empty headers are skipped. Duplicate headers
    /// keep the first occurrence. Rows shorter than the header row read as
    /// absent cells.
    pub(crate) fn from_rows<'a>(
        name: &str,
        mut rows: impl Iterator<Item = &'a [Data]>,
    ) -> Self {
        let raw_headers: Vec<String> = match rows.next() {
            Some(row) => row
                .iter()
                .map(|c| match c {
                    Data::String(s) => s.clone(),
                    _ => String::new(),
                })
                .collect(),
            None => Vec::new(),
        };

        let mut headers: Vec<String> = Vec::new();
        let mut columns: HashMap<String, Vec<Option<f64>>> = HashMap::new();
        // Columns whose header is empty or already seen are ignored entirely.
        let mut kept: Vec<bool> = Vec::with_capacity(raw_headers.len());
        for header in &raw_headers {
            let keep = !header.is_empty() && !columns.contains_key(header);
            if keep {
                headers.push(header.clone());
                columns.insert(header.clone(), Vec::new());
            }
            kept.push(keep);
        }

        for row in rows {
            for (idx, header) in raw_headers.iter().enumerate() {
                if !kept[idx] {
                    continue;
                }
                if let Some(values) = columns.get_mut(header) {
                    values.push(numeric_cell(row.get(idx)));
                }
            }
        }

        Sheet {
            name: name.to_string(),
            headers,
            columns,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column names in header order.
    pub fn column_names(&self) -> &[String] {
        &self.headers
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Cell values of a column; `None` entries are non-numeric cells.
    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.columns.get(name).map(Vec::as_slice)
    }
}

/// Numeric reading of an Excel cell; anything else is absent.
fn numeric_cell(cell: Option<&Data>) -> Option<f64> {
    match cell? {
        Data::Int(i) => Some(*i as f64),
        Data::Float(f) => Some(*f),
        _ => None,
    }
}
