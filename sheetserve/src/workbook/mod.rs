//! Workbook loading via calamine

mod sheet;

pub use sheet::Sheet;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use calamine::{Reader, Xlsx, open_workbook};

/// An opened .xlsx workbook.
///
/// The workbook is read-only: it is opened once, its sheet names are cached,
/// and individual sheets are loaded on demand as [`Sheet`] column tables.
pub struct Workbook {
    path: PathBuf,
    inner: Xlsx<BufReader<File>>,
    sheet_names: Vec<String>,
}

impl Workbook {
    /// Open a workbook from disk and cache its sheet names.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let inner: Xlsx<_> = open_workbook(path)
            .with_context(|| format!("Failed to open workbook: {}", path.display()))?;
        let sheet_names = inner.sheet_names().to_vec();

        Ok(Workbook {
            path: path.to_path_buf(),
            inner,
            sheet_names,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sheet names in workbook order.
    pub fn sheet_names(&self) -> &[String] {
        &self.sheet_names
    }

    pub fn contains_sheet(&self, name: &str) -> bool {
        self.sheet_names.iter().any(|s| s == name)
    }

    /// Load a sheet into a column table. The first row is the header row.
    pub fn load_sheet(&mut self, name: &str) -> Result<Sheet> {
        let range = self
            .inner
            .worksheet_range(name)
            .with_context(|| format!("Failed to read sheet: {}", name))?;

        Ok(Sheet::from_rows(name, range.rows()))
    }
}
