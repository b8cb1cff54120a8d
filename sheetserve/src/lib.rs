//! sheetserve: a small HTTP service for spreadsheet aggregate reports.
//!
//! Clients upload an .xlsx workbook, request per-sheet aggregates (sum or
//! average) over named columns, and can render the assembled report as a PDF
//! document or a per-sheet totals bar chart.

pub mod config;
pub mod error;
pub mod http;
pub mod render;
pub mod report;
pub mod workbook;

pub use config::Storage;
pub use error::ApiError;
pub use report::{OperationKind, OperationRequest, OperationResult, Report, assemble, evaluate};
pub use workbook::{Sheet, Workbook};
