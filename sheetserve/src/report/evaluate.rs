//! Evaluate one aggregate operation over the columns of a loaded sheet.

use crate::workbook::Sheet;

use super::types::{OperationResult, ReportError};

/// Recognized aggregate operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Sum,
    Average,
}

impl OperationKind {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "sum" => Some(OperationKind::Sum),
            "average" => Some(OperationKind::Average),
            _ => None,
        }
    }
}

/// Compute one aggregate value per requested column.
///
/// Validation order is part of the contract: column existence is checked
/// before the operation name, so a request that is wrong on both counts
/// reports the missing columns first. On any failure nothing is aggregated.
///
/// Non-numeric cells are absent from both the sum and the average divisor;
/// `average` divides by the count of present values, not the row count. A
/// column with no numeric values at all evaluates to 0.0 for either kind.
pub fn evaluate(
    sheet: &Sheet,
    operation: &str,
    columns: &[String],
) -> Result<OperationResult, ReportError> {
    let missing: Vec<String> = columns
        .iter()
        .filter(|name| !sheet.has_column(name))
        .cloned()
        .collect();
    if !missing.is_empty() {
        return Err(ReportError::MissingColumns {
            sheet: sheet.name().to_string(),
            columns: missing,
        });
    }

    let kind = OperationKind::parse(operation)
        .ok_or_else(|| ReportError::InvalidOperation(operation.to_string()))?;

    let mut result = OperationResult::new();
    for name in columns {
        let cells = sheet.column(name).unwrap_or(&[]);
        let present: Vec<f64> = cells.iter().flatten().copied().collect();
        let total: f64 = present.iter().sum();

        let value = match kind {
            OperationKind::Sum => total,
            OperationKind::Average => {
                if present.is_empty() {
                    0.0
                } else {
                    total / present.len() as f64
                }
            }
        };
        result.insert(name.clone(), value);
    }

    Ok(result)
}
