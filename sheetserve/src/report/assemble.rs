//! Fold per-sheet evaluation results into a single report.

use crate::workbook::Workbook;

use super::evaluate::evaluate;
use super::types::{AssembleError, OperationRequest, Report, ReportError};

/// Run every request, in order, against the workbook and collect the results.
///
/// Sheet existence is verified against the workbook's sheet names before the
/// sheet is loaded; an unknown name aborts the whole assembly with
/// `SheetNotFound`. Assembly is all-or-nothing: the first failing request
/// discards everything, no partial report is ever returned. Requests that
/// reference the same sheet overwrite one another, last write wins.
pub fn assemble(
    workbook: &mut Workbook,
    requests: &[OperationRequest],
) -> Result<Report, AssembleError> {
    let mut report = Report::new();

    for request in requests {
        if !workbook.contains_sheet(&request.sheet_name) {
            return Err(ReportError::SheetNotFound(request.sheet_name.clone()).into());
        }

        let sheet = workbook.load_sheet(&request.sheet_name)?;
        let result = evaluate(&sheet, &request.operation, &request.columns)?;
        report.insert(request.sheet_name.clone(), result);
    }

    Ok(report)
}
