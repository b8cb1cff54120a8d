//! Request and report types shared by the evaluator, the assembler, and the
//! HTTP surface.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// A single aggregation request against one sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationRequest {
    /// Sheet to aggregate over
    pub sheet_name: String,
    /// Requested operation name ("sum" or "average"); validated only after
    /// column existence, so the raw string is carried here
    pub operation: String,
    /// Columns to aggregate; empty degenerates to an empty result
    #[serde(default)]
    pub columns: Vec<String>,
}

/// Per-column aggregate values for one sheet. Key order carries no meaning,
/// so a sorted map keeps serialization deterministic.
pub type OperationResult = BTreeMap<String, f64>;

/// Domain failures of evaluation and assembly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    #[error("Sheet {0} not found")]
    SheetNotFound(String),
    /// Lists exactly the requested columns absent from the sheet, in request
    /// order. Raised before any aggregation happens.
    #[error("Missing columns in sheet {sheet}: {columns:?}")]
    MissingColumns { sheet: String, columns: Vec<String> },
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

/// Assembly failure: either a domain error or a workbook read problem.
#[derive(Debug, Error)]
pub enum AssembleError {
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error(transparent)]
    Workbook(#[from] anyhow::Error),
}

/// Ordered mapping from sheet name to its per-column results.
///
/// Insertion order of the *first* occurrence of a sheet name is preserved;
/// inserting the same name again overwrites the value in place
/// (last-write-wins). Serializes to a JSON object in that order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    entries: Vec<(String, OperationResult)>,
}

impl Report {
    pub fn new() -> Self {
        Report::default()
    }

    /// Insert a sheet's results. A sheet already present keeps its position
    /// but gets the new value.
    pub fn insert(&mut self, sheet: impl Into<String>, result: OperationResult) {
        let sheet = sheet.into();
        match self.entries.iter_mut().find(|(name, _)| *name == sheet) {
            Some((_, existing)) => *existing = result,
            None => self.entries.push((sheet, result)),
        }
    }

    pub fn get(&self, sheet: &str) -> Option<&OperationResult> {
        self.entries
            .iter()
            .find(|(name, _)| name == sheet)
            .map(|(_, result)| result)
    }

    /// Entries in report order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OperationResult)> {
        self.entries
            .iter()
            .map(|(name, result)| (name.as_str(), result))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One scalar per sheet, in report order: the sum of that sheet's
    /// per-column results. This is what the bar chart plots.
    pub fn sheet_totals(&self) -> Vec<(String, f64)> {
        self.entries
            .iter()
            .map(|(name, result)| (name.clone(), result.values().sum()))
            .collect()
    }
}

impl Serialize for Report {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (sheet, result) in &self.entries {
            map.serialize_entry(sheet, result)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Report {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ReportVisitor;

        impl<'de> Visitor<'de> for ReportVisitor {
            type Value = Report;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map from sheet name to per-column results")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Report, A::Error> {
                let mut report = Report::new();
                while let Some((sheet, result)) =
                    access.next_entry::<String, OperationResult>()?
                {
                    report.insert(sheet, result);
                }
                Ok(report)
            }
        }

        deserializer.deserialize_map(ReportVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(pairs: &[(&str, f64)]) -> OperationResult {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_insert_preserves_first_position_on_overwrite() {
        let mut report = Report::new();
        report.insert("Sales", result(&[("Revenue", 60.0)]));
        report.insert("Costs", result(&[("Total", 5.0)]));
        report.insert("Sales", result(&[("Revenue", 20.0)]));

        let order: Vec<&str> = report.iter().map(|(name, _)| name).collect();
        assert_eq!(order, ["Sales", "Costs"]);
        assert_eq!(report.get("Sales"), Some(&result(&[("Revenue", 20.0)])));
        assert_eq!(report.len(), 2);
    }

    #[test]
    fn test_serialize_keeps_report_order() {
        let mut report = Report::new();
        report.insert("Zebra", result(&[("A", 1.0)]));
        report.insert("Alpha", result(&[("B", 2.0)]));

        let json = serde_json::to_string(&report).unwrap();
        assert_eq!(json, r#"{"Zebra":{"A":1.0},"Alpha":{"B":2.0}}"#);
    }

    #[test]
    fn test_deserialize_duplicate_sheet_keys_last_write_wins() {
        let report: Report =
            serde_json::from_str(r#"{"Sales":{"Revenue":60.0},"Sales":{"Revenue":20.0}}"#)
                .unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(report.get("Sales"), Some(&result(&[("Revenue", 20.0)])));
    }

    #[test]
    fn test_sheet_totals_sums_column_results() {
        let mut report = Report::new();
        report.insert("Sales", result(&[("Revenue", 60.0), ("Units", 6.0)]));
        report.insert("Costs", result(&[("Total", 5.0)]));

        assert_eq!(
            report.sheet_totals(),
            vec![("Sales".to_string(), 66.0), ("Costs".to_string(), 5.0)]
        );
    }

    #[test]
    fn test_operation_request_columns_default_to_empty() {
        let req: OperationRequest =
            serde_json::from_str(r#"{"sheet_name":"Sales","operation":"sum"}"#).unwrap();
        assert!(req.columns.is_empty());
    }
}
