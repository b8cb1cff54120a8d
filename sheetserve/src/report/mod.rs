//! The sheet-operation evaluation contract: how an aggregation request maps
//! deterministically to a result table.

mod assemble;
mod evaluate;
mod types;

pub use assemble::assemble;
pub use evaluate::{OperationKind, evaluate};
pub use types::{AssembleError, OperationRequest, OperationResult, Report, ReportError};
