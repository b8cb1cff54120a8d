//! Report renderers: PDF documents and the per-sheet totals chart

pub mod chart;
pub mod pdf;
