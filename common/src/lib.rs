//! Asset Check Common Library
//!
//! 参照データモデルとエクスポート表の照合ロジック（I/Oなし）

pub mod types;
pub mod error;
pub mod similarity;
pub mod matcher;
pub mod checker;
pub mod export;

pub use types::{CellValue, Table, ReferenceEntry, ReferenceModel, ExportedTable};
pub use error::{Error, Result};
pub use similarity::{normalize_label, similarity};
pub use matcher::{CategoryMatch, match_category};
pub use checker::{
    Comparison, ComparisonRow, MissingParametersRecord, MissingSummary, ParameterVerdict,
    SummaryMode, check_parameters, compare, missing_record,
};
pub use export::sheet_name::{
    SheetNamePolicy, SheetNames, SheetSlot, truncate_sheet_name, validate_sheet_name, MAX_SHEET_NAME_LEN,
};
#[cfg(feature = "excel")]
pub use export::report_core::{
    ReportStyle, build_comparison_sheet, build_summary_sheet, comparison_fills, SUMMARY_SHEET_NAME,
};
