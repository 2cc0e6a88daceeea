//! レポートブック
//!
//! 表ごとのシートを順に追加し、最後に一度だけ保存する。

use crate::error::{AssetCheckError, Result};
use asset_check_common::{
    build_comparison_sheet, build_summary_sheet, Comparison, MissingParametersRecord, ReportStyle,
    SheetNamePolicy, SheetNames, SUMMARY_SHEET_NAME,
};
use rust_xlsxwriter::{Workbook, Worksheet};
use std::path::Path;

pub struct ReportBook {
    names: SheetNames,
    sheets: Vec<Worksheet>,
    style: ReportStyle,
}

impl ReportBook {
    pub fn new(policy: SheetNamePolicy, style: ReportStyle) -> Self {
        let mut names = SheetNames::new(policy);
        names.reserve(SUMMARY_SHEET_NAME);

        Self {
            names,
            sheets: Vec::new(),
            style,
        }
    }

    /// 比較表シートを追加し、シート名を返す
    ///
    /// シート名はファミリー名の先頭31文字。重複時は `SheetNamePolicy` に従う。
    pub fn add_comparison(&mut self, family_label: &str, comparison: &Comparison) -> Result<String> {
        let slot = self.names.resolve(family_label);
        let worksheet = build_comparison_sheet(&slot.name, comparison, &self.style)?;

        match slot.replaces {
            Some(idx) => self.sheets[idx] = worksheet,
            None => self.sheets.push(worksheet),
        }
        self.names.register(&slot);

        Ok(slot.name)
    }

    /// サマリーシートを末尾に追加
    ///
    /// シート名は作成時に予約済みのため、比較表シートと重複しない。
    pub fn add_summary(&mut self, records: &[MissingParametersRecord]) -> Result<String> {
        let worksheet = build_summary_sheet(SUMMARY_SHEET_NAME, records, &self.style)?;
        self.sheets.push(worksheet);
        Ok(SUMMARY_SHEET_NAME.to_string())
    }

    /// 追加済みシート名（出力順）
    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|ws| ws.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    /// ブックを保存（出力先フォルダが無ければ作成）
    pub fn save(self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut workbook = Workbook::new();
        for worksheet in self.sheets {
            workbook.push_worksheet(worksheet);
        }

        workbook
            .save(path)
            .map_err(|e| AssetCheckError::ExcelGeneration(format!("{}: {}", path.display(), e)))
    }
}
