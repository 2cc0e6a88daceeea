//! エクスポートブックの読み込み
//!
//! 除外シート以外の全シートを表として読み込む。
//! シート単位の失敗は記録して次のシートへ進み、全体は中断しない。

use super::{CalamineWorkbook, WorkbookSource};
use crate::config::ExportSettings;
use crate::error::{AssetCheckError, Result};
use asset_check_common::{ExportedTable, Table};
use std::path::Path;

/// 読み込み結果
#[derive(Debug, Clone, Default)]
pub struct ExportLoad {
    /// 読み込めた表（シート順）
    pub tables: Vec<ExportedTable>,
    /// 除外設定により読み飛ばしたシート
    pub skipped_sheets: Vec<String>,
    /// シート単位のエラーメッセージ
    pub errors: Vec<String>,
}

impl ExportLoad {
    pub fn processed_sheets(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.sheet_name.as_str()).collect()
    }
}

/// 列名を整形（最初の改行より前を取り、前後の空白を除く）
pub fn clean_column_name(name: &str, passthrough: &[String]) -> String {
    if passthrough.iter().any(|p| p == name) {
        return name.to_string();
    }
    name.split('\n').next().unwrap_or_default().trim().to_string()
}

/// エクスポートブックを読み込む
///
/// ブック自体が開けない場合のみエラーを返す。
pub fn load_export(path: &Path, settings: &ExportSettings) -> Result<ExportLoad> {
    let mut workbook = CalamineWorkbook::open(path)?;
    Ok(load_export_from(&mut workbook, settings))
}

pub fn load_export_from<W: WorkbookSource>(workbook: &mut W, settings: &ExportSettings) -> ExportLoad {
    let mut load = ExportLoad::default();

    for sheet in workbook.sheet_names() {
        if settings.is_excluded(&sheet) {
            load.skipped_sheets.push(sheet);
            continue;
        }

        match load_sheet(workbook, &sheet, settings) {
            Ok(table) => load.tables.push(table),
            Err(e) => load.errors.push(e.to_string()),
        }
    }

    load
}

/// 1シートを表として読み込む
pub fn load_sheet<W: WorkbookSource>(
    workbook: &mut W,
    sheet: &str,
    settings: &ExportSettings,
) -> Result<ExportedTable> {
    let sheet_error = |message: String| AssetCheckError::Sheet {
        sheet: sheet.to_string(),
        message,
    };

    let grid = workbook.read_grid(sheet).map_err(sheet_error)?;
    let skip_rows = settings.skip_rows_for(sheet);

    let mut table = Table::from_grid(grid, skip_rows)
        .ok_or_else(|| sheet_error(format!("ヘッダー行がありません（{}行読み飛ばし後）", skip_rows)))?;

    if table.is_empty() {
        return Err(sheet_error("データ行がありません".into()));
    }

    table.rename_columns(|c| clean_column_name(c, &settings.passthrough_columns));
    table.drop_empty_columns();

    Ok(ExportedTable::new(sheet, table))
}
