//! 参照データモデルの読み込み
//!
//! 先頭の定型行を読み飛ばし、キー列が空の行と管理用の列を除いて
//! (ELEMENTO, PARAMETRI INFORMATIVI) の組に整える。

use super::{CalamineWorkbook, WorkbookSource};
use crate::config::ReferenceSettings;
use crate::error::{AssetCheckError, Result};
use asset_check_common::{ReferenceModel, Table};
use std::path::Path;

/// 参照ブックを読み込む
pub fn load_reference(path: &Path, settings: &ReferenceSettings) -> Result<ReferenceModel> {
    let mut workbook = CalamineWorkbook::open(path)?;
    load_reference_from(&mut workbook, settings)
}

pub fn load_reference_from<W: WorkbookSource>(
    workbook: &mut W,
    settings: &ReferenceSettings,
) -> Result<ReferenceModel> {
    let available = workbook.sheet_names();
    if !available.iter().any(|s| s == &settings.sheet) {
        return Err(AssetCheckError::SheetNotFound {
            sheet: settings.sheet.clone(),
            available,
        });
    }

    let grid = workbook
        .read_grid(&settings.sheet)
        .map_err(|e| AssetCheckError::Workbook(format!("{}: {}", settings.sheet, e)))?;

    let required = [
        settings.key_column.as_str(),
        settings.category_column.as_str(),
        settings.parameter_column.as_str(),
    ];
    let missing_columns = |table: Option<&Table>| AssetCheckError::MissingColumns {
        sheet: settings.sheet.clone(),
        columns: required
            .iter()
            .filter(|c| table.map(|t| !t.has_column(c)).unwrap_or(true))
            .map(|c| c.to_string())
            .collect(),
    };

    let mut table = Table::from_grid(grid, settings.skip_rows).ok_or_else(|| missing_columns(None))?;
    if required.iter().any(|c| !table.has_column(c)) {
        return Err(missing_columns(Some(&table)));
    }

    // キー列が空の行を除外
    if let Some(key) = table.column_index(&settings.key_column) {
        table.retain_rows(|row| !row[key].is_blank());
    }

    table.drop_columns(&settings.drop_columns);

    // 管理用の列の指定にカテゴリ列・パラメータ列が含まれていた場合
    let (Some(category), Some(parameter)) = (
        table.column_index(&settings.category_column),
        table.column_index(&settings.parameter_column),
    ) else {
        return Err(missing_columns(Some(&table)));
    };

    Ok(ReferenceModel::from_table(table, category, parameter))
}
