//! ブック読み込みモジュール
//!
//! calamine でシートを読み、A1 起点のグリッドに揃えて返す。
//! 読み込み処理は `WorkbookSource` 経由で行い、ローダーはファイル形式に依存しない。

pub mod reference;
pub mod export;

use crate::error::{AssetCheckError, Result};
use asset_check_common::CellValue;
use calamine::{open_workbook_auto, Data, Reader, Sheets};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub use export::{load_export, load_export_from, ExportLoad};
pub use reference::{load_reference, load_reference_from};

/// シートのセル値（行ごと、A1 起点）
pub type Grid = Vec<Vec<CellValue>>;

/// シート単位で読み込めるブック
pub trait WorkbookSource {
    /// シート名（ブック内の順序）
    fn sheet_names(&self) -> Vec<String>;
    /// シートをグリッドとして読む
    fn read_grid(&mut self, sheet: &str) -> std::result::Result<Grid, String>;
}

/// calamine で開いたブック（xlsx / xls / xlsb / ods）
pub struct CalamineWorkbook {
    sheets: Sheets<BufReader<File>>,
}

impl CalamineWorkbook {
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(AssetCheckError::FileNotFound(path.display().to_string()));
        }

        let sheets = open_workbook_auto(path)
            .map_err(|e| AssetCheckError::Workbook(format!("{}: {}", path.display(), e)))?;
        Ok(Self { sheets })
    }
}

impl WorkbookSource for CalamineWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.sheet_names()
    }

    fn read_grid(&mut self, sheet: &str) -> std::result::Result<Grid, String> {
        let range = self.sheets.worksheet_range(sheet).map_err(|e| e.to_string())?;

        // calamine の Range は最初の使用セルから始まるため、先頭の空行・空列を補う
        let Some((start_row, start_col)) = range.start() else {
            return Ok(Vec::new());
        };

        let mut grid: Grid = vec![Vec::new(); start_row as usize];
        for row in range.rows() {
            let mut cells = vec![CellValue::Empty; start_col as usize];
            cells.extend(row.iter().map(cell_value));
            grid.push(cells);
        }

        Ok(grid)
    }
}

/// calamine のセル値を変換
pub fn cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(v) => CellValue::Number(*v),
        Data::Int(v) => CellValue::Number(*v as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        other => CellValue::Text(other.to_string()),
    }
}

/// メモリ上のブック
///
/// シートごとに読み込み結果（成功・失敗）を持つ。
#[derive(Debug, Clone, Default)]
pub struct MemoryWorkbook {
    sheets: Vec<(String, std::result::Result<Grid, String>)>,
}

impl MemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sheet(mut self, name: &str, grid: Grid) -> Self {
        self.sheets.push((name.to_string(), Ok(grid)));
        self
    }

    /// 読み込みに失敗するシート
    pub fn with_broken_sheet(mut self, name: &str, message: &str) -> Self {
        self.sheets.push((name.to_string(), Err(message.to_string())));
        self
    }
}

impl WorkbookSource for MemoryWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|(name, _)| name.clone()).collect()
    }

    fn read_grid(&mut self, sheet: &str) -> std::result::Result<Grid, String> {
        self.sheets
            .iter()
            .find(|(name, _)| name == sheet)
            .map(|(_, grid)| grid.clone())
            .unwrap_or_else(|| Err(format!("シートが存在しません: {}", sheet)))
    }
}
