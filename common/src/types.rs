//! 共通型定義
//!
//! シートから読み込んだ表と、参照データモデルの型

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// セル値（読み込み時に判明する型のみ保持）
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl CellValue {
    /// 空セル判定（空文字列も空扱い）
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Number(n) => {
                // 整数値は小数点なしで表示
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            CellValue::Bool(true) => write!(f, "TRUE"),
            CellValue::Bool(false) => write!(f, "FALSE"),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

/// 列スキーマ付きの表
///
/// 列名は読み込み時に確定し、各行は列数と同じ長さに揃える。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// シートのグリッドから表を作成
    ///
    /// 先頭 `skip_rows` 行を読み飛ばし、次の行をヘッダーとする。
    /// ヘッダー行が存在しない場合は `None`。
    pub fn from_grid(grid: Vec<Vec<CellValue>>, skip_rows: usize) -> Option<Self> {
        let mut rows = grid.into_iter().skip(skip_rows);
        let header = rows.next()?;
        let mut body: Vec<Vec<CellValue>> = rows.collect();

        // 末尾の空行を除去
        while body
            .last()
            .map(|r| r.iter().all(CellValue::is_blank))
            .unwrap_or(false)
        {
            body.pop();
        }

        let width = body
            .iter()
            .map(|r| r.len())
            .chain(std::iter::once(header.len()))
            .max()
            .unwrap_or(0);

        if width == 0 {
            return None;
        }

        let columns = (0..width)
            .map(|i| match header.get(i) {
                Some(cell) if !cell.is_blank() => cell.to_string(),
                _ => format!("Unnamed: {}", i),
            })
            .collect();

        for row in &mut body {
            row.resize(width, CellValue::Empty);
        }

        Some(Self { columns, rows: body })
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 列名から列番号を取得（完全一致）
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn value(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// 列名を変換
    pub fn rename_columns<F>(&mut self, f: F)
    where
        F: Fn(&str) -> String,
    {
        self.columns = self.columns.iter().map(|c| f(c)).collect();
    }

    /// 指定列を削除（存在しない列は無視）し、削除した列名を返す
    pub fn drop_columns(&mut self, names: &[String]) -> Vec<String> {
        let targets: HashSet<&str> = names.iter().map(|s| s.as_str()).collect();
        let keep: Vec<bool> = self
            .columns
            .iter()
            .map(|c| !targets.contains(c.as_str()))
            .collect();
        self.retain_columns(&keep)
    }

    /// 全行が空の列を削除し、削除した列名を返す
    pub fn drop_empty_columns(&mut self) -> Vec<String> {
        let keep: Vec<bool> = (0..self.columns.len())
            .map(|i| self.rows.iter().any(|r| !r[i].is_blank()))
            .collect();
        self.retain_columns(&keep)
    }

    /// 条件を満たす行のみ残す
    pub fn retain_rows<F>(&mut self, f: F)
    where
        F: Fn(&[CellValue]) -> bool,
    {
        self.rows.retain(|r| f(r));
    }

    fn retain_columns(&mut self, keep: &[bool]) -> Vec<String> {
        let dropped = self
            .columns
            .iter()
            .zip(keep)
            .filter(|(_, k)| !**k)
            .map(|(c, _)| c.clone())
            .collect();

        self.columns = self
            .columns
            .drain(..)
            .zip(keep)
            .filter(|(_, k)| **k)
            .map(|(c, _)| c)
            .collect();

        for row in &mut self.rows {
            *row = row
                .drain(..)
                .zip(keep)
                .filter(|(_, k)| **k)
                .map(|(v, _)| v)
                .collect();
        }

        dropped
    }
}

/// 参照データモデルの1行（カテゴリ + 必須パラメータ）
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceEntry {
    /// ELEMENTO
    pub category: String,
    /// PARAMETRI INFORMATIVI
    pub parameter: String,
    /// 参照行の全フィールド（`ReferenceModel::columns` と同順）
    pub fields: Vec<CellValue>,
}

/// 参照データモデル
#[derive(Debug, Clone, Default)]
pub struct ReferenceModel {
    /// 参照表の列（管理用の列は削除済み）
    pub columns: Vec<String>,
    pub entries: Vec<ReferenceEntry>,
    /// カテゴリまたはパラメータが空で除外した行数
    pub dropped_rows: usize,
}

impl ReferenceModel {
    /// 整形済みの参照表から作成
    pub fn from_table(table: Table, category_col: usize, parameter_col: usize) -> Self {
        let mut entries = Vec::with_capacity(table.rows.len());
        let mut dropped_rows = 0;

        for row in table.rows {
            let category = row[category_col].to_string().trim().to_string();
            let parameter = row[parameter_col].to_string().trim().to_string();
            if category.is_empty() || parameter.is_empty() {
                dropped_rows += 1;
                continue;
            }
            entries.push(ReferenceEntry {
                category,
                parameter,
                fields: row,
            });
        }

        Self {
            columns: table.columns,
            entries,
            dropped_rows,
        }
    }

    /// カテゴリ一覧（初出順、重複なし）
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .map(|e| e.category.as_str())
            .filter(|c| seen.insert(*c))
            .collect()
    }

    /// 指定カテゴリのエントリ（参照順）
    pub fn entries_for<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a ReferenceEntry> + 'a {
        self.entries.iter().filter(move |e| e.category == category)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// エクスポートブックの1シート分の表
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedTable {
    pub sheet_name: String,
    pub table: Table,
}

impl ExportedTable {
    pub fn new(sheet_name: impl Into<String>, table: Table) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            table,
        }
    }

    /// ファミリー名（先頭行の値のみ参照）
    ///
    /// 列が無い、または先頭行が空の場合は `None`。
    pub fn family_label(&self, family_column: &str) -> Option<String> {
        let col = self.table.column_index(family_column)?;
        let value = self.table.value(0, col)?;
        if value.is_blank() {
            return None;
        }
        Some(value.to_string())
    }

    pub fn columns(&self) -> &[String] {
        &self.table.columns
    }
}
