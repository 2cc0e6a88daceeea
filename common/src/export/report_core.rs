//! レポートシート生成（共通ライブラリ）
//!
//! 比較表・サマリーを rust_xlsxwriter の Worksheet に書き込む。
//! ブックへの追加と保存は呼び出し側で行う。

use super::column_widths;
use super::sheet_name::validate_sheet_name;
use crate::checker::{Comparison, MissingParametersRecord};
use crate::error::{Error, Result};
use crate::types::CellValue;
use rust_xlsxwriter::{Color, Format, Worksheet};

/// サマリーシート名
pub const SUMMARY_SHEET_NAME: &str = "Missing Parameters Summary";

/// サマリーシートのヘッダー
pub const SUMMARY_HEADER: [&str; 4] = ["Famiglia", "Elemento", "Missing Parameters", "Similarity Score"];

/// 色・余白の設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportStyle {
    /// 合格（存在）の塗りつぶし色
    pub pass_color: u32,
    /// 不合格（欠落）の塗りつぶし色
    pub fail_color: u32,
    /// 列幅の余白（文字数）
    pub padding: usize,
}

impl Default for ReportStyle {
    fn default() -> Self {
        Self {
            pass_color: 0x90EE90,
            fail_color: 0xFFB6C1,
            padding: 2,
        }
    }
}

impl ReportStyle {
    /// 判定に対応する塗りつぶし色
    pub fn fill_for(&self, pass: bool) -> u32 {
        if pass {
            self.pass_color
        } else {
            self.fail_color
        }
    }

    /// サマリー行全体の塗りつぶし色（不足なしで合格色）
    pub fn summary_row_fill(&self, record: &MissingParametersRecord) -> u32 {
        self.fill_for(record.is_complete())
    }
}

fn fill_format(color: u32) -> Format {
    Format::new().set_background_color(Color::RGB(color))
}

fn header_format() -> Format {
    Format::new().set_bold()
}

fn write_header(worksheet: &mut Worksheet, header: &[String]) -> Result<()> {
    let format = header_format();
    for (col, name) in header.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, name.as_str(), &format)
            .map_err(|e| Error::Report(format!("ヘッダー書き込みエラー: {}", e)))?;
    }
    Ok(())
}

fn write_cell(worksheet: &mut Worksheet, row: u32, col: u16, value: &CellValue) -> Result<()> {
    let written = match value {
        CellValue::Empty => return Ok(()),
        CellValue::Text(s) if s.is_empty() => return Ok(()),
        CellValue::Text(s) => worksheet.write_string(row, col, s.as_str()),
        CellValue::Number(n) => worksheet.write_number(row, col, *n),
        CellValue::Bool(b) => worksheet.write_boolean(row, col, *b),
    };
    written
        .map(|_| ())
        .map_err(|e| Error::Report(format!("セル書き込みエラー({}, {}): {}", row, col, e)))
}

fn apply_widths(worksheet: &mut Worksheet, widths: &[usize]) -> Result<()> {
    for (col, width) in widths.iter().enumerate() {
        worksheet
            .set_column_width(col as u16, *width as f64)
            .map_err(|e| Error::Report(format!("列幅設定エラー: {}", e)))?;
    }
    Ok(())
}

/// 比較表の表示文字列（列幅計算用）
pub fn comparison_rows_rendered(comparison: &Comparison) -> Vec<Vec<String>> {
    comparison
        .rows
        .iter()
        .map(|row| {
            let mut rendered: Vec<String> = row.fields.iter().map(|v| v.to_string()).collect();
            rendered.push(CellValue::Bool(row.verdict.present).to_string());
            rendered.push(row.verdict.matched_column.clone().unwrap_or_default());
            rendered
        })
        .collect()
}

/// `parameter_exists` 列の各セルの塗りつぶし色（行順）
pub fn comparison_fills(comparison: &Comparison, style: &ReportStyle) -> Vec<u32> {
    comparison
        .verdicts()
        .map(|v| style.fill_for(v.present))
        .collect()
}

/// 比較表シートを生成
///
/// `parameter_exists` 列のセルを判定に応じて塗り分ける。
pub fn build_comparison_sheet(name: &str, comparison: &Comparison, style: &ReportStyle) -> Result<Worksheet> {
    validate_sheet_name(name)?;
    let mut worksheet = Worksheet::new();
    worksheet
        .set_name(name)
        .map_err(|e| Error::InvalidSheetName(format!("{}: {}", name, e)))?;

    let header = comparison.header();
    write_header(&mut worksheet, &header)?;

    let exists_col = comparison.columns.len() as u16;
    let current_col = exists_col + 1;
    let fills = comparison_fills(comparison, style);

    for (idx, (row, fill)) in comparison.rows.iter().zip(fills).enumerate() {
        let excel_row = idx as u32 + 1;
        for (col, value) in row.fields.iter().enumerate() {
            write_cell(&mut worksheet, excel_row, col as u16, value)?;
        }

        let fill = fill_format(fill);
        worksheet
            .write_boolean_with_format(excel_row, exists_col, row.verdict.present, &fill)
            .map_err(|e| Error::Report(format!("判定書き込みエラー: {}", e)))?;

        if let Some(current) = &row.verdict.matched_column {
            worksheet
                .write_string(excel_row, current_col, current.as_str())
                .map_err(|e| Error::Report(format!("列名書き込みエラー: {}", e)))?;
        }
    }

    let widths = column_widths(&header, &comparison_rows_rendered(comparison), style.padding);
    apply_widths(&mut worksheet, &widths)?;

    Ok(worksheet)
}

/// サマリーの表示文字列（列幅計算用）
pub fn summary_rows_rendered(records: &[MissingParametersRecord]) -> Vec<Vec<String>> {
    records
        .iter()
        .map(|r| {
            vec![
                r.family_label.clone(),
                r.category.clone(),
                r.missing_joined(),
                format!("{:.2}", r.score),
            ]
        })
        .collect()
}

/// サマリーシートを生成
///
/// 不足が無い行は合格色、ある行は不合格色で行全体を塗る。
pub fn build_summary_sheet(
    name: &str,
    records: &[MissingParametersRecord],
    style: &ReportStyle,
) -> Result<Worksheet> {
    validate_sheet_name(name)?;
    let mut worksheet = Worksheet::new();
    worksheet
        .set_name(name)
        .map_err(|e| Error::InvalidSheetName(format!("{}: {}", name, e)))?;

    let header: Vec<String> = SUMMARY_HEADER.iter().map(|s| s.to_string()).collect();
    write_header(&mut worksheet, &header)?;

    for (idx, record) in records.iter().enumerate() {
        let excel_row = idx as u32 + 1;
        let fill = fill_format(style.summary_row_fill(record));
        let score_format = fill.clone().set_num_format("0.00");
        let missing = record.missing_joined();

        let result = worksheet
            .write_string_with_format(excel_row, 0, record.family_label.as_str(), &fill)
            .and_then(|ws| ws.write_string_with_format(excel_row, 1, record.category.as_str(), &fill))
            .and_then(|ws| {
                if missing.is_empty() {
                    ws.write_blank(excel_row, 2, &fill)
                } else {
                    ws.write_string_with_format(excel_row, 2, missing.as_str(), &fill)
                }
            })
            .and_then(|ws| ws.write_number_with_format(excel_row, 3, record.score, &score_format));
        result.map_err(|e| Error::Report(format!("サマリー書き込みエラー: {}", e)))?;
    }

    let widths = column_widths(&header, &summary_rows_rendered(records), style.padding);
    apply_widths(&mut worksheet, &widths)?;

    Ok(worksheet)
}
