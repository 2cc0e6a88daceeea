//! チェック処理の全体フロー
//!
//! 1. 参照データモデルの読み込み（失敗時は中断）
//! 2. エクスポートブックの読み込み（シート単位の失敗は記録して継続）
//! 3. 表ごとにカテゴリ照合・パラメータチェック・シート追加（表単位の失敗は記録して継続）
//! 4. サマリーシートを追加して保存

use crate::config::Config;
use crate::error::{AssetCheckError, Result};
use crate::loader::{load_export, load_reference, ExportLoad};
use crate::report::ReportBook;
use asset_check_common::{
    compare, match_category, missing_record, CategoryMatch, ExportedTable, MissingSummary,
    ParameterVerdict, ReferenceModel, SummaryMode,
};
use std::path::PathBuf;

/// 表ごとの処理オプション
#[derive(Debug, Clone)]
pub struct CheckOptions {
    pub family_column: String,
    pub summary_mode: SummaryMode,
}

impl CheckOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            family_column: config.export.family_column.clone(),
            summary_mode: config.report.summary,
        }
    }
}

/// 処理済みの表
#[derive(Debug, Clone)]
pub struct ProcessedTable {
    /// 元のシート名
    pub sheet_name: String,
    /// レポート上のシート名
    pub report_sheet: String,
    pub matched: CategoryMatch,
    pub verdicts: Vec<ParameterVerdict>,
    /// この表の分のサマリー
    pub summary: MissingSummary,
}

impl ProcessedTable {
    pub fn missing_count(&self) -> usize {
        self.verdicts.iter().filter(|v| !v.present).count()
    }
}

/// 表1つの処理結果
#[derive(Debug, Clone)]
pub enum TableOutcome {
    /// ファミリー名が無く対象外
    Skipped { sheet_name: String },
    Processed(ProcessedTable),
}

/// 表1つを照合・チェックしてレポートに追加
pub fn process_table(
    reference: &ReferenceModel,
    categories: &[&str],
    table: &ExportedTable,
    book: &mut ReportBook,
    options: &CheckOptions,
) -> Result<TableOutcome> {
    let matched = match_category(categories, table, &options.family_column)
        .map_err(|e| AssetCheckError::processing(&table.sheet_name, e))?;

    let Some(matched) = matched else {
        return Ok(TableOutcome::Skipped {
            sheet_name: table.sheet_name.clone(),
        });
    };

    let comparison = compare(reference, &matched.category, table.columns());
    let report_sheet = book
        .add_comparison(&matched.family_label, &comparison)
        .map_err(|e| AssetCheckError::processing(&matched.family_label, e))?;

    let mut summary = MissingSummary::new();
    summary.record(missing_record(&matched, &comparison, options.summary_mode));

    Ok(TableOutcome::Processed(ProcessedTable {
        sheet_name: table.sheet_name.clone(),
        report_sheet,
        verdicts: comparison.verdicts().cloned().collect(),
        matched,
        summary,
    }))
}

/// 全表の処理結果
#[derive(Debug, Default)]
pub struct CheckRun {
    pub processed: Vec<ProcessedTable>,
    /// ファミリー名が無く対象外となったシート
    pub skipped: Vec<String>,
    /// 表単位のエラーメッセージ
    pub errors: Vec<String>,
    pub summary: MissingSummary,
}

/// 全表を順に処理
///
/// 1つの表の失敗は記録して次の表へ進む。
pub fn check_tables(
    reference: &ReferenceModel,
    tables: &[ExportedTable],
    book: &mut ReportBook,
    options: &CheckOptions,
    verbose: bool,
) -> CheckRun {
    let categories = reference.categories();
    let mut run = CheckRun::default();

    for table in tables {
        match process_table(reference, &categories, table, book, options) {
            Ok(TableOutcome::Processed(processed)) => {
                println!(
                    "✔ Processed {} → {} (類似度 {:.2}, 不足 {}/{})",
                    processed.matched.family_label,
                    processed.matched.category,
                    processed.matched.score,
                    processed.missing_count(),
                    processed.verdicts.len(),
                );
                if verbose {
                    for verdict in &processed.verdicts {
                        println!(
                            "    {} {}{}",
                            if verdict.present { "○" } else { "×" },
                            verdict.parameter,
                            verdict
                                .matched_column
                                .as_deref()
                                .map(|c| format!(" ← {}", c))
                                .unwrap_or_default(),
                        );
                    }
                }
                run.summary.merge(processed.summary.clone());
                run.processed.push(processed);
            }
            Ok(TableOutcome::Skipped { sheet_name }) => {
                println!(
                    "⚠ {}: ファミリー名（'{}' 列）が無いか空のためスキップ",
                    sheet_name, options.family_column
                );
                run.skipped.push(sheet_name);
            }
            Err(e) => {
                eprintln!("✖ {}", e);
                run.errors.push(e.to_string());
            }
        }
    }

    run
}

/// 実行結果
#[derive(Debug)]
pub struct RunReport {
    pub export: ExportLoad,
    pub check: CheckRun,
    pub sheet_names: Vec<String>,
    pub output_path: PathBuf,
}

/// 設定に従ってチェックを実行し、レポートを保存
pub fn run(config: &Config, verbose: bool) -> Result<RunReport> {
    let style = config.report.style()?;

    println!("[1/4] 参照データを読み込み中...");
    let reference = load_reference(&config.reference_path, &config.reference)?;
    if verbose && reference.dropped_rows > 0 {
        println!("  カテゴリ・パラメータが空の行を除外: {}件", reference.dropped_rows);
    }
    println!(
        "✔ {}: {}件のパラメータ, {}カテゴリ\n",
        config.reference_path.display(),
        reference.len(),
        reference.categories().len()
    );

    println!("[2/4] エクスポートデータを読み込み中...");
    let export = load_export(&config.export_path, &config.export)?;
    for sheet in &export.skipped_sheets {
        println!("- 除外シート: {}", sheet);
    }
    for message in &export.errors {
        eprintln!("✖ {}", message);
    }
    if verbose {
        for table in &export.tables {
            println!(
                "  {}: {}行 × {}列 (読み飛ばし {}行)",
                table.sheet_name,
                table.table.rows.len(),
                table.table.columns.len(),
                config.export.skip_rows_for(&table.sheet_name)
            );
        }
    }
    println!("✔ {}シートを読み込み\n", export.tables.len());

    println!("[3/4] パラメータをチェック中...");
    let mut book = ReportBook::new(config.report.sheet_names, style);
    let options = CheckOptions::from_config(config);
    let check = check_tables(&reference, &export.tables, &mut book, &options, verbose);
    println!();

    println!("[4/4] レポートを保存中...");
    book.add_summary(check.summary.records())?;
    let sheet_names = book.sheet_names();
    book.save(&config.output_path)?;

    println!("\nResults saved to: {}", config.output_path.display());

    Ok(RunReport {
        export,
        check,
        sheet_names,
        output_path: config.output_path.clone(),
    })
}
