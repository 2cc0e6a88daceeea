//! チェック処理全体の統合テスト
//!
//! rust_xlsxwriter で入力ブックを作成し、出力レポートを calamine で読み戻して検証

use asset_check_common::{CellValue, SheetNamePolicy, SummaryMode, SUMMARY_SHEET_NAME};
use asset_param_check::config::Config;
use asset_param_check::loader::{load_export_from, load_reference, MemoryWorkbook};
use asset_param_check::pipeline::{self, CheckOptions};
use asset_param_check::report::ReportBook;
use calamine::{open_workbook_auto, Data, Range, Reader};
use rust_xlsxwriter::Workbook;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

const LONG_A: &str = "Impianto di riscaldamento e ventilazione - zona A";
const LONG_B: &str = "Impianto di riscaldamento e ventilazione - zona B";

/// 参照ブック（4行の定型ヘッダー + 表）
fn write_reference(path: &Path, entries: &[(&str, &str, &str)]) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Modello_Dati").unwrap();
    sheet.write_string(0, 0, "MODELLO DATI INFRASTRUTTURA").unwrap();
    sheet.write_string(2, 0, "rev. 3").unwrap();

    let header = ["", "PROGETTO", "ELEMENTO", "PARAMETRI INFORMATIVI", "PE", "NOTE"];
    for (col, name) in header.iter().enumerate() {
        if !name.is_empty() {
            sheet.write_string(4, col as u16, *name).unwrap();
        }
    }

    for (i, (category, parameter, pe)) in entries.iter().enumerate() {
        let row = 5 + i as u32;
        sheet.write_number(row, 0, (i + 1) as f64).unwrap();
        sheet.write_string(row, 1, "PRJ").unwrap();
        sheet.write_string(row, 2, *category).unwrap();
        sheet.write_string(row, 3, *parameter).unwrap();
        if !pe.is_empty() {
            sheet.write_string(row, 4, *pe).unwrap();
        }
        sheet.write_string(row, 5, format!("nota {}", i + 1)).unwrap();
    }

    workbook.save(path).unwrap();
}

/// エクスポートのシート定義（シート名, ヘッダー, データ行）
struct ExportSheet<'a> {
    name: &'a str,
    header: Vec<&'a str>,
    rows: Vec<Vec<&'a str>>,
}

fn write_export(path: &Path, sheets: &[ExportSheet]) {
    let mut workbook = Workbook::new();

    let instructions = workbook.add_worksheet();
    instructions.set_name("Instructions").unwrap();
    instructions.write_string(0, 0, "Istruzioni di compilazione").unwrap();

    for def in sheets {
        let sheet = workbook.add_worksheet();
        sheet.set_name(def.name).unwrap();
        sheet.write_string(0, 0, def.name).unwrap();
        for (col, name) in def.header.iter().enumerate() {
            sheet.write_string(1, col as u16, *name).unwrap();
        }
        for (r, row) in def.rows.iter().enumerate() {
            for (col, value) in row.iter().enumerate() {
                if !value.is_empty() {
                    sheet.write_string(2 + r as u32, col as u16, *value).unwrap();
                }
            }
        }
    }

    workbook.save(path).unwrap();
}

fn test_config(dir: &Path) -> Config {
    let mut config = Config::default();
    config.reference_path = dir.join("data").join("reference.xlsx");
    config.export_path = dir.join("data").join("export.xlsx");
    config.output_path = dir.join("results").join("checks.xlsx");
    config
}

fn prepare(dir: &Path) -> PathBuf {
    let data = dir.join("data");
    std::fs::create_dir_all(&data).unwrap();
    data
}

fn read_output(path: &Path) -> (Vec<String>, impl FnMut(&str) -> Range<Data>) {
    let mut workbook = open_workbook_auto(path).expect("レポートを開けない");
    let names = workbook.sheet_names();
    (names, move |name: &str| workbook.worksheet_range(name).expect("シートを読めない"))
}

fn string_at(range: &Range<Data>, row: u32, col: u32) -> String {
    range
        .get_value((row, col))
        .map(|v| v.to_string())
        .unwrap_or_default()
}

#[test]
fn test_round_trip_scenario() {
    let dir = tempdir().expect("Failed to create temp dir");
    let data = prepare(dir.path());

    write_reference(
        &data.join("reference.xlsx"),
        &[
            ("CatA", "Width", "X"),
            ("CatA", "Height", "X"),
            ("CatB", "Material", "X"),
            ("CatA", "Depth", ""),
        ],
    );
    write_export(
        &data.join("export.xlsx"),
        &[
            ExportSheet {
                name: "Export A",
                header: vec!["Famiglia", "Width\n[mm]", "GUID", "Vuota"],
                rows: vec![vec!["cat a", "120", "g-1", ""], vec!["cat a", "130", "g-2", ""]],
            },
            ExportSheet {
                name: "Senza famiglia",
                header: vec!["Tipo", "Width"],
                rows: vec![vec!["x", "1"]],
            },
        ],
    );

    let config = test_config(dir.path());
    let report = pipeline::run(&config, true).expect("実行失敗");

    assert_eq!(report.export.skipped_sheets, vec!["Instructions"]);
    assert_eq!(report.check.skipped, vec!["Senza famiglia"]);
    assert!(report.check.errors.is_empty());

    let processed = &report.check.processed[0];
    assert_eq!(processed.matched.category, "CatA");
    assert!(processed.matched.score > 0.8);
    assert_eq!(processed.verdicts.len(), 2);
    assert!(processed.verdicts[0].present);
    assert_eq!(processed.verdicts[0].matched_column.as_deref(), Some("Width"));
    assert!(!processed.verdicts[1].present);

    let records = report.check.summary.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].family_label, "cat a");
    assert_eq!(records[0].category, "CatA");
    assert_eq!(records[0].missing_joined(), "Height");

    assert!(config.output_path.exists(), "レポートが作成されていない");
    let (names, mut sheet) = read_output(&config.output_path);
    assert_eq!(names, vec!["cat a".to_string(), SUMMARY_SHEET_NAME.to_string()]);

    let comparison = sheet("cat a");
    assert_eq!(string_at(&comparison, 0, 0), "ELEMENTO");
    assert_eq!(string_at(&comparison, 0, 1), "PARAMETRI INFORMATIVI");
    assert_eq!(string_at(&comparison, 0, 2), "NOTE");
    assert_eq!(string_at(&comparison, 0, 3), "parameter_exists");
    assert_eq!(string_at(&comparison, 0, 4), "param_current");
    assert_eq!(string_at(&comparison, 1, 1), "Width");
    assert_eq!(comparison.get_value((1, 3)), Some(&Data::Bool(true)));
    assert_eq!(string_at(&comparison, 1, 4), "Width");
    assert_eq!(string_at(&comparison, 2, 1), "Height");
    assert_eq!(comparison.get_value((2, 3)), Some(&Data::Bool(false)));
    assert_eq!(string_at(&comparison, 2, 4), "");

    let summary = sheet(SUMMARY_SHEET_NAME);
    assert_eq!(string_at(&summary, 0, 0), "Famiglia");
    assert_eq!(string_at(&summary, 1, 0), "cat a");
    assert_eq!(string_at(&summary, 1, 1), "CatA");
    assert_eq!(string_at(&summary, 1, 2), "Height");
}

fn collision_inputs(dir: &Path) {
    let data = prepare(dir);
    write_reference(
        &data.join("reference.xlsx"),
        &[("Impianto", "Width", "X"), ("Impianto", "Height", "X")],
    );
    write_export(
        &data.join("export.xlsx"),
        &[
            ExportSheet {
                name: "Zona A",
                header: vec!["Famiglia", "Width"],
                rows: vec![vec![LONG_A, "1"]],
            },
            ExportSheet {
                name: "Zona B",
                header: vec!["Famiglia", "Width", "Height"],
                rows: vec![vec![LONG_B, "1", "2"]],
            },
        ],
    );
}

/// 切り詰め後に同名となるシートは後から書いた内容が残る
#[test]
fn test_sheet_name_collision_last_write_wins() {
    let dir = tempdir().expect("Failed to create temp dir");
    collision_inputs(dir.path());

    let mut config = test_config(dir.path());
    config.report.sheet_names = SheetNamePolicy::Overwrite;
    let report = pipeline::run(&config, false).expect("実行失敗");

    let truncated: String = LONG_A.chars().take(31).collect();
    assert_eq!(report.sheet_names, vec![truncated.clone(), SUMMARY_SHEET_NAME.to_string()]);
    assert_eq!(report.check.processed[0].report_sheet, report.check.processed[1].report_sheet);

    let (names, mut sheet) = read_output(&config.output_path);
    assert_eq!(names.len(), 2);

    // zona B の内容（Height あり）
    let comparison = sheet(&truncated);
    assert_eq!(string_at(&comparison, 2, 1), "Height");
    assert_eq!(comparison.get_value((2, 3)), Some(&Data::Bool(true)));

    // サマリーには zona A の不足が残る
    let summary = sheet(SUMMARY_SHEET_NAME);
    assert_eq!(string_at(&summary, 1, 0), LONG_A);
    assert_eq!(string_at(&summary, 1, 2), "Height");
}

#[test]
fn test_sheet_name_collision_suffix() {
    let dir = tempdir().expect("Failed to create temp dir");
    collision_inputs(dir.path());

    let config = test_config(dir.path());
    let report = pipeline::run(&config, false).expect("実行失敗");

    assert_eq!(report.sheet_names.len(), 3);
    assert_eq!(report.sheet_names[0], LONG_A.chars().take(31).collect::<String>());
    assert_eq!(report.sheet_names[1], "Impianto di riscaldamento e (2)");

    let (names, _) = read_output(&config.output_path);
    assert_eq!(names, report.sheet_names);
}

#[test]
fn test_all_families_summary() {
    let dir = tempdir().expect("Failed to create temp dir");
    collision_inputs(dir.path());

    let mut config = test_config(dir.path());
    config.report.summary = SummaryMode::AllFamilies;
    let report = pipeline::run(&config, false).expect("実行失敗");

    let records = report.check.summary.records();
    assert_eq!(records.len(), 2);
    assert!(!records[0].is_complete());
    assert!(records[1].is_complete());

    let (_, mut sheet) = read_output(&config.output_path);
    let summary = sheet(SUMMARY_SHEET_NAME);
    assert_eq!(string_at(&summary, 2, 0), LONG_B);
    assert_eq!(string_at(&summary, 2, 2), "");
}

#[test]
fn test_empty_summary_sheet_is_written() {
    let dir = tempdir().expect("Failed to create temp dir");
    let data = prepare(dir.path());
    write_reference(&data.join("reference.xlsx"), &[("Muro", "Altezza", "X")]);
    write_export(
        &data.join("export.xlsx"),
        &[ExportSheet {
            name: "Muri",
            header: vec!["Famiglia", "altezza "],
            rows: vec![vec!["Muro", "3"]],
        }],
    );

    let config = test_config(dir.path());
    let report = pipeline::run(&config, false).expect("実行失敗");

    assert!(report.check.summary.is_empty());
    assert_eq!(report.sheet_names, vec!["Muro".to_string(), SUMMARY_SHEET_NAME.to_string()]);
}

/// 壊れたシートがあっても他のシートは処理される
#[test]
fn test_malformed_sheet_is_isolated() {
    let dir = tempdir().expect("Failed to create temp dir");
    let data = prepare(dir.path());
    write_reference(&data.join("reference.xlsx"), &[("Muro", "Altezza", "X"), ("Binario", "Scartamento", "X")]);

    let config = test_config(dir.path());
    let reference = load_reference(&config.reference_path, &config.reference).unwrap();

    let text = |s: &str| CellValue::from(s);
    let grid = |family: &str, column: &str| {
        vec![
            vec![text("titolo")],
            vec![text("Famiglia"), text(column)],
            vec![text(family), CellValue::Number(1.0)],
        ]
    };
    let mut workbook = MemoryWorkbook::new()
        .with_sheet("Muri", grid("Muro", "Altezza"))
        .with_broken_sheet("Rotta", "unexpected end of file")
        .with_sheet("Binari", grid("Binario", "Larghezza"));

    let load = load_export_from(&mut workbook, &config.export);
    assert_eq!(load.processed_sheets(), vec!["Muri", "Binari"]);
    assert_eq!(load.errors.len(), 1);
    assert!(load.errors[0].contains("Rotta"));

    let mut book = ReportBook::new(SheetNamePolicy::Suffix, config.report.style().unwrap());
    let options = CheckOptions::from_config(&config);
    let run = pipeline::check_tables(&reference, &load.tables, &mut book, &options, false);

    assert_eq!(run.processed.len(), 2);
    assert_eq!(run.summary.len(), 1);
    assert_eq!(run.summary.records()[0].missing_joined(), "Scartamento");
}

/// 表単位の失敗は記録され、後続の表は処理される
#[test]
fn test_table_failure_is_isolated() {
    let dir = tempdir().expect("Failed to create temp dir");
    let data = prepare(dir.path());
    write_reference(&data.join("reference.xlsx"), &[("Muro", "Altezza", "X")]);
    write_export(
        &data.join("export.xlsx"),
        &[
            ExportSheet {
                name: "Pareti",
                header: vec!["Famiglia", "Altezza"],
                rows: vec![vec!["Muro/Parete", "3"]],
            },
            ExportSheet {
                name: "Muri",
                header: vec!["Famiglia", "Altezza"],
                rows: vec![vec!["Muro", "3"]],
            },
        ],
    );

    let config = test_config(dir.path());
    let report = pipeline::run(&config, false).expect("実行失敗");

    assert_eq!(report.check.errors.len(), 1);
    assert!(report.check.errors[0].contains("Muro/Parete"));
    assert_eq!(report.check.processed.len(), 1);
    assert_eq!(report.sheet_names, vec!["Muro".to_string(), SUMMARY_SHEET_NAME.to_string()]);
}

/// ファミリー列があっても先頭行が空なら対象外（エラーではない）
#[test]
fn test_blank_family_label_is_skipped() {
    let dir = tempdir().expect("Failed to create temp dir");
    let data = prepare(dir.path());
    write_reference(&data.join("reference.xlsx"), &[("Muro", "Altezza", "X")]);

    let config = test_config(dir.path());
    let reference = load_reference(&config.reference_path, &config.reference).unwrap();

    let text = |s: &str| CellValue::from(s);
    let mut workbook = MemoryWorkbook::new().with_sheet(
        "Senza nome",
        vec![
            vec![text("titolo")],
            vec![text("Famiglia"), text("Altezza")],
            vec![CellValue::Empty, CellValue::Number(3.0)],
            vec![text("Muro"), CellValue::Number(4.0)],
        ],
    );

    let load = load_export_from(&mut workbook, &config.export);
    assert!(load.tables[0].columns().contains(&"Famiglia".to_string()));

    let mut book = ReportBook::new(SheetNamePolicy::Suffix, config.report.style().unwrap());
    let options = CheckOptions::from_config(&config);
    let run = pipeline::check_tables(&reference, &load.tables, &mut book, &options, false);

    assert_eq!(run.skipped, vec!["Senza nome"]);
    assert!(run.errors.is_empty());
    assert!(run.processed.is_empty());
    assert!(book.is_empty());
}
