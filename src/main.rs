use clap::Parser;
use asset_param_check::{cli, config, error, loader, pipeline};
use cli::{Cli, Commands};
use config::Config;
use error::{AssetCheckError, Result};
use loader::{CalamineWorkbook, WorkbookSource};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = match (&cli.command, Config::load(cli.config_file.as_deref())) {
        // --init は指定パスがまだ無くてもよい
        (Commands::Config { init: true, .. }, Err(AssetCheckError::FileNotFound(_))) => Config::default(),
        (_, result) => result?,
    };

    match cli.command {
        Commands::Check { reference, export, output, sheet_names, summary } => {
            println!("🔎 asset-check - パラメータ検証\n");

            if let Some(path) = reference {
                config.reference_path = path;
            }
            if let Some(path) = export {
                config.export_path = path;
            }
            if let Some(path) = output {
                config.output_path = path;
            }
            if let Some(policy) = sheet_names {
                config.report.sheet_names = policy;
            }
            if let Some(mode) = summary {
                config.report.summary = mode;
            }

            let report = pipeline::run(&config, cli.verbose)?;

            println!(
                "\n✅ 完了: {}シート処理, {}スキップ, {}エラー, 不足あり {}件",
                report.check.processed.len(),
                report.check.skipped.len(),
                report.check.errors.len() + report.export.errors.len(),
                report.check.summary.records().iter().filter(|r| !r.is_complete()).count(),
            );
        }

        Commands::Sheets { export } => {
            let path = export.unwrap_or_else(|| config.export_path.clone());
            let workbook = CalamineWorkbook::open(&path)?;

            println!("📄 {}\n", path.display());
            for (i, sheet) in workbook.sheet_names().iter().enumerate() {
                if config.export.is_excluded(sheet) {
                    println!("  {:>2}) {} (除外)", i + 1, sheet);
                } else {
                    println!(
                        "  {:>2}) {} (読み飛ばし {}行)",
                        i + 1,
                        sheet,
                        config.export.skip_rows_for(sheet)
                    );
                }
            }
        }

        Commands::Config { show, init, force } => {
            let path = match cli.config_file {
                Some(p) => p,
                None => Config::config_path()?,
            };

            if init {
                if path.exists() && !force {
                    println!("設定ファイルが既に存在します: {} (--force で上書き)", path.display());
                } else {
                    Config::default().save(&path)?;
                    println!("✔ 設定ファイルを作成しました: {}", path.display());
                }
            }

            if show || !init {
                println!("設定 ({}):", path.display());
                println!("{}", serde_json::to_string_pretty(&config)?);
            }
        }
    }

    Ok(())
}
