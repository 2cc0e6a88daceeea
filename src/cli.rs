use asset_check_common::{SheetNamePolicy, SummaryMode};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "asset-check")]
#[command(about = "エクスポート資産データの必須パラメータ検証ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 設定ファイル（省略時: ~/.config/asset-check/config.json）
    #[arg(long = "config", global = true)]
    pub config_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 参照データモデルとエクスポートを照合してレポートを出力
    Check {
        /// 参照データモデルのExcelファイル
        #[arg(short, long)]
        reference: Option<PathBuf>,

        /// エクスポートのExcelファイル
        #[arg(short, long)]
        export: Option<PathBuf>,

        /// 出力レポート（.xlsx）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 重複シート名の扱い (suffix: 連番を付ける [既定] / overwrite: 後のシートで上書きする旧来の動作)
        #[arg(long)]
        sheet_names: Option<SheetNamePolicy>,

        /// サマリーの対象 (missing-only/all-families)
        #[arg(long)]
        summary: Option<SummaryMode>,
    },

    /// エクスポートのシート一覧と読み込み設定を表示
    Sheets {
        /// エクスポートのExcelファイル（省略時は設定値）
        export: Option<PathBuf>,
    },

    /// 設定を表示/初期化
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// 既定値で設定ファイルを作成
        #[arg(long)]
        init: bool,

        /// 既存の設定ファイルを上書き
        #[arg(long)]
        force: bool,
    },
}
