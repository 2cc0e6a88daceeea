use crate::error::{AssetCheckError, Result};
use asset_check_common::{ReportStyle, SheetNamePolicy, SummaryMode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 参照データモデルのブック
    pub reference_path: PathBuf,
    /// 検証対象のエクスポートブック
    pub export_path: PathBuf,
    /// 出力レポート
    pub output_path: PathBuf,
    pub reference: ReferenceSettings,
    pub export: ExportSettings,
    pub report: ReportSettings,
}

/// 参照ブックの読み込み設定
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceSettings {
    pub sheet: String,
    /// ヘッダー前に読み飛ばす行数
    pub skip_rows: usize,
    /// 空の行を除外するキー列
    pub key_column: String,
    pub category_column: String,
    pub parameter_column: String,
    /// チェックに不要な管理用の列
    pub drop_columns: Vec<String>,
}

impl Default for ReferenceSettings {
    fn default() -> Self {
        Self {
            sheet: "Modello_Dati".into(),
            skip_rows: 4,
            key_column: "PE".into(),
            category_column: "ELEMENTO".into(),
            parameter_column: "PARAMETRI INFORMATIVI".into(),
            drop_columns: ["Unnamed: 0", "PROGETTO", "FAMIGLIA", "DOCFAP", "PFTE", "PED", "PE", "ASB"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// エクスポートブックの読み込み設定
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// データを含まないシート
    pub excluded_sheets: Vec<String>,
    pub default_skip_rows: usize,
    /// シート名ごとの読み飛ばし行数
    pub skip_overrides: BTreeMap<String, usize>,
    /// ファミリー名の列
    pub family_column: String,
    /// 列名の整形をしない列
    pub passthrough_columns: Vec<String>,
}

impl Default for ExportSettings {
    fn default() -> Self {
        let mut skip_overrides = BTreeMap::new();
        skip_overrides.insert("Zone riscaldamento, ventilazion".to_string(), 2);

        Self {
            excluded_sheets: vec!["Instructions".into(), "ParamValues".into()],
            default_skip_rows: 1,
            skip_overrides,
            family_column: "Famiglia".into(),
            passthrough_columns: vec!["GUID".into()],
        }
    }
}

impl ExportSettings {
    pub fn is_excluded(&self, sheet: &str) -> bool {
        self.excluded_sheets.iter().any(|s| s == sheet)
    }

    pub fn skip_rows_for(&self, sheet: &str) -> usize {
        self.skip_overrides
            .get(sheet)
            .copied()
            .unwrap_or(self.default_skip_rows)
    }
}

/// レポート出力設定
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// 16進RGB（例: "90EE90"）
    pub pass_color: String,
    pub fail_color: String,
    pub column_padding: usize,
    pub sheet_names: SheetNamePolicy,
    pub summary: SummaryMode,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            pass_color: "90EE90".into(),
            fail_color: "FFB6C1".into(),
            column_padding: 2,
            sheet_names: SheetNamePolicy::default(),
            summary: SummaryMode::default(),
        }
    }
}

impl ReportSettings {
    pub fn style(&self) -> Result<ReportStyle> {
        Ok(ReportStyle {
            pass_color: parse_color(&self.pass_color)?,
            fail_color: parse_color(&self.fail_color)?,
            padding: self.column_padding,
        })
    }
}

/// "90EE90" / "#90EE90" 形式の色を解析
pub fn parse_color(value: &str) -> Result<u32> {
    let hex = value.trim().trim_start_matches('#');
    if hex.len() != 6 {
        return Err(AssetCheckError::Config(format!("色は6桁の16進数で指定してください: {}", value)));
    }
    u32::from_str_radix(hex, 16)
        .map_err(|_| AssetCheckError::Config(format!("色の形式が不正: {}", value)))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reference_path: PathBuf::from("data/reference.xlsx"),
            export_path: PathBuf::from("data/export.xlsx"),
            output_path: PathBuf::from("results").join("infrarail_assets_checks.xlsx"),
            reference: ReferenceSettings::default(),
            export: ExportSettings::default(),
            report: ReportSettings::default(),
        }
    }
}

impl Config {
    /// 設定を読み込み
    ///
    /// 明示されたパスが無ければエラー、既定パスが無ければ既定値。
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => {
                if !p.exists() {
                    return Err(AssetCheckError::FileNotFound(p.display().to_string()));
                }
                p.to_path_buf()
            }
            None => Self::config_path()?,
        };

        if config_path.exists() {
            Self::from_file(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| AssetCheckError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("asset-check").join("config.json"))
    }

    pub fn validate(&self) -> Result<()> {
        self.report.style()?;
        if self.reference.category_column.is_empty() || self.reference.parameter_column.is_empty() {
            return Err(AssetCheckError::Config("カテゴリ列・パラメータ列の名前が空です".into()));
        }
        if self.export.family_column.is_empty() {
            return Err(AssetCheckError::Config("ファミリー列の名前が空です".into()));
        }
        Ok(())
    }
}
