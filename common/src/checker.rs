//! パラメータ存在チェック
//!
//! 照合したカテゴリの必須パラメータと、エクスポート表の実列を突き合わせる。
//! 列名の比較は大文字小文字・前後空白を無視する。

use crate::matcher::CategoryMatch;
use crate::types::{CellValue, ReferenceModel};
use serde::{Deserialize, Serialize};

/// 存在判定列のヘッダー
pub const EXISTS_COLUMN: &str = "parameter_exists";
/// 対応する実列名のヘッダー
pub const CURRENT_COLUMN: &str = "param_current";

/// 1パラメータの判定結果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterVerdict {
    pub parameter: String,
    pub present: bool,
    /// 一致した実列名（列順で最初のもの）
    pub matched_column: Option<String>,
}

fn column_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// 必須パラメータごとに実列の有無を判定（入力順を保持）
pub fn check_parameters<'a, I>(required: I, columns: &[String]) -> Vec<ParameterVerdict>
where
    I: IntoIterator<Item = &'a str>,
{
    let keys: Vec<String> = columns.iter().map(|c| column_key(c)).collect();

    required
        .into_iter()
        .map(|parameter| {
            let key = column_key(parameter);
            let matched_column = keys
                .iter()
                .position(|k| *k == key)
                .map(|idx| columns[idx].clone());
            ParameterVerdict {
                parameter: parameter.to_string(),
                present: matched_column.is_some(),
                matched_column,
            }
        })
        .collect()
}

/// 比較表の1行（参照行 + 判定）
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRow {
    pub fields: Vec<CellValue>,
    pub verdict: ParameterVerdict,
}

/// カテゴリ単位の比較表
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    /// 参照表の列
    pub columns: Vec<String>,
    pub rows: Vec<ComparisonRow>,
}

impl Comparison {
    /// 出力用ヘッダー（参照列 + 判定列2つ）
    pub fn header(&self) -> Vec<String> {
        let mut header = self.columns.clone();
        header.push(EXISTS_COLUMN.to_string());
        header.push(CURRENT_COLUMN.to_string());
        header
    }

    /// 不足パラメータ（参照順）
    pub fn missing(&self) -> Vec<String> {
        self.rows
            .iter()
            .filter(|r| !r.verdict.present)
            .map(|r| r.verdict.parameter.clone())
            .collect()
    }

    pub fn verdicts(&self) -> impl Iterator<Item = &ParameterVerdict> {
        self.rows.iter().map(|r| &r.verdict)
    }
}

/// 参照モデルから指定カテゴリの比較表を作成
pub fn compare(reference: &ReferenceModel, category: &str, columns: &[String]) -> Comparison {
    let entries: Vec<_> = reference.entries_for(category).collect();
    let verdicts = check_parameters(entries.iter().map(|e| e.parameter.as_str()), columns);

    let rows = entries
        .into_iter()
        .zip(verdicts)
        .map(|(entry, verdict)| ComparisonRow {
            fields: entry.fields.clone(),
            verdict,
        })
        .collect();

    Comparison {
        columns: reference.columns.clone(),
        rows,
    }
}

/// サマリーの記録対象
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SummaryMode {
    /// 不足があるファミリーのみ
    #[default]
    MissingOnly,
    /// 処理した全ファミリー
    AllFamilies,
}

impl std::str::FromStr for SummaryMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "missing-only" | "missing" => Ok(SummaryMode::MissingOnly),
            "all-families" | "all" => Ok(SummaryMode::AllFamilies),
            _ => Err(format!("Unknown summary mode: {}. Use missing-only or all-families", s)),
        }
    }
}

impl std::fmt::Display for SummaryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SummaryMode::MissingOnly => write!(f, "missing-only"),
            SummaryMode::AllFamilies => write!(f, "all-families"),
        }
    }
}

/// サマリーの1行
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingParametersRecord {
    pub family_label: String,
    pub category: String,
    pub missing: Vec<String>,
    pub score: f64,
}

impl MissingParametersRecord {
    /// 不足パラメータをカンマ区切りで連結
    pub fn missing_joined(&self) -> String {
        self.missing.join(", ")
    }

    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// 表1つ分の判定からサマリー行を作成
pub fn missing_record(
    matched: &CategoryMatch,
    comparison: &Comparison,
    mode: SummaryMode,
) -> Option<MissingParametersRecord> {
    let missing = comparison.missing();
    if missing.is_empty() && mode == SummaryMode::MissingOnly {
        return None;
    }
    Some(MissingParametersRecord {
        family_label: matched.family_label.clone(),
        category: matched.category.clone(),
        missing,
        score: matched.score,
    })
}

/// 実行全体のサマリー
///
/// 表ごとの処理はそれぞれ自分の `MissingSummary` を返し、
/// 呼び出し側が `merge` で集約する。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MissingSummary {
    records: Vec<MissingParametersRecord>,
}

impl MissingSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, record: Option<MissingParametersRecord>) {
        if let Some(r) = record {
            self.records.push(r);
        }
    }

    pub fn merge(&mut self, other: MissingSummary) {
        self.records.extend(other.records);
    }

    pub fn records(&self) -> &[MissingParametersRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
