//! カテゴリ照合
//!
//! エクスポート表のファミリー名に最も近い参照カテゴリを選ぶ。
//! 閾値は設けず、スコアは参考値としてレポートに出す。

use crate::error::{Error, Result};
use crate::similarity::{normalize_label, ratio};
use crate::types::ExportedTable;
use serde::Serialize;

/// 照合結果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryMatch {
    /// エクスポート側のファミリー名（原文）
    pub family_label: String,
    /// 選ばれた参照カテゴリ
    pub category: String,
    /// 類似度（0.0〜1.0）
    pub score: f64,
}

/// 候補から最良のカテゴリを選ぶ
///
/// 同点の場合は候補列挙順で先のものを採用する。
pub fn best_category<'a, I>(family_label: &str, candidates: I) -> Option<CategoryMatch>
where
    I: IntoIterator<Item = &'a str>,
{
    let family = normalize_label(family_label);
    let mut best: Option<(&str, f64)> = None;

    for candidate in candidates {
        let score = ratio(&family, &normalize_label(candidate));
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((candidate, score)),
        }
    }

    best.map(|(category, score)| CategoryMatch {
        family_label: family_label.to_string(),
        category: category.to_string(),
        score,
    })
}

/// エクスポート表をカテゴリに照合
///
/// ファミリー名が無い表は `Ok(None)`（対象外）。
/// ファミリー名があり候補が空の場合は `Error::NoCandidates`。
pub fn match_category(
    categories: &[&str],
    table: &ExportedTable,
    family_column: &str,
) -> Result<Option<CategoryMatch>> {
    let Some(family) = table.family_label(family_column) else {
        return Ok(None);
    };

    best_category(&family, categories.iter().copied())
        .map(Some)
        .ok_or(Error::NoCandidates(family))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CellValue, Table};

    fn table_with_family(family: Option<&str>) -> ExportedTable {
        let (columns, rows) = match family {
            Some(f) => (
                vec!["Famiglia".to_string(), "Width".to_string()],
                vec![vec![CellValue::from(f), CellValue::Number(1.0)]],
            ),
            None => (vec!["Width".to_string()], vec![vec![CellValue::Number(1.0)]]),
        };
        ExportedTable::new("Sheet1", Table { columns, rows })
    }

    #[test]
    fn test_match_approximate_label() {
        let table = table_with_family(Some("cat a"));
        let matched = match_category(&["CatB extra", "CatA"], &table, "Famiglia")
            .unwrap()
            .unwrap();
        assert_eq!(matched.category, "CatA");
        assert_eq!(matched.family_label, "cat a");
        assert!(matched.score > 0.8);
    }

    #[test]
    fn test_no_family_column_is_not_applicable() {
        let table = table_with_family(None);
        assert_eq!(match_category(&["CatA"], &table, "Famiglia").unwrap(), None);
    }

    #[test]
    fn test_no_candidates_is_error() {
        let table = table_with_family(Some("cat a"));
        let err = match_category(&[], &table, "Famiglia").unwrap_err();
        assert!(matches!(err, Error::NoCandidates(ref f) if f == "cat a"));
    }

    #[test]
    fn test_tie_prefers_first_candidate() {
        // どちらも正規化後は "muro"
        let matched = best_category("Muro", ["MURO!", "muro"]).unwrap();
        assert_eq!(matched.category, "MURO!");
        assert_eq!(matched.score, 1.0);
    }

    #[test]
    fn test_low_similarity_is_still_accepted() {
        let matched = best_category("zzz", ["Binario"]).unwrap();
        assert_eq!(matched.category, "Binario");
        assert_eq!(matched.score, 0.0);
    }

    #[test]
    fn test_exactly_one_result_per_label() {
        let candidates = ["Muro", "Binario", "Palo", "Plinto"];
        for label in ["muri", "binari", "pali", "xyz"] {
            let matched = best_category(label, candidates).unwrap();
            assert!(candidates.contains(&matched.category.as_str()));
        }
    }
}
