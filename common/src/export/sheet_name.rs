//! レポートのシート名割り当て
//!
//! ファミリー名を31文字に切り詰めてシート名にする。
//! 切り詰め後に重複した場合の扱いは `SheetNamePolicy` で選ぶ。

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Excelのシート名の最大文字数
pub const MAX_SHEET_NAME_LEN: usize = 31;

const INVALID_CHARS: &[char] = &['[', ']', ':', '*', '?', '/', '\\'];

/// 先頭31文字に切り詰め
pub fn truncate_sheet_name(label: &str) -> String {
    label.chars().take(MAX_SHEET_NAME_LEN).collect()
}

/// Excelで使えるシート名か検証
pub fn validate_sheet_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidSheetName("(空)".into()));
    }
    if name.chars().count() > MAX_SHEET_NAME_LEN {
        return Err(Error::InvalidSheetName(format!("{} ({}文字超)", name, MAX_SHEET_NAME_LEN)));
    }
    if let Some(c) = name.chars().find(|c| INVALID_CHARS.contains(c)) {
        return Err(Error::InvalidSheetName(format!("{} (使用不可文字 '{}')", name, c)));
    }
    if name.starts_with('\'') || name.ends_with('\'') {
        return Err(Error::InvalidSheetName(format!("{} (先頭・末尾のアポストロフィ)", name)));
    }
    Ok(())
}

/// 重複シート名の扱い
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SheetNamePolicy {
    /// 連番を付けて区別する
    #[default]
    Suffix,
    /// 後から書いたシートで上書き（旧来の動作）
    Overwrite,
}

impl std::str::FromStr for SheetNamePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "suffix" => Ok(SheetNamePolicy::Suffix),
            "overwrite" => Ok(SheetNamePolicy::Overwrite),
            _ => Err(format!("Unknown sheet name policy: {}. Use suffix or overwrite", s)),
        }
    }
}

impl std::fmt::Display for SheetNamePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SheetNamePolicy::Suffix => write!(f, "suffix"),
            SheetNamePolicy::Overwrite => write!(f, "overwrite"),
        }
    }
}

/// 割り当て結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetSlot {
    pub name: String,
    /// 既存シートを置き換える位置
    pub replaces: Option<usize>,
}

/// 使用済みシート名の管理
///
/// Excelはシート名の大文字小文字を区別しないため、比較は小文字で行う。
/// 予約名（サマリーなど）はどの方針でも上書きされず、連番が付く。
#[derive(Debug, Clone, Default)]
pub struct SheetNames {
    policy: SheetNamePolicy,
    used: Vec<String>,
    reserved: Vec<String>,
}

impl SheetNames {
    pub fn new(policy: SheetNamePolicy) -> Self {
        Self {
            policy,
            used: Vec::new(),
            reserved: Vec::new(),
        }
    }

    /// 後から書くシートの名前を予約
    pub fn reserve(&mut self, name: &str) {
        self.reserved.push(name.to_lowercase());
    }

    fn position(&self, name: &str) -> Option<usize> {
        let key = name.to_lowercase();
        self.used.iter().position(|u| *u == key)
    }

    fn is_reserved(&self, name: &str) -> bool {
        let key = name.to_lowercase();
        self.reserved.iter().any(|r| *r == key)
    }

    /// ラベルに対するシート名を決める（登録はしない）
    pub fn resolve(&self, label: &str) -> SheetSlot {
        let base = truncate_sheet_name(label);

        match (self.position(&base), self.policy) {
            _ if self.is_reserved(&base) => self.suffixed(&base),
            (None, _) => SheetSlot { name: base, replaces: None },
            (Some(idx), SheetNamePolicy::Overwrite) => SheetSlot { name: base, replaces: Some(idx) },
            (Some(_), SheetNamePolicy::Suffix) => self.suffixed(&base),
        }
    }

    fn suffixed(&self, base: &str) -> SheetSlot {
        let mut n = 2;
        loop {
            let suffix = format!(" ({})", n);
            let keep = MAX_SHEET_NAME_LEN - suffix.chars().count();
            let stem: String = base.chars().take(keep).collect();
            let candidate = format!("{}{}", stem.trim_end(), suffix);
            if self.position(&candidate).is_none() && !self.is_reserved(&candidate) {
                return SheetSlot { name: candidate, replaces: None };
            }
            n += 1;
        }
    }

    /// 割り当てを確定
    pub fn register(&mut self, slot: &SheetSlot) {
        if slot.replaces.is_none() {
            self.used.push(slot.name.to_lowercase());
        }
    }

    pub fn len(&self) -> usize {
        self.used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }
}
