//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("参照カテゴリが空のため照合できません: {0}")]
    NoCandidates(String),

    #[error("シート名が不正: {0}")]
    InvalidSheetName(String),

    #[error("Report error: {0}")]
    Report(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
