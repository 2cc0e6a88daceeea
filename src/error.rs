use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssetCheckError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("ブックを開けません: {0}")]
    Workbook(String),

    #[error("シートが見つかりません: {sheet}（存在するシート: {}）", .available.join(", "))]
    SheetNotFound {
        sheet: String,
        available: Vec<String>,
    },

    #[error("必須列がありません（シート {sheet}）: {}", .columns.join(", "))]
    MissingColumns {
        sheet: String,
        columns: Vec<String>,
    },

    #[error("シート読み込みエラー（{sheet}）: {message}")]
    Sheet {
        sheet: String,
        message: String,
    },

    #[error("処理エラー（{table}）: {message}")]
    Processing {
        table: String,
        message: String,
    },

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] asset_check_common::Error),
}

impl AssetCheckError {
    /// 入力ファイル読み込み系のエラーか
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            AssetCheckError::FileNotFound(_)
                | AssetCheckError::Workbook(_)
                | AssetCheckError::SheetNotFound { .. }
                | AssetCheckError::MissingColumns { .. }
        )
    }

    /// 表単位の処理エラーに包む
    pub fn processing(table: impl Into<String>, err: impl std::fmt::Display) -> Self {
        AssetCheckError::Processing {
            table: table.into(),
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AssetCheckError>;
