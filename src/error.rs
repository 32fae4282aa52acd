use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportAiError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("APIキーが設定されていません。`report-ai config --set-api-key YOUR_KEY` で設定してください")]
    MissingApiKey,

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("画像読み込みエラー: {0}")]
    ImageRead(String),

    #[error("API呼び出しエラー: {0}")]
    ApiCall(String),

    #[error("レスポンスのデコードに失敗: {0}")]
    Decode(String),

    #[error("ストアエラー: {0}")]
    Store(#[from] report_ai_common::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ReportAiError>;
