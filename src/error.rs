use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProfileAiError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("APIキーが設定されていません。`profile-ai config --set-api-key YOUR_KEY` で設定してください")]
    MissingApiKey,

    #[error("APIキーの形式が不正です: {0}")]
    InvalidApiKey(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("未対応の画像形式です: {0}")]
    UnsupportedImage(String),

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    #[error("API呼び出しエラー: {0}")]
    ApiCall(String),

    #[error("API認証エラー: {0}")]
    AuthFailed(String),

    #[error("APIレート制限を超過しました: {0}")]
    QuotaExceeded(String),

    #[error("コンテンツポリシーによりブロックされました: {0}")]
    ContentBlocked(String),

    #[error("APIレスポンスが空です")]
    EmptyResponse,

    #[error("解析レスポンスのパースに失敗: {0}")]
    Parse(#[from] profile_photo_common::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("解析が進行中です。完了を待ってから再実行してください")]
    AnalysisInProgress,
}

pub type Result<T> = std::result::Result<T, ProfileAiError>;
