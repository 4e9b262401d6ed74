//! Error taxonomy for the front end.
//!
//! Three families, matching how failures surface to the user:
//! - [`ValidationError`]: detected client-side, shown immediately, never
//!   sent to the backend and never mutates draft state.
//! - [`ApiError`]: any transport failure or non-success HTTP status. The
//!   message names the operation that failed, the way the original UI
//!   alerts did. Never retried automatically.
//! - [`StorageError`]: local draft/blob persistence failures, surfaced to
//!   the user exactly like an [`ApiError`].

use std::fmt;

/// Maximum accepted upload size (10 MiB).
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Client-side validation failure. Surfaced synchronously; no state change.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// One or more mandatory fields are empty. Carries the UI label of
    /// every missing field, not just the first.
    #[error("以下の必須項目を入力してください：{}", .0.join("、"))]
    MissingFields(Vec<&'static str>),

    /// Selected file is not a PDF (by declared MIME type or content).
    #[error("PDFファイルを選択してください")]
    NotAPdf,

    /// Selected file exceeds [`MAX_FILE_SIZE`].
    #[error("ファイルサイズは10MB以下にしてください")]
    FileTooLarge { size: u64 },

    /// Search submitted with an empty (post-trim) query.
    #[error("検索キーワードを入力してください")]
    EmptyQuery,
}

/// Which backend operation an [`ApiError`] belongs to. Rendered into the
/// user-facing failure message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiOperation {
    ListDocuments,
    GetDocument,
    CreateDocument,
    UpdateDocument,
    DeleteDocument,
    Search,
    IssueUploadUrl,
    UploadFile,
    DownloadFile,
}

impl fmt::Display for ApiOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::ListDocuments => "文書一覧の取得",
            Self::GetDocument => "文書の取得",
            Self::CreateDocument => "文書の登録",
            Self::UpdateDocument => "文書の更新",
            Self::DeleteDocument => "文書の削除",
            Self::Search => "検索",
            Self::IssueUploadUrl => "アップロードURLの取得",
            Self::UploadFile => "ファイルのアップロード",
            Self::DownloadFile => "ファイルのダウンロード",
        };
        f.write_str(label)
    }
}

/// Backend/API failure. One variant per transport outcome; both render as
/// "<operation>に失敗しました" for the user.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{op}に失敗しました")]
    Network {
        op: ApiOperation,
        #[source]
        source: reqwest::Error,
    },

    #[error("{op}に失敗しました (HTTP {status})")]
    Server { op: ApiOperation, status: u16 },
}

impl ApiError {
    pub fn operation(&self) -> ApiOperation {
        match self {
            Self::Network { op, .. } | Self::Server { op, .. } => *op,
        }
    }
}

/// Local storage failure (temporary file store or draft store).
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("一時ファイルの保存領域にアクセスできませんでした")]
    Io(#[from] std::io::Error),

    #[error("保存された入力内容を読み取れませんでした")]
    Corrupt(#[from] serde_json::Error),
}

/// Any failure a controller can produce.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl AppError {
    /// True when the failure came from client-side validation (the form
    /// should re-render inline rather than show an operation alert).
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
