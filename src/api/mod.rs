pub mod client;
pub mod session;
pub mod types;

pub use client::BackendClient;
pub use session::{Session, SessionStore};
pub use types::{
    AuditRecord, AuditResult, AuthResponse, ChatMessage, ChatReply, ClientInfo, ClientProfile,
    DashboardOverview, DashboardProject, DashboardStats, Lead, LeadResponse, MachineryMatch,
    ParsedSpec, ProfileUpdate, RiskItem, SheetPileMatch,
};

use thiserror::Error;

/// Failures of the application backend, separated into the categories the
/// UI treats differently. Unlike the CMS layer there is no fallback here;
/// callers surface [`ApiError::user_message`] to the visitor.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("access code rejected")]
    InvalidCredentials,

    /// The analyzer could not treat the upload as a geotechnical document.
    #[error("document rejected: {detail}")]
    InvalidDocument { detail: String },

    #[error("request rate limit exhausted")]
    RateLimited,

    /// Upload refused client-side before any network traffic.
    #[error("file exceeds the 5 MB upload limit")]
    FileTooLarge,

    #[error("unsupported document format: {file_name}")]
    UnsupportedFormat { file_name: String },

    #[error("backend returned status {status}: {detail}")]
    Server { status: u16, detail: String },

    #[error(transparent)]
    Network(#[from] reqwest::Error),
}

impl ApiError {
    /// Localized message shown to the visitor, matching the site copy.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::InvalidCredentials => "Неверный код доступа".to_string(),
            ApiError::InvalidDocument { .. } => {
                "Документ не является геотехнической спецификацией.".to_string()
            }
            ApiError::RateLimited => "Лимит запросов исчерпан. Попробуйте через час.".to_string(),
            ApiError::FileTooLarge => "Файл слишком большой. Максимальный размер 5МБ.".to_string(),
            ApiError::UnsupportedFormat { .. } => {
                "Недопустимый формат файла. Используйте PDF или Excel.".to_string()
            }
            ApiError::Server { detail, .. } if !detail.is_empty() => detail.clone(),
            ApiError::Server { .. } => "Ошибка сервера".to_string(),
            ApiError::Network(_) => "Неизвестная ошибка".to_string(),
        }
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
