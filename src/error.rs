use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("request timed out")]
    Timeout,

    #[error("backend returned {status}: {}", detail.as_deref().unwrap_or("no detail"))]
    Backend { status: u16, detail: Option<String> },

    #[error("invalid input: {0}")]
    Validation(String),

    #[error("invalid permission grant: {0}")]
    Permission(String),

    #[error("import failed: {0}")]
    Import(String),

    #[error("no active session: {0}")]
    Session(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout
        } else {
            Error::Transport(err.to_string())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Ar,
    En,
}

impl std::str::FromStr for Locale {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "ar" => Ok(Locale::Ar),
            "en" => Ok(Locale::En),
            _ => Err(Error::Config(format!("unsupported locale: {}", s))),
        }
    }
}

/// A fallback message in both supported locales.
#[derive(Debug, Clone, Copy)]
pub struct Fallback {
    pub ar: &'static str,
    pub en: &'static str,
}

impl Fallback {
    pub const fn new(ar: &'static str, en: &'static str) -> Self {
        Self { ar, en }
    }

    pub fn get(&self, locale: Locale) -> &'static str {
        match locale {
            Locale::Ar => self.ar,
            Locale::En => self.en,
        }
    }
}

pub const IMPORT_FAILED: Fallback = Fallback::new("فشل الاستيراد", "Import failed");
pub const EXPORT_FAILED: Fallback = Fallback::new("فشل تصدير البيانات", "Export failed");
pub const SELECT_CSV_FILE: Fallback = Fallback::new("يرجى اختيار ملف CSV", "Please select a CSV file");

impl Error {
    /// The message shown to the user at a view boundary.
    ///
    /// A backend `detail` string is surfaced verbatim. Validation and import
    /// errors carry their own text. Everything else collapses to `fallback`.
    pub fn user_message(&self, locale: Locale, fallback: &Fallback) -> String {
        match self {
            Error::Backend {
                detail: Some(detail),
                ..
            } => detail.clone(),
            Error::Validation(msg) | Error::Import(msg) => msg.clone(),
            _ => fallback.get(locale).to_string(),
        }
    }

    /// Like [`Error::user_message`], with `fallback` as a prefix when the error
    /// carries its own text. An error without one reads as `fallback` alone.
    pub fn prefixed_message(&self, locale: Locale, fallback: &Fallback) -> String {
        let message = self.user_message(locale, fallback);
        let heading = fallback.get(locale);
        if message == heading {
            message
        } else {
            format!("{}: {}", heading, message)
        }
    }
}
