use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid page number: {page} (pages are 1-based)")]
    InvalidPage { page: u32 },

    #[error("Unparseable number for {what}: {value}")]
    BadNumber { what: &'static str, value: String },

    #[error("Unparseable date: {0}")]
    BadDate(String),

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}
