use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid array id: '{0}'")]
    InvalidArrayId(String),
    #[error("page numbers start at 1, got {0}")]
    InvalidPage(u32),
}

pub type Result<T> = std::result::Result<T, ModelError>;
