//! Error types for tracklist-core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// No parser recognized the contents
    #[error("Unsupported format: no parser recognized the contents")]
    UnsupportedFormat,

    /// A parser recognized the contents but the expected structure is missing
    #[error("Structurally invalid {format} export")]
    StructurallyInvalid { format: &'static str },

    #[error("XML error: {0}")]
    Xml(String),

    #[error("Text encoding error: {0}")]
    Encoding(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<roxmltree::Error> for Error {
    fn from(e: roxmltree::Error) -> Self {
        Error::Xml(e.to_string())
    }
}

impl From<std::string::FromUtf8Error> for Error {
    fn from(e: std::string::FromUtf8Error) -> Self {
        Error::Encoding(e.to_string())
    }
}

impl From<std::string::FromUtf16Error> for Error {
    fn from(e: std::string::FromUtf16Error) -> Self {
        Error::Encoding(e.to_string())
    }
}
