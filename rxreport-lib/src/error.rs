//! Result and Error types for rxreport-lib

/// Type alias for Result<T, rxreport_lib::Error>
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `rxreport-lib` crate
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed input/output stream")]
    IOError(#[from] std::io::Error),

    #[error("failed to read or write json")]
    JsonError(#[from] serde_json::Error),

    #[error("serialized html is not valid utf-8")]
    Utf8Error(#[from] std::string::FromUtf8Error),

    #[error("malformed css rule \"{0}\"")]
    MalformedRule(String),

    #[error("malformed css declaration \"{0}\"")]
    MalformedDeclaration(String),

    #[error("library \"{0}\" not found in reaction rates")]
    MissingLibrary(String),

    #[error("invalid gradient range [{vmin}, {vmax}]")]
    InvalidRange { vmin: f64, vmax: f64 },
}
