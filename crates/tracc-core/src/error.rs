use thiserror::Error;

/// Reasons a variable catalog is rejected at load time.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("variable catalog is empty")]
    Empty,
    #[error("duplicate variable key `{0}`")]
    DuplicateKey(String),
    #[error("expected exactly one bivariate `{role}` axis, found {found}")]
    BivariateAxis { role: &'static str, found: usize },
}

#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("unknown variable `{0}`")]
    UnknownVariable(String),

    #[error("invalid variable catalog: {0}")]
    InvalidCatalog(#[from] CatalogError),

    /// Every candidate source of a dataset failed; nothing may be rendered.
    #[error("no source available for {dataset} (tried: {})", .tried.join(", "))]
    NoSourceAvailable { dataset: String, tried: Vec<String> },

    #[error("malformed JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "fetch")]
    #[error("HTTP error: {0}")]
    Fetch(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, AtlasError>;
