// crates/obox-core/src/lib.rs
pub mod geometry;
pub mod elements;
pub mod config;
pub mod scene;

pub use geometry::*;
pub use elements::*;
pub use config::*;
pub use scene::*;

#[derive(Debug, thiserror::Error)]
pub enum BoxError {
    #[error("Invalid scene: {0}")]
    InvalidScene(String),

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("Duplicate child id: {0}")]
    DuplicateChild(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BoxError>;
