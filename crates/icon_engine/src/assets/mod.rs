//! Asset loading
//!
//! Source-asset formats that can be turned into renderable objects.

pub mod obj_loader;

pub use obj_loader::{ObjError, ObjLoader};

use thiserror::Error;

/// Asset system errors
#[derive(Error, Debug)]
pub enum AssetError {
    /// Asset file not found
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// OBJ geometry could not be loaded
    #[error("OBJ load failed: {0}")]
    Obj(#[from] ObjError),
}
