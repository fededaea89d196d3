use std::io;

use thiserror::Error;

use crate::blog::{Blog, BlogPatch, ValidBlog, IMMUTABLE_FIELDS};

pub mod json_file_store;
pub mod memory_store;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Field '{0}' cannot be modified")]
    ImmutableField(String),

    #[error("Store lock poisoned")]
    Poisoned,
}

/// Document store holding blog records.
///
/// `find_all` returns records in insertion order. `update_one` returns
/// `Ok(None)` when no record matches the id and leaves the store untouched.
pub trait BlogStore: Send + Sync {
    fn insert(&self, blog: ValidBlog) -> Result<Blog, StoreError>;
    fn find_all(&self) -> Result<Vec<Blog>, StoreError>;
    fn find_by_id(&self, id: &str) -> Result<Option<Blog>, StoreError>;
    fn find_by_creator(&self, user_id: &str) -> Result<Vec<Blog>, StoreError>;
    fn update_one(&self, id: &str, patch: &BlogPatch) -> Result<Option<Blog>, StoreError>;
}

/// Applies `patch` on top of `blog` the way a `$set` update does.
pub fn apply_patch(blog: &Blog, patch: &BlogPatch) -> Result<Blog, StoreError> {
    let mut doc = match serde_json::to_value(blog)? {
        serde_json::Value::Object(doc) => doc,
        _ => unreachable!("a blog always serializes to an object"),
    };

    for (key, value) in patch {
        if IMMUTABLE_FIELDS.contains(&key.as_str()) && doc.get(key) != Some(value) {
            return Err(StoreError::ImmutableField(key.clone()));
        }
        doc.insert(key.clone(), value.clone());
    }

    Ok(serde_json::from_value(serde_json::Value::Object(doc))?)
}
