use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use spdlog::{debug, error, info};

use crate::blog::{Blog, BlogPatch, ValidBlog};
use crate::store::memory_store::{new_record, MemoryStore};
use crate::store::{apply_patch, BlogStore, StoreError};

/// Memory store backed by a JSON snapshot file. The snapshot is loaded once
/// on open and rewritten on every mutation. A mutation only becomes visible
/// once its snapshot is on disk.
pub struct JsonFileStore {
    path: PathBuf,
    inner: MemoryStore,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let blogs: Vec<Blog> = if path.exists() {
            let content = fs::read_to_string(path)?;
            if content.trim().is_empty() {
                vec![]
            } else {
                serde_json::from_str(&content)?
            }
        } else {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            vec![]
        };
        info!("Loaded {} blogs from {}", blogs.len(), path.display());

        Ok(JsonFileStore {
            path: path.to_path_buf(),
            inner: MemoryStore::from_blogs(blogs),
            write_lock: Mutex::new(()),
        })
    }

    fn write_snapshot(&self, blogs: &[Blog]) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(blogs)?;

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, content)?;
        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        debug!("Snapshot with {} blogs written to {}", blogs.len(), self.path.display());
        Ok(())
    }

    /// Writes `blogs` to disk and only then makes them visible in memory.
    fn commit(&self, blogs: Vec<Blog>) -> Result<(), StoreError> {
        if let Err(e) = self.write_snapshot(&blogs) {
            error!("Error writing snapshot {}: {}", self.path.display(), e);
            return Err(e);
        }
        self.inner.replace_all(blogs)
    }
}

impl BlogStore for JsonFileStore {
    fn insert(&self, blog: ValidBlog) -> Result<Blog, StoreError> {
        let _guard = self.write_lock.lock().map_err(|_| StoreError::Poisoned)?;
        let blog = new_record(blog);
        let mut blogs = self.inner.find_all()?;
        blogs.push(blog.clone());
        self.commit(blogs)?;
        Ok(blog)
    }

    fn find_all(&self) -> Result<Vec<Blog>, StoreError> {
        self.inner.find_all()
    }

    fn find_by_id(&self, id: &str) -> Result<Option<Blog>, StoreError> {
        self.inner.find_by_id(id)
    }

    fn find_by_creator(&self, user_id: &str) -> Result<Vec<Blog>, StoreError> {
        self.inner.find_by_creator(user_id)
    }

    fn update_one(&self, id: &str, patch: &BlogPatch) -> Result<Option<Blog>, StoreError> {
        let _guard = self.write_lock.lock().map_err(|_| StoreError::Poisoned)?;
        let mut blogs = self.inner.find_all()?;
        let Some(stored) = blogs.iter_mut().find(|blog| blog.id == id) else {
            return Ok(None);
        };

        let updated = apply_patch(stored, patch)?;
        *stored = updated.clone();
        self.commit(blogs)?;
        Ok(Some(updated))
    }
}
