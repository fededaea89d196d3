use std::sync::RwLock;

use chrono::Utc;
use uuid::Uuid;

use crate::blog::{Blog, BlogPatch, ValidBlog};
use crate::store::{apply_patch, BlogStore, StoreError};

pub struct MemoryStore {
    blogs: RwLock<Vec<Blog>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::from_blogs(vec![])
    }

    pub fn from_blogs(blogs: Vec<Blog>) -> Self {
        MemoryStore {
            blogs: RwLock::new(blogs),
        }
    }

    /// Swaps in `blogs` as the whole content of the store.
    pub(crate) fn replace_all(&self, blogs: Vec<Blog>) -> Result<(), StoreError> {
        let mut stored = self.blogs.write().map_err(|_| StoreError::Poisoned)?;
        *stored = blogs;
        Ok(())
    }
}

/// New record for `blog` with a fresh id and the current time.
pub(crate) fn new_record(blog: ValidBlog) -> Blog {
    Blog {
        id: Uuid::new_v4().to_string(),
        title: blog.title,
        description: blog.description,
        image: blog.image,
        created_by: blog.created_by,
        created_at: Utc::now(),
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BlogStore for MemoryStore {
    fn insert(&self, blog: ValidBlog) -> Result<Blog, StoreError> {
        let blog = new_record(blog);
        let mut blogs = self.blogs.write().map_err(|_| StoreError::Poisoned)?;
        blogs.push(blog.clone());
        Ok(blog)
    }

    fn find_all(&self) -> Result<Vec<Blog>, StoreError> {
        let blogs = self.blogs.read().map_err(|_| StoreError::Poisoned)?;
        Ok(blogs.clone())
    }

    fn find_by_id(&self, id: &str) -> Result<Option<Blog>, StoreError> {
        let blogs = self.blogs.read().map_err(|_| StoreError::Poisoned)?;
        Ok(blogs.iter().find(|blog| blog.id == id).cloned())
    }

    fn find_by_creator(&self, user_id: &str) -> Result<Vec<Blog>, StoreError> {
        let blogs = self.blogs.read().map_err(|_| StoreError::Poisoned)?;
        let found = blogs.iter()
            .filter(|blog| blog.created_by.as_deref() == Some(user_id))
            .cloned()
            .collect();
        Ok(found)
    }

    fn update_one(&self, id: &str, patch: &BlogPatch) -> Result<Option<Blog>, StoreError> {
        let mut blogs = self.blogs.write().map_err(|_| StoreError::Poisoned)?;
        let Some(stored) = blogs.iter_mut().find(|blog| blog.id == id) else {
            return Ok(None);
        };

        let updated = apply_patch(stored, patch)?;
        *stored = updated.clone();
        Ok(Some(updated))
    }
}
