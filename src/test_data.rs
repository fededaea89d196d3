#![cfg(test)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{Duration, TimeZone, Utc};

use crate::blog::{Blog, ValidBlog};
use crate::client::blog_service::BlogService;
use crate::client::user_service::{UserDirectory, UserEnvelope, UserProfile};
use crate::client::ClientError;

pub const IMAGE_DATA: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNk+M9QDwADhgGAWjR9awAAAABJRU5ErkJggg==";

pub const DESCRIPTION: &str = "How to be a great software engineer? Someone asked me this question today and I didn't have an answer. \
After thinking for a while, I came up with a list of what I try to do myself.";

/// Blog number `n`, created by `user-<n>` one hour after blog `n - 1`.
pub fn sample_blog(n: u32) -> Blog {
    let start = Utc.with_ymd_and_hms(2022, 4, 2, 12, 5, 0).unwrap();
    Blog {
        id: format!("blog-{}", n),
        title: format!("Post {}", n),
        description: DESCRIPTION.to_string(),
        image: IMAGE_DATA.to_string(),
        created_by: Some(format!("user-{}", n)),
        created_at: start + Duration::hours(n as i64),
    }
}

pub fn sample_blogs(count: u32) -> Vec<Blog> {
    (1..=count).map(sample_blog).collect()
}

pub fn valid_blog(title: &str, created_by: Option<&str>) -> ValidBlog {
    ValidBlog {
        title: title.to_string(),
        image: IMAGE_DATA.to_string(),
        description: DESCRIPTION.to_string(),
        created_by: created_by.map(|s| s.to_string()),
    }
}

pub struct FakeUsers {
    pub users: HashMap<String, UserEnvelope>,
}

impl FakeUsers {
    /// Every `user-<n>` resolves to `name-<n>`, except the ones in `failing`.
    pub fn for_blogs(blogs: &[Blog], failing: &[&str]) -> Self {
        let users = blogs.iter()
            .filter_map(|blog| blog.created_by.clone())
            .filter(|id| !failing.contains(&id.as_str()))
            .map(|id| {
                let envelope = UserEnvelope {
                    message: Some(UserProfile {
                        username: Some(id.replace("user-", "name-")),
                        profile_picture: Some("cGlj".to_string()),
                    }),
                };
                (id, envelope)
            })
            .collect();
        FakeUsers { users }
    }
}

impl UserDirectory for FakeUsers {
    async fn fetch_user_by_id(&self, id: &str) -> Result<UserEnvelope, ClientError> {
        tokio::task::yield_now().await;
        self.users.get(id)
            .cloned()
            .ok_or_else(|| ClientError::Failed("Failed to fetch user data".to_string()))
    }
}

/// Serves `blogs`, or fails every call when `blogs` is `None`.
pub struct FakeBlogs {
    pub blogs: Option<Vec<Blog>>,
    pub list_calls: AtomicUsize,
    pub detail_calls: AtomicUsize,
}

impl FakeBlogs {
    pub fn new(blogs: Option<Vec<Blog>>) -> Self {
        FakeBlogs {
            blogs,
            list_calls: AtomicUsize::new(0),
            detail_calls: AtomicUsize::new(0),
        }
    }
}

impl BlogService for FakeBlogs {
    async fn fetch_blogs(&self) -> Result<Vec<Blog>, ClientError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.blogs.clone().ok_or_else(|| ClientError::Failed("Failed to fetch blogs".to_string()))
    }

    async fn get_blog_by_id(&self, id: &str) -> Result<Blog, ClientError> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        self.blogs.as_ref()
            .and_then(|blogs| blogs.iter().find(|b| b.id == id).cloned())
            .ok_or_else(|| ClientError::Failed("Failed to fetch blog details".to_string()))
    }
}
