use std::future::Future;

use crate::blog::Blog;
use crate::client::{ApiClient, ClientError};

/// Remote source of blog records.
pub trait BlogService {
    fn fetch_blogs(&self) -> impl Future<Output = Result<Vec<Blog>, ClientError>> + Send;
    fn get_blog_by_id(&self, id: &str) -> impl Future<Output = Result<Blog, ClientError>> + Send;
}

impl BlogService for ApiClient {
    async fn fetch_blogs(&self) -> Result<Vec<Blog>, ClientError> {
        self.get_json("/api/blog", "Failed to fetch blogs").await
    }

    async fn get_blog_by_id(&self, id: &str) -> Result<Blog, ClientError> {
        self.get_json(&format!("/api/blog/{}", id), "Failed to fetch blog details").await
    }
}

impl ApiClient {
    pub async fn fetch_user_blogs(&self, user_id: &str) -> Result<Vec<Blog>, ClientError> {
        self.get_json(&format!("/api/blog/get-blog-by-userid/{}", user_id), "Failed to fetch user blogs").await
    }
}
