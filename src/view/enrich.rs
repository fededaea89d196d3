use std::collections::HashMap;

use futures::future::join_all;
use spdlog::warn;

use crate::blog::Blog;
use crate::client::user_service::{UserDirectory, UserProfile};

pub const UNKNOWN_USERNAME: &str = "Unknown";
pub const DEFAULT_PROFILE_PICTURE: &str = "default-pic-url";

/// Author fields shown next to a post. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Author {
    pub username: String,
    pub profile_picture: String,
}

impl Author {
    pub fn fallback() -> Self {
        Author {
            username: UNKNOWN_USERNAME.to_string(),
            profile_picture: DEFAULT_PROFILE_PICTURE.to_string(),
        }
    }

    /// Missing or empty fields take the fallback value one by one.
    pub fn from_profile(profile: Option<UserProfile>) -> Self {
        let profile = profile.unwrap_or_default();
        let non_empty = |value: Option<String>| value.filter(|v| !v.is_empty());
        Author {
            username: non_empty(profile.username).unwrap_or_else(|| UNKNOWN_USERNAME.to_string()),
            profile_picture: non_empty(profile.profile_picture).unwrap_or_else(|| DEFAULT_PROFILE_PICTURE.to_string()),
        }
    }
}

/// A post joined with its author's profile, for display only.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedPost {
    pub blog: Blog,
    pub author: Author,
}

/// Author of `blog`, or the fallback when it has no creator or the lookup fails.
pub async fn lookup_author<U: UserDirectory>(users: &U, blog: &Blog) -> Author {
    let Some(ref user_id) = blog.created_by else {
        warn!("Blog {} has no creator. Using fallback author", blog.id);
        return Author::fallback();
    };

    match users.fetch_user_by_id(user_id).await {
        Ok(envelope) => Author::from_profile(envelope.message),
        Err(e) => {
            warn!("Error fetching author {} of blog {}: {}", user_id, blog.id, e);
            Author::fallback()
        }
    }
}

/// Looks up every author concurrently and joins the results onto the posts.
/// A failed lookup only affects its own post.
pub async fn enrich_posts<U: UserDirectory>(users: &U, blogs: Vec<Blog>) -> Vec<EnrichedPost> {
    let lookups = blogs.iter().map(|blog| async move {
        (blog.id.clone(), lookup_author(users, blog).await)
    });
    let authors: HashMap<String, Author> = join_all(lookups).await.into_iter().collect();

    blogs.into_iter()
        .map(|blog| {
            let author = authors.get(&blog.id).cloned().unwrap_or_else(Author::fallback);
            EnrichedPost { blog, author }
        })
        .collect()
}
