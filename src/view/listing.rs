use spdlog::{debug, error, info};

use crate::client::blog_service::BlogService;
use crate::client::user_service::UserDirectory;
use crate::paginator::Paginator;
use crate::view::enrich::{enrich_posts, lookup_author, EnrichedPost};

/// What the listing view currently shows.
#[derive(Debug, PartialEq)]
pub enum Screen<'a> {
    Loading,
    Error(&'a str),
    List {
        posts: &'a [EnrichedPost],
        current_page: u32,
        page_count: u32,
    },
    Detail(&'a EnrichedPost),
}

/// Blog listing with author enrichment, client-side pagination and a detail
/// display for the selected post.
pub struct ListingView<B: BlogService, U: UserDirectory> {
    blogs: B,
    users: U,
    page_size: u32,
    posts: Vec<EnrichedPost>,
    current_page: u32,
    selected: Option<EnrichedPost>,
    error: Option<String>,
    detail_error: Option<String>,
    loaded: bool,
}

impl<B: BlogService, U: UserDirectory> ListingView<B, U> {
    pub fn new(blogs: B, users: U, page_size: u32) -> Self {
        ListingView {
            blogs,
            users,
            page_size: page_size.max(1),
            posts: vec![],
            current_page: 1,
            selected: None,
            error: None,
            detail_error: None,
            loaded: false,
        }
    }

    /// Fetches the list and enriches every post before anything is shown.
    pub async fn activate(&mut self) {
        self.error = None;
        self.back();
        match self.blogs.fetch_blogs().await {
            Ok(blogs) => {
                info!("Fetched {} blogs", blogs.len());
                self.posts = enrich_posts(&self.users, blogs).await;
                self.current_page = 1;
            }
            Err(e) => {
                error!("Error fetching blogs: {}", e);
                self.error = Some(e.to_string());
            }
        }
        self.loaded = true;
    }

    pub fn posts(&self) -> &[EnrichedPost] {
        &self.posts
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn page_count(&self) -> u32 {
        Paginator::from(&self.posts, self.page_size).page_count()
    }

    /// Posts on the current page.
    pub fn current_posts(&self) -> &[EnrichedPost] {
        Paginator::from(&self.posts, self.page_size)
            .get_page(self.current_page)
            .unwrap_or(&[])
    }

    /// Switches the active page. Out of range pages are rejected and the
    /// current page is kept.
    pub fn set_page(&mut self, page: u32) -> Result<(), String> {
        Paginator::from(&self.posts, self.page_size).get_page(page)?;
        debug!("Switching to page {}", page);
        self.current_page = page;
        Ok(())
    }

    /// Fetches the full record of `id` and switches to the detail display.
    /// The author comes from the listing when the post is on it.
    pub async fn select(&mut self, id: &str) {
        match self.blogs.get_blog_by_id(id).await {
            Ok(blog) => {
                debug!("Selected blog {}", blog);
                let known = self.posts.iter()
                    .find(|post| post.blog.id == blog.id)
                    .map(|post| post.author.clone());
                let author = match known {
                    Some(author) => author,
                    None => lookup_author(&self.users, &blog).await,
                };
                self.detail_error = None;
                self.selected = Some(EnrichedPost { blog, author });
            }
            Err(e) => {
                error!("Error fetching blog {}: {}", id, e);
                self.selected = None;
                self.detail_error = Some(e.to_string());
            }
        }
    }

    /// Leaves the detail display, or its error, for the list.
    pub fn back(&mut self) {
        self.selected = None;
        self.detail_error = None;
    }

    pub fn screen(&self) -> Screen<'_> {
        if let Some(error) = self.error.as_deref().or(self.detail_error.as_deref()) {
            return Screen::Error(error);
        }
        if let Some(ref selected) = self.selected {
            return Screen::Detail(selected);
        }
        if !self.loaded {
            return Screen::Loading;
        }
        Screen::List {
            posts: self.current_posts(),
            current_page: self.current_page,
            page_count: self.page_count(),
        }
    }
}
