use std::io;
use std::sync::Arc;

use ntex::web;
use serde::Serialize;
use spdlog::{debug, error, info, warn};

use crate::blog::{BlogPatch, NewBlog};
use crate::config::Config;
use crate::store::json_file_store::JsonFileStore;
use crate::store::memory_store::MemoryStore;
use crate::store::{BlogStore, StoreError};

// Blogs carry base64 images inline
const JSON_BODY_LIMIT: usize = 16 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn BlogStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn BlogStore>) -> Self {
        AppState { store }
    }
}

#[derive(Serialize)]
struct MessageBody<'a> {
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct UpdatedBody<'a> {
    message: &'a str,
    data: &'a BlogPatch,
}

fn bad_request(message: &str) -> web::HttpResponse {
    web::HttpResponse::BadRequest().json(&MessageBody { message, error: None })
}

fn not_found(message: &str) -> web::HttpResponse {
    web::HttpResponse::NotFound().json(&MessageBody { message, error: None })
}

fn server_error(message: &str, err: &StoreError) -> web::HttpResponse {
    web::HttpResponse::InternalServerError().json(&MessageBody {
        message,
        error: Some(err.to_string()),
    })
}

async fn create_blog(body: web::types::Json<NewBlog>, state: web::types::State<AppState>) -> web::HttpResponse {
    let Some(blog) = body.into_inner().validate() else {
        debug!("Rejecting blog without title, image or description");
        return bad_request("All fields are required");
    };

    match state.store.insert(blog) {
        Ok(saved) => {
            info!("Blog {} created", saved.id);
            web::HttpResponse::Ok().json(&saved)
        }
        Err(e) => {
            error!("Error creating blog: {}", e);
            server_error("Server Error", &e)
        }
    }
}

async fn list_blogs(state: web::types::State<AppState>) -> web::HttpResponse {
    match state.store.find_all() {
        Ok(blogs) => web::HttpResponse::Ok().json(&blogs),
        Err(e) => {
            error!("Error listing blogs: {}", e);
            server_error("Server Error", &e)
        }
    }
}

async fn list_user_blogs(user_id: web::types::Path<String>, state: web::types::State<AppState>) -> web::HttpResponse {
    let user_id = user_id.into_inner();
    match state.store.find_by_creator(&user_id) {
        Ok(blogs) => web::HttpResponse::Ok().json(&blogs),
        Err(e) => {
            error!("Error listing blogs of user {}: {}", user_id, e);
            server_error("Server Error", &e)
        }
    }
}

async fn get_blog(id: web::types::Path<String>, state: web::types::State<AppState>) -> web::HttpResponse {
    let id = id.into_inner();
    match state.store.find_by_id(&id) {
        Ok(Some(blog)) => web::HttpResponse::Ok().json(&blog),
        Ok(None) => not_found("Blog not found"),
        Err(e) => {
            error!("Error loading blog {}: {}", id, e);
            server_error("Server Error", &e)
        }
    }
}

async fn update_blog(
    id: web::types::Path<String>,
    body: web::types::Json<BlogPatch>,
    state: web::types::State<AppState>) -> web::HttpResponse {
    let id = id.into_inner();
    let patch = body.into_inner();

    match state.store.update_one(&id, &patch) {
        Ok(Some(_)) => {
            info!("Blog {} updated", id);
            web::HttpResponse::Ok().json(&UpdatedBody {
                message: "Blog updated successfully",
                data: &patch,
            })
        }
        Ok(None) => {
            warn!("Update of unknown blog {}", id);
            not_found("Blog not found")
        }
        Err(e) => {
            error!("Error updating blog {}: {}", id, e);
            server_error("Something went wrong", &e)
        }
    }
}

/// Registers the blog endpoints.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/blog")
            .route(web::get().to(list_blogs))
            .route(web::post().to(create_blog)),
    )
        .service(
            web::resource("/api/blog/get-blog-by-userid/{user_id}")
                .route(web::get().to(list_user_blogs)),
        )
        .service(
            web::resource("/api/blog/{id}")
                .route(web::get().to(get_blog))
                .route(web::put().to(update_blog))
                .route(web::patch().to(update_blog)),
        );
}

pub fn open_store(config: &Config) -> io::Result<Arc<dyn BlogStore>> {
    let store: Arc<dyn BlogStore> = match config.store.location {
        Some(ref location) => {
            let store = JsonFileStore::open(location)
                .map_err(|e| io::Error::other(format!("Error opening blog store {}: {}", location.display(), e)))?;
            Arc::new(store)
        }
        None => {
            info!("No store location configured. Blogs are kept in memory only");
            Arc::new(MemoryStore::new())
        }
    };
    Ok(store)
}

pub async fn server_run(config: Config) -> io::Result<()> {
    let app_state = AppState::new(open_store(&config)?);

    let bind_addr = config.server.address.clone();
    let bind_port = config.server.port;

    web::HttpServer::new(move || {
        web::App::new()
            .state(app_state.clone())
            .state(web::types::JsonConfig::default().limit(JSON_BODY_LIMIT))
            .configure(configure)
    })
        .bind((bind_addr, bind_port))?
        .run()
        .await
}

#[cfg(test)]
mod tests {
    use ntex::http::StatusCode;
    use ntex::web::test;
    use ntex::web::App;
    use serde_json::{json, Value};

    use crate::blog::Blog;
    use crate::test_data::{sample_blogs, IMAGE_DATA};

    use super::*;

    struct FailingStore;

    impl BlogStore for FailingStore {
        fn insert(&self, _blog: crate::blog::ValidBlog) -> Result<Blog, StoreError> {
            Err(StoreError::Poisoned)
        }

        fn find_all(&self) -> Result<Vec<Blog>, StoreError> {
            Err(StoreError::Poisoned)
        }

        fn find_by_id(&self, _id: &str) -> Result<Option<Blog>, StoreError> {
            Err(StoreError::Poisoned)
        }

        fn find_by_creator(&self, _user_id: &str) -> Result<Vec<Blog>, StoreError> {
            Err(StoreError::Poisoned)
        }

        fn update_one(&self, _id: &str, _patch: &BlogPatch) -> Result<Option<Blog>, StoreError> {
            Err(StoreError::Poisoned)
        }
    }

    fn json_body(bytes: &[u8]) -> Value {
        serde_json::from_slice(bytes).unwrap()
    }

    #[ntex::test]
    async fn test_create_blog() {
        let store = Arc::new(MemoryStore::new());
        let app = test::init_service(
            App::new().state(AppState::new(store.clone())).configure(configure)
        ).await;

        let body = json!({"title": "Hello", "image": IMAGE_DATA, "description": "First post"});
        let req = test::TestRequest::post().uri("/api/blog").set_json(&body).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let blog: Blog = serde_json::from_slice(&test::read_body(resp).await).unwrap();
        assert_eq!(blog.title, "Hello");
        assert_eq!(blog.image, IMAGE_DATA);
        assert_eq!(blog.description, "First post");
        assert!(!blog.id.is_empty());
        assert_eq!(store.find_all().unwrap().len(), 1);
    }

    #[ntex::test]
    async fn test_create_missing_field_is_not_persisted() {
        let store = Arc::new(MemoryStore::new());
        let app = test::init_service(
            App::new().state(AppState::new(store.clone())).configure(configure)
        ).await;

        let payloads = [
            json!({"image": IMAGE_DATA, "description": "d"}),
            json!({"title": "t", "description": "d"}),
            json!({"title": "t", "image": IMAGE_DATA}),
            json!({"title": "", "image": IMAGE_DATA, "description": "d"}),
        ];
        for payload in payloads {
            let req = test::TestRequest::post().uri("/api/blog").set_json(&payload).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            let body = json_body(&test::read_body(resp).await);
            assert_eq!(body["message"], "All fields are required");
        }
        assert!(store.find_all().unwrap().is_empty());
    }

    #[ntex::test]
    async fn test_list_blogs() {
        let store = Arc::new(MemoryStore::from_blogs(sample_blogs(3)));
        let app = test::init_service(
            App::new().state(AppState::new(store)).configure(configure)
        ).await;

        let req = test::TestRequest::get().uri("/api/blog").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let blogs: Vec<Blog> = serde_json::from_slice(&test::read_body(resp).await).unwrap();
        let ids: Vec<_> = blogs.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, ["blog-1", "blog-2", "blog-3"]);
    }

    #[ntex::test]
    async fn test_get_blog_and_user_blogs() {
        let store = Arc::new(MemoryStore::from_blogs(sample_blogs(3)));
        let app = test::init_service(
            App::new().state(AppState::new(store)).configure(configure)
        ).await;

        let req = test::TestRequest::get().uri("/api/blog/blog-2").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let blog: Blog = serde_json::from_slice(&test::read_body(resp).await).unwrap();
        assert_eq!(blog.title, "Post 2");

        let req = test::TestRequest::get().uri("/api/blog/missing").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::get().uri("/api/blog/get-blog-by-userid/user-3").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let blogs: Vec<Blog> = serde_json::from_slice(&test::read_body(resp).await).unwrap();
        assert_eq!(blogs.len(), 1);
        assert_eq!(blogs[0].id, "blog-3");
    }

    #[ntex::test]
    async fn test_update_missing_blog() {
        let store = Arc::new(MemoryStore::from_blogs(sample_blogs(2)));
        let before = store.find_all().unwrap();
        let app = test::init_service(
            App::new().state(AppState::new(store.clone())).configure(configure)
        ).await;

        let req = test::TestRequest::put().uri("/api/blog/missing").set_json(&json!({"title": "X"})).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body = json_body(&test::read_body(resp).await);
        assert_eq!(body["message"], "Blog not found");
        assert_eq!(store.find_all().unwrap(), before);
    }

    #[ntex::test]
    async fn test_update_blog() {
        let store = Arc::new(MemoryStore::from_blogs(sample_blogs(2)));
        let original = store.find_by_id("blog-1").unwrap().unwrap();
        let app = test::init_service(
            App::new().state(AppState::new(store.clone())).configure(configure)
        ).await;

        let req = test::TestRequest::patch().uri("/api/blog/blog-1").set_json(&json!({"title": "X"})).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = json_body(&test::read_body(resp).await);
        assert_eq!(body["message"], "Blog updated successfully");
        assert_eq!(body["data"], json!({"title": "X"}));

        let stored = store.find_by_id("blog-1").unwrap().unwrap();
        assert_eq!(stored.title, "X");
        assert_eq!(stored.description, original.description);
        assert_eq!(stored.image, original.image);
        assert_eq!(stored.created_at, original.created_at);
        assert_eq!(store.find_by_id("blog-2").unwrap().unwrap().title, "Post 2");
    }

    #[ntex::test]
    async fn test_store_failures() {
        let app = test::init_service(
            App::new().state(AppState::new(Arc::new(FailingStore))).configure(configure)
        ).await;

        let req = test::TestRequest::get().uri("/api/blog").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(&test::read_body(resp).await);
        assert_eq!(body["message"], "Server Error");
        assert_eq!(body["error"], "Store lock poisoned");

        let body = json!({"title": "t", "image": IMAGE_DATA, "description": "d"});
        let req = test::TestRequest::post().uri("/api/blog").set_json(&body).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let req = test::TestRequest::put().uri("/api/blog/blog-1").set_json(&json!({"title": "X"})).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(&test::read_body(resp).await);
        assert_eq!(body["message"], "Something went wrong");
    }
}
