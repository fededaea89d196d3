pub mod blog;
pub mod client;
pub mod config;
pub mod logger;
pub mod paginator;
pub mod server;
pub mod store;
pub mod text_utils;
pub mod view;
mod test_data;
