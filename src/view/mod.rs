pub mod enrich;
pub mod list_renderer;
pub mod listing;
pub mod post_renderer;

use crate::view::list_renderer::ListRenderer;
use crate::view::listing::Screen;
use crate::view::post_renderer::PostRenderer;

pub fn render_screen(screen: &Screen, list: &ListRenderer, post: &PostRenderer) -> String {
    match screen {
        Screen::Loading => "Loading...".to_string(),
        Screen::Error(error) => format!("Error: {}", error),
        Screen::List { posts, current_page, page_count } => list.render(posts, *current_page, *page_count),
        Screen::Detail(selected) => post.render(selected),
    }
}
