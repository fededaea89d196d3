use std::io;
use std::io::ErrorKind;

use ramhorns::Template;

use crate::text_utils::{base64_decoded_len, format_date_time};
use crate::view::enrich::EnrichedPost;

pub const VIEW_TEMPLATE: &str = include_str!("../../res/view.tpl");

#[derive(ramhorns::Content)]
struct ViewItem<'a> {
    id: &'a str,
    author: &'a str,
    date: &'a str,
    time: &'a str,
    image: String,
    post_title: &'a str,
    post_content: &'a str,
}

pub struct PostRenderer<'a> {
    pub template: Template<'a>,
}

impl PostRenderer<'_> {
    pub fn new(view_tpl_src: &str) -> io::Result<PostRenderer> {
        let template = match Template::new(view_tpl_src) {
            Ok(x) => x,
            Err(e) => {
                return Err(io::Error::new(ErrorKind::InvalidInput, format!("Error parsing post view template: {}", e)));
            }
        };

        Ok(PostRenderer {
            template,
        })
    }

    pub fn render(&self, post: &EnrichedPost) -> String {
        let blog = &post.blog;
        let (date, time) = format_date_time(&blog.created_at);
        let image = match base64_decoded_len(&blog.image) {
            Some(size) => format!("{} bytes", size),
            None => "invalid image data".to_string(),
        };
        self.template.render(&ViewItem {
            id: blog.id.as_str(),
            author: post.author.username.as_str(),
            date: date.as_str(),
            time: time.as_str(),
            image,
            post_title: blog.title.as_str(),
            post_content: blog.description.as_str(),
        })
    }
}
