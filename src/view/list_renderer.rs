use std::io;
use std::io::ErrorKind;

use ramhorns::Template;

use crate::text_utils::{format_date_time, preview};
use crate::view::enrich::EnrichedPost;

pub const LIST_TEMPLATE: &str = include_str!("../../res/list.tpl");

const SUMMARY_CHARS: usize = 100;

#[derive(ramhorns::Content)]
struct ListPage {
    post_list: Vec<PostItem>,
    page_list: Vec<ViewPagination>,
    show_pagination: bool,
}

#[derive(ramhorns::Content)]
struct PostItem {
    id: String,
    date: String,
    title: String,
    author: String,
    profile_picture: String,
    summary: String,
}

#[derive(ramhorns::Content)]
struct ViewPagination {
    current: bool,
    number: u32,
}

pub struct ListRenderer<'a> {
    pub template: Template<'a>,
}

impl ListRenderer<'_> {
    pub fn new(list_tpl_src: &str) -> io::Result<ListRenderer> {
        let template = match Template::new(list_tpl_src) {
            Ok(x) => x,
            Err(e) => {
                return Err(io::Error::new(ErrorKind::InvalidInput, format!("Error parsing list template: {}", e)));
            }
        };

        Ok(ListRenderer {
            template,
        })
    }

    /// Renders one page of posts followed by one control per page.
    pub fn render(&self, posts: &[EnrichedPost], cur_page: u32, page_count: u32) -> String {
        let post_list = posts.iter()
            .map(|post| {
                let (date, _time) = format_date_time(&post.blog.created_at);
                PostItem {
                    id: post.blog.id.clone(),
                    date,
                    title: post.blog.title.clone(),
                    author: post.author.username.clone(),
                    profile_picture: post.author.profile_picture.clone(),
                    summary: preview(&post.blog.description, SUMMARY_CHARS),
                }
            })
            .collect();

        let page_list = (1..=page_count)
            .map(|number| ViewPagination {
                current: number == cur_page,
                number,
            })
            .collect();

        self.template.render(&ListPage {
            post_list,
            page_list,
            show_pagination: page_count > 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::test_data::sample_blogs;
    use crate::view::enrich::Author;

    use super::*;

    fn enriched(count: u32) -> Vec<EnrichedPost> {
        sample_blogs(count).into_iter()
            .map(|blog| EnrichedPost {
                author: Author {
                    username: blog.created_by.clone().unwrap_or_default(),
                    profile_picture: "cGlj".to_string(),
                },
                blog,
            })
            .collect()
    }

    #[test]
    fn render_list() {
        let template_src = r##"{{#post_list}}({{title}}|{{author}}|{{date}}|{{profile_picture}}){{/post_list}}
PAGES={{#page_list}}{{#current}}[{{number}}]{{/current}}{{^current}}{{number}}{{/current}}{{/page_list}}"##;
        let renderer = ListRenderer::new(template_src).unwrap();
        let posts = enriched(2);
        let res = renderer.render(&posts, 2, 3);
        assert!(res.contains("(Post 1|user-1|2022-04-02|cGlj)(Post 2|user-2|2022-04-02|cGlj)"));
        assert!(res.contains("PAGES=1[2]3"));
    }

    #[test]
    fn render_default_template() {
        let renderer = ListRenderer::new(LIST_TEMPLATE).unwrap();
        let posts = enriched(13);
        let res = renderer.render(&posts[12..], 3, 3);
        assert!(res.contains("[blog-13] Post 13"));
        assert!(!res.contains("Post 12"));
        assert!(res.contains("by user-13"));
        assert!(res.contains("[3]"));
        assert!(res.contains(&preview(&posts[12].blog.description, SUMMARY_CHARS)));
    }

    #[test]
    fn render_empty() {
        let renderer = ListRenderer::new(LIST_TEMPLATE).unwrap();
        let res = renderer.render(&[], 1, 0);
        assert!(res.contains("No blogs yet."));
        assert!(!res.contains("Pages:"));
    }
}
