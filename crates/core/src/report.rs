use serde::Serialize;

use crate::reddit::{Comment, Post, DELETED_AUTHOR};

pub const REDDIT_WEB_BASE: &str = "https://www.reddit.com";

/// Outcome of one topic search, ready to print
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct RecipeResult {
    pub title: String,
    pub image_url: Option<String>,
    pub recipe_text: Option<String>,
    pub author: String,
    pub post_url: String,
}

impl RecipeResult {
    /// Assemble the result from a selected post and, if any, its best comment
    pub fn from_selection(post: &Post, image_url: Option<String>, comment: Option<&Comment>) -> Self {
        Self {
            title: post.title.clone(),
            image_url,
            recipe_text: comment
                .and_then(|c| c.body.text())
                .map(|text| text.to_string()),
            author: author_display(post),
            post_url: canonical_post_url(&post.permalink),
        }
    }
}

/// Build the search query for a topic, matching title, self text or anywhere
pub fn build_search_query(topic: &str) -> String {
    format!(r#"title:"{topic}" OR selftext:"{topic}" OR "{topic}""#)
}

/// Absolute web URL for a permalink such as `/r/recipes/comments/abc/pie/`
pub fn canonical_post_url(permalink: &str) -> String {
    format!("{REDDIT_WEB_BASE}{permalink}")
}

/// Author name, or `[deleted]` when the account is gone
pub fn author_display(post: &Post) -> String {
    post.author
        .clone()
        .unwrap_or_else(|| DELETED_AUTHOR.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reddit::CommentBody;

    fn fixture_post() -> Post {
        Post {
            id: "abc".to_string(),
            title: "Sour cherry pie".to_string(),
            flair: Some("Recipe".to_string()),
            score: 120,
            url: "https://i.redd.it/pie.jpg".to_string(),
            permalink: "/r/recipes/comments/abc/sour_cherry_pie/".to_string(),
            author: Some("pastry_chef".to_string()),
            preview: vec![],
        }
    }

    #[test]
    fn test_build_search_query() {
        assert_eq!(
            build_search_query("new year's"),
            r#"title:"new year's" OR selftext:"new year's" OR "new year's""#
        );
    }

    #[test]
    fn test_canonical_post_url() {
        assert_eq!(
            canonical_post_url("/r/recipes/comments/abc/pie/"),
            "https://www.reddit.com/r/recipes/comments/abc/pie/"
        );
    }

    #[test]
    fn test_from_selection_with_comment() {
        let post = fixture_post();
        let comment = Comment {
            id: "c1".to_string(),
            body: CommentBody::Text("Pit the cherries first.".to_string()),
            score: 40,
            author: Some("cook".to_string()),
            post_id: Some("abc".to_string()),
        };

        let result = RecipeResult::from_selection(
            &post,
            Some("https://i.redd.it/pie.jpg".to_string()),
            Some(&comment),
        );

        assert_eq!(result.title, "Sour cherry pie");
        assert_eq!(result.recipe_text.as_deref(), Some("Pit the cherries first."));
        assert_eq!(result.author, "pastry_chef");
        assert_eq!(
            result.post_url,
            "https://www.reddit.com/r/recipes/comments/abc/sour_cherry_pie/"
        );
        assert_eq!(result.image_url.as_deref(), Some("https://i.redd.it/pie.jpg"));
    }

    #[test]
    fn test_from_selection_without_comment_or_author() {
        let mut post = fixture_post();
        post.author = None;

        let result = RecipeResult::from_selection(&post, None, None);

        assert_eq!(result.recipe_text, None);
        assert_eq!(result.image_url, None);
        assert_eq!(result.author, "[deleted]");
    }
}
