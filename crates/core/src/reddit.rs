use serde::{Deserialize, Serialize};

/// Author name Reddit reports for deleted accounts
pub const DELETED_AUTHOR: &str = "[deleted]";

const REMOVED_SENTINEL: &str = "[removed]";
const DELETED_SENTINEL: &str = "[deleted]";

/// Generic Reddit listing envelope
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Listing<T> {
    pub kind: String,
    pub data: ListingData<T>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ListingData<T> {
    pub children: Vec<T>,
    #[serde(default)]
    pub after: Option<String>,
}

/// A single `kind`/`data` pair
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Thing<T> {
    pub kind: String,
    pub data: T,
}

/// Link (`t3`) as returned by the search endpoint
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RawLink {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub link_flair_text: Option<String>,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub url: String,
    pub permalink: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub preview: Option<RawPreview>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RawPreview {
    #[serde(default)]
    pub images: Vec<RawPreviewImage>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RawPreviewImage {
    #[serde(default)]
    pub source: Option<RawImageSource>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RawImageSource {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

/// Comment (`t1`) as returned by the comments endpoint
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RawComment {
    pub id: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub link_id: Option<String>,
}

/// Collapsed "load more comments" placeholder
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RawMore {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub children: Vec<String>,
}

/// Children of a comment listing
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(tag = "kind", content = "data")]
pub enum CommentThing {
    #[serde(rename = "t1")]
    Comment(RawComment),
    #[serde(rename = "more")]
    More(RawMore),
}

/// Search result candidate
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub flair: Option<String>,
    pub score: i64,
    pub url: String,
    pub permalink: String,
    pub author: Option<String>,
    pub preview: Vec<PreviewImage>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct PreviewImage {
    pub source_url: String,
}

/// State of a comment body.
///
/// Reddit keeps removed and deleted comments in the tree, replacing their
/// body with a fixed marker.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(tag = "state", content = "text", rename_all = "lowercase")]
pub enum CommentBody {
    Text(String),
    Removed,
    Deleted,
    Missing,
}

impl CommentBody {
    /// Classify a raw body string. Markers are matched trimmed and case-insensitively.
    pub fn from_raw(body: Option<&str>) -> Self {
        match body {
            None | Some("") => CommentBody::Missing,
            Some(text) => match text.trim().to_lowercase().as_str() {
                REMOVED_SENTINEL => CommentBody::Removed,
                DELETED_SENTINEL => CommentBody::Deleted,
                _ => CommentBody::Text(text.to_string()),
            },
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            CommentBody::Text(text) => Some(text),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Comment {
    pub id: String,
    pub body: CommentBody,
    pub score: i64,
    pub author: Option<String>,
    /// Id of the post this comment belongs to, without the `t3_` prefix
    pub post_id: Option<String>,
}

impl Comment {
    /// Body length in characters, zero for anything but readable text
    pub fn body_len(&self) -> usize {
        self.body.text().map(|t| t.chars().count()).unwrap_or(0)
    }
}

impl From<RawLink> for Post {
    fn from(raw: RawLink) -> Self {
        let flair = raw.link_flair_text.filter(|f| !f.is_empty());
        let author = raw.author.filter(|a| a != DELETED_AUTHOR);
        let preview = raw
            .preview
            .map(|p| {
                p.images
                    .into_iter()
                    .filter_map(|img| img.source.and_then(|source| source.url))
                    .map(|source_url| PreviewImage { source_url })
                    .collect()
            })
            .unwrap_or_default();

        Post {
            id: raw.id,
            title: raw.title,
            flair,
            score: raw.score,
            url: raw.url,
            permalink: raw.permalink,
            author,
            preview,
        }
    }
}

impl From<RawComment> for Comment {
    fn from(raw: RawComment) -> Self {
        Comment {
            body: CommentBody::from_raw(raw.body.as_deref()),
            author: raw.author.filter(|a| a != DELETED_AUTHOR),
            post_id: raw
                .link_id
                .map(|l| l.trim_start_matches("t3_").to_string()),
            id: raw.id,
            score: raw.score,
        }
    }
}

/// Convert a search listing into posts, skipping anything that is not a link
pub fn posts_from_listing(listing: Listing<Thing<RawLink>>) -> Vec<Post> {
    listing
        .data
        .children
        .into_iter()
        .filter(|thing| thing.kind == "t3")
        .map(|thing| Post::from(thing.data))
        .collect()
}

/// Extract top-level comments from a comment listing.
///
/// `more` placeholders are dropped without being resolved.
pub fn comments_from_listing(listing: Listing<CommentThing>) -> Vec<Comment> {
    listing
        .data
        .children
        .into_iter()
        .filter_map(|child| match child {
            CommentThing::Comment(raw) => Some(Comment::from(raw)),
            CommentThing::More(_) => None,
        })
        .collect()
}

/// One page of search results and the cursor for the next one
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPage {
    pub posts: Vec<Post>,
    pub after: Option<String>,
}

/// Parse the body of `GET /r/{sub}/search`, keeping the `after` cursor
pub fn parse_search_page(json: &str) -> Result<SearchPage, serde_json::Error> {
    let listing: Listing<Thing<RawLink>> = serde_json::from_str(json)?;
    let after = listing.data.after.clone().filter(|a| !a.is_empty());

    Ok(SearchPage {
        posts: posts_from_listing(listing),
        after,
    })
}

/// Parse the body of `GET /r/{sub}/search`
pub fn parse_search_response(json: &str) -> Result<Vec<Post>, serde_json::Error> {
    parse_search_page(json).map(|page| page.posts)
}

/// Parse the body of `GET /comments/{id}`.
///
/// The endpoint answers with two listings: the link itself and its comments.
pub fn parse_comments_response(json: &str) -> Result<Vec<Comment>, serde_json::Error> {
    let (_link, comments): (serde_json::Value, Listing<CommentThing>) =
        serde_json::from_str(json)?;
    Ok(comments_from_listing(comments))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH_FIXTURE: &str = r#"{
        "kind": "Listing",
        "data": {
            "after": "t3_abc",
            "children": [
                {
                    "kind": "t3",
                    "data": {
                        "id": "abc",
                        "title": "Grandma's fruitcake",
                        "link_flair_text": "Recipe",
                        "score": 412,
                        "url": "https://i.redd.it/xyz.jpg",
                        "permalink": "/r/recipes/comments/abc/grandmas_fruitcake/",
                        "author": "baker",
                        "preview": {
                            "images": [
                                {"source": {"url": "https://preview.redd.it/xyz.jpg?s=1", "width": 640, "height": 480}}
                            ],
                            "enabled": true
                        }
                    }
                },
                {
                    "kind": "t3",
                    "data": {
                        "id": "def",
                        "title": "Fruitcake question",
                        "link_flair_text": null,
                        "score": -3,
                        "url": "https://www.reddit.com/r/recipes/comments/def/",
                        "permalink": "/r/recipes/comments/def/fruitcake_question/",
                        "author": "[deleted]"
                    }
                }
            ]
        }
    }"#;

    const COMMENTS_FIXTURE: &str = r#"[
        {"kind": "Listing", "data": {"children": [{"kind": "t3", "data": {"id": "abc"}}]}},
        {
            "kind": "Listing",
            "data": {
                "children": [
                    {"kind": "t1", "data": {"id": "c1", "body": "Mix and bake.", "score": 12, "author": "baker", "link_id": "t3_abc"}},
                    {"kind": "t1", "data": {"id": "c2", "body": " [Removed] ", "score": 99, "author": "[deleted]", "link_id": "t3_abc"}},
                    {"kind": "more", "data": {"count": 4, "children": ["c3", "c4"]}}
                ]
            }
        }
    ]"#;

    #[test]
    fn test_parse_search_response() {
        let posts = parse_search_response(SEARCH_FIXTURE).unwrap();

        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].id, "abc");
        assert_eq!(posts[0].flair.as_deref(), Some("Recipe"));
        assert_eq!(posts[0].score, 412);
        assert_eq!(posts[0].author.as_deref(), Some("baker"));
        assert_eq!(posts[0].preview.len(), 1);
        assert_eq!(
            posts[0].preview[0].source_url,
            "https://preview.redd.it/xyz.jpg?s=1"
        );
    }

    #[test]
    fn test_parse_search_response_missing_optional_fields() {
        let posts = parse_search_response(SEARCH_FIXTURE).unwrap();

        assert_eq!(posts[1].flair, None);
        assert_eq!(posts[1].score, -3);
        assert_eq!(posts[1].author, None);
        assert!(posts[1].preview.is_empty());
    }

    #[test]
    fn test_parse_search_page_keeps_cursor() {
        let page = parse_search_page(SEARCH_FIXTURE).unwrap();
        assert_eq!(page.after.as_deref(), Some("t3_abc"));
        assert_eq!(page.posts.len(), 2);

        let last = r#"{"kind": "Listing", "data": {"children": [], "after": null}}"#;
        assert_eq!(parse_search_page(last).unwrap().after, None);
    }

    #[test]
    fn test_preview_without_source_is_skipped() {
        let json = r#"{
            "kind": "Listing",
            "data": {
                "children": [{
                    "kind": "t3",
                    "data": {
                        "id": "p",
                        "title": "Pie",
                        "permalink": "/r/recipes/comments/p/",
                        "preview": {
                            "images": [
                                {"id": "no-source"},
                                {"source": {"width": 10}},
                                {"source": {"url": "https://preview.redd.it/p.jpg"}}
                            ]
                        }
                    }
                }]
            }
        }"#;

        let posts = parse_search_response(json).unwrap();

        assert_eq!(posts.len(), 1);
        assert_eq!(
            posts[0].preview,
            vec![PreviewImage {
                source_url: "https://preview.redd.it/p.jpg".to_string()
            }]
        );
    }

    #[test]
    fn test_parse_search_response_empty() {
        let json = r#"{"kind": "Listing", "data": {"children": [], "after": null}}"#;
        let posts = parse_search_response(json).unwrap();
        assert!(posts.is_empty());
    }

    #[test]
    fn test_parse_search_response_invalid() {
        assert!(parse_search_response("not json").is_err());
    }

    #[test]
    fn test_parse_comments_response_drops_more() {
        let comments = parse_comments_response(COMMENTS_FIXTURE).unwrap();

        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].id, "c1");
        assert_eq!(
            comments[0].body,
            CommentBody::Text("Mix and bake.".to_string())
        );
        assert_eq!(comments[0].post_id.as_deref(), Some("abc"));
        assert_eq!(comments[1].body, CommentBody::Removed);
        assert_eq!(comments[1].author, None);
    }

    #[test]
    fn test_comment_body_from_raw() {
        assert_eq!(CommentBody::from_raw(None), CommentBody::Missing);
        assert_eq!(CommentBody::from_raw(Some("")), CommentBody::Missing);
        assert_eq!(CommentBody::from_raw(Some("[deleted]")), CommentBody::Deleted);
        assert_eq!(
            CommentBody::from_raw(Some("  [DELETED]\n")),
            CommentBody::Deleted
        );
        assert_eq!(CommentBody::from_raw(Some("[removed]")), CommentBody::Removed);
        assert_eq!(
            CommentBody::from_raw(Some("  keep my spaces ")),
            CommentBody::Text("  keep my spaces ".to_string())
        );
    }

    #[test]
    fn test_body_len_counts_chars() {
        let comment = Comment {
            id: "c".to_string(),
            body: CommentBody::Text("crème brûlée".to_string()),
            score: 1,
            author: None,
            post_id: None,
        };
        assert_eq!(comment.body_len(), 12);
    }

    #[test]
    fn test_empty_flair_becomes_none() {
        let raw = RawLink {
            id: "x".to_string(),
            title: "t".to_string(),
            link_flair_text: Some(String::new()),
            score: 0,
            url: String::new(),
            permalink: "/r/x".to_string(),
            author: None,
            preview: None,
        };
        assert_eq!(Post::from(raw).flair, None);
    }
}
