//! Candidate selection: best post, best comment and the post's image.

use std::sync::OnceLock;

use regex::Regex;

use crate::reddit::{Comment, Post};

/// Return the highest scoring item accepted by `keep`.
///
/// Only a strictly greater score replaces the running best, so ties resolve
/// to the earliest item in input order.
pub fn max_by_score<'a, T, S, P>(items: &'a [T], score: S, keep: P) -> Option<&'a T>
where
    S: Fn(&T) -> i64,
    P: Fn(&T) -> bool,
{
    items
        .iter()
        .filter(|&item| keep(item))
        .fold(None, |best: Option<&'a T>, item| match best {
            Some(current) if score(item) <= score(current) => Some(current),
            _ => Some(item),
        })
}

/// Whether the post's flair contains `needle`, ignoring case and surrounding whitespace.
///
/// Posts without flair never match.
pub fn flair_matches(post: &Post, needle: &str) -> bool {
    let needle = needle.trim().to_lowercase();
    post.flair
        .as_deref()
        .map(|flair| flair.trim().to_lowercase().contains(&needle))
        .unwrap_or(false)
}

/// Pick the best post among `posts`.
///
/// Posts whose flair contains `required_flair` are preferred. When none do,
/// the same candidates are ranked again without the flair filter.
pub fn select_best_post<'a>(posts: &'a [Post], required_flair: &str) -> Option<&'a Post> {
    max_by_score(posts, |p| p.score, |p| flair_matches(p, required_flair))
        .or_else(|| max_by_score(posts, |p| p.score, |_| true))
}

/// Whether `candidate` should replace `best` as the running best comment
fn outranks(candidate: &Comment, best: &Comment) -> bool {
    candidate.score > best.score
        || (candidate.score == best.score && candidate.body_len() > best.body_len())
}

/// Pick the best readable comment.
///
/// Removed, deleted and empty comments are skipped. Higher score wins;
/// at equal score the longer body wins; full ties keep the earlier comment.
pub fn select_best_comment(comments: &[Comment]) -> Option<&Comment> {
    comments
        .iter()
        .filter(|c| c.body.text().is_some())
        .fold(None, |best, candidate| match best {
            Some(current) if !outranks(candidate, current) => Some(current),
            _ => Some(candidate),
        })
}

fn image_url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\.(jpe?g|png|gif|bmp|webp)(?:$|\?)").expect("valid image url regex")
    })
}

/// Whether `url` points directly at an image file
pub fn is_image_url(url: &str) -> bool {
    !url.is_empty() && image_url_regex().is_match(url)
}

/// Resolve the image to download for a post.
///
/// A direct image link wins; otherwise the first preview image is used.
pub fn resolve_image_url(post: &Post) -> Option<String> {
    if is_image_url(&post.url) {
        return Some(post.url.clone());
    }

    post.preview.first().map(|img| img.source_url.clone())
}
