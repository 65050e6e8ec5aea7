//! Post identifiers in page URLs.
//!
//! Post detail pages are reached through several URL shapes
//! (`/posts/<id>`, `/my-posts/<id>`, `?postId=<id>`, ...). Identifiers are
//! 24-digit hex document ids.

use tracing::debug;

/// Length of a document id in hex digits.
const OBJECT_ID_LEN: usize = 24;

/// Route segments that precede a post id.
const POST_ROUTES: [&str; 2] = ["posts", "my-posts"];

/// Query parameters that may carry a post id, in lookup order.
const ID_PARAMS: [&str; 5] = ["id", "postId", "post", "postID", "post_id"];

/// Whether `id` is exactly 24 ASCII hex digits.
#[must_use]
pub fn is_object_id(id: &str) -> bool {
    id.len() == OBJECT_ID_LEN && id.bytes().all(|b| b.is_ascii_hexdigit())
}

/// The first run of 24 hex digits in `s`.
fn find_object_id(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    let mut start = 0;
    while start + OBJECT_ID_LEN <= bytes.len() {
        match bytes[start..start + OBJECT_ID_LEN]
            .iter()
            .position(|b| !b.is_ascii_hexdigit())
        {
            Some(bad) => start += bad + 1,
            None => return s.get(start..start + OBJECT_ID_LEN),
        }
    }
    None
}

/// The path segment following a post route, e.g. `abc` in `/posts/abc/edit`.
fn route_segment(path: &str) -> Option<&str> {
    path.split('/')
        .skip_while(|segment| !POST_ROUTES.contains(segment))
        .nth(1)
        .filter(|s| !s.is_empty())
}

/// Extract a post id from a page URL.
///
/// Tries, in order: the segment after `/posts/` or `/my-posts/`; any
/// 24-hex run in the path; the `id`, `postId`, `post`, `postID` and
/// `post_id` query parameters; any 24-hex run in the whole URL. Only
/// valid ids are returned. An unparsable URL yields `None`.
#[must_use]
pub fn post_id_from_url(page_url: &str) -> Option<String> {
    let parsed = url::Url::parse(page_url).ok()?;
    let path = parsed.path();

    if let Some(id) = route_segment(path) {
        if is_object_id(id) {
            return Some(id.to_owned());
        }
        debug!(id, "route segment is not a valid post id");
    }

    if let Some(id) = find_object_id(path) {
        return Some(id.to_owned());
    }

    for param in ID_PARAMS {
        if let Some((_, value)) = parsed.query_pairs().find(|(key, _)| key == param) {
            if is_object_id(&value) {
                return Some(value.into_owned());
            }
            debug!(param, %value, "query parameter is not a valid post id");
        }
    }

    find_object_id(page_url).map(str::to_owned)
}
