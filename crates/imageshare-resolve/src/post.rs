//! Image references inside post and profile documents.
//!
//! Depending on the endpoint, a post lists its images under `Post_Images`
//! (entries shaped `{ id, img_uri }`) or `images` (any legacy shape).
//! A profile carries its avatar as a path in `img_uri`.

use serde_json::Value;

use crate::candidates::{CandidateList, generate_candidates, is_absolute};
use crate::config::ResolverConfig;
use crate::reference::ImageReference;

/// Post fields that may hold the image list, in lookup order.
const IMAGE_FIELDS: [&str; 2] = ["Post_Images", "images"];

/// The raw image entries of a post.
///
/// Reads the first of `Post_Images`, `images` that is a non-empty array.
/// Empty when neither is.
#[must_use]
pub fn post_image_values(post: &Value) -> &[Value] {
    IMAGE_FIELDS
        .iter()
        .filter_map(|field| post.get(field).and_then(Value::as_array))
        .find(|images| !images.is_empty())
        .map_or(&[][..], Vec::as_slice)
}

/// All image references of a post, in the order of
/// [`post_image_values`].
#[must_use]
pub fn post_images(post: &Value) -> Vec<ImageReference> {
    post_image_values(post)
        .iter()
        .map(ImageReference::from_json)
        .collect()
}

/// The image shown on a post card: the first image, or
/// [`ImageReference::Empty`].
#[must_use]
pub fn primary_image(post: &Value) -> ImageReference {
    post_images(post)
        .into_iter()
        .next()
        .unwrap_or(ImageReference::Empty)
}

/// Candidates for a user avatar.
///
/// `blob:` URLs (a freshly picked local photo) and absolute URLs are used
/// as-is; anything else resolves like a bare path. `default_avatar`
/// replaces the placeholder, so a broken avatar falls back to the stock one.
#[must_use]
pub fn avatar_candidates(
    user_img: Option<&str>,
    config: &ResolverConfig,
    default_avatar: &str,
) -> CandidateList {
    match user_img.filter(|img| !img.is_empty()) {
        None => CandidateList::placeholder_only(default_avatar),
        Some(img) if img.starts_with("blob:") || is_absolute(img) => {
            CandidateList::new([img], default_avatar)
        }
        Some(img) => {
            let config = config.clone().with_placeholder(default_avatar);
            generate_candidates(&ImageReference::Path(img.to_owned()), &config)
        }
    }
}

/// The avatar path stored on a user document (`img_uri`), if any.
#[must_use]
pub fn user_avatar(user: &Value) -> Option<&str> {
    user.get("img_uri").and_then(Value::as_str).filter(|s| !s.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    const AVATAR: &str = "/assets/avatar.png";

    #[test]
    fn post_images_prefers_post_images_field() {
        let post = json!({
            "Post_Images": [{ "id": "1", "img_uri": "images/a.png" }],
            "images": ["b.png"],
        });
        let images = post_images(&post);
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].kind(), "uri");
    }

    #[test]
    fn post_images_falls_back_to_images() {
        let post = json!({ "Post_Images": [], "images": ["b.png", { "filename": "c.png" }] });
        let kinds: Vec<_> = post_images(&post).iter().map(ImageReference::kind).collect();
        assert_eq!(kinds, ["path", "named"]);
    }

    #[test]
    fn post_without_images() {
        assert!(post_images(&json!({ "title": "x" })).is_empty());
        assert!(post_images(&json!({ "images": "not-a-list" })).is_empty());
        assert_eq!(primary_image(&json!({})), ImageReference::Empty);
    }

    #[test]
    fn raw_entries_follow_the_same_field() {
        let post = json!({
            "Post_Images": [{ "id": "1", "img_uri": "/images/a.png" }, { "id": "2" }],
            "images": ["b.png"],
        });
        let raw = post_image_values(&post);
        assert_eq!(raw.len(), 2);
        assert_eq!(raw[1], json!({ "id": "2" }));
        assert!(post_image_values(&json!({ "images": [] })).is_empty());
    }

    #[test]
    fn primary_image_is_first() {
        let post = json!({ "images": ["first.png", "second.png"] });
        assert_eq!(primary_image(&post), ImageReference::Path("first.png".into()));
    }

    #[test]
    fn avatar_without_image_is_default() {
        let list = avatar_candidates(None, &ResolverConfig::default(), AVATAR);
        assert_eq!(list.as_slice(), [AVATAR]);
        let list = avatar_candidates(Some(""), &ResolverConfig::default(), AVATAR);
        assert_eq!(list.as_slice(), [AVATAR]);
    }

    #[test]
    fn avatar_blob_is_used_directly() {
        let list = avatar_candidates(Some("blob:http://app/1234"), &ResolverConfig::default(), AVATAR);
        assert_eq!(list.as_slice(), ["blob:http://app/1234", AVATAR]);
    }

    #[test]
    fn avatar_path_resolves_against_api() {
        let config = ResolverConfig::new("https://api.example.com");
        let list = avatar_candidates(Some("images/me.png"), &config, AVATAR);
        assert_eq!(list.first(), "https://api.example.com/images/me.png");
        assert_eq!(list.placeholder(), AVATAR);
    }

    #[test]
    fn user_avatar_reads_img_uri() {
        assert_eq!(user_avatar(&json!({ "img_uri": "images/me.png" })), Some("images/me.png"));
        assert_eq!(user_avatar(&json!({ "img_uri": "" })), None);
        assert_eq!(user_avatar(&json!({})), None);
    }
}
