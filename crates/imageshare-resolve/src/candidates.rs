//! Candidate generation: map an [`ImageReference`] to the ordered list of
//! URLs worth trying.
//!
//! Candidates are grouped in tiers, most-likely-correct first:
//!
//! 1. the reference itself when it is already absolute,
//! 2. `img_uri` resolved against the API URL (and a naive concatenation),
//! 3. direct URL properties on the object (`imageUrl`, `uri`, `url`),
//! 4. the filename under every directory the server has served images from,
//! 5. the placeholder.
//!
//! No network access is needed: the whole list is computed up front and the
//! fallback loader walks it.

use std::borrow::Cow;

use serde::Serialize;
use tracing::debug;

use crate::config::ResolverConfig;
use crate::reference::{ImageReference, basename};

/// An ordered, non-empty list of candidate URLs ending in the placeholder.
///
/// Empty strings are never stored. Duplicates are allowed: the same URL can
/// be produced by two tiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CandidateList {
    urls: Vec<String>,
}

#[allow(clippy::len_without_is_empty)] // never empty
impl CandidateList {
    /// Build a list from arbitrary URLs, dropping empty entries and
    /// appending `placeholder`.
    #[must_use]
    pub fn new<I, S>(urls: I, placeholder: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut urls: Vec<String> = urls
            .into_iter()
            .map(Into::into)
            .filter(|url| !url.is_empty())
            .collect();
        urls.push(placeholder.to_owned());
        Self { urls }
    }

    /// A list holding only the placeholder.
    #[must_use]
    pub fn placeholder_only(placeholder: &str) -> Self {
        Self {
            urls: vec![placeholder.to_owned()],
        }
    }

    /// The highest-priority candidate.
    #[must_use]
    pub fn first(&self) -> &str {
        // Non-empty by construction.
        &self.urls[0]
    }

    /// The placeholder (always the last entry).
    #[must_use]
    pub fn placeholder(&self) -> &str {
        &self.urls[self.last_index()]
    }

    /// Number of candidates, placeholder included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    /// Index of the placeholder.
    #[must_use]
    pub fn last_index(&self) -> usize {
        self.urls.len() - 1
    }

    /// The candidate at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.urls.get(index).map(String::as_str)
    }

    /// All candidates in priority order.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.urls
    }

    /// Iterate over the candidates in priority order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.urls.iter().map(String::as_str)
    }

    /// Index of the first candidate equal to `url` at or after `start`.
    #[must_use]
    pub fn position_from(&self, start: usize, url: &str) -> Option<usize> {
        self.urls
            .iter()
            .enumerate()
            .skip(start)
            .find_map(|(i, candidate)| (candidate == url).then_some(i))
    }

    /// Consume the list, returning the underlying URLs.
    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        self.urls
    }
}

impl<'a> IntoIterator for &'a CandidateList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.urls.iter()
    }
}

/// Whether a reference is already an absolute URL.
#[must_use]
pub fn is_absolute(url: &str) -> bool {
    url.starts_with("http")
}

/// Resolve a path against the API URL.
///
/// Absolute URLs are returned unchanged. Otherwise the path is given a
/// leading `/`, the API URL's own path prefix is stripped if the path
/// already starts with it (so `/api/images/a.jpg` under
/// `https://host/api` does not become `/api/api/...`), and the API URL is
/// prepended. Without a parsable API URL nothing is stripped.
#[must_use]
pub fn resolve_relative(path: &str, config: &ResolverConfig) -> String {
    if is_absolute(path) {
        return path.to_owned();
    }
    let normalized: Cow<'_, str> = if path.starts_with('/') {
        Cow::Borrowed(path)
    } else {
        Cow::Owned(format!("/{path}"))
    };
    let cleaned = config
        .api_path_prefix()
        .and_then(|prefix| strip_segment_prefix(&normalized, prefix))
        .unwrap_or(&normalized);
    format!("{}{cleaned}", config.api_url())
}

/// Strip `prefix` from `path` only when it ends on a segment boundary.
fn strip_segment_prefix<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = path.strip_prefix(prefix)?;
    (rest.is_empty() || rest.starts_with('/')).then_some(rest)
}

/// Generate the ordered candidate URLs for `reference`.
///
/// Pure: the same inputs always yield the same list. The result is never
/// empty and always ends with [`ResolverConfig::placeholder`].
#[must_use]
pub fn generate_candidates(reference: &ImageReference, config: &ResolverConfig) -> CandidateList {
    let mut tiers = Tiers::new(config);
    match reference {
        ImageReference::Empty | ImageReference::Unrecognized => {}
        ImageReference::Path(path) => tiers.path(path),
        ImageReference::Uri(object) => {
            if let Some(img_uri) = object.img_uri.as_deref() {
                tiers.img_uri(img_uri);
            }
            if let Some(filename) = object.filename() {
                tiers.filename(object.direct_urls(), filename);
            }
        }
        ImageReference::Named(object) => {
            if let Some(filename) = object.filename() {
                tiers.filename(object.direct_urls(), filename);
            }
        }
        ImageReference::IdOnly(id) => tiers.filename(std::iter::empty(), id),
    }
    let candidates = tiers.finish();
    debug!(
        kind = reference.kind(),
        count = candidates.len(),
        first = candidates.first(),
        "generated image candidates"
    );
    candidates
}

/// The URL to render before any load has failed.
///
/// Never fails: falls back to the placeholder.
#[must_use]
pub fn best_candidate(reference: &ImageReference, config: &ResolverConfig) -> String {
    generate_candidates(reference, config).first().to_owned()
}

/// Accumulates tiers of candidates for one reference.
struct Tiers<'a> {
    config: &'a ResolverConfig,
    urls: Vec<String>,
}

impl<'a> Tiers<'a> {
    const fn new(config: &'a ResolverConfig) -> Self {
        Self {
            config,
            urls: Vec::new(),
        }
    }

    fn push(&mut self, url: String) {
        if !url.is_empty() {
            self.urls.push(url);
        }
    }

    /// Tiers for a bare string reference.
    ///
    /// An absolute string resolves to itself, so its first two tiers
    /// coincide and it is listed once. The basename tier is kept either
    /// way: it recovers URLs saved under a retired host.
    fn path(&mut self, path: &str) {
        let api = self.config.api_url();
        let image_base = self.config.image_base_url();
        self.push(resolve_relative(path, self.config));
        self.push(format!("{api}{path}"));
        let name = basename(path);
        if !name.is_empty() {
            self.push(format!("{image_base}/{name}"));
        }
    }

    /// Tiers specific to the server-canonical `img_uri`: the URL itself
    /// (resolved when relative), then plain concatenation.
    fn img_uri(&mut self, img_uri: &str) {
        let api = self.config.api_url();
        self.push(resolve_relative(img_uri, self.config));
        self.push(format!("{api}{img_uri}"));
    }

    /// Generic tiers built from a filename and any direct URL properties.
    fn filename<'u>(&mut self, direct: impl IntoIterator<Item = &'u str>, filename: &str) {
        for url in direct {
            self.push(url.to_owned());
        }
        if is_absolute(filename) {
            self.push(filename.to_owned());
            return;
        }
        let api = self.config.api_url();
        let image_base = self.config.image_base_url();
        self.push(format!("{api}/images/{filename}"));
        self.push(format!("{api}/uploads/{filename}"));
        self.push(format!("{image_base}/{filename}"));
        self.push(format!("/images/{filename}"));
        self.push(format!("/uploads/{filename}"));
        self.push(format!("{api}/public/images/{filename}"));
        self.push(format!("{api}/public/uploads/{filename}"));
    }

    fn finish(self) -> CandidateList {
        CandidateList::new(self.urls, self.config.placeholder())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn config() -> ResolverConfig {
        ResolverConfig::new("https://api.example.com")
    }

    fn candidates(value: &serde_json::Value) -> Vec<String> {
        generate_candidates(&ImageReference::from_json(value), &config()).into_vec()
    }

    #[test]
    fn resolve_relative_adds_leading_slash() {
        assert_eq!(
            resolve_relative("images/a.jpg", &config()),
            "https://api.example.com/images/a.jpg"
        );
    }

    #[test]
    fn resolve_relative_keeps_absolute() {
        assert_eq!(
            resolve_relative("http://cdn.example.com/a.jpg", &config()),
            "http://cdn.example.com/a.jpg"
        );
    }

    #[test]
    fn resolve_relative_strips_api_prefix() {
        let config = ResolverConfig::new("https://example.com/api");
        assert_eq!(
            resolve_relative("/api/images/a.jpg", &config),
            "https://example.com/api/images/a.jpg"
        );
        assert_eq!(
            resolve_relative("api/images/a.jpg", &config),
            "https://example.com/api/images/a.jpg"
        );
    }

    #[test]
    fn resolve_relative_prefix_must_end_on_segment() {
        let config = ResolverConfig::new("https://example.com/api");
        assert_eq!(
            resolve_relative("/apiary/a.jpg", &config),
            "https://example.com/api/apiary/a.jpg"
        );
    }

    #[test]
    fn resolve_relative_with_unparsable_api_url_concatenates() {
        let config = ResolverConfig::new("not-a-url");
        assert_eq!(resolve_relative("a.jpg", &config), "not-a-url/a.jpg");
    }

    #[test]
    fn bare_path_tiers() {
        assert_eq!(
            candidates(&json!("/images/abc.jpg")),
            [
                "https://api.example.com/images/abc.jpg",
                "https://api.example.com/images/abc.jpg",
                "https://api.example.com/uploads/abc.jpg",
                crate::config::NO_IMAGE_PLACEHOLDER,
            ]
        );
    }

    #[test]
    fn bare_filename_tiers() {
        assert_eq!(
            candidates(&json!("abc.jpg")),
            [
                "https://api.example.com/abc.jpg",
                "https://api.example.comabc.jpg",
                "https://api.example.com/uploads/abc.jpg",
                crate::config::NO_IMAGE_PLACEHOLDER,
            ]
        );
    }

    #[test]
    fn absolute_img_uri_comes_first() {
        let list = candidates(&json!({ "img_uri": "https://cdn.example.com/p/cat.png" }));
        assert_eq!(list[0], "https://cdn.example.com/p/cat.png");
        assert_eq!(list[1], "https://api.example.comhttps://cdn.example.com/p/cat.png");
        assert_eq!(list[2], "https://api.example.com/images/cat.png");
    }

    #[test]
    fn absolute_string_keeps_basename_tier() {
        assert_eq!(
            candidates(&json!("http://old-host.example.com/uploads/cat.jpg")),
            [
                "http://old-host.example.com/uploads/cat.jpg",
                "https://api.example.comhttp://old-host.example.com/uploads/cat.jpg",
                "https://api.example.com/uploads/cat.jpg",
                crate::config::NO_IMAGE_PLACEHOLDER,
            ]
        );
    }

    #[test]
    fn relative_img_uri_tiers_precede_filename_tiers() {
        let list = candidates(&json!({ "id": "x", "img_uri": "images/cat.png" }));
        assert_eq!(
            list,
            [
                "https://api.example.com/images/cat.png",
                "https://api.example.comimages/cat.png",
                "https://api.example.com/images/cat.png",
                "https://api.example.com/uploads/cat.png",
                "https://api.example.com/uploads/cat.png",
                "/images/cat.png",
                "/uploads/cat.png",
                "https://api.example.com/public/images/cat.png",
                "https://api.example.com/public/uploads/cat.png",
                crate::config::NO_IMAGE_PLACEHOLDER,
            ]
        );
    }

    #[test]
    fn direct_urls_precede_constructed_paths() {
        let list = candidates(&json!({
            "name": "dog.jpg",
            "url": "https://elsewhere.example.com/dog.jpg",
        }));
        assert_eq!(list[0], "https://elsewhere.example.com/dog.jpg");
        assert_eq!(list[1], "https://api.example.com/images/dog.jpg");
    }

    #[test]
    fn id_only_uses_id_as_filename() {
        let list = candidates(&json!({ "_id": "65f1c0ffee0123456789abcd" }));
        assert_eq!(list[0], "https://api.example.com/images/65f1c0ffee0123456789abcd");
        assert_eq!(list.len(), 8);
    }

    #[test]
    fn absolute_filename_skips_concatenation() {
        let list = candidates(&json!({ "id": "https://cdn.example.com/raw" }));
        assert_eq!(
            list,
            ["https://cdn.example.com/raw", crate::config::NO_IMAGE_PLACEHOLDER]
        );
    }

    #[test]
    fn best_candidate_of_empty_is_placeholder() {
        assert_eq!(
            best_candidate(&ImageReference::Empty, &config()),
            crate::config::NO_IMAGE_PLACEHOLDER
        );
    }

    #[test]
    fn custom_placeholder_terminates_list() {
        let config = config().with_placeholder("/assets/avatar.png");
        let list = generate_candidates(&ImageReference::Path("me.png".into()), &config);
        assert_eq!(list.placeholder(), "/assets/avatar.png");
    }

    #[test]
    fn candidate_list_drops_empty_entries() {
        let list = CandidateList::new(["a", "", "b"], "p");
        assert_eq!(list.as_slice(), ["a", "b", "p"]);
        assert_eq!(list.last_index(), 2);
        assert_eq!(list.get(3), None);
    }

    #[test]
    fn position_from_skips_earlier_matches() {
        let list = CandidateList::new(["a", "b", "a"], "p");
        assert_eq!(list.position_from(0, "a"), Some(0));
        assert_eq!(list.position_from(1, "a"), Some(2));
        assert_eq!(list.position_from(0, "zz"), None);
    }

    #[test]
    fn serializes_as_array() {
        let list = CandidateList::new(["a"], "p");
        assert_eq!(serde_json::to_value(&list).unwrap(), json!(["a", "p"]));
    }
}
