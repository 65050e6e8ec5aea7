//! Image references as stored by the API across schema versions.
//!
//! Posts and profiles reference their images in several shapes: a bare
//! filename or path, a `{ filename }` object, a server-canonical
//! `{ img_uri }` object, or an object that only carries an `_id`/`id`.
//! [`ImageReference::from_json`] classifies a raw JSON value into one of
//! these shapes so the candidate generator can match on it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Properties checked, in order, when extracting a filename from an object.
const FILENAME_PROPERTIES: [&str; 6] = ["filename", "img_uri", "imageUrl", "uri", "path", "name"];

/// A reference to an image, classified by shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageReference {
    /// No image (`null`, `false`, or an empty string).
    Empty,
    /// A bare filename or path, e.g. `"abc.jpg"` or `"/images/abc.jpg"`.
    Path(String),
    /// An object carrying the server-canonical `img_uri`.
    ///
    /// [`ImageObject::img_uri`] is always `Some`.
    Uri(ImageObject),
    /// An object with a filename-like property but no `img_uri`.
    Named(ImageObject),
    /// An object that only carries an identifier, used as the filename.
    IdOnly(String),
    /// A value with no usable property.
    Unrecognized,
}

impl ImageReference {
    /// Classify a raw JSON value.
    ///
    /// Never fails: unknown shapes become [`ImageReference::Unrecognized`].
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null | Value::Bool(false) => Self::Empty,
            Value::String(s) if s.is_empty() => Self::Empty,
            Value::String(s) => Self::Path(s.clone()),
            Value::Object(map) => Self::from_object(ImageObject::from_map(map)),
            Value::Bool(true) | Value::Number(_) | Value::Array(_) => Self::Unrecognized,
        }
    }

    /// Classify an already-extracted [`ImageObject`].
    #[must_use]
    pub fn from_object(object: ImageObject) -> Self {
        if object.img_uri.is_some() {
            Self::Uri(object)
        } else if object.has_named_property() {
            Self::Named(object)
        } else if let Some(id) = object.id() {
            Self::IdOnly(id.to_owned())
        } else {
            Self::Unrecognized
        }
    }

    /// Short label for the reference shape, used in logs and the inspector.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Path(_) => "path",
            Self::Uri(_) => "uri",
            Self::Named(_) => "named",
            Self::IdOnly(_) => "id-only",
            Self::Unrecognized => "unrecognized",
        }
    }

    /// Whether the reference can produce anything besides the placeholder.
    #[must_use]
    pub const fn is_resolvable(&self) -> bool {
        !matches!(self, Self::Empty | Self::Unrecognized)
    }
}

impl From<&Value> for ImageReference {
    fn from(value: &Value) -> Self {
        Self::from_json(value)
    }
}

impl From<Value> for ImageReference {
    fn from(value: Value) -> Self {
        Self::from_json(&value)
    }
}

impl<'de> Deserialize<'de> for ImageReference {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_json(&value))
    }
}

/// The properties of an object-shaped reference that resolution consults.
///
/// Only non-empty strings are kept; identifiers may also be numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImageObject {
    /// Legacy stored filename.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Server-canonical URI: absolute, root-relative, or bare.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub img_uri: Option<String>,
    /// Direct image URL (`imageUrl`).
    #[serde(rename = "imageUrl", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Direct URL; used as a candidate but never as a filename source.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Document identifier (`_id`).
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl ImageObject {
    /// Extract the known properties from a JSON object.
    #[must_use]
    pub fn from_map(map: &Map<String, Value>) -> Self {
        let text = |key: &str| map.get(key).and_then(non_empty_str);
        let ident = |key: &str| map.get(key).and_then(identifier);
        Self {
            filename: text("filename"),
            img_uri: text("img_uri"),
            image_url: text("imageUrl"),
            uri: text("uri"),
            path: text("path"),
            name: text("name"),
            url: text("url"),
            object_id: ident("_id"),
            id: ident("id"),
        }
    }

    /// Look up a property by its JSON name.
    fn property(&self, key: &str) -> Option<&str> {
        match key {
            "filename" => self.filename.as_deref(),
            "img_uri" => self.img_uri.as_deref(),
            "imageUrl" => self.image_url.as_deref(),
            "uri" => self.uri.as_deref(),
            "path" => self.path.as_deref(),
            "name" => self.name.as_deref(),
            "url" => self.url.as_deref(),
            "_id" => self.object_id.as_deref(),
            "id" => self.id.as_deref(),
            _ => None,
        }
    }

    fn has_named_property(&self) -> bool {
        FILENAME_PROPERTIES
            .iter()
            .any(|key| self.property(key).is_some())
    }

    /// The identifier, preferring `_id` over `id`.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.object_id.as_deref().or(self.id.as_deref())
    }

    /// Extract a filename for the constructed-path tiers.
    ///
    /// Takes the basename of the first present property among `filename`,
    /// `img_uri`, `imageUrl`, `uri`, `path`, `name`, then falls back to the
    /// identifier verbatim. A property ending in `/` has no basename and
    /// also falls back to the identifier.
    #[must_use]
    pub fn filename(&self) -> Option<&str> {
        FILENAME_PROPERTIES
            .iter()
            .find_map(|key| self.property(key))
            .map(basename)
            .filter(|f| !f.is_empty())
            .or_else(|| self.id())
    }

    /// Direct URL-like properties, in candidate order: `imageUrl`, `uri`, `url`.
    pub fn direct_urls(&self) -> impl Iterator<Item = &str> {
        [&self.image_url, &self.uri, &self.url]
            .into_iter()
            .filter_map(Option::as_deref)
    }
}

/// The last `/`-separated segment of a path or URL.
#[must_use]
pub fn basename(path: &str) -> &str {
    path.rsplit_once('/').map_or(path, |(_, last)| last)
}

fn non_empty_str(value: &Value) -> Option<String> {
    value.as_str().filter(|s| !s.is_empty()).map(str::to_owned)
}

fn identifier(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        other => non_empty_str(other),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn falsy_values_are_empty() {
        assert_eq!(ImageReference::from_json(&Value::Null), ImageReference::Empty);
        assert_eq!(ImageReference::from_json(&json!(false)), ImageReference::Empty);
        assert_eq!(ImageReference::from_json(&json!("")), ImageReference::Empty);
    }

    #[test]
    fn string_is_path() {
        assert_eq!(
            ImageReference::from_json(&json!("/images/abc.jpg")),
            ImageReference::Path("/images/abc.jpg".into())
        );
    }

    #[test]
    fn img_uri_wins_over_filename() {
        let reference = ImageReference::from_json(&json!({
            "filename": "a.jpg",
            "img_uri": "/images/b.jpg",
        }));
        let ImageReference::Uri(object) = reference else {
            unreachable!("expected Uri, got {reference:?}");
        };
        assert_eq!(object.img_uri.as_deref(), Some("/images/b.jpg"));
        // `filename` is still the first filename source.
        assert_eq!(object.filename(), Some("a.jpg"));
    }

    #[test]
    fn post_images_entry_is_uri() {
        let reference = ImageReference::from_json(&json!({
            "id": "65f1c0ffee0123456789abcd",
            "img_uri": "images/1700000000000-cat.png",
        }));
        assert_eq!(reference.kind(), "uri");
    }

    #[test]
    fn filename_object_is_named() {
        let reference = ImageReference::from_json(&json!({ "filename": "bar.png" }));
        assert_eq!(reference.kind(), "named");
    }

    #[test]
    fn id_only_objects() {
        assert_eq!(
            ImageReference::from_json(&json!({ "_id": "abc" })),
            ImageReference::IdOnly("abc".into())
        );
        assert_eq!(
            ImageReference::from_json(&json!({ "id": 42 })),
            ImageReference::IdOnly("42".into())
        );
        assert_eq!(
            ImageReference::from_json(&json!({ "_id": "first", "id": "second" })),
            ImageReference::IdOnly("first".into())
        );
    }

    #[test]
    fn unknown_shapes_are_unrecognized() {
        assert_eq!(ImageReference::from_json(&json!({ "foo": 1 })), ImageReference::Unrecognized);
        assert_eq!(ImageReference::from_json(&json!(7)), ImageReference::Unrecognized);
        assert_eq!(ImageReference::from_json(&json!(["a.jpg"])), ImageReference::Unrecognized);
        // `url` alone is a candidate source, not a filename source.
        assert_eq!(
            ImageReference::from_json(&json!({ "url": "https://x/a.jpg" })),
            ImageReference::Unrecognized
        );
    }

    #[test]
    fn non_string_properties_are_ignored() {
        let reference = ImageReference::from_json(&json!({
            "filename": 12,
            "path": "",
            "name": "uploads/c.gif",
        }));
        let ImageReference::Named(object) = reference else {
            unreachable!("expected Named, got {reference:?}");
        };
        assert_eq!(object.filename(), Some("c.gif"));
    }

    #[test]
    fn filename_follows_property_order() {
        let object = ImageObject {
            uri: Some("https://cdn/x/u.png".into()),
            path: Some("p/q.png".into()),
            ..ImageObject::default()
        };
        assert_eq!(object.filename(), Some("u.png"));
    }

    #[test]
    fn directory_path_falls_back_to_id() {
        let object = ImageObject {
            path: Some("uploads/".into()),
            object_id: Some("abc".into()),
            ..ImageObject::default()
        };
        assert_eq!(object.filename(), Some("abc"));
    }

    #[test]
    fn direct_urls_order() {
        let object = ImageObject {
            url: Some("c".into()),
            image_url: Some("a".into()),
            uri: Some("b".into()),
            ..ImageObject::default()
        };
        assert_eq!(object.direct_urls().collect::<Vec<_>>(), ["a", "b", "c"]);
    }

    #[test]
    fn basename_of_paths() {
        assert_eq!(basename("abc.jpg"), "abc.jpg");
        assert_eq!(basename("/images/abc.jpg"), "abc.jpg");
        assert_eq!(basename("dir/"), "");
    }

    #[test]
    fn deserializes_through_from_json() {
        let refs: Vec<ImageReference> =
            serde_json::from_value(json!([null, "a.jpg", { "img_uri": "/i/b.jpg" }])).unwrap();
        assert_eq!(
            refs.iter().map(ImageReference::kind).collect::<Vec<_>>(),
            ["empty", "path", "uri"]
        );
    }
}
