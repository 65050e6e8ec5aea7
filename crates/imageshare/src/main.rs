use dioxus::prelude::*;
use imageshare_io::{
    ImageDiagnostic, ImageModal, PostGallery, PostImage, ReferenceImage, UserAvatar, build_config,
};
use imageshare_resolve::{ImageReference, is_object_id, post_id_from_url, user_avatar};
use serde_json::Value;

/// Shown on first load: a post in the current schema.
const SAMPLE_POST: &str = r#"{
  "_id": "65a1f0c2e4b0a1b2c3d4e5f7",
  "title": "Sunset",
  "Post_Images": [
    { "id": "65a1f0c2e4b0a1b2c3d4e5f6", "img_uri": "/images/sunset.jpg" },
    { "id": "65a1f0c2e4b0a1b2c3d4e5f8", "img_uri": "/images/dusk.jpg" }
  ],
  "user": { "username": "demo", "img_uri": "/images/demo-avatar.jpg" }
}"#;

fn main() {
    dioxus::launch(app);
}

/// Parse the editor contents.
///
/// Text that is not valid JSON is treated as a bare path reference.
fn parse_input(text: &str) -> Value {
    let text = text.trim();
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_owned()))
}

/// Whether `value` looks like a post document rather than a single image
/// reference.
fn is_post(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|o| o.contains_key("Post_Images") || o.contains_key("images"))
}

/// Describe the post id found in a page URL.
fn describe_page_url(page_url: &str) -> String {
    if page_url.trim().is_empty() {
        return String::new();
    }
    post_id_from_url(page_url.trim())
        .map_or_else(|| String::from("No post id found"), |id| format!("Post id: {id}"))
}

/// Describe the `_id` of a post document.
fn describe_post_id(post: &Value) -> Option<String> {
    let id = post.get("_id").and_then(Value::as_str)?;
    let validity = if is_object_id(id) { "valid" } else { "not a valid id" };
    Some(format!("{id} ({validity})"))
}

/// Root application component.
///
/// Accepts a raw image reference or a whole post document, renders it
/// through the fallback loader, and probes every candidate in the
/// diagnostic panels. Clicking an image enlarges the URL it resolved to.
#[allow(clippy::too_many_lines)]
fn app() -> Element {
    use_context_provider(build_config);

    // --- Application state ---
    let mut input = use_signal(|| String::from(SAMPLE_POST));
    let mut avatar_input = use_signal(String::new);
    let mut page_url = use_signal(String::new);
    let mut working = use_signal(|| Option::<String>::None);
    let mut enlarged = use_signal(|| Option::<String>::None);

    // --- Derived values ---
    let raw = parse_input(&input());
    let post = is_post(&raw);
    let reference = ImageReference::from_json(&raw);
    let kind = if post { "post" } else { reference.kind() };
    let post_id = describe_post_id(&raw);
    let page_info = describe_page_url(&page_url());

    // An explicit avatar path wins over the one on the post's user.
    let avatar_text = avatar_input();
    let user_img = if avatar_text.trim().is_empty() {
        raw.get("user")
            .and_then(user_avatar)
            .map(str::to_owned)
    } else {
        Some(avatar_text.trim().to_owned())
    };

    // --- Handlers ---
    let on_input = move |evt: FormEvent| {
        working.set(None);
        input.set(evt.value());
    };

    let on_avatar_input = move |evt: FormEvent| {
        avatar_input.set(evt.value());
    };

    let on_page_url_input = move |evt: FormEvent| {
        page_url.set(evt.value());
    };

    let on_working = move |url: String| {
        // First hit for the current input; reset on edit.
        if working.peek().is_none() {
            working.set(Some(url));
        }
    };

    let on_enlarge = move |url: String| {
        enlarged.set(Some(url));
    };

    // --- Layout ---
    rsx! {
        style { dangerous_inner_html: include_str!("../assets/theme.css") }

        div { class: "page",
            // Header
            header { class: "page-header",
                h1 { "imageshare" }
                p { class: "muted",
                    "Resolve stored image references and see which URL actually loads"
                }
            }

            div { class: "columns",
                // Left column: inputs
                div { class: "column",
                    label { r#for: "reference", class: "field-label",
                        "Image reference or post JSON"
                    }
                    textarea {
                        id: "reference",
                        rows: "14",
                        spellcheck: "false",
                        value: "{input}",
                        oninput: on_input,
                    }
                    p {
                        "Parsed as "
                        span { class: "badge", "{kind}" }
                    }
                    if let Some(ref id) = post_id {
                        p { class: "muted", "Post id: {id}" }
                    }

                    label { r#for: "avatar", class: "field-label", "Avatar path" }
                    input {
                        id: "avatar",
                        r#type: "text",
                        placeholder: "img_uri from the post's user",
                        value: "{avatar_text}",
                        oninput: on_avatar_input,
                    }

                    label { r#for: "page-url", class: "field-label", "Post page URL" }
                    input {
                        id: "page-url",
                        r#type: "text",
                        placeholder: "https://example.com/posts/<id>",
                        value: "{page_url}",
                        oninput: on_page_url_input,
                    }
                    if !page_info.is_empty() {
                        p { class: "muted", "{page_info}" }
                    }
                }

                // Right column: rendering and diagnostics
                div { class: "column",
                    div { class: "row",
                        UserAvatar {
                            user_img,
                        }
                        span { class: "muted", "User avatar" }
                    }

                    if post {
                        PostImage {
                            post: raw.clone(),
                            class: "preview",
                            on_click: on_enlarge,
                        }
                        PostGallery {
                            post: raw.clone(),
                            on_select: on_enlarge,
                            on_working: on_working,
                        }
                    } else {
                        ReferenceImage {
                            reference: reference.clone(),
                            class: "preview",
                            on_click: on_enlarge,
                        }
                        ImageDiagnostic {
                            reference,
                            raw: raw.clone(),
                            on_working: on_working,
                        }
                    }

                    if let Some(ref url) = working() {
                        p { class: "working-url",
                            "Working URL: "
                            code { "{url}" }
                        }
                    }
                }
            }

            if let Some(src) = enlarged() {
                ImageModal {
                    src,
                    on_close: move |()| enlarged.set(None),
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use imageshare_resolve::post_images;
    use serde_json::json;

    #[test]
    fn non_json_input_is_a_path() {
        assert_eq!(parse_input("  abc.jpg \n"), json!("abc.jpg"));
    }

    #[test]
    fn json_input_is_parsed() {
        assert_eq!(parse_input(r#"{"filename":"a.jpg"}"#), json!({"filename": "a.jpg"}));
        assert_eq!(parse_input("null"), Value::Null);
    }

    #[test]
    fn post_documents_are_detected() {
        assert!(is_post(&json!({"images": []})));
        assert!(is_post(&json!({"Post_Images": [{"img_uri": "/images/a.jpg"}]})));
        assert!(!is_post(&json!({"img_uri": "/images/a.jpg"})));
        assert!(!is_post(&json!("a.jpg")));
    }

    #[test]
    fn sample_post_has_every_image() {
        let post = parse_input(SAMPLE_POST);
        assert!(is_post(&post));
        let kinds: Vec<_> = post_images(&post).iter().map(ImageReference::kind).collect();
        assert_eq!(kinds, ["uri", "uri"]);
    }

    #[test]
    fn page_url_reports_the_post_id() {
        assert_eq!(
            describe_page_url("https://example.com/posts/65a1f0c2e4b0a1b2c3d4e5f7"),
            "Post id: 65a1f0c2e4b0a1b2c3d4e5f7"
        );
        assert_eq!(describe_page_url("https://example.com/about"), "No post id found");
        assert_eq!(describe_page_url("   "), "");
    }

    #[test]
    fn post_id_validity_is_shown() {
        assert_eq!(
            describe_post_id(&parse_input(SAMPLE_POST)).unwrap(),
            "65a1f0c2e4b0a1b2c3d4e5f7 (valid)"
        );
        assert_eq!(
            describe_post_id(&json!({"_id": "42"})).unwrap(),
            "42 (not a valid id)"
        );
        assert_eq!(describe_post_id(&json!({})), None);
    }

    #[test]
    fn stylesheet_defines_every_component_class() {
        let css = include_str!("../assets/theme.css");
        let classes = [
            "page", "page-header", "columns", "column", "row", "field-label", "muted",
            "badge", "button", "preview", "avatar", "working-url", "error-text",
            "diagnostic", "diagnostic-header", "diagnostic-details", "diagnostic-json",
            "probe-list", "probe-entry", "loaded", "failed", "pending", "probe-icon",
            "probe-url", "probe-time", "spin", "gallery-toolbar", "gallery",
            "gallery-item", "gallery-image", "modal-overlay", "modal-content",
            "modal-close", "modal-image",
        ];
        for class in classes {
            let selector = format!(".{class}");
            let defined = css.match_indices(&selector).any(|(i, _)| {
                css[i + selector.len()..]
                    .chars()
                    .next()
                    .is_some_and(|c| !c.is_ascii_alphanumeric() && c != '-')
            });
            assert!(defined, "{selector} missing from theme.css");
        }
    }
}
