//! Images for stored references and post documents.

use dioxus::prelude::*;
use imageshare_resolve::{ImageReference, ResolverConfig, generate_candidates, primary_image};
use serde_json::Value;

use super::FallbackImage;

/// Props for the [`ReferenceImage`] component.
#[derive(Props, Clone, PartialEq)]
pub struct ReferenceImageProps {
    /// The stored image reference, in any shape.
    reference: ImageReference,
    #[props(default = String::from("Image"))]
    alt: String,
    #[props(default)]
    class: String,
    /// Called with the candidate that loaded.
    on_working: Option<EventHandler<String>>,
    /// Called with the displayed URL when the image is clicked.
    on_click: Option<EventHandler<String>>,
}

/// Renders an [`ImageReference`] with fallback loading.
///
/// Candidates are generated with the [`ResolverConfig`] from context.
#[component]
pub fn ReferenceImage(props: ReferenceImageProps) -> Element {
    let config: ResolverConfig = use_context();
    let candidates = generate_candidates(&props.reference, &config);

    rsx! {
        FallbackImage {
            candidates,
            alt: props.alt,
            class: props.class,
            on_working: move |url: String| {
                if let Some(handler) = props.on_working {
                    handler.call(url);
                }
            },
            on_click: move |url: String| {
                if let Some(handler) = props.on_click {
                    handler.call(url);
                }
            },
        }
    }
}

/// Props for the [`PostImage`] component.
#[derive(Props, Clone, PartialEq)]
pub struct PostImageProps {
    /// The post document as returned by the API.
    post: Value,
    #[props(default)]
    class: String,
    on_working: Option<EventHandler<String>>,
    /// Called with the displayed URL when the image is clicked.
    on_click: Option<EventHandler<String>>,
}

/// The card image of a post: its first image from `Post_Images` or
/// `images`, or the placeholder when it has none.
#[component]
pub fn PostImage(props: PostImageProps) -> Element {
    let reference = primary_image(&props.post);
    let alt = props
        .post
        .get("title")
        .and_then(Value::as_str)
        .unwrap_or("Post image")
        .to_owned();

    rsx! {
        ReferenceImage {
            reference,
            alt,
            class: props.class,
            on_working: move |url: String| {
                if let Some(handler) = props.on_working {
                    handler.call(url);
                }
            },
            on_click: move |url: String| {
                if let Some(handler) = props.on_click {
                    handler.call(url);
                }
            },
        }
    }
}
