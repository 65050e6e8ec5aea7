//! Every image of a post, each with its own diagnostic panel.

use dioxus::prelude::*;
use imageshare_resolve::{ImageReference, post_image_values};
use serde_json::Value;

use super::{ImageDiagnostic, ReferenceImage};

/// Props for the [`PostGallery`] component.
#[derive(Props, Clone, PartialEq)]
pub struct PostGalleryProps {
    /// The post document as returned by the API.
    post: Value,
    /// Called with the displayed URL of a clicked image.
    on_select: Option<EventHandler<String>>,
    /// Called with each candidate a diagnostic panel finds working.
    on_working: Option<EventHandler<String>>,
}

/// All images of a post, from `Post_Images` or `images`.
///
/// Diagnostics start shown and can be toggled off; while shown, each
/// image's candidates are probed.
#[component]
pub fn PostGallery(props: PostGalleryProps) -> Element {
    let mut show_diagnostics = use_signal(|| true);
    let on_select = props.on_select;
    let on_working = props.on_working;
    let entries = post_image_values(&props.post);

    if entries.is_empty() {
        return rsx! {
            p { class: "muted", "This post has no images" }
        };
    }

    let count = entries.len();

    rsx! {
        div { class: "gallery-toolbar",
            span { class: "muted", "{count} image(s)" }
            button {
                class: "button",
                onclick: move |_| show_diagnostics.toggle(),
                if show_diagnostics() { "Hide Image Diagnostics" } else { "Show Image Diagnostics" }
            }
        }
        div { class: "gallery",
            for (index, raw) in entries.iter().enumerate() {
                figure { key: "{index}", class: "gallery-item",
                    ReferenceImage {
                        reference: ImageReference::from_json(raw),
                        alt: format!("Post image {}", index + 1),
                        class: "gallery-image",
                        on_click: move |url: String| {
                            if let Some(handler) = on_select {
                                handler.call(url);
                            }
                        },
                    }
                    if show_diagnostics() {
                        ImageDiagnostic {
                            reference: ImageReference::from_json(raw),
                            raw: raw.clone(),
                            on_working: move |url: String| {
                                if let Some(handler) = on_working {
                                    handler.call(url);
                                }
                            },
                        }
                    }
                }
            }
        }
    }
}
