//! Image element that walks its candidate list on load errors.

use dioxus::prelude::*;
use imageshare_resolve::{CandidateList, FallbackLoader, LoadEvent};
use tracing::debug;

/// Props for the [`FallbackImage`] component.
#[derive(Props, Clone, PartialEq)]
pub struct FallbackImageProps {
    /// Candidate URLs in priority order, ending in the placeholder.
    candidates: CandidateList,
    /// Alternative text.
    #[props(default = String::from("Image"))]
    alt: String,
    /// CSS classes for the `<img>` element.
    #[props(default)]
    class: String,
    /// Called once with the candidate that loaded, unless it was the
    /// placeholder.
    on_working: Option<EventHandler<String>>,
    /// Called with the displayed URL when the image is clicked.
    on_click: Option<EventHandler<String>>,
}

/// An `<img>` backed by a [`FallbackLoader`].
///
/// Renders the first candidate; each `error` event moves to the next one
/// until the placeholder is reached. Once the loader is exhausted or an
/// image has loaded, further events are ignored, so a broken placeholder
/// cannot trigger an error loop. New candidates restart the walk.
#[component]
pub fn FallbackImage(props: FallbackImageProps) -> Element {
    let mut loader = use_signal(|| FallbackLoader::new(props.candidates.clone()));

    // A changed reference starts over from the first candidate.
    if *loader.peek().candidates() != props.candidates {
        loader.set(FallbackLoader::new(props.candidates.clone()));
    }

    let onerror = move |_| {
        let mut loader = loader.write();
        if !loader.is_armed() {
            return;
        }
        // The element shows what the loader last handed out, so the failed
        // URL is the loader's current source.
        let failed = loader.source().to_owned();
        if let Some(next) = loader.handle(&LoadEvent::Failed { src: &failed }) {
            debug!(%failed, %next, "swapping image source");
        }
    };

    let onload = move |_| {
        let working = {
            let mut loader = loader.write();
            if !loader.is_armed() {
                return;
            }
            loader.handle(&LoadEvent::Loaded);
            loader.working_url().map(str::to_owned)
        };
        if let (Some(url), Some(handler)) = (working, props.on_working) {
            handler.call(url);
        }
    };

    let onclick = move |_| {
        if let Some(handler) = props.on_click {
            handler.call(loader.peek().source().to_owned());
        }
    };

    let src = loader.read().source().to_owned();

    rsx! {
        img {
            src: "{src}",
            alt: "{props.alt}",
            class: "{props.class}",
            loading: "lazy",
            onerror: onerror,
            onload: onload,
            onclick: onclick,
        }
    }
}
