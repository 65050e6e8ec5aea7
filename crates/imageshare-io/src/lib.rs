//! imageshare-io: browser image loading and Dioxus component library.
//!
//! Binds the pure resolver in `imageshare-resolve` to the DOM: image
//! elements that walk their candidate list on load errors, avatar, post
//! image and gallery wrappers, an image overlay, and a diagnostic panel
//! that probes every candidate with detached `HtmlImageElement`s.
//!
//! Components read the [`ResolverConfig`](imageshare_resolve::ResolverConfig)
//! from Dioxus context; the app root provides it once at startup.

pub mod components;
pub mod config;
pub mod probe;

pub use components::{
    FallbackImage, ImageDiagnostic, ImageModal, PostGallery, PostImage, ReferenceImage, UserAvatar,
};
pub use config::build_config;
pub use probe::{ProbeError, probe_url};
