//! Dioxus UI components for imageshare.
//!
//! Provides the fallback-loading image element, wrappers for stored
//! references, post cards, post galleries and user avatars, the candidate
//! diagnostic panel, and the enlarged image overlay.

mod avatar;
mod diagnostic;
mod fallback_image;
mod gallery;
mod modal;
mod reference_image;

pub use avatar::UserAvatar;
pub use diagnostic::ImageDiagnostic;
pub use fallback_image::FallbackImage;
pub use gallery::PostGallery;
pub use modal::ImageModal;
pub use reference_image::PostImage;
pub use reference_image::ReferenceImage;
