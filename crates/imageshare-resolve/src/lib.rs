//! imageshare-resolve: image-reference resolution (sans-IO).
//!
//! Images of posts and profiles are referenced in several shapes that
//! accumulated across schema versions. This crate turns any of them into a
//! display URL without migrating stored data:
//!
//! reference -> [`ImageReference`] -> [`CandidateList`] -> [`FallbackLoader`]
//!
//! The candidate list is computed up front and always ends in a placeholder,
//! so an image element can recover from each load failure locally by moving
//! to the next candidate. Nothing here touches the network or the DOM; the
//! browser bindings live in `imageshare-io`.

pub mod candidates;
pub mod config;
pub mod fallback;
pub mod object_id;
pub mod post;
pub mod probe;
pub mod reference;

pub use candidates::{CandidateList, best_candidate, generate_candidates, resolve_relative};
pub use config::{ConfigError, NO_IMAGE_PLACEHOLDER, ResolverConfig};
pub use fallback::{FallbackLoader, LoadEvent, LoadState, transition};
pub use object_id::{is_object_id, post_id_from_url};
pub use post::{avatar_candidates, post_image_values, post_images, primary_image, user_avatar};
pub use probe::{ProbeCounts, ProbeEntry, ProbeReport, ProbeStatus};
pub use reference::{ImageObject, ImageReference};

/// Resolve a raw JSON reference straight to its candidates.
///
/// Shorthand for [`ImageReference::from_json`] followed by
/// [`generate_candidates`].
#[must_use]
pub fn candidates_for_json(value: &serde_json::Value, config: &ResolverConfig) -> CandidateList {
    generate_candidates(&ImageReference::from_json(value), config)
}
