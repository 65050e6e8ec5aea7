//! User avatar with a stock fallback.

use dioxus::prelude::*;
use imageshare_resolve::{ResolverConfig, avatar_candidates};

use super::FallbackImage;
use crate::config::DEFAULT_AVATAR;

/// Props for the [`UserAvatar`] component.
#[derive(Props, Clone, PartialEq)]
pub struct UserAvatarProps {
    /// The user's stored `img_uri`, a `blob:` preview URL, or nothing.
    #[props(!optional)]
    user_img: Option<String>,
    /// Shown when the user has no photo or every candidate fails.
    #[props(default = String::from(DEFAULT_AVATAR))]
    default_avatar: String,
    #[props(default = String::from("User avatar"))]
    alt: String,
    #[props(default = String::from("avatar"))]
    class: String,
}

/// A round profile picture.
///
/// A failed user photo falls back to `default_avatar` rather than the
/// generic no-image placeholder.
#[component]
pub fn UserAvatar(props: UserAvatarProps) -> Element {
    let config: ResolverConfig = use_context();
    let candidates = avatar_candidates(props.user_img.as_deref(), &config, &props.default_avatar);

    rsx! {
        FallbackImage {
            candidates,
            alt: props.alt,
            class: props.class,
        }
    }
}
