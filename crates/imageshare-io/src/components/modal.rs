//! Full-size image overlay.

use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::LdX;

/// Props for the [`ImageModal`] component.
#[derive(Props, Clone, PartialEq)]
pub struct ImageModalProps {
    /// The URL to enlarge, normally the one the clicked image resolved to.
    src: String,
    #[props(default = String::from("Enlarged image"))]
    alt: String,
    /// Called when the backdrop or the close button is clicked.
    on_close: EventHandler<()>,
}

/// Shows one image over the page. Clicks on the image itself do not close
/// it.
#[component]
pub fn ImageModal(props: ImageModalProps) -> Element {
    let on_close = props.on_close;

    rsx! {
        div {
            class: "modal-overlay",
            role: "dialog",
            onclick: move |_| on_close.call(()),

            div {
                class: "modal-content",
                onclick: move |evt: MouseEvent| evt.stop_propagation(),

                button {
                    class: "modal-close",
                    aria_label: "Close",
                    onclick: move |_| on_close.call(()),
                    Icon { width: 20, height: 20, icon: LdX }
                }
                img { class: "modal-image", src: "{props.src}", alt: "{props.alt}" }
            }
        }
    }
}
