//! Diagnostic panel that probes every candidate of a reference.
//!
//! Shows the raw reference, each generated candidate URL, and whether it
//! loads. Useful for finding which storage layout an old post was
//! written with.

use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::{LdCheck, LdLoader, LdX};
use imageshare_resolve::{
    CandidateList, ImageReference, ProbeEntry, ProbeReport, ProbeStatus, ResolverConfig,
    generate_candidates,
};
use serde_json::Value;
use tracing::warn;

use crate::probe::probe_url;

/// Props for the [`ImageDiagnostic`] component.
#[derive(Props, Clone, PartialEq)]
pub struct ImageDiagnosticProps {
    /// The reference whose candidates are probed.
    reference: ImageReference,
    /// The raw JSON the reference was read from, shown in the details.
    #[props(default)]
    raw: Value,
    /// Called with each non-placeholder candidate that loads.
    on_working: Option<EventHandler<String>>,
}

/// Candidate probe panel.
///
/// Every candidate is loaded in parallel in a detached image element. A
/// new reference discards the outcome of probes still in flight for the
/// previous one.
#[component]
pub fn ImageDiagnostic(props: ImageDiagnosticProps) -> Element {
    let config: ResolverConfig = use_context();
    let candidates = generate_candidates(&props.reference, &config);

    let mut report = use_signal(|| ProbeReport::new(&candidates));
    let mut probed_for = use_signal(|| Option::<CandidateList>::None);
    let mut generation = use_signal(|| 0u64);
    let mut expanded = use_signal(|| false);
    let mut probe_error = use_signal(|| Option::<String>::None);

    if probed_for.peek().as_ref() != Some(&candidates) {
        generation += 1;
        let my_generation = *generation.peek();
        report.set(ProbeReport::new(&candidates));
        probe_error.set(None);

        for (index, url) in candidates.iter().enumerate() {
            let on_working = props.on_working;
            let started = probe_url(url, move |status, elapsed| {
                // Outcomes for an older reference are stale.
                if *generation.peek() != my_generation {
                    return;
                }
                let working = report
                    .write()
                    .record(index, status, Some(elapsed))
                    .map(str::to_owned);
                if let (Some(url), Some(handler)) = (working, on_working) {
                    handler.call(url);
                }
            });
            if let Err(e) = started {
                warn!(%url, error = %e, "could not start image probe");
                report.write().record(index, ProbeStatus::Failed, None);
                probe_error.set(Some(format!("{e}")));
            }
        }
        probed_for.set(Some(candidates));
    }

    let report = report.read();
    let summary = report.summary();
    let raw_json = serde_json::to_string_pretty(&props.raw).unwrap_or_else(|e| format!("{e}"));
    let kind = props.reference.kind();

    rsx! {
        div { class: "diagnostic",
            div { class: "diagnostic-header",
                span { class: "muted", "{summary}" }
                button {
                    class: "button",
                    onclick: move |_| expanded.toggle(),
                    if expanded() { "Hide Details" } else { "Show Details" }
                }
            }

            if let Some(working) = report.first_working() {
                p { class: "working-url",
                    "Working URL: "
                    code { "{working}" }
                }
            }

            if let Some(ref err) = probe_error() {
                p { class: "error-text", "{err}" }
            }

            if expanded() {
                div { class: "diagnostic-details",
                    p { "Reference kind: "
                        code { "{kind}" }
                    }
                    pre { class: "diagnostic-json",
                        "{raw_json}"
                    }
                    ul { class: "probe-list",
                        for entry in report.entries() {
                            {render_entry(entry)}
                        }
                    }
                }
            }
        }
    }
}

/// One candidate row: status icon, URL, and timing once settled.
fn render_entry(entry: &ProbeEntry) -> Element {
    let (icon, status_class) = match entry.status {
        ProbeStatus::Loaded => (rsx! { Icon { width: 14, height: 14, icon: LdCheck } }, "loaded"),
        ProbeStatus::Failed => (rsx! { Icon { width: 14, height: 14, icon: LdX } }, "failed"),
        ProbeStatus::Pending => (
            rsx! { Icon { width: 14, height: 14, class: "spin", icon: LdLoader } },
            "pending",
        ),
    };
    let label = entry.status.label();
    let timing = entry
        .elapsed
        .map(|d| format!("{:.0} ms", d.as_secs_f64() * 1000.0))
        .unwrap_or_default();

    rsx! {
        li { class: "probe-entry {status_class}",
            title: "{label}",
            span { class: "probe-icon", {icon} }
            code { class: "probe-url", "{entry.url}" }
            span { class: "probe-time", "{timing}" }
        }
    }
}
