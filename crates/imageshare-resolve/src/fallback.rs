//! Fallback loading: walk a [`CandidateList`] on image load failures.
//!
//! [`FallbackLoader`] is the per-image state. The UI layer renders
//! [`FallbackLoader::source`], forwards the image element's `load` and
//! `error` events to [`FallbackLoader::handle`], and swaps the element's
//! source whenever `handle` returns a new one. The transition itself is the
//! pure function [`transition`], so the state machine can be tested
//! without a rendering environment.
//!
//! ```text
//! Loading(i) --load-------------> Loaded(i)      (terminal)
//! Loading(i) --error, i < last--> Loading(i + 1)
//! Loading(last) --error---------> Exhausted      (terminal, placeholder)
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::candidates::{CandidateList, generate_candidates};
use crate::config::ResolverConfig;
use crate::reference::ImageReference;

/// Where a loader is in its walk through the candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadState {
    /// Candidate `i` is being loaded.
    Loading(usize),
    /// Candidate `i` loaded successfully.
    Loaded(usize),
    /// Every candidate failed; the placeholder is shown and no further
    /// errors are handled.
    Exhausted,
}

impl LoadState {
    /// Whether no further event can change the state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Loading(_))
    }
}

/// An event reported by the image element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadEvent<'a> {
    /// The current source loaded.
    Loaded,
    /// The given source failed to load.
    ///
    /// Matched against the candidates by value, since the element's source
    /// may have been set by someone else.
    Failed {
        /// The URL that failed.
        src: &'a str,
    },
}

/// Compute the state following `event`.
///
/// The index never decreases: a failed URL is looked up at or after the
/// current index, and the next candidate is the first later entry that
/// differs from it, so a URL produced by two tiers is not retried. A
/// failed URL that is not in the remaining list, or a failure of the last
/// entry, exhausts the loader.
#[must_use]
pub fn transition(candidates: &CandidateList, state: LoadState, event: &LoadEvent<'_>) -> LoadState {
    let LoadState::Loading(current) = state else {
        return state;
    };
    match *event {
        LoadEvent::Loaded => LoadState::Loaded(current),
        LoadEvent::Failed { src } => {
            let Some(failed) = candidates.position_from(current, src) else {
                return LoadState::Exhausted;
            };
            candidates
                .iter()
                .enumerate()
                .skip(failed + 1)
                .find_map(|(i, url)| (url != src).then_some(i))
                .map_or(LoadState::Exhausted, LoadState::Loading)
        }
    }
}

/// Per-image fallback state: the candidates and the current position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackLoader {
    candidates: CandidateList,
    state: LoadState,
}

impl FallbackLoader {
    /// Start loading the first candidate.
    #[must_use]
    pub const fn new(candidates: CandidateList) -> Self {
        Self {
            candidates,
            state: LoadState::Loading(0),
        }
    }

    /// Generate candidates for `reference` and start loading the first.
    #[must_use]
    pub fn for_reference(reference: &ImageReference, config: &ResolverConfig) -> Self {
        Self::new(generate_candidates(reference, config))
    }

    /// Replace the candidates (the reference changed) and restart at the
    /// first one.
    pub fn reset(&mut self, candidates: CandidateList) {
        self.candidates = candidates;
        self.state = LoadState::Loading(0);
    }

    /// The URL the image element should display.
    #[must_use]
    pub fn source(&self) -> &str {
        match self.state {
            LoadState::Loading(i) | LoadState::Loaded(i) => {
                self.candidates.get(i).unwrap_or_else(|| self.candidates.placeholder())
            }
            LoadState::Exhausted => self.candidates.placeholder(),
        }
    }

    /// The current state.
    #[must_use]
    pub const fn state(&self) -> LoadState {
        self.state
    }

    /// The candidates being walked.
    #[must_use]
    pub const fn candidates(&self) -> &CandidateList {
        &self.candidates
    }

    /// Whether error events are still acted upon.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        matches!(self.state, LoadState::Loading(_))
    }

    /// The candidate that loaded, unless it is the placeholder.
    #[must_use]
    pub fn working_url(&self) -> Option<&str> {
        match self.state {
            LoadState::Loaded(i) if i != self.candidates.last_index() => self.candidates.get(i),
            _ => None,
        }
    }

    /// Apply an event.
    ///
    /// Returns the new source when the displayed URL changes, `None` when
    /// the element should keep its current source.
    pub fn handle(&mut self, event: &LoadEvent<'_>) -> Option<&str> {
        let before = self.state;
        self.state = transition(&self.candidates, before, event);
        match (before, self.state) {
            (LoadState::Loading(_), LoadState::Loading(next)) => {
                debug!(
                    failed = ?event,
                    next,
                    src = self.source(),
                    "image load failed, trying next candidate"
                );
                Some(self.source())
            }
            (LoadState::Loading(i), LoadState::Exhausted) => {
                warn!(
                    tried = self.candidates.len(),
                    "all image candidates failed, using placeholder"
                );
                // Already showing the placeholder if the last entry failed.
                if i == self.candidates.last_index() {
                    None
                } else {
                    Some(self.source())
                }
            }
            _ => None,
        }
    }
}
