//! Detached image probes.
//!
//! A probe loads one URL into an `HtmlImageElement` that is never attached
//! to the document and reports whether it loaded. The diagnostic panel
//! probes every candidate at once.
//!
//! All functions in this module require a browser environment
//! (`wasm32-unknown-unknown` target).

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use imageshare_resolve::ProbeStatus;
use tracing::debug;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use web_time::Instant;

/// Errors that can occur when starting a probe.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    /// A browser API call returned an error.
    #[error("browser API error: {0}")]
    JsError(String),
}

impl From<JsValue> for ProbeError {
    fn from(value: JsValue) -> Self {
        Self::JsError(format!("{value:?}"))
    }
}

/// Load and error handlers of one probe.
type Handlers = (Closure<dyn FnMut()>, Closure<dyn FnMut()>);

/// Callback and handlers of a probe that has not settled yet.
struct Pending<F, H> {
    on_done: Option<F>,
    handlers: Option<H>,
}

impl<F, H> Pending<F, H> {
    const fn new(on_done: F) -> Self {
        Self {
            on_done: Some(on_done),
            handlers: None,
        }
    }

    fn arm(&mut self, handlers: H) {
        self.handlers = Some(handlers);
    }

    /// Take the callback and the handlers.
    ///
    /// The handlers are released on every call; the callback is returned
    /// only by the first.
    fn settle(&mut self) -> (Option<F>, Option<H>) {
        (self.on_done.take(), self.handlers.take())
    }
}

/// Start loading `url` in a detached image element.
///
/// `on_done` is called exactly once, with [`ProbeStatus::Loaded`] or
/// [`ProbeStatus::Failed`] and the time since the probe started. When the
/// probe settles both handlers are detached from the element and freed.
///
/// # Errors
///
/// Returns [`ProbeError::JsError`] if the image element cannot be created.
pub fn probe_url<F>(url: &str, on_done: F) -> Result<(), ProbeError>
where
    F: FnOnce(ProbeStatus, Duration) + 'static,
{
    let img = web_sys::HtmlImageElement::new()?;
    let started = Instant::now();

    // The handlers reach `pending` through `settle`; settling takes them
    // out again, which breaks the cycle.
    let pending: Rc<RefCell<Pending<F, Handlers>>> = Rc::new(RefCell::new(Pending::new(on_done)));

    let settle = {
        let img = img.clone();
        let pending = Rc::clone(&pending);
        let probed = url.to_owned();
        Rc::new(move |status: ProbeStatus| {
            img.set_onload(None);
            img.set_onerror(None);
            // wasm-bindgen frees the running closure only after it returns.
            let (callback, handlers) = pending.borrow_mut().settle();
            if let Some(callback) = callback {
                let elapsed = started.elapsed();
                debug!(url = %probed, ?status, ?elapsed, "image probe finished");
                callback(status, elapsed);
            }
            drop(handlers);
        })
    };

    let on_load = {
        let settle = Rc::clone(&settle);
        Closure::<dyn FnMut()>::new(move || (*settle)(ProbeStatus::Loaded))
    };
    let on_error = Closure::<dyn FnMut()>::new(move || (*settle)(ProbeStatus::Failed));

    img.set_onload(Some(on_load.as_ref().unchecked_ref::<js_sys::Function>()));
    img.set_onerror(Some(on_error.as_ref().unchecked_ref::<js_sys::Function>()));
    pending.borrow_mut().arm((on_load, on_error));
    img.set_src(url);
    Ok(())
}
