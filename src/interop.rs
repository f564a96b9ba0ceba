//! interop.rs
//!
//! Load Stripe.js v3 at runtime (no inline JS).
//!
//! # Overview
//! `load_stripe_js()` injects a single
//! `<script id="stripejs-sdk" src="https://js.stripe.com/v3/">`
//! into `<head>` when `window.Stripe` is missing and resolves once the
//! script's `load` event fires. A script whose load failed is swapped for a
//! fresh one on the next call instead of being awaited again. `use_stripejs()` wraps it for Yew
//! components: `false` until Stripe.js is available, `true` afterwards.
//!
//! # Usage
//! ```rust,ignore
//! use yew::prelude::*;
//! use stripe_checkout_form::use_stripejs;
//!
//! #[function_component(App)]
//! fn app() -> Html {
//!     let stripe_ready = use_stripejs();
//!     html! {
//!         if stripe_ready {
//!             <p>{"Stripe.js loaded"}</p>
//!         } else {
//!             <p>{"Loading Stripe.js..."}</p>
//!         }
//!     }
//! }
//! ```

use wasm_bindgen::prelude::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::js_sys::{Promise, Reflect};
use web_sys::{Document, Event, HtmlScriptElement};
use yew::functional::hook;
use yew::prelude::*;

use crate::error::{CheckoutError, Result};

const SCRIPT_ID: &str = "stripejs-sdk";
const SCRIPT_SRC: &str = "https://js.stripe.com/v3/";

/// Whether `window.Stripe` exists yet.
pub fn stripe_js_present() -> bool {
    web_sys::window()
        .and_then(|win| Reflect::has(&win, &JsValue::from_str("Stripe")).ok())
        .unwrap_or(false)
}

/// Attribute recording how an injected script settled: `loading`, `loaded` or `failed`.
const LOAD_STATE_ATTR: &str = "data-load-state";

/// What to do about the `#stripejs-sdk` script, given what the page holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScriptPlan {
    /// `window.Stripe` already exists.
    Ready,
    /// No script on the page yet.
    Inject,
    /// Our script is still loading.
    Wait,
    /// The previous script failed, or carries no load state we can trust.
    Reinject,
    /// The script loaded but never defined `window.Stripe`.
    Broken,
}

/// `existing` is `None` without a script, else the script's load-state attribute.
fn plan(stripe_present: bool, existing: Option<Option<&str>>) -> ScriptPlan {
    match (stripe_present, existing) {
        (true, _) => ScriptPlan::Ready,
        (false, None) => ScriptPlan::Inject,
        (false, Some(Some("loading"))) => ScriptPlan::Wait,
        (false, Some(Some("loaded"))) => ScriptPlan::Broken,
        (false, Some(_)) => ScriptPlan::Reinject,
    }
}

fn inject(document: &Document) -> Result<HtmlScriptElement> {
    let script: HtmlScriptElement = document
        .create_element("script")
        .map_err(CheckoutError::from_js)?
        .dyn_into()
        .map_err(|_| CheckoutError::Js("could not create a script element".into()))?;
    script.set_id(SCRIPT_ID);
    script.set_src(SCRIPT_SRC);
    script
        .set_attribute(LOAD_STATE_ATTR, "loading")
        .map_err(CheckoutError::from_js)?;

    let marker = {
        let script = script.clone();
        Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let state = if event.type_() == "load" { "loaded" } else { "failed" };
            let _ = script.set_attribute(LOAD_STATE_ATTR, state);
        })
    };
    for kind in ["load", "error"] {
        script
            .add_event_listener_with_callback(kind, marker.as_ref().unchecked_ref())
            .map_err(CheckoutError::from_js)?;
    }
    // Outlives this call; one per injected script.
    marker.forget();

    document
        .head()
        .ok_or_else(|| CheckoutError::Js("document has no <head>".into()))?
        .append_child(&script)
        .map_err(CheckoutError::from_js)?;
    tracing::debug!("injected Stripe.js script");
    Ok(script)
}

/// The script to wait on, or `None` when Stripe.js is already usable.
fn script_element(document: &Document) -> Result<Option<HtmlScriptElement>> {
    let existing = match document.get_element_by_id(SCRIPT_ID) {
        Some(el) => Some(el.dyn_into::<HtmlScriptElement>().map_err(|_| {
            CheckoutError::UnexpectedElement {
                id: SCRIPT_ID.to_string(),
                expected: "script",
            }
        })?),
        None => None,
    };
    let state = existing.as_ref().map(|script| script.get_attribute(LOAD_STATE_ATTR));

    match plan(stripe_js_present(), state.as_ref().map(|s| s.as_deref())) {
        ScriptPlan::Ready => Ok(None),
        ScriptPlan::Inject => inject(document).map(Some),
        ScriptPlan::Wait => Ok(existing),
        ScriptPlan::Reinject => {
            if let Some(stale) = existing {
                tracing::warn!(state = ?stale.get_attribute(LOAD_STATE_ATTR), "replacing Stripe.js script");
                stale.remove();
            }
            inject(document).map(Some)
        }
        ScriptPlan::Broken => Err(CheckoutError::Js(STRIPE_MISSING.into())),
    }
}

const STRIPE_MISSING: &str = "Stripe.js loaded but window.Stripe is missing";

/// Make sure Stripe.js is loaded. A script that is still loading is awaited;
/// one that failed is replaced, so a later call can recover.
pub async fn load_stripe_js() -> Result<()> {
    if stripe_js_present() {
        return Ok(());
    }
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| CheckoutError::Js("no document".into()))?;
    let Some(script) = script_element(&document)? else {
        return Ok(());
    };

    // The promise's resolve/reject functions double as the event listeners.
    let loaded = Promise::new(&mut |resolve, reject| {
        let _ = script.add_event_listener_with_callback("load", &resolve);
        let _ = script.add_event_listener_with_callback("error", &reject);
    });
    JsFuture::from(loaded)
        .await
        .map_err(|_| CheckoutError::Js(format!("failed to load {}", SCRIPT_SRC)))?;

    if stripe_js_present() {
        Ok(())
    } else {
        Err(CheckoutError::Js(STRIPE_MISSING.into()))
    }
}

/// Custom hook: load Stripe.js once and track readiness.
///
/// # Returns
/// - `false` while the `<script>` is being fetched & parsed.
/// - `true` once `window.Stripe` exists.
#[hook]
pub fn use_stripejs() -> bool {
    let loaded = use_state(stripe_js_present);

    {
        let loaded = loaded.clone();
        use_effect_with((), move |_| {
            if !*loaded {
                wasm_bindgen_futures::spawn_local(async move {
                    match load_stripe_js().await {
                        Ok(()) => loaded.set(true),
                        Err(err) => tracing::error!("{}", err),
                    }
                });
            }
            || ()
        });
    }

    *loaded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn present_stripe_needs_no_script() {
        assert_eq!(plan(true, None), ScriptPlan::Ready);
        assert_eq!(plan(true, Some(Some("failed"))), ScriptPlan::Ready);
    }

    #[test]
    fn empty_page_injects() {
        assert_eq!(plan(false, None), ScriptPlan::Inject);
    }

    #[test]
    fn loading_script_is_awaited() {
        assert_eq!(plan(false, Some(Some("loading"))), ScriptPlan::Wait);
    }

    #[test]
    fn failed_script_is_replaced_not_awaited() {
        assert_eq!(plan(false, Some(Some("failed"))), ScriptPlan::Reinject);
    }

    #[test]
    fn untracked_script_is_replaced() {
        assert_eq!(plan(false, Some(None)), ScriptPlan::Reinject);
        assert_eq!(plan(false, Some(Some("bogus"))), ScriptPlan::Reinject);
    }

    #[test]
    fn loaded_script_without_stripe_is_an_error() {
        assert_eq!(plan(false, Some(Some("loaded"))), ScriptPlan::Broken);
    }
}
