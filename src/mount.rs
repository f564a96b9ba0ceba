//! Wiring a server-rendered checkout page: credentials, widget, listeners.

use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Event;

use crate::cache::HttpMetadataCache;
use crate::client::{CardChange, CardElementOptions, StripeGateway};
use crate::config::CheckoutConfig;
use crate::controller::CheckoutController;
use crate::credentials::read_credentials;
use crate::error::{CheckoutError, Result};
use crate::interop::load_stripe_js;
use crate::telemetry;
use crate::view::DomCheckoutView;

pub type PageController = CheckoutController<StripeGateway, HttpMetadataCache, DomCheckoutView>;

/// A mounted checkout. Dropping it, or calling `dispose`, detaches every
/// listener and unmounts the card widget.
#[wasm_bindgen]
pub struct CheckoutHandle {
    controller: Rc<PageController>,
    on_submit: Option<Closure<dyn FnMut(Event)>>,
    on_change: Option<Closure<dyn FnMut(JsValue)>>,
}

#[wasm_bindgen]
impl CheckoutHandle {
    /// Current submission state: `idle`, `submitting`, `redirecting`, `failed` or `reloading`.
    #[wasm_bindgen(getter)]
    pub fn state(&self) -> String {
        self.controller.state().name().to_string()
    }

    pub fn dispose(&mut self) {
        if let Some(on_submit) = self.on_submit.take() {
            let _ = self
                .controller
                .view()
                .form()
                .remove_event_listener_with_callback("submit", on_submit.as_ref().unchecked_ref());
        }
        if let Some(on_change) = self.on_change.take() {
            let gateway = self.controller.gateway();
            gateway.off_change(on_change.as_ref().unchecked_ref());
            if let Err(err) = gateway.unmount() {
                tracing::warn!("card unmount failed: {}", err);
            }
            tracing::debug!("checkout disposed");
        }
    }
}

impl Drop for CheckoutHandle {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Mount the checkout on the current page, with Stripe.js already loaded.
pub fn mount_checkout(config: &CheckoutConfig) -> Result<CheckoutHandle> {
    config.validate()?;
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| CheckoutError::Js("no document".into()))?;

    let view = DomCheckoutView::locate(&document, config)?;
    let (key, secret) = read_credentials(&document, config)?;
    let options = CardElementOptions {
        style: config.card_style.clone(),
    };
    let gateway = StripeGateway::mount(&key, &config.card_selector(), &options)?;
    let cache = config
        .enable_metadata_cache
        .then(|| HttpMetadataCache::new(config.cache_url.clone()));

    let controller = Rc::new(CheckoutController::new(gateway, cache, view, secret));

    // The submit listener is the only fallible registration; attach it before
    // Stripe holds any closure so an error leaves nothing dangling.
    let on_submit = {
        let controller = controller.clone();
        Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            event.prevent_default();
            let controller = controller.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let outcome = controller.submit().await;
                tracing::debug!(?outcome, "submission finished");
            });
        })
    };
    if let Err(err) = controller
        .view()
        .form()
        .add_event_listener_with_callback("submit", on_submit.as_ref().unchecked_ref())
    {
        if let Err(unmount) = controller.gateway().unmount() {
            tracing::warn!("card unmount failed: {}", unmount);
        }
        return Err(CheckoutError::from_js(err));
    }

    let on_change = {
        let controller = controller.clone();
        Closure::<dyn FnMut(JsValue)>::new(move |event: JsValue| {
            match serde_wasm_bindgen::from_value::<CardChange>(event) {
                Ok(change) => controller.handle_card_change(&change),
                Err(err) => tracing::warn!("unreadable card change event: {}", err),
            }
        })
    };
    controller.gateway().on_change(on_change.as_ref().unchecked_ref());

    tracing::info!(
        cache = config.enable_metadata_cache,
        overlay = config.overlay_element_id.is_some(),
        "checkout mounted"
    );
    Ok(CheckoutHandle {
        controller,
        on_submit: Some(on_submit),
        on_change: Some(on_change),
    })
}

/// JavaScript entry point: `await mountCheckout({ enableMetadataCache: true, ... })`.
///
/// Loads Stripe.js if needed, then mounts. Rejects with an `Error` naming the
/// missing element or bad option.
#[wasm_bindgen(js_name = mountCheckout)]
pub async fn mount_checkout_js(config: JsValue) -> std::result::Result<CheckoutHandle, JsValue> {
    console_error_panic_hook::set_once();
    let config: CheckoutConfig = if config.is_undefined() || config.is_null() {
        CheckoutConfig::default()
    } else {
        serde_wasm_bindgen::from_value(config)
            .map_err(|e| CheckoutError::Config(e.to_string()))?
    };
    telemetry::init(&config.log_level)?;
    load_stripe_js().await?;
    Ok(mount_checkout(&config)?)
}
