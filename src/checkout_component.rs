//! A Yew checkout form for apps that render the page themselves.
//!
//! The component renders the buyer fields, the card mount point, the feedback
//! container and the submit button, then drives the same [`CheckoutController`]
//! as the server-rendered page: same metadata-cache step, same outcome handling,
//! same plain form submission on success.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlFormElement, HtmlInputElement};
use yew::prelude::*;

use crate::cache::HttpMetadataCache;
use crate::client::{CardChange, CardElementOptions, StripeGateway};
use crate::components::{FeedbackMessage, TextField};
use crate::config::CheckoutConfig;
use crate::controller::CheckoutController;
use crate::credentials::{PublishableKey, TransactionSecret};
use crate::form::{self, FormFields};
use crate::use_stripejs;
use crate::view::{reload_window, CheckoutView};

/// [`CheckoutView`] backed by component state and a form `NodeRef`.
#[derive(Clone)]
pub struct YewCheckoutView {
    form: NodeRef,
    feedback: UseStateHandle<Option<String>>,
    submitting: UseStateHandle<bool>,
    save_info_id: String,
    csrf_field_name: String,
}

impl YewCheckoutView {
    fn form_element(&self) -> Option<HtmlFormElement> {
        self.form.cast::<HtmlFormElement>()
    }
}

impl CheckoutView for YewCheckoutView {
    fn show_error(&self, message: &str) {
        self.feedback.set(Some(message.to_string()));
    }

    fn clear_error(&self) {
        self.feedback.set(None);
    }

    fn set_submitting(&self, submitting: bool) {
        self.submitting.set(submitting);
    }

    fn read_form(&self) -> FormFields {
        let Some(form) = self.form_element() else {
            return FormFields::default();
        };
        let save_info = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(&self.save_info_id))
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok());
        form::read_form(&form, save_info.as_ref())
    }

    fn csrf_token(&self) -> String {
        self.form_element()
            .and_then(|form| form::field_value(&form, &self.csrf_field_name))
            .unwrap_or_default()
    }

    fn submit_form(&self) {
        match self.form_element() {
            Some(form) => {
                if let Err(err) = form.submit() {
                    tracing::error!("form submission failed: {:?}", err);
                }
            }
            None => tracing::error!("checkout form is no longer mounted"),
        }
    }

    fn reload_page(&self) {
        reload_window();
    }
}

type YewController = CheckoutController<StripeGateway, HttpMetadataCache, YewCheckoutView>;

/// Inputs the mounted widget and controller are built from; a change to any
/// of them tears the widget down and mounts a fresh one.
#[derive(Clone, Debug, PartialEq)]
struct WidgetDeps {
    ready: bool,
    publishable_key: AttrValue,
    client_secret: AttrValue,
    config: CheckoutConfig,
}

impl WidgetDeps {
    fn new(ready: bool, props: &CheckoutFormProps) -> Self {
        Self {
            ready,
            publishable_key: props.publishable_key.clone(),
            client_secret: props.client_secret.clone(),
            config: props.config.clone(),
        }
    }
}

/// Properties for the [`CheckoutForm`] component.
///
/// # Fields
///
/// * `publishable_key` – Your Stripe Publishable Key (`pk_…`).
/// * `client_secret` – The PaymentIntent client secret from your backend.
/// * `csrf_token` – Rendered as a hidden field named `config.csrf_field_name`.
/// * `action` – Where the form posts after a successful payment (default: current URL).
/// * `config` – Element ids, metadata-cache switch, overlay and card style.
/// * `button_label` – Override the submit button text (default: `"Complete Order"`).
/// * `children` – Extra Yew nodes (e.g. order summary) rendered at the top of the form.
#[derive(Properties, PartialEq, Clone)]
pub struct CheckoutFormProps {
    pub publishable_key: AttrValue,
    pub client_secret: AttrValue,
    #[prop_or_default]
    pub csrf_token: Option<AttrValue>,
    #[prop_or_default]
    pub action: AttrValue,
    #[prop_or_default]
    pub config: CheckoutConfig,
    #[prop_or_default]
    pub button_label: Option<AttrValue>,
    #[prop_or_default]
    pub children: Children,
}

/// Yew function component rendering a complete card checkout form.
///
/// # Example
///
/// ```rust,ignore
/// use yew::prelude::*;
/// use stripe_checkout_form::{CheckoutConfig, CheckoutForm};
///
/// #[function_component(App)]
/// fn app() -> Html {
///     html! {
///         <CheckoutForm
///             publishable_key="pk_test_123"
///             client_secret="pi_ABC_secret_XYZ"
///             csrf_token={Some(AttrValue::from("token"))}
///             config={CheckoutConfig::with_metadata_cache("loading-overlay")}
///         >
///             <p>{ "Your order: Awesome T-shirt – €25.00" }</p>
///         </CheckoutForm>
///     }
/// }
/// ```
#[function_component(CheckoutForm)]
pub fn checkout_form(props: &CheckoutFormProps) -> Html {
    let stripe_ready = use_stripejs();
    let form_ref = use_node_ref();
    let feedback = use_state(|| None::<String>);
    let submitting = use_state(|| false);
    let controller = use_mut_ref(|| None::<Rc<YewController>>);
    let config = &props.config;

    // Mount the card widget once Stripe.js is available
    {
        let slot: Rc<RefCell<Option<Rc<YewController>>>> = controller.clone();
        let form_ref = form_ref.clone();
        let submitting = submitting.clone();
        let feedback = feedback.clone();
        use_effect_with(WidgetDeps::new(stripe_ready, props), move |deps| {
            let mut mounted: Option<(Rc<YewController>, Closure<dyn FnMut(JsValue)>)> = None;
            if deps.ready {
                let config = &deps.config;
                let view = YewCheckoutView {
                    form: form_ref,
                    feedback: feedback.clone(),
                    submitting,
                    save_info_id: config.save_info_element_id.clone(),
                    csrf_field_name: config.csrf_field_name.clone(),
                };
                let key = PublishableKey::new(deps.publishable_key.as_str());
                let secret = TransactionSecret::new(deps.client_secret.as_str());
                let options = CardElementOptions {
                    style: config.card_style.clone(),
                };
                match StripeGateway::mount(&key, &config.card_selector(), &options) {
                    Ok(gateway) => {
                        let cache = config
                            .enable_metadata_cache
                            .then(|| HttpMetadataCache::new(config.cache_url.clone()));
                        let ctrl = Rc::new(CheckoutController::new(gateway, cache, view, secret));
                        let on_change = {
                            let ctrl = ctrl.clone();
                            Closure::<dyn FnMut(JsValue)>::new(move |event: JsValue| {
                                match serde_wasm_bindgen::from_value::<CardChange>(event) {
                                    Ok(change) => ctrl.handle_card_change(&change),
                                    Err(err) => tracing::warn!("unreadable card change event: {}", err),
                                }
                            })
                        };
                        ctrl.gateway().on_change(on_change.as_ref().unchecked_ref());
                        *slot.borrow_mut() = Some(ctrl.clone());
                        mounted = Some((ctrl, on_change));
                    }
                    Err(err) => {
                        tracing::error!("card widget failed to mount: {}", err);
                        feedback.set(Some(err.message));
                    }
                }
            }
            move || {
                if let Some((ctrl, on_change)) = mounted {
                    ctrl.gateway().off_change(on_change.as_ref().unchecked_ref());
                    if let Err(err) = ctrl.gateway().unmount() {
                        tracing::warn!("card unmount failed: {}", err);
                    }
                    slot.borrow_mut().take();
                }
            }
        });
    }

    let onsubmit = {
        let controller = controller.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let ctrl = controller.borrow().clone();
            match ctrl {
                Some(ctrl) => wasm_bindgen_futures::spawn_local(async move {
                    let outcome = ctrl.submit().await;
                    tracing::debug!(?outcome, "submission finished");
                }),
                None => tracing::warn!("submit before the card widget was ready"),
            }
        })
    };

    let show_overlay = *submitting && config.overlay_element_id.is_some();
    let form_style = show_overlay.then_some(AttrValue::Static("display: none;"));
    let label = props
        .button_label
        .clone()
        .unwrap_or(AttrValue::Static("Complete Order"));

    html! {
        <>
            <form
                id={config.form_id.clone()}
                ref={form_ref}
                method="POST"
                action={props.action.clone()}
                style={form_style}
                {onsubmit}
            >
                if let Some(token) = &props.csrf_token {
                    <input type="hidden" name={config.csrf_field_name.clone()} value={token.clone()} />
                }
                { for props.children.iter() }
                <fieldset class="rounded px-3 mb-5">
                    <legend class="fieldset-label small text-black px-2 w-auto">{ "Details" }</legend>
                    <TextField name={form::FULL_NAME} placeholder="Full Name" required=true />
                    <TextField name={form::EMAIL} placeholder="Email Address" input_type="email" required=true />
                </fieldset>
                <fieldset class="rounded px-3 mb-5">
                    <legend class="fieldset-label small text-black px-2 w-auto">{ "Delivery" }</legend>
                    <TextField name={form::PHONE_NUMBER} placeholder="Phone Number" input_type="tel" required=true />
                    <TextField name={form::STREET_ADDRESS1} placeholder="Street Address 1" required=true />
                    <TextField name={form::STREET_ADDRESS2} placeholder="Street Address 2" />
                    <TextField name={form::TOWN_OR_CITY} placeholder="Town or City" required=true />
                    <TextField name={form::COUNTY} placeholder="County, State or Locality" />
                    <TextField name={form::POSTCODE} placeholder="Postal Code" />
                    <TextField name={form::COUNTRY} placeholder="Country (ISO code)" required=true />
                    <div class="form-check form-check-inline float-right mr-0">
                        <label class="form-check-label" for={config.save_info_element_id.clone()}>
                            { "Save this delivery information to my profile" }
                        </label>
                        <input
                            class="form-check-input ml-2 mr-0"
                            type="checkbox"
                            id={config.save_info_element_id.clone()}
                            name="save-info"
                            checked=true
                        />
                    </div>
                </fieldset>
                <fieldset class="px-3">
                    <legend class="fieldset-label small text-black px-2 w-auto">{ "Payment" }</legend>
                    <div class="mb-3" id={config.card_element_id.clone()}></div>
                    <FeedbackMessage id={config.feedback_element_id.clone()} message={(*feedback).clone()} />
                </fieldset>
                <div class="submit-button text-right mt-5 mb-2">
                    <button
                        id={config.submit_button_id.clone()}
                        type="submit"
                        class="btn btn-black rounded-0"
                        disabled={!stripe_ready || *submitting}
                    >
                        { label }
                    </button>
                </div>
            </form>
            if let Some(overlay_id) = config.overlay_element_id.clone() {
                if show_overlay {
                    <div id={overlay_id} class="loading-overlay">
                        <h1 class="text-light logo-font loading-spinner">
                            <span class="icon">
                                <i class="fas fa-3x fa-sync-alt fa-spin"></i>
                            </span>
                        </h1>
                    </div>
                }
            }
        </>
    }
}
