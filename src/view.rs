//! The page side of the checkout: feedback, disabled/overlay toggles, form access.

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlFormElement, HtmlInputElement};

use crate::config::CheckoutConfig;
use crate::error::{CheckoutError, Result};
use crate::form::{self, FormFields};

/// Everything the controller needs from the page.
pub trait CheckoutView {
    /// Show a buyer-facing error message.
    fn show_error(&self, message: &str);
    fn clear_error(&self);
    /// Toggle the in-flight presentation: submit control, overlay.
    fn set_submitting(&self, submitting: bool);
    fn read_form(&self) -> FormFields;
    fn csrf_token(&self) -> String;
    /// Plain browser submission, bypassing the intercepting listener.
    fn submit_form(&self);
    fn reload_page(&self);
}

/// Look up `id` and cast it, failing fast when absent or of the wrong kind.
pub fn require_element<T: JsCast>(document: &Document, id: &str, expected: &'static str) -> Result<T> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| CheckoutError::MissingElement { id: id.to_string() })?
        .dyn_into::<T>()
        .map_err(|_| CheckoutError::UnexpectedElement {
            id: id.to_string(),
            expected,
        })
}

/// Render the alert icon followed by `message` into `container`.
///
/// The message is inserted as text, never parsed as markup.
pub fn render_error(document: &Document, container: &Element, message: &str) -> Result<()> {
    container.set_text_content(None);

    let icon = document.create_element("span").map_err(CheckoutError::from_js)?;
    icon.set_class_name("icon");
    icon.set_attribute("role", "alert").map_err(CheckoutError::from_js)?;
    let glyph = document.create_element("i").map_err(CheckoutError::from_js)?;
    glyph.set_class_name("fas fa-times");
    icon.append_child(&glyph).map_err(CheckoutError::from_js)?;

    let text = document.create_element("span").map_err(CheckoutError::from_js)?;
    text.set_text_content(Some(message));

    container.append_child(&icon).map_err(CheckoutError::from_js)?;
    container.append_child(&text).map_err(CheckoutError::from_js)?;
    Ok(())
}

/// Reload the current page.
pub fn reload_window() {
    let reloaded = web_sys::window()
        .ok_or_else(|| CheckoutError::Js("no window".into()))
        .and_then(|w| w.location().reload().map_err(CheckoutError::from_js));
    if let Err(err) = reloaded {
        tracing::error!("page reload failed: {}", err);
    }
}

/// [`CheckoutView`] over a server-rendered page.
#[derive(Debug, Clone)]
pub struct DomCheckoutView {
    document: Document,
    form: HtmlFormElement,
    submit_button: Element,
    feedback: Element,
    overlay: Option<HtmlElement>,
    save_info: Option<HtmlInputElement>,
    csrf_field_name: String,
}

impl DomCheckoutView {
    /// Resolve every element the checkout touches.
    ///
    /// The save-info checkbox is optional; everything else, the overlay included
    /// when configured, must exist.
    pub fn locate(document: &Document, config: &CheckoutConfig) -> Result<Self> {
        require_element::<HtmlElement>(document, &config.card_element_id, "element")?;
        let form = require_element::<HtmlFormElement>(document, &config.form_id, "form")?;
        let submit_button = require_element::<Element>(document, &config.submit_button_id, "element")?;
        let feedback = require_element::<Element>(document, &config.feedback_element_id, "element")?;
        let overlay = config
            .overlay_element_id
            .as_deref()
            .map(|id| require_element::<HtmlElement>(document, id, "HTML element"))
            .transpose()?;
        let save_info = document
            .get_element_by_id(&config.save_info_element_id)
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok());

        Ok(Self {
            document: document.clone(),
            form,
            submit_button,
            feedback,
            overlay,
            save_info,
            csrf_field_name: config.csrf_field_name.clone(),
        })
    }

    pub fn form(&self) -> &HtmlFormElement {
        &self.form
    }

    fn toggle_overlay(&self, submitting: bool) -> Result<()> {
        let Some(overlay) = &self.overlay else {
            return Ok(());
        };
        let form_style = self.form.style();
        let overlay_style = overlay.style();
        if submitting {
            form_style.set_property("display", "none").map_err(CheckoutError::from_js)?;
            overlay_style.set_property("display", "block").map_err(CheckoutError::from_js)?;
        } else {
            form_style.remove_property("display").map_err(CheckoutError::from_js)?;
            overlay_style.set_property("display", "none").map_err(CheckoutError::from_js)?;
        }
        Ok(())
    }
}

impl CheckoutView for DomCheckoutView {
    fn show_error(&self, message: &str) {
        if let Err(err) = render_error(&self.document, &self.feedback, message) {
            tracing::warn!("could not render card error: {}", err);
        }
    }

    fn clear_error(&self) {
        self.feedback.set_text_content(Some(""));
    }

    fn set_submitting(&self, submitting: bool) {
        let toggled = if submitting {
            self.submit_button.set_attribute("disabled", "true")
        } else {
            self.submit_button.remove_attribute("disabled")
        };
        if let Err(err) = toggled.map_err(CheckoutError::from_js).and_then(|_| self.toggle_overlay(submitting)) {
            tracing::warn!("could not toggle submitting state: {}", err);
        }
    }

    fn read_form(&self) -> FormFields {
        form::read_form(&self.form, self.save_info.as_ref())
    }

    fn csrf_token(&self) -> String {
        form::field_value(&self.form, &self.csrf_field_name).unwrap_or_default()
    }

    fn submit_form(&self) {
        if let Err(err) = self.form.submit() {
            tracing::error!("form submission failed: {}", CheckoutError::from_js(err));
        }
    }

    fn reload_page(&self) {
        reload_window();
    }
}
