//! Buyer form fields and their mapping onto Stripe billing/shipping details.

use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlFormElement, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};

use crate::client::{Address, BillingDetails, PaymentDetails, ShippingDetails};

pub const FULL_NAME: &str = "full_name";
pub const EMAIL: &str = "email";
pub const PHONE_NUMBER: &str = "phone_number";
pub const COUNTRY: &str = "country";
pub const POSTCODE: &str = "postcode";
pub const TOWN_OR_CITY: &str = "town_or_city";
pub const STREET_ADDRESS1: &str = "street_address1";
pub const STREET_ADDRESS2: &str = "street_address2";
pub const COUNTY: &str = "county";

/// Values typed by the buyer, whitespace-trimmed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormFields {
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub country: String,
    pub postcode: String,
    pub town_or_city: String,
    pub street_address1: String,
    pub street_address2: String,
    pub county: String,
    pub save_info: bool,
}

impl FormFields {
    /// Build from a `name -> raw value` lookup. Missing fields read as empty.
    pub fn from_lookup<F>(mut lookup: F, save_info: bool) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut field = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .unwrap_or_default()
        };
        Self {
            full_name: field(FULL_NAME),
            email: field(EMAIL),
            phone_number: field(PHONE_NUMBER),
            country: field(COUNTRY),
            postcode: field(POSTCODE),
            town_or_city: field(TOWN_OR_CITY),
            street_address1: field(STREET_ADDRESS1),
            street_address2: field(STREET_ADDRESS2),
            county: field(COUNTY),
            save_info,
        }
    }

    pub fn billing_details(&self) -> BillingDetails {
        BillingDetails {
            name: self.full_name.clone(),
            phone: self.phone_number.clone(),
            email: self.email.clone(),
            address: Address {
                postal_code: None,
                ..self.address()
            },
        }
    }

    pub fn shipping_details(&self) -> ShippingDetails {
        ShippingDetails {
            name: self.full_name.clone(),
            phone: self.phone_number.clone(),
            address: Address {
                postal_code: Some(self.postcode.clone()),
                ..self.address()
            },
        }
    }

    pub fn payment_details(&self) -> PaymentDetails {
        PaymentDetails {
            billing_details: self.billing_details(),
            shipping: self.shipping_details(),
        }
    }

    fn address(&self) -> Address {
        Address {
            line1: self.street_address1.clone(),
            line2: self.street_address2.clone(),
            city: self.town_or_city.clone(),
            country: self.country.clone(),
            state: self.county.clone(),
            postal_code: None,
        }
    }
}

/// Value of the form control called `name`, whatever kind of control it is.
pub fn field_value(form: &HtmlFormElement, name: &str) -> Option<String> {
    let element: Element = form
        .query_selector(&format!("[name=\"{}\"]", name))
        .ok()
        .flatten()?;
    if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
        return Some(input.value());
    }
    if let Some(select) = element.dyn_ref::<HtmlSelectElement>() {
        return Some(select.value());
    }
    element
        .dyn_ref::<HtmlTextAreaElement>()
        .map(HtmlTextAreaElement::value)
}

/// Read every checkout field from `form`.
pub fn read_form(form: &HtmlFormElement, save_info: Option<&HtmlInputElement>) -> FormFields {
    let save_info = save_info.map(HtmlInputElement::checked).unwrap_or(false);
    FormFields::from_lookup(|name| field_value(form, name), save_info)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn fields(pairs: &[(&str, &str)]) -> FormFields {
        let map: HashMap<&str, &str> = pairs.iter().copied().collect();
        FormFields::from_lookup(|name| map.get(name).map(|v| v.to_string()), true)
    }

    #[test]
    fn values_are_trimmed() {
        let form = fields(&[(FULL_NAME, "  Jane  "), (EMAIL, "\tjane@example.com\n")]);
        assert_eq!(form.full_name, "Jane");
        assert_eq!(form.email, "jane@example.com");
        assert!(form.save_info);
    }

    #[test]
    fn missing_fields_are_empty() {
        let form = fields(&[]);
        assert_eq!(form.street_address2, "");
        assert_eq!(form.county, "");
    }

    #[test]
    fn billing_and_shipping_carry_trimmed_values() {
        let form = fields(&[
            (FULL_NAME, "  Jane  "),
            (PHONE_NUMBER, " 0123 "),
            (EMAIL, " jane@example.com "),
            (STREET_ADDRESS1, " 1 Main St "),
            (STREET_ADDRESS2, " Flat 2 "),
            (TOWN_OR_CITY, " Dublin "),
            (COUNTY, " Leinster "),
            (COUNTRY, " IE "),
            (POSTCODE, " D02 "),
        ]);

        let billing = form.billing_details();
        assert_eq!(billing.name, "Jane");
        assert_eq!(billing.phone, "0123");
        assert_eq!(billing.email, "jane@example.com");
        assert_eq!(billing.address.line1, "1 Main St");
        assert_eq!(billing.address.line2, "Flat 2");
        assert_eq!(billing.address.city, "Dublin");
        assert_eq!(billing.address.state, "Leinster");
        assert_eq!(billing.address.country, "IE");
        assert_eq!(billing.address.postal_code, None);

        let shipping = form.shipping_details();
        assert_eq!(shipping.name, "Jane");
        assert_eq!(shipping.address.postal_code.as_deref(), Some("D02"));
        assert_eq!(shipping.address.line1, billing.address.line1);
    }
}
