use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;
use utoipa::ToSchema;

use super::errors::{Field, FieldError, ValidationErrors};
use super::order::{CustomerInfo, PaymentMethod};

const MIN_NAME_CHARS: usize = 2;
const MIN_ADDRESS_CHARS: usize = 10;

/// Which field set the checkout form collects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CheckoutProfile {
    /// Name, free-form contact and a delivery address.
    #[default]
    Delivery,
    /// Name, a phone number and a payment method; address optional.
    PhonePayment,
}

impl std::str::FromStr for CheckoutProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "delivery" => Ok(CheckoutProfile::Delivery),
            "phone_payment" | "phone-payment" => Ok(CheckoutProfile::PhonePayment),
            other => Err(format!("unknown checkout profile '{other}'")),
        }
    }
}

/// Raw form input as typed by the customer.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidCheckout {
    pub customer: CustomerInfo,
    pub payment_method: Option<PaymentMethod>,
}

/// Digits only, if they form an 11-digit number starting with 7 or 8.
pub fn normalize_phone(raw: &str) -> Option<String> {
    static PHONE_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = PHONE_REGEX.get_or_init(|| Regex::new(r"^[78]\d{10}$").unwrap());
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    regex.is_match(&digits).then_some(digits)
}

impl CheckoutProfile {
    /// Checks every field and reports all failures at once.
    pub fn validate(self, form: &CheckoutForm) -> Result<ValidCheckout, ValidationErrors> {
        let mut errors = Vec::new();
        let mut reject = |field, message: &str| {
            errors.push(FieldError {
                field,
                message: message.to_string(),
            })
        };

        let name = form.name.trim();
        if name.chars().count() < MIN_NAME_CHARS {
            reject(Field::Name, "Name must be at least 2 characters");
        }

        let address = form.address.trim();
        let address_required = self == CheckoutProfile::Delivery;
        if (address_required || !address.is_empty())
            && address.chars().count() < MIN_ADDRESS_CHARS
        {
            reject(Field::Address, "Address must be at least 10 characters");
        }

        let raw_contact = form.contact.trim();
        let contact = match self {
            CheckoutProfile::Delivery => {
                if raw_contact.is_empty() {
                    reject(Field::Contact, "Contact is required");
                }
                raw_contact.to_string()
            }
            CheckoutProfile::PhonePayment => match normalize_phone(raw_contact) {
                Some(phone) => phone,
                None => {
                    reject(Field::Contact, "Phone must have 11 digits starting with 7 or 8");
                    String::new()
                }
            },
        };

        if self == CheckoutProfile::PhonePayment && form.payment_method.is_none() {
            reject(Field::PaymentMethod, "Choose a payment method");
        }

        if !errors.is_empty() {
            return Err(ValidationErrors { errors });
        }

        Ok(ValidCheckout {
            customer: CustomerInfo {
                name: name.to_string(),
                contact,
                address: address.to_string(),
            },
            payment_method: form.payment_method,
        })
    }
}
