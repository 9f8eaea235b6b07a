//! Form drafts
//!
//! Raw text typed into a form is kept in a draft. `validate` turns a draft into
//! a typed input or reports every problem at once; nothing is sent to the store
//! before that succeeds.

use std::{
    fmt::{Debug, Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    products::{Category, PredefinedProduct, Unit},
    stalls::{parse_display_date, parse_time},
};

/// A form field, named the way the form labels it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Person, product or stall name
    Name,
    /// Phone number
    Phone,
    /// Email address
    Email,
    /// PIN
    Pin,
    /// PIN repeated
    PinConfirmation,
    /// City
    City,
    /// Street
    Street,
    /// Price
    Price,
    /// Unit of measure
    Unit,
    /// Category
    Category,
    /// First day
    DateFrom,
    /// Last day
    DateTo,
    /// Opening time
    TimeFrom,
    /// Closing time
    TimeTo,
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(match self {
            Self::Name => "name",
            Self::Phone => "phone",
            Self::Email => "email",
            Self::Pin => "PIN",
            Self::PinConfirmation => "PIN confirmation",
            Self::City => "city",
            Self::Street => "street",
            Self::Price => "price",
            Self::Unit => "unit",
            Self::Category => "category",
            Self::DateFrom => "start date",
            Self::DateTo => "end date",
            Self::TimeFrom => "opening time",
            Self::TimeTo => "closing time",
        })
    }
}

/// A single problem with a draft.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Blank required field.
    #[error("{0} is required")]
    Required(Field),

    /// Present but malformed.
    #[error("{0} is not valid")]
    Invalid(Field),

    /// The two PIN entries differ.
    #[error("PINs do not match")]
    PinMismatch,

    /// The range ends before it starts.
    #[error("end is before start")]
    EndBeforeStart,
}

/// Collected problems of one draft.
pub type ValidationErrors = Vec<ValidationError>;

/// A 4-digit PIN. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Pin(String);

impl Pin {
    /// The digits.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl Debug for Pin {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str("Pin(****)")
    }
}

impl FromStr for Pin {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();

        if value.len() == 4 && value.bytes().all(|byte| byte.is_ascii_digit()) {
            Ok(Self(value.to_string()))
        } else {
            Err(ValidationError::Invalid(Field::Pin))
        }
    }
}

/// Normalises a Czech phone number to its 9 national digits.
///
/// Spaces are ignored and a `+420` or `00420` prefix is dropped.
///
/// # Errors
///
/// Returns [`ValidationError::Invalid`] unless exactly nine digits remain.
pub fn normalize_phone(value: &str) -> Result<String, ValidationError> {
    let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    let national = compact
        .strip_prefix("+420")
        .or_else(|| compact.strip_prefix("00420"))
        .unwrap_or(&compact);

    if national.len() == 9 && national.bytes().all(|byte| byte.is_ascii_digit()) {
        Ok(national.to_string())
    } else {
        Err(ValidationError::Invalid(Field::Phone))
    }
}

/// Checks the `local@domain.tld` shape.
pub fn is_valid_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.contains('@')
        && !value.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        && !domain.ends_with('.')
}

/// Parses a price typed with either a decimal comma or point.
///
/// # Errors
///
/// Returns [`ValidationError::Invalid`] for non-numbers and values not above zero.
pub fn parse_price(value: &str) -> Result<Decimal, ValidationError> {
    Decimal::from_str(&value.trim().replace(',', "."))
        .ok()
        .filter(|price| price.is_sign_positive() && !price.is_zero())
        .ok_or(ValidationError::Invalid(Field::Price))
}

fn required(value: &str, field: Field, errors: &mut ValidationErrors) -> String {
    let value = value.trim();

    if value.is_empty() {
        errors.push(ValidationError::Required(field));
    }

    value.to_string()
}

fn optional(value: &str) -> Option<String> {
    Some(value.trim().to_string()).filter(|value| !value.is_empty())
}

fn finish<T>(errors: ValidationErrors, valid: impl FnOnce() -> T) -> Result<T, ValidationErrors> {
    if errors.is_empty() {
        Ok(valid())
    } else {
        Err(errors)
    }
}

fn phone(value: &str, errors: &mut ValidationErrors) -> String {
    if value.trim().is_empty() {
        errors.push(ValidationError::Required(Field::Phone));
        return String::new();
    }

    normalize_phone(value).unwrap_or_else(|error| {
        errors.push(error);
        String::new()
    })
}

fn pin(value: &str, errors: &mut ValidationErrors) -> Option<Pin> {
    if value.trim().is_empty() {
        errors.push(ValidationError::Required(Field::Pin));
        return None;
    }

    value.parse().map_err(|error| errors.push(error)).ok()
}

/// Checkout form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutDraft {
    /// Customer name
    pub name: String,
    /// Customer phone
    pub phone: String,
    /// Optional note for the grower
    pub note: String,
}

/// Validated checkout details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutDetails {
    /// Customer name
    pub name: String,
    /// Normalised phone
    pub phone: String,
    /// Note, `None` when blank
    pub note: Option<String>,
}

impl CheckoutDraft {
    /// # Errors
    ///
    /// Returns every problem found in the draft.
    pub fn validate(&self) -> Result<CheckoutDetails, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = required(&self.name, Field::Name, &mut errors);
        let phone = phone(&self.phone, &mut errors);

        finish(errors, || CheckoutDetails {
            name,
            phone,
            note: optional(&self.note),
        })
    }
}

/// Grower registration form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationDraft {
    /// Display name
    pub name: String,
    /// Home city
    pub city: String,
    /// Phone, used as the login
    pub phone: String,
    /// Optional email
    pub email: String,
    /// PIN
    pub pin: String,
    /// PIN typed again
    pub pin_confirmation: String,
    /// Free-text description
    pub description: String,
}

/// Validated registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    /// Display name
    pub name: String,
    /// Home city
    pub city: String,
    /// Normalised phone
    pub phone: String,
    /// Email
    pub email: Option<String>,
    /// PIN
    pub pin: Pin,
    /// Description
    pub description: Option<String>,
}

impl RegistrationDraft {
    /// # Errors
    ///
    /// Returns every problem found in the draft.
    pub fn validate(&self) -> Result<Registration, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = required(&self.name, Field::Name, &mut errors);
        let city = required(&self.city, Field::City, &mut errors);
        let phone = phone(&self.phone, &mut errors);

        let email = optional(&self.email);
        if email.as_deref().is_some_and(|email| !is_valid_email(email)) {
            errors.push(ValidationError::Invalid(Field::Email));
        }

        let pin = pin(&self.pin, &mut errors);
        if pin.is_some() && self.pin.trim() != self.pin_confirmation.trim() {
            errors.push(ValidationError::PinMismatch);
        }

        match pin {
            Some(pin) if errors.is_empty() => Ok(Registration {
                name,
                city,
                phone,
                email,
                pin,
                description: optional(&self.description),
            }),
            _ => Err(errors),
        }
    }
}

/// Grower login form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginDraft {
    /// Phone
    pub phone: String,
    /// PIN
    pub pin: String,
}

/// Validated login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Normalised phone
    pub phone: String,
    /// PIN
    pub pin: Pin,
}

impl LoginDraft {
    /// # Errors
    ///
    /// Returns every problem found in the draft.
    pub fn validate(&self) -> Result<Credentials, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let phone = phone(&self.phone, &mut errors);
        let pin = pin(&self.pin, &mut errors);

        match pin {
            Some(pin) if errors.is_empty() => Ok(Credentials { phone, pin }),
            _ => Err(errors),
        }
    }
}

/// Product form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    /// Product name
    pub name: String,
    /// Description
    pub description: String,
    /// Price as typed
    pub price: String,
    /// Selected unit
    pub unit: Option<Unit>,
    /// Selected category
    pub category: Option<Category>,
    /// On offer
    pub available: bool,
}

impl Default for ProductDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            price: String::new(),
            unit: Some(Unit::Kilogram),
            category: None,
            available: true,
        }
    }
}

/// Validated product fields, serialised with the store's column names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductInput {
    /// Product name
    #[serde(rename = "nazev")]
    pub name: String,
    /// Description
    #[serde(rename = "popis")]
    pub description: Option<String>,
    /// Unit price
    #[serde(rename = "cena")]
    pub price: Decimal,
    /// Unit
    #[serde(rename = "jednotka")]
    pub unit: Unit,
    /// Category
    #[serde(rename = "kategorie")]
    pub category: Category,
    /// On offer
    #[serde(rename = "dostupnost")]
    pub available: bool,
}

impl ProductDraft {
    /// A draft prefilled from a catalog template.
    pub fn from_template(template: &PredefinedProduct) -> Self {
        Self {
            name: template.name.clone(),
            category: Some(template.category),
            ..Self::default()
        }
    }

    /// # Errors
    ///
    /// Returns every problem found in the draft.
    pub fn validate(&self) -> Result<ProductInput, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = required(&self.name, Field::Name, &mut errors);

        let price = if self.price.trim().is_empty() {
            errors.push(ValidationError::Required(Field::Price));
            None
        } else {
            parse_price(&self.price).map_err(|error| errors.push(error)).ok()
        };

        if self.unit.is_none() {
            errors.push(ValidationError::Required(Field::Unit));
        }

        if self.category.is_none() {
            errors.push(ValidationError::Required(Field::Category));
        }

        match (price, self.unit, self.category) {
            (Some(price), Some(unit), Some(category)) if errors.is_empty() => Ok(ProductInput {
                name,
                description: optional(&self.description),
                price,
                unit,
                category,
                available: self.available,
            }),
            _ => Err(errors),
        }
    }
}

/// Stall form; dates are typed as `DD.MM.YYYY`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StallDraft {
    /// Stall name
    pub name: String,
    /// Description
    pub description: String,
    /// City
    pub city: String,
    /// Street
    pub street: String,
    /// First day
    pub date_from: String,
    /// Last day
    pub date_to: String,
    /// Opening time, optional
    pub time_from: String,
    /// Closing time, optional
    pub time_to: String,
}

/// Validated stall fields in the store format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StallInput {
    /// Stall name
    #[serde(rename = "nazev")]
    pub name: String,
    /// Description
    #[serde(rename = "popis")]
    pub description: Option<String>,
    /// City
    #[serde(rename = "mesto")]
    pub city: String,
    /// Street
    #[serde(rename = "ulice")]
    pub street: String,
    /// First day, `YYYY-MM-DD`
    pub datum_od: String,
    /// Last day, `YYYY-MM-DD`
    pub datum_do: String,
    /// Opening time
    pub cas_od: Option<String>,
    /// Closing time
    pub cas_do: Option<String>,
}

impl StallDraft {
    /// # Errors
    ///
    /// Returns every problem found in the draft.
    pub fn validate(&self) -> Result<StallInput, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = required(&self.name, Field::Name, &mut errors);
        let city = required(&self.city, Field::City, &mut errors);
        let street = required(&self.street, Field::Street, &mut errors);

        let date = |value: &str, field: Field, errors: &mut ValidationErrors| {
            if value.trim().is_empty() {
                errors.push(ValidationError::Required(field));
                return None;
            }

            parse_display_date(value.trim())
                .map_err(|_err| errors.push(ValidationError::Invalid(field)))
                .ok()
        };

        let time = |value: &str, field: Field, errors: &mut ValidationErrors| {
            let value = optional(value)?;

            parse_time(&value)
                .map_err(|_err| errors.push(ValidationError::Invalid(field)))
                .ok()
                .map(|time| (value, time))
        };

        let from = date(&self.date_from, Field::DateFrom, &mut errors);
        let to = date(&self.date_to, Field::DateTo, &mut errors);
        let opens = time(&self.time_from, Field::TimeFrom, &mut errors);
        let closes = time(&self.time_to, Field::TimeTo, &mut errors);

        if let (Some(from), Some(to)) = (from, to) {
            let same_day_times_reversed = from == to
                && matches!((&opens, &closes), (Some((_, opens)), Some((_, closes))) if closes < opens);

            if to < from || same_day_times_reversed {
                errors.push(ValidationError::EndBeforeStart);
            }
        }

        match (from, to) {
            (Some(from), Some(to)) if errors.is_empty() => Ok(StallInput {
                name,
                description: optional(&self.description),
                city,
                street,
                datum_od: from.strftime("%Y-%m-%d").to_string(),
                datum_do: to.strftime("%Y-%m-%d").to_string(),
                cas_od: opens.map(|(text, _)| text),
                cas_do: closes.map(|(text, _)| text),
            }),
            _ => Err(errors),
        }
    }
}
