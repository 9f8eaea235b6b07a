//! Contact actions
//!
//! URIs handed to the OS launchers for calling, texting or navigating to a
//! grower. Launching is fire-and-forget; nothing here waits for a response.

use std::fmt::{Display, Formatter, Result as FmtResult};

use thiserror::Error;
use url::{Url, form_urlencoded};

use crate::geo::Coordinates;

/// Errors building a contact URI.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContactError {
    /// The grower has no phone number on file.
    #[error("no phone number")]
    MissingPhone,

    /// The resulting URI could not be built.
    #[error("invalid contact uri: {0}")]
    InvalidUri(#[from] url::ParseError),
}

/// An intent for one of the OS apps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactAction {
    /// Open the dialer
    Call(Url),

    /// Open the messaging app with a prefilled body
    Sms(Url),

    /// Open turn-by-turn navigation
    Navigate(Url),
}

impl ContactAction {
    /// `tel:` intent for the given number.
    ///
    /// # Errors
    ///
    /// Returns [`ContactError::MissingPhone`] for a blank number.
    pub fn call(phone: &str) -> Result<Self, ContactError> {
        Ok(Self::Call(Url::parse(&format!("tel:{}", dialable(phone)?))?))
    }

    /// `sms:` intent with a prefilled, percent-encoded body.
    ///
    /// # Errors
    ///
    /// Returns [`ContactError::MissingPhone`] for a blank number.
    pub fn sms(phone: &str, body: &str) -> Result<Self, ContactError> {
        let mut url = Url::parse(&format!("sms:{}", dialable(phone)?))?;

        if !body.is_empty() {
            let encoded = form_urlencoded::byte_serialize(body.as_bytes())
                .collect::<String>()
                .replace('+', "%20");

            url.set_query(Some(&format!("body={encoded}")));
        }

        Ok(Self::Sms(url))
    }

    /// Navigation intent to a point.
    ///
    /// # Errors
    ///
    /// Returns [`ContactError::InvalidUri`] if the maps URL cannot be built.
    pub fn navigate_to(destination: Coordinates) -> Result<Self, ContactError> {
        Self::navigate(&format!("{},{}", destination.lat, destination.lng))
    }

    /// Navigation intent to a free-text address such as a stall's street and city.
    ///
    /// # Errors
    ///
    /// Returns [`ContactError::InvalidUri`] if the maps URL cannot be built.
    pub fn navigate_to_address(address: &str) -> Result<Self, ContactError> {
        Self::navigate(address.trim())
    }

    fn navigate(destination: &str) -> Result<Self, ContactError> {
        let url = Url::parse_with_params(
            "https://www.google.com/maps/dir/",
            &[("api", "1"), ("destination", destination)],
        )?;

        Ok(Self::Navigate(url))
    }

    /// The URI to launch.
    pub fn url(&self) -> &Url {
        match self {
            Self::Call(url) | Self::Sms(url) | Self::Navigate(url) => url,
        }
    }
}

impl Display for ContactAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(self.url(), f)
    }
}

fn dialable(phone: &str) -> Result<String, ContactError> {
    let digits: String = phone.chars().filter(|c| !c.is_whitespace()).collect();

    if digits.is_empty() {
        Err(ContactError::MissingPhone)
    } else {
        Ok(digits)
    }
}
