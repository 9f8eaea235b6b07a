//! SMS verification codes
//!
//! Codes are stored in `sms_codes`; sending them is someone else's job.

use jiff::{SignedDuration, Timestamp};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// How long an issued code stays valid.
pub const CODE_TTL: SignedDuration = SignedDuration::from_mins(10);

/// A stored verification code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsCode {
    #[serde(rename = "telefon")]
    pub phone: String,

    #[serde(rename = "kod")]
    pub code: String,

    pub expires_at: Timestamp,
}

impl SmsCode {
    /// A fresh six-digit code for the phone.
    pub fn issue(phone: &str, now: Timestamp) -> Self {
        let code = rand::thread_rng().gen_range(0..1_000_000);

        Self {
            phone: phone.to_string(),
            code: format!("{code:06}"),
            expires_at: now.checked_add(CODE_TTL).unwrap_or(Timestamp::MAX),
        }
    }

    pub fn is_valid_at(&self, now: Timestamp) -> bool {
        now <= self.expires_at
    }
}
