//! Turns a payment provider's redirect query into a Telegram `start` payload.
//!
//! Everything here is pure: no I/O, no logging, no shared state. Missing or
//! unusable references are ordinary [`PayloadOutcome`] values, not errors.

pub mod params;
pub mod sanitize;
pub mod status;
pub mod target;

use serde::Serialize;

pub use params::QueryParams;
pub use sanitize::sanitize;
pub use status::PaymentStatus;
pub use target::{BotUsername, DeepLink, MAX_START_LEN};

/// Query parameter carrying the provider's transaction reference.
pub const TX_REF_PARAM: &str = "tx_ref";
/// Cosmetic payment status from the provider.
pub const STATUS_PARAM: &str = "status";
/// Provider transaction id. Shown in diagnostics only.
pub const TRANSACTION_ID_PARAM: &str = "transaction_id";
/// Ready-made start payload for links that bypass the payment flow.
pub const PAYLOAD_PARAM: &str = "payload";

const VERIFY_PREFIX: &str = "verify_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome", content = "payload")]
pub enum PayloadOutcome {
    /// `verify_<sanitized reference>`, safe to use as a URL query value as-is.
    Success(String),
    /// No `tx_ref` was given, or every value given was blank.
    MissingReference,
    /// A `tx_ref` was given but nothing in it survives sanitizing.
    EmptyAfterSanitize,
}

impl PayloadOutcome {
    pub fn payload(&self) -> Option<&str> {
        match self {
            PayloadOutcome::Success(payload) => Some(payload.as_str()),
            _ => None,
        }
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            PayloadOutcome::Success(_) => "success",
            PayloadOutcome::MissingReference => "missing_reference",
            PayloadOutcome::EmptyAfterSanitize => "empty_after_sanitize",
        }
    }
}

/// Raw transaction reference, or `None` when it is missing.
///
/// When `tx_ref` repeats, the first value in parse order wins.
pub fn extract_reference(params: &QueryParams) -> Option<&str> {
    params.first(TX_REF_PARAM).filter(|raw| !raw.is_empty())
}

pub fn build_payload(params: &QueryParams) -> PayloadOutcome {
    let Some(raw) = extract_reference(params) else {
        return PayloadOutcome::MissingReference;
    };

    let clean = sanitize(raw);
    if clean.is_empty() {
        PayloadOutcome::EmptyAfterSanitize
    } else {
        PayloadOutcome::Success(format!("{VERIFY_PREFIX}{clean}"))
    }
}

/// Sanitized `payload` parameter, used only when no transaction reference
/// was supplied at all.
pub fn direct_payload(params: &QueryParams) -> Option<String> {
    params
        .first(PAYLOAD_PARAM)
        .map(sanitize)
        .filter(|clean| !clean.is_empty())
}

/// Cosmetic status, if the provider sent one.
pub fn payment_status(params: &QueryParams) -> Option<PaymentStatus> {
    params.first(STATUS_PARAM).map(PaymentStatus::parse)
}
