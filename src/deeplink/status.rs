use serde::Serialize;

/// Payment status reported by the provider's redirect. Display text only;
/// it never changes which deep link is produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "raw")]
pub enum PaymentStatus {
    Successful,
    Cancelled,
    Failed,
    Other(String),
}

impl PaymentStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "successful" | "success" | "completed" => PaymentStatus::Successful,
            "cancelled" | "canceled" => PaymentStatus::Cancelled,
            "failed" => PaymentStatus::Failed,
            _ => PaymentStatus::Other(raw.to_string()),
        }
    }

    /// Headline shown on the success page.
    pub fn headline(&self) -> &'static str {
        match self {
            PaymentStatus::Successful => "Payment received",
            PaymentStatus::Cancelled => "Payment cancelled",
            PaymentStatus::Failed => "Payment failed",
            PaymentStatus::Other(_) => "Payment processed",
        }
    }
}
