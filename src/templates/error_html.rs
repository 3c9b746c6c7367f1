use url::Url;

use super::page;
use crate::utils::escape::escape_html;

/// Why no deep link could be built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorReason {
    MissingReference,
    UnusableReference,
}

impl ErrorReason {
    fn message(self) -> &'static str {
        match self {
            ErrorReason::MissingReference => "Payment verification data is missing.",
            ErrorReason::UnusableReference => {
                "The payment reference we received could not be used for verification."
            }
        }
    }
}

/// Error page that still gives the user a way forward: a link to the bot profile.
pub fn render_error_page<'a>(
    bot_url: &Url,
    reason: ErrorReason,
    received_keys: impl IntoIterator<Item = &'a str>,
) -> String {
    let keys: Vec<String> = received_keys.into_iter().map(escape_html).collect();
    let received = if keys.is_empty() {
        "none".to_string()
    } else {
        keys.join(", ")
    };

    let mut body = String::with_capacity(512);
    body.push_str("<h1>Error</h1>\n");
    body.push_str(&format!("<p>{}</p>\n", reason.message()));
    body.push_str(&format!("<p><small>Received parameters: {received}</small></p>\n"));
    body.push_str("<p>Open the bot and use its menu to check your payment.</p>\n");
    body.push_str(&format!(
        "<p><a href=\"{}\" role=\"button\">Open Telegram</a></p>",
        escape_html(bot_url.as_str())
    ));

    page("Payment verification", "", &body)
}
