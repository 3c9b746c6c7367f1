use serde::Serialize;

use super::page;
use crate::deeplink::{PayloadOutcome, PaymentStatus, MAX_START_LEN};
use crate::utils::escape::{escape_html, push_escaped};

/// Everything the handler saw and computed for one request.
#[derive(Debug, Serialize)]
pub struct DebugReport<'a> {
    pub params: Vec<(&'a str, &'a str)>,
    pub raw_reference: Option<&'a str>,
    pub sanitized_reference: Option<String>,
    pub transaction_id: Option<&'a str>,
    pub status: Option<&'a PaymentStatus>,
    pub outcome: &'a PayloadOutcome,
    pub start: Option<&'a str>,
    pub start_too_long: bool,
    pub target: &'a str,
}

fn push_row(buf: &mut String, label: &str, value: Option<&str>) {
    buf.push_str("<tr><th scope=\"row\">");
    push_escaped(buf, label);
    buf.push_str("</th><td><code>");
    match value {
        Some(v) => push_escaped(buf, v),
        None => buf.push_str("&mdash;"),
    }
    buf.push_str("</code></td></tr>\n");
}

/// Diagnostics page. Does not redirect; the target is shown as a link.
pub fn render_debug_page(report: &DebugReport<'_>) -> String {
    let mut body = String::with_capacity(2048);
    body.push_str("<h1>Redirect debug</h1>\n");

    body.push_str("<h2>Received parameters</h2>\n<table>\n");
    if report.params.is_empty() {
        push_row(&mut body, "(none)", None);
    }
    for &(name, value) in &report.params {
        push_row(&mut body, name, Some(value));
    }
    body.push_str("</table>\n");

    body.push_str("<h2>Result</h2>\n<table>\n");
    push_row(&mut body, "tx_ref", report.raw_reference);
    push_row(&mut body, "sanitized", report.sanitized_reference.as_deref());
    push_row(&mut body, "transaction_id", report.transaction_id);
    push_row(&mut body, "outcome", Some(report.outcome.kind()));
    push_row(&mut body, "start", report.start);
    push_row(&mut body, "target", Some(report.target));
    body.push_str("</table>\n");

    if report.start_too_long {
        body.push_str(&format!(
            "<p><mark>The start value is longer than {MAX_START_LEN} characters; Telegram will not deliver it to the bot.</mark></p>\n"
        ));
    }

    body.push_str(&format!(
        "<p><a href=\"{}\" role=\"button\">Open target</a></p>\n",
        escape_html(report.target)
    ));

    let json = serde_json::to_string_pretty(report).unwrap_or_else(|e| format!("serialize error: {e}"));
    body.push_str("<details>\n<summary>JSON</summary>\n<pre>");
    push_escaped(&mut body, &json);
    body.push_str("</pre>\n</details>");

    page("Redirect debug", "", &body)
}
