use url::Url;

use super::page;
use crate::deeplink::PaymentStatus;
use crate::utils::escape::escape_html;

/// Body sent along with a 302, for clients that do not follow `Location`.
pub fn render_redirect_fallback(target: &Url) -> String {
    let href = escape_html(target.as_str());
    let head = format!("<meta http-equiv=\"refresh\" content=\"0;url={href}\">\n");
    let body = format!(
        "<h2>Redirecting to Telegram...</h2>\n\
         <p>If you are not redirected automatically, <a href=\"{href}\">click here</a>.</p>"
    );
    page("Redirecting to Telegram", &head, &body)
}

/// Landing page that reports the payment status and opens the bot after
/// `delay_secs`. The countdown is cosmetic; the meta refresh does the redirect.
pub fn render_success_page(target: &Url, status: Option<&PaymentStatus>, delay_secs: u8) -> String {
    let href = escape_html(target.as_str());
    let headline = status.map(PaymentStatus::headline).unwrap_or("Almost done");
    let head = format!("<meta http-equiv=\"refresh\" content=\"{delay_secs};url={href}\">\n");

    let mut body = String::with_capacity(1024);
    body.push_str(&format!("<hgroup>\n<h1>{}</h1>\n", escape_html(headline)));
    body.push_str("<p>Return to the bot to finish verifying your payment.</p>\n</hgroup>\n");
    body.push_str(&format!(
        "<p>Opening Telegram in <strong id=\"countdown\">{delay_secs}</strong> seconds...</p>\n"
    ));
    body.push_str(&format!(
        "<p><a href=\"{href}\" role=\"button\">Open Telegram now</a></p>\n"
    ));
    body.push_str(&format!(
        "<script>\n\
         (function () {{\n\
           var left = {delay_secs};\n\
           var el = document.getElementById(\"countdown\");\n\
           var timer = setInterval(function () {{\n\
             left -= 1;\n\
             if (left <= 0) {{ clearInterval(timer); left = 0; }}\n\
             el.textContent = left;\n\
           }}, 1000);\n\
         }})();\n\
         </script>"
    ));

    page(headline, &head, &body)
}
