pub mod debug_html;
pub mod error_html;
pub mod redirect_html;

use crate::utils::escape::escape_html;

/// Wraps `body` in the shared document shell. `head` is inserted verbatim
/// and must already be escaped.
fn page(title: &str, head: &str, body: &str) -> String {
    let mut html = String::with_capacity(1024 + head.len() + body.len());
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\" data-theme=\"light\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str("<meta name=\"robots\" content=\"noindex\">\n");
    html.push_str(head);
    html.push_str(&format!("<title>{}</title>\n", escape_html(title)));
    html.push_str(
        "<link rel=\"stylesheet\" href=\"https://cdn.jsdelivr.net/npm/@picocss/pico@2/css/pico.min.css\">\n",
    );
    html.push_str("</head>\n<body>\n<main class=\"container\">\n");
    html.push_str(body);
    html.push_str("\n</main>\n</body>\n</html>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_escapes_title_but_not_body() {
        let html = page("a<b", "", "<p>ok</p>");
        assert!(html.contains("<title>a&lt;b</title>"));
        assert!(html.contains("<p>ok</p>"));
        assert!(html.starts_with("<!DOCTYPE html>"));
    }
}
