use regex::Regex;

/// Reduces a Teams HTML message body to plain text for display.
///
/// Tag removal, entity decoding, and whitespace collapse only. This is a
/// presentation helper for previews; hashing always uses the body exactly
/// as the API returned it.
pub fn strip_html(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }

    let tags = Regex::new(r"<[^>]+>").expect("invalid regex");
    let text = tags.replace_all(html, "");

    let text = text
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"");

    let whitespace = Regex::new(r"\s+").expect("invalid regex");
    whitespace.replace_all(&text, " ").trim().to_string()
}
