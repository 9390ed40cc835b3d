//! Plain-text rendering of post HTML.
//!
//! Mastodon sends post content as a small HTML subset (`p`, `br`, `a`,
//! `span`). Tags are dropped, paragraph and line breaks become newlines, and
//! the handful of entities the server emits are decoded.

/// Convert post HTML to plain text.
pub fn html_to_text(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;

    loop {
        let Some(open) = rest.find('<') else {
            out.push_str(&decode_entities(rest));
            break;
        };
        out.push_str(&decode_entities(&rest[..open]));
        let Some(close) = rest[open..].find('>') else {
            break;
        };
        let tag = &rest[open + 1..open + close];
        out.push_str(break_for(tag));
        rest = &rest[open + close + 1..];
    }

    out.trim_end().to_string()
}

fn break_for(tag: &str) -> &'static str {
    let closing = tag.starts_with('/');
    let name = tag
        .trim_start_matches('/')
        .split(|c: char| c.is_whitespace() || c == '/')
        .next()
        .unwrap_or_default();

    if name.eq_ignore_ascii_case("br") {
        "\n"
    } else if closing && name.eq_ignore_ascii_case("p") {
        "\n\n"
    } else {
        ""
    }
}

fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}
