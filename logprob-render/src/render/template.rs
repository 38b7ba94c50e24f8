//! HTML fragments for the token view
//!
//! The style block is shared by every token element: each token is an
//! inline box with a hidden tooltip that fades in on hover.

use crate::color::Color;
use std::fmt::Write;

/// Leads the markup and separates tooltip entries
pub const LINE_BREAK: &str = "<br>";

pub const STYLE_BLOCK: &str = r#"
<style>
.token-container {
    display: inline-block;
    position: relative;
    margin-right: 2px;
    padding: 2px 4px;
    border-radius: 4px;
    box-shadow: 1px 1px 2px rgba(0, 0, 0, 0.1);
    text-align: center;
    vertical-align: middle;
    line-height: normal;
}

.token-container .token {
    display: inline-block;
    min-width: 1em;
}

.token-container .tooltiptext {
    visibility: hidden;
    opacity: 0;
    position: absolute;
    z-index: 1;
    bottom: 100%;
    left: 50%;
    transform: translateX(-50%);
    min-width: 120px;
    max-width: 600px;
    white-space: nowrap;
    overflow: hidden;
    padding: 5px 0;
    border-radius: 6px;
    background-color: black;
    color: #fff;
    text-align: center;
    transition: opacity 0.3s;
}

.token-container:hover .tooltiptext {
    visibility: visible;
    opacity: 1;
}
</style>
"#;

pub const HEADER_STYLE: &str = "font-family: Arial, sans-serif; font-size: 16px; margin-bottom: 20px;";

pub const CONTENT_STYLE: &str =
    "font-family: Arial, sans-serif; font-size: 14px; line-height: 1.6; color: #212121;";

/// Minimal HTML entity escaping for token text.
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Append the header paragraph shown above the tokens
pub fn push_header(out: &mut String, text: &str) {
    let _ = write!(out, "<p style=\"{HEADER_STYLE}\">{text}</p>");
}

pub fn open_content(out: &mut String) {
    let _ = write!(out, "<p style=\"{CONTENT_STYLE}\">");
}

pub fn close_content(out: &mut String) {
    out.push_str("</p>");
}

/// Append one token element: colored label plus hover tooltip
pub fn push_token(out: &mut String, label: &str, color: Color, tooltip: &str) {
    let _ = write!(
        out,
        "<span class=\"token-container\" style=\"background-color: {color};\">\
         <span class=\"token\">{label}</span>\
         <span class=\"tooltiptext\">{tooltip}</span>\
         </span>"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("a&b"), "a&amp;b");
        assert_eq!(html_escape("<b>\"x\"</b>"), "&lt;b&gt;&quot;x&quot;&lt;/b&gt;");
        assert_eq!(html_escape("it's"), "it&#39;s");
        assert_eq!(html_escape(" plain "), " plain ");
    }

    #[test]
    fn test_push_token() {
        let mut out = String::new();
        push_token(&mut out, "hi", Color::new(1.0, 1.0, 1.0), "hi: 0.0000 (1.0)");
        assert_eq!(
            out,
            "<span class=\"token-container\" style=\"background-color: #ffffff;\">\
             <span class=\"token\">hi</span>\
             <span class=\"tooltiptext\">hi: 0.0000 (1.0)</span></span>"
        );
    }

    #[test]
    fn test_content_paragraph() {
        let mut out = String::new();
        open_content(&mut out);
        close_content(&mut out);
        assert_eq!(out, format!("<p style=\"{CONTENT_STYLE}\"></p>"));
    }
}
