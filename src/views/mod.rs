//! Server-rendered HTML.
//!
//! Pages are plain `format!` templates around a shared [`layout`]. Every
//! value that reaches the markup goes through [`escape`]; every value that
//! reaches a URL goes through [`encode`].
//!
//! - [`pages`]       — group list, group forms, copy/rename, error page
//! - [`member_form`] — the field table behind the add/edit member forms

pub mod member_form;
pub mod pages;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Deserialize;

/// Characters left unescaped in URL path segments and query values.
const URL_SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// HTML-escape text for element content and double-quoted attributes.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
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

/// Percent-encode a path segment or query value.
pub fn encode(raw: &str) -> String {
    utf8_percent_encode(raw, URL_SAFE).to_string()
}

// ── Flash messages ────────────────────────────────────────────────────────────

/// Severity of a flash banner. Maps to the banner's CSS class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Danger,
}

impl Level {
    fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Danger => "danger",
        }
    }
}

/// A one-shot message shown at the top of the next page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub level: Level,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: Level::Success,
            message: message.into(),
        }
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self {
            level: Level::Danger,
            message: message.into(),
        }
    }

    /// `path` with this flash appended as `flash` / `level` query parameters.
    pub fn location(&self, path: &str) -> String {
        let sep = if path.contains('?') { '&' } else { '?' };
        format!(
            "{path}{sep}flash={}&level={}",
            encode(&self.message),
            self.level.as_str()
        )
    }

    fn render(&self) -> String {
        format!(
            r#"<div class="flash {}">{}</div>"#,
            self.level.as_str(),
            escape(&self.message)
        )
    }
}

/// Query parameters every page accepts.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub flash: Option<String>,
    pub level: Option<Level>,
    /// Member uuid to prefill the new-member form from.
    pub duplicate: Option<String>,
}

impl PageQuery {
    pub fn flash(&self) -> Option<Flash> {
        self.flash.as_ref().map(|message| Flash {
            level: self.level.unwrap_or(Level::Success),
            message: message.clone(),
        })
    }
}

// ── Layout ────────────────────────────────────────────────────────────────────

const STYLE: &str = r#"
    body { font-family: Arial, sans-serif; max-width: 1100px; margin: 24px auto; padding: 0 12px; }
    h1 { margin-bottom: 8px; }
    nav a { margin-right: 12px; }
    .card { border: 1px solid #ddd; border-radius: 8px; padding: 14px; margin: 14px 0; }
    .flash { padding: 10px 14px; border-radius: 6px; margin: 12px 0; }
    .flash.success { background: #e3f6e5; border: 1px solid #8fd19e; }
    .flash.danger { background: #fbe3e4; border: 1px solid #f1a1a8; }
    label { display: block; margin: 8px 0 4px; font-weight: 600; }
    input, select { padding: 6px; box-sizing: border-box; }
    input[type=text], input[type=number], input[type=url] { width: 100%; }
    fieldset { border: 1px solid #ddd; border-radius: 6px; margin: 12px 0; }
    .grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(180px, 1fr)); gap: 0 14px; }
    table { border-collapse: collapse; width: 100%; }
    th, td { border-bottom: 1px solid #eee; padding: 6px 8px; text-align: left; }
    form.inline { display: inline; }
    button { padding: 6px 12px; }
    button.danger { color: #a00; }
"#;

/// Wrap `body` in the shared page chrome.
pub fn layout(title: &str, flash: Option<&Flash>, body: &str) -> String {
    let banner = flash.map(Flash::render).unwrap_or_default();
    format!(
        r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width,initial-scale=1" />
  <title>{title} · Group Editor</title>
  <style>{STYLE}</style>
</head>
<body>
  <nav><a href="/">Groups</a><a href="/new">New group</a></nav>
  <h1>{title}</h1>
  {banner}
{body}
</body>
</html>
"#,
        title = escape(title),
    )
}
