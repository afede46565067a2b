//! Static, self-contained HTML dashboards.
//!
//! Rendering is a pure function from a table to a document: the records are
//! embedded as a JSON array, first-paint aggregates and filter options are
//! computed here, and the template's client script takes over filtering,
//! charting and table interaction in the browser.

pub mod leads;
pub mod retail;

use serde_json::Value;

use crate::error::{BizsimResult, IoError, RenderError};

pub use leads::{LeadDashboard, LeadKpis};
pub use retail::{RetailDashboard, RetailKpis};

/// Indentation of `<option>` lines inside the templates' `<select>` blocks.
const OPTION_INDENT: &str = "\n                    ";

/// An HTML document with `__NAME__` placeholders.
#[derive(Debug, Clone, Copy)]
pub struct Template {
    name: &'static str,
    text: &'static str,
}

impl Template {
    pub const fn new(name: &'static str, text: &'static str) -> Self {
        Self { name, text }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Substitutes every `(placeholder, value)` pair in a single pass.
    ///
    /// Inserted values are never rescanned, so record data that happens to
    /// contain a placeholder name is emitted verbatim. Every placeholder must
    /// occur in the template.
    pub fn render(&self, values: &[(&'static str, String)]) -> BizsimResult<String> {
        if let Some((missing, _)) = values.iter().find(|(key, _)| !self.text.contains(key)) {
            return Err(RenderError::MissingPlaceholder(missing).into());
        }

        let extra: usize = values.iter().map(|(_, v)| v.len()).sum();
        let mut out = String::with_capacity(self.text.len() + extra);
        let mut rest = self.text;

        while let Some((pos, key, value)) = values
            .iter()
            .filter_map(|(key, value)| rest.find(key).map(|pos| (pos, *key, value)))
            .min_by_key(|(pos, _, _)| *pos)
        {
            out.push_str(&rest[..pos]);
            out.push_str(value);
            rest = &rest[pos + key.len()..];
        }
        out.push_str(rest);

        Ok(out)
    }
}

/// Escapes text for use in HTML element content and quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Serializes `value` for embedding inside a `<script>` element.
///
/// `</` is written as `<\/` so no string in the data can close the element.
pub fn embed_json(value: &Value) -> BizsimResult<String> {
    let json = serde_json::to_string(value).map_err(IoError::Json)?;
    Ok(json.replace("</", "<\\/"))
}

/// `<option>` list with escaped values and labels.
pub fn options_html<'a>(options: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    options
        .into_iter()
        .map(|(value, label)| {
            format!(
                "<option value=\"{}\">{}</option>",
                escape_html(value),
                escape_html(label)
            )
        })
        .collect::<Vec<_>>()
        .join(OPTION_INDENT)
}

/// `"<first> to <last>"`, or `"No data"` for an empty table.
pub fn data_period(range: Option<(String, String)>) -> String {
    match range {
        Some((first, last)) => format!("{first} to {last}"),
        None => "No data".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn render_substitutes_once_and_does_not_rescan() {
        let template = Template::new("t", "<p>__A__</p><i>__B__</i><b>__A__</b>");
        let html = template
            .render(&[("__A__", "__B__".to_string()), ("__B__", "x".to_string())])
            .unwrap();
        assert_eq!(html, "<p>__B__</p><i>x</i><b>__B__</b>");
    }

    #[test]
    fn render_rejects_unknown_placeholder() {
        let template = Template::new("t", "<p>__A__</p>");
        let err = template.render(&[("__C__", String::new())]).unwrap_err();
        assert!(err.to_string().contains("__C__"));
    }

    #[test]
    fn html_escaping() {
        assert_eq!(
            escape_html(r#"Tom & "Jerry" <b>'s"#),
            "Tom &amp; &quot;Jerry&quot; &lt;b&gt;&#39;s"
        );
    }

    #[test]
    fn embedded_json_cannot_close_script() {
        let payload = embed_json(&json!([{ "name": "</script><script>alert(1)" }])).unwrap();
        assert!(!payload.contains("</script>"));
        assert!(payload.contains(r"<\/script>"));
    }

    #[test]
    fn option_lists_escape_values() {
        let html = options_html([("Home & Kitchen", "Home & Kitchen"), ("a", "A")]);
        assert_eq!(
            html,
            "<option value=\"Home &amp; Kitchen\">Home &amp; Kitchen</option>\n                    <option value=\"a\">A</option>"
        );
    }

    #[test]
    fn period_string() {
        assert_eq!(
            data_period(Some(("2024-07-04".into(), "2024-12-31".into()))),
            "2024-07-04 to 2024-12-31"
        );
        assert_eq!(data_period(None), "No data");
    }
}
