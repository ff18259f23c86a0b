//! Download of the active document.
//!
//! Export re-indents the imported text itself rather than re-serializing the parsed
//! document. Key order, unknown fields, numeric spelling (`1e2`, `20.50`) and string
//! escapes (`é`, `\/`) all come back exactly as they were pasted; only the
//! whitespace between tokens is normalized. A document that was already in the
//! two-space layout exports byte-for-byte.

use serde_json::Value;

use crate::validate::ValidatedSchema;

pub const EXPORT_FILENAME: &str = "narrative_schema_v2.json";

const INDENT: &str = "  ";

/// Pretty-printed (two-space indent) document, in the layout `serde_json` uses for
/// its pretty printer.
pub fn export_pretty(validated: &ValidatedSchema) -> String {
    reindent(validated.source())
}

/// `Content-Disposition` value for the download.
pub fn content_disposition() -> String {
    format!("attachment; filename=\"{EXPORT_FILENAME}\"")
}

/// Compact form, for embedding.
pub fn export_value(validated: &ValidatedSchema) -> &Value {
    validated.raw()
}

/// Token-preserving pretty printer. Input must already be valid JSON.
fn reindent(src: &str) -> String {
    let mut out = String::with_capacity(src.len() + src.len() / 4);
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    let mut chars = src.chars().peekable();

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '{' | '[' => {
                while chars.peek().is_some_and(|n| n.is_ascii_whitespace()) {
                    chars.next();
                }
                let close = if c == '{' { '}' } else { ']' };
                out.push(c);
                if chars.peek() == Some(&close) {
                    chars.next();
                    out.push(close);
                } else {
                    depth += 1;
                    newline(&mut out, depth);
                }
            }
            '}' | ']' => {
                depth = depth.saturating_sub(1);
                newline(&mut out, depth);
                out.push(c);
            }
            ',' => {
                out.push(c);
                newline(&mut out, depth);
            }
            ':' => out.push_str(": "),
            w if w.is_ascii_whitespace() => {}
            other => out.push(other),
        }
    }
    out
}

fn newline(out: &mut String, depth: usize) {
    out.push('\n');
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::{default_schema, DEFAULT_SCHEMA_JSON};
    use crate::validate::validate;

    #[test]
    fn demo_export_is_byte_identical() {
        let v = default_schema().unwrap();
        assert_eq!(export_pretty(&v), DEFAULT_SCHEMA_JSON.trim_end());
    }

    #[test]
    fn keeps_key_order_precision_and_unknown_fields() {
        let raw = r#"{"sentiment_overall":{"neutral":20.50,"positive":1e2,"negative":0.1000000000000000055511151231257827},"zExtra":true,"themes":[{"percentage":33.333333333333333333,"name":"Z"}]}"#;
        let v = validate(raw).unwrap();
        let out = export_pretty(&v);
        assert!(out.find("sentiment_overall").unwrap() < out.find("zExtra").unwrap());
        assert!(out.find("zExtra").unwrap() < out.find("themes").unwrap());
        assert!(out.contains("20.50"));
        assert!(out.contains("1e2"));
        assert!(out.contains("0.1000000000000000055511151231257827"));
        assert!(out.contains("33.333333333333333333"));

        // second round trip is stable
        let again = validate(&out).unwrap();
        assert_eq!(export_pretty(&again), out);
        assert_eq!(export_value(&again), export_value(&v));
    }

    #[test]
    fn exponent_and_escape_spellings_survive() {
        let raw = r#"{"meta":{"topic":"café \/ x","note":"a \"quoted\" {, [ ] : \\"},"sentiment_overall":{"positive":1e2,"negative":1E+2,"neutral":-0.0},"themes":[]}"#;
        let out = export_pretty(&validate(raw).unwrap());
        assert!(out.contains(r#""topic": "café \/ x""#), "{out}");
        assert!(out.contains(r#""note": "a \"quoted\" {, [ ] : \\""#), "{out}");
        assert!(out.contains(r#""positive": 1e2"#), "{out}");
        assert!(out.contains(r#""negative": 1E+2"#), "{out}");
        assert!(out.contains(r#""neutral": -0.0"#), "{out}");
        assert!(out.ends_with("\"themes\": []\n}"), "{out}");
    }

    #[test]
    fn pretty_input_exports_unchanged() {
        let raw = "{\n  \"themes\": [\n    {\n      \"name\": \"A\",\n      \"keyPhrases\": [],\n      \"extra\": {}\n    }\n  ],\n  \"sentiment_overall\": {\n    \"positive\": 1.50e1\n  }\n}";
        assert_eq!(export_pretty(&validate(raw).unwrap()), raw);
    }

    #[test]
    fn layout_matches_serde_pretty_for_plain_documents() {
        let raw = r#" { "themes" : [ { "name":"A" , "count":3 } , [ ] , { } ] ,
            "sentiment_overall":{"positive":10,"negative":5,"neutral":85} } "#;
        let v = validate(raw).unwrap();
        assert_eq!(export_pretty(&v), serde_json::to_string_pretty(v.raw()).unwrap());
    }

    #[test]
    fn disposition_names_the_file() {
        assert_eq!(
            content_disposition(),
            "attachment; filename=\"narrative_schema_v2.json\""
        );
    }
}
