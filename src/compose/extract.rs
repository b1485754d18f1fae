//! Best-effort structured extraction from free-form model output.
//!
//! The text model is instructed to return a single JSON object, but real
//! responses wrap it in prose or code fences often enough that the parser
//! locates the first balanced brace-delimited span instead of trusting the
//! whole body. Failure here is an explicit [`GenerationError::ResponseParse`],
//! always paired with the static fallback table at the call site.

use serde::Deserialize;

use crate::catalog::pages::{PageContent, PageType};
use crate::error::{GenerationError, Result};

#[derive(Debug, Deserialize)]
struct PageContentDraft {
    headline: Option<String>,
    #[serde(default)]
    sub_text: String,
    #[serde(default)]
    accent_text: String,
    #[serde(default)]
    body_points: Vec<String>,
    #[serde(default)]
    cta_text: String,
    #[serde(default)]
    icon_suggestion: String,
    #[serde(default)]
    layout_suggestion: String,
}

/// Returns the first balanced `{...}` span, ignoring braces inside JSON
/// string literals.
pub fn first_balanced_brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Parses one page's structured content out of raw model output. The only
/// required field is `headline`; everything else defaults to empty.
pub fn parse_page_content(raw: &str, page_type: PageType) -> Result<PageContent> {
    let span = first_balanced_brace_span(raw).ok_or_else(|| {
        GenerationError::ResponseParse("no brace-delimited object in response".to_string())
    })?;

    let draft: PageContentDraft = serde_json::from_str(span)
        .map_err(|err| GenerationError::ResponseParse(err.to_string()))?;

    let headline = draft
        .headline
        .filter(|headline| !headline.trim().is_empty())
        .ok_or_else(|| {
            GenerationError::ResponseParse("response object has no headline".to_string())
        })?;

    Ok(PageContent {
        page_type,
        headline,
        sub_text: draft.sub_text,
        accent_text: draft.accent_text,
        body_points: draft.body_points,
        cta_text: draft.cta_text,
        icon_suggestion: draft.icon_suggestion,
        layout_suggestion: draft.layout_suggestion,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_object_embedded_in_prose() {
        let raw = "はい、こちらが生成結果です。\n```json\n{\"headline\": \"見出し\", \"sub_text\": \"補足\"}\n```\nご確認ください。";
        let content = parse_page_content(raw, PageType::Problem).unwrap();
        assert_eq!(content.headline, "見出し");
        assert_eq!(content.sub_text, "補足");
        assert_eq!(content.page_type, PageType::Problem);
    }

    #[test]
    fn braces_inside_strings_do_not_break_balancing() {
        let raw = r#"{"headline": "記号 } を含む", "cta_text": "{予約}"}"#;
        let content = parse_page_content(raw, PageType::Cta).unwrap();
        assert_eq!(content.headline, "記号 } を含む");
        assert_eq!(content.cta_text, "{予約}");
    }

    #[test]
    fn nested_objects_resolve_to_the_outer_span() {
        let raw = r#"prefix {"headline": "h", "meta": {"x": 1}} suffix"#;
        let span = first_balanced_brace_span(raw).unwrap();
        assert_eq!(span, r#"{"headline": "h", "meta": {"x": 1}}"#);
    }

    #[test]
    fn missing_headline_is_a_parse_error() {
        let raw = r#"{"sub_text": "only subtext"}"#;
        assert!(matches!(
            parse_page_content(raw, PageType::Detail),
            Err(GenerationError::ResponseParse(_))
        ));
    }

    #[test]
    fn prose_without_object_is_a_parse_error() {
        assert!(parse_page_content("ただのテキストです", PageType::Title).is_err());
    }

    #[test]
    fn body_points_are_preserved_in_order() {
        let raw = r#"{"headline": "h", "body_points": ["一", "二", "三"]}"#;
        let content = parse_page_content(raw, PageType::Solution).unwrap();
        assert_eq!(content.body_points, vec!["一", "二", "三"]);
    }
}
