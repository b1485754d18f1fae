//! Page roles, sequence presets and the static fallback content table for
//! the multi-page carousel pipeline.

use serde::Serialize;

use crate::error::{GenerationError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageType {
    Title,
    Problem,
    Cause,
    Solution,
    Detail,
    Evidence,
    Summary,
    Cta,
}

impl PageType {
    pub const ALL: [PageType; 8] = [
        PageType::Title,
        PageType::Problem,
        PageType::Cause,
        PageType::Solution,
        PageType::Detail,
        PageType::Evidence,
        PageType::Summary,
        PageType::Cta,
    ];

    pub fn key(self) -> &'static str {
        match self {
            PageType::Title => "title",
            PageType::Problem => "problem",
            PageType::Cause => "cause",
            PageType::Solution => "solution",
            PageType::Detail => "detail",
            PageType::Evidence => "evidence",
            PageType::Summary => "summary",
            PageType::Cta => "cta",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PageType::Title => "表紙",
            PageType::Problem => "問題提起",
            PageType::Cause => "原因",
            PageType::Solution => "解決策",
            PageType::Detail => "詳細",
            PageType::Evidence => "実績・証拠",
            PageType::Summary => "まとめ",
            PageType::Cta => "CTA",
        }
    }

    /// Parses a display label or canonical key. Unknown values are a
    /// configuration error; page dispatch never degrades silently.
    pub fn parse(value: &str) -> Result<PageType> {
        let trimmed = value.trim();
        PageType::ALL
            .iter()
            .copied()
            .find(|page| page.key() == trimmed || page.label() == trimmed)
            .ok_or_else(|| {
                GenerationError::Configuration(format!("unknown page type: '{trimmed}'"))
            })
    }

    /// One-line brief describing the page's role in the sequence, used as
    /// task framing for the text model.
    pub fn role_brief(self) -> &'static str {
        match self {
            PageType::Title => "表紙ページ：テーマを一言で伝え、続きを読みたくなる静かなフックを作る",
            PageType::Problem => "問題提起ページ：読み手が「自分のことだ」と感じる悩みを言語化する",
            PageType::Cause => "原因ページ：その悩みがなぜ起きるのかを3軸診断の視点で説明する",
            PageType::Solution => "解決策ページ：押し付けずに、具体的な解決アプローチを提示する",
            PageType::Detail => "詳細ページ：解決策の具体的な手順やポイントを噛み砕いて伝える",
            PageType::Evidence => "実績・証拠ページ：誇張せずに、信頼できる根拠や事例を示す",
            PageType::Summary => "まとめページ：ここまでの要点を短く整理して納得感を作る",
            PageType::Cta => "CTAページ：無料カウンセリングなど次の一歩を落ち着いたトーンで案内する",
        }
    }

    /// Recommended layout keys in preference order; the first entry is the
    /// fallback when the text model's own suggestion is unusable.
    pub fn recommended_layouts(self) -> &'static [&'static str] {
        match self {
            PageType::Title => &["headline_center", "photo_overlay"],
            PageType::Problem => &["split_top_bottom", "headline_center"],
            PageType::Cause => &["list_points", "split_top_bottom"],
            PageType::Solution => &["checklist", "list_points"],
            PageType::Detail => &["list_points", "split_top_bottom"],
            PageType::Evidence => &["number_highlight", "comparison"],
            PageType::Summary => &["checklist", "headline_center"],
            PageType::Cta => &["cta_banner", "photo_overlay"],
        }
    }
}

/// Parses a comma-separated page list (keys or display labels, e.g.
/// `title,problem,cta` or `表紙,問題提起,CTA`). Sequences must open with
/// the title page and close with the CTA page, matching the presets.
pub fn parse_page_list(value: &str) -> Result<Vec<PageType>> {
    let pages = value
        .split([',', '、'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(PageType::parse)
        .collect::<Result<Vec<_>>>()?;
    if pages.first() != Some(&PageType::Title) || pages.last() != Some(&PageType::Cta) {
        return Err(GenerationError::Configuration(
            "page sequence must start with 表紙 (title) and end with CTA".to_string(),
        ));
    }
    Ok(pages)
}

/// One committed page of a themed sequence. Never mutated after creation;
/// later pages read earlier entries as context only.
#[derive(Debug, Clone, PartialEq)]
pub struct PageContent {
    pub page_type: PageType,
    pub headline: String,
    pub sub_text: String,
    pub accent_text: String,
    pub body_points: Vec<String>,
    pub cta_text: String,
    pub icon_suggestion: String,
    pub layout_suggestion: String,
}

/// Static, on-brand content skeleton per page role. Keyed by role and not
/// by theme: when the text model is unreachable or unparseable the
/// sequence degrades to generic but safe copy instead of aborting.
pub fn fallback_content(page_type: PageType) -> PageContent {
    match page_type {
        PageType::Title => PageContent {
            page_type,
            headline: "なぜ、変わらないのか。".to_string(),
            sub_text: "3軸診断でわかる、あなたの理由".to_string(),
            accent_text: "姿勢 × 食事 × 継続".to_string(),
            body_points: vec![],
            cta_text: String::new(),
            icon_suggestion: "none".to_string(),
            layout_suggestion: "headline_center".to_string(),
        },
        PageType::Problem => PageContent {
            page_type,
            headline: "頑張っているのに、結果が出ない".to_string(),
            sub_text: "それは意志の弱さではありません".to_string(),
            accent_text: String::new(),
            body_points: vec![
                "食事を減らしてもすぐ戻る".to_string(),
                "運動が三日坊主で終わる".to_string(),
                "何から始めればいいかわからない".to_string(),
            ],
            cta_text: String::new(),
            icon_suggestion: "check".to_string(),
            layout_suggestion: "split_top_bottom".to_string(),
        },
        PageType::Cause => PageContent {
            page_type,
            headline: "原因は、ひとつではありません".to_string(),
            sub_text: "3つの軸が絡み合っています".to_string(),
            accent_text: "3軸診断".to_string(),
            body_points: vec![
                "姿勢：骨格のクセが消費を妨げる".to_string(),
                "食事：我慢型の食事は続かない".to_string(),
                "継続：仕組みがないと習慣化しない".to_string(),
            ],
            cta_text: String::new(),
            icon_suggestion: "number_badge".to_string(),
            layout_suggestion: "list_points".to_string(),
        },
        PageType::Solution => PageContent {
            page_type,
            headline: "まず、原因を特定することから".to_string(),
            sub_text: "診断に基づくオーダーメイドの改善".to_string(),
            accent_text: String::new(),
            body_points: vec![
                "姿勢チェックで体のクセを知る".to_string(),
                "続けられる食習慣を一緒に設計".to_string(),
                "無理のないペースで習慣化".to_string(),
            ],
            cta_text: String::new(),
            icon_suggestion: "check".to_string(),
            layout_suggestion: "checklist".to_string(),
        },
        PageType::Detail => PageContent {
            page_type,
            headline: "診断から始まる、3つのステップ".to_string(),
            sub_text: String::new(),
            accent_text: String::new(),
            body_points: vec![
                "STEP1：カウンセリングと姿勢チェック".to_string(),
                "STEP2：あなた専用のプラン設計".to_string(),
                "STEP3：週1回のセッションと日々のフォロー".to_string(),
            ],
            cta_text: String::new(),
            icon_suggestion: "number_badge".to_string(),
            layout_suggestion: "list_points".to_string(),
        },
        PageType::Evidence => PageContent {
            page_type,
            headline: "通う方の多くが、30〜50代".to_string(),
            sub_text: "運動が苦手な方こそ、続いています".to_string(),
            accent_text: String::new(),
            body_points: vec![
                "無理な食事制限なし".to_string(),
                "自分のペースで続けられる".to_string(),
            ],
            cta_text: String::new(),
            icon_suggestion: "shape_accent".to_string(),
            layout_suggestion: "number_highlight".to_string(),
        },
        PageType::Summary => PageContent {
            page_type,
            headline: "変わらない理由は、特定できる".to_string(),
            sub_text: "姿勢・食事・継続の3軸から".to_string(),
            accent_text: String::new(),
            body_points: vec![
                "原因がわかれば、対策は立てられる".to_string(),
                "意志力ではなく、仕組みで続ける".to_string(),
            ],
            cta_text: String::new(),
            icon_suggestion: "check".to_string(),
            layout_suggestion: "checklist".to_string(),
        },
        PageType::Cta => PageContent {
            page_type,
            headline: "まずは、無料カウンセリングへ".to_string(),
            sub_text: "あなたの「変わらない理由」を一緒に探します".to_string(),
            accent_text: "無料".to_string(),
            body_points: vec![],
            cta_text: "プロフィールのリンクからご予約ください".to_string(),
            icon_suggestion: "arrow".to_string(),
            layout_suggestion: "cta_banner".to_string(),
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencePreset {
    /// 8 pages: title through cta.
    Full,
    /// 5 pages: title, problem, solution, detail, cta.
    Standard,
    /// 4 pages: title, problem, solution, cta.
    Compact,
}

impl SequencePreset {
    pub fn parse(value: &str) -> Result<SequencePreset> {
        match value.trim().to_lowercase().as_str() {
            "full" => Ok(SequencePreset::Full),
            "standard" => Ok(SequencePreset::Standard),
            "compact" => Ok(SequencePreset::Compact),
            other => Err(GenerationError::Configuration(format!(
                "unknown sequence preset: '{other}'"
            ))),
        }
    }

    /// The page roles in order. Every preset opens with a title-class page
    /// and closes with the CTA page; presets only drop interior stages.
    pub fn page_types(self) -> &'static [PageType] {
        match self {
            SequencePreset::Full => &[
                PageType::Title,
                PageType::Problem,
                PageType::Cause,
                PageType::Solution,
                PageType::Detail,
                PageType::Evidence,
                PageType::Summary,
                PageType::Cta,
            ],
            SequencePreset::Standard => &[
                PageType::Title,
                PageType::Problem,
                PageType::Solution,
                PageType::Detail,
                PageType::Cta,
            ],
            SequencePreset::Compact => &[
                PageType::Title,
                PageType::Problem,
                PageType::Solution,
                PageType::Cta,
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_start_with_title_and_end_with_cta() {
        for preset in [
            SequencePreset::Full,
            SequencePreset::Standard,
            SequencePreset::Compact,
        ] {
            let pages = preset.page_types();
            assert_eq!(pages.first(), Some(&PageType::Title));
            assert_eq!(pages.last(), Some(&PageType::Cta));
        }
    }

    #[test]
    fn fallback_table_is_total_and_carries_headlines() {
        for page_type in PageType::ALL {
            let content = fallback_content(page_type);
            assert_eq!(content.page_type, page_type);
            assert!(!content.headline.is_empty());
            assert!(!content.layout_suggestion.is_empty());
        }
    }

    #[test]
    fn recommended_layouts_resolve_to_known_layout_keys() {
        use crate::catalog::options::LAYOUT_STYLES;
        for page_type in PageType::ALL {
            for key in page_type.recommended_layouts() {
                assert!(
                    LAYOUT_STYLES
                        .labels()
                        .any(|label| LAYOUT_STYLES.resolve(label).unwrap().key == *key),
                    "layout key '{key}' for {page_type:?} not in layout catalog"
                );
            }
        }
    }

    #[test]
    fn page_type_parse_accepts_keys_and_labels() {
        assert_eq!(PageType::parse("solution").unwrap(), PageType::Solution);
        assert_eq!(PageType::parse("表紙").unwrap(), PageType::Title);
    }

    #[test]
    fn page_type_parse_rejects_unknown_tags() {
        assert!(PageType::parse("teaser").is_err());
    }

    #[test]
    fn page_list_parses_keys_and_labels_mixed() {
        let pages = parse_page_list("title, 問題提起, solution, CTA").unwrap();
        assert_eq!(
            pages,
            vec![
                PageType::Title,
                PageType::Problem,
                PageType::Solution,
                PageType::Cta,
            ]
        );
    }

    #[test]
    fn page_list_requires_title_and_cta_bookends() {
        assert!(parse_page_list("problem,solution,cta").is_err());
        assert!(parse_page_list("title,problem,solution").is_err());
        assert!(parse_page_list("title").is_err());
        assert!(parse_page_list("").is_err());
    }

    #[test]
    fn page_list_rejects_unknown_entries() {
        assert!(matches!(
            parse_page_list("title,teaser,cta"),
            Err(GenerationError::Configuration(_))
        ));
    }
}
