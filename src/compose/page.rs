//! Themed multi-page content request composition.
//!
//! Each page's request carries the value framework (tone guidance), the
//! visual brand constraint set, the page's role brief, and a compact list
//! of what earlier pages already said, so later pages stay consistent with
//! the committed sequence.

use crate::catalog::brand::{BRAND_GUIDELINES, VALUE_FRAMEWORK};
use crate::catalog::pages::{PageContent, PageType};
use crate::compose::InstructionPair;

fn page_system_instruction() -> String {
    format!(
        r#"あなたはFIREFITNESSというパーソナルトレーニングジムのSNSカルーセル投稿のコピーライターです。

{VALUE_FRAMEWORK}

{BRAND_GUIDELINES}

## 出力形式
次のキーを持つJSONオブジェクトを1つだけ出力してください。他のテキストは一切出力しない。
{{
  "headline": "ページの見出し（必須）",
  "sub_text": "補足テキスト",
  "accent_text": "強調ワード",
  "body_points": ["箇条書き1", "箇条書き2"],
  "cta_text": "行動喚起テキスト",
  "icon_suggestion": "check | arrow | number_badge | shape_accent | none",
  "layout_suggestion": "headline_center | split_top_bottom | list_points | photo_overlay | checklist | comparison | number_highlight | cta_banner"
}}"#
    )
}

/// Serializes committed pages as an ordered `page_type → headline` digest.
/// Page 1 first; later pages must not contradict earlier ones.
fn prior_pages_digest(prior_pages: &[PageContent]) -> String {
    if prior_pages.is_empty() {
        return "（まだありません）".to_string();
    }
    prior_pages
        .iter()
        .enumerate()
        .map(|(index, page)| {
            format!(
                "{}. [{}] {}",
                index + 1,
                page.page_type.key(),
                page.headline
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn compose_page_content_request(
    theme: &str,
    page_type: PageType,
    page_number: usize,
    total_pages: usize,
    prior_pages: &[PageContent],
) -> InstructionPair {
    let brief = page_type.role_brief();

    let mut user = String::new();
    user.push_str(&format!("【テーマ】{theme}\n"));
    user.push_str(&format!(
        "【ページ】{page_number}ページ目 / 全{total_pages}ページ\n"
    ));
    user.push_str(&format!(
        "【役割】{} — {brief}\n",
        page_type.key()
    ));
    user.push_str("\n【これまでのページ】\n");
    user.push_str(&prior_pages_digest(prior_pages));
    user.push_str("\n\n前のページと矛盾せず、重複しない内容にしてください。JSONオブジェクトのみを出力してください。\n");

    InstructionPair {
        system: page_system_instruction(),
        user,
    }
}
