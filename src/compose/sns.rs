//! SNS post-image prompt composition.
//!
//! Unlike the photo contract, this one encodes exact layout and typography
//! intent: the image model is asked to render literal text, so headline,
//! sub text and accent text are embedded verbatim and quoted. Any
//! paraphrase here is a correctness bug.

use crate::catalog::brand::{ensure_nationality_clause, BRAND_GUIDELINES, VALUE_FRAMEWORK};
use crate::catalog::options::{
    BackgroundKind, BackgroundStyle, BorderStyle, BrandColor, FontStyle, IconType, LayoutStyle,
    PostType, SnsPlatform, TextPosition, TextSize, BACKGROUND_STYLES, BORDER_STYLES, BRAND_COLORS,
    FONT_STYLES, ICON_TYPES, LAYOUT_STYLES, POST_TYPES, SNS_PLATFORMS, TEXT_POSITIONS, TEXT_SIZES,
};
use crate::compose::{resolve_mood, InstructionPair};
use crate::error::{GenerationError, Result};

#[derive(Debug, Clone, Default)]
pub struct LogoSpec {
    pub include: bool,
    pub position: Option<String>,
    pub size: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TrainerPhotoSpec {
    pub include: bool,
    pub style: String,
}

#[derive(Debug, Clone)]
pub struct IconSpec {
    pub include: bool,
    pub icon_type: String,
}

/// Single SNS-image request. Every color resolves through the brand color
/// catalog and every size/position through its own catalog; raw free-form
/// styling values never reach the composer.
#[derive(Debug, Clone, Default)]
pub struct SnsRequest {
    pub platform: String,
    pub post_type: String,
    pub layout_style: String,
    pub background_style: String,
    /// Literal slider value 0..=100; `None` falls back to the style's
    /// catalog default.
    pub opacity: Option<u8>,
    pub headline: String,
    pub headline_color: String,
    pub headline_size: String,
    pub headline_position: String,
    pub sub_text: Option<String>,
    pub sub_text_color: Option<String>,
    pub accent_text: Option<String>,
    pub accent_color: Option<String>,
    pub logo: LogoSpec,
    pub trainer_photo: Option<TrainerPhotoSpec>,
    pub icons: Option<IconSpec>,
    pub font_style: String,
    pub border_style: String,
    pub decoration: String,
    pub mood: String,
    /// Free descriptor for overall color saturation (e.g. 控えめ);
    /// empty means the brand's default subdued intensity.
    pub color_intensity: String,
    pub body_points: Vec<String>,
    pub cta_text: Option<String>,
}

fn resolve_by_label_or_key<'a, V, F>(
    catalog: &'a crate::catalog::Catalog<V>,
    value: &str,
    key_of: F,
) -> Option<&'a V>
where
    V: 'static,
    F: Fn(&V) -> &str,
{
    catalog.resolve(value).or_else(|| {
        catalog
            .labels()
            .filter_map(|label| catalog.resolve(label))
            .find(|entry| key_of(entry) == value)
    })
}

fn require_color(field: &str, value: &str) -> Result<&'static BrandColor> {
    resolve_by_label_or_key(&BRAND_COLORS, value, |color: &BrandColor| color.key).ok_or_else(
        || GenerationError::Configuration(format!("unknown brand color for {field}: '{value}'")),
    )
}

fn require_size(value: &str) -> Result<&'static TextSize> {
    resolve_by_label_or_key(&TEXT_SIZES, value, |size: &TextSize| size.key).ok_or_else(|| {
        GenerationError::Configuration(format!("unknown text size: '{value}'"))
    })
}

fn require_position(value: &str) -> Result<&'static TextPosition> {
    resolve_by_label_or_key(&TEXT_POSITIONS, value, |position: &TextPosition| position.key)
        .ok_or_else(|| {
            GenerationError::Configuration(format!("unknown text position: '{value}'"))
        })
}

pub(crate) fn resolve_layout(value: &str) -> Option<&'static LayoutStyle> {
    resolve_by_label_or_key(&LAYOUT_STYLES, value, |layout: &LayoutStyle| layout.key)
}

fn resolve_background(value: &str) -> &'static BackgroundStyle {
    resolve_by_label_or_key(&BACKGROUND_STYLES, value, |style: &BackgroundStyle| style.key)
        .unwrap_or_else(|| BACKGROUND_STYLES.resolve_or_default(value))
}

fn resolve_platform(value: &str) -> &'static SnsPlatform {
    resolve_by_label_or_key(&SNS_PLATFORMS, value, |platform: &SnsPlatform| platform.key)
        .unwrap_or_else(|| SNS_PLATFORMS.resolve_or_default(value))
}

fn resolve_post_type(value: &str) -> &'static PostType {
    resolve_by_label_or_key(&POST_TYPES, value, |post: &PostType| post.key)
        .unwrap_or_else(|| POST_TYPES.resolve_or_default(value))
}

fn resolve_font(value: &str) -> &'static FontStyle {
    resolve_by_label_or_key(&FONT_STYLES, value, |font: &FontStyle| font.key)
        .unwrap_or_else(|| FONT_STYLES.resolve_or_default(value))
}

fn resolve_border(value: &str) -> &'static BorderStyle {
    resolve_by_label_or_key(&BORDER_STYLES, value, |border: &BorderStyle| border.key)
        .unwrap_or_else(|| BORDER_STYLES.resolve_or_default(value))
}

fn resolve_icon(value: &str) -> &'static IconType {
    resolve_by_label_or_key(&ICON_TYPES, value, |icon: &IconType| icon.key)
        .unwrap_or_else(|| ICON_TYPES.resolve_or_default(value))
}

/// Default rendering aspect ratio per SNS platform.
pub fn aspect_ratio_for_platform(platform: &str) -> &'static str {
    match resolve_platform(platform).key {
        "instagram_story" => "9:16",
        "x_post" => "16:9",
        _ => "1:1",
    }
}

/// Rendered overlay darkness for photo backgrounds: `100 − opacity`, where
/// opacity is the literal slider value (the catalog default only fills in
/// when the slider was untouched).
pub fn overlay_darkness(style: &BackgroundStyle, opacity: Option<u8>) -> u8 {
    let opacity = opacity.unwrap_or(style.default_opacity).min(100);
    100 - opacity
}

fn sns_system_instruction() -> String {
    format!(
        r#"あなたはSNS投稿画像を生成するAIのためのプロンプトを作成する専門家です。
FIREFITNESSというパーソナルトレーニングジムのSNS画像デザイン指示を英語プロンプトに変換します。

{BRAND_GUIDELINES}

{VALUE_FRAMEWORK}

## あなたのタスク
1. 指定されたレイアウト・タイポグラフィ指示を正確に英語プロンプトへ変換する
2. 引用符で囲まれた日本語テキストは、一字一句そのまま画像内に描画する指示として保持する（翻訳・言い換え禁止）
3. NGワードは絶対に使わない
4. ブランドカラー以外の色を導入しない
5. 英語のプロンプトのみを出力する。説明や注釈は不要"#
    )
}

pub fn compose_sns_prompt(request: &SnsRequest) -> Result<InstructionPair> {
    if request.headline.is_empty() {
        return Err(GenerationError::Configuration(
            "headline is required".to_string(),
        ));
    }

    let platform = resolve_platform(&request.platform);
    let post_type = resolve_post_type(&request.post_type);
    let layout = resolve_layout(&request.layout_style)
        .unwrap_or_else(|| LAYOUT_STYLES.resolve_or_default(&request.layout_style));
    let background = resolve_background(&request.background_style);
    let headline_color = require_color("headline", &request.headline_color)?;
    let headline_size = require_size(&request.headline_size)?;
    let headline_position = require_position(&request.headline_position)?;
    let font = resolve_font(&request.font_style);
    let border = resolve_border(&request.border_style);
    let mood = resolve_mood(&request.mood);

    // Logo placement is a first-class toggle: when included, both position
    // and size must resolve, checked before any external call.
    let logo_placement = if request.logo.include {
        let position = request.logo.position.as_deref().unwrap_or("");
        let size = request.logo.size.as_deref().unwrap_or("");
        if position.trim().is_empty() || size.trim().is_empty() {
            return Err(GenerationError::Configuration(
                "logo position and size are required when the logo is included".to_string(),
            ));
        }
        Some((require_position(position)?, require_size(size)?))
    } else {
        None
    };

    let mut user = String::new();
    user.push_str(&ensure_nationality_clause(""));
    user.push_str("\n\n以下の仕様でSNS画像生成プロンプトを作成してください：\n\n");
    user.push_str(&format!(
        "【プラットフォーム】{} ({})\n【投稿タイプ】{} ({})\n",
        platform.key, platform.note, post_type.key, post_type.description
    ));
    user.push_str(&format!(
        "【レイアウト】{} — {}\n",
        layout.key, layout.description
    ));

    match background.kind {
        BackgroundKind::Solid => {
            user.push_str(&format!(
                "【背景】solid color {}\n",
                background.colors.join(", ")
            ));
        }
        BackgroundKind::Gradient => {
            user.push_str(&format!(
                "【背景】gradient of {}\n",
                background.colors.join(" → ")
            ));
        }
        BackgroundKind::Photo => {
            let darkness = overlay_darkness(background, request.opacity);
            user.push_str(&format!(
                "【背景】store photo with a dark overlay at {darkness}% darkness (photo visible at {}% opacity)\n",
                100 - darkness
            ));
        }
    }

    user.push_str(&format!(
        "\n【メインテキスト】\"{}\"\n- 色: {} ({})\n- サイズ: {} ({})\n- 位置: {} ({})\n",
        request.headline,
        headline_color.key,
        headline_color.hex,
        headline_size.key,
        headline_size.description,
        headline_position.key,
        headline_position.description
    ));

    if let Some(sub_text) = request.sub_text.as_deref().filter(|t| !t.is_empty()) {
        let sub_color = match request.sub_text_color.as_deref() {
            Some(value) if !value.trim().is_empty() => require_color("sub text", value)?,
            _ => BRAND_COLORS.resolve_or_default(""),
        };
        user.push_str(&format!(
            "【サブテキスト】\"{}\"\n- 色: {} ({})\n",
            sub_text, sub_color.key, sub_color.hex
        ));
    }

    if let Some(accent_text) = request.accent_text.as_deref().filter(|t| !t.is_empty()) {
        let accent_color = match request.accent_color.as_deref() {
            Some(value) if !value.trim().is_empty() => require_color("accent", value)?,
            _ => require_color("accent", "オレンジ")?,
        };
        user.push_str(&format!(
            "【アクセントテキスト】\"{}\"\n- 色: {} ({})\n",
            accent_text, accent_color.key, accent_color.hex
        ));
    }

    if !request.body_points.is_empty() {
        user.push_str("【箇条書き】\n");
        for point in &request.body_points {
            user.push_str(&format!("- \"{point}\"\n"));
        }
    }

    if let Some(cta_text) = request.cta_text.as_deref().filter(|t| !t.is_empty()) {
        user.push_str(&format!("【CTAテキスト】\"{cta_text}\"\n"));
    }

    if let Some((position, size)) = logo_placement {
        user.push_str(&format!(
            "\n【ロゴ】FIREFITNESSロゴを配置\n- 位置: {} ({})\n- サイズ: {} ({})\n",
            position.key, position.description, size.key, size.description
        ));
    }

    if let Some(trainer_photo) = request.trainer_photo.as_ref().filter(|spec| spec.include) {
        user.push_str(&format!(
            "\n【トレーナー写真】参照画像のトレーナーを使用（スタイル: {}）。{}\n",
            trainer_photo.style,
            crate::compose::photo::TRAINER_IDENTITY_FRAGMENT
        ));
    }

    if let Some(icons) = request.icons.as_ref().filter(|spec| spec.include) {
        let icon = resolve_icon(&icons.icon_type);
        user.push_str(&format!(
            "【アイコン】{} — {}\n",
            icon.key, icon.description
        ));
    }

    user.push_str(&format!(
        "\n【フォント】{} — {}\n【枠線】{} — {}\n",
        font.key, font.description, border.key, border.description
    ));
    if !request.decoration.trim().is_empty() {
        user.push_str(&format!("【装飾】{}\n", request.decoration.trim()));
    }
    if !request.color_intensity.trim().is_empty() {
        user.push_str(&format!("【色の強さ】{}\n", request.color_intensity.trim()));
    }
    user.push_str(&format!("【雰囲気】{} — {}\n", mood.key, mood.modifier));

    user.push_str(
        "\n【重要】引用符内のテキストは一字一句そのまま画像に描画すること。翻訳・省略・言い換えは禁止。\n",
    );

    Ok(InstructionPair {
        system: sns_system_instruction(),
        user,
    })
}

/// Deterministic image prompt built directly from the request, used by the
/// multi-page sequencer when the prompt-optimization call cannot be made.
/// Single-image modes never use this; they fail hard instead.
pub fn fallback_image_prompt(request: &SnsRequest) -> String {
    let layout = resolve_layout(&request.layout_style)
        .unwrap_or_else(|| LAYOUT_STYLES.resolve_or_default(&request.layout_style));
    let background = resolve_background(&request.background_style);
    let mood = resolve_mood(&request.mood);

    let mut parts = Vec::new();
    parts.push(format!(
        "A clean, minimal social media graphic for a Japanese personal training studio, {} layout.",
        layout.description
    ));
    match background.kind {
        BackgroundKind::Photo => {
            let darkness = overlay_darkness(background, request.opacity);
            parts.push(format!(
                "Background: the provided store photo under a {darkness}% dark overlay."
            ));
        }
        BackgroundKind::Gradient => parts.push(format!(
            "Background: a smooth gradient of {}.",
            background.colors.join(" to ")
        )),
        BackgroundKind::Solid => parts.push(format!(
            "Background: solid {}.",
            background.colors.join(", ")
        )),
    }
    parts.push(format!(
        "Render the exact text \"{}\" as the headline.",
        request.headline
    ));
    if let Some(sub_text) = request.sub_text.as_deref().filter(|t| !t.is_empty()) {
        parts.push(format!("Render the exact sub text \"{sub_text}\"."));
    }
    if let Some(accent_text) = request.accent_text.as_deref().filter(|t| !t.is_empty()) {
        parts.push(format!(
            "Render the exact accent text \"{accent_text}\" in orange #ff6b35."
        ));
    }
    for point in &request.body_points {
        parts.push(format!("Render the exact list item \"{point}\"."));
    }
    if let Some(cta_text) = request.cta_text.as_deref().filter(|t| !t.is_empty()) {
        parts.push(format!("Render the exact call-to-action text \"{cta_text}\"."));
    }
    parts.push(format!(
        "Atmosphere: {}. Brand palette: navy #0d2b45, orange #ff6b35, light gray #f5f5f5. Style: calm, professional, clean, minimal, modern, flat design.",
        mood.modifier
    ));

    ensure_nationality_clause(&parts.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::brand::{FORBIDDEN_KEYWORDS, REQUIRED_KEYWORDS};

    fn sample_request() -> SnsRequest {
        SnsRequest {
            platform: "instagram_feed".to_string(),
            post_type: "tips".to_string(),
            layout_style: "split_top_bottom".to_string(),
            background_style: "solid_navy".to_string(),
            opacity: None,
            headline: "なぜ、変わらないのか。".to_string(),
            headline_color: "白".to_string(),
            headline_size: "大".to_string(),
            headline_position: "中央".to_string(),
            sub_text: Some("3軸診断でわかる".to_string()),
            sub_text_color: Some("ライトグレー".to_string()),
            accent_text: Some("無料".to_string()),
            accent_color: None,
            logo: LogoSpec {
                include: true,
                position: Some("下部".to_string()),
                size: Some("小".to_string()),
            },
            trainer_photo: None,
            icons: None,
            font_style: "gothic".to_string(),
            border_style: "none".to_string(),
            decoration: String::new(),
            mood: "slightly_calm".to_string(),
            color_intensity: String::new(),
            body_points: vec![],
            cta_text: None,
        }
    }

    #[test]
    fn system_instruction_carries_complete_brand_lists() {
        let pair = compose_sns_prompt(&sample_request()).unwrap();
        for keyword in REQUIRED_KEYWORDS {
            assert!(pair.system.contains(keyword));
        }
        for keyword in FORBIDDEN_KEYWORDS {
            assert!(pair.system.contains(keyword));
        }
    }

    #[test]
    fn literal_text_is_quoted_and_unaltered() {
        let mut request = sample_request();
        request.headline = "今だけ「無料」！\n\"限定\" 5名様".to_string();
        let pair = compose_sns_prompt(&request).unwrap();
        assert!(pair
            .user
            .contains("\"今だけ「無料」！\n\"限定\" 5名様\""));
    }

    #[test]
    fn logo_without_position_is_a_configuration_error() {
        let mut request = sample_request();
        request.logo.position = None;
        assert!(matches!(
            compose_sns_prompt(&request),
            Err(crate::error::GenerationError::Configuration(_))
        ));
    }

    #[test]
    fn unknown_color_is_a_configuration_error() {
        let mut request = sample_request();
        request.headline_color = "#ff0000".to_string();
        assert!(compose_sns_prompt(&request).is_err());
    }

    #[test]
    fn overlay_darkness_is_the_opacity_complement() {
        let style = BACKGROUND_STYLES.resolve("店舗写真").unwrap();
        assert_eq!(overlay_darkness(style, Some(0)), 100);
        assert_eq!(overlay_darkness(style, Some(50)), 50);
        assert_eq!(overlay_darkness(style, Some(100)), 0);
        // Untouched slider falls back to the catalog default (60).
        assert_eq!(overlay_darkness(style, None), 40);
    }

    #[test]
    fn photo_background_encodes_darkness_in_instruction() {
        let mut request = sample_request();
        request.background_style = "store_photo".to_string();
        request.opacity = Some(30);
        let pair = compose_sns_prompt(&request).unwrap();
        assert!(pair.user.contains("70% darkness"));
    }

    #[test]
    fn platform_maps_to_aspect_ratio() {
        assert_eq!(aspect_ratio_for_platform("instagram_story"), "9:16");
        assert_eq!(aspect_ratio_for_platform("Instagram投稿"), "1:1");
        assert_eq!(aspect_ratio_for_platform("x_post"), "16:9");
    }

    #[test]
    fn fallback_prompt_keeps_literal_text_and_clause() {
        let request = sample_request();
        let prompt = fallback_image_prompt(&request);
        assert!(prompt.contains("\"なぜ、変わらないのか。\""));
        assert_eq!(
            prompt
                .matches(crate::catalog::brand::NATIONALITY_CLAUSE)
                .count(),
            1
        );
    }
}
