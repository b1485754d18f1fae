//! Option catalogs for every configurable axis of the form layer.
//!
//! Display labels are the Japanese strings the studio staff see; canonical
//! keys and descriptor payloads are what the composer feeds to the models.
//! The set of keys is effectively a public vocabulary the instruction
//! templates are written against, so a key change here must be mirrored in
//! the templates.

use super::Catalog;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Situation {
    pub key: &'static str,
    pub scene: &'static str,
    pub action: &'static str,
    pub mood: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientType {
    pub key: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodModifier {
    pub key: &'static str,
    pub modifier: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackgroundKind {
    Solid,
    Gradient,
    Photo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackgroundStyle {
    pub key: &'static str,
    pub kind: BackgroundKind,
    pub colors: &'static [&'static str],
    /// Slider default; the request value still wins when supplied.
    pub default_opacity: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutStyle {
    pub key: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextPosition {
    pub key: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSize {
    pub key: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrandColor {
    pub key: &'static str,
    pub hex: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconType {
    pub key: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontStyle {
    pub key: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BorderStyle {
    pub key: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnsPlatform {
    pub key: &'static str,
    pub note: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostType {
    pub key: &'static str,
    pub description: &'static str,
}

pub static SITUATIONS: Catalog<Situation> = Catalog::new(
    "situation",
    &[
        (
            "カウンセリング・相談",
            Situation {
                key: "consultation",
                scene: "professional consultation session in a modern personal training studio",
                action: "having a calm, thoughtful conversation, trainer explaining with gestures, client listening attentively",
                mood: "professional yet warm, trustworthy atmosphere",
            },
        ),
        (
            "姿勢チェック・診断",
            Situation {
                key: "posture_check",
                scene: "posture assessment area with clean white walls",
                action: "trainer carefully analyzing client's posture from the side, pointing out alignment",
                mood: "clinical precision with caring approach",
            },
        ),
        (
            "セッション風景（落ち着いた雰囲気）",
            Situation {
                key: "training_session",
                scene: "well-lit training area with minimal equipment",
                action: "gentle guided exercise, trainer providing supportive instruction, controlled movements",
                mood: "calm, focused, encouraging atmosphere",
            },
        ),
        (
            "食事相談・説明",
            Situation {
                key: "nutrition_counseling",
                scene: "consultation area in a modern personal training studio, no food visible",
                action: "trainer and client having a calm discussion about nutrition, trainer explaining with tablet or paper, gesturing while talking",
                mood: "educational, supportive, counseling atmosphere similar to general consultation",
            },
        ),
        (
            "施設内観（人物なし）",
            Situation {
                key: "interior",
                scene: "clean, modern gym interior with natural light streaming through windows",
                action: "empty space showcasing equipment arrangement and cleanliness",
                mood: "inviting, spacious, professional",
            },
        ),
        (
            "図解・インフォグラフィック",
            Situation {
                key: "infographic",
                scene: "clean background suitable for informational graphics",
                action: "visual diagram or infographic layout",
                mood: "clear, educational, professional",
            },
        ),
        (
            "目標達成で喜ぶ風景",
            Situation {
                key: "goal_achievement",
                scene: "bright training studio with celebratory atmosphere",
                action: "client showing genuine happiness, trainer congratulating with warm smile, natural celebration",
                mood: "joyful but not over-the-top, authentic happiness, proud achievement",
            },
        ),
    ],
    Some("カウンセリング・相談"),
);

pub static CLIENT_TYPES: Catalog<ClientType> = Catalog::new(
    "client type",
    &[
        (
            "30代女性",
            ClientType {
                key: "30s_female",
                description: "a Japanese woman in her 30s, professional appearance, wearing comfortable athletic wear",
            },
        ),
        (
            "30代男性",
            ClientType {
                key: "30s_male",
                description: "a Japanese man in his 30s, office worker type, wearing casual training clothes",
            },
        ),
        (
            "40代女性",
            ClientType {
                key: "40s_female",
                description: "a Japanese woman in her 40s, elegant and health-conscious appearance",
            },
        ),
        (
            "40代男性ビジネスマン",
            ClientType {
                key: "40s_businessman",
                description: "a Japanese businessman in his 40s, slightly tired but motivated expression",
            },
        ),
        (
            "50代女性",
            ClientType {
                key: "50s_female",
                description: "a Japanese woman in her 50s, mature and dignified appearance",
            },
        ),
        (
            "50代男性",
            ClientType {
                key: "50s_male",
                description: "a Japanese man in his 50s, experienced professional look",
            },
        ),
        (
            "シニア女性（60代以上）",
            ClientType {
                key: "senior_female",
                description: "a Japanese senior woman in her 60s, active and healthy appearance",
            },
        ),
        (
            "シニア男性（60代以上）",
            ClientType {
                key: "senior_male",
                description: "a Japanese senior man in his 60s, distinguished and active",
            },
        ),
        (
            "主婦層",
            ClientType {
                key: "housewife",
                description: "a Japanese homemaker, warm and approachable appearance, health-conscious",
            },
        ),
    ],
    None,
);

pub static MOODS: Catalog<MoodModifier> = Catalog::new(
    "mood",
    &[
        (
            "落ち着いた",
            MoodModifier {
                key: "calm",
                modifier: "very calm and serene atmosphere, muted colors, soft diffused lighting",
            },
        ),
        (
            "やや落ち着いた",
            MoodModifier {
                key: "slightly_calm",
                modifier: "calm professional atmosphere, natural soft lighting, subtle warmth",
            },
        ),
        (
            "ニュートラル",
            MoodModifier {
                key: "neutral",
                modifier: "balanced neutral atmosphere, even lighting",
            },
        ),
        (
            "やや活気ある",
            MoodModifier {
                key: "slightly_energetic",
                modifier: "gently energetic atmosphere, brighter natural light, subtle dynamism",
            },
        ),
        (
            "活気ある",
            MoodModifier {
                key: "energetic",
                modifier: "positive energetic atmosphere, bright natural light, sense of movement",
            },
        ),
    ],
    Some("やや落ち着いた"),
);

pub static ASPECT_RATIOS: Catalog<&'static str> = Catalog::new(
    "aspect ratio",
    &[
        ("1:1（正方形）", "1:1"),
        ("4:5（縦長）", "4:5"),
        ("16:9（横長）", "16:9"),
        ("9:16（縦長・ストーリー）", "9:16"),
        ("4:3", "4:3"),
        ("3:2", "3:2"),
        ("21:9（ワイド）", "21:9"),
    ],
    None,
);

pub static LOCATIONS: Catalog<&'static str> = Catalog::new(
    "location",
    &[("島田本町", "shimadahonmachi"), ("伊福町", "ifukucho")],
    None,
);

pub static TRAINERS: Catalog<&'static str> = Catalog::new(
    "trainer",
    &[
        ("岡田", "okada"),
        ("山本", "yamamoto"),
        ("板倉", "itakura"),
        ("葛本", "kuzumoto"),
    ],
    None,
);

pub static LAYOUT_STYLES: Catalog<LayoutStyle> = Catalog::new(
    "layout style",
    &[
        (
            "大見出し中央",
            LayoutStyle {
                key: "headline_center",
                description: "single large headline centered, generous whitespace",
            },
        ),
        (
            "上下分割",
            LayoutStyle {
                key: "split_top_bottom",
                description: "headline in the upper band, supporting text in the lower band",
            },
        ),
        (
            "箇条書きリスト",
            LayoutStyle {
                key: "list_points",
                description: "headline with a vertical list of short bullet points",
            },
        ),
        (
            "写真オーバーレイ",
            LayoutStyle {
                key: "photo_overlay",
                description: "text placed over a darkened photo background",
            },
        ),
        (
            "チェックリスト",
            LayoutStyle {
                key: "checklist",
                description: "check-marked items stacked vertically, headline above",
            },
        ),
        (
            "ビフォー比較",
            LayoutStyle {
                key: "comparison",
                description: "two-column layout contrasting a before and after state, subdued styling",
            },
        ),
        (
            "数字強調",
            LayoutStyle {
                key: "number_highlight",
                description: "one large numeral or statistic with a short caption",
            },
        ),
        (
            "CTAバナー",
            LayoutStyle {
                key: "cta_banner",
                description: "call-to-action band with button-like accent element",
            },
        ),
    ],
    Some("大見出し中央"),
);

pub static BACKGROUND_STYLES: Catalog<BackgroundStyle> = Catalog::new(
    "background style",
    &[
        (
            "単色（ダークネイビー）",
            BackgroundStyle {
                key: "solid_navy",
                kind: BackgroundKind::Solid,
                colors: &["#0d2b45"],
                default_opacity: 100,
            },
        ),
        (
            "単色（ライトグレー）",
            BackgroundStyle {
                key: "solid_light_gray",
                kind: BackgroundKind::Solid,
                colors: &["#f5f5f5"],
                default_opacity: 100,
            },
        ),
        (
            "単色（白）",
            BackgroundStyle {
                key: "solid_white",
                kind: BackgroundKind::Solid,
                colors: &["#ffffff"],
                default_opacity: 100,
            },
        ),
        (
            "グラデーション（ネイビー）",
            BackgroundStyle {
                key: "gradient_navy",
                kind: BackgroundKind::Gradient,
                colors: &["#0d2b45", "#1a4a6e"],
                default_opacity: 100,
            },
        ),
        (
            "店舗写真",
            BackgroundStyle {
                key: "store_photo",
                kind: BackgroundKind::Photo,
                colors: &["#0d2b45"],
                default_opacity: 60,
            },
        ),
    ],
    Some("単色（ダークネイビー）"),
);

pub static TEXT_POSITIONS: Catalog<TextPosition> = Catalog::new(
    "text position",
    &[
        (
            "上部",
            TextPosition {
                key: "top",
                description: "upper third of the frame",
            },
        ),
        (
            "中央",
            TextPosition {
                key: "center",
                description: "vertically and horizontally centered",
            },
        ),
        (
            "下部",
            TextPosition {
                key: "bottom",
                description: "lower third of the frame",
            },
        ),
    ],
    Some("中央"),
);

pub static TEXT_SIZES: Catalog<TextSize> = Catalog::new(
    "text size",
    &[
        (
            "小",
            TextSize {
                key: "small",
                description: "small, understated type",
            },
        ),
        (
            "中",
            TextSize {
                key: "medium",
                description: "medium, comfortably readable type",
            },
        ),
        (
            "大",
            TextSize {
                key: "large",
                description: "large display type",
            },
        ),
        (
            "特大",
            TextSize {
                key: "extra_large",
                description: "extra large type dominating the frame",
            },
        ),
    ],
    Some("大"),
);

pub static BRAND_COLORS: Catalog<BrandColor> = Catalog::new(
    "brand color",
    &[
        (
            "ダークネイビー",
            BrandColor {
                key: "navy",
                hex: "#0d2b45",
            },
        ),
        (
            "オレンジ",
            BrandColor {
                key: "orange",
                hex: "#ff6b35",
            },
        ),
        (
            "ライトグレー",
            BrandColor {
                key: "light_gray",
                hex: "#f5f5f5",
            },
        ),
        (
            "白",
            BrandColor {
                key: "white",
                hex: "#ffffff",
            },
        ),
        (
            "チャコール",
            BrandColor {
                key: "charcoal",
                hex: "#333333",
            },
        ),
    ],
    Some("白"),
);

pub static ICON_TYPES: Catalog<IconType> = Catalog::new(
    "icon type",
    &[
        (
            "チェックマーク",
            IconType {
                key: "check",
                description: "simple check marks in the accent color",
            },
        ),
        (
            "矢印",
            IconType {
                key: "arrow",
                description: "thin directional arrows",
            },
        ),
        (
            "数字バッジ",
            IconType {
                key: "number_badge",
                description: "small circular numbered badges",
            },
        ),
        (
            "ワンポイント図形",
            IconType {
                key: "shape_accent",
                description: "a single minimal geometric accent shape",
            },
        ),
        (
            "なし",
            IconType {
                key: "none",
                description: "no icons",
            },
        ),
    ],
    Some("なし"),
);

pub static FONT_STYLES: Catalog<FontStyle> = Catalog::new(
    "font style",
    &[
        (
            "ゴシック（標準）",
            FontStyle {
                key: "gothic",
                description: "clean modern sans-serif (gothic) typeface",
            },
        ),
        (
            "明朝",
            FontStyle {
                key: "mincho",
                description: "elegant serif (mincho) typeface",
            },
        ),
        (
            "丸ゴシック",
            FontStyle {
                key: "rounded_gothic",
                description: "soft rounded sans-serif typeface",
            },
        ),
    ],
    Some("ゴシック（標準）"),
);

pub static BORDER_STYLES: Catalog<BorderStyle> = Catalog::new(
    "border style",
    &[
        (
            "なし",
            BorderStyle {
                key: "none",
                description: "no border",
            },
        ),
        (
            "細線",
            BorderStyle {
                key: "thin_line",
                description: "thin single-line border in the text color",
            },
        ),
        (
            "角丸フレーム",
            BorderStyle {
                key: "rounded_frame",
                description: "rounded rectangular frame with generous padding",
            },
        ),
    ],
    Some("なし"),
);

pub static SNS_PLATFORMS: Catalog<SnsPlatform> = Catalog::new(
    "SNS platform",
    &[
        (
            "Instagram投稿",
            SnsPlatform {
                key: "instagram_feed",
                note: "square or 4:5 feed post",
            },
        ),
        (
            "Instagramストーリー",
            SnsPlatform {
                key: "instagram_story",
                note: "9:16 full-screen story",
            },
        ),
        (
            "X（旧Twitter）",
            SnsPlatform {
                key: "x_post",
                note: "16:9 timeline image",
            },
        ),
        (
            "LINE公式",
            SnsPlatform {
                key: "line_official",
                note: "1:1 rich message image",
            },
        ),
    ],
    Some("Instagram投稿"),
);

pub static POST_TYPES: Catalog<PostType> = Catalog::new(
    "post type",
    &[
        (
            "お知らせ",
            PostType {
                key: "announcement",
                description: "studio announcement or schedule notice",
            },
        ),
        (
            "キャンペーン",
            PostType {
                key: "campaign",
                description: "limited campaign or free counseling offer",
            },
        ),
        (
            "豆知識",
            PostType {
                key: "tips",
                description: "short educational tip on posture, nutrition or habit building",
            },
        ),
        (
            "お客様の声",
            PostType {
                key: "testimonial",
                description: "client voice presented calmly, no exaggerated before/after",
            },
        ),
        (
            "カルーセル",
            PostType {
                key: "carousel",
                description: "one page of a themed multi-page carousel",
            },
        ),
    ],
    Some("お知らせ"),
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_label_resolves_in_every_catalog() {
        fn check<V>(catalog: &Catalog<V>) {
            for label in catalog.labels() {
                assert!(
                    catalog.resolve(label).is_some(),
                    "label '{}' does not resolve in catalog '{}'",
                    label,
                    catalog.name()
                );
            }
            if let Some(default) = catalog.default_label() {
                assert!(
                    catalog.resolve(default).is_some(),
                    "default '{}' missing from catalog '{}'",
                    default,
                    catalog.name()
                );
            }
        }

        check(&SITUATIONS);
        check(&CLIENT_TYPES);
        check(&MOODS);
        check(&ASPECT_RATIOS);
        check(&LOCATIONS);
        check(&TRAINERS);
        check(&LAYOUT_STYLES);
        check(&BACKGROUND_STYLES);
        check(&TEXT_POSITIONS);
        check(&TEXT_SIZES);
        check(&BRAND_COLORS);
        check(&ICON_TYPES);
        check(&FONT_STYLES);
        check(&BORDER_STYLES);
        check(&SNS_PLATFORMS);
        check(&POST_TYPES);
    }

    #[test]
    fn unknown_situation_falls_back_to_consultation() {
        let fallback = SITUATIONS.resolve_or_default("存在しないシチュエーション");
        assert_eq!(fallback.key, "consultation");
    }

    #[test]
    fn required_catalogs_reject_unknown_labels() {
        assert!(ASPECT_RATIOS.require("2:1").is_err());
        assert!(LOCATIONS.require("名古屋").is_err());
    }

    #[test]
    fn photo_background_carries_opacity_payload() {
        let style = BACKGROUND_STYLES.resolve("店舗写真").unwrap();
        assert_eq!(style.kind, BackgroundKind::Photo);
        assert_eq!(style.default_opacity, 60);
    }
}
