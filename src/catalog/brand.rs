//! FIREFITNESS brand constraint set.
//!
//! This text block is the only defense the downstream models have against
//! off-brand imagery, so the composer always embeds it in full. The keyword
//! slices mirror the lists inside `BRAND_GUIDELINES` and exist so tests and
//! callers can check completeness without re-parsing the prose.

pub const BRAND_NAVY: &str = "#0d2b45";
pub const BRAND_ORANGE: &str = "#ff6b35";
pub const BRAND_LIGHT_GRAY: &str = "#f5f5f5";
pub const BRAND_WHITE: &str = "#ffffff";

/// Must appear exactly once near the top of every composed image prompt.
pub const NATIONALITY_CLAUSE: &str = "All people in this image must be Japanese.";

pub const REQUIRED_KEYWORDS: &[&str] = &[
    "calm",
    "professional",
    "clean",
    "natural light",
    "consultation",
    "thoughtful",
    "minimal",
    "warm",
    "soft lighting",
    "genuine smile",
    "attentive",
    "engaged",
    "modern interior",
    "spacious",
];

pub const FORBIDDEN_KEYWORDS: &[&str] = &[
    "muscular",
    "intense",
    "extreme",
    "sweat",
    "screaming",
    "bodybuilder",
    "six-pack",
    "dramatic lighting",
    "HDR",
    "neon",
    "aggressive",
    "pumped",
    "ripped",
    "shredded",
];

pub const BRAND_GUIDELINES: &str = r#"## FIREFITNESS ブランドガイドライン

### コンセプト
「なぜ変わらないのか」を3軸診断（姿勢×食事×継続）で特定するパーソナルジム。
煽らない、押し付けない、気づきを与える。

### ターゲット
30-50代。派手な筋肉アピールには引く層。落ち着いた、信頼できる雰囲気を好む。

### ブランドカラー
- メイン：#0d2b45（ダークネイビー）
- アクセント：#ff6b35（オレンジ）
- 背景：#f5f5f5（ライトグレー）/ #ffffff（白）

### 写真トーン
明るすぎず暗すぎず、自然光ベース、彩度控えめ、コントラスト控えめ、落ち着いた印象

### 絶対にNGなビジュアル
- ムキムキの筋肉アップ
- 汗だくで叫んでいるトレーニング風景
- 過度なビフォーアフター（半裸の体型比較）
- ギラギラした色使い（金・赤・黒の組み合わせ）
- 「限界突破」「本気」「覚悟」系の煽り文字
- ストックフォト感のある作り笑顔
- HDR風のギラギラした加工
- ネオンカラー

### 目指すべきビジュアル
- 落ち着いた空間で会話しているシーン
- 姿勢をチェックしている専門的な場面
- 自然光、清潔感のある内装
- 「考えている」「説明を聞いている」表情
- 手元や足元のクローズアップ
- 図解・インフォグラフィック

### プロンプトで使うべきキーワード
calm, professional, clean, natural light, consultation, thoughtful, minimal, warm,
soft lighting, genuine smile, attentive, engaged, modern interior, spacious

### プロンプトで避けるべきキーワード
muscular, intense, extreme, sweat, screaming, bodybuilder, six-pack,
dramatic lighting, HDR, neon, aggressive, pumped, ripped, shredded"#;

/// Tone/content guidance for SNS page copy. Distinct from the visual
/// constraint set above: this steers what the text says, not what the image
/// shows.
pub const VALUE_FRAMEWORK: &str = r#"## FIREFITNESS 価値観フレームワーク（3軸診断）
「なぜ変わらないのか」を3つの軸で特定する：
1. 姿勢 — 骨格アライメントと動作のクセを専門的にチェックする
2. 食事 — 我慢ではなく、続けられる食習慣を一緒に設計する
3. 継続 — 意志力に頼らない仕組みで習慣化を支える

トーン：煽らない、押し付けない、気づきを与える。
数字や恐怖で追い込む表現は使わない。読み手が「自分のことだ」と静かに
納得できる言葉を選ぶ。"#;

/// Appends the nationality clause exactly once. Free text that already
/// carries the clause (in any position, possibly repeated) is stripped
/// first so the final instruction never duplicates it.
pub fn ensure_nationality_clause(text: &str) -> String {
    let stripped = text.replace(NATIONALITY_CLAUSE, "");
    let stripped = stripped.trim();
    if stripped.is_empty() {
        NATIONALITY_CLAUSE.to_string()
    } else {
        format!("{NATIONALITY_CLAUSE} {stripped}")
    }
}
