//! Promotional-photo prompt composition.
//!
//! Produces the instruction pair the text model turns into a final image
//! prompt. The brand constraint set is embedded in full; the forbidden and
//! required keyword lists are the model's only defense against off-brand
//! imagery, so they are never abbreviated.

use crate::catalog::brand::{ensure_nationality_clause, BRAND_GUIDELINES};
use crate::compose::{
    resolve_aspect_ratio, resolve_client, resolve_mood, resolve_situation, GenerationRequest,
    InstructionPair,
};
use crate::error::{GenerationError, Result};

/// Appended when a store background reference accompanies the request.
pub const BACKGROUND_FIXED_FRAGMENT: &str = "IMPORTANT: Use the provided background image as the exact setting/environment. Maintain the architectural features, lighting, colors, and atmosphere of this space precisely.";

/// Appended when a trainer reference accompanies the request.
pub const TRAINER_IDENTITY_FRAGMENT: &str = "CRITICAL: The trainer in the generated image MUST look EXACTLY like the person in the reference photo(s). Maintain their exact facial features, face shape, hairstyle, skin tone, and overall appearance.";

fn photo_system_instruction() -> String {
    format!(
        r#"あなたは画像生成AI用のプロンプトを作成する専門家です。
FIREFITNESSというパーソナルトレーニングジムのマーケティング画像を生成するためのプロンプトを作成します。

{BRAND_GUIDELINES}

## あなたのタスク
1. 入力された日本語の指示を理解する
2. ブランドガイドラインに完全に沿った英語プロンプトを生成する
3. NGワードは絶対に使わない
4. 推奨キーワードを積極的に使用する
5. 具体的で視覚的な描写を含める
6. 【重要】ユーザー指示の冒頭にある国籍指定の英文を、出力プロンプトの冒頭にそのまま1回だけ含める

## 出力形式
英語のプロンプトのみを出力してください。説明や注釈は不要です。
プロンプトは1つの段落で、以下の要素を含めてください：
- シーン設定（場所、環境）
- 人物描写（いる場合）
- アクション/ポーズ
- 光と雰囲気
- カメラアングル/構図
- スタイル指定（写真風、イラスト等）"#
    )
}

pub fn compose_photo_prompt(request: &GenerationRequest) -> Result<InstructionPair> {
    if request.location.trim().is_empty() {
        return Err(GenerationError::Configuration(
            "location is required".to_string(),
        ));
    }
    let aspect_ratio = resolve_aspect_ratio(&request.aspect_ratio)?;

    let situation = resolve_situation(&request.situation);
    let mood = resolve_mood(&request.mood);
    let client = request
        .client
        .as_deref()
        .and_then(resolve_client);
    let trainer = request
        .trainer
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty());

    let mut user = String::new();
    user.push_str(&ensure_nationality_clause(""));
    user.push_str("\n\n以下の条件で画像生成プロンプトを作成してください：\n\n");
    user.push_str(&format!(
        "【店舗】{}店（背景画像を参照して使用）\n",
        request.location.trim()
    ));
    user.push_str(&format!(
        "【シチュエーション】{}\n- シーン: {}\n- アクション: {}\n- 基本ムード: {}\n\n",
        situation.key, situation.scene, situation.action, situation.mood
    ));

    user.push_str("【登場人物】\n");
    if let Some(name) = trainer {
        user.push_str(&format!(
            "- トレーナー: {name}（参照画像のトレーナーを登場させる。特徴を維持すること）\n"
        ));
    }
    if let Some(client) = client {
        user.push_str(&format!("- クライアント: {}\n", client.description));
    }
    if trainer.is_none() && client.is_none() {
        user.push_str("- 人物なし（施設のみ）\n");
    }

    user.push_str(&format!("\n【雰囲気】{}\n- {}\n", mood.key, mood.modifier));
    user.push_str(&format!("\n【アスペクト比】{aspect_ratio}\n"));

    // The clause is pinned at the top of this instruction; free text that
    // repeats it is stripped so it never appears twice.
    let additional = request
        .additional_free_text
        .replace(crate::catalog::brand::NATIONALITY_CLAUSE, "");
    let additional = additional.trim();
    user.push_str(&format!(
        "\n【追加指示】\n{}\n",
        if additional.is_empty() {
            "特になし"
        } else {
            additional
        }
    ));

    if let Some(image_text) = request.image_text.as_deref().filter(|t| !t.trim().is_empty()) {
        user.push_str(&format!(
            "\n【画像内テキスト】\n\"{image_text}\" というテキストを画像内に含める\n"
        ));
    }

    if request.background_selected {
        user.push_str(&format!("\n{BACKGROUND_FIXED_FRAGMENT}\n"));
    }
    if trainer.is_some() {
        user.push_str(&format!("\n{TRAINER_IDENTITY_FRAGMENT}\n"));
    }

    user.push_str("\n【重要な注意事項】\n1. 参照画像（背景・トレーナー）がある場合、それらを活かしたプロンプトにする\n2. 日本のパーソナルジムらしい雰囲気を出す\n3. 自然光、清潔感を強調\n4. NGワードは絶対に使わない\n");

    Ok(InstructionPair {
        system: photo_system_instruction(),
        user,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::brand::{FORBIDDEN_KEYWORDS, NATIONALITY_CLAUSE, REQUIRED_KEYWORDS};

    fn sample_request() -> GenerationRequest {
        GenerationRequest {
            location: "StoreA".to_string(),
            situation: "consultation".to_string(),
            trainer: Some("Trainer1".to_string()),
            client: Some("30s_female".to_string()),
            aspect_ratio: "1:1".to_string(),
            additional_free_text: String::new(),
            image_text: None,
            mood: "slightly_calm".to_string(),
            background_selected: true,
        }
    }

    #[test]
    fn system_instruction_carries_complete_brand_lists() {
        let pair = compose_photo_prompt(&sample_request()).unwrap();
        for keyword in REQUIRED_KEYWORDS {
            assert!(pair.system.contains(keyword), "missing required '{keyword}'");
        }
        for keyword in FORBIDDEN_KEYWORDS {
            assert!(pair.system.contains(keyword), "missing forbidden '{keyword}'");
        }
    }

    #[test]
    fn nationality_clause_appears_exactly_once() {
        let mut request = sample_request();
        request.additional_free_text =
            format!("{NATIONALITY_CLAUSE} 窓から自然光が入っている");
        let pair = compose_photo_prompt(&request).unwrap();
        assert_eq!(pair.combined().matches(NATIONALITY_CLAUSE).count(), 1);
        assert!(pair.user.contains("窓から自然光が入っている"));
    }

    #[test]
    fn missing_aspect_ratio_is_a_configuration_error() {
        let mut request = sample_request();
        request.aspect_ratio = String::new();
        assert!(matches!(
            compose_photo_prompt(&request),
            Err(crate::error::GenerationError::Configuration(_))
        ));
    }

    #[test]
    fn missing_location_is_a_configuration_error() {
        let mut request = sample_request();
        request.location = "  ".to_string();
        assert!(compose_photo_prompt(&request).is_err());
    }

    #[test]
    fn absent_people_yields_facility_only_branch() {
        let mut request = sample_request();
        request.trainer = None;
        request.client = None;
        let pair = compose_photo_prompt(&request).unwrap();
        assert!(pair.user.contains("人物なし（施設のみ）"));
        assert!(!pair.user.contains(TRAINER_IDENTITY_FRAGMENT));
    }

    #[test]
    fn end_to_end_scenario_contains_expected_fragments() {
        let pair = compose_photo_prompt(&sample_request()).unwrap();
        let combined = pair.combined();
        assert!(combined.contains(NATIONALITY_CLAUSE));
        let situation = resolve_situation("consultation");
        assert!(combined.contains(situation.scene));
        assert!(combined.contains(situation.action));
        assert!(combined.contains(situation.mood));
        assert!(combined.contains(TRAINER_IDENTITY_FRAGMENT));
        assert!(combined.contains(BACKGROUND_FIXED_FRAGMENT));
        // The user-side instruction itself must not feed the image model
        // any forbidden vocabulary.
        for keyword in FORBIDDEN_KEYWORDS {
            assert!(
                !pair.user.contains(keyword),
                "forbidden keyword '{keyword}' leaked into the user instruction"
            );
        }
    }
}
