//! Multi-page carousel sequencer.
//!
//! Pages are generated strictly in order: each page's content request
//! carries the committed content of every earlier page, so there is no
//! reordering and no parallelism. Content-generation failures degrade to
//! the static per-role fallback table; an image failure marks only that
//! page as failed and the run continues, so a single bad page never costs
//! the rest of the batch.

use tracing::{info, warn};

use crate::catalog::pages::{fallback_content, PageContent, PageType};
use crate::compose::sns::{LogoSpec, SnsRequest};
use crate::compose::{
    compose_page_content_request, compose_sns_prompt, fallback_image_prompt, parse_page_content,
};
use crate::error::GenerationError;
use crate::llm::types::{
    ImageSynthesis, ImageSynthesisRequest, ReferenceImage, ReferenceRole, TextCompletion,
    TextCompletionRequest,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentSource {
    Generated,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStatus {
    Done,
    Failed,
}

/// Final record for one page. Content is always committed, even when the
/// image call failed; the caller can re-run just the failed page.
#[derive(Debug, Clone)]
pub struct PageOutcome {
    pub page_number: usize,
    pub page_type: PageType,
    pub content: PageContent,
    pub content_source: ContentSource,
    pub layout_key: String,
    pub image: Option<Vec<u8>>,
    pub commentary: Option<String>,
    pub status: PageStatus,
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SequenceReport {
    pub theme: String,
    pub pages: Vec<PageOutcome>,
}

impl SequenceReport {
    pub fn failed_pages(&self) -> Vec<usize> {
        self.pages
            .iter()
            .filter(|page| page.status == PageStatus::Failed)
            .map(|page| page.page_number)
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct SequenceOptions {
    pub theme: String,
    /// Page roles in generation order, from a preset or a parsed custom
    /// list; always title-first, CTA-last.
    pub pages: Vec<PageType>,
    pub platform: String,
    pub mood: String,
    pub aspect_ratio: String,
    /// Attached only to the first page's image request.
    pub trainer_references: Vec<ReferenceImage>,
    /// Attached only to title-class and CTA-class pages.
    pub background_reference: Option<ReferenceImage>,
    pub max_output_tokens: i32,
}

/// Maps the model's own layout suggestion to a known layout key, falling
/// back to the page role's first recommended layout.
fn choose_layout(page_type: PageType, suggestion: &str) -> String {
    if let Some(layout) = crate::compose::sns::resolve_layout(suggestion.trim()) {
        return layout.key.to_string();
    }
    page_type.recommended_layouts()[0].to_string()
}

/// Bookend pages may carry the store photo; interior pages always render
/// on a solid brand background, whatever references were supplied.
fn is_bookend(page_type: PageType) -> bool {
    matches!(page_type, PageType::Title | PageType::Cta)
}

fn sns_request_for_page(
    options: &SequenceOptions,
    content: &PageContent,
    layout_key: &str,
    use_background_photo: bool,
) -> SnsRequest {
    SnsRequest {
        platform: options.platform.clone(),
        post_type: "carousel".to_string(),
        layout_style: layout_key.to_string(),
        background_style: if use_background_photo {
            "store_photo".to_string()
        } else {
            "solid_navy".to_string()
        },
        opacity: None,
        headline: content.headline.clone(),
        headline_color: "白".to_string(),
        headline_size: "大".to_string(),
        headline_position: "中央".to_string(),
        sub_text: Some(content.sub_text.clone()).filter(|t| !t.is_empty()),
        sub_text_color: Some("ライトグレー".to_string()),
        accent_text: Some(content.accent_text.clone()).filter(|t| !t.is_empty()),
        accent_color: Some("オレンジ".to_string()),
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
        mood: options.mood.clone(),
        color_intensity: String::new(),
        body_points: content.body_points.clone(),
        cta_text: Some(content.cta_text.clone()).filter(|t| !t.is_empty()),
    }
}

pub struct MultiPageSequencer<'a> {
    text: &'a dyn TextCompletion,
    image: &'a dyn ImageSynthesis,
}

impl<'a> MultiPageSequencer<'a> {
    pub fn new(text: &'a dyn TextCompletion, image: &'a dyn ImageSynthesis) -> Self {
        MultiPageSequencer { text, image }
    }

    /// Generates page content, degrading to the static fallback table on
    /// completion or parse failure.
    async fn generate_content(
        &self,
        options: &SequenceOptions,
        page_type: PageType,
        page_number: usize,
        total_pages: usize,
        prior_pages: &[PageContent],
    ) -> (PageContent, ContentSource) {
        let pair = compose_page_content_request(
            &options.theme,
            page_type,
            page_number,
            total_pages,
            prior_pages,
        );
        let request = TextCompletionRequest {
            system_instruction: pair.system,
            user_instruction: pair.user,
            max_output_tokens: options.max_output_tokens,
        };

        match self.text.complete(&request).await {
            Ok(raw) => match parse_page_content(&raw, page_type) {
                Ok(content) => (content, ContentSource::Generated),
                Err(err) => {
                    warn!(
                        "Page {} ({}) content unparseable, using fallback: {}",
                        page_number,
                        page_type.key(),
                        err
                    );
                    (fallback_content(page_type), ContentSource::Fallback)
                }
            },
            Err(err) => {
                warn!(
                    "Page {} ({}) content generation failed, using fallback: {}",
                    page_number,
                    page_type.key(),
                    err
                );
                (fallback_content(page_type), ContentSource::Fallback)
            }
        }
    }

    /// Optimizes the page's image prompt through the text model; when that
    /// call cannot be made, a deterministic prompt rendered directly from
    /// the request keeps the page generable.
    async fn image_prompt(
        &self,
        options: &SequenceOptions,
        sns_request: &SnsRequest,
    ) -> Result<String, GenerationError> {
        let pair = compose_sns_prompt(sns_request)?;
        let request = TextCompletionRequest {
            system_instruction: pair.system,
            user_instruction: pair.user,
            max_output_tokens: options.max_output_tokens,
        };
        match self.text.complete(&request).await {
            Ok(prompt) => Ok(prompt.trim().to_string()),
            Err(err) => {
                warn!("Image prompt optimization failed, using direct prompt: {err}");
                Ok(fallback_image_prompt(sns_request))
            }
        }
    }

    pub async fn run(&self, options: &SequenceOptions) -> SequenceReport {
        let page_types = &options.pages;
        let total_pages = page_types.len();
        let mut committed: Vec<PageContent> = Vec::with_capacity(total_pages);
        let mut outcomes: Vec<PageOutcome> = Vec::with_capacity(total_pages);

        for (index, page_type) in page_types.iter().copied().enumerate() {
            let page_number = index + 1;
            info!(
                "Generating page {}/{} ({})",
                page_number,
                total_pages,
                page_type.key()
            );

            let (content, content_source) = self
                .generate_content(options, page_type, page_number, total_pages, &committed)
                .await;
            committed.push(content.clone());

            let layout_key = choose_layout(page_type, &content.layout_suggestion);
            let use_background_photo =
                is_bookend(page_type) && options.background_reference.is_some();
            let sns_request =
                sns_request_for_page(options, &content, &layout_key, use_background_photo);

            let mut reference_images: Vec<ReferenceImage> = Vec::new();
            if page_number == 1 {
                reference_images.extend(options.trainer_references.iter().cloned());
            }
            if use_background_photo {
                if let Some(background) = options.background_reference.as_ref() {
                    debug_assert_eq!(background.role, ReferenceRole::Background);
                    reference_images.push(background.clone());
                }
            }

            let outcome = match self.image_prompt(options, &sns_request).await {
                Ok(prompt) => {
                    let image_request = ImageSynthesisRequest {
                        prompt,
                        reference_images,
                        aspect_ratio: options.aspect_ratio.clone(),
                    };
                    match self.image.synthesize(&image_request).await {
                        Ok(result) => PageOutcome {
                            page_number,
                            page_type,
                            content,
                            content_source,
                            layout_key,
                            image: result.image,
                            commentary: result.commentary,
                            status: PageStatus::Done,
                            error: None,
                        },
                        Err(err) => {
                            warn!("Page {page_number} image synthesis failed: {err}");
                            PageOutcome {
                                page_number,
                                page_type,
                                content,
                                content_source,
                                layout_key,
                                image: None,
                                commentary: None,
                                status: PageStatus::Failed,
                                error: Some(format!("{}: {err}", err.stage())),
                            }
                        }
                    }
                }
                Err(err) => {
                    // Composition itself failed; record and keep going.
                    warn!("Page {page_number} prompt composition failed: {err}");
                    PageOutcome {
                        page_number,
                        page_type,
                        content,
                        content_source,
                        layout_key,
                        image: None,
                        commentary: None,
                        status: PageStatus::Failed,
                        error: Some(format!("{}: {err}", err.stage())),
                    }
                }
            };

            outcomes.push(outcome);
        }

        SequenceReport {
            theme: options.theme.clone(),
            pages: outcomes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::catalog::pages::SequencePreset;
    use crate::error::Result;
    use crate::llm::types::ImageResult;

    struct ScriptedText {
        requests: Mutex<Vec<TextCompletionRequest>>,
        fail_all: bool,
        counter: Mutex<usize>,
    }

    impl ScriptedText {
        fn new(fail_all: bool) -> Self {
            ScriptedText {
                requests: Mutex::new(Vec::new()),
                fail_all,
                counter: Mutex::new(0),
            }
        }

        fn content_requests(&self) -> Vec<String> {
            self.requests
                .lock()
                .unwrap()
                .iter()
                .filter(|request| request.user_instruction.contains("これまでのページ"))
                .map(|request| request.user_instruction.clone())
                .collect()
        }
    }

    #[async_trait]
    impl TextCompletion for ScriptedText {
        async fn complete(&self, request: &TextCompletionRequest) -> Result<String> {
            self.requests.lock().unwrap().push(request.clone());
            if self.fail_all {
                return Err(GenerationError::TextCompletion("offline".to_string()));
            }
            if request.user_instruction.contains("これまでのページ") {
                let mut counter = self.counter.lock().unwrap();
                *counter += 1;
                Ok(format!(
                    "{{\"headline\": \"見出し{}\", \"layout_suggestion\": \"list_points\"}}",
                    *counter
                ))
            } else {
                Ok("An optimized English prompt.".to_string())
            }
        }
    }

    struct ScriptedImage {
        requests: Mutex<Vec<ImageSynthesisRequest>>,
        fail_on_page: Option<usize>,
        calls: Mutex<usize>,
    }

    impl ScriptedImage {
        fn new(fail_on_page: Option<usize>) -> Self {
            ScriptedImage {
                requests: Mutex::new(Vec::new()),
                fail_on_page,
                calls: Mutex::new(0),
            }
        }
    }

    #[async_trait]
    impl ImageSynthesis for ScriptedImage {
        async fn synthesize(&self, request: &ImageSynthesisRequest) -> Result<ImageResult> {
            self.requests.lock().unwrap().push(request.clone());
            let mut calls = self.calls.lock().unwrap();
            *calls += 1;
            if self.fail_on_page == Some(*calls) {
                return Err(GenerationError::ImageSynthesis("quota".to_string()));
            }
            Ok(ImageResult {
                image: Some(vec![0u8; 4]),
                commentary: None,
            })
        }
    }

    fn reference(role: ReferenceRole, tag: &str) -> ReferenceImage {
        ReferenceImage {
            bytes: tag.as_bytes().to_vec(),
            role,
            description: tag.to_string(),
        }
    }

    fn options(preset: SequencePreset) -> SequenceOptions {
        SequenceOptions {
            theme: "なぜ痩せないのか".to_string(),
            pages: preset.page_types().to_vec(),
            platform: "instagram_feed".to_string(),
            mood: "slightly_calm".to_string(),
            aspect_ratio: "4:5".to_string(),
            trainer_references: vec![
                reference(ReferenceRole::Trainer, "t1"),
                reference(ReferenceRole::Trainer, "t2"),
            ],
            background_reference: Some(reference(ReferenceRole::Background, "bg")),
            max_output_tokens: 1024,
        }
    }

    #[tokio::test]
    async fn each_page_sees_exactly_the_prior_committed_headlines() {
        let text = ScriptedText::new(false);
        let image = ScriptedImage::new(None);
        let sequencer = MultiPageSequencer::new(&text, &image);

        let report = sequencer.run(&options(SequencePreset::Compact)).await;
        assert_eq!(report.pages.len(), 4);

        let content_requests = text.content_requests();
        assert_eq!(content_requests.len(), 4);
        for (index, request) in content_requests.iter().enumerate() {
            for prior in 1..=index {
                assert!(
                    request.contains(&format!("見出し{prior}")),
                    "page {} request missing headline {}",
                    index + 1,
                    prior
                );
            }
            for later in (index + 1)..=4 {
                assert!(
                    !request.contains(&format!("見出し{later}")),
                    "page {} request leaked later headline {}",
                    index + 1,
                    later
                );
            }
            // Page 1's entry stays first.
            if index >= 2 {
                let first = request.find("見出し1").unwrap();
                let second = request.find("見出し2").unwrap();
                assert!(first < second);
            }
        }
    }

    #[tokio::test]
    async fn image_failure_on_one_page_does_not_stop_the_rest() {
        let text = ScriptedText::new(false);
        let image = ScriptedImage::new(Some(2));
        let sequencer = MultiPageSequencer::new(&text, &image);

        let report = sequencer.run(&options(SequencePreset::Compact)).await;
        assert_eq!(report.pages.len(), 4);
        assert_eq!(report.failed_pages(), vec![2]);

        for page in &report.pages {
            if page.page_number == 2 {
                assert_eq!(page.status, PageStatus::Failed);
                assert!(page.image.is_none());
                let error = page.error.as_deref().unwrap();
                assert!(error.starts_with("image_synthesis"));
            } else {
                assert_eq!(page.status, PageStatus::Done);
                assert!(page.image.is_some());
            }
            // Content is committed regardless of the image outcome.
            assert!(!page.content.headline.is_empty());
        }
    }

    #[tokio::test]
    async fn text_failure_degrades_every_page_to_its_fallback_entry() {
        let text = ScriptedText::new(true);
        let image = ScriptedImage::new(None);
        let sequencer = MultiPageSequencer::new(&text, &image);

        let report = sequencer.run(&options(SequencePreset::Compact)).await;
        let solution_page = report
            .pages
            .iter()
            .find(|page| page.page_type == PageType::Solution)
            .unwrap();
        assert_eq!(solution_page.content_source, ContentSource::Fallback);
        assert_eq!(solution_page.content, fallback_content(PageType::Solution));
        // The direct prompt path still produced an image for every page.
        assert!(report.failed_pages().is_empty());
    }

    #[tokio::test]
    async fn trainer_references_only_on_first_page_and_background_on_bookends() {
        let text = ScriptedText::new(false);
        let image = ScriptedImage::new(None);
        let sequencer = MultiPageSequencer::new(&text, &image);

        let report = sequencer.run(&options(SequencePreset::Compact)).await;
        assert!(report.failed_pages().is_empty());

        let image_requests = image.requests.lock().unwrap();
        assert_eq!(image_requests.len(), 4);

        for (index, request) in image_requests.iter().enumerate() {
            let trainer_count = request
                .reference_images
                .iter()
                .filter(|image| image.role == ReferenceRole::Trainer)
                .count();
            let background_count = request
                .reference_images
                .iter()
                .filter(|image| image.role == ReferenceRole::Background)
                .count();

            if index == 0 {
                assert_eq!(trainer_count, 2);
                assert_eq!(background_count, 1);
            } else if index == 3 {
                assert_eq!(trainer_count, 0);
                assert_eq!(background_count, 1);
            } else {
                assert_eq!(trainer_count, 0, "interior page got trainer refs");
                assert_eq!(background_count, 0, "interior page got background ref");
            }
        }
    }

    #[tokio::test]
    async fn custom_page_list_drives_the_sequence() {
        let text = ScriptedText::new(false);
        let image = ScriptedImage::new(None);
        let sequencer = MultiPageSequencer::new(&text, &image);

        let mut run_options = options(SequencePreset::Compact);
        run_options.pages =
            crate::catalog::pages::parse_page_list("title,evidence,cta").unwrap();

        let report = sequencer.run(&run_options).await;
        let roles: Vec<PageType> = report.pages.iter().map(|page| page.page_type).collect();
        assert_eq!(
            roles,
            vec![PageType::Title, PageType::Evidence, PageType::Cta]
        );
        assert!(report.failed_pages().is_empty());
    }

    #[tokio::test]
    async fn model_layout_suggestion_wins_when_known_else_role_default() {
        assert_eq!(choose_layout(PageType::Title, "list_points"), "list_points");
        assert_eq!(
            choose_layout(PageType::Title, "something_unknown"),
            "headline_center"
        );
        assert_eq!(choose_layout(PageType::Cta, ""), "cta_banner");
    }
}
