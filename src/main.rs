use std::error::Error;

use anyhow::anyhow;
use dotenvy::dotenv;
use tracing::{info, warn};

mod assets;
mod catalog;
mod compose;
mod config;
mod error;
mod llm;
mod output;
mod pipeline;
mod sequencer;
mod utils;

use catalog::pages::{parse_page_list, PageType, SequencePreset};
use compose::sns::{LogoSpec, SnsRequest};
use compose::GenerationRequest;
use config::CONFIG;
use llm::{ClaudeClient, GeminiImageClient};
use sequencer::{MultiPageSequencer, PageStatus, SequenceOptions};
use utils::logging::init_logging;

type CliResult = Result<(), Box<dyn Error + Send + Sync>>;

fn usage() -> &'static str {
    "Usage:
  firefitness_asset_studio photo --location <店舗> [--situation <key>] [--trainer <name>] \\
      [--client <key>] [--aspect-ratio <w:h>] [--mood <key>] [--free-text <text>] [--image-text <text>]
  firefitness_asset_studio sns --headline <text> [--platform <key>] [--post-type <key>] \\
      [--layout <key>] [--background <key>] [--opacity <0-100>] [--sub-text <text>] \\
      [--accent-text <text>] [--cta-text <text>] [--mood <key>] [--color-intensity <text>] [--no-logo]
  firefitness_asset_studio carousel --theme <text> [--preset full|standard|compact] \\
      [--pages <title,problem,...,cta>] [--platform <key>] [--mood <key>] \\
      [--location <店舗>] [--trainer <name>]"
}

fn take_value<'a>(args: &'a [String], index: &mut usize, flag: &str) -> anyhow::Result<&'a str> {
    *index += 1;
    args.get(*index)
        .map(|value| value.as_str())
        .ok_or_else(|| anyhow!("Missing value for {flag}"))
}

fn parse_photo_args(args: &[String]) -> anyhow::Result<GenerationRequest> {
    let mut request = GenerationRequest {
        situation: "カウンセリング・相談".to_string(),
        aspect_ratio: "1:1".to_string(),
        mood: "やや落ち着いた".to_string(),
        ..GenerationRequest::default()
    };

    let mut index = 2;
    while index < args.len() {
        match args[index].as_str() {
            "--location" => request.location = take_value(args, &mut index, "--location")?.to_string(),
            "--situation" => request.situation = take_value(args, &mut index, "--situation")?.to_string(),
            "--trainer" => request.trainer = Some(take_value(args, &mut index, "--trainer")?.to_string()),
            "--client" => request.client = Some(take_value(args, &mut index, "--client")?.to_string()),
            "--aspect-ratio" => {
                request.aspect_ratio = take_value(args, &mut index, "--aspect-ratio")?.to_string()
            }
            "--mood" => request.mood = take_value(args, &mut index, "--mood")?.to_string(),
            "--free-text" => {
                request.additional_free_text =
                    take_value(args, &mut index, "--free-text")?.to_string()
            }
            "--image-text" => {
                request.image_text = Some(take_value(args, &mut index, "--image-text")?.to_string())
            }
            "--help" | "-h" => return Err(anyhow!(usage())),
            other => return Err(anyhow!("Unknown photo argument: {other}\n{}", usage())),
        }
        index += 1;
    }

    if request.location.trim().is_empty() {
        return Err(anyhow!("--location is required"));
    }
    Ok(request)
}

fn parse_sns_args(args: &[String]) -> anyhow::Result<SnsRequest> {
    let mut request = SnsRequest {
        platform: "instagram_feed".to_string(),
        post_type: "tips".to_string(),
        layout_style: "headline_center".to_string(),
        background_style: "solid_navy".to_string(),
        headline_color: "白".to_string(),
        headline_size: "大".to_string(),
        headline_position: "中央".to_string(),
        logo: LogoSpec {
            include: true,
            position: Some("下部".to_string()),
            size: Some("小".to_string()),
        },
        font_style: "gothic".to_string(),
        border_style: "none".to_string(),
        mood: "やや落ち着いた".to_string(),
        ..SnsRequest::default()
    };

    let mut index = 2;
    while index < args.len() {
        match args[index].as_str() {
            "--headline" => request.headline = take_value(args, &mut index, "--headline")?.to_string(),
            "--platform" => request.platform = take_value(args, &mut index, "--platform")?.to_string(),
            "--post-type" => request.post_type = take_value(args, &mut index, "--post-type")?.to_string(),
            "--layout" => request.layout_style = take_value(args, &mut index, "--layout")?.to_string(),
            "--background" => {
                request.background_style = take_value(args, &mut index, "--background")?.to_string()
            }
            "--opacity" => {
                let value = take_value(args, &mut index, "--opacity")?;
                let opacity = value
                    .parse::<u8>()
                    .ok()
                    .filter(|parsed| *parsed <= 100)
                    .ok_or_else(|| anyhow!("Invalid --opacity value: {value}"))?;
                request.opacity = Some(opacity);
            }
            "--sub-text" => request.sub_text = Some(take_value(args, &mut index, "--sub-text")?.to_string()),
            "--accent-text" => {
                request.accent_text = Some(take_value(args, &mut index, "--accent-text")?.to_string())
            }
            "--cta-text" => request.cta_text = Some(take_value(args, &mut index, "--cta-text")?.to_string()),
            "--mood" => request.mood = take_value(args, &mut index, "--mood")?.to_string(),
            "--color-intensity" => {
                request.color_intensity =
                    take_value(args, &mut index, "--color-intensity")?.to_string()
            }
            "--no-logo" => request.logo = LogoSpec::default(),
            "--help" | "-h" => return Err(anyhow!(usage())),
            other => return Err(anyhow!("Unknown sns argument: {other}\n{}", usage())),
        }
        index += 1;
    }

    if request.headline.trim().is_empty() {
        return Err(anyhow!("--headline is required"));
    }
    Ok(request)
}

struct CarouselArgs {
    theme: String,
    pages: Vec<PageType>,
    platform: String,
    mood: String,
    location: Option<String>,
    trainer: Option<String>,
}

fn parse_carousel_args(args: &[String]) -> anyhow::Result<CarouselArgs> {
    let mut theme = String::new();
    let mut pages = SequencePreset::Full.page_types().to_vec();
    let mut platform = "instagram_feed".to_string();
    let mut mood = "やや落ち着いた".to_string();
    let mut location = None;
    let mut trainer = None;

    let mut index = 2;
    while index < args.len() {
        match args[index].as_str() {
            "--theme" => theme = take_value(args, &mut index, "--theme")?.to_string(),
            "--preset" => {
                let value = take_value(args, &mut index, "--preset")?;
                let preset = SequencePreset::parse(value).map_err(|err| anyhow!("{err}"))?;
                pages = preset.page_types().to_vec();
            }
            "--pages" => {
                let value = take_value(args, &mut index, "--pages")?;
                pages = parse_page_list(value).map_err(|err| anyhow!("{err}"))?;
            }
            "--platform" => platform = take_value(args, &mut index, "--platform")?.to_string(),
            "--mood" => mood = take_value(args, &mut index, "--mood")?.to_string(),
            "--location" => location = Some(take_value(args, &mut index, "--location")?.to_string()),
            "--trainer" => trainer = Some(take_value(args, &mut index, "--trainer")?.to_string()),
            "--help" | "-h" => return Err(anyhow!(usage())),
            other => return Err(anyhow!("Unknown carousel argument: {other}\n{}", usage())),
        }
        index += 1;
    }

    if theme.trim().is_empty() {
        return Err(anyhow!("--theme is required"));
    }
    Ok(CarouselArgs {
        theme,
        pages,
        platform,
        mood,
        location,
        trainer,
    })
}

async fn run_photo(args: &[String]) -> CliResult {
    let request = parse_photo_args(args)?;
    let claude = ClaudeClient::new()?;
    let gemini = GeminiImageClient::new()?;

    let mut references = Vec::new();
    if let Some(background) = assets::load_background(&request.location) {
        references.push(background);
    }
    let background_selected = !references.is_empty();
    if let Some(trainer) = request.trainer.as_deref() {
        references.extend(assets::load_trainer_references(trainer));
    }

    let request = GenerationRequest {
        background_selected,
        ..request
    };

    let generated = pipeline::generate_photo(&claude, &gemini, &request, references).await?;
    if let Some(commentary) = generated.commentary.as_deref() {
        info!("Model commentary: {commentary}");
    }
    let path = output::save_single(&output::run_stamp(), &generated.bytes)?;
    println!("{}", path.display());
    Ok(())
}

async fn run_sns(args: &[String]) -> CliResult {
    let request = parse_sns_args(args)?;
    let claude = ClaudeClient::new()?;
    let gemini = GeminiImageClient::new()?;

    let generated = pipeline::generate_sns(&claude, &gemini, &request, Vec::new()).await?;
    if let Some(commentary) = generated.commentary.as_deref() {
        info!("Model commentary: {commentary}");
    }
    let path = output::save_single(&output::run_stamp(), &generated.bytes)?;
    println!("{}", path.display());
    Ok(())
}

async fn run_carousel(args: &[String]) -> CliResult {
    let carousel = parse_carousel_args(args)?;
    let claude = ClaudeClient::new()?;
    let gemini = GeminiImageClient::new()?;

    let trainer_references = carousel
        .trainer
        .as_deref()
        .map(assets::load_trainer_references)
        .unwrap_or_default();
    let background_reference = carousel
        .location
        .as_deref()
        .and_then(assets::load_background);

    let options = SequenceOptions {
        theme: carousel.theme.clone(),
        pages: carousel.pages.clone(),
        platform: carousel.platform.clone(),
        mood: carousel.mood.clone(),
        aspect_ratio: compose::sns::aspect_ratio_for_platform(&carousel.platform).to_string(),
        trainer_references,
        background_reference,
        max_output_tokens: CONFIG.claude_max_tokens,
    };

    let report = MultiPageSequencer::new(&claude, &gemini).run(&options).await;

    let stamp = output::run_stamp();
    let mut saved = 0usize;
    for page in &report.pages {
        match (&page.status, page.image.as_deref()) {
            (PageStatus::Done, Some(bytes)) => {
                let path = output::save_page(&stamp, page.page_number, bytes)?;
                println!("{}", path.display());
                saved += 1;
            }
            _ => {
                warn!(
                    "Page {} ({}) failed: {}",
                    page.page_number,
                    page.page_type.key(),
                    page.error.as_deref().unwrap_or("no image returned")
                );
            }
        }
    }

    let failed = report.failed_pages();
    info!(
        "Carousel '{}': {saved}/{} pages saved, {} failed",
        report.theme,
        report.pages.len(),
        failed.len()
    );
    if !failed.is_empty() {
        return Err(format!("pages failed: {failed:?}").into());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> CliResult {
    dotenv().ok();
    let _guards = init_logging();

    CONFIG.require_api_keys()?;

    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(|value| value.as_str()) {
        Some("photo") => run_photo(&args).await,
        Some("sns") => run_sns(&args).await,
        Some("carousel") => run_carousel(&args).await,
        Some("--help") | Some("-h") | None => {
            println!("{}", usage());
            Ok(())
        }
        Some(other) => Err(format!("Unknown command: {other}\n{}", usage()).into()),
    }
}
