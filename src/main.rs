// src/main.rs

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info, warn};

use memecap::captions::prompt::{build_request, caption_schema};
use memecap::ui::{AI_GROUP_ID, ButtonState, CaptionOption};
use memecap::{
    CaptionConfig, CaptionContext, CaptionGenerator, CaptionObserver, CaptionPage, CaptionSelect,
    EmojiPlacement, EmojiSelection, GeminiClient, PhotoData,
};

/// Hand-written captions the page offers before any AI run
const PRESET_CAPTIONS: &[&str] = &[
    "When the code finally compiles",
    "Me pretending to understand the meeting",
    "Monday, again",
];

#[derive(Parser)]
#[command(name = "memecap")]
#[command(about = "Generate meme captions for a photo and its emoji overlays with Gemini", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true, default_value_t = false)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask the model for captions and show the resulting caption list
    Generate {
        /// Photo to caption (jpeg, png, webp, ...)
        #[arg(short, long)]
        photo: Option<PathBuf>,

        /// Emoji overlay, as SYMBOL or SYMBOL@x,y,size (repeatable, order kept)
        #[arg(short, long = "emoji")]
        emojis: Vec<EmojiPlacement>,

        /// Gemini model (defaults to GEMINI_MODEL or gemini-2.5-flash)
        #[arg(short, long)]
        model: Option<String>,

        /// Gemini API key
        #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// Print the request that would be sent, without calling the API
        #[arg(long, default_value_t = false)]
        dry_run: bool,

        /// Print the final page state as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print the structured output schema sent with each request
    Schema,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if cli.debug {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    }

    match cli.command {
        Commands::Generate {
            photo,
            emojis,
            model,
            api_key,
            dry_run,
            json,
        } => {
            let mut config = CaptionConfig::from_env();
            if let Some(model) = model {
                config = config.with_model(model);
            }
            if api_key.is_some() {
                config.api_key = api_key;
            }

            let photo = photo
                .map(|path| {
                    PhotoData::from_file(&path)
                        .with_context(|| format!("Failed to load photo {}", path.display()))
                })
                .transpose()?;
            let ctx = CaptionContext::new(photo, emojis.into_iter().collect::<EmojiSelection>());

            if dry_run {
                print_request(&config, &ctx)?;
            } else {
                generate(&config, &ctx, json).await?;
            }
        }
        Commands::Schema => {
            println!("{}", serde_json::to_string_pretty(&caption_schema())?);
        }
    }

    Ok(())
}

/// Renders page changes to the terminal while the page is borrowed
struct TerminalObserver;

impl CaptionObserver for TerminalObserver {
    fn caption_changed(&self, caption: &str) {
        info!("Selected caption: {}", caption);
    }

    fn button_changed(&self, state: ButtonState) {
        match state {
            ButtonState::Busy => eprintln!("{}", state.label()),
            ButtonState::Idle => debug!("Button back to '{}'", state.label()),
        }
    }
}

fn preset_page() -> CaptionPage {
    let mut select = CaptionSelect::new();
    for caption in PRESET_CAPTIONS {
        select.add_option(CaptionOption::caption(*caption));
    }
    CaptionPage::new(select)
}

async fn generate(config: &CaptionConfig, ctx: &CaptionContext, json: bool) -> Result<()> {
    if let Err(e) = config.require_api_key() {
        debug!("{}", e);
    }

    let generator = CaptionGenerator::new(GeminiClient::from_config(config));
    let mut page = preset_page();

    let notifier = |message: &str| eprintln!("⚠️  {}", message);

    let result = generator
        .generate_captions(ctx, &mut page, &notifier, &TerminalObserver)
        .await;

    if json {
        println!("{}", serde_json::to_string_pretty(&page)?);
    } else if let Some(group) = page.select.group(AI_GROUP_ID) {
        println!("{}", group.label);
        for (i, option) in group.options.iter().enumerate() {
            let marker = if page.select.value() == Some(option.value.as_str()) {
                "*"
            } else {
                " "
            };
            println!("{} {}. {}", marker, i + 1, option.text);
        }
    }

    if let Err(e) = &result
        && !e.is_precondition()
    {
        warn!("Caption generation failed: {}", e);
    }
    result?;
    Ok(())
}

fn print_request(config: &CaptionConfig, ctx: &CaptionContext) -> Result<()> {
    let photo = ctx
        .photo
        .as_ref()
        .context("--dry-run needs --photo to build a request")?;

    let mut request = build_request(photo, &ctx.emojis);
    request.image.data = format!("<{} base64 chars>", request.image.data.len());

    println!("POST {}", config.generate_content_url());
    println!(
        "{}",
        serde_json::to_string_pretty(&GeminiClient::build_body(&request))?
    );
    Ok(())
}
