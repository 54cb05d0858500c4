mod logging;

use ai_post_core::{
    AiPost, AspectRatio, ColorPalette, Font, QuotePlacement, StyleSelection, Workflow,
    config::Config,
    export::{hashtag_line, save_png, save_post},
    init,
};
use anyhow::{Context, Result, anyhow};
use arboard::Clipboard;
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Override the text model defined in .env
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// Override the image editing model defined in .env
    #[arg(long, global = true)]
    image_model: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open the studio window (the default)
    Studio {
        /// Directory the downloaded post is saved into
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Turn a photo into a post
    Edit(EditArgs),
    /// Generate an image from a text prompt
    Generate {
        #[arg(trailing_var_arg = true, required = true)]
        prompt: Vec<String>,

        /// One of 1:1, 16:9, 9:16, 4:3 or 3:4
        #[arg(short, long, default_value = "1:1", value_parser = parse_aspect_ratio)]
        aspect_ratio: AspectRatio,

        #[arg(short, long, default_value = "ai-generated-image.png")]
        out: PathBuf,
    },
    /// Print a motivational quote
    Quote,
    /// Print hashtags for a caption or description
    Hashtags {
        #[arg(trailing_var_arg = true, required = true)]
        context: Vec<String>,

        /// Copy the hashtags to the clipboard
        #[arg(short, long)]
        copy: bool,
    },
}

#[derive(Args, Debug)]
struct EditArgs {
    /// Photo to start from
    file: PathBuf,

    /// What to change about the photo
    #[arg(short, long)]
    instruction: Option<String>,

    /// Quote to render onto the photo
    #[arg(short, long, conflicts_with = "generate_quote")]
    quote: Option<String>,

    /// Ask Gemini for a quote instead of passing one
    #[arg(long)]
    generate_quote: bool,

    #[arg(long, default_value = "Montserrat", value_parser = parse_font)]
    font: Font,

    #[arg(long, default_value = "Alpine Snow", value_parser = parse_color)]
    color: ColorPalette,

    #[arg(long, default_value = "top", value_parser = parse_placement)]
    placement: QuotePlacement,

    /// Watermark text such as @yourhandle
    #[arg(short, long)]
    watermark: Option<String>,

    /// Also generate hashtags for the result
    #[arg(long)]
    hashtags: bool,

    /// Copy the hashtags to the clipboard
    #[arg(short, long, requires = "hashtags")]
    copy: bool,

    /// Directory the post is saved into
    #[arg(short, long, default_value = ".")]
    out: PathBuf,
}

fn parse_font(input: &str) -> std::result::Result<Font, String> {
    Font::parse(input).ok_or_else(|| format!("unknown font '{}'", input))
}

fn parse_color(input: &str) -> std::result::Result<ColorPalette, String> {
    ColorPalette::parse(input).ok_or_else(|| format!("unknown color '{}'", input))
}

fn parse_placement(input: &str) -> std::result::Result<QuotePlacement, String> {
    QuotePlacement::parse(input).ok_or_else(|| format!("unknown placement '{}'", input))
}

fn parse_aspect_ratio(input: &str) -> std::result::Result<AspectRatio, String> {
    AspectRatio::parse(input).ok_or_else(|| format!("unknown aspect ratio '{}'", input))
}

#[tokio::main]
async fn main() -> Result<()> {
    init();
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.json_logs);

    // Load config and override models if specified via CLI
    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(m) = cli.model {
        config.model_name = m;
    }
    if let Some(m) = cli.image_model {
        config.image_model_name = m;
    }

    let app = AiPost::with_config(config).context("Failed to initialize Gemini client")?;

    match cli.command.unwrap_or(Command::Studio { out: PathBuf::from(".") }) {
        Command::Studio { out } => {
            // eframe runs its own event loop on this thread
            tokio::task::block_in_place(|| app.run_interactive(out))
                .context("Failed to run the studio")?;
        }
        Command::Edit(args) => run_edit(&app, args).await?,
        Command::Generate {
            prompt,
            aspect_ratio,
            out,
        } => {
            let mut flow = app.workflow();
            with_spinner(
                format!("Generating image with {}...", app.config().imagen_model_name),
                flow.generate(&prompt.join(" "), aspect_ratio),
            )
            .await
            .context("Image generation failed")?;

            let image = flow
                .session()
                .working_image()
                .ok_or_else(|| anyhow!("No image was generated"))?;
            save_png(image, &out).context("Failed to save generated image")?;
            println!("Saved {}", out.display());
        }
        Command::Quote => {
            let mut flow = app.workflow();
            with_spinner("Writing a quote...".to_string(), flow.quote())
                .await
                .context("Quote generation failed")?;
            println!("{}", flow.session().quote());
        }
        Command::Hashtags { context, copy } => {
            let mut flow = app.workflow();
            flow.session_mut().set_quote(context.join(" "));
            print_hashtags(&mut flow, copy).await?;
        }
    }

    Ok(())
}

async fn run_edit(app: &AiPost, args: EditArgs) -> Result<()> {
    let mut flow = app.workflow();
    flow.upload(&args.file)
        .await
        .with_context(|| format!("Failed to load {}", args.file.display()))?;

    if let Some(instruction) = args.instruction {
        flow.session_mut().set_instruction(instruction);
    }
    if let Some(watermark) = args.watermark {
        flow.session_mut().set_watermark(watermark);
    }
    if let Some(quote) = args.quote {
        flow.session_mut().set_quote(quote);
    } else if args.generate_quote {
        with_spinner("Writing a quote...".to_string(), flow.quote())
            .await
            .context("Quote generation failed")?;
        println!("Quote: {}", flow.session().quote());
    }

    flow.set_style(StyleSelection {
        font: args.font,
        palette: args.color,
        placement: args.placement,
    });

    with_spinner(
        format!("Editing with {}...", app.config().image_model_name),
        flow.edit(),
    )
    .await
    .context("Image edit failed")?;

    let path = save_post(flow.session().edited_image(), &args.out).context("Failed to save post")?;
    println!("Saved {}", path.display());

    if args.hashtags {
        print_hashtags(&mut flow, args.copy).await?;
    }
    Ok(())
}

async fn print_hashtags(flow: &mut Workflow, copy: bool) -> Result<()> {
    with_spinner("Finding trending hashtags...".to_string(), flow.hashtags())
        .await
        .context("Hashtag generation failed")?;

    let line = hashtag_line(flow.session().hashtags());
    println!("{}", line);

    if copy && !line.is_empty() {
        match Clipboard::new() {
            Ok(mut clipboard) => {
                if let Err(e) = clipboard.set_text(line) {
                    eprintln!("Warning: Failed to copy to clipboard: {}", e);
                } else {
                    println!("(Copied to clipboard)");
                }
            }
            Err(e) => eprintln!("Warning: Could not access clipboard: {}", e),
        }
    }
    Ok(())
}

/// Shows a spinner on stderr while `task` runs.
async fn with_spinner<T>(message: String, task: impl Future<Output = T>) -> T {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
        .template("{spinner:.green} {msg}")
    {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = task.await;
    spinner.finish_and_clear();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_studio() {
        let cli = Cli::try_parse_from(["ai-post", "--verbose"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.verbose);
    }

    #[test]
    fn edit_parses_style_flags() {
        let cli = Cli::try_parse_from([
            "ai-post",
            "edit",
            "photo.jpg",
            "--quote",
            "Go outside",
            "--font",
            "caveat",
            "--color",
            "golden hour",
            "--placement",
            "bottom",
            "--hashtags",
            "--copy",
        ])
        .unwrap();

        let Some(Command::Edit(args)) = cli.command else {
            panic!("expected edit");
        };
        assert_eq!(args.font, Font::Caveat);
        assert_eq!(args.color, ColorPalette::GoldenHour);
        assert_eq!(args.placement, QuotePlacement::Bottom);
        assert_eq!(args.quote.as_deref(), Some("Go outside"));
    }

    #[test]
    fn quote_and_generate_quote_conflict() {
        let result = Cli::try_parse_from([
            "ai-post",
            "edit",
            "photo.jpg",
            "--quote",
            "x",
            "--generate-quote",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn generate_joins_prompt_words() {
        let cli = Cli::try_parse_from(["ai-post", "generate", "-a", "9:16", "misty", "lake"]).unwrap();
        let Some(Command::Generate {
            prompt,
            aspect_ratio,
            ..
        }) = cli.command
        else {
            panic!("expected generate");
        };
        assert_eq!(prompt.join(" "), "misty lake");
        assert_eq!(aspect_ratio, AspectRatio::Story);
    }
}
