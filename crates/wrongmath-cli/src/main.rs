use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;
use std::fs;
use wrongmath_render::{assemble, to_html, CachedRenderer, MathMlRenderer, RenderConfig};
use wrongmath_syntax::{normalize, Document, SegmentStats};

#[derive(Parser)]
#[command(name = "wrongmath")]
#[command(about = "Math/text segmentation tools for OCR output", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct InputArgs {
    /// Recognized text file (stdin if omitted)
    #[arg(value_name = "FILE")]
    path: Option<PathBuf>,

    /// Skip normalization and segment the text exactly as given
    #[arg(long)]
    raw: bool,

    /// JSON render config (defaults to the user config directory)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print normalized text
    Normalize {
        #[arg(value_name = "FILE")]
        path: Option<PathBuf>,
    },
    /// Emit segments as JSON
    Segment(InputArgs),
    /// Render to an HTML fragment with MathML
    Render(InputArgs),
    /// Emit segment counts as JSON
    Stats(InputArgs),
}

fn read_input(path: Option<&PathBuf>) -> anyhow::Result<String> {
    match path {
        Some(path) => {
            log::debug!("Reading input from {:?}", path);
            fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
        }
        None => {
            log::debug!("Reading input from stdin");
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn load_config(args: &InputArgs) -> anyhow::Result<RenderConfig> {
    let mut config = match &args.config {
        Some(path) => {
            log::debug!("Loading render config from {:?}", path);
            RenderConfig::load_from_path(path)?
        }
        None => RenderConfig::load_or_default(),
    };
    if args.raw {
        log::debug!("--raw given, skipping normalization");
        config.normalize = false;
    }
    Ok(config)
}

fn document(text: &str, config: &RenderConfig) -> Document {
    if config.normalize {
        Document::parse(text)
    } else {
        Document::from_normalized(text)
    }
}

fn run(command: &Commands, input: &str, config: &RenderConfig) -> anyhow::Result<String> {
    let output = match command {
        Commands::Normalize { .. } => normalize(input),
        Commands::Segment(_) => {
            let doc = document(input, config);
            serde_json::to_string_pretty(&doc.segments())?
        }
        Commands::Render(_) => {
            let doc = document(input, config);
            let renderer = CachedRenderer::new(MathMlRenderer);
            let units = assemble(&doc.segments(), doc.text(), &renderer);
            to_html(&units, config)
        }
        Commands::Stats(_) => {
            let doc = document(input, config);
            let stats = SegmentStats::collect(&doc.segments(), doc.text());
            serde_json::to_string_pretty(&stats)?
        }
    };
    Ok(output)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let (input, config) = match &cli.command {
        Commands::Normalize { path } => (read_input(path.as_ref())?, RenderConfig::default()),
        Commands::Segment(args) | Commands::Render(args) | Commands::Stats(args) => {
            (read_input(args.path.as_ref())?, load_config(args)?)
        }
    };

    println!("{}", run(&cli.command, &input, &config)?);
    Ok(())
}
