use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use post_excerpt::{config, document::Document, excerpts, html, output, posts};
use std::path::{Path, PathBuf};

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "post-excerpt")]
#[command(about = "Plain-text excerpts and previews from CMS rich-text posts")]
#[command(long_about = "\
Plain-text excerpts and previews from CMS rich-text posts

Reads the rich-text bodies exported from the content store and produces
preview excerpts: a display text cut to a maximum length, plus a flat
fragment list in which code blocks are shortened and inline code is kept.

Source layout:

  content/
  ├── config.toml        # Excerpt config (optional)
  ├── posts.en.json      # find(\"posts\", locale=en) response
  └── posts.ru.json      # find(\"posts\", locale=ru) response

Run 'post-excerpt gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Directory holding exports and config.toml
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
    Html,
}

#[derive(Subcommand)]
enum Command {
    /// Summarize a single rich-text document file
    Summarize {
        /// Editor JSON (`{ "root": .. }` or a bare node)
        file: PathBuf,
        /// Maximum summary length in characters, 0 disables truncation
        /// (defaults to config)
        #[arg(long)]
        max_length: Option<usize>,
        #[arg(long, value_enum, default_value = "text")]
        format: Format,
    },
    /// Summarize every exported post and write excerpts.json
    Build,
    /// Read and summarize exports without writing anything
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Command::Summarize {
            file,
            max_length,
            format,
        } => {
            let site_config = config::load_config(&cli.source)?;
            let content = std::fs::read_to_string(&file)?;
            let document = Document::from_json_str(&content)?;
            let max_length =
                max_length.map_or(site_config.excerpt.max_length(), config::length_limit);
            let summary = site_config
                .excerpt
                .normalizer()
                .summarize(&document, max_length);
            match format {
                Format::Text => output::print_summary_output(summary.as_ref()),
                Format::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
                Format::Html => println!("{}", html::render_excerpt(summary.as_ref()).into_string()),
            }
        }
        Command::Build => {
            let site_config = config::load_config(&cli.source)?;
            init_thread_pool(&site_config.processing);

            println!("==> Scanning {}", cli.source.display());
            let exports = posts::scan_exports(&cli.source, &site_config.locales)?;
            output::print_scan_output(&exports);

            println!("==> Summarizing");
            let manifest = excerpts::build_excerpts(&exports, &site_config.excerpt);
            output::print_build_output(&manifest);

            excerpts::write_manifest(&manifest, &cli.output)?;
            println!("==> Wrote {}", manifest_path(&cli.output).display());
        }
        Command::Check => {
            let site_config = config::load_config(&cli.source)?;
            init_thread_pool(&site_config.processing);
            println!("==> Checking {}", cli.source.display());
            let exports = posts::scan_exports(&cli.source, &site_config.locales)?;
            output::print_scan_output(&exports);
            let manifest = excerpts::build_excerpts(&exports, &site_config.excerpt);
            output::print_build_output(&manifest);
            println!("==> Exports are valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    info!("using {threads} summarizing threads");
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

fn manifest_path(output_dir: &Path) -> PathBuf {
    output_dir.join(excerpts::MANIFEST_FILENAME)
}
