use clap::{Parser, Subcommand};
use docs_qr::config::{self, SiteConfig};
use docs_qr::generate::{self, BuildConfig};
use docs_qr::manifest::Manifest;
use docs_qr::resolve::{self, Resolution, ResolveError, SiteIndexSource, TargetSource};
use docs_qr::scan::ContentScanner;
use docs_qr::types::normalize_permalink;
use docs_qr::{naming, output};
use std::path::PathBuf;

fn version_string() -> &'static str {
    let on_tag = env!("DOCS_QR_ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("DOCS_QR_GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "docs-qr")]
#[command(about = "QR codes and a JSON manifest for flagged documentation pages")]
#[command(long_about = "\
QR codes and a JSON manifest for flagged documentation pages

Pages opt in through front-matter:

  ---
  title: Getting Started
  qr: true
  slug: /start            # optional, content scan only
  ---

Targets come from the host's exported document index (--index) when it has
flagged pages, otherwise from a scan of the content directory. Each target
gets one PNG and one manifest entry:

  static/qr/
  ├── _manifest.json       # [{\"title\", \"url\", \"file\"}, ...]
  ├── docs_intro.png       # /docs/intro
  └── home.png             # /

Run 'docs-qr gen-config' to generate a documented docs-qr.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Site directory (holds docs-qr.toml, the content dir and the output dir)
    #[arg(long, default_value = ".", global = true)]
    site_dir: PathBuf,

    /// Host document index export (JSON)
    #[arg(long, global = true)]
    index: Option<PathBuf>,

    /// Public site URL, overrides site.url
    #[arg(long, global = true)]
    site_url: Option<String>,

    /// Base path the site is served under, overrides site.base_url
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Output directory relative to the site directory, overrides output.dir
    #[arg(long, global = true)]
    output: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve targets, write QR images and the manifest
    Build,
    /// Resolve targets and show them without writing anything
    Scan,
    /// Parse every content document and report invalid front-matter
    Check,
    /// Show manifest entries, optionally filtered
    List {
        /// Case-insensitive match on title, URL or file
        #[arg(long)]
        query: Option<String>,
    },
    /// Show the image file name and URL derived for a permalink
    Filename { permalink: String },
    /// Show the image href the embed widget uses for a browser path
    Href { pathname: String },
    /// Print a stock docs-qr.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let load_site_config = || config::load_config(&cli.site_dir, cli_overrides(&cli));

    match &cli.command {
        Command::Build => {
            let site_config = load_site_config()?;
            let resolution = resolve_targets(&cli, &site_config)?;
            output::print_resolution(&resolution);

            init_thread_pool(&site_config.processing);
            let build_config = BuildConfig::from_site_config(&site_config, &cli.site_dir)?;
            println!();
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_generate_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let result = generate::generate(&resolution.targets, &build_config, Some(tx));
            printer
                .join()
                .map_err(|_| "progress printer thread panicked")?;
            output::print_build_report(&result?);
        }
        Command::Scan => {
            let site_config = load_site_config()?;
            let resolution = resolve_targets(&cli, &site_config)?;
            output::print_resolution(&resolution);
        }
        Command::Check => {
            let site_config = load_site_config()?;
            if cli.index.is_some() {
                let index = SiteIndexSource::load(cli.index.as_deref())?.discover()?;
                println!(
                    "Site index: {} documents, {} flagged",
                    index.considered,
                    index.targets.len()
                );
            }
            let content_dir = site_config.content_dir(&cli.site_dir);
            println!("==> Checking {}", content_dir.display());
            let discovery = ContentScanner::new(&content_dir, site_config.docs.route_base_path.as_str())
                .with_policy(config::ParseErrorPolicy::Skip)
                .scan()?;
            output::print_check_output(
                discovery.considered,
                discovery.targets.len(),
                &discovery.skipped,
            );
            if !discovery.skipped.is_empty() {
                return Err(format!(
                    "{} document(s) have invalid front-matter",
                    discovery.skipped.len()
                )
                .into());
            }
            println!("==> Content is valid");
        }
        Command::List { query } => {
            let site_config = load_site_config()?;
            let manifest = Manifest::load(&site_config.manifest_path(&cli.site_dir))?;
            output::print_manifest_list(manifest.filter(query.as_deref().unwrap_or("")));
        }
        Command::Filename { permalink } => {
            let site_config = load_site_config()?;
            let permalink = normalize_permalink(permalink);
            println!("{}", naming::filename_from_permalink(&permalink));
            println!("{}", site_config.site_base()?.page_url(&permalink)?);
        }
        Command::Href { pathname } => {
            let site_config = load_site_config()?;
            println!(
                "{}",
                naming::widget_href(
                    pathname,
                    &site_config.site.base_url,
                    &site_config.output.public_path
                )
            );
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Run target resolution: host index first, content scan as fallback.
fn resolve_targets(cli: &Cli, site_config: &SiteConfig) -> Result<Resolution, ResolveError> {
    let index = SiteIndexSource::load(cli.index.as_deref())?;
    let scanner = ContentScanner::new(
        site_config.content_dir(&cli.site_dir),
        site_config.docs.route_base_path.as_str(),
    )
    .with_policy(site_config.docs.on_parse_error);
    resolve::resolve(&index, &scanner)
}

/// Sparse config table built from command-line flags.
fn cli_overrides(cli: &Cli) -> Option<toml::Value> {
    let mut root = toml::Table::new();

    let mut site = toml::Table::new();
    if let Some(url) = &cli.site_url {
        site.insert("url".into(), toml::Value::String(url.clone()));
    }
    if let Some(base_url) = &cli.base_url {
        site.insert("base_url".into(), toml::Value::String(base_url.clone()));
    }
    if !site.is_empty() {
        root.insert("site".into(), toml::Value::Table(site));
    }

    if let Some(dir) = &cli.output {
        let mut output = toml::Table::new();
        output.insert("dir".into(), toml::Value::String(dir.clone()));
        root.insert("output".into(), toml::Value::Table(output));
    }

    (!root.is_empty()).then_some(toml::Value::Table(root))
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; the config can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
