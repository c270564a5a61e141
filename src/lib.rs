pub mod config;
pub mod logging;
pub mod model;
pub mod provider;
pub mod runtime;
pub mod search;
pub mod select;
pub mod ui;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{CommandFactory, Parser, Subcommand};

use config::PickerConfig;
use logging::{LogTarget, Verbosity};
use model::types::{Asset, Photo};
use provider::{AnyProvider, FixtureProvider, PhotoProvider, UnsplashProvider};
use runtime::{PickerEvent, PickerHost, PickerRuntime};
use search::PickerError;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (built ",
    env!("VERGEN_BUILD_DATE"),
    ", ",
    env!("VERGEN_CARGO_TARGET_TRIPLE"),
    ")"
);

/// Command-line interface.
#[derive(Parser, Debug)]
#[command(
    name = "photo-picker",
    version,
    long_version = LONG_VERSION,
    about = "Search a photo provider and pick a photo from the terminal"
)]
pub struct Cli {
    /// Serve photos from a JSON fixture instead of the Unsplash API
    #[arg(long, global = true, env = "PHOTO_PICKER_FIXTURE")]
    pub fixture: Option<PathBuf>,

    /// Config file (defaults to the platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// More logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Launch the interactive picker
    Tui {
        /// Override data dir (UI state and logs)
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// Print search results
    Search {
        /// Free-text query; empty lists the latest photos
        #[arg(default_value = "")]
        query: String,

        /// Number of pages to load
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        pages: u32,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Resolve the download of one result and print the asset as JSON
    Pick {
        #[arg(default_value = "")]
        query: String,

        /// Zero-based position in the result list
        #[arg(long, default_value_t = 0)]
        index: usize,
    },
    /// Generate shell completions to stdout
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Generate man page to stdout
    Man,
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    let verbosity = Verbosity {
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::Tui { data_dir } => {
            let data_dir = data_dir.unwrap_or_else(default_data_dir);
            let _guard = logging::init(verbosity, LogTarget::File(data_dir.join("logs")))?;
            let config = PickerConfig::load(cli.config.as_deref())?;
            let provider = build_provider(cli.fixture, &config)?;
            if let Some(asset) = ui::tui::run_tui(provider, &config.ui, &data_dir)? {
                println!("{}", serde_json::to_string_pretty(&asset)?);
            }
            Ok(())
        }
        Commands::Search { query, pages, json } => {
            logging::init(verbosity, LogTarget::Stderr)?;
            let config = PickerConfig::load(cli.config.as_deref())?;
            let provider = build_provider(cli.fixture, &config)?;
            run_search(provider, &query, pages, json).await
        }
        Commands::Pick { query, index } => {
            logging::init(verbosity, LogTarget::Stderr)?;
            let config = PickerConfig::load(cli.config.as_deref())?;
            let provider = build_provider(cli.fixture, &config)?;
            let asset = run_pick(provider, &query, index).await?;
            println!("{}", serde_json::to_string_pretty(&asset)?);
            Ok(())
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "photo-picker", &mut std::io::stdout());
            Ok(())
        }
        Commands::Man => {
            let cmd = Cli::command();
            let man = clap_mangen::Man::new(cmd);
            let mut out = std::io::stdout();
            man.render(&mut out)?;
            Ok(())
        }
    }
}

fn build_provider(fixture: Option<PathBuf>, config: &PickerConfig) -> Result<Arc<AnyProvider>> {
    let provider = match fixture {
        Some(path) => AnyProvider::Fixture(FixtureProvider::from_path(&path)?),
        None => AnyProvider::Unsplash(
            UnsplashProvider::new(&config.provider).context("building Unsplash client")?,
        ),
    };
    Ok(Arc::new(provider))
}

/// Host for one-shot commands: collects what the picker reports.
#[derive(Default)]
struct CommandHost {
    assets: Vec<Asset>,
    errors: Vec<String>,
}

impl PickerHost for CommandHost {
    fn on_select(&mut self, assets: Vec<Asset>) {
        self.assets.extend(assets);
    }

    fn on_close(&mut self) {}

    fn on_error(&mut self, error: &PickerError) {
        self.errors.push(error.to_string());
    }
}

impl CommandHost {
    fn take_error(&mut self) -> Result<()> {
        match self.errors.pop() {
            Some(err) => bail!(err),
            None => Ok(()),
        }
    }
}

/// Drive a runtime through `query` until `pages` pages are loaded or the
/// results run out.
async fn load_pages<P: PhotoProvider>(
    runtime: &mut PickerRuntime<P>,
    host: &mut CommandHost,
    query: &str,
    pages: u32,
) -> Result<()> {
    if query.is_empty() {
        runtime.activate();
    } else {
        runtime.handle(PickerEvent::QueryChanged(query.to_string()), host);
    }
    runtime.settle(host).await;
    host.take_error()?;
    while runtime.search().page() < pages && !runtime.search().is_exhausted() {
        runtime.handle(PickerEvent::ScrollThresholdReached, host);
        runtime.settle(host).await;
        host.take_error()?;
    }
    Ok(())
}

async fn run_search(provider: Arc<AnyProvider>, query: &str, pages: u32, json: bool) -> Result<()> {
    let mut runtime = PickerRuntime::new(provider);
    let mut host = CommandHost::default();
    load_pages(&mut runtime, &mut host, query, pages).await?;

    let photos = runtime.search().photos();
    if json {
        println!("{}", serde_json::to_string_pretty(photos)?);
    } else if photos.is_empty() {
        println!("No photos found");
    } else {
        for (i, photo) in photos.iter().enumerate() {
            println!("{}", summary_line(i, photo));
        }
    }
    Ok(())
}

fn summary_line(index: usize, photo: &Photo) -> String {
    format!(
        "{index:>3}  {:<12}  {:<24}  {}x{}  {}",
        photo.id.as_str(),
        photo.user.name,
        photo.width,
        photo.height,
        photo.caption().unwrap_or("-")
    )
}

pub async fn run_pick(provider: Arc<AnyProvider>, query: &str, index: usize) -> Result<Asset> {
    let mut runtime = PickerRuntime::new(provider);
    let mut host = CommandHost::default();
    load_pages(&mut runtime, &mut host, query, 1).await?;

    while runtime.search().photos().len() <= index && !runtime.search().is_exhausted() {
        runtime.handle(PickerEvent::ScrollThresholdReached, &mut host);
        runtime.settle(&mut host).await;
        host.take_error()?;
    }

    let Some(photo) = runtime.search().photos().get(index) else {
        bail!(
            "no photo at index {index} ({} results)",
            runtime.search().photos().len()
        );
    };
    let id = photo.id.clone();
    runtime.handle(PickerEvent::PhotoClicked(id), &mut host);
    runtime.run_until_idle(&mut host).await;
    host.take_error()?;
    host.assets
        .pop()
        .context("selection finished without an asset")
}

pub fn default_data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "photo-picker", "photo-picker")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".photo-picker"))
}
