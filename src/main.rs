//! auix - Low-code CRUD views from resource metadata
//!
//! This is the binary entry point. All logic lives in the library.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use auix::{demo_site, demo_store, run_events};
use auix_app::config::load_settings;
use auix_app::ViewInstance;
use auix_core::logging::LogOptions;
use auix_render::{render_view, BasicComponents};

/// auix - Low-code CRUD views from resource metadata
#[derive(Parser, Debug)]
#[command(name = "auix")]
#[command(about = "Generate and drive CRUD views for the bundled demo site", long_about = None)]
struct Args {
    /// Project directory holding `.auix/config.toml`
    #[arg(long, value_name = "DIR")]
    config: Option<PathBuf>,

    /// Also write log records to stderr
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the page at PATH to stdout
    Render {
        #[arg(value_name = "PATH")]
        path: String,
    },
    /// List every generated route
    Routes,
    /// Mount PATH and apply JSON events read from stdin (headless mode)
    Events {
        #[arg(value_name = "PATH")]
        path: String,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let log_options = LogOptions::default().with_stderr(args.verbose);
    if let Err(e) = auix_core::logging::init(&log_options) {
        eprintln!("Logging unavailable: {}", e);
    }

    let project = args
        .config
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
    let settings = load_settings(&project);

    let store = demo_store()?;
    let site = demo_site(&store, &settings.compile_options())?;

    match args.command {
        Command::Render { path } => {
            let instance = ViewInstance::mount(site, &path, settings)?;
            let page = render_view(instance.site(), instance.state(), &BasicComponents)?;
            println!("{}", page.to_html());
        }
        Command::Routes => {
            for (pattern, resource, action) in site.routes().describe() {
                println!("{:<40} {:<24} {}", pattern, resource.as_str(), action.as_str());
            }
        }
        Command::Events { path } => run_events(site, &path, settings).await?,
    }
    Ok(())
}
