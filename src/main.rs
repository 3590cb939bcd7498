use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sph_inout::case::{CaseDocument, CaseStore};
use sph_inout::models::ZoneShape;
use sph_inout::settings::ServerSettings;
use sph_inout::{api, render};

#[derive(Parser)]
#[command(name = "sphinout")]
#[command(about = "Inlet/Outlet zone configuration and GenCase XML export for DualSPHysics cases")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the case over HTTP for the designer GUI
    Serve {
        /// Case file to open and save (default: SPH_INOUT_CASE or case.json)
        #[arg(short, long)]
        case: Option<PathBuf>,

        /// Port for HTTP API (default: SPH_INOUT_PORT or 3000)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Write the Inlet/Outlet XML section of a case
    Render {
        /// Case file to read
        case: PathBuf,

        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Upgrade a case file to the current format
    Migrate {
        /// Case file to upgrade
        case: PathBuf,

        /// Output file; the case is rewritten in place when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Create an empty case file
    New {
        /// Case file to create
        case: PathBuf,

        /// Dimensionality of the case, which fixes the first zone's shape
        #[arg(short, long, value_enum, default_value = "3d")]
        dimension: Dimension,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Dimension {
    #[value(name = "2d")]
    TwoD,
    #[value(name = "3d")]
    ThreeD,
}

impl Dimension {
    fn first_zone(self) -> ZoneShape {
        match self {
            Self::TwoD => ZoneShape::Mk2d,
            Self::ThreeD => ZoneShape::Box,
        }
    }
}

/// Initialize tracing. Logs go to stderr so rendered XML can be piped from stdout.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "sph_inout=debug,tower_http=debug".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn serve(settings: ServerSettings) -> anyhow::Result<()> {
    tracing::info!("Starting sphinout server on port {}", settings.port);

    let store = CaseStore::open(settings.case_path.clone())?;
    let app = api::create_router(store, settings.cors_origins.as_deref());

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", settings.port)).await?;
    tracing::info!(
        "sphinout server listening on http://127.0.0.1:{}",
        settings.port
    );

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Some(Commands::Serve { case, port }) => {
            serve(ServerSettings::from_env().with_overrides(case, port)).await?;
        }
        Some(Commands::Render { case, output }) => {
            let doc = CaseDocument::load(&case)?;
            let xml = render::render(&doc.inout)
                .with_context(|| format!("Failed to render {}", case.display()))?;
            match output {
                Some(path) => {
                    std::fs::write(&path, xml)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    tracing::info!("Wrote Inlet/Outlet XML to {}", path.display());
                }
                None => println!("{}", xml),
            }
        }
        Some(Commands::Migrate { case, output }) => {
            let mut doc = CaseDocument::load(&case)?;
            doc.save(output.as_deref().unwrap_or(&case))?;
        }
        Some(Commands::New { case, dimension }) => {
            if case.exists() {
                anyhow::bail!("{} already exists", case.display());
            }
            let name = case
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
            let mut doc = CaseDocument::new(name);
            doc.inout.add_zone(dimension.first_zone())?;
            doc.save(&case)?;
        }
        None => {
            // Default: start server
            serve(ServerSettings::from_env()).await?;
        }
    }

    Ok(())
}
