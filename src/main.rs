use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use labelsmith::{
    AppState, DisabledProvider, FieldKey, HttpMailer, HttpRowSource, ImageProvider, MailerConfig,
    NormalizeOptions, Notifier, Orientation, PageSize, QrServerClient, QrServerConfig,
    RenderConfig, RowSource, RowSourceConfig, ServiceConfig, build_router, normalize,
    read_input_file, render,
};

#[derive(Parser)]
#[command(name = "labelsmith")]
#[command(author, version, about = "Pallet label PDF generation service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP service
    Serve {
        /// Bind address
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Bind port
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Render labels from a local input file
    Render {
        /// Input file: JSON entries or a delimited text blob
        #[arg(short, long)]
        input: PathBuf,

        /// Output PDF path
        #[arg(short, long, default_value = "shipment_label.pdf")]
        output: PathBuf,

        /// Sort the batch by this field before rendering
        #[arg(long, value_parser = parse_field_key)]
        sort_by: Option<FieldKey>,

        /// Page size (a4 or a5)
        #[arg(long, default_value = "a5")]
        page_size: PageSize,

        /// Page orientation (portrait or landscape)
        #[arg(long, default_value = "landscape")]
        orientation: Orientation,

        /// Render without fetching QR images
        #[arg(long)]
        skip_qr: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

fn parse_field_key(value: &str) -> Result<FieldKey, String> {
    FieldKey::from_key(value).ok_or_else(|| format!("unknown field '{value}'"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            host,
            port,
            verbose,
        } => {
            setup_logging(verbose);
            serve(host, port).await
        }
        Commands::Render {
            input,
            output,
            sort_by,
            page_size,
            orientation,
            skip_qr,
            verbose,
        } => {
            setup_logging(verbose);
            render_file(input, output, sort_by, page_size, orientation, skip_qr).await
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

async fn serve(host: String, port: u16) -> Result<()> {
    let config = ServiceConfig::from_env();

    let provider: Arc<dyn ImageProvider> = Arc::new(
        QrServerClient::new(QrServerConfig::from_env())
            .context("Failed to build QR provider client")?,
    );

    let notifier: Option<Arc<dyn Notifier>> = match MailerConfig::from_env() {
        Ok(mailer_config) => Some(Arc::new(
            HttpMailer::new(mailer_config).context("Failed to build mail relay client")?,
        ) as Arc<dyn Notifier>),
        Err(_) => {
            info!("mail relay not configured, notifications disabled");
            None
        }
    };

    let rows: Option<Arc<dyn RowSource>> = match RowSourceConfig::from_env() {
        Ok(source_config) => Some(Arc::new(
            HttpRowSource::new(source_config).context("Failed to build row source client")?,
        ) as Arc<dyn RowSource>),
        Err(_) => {
            info!("row source not configured, /fetch-and-generate disabled");
            None
        }
    };

    let state = AppState::new(provider, notifier, rows, config);
    let app = build_router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("labelsmith listening on {}", addr);
    info!("Endpoints:");
    info!("  - POST /generate-label");
    info!("  - GET  /fetch-and-generate");
    info!("  - GET  /");

    axum::serve(listener, app).await?;

    Ok(())
}

async fn render_file(
    input: PathBuf,
    output: PathBuf,
    sort_by: Option<FieldKey>,
    page_size: PageSize,
    orientation: Orientation,
    skip_qr: bool,
) -> Result<()> {
    info!("Loading label input from {:?}", input);
    let raw = read_input_file(&input).context("Failed to parse input file")?;

    let options = NormalizeOptions {
        sort_by,
        ..Default::default()
    };
    let batch = normalize(raw, &options);
    info!("Normalized {} records", batch.len());

    let config = RenderConfig {
        page_size,
        orientation,
    };

    let document = if skip_qr {
        render(&batch, &config, &DisabledProvider).await?
    } else {
        let provider = QrServerClient::new(QrServerConfig::from_env())
            .context("Failed to build QR provider client")?;
        render(&batch, &config, &provider).await?
    };

    document.write_to(&output)?;
    info!("Wrote {} pages to {:?}", document.page_count, output);
    if let Some(address) = document.final_address() {
        info!("Notification address: {}", address);
    }

    Ok(())
}
