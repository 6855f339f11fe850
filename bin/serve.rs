use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use ferret::{
    create_router, json_extractor, AppState, IndexBuilder, SearchIndex, SearchMetrics,
    ServerConfig,
};
use tracing::info;

#[derive(Parser)]
#[command(name = "ferret-serve")]
#[command(about = "Serve a ferret search index over HTTP", long_about = None)]
struct Args {
    /// File with one JSON document per line; builds the index in-process
    /// and enables /docs
    #[arg(short = 'd', long = "documents")]
    documents: Option<String>,

    /// Prebuilt index file (see ferret-index), or '-' for stdin
    #[arg(short = 'i', long = "index", default_value = "-")]
    index: String,

    /// HTTP host name to bind; empty means all interfaces
    #[arg(short = 'n', long = "host", default_value = "")]
    host: String,

    /// TCP port for the HTTP server
    #[arg(short = 'p', long = "port", default_value = "5000")]
    port: u16,

    /// JSON attribute holding the document id
    #[arg(long = "id", default_value = "id")]
    id_field: String,

    /// JSON attributes to index, comma separated
    #[arg(long = "content", default_value = "content", value_delimiter = ',')]
    content_fields: Vec<String>,

    /// Serve a static web app from this directory under /app
    #[arg(long = "app")]
    app_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    info!("ferret-serve v{}", ferret::VERSION);
    if let Some(documents) = &args.documents {
        info!("  documents file: {documents}");
        info!("  id attribute: {}", args.id_field);
        info!("  content attributes: {:?}", args.content_fields);
    } else {
        info!("  index file: {}", args.index);
    }
    if let Some(app_dir) = &args.app_dir {
        info!("  app folder: {}", app_dir.display());
    }

    let (index, docs) = if let Some(documents) = &args.documents {
        load_documents(documents, &args.id_field, &args.content_fields)?
    } else {
        (load_index(&args.index)?, None)
    };

    let config = ServerConfig {
        host: args.host,
        port: args.port,
        static_app_dir: args.app_dir,
    };
    info!("listening on {}", config.bind_addr());

    let metrics = SearchMetrics::new().context("metrics registry")?;
    let state = AppState {
        index,
        docs,
        metrics,
    };
    let router = create_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("cannot bind {}", config.bind_addr()))?;
    axum::serve(listener, router).await?;

    Ok(())
}

/// Load and index a documents file, keeping the raw documents for /docs.
fn load_documents(
    path: &str,
    id_field: &str,
    content_fields: &[String],
) -> Result<(SearchIndex, Option<ferret::JsonDocuments>)> {
    let input: Box<dyn io::BufRead> = if path == "-" {
        Box::new(BufReader::new(io::stdin()))
    } else {
        let file =
            File::open(path).with_context(|| format!("cannot open documents file {path}"))?;
        Box::new(BufReader::new(file))
    };

    let extractor = json_extractor(id_field, content_fields);
    let mut builder = IndexBuilder::new();
    let docs = match builder.load_and_index_json_stream(input, extractor) {
        Ok(docs) => docs,
        Err(err) => {
            builder.abort();
            bail!("loading documents failed: {err}");
        }
    };
    info!("documents loaded: {}", docs.len());

    let mut blob = Vec::new();
    builder.dump(&mut blob).context("index serialization failed")?;
    let index = SearchIndex::from_bytes(blob.into()).context("index validation failed")?;

    Ok((index, Some(docs)))
}

/// Load a prebuilt index file.
fn load_index(path: &str) -> Result<SearchIndex> {
    let index = if path == "-" {
        SearchIndex::from_reader(io::stdin())
    } else {
        let file = File::open(path).with_context(|| format!("cannot open index file {path}"))?;
        SearchIndex::from_reader(BufReader::new(file))
    };
    index.with_context(|| format!("cannot load index from {path}"))
}
