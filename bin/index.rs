use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};

use anyhow::{Context, Result};
use clap::Parser;
use ferret::{json_extractor, IndexBuilder};
use tracing::info;

#[derive(Parser)]
#[command(name = "ferret-index")]
#[command(about = "Build a ferret search index from line-delimited JSON documents", long_about = None)]
struct Args {
    /// Input file with one JSON document per line, or '-' for stdin
    #[arg(short = 'i', long = "input", default_value = "-")]
    input: String,

    /// Output file for the serialized index, or '-' for stdout
    #[arg(short = 'o', long = "output", default_value = "-")]
    output: String,

    /// JSON attribute holding the document id
    #[arg(long = "id", default_value = "id")]
    id_field: String,

    /// JSON attributes to index, comma separated
    #[arg(long = "content", default_value = "content", value_delimiter = ',')]
    content_fields: Vec<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    info!("ferret-index v{}", ferret::VERSION);
    info!("  input file: {}", args.input);
    info!("  output file: {}", args.output);
    info!("  id attribute: {}", args.id_field);
    info!("  content attributes: {:?}", args.content_fields);

    let input: Box<dyn BufRead> = if args.input == "-" {
        Box::new(BufReader::new(io::stdin()))
    } else {
        let file = File::open(&args.input)
            .with_context(|| format!("cannot open input file {}", args.input))?;
        Box::new(BufReader::new(file))
    };

    let extractor = json_extractor(&args.id_field, &args.content_fields);
    let mut builder = IndexBuilder::new();
    let num_lines = builder
        .index_json_stream(input, extractor)
        .context("indexing failed")?;
    info!("lines indexed: {num_lines}");

    let mut output: Box<dyn Write> = if args.output == "-" {
        Box::new(BufWriter::new(io::stdout()))
    } else {
        let file = File::create(&args.output)
            .with_context(|| format!("cannot create output file {}", args.output))?;
        Box::new(BufWriter::new(file))
    };

    builder.dump(&mut output).context("serialization failed")?;
    output.flush()?;
    info!("done");

    Ok(())
}
