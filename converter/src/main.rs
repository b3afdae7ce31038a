//! `tracecvt`: converts a gzip-compressed MacSim CPU trace into a K6
//! memory-access trace (`0x<address> <TAG> <cycle>` per line).

use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use tracecvt_decoder::{convert, init_logger, DecoderConfig, Outcome, DEFAULT_CHUNK_SIZE};
use tracing::debug;

#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// MacSim trace to convert
    #[arg(default_value = "trace.raw")]
    input: PathBuf,

    /// Where to write the memory-access trace (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Decompressed bytes pulled from the input per refill
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,
}

fn open_sink(output: Option<&PathBuf>) -> Result<Box<dyn Write>> {
    Ok(match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Unable to create output file {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger();
    debug!(?args, "starting");

    let input = File::open(&args.input)
        .with_context(|| format!("Unable to open trace file {}", args.input.display()))?;
    let sink = open_sink(args.output.as_ref())?;
    let config = DecoderConfig {
        chunk_size: args.chunk_size,
    };

    let outcome = convert(BufReader::new(input), sink, config)
        .with_context(|| format!("Unable to convert {}", args.input.display()))?;
    match outcome {
        Outcome::Converted(stats) => stats.log_summary(),
        Outcome::Skipped => debug!(input = %args.input.display(), "not a MacSim trace, skipped"),
    }

    Ok(())
}
