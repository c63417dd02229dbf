//! File-to-file driver around the streaming codec.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use rawlzw::{Decoder, Encoder};

#[derive(Parser)]
#[command(name = "rawlzw", version, about = "Compress or decompress a raw LZW code stream")]
struct Args {
    /// Operation to perform.
    #[arg(value_enum)]
    mode: Mode,
    /// Input file.
    input: PathBuf,
    /// Output file.
    output: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    /// Encode the input into a code stream.
    #[value(alias = "e")]
    Encode,
    /// Decode a code stream back into bytes.
    #[value(alias = "d")]
    Decode,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let input = File::open(&args.input)
        .with_context(|| format!("cannot open {}", args.input.display()))?;
    let output = File::create(&args.output)
        .with_context(|| format!("cannot open {}", args.output.display()))?;
    let reader = BufReader::new(input);
    let writer = BufWriter::new(output);

    match args.mode {
        Mode::Encode => {
            Encoder::new(writer)
                .encode_all(reader)
                .context("encoding failed")?;
        }
        Mode::Decode => {
            Decoder::new(writer)
                .decode_all(reader)
                .context("decoding failed")?;
        }
    }
    Ok(())
}
