use crate::error::ConfigError;
use crate::markov::SquareMatrix;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write as _};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Round index line, one `{:.9},` row per line, two blank lines.
    #[default]
    Text,
    /// One JSON object per round per line.
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "text" | "csv" => Ok(OutputFormat::Text),
            "json" | "jsonl" => Ok(OutputFormat::Json),
            other => Err(ConfigError::UnknownFormat(other.to_string())),
        }
    }
}

#[derive(Serialize)]
struct RoundRecord<'a> {
    round: u32,
    size: usize,
    rows: Vec<&'a [f64]>,
}

pub fn write_round<W: Write>(
    writer: &mut W,
    format: OutputFormat,
    round: u32,
    matrix: &SquareMatrix,
) -> io::Result<()> {
    match format {
        OutputFormat::Text => writer.write_all(render_text_block(round, matrix).as_bytes()),
        OutputFormat::Json => {
            let record = RoundRecord {
                round,
                size: matrix.size(),
                rows: matrix.rows().collect(),
            };
            serde_json::to_writer(&mut *writer, &record)?;
            writer.write_all(b"\n")
        }
    }
}

pub fn render_text_block(round: u32, matrix: &SquareMatrix) -> String {
    let mut block = String::with_capacity(16 + matrix.size() * matrix.size() * 12);
    // Writing into a String cannot fail.
    let _ = writeln!(block, "{round}");
    for row in matrix.rows() {
        for value in row {
            let _ = write!(block, "{value:.9},");
        }
        block.push('\n');
    }
    block.push_str("\n\n");
    block
}

/// Buffered handle on the output file, or stdout when no path is given.
/// Files are created or truncated.
pub fn open_sink(path: Option<&Path>) -> io::Result<Box<dyn Write>> {
    match path {
        Some(path) => Ok(Box::new(BufWriter::new(File::create(path)?))),
        None => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
    }
}

/// Pass-through writer that hashes and counts every byte written.
pub struct DigestWriter<W: Write> {
    inner: W,
    hasher: blake3::Hasher,
    bytes_written: u64,
}

impl<W: Write> DigestWriter<W> {
    pub fn new(inner: W) -> Self {
        DigestWriter {
            inner,
            hasher: blake3::Hasher::new(),
            bytes_written: 0,
        }
    }

    /// Flushes the inner writer and returns it with the digest of
    /// everything written so far.
    pub fn finish(mut self) -> io::Result<(W, blake3::Hash, u64)> {
        self.inner.flush()?;
        Ok((self.inner, self.hasher.finalize(), self.bytes_written))
    }
}

impl<W: Write> Write for DigestWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.inner.write(buf)?;
        self.hasher.update(&buf[..written]);
        self.bytes_written += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
