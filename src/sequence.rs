//! Sequence loading. Input files are FASTA-like: lines starting with `>` are headers and are
//! skipped, every other line is concatenated as-is.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::r#const::PADDING;
use crate::{Error, Result};

/// A sequence followed by [`PADDING`] copies of a fill byte, so that windows starting anywhere
/// in `0..len()` may be read without bounds checks and SIMD loads may overrun the window.
#[derive(Debug, Clone)]
pub struct Sequence {
    bytes: Vec<u8>,
    len: usize,
    headers: Vec<String>,
}

impl Sequence {
    pub fn new(residues: &[u8], fill: u8) -> Self {
        let mut bytes = Vec::with_capacity(residues.len() + PADDING);
        bytes.extend_from_slice(residues);
        Self::finish(bytes, fill, vec![])
    }

    pub fn load(path: impl AsRef<Path>, fill: u8) -> Result<Self> {
        let path = path.as_ref();
        let input_error = |source| Error::Input {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(input_error)?;
        let file_len = file.metadata().map(|m| m.len()).unwrap_or(0);
        let sequence = Self::from_reader(BufReader::new(file), fill).map_err(input_error)?;

        log::info!(
            "Loaded {} effective bytes (file size: {}b) from {}",
            sequence.len(),
            file_len,
            path.display()
        );
        Ok(sequence)
    }

    pub fn from_reader<R: Read>(reader: BufReader<R>, fill: u8) -> std::io::Result<Self> {
        let mut bytes = Vec::new();
        let mut headers = Vec::new();

        for line in reader.split(b'\n') {
            let mut line = line?;
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            if line.first() == Some(&b'>') {
                let header = String::from_utf8_lossy(&line).into_owned();
                log::info!("{header}");
                headers.push(header);
                continue;
            }
            bytes.extend_from_slice(&line);
        }

        Ok(Self::finish(bytes, fill, headers))
    }

    fn finish(mut bytes: Vec<u8>, fill: u8, headers: Vec<String>) -> Self {
        let len = bytes.len();
        bytes.resize(len + PADDING, fill);
        Self {
            bytes,
            len,
            headers,
        }
    }

    /// Number of window start positions, excluding padding
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn residues(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// The sequence including its padding
    pub fn padded(&self) -> &[u8] {
        &self.bytes
    }

    /// Header lines (including the leading `>`) in file order
    pub fn headers(&self) -> &[String] {
        &self.headers
    }
}
