use crate::config::SignalFormat;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

const SAMPLE_BYTES: usize = std::mem::size_of::<f32>();

#[derive(Debug, Error)]
pub enum SignalError {
    /// The source could not be opened or read. Fatal before any distribution starts.
    #[error("cannot open data file '{}': {source}", path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("data file '{}' is malformed: {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },

    #[error("cannot write data file '{}': {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The full, immutable signal owned by the coordinator.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    samples: Vec<f32>,
}

impl Signal {
    pub fn from_samples(samples: Vec<f32>) -> Self {
        Self { samples }
    }

    /// Loads exactly `num_elements` samples from `path` in the given format.
    pub fn load(
        path: &Path,
        format: SignalFormat,
        num_elements: usize,
    ) -> Result<Self, SignalError> {
        tracing::info!(
            "Loading {} samples from {} ({:?})",
            num_elements,
            path.display(),
            format
        );

        let signal = match format {
            SignalFormat::Binary => {
                let bytes = std::fs::read(path).map_err(|source| SignalError::Unavailable {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::decode_binary(&bytes, num_elements).map_err(|reason| {
                    SignalError::Malformed {
                        path: path.to_path_buf(),
                        reason,
                    }
                })?
            }
            SignalFormat::Ascii => {
                let text =
                    std::fs::read_to_string(path).map_err(|source| SignalError::Unavailable {
                        path: path.to_path_buf(),
                        source,
                    })?;
                Self::parse_ascii(&text, num_elements).map_err(|reason| {
                    SignalError::Malformed {
                        path: path.to_path_buf(),
                        reason,
                    }
                })?
            }
        };

        tracing::debug!("Loaded signal of {} samples", signal.len());
        Ok(signal)
    }

    pub fn decode_binary(bytes: &[u8], num_elements: usize) -> Result<Self, String> {
        let expected = num_elements * SAMPLE_BYTES;
        if bytes.len() != expected {
            return Err(format!(
                "expected {} bytes ({} samples), found {}",
                expected,
                num_elements,
                bytes.len()
            ));
        }

        let samples = bytes
            .chunks_exact(SAMPLE_BYTES)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect();

        Ok(Self { samples })
    }

    pub fn parse_ascii(text: &str, num_elements: usize) -> Result<Self, String> {
        let mut samples = Vec::with_capacity(num_elements);

        for (index, token) in text.split_ascii_whitespace().enumerate() {
            if index == num_elements {
                return Err(format!("more than {} samples present", num_elements));
            }
            let value: f32 = token
                .parse()
                .map_err(|e| format!("token {} ('{}') is not a number: {}", index, token, e))?;
            samples.push(value);
        }

        if samples.len() != num_elements {
            return Err(format!(
                "expected {} samples, found {}",
                num_elements,
                samples.len()
            ));
        }

        Ok(Self { samples })
    }

    /// Writes the signal back out in a format [`Signal::load`] accepts.
    pub fn write(&self, path: &Path, format: SignalFormat) -> Result<(), SignalError> {
        let to_err = |source| SignalError::WriteFailed {
            path: path.to_path_buf(),
            source,
        };

        let file = File::create(path).map_err(to_err)?;
        let mut out = BufWriter::new(file);

        match format {
            SignalFormat::Binary => {
                for sample in &self.samples {
                    out.write_all(&sample.to_le_bytes()).map_err(to_err)?;
                }
            }
            SignalFormat::Ascii => {
                for sample in &self.samples {
                    writeln!(out, "{}", sample).map_err(to_err)?;
                }
            }
        }

        out.flush().map_err(to_err)?;
        tracing::info!("Wrote {} samples to {}", self.len(), path.display());
        Ok(())
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
