use std::io::{self, BufRead, Chain, Cursor, Read, Write};

use flate2::bufread::GzDecoder;
use tracing::debug;

use super::TraceConverter;
use crate::{error::Result, stats::ConversionStats, stream::DecoderConfig};

/// Leading bytes of every gzip member.
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// A source with its already-inspected leading bytes put back in front.
pub type Rewound<R> = Chain<Cursor<Vec<u8>>, R>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    /// Gzip-compressed MacSim trace.
    Gzip,
    /// Anything else; not converted.
    Unrecognized,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Converted(ConversionStats),
    /// The source was not a recognized container and nothing was written.
    Skipped,
}

/// Identifies the container format of `source` from its first two bytes.
///
/// Reads until two bytes are available or the source ends, however short the
/// individual reads are. The inspected bytes are chained back in front of the
/// rest of the source, so the returned reader yields the full stream.
pub fn detect_container<R: BufRead>(mut source: R) -> io::Result<(Container, Rewound<R>)> {
    let mut prefix = Vec::with_capacity(GZIP_MAGIC.len());
    (&mut source)
        .take(GZIP_MAGIC.len() as u64)
        .read_to_end(&mut prefix)?;

    let container = if prefix == GZIP_MAGIC {
        Container::Gzip
    } else {
        Container::Unrecognized
    };
    Ok((container, Cursor::new(prefix).chain(source)))
}

/// Converts a MacSim trace read from `source`, writing the memory-access trace
/// to `sink`.
///
/// Sources that are not gzip containers are skipped without error and
/// without output.
pub fn convert<R: BufRead, W: Write>(
    source: R,
    sink: W,
    config: DecoderConfig,
) -> Result<Outcome> {
    match detect_container(source)? {
        (Container::Gzip, source) => {
            debug!("gzip container detected");
            let mut converter = TraceConverter::new(GzDecoder::new(source), config)?;
            let stats = converter.run(sink)?;
            Ok(Outcome::Converted(stats))
        }
        (Container::Unrecognized, _) => {
            debug!("unrecognized container, skipping");
            Ok(Outcome::Skipped)
        }
    }
}
