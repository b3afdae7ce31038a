mod container;
mod converter;

pub use container::{convert, detect_container, Container, Outcome, Rewound, GZIP_MAGIC};
pub use converter::TraceConverter;
