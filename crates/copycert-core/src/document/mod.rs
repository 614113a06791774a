pub mod read;

pub use read::{DocumentContext, fingerprint, read_document};
