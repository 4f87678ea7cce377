pub mod connectors;

pub use connectors::{FastaConnector, FastaRecord};
