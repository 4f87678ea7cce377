mod fasta;

pub use fasta::{FastaConnector, FastaRecord, LINE_WIDTH};
