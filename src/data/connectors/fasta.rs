use crate::alignment::{AlignmentMatrix, Row, Sequence};
use crate::error::{EvoAlignError, Result};
use std::fmt::Write as _;
use std::path::Path;

/// Sequence lines are wrapped at this many symbols when writing.
pub const LINE_WIDTH: usize = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
    /// Header text after `>`, trimmed.
    pub id: String,
    pub sequence: Sequence,
}

pub struct FastaConnector;

impl FastaConnector {
    /// Parse FASTA text. Lines starting with `;` are comments.
    pub fn parse(text: &str) -> Result<Vec<FastaRecord>> {
        let mut records = Vec::new();
        let mut current: Option<(String, String)> = None;

        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with(';') {
                continue;
            }
            if let Some(header) = line.strip_prefix('>') {
                if let Some(done) = current.take() {
                    records.push(Self::finish(done)?);
                }
                current = Some((header.trim().to_string(), String::new()));
            } else {
                match current.as_mut() {
                    Some((_, residues)) => residues.push_str(line),
                    None => {
                        return Err(EvoAlignError::Fasta(format!(
                            "line {}: sequence data before the first header",
                            line_no + 1
                        )))
                    }
                }
            }
        }
        if let Some(done) = current.take() {
            records.push(Self::finish(done)?);
        }

        if records.is_empty() {
            return Err(EvoAlignError::Fasta("no records found".to_string()));
        }
        Ok(records)
    }

    fn finish((id, residues): (String, String)) -> Result<FastaRecord> {
        let sequence = Sequence::parse(&residues)
            .map_err(|e| EvoAlignError::Fasta(format!("record '{}': {}", id, e)))?;
        if sequence.residue_count() == 0 {
            return Err(EvoAlignError::Fasta(format!("record '{}' has no residues", id)));
        }
        Ok(FastaRecord { id, sequence })
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Vec<FastaRecord>> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let records = Self::parse(&text)
            .map_err(|e| EvoAlignError::Fasta(format!("{}: {}", path.display(), e)))?;
        log::debug!("Read {} records from {}", records.len(), path.display());
        Ok(records)
    }

    /// Records from every file, in order.
    pub fn load_many<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<FastaRecord>> {
        let mut records = Vec::new();
        for path in paths {
            records.extend(Self::load(path)?);
        }
        Ok(records)
    }

    pub fn to_string(alignment: &AlignmentMatrix) -> String {
        let mut out = String::new();
        for row in alignment.rows() {
            let _ = writeln!(out, ">{}", row.id);
            for chunk in row.sequence.as_slice().chunks(LINE_WIDTH) {
                out.push_str(&String::from_utf8_lossy(chunk));
                out.push('\n');
            }
        }
        out
    }

    pub fn write<P: AsRef<Path>>(path: P, alignment: &AlignmentMatrix) -> Result<()> {
        std::fs::write(path, Self::to_string(alignment))?;
        Ok(())
    }
}

impl AlignmentMatrix {
    /// Initial alignment from parsed records, right-padded to the longest.
    pub fn from_records(records: Vec<FastaRecord>) -> Result<Self> {
        let rows = records
            .into_iter()
            .map(|r| Row::new(r.id, r.sequence))
            .collect();
        AlignmentMatrix::new(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_multiline_records() {
        let text = ">first protein\nmkv\nLA\n\n; comment\n>second\nMKVLA\n";
        let records = FastaConnector::parse(text).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "first protein");
        assert_eq!(records[0].sequence.to_string(), "MKVLA");
        assert_eq!(records[1].sequence.to_string(), "MKVLA");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            FastaConnector::parse(""),
            Err(EvoAlignError::Fasta(_))
        ));
        assert!(FastaConnector::parse("MKV\n>a\nMKV").is_err());
        assert!(FastaConnector::parse(">a\n>b\nMKV").is_err());
        assert!(FastaConnector::parse(">a\n---").is_err());
        assert!(FastaConnector::parse(">a\nMK1V").is_err());
    }

    #[test]
    fn test_write_wraps_lines() {
        let long = "A".repeat(LINE_WIDTH + 5);
        let alignment = AlignmentMatrix::from_records(vec![
            FastaRecord {
                id: "long".to_string(),
                sequence: Sequence::parse(&long).unwrap(),
            },
            FastaRecord {
                id: "short".to_string(),
                sequence: Sequence::parse("AC").unwrap(),
            },
        ])
        .unwrap();

        let text = FastaConnector::to_string(&alignment);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[1].len(), LINE_WIDTH);
        assert_eq!(lines[2], "AAAAA");
        assert!(lines[4].starts_with("AC---"));

        let reparsed = FastaConnector::parse(&text).unwrap();
        assert_eq!(AlignmentMatrix::from_records(reparsed).unwrap(), alignment);
    }
}
