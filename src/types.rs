/// A single residue or gap, stored as an ASCII byte.
pub type Symbol = u8;

/// Reserved gap symbol used for padding and for inserted/deleted positions.
pub const GAP: Symbol = b'-';

/// Stop codon marker. Treated as a residue (BLOSUM tables score it).
pub const STOP: Symbol = b'*';

/// The 20 standard amino acids in NCBI matrix order.
pub const AMINO_ACIDS: &[u8; 20] = b"ARNDCQEGHILKMFPSTWYV";

/// True for anything that may appear in an unaligned protein sequence:
/// upper-case letters (standard residues plus ambiguity codes B, Z, X, J, U, O)
/// and the stop marker.
#[inline]
pub fn is_residue(symbol: Symbol) -> bool {
    symbol.is_ascii_uppercase() || symbol == STOP
}

#[inline]
pub fn is_gap(symbol: Symbol) -> bool {
    symbol == GAP
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_residue_classes() {
        for &aa in AMINO_ACIDS {
            assert!(is_residue(aa));
        }
        assert!(is_residue(b'X'));
        assert!(is_residue(STOP));
        assert!(!is_residue(GAP));
        assert!(!is_residue(b'a'));
        assert!(is_gap(GAP));
    }
}
