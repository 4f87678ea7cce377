//! Per-residue physicochemical property scales (IMGT amino-acid classes).

/// Kyte-Doolittle hydropathy index.
pub const HYDROPATHY: [(u8, f64); 20] = [
    (b'A', 1.8),
    (b'R', -4.5),
    (b'N', -3.5),
    (b'D', -3.5),
    (b'C', 2.5),
    (b'Q', -3.5),
    (b'E', -3.5),
    (b'G', -0.4),
    (b'H', -3.2),
    (b'I', 4.5),
    (b'L', 3.8),
    (b'K', -3.9),
    (b'M', 1.9),
    (b'F', 2.8),
    (b'P', -1.6),
    (b'S', -0.8),
    (b'T', -0.7),
    (b'W', -0.9),
    (b'Y', -1.3),
    (b'V', 4.2),
];

/// Side-chain volume in cubic angstroms.
pub const VOLUME: [(u8, f64); 20] = [
    (b'A', 88.6),
    (b'R', 173.4),
    (b'N', 114.1),
    (b'D', 111.1),
    (b'C', 108.5),
    (b'Q', 143.8),
    (b'E', 138.4),
    (b'G', 60.1),
    (b'H', 153.2),
    (b'I', 166.7),
    (b'L', 166.7),
    (b'K', 168.6),
    (b'M', 162.9),
    (b'F', 189.9),
    (b'P', 112.7),
    (b'S', 89.0),
    (b'T', 116.1),
    (b'W', 227.8),
    (b'Y', 193.6),
    (b'V', 140.0),
];

/// Spread between the largest and smallest value on a scale.
pub fn property_range(scale: &[(u8, f64)]) -> f64 {
    let (min, max) = scale
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(_, v)| {
            (lo.min(v), hi.max(v))
        });
    if scale.is_empty() {
        0.0
    } else {
        max - min
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AMINO_ACIDS;

    #[test]
    fn test_scales_cover_standard_residues() {
        for scale in [&HYDROPATHY, &VOLUME] {
            for aa in AMINO_ACIDS {
                assert!(scale.iter().any(|(s, _)| s == aa), "missing {}", *aa as char);
            }
        }
    }

    #[test]
    fn test_property_range() {
        assert!((property_range(&HYDROPATHY) - 9.0).abs() < 1e-9);
        assert!((property_range(&VOLUME) - 167.7).abs() < 1e-9);
        assert_eq!(property_range(&[]), 0.0);
    }
}
