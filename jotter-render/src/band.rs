/// Rows per band. Large enough to amortize the per-band setup, small enough
/// that a 900-row request still spreads across every core.
pub const BAND_ROWS: u32 = 32;

/// A horizontal strip of the output grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Band {
    /// First grid row covered by the band.
    pub first_row: u32,
    /// Number of rows (the last band may be shorter).
    pub rows: u32,
}

/// Split `height` rows into consecutive bands of at most `BAND_ROWS`.
pub fn build_bands(height: u32) -> Vec<Band> {
    let mut bands = Vec::with_capacity(height.div_ceil(BAND_ROWS) as usize);
    let mut first_row = 0;
    while first_row < height {
        let rows = BAND_ROWS.min(height - first_row);
        bands.push(Band { first_row, rows });
        first_row += rows;
    }
    bands
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_cover_every_row_once() {
        for height in [1, 31, 32, 33, 600, 1000] {
            let bands = build_bands(height);
            let mut next = 0;
            for band in &bands {
                assert_eq!(band.first_row, next);
                assert!(band.rows > 0 && band.rows <= BAND_ROWS);
                next += band.rows;
            }
            assert_eq!(next, height);
        }
    }

    #[test]
    fn no_rows_no_bands() {
        assert!(build_bands(0).is_empty());
    }
}
