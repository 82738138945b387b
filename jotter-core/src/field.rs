/// Per-cell escape iteration counts for one grid.
///
/// A value `v < max_iterations` means the cell first exceeded the escape
/// threshold at iteration `v`; `v == max_iterations` means it never did.
/// This is the raw output handed to a colorizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IterationField {
    width: u32,
    height: u32,
    max_iterations: u32,
    data: Vec<u32>,
}

impl IterationField {
    /// Assemble a field from row-major data. `None` when `data` does not
    /// hold exactly `width × height` values.
    pub fn from_raw(width: u32, height: u32, max_iterations: u32, data: Vec<u32>) -> Option<Self> {
        if data.len() != width as usize * height as usize {
            return None;
        }
        Some(Self {
            width,
            height,
            max_iterations,
            data,
        })
    }

    /// Caller guarantees `data.len() == width × height`.
    pub(crate) fn from_grid_data(width: u32, height: u32, max_iterations: u32, data: Vec<u32>) -> Self {
        debug_assert_eq!(data.len(), width as usize * height as usize);
        Self {
            width,
            height,
            max_iterations,
            data,
        }
    }

    /// Stack row bands of equal width and budget top to bottom.
    pub fn concat_rows(width: u32, max_iterations: u32, bands: Vec<IterationField>) -> Option<Self> {
        let mut height = 0;
        let mut data = Vec::with_capacity(bands.iter().map(|b| b.data.len()).sum());
        for band in bands {
            if band.width != width || band.max_iterations != max_iterations {
                return None;
            }
            height += band.height;
            data.extend(band.data);
        }
        Some(Self {
            width,
            height,
            max_iterations,
            data,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// Row-major values.
    #[inline]
    pub fn data(&self) -> &[u32] {
        &self.data
    }

    pub fn get(&self, row: u32, col: u32) -> Option<u32> {
        if row >= self.height || col >= self.width {
            return None;
        }
        self.data
            .get(row as usize * self.width as usize + col as usize)
            .copied()
    }

    /// Iterate over rows, top first.
    pub fn rows(&self) -> impl Iterator<Item = &[u32]> {
        self.data.chunks_exact(self.width.max(1) as usize)
    }

    /// Copy into nested row vectors (handy for tests and JSON output).
    pub fn to_rows(&self) -> Vec<Vec<u32>> {
        self.rows().map(<[u32]>::to_vec).collect()
    }

    /// Cells that escaped within the budget.
    pub fn escaped_count(&self) -> usize {
        self.data
            .iter()
            .filter(|&&v| v < self.max_iterations)
            .count()
    }

    /// Smallest and largest value, or `None` for an empty field.
    pub fn min_max(&self) -> Option<(u32, u32)> {
        let min = *self.data.iter().min()?;
        let max = *self.data.iter().max()?;
        Some((min, max))
    }
}
