//! Pixel memory owned by the frame driver, and the view a kernel writes through.

use std::mem::size_of;

use crate::screen;

/// Size of one colour cell in bytes.
pub const CELL_BYTES: u32 = size_of::<u32>() as u32;

/// Row-padded 32-bit pixel buffer.
///
/// The stride is padded to [`wgpu::COPY_BYTES_PER_ROW_ALIGNMENT`] so the rows
/// can be uploaded to a texture as-is; kernels must not assume
/// `stride == width * 4`.
pub struct Raster {
    size: screen::Size,
    stride_bytes: u32,
    cells: Vec<u32>,
}

impl Raster {
    pub fn new(size: screen::Size) -> Self {
        Self::with_stride(size, padded_stride(size.width))
    }

    /// # Panics
    ///
    /// If `stride_bytes` can't hold a row of `size.width` cells or isn't a whole number of cells.
    pub fn with_stride(size: screen::Size, stride_bytes: u32) -> Self {
        check_stride(size, stride_bytes);
        let cells = vec![0; (stride_bytes / CELL_BYTES) as usize * size.height as usize];
        Self {
            size,
            stride_bytes,
            cells,
        }
    }

    pub fn size(&self) -> screen::Size {
        self.size
    }

    pub fn stride_bytes(&self) -> u32 {
        self.stride_bytes
    }

    /// Reallocates for a new window size. Contents are cleared.
    pub fn resize(&mut self, size: screen::Size) {
        *self = Self::new(size);
    }

    /// Exclusive write access for one kernel invocation.
    ///
    /// The returned view borrows the raster, so it is released on every exit
    /// path and can't outlive the call it was handed to.
    pub fn lock(&mut self) -> RasterView<'_> {
        RasterView::new(&mut self.cells, self.size, self.stride_bytes)
    }

    /// Cell bytes including row padding, in texture upload layout.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.cells)
    }

    /// The visible cells of row `h`, without padding.
    pub fn row(&self, h: u32) -> &[u32] {
        let start = h as usize * (self.stride_bytes / CELL_BYTES) as usize;
        &self.cells[start..start + self.size.width as usize]
    }

    /// All cells including padding, row-major.
    pub fn cells(&self) -> &[u32] {
        &self.cells
    }

    #[cfg(test)]
    pub(crate) fn fill(&mut self, value: u32) {
        self.cells.fill(value);
    }
}

/// Non-owning handle to a raster's pixel memory for one kernel call.
pub struct RasterView<'a> {
    cells: &'a mut [u32],
    size: screen::Size,
    stride_cells: usize,
}

impl<'a> RasterView<'a> {
    /// Wraps caller-owned cells.
    ///
    /// # Panics
    ///
    /// If the size is empty, the stride is too small or not a whole number of
    /// cells, or `cells` is too short for `size.height` rows.
    pub fn new(cells: &'a mut [u32], size: screen::Size, stride_bytes: u32) -> Self {
        assert!(!size.is_empty(), "raster must be at least 1x1, got {size:?}");
        check_stride(size, stride_bytes);
        let stride_cells = (stride_bytes / CELL_BYTES) as usize;
        let required = stride_cells * (size.height as usize - 1) + size.width as usize;
        assert!(
            cells.len() >= required,
            "{} cells can't hold {:?} at a stride of {} bytes",
            cells.len(),
            size,
            stride_bytes
        );
        Self {
            cells,
            size,
            stride_cells,
        }
    }

    pub fn size(&self) -> screen::Size {
        self.size
    }

    /// The `width` writable cells of row `h`.
    #[inline]
    pub fn row_mut(&mut self, h: u32) -> &mut [u32] {
        debug_assert!(h < self.size.height);
        let start = h as usize * self.stride_cells;
        &mut self.cells[start..start + self.size.width as usize]
    }
}

/// Smallest stride that holds `width` cells and satisfies wgpu's row alignment.
pub fn padded_stride(width: u32) -> u32 {
    let unpadded = width * CELL_BYTES;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    (unpadded + align - 1) / align * align
}

fn check_stride(size: screen::Size, stride_bytes: u32) {
    assert!(
        stride_bytes >= size.width * CELL_BYTES,
        "stride of {stride_bytes} bytes is shorter than a row of {} cells",
        size.width
    );
    assert!(
        stride_bytes % CELL_BYTES == 0,
        "stride of {stride_bytes} bytes is not a whole number of cells"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stride_is_padded_to_copy_alignment() {
        assert_eq!(padded_stride(64), 256);
        assert_eq!(padded_stride(65), 512);
        assert_eq!(padded_stride(642), 2816);
        assert_eq!(padded_stride(640), 2560);
    }

    #[test]
    fn rows_are_addressed_by_stride() {
        let mut raster = Raster::with_stride(screen::Size::new(3, 2), 20);
        {
            let mut view = raster.lock();
            view.row_mut(0).fill(1);
            view.row_mut(1).fill(2);
        }
        assert_eq!(raster.cells(), &[1, 1, 1, 0, 0, 2, 2, 2, 0, 0]);
        assert_eq!(raster.row(1), &[2, 2, 2]);
        assert_eq!(raster.as_bytes().len(), 40);
    }

    #[test]
    fn last_row_may_omit_padding() {
        let mut cells = [0u32; 7];
        let mut view = RasterView::new(&mut cells, screen::Size::new(3, 2), 16);
        view.row_mut(1).fill(9);
        assert_eq!(cells, [0, 0, 0, 0, 9, 9, 9]);
    }

    #[test]
    #[should_panic(expected = "shorter than a row")]
    fn narrow_stride_is_rejected() {
        Raster::with_stride(screen::Size::new(8, 1), 28);
    }

    #[test]
    #[should_panic(expected = "can't hold")]
    fn short_buffer_is_rejected() {
        let mut cells = [0u32; 5];
        RasterView::new(&mut cells, screen::Size::new(3, 2), 12);
    }

    #[test]
    fn resize_reallocates() {
        let mut raster = Raster::new(screen::Size::new(10, 10));
        raster.resize(screen::Size::new(100, 3));
        assert_eq!(raster.size(), screen::Size::new(100, 3));
        assert_eq!(raster.stride_bytes(), 512);
        assert_eq!(raster.cells().len(), 128 * 3);
    }
}
