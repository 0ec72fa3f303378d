/// Read access to a row-major grid buffer.
pub trait GridView {
    type Cell: Copy;

    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn stride(&self) -> usize;

    fn row(&self, y: usize) -> &[Self::Cell];

    fn is_contiguous(&self) -> bool {
        self.stride() == self.width()
    }

    fn as_slice(&self) -> Option<&[Self::Cell]> {
        None
    }
}

/// Mutable access to a row-major grid buffer.
pub trait GridViewMut: GridView {
    fn row_mut(&mut self, y: usize) -> &mut [Self::Cell];

    fn as_mut_slice(&mut self) -> Option<&mut [Self::Cell]> {
        None
    }
}
