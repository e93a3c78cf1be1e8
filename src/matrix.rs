//! Dense pairwise distance matrix.

/// An n×n distance matrix (kilometers) stored in row-major order.
///
/// Indexed by the position of each stop in the caller's input.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// Creates a matrix of the given size, initialized to zero.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0.0; size * size],
            size,
        }
    }

    /// Creates a matrix from an explicit n×n grid.
    ///
    /// Returns `None` if the data length doesn't match `size * size`.
    pub fn from_data(size: usize, data: Vec<f64>) -> Option<Self> {
        if data.len() != size * size {
            return None;
        }
        Some(Self { data, size })
    }

    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    pub fn set(&mut self, from: usize, to: usize, km: f64) {
        self.data[from * self.size + to] = km;
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Sum of consecutive legs along `order` (indices into this matrix).
    pub fn path_length(&self, order: &[usize]) -> f64 {
        order.windows(2).map(|leg| self.get(leg[0], leg[1])).sum()
    }
}
