use std::ops::{Index, IndexMut};

/// Dense `size x size` matrix of probabilities, stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct SquareMatrix {
    size: usize,
    cells: Vec<f64>,
}

impl SquareMatrix {
    pub fn zeros(size: usize) -> Self {
        SquareMatrix {
            size,
            cells: vec![0.0; size * size],
        }
    }

    pub fn identity(size: usize) -> Self {
        let mut matrix = SquareMatrix::zeros(size);
        for i in 0..size {
            matrix[(i, i)] = 1.0;
        }
        matrix
    }

    /// Builds a matrix from nested rows. Returns `None` unless the rows
    /// form a square.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Option<Self> {
        let size = rows.len();
        if rows.iter().any(|row| row.len() != size) {
            return None;
        }
        Some(SquareMatrix {
            size,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        // chunks(0) panics, and an empty matrix has no rows anyway.
        self.cells.chunks(self.size.max(1))
    }

    /// Standard product `self x rhs`.
    ///
    /// # Panics
    /// If the sizes differ.
    pub fn matmul(&self, rhs: &SquareMatrix) -> SquareMatrix {
        assert_eq!(self.size, rhs.size, "matrix sizes must match");
        let n = self.size;
        let mut product = SquareMatrix::zeros(n);
        for i in 0..n {
            for k in 0..n {
                let lhs = self[(i, k)];
                if lhs == 0.0 {
                    continue;
                }
                for j in 0..n {
                    product[(i, j)] += lhs * rhs[(k, j)];
                }
            }
        }
        product
    }

    /// `self` raised to `exponent` by repeated right-multiplication.
    pub fn power(&self, exponent: u32) -> SquareMatrix {
        let mut result = SquareMatrix::identity(self.size);
        for _ in 0..exponent {
            result = result.matmul(self);
        }
        result
    }

    pub fn divide(&mut self, divisor: f64) {
        for cell in &mut self.cells {
            *cell /= divisor;
        }
    }

    pub fn column_sums(&self) -> Vec<f64> {
        let mut sums = vec![0.0; self.size];
        for row in self.rows() {
            for (sum, value) in sums.iter_mut().zip(row) {
                *sum += value;
            }
        }
        sums
    }

    /// Worst absolute distance of any column sum from 1.
    pub fn column_sum_error(&self) -> f64 {
        self.column_sums()
            .into_iter()
            .map(|sum| (sum - 1.0).abs())
            .fold(0.0, f64::max)
    }

    /// Largest deviation of any cell from the fully mixed value `1/size`.
    pub fn uniform_distance(&self) -> f64 {
        if self.size == 0 {
            return 0.0;
        }
        let uniform = 1.0 / self.size as f64;
        self.cells
            .iter()
            .map(|value| (value - uniform).abs())
            .fold(0.0, f64::max)
    }

    /// Largest absolute cell-wise difference. Sizes must match.
    pub fn max_abs_diff(&self, other: &SquareMatrix) -> f64 {
        assert_eq!(self.size, other.size, "matrix sizes must match");
        self.cells
            .iter()
            .zip(&other.cells)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max)
    }
}

impl Index<(usize, usize)> for SquareMatrix {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        &self.cells[row * self.size + col]
    }
}

impl IndexMut<(usize, usize)> for SquareMatrix {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f64 {
        &mut self.cells[row * self.size + col]
    }
}
