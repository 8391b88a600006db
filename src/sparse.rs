//! Triplet-based sparse matrix used during assembly.
//!
//! Entries are accumulated as (row, col, value) triplets, which keeps
//! essential-dof elimination a cheap filtering operation; conversion to a
//! compressed format happens once, when a finalized matrix is needed.

#[derive(Debug, Clone, Default)]
pub struct SparseMatrix {
  nrows: usize,
  ncols: usize,
  triplets: Vec<(usize, usize, f64)>,
}

impl SparseMatrix {
  pub fn zeros(nrows: usize, ncols: usize) -> Self {
    Self::from_triplets(nrows, ncols, Vec::new())
  }

  pub fn from_triplets(nrows: usize, ncols: usize, triplets: Vec<(usize, usize, f64)>) -> Self {
    Self {
      nrows,
      ncols,
      triplets,
    }
  }

  pub fn from_csc(csc: &nas::CscMatrix<f64>) -> Self {
    let triplets = csc.triplet_iter().map(|(r, c, &v)| (r, c, v)).collect();
    Self::from_triplets(csc.nrows(), csc.ncols(), triplets)
  }

  pub fn nrows(&self) -> usize {
    self.nrows
  }
  pub fn ncols(&self) -> usize {
    self.ncols
  }
  pub fn ntriplets(&self) -> usize {
    self.triplets.len()
  }
  pub fn triplets(&self) -> &[(usize, usize, f64)] {
    &self.triplets
  }
  pub fn into_triplets(self) -> Vec<(usize, usize, f64)> {
    self.triplets
  }

  pub fn push(&mut self, r: usize, c: usize, v: f64) {
    debug_assert!(r < self.nrows && c < self.ncols, "triplet out of bounds");
    self.triplets.push((r, c, v));
  }

  /// Removes every triplet matching the predicate and returns it as a matrix
  /// of the same shape.
  pub fn extract<F>(&mut self, predicate: F) -> SparseMatrix
  where
    F: Fn(usize, usize) -> bool,
  {
    let mut extracted = Vec::new();
    let mut i = 0;
    while i < self.triplets.len() {
      let (r, c, _) = self.triplets[i];
      if predicate(r, c) {
        extracted.push(self.triplets.swap_remove(i));
      } else {
        i += 1;
      }
    }
    SparseMatrix::from_triplets(self.nrows, self.ncols, extracted)
  }

  pub fn set_zero<F>(&mut self, predicate: F)
  where
    F: Fn(usize, usize) -> bool,
  {
    self.extract(predicate);
  }

  /// Essential-dof elimination: zeros every row and column of a flagged dof,
  /// puts a one on its diagonal and returns the removed entries. The
  /// returned part is exactly what is needed to move known boundary values
  /// to the right-hand side (`b - A_e x`).
  pub fn eliminate_row_cols(&mut self, flags: &[bool]) -> SparseMatrix {
    assert!(self.nrows == self.ncols, "elimination requires a square matrix");
    assert!(flags.len() == self.nrows, "flag list does not match matrix size");
    let eliminated = self.extract(|r, c| flags[r] || flags[c]);
    for (i, &flagged) in flags.iter().enumerate() {
      if flagged {
        self.triplets.push((i, i, 1.0));
      }
    }
    eliminated
  }

  pub fn to_nalgebra_coo(&self) -> nas::CooMatrix<f64> {
    let rows = self.triplets.iter().map(|t| t.0).collect();
    let cols = self.triplets.iter().map(|t| t.1).collect();
    let vals = self.triplets.iter().map(|t| t.2).collect();
    nas::CooMatrix::try_from_triplets(self.nrows, self.ncols, rows, cols, vals).unwrap()
  }

  pub fn to_nalgebra_csc(&self) -> nas::CscMatrix<f64> {
    (&self.to_nalgebra_coo()).into()
  }

  pub fn to_nalgebra_dense(&self) -> na::DMatrix<f64> {
    (&self.to_nalgebra_coo()).into()
  }
}
