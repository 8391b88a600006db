//! Dense/sparse linear algebra helpers and the operator capability consumed
//! by the complex wrappers.

use faer::solvers::SpSolver;

/// Minimal linear-operator capability: the complex wrappers only ever need
/// sizes and a matrix-vector product from a real operator.
pub trait Operator {
  fn nrows(&self) -> usize;
  fn ncols(&self) -> usize;
  /// `y = A x`
  fn mult(&self, x: na::DVectorView<f64>, y: &mut na::DVector<f64>);
}

impl Operator for nas::CscMatrix<f64> {
  fn nrows(&self) -> usize {
    nas::CscMatrix::nrows(self)
  }
  fn ncols(&self) -> usize {
    nas::CscMatrix::ncols(self)
  }
  fn mult(&self, x: na::DVectorView<f64>, y: &mut na::DVector<f64>) {
    *y = csc_mul_vec(self, x);
  }
}

/// `A x` for a CSC matrix, written out so it works for any view.
pub fn csc_mul_vec(a: &nas::CscMatrix<f64>, x: na::DVectorView<f64>) -> na::DVector<f64> {
  assert!(a.ncols() == x.len(), "matrix-vector dimension mismatch");
  let mut y = na::DVector::zeros(a.nrows());
  for (j, col) in a.col_iter().enumerate() {
    let xj = x[j];
    if xj == 0.0 {
      continue;
    }
    for (&i, &v) in col.row_indices().iter().zip(col.values()) {
      y[i] += v * xj;
    }
  }
  y
}

/// `Aᵀ x` without materializing the transpose.
pub fn csc_tr_mul_vec(a: &nas::CscMatrix<f64>, x: na::DVectorView<f64>) -> na::DVector<f64> {
  assert!(a.nrows() == x.len(), "matrix-vector dimension mismatch");
  let mut y = na::DVector::zeros(a.ncols());
  for (j, col) in a.col_iter().enumerate() {
    let mut sum = 0.0;
    for (&i, &v) in col.row_indices().iter().zip(col.values()) {
      sum += v * x[i];
    }
    y[j] = sum;
  }
  y
}

/// Galerkin triple product `Pᵀ A P`.
pub fn rap(p: &nas::CscMatrix<f64>, a: &nas::CscMatrix<f64>) -> nas::CscMatrix<f64> {
  let pt = p.transpose();
  &(&pt * a) * p
}

pub fn indices_to_flags(indices: &[usize], len: usize) -> Vec<bool> {
  let mut flags = vec![false; len];
  indices.iter().for_each(|&i| flags[i] = true);
  flags
}

pub fn flags_to_indices(flags: &[bool]) -> Vec<usize> {
  flags
    .iter()
    .enumerate()
    .filter_map(|(i, &flag)| flag.then_some(i))
    .collect()
}

pub fn matrix_from_const_diagonals<T>(
  values: &[T],
  offsets: &[isize],
  nrows: usize,
  ncols: usize,
) -> na::DMatrix<T>
where
  T: num_traits::Zero + na::Scalar + Copy,
{
  let mut matrix = na::DMatrix::zeros(nrows, ncols);

  for (idiag, &offset) in offsets.iter().enumerate() {
    let [start_row, start_col] = if offset >= 0 {
      [0, offset as usize]
    } else {
      [(-offset) as usize, 0]
    };

    let mut r = start_row;
    let mut c = start_col;
    while r < nrows && c < ncols {
      matrix[(r, c)] = values[idiag];
      r += 1;
      c += 1;
    }
  }

  matrix
}

pub fn assert_mat_eq(a: &na::DMatrix<f64>, b: &na::DMatrix<f64>) {
  const TOL: f64 = 10e-12;
  let diff = a - b;
  let error = diff.norm();
  let equal = error <= TOL;
  if !equal {
    println!("Matrix a={a:.3}");
    println!("Matrix b={b:.3}");
    println!("a-b={diff:.3}");
    panic!("Matrices not equal.");
  }
}

pub fn assert_vec_eq(a: &na::DVector<f64>, b: &na::DVector<f64>) {
  const TOL: f64 = 10e-12;
  let diff = a - b;
  let error = diff.norm();
  if error > TOL {
    println!("Vector a={a:.5}");
    println!("Vector b={b:.5}");
    panic!("Vectors not equal.");
  }
}

type SparseMatrixFaer = faer::sparse::SparseColMat<usize, f64>;

pub fn nalgebra2faer(m: nas::CscMatrix<f64>) -> SparseMatrixFaer {
  let nrows = m.nrows();
  let ncols = m.ncols();
  let (col_ptrs, row_indices, values) = m.disassemble();

  let symbolic =
    faer::sparse::SymbolicSparseColMat::new_checked(nrows, ncols, col_ptrs, None, row_indices);
  faer::sparse::SparseColMat::new(symbolic, values)
}

pub fn faer2nalgebra(m: SparseMatrixFaer) -> nas::CscMatrix<f64> {
  let (symbolic, values) = m.into_parts();
  let (nrows, ncols, col_ptrs, _, row_indices) = symbolic.into_parts();
  nas::CscMatrix::try_from_csc_data(nrows, ncols, col_ptrs, row_indices, values).unwrap()
}

pub struct FaerLu {
  raw: faer::sparse::linalg::solvers::Lu<usize, f64>,
}
impl FaerLu {
  pub fn new(a: nas::CscMatrix<f64>) -> Self {
    let raw = nalgebra2faer(a).sp_lu().unwrap();
    Self { raw }
  }

  pub fn solve(&self, b: &na::DVector<f64>) -> na::DVector<f64> {
    let b = faer::col::from_slice(b.as_slice());
    na::DVector::from_vec(self.raw.solve(b).as_slice().to_vec())
  }
}

pub struct FaerCholesky {
  raw: faer::sparse::linalg::solvers::Cholesky<usize, f64>,
}
impl FaerCholesky {
  pub fn new(a: nas::CscMatrix<f64>) -> Self {
    let raw = nalgebra2faer(a).sp_cholesky(faer::Side::Upper).unwrap();
    Self { raw }
  }

  pub fn solve(&self, b: &na::DVector<f64>) -> na::DVector<f64> {
    let b = faer::col::from_slice(b.as_slice());
    na::DVector::from_vec(self.raw.solve(b).as_slice().to_vec())
  }
}
