//! Complex operators as wrappers around two real operator halves.

use crate::{complex::vector::ComplexVector, linalg::Operator};

use std::rc::Rc;

/// Sign convention for the imaginary cross-terms of a complex system.
///
/// `Hermitian` (sign `+1`) keeps the natural complex layout; the
/// real-equivalent block system is `[[A_r, -A_i], [A_i, A_r]]`.
/// `BlockSymmetric` (sign `-1`) negates the assembled imaginary right-hand
/// side, which makes the real-equivalent block system
/// `[[A_r, A_i], [A_i, -A_r]]` — symmetric whenever both halves are.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Convention {
  Hermitian,
  BlockSymmetric,
}

impl Convention {
  /// The sign `s` entering every imaginary cross-term.
  pub fn sign(self) -> f64 {
    match self {
      Convention::Hermitian => 1.0,
      Convention::BlockSymmetric => -1.0,
    }
  }
}

pub(crate) fn complex_mult(
  real: &dyn Operator,
  imag: &dyn Operator,
  sign: f64,
  x: &ComplexVector,
  y: &mut ComplexVector,
) {
  let n = real.nrows();
  let mut tmp = na::DVector::zeros(n);
  let mut y_r = na::DVector::zeros(n);
  let mut y_i = na::DVector::zeros(n);

  // (y_r, y_i) = (A_r x_r - s A_i x_i, A_r x_i + s A_i x_r)
  real.mult(x.real(), &mut y_r);
  imag.mult(x.imag(), &mut tmp);
  y_r.axpy(-sign, &tmp, 1.0);

  real.mult(x.imag(), &mut y_i);
  imag.mult(x.real(), &mut tmp);
  y_i.axpy(sign, &tmp, 1.0);

  y.resize(n);
  y.real_slice_mut().copy_from_slice(y_r.as_slice());
  y.imag_slice_mut().copy_from_slice(y_i.as_slice());
}

/// A complex operator with generic (possibly matrix-free) halves.
pub struct ComplexOperator {
  real: Rc<dyn Operator>,
  imag: Rc<dyn Operator>,
  conv: Convention,
}

impl ComplexOperator {
  pub fn new(real: Rc<dyn Operator>, imag: Rc<dyn Operator>, conv: Convention) -> Self {
    assert!(
      real.nrows() == imag.nrows() && real.ncols() == imag.ncols(),
      "real and imaginary operator halves of different shape"
    );
    Self { real, imag, conv }
  }

  pub fn convention(&self) -> Convention {
    self.conv
  }
  pub fn real_op(&self) -> &dyn Operator {
    &*self.real
  }
  pub fn imag_op(&self) -> &dyn Operator {
    &*self.imag
  }

  /// Complex action on a composite vector.
  pub fn mult(&self, x: &ComplexVector, y: &mut ComplexVector) {
    assert!(x.size() == 2 * self.real.ncols(), "input vector of incorrect size");
    complex_mult(&*self.real, &*self.imag, self.conv.sign(), x, y);
  }
}

/// A complex operator with sparse-matrix halves. The halves are shared
/// (`Rc`), so a wrapped matrix is freed exactly when its last holder drops.
#[derive(Debug, Clone)]
pub struct ComplexSparseMatrix {
  real: Rc<nas::CscMatrix<f64>>,
  imag: Rc<nas::CscMatrix<f64>>,
  conv: Convention,
}

impl ComplexSparseMatrix {
  pub fn new(
    real: Rc<nas::CscMatrix<f64>>,
    imag: Rc<nas::CscMatrix<f64>>,
    conv: Convention,
  ) -> Self {
    assert!(
      real.nrows() == imag.nrows() && real.ncols() == imag.ncols(),
      "real and imaginary matrix halves of different shape"
    );
    Self { real, imag, conv }
  }

  pub fn convention(&self) -> Convention {
    self.conv
  }
  pub fn real(&self) -> &nas::CscMatrix<f64> {
    &self.real
  }
  pub fn imag(&self) -> &nas::CscMatrix<f64> {
    &self.imag
  }
  pub fn real_rc(&self) -> Rc<nas::CscMatrix<f64>> {
    Rc::clone(&self.real)
  }
  pub fn imag_rc(&self) -> Rc<nas::CscMatrix<f64>> {
    Rc::clone(&self.imag)
  }

  /// Rows/columns of one half; the complex operator acts on vectors of
  /// twice this length.
  pub fn part_nrows(&self) -> usize {
    self.real.nrows()
  }
  pub fn part_ncols(&self) -> usize {
    self.real.ncols()
  }

  /// The convention-signed action `(A_r x_r - s A_i x_i, A_r x_i + s A_i x_r)`
  /// on a composite vector. Under `Hermitian` this coincides with
  /// [`Self::system_matrix`]; under `BlockSymmetric` the signed action
  /// expects convention-encoded (imaginary-negated) operands.
  pub fn mult(&self, x: &ComplexVector, y: &mut ComplexVector) {
    assert!(x.size() == 2 * self.part_ncols(), "input vector of incorrect size");
    complex_mult(&*self.real, &*self.imag, self.conv.sign(), x, y);
  }

  /// The real-equivalent `2M × 2M` block matrix for handing the system to a
  /// real linear solver.
  pub fn system_matrix(&self) -> nas::CscMatrix<f64> {
    block_system_matrix(&self.real, &self.imag, self.conv)
  }
}

/// The real-equivalent block layout of `A_r + i A_i` under a convention:
/// `[[A_r, -A_i], [A_i, A_r]]` for `Hermitian`,
/// `[[A_r, -A_i], [-A_i, -A_r]]` for `BlockSymmetric`.
///
/// Both encode the same complex equations (the `BlockSymmetric` layout has
/// its second block row negated, matching the negated assembled imaginary
/// right-hand side), so the solution vector `(x_r, x_i)` is the same.
pub fn block_system_matrix(
  real: &nas::CscMatrix<f64>,
  imag: &nas::CscMatrix<f64>,
  conv: Convention,
) -> nas::CscMatrix<f64> {
  let n = real.nrows();
  let m = real.ncols();
  let mut coo = nas::CooMatrix::new(2 * n, 2 * m);
  for (i, j, &v) in real.triplet_iter() {
    coo.push(i, j, v);
    match conv {
      Convention::Hermitian => coo.push(n + i, m + j, v),
      Convention::BlockSymmetric => coo.push(n + i, m + j, -v),
    }
  }
  for (i, j, &v) in imag.triplet_iter() {
    coo.push(i, m + j, -v);
    match conv {
      Convention::Hermitian => coo.push(n + i, j, v),
      Convention::BlockSymmetric => coo.push(n + i, j, -v),
    }
  }
  nas::CscMatrix::from(&coo)
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::linalg::csc_mul_vec;

  fn small_matrices() -> (Rc<nas::CscMatrix<f64>>, Rc<nas::CscMatrix<f64>>) {
    let mut ar = nas::CooMatrix::new(2, 2);
    ar.push(0, 0, 2.0);
    ar.push(1, 1, 3.0);
    let mut ai = nas::CooMatrix::new(2, 2);
    ai.push(0, 1, 1.0);
    ai.push(1, 0, -1.0);
    (
      Rc::new(nas::CscMatrix::from(&ar)),
      Rc::new(nas::CscMatrix::from(&ai)),
    )
  }

  #[test]
  fn mult_matches_block_formula() {
    let (ar, ai) = small_matrices();
    let mut x = ComplexVector::new(2);
    x.real_slice_mut().copy_from_slice(&[1.0, 2.0]);
    x.imag_slice_mut().copy_from_slice(&[-1.0, 0.5]);

    for conv in [Convention::Hermitian, Convention::BlockSymmetric] {
      let a = ComplexSparseMatrix::new(Rc::clone(&ar), Rc::clone(&ai), conv);
      let s = conv.sign();

      let mut y = ComplexVector::new(2);
      a.mult(&x, &mut y);

      let yr = csc_mul_vec(&ar, x.real()) - s * csc_mul_vec(&ai, x.imag());
      let yi = csc_mul_vec(&ar, x.imag()) + s * csc_mul_vec(&ai, x.real());
      assert!((y.real().clone_owned() - yr).norm() <= 1e-14);
      assert!((y.imag().clone_owned() - yi).norm() <= 1e-14);
    }
  }

  #[test]
  fn block_symmetric_system_matrix_is_symmetric() {
    // with symmetric halves the BlockSymmetric layout must be symmetric
    let mut ar = nas::CooMatrix::new(2, 2);
    ar.push(0, 0, 2.0);
    ar.push(0, 1, -1.0);
    ar.push(1, 0, -1.0);
    ar.push(1, 1, 2.0);
    let mut ai = nas::CooMatrix::new(2, 2);
    ai.push(0, 0, 0.5);
    ai.push(1, 1, 0.5);
    let a = ComplexSparseMatrix::new(
      Rc::new(nas::CscMatrix::from(&ar)),
      Rc::new(nas::CscMatrix::from(&ai)),
      Convention::BlockSymmetric,
    );
    let sys = na::DMatrix::from(&a.system_matrix());
    assert!((&sys - sys.transpose()).norm() <= 1e-14);
  }

  #[test]
  fn hermitian_system_matrix_solves_complex_system() {
    let (ar, ai) = small_matrices();
    let a = ComplexSparseMatrix::new(ar, ai, Convention::Hermitian);

    // pick x, compute y = A x complexly, then check the block matrix maps
    // (x_r, x_i) to (y_r, y_i)
    let mut x = ComplexVector::new(2);
    x.real_slice_mut().copy_from_slice(&[1.0, -2.0]);
    x.imag_slice_mut().copy_from_slice(&[0.5, 1.5]);
    let mut y = ComplexVector::new(2);
    a.mult(&x, &mut y);

    let sys = a.system_matrix();
    let block_y = csc_mul_vec(&sys, x.as_vector().as_view());
    assert!((block_y - y.as_vector()).norm() <= 1e-14);
  }
}
