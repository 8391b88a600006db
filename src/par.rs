//! The distribution layer, consumed through capability interfaces.
//!
//! An actual MPI runtime is out of scope; the forms and spaces here talk to
//! a [`Communicator`] (collective reductions are the only collective
//! points) and a true-dof prolongation, which is all the complex layer ever
//! needs from a distribution. [`SelfComm`] realizes the capability for a
//! single process.

use crate::{
  assemble::{BilinearForm, LinearForm},
  linalg::{self, csc_mul_vec, csc_tr_mul_vec, Operator},
  space::FeSpace,
  sparse::SparseMatrix,
  DofIdx,
};

use std::fmt;
use std::rc::Rc;

/// Collective-reduction capability of the process group a mesh is
/// distributed over. Calls block until every rank arrives.
pub trait Communicator {
  fn nranks(&self) -> usize;
  fn rank(&self) -> usize;
  fn allreduce_sum(&self, local: f64) -> f64;
  fn allreduce_max(&self, local: f64) -> f64;
}

impl fmt::Debug for dyn Communicator {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Communicator(rank {}/{})", self.rank(), self.nranks())
  }
}

/// The single-process communicator: reductions are the identity.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelfComm;

impl Communicator for SelfComm {
  fn nranks(&self) -> usize {
    1
  }
  fn rank(&self) -> usize {
    0
  }
  fn allreduce_sum(&self, local: f64) -> f64 {
    local
  }
  fn allreduce_max(&self, local: f64) -> f64 {
    local
  }
}

/// A finite element space together with its distribution capability: the
/// rank-local space, the communicator, and the prolongation from true dofs
/// to the local full numbering.
pub struct ParFeSpace {
  space: Rc<FeSpace>,
  comm: Rc<dyn Communicator>,
  prolongation: Rc<nas::CscMatrix<f64>>,
}

impl ParFeSpace {
  pub fn new(space: &Rc<FeSpace>, comm: Rc<dyn Communicator>) -> Self {
    let prolongation = match space.conforming_prolongation() {
      Some(p) => Rc::new(p.clone()),
      None => {
        let n = space.vsize();
        let mut coo = nas::CooMatrix::new(n, n);
        for i in 0..n {
          coo.push(i, i, 1.0);
        }
        Rc::new(nas::CscMatrix::from(&coo))
      }
    };
    Self {
      space: Rc::clone(space),
      comm,
      prolongation,
    }
  }

  pub fn space(&self) -> &Rc<FeSpace> {
    &self.space
  }
  pub fn comm(&self) -> &Rc<dyn Communicator> {
    &self.comm
  }

  pub fn vsize(&self) -> usize {
    self.space.vsize()
  }
  pub fn true_vsize(&self) -> usize {
    self.space.true_vsize()
  }
  pub fn global_true_vsize(&self) -> usize {
    self.comm.allreduce_sum(self.true_vsize() as f64) as usize
  }

  /// True-dof partition offsets in the old-style `[first, last, global]`
  /// layout.
  pub fn tdof_offsets(&self) -> Vec<usize> {
    let tv = self.true_vsize();
    vec![0, tv, self.global_true_vsize()]
  }

  pub fn prolongation_matrix(&self) -> Rc<nas::CscMatrix<f64>> {
    Rc::clone(&self.prolongation)
  }

  pub fn restrict(&self, x: na::DVectorView<f64>) -> na::DVector<f64> {
    self.space.restrict(x)
  }
  pub fn prolongate(&self, tx: na::DVectorView<f64>) -> na::DVector<f64> {
    self.space.prolongate(tx)
  }

  pub fn essential_true_dofs(&self, bdr_marker: &[bool]) -> Vec<DofIdx> {
    self.space.essential_true_dofs(bdr_marker)
  }
}

/// A true-dof sparse matrix: one rank's block of a distributed operator,
/// carrying its partition offsets.
#[derive(Debug, Clone)]
pub struct ParSparseMatrix {
  tdof_offsets: Vec<usize>,
  mat: nas::CscMatrix<f64>,
}

impl ParSparseMatrix {
  pub fn new(tdof_offsets: Vec<usize>, mat: nas::CscMatrix<f64>) -> Self {
    Self { tdof_offsets, mat }
  }

  pub fn tdof_offsets(&self) -> &[usize] {
    &self.tdof_offsets
  }
  pub fn mat(&self) -> &nas::CscMatrix<f64> {
    &self.mat
  }

  /// Zeroes the stored diagonal entry of a row, if present.
  pub fn zero_diag_entry(&mut self, j: usize) {
    if let Some(nas::SparseEntryMut::NonZero(v)) = self.mat.get_entry_mut(j, j) {
      *v = 0.0;
    }
  }
}

impl Operator for ParSparseMatrix {
  fn nrows(&self) -> usize {
    self.mat.nrows()
  }
  fn ncols(&self) -> usize {
    self.mat.ncols()
  }
  fn mult(&self, x: na::DVectorView<f64>, y: &mut na::DVector<f64>) {
    *y = csc_mul_vec(&self.mat, x);
  }
}

/// A tagged handle to a reduced operator, mirroring the type dispatch the
/// complex wrapping performs: parallel matrices get the matrix-backed
/// wrapper, anything else the generic operator fallback.
#[derive(Clone)]
pub enum OperatorHandle {
  Par(Rc<ParSparseMatrix>),
  Sparse(Rc<nas::CscMatrix<f64>>),
  Operator(Rc<dyn Operator>),
}

impl OperatorHandle {
  pub fn as_operator(&self) -> Rc<dyn Operator> {
    match self {
      OperatorHandle::Par(m) => Rc::clone(m) as Rc<dyn Operator>,
      OperatorHandle::Sparse(m) => Rc::clone(m) as Rc<dyn Operator>,
      OperatorHandle::Operator(op) => Rc::clone(op),
    }
  }
}

/// A linear functional over a distributed space.
pub struct ParLinearForm {
  pfes: Rc<ParFeSpace>,
  lf: LinearForm,
}

impl ParLinearForm {
  pub fn new(pfes: &Rc<ParFeSpace>) -> Self {
    Self {
      pfes: Rc::clone(pfes),
      lf: LinearForm::new(pfes.space()),
    }
  }

  pub fn pfes(&self) -> &Rc<ParFeSpace> {
    &self.pfes
  }
  pub fn local(&self) -> &LinearForm {
    &self.lf
  }
  pub fn local_mut(&mut self) -> &mut LinearForm {
    &mut self.lf
  }

  pub fn assemble(&mut self) {
    self.lf.assemble();
  }

  /// The assembled functional on true dofs: `Pᵀ` applied to the local
  /// vector sums the shared-dof contributions.
  pub fn parallel_assemble(&self) -> na::DVector<f64> {
    csc_tr_mul_vec(&self.pfes.prolongation_matrix(), self.lf.vector().as_view())
  }
}

/// A bilinear form over a distributed space: local assembly plus reduction
/// to an eliminated true-dof operator.
pub struct ParBilinearForm {
  pfes: Rc<ParFeSpace>,
  blf: BilinearForm,
  mat_par: Option<Rc<ParSparseMatrix>>,
  mat_e: Option<nas::CscMatrix<f64>>,
}

impl ParBilinearForm {
  pub fn new(pfes: &Rc<ParFeSpace>) -> Self {
    Self {
      pfes: Rc::clone(pfes),
      blf: BilinearForm::new(pfes.space()),
      mat_par: None,
      mat_e: None,
    }
  }

  pub fn pfes(&self) -> &Rc<ParFeSpace> {
    &self.pfes
  }
  pub fn local(&self) -> &BilinearForm {
    &self.blf
  }
  pub fn local_mut(&mut self) -> &mut BilinearForm {
    &mut self.blf
  }

  pub fn assemble(&mut self, skip_zeros: bool) {
    self.blf.assemble(skip_zeros);
    self.mat_par = None;
    self.mat_e = None;
  }

  pub fn finalize(&mut self, skip_zeros: bool) {
    self.blf.finalize(skip_zeros);
  }

  /// The assembled operator on true dofs, `Pᵀ A P`.
  pub fn parallel_assemble(&mut self) -> Rc<ParSparseMatrix> {
    if self.mat_par.is_none() {
      self.blf.finalize(false);
      let p = self.pfes.prolongation_matrix();
      let reduced = linalg::rap(&p, &self.blf.spmat());
      self.mat_par = Some(Rc::new(ParSparseMatrix::new(self.pfes.tdof_offsets(), reduced)));
    }
    Rc::clone(self.mat_par.as_ref().unwrap())
  }

  /// The reduced operator after `form_linear_system`.
  pub fn par_matrix_rc(&self) -> Rc<ParSparseMatrix> {
    Rc::clone(self.mat_par.as_ref().expect("form a linear system first"))
  }
  pub fn par_matrix_mut(&mut self) -> &mut ParSparseMatrix {
    Rc::make_mut(self.mat_par.as_mut().expect("form a linear system first"))
  }
  pub fn operator_handle(&self) -> OperatorHandle {
    OperatorHandle::Par(self.par_matrix_rc())
  }

  fn ensure_eliminated(&mut self, ess_tdofs: &[DofIdx]) {
    if self.mat_e.is_some() {
      return;
    }
    self.blf.finalize(false);
    let p = self.pfes.prolongation_matrix();
    let mut reduced = SparseMatrix::from_csc(&linalg::rap(&p, &self.blf.spmat()));
    let flags = linalg::indices_to_flags(ess_tdofs, reduced.nrows());
    let eliminated = reduced.eliminate_row_cols(&flags);
    self.mat_e = Some(eliminated.to_nalgebra_csc());
    self.mat_par = Some(Rc::new(ParSparseMatrix::new(
      self.pfes.tdof_offsets(),
      reduced.to_nalgebra_csc(),
    )));
  }

  /// True-dof reduction of `A x = b` over the essential dofs; the reduced
  /// operator is available through [`ParBilinearForm::par_matrix_rc`].
  pub fn form_linear_system(
    &mut self,
    ess_tdofs: &[DofIdx],
    x: &na::DVector<f64>,
    b: &na::DVector<f64>,
    copy_interior: bool,
  ) -> (na::DVector<f64>, na::DVector<f64>) {
    let vsize = self.pfes.vsize();
    assert!(x.len() == vsize, "input grid function of incorrect size");
    assert!(b.len() == vsize, "input linear form of incorrect size");

    let xt = self.pfes.restrict(x.as_view());
    let bt = csc_tr_mul_vec(&self.pfes.prolongation_matrix(), b.as_view());

    self.ensure_eliminated(ess_tdofs);
    let mat_e = self.mat_e.as_ref().unwrap();

    let mut bv = &bt - csc_mul_vec(mat_e, xt.as_view());
    let mut xv = if copy_interior {
      xt.clone()
    } else {
      na::DVector::zeros(xt.len())
    };
    for &j in ess_tdofs {
      xv[j] = xt[j];
      bv[j] = xt[j];
    }
    (xv, bv)
  }

  /// Maps a reduced solution back to the local full numbering through the
  /// prolongation.
  pub fn recover_fem_solution(
    &self,
    x_reduced: &na::DVector<f64>,
    _b: &na::DVector<f64>,
    x: &mut na::DVector<f64>,
  ) {
    *x = csc_mul_vec(&self.pfes.prolongation_matrix(), x_reduced.as_view());
  }

  pub fn update(&mut self, pfes: &Rc<ParFeSpace>) {
    self.pfes = Rc::clone(pfes);
    self.blf.update(pfes.space());
    self.mat_par = None;
    self.mat_e = None;
  }
}
