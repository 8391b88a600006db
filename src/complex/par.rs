//! Parallel counterparts of the complex fields, forms and operators,
//! mirroring the serial logic on true dofs through the capability
//! interfaces of [`crate::par`].

use crate::{
  assemble::LfIntegrators,
  coefficient::{Coefficient, VectorCoefficient},
  complex::{
    operator::{block_system_matrix, complex_mult, ComplexOperator, Convention},
    vector::ComplexVector,
  },
  fe::{
    BilinearIntegrator, FacetBilinearIntegrator, FacetLinearFormIntegrator,
    InteriorFacetIntegrator, LinearFormIntegrator,
  },
  gridfunc, linalg,
  par::{OperatorHandle, ParBilinearForm, ParFeSpace, ParSparseMatrix},
  DofIdx,
};

use num_complex::Complex64;
use std::rc::Rc;

/// A complex field over a distributed space.
pub struct ParComplexGridFunction {
  pfes: Rc<ParFeSpace>,
  vec: ComplexVector,
}

impl ParComplexGridFunction {
  pub fn new(pfes: &Rc<ParFeSpace>) -> Self {
    Self {
      pfes: Rc::clone(pfes),
      vec: ComplexVector::new(pfes.vsize()),
    }
  }

  pub fn pfes(&self) -> &Rc<ParFeSpace> {
    &self.pfes
  }
  pub fn vec(&self) -> &ComplexVector {
    &self.vec
  }
  pub fn vec_mut(&mut self) -> &mut ComplexVector {
    &mut self.vec
  }
  pub fn real(&self) -> na::DVectorView<f64> {
    self.vec.real()
  }
  pub fn imag(&self) -> na::DVectorView<f64> {
    self.vec.imag()
  }

  pub fn project_coefficient(&mut self, real: &dyn Coefficient, imag: &dyn Coefficient) {
    let space = Rc::clone(self.pfes.space());
    let (re, im) = self.vec.split_slices_mut();
    gridfunc::project_into(&space, real, re);
    gridfunc::project_into(&space, imag, im);
  }

  pub fn project_bdr_coefficient(
    &mut self,
    real: &dyn Coefficient,
    imag: &dyn Coefficient,
    marker: &[bool],
  ) {
    let space = Rc::clone(self.pfes.space());
    let (re, im) = self.vec.split_slices_mut();
    gridfunc::project_bdr_into(&space, real, Some(marker), re);
    gridfunc::project_bdr_into(&space, imag, Some(marker), im);
  }

  pub fn project_bdr_coefficient_normal(
    &mut self,
    real: &dyn VectorCoefficient,
    imag: &dyn VectorCoefficient,
    marker: &[bool],
  ) {
    let space = Rc::clone(self.pfes.space());
    let (re, im) = self.vec.split_slices_mut();
    gridfunc::project_bdr_normal_into(&space, real, Some(marker), re);
    gridfunc::project_bdr_normal_into(&space, imag, Some(marker), im);
  }

  pub fn project_bdr_coefficient_tangent(
    &mut self,
    real: &dyn VectorCoefficient,
    imag: &dyn VectorCoefficient,
    marker: &[bool],
  ) {
    let space = Rc::clone(self.pfes.space());
    let (re, im) = self.vec.split_slices_mut();
    gridfunc::project_bdr_tangent_into(&space, real, Some(marker), re);
    gridfunc::project_bdr_tangent_into(&space, imag, Some(marker), im);
  }

  /// Fills both parts from a composite true-dof vector through the
  /// prolongation.
  pub fn distribute(&mut self, tv: &ComplexVector) {
    assert!(tv.size() == 2 * self.pfes.true_vsize(), "true-dof vector of incorrect size");
    let re = self.pfes.prolongate(tv.real());
    let im = self.pfes.prolongate(tv.imag());
    self.vec.resize(re.len());
    self.vec.real_slice_mut().copy_from_slice(re.as_slice());
    self.vec.imag_slice_mut().copy_from_slice(im.as_slice());
  }

  /// Restricts both parts to a composite true-dof vector.
  pub fn parallel_project(&self) -> ComplexVector {
    let re = self.pfes.restrict(self.vec.real());
    let im = self.pfes.restrict(self.vec.imag());
    ComplexVector::from_parts(re.as_view(), im.as_view())
  }

  /// Same two-branch update as the serial field, against the refreshed
  /// distributed space.
  pub fn update(&mut self, pfes: &Rc<ParFeSpace>) {
    let vsize = pfes.vsize();
    if let Some(t) = pfes.space().update_operator() {
      let re = linalg::csc_mul_vec(t, self.vec.real());
      let im = linalg::csc_mul_vec(t, self.vec.imag());
      self.vec.resize(vsize);
      self.vec.real_slice_mut().copy_from_slice(re.as_slice());
      self.vec.imag_slice_mut().copy_from_slice(im.as_slice());
    } else {
      self.vec.resize(vsize);
    }
    self.pfes = Rc::clone(pfes);
  }
}

/// A complex linear form over a distributed space; carries the doubled
/// true-dof partition offsets for global addressing of composite vectors.
pub struct ParComplexLinearForm {
  conv: Convention,
  pfes: Rc<ParFeSpace>,
  vec: ComplexVector,
  real: LfIntegrators,
  imag: LfIntegrators,
  tdof_offsets: Vec<usize>,
}

impl ParComplexLinearForm {
  pub fn new(pfes: &Rc<ParFeSpace>, conv: Convention) -> Self {
    let tdof_offsets = pfes.tdof_offsets().iter().map(|&o| 2 * o).collect();
    Self {
      conv,
      pfes: Rc::clone(pfes),
      vec: ComplexVector::new(pfes.vsize()),
      real: LfIntegrators::new(),
      imag: LfIntegrators::new(),
      tdof_offsets,
    }
  }

  pub fn convention(&self) -> Convention {
    self.conv
  }
  pub fn pfes(&self) -> &Rc<ParFeSpace> {
    &self.pfes
  }
  /// Partition offsets of the composite (doubled) true-dof vector.
  pub fn tdof_offsets(&self) -> &[usize] {
    &self.tdof_offsets
  }
  pub fn vec(&self) -> &ComplexVector {
    &self.vec
  }
  pub fn real(&self) -> na::DVectorView<f64> {
    self.vec.real()
  }
  pub fn imag(&self) -> na::DVectorView<f64> {
    self.vec.imag()
  }

  pub fn add_domain_integrator(
    &mut self,
    real: Option<Box<dyn LinearFormIntegrator>>,
    imag: Option<Box<dyn LinearFormIntegrator>>,
  ) {
    if let Some(integrator) = real {
      self.real.add_domain(integrator);
    }
    if let Some(integrator) = imag {
      self.imag.add_domain(integrator);
    }
  }

  pub fn add_boundary_integrator(
    &mut self,
    real: Option<Box<dyn FacetLinearFormIntegrator>>,
    imag: Option<Box<dyn FacetLinearFormIntegrator>>,
  ) {
    if let Some(integrator) = real {
      self.real.add_boundary(integrator, None);
    }
    if let Some(integrator) = imag {
      self.imag.add_boundary(integrator, None);
    }
  }

  pub fn add_boundary_integrator_marked(
    &mut self,
    real: Option<Box<dyn FacetLinearFormIntegrator>>,
    imag: Option<Box<dyn FacetLinearFormIntegrator>>,
    marker: Vec<bool>,
  ) {
    if let Some(integrator) = real {
      self.real.add_boundary(integrator, Some(marker.clone()));
    }
    if let Some(integrator) = imag {
      self.imag.add_boundary(integrator, Some(marker));
    }
  }

  pub fn add_bdr_face_integrator(
    &mut self,
    real: Option<Box<dyn FacetLinearFormIntegrator>>,
    imag: Option<Box<dyn FacetLinearFormIntegrator>>,
  ) {
    if let Some(integrator) = real {
      self.real.add_bdr_face(integrator, None);
    }
    if let Some(integrator) = imag {
      self.imag.add_bdr_face(integrator, None);
    }
  }

  pub fn add_bdr_face_integrator_marked(
    &mut self,
    real: Option<Box<dyn FacetLinearFormIntegrator>>,
    imag: Option<Box<dyn FacetLinearFormIntegrator>>,
    marker: Vec<bool>,
  ) {
    if let Some(integrator) = real {
      self.real.add_bdr_face(integrator, Some(marker.clone()));
    }
    if let Some(integrator) = imag {
      self.imag.add_bdr_face(integrator, Some(marker));
    }
  }

  pub fn assemble(&mut self) {
    let space = Rc::clone(self.pfes.space());
    let (re, im) = self.vec.split_slices_mut();
    self.real.assemble_into(&space, re);
    self.imag.assemble_into(&space, im);
    if self.conv == Convention::BlockSymmetric {
      for v in im.iter_mut() {
        *v = -*v;
      }
    }
  }

  /// The assembled functional on composite true dofs.
  pub fn parallel_assemble(&self) -> ComplexVector {
    let p = self.pfes.prolongation_matrix();
    let re = linalg::csc_tr_mul_vec(&p, self.vec.real());
    let im = linalg::csc_tr_mul_vec(&p, self.vec.imag());
    ComplexVector::from_parts(re.as_view(), im.as_view())
  }

  pub fn update(&mut self, pfes: &Rc<ParFeSpace>) {
    self.pfes = Rc::clone(pfes);
    self.tdof_offsets = pfes.tdof_offsets().iter().map(|&o| 2 * o).collect();
    self.vec.resize(pfes.vsize());
  }

  /// The sesquilinear pairing, with every dot product reduced over the
  /// communicator.
  pub fn eval(&self, gf: &ParComplexGridFunction) -> Complex64 {
    let s = self.conv.sign();
    let comm = self.pfes.comm();
    let lfr_gr = comm.allreduce_sum(self.vec.real().dot(&gf.real()));
    let lfr_gi = comm.allreduce_sum(self.vec.real().dot(&gf.imag()));
    let lfi_gr = comm.allreduce_sum(self.vec.imag().dot(&gf.real()));
    let lfi_gi = comm.allreduce_sum(self.vec.imag().dot(&gf.imag()));
    Complex64::new(lfr_gr - s * lfi_gi, lfr_gi + s * lfi_gr)
  }
}

/// A complex operator with distributed-matrix halves.
#[derive(Debug, Clone)]
pub struct ComplexParMatrix {
  real: Rc<ParSparseMatrix>,
  imag: Rc<ParSparseMatrix>,
  conv: Convention,
}

impl ComplexParMatrix {
  pub fn new(real: Rc<ParSparseMatrix>, imag: Rc<ParSparseMatrix>, conv: Convention) -> Self {
    assert!(
      real.mat().nrows() == imag.mat().nrows() && real.mat().ncols() == imag.mat().ncols(),
      "real and imaginary matrix halves of different shape"
    );
    Self { real, imag, conv }
  }

  pub fn convention(&self) -> Convention {
    self.conv
  }
  pub fn real(&self) -> &ParSparseMatrix {
    &self.real
  }
  pub fn imag(&self) -> &ParSparseMatrix {
    &self.imag
  }
  pub fn part_nrows(&self) -> usize {
    self.real.mat().nrows()
  }

  pub fn mult(&self, x: &ComplexVector, y: &mut ComplexVector) {
    assert!(x.size() == 2 * self.real.mat().ncols(), "input vector of incorrect size");
    complex_mult(&*self.real, &*self.imag, self.conv.sign(), x, y);
  }

  /// The real-equivalent block matrix of this rank's true-dof blocks.
  pub fn system_matrix(&self) -> nas::CscMatrix<f64> {
    block_system_matrix(self.real.mat(), self.imag.mat(), self.conv)
  }
}

/// The reduced complex operator of a distributed system: matrix-backed when
/// both halves are parallel matrices, the generic wrapper otherwise.
pub enum ComplexParOperator {
  Matrix(ComplexParMatrix),
  Operator(ComplexOperator),
}

impl ComplexParOperator {
  pub fn mult(&self, x: &ComplexVector, y: &mut ComplexVector) {
    match self {
      ComplexParOperator::Matrix(m) => m.mult(x, y),
      ComplexParOperator::Operator(op) => op.mult(x, y),
    }
  }
}

/// Wraps two reduced-operator handles as one complex operator, falling back
/// to the generic wrapper when either half is not a parallel matrix.
pub fn wrap_complex_operator(
  a_r: OperatorHandle,
  a_i: OperatorHandle,
  conv: Convention,
) -> ComplexParOperator {
  match (a_r, a_i) {
    (OperatorHandle::Par(real), OperatorHandle::Par(imag)) => {
      ComplexParOperator::Matrix(ComplexParMatrix::new(real, imag, conv))
    }
    (a_r, a_i) => ComplexParOperator::Operator(ComplexOperator::new(
      a_r.as_operator(),
      a_i.as_operator(),
      conv,
    )),
  }
}

/// A sesquilinear form over a distributed space.
pub struct ParSesquilinearForm {
  conv: Convention,
  pblfr: ParBilinearForm,
  pblfi: ParBilinearForm,
}

impl ParSesquilinearForm {
  pub fn new(pfes: &Rc<ParFeSpace>, conv: Convention) -> Self {
    Self {
      conv,
      pblfr: ParBilinearForm::new(pfes),
      pblfi: ParBilinearForm::new(pfes),
    }
  }

  pub fn convention(&self) -> Convention {
    self.conv
  }
  pub fn real_form(&self) -> &ParBilinearForm {
    &self.pblfr
  }
  pub fn imag_form(&self) -> &ParBilinearForm {
    &self.pblfi
  }

  pub fn add_domain_integrator(
    &mut self,
    real: Option<Box<dyn BilinearIntegrator>>,
    imag: Option<Box<dyn BilinearIntegrator>>,
  ) {
    if let Some(integrator) = real {
      self.pblfr.local_mut().add_domain_integrator(integrator);
    }
    if let Some(integrator) = imag {
      self.pblfi.local_mut().add_domain_integrator(integrator);
    }
  }

  pub fn add_boundary_integrator(
    &mut self,
    real: Option<Box<dyn FacetBilinearIntegrator>>,
    imag: Option<Box<dyn FacetBilinearIntegrator>>,
  ) {
    if let Some(integrator) = real {
      self.pblfr.local_mut().add_boundary_integrator(integrator);
    }
    if let Some(integrator) = imag {
      self.pblfi.local_mut().add_boundary_integrator(integrator);
    }
  }

  pub fn add_boundary_integrator_marked(
    &mut self,
    real: Option<Box<dyn FacetBilinearIntegrator>>,
    imag: Option<Box<dyn FacetBilinearIntegrator>>,
    marker: Vec<bool>,
  ) {
    if let Some(integrator) = real {
      self.pblfr.local_mut().add_boundary_integrator_marked(integrator, marker.clone());
    }
    if let Some(integrator) = imag {
      self.pblfi.local_mut().add_boundary_integrator_marked(integrator, marker);
    }
  }

  pub fn add_interior_face_integrator(
    &mut self,
    real: Option<Box<dyn InteriorFacetIntegrator>>,
    imag: Option<Box<dyn InteriorFacetIntegrator>>,
  ) {
    if let Some(integrator) = real {
      self.pblfr.local_mut().add_interior_face_integrator(integrator);
    }
    if let Some(integrator) = imag {
      self.pblfi.local_mut().add_interior_face_integrator(integrator);
    }
  }

  pub fn add_bdr_face_integrator(
    &mut self,
    real: Option<Box<dyn FacetBilinearIntegrator>>,
    imag: Option<Box<dyn FacetBilinearIntegrator>>,
  ) {
    if let Some(integrator) = real {
      self.pblfr.local_mut().add_bdr_face_integrator(integrator);
    }
    if let Some(integrator) = imag {
      self.pblfi.local_mut().add_bdr_face_integrator(integrator);
    }
  }

  pub fn add_bdr_face_integrator_marked(
    &mut self,
    real: Option<Box<dyn FacetBilinearIntegrator>>,
    imag: Option<Box<dyn FacetBilinearIntegrator>>,
    marker: Vec<bool>,
  ) {
    if let Some(integrator) = real {
      self.pblfr.local_mut().add_bdr_face_integrator_marked(integrator, marker.clone());
    }
    if let Some(integrator) = imag {
      self.pblfi.local_mut().add_bdr_face_integrator_marked(integrator, marker);
    }
  }

  pub fn assemble(&mut self, skip_zeros: bool) {
    self.pblfr.assemble(skip_zeros);
    self.pblfi.assemble(skip_zeros);
  }

  pub fn finalize(&mut self, skip_zeros: bool) {
    self.pblfr.finalize(skip_zeros);
    self.pblfi.finalize(skip_zeros);
  }

  /// The assembled complex operator on true dofs.
  pub fn parallel_assemble(&mut self) -> ComplexParMatrix {
    let real = self.pblfr.parallel_assemble();
    let imag = self.pblfi.parallel_assemble();
    ComplexParMatrix::new(real, imag, self.conv)
  }

  /// The true-dof rendition of the serial reduction, plus the two
  /// distributed-only fixups: essential rows of the imaginary block lose
  /// their diagonal (the complex identity lives on the real block only) and
  /// carry the prescribed values straight through the right-hand side.
  pub fn form_linear_system(
    &mut self,
    ess_tdofs: &[DofIdx],
    x: &ComplexVector,
    b: &ComplexVector,
    copy_interior: bool,
  ) -> (ComplexParOperator, ComplexVector, ComplexVector) {
    let vsize = self.pblfr.pfes().vsize();
    let s = self.conv.sign();

    assert!(x.size() == 2 * vsize, "input grid function of incorrect size");
    assert!(b.size() == 2 * vsize, "input linear form of incorrect size");

    let x_r = x.real().clone_owned();
    let x_i = x.imag().clone_owned();
    let b_r = b.real().clone_owned();
    let b_i = s * b.imag().clone_owned();

    let zero = na::DVector::zeros(vsize);

    let (x_0, b_0) = self.pblfr.form_linear_system(ess_tdofs, &x_r, &b_r, copy_interior);

    let tvsize = b_0.len();
    let mut big_x = ComplexVector::new(tvsize);
    let mut big_b = ComplexVector::new(tvsize);
    big_x.real_slice_mut().copy_from_slice(x_0.as_slice());
    big_b.real_slice_mut().copy_from_slice(b_0.as_slice());

    let (_, b_0) = self.pblfi.form_linear_system(ess_tdofs, &x_i, &zero, false);
    for (dst, v) in big_b.real_slice_mut().iter_mut().zip(b_0.iter()) {
      *dst -= v;
    }

    let (x_0, b_0) = self.pblfr.form_linear_system(ess_tdofs, &x_i, &b_i, copy_interior);
    big_x.imag_slice_mut().copy_from_slice(x_0.as_slice());
    big_b.imag_slice_mut().copy_from_slice(b_0.as_slice());

    let (_, b_0) = self.pblfi.form_linear_system(ess_tdofs, &x_r, &zero, false);
    for (dst, v) in big_b.imag_slice_mut().iter_mut().zip(b_0.iter()) {
      *dst += v;
    }

    for v in big_b.imag_slice_mut() {
      *v *= s;
    }

    if matches!(self.pblfi.operator_handle(), OperatorHandle::Par(_)) {
      let a_i = self.pblfi.par_matrix_mut();
      for &j in ess_tdofs {
        a_i.zero_diag_entry(j);
      }
      for &j in ess_tdofs {
        let xr = big_x.real_slice()[j];
        let xi = big_x.imag_slice()[j];
        big_b.real_slice_mut()[j] = xr;
        big_b.imag_slice_mut()[j] = xi;
      }
    }

    let a = wrap_complex_operator(
      self.pblfr.operator_handle(),
      self.pblfi.operator_handle(),
      self.conv,
    );
    (a, big_x, big_b)
  }

  /// Maps a reduced solution back to the local full numbering; the
  /// distributed variant always goes through the prolongation.
  pub fn recover_fem_solution(
    &self,
    x_reduced: &ComplexVector,
    _b: &ComplexVector,
    x: &mut ComplexVector,
  ) {
    let pfes = self.pblfr.pfes();
    let p = pfes.prolongation_matrix();
    let re = linalg::csc_mul_vec(&p, x_reduced.real());
    let im = linalg::csc_mul_vec(&p, x_reduced.imag());
    x.resize(re.len());
    x.real_slice_mut().copy_from_slice(re.as_slice());
    x.imag_slice_mut().copy_from_slice(im.as_slice());
  }

  pub fn update(&mut self, pfes: &Rc<ParFeSpace>) {
    self.pblfr.update(pfes);
    self.pblfi.update(pfes);
  }
}
