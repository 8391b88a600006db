//! Sesquilinear forms: a pair of independently assembled real bilinear
//! forms reduced to one boundary-eliminated complex system.

use crate::{
  assemble::BilinearForm,
  complex::{operator::Convention, vector::ComplexVector, ComplexSparseMatrix},
  fe::{BilinearIntegrator, FacetBilinearIntegrator, InteriorFacetIntegrator},
  space::FeSpace,
  DofIdx,
};

use std::rc::Rc;

/// A complex bilinear form `a_r + i a_i`, realized as two real bilinear
/// forms (no shared storage — each assembles its own operator) plus the
/// sign convention.
pub struct SesquilinearForm {
  conv: Convention,
  blfr: BilinearForm,
  blfi: BilinearForm,
}

impl SesquilinearForm {
  pub fn new(space: &Rc<FeSpace>, conv: Convention) -> Self {
    Self {
      conv,
      blfr: BilinearForm::new(space),
      blfi: BilinearForm::new(space),
    }
  }

  pub fn convention(&self) -> Convention {
    self.conv
  }
  pub fn real_form(&self) -> &BilinearForm {
    &self.blfr
  }
  pub fn imag_form(&self) -> &BilinearForm {
    &self.blfi
  }

  /// Adds a `(real, imag)` integrator pair; either half may be absent.
  pub fn add_domain_integrator(
    &mut self,
    real: Option<Box<dyn BilinearIntegrator>>,
    imag: Option<Box<dyn BilinearIntegrator>>,
  ) {
    if let Some(integrator) = real {
      self.blfr.add_domain_integrator(integrator);
    }
    if let Some(integrator) = imag {
      self.blfi.add_domain_integrator(integrator);
    }
  }

  pub fn add_boundary_integrator(
    &mut self,
    real: Option<Box<dyn FacetBilinearIntegrator>>,
    imag: Option<Box<dyn FacetBilinearIntegrator>>,
  ) {
    if let Some(integrator) = real {
      self.blfr.add_boundary_integrator(integrator);
    }
    if let Some(integrator) = imag {
      self.blfi.add_boundary_integrator(integrator);
    }
  }

  pub fn add_boundary_integrator_marked(
    &mut self,
    real: Option<Box<dyn FacetBilinearIntegrator>>,
    imag: Option<Box<dyn FacetBilinearIntegrator>>,
    marker: Vec<bool>,
  ) {
    if let Some(integrator) = real {
      self.blfr.add_boundary_integrator_marked(integrator, marker.clone());
    }
    if let Some(integrator) = imag {
      self.blfi.add_boundary_integrator_marked(integrator, marker);
    }
  }

  pub fn add_interior_face_integrator(
    &mut self,
    real: Option<Box<dyn InteriorFacetIntegrator>>,
    imag: Option<Box<dyn InteriorFacetIntegrator>>,
  ) {
    if let Some(integrator) = real {
      self.blfr.add_interior_face_integrator(integrator);
    }
    if let Some(integrator) = imag {
      self.blfi.add_interior_face_integrator(integrator);
    }
  }

  pub fn add_bdr_face_integrator(
    &mut self,
    real: Option<Box<dyn FacetBilinearIntegrator>>,
    imag: Option<Box<dyn FacetBilinearIntegrator>>,
  ) {
    if let Some(integrator) = real {
      self.blfr.add_bdr_face_integrator(integrator);
    }
    if let Some(integrator) = imag {
      self.blfi.add_bdr_face_integrator(integrator);
    }
  }

  pub fn add_bdr_face_integrator_marked(
    &mut self,
    real: Option<Box<dyn FacetBilinearIntegrator>>,
    imag: Option<Box<dyn FacetBilinearIntegrator>>,
    marker: Vec<bool>,
  ) {
    if let Some(integrator) = real {
      self.blfr.add_bdr_face_integrator_marked(integrator, marker.clone());
    }
    if let Some(integrator) = imag {
      self.blfi.add_bdr_face_integrator_marked(integrator, marker);
    }
  }

  pub fn assemble(&mut self, skip_zeros: bool) {
    self.blfr.assemble(skip_zeros);
    self.blfi.assemble(skip_zeros);
  }

  pub fn finalize(&mut self, skip_zeros: bool) {
    self.blfr.finalize(skip_zeros);
    self.blfi.finalize(skip_zeros);
  }

  /// Wraps the two finalized operators as one complex matrix without
  /// transferring them out of the form.
  pub fn assemble_complex_matrix(&self) -> ComplexSparseMatrix {
    ComplexSparseMatrix::new(self.blfr.spmat(), self.blfi.spmat(), self.conv)
  }

  /// Reduces the complex system `(A_r + i A_i)(x_r + i x_i) = b_r + i b_i`
  /// over the essential dofs.
  ///
  /// The decomposition runs the real provider's elimination once per
  /// real/imaginary input/output combination, in a fixed order: the first
  /// pass finalizes `A_r`'s essential-dof treatment, which the third pass
  /// reuses; the imaginary-operator passes run against a zero right-hand
  /// side and only contribute the cross terms `∓ A_i x` to the outputs.
  pub fn form_linear_system(
    &mut self,
    ess_tdofs: &[DofIdx],
    x: &ComplexVector,
    b: &ComplexVector,
    copy_interior: bool,
  ) -> (ComplexSparseMatrix, ComplexVector, ComplexVector) {
    let vsize = self.blfr.space().vsize();
    let s = self.conv.sign();

    assert!(x.size() == 2 * vsize, "input grid function of incorrect size");
    assert!(b.size() == 2 * vsize, "input linear form of incorrect size");

    let x_r = x.real().clone_owned();
    let x_i = x.imag().clone_owned();
    let b_r = b.real().clone_owned();
    let b_i = s * b.imag().clone_owned();

    let zero = na::DVector::zeros(vsize);

    // real part of the output: A_r against (x_r, b_r) ...
    let (x_0, b_0) = self.blfr.form_linear_system(ess_tdofs, &x_r, &b_r, copy_interior);

    let tvsize = b_0.len();
    let mut big_x = ComplexVector::new(tvsize);
    let mut big_b = ComplexVector::new(tvsize);
    big_x.real_slice_mut().copy_from_slice(x_0.as_slice());
    big_b.real_slice_mut().copy_from_slice(b_0.as_slice());

    // ... minus the cross term A_i x_i
    let (_, b_0) = self.blfi.form_linear_system(ess_tdofs, &x_i, &zero, false);
    for (dst, v) in big_b.real_slice_mut().iter_mut().zip(b_0.iter()) {
      *dst -= v;
    }

    // imaginary part of the output: A_r (already eliminated) against
    // (x_i, b_i) ...
    let (x_0, b_0) = self.blfr.form_linear_system(ess_tdofs, &x_i, &b_i, copy_interior);
    big_x.imag_slice_mut().copy_from_slice(x_0.as_slice());
    big_b.imag_slice_mut().copy_from_slice(b_0.as_slice());

    // ... plus the cross term A_i x_r
    let (_, b_0) = self.blfi.form_linear_system(ess_tdofs, &x_r, &zero, false);
    for (dst, v) in big_b.imag_slice_mut().iter_mut().zip(b_0.iter()) {
      *dst += v;
    }

    for v in big_b.imag_slice_mut() {
      *v *= s;
    }

    // A = A_r + i A_i, sharing the providers' eliminated operators
    let a = ComplexSparseMatrix::new(self.blfr.spmat(), self.blfi.spmat(), self.conv);
    (a, big_x, big_b)
  }

  /// Maps a reduced solution back onto the full discretization: through the
  /// conforming prolongation per part if one exists, otherwise by a straight
  /// copy — which requires the sizes to match (no dofs were eliminated from
  /// the numbering).
  pub fn recover_fem_solution(
    &self,
    x_reduced: &ComplexVector,
    _b: &ComplexVector,
    x: &mut ComplexVector,
  ) {
    let space = self.blfr.space();
    match space.conforming_prolongation() {
      None => {
        assert!(
          x_reduced.size() == x.size(),
          "solution recovery without a prolongation requires matching sizes"
        );
        x.as_vector_mut().copy_from(x_reduced.as_vector());
      }
      Some(p) => {
        let re = crate::linalg::csc_mul_vec(p, x_reduced.real());
        let im = crate::linalg::csc_mul_vec(p, x_reduced.imag());
        x.resize(re.len());
        x.real_slice_mut().copy_from_slice(re.as_slice());
        x.imag_slice_mut().copy_from_slice(im.as_slice());
      }
    }
  }

  /// Rebinds both real forms to a (possibly refreshed) space.
  pub fn update(&mut self, space: &Rc<FeSpace>) {
    self.blfr.update(space);
    self.blfi.update(space);
  }
}
