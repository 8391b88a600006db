//! Complex linear forms: two real integrator sets assembling into the
//! halves of one composite vector.

use crate::{
  assemble::LfIntegrators,
  complex::{gridfunc::ComplexGridFunction, operator::Convention, vector::ComplexVector},
  fe::{FacetLinearFormIntegrator, LinearFormIntegrator},
  space::FeSpace,
};

use num_complex::Complex64;
use std::rc::Rc;

pub struct ComplexLinearForm {
  conv: Convention,
  space: Rc<FeSpace>,
  vec: ComplexVector,
  real: LfIntegrators,
  imag: LfIntegrators,
}

impl ComplexLinearForm {
  pub fn new(space: &Rc<FeSpace>, conv: Convention) -> Self {
    Self {
      conv,
      space: Rc::clone(space),
      vec: ComplexVector::new(space.vsize()),
      real: LfIntegrators::new(),
      imag: LfIntegrators::new(),
    }
  }

  pub fn convention(&self) -> Convention {
    self.conv
  }
  pub fn space(&self) -> &Rc<FeSpace> {
    &self.space
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

  /// Adds a `(real, imag)` integrator pair; either half may be absent and
  /// then contributes nothing.
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

  /// Assembles both halves independently; under `BlockSymmetric` the
  /// imaginary half is negated in place afterwards.
  pub fn assemble(&mut self) {
    let (re, im) = self.vec.split_slices_mut();
    self.real.assemble_into(&self.space, re);
    self.imag.assemble_into(&self.space, im);
    if self.conv == Convention::BlockSymmetric {
      for v in im.iter_mut() {
        *v = -*v;
      }
    }
  }

  /// Resizes the composite vector to the (possibly refreshed) space and
  /// re-points the halves; assembly state starts from a zero offset.
  pub fn update(&mut self, space: &Rc<FeSpace>) {
    self.space = Rc::clone(space);
    self.vec.resize(space.vsize());
  }

  /// The sesquilinear pairing `(this, g)`:
  /// `(lfr·gr − s·lfi·gi) + i (lfr·gi + s·lfi·gr)`.
  pub fn eval(&self, gf: &ComplexGridFunction) -> Complex64 {
    let s = self.conv.sign();
    let lfr = self.vec.real();
    let lfi = self.vec.imag();
    Complex64::new(
      lfr.dot(&gf.real()) - s * lfi.dot(&gf.imag()),
      lfr.dot(&gf.imag()) + s * lfi.dot(&gf.real()),
    )
  }
}
