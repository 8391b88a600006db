//! Complex grid functions: two real fields sharing the halves of one
//! composite vector.

use crate::{
  coefficient::{Coefficient, VectorCoefficient},
  complex::vector::ComplexVector,
  gridfunc, linalg,
  space::FeSpace,
};

use std::rc::Rc;

pub struct ComplexGridFunction {
  space: Rc<FeSpace>,
  vec: ComplexVector,
}

impl ComplexGridFunction {
  pub fn new(space: &Rc<FeSpace>) -> Self {
    Self {
      space: Rc::clone(space),
      vec: ComplexVector::new(space.vsize()),
    }
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

  /// Point values of both parts.
  pub fn value(&self, cell: usize, bary: na::DVectorView<f64>) -> num_complex::Complex64 {
    num_complex::Complex64::new(
      gridfunc::value_of(&self.space, self.vec.real_slice(), cell, bary),
      gridfunc::value_of(&self.space, self.vec.imag_slice(), cell, bary),
    )
  }

  /// Projects the real coefficient into the real part and the imaginary
  /// coefficient into the imaginary part; there are no cross terms.
  pub fn project_coefficient(&mut self, real: &dyn Coefficient, imag: &dyn Coefficient) {
    let (re, im) = self.vec.split_slices_mut();
    gridfunc::project_into(&self.space, real, re);
    gridfunc::project_into(&self.space, imag, im);
  }

  pub fn project_bdr_coefficient(
    &mut self,
    real: &dyn Coefficient,
    imag: &dyn Coefficient,
    marker: &[bool],
  ) {
    let (re, im) = self.vec.split_slices_mut();
    gridfunc::project_bdr_into(&self.space, real, Some(marker), re);
    gridfunc::project_bdr_into(&self.space, imag, Some(marker), im);
  }

  pub fn project_bdr_coefficient_normal(
    &mut self,
    real: &dyn VectorCoefficient,
    imag: &dyn VectorCoefficient,
    marker: &[bool],
  ) {
    let (re, im) = self.vec.split_slices_mut();
    gridfunc::project_bdr_normal_into(&self.space, real, Some(marker), re);
    gridfunc::project_bdr_normal_into(&self.space, imag, Some(marker), im);
  }

  pub fn project_bdr_coefficient_tangent(
    &mut self,
    real: &dyn VectorCoefficient,
    imag: &dyn VectorCoefficient,
    marker: &[bool],
  ) {
    let (re, im) = self.vec.split_slices_mut();
    gridfunc::project_bdr_tangent_into(&self.space, real, Some(marker), re);
    gridfunc::project_bdr_tangent_into(&self.space, imag, Some(marker), im);
  }

  /// Adjusts both parts to a space that replaced the one this field was
  /// built on. With an update operator the parts are interpolated onto the
  /// new dofs and the composite buffer is rebuilt around them; without one
  /// no value transfer is meaningful and only the buffer is resized. Either
  /// way the halves end up aliased into the one resized buffer, and an
  /// update with nothing changed leaves the values untouched.
  pub fn update(&mut self, space: &Rc<FeSpace>) {
    let vsize = space.vsize();
    if let Some(t) = space.update_operator() {
      let re = linalg::csc_mul_vec(t, self.vec.real());
      let im = linalg::csc_mul_vec(t, self.vec.imag());
      self.vec.resize(vsize);
      self.vec.real_slice_mut().copy_from_slice(re.as_slice());
      self.vec.imag_slice_mut().copy_from_slice(im.as_slice());
    } else {
      self.vec.resize(vsize);
    }
    self.space = Rc::clone(space);
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::{mesh::SimplicialMesh, space::FeSpace};

  #[test]
  fn sizes_and_aliasing() {
    let mesh = Rc::new(SimplicialMesh::interval(0.0, 1.0, 6));
    let space = Rc::new(FeSpace::new(mesh, 1));
    let n = space.vsize();
    let gf = ComplexGridFunction::new(&space);
    assert_eq!(gf.real().len(), n);
    assert_eq!(gf.imag().len(), n);
    assert_eq!(gf.vec().size(), 2 * n);
    let dist =
      unsafe { gf.vec().imag_slice().as_ptr().offset_from(gf.vec().real_slice().as_ptr()) };
    assert_eq!(dist, n as isize);
  }

  #[test]
  fn projection_fills_both_parts() {
    let mesh = Rc::new(SimplicialMesh::interval(0.0, 1.0, 4));
    let space = Rc::new(FeSpace::new(Rc::clone(&mesh), 1));
    let mut gf = ComplexGridFunction::new(&space);
    gf.project_coefficient(
      &|x: &na::DVector<f64>| x[0],
      &|x: &na::DVector<f64>| 1.0 - x[0],
    );
    for v in 0..mesh.nvertices() {
      let x = mesh.vertex(v)[0];
      assert!((gf.real()[v] - x).abs() <= 1e-14);
      assert!((gf.imag()[v] - (1.0 - x)).abs() <= 1e-14);
    }
  }

  #[test]
  fn update_without_mesh_change_is_identity() {
    let mesh = Rc::new(SimplicialMesh::interval(0.0, 1.0, 4));
    let space = Rc::new(FeSpace::new(mesh, 1));
    let mut gf = ComplexGridFunction::new(&space);
    gf.project_coefficient(
      &|x: &na::DVector<f64>| x[0] + 1.0,
      &|x: &na::DVector<f64>| -x[0],
    );
    let before = gf.vec().clone();
    gf.update(&space);
    assert_eq!(gf.vec(), &before);
  }

  #[test]
  fn update_through_refinement_interpolates_both_parts() {
    let coarse_mesh = Rc::new(SimplicialMesh::interval(0.0, 1.0, 2));
    let coarse = Rc::new(FeSpace::new(Rc::clone(&coarse_mesh), 1));
    let mut gf = ComplexGridFunction::new(&coarse);
    gf.project_coefficient(
      &|x: &na::DVector<f64>| 2.0 * x[0],
      &|x: &na::DVector<f64>| 1.0 - x[0],
    );

    let (fine_mesh, map) = coarse_mesh.uniform_refine();
    let fine = Rc::new(FeSpace::refined_from(&coarse, Rc::new(fine_mesh), &map));
    gf.update(&fine);

    assert_eq!(gf.vec().size(), 2 * fine.vsize());
    for dof in 0..fine.vsize() {
      let (cell, bary) = fine.dof_element(dof);
      let x = fine.mesh().cell_geometry(cell).bary_to_phys(bary)[0];
      assert!((gf.real()[dof] - 2.0 * x).abs() <= 1e-13);
      assert!((gf.imag()[dof] - (1.0 - x)).abs() <= 1e-13);
    }
  }
}
