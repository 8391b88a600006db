//! Grid functions: finite element fields as dof vectors over a space.
//!
//! The projection kernels are free functions over raw value slices so that
//! composite fields (the complex layer) can apply them to aliased halves of
//! a shared buffer.

use crate::{
  coefficient::{element_point, Coefficient, VectorCoefficient},
  fe,
  mesh::CellIdx,
  space::FeSpace,
};

use std::rc::Rc;

#[derive(Clone)]
pub struct GridFunction {
  space: Rc<FeSpace>,
  values: na::DVector<f64>,
}

impl GridFunction {
  pub fn new(space: Rc<FeSpace>) -> Self {
    let values = na::DVector::zeros(space.vsize());
    Self { space, values }
  }

  pub fn space(&self) -> &Rc<FeSpace> {
    &self.space
  }
  pub fn values(&self) -> &na::DVector<f64> {
    &self.values
  }
  pub fn values_mut(&mut self) -> &mut na::DVector<f64> {
    &mut self.values
  }
  pub fn into_values(self) -> na::DVector<f64> {
    self.values
  }

  pub fn project_coefficient(&mut self, coeff: &dyn Coefficient) {
    project_into(&self.space, coeff, self.values.as_mut_slice());
  }

  pub fn project_bdr_coefficient(&mut self, coeff: &dyn Coefficient, marker: &[bool]) {
    project_bdr_into(&self.space, coeff, Some(marker), self.values.as_mut_slice());
  }

  /// Point value of the field at barycentric coordinates of a cell.
  pub fn value(&self, cell: CellIdx, bary: na::DVectorView<f64>) -> f64 {
    value_of(&self.space, self.values.as_slice(), cell, bary)
  }

  /// Adjusts the field to a space that replaced the one it was built on:
  /// with an update operator present the old values are interpolated onto
  /// the new dofs, otherwise the vector is resized and values are kept only
  /// when nothing changed size.
  pub fn update(&mut self, space: &Rc<FeSpace>) {
    if let Some(t) = space.update_operator() {
      self.values = crate::linalg::csc_mul_vec(t, self.values.as_view());
    } else {
      let n = space.vsize();
      if n != self.values.len() {
        self.values.resize_vertically_mut(n, 0.0);
      }
    }
    self.space = Rc::clone(space);
  }
}

pub fn value_of(space: &FeSpace, values: &[f64], cell: CellIdx, bary: na::DVectorView<f64>) -> f64 {
  let phi = fe::eval_basis(space.order(), space.mesh().dim(), bary);
  space
    .cell_dofs(cell)
    .iter()
    .enumerate()
    .map(|(k, &dof)| phi[k] * values[dof])
    .sum()
}

/// Nodal projection of a coefficient: every dof takes the coefficient value
/// at its nodal point.
pub fn project_into(space: &FeSpace, coeff: &dyn Coefficient, out: &mut [f64]) {
  assert!(out.len() == space.vsize(), "projection output of incorrect size");
  for dof in 0..space.vsize() {
    let (cell, bary) = space.dof_element(dof);
    let ep = element_point(space.mesh(), cell, bary);
    out[dof] = coeff.eval(&ep);
  }
}

/// Projects onto the dofs of (marked) boundary facets only; interior values
/// are left untouched.
pub fn project_bdr_into(
  space: &FeSpace,
  coeff: &dyn Coefficient,
  marker: Option<&[bool]>,
  out: &mut [f64],
) {
  assert!(out.len() == space.vsize(), "projection output of incorrect size");
  for dof in space.boundary_dofs(marker) {
    let (cell, bary) = space.dof_element(dof);
    let ep = element_point(space.mesh(), cell, bary);
    out[dof] = coeff.eval(&ep);
  }
}

/// Projects the normal trace `v · n` of a vector coefficient onto the dofs
/// of marked boundary facets.
pub fn project_bdr_normal_into(
  space: &FeSpace,
  coeff: &dyn VectorCoefficient,
  marker: Option<&[bool]>,
  out: &mut [f64],
) {
  assert!(out.len() == space.vsize(), "projection output of incorrect size");
  let mesh = space.mesh();
  for b in 0..mesh.nboundary_facets() {
    let attr = mesh.boundary_attribute(b);
    let marked = match marker {
      None => true,
      Some(m) => m.get(attr - 1).copied().unwrap_or(false),
    };
    if !marked {
      continue;
    }
    let facet = mesh.boundary_facet_geometry(b);
    for dof in space.boundary_facet_dofs(b) {
      let (cell, bary) = space.dof_element(dof);
      let ep = element_point(mesh, cell, bary);
      out[dof] = coeff.eval(&ep).dot(facet.normal());
    }
  }
}

/// Projects the tangential trace `v · t`; 2D meshes only.
pub fn project_bdr_tangent_into(
  space: &FeSpace,
  coeff: &dyn VectorCoefficient,
  marker: Option<&[bool]>,
  out: &mut [f64],
) {
  assert!(out.len() == space.vsize(), "projection output of incorrect size");
  let mesh = space.mesh();
  for b in 0..mesh.nboundary_facets() {
    let attr = mesh.boundary_attribute(b);
    let marked = match marker {
      None => true,
      Some(m) => m.get(attr - 1).copied().unwrap_or(false),
    };
    if !marked {
      continue;
    }
    let facet = mesh.boundary_facet_geometry(b);
    let tangent = facet.tangent();
    for dof in space.boundary_facet_dofs(b) {
      let (cell, bary) = space.dof_element(dof);
      let ep = element_point(mesh, cell, bary);
      out[dof] = coeff.eval(&ep).dot(&tangent);
    }
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::mesh::SimplicialMesh;

  #[test]
  fn projection_reproduces_linears() {
    let mesh = Rc::new(SimplicialMesh::unit_square(2));
    for order in 1..=2 {
      let space = Rc::new(FeSpace::new(Rc::clone(&mesh), order));
      let mut gf = GridFunction::new(Rc::clone(&space));
      gf.project_coefficient(&|x: &na::DVector<f64>| 1.0 + 2.0 * x[0] - x[1]);

      let bary = na::dvector![0.25, 0.25, 0.5];
      for cell in 0..mesh.ncells() {
        let x = mesh.cell_geometry(cell).bary_to_phys(bary.as_view());
        let expected = 1.0 + 2.0 * x[0] - x[1];
        assert!((gf.value(cell, bary.as_view()) - expected).abs() <= 1e-13);
      }
    }
  }

  #[test]
  fn boundary_projection_leaves_interior() {
    let mesh = Rc::new(SimplicialMesh::interval(0.0, 1.0, 4));
    let space = Rc::new(FeSpace::new(mesh, 1));
    let mut gf = GridFunction::new(Rc::clone(&space));
    gf.values_mut().fill(7.0);
    gf.project_bdr_coefficient(&|_x: &na::DVector<f64>| 1.0, &[true, true]);

    let boundary = space.boundary_dofs(None);
    for dof in 0..space.vsize() {
      let expected = if boundary.contains(&dof) { 1.0 } else { 7.0 };
      assert_eq!(gf.values()[dof], expected);
    }
  }

  #[test]
  fn update_after_refinement_transfers_values() {
    let coarse_mesh = Rc::new(SimplicialMesh::interval(0.0, 1.0, 2));
    let coarse = Rc::new(FeSpace::new(Rc::clone(&coarse_mesh), 1));
    let mut gf = GridFunction::new(Rc::clone(&coarse));
    gf.project_coefficient(&|x: &na::DVector<f64>| 3.0 * x[0]);

    let (fine_mesh, map) = coarse_mesh.uniform_refine();
    let fine = Rc::new(FeSpace::refined_from(&coarse, Rc::new(fine_mesh), &map));
    gf.update(&fine);

    assert_eq!(gf.values().len(), fine.vsize());
    for dof in 0..fine.vsize() {
      let (cell, bary) = fine.dof_element(dof);
      let x = fine.mesh().cell_geometry(cell).bary_to_phys(bary)[0];
      assert!((gf.values()[dof] - 3.0 * x).abs() <= 1e-13);
    }
  }
}
