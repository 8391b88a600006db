//! Global linear and bilinear forms: integrator lists, assembly, and the
//! reduction of linear systems by essential-dof elimination.
//!
//! [`BilinearForm::form_linear_system`] is the provider capability the
//! sesquilinear layer invokes four times: it eliminates the essential dofs
//! of one real operator, moves the known values to the right-hand side and
//! hands back the reduced pair `(X, B)`, keeping the eliminated part so
//! repeated calls only redo the right-hand-side work.

use crate::{
  fe::{
    BilinearIntegrator, FacetBilinearIntegrator, FacetLinearFormIntegrator,
    InteriorFacetIntegrator, LinearFormIntegrator,
  },
  linalg::{self, csc_mul_vec, csc_tr_mul_vec},
  space::FeSpace,
  sparse::SparseMatrix,
  DofIdx,
};

use std::rc::Rc;

pub type Marker = Option<Vec<bool>>;

fn marked(marker: &Marker, attr: usize) -> bool {
  match marker {
    None => true,
    Some(m) => m.get(attr - 1).copied().unwrap_or(false),
  }
}

/// The integrator lists of a linear form, kept apart from its storage so
/// composite forms can assemble them into aliased halves of one buffer.
#[derive(Default)]
pub struct LfIntegrators {
  domain: Vec<Box<dyn LinearFormIntegrator>>,
  boundary: Vec<(Box<dyn FacetLinearFormIntegrator>, Marker)>,
  bdr_face: Vec<(Box<dyn FacetLinearFormIntegrator>, Marker)>,
}

impl LfIntegrators {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn add_domain(&mut self, integrator: Box<dyn LinearFormIntegrator>) {
    self.domain.push(integrator);
  }
  pub fn add_boundary(&mut self, integrator: Box<dyn FacetLinearFormIntegrator>, marker: Marker) {
    self.boundary.push((integrator, marker));
  }
  pub fn add_bdr_face(&mut self, integrator: Box<dyn FacetLinearFormIntegrator>, marker: Marker) {
    self.bdr_face.push((integrator, marker));
  }

  pub fn assemble_into(&self, space: &FeSpace, out: &mut [f64]) {
    assert!(out.len() == space.vsize(), "assembly output of incorrect size");
    out.fill(0.0);
    let mesh = space.mesh();
    let order = space.order();

    if !self.domain.is_empty() {
      for icell in 0..mesh.ncells() {
        let geo = mesh.cell_geometry(icell);
        let dofs = space.cell_dofs(icell);
        for integrator in &self.domain {
          let elvec = integrator.elvec(&geo, order);
          for (k, &dof) in dofs.iter().enumerate() {
            out[dof] += elvec[k];
          }
        }
      }
    }

    if !self.boundary.is_empty() || !self.bdr_face.is_empty() {
      for b in 0..mesh.nboundary_facets() {
        let attr = mesh.boundary_attribute(b);
        let facet = mesh.boundary_facet_geometry(b);
        let icell = mesh.boundary_facet_cell(b);
        let cell = mesh.cell_geometry(icell);
        let dofs = space.cell_dofs(icell);
        for (integrator, marker) in self.boundary.iter().chain(self.bdr_face.iter()) {
          if !marked(marker, attr) {
            continue;
          }
          let elvec = integrator.facet_elvec(&facet, &cell, order);
          for (k, &dof) in dofs.iter().enumerate() {
            out[dof] += elvec[k];
          }
        }
      }
    }
  }
}

/// A linear functional over a space, assembled into an owned dof vector.
pub struct LinearForm {
  space: Rc<FeSpace>,
  vec: na::DVector<f64>,
  integrators: LfIntegrators,
}

impl LinearForm {
  pub fn new(space: &Rc<FeSpace>) -> Self {
    Self {
      space: Rc::clone(space),
      vec: na::DVector::zeros(space.vsize()),
      integrators: LfIntegrators::new(),
    }
  }

  pub fn space(&self) -> &Rc<FeSpace> {
    &self.space
  }
  pub fn vector(&self) -> &na::DVector<f64> {
    &self.vec
  }
  pub fn vector_mut(&mut self) -> &mut na::DVector<f64> {
    &mut self.vec
  }

  pub fn add_domain_integrator(&mut self, integrator: Box<dyn LinearFormIntegrator>) {
    self.integrators.add_domain(integrator);
  }
  pub fn add_boundary_integrator(&mut self, integrator: Box<dyn FacetLinearFormIntegrator>) {
    self.integrators.add_boundary(integrator, None);
  }
  pub fn add_boundary_integrator_marked(
    &mut self,
    integrator: Box<dyn FacetLinearFormIntegrator>,
    marker: Vec<bool>,
  ) {
    self.integrators.add_boundary(integrator, Some(marker));
  }
  pub fn add_bdr_face_integrator(&mut self, integrator: Box<dyn FacetLinearFormIntegrator>) {
    self.integrators.add_bdr_face(integrator, None);
  }
  pub fn add_bdr_face_integrator_marked(
    &mut self,
    integrator: Box<dyn FacetLinearFormIntegrator>,
    marker: Vec<bool>,
  ) {
    self.integrators.add_bdr_face(integrator, Some(marker));
  }

  pub fn assemble(&mut self) {
    self.integrators.assemble_into(&self.space, self.vec.as_mut_slice());
  }

  pub fn update(&mut self, space: &Rc<FeSpace>) {
    self.space = Rc::clone(space);
    self.vec.resize_vertically_mut(space.vsize(), 0.0);
  }

  /// `(this, v)` — evaluation of the assembled functional.
  pub fn dot(&self, values: na::DVectorView<f64>) -> f64 {
    self.vec.dot(&values)
  }
}

/// A bilinear form over a space, assembled into a triplet matrix and
/// reducible to an essential-dof-eliminated system.
pub struct BilinearForm {
  space: Rc<FeSpace>,
  domain: Vec<Box<dyn BilinearIntegrator>>,
  boundary: Vec<(Box<dyn FacetBilinearIntegrator>, Marker)>,
  interior_face: Vec<Box<dyn InteriorFacetIntegrator>>,
  bdr_face: Vec<(Box<dyn FacetBilinearIntegrator>, Marker)>,
  /// Assembled triplets; consumed by elimination.
  mat: Option<SparseMatrix>,
  /// Finalized matrix; replaced by the eliminated matrix once a linear
  /// system is formed.
  mat_csc: Option<Rc<nas::CscMatrix<f64>>>,
  /// The entries removed by elimination, for right-hand-side updates.
  mat_e: Option<nas::CscMatrix<f64>>,
}

impl BilinearForm {
  pub fn new(space: &Rc<FeSpace>) -> Self {
    Self {
      space: Rc::clone(space),
      domain: Vec::new(),
      boundary: Vec::new(),
      interior_face: Vec::new(),
      bdr_face: Vec::new(),
      mat: None,
      mat_csc: None,
      mat_e: None,
    }
  }

  pub fn space(&self) -> &Rc<FeSpace> {
    &self.space
  }

  pub fn add_domain_integrator(&mut self, integrator: Box<dyn BilinearIntegrator>) {
    self.domain.push(integrator);
  }
  pub fn add_boundary_integrator(&mut self, integrator: Box<dyn FacetBilinearIntegrator>) {
    self.boundary.push((integrator, None));
  }
  pub fn add_boundary_integrator_marked(
    &mut self,
    integrator: Box<dyn FacetBilinearIntegrator>,
    marker: Vec<bool>,
  ) {
    self.boundary.push((integrator, Some(marker)));
  }
  pub fn add_interior_face_integrator(&mut self, integrator: Box<dyn InteriorFacetIntegrator>) {
    self.interior_face.push(integrator);
  }
  pub fn add_bdr_face_integrator(&mut self, integrator: Box<dyn FacetBilinearIntegrator>) {
    self.bdr_face.push((integrator, None));
  }
  pub fn add_bdr_face_integrator_marked(
    &mut self,
    integrator: Box<dyn FacetBilinearIntegrator>,
    marker: Vec<bool>,
  ) {
    self.bdr_face.push((integrator, Some(marker)));
  }

  pub fn assemble(&mut self, skip_zeros: bool) {
    let space = &self.space;
    let mesh = space.mesh();
    let order = space.order();
    let n = space.vsize();
    let mut mat = SparseMatrix::zeros(n, n);

    let scatter = |mat: &mut SparseMatrix, rows: &[DofIdx], cols: &[DofIdx], elmat: &na::DMatrix<f64>| {
      for (i, &r) in rows.iter().enumerate() {
        for (j, &c) in cols.iter().enumerate() {
          let v = elmat[(i, j)];
          if !skip_zeros || v != 0.0 {
            mat.push(r, c, v);
          }
        }
      }
    };

    for icell in 0..mesh.ncells() {
      if self.domain.is_empty() {
        break;
      }
      let geo = mesh.cell_geometry(icell);
      let dofs = space.cell_dofs(icell);
      for integrator in &self.domain {
        let elmat = integrator.elmat(&geo, order);
        scatter(&mut mat, &dofs, &dofs, &elmat);
      }
    }

    if !self.boundary.is_empty() || !self.bdr_face.is_empty() {
      for b in 0..mesh.nboundary_facets() {
        let attr = mesh.boundary_attribute(b);
        let facet = mesh.boundary_facet_geometry(b);
        let icell = mesh.boundary_facet_cell(b);
        let cell = mesh.cell_geometry(icell);
        let dofs = space.cell_dofs(icell);
        for (integrator, marker) in self.boundary.iter().chain(self.bdr_face.iter()) {
          if !marked(marker, attr) {
            continue;
          }
          let elmat = integrator.facet_elmat(&facet, &cell, order);
          scatter(&mut mat, &dofs, &dofs, &elmat);
        }
      }
    }

    if !self.interior_face.is_empty() {
      for f in mesh.interior_facets() {
        let facet = mesh.facet_geometry(f);
        let cells = mesh.facet_cells(f);
        let (left, right) = (mesh.cell_geometry(cells[0]), mesh.cell_geometry(cells[1]));
        let mut dofs = space.cell_dofs(cells[0]);
        dofs.extend(space.cell_dofs(cells[1]));
        for integrator in &self.interior_face {
          let elmat = integrator.facet_elmat(&facet, &left, &right, order);
          scatter(&mut mat, &dofs, &dofs, &elmat);
        }
      }
    }

    tracing::debug!(ndofs = n, ntriplets = mat.ntriplets(), "assembled bilinear form");
    self.mat = Some(mat);
    self.mat_csc = None;
    self.mat_e = None;
  }

  /// Converts the assembled triplets into a compressed matrix, available
  /// through [`BilinearForm::spmat`].
  pub fn finalize(&mut self, skip_zeros: bool) {
    let mat = self.mat.as_mut().expect("assemble before finalizing");
    if skip_zeros {
      let (nrows, ncols) = (mat.nrows(), mat.ncols());
      let triplets = mat.triplets().iter().copied().filter(|&(_, _, v)| v != 0.0).collect();
      *mat = SparseMatrix::from_triplets(nrows, ncols, triplets);
    }
    self.mat_csc = Some(Rc::new(mat.to_nalgebra_csc()));
  }

  /// The finalized (and, after `form_linear_system`, eliminated) matrix.
  pub fn spmat(&self) -> Rc<nas::CscMatrix<f64>> {
    Rc::clone(self.mat_csc.as_ref().expect("finalize or form a linear system first"))
  }

  fn ensure_eliminated(&mut self, ess_tdofs: &[DofIdx]) {
    if self.mat_e.is_some() {
      return; // essential-dof treatment already applied; reuse it
    }
    let assembled = self.mat.take().expect("assemble before forming a linear system");
    let mut reduced = match self.space.conforming_prolongation() {
      None => assembled,
      Some(p) => SparseMatrix::from_csc(&linalg::rap(p, &assembled.to_nalgebra_csc())),
    };
    let flags = linalg::indices_to_flags(ess_tdofs, reduced.nrows());
    let eliminated = reduced.eliminate_row_cols(&flags);
    tracing::debug!(
      tvsize = reduced.nrows(),
      ness = ess_tdofs.len(),
      "eliminated essential dofs"
    );
    self.mat_e = Some(eliminated.to_nalgebra_csc());
    self.mat_csc = Some(Rc::new(reduced.to_nalgebra_csc()));
  }

  /// Reduces `A x = b` over the essential dofs: returns `(X, B)` of true-dof
  /// length, with `X` carrying the prescribed values of `x` at the essential
  /// dofs (and, with `copy_interior`, the interior values as initial guess)
  /// and `B = b - A_e x` elsewhere. The reduced operator is available
  /// through [`BilinearForm::spmat`].
  pub fn form_linear_system(
    &mut self,
    ess_tdofs: &[DofIdx],
    x: &na::DVector<f64>,
    b: &na::DVector<f64>,
    copy_interior: bool,
  ) -> (na::DVector<f64>, na::DVector<f64>) {
    let vsize = self.space.vsize();
    assert!(x.len() == vsize, "input grid function of incorrect size");
    assert!(b.len() == vsize, "input linear form of incorrect size");

    let (xt, bt) = match self.space.conforming_prolongation() {
      None => (x.clone(), b.clone()),
      Some(p) => (self.space.restrict(x.as_view()), csc_tr_mul_vec(p, b.as_view())),
    };

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

  /// Maps a reduced solution back onto the full dof numbering.
  pub fn recover_fem_solution(
    &self,
    x_reduced: &na::DVector<f64>,
    _b: &na::DVector<f64>,
    x: &mut na::DVector<f64>,
  ) {
    match self.space.conforming_prolongation() {
      None => {
        assert!(
          x_reduced.len() == x.len(),
          "solution recovery without a prolongation requires matching sizes"
        );
        x.copy_from(x_reduced);
      }
      Some(p) => {
        *x = csc_mul_vec(p, x_reduced.as_view());
      }
    }
  }

  /// Rebinds the form to a (possibly refreshed) space, dropping all
  /// assembled state.
  pub fn update(&mut self, space: &Rc<FeSpace>) {
    self.space = Rc::clone(space);
    self.mat = None;
    self.mat_csc = None;
    self.mat_e = None;
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::{
    coefficient::ConstantCoefficient,
    fe::{DiffusionIntegrator, DomainLFIntegrator},
    linalg::{assert_mat_eq, matrix_from_const_diagonals, FaerLu},
    mesh::SimplicialMesh,
  };

  #[test]
  fn interval_diffusion_matrix_is_tridiagonal() {
    let n = 4;
    let mesh = Rc::new(SimplicialMesh::interval(0.0, 1.0, n));
    let space = Rc::new(FeSpace::new(mesh, 1));
    let mut blf = BilinearForm::new(&space);
    blf.add_domain_integrator(Box::new(DiffusionIntegrator::new(ConstantCoefficient(1.0))));
    blf.assemble(true);
    blf.finalize(true);

    let h = (n as f64).recip();
    let mut expected =
      matrix_from_const_diagonals(&[2.0, -1.0, -1.0], &[0, -1, 1], n + 1, n + 1) / h;
    expected[(0, 0)] = 1.0 / h;
    expected[(n, n)] = 1.0 / h;

    let dense = na::DMatrix::from(&*blf.spmat());
    assert_mat_eq(&dense, &expected);
  }

  #[test]
  fn poisson_with_boundary_values() {
    // -u'' = 0 on [0, 1], u(0) = 1, u(1) = 3 has the solution 1 + 2x.
    let n = 8;
    let mesh = Rc::new(SimplicialMesh::interval(0.0, 1.0, n));
    let space = Rc::new(FeSpace::new(Rc::clone(&mesh), 1));

    let mut blf = BilinearForm::new(&space);
    blf.add_domain_integrator(Box::new(DiffusionIntegrator::new(ConstantCoefficient(1.0))));
    blf.assemble(true);

    let mut lf = LinearForm::new(&space);
    lf.add_domain_integrator(Box::new(DomainLFIntegrator::new(ConstantCoefficient(0.0))));
    lf.assemble();

    let ess = space.essential_dofs(&[true, true]);
    let mut x = na::DVector::zeros(space.vsize());
    crate::gridfunc::project_bdr_into(
      &space,
      &|p: &na::DVector<f64>| 1.0 + 2.0 * p[0],
      None,
      x.as_mut_slice(),
    );

    let (x0, b0) = blf.form_linear_system(&ess, &x, lf.vector(), false);
    let solver = FaerLu::new((*blf.spmat()).clone());
    let mut sol = solver.solve(&b0);
    // keep the prescribed values exactly
    for &j in &ess {
      sol[j] = x0[j];
    }

    let mut u = na::DVector::zeros(space.vsize());
    blf.recover_fem_solution(&sol, lf.vector(), &mut u);
    for dof in 0..space.vsize() {
      let xd = mesh.vertex(dof)[0];
      assert!((u[dof] - (1.0 + 2.0 * xd)).abs() <= 1e-12);
    }
  }

  #[test]
  fn repeated_elimination_reuses_split() {
    let mesh = Rc::new(SimplicialMesh::interval(0.0, 1.0, 4));
    let space = Rc::new(FeSpace::new(mesh, 1));
    let mut blf = BilinearForm::new(&space);
    blf.add_domain_integrator(Box::new(DiffusionIntegrator::new(ConstantCoefficient(1.0))));
    blf.assemble(true);

    let ess = space.essential_dofs(&[true, true]);
    let x = na::DVector::from_element(space.vsize(), 1.0);
    let b = na::DVector::zeros(space.vsize());
    let (_, b1) = blf.form_linear_system(&ess, &x, &b, false);
    let (_, b2) = blf.form_linear_system(&ess, &x, &b, false);
    assert_eq!(b1, b2);
  }
}
