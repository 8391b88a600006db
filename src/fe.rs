//! Element-level finite element kernels: Lagrange basis functions on
//! simplices and the integrators that produce element matrices and vectors.

use crate::{
  coefficient::{Coefficient, ElementPoint},
  mesh::{CellGeometry, FacetGeometry},
  quadrature::QuadRule,
  Dim,
};

use num_integer::binomial;

/// Number of Lagrange dofs of the given order on a d-simplex.
pub fn ndofs_per_cell(order: usize, dim: Dim) -> usize {
  assert!((1..=2).contains(&order), "Lagrange orders 1 and 2 are available");
  binomial(dim + order, order)
}

/// Basis values at a barycentric point. Dof order: vertices, then edges in
/// lexicographic vertex-pair order (matching the mesh's local edge order).
pub fn eval_basis(order: usize, dim: Dim, bary: na::DVectorView<f64>) -> na::DVector<f64> {
  assert!(bary.len() == dim + 1);
  let mut phi = na::DVector::zeros(ndofs_per_cell(order, dim));
  match order {
    1 => phi.copy_from(&bary),
    _ => {
      for i in 0..=dim {
        phi[i] = bary[i] * (2.0 * bary[i] - 1.0);
      }
      let mut dof = dim + 1;
      for i in 0..=dim {
        for j in (i + 1)..=dim {
          phi[dof] = 4.0 * bary[i] * bary[j];
          dof += 1;
        }
      }
    }
  }
  phi
}

/// Basis gradients at a barycentric point, dim × ndofs.
pub fn eval_basis_grads(
  order: usize,
  cell: &CellGeometry,
  bary: na::DVectorView<f64>,
) -> na::DMatrix<f64> {
  let dim = cell.dim();
  let grad_barys = cell.grad_barys();
  let mut grads = na::DMatrix::zeros(dim, ndofs_per_cell(order, dim));
  match order {
    1 => grads.copy_from(&grad_barys),
    _ => {
      for i in 0..=dim {
        let gi = grad_barys.column(i) * (4.0 * bary[i] - 1.0);
        grads.set_column(i, &gi);
      }
      let mut dof = dim + 1;
      for i in 0..=dim {
        for j in (i + 1)..=dim {
          let gij = 4.0 * (grad_barys.column(i) * bary[j] + grad_barys.column(j) * bary[i]);
          grads.set_column(dof, &gij);
          dof += 1;
        }
      }
    }
  }
  grads
}

fn cell_point(cell: &CellGeometry, bary: na::DVectorView<f64>) -> ElementPoint {
  ElementPoint {
    cell: cell.index(),
    attribute: cell.attribute(),
    phys: cell.bary_to_phys(bary),
    bary: bary.clone_owned(),
  }
}

fn facet_point(facet: &FacetGeometry, cell: &CellGeometry, facet_bary: na::DVectorView<f64>) -> ElementPoint {
  let phys = facet.bary_to_phys(facet_bary);
  ElementPoint {
    cell: cell.index(),
    attribute: facet.attribute(),
    bary: cell.phys_to_bary(phys.as_view()),
    phys,
  }
}

/// Produces the element matrix of a bilinear form on one cell.
pub trait BilinearIntegrator {
  fn elmat(&self, cell: &CellGeometry, order: usize) -> na::DMatrix<f64>;
}
impl<F> BilinearIntegrator for F
where
  F: Fn(&CellGeometry, usize) -> na::DMatrix<f64>,
{
  fn elmat(&self, cell: &CellGeometry, order: usize) -> na::DMatrix<f64> {
    self(cell, order)
  }
}

/// Element matrix on a boundary facet, indexed by the adjacent cell's dofs.
pub trait FacetBilinearIntegrator {
  fn facet_elmat(&self, facet: &FacetGeometry, cell: &CellGeometry, order: usize)
    -> na::DMatrix<f64>;
}

/// Element matrix on an interior facet, indexed by the concatenated dofs of
/// the two adjacent cells.
pub trait InteriorFacetIntegrator {
  fn facet_elmat(
    &self,
    facet: &FacetGeometry,
    left: &CellGeometry,
    right: &CellGeometry,
    order: usize,
  ) -> na::DMatrix<f64>;
}

/// Produces the element vector of a linear functional on one cell.
pub trait LinearFormIntegrator {
  fn elvec(&self, cell: &CellGeometry, order: usize) -> na::DVector<f64>;
}
impl<F> LinearFormIntegrator for F
where
  F: Fn(&CellGeometry, usize) -> na::DVector<f64>,
{
  fn elvec(&self, cell: &CellGeometry, order: usize) -> na::DVector<f64> {
    self(cell, order)
  }
}

/// Element vector on a boundary facet, indexed by the adjacent cell's dofs.
pub trait FacetLinearFormIntegrator {
  fn facet_elvec(&self, facet: &FacetGeometry, cell: &CellGeometry, order: usize)
    -> na::DVector<f64>;
}

/// `∫ c ∇u · ∇v`
pub struct DiffusionIntegrator<C> {
  coeff: C,
  quad_order: Option<usize>,
}
impl<C: Coefficient> DiffusionIntegrator<C> {
  pub fn new(coeff: C) -> Self {
    Self {
      coeff,
      quad_order: None,
    }
  }
  pub fn with_quad_order(mut self, order: usize) -> Self {
    self.quad_order = Some(order);
    self
  }
}
impl<C: Coefficient> BilinearIntegrator for DiffusionIntegrator<C> {
  fn elmat(&self, cell: &CellGeometry, order: usize) -> na::DMatrix<f64> {
    let rule = QuadRule::for_simplex(cell.dim(), self.quad_order.unwrap_or(2 * order));
    let nd = ndofs_per_cell(order, cell.dim());
    let mut elmat = na::DMatrix::zeros(nd, nd);
    for q in 0..rule.npoints() {
      let grads = eval_basis_grads(order, cell, rule.point(q));
      let c = self.coeff.eval(&cell_point(cell, rule.point(q)));
      elmat += rule.weight(q) * cell.vol() * c * grads.transpose() * &grads;
    }
    elmat
  }
}

/// `∫ c u v`
pub struct MassIntegrator<C> {
  coeff: C,
  quad_order: Option<usize>,
}
impl<C: Coefficient> MassIntegrator<C> {
  pub fn new(coeff: C) -> Self {
    Self {
      coeff,
      quad_order: None,
    }
  }
  pub fn with_quad_order(mut self, order: usize) -> Self {
    self.quad_order = Some(order);
    self
  }
}
impl<C: Coefficient> BilinearIntegrator for MassIntegrator<C> {
  fn elmat(&self, cell: &CellGeometry, order: usize) -> na::DMatrix<f64> {
    let rule = QuadRule::for_simplex(cell.dim(), self.quad_order.unwrap_or(2 * order));
    let nd = ndofs_per_cell(order, cell.dim());
    let mut elmat = na::DMatrix::zeros(nd, nd);
    for q in 0..rule.npoints() {
      let phi = eval_basis(order, cell.dim(), rule.point(q));
      let c = self.coeff.eval(&cell_point(cell, rule.point(q)));
      elmat += rule.weight(q) * cell.vol() * c * &phi * phi.transpose();
    }
    elmat
  }
}

/// `∫_∂ c u v` over boundary facets.
pub struct BoundaryMassIntegrator<C> {
  coeff: C,
}
impl<C: Coefficient> BoundaryMassIntegrator<C> {
  pub fn new(coeff: C) -> Self {
    Self { coeff }
  }
}
impl<C: Coefficient> FacetBilinearIntegrator for BoundaryMassIntegrator<C> {
  fn facet_elmat(
    &self,
    facet: &FacetGeometry,
    cell: &CellGeometry,
    order: usize,
  ) -> na::DMatrix<f64> {
    let rule = QuadRule::for_simplex(facet.nvertices() - 1, 2 * order);
    let nd = ndofs_per_cell(order, cell.dim());
    let mut elmat = na::DMatrix::zeros(nd, nd);
    for q in 0..rule.npoints() {
      let ep = facet_point(facet, cell, rule.point(q));
      let phi = eval_basis(order, cell.dim(), ep.bary.as_view());
      let c = self.coeff.eval(&ep);
      elmat += rule.weight(q) * facet.vol() * c * &phi * phi.transpose();
    }
    elmat
  }
}

/// `∫ c v`
pub struct DomainLFIntegrator<C> {
  coeff: C,
  quad_order: Option<usize>,
}
impl<C: Coefficient> DomainLFIntegrator<C> {
  pub fn new(coeff: C) -> Self {
    Self {
      coeff,
      quad_order: None,
    }
  }
  pub fn with_quad_order(mut self, order: usize) -> Self {
    self.quad_order = Some(order);
    self
  }
}
impl<C: Coefficient> LinearFormIntegrator for DomainLFIntegrator<C> {
  fn elvec(&self, cell: &CellGeometry, order: usize) -> na::DVector<f64> {
    let rule = QuadRule::for_simplex(cell.dim(), self.quad_order.unwrap_or(2 * order));
    let mut elvec = na::DVector::zeros(ndofs_per_cell(order, cell.dim()));
    for q in 0..rule.npoints() {
      let phi = eval_basis(order, cell.dim(), rule.point(q));
      let c = self.coeff.eval(&cell_point(cell, rule.point(q)));
      elvec += rule.weight(q) * cell.vol() * c * phi;
    }
    elvec
  }
}

/// `∫_∂ c v` over boundary facets.
pub struct BoundaryLFIntegrator<C> {
  coeff: C,
}
impl<C: Coefficient> BoundaryLFIntegrator<C> {
  pub fn new(coeff: C) -> Self {
    Self { coeff }
  }
}
impl<C: Coefficient> FacetLinearFormIntegrator for BoundaryLFIntegrator<C> {
  fn facet_elvec(
    &self,
    facet: &FacetGeometry,
    cell: &CellGeometry,
    order: usize,
  ) -> na::DVector<f64> {
    let rule = QuadRule::for_simplex(facet.nvertices() - 1, 2 * order);
    let mut elvec = na::DVector::zeros(ndofs_per_cell(order, cell.dim()));
    for q in 0..rule.npoints() {
      let ep = facet_point(facet, cell, rule.point(q));
      let phi = eval_basis(order, cell.dim(), ep.bary.as_view());
      let c = self.coeff.eval(&ep);
      elvec += rule.weight(q) * facet.vol() * c * phi;
    }
    elvec
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::{coefficient::ConstantCoefficient, linalg::assert_mat_eq, mesh::SimplicialMesh};

  #[test]
  fn p1_elmats_on_unit_triangle() {
    let mesh = SimplicialMesh::unit_square(1);
    let cell = mesh.cell_geometry(0);

    let diffusion = DiffusionIntegrator::new(ConstantCoefficient(1.0)).elmat(&cell, 1);
    #[rustfmt::skip]
    let expected = 0.5 * na::DMatrix::from_row_slice(3, 3, &[
       1.0, -1.0,  0.0,
      -1.0,  2.0, -1.0,
       0.0, -1.0,  1.0,
    ]);
    assert_mat_eq(&diffusion, &expected);

    let mass = MassIntegrator::new(ConstantCoefficient(1.0)).elmat(&cell, 1);
    let v = cell.vol() / 12.0;
    #[rustfmt::skip]
    let expected = v * na::DMatrix::from_row_slice(3, 3, &[
      2.0, 1.0, 1.0,
      1.0, 2.0, 1.0,
      1.0, 1.0, 2.0,
    ]);
    assert_mat_eq(&mass, &expected);
  }

  #[test]
  fn p1_elmats_on_segment() {
    let mesh = SimplicialMesh::interval(0.0, 2.0, 4);
    let cell = mesh.cell_geometry(0);
    let h = 0.5;

    let diffusion = DiffusionIntegrator::new(ConstantCoefficient(1.0)).elmat(&cell, 1);
    let expected = 1.0 / h * na::DMatrix::from_row_slice(2, 2, &[1.0, -1.0, -1.0, 1.0]);
    assert_mat_eq(&diffusion, &expected);

    let mass = MassIntegrator::new(ConstantCoefficient(1.0)).elmat(&cell, 1);
    let expected = h / 6.0 * na::DMatrix::from_row_slice(2, 2, &[2.0, 1.0, 1.0, 2.0]);
    assert_mat_eq(&mass, &expected);
  }

  #[test]
  fn p2_basis_partition_of_unity() {
    for dim in 1..=2 {
      let bary = if dim == 1 {
        na::dvector![0.3, 0.7]
      } else {
        na::dvector![0.2, 0.3, 0.5]
      };
      let phi = eval_basis(2, dim, bary.as_view());
      assert!((phi.sum() - 1.0).abs() <= 1e-14);
    }
  }

  #[test]
  fn p2_basis_is_nodal() {
    // vertex basis functions vanish at edge midpoints and vice versa
    let phi = eval_basis(2, 2, na::dvector![0.5, 0.5, 0.0].as_view());
    let expected = na::dvector![0.0, 0.0, 0.0, 1.0, 0.0, 0.0];
    assert!((phi - expected).norm() <= 1e-14);
  }
}
