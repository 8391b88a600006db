//! Lagrange finite element spaces over simplicial meshes.

use crate::{
  fe,
  mesh::{CellIdx, RefinementMap, SimplicialMesh},
  DofIdx,
};

use std::rc::Rc;

/// Identification of dofs (e.g. periodic endpoints): several dofs of the
/// full numbering share one true dof.
#[derive(Debug)]
pub struct DofIdentification {
  /// True dof of every full dof.
  tdof_of_dof: Vec<usize>,
  /// One representative full dof per true dof, in true-dof order.
  rep_dofs: Vec<DofIdx>,
  /// Conforming prolongation: true dofs to full dofs.
  prolongation: nas::CscMatrix<f64>,
}

/// A Lagrange finite element space of order 1 or 2.
///
/// Dofs are the mesh vertices, followed (for order 2) by the edge
/// midpoints: `dof(edge e) = nvertices + e`.
pub struct FeSpace {
  mesh: Rc<SimplicialMesh>,
  order: usize,
  ndofs: usize,
  /// A host cell and barycentric coordinates of each dof's nodal point.
  dof_nodes: Vec<(CellIdx, na::DVector<f64>)>,
  identification: Option<DofIdentification>,
  /// Nodal interpolation from the space this one was refined from.
  update_op: Option<nas::CscMatrix<f64>>,
}

impl FeSpace {
  pub fn new(mesh: Rc<SimplicialMesh>, order: usize) -> Self {
    assert!((1..=2).contains(&order), "Lagrange orders 1 and 2 are available");
    let ndofs = if order == 1 {
      mesh.nvertices()
    } else {
      mesh.nvertices() + mesh.nedges()
    };

    let dim = mesh.dim();
    let nv = mesh.nvertices();
    let mut dof_nodes: Vec<Option<(CellIdx, na::DVector<f64>)>> = vec![None; ndofs];
    for icell in 0..mesh.ncells() {
      let verts = mesh.cell_vertices(icell);
      for (k, &v) in verts.iter().enumerate() {
        if dof_nodes[v].is_none() {
          let mut bary = na::DVector::zeros(dim + 1);
          bary[k] = 1.0;
          dof_nodes[v] = Some((icell, bary));
        }
      }
      if order == 2 {
        let mut local = 0;
        for i in 0..verts.len() {
          for j in (i + 1)..verts.len() {
            let dof = nv + mesh.cell_edges(icell)[local];
            if dof_nodes[dof].is_none() {
              let mut bary = na::DVector::zeros(dim + 1);
              bary[i] = 0.5;
              bary[j] = 0.5;
              dof_nodes[dof] = Some((icell, bary));
            }
            local += 1;
          }
        }
      }
    }
    let dof_nodes = dof_nodes.into_iter().map(|n| n.expect("dangling dof")).collect();

    Self {
      mesh,
      order,
      ndofs,
      dof_nodes,
      identification: None,
      update_op: None,
    }
  }

  /// A space on an interval mesh whose two endpoint dofs are identified,
  /// making the discretization periodic. The conforming prolongation this
  /// induces exercises the reduced-system paths of the forms.
  pub fn new_periodic(mesh: Rc<SimplicialMesh>, order: usize) -> Self {
    assert!(mesh.dim() == 1, "periodic identification is available on interval meshes");
    let mut space = Self::new(mesh, order);

    let boundary = space.mesh.boundary_vertices();
    assert!(boundary.len() == 2, "periodic interval needs exactly two boundary vertices");
    let keep = boundary[0].min(boundary[1]);
    let dropped = boundary[0].max(boundary[1]);

    let mut tdof_of_dof = vec![0; space.ndofs];
    let mut rep_dofs = Vec::with_capacity(space.ndofs - 1);
    for dof in 0..space.ndofs {
      if dof == dropped {
        continue;
      }
      tdof_of_dof[dof] = rep_dofs.len();
      rep_dofs.push(dof);
    }
    tdof_of_dof[dropped] = tdof_of_dof[keep];

    let mut coo = nas::CooMatrix::new(space.ndofs, rep_dofs.len());
    for (dof, &tdof) in tdof_of_dof.iter().enumerate() {
      coo.push(dof, tdof, 1.0);
    }
    space.identification = Some(DofIdentification {
      tdof_of_dof,
      rep_dofs,
      prolongation: nas::CscMatrix::from(&coo),
    });
    space
  }

  /// The space of the same order on a refined mesh, carrying the nodal
  /// interpolation operator from `coarse`.
  pub fn refined_from(
    coarse: &FeSpace,
    fine_mesh: Rc<SimplicialMesh>,
    map: &RefinementMap,
  ) -> Self {
    assert!(map.nchildren() == fine_mesh.ncells(), "refinement map does not match mesh");
    let order = coarse.order;
    let mut space = Self::new(fine_mesh, order);

    let dim = space.mesh.dim();
    let mut coo = nas::CooMatrix::new(space.ndofs, coarse.ndofs);
    for dof in 0..space.ndofs {
      let (fcell, fbary) = &space.dof_nodes[dof];
      let parent = map.parent(*fcell);
      let phys = space.mesh.cell_geometry(*fcell).bary_to_phys(fbary.as_view());
      let pbary = coarse.mesh.cell_geometry(parent).phys_to_bary(phys.as_view());
      let phi = fe::eval_basis(order, dim, pbary.as_view());
      for (k, &cdof) in coarse.cell_dofs(parent).iter().enumerate() {
        if phi[k].abs() > 1e-12 {
          coo.push(dof, cdof, phi[k]);
        }
      }
    }
    space.update_op = Some(nas::CscMatrix::from(&coo));
    space
  }
}

// getters
impl FeSpace {
  pub fn mesh(&self) -> &Rc<SimplicialMesh> {
    &self.mesh
  }
  pub fn order(&self) -> usize {
    self.order
  }
  pub fn ndofs(&self) -> usize {
    self.ndofs
  }
  /// Size of the full (local) dof vector of a field over this space.
  pub fn vsize(&self) -> usize {
    self.ndofs
  }
  /// Size of the reduced (constraint-free) dof vector.
  pub fn true_vsize(&self) -> usize {
    match &self.identification {
      Some(ident) => ident.rep_dofs.len(),
      None => self.ndofs,
    }
  }

  /// The prolongation from true dofs to full dofs, if the space is
  /// constrained; conforming unconstrained spaces have none.
  pub fn conforming_prolongation(&self) -> Option<&nas::CscMatrix<f64>> {
    self.identification.as_ref().map(|ident| &ident.prolongation)
  }

  /// Interpolation from the space this one was refined from, if any.
  pub fn update_operator(&self) -> Option<&nas::CscMatrix<f64>> {
    self.update_op.as_ref()
  }

  pub fn cell_dofs(&self, icell: CellIdx) -> Vec<DofIdx> {
    let mut dofs: Vec<_> = self.mesh.cell_vertices(icell).to_vec();
    if self.order == 2 {
      let nv = self.mesh.nvertices();
      dofs.extend(self.mesh.cell_edges(icell).iter().map(|&e| nv + e));
    }
    dofs
  }

  /// Dofs on one boundary facet.
  pub fn boundary_facet_dofs(&self, b: usize) -> Vec<DofIdx> {
    let verts = self.mesh.boundary_facet_vertices(b);
    let mut dofs: Vec<_> = verts.to_vec();
    if self.order == 2 && verts.len() == 2 {
      let e = self.mesh.edge_index(verts[0], verts[1]).expect("boundary facet without edge");
      dofs.push(self.mesh.nvertices() + e);
    }
    dofs
  }

  /// Dofs on boundary facets whose attribute is marked (`marker[attr - 1]`);
  /// `None` marks every attribute.
  pub fn boundary_dofs(&self, marker: Option<&[bool]>) -> Vec<DofIdx> {
    let mut dofs = Vec::new();
    for b in 0..self.mesh.nboundary_facets() {
      let attr = self.mesh.boundary_attribute(b);
      let marked = match marker {
        None => true,
        Some(m) => m.get(attr - 1).copied().unwrap_or(false),
      };
      if marked {
        dofs.extend(self.boundary_facet_dofs(b));
      }
    }
    dofs.sort_unstable();
    dofs.dedup();
    dofs
  }

  /// The essential-dof list for the marked boundary attributes, in the full
  /// numbering.
  pub fn essential_dofs(&self, bdr_marker: &[bool]) -> Vec<DofIdx> {
    self.boundary_dofs(Some(bdr_marker))
  }

  /// The essential-dof list in the true-dof numbering.
  pub fn essential_true_dofs(&self, bdr_marker: &[bool]) -> Vec<DofIdx> {
    let mut tdofs: Vec<_> =
      self.essential_dofs(bdr_marker).into_iter().map(|d| self.tdof_of_dof(d)).collect();
    tdofs.sort_unstable();
    tdofs.dedup();
    tdofs
  }

  pub fn tdof_of_dof(&self, dof: DofIdx) -> usize {
    match &self.identification {
      Some(ident) => ident.tdof_of_dof[dof],
      None => dof,
    }
  }

  /// Host cell and barycentric coordinates of a dof's nodal point.
  pub fn dof_element(&self, dof: DofIdx) -> (CellIdx, na::DVectorView<f64>) {
    let (cell, bary) = &self.dof_nodes[dof];
    (*cell, bary.as_view())
  }

  /// Restriction of a full vector to true dofs (representative picking).
  pub fn restrict(&self, x: na::DVectorView<f64>) -> na::DVector<f64> {
    assert!(x.len() == self.ndofs, "restriction input of incorrect size");
    match &self.identification {
      Some(ident) => {
        na::DVector::from_iterator(ident.rep_dofs.len(), ident.rep_dofs.iter().map(|&d| x[d]))
      }
      None => x.clone_owned(),
    }
  }

  /// Prolongation of a true-dof vector to the full numbering.
  pub fn prolongate(&self, tx: na::DVectorView<f64>) -> na::DVector<f64> {
    assert!(tx.len() == self.true_vsize(), "prolongation input of incorrect size");
    match &self.identification {
      Some(ident) => {
        na::DVector::from_iterator(self.ndofs, (0..self.ndofs).map(|d| tx[ident.tdof_of_dof[d]]))
      }
      None => tx.clone_owned(),
    }
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::mesh::SimplicialMesh;

  #[test]
  fn dof_counts() {
    let mesh = Rc::new(SimplicialMesh::unit_square(2));
    let p1 = FeSpace::new(Rc::clone(&mesh), 1);
    assert_eq!(p1.ndofs(), 9);
    let p2 = FeSpace::new(Rc::clone(&mesh), 2);
    assert_eq!(p2.ndofs(), mesh.nvertices() + mesh.nedges());
    assert_eq!(p2.cell_dofs(0).len(), 6);
  }

  #[test]
  fn essential_dofs_by_attribute() {
    let mesh = Rc::new(SimplicialMesh::interval(0.0, 1.0, 4));
    let space = FeSpace::new(mesh, 1);
    // only the left end (attribute 1)
    let left = space.essential_dofs(&[true, false]);
    assert_eq!(left.len(), 1);
    let both = space.essential_dofs(&[true, true]);
    assert_eq!(both.len(), 2);
  }

  #[test]
  fn periodic_identification() {
    let mesh = Rc::new(SimplicialMesh::interval(0.0, 1.0, 4));
    let space = FeSpace::new_periodic(mesh, 1);
    assert_eq!(space.vsize(), 5);
    assert_eq!(space.true_vsize(), 4);

    let tx = na::DVector::from_fn(4, |i, _| i as f64 + 1.0);
    let x = space.prolongate(tx.as_view());
    assert_eq!(x[0], x[4]);
    let back = space.restrict(x.as_view());
    assert_eq!(back, tx);
  }

  #[test]
  fn refinement_update_operator_is_interpolation() {
    let coarse_mesh = Rc::new(SimplicialMesh::interval(0.0, 1.0, 2));
    let coarse = FeSpace::new(Rc::clone(&coarse_mesh), 1);
    let (fine_mesh, map) = coarse_mesh.uniform_refine();
    let fine = FeSpace::refined_from(&coarse, Rc::new(fine_mesh), &map);

    let t = fine.update_operator().unwrap();
    // a linear function is reproduced exactly by P1 interpolation
    let coarse_vals =
      na::DVector::from_fn(coarse.ndofs(), |i, _| coarse_mesh.vertex(i)[0] * 2.0 + 1.0);
    let fine_vals = crate::linalg::csc_mul_vec(t, coarse_vals.as_view());
    for dof in 0..fine.ndofs() {
      let (cell, bary) = fine.dof_element(dof);
      let x = fine.mesh().cell_geometry(cell).bary_to_phys(bary)[0];
      assert!((fine_vals[dof] - (2.0 * x + 1.0)).abs() <= 1e-13);
    }
  }
}
