//! Simplicial meshes: containers of cells and facets with a global
//! numbering, vertex coordinates, boundary attributes and uniform
//! refinement.
//!
//! A mesh is immutable once built and shared behind [`std::rc::Rc`];
//! refinement produces a new mesh together with a [`RefinementMap`] that
//! records the parent cell of every child, which is what nodal transfer
//! operators are built from.

use crate::Dim;

use indexmap::IndexSet;
use itertools::Itertools;

pub type VertexIdx = usize;
pub type CellIdx = usize;
pub type EdgeIdx = usize;
pub type FacetIdx = usize;
/// 1-based integer label on cells and boundary facets, in the style of mesh
/// generators; attribute markers index with `attribute - 1`.
pub type Attribute = usize;

#[derive(Debug, thiserror::Error)]
pub enum MeshError {
  #[error("gmsh parse failure: {0}")]
  Gmsh(String),
  #[error("gmsh file contains no supported cells")]
  NoCells,
}

#[derive(Debug)]
pub struct SimplicialMesh {
  /// Vertex coordinates in the columns of a matrix.
  vertex_coords: na::DMatrix<f64>,
  /// Cells as (dim + 1) vertex indices, positively oriented.
  cells: Vec<Vec<VertexIdx>>,
  cell_attributes: Vec<Attribute>,
  /// All 1-simplices, as sorted vertex pairs in insertion order.
  edges: IndexSet<(VertexIdx, VertexIdx)>,
  /// Global edge index per local (lexicographic) cell edge.
  cell_edges: Vec<Vec<EdgeIdx>>,
  /// All (dim - 1)-simplices, as sorted vertex lists in insertion order.
  facets: IndexSet<Vec<VertexIdx>>,
  /// Cells incident to each facet; one for boundary facets, two otherwise.
  facet_cells: Vec<Vec<CellIdx>>,
  boundary_facets: Vec<FacetIdx>,
  boundary_attributes: Vec<Attribute>,
}

impl SimplicialMesh {
  /// Builds the mesh from coordinates and positively oriented cells.
  /// All boundary attributes start out as 1.
  pub fn from_parts(
    vertex_coords: na::DMatrix<f64>,
    cells: Vec<Vec<VertexIdx>>,
    cell_attributes: Option<Vec<Attribute>>,
  ) -> Self {
    let dim = vertex_coords.nrows();
    assert!(dim >= 1, "mesh dimension must be at least one");
    assert!(!cells.is_empty(), "mesh must contain at least one cell");
    for cell in &cells {
      assert!(cell.len() == dim + 1, "cell vertex count does not match dimension");
    }
    let cell_attributes = cell_attributes.unwrap_or_else(|| vec![1; cells.len()]);
    assert!(cell_attributes.len() == cells.len());

    let mut edges = IndexSet::new();
    let mut cell_edges = Vec::with_capacity(cells.len());
    for cell in &cells {
      let mut locals = Vec::new();
      for (i, j) in (0..cell.len()).tuple_combinations() {
        let (a, b) = sorted_pair(cell[i], cell[j]);
        let (idx, _) = edges.insert_full((a, b));
        locals.push(idx);
      }
      cell_edges.push(locals);
    }

    let mut facets: IndexSet<Vec<VertexIdx>> = IndexSet::new();
    let mut facet_cells: Vec<Vec<CellIdx>> = Vec::new();
    for (icell, cell) in cells.iter().enumerate() {
      for omit in 0..cell.len() {
        let mut facet: Vec<_> = cell
          .iter()
          .enumerate()
          .filter_map(|(k, &v)| (k != omit).then_some(v))
          .collect();
        facet.sort_unstable();
        let (idx, fresh) = facets.insert_full(facet);
        if fresh {
          facet_cells.push(Vec::new());
        }
        facet_cells[idx].push(icell);
      }
    }

    let boundary_facets: Vec<_> = (0..facets.len()).filter(|&f| facet_cells[f].len() == 1).collect();
    let boundary_attributes = vec![1; boundary_facets.len()];

    let mesh = Self {
      vertex_coords,
      cells,
      cell_attributes,
      edges,
      cell_edges,
      facets,
      facet_cells,
      boundary_facets,
      boundary_attributes,
    };
    if cfg!(debug_assertions) {
      for icell in 0..mesh.ncells() {
        assert!(mesh.cell_geometry(icell).det() > 0.0, "cells must be positively oriented");
      }
    }
    mesh
  }

  /// A 1D mesh of `ncells` equal segments on `[a, b]`, with boundary
  /// attribute 1 on the left end and 2 on the right end.
  pub fn interval(a: f64, b: f64, ncells: usize) -> Self {
    assert!(ncells >= 1 && b > a);
    let nv = ncells + 1;
    let h = (b - a) / ncells as f64;
    let coords = na::DMatrix::from_fn(1, nv, |_, j| a + h * j as f64);
    let cells = (0..ncells).map(|i| vec![i, i + 1]).collect();
    let mut mesh = Self::from_parts(coords, cells, None);
    mesh.assign_boundary_attributes(|facet| {
      if (facet.coords()[(0, 0)] - a).abs() <= 0.5 * h {
        1
      } else {
        2
      }
    });
    mesh
  }

  /// A triangle mesh of the unit square with `n × n` boxes, each split into
  /// two triangles. Boundary attributes follow the usual generator
  /// convention: bottom 1, right 2, top 3, left 4.
  pub fn unit_square(n: usize) -> Self {
    assert!(n >= 1);
    let nv = n + 1;
    let h = (n as f64).recip();
    let coords =
      na::DMatrix::from_fn(2, nv * nv, |r, j| h * if r == 0 { j % nv } else { j / nv } as f64);

    let vid = |i: usize, j: usize| j * nv + i;
    let mut cells = Vec::with_capacity(2 * n * n);
    for j in 0..n {
      for i in 0..n {
        let (v00, v10, v01, v11) = (vid(i, j), vid(i + 1, j), vid(i, j + 1), vid(i + 1, j + 1));
        cells.push(vec![v00, v10, v11]);
        cells.push(vec![v00, v11, v01]);
      }
    }

    let mut mesh = Self::from_parts(coords, cells, None);
    let eps = 0.25 * h;
    mesh.assign_boundary_attributes(|facet| {
      let mid = facet.midpoint();
      if mid[1] < eps {
        1
      } else if mid[0] > 1.0 - eps {
        2
      } else if mid[1] > 1.0 - eps {
        3
      } else {
        4
      }
    });
    mesh
  }

  /// Loads a triangle mesh from a Gmsh `.msh` file (version 4.1).
  pub fn from_gmsh(bytes: &[u8]) -> Result<Self, MeshError> {
    let msh = mshio::parse_msh_bytes(bytes).map_err(|e| MeshError::Gmsh(e.to_string()))?;

    let node_blocks = msh.data.nodes.ok_or(MeshError::NoCells)?.node_blocks;
    let vertices: Vec<_> = node_blocks
      .iter()
      .flat_map(|block| block.nodes.iter())
      .map(|node| na::dvector![node.x, node.y])
      .collect();
    let vertex_coords = na::DMatrix::from_columns(&vertices);

    let mut cells = Vec::new();
    let elements = msh.data.elements.ok_or(MeshError::NoCells)?;
    for block in elements.element_blocks {
      if block.element_type != mshio::ElementType::Tri3 {
        tracing::debug!("skipping gmsh element type {:?}", block.element_type);
        continue;
      }
      for e in block.elements {
        let mut cell: Vec<_> = e.nodes.iter().map(|tag| *tag as usize - 1).collect();
        // gmsh does not promise consistently oriented triangles
        let geo_det = {
          let a = vertex_coords.column(cell[0]);
          let b = vertex_coords.column(cell[1]);
          let c = vertex_coords.column(cell[2]);
          (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0])
        };
        if geo_det < 0.0 {
          cell.swap(1, 2);
        }
        cells.push(cell);
      }
    }
    if cells.is_empty() {
      return Err(MeshError::NoCells);
    }
    Ok(Self::from_parts(vertex_coords, cells, None))
  }
}

// getters
impl SimplicialMesh {
  pub fn dim(&self) -> Dim {
    self.vertex_coords.nrows()
  }
  pub fn nvertices(&self) -> usize {
    self.vertex_coords.ncols()
  }
  pub fn ncells(&self) -> usize {
    self.cells.len()
  }
  pub fn nedges(&self) -> usize {
    self.edges.len()
  }
  pub fn vertex_coords(&self) -> &na::DMatrix<f64> {
    &self.vertex_coords
  }
  pub fn vertex(&self, v: VertexIdx) -> na::DVectorView<f64> {
    self.vertex_coords.column(v)
  }

  pub fn cell_vertices(&self, icell: CellIdx) -> &[VertexIdx] {
    &self.cells[icell]
  }
  pub fn cell_attribute(&self, icell: CellIdx) -> Attribute {
    self.cell_attributes[icell]
  }
  pub fn cell_edges(&self, icell: CellIdx) -> &[EdgeIdx] {
    &self.cell_edges[icell]
  }
  pub fn edge_vertices(&self, e: EdgeIdx) -> (VertexIdx, VertexIdx) {
    *self.edges.get_index(e).unwrap()
  }
  pub fn edge_index(&self, a: VertexIdx, b: VertexIdx) -> Option<EdgeIdx> {
    self.edges.get_index_of(&sorted_pair(a, b))
  }

  pub fn cell_geometry(&self, icell: CellIdx) -> CellGeometry {
    let cell = &self.cells[icell];
    let mut coords = na::DMatrix::zeros(self.dim(), cell.len());
    for (k, &v) in cell.iter().enumerate() {
      coords.set_column(k, &self.vertex_coords.column(v));
    }
    CellGeometry {
      coords,
      attribute: self.cell_attributes[icell],
      index: icell,
    }
  }

  pub fn nboundary_facets(&self) -> usize {
    self.boundary_facets.len()
  }
  pub fn boundary_facet_vertices(&self, b: usize) -> &[VertexIdx] {
    self.facets.get_index(self.boundary_facets[b]).unwrap()
  }
  pub fn boundary_attribute(&self, b: usize) -> Attribute {
    self.boundary_attributes[b]
  }
  pub fn boundary_facet_cell(&self, b: usize) -> CellIdx {
    self.facet_cells[self.boundary_facets[b]][0]
  }
  pub fn max_boundary_attribute(&self) -> Attribute {
    self.boundary_attributes.iter().copied().max().unwrap_or(0)
  }

  /// The vertices that lie on the boundary of the mesh, no particular order.
  pub fn boundary_vertices(&self) -> Vec<VertexIdx> {
    self
      .boundary_facets
      .iter()
      .flat_map(|&f| self.facets.get_index(f).unwrap().iter().copied())
      .unique()
      .collect()
  }

  pub fn boundary_facet_geometry(&self, b: usize) -> FacetGeometry {
    self.facet_geometry_of(self.boundary_facets[b], self.boundary_attributes[b])
  }

  pub fn interior_facets(&self) -> Vec<FacetIdx> {
    (0..self.facets.len()).filter(|&f| self.facet_cells[f].len() == 2).collect()
  }
  pub fn facet_cells(&self, f: FacetIdx) -> &[CellIdx] {
    &self.facet_cells[f]
  }
  pub fn facet_vertices(&self, f: FacetIdx) -> &[VertexIdx] {
    self.facets.get_index(f).unwrap()
  }
  pub fn facet_geometry(&self, f: FacetIdx) -> FacetGeometry {
    self.facet_geometry_of(f, 0)
  }

  fn facet_geometry_of(&self, f: FacetIdx, attribute: Attribute) -> FacetGeometry {
    let verts = self.facets.get_index(f).unwrap();
    let mut coords = na::DMatrix::zeros(self.dim(), verts.len());
    for (k, &v) in verts.iter().enumerate() {
      coords.set_column(k, &self.vertex_coords.column(v));
    }
    let cell = self.facet_cells[f][0];
    let normal = self.outward_normal(&coords, cell);
    FacetGeometry {
      coords,
      attribute,
      cell,
      normal,
    }
  }

  fn outward_normal(&self, facet_coords: &na::DMatrix<f64>, cell: CellIdx) -> na::DVector<f64> {
    let centroid = self.cell_geometry(cell).centroid();
    match self.dim() {
      1 => {
        let sign = (facet_coords[(0, 0)] - centroid[0]).signum();
        na::dvector![sign]
      }
      2 => {
        let e = facet_coords.column(1) - facet_coords.column(0);
        let mut n = na::dvector![e[1], -e[0]];
        n /= n.norm();
        let mid = (facet_coords.column(0) + facet_coords.column(1)) / 2.0;
        if n.dot(&(mid - centroid)) < 0.0 {
          n = -n;
        }
        n
      }
      dim => panic!("no facet normals in dimension {dim}"),
    }
  }
}

impl SimplicialMesh {
  /// Reassigns all boundary attributes through a facet predicate.
  pub fn assign_boundary_attributes<F>(&mut self, f: F)
  where
    F: Fn(&FacetGeometry) -> Attribute,
  {
    for b in 0..self.boundary_facets.len() {
      let geo = self.boundary_facet_geometry(b);
      let attr = f(&geo);
      assert!(attr >= 1, "boundary attributes are 1-based");
      self.boundary_attributes[b] = attr;
    }
  }

  fn boundary_attribute_of(&self, sorted_verts: &[VertexIdx]) -> Option<Attribute> {
    let f = self.facets.get_index_of(sorted_verts)?;
    let b = self.boundary_facets.iter().position(|&bf| bf == f)?;
    Some(self.boundary_attributes[b])
  }

  /// Uniformly refines the mesh: 1D segments are bisected, 2D triangles are
  /// split into four. Every edge midpoint becomes a new vertex with index
  /// `nvertices + edge`. Cell and boundary attributes are inherited.
  pub fn uniform_refine(&self) -> (SimplicialMesh, RefinementMap) {
    let dim = self.dim();
    assert!(dim <= 2, "uniform refinement is available in dimensions 1 and 2");

    let nv = self.nvertices();
    let mut coords = na::DMatrix::zeros(dim, nv + self.nedges());
    coords.view_mut((0, 0), (dim, nv)).copy_from(&self.vertex_coords);
    for (e, &(a, b)) in self.edges.iter().enumerate() {
      let mid = (self.vertex_coords.column(a) + self.vertex_coords.column(b)) / 2.0;
      coords.set_column(nv + e, &mid);
    }

    let mut cells = Vec::new();
    let mut attrs = Vec::new();
    let mut parents = Vec::new();
    for icell in 0..self.ncells() {
      let cv = &self.cells[icell];
      let ce = &self.cell_edges[icell];
      let children: Vec<Vec<VertexIdx>> = match dim {
        1 => {
          let m = nv + ce[0];
          vec![vec![cv[0], m], vec![m, cv[1]]]
        }
        _ => {
          // local lexicographic edge order: (0,1), (0,2), (1,2)
          let (m01, m02, m12) = (nv + ce[0], nv + ce[1], nv + ce[2]);
          vec![
            vec![cv[0], m01, m02],
            vec![m01, cv[1], m12],
            vec![m02, m12, cv[2]],
            vec![m01, m12, m02],
          ]
        }
      };
      for child in children {
        cells.push(child);
        attrs.push(self.cell_attributes[icell]);
        parents.push(icell);
      }
    }

    let mut refined = SimplicialMesh::from_parts(coords, cells, Some(attrs));
    tracing::debug!(
      ncells_old = self.ncells(),
      ncells_new = refined.ncells(),
      "uniformly refined mesh"
    );

    // child boundary facets inherit the parent facet's attribute
    for b in 0..refined.boundary_facets.len() {
      let verts = refined.facets.get_index(refined.boundary_facets[b]).unwrap();
      let parent_facet: Vec<VertexIdx> = match dim {
        1 => verts.clone(),
        _ => {
          let m = verts.iter().copied().find(|&v| v >= nv).expect("child boundary edge has a midpoint");
          let (a, b2) = *self.edges.get_index(m - nv).unwrap();
          let mut f = vec![a, b2];
          f.sort_unstable();
          f
        }
      };
      if let Some(attr) = self.boundary_attribute_of(&parent_facet) {
        refined.boundary_attributes[b] = attr;
      }
    }

    (refined, RefinementMap { parents })
  }
}

/// Records, for every cell of a refined mesh, the parent cell it was cut
/// from.
#[derive(Debug, Clone)]
pub struct RefinementMap {
  parents: Vec<CellIdx>,
}
impl RefinementMap {
  pub fn parent(&self, child: CellIdx) -> CellIdx {
    self.parents[child]
  }
  pub fn nchildren(&self) -> usize {
    self.parents.len()
  }
}

/// Coordinate geometry of a single cell.
#[derive(Debug, Clone)]
pub struct CellGeometry {
  /// Vertex coordinates in columns, dim × (dim + 1).
  coords: na::DMatrix<f64>,
  attribute: Attribute,
  index: CellIdx,
}

impl CellGeometry {
  pub fn dim(&self) -> Dim {
    self.coords.nrows()
  }
  pub fn nvertices(&self) -> usize {
    self.coords.ncols()
  }
  pub fn attribute(&self) -> Attribute {
    self.attribute
  }
  pub fn index(&self) -> CellIdx {
    self.index
  }
  pub fn coords(&self) -> &na::DMatrix<f64> {
    &self.coords
  }
  pub fn vertex(&self, k: usize) -> na::DVectorView<f64> {
    self.coords.column(k)
  }

  pub fn spanning_vectors(&self) -> na::DMatrix<f64> {
    let mut mat = na::DMatrix::zeros(self.dim(), self.nvertices() - 1);
    let v0 = self.coords.column(0);
    for (i, vi) in self.coords.column_iter().skip(1).enumerate() {
      mat.set_column(i, &(vi - v0));
    }
    mat
  }

  /// The determinant (signed volume scale) of the spanning vectors.
  pub fn det(&self) -> f64 {
    self.spanning_vectors().determinant()
  }

  /// The (unsigned) volume of the cell.
  pub fn vol(&self) -> f64 {
    ref_vol(self.dim()) * self.det().abs()
  }

  pub fn centroid(&self) -> na::DVector<f64> {
    let mut c = na::DVector::zeros(self.dim());
    for col in self.coords.column_iter() {
      c += col;
    }
    c / self.nvertices() as f64
  }

  /// Maximum distance between two points of the cell.
  pub fn diameter(&self) -> f64 {
    let mut diam = 0.0f64;
    for (i, vi) in self.coords.column_iter().enumerate() {
      for vj in self.coords.column_iter().skip(i + 1) {
        diam = diam.max((vj - vi).norm());
      }
    }
    diam
  }

  /// Gradients of the barycentric coordinate functions, dim × (dim + 1).
  pub fn grad_barys(&self) -> na::DMatrix<f64> {
    let jinv = self.spanning_vectors().try_inverse().expect("degenerate cell");
    let mut grads = na::DMatrix::zeros(self.dim(), self.nvertices());
    for i in 0..self.dim() {
      let gi = jinv.row(i).transpose();
      grads.set_column(i + 1, &gi);
    }
    let g0 = -grads.column_sum();
    grads.set_column(0, &g0);
    grads
  }

  pub fn bary_to_phys(&self, bary: na::DVectorView<f64>) -> na::DVector<f64> {
    assert!(bary.len() == self.nvertices());
    &self.coords * bary
  }

  pub fn phys_to_bary(&self, phys: na::DVectorView<f64>) -> na::DVector<f64> {
    let j = self.spanning_vectors();
    let rest = j
      .lu()
      .solve(&(phys - self.coords.column(0)))
      .expect("degenerate cell");
    let mut bary = na::DVector::zeros(self.nvertices());
    bary[0] = 1.0 - rest.sum();
    for i in 0..rest.len() {
      bary[i + 1] = rest[i];
    }
    bary
  }
}

/// Coordinate geometry of a (boundary or interior) facet.
#[derive(Debug, Clone)]
pub struct FacetGeometry {
  coords: na::DMatrix<f64>,
  attribute: Attribute,
  /// The adjacent cell the outward normal points away from.
  cell: CellIdx,
  normal: na::DVector<f64>,
}

impl FacetGeometry {
  pub fn dim(&self) -> Dim {
    self.coords.nrows()
  }
  pub fn nvertices(&self) -> usize {
    self.coords.ncols()
  }
  pub fn attribute(&self) -> Attribute {
    self.attribute
  }
  pub fn cell(&self) -> CellIdx {
    self.cell
  }
  pub fn coords(&self) -> &na::DMatrix<f64> {
    &self.coords
  }
  pub fn normal(&self) -> &na::DVector<f64> {
    &self.normal
  }

  /// Unit tangent along the facet; only meaningful for 2D edge facets.
  pub fn tangent(&self) -> na::DVector<f64> {
    assert!(self.dim() == 2, "facet tangents require a 2D mesh");
    let mut t = self.coords.column(1) - self.coords.column(0);
    t /= t.norm();
    t
  }

  pub fn midpoint(&self) -> na::DVector<f64> {
    let mut c = na::DVector::zeros(self.dim());
    for col in self.coords.column_iter() {
      c += col;
    }
    c / self.nvertices() as f64
  }

  /// The facet measure: 1 for point facets, the length for edge facets.
  pub fn vol(&self) -> f64 {
    if self.nvertices() == 1 {
      1.0
    } else {
      (self.coords.column(1) - self.coords.column(0)).norm()
    }
  }

  pub fn bary_to_phys(&self, bary: na::DVectorView<f64>) -> na::DVector<f64> {
    assert!(bary.len() == self.nvertices());
    &self.coords * bary
  }
}

pub fn ref_vol(dim: Dim) -> f64 {
  ((1..=dim).product::<usize>() as f64).recip()
}

fn sorted_pair(a: VertexIdx, b: VertexIdx) -> (VertexIdx, VertexIdx) {
  if a < b {
    (a, b)
  } else {
    (b, a)
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn interval_topology() {
    let mesh = SimplicialMesh::interval(0.0, 1.0, 4);
    assert_eq!(mesh.dim(), 1);
    assert_eq!(mesh.nvertices(), 5);
    assert_eq!(mesh.ncells(), 4);
    assert_eq!(mesh.nboundary_facets(), 2);
    let attrs: Vec<_> = (0..2).map(|b| mesh.boundary_attribute(b)).collect();
    assert!(attrs.contains(&1) && attrs.contains(&2));
    assert!((mesh.cell_geometry(0).vol() - 0.25).abs() <= 1e-14);
  }

  #[test]
  fn unit_square_topology() {
    let n = 3;
    let mesh = SimplicialMesh::unit_square(n);
    assert_eq!(mesh.nvertices(), (n + 1) * (n + 1));
    assert_eq!(mesh.ncells(), 2 * n * n);
    assert_eq!(mesh.nboundary_facets(), 4 * n);
    assert_eq!(mesh.max_boundary_attribute(), 4);

    let total_vol: f64 = (0..mesh.ncells()).map(|i| mesh.cell_geometry(i).vol()).sum();
    assert!((total_vol - 1.0).abs() <= 1e-14);
  }

  #[test]
  fn refinement_preserves_volume_and_attributes() {
    let mesh = SimplicialMesh::unit_square(2);
    let (fine, map) = mesh.uniform_refine();
    assert_eq!(fine.ncells(), 4 * mesh.ncells());
    assert_eq!(map.nchildren(), fine.ncells());

    let total_vol: f64 = (0..fine.ncells()).map(|i| fine.cell_geometry(i).vol()).sum();
    assert!((total_vol - 1.0).abs() <= 1e-14);

    // every child boundary facet carries its parent's attribute
    for b in 0..fine.nboundary_facets() {
      let geo = fine.boundary_facet_geometry(b);
      let mid = geo.midpoint();
      let eps = 1e-12;
      let expected = if mid[1] < eps {
        1
      } else if mid[0] > 1.0 - eps {
        2
      } else if mid[1] > 1.0 - eps {
        3
      } else {
        4
      };
      assert_eq!(fine.boundary_attribute(b), expected);
    }
  }

  #[test]
  fn barycentric_round_trip() {
    let mesh = SimplicialMesh::unit_square(1);
    let geo = mesh.cell_geometry(0);
    let bary = na::dvector![0.2, 0.3, 0.5];
    let phys = geo.bary_to_phys(bary.as_view());
    let back = geo.phys_to_bary(phys.as_view());
    assert!((back - bary).norm() <= 1e-13);
  }

  #[test]
  fn outward_normals() {
    let mesh = SimplicialMesh::unit_square(1);
    for b in 0..mesh.nboundary_facets() {
      let geo = mesh.boundary_facet_geometry(b);
      let outward = geo.midpoint() + 0.1 * geo.normal();
      // outward points must leave the unit square
      let inside = (0.0..=1.0).contains(&outward[0]) && (0.0..=1.0).contains(&outward[1]);
      assert!(!inside);
    }
  }
}
