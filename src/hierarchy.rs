//! Hierarchies of meshes and finite element spaces for multilevel methods.
//!
//! A hierarchy is a container, not a solver: multigrid-type algorithms
//! consume its per-level spaces. Levels are append-only and shared (`Rc`);
//! level 0 is the coarsest and exists from construction on.

use crate::{
  mesh::SimplicialMesh,
  par::ParFeSpace,
  space::FeSpace,
};

use std::rc::Rc;

/// The capability a hierarchy needs from its space type: refine my mesh and
/// rebuild me on it, or rebuild me at another order. The parallel space
/// implements this too, which is what narrows the accessor types of
/// [`ParSpaceHierarchy`] — covariance through the generic parameter.
pub trait RefinableSpace: Sized {
  fn mesh(&self) -> &Rc<SimplicialMesh>;
  fn uniformly_refined(&self) -> (Rc<SimplicialMesh>, Self);
  fn order_refined(&self, order: usize) -> Self;
}

impl RefinableSpace for FeSpace {
  fn mesh(&self) -> &Rc<SimplicialMesh> {
    FeSpace::mesh(self)
  }
  fn uniformly_refined(&self) -> (Rc<SimplicialMesh>, Self) {
    let (fine_mesh, map) = FeSpace::mesh(self).uniform_refine();
    let fine_mesh = Rc::new(fine_mesh);
    let space = FeSpace::refined_from(self, Rc::clone(&fine_mesh), &map);
    (fine_mesh, space)
  }
  fn order_refined(&self, order: usize) -> Self {
    FeSpace::new(Rc::clone(FeSpace::mesh(self)), order)
  }
}

impl RefinableSpace for ParFeSpace {
  fn mesh(&self) -> &Rc<SimplicialMesh> {
    self.space().mesh()
  }
  fn uniformly_refined(&self) -> (Rc<SimplicialMesh>, Self) {
    let (fine_mesh, space) = RefinableSpace::uniformly_refined(&**self.space());
    (fine_mesh, ParFeSpace::new(&Rc::new(space), Rc::clone(self.comm())))
  }
  fn order_refined(&self, order: usize) -> Self {
    let space = RefinableSpace::order_refined(&**self.space(), order);
    ParFeSpace::new(&Rc::new(space), Rc::clone(self.comm()))
  }
}

/// An ordered ladder of (mesh, space) levels; index 0 is the coarsest.
pub struct SpaceHierarchy<S = FeSpace> {
  meshes: Vec<Rc<SimplicialMesh>>,
  spaces: Vec<Rc<S>>,
}

/// The distributed hierarchy: same logic, parallel-space-typed accessors.
pub type ParSpaceHierarchy = SpaceHierarchy<ParFeSpace>;

impl<S: RefinableSpace> SpaceHierarchy<S> {
  /// A hierarchy with the given mesh and space on level zero.
  pub fn new(mesh: Rc<SimplicialMesh>, space: Rc<S>) -> Self {
    Self {
      meshes: vec![mesh],
      spaces: vec![space],
    }
  }

  pub fn num_levels(&self) -> usize {
    self.spaces.len()
  }
  pub fn finest_level_index(&self) -> usize {
    self.num_levels() - 1
  }

  /// Appends a level; no validation that the space lives on the mesh is
  /// performed — that is the caller's responsibility.
  pub fn add_level(&mut self, mesh: Rc<SimplicialMesh>, space: Rc<S>) {
    self.meshes.push(mesh);
    self.spaces.push(space);
  }

  /// Appends a level by uniformly refining the finest mesh.
  pub fn add_uniformly_refined_level(&mut self) {
    let (mesh, space) = self.finest_space().uniformly_refined();
    tracing::debug!(level = self.num_levels(), "added uniformly refined level");
    self.add_level(mesh, Rc::new(space));
  }

  /// Appends a level with the same mesh and a different element order.
  pub fn add_order_refined_level(&mut self, order: usize) {
    let space = self.finest_space().order_refined(order);
    let mesh = Rc::clone(self.meshes.last().unwrap());
    tracing::debug!(level = self.num_levels(), order, "added order refined level");
    self.add_level(mesh, Rc::new(space));
  }

  pub fn mesh_at_level(&self, level: usize) -> &Rc<SimplicialMesh> {
    assert!(level < self.num_levels(), "level {level} beyond the finest level");
    &self.meshes[level]
  }

  pub fn space_at_level(&self, level: usize) -> &Rc<S> {
    assert!(level < self.num_levels(), "level {level} beyond the finest level");
    &self.spaces[level]
  }

  pub fn finest_space(&self) -> &Rc<S> {
    self.spaces.last().unwrap()
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::par::SelfComm;

  #[test]
  fn levels_are_append_only_and_ordered() {
    let mesh = Rc::new(SimplicialMesh::interval(0.0, 1.0, 2));
    let space = Rc::new(FeSpace::new(Rc::clone(&mesh), 1));
    let mut hierarchy = SpaceHierarchy::new(mesh, space);
    assert_eq!(hierarchy.num_levels(), 1);

    hierarchy.add_uniformly_refined_level();
    hierarchy.add_uniformly_refined_level();
    assert_eq!(hierarchy.num_levels(), 3);
    assert_eq!(hierarchy.finest_level_index(), 2);

    // coarsest to finest
    assert_eq!(hierarchy.space_at_level(0).ndofs(), 3);
    assert_eq!(hierarchy.space_at_level(1).ndofs(), 5);
    assert_eq!(hierarchy.space_at_level(2).ndofs(), 9);
    assert_eq!(hierarchy.finest_space().ndofs(), 9);
  }

  #[test]
  fn order_refined_level_shares_the_mesh() {
    let mesh = Rc::new(SimplicialMesh::interval(0.0, 1.0, 4));
    let space = Rc::new(FeSpace::new(Rc::clone(&mesh), 1));
    let mut hierarchy = SpaceHierarchy::new(Rc::clone(&mesh), space);
    hierarchy.add_order_refined_level(2);

    assert!(Rc::ptr_eq(hierarchy.mesh_at_level(0), hierarchy.mesh_at_level(1)));
    assert_eq!(hierarchy.space_at_level(1).order(), 2);
    assert_eq!(hierarchy.space_at_level(1).ndofs(), mesh.nvertices() + mesh.nedges());
  }

  #[test]
  #[should_panic(expected = "beyond the finest level")]
  fn accessors_are_bounds_checked() {
    let mesh = Rc::new(SimplicialMesh::interval(0.0, 1.0, 2));
    let space = Rc::new(FeSpace::new(Rc::clone(&mesh), 1));
    let hierarchy = SpaceHierarchy::new(mesh, space);
    hierarchy.space_at_level(1);
  }

  #[test]
  fn parallel_hierarchy_returns_parallel_spaces() {
    let mesh = Rc::new(SimplicialMesh::interval(0.0, 1.0, 2));
    let space = Rc::new(FeSpace::new(Rc::clone(&mesh), 1));
    let pfes = Rc::new(ParFeSpace::new(&space, Rc::new(SelfComm)));
    let mut hierarchy = ParSpaceHierarchy::new(mesh, pfes);
    hierarchy.add_uniformly_refined_level();

    // the accessor is parallel-space-typed: capability methods are at hand
    let finest: &Rc<ParFeSpace> = hierarchy.finest_space();
    assert_eq!(finest.true_vsize(), 5);
    assert_eq!(finest.tdof_offsets(), vec![0, 5, 5]);
  }
}
