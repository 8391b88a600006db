//! Scalar, vector and matrix coefficients: pluggable functions of position
//! (and optionally time) evaluated at integration points.

use crate::{
  gridfunc::GridFunction,
  mesh::{Attribute, CellIdx, SimplicialMesh},
  quadrature::QuadRule,
};

/// Everything a coefficient may want to know about an evaluation point.
#[derive(Debug, Clone)]
pub struct ElementPoint {
  pub cell: CellIdx,
  pub attribute: Attribute,
  /// Barycentric coordinates with respect to `cell`.
  pub bary: na::DVector<f64>,
  /// Physical coordinates.
  pub phys: na::DVector<f64>,
}

pub trait Coefficient {
  fn eval(&self, p: &ElementPoint) -> f64;
}

/// Plain closures of the physical point are coefficients.
impl<F> Coefficient for F
where
  F: Fn(&na::DVector<f64>) -> f64,
{
  fn eval(&self, p: &ElementPoint) -> f64 {
    self(&p.phys)
  }
}

#[derive(Debug, Clone, Copy)]
pub struct ConstantCoefficient(pub f64);
impl Coefficient for ConstantCoefficient {
  fn eval(&self, _p: &ElementPoint) -> f64 {
    self.0
  }
}

/// Piecewise constant in the cell attribute; `constants[attribute - 1]`.
#[derive(Debug, Clone)]
pub struct PwConstCoefficient {
  constants: Vec<f64>,
}
impl PwConstCoefficient {
  pub fn new(constants: Vec<f64>) -> Self {
    Self { constants }
  }
}
impl Coefficient for PwConstCoefficient {
  fn eval(&self, p: &ElementPoint) -> f64 {
    assert!(p.attribute >= 1, "attributes are 1-based");
    self.constants[p.attribute - 1]
  }
}

/// A time-dependent function coefficient; the plain position-only case is
/// covered by the closure impl of [`Coefficient`].
pub struct FunctionCoefficient {
  function: Box<dyn Fn(&na::DVector<f64>, f64) -> f64>,
  time: f64,
}
impl FunctionCoefficient {
  pub fn new<F>(function: F) -> Self
  where
    F: Fn(&na::DVector<f64>, f64) -> f64 + 'static,
  {
    Self {
      function: Box::new(function),
      time: 0.0,
    }
  }
  pub fn set_time(&mut self, time: f64) {
    self.time = time;
  }
  pub fn time(&self) -> f64 {
    self.time
  }
}
impl Coefficient for FunctionCoefficient {
  fn eval(&self, p: &ElementPoint) -> f64 {
    (self.function)(&p.phys, self.time)
  }
}

/// The point values of a finite element function.
pub struct GridFunctionCoefficient {
  gridfunc: GridFunction,
}
impl GridFunctionCoefficient {
  pub fn new(gridfunc: GridFunction) -> Self {
    Self { gridfunc }
  }
}
impl Coefficient for GridFunctionCoefficient {
  fn eval(&self, p: &ElementPoint) -> f64 {
    self.gridfunc.value(p.cell, p.bary.as_view())
  }
}

/// Applies a scalar transformation to one or two coefficients.
pub struct TransformedCoefficient<Q1, Q2 = ConstantCoefficient> {
  q1: Q1,
  q2: Option<Q2>,
  transform1: Option<Box<dyn Fn(f64) -> f64>>,
  transform2: Option<Box<dyn Fn(f64, f64) -> f64>>,
}
impl<Q1: Coefficient> TransformedCoefficient<Q1> {
  pub fn new<T>(q1: Q1, transform: T) -> Self
  where
    T: Fn(f64) -> f64 + 'static,
  {
    Self {
      q1,
      q2: None,
      transform1: Some(Box::new(transform)),
      transform2: None,
    }
  }
}
impl<Q1: Coefficient, Q2: Coefficient> TransformedCoefficient<Q1, Q2> {
  pub fn new2<T>(q1: Q1, q2: Q2, transform: T) -> Self
  where
    T: Fn(f64, f64) -> f64 + 'static,
  {
    Self {
      q1,
      q2: Some(q2),
      transform1: None,
      transform2: Some(Box::new(transform)),
    }
  }
}
impl<Q1: Coefficient, Q2: Coefficient> Coefficient for TransformedCoefficient<Q1, Q2> {
  fn eval(&self, p: &ElementPoint) -> f64 {
    match (&self.q2, &self.transform2) {
      (Some(q2), Some(t2)) => t2(self.q1.eval(p), q2.eval(p)),
      _ => (self.transform1.as_ref().unwrap())(self.q1.eval(p)),
    }
  }
}

/// Restricts a coefficient to cells whose attribute is marked; zero
/// elsewhere.
pub struct RestrictedCoefficient<C> {
  coeff: C,
  active_attr: Vec<bool>,
}
impl<C: Coefficient> RestrictedCoefficient<C> {
  pub fn new(coeff: C, active_attr: Vec<bool>) -> Self {
    Self { coeff, active_attr }
  }
}
impl<C: Coefficient> Coefficient for RestrictedCoefficient<C> {
  fn eval(&self, p: &ElementPoint) -> f64 {
    if self.active_attr.get(p.attribute - 1).copied().unwrap_or(false) {
      self.coeff.eval(p)
    } else {
      0.0
    }
  }
}

/// A weighted Dirac delta. Its pointwise `eval` is a precondition violation;
/// consumers that understand deltas call [`DeltaCoefficient::eval_delta`].
pub struct DeltaCoefficient {
  center: [f64; 3],
  sdim: usize,
  scale: f64,
  weight: Option<Box<dyn Coefficient>>,
}
impl DeltaCoefficient {
  pub fn new(center: &[f64], scale: f64) -> Self {
    let mut delta = Self {
      center: [0.0; 3],
      sdim: 0,
      scale,
      weight: None,
    };
    delta.set_center(center);
    delta
  }

  pub fn set_center(&mut self, center: &[f64]) {
    assert!(center.len() <= 3, "delta centers support at most 3 dimensions");
    self.center[..center.len()].copy_from_slice(center);
    self.sdim = center.len();
  }
  pub fn center(&self) -> na::DVector<f64> {
    na::DVector::from_column_slice(&self.center[..self.sdim])
  }
  pub fn scale(&self) -> f64 {
    self.scale
  }
  pub fn set_weight<C: Coefficient + 'static>(&mut self, weight: C) {
    self.weight = Some(Box::new(weight));
  }

  pub fn eval_delta(&self, p: &ElementPoint) -> f64 {
    match &self.weight {
      Some(w) => w.eval(p) * self.scale,
      None => self.scale,
    }
  }
}
impl Coefficient for DeltaCoefficient {
  fn eval(&self, _p: &ElementPoint) -> f64 {
    panic!("delta coefficients have no pointwise value; use eval_delta");
  }
}

pub trait VectorCoefficient {
  fn vdim(&self) -> usize;
  fn eval(&self, p: &ElementPoint) -> na::DVector<f64>;
}

pub struct VectorFunctionCoefficient {
  vdim: usize,
  function: Box<dyn Fn(&na::DVector<f64>) -> na::DVector<f64>>,
  scalar: Option<Box<dyn Coefficient>>,
}
impl VectorFunctionCoefficient {
  pub fn new<F>(vdim: usize, function: F) -> Self
  where
    F: Fn(&na::DVector<f64>) -> na::DVector<f64> + 'static,
  {
    Self {
      vdim,
      function: Box::new(function),
      scalar: None,
    }
  }
  pub fn with_scalar<C: Coefficient + 'static>(mut self, scalar: C) -> Self {
    self.scalar = Some(Box::new(scalar));
    self
  }
}
impl VectorCoefficient for VectorFunctionCoefficient {
  fn vdim(&self) -> usize {
    self.vdim
  }
  fn eval(&self, p: &ElementPoint) -> na::DVector<f64> {
    let mut v = (self.function)(&p.phys);
    assert!(v.len() == self.vdim, "vector coefficient of wrong dimension");
    if let Some(q) = &self.scalar {
      v *= q.eval(p);
    }
    v
  }
}

/// One independent scalar coefficient per component; absent components are
/// zero.
pub struct VectorArrayCoefficient {
  components: Vec<Option<Box<dyn Coefficient>>>,
}
impl VectorArrayCoefficient {
  pub fn new(vdim: usize) -> Self {
    Self {
      components: (0..vdim).map(|_| None).collect(),
    }
  }
  pub fn set<C: Coefficient + 'static>(&mut self, i: usize, coeff: C) {
    self.components[i] = Some(Box::new(coeff));
  }
}
impl VectorCoefficient for VectorArrayCoefficient {
  fn vdim(&self) -> usize {
    self.components.len()
  }
  fn eval(&self, p: &ElementPoint) -> na::DVector<f64> {
    na::DVector::from_iterator(
      self.components.len(),
      self.components.iter().map(|c| c.as_ref().map_or(0.0, |c| c.eval(p))),
    )
  }
}

pub struct VectorRestrictedCoefficient<V> {
  coeff: V,
  active_attr: Vec<bool>,
}
impl<V: VectorCoefficient> VectorRestrictedCoefficient<V> {
  pub fn new(coeff: V, active_attr: Vec<bool>) -> Self {
    Self { coeff, active_attr }
  }
}
impl<V: VectorCoefficient> VectorCoefficient for VectorRestrictedCoefficient<V> {
  fn vdim(&self) -> usize {
    self.coeff.vdim()
  }
  fn eval(&self, p: &ElementPoint) -> na::DVector<f64> {
    if self.active_attr.get(p.attribute - 1).copied().unwrap_or(false) {
      self.coeff.eval(p)
    } else {
      na::DVector::zeros(self.coeff.vdim())
    }
  }
}

/// A direction times a scalar delta.
pub struct VectorDeltaCoefficient {
  pub delta: DeltaCoefficient,
  dir: na::DVector<f64>,
}
impl VectorDeltaCoefficient {
  pub fn new(dir: na::DVector<f64>, delta: DeltaCoefficient) -> Self {
    Self { delta, dir }
  }
  pub fn set_direction(&mut self, dir: na::DVector<f64>) {
    self.dir = dir;
  }
  pub fn eval_delta(&self, p: &ElementPoint) -> na::DVector<f64> {
    &self.dir * self.delta.eval_delta(p)
  }
}

pub trait MatrixCoefficient {
  fn height(&self) -> usize;
  fn width(&self) -> usize;
  fn eval(&self, p: &ElementPoint) -> na::DMatrix<f64>;
}

pub struct MatrixFunctionCoefficient {
  height: usize,
  width: usize,
  function: Option<Box<dyn Fn(&na::DVector<f64>) -> na::DMatrix<f64>>>,
  constant: Option<na::DMatrix<f64>>,
  scalar: Option<Box<dyn Coefficient>>,
}
impl MatrixFunctionCoefficient {
  pub fn new<F>(height: usize, width: usize, function: F) -> Self
  where
    F: Fn(&na::DVector<f64>) -> na::DMatrix<f64> + 'static,
  {
    Self {
      height,
      width,
      function: Some(Box::new(function)),
      constant: None,
      scalar: None,
    }
  }
  pub fn constant(mat: na::DMatrix<f64>) -> Self {
    Self {
      height: mat.nrows(),
      width: mat.ncols(),
      function: None,
      constant: Some(mat),
      scalar: None,
    }
  }
  pub fn with_scalar<C: Coefficient + 'static>(mut self, scalar: C) -> Self {
    self.scalar = Some(Box::new(scalar));
    self
  }
}
impl MatrixCoefficient for MatrixFunctionCoefficient {
  fn height(&self) -> usize {
    self.height
  }
  fn width(&self) -> usize {
    self.width
  }
  fn eval(&self, p: &ElementPoint) -> na::DMatrix<f64> {
    let mut k = match (&self.function, &self.constant) {
      (Some(f), _) => f(&p.phys),
      (None, Some(m)) => m.clone(),
      _ => unreachable!(),
    };
    assert!(k.nrows() == self.height && k.ncols() == self.width);
    if let Some(q) = &self.scalar {
      k *= q.eval(p);
    }
    k
  }
}

pub struct MatrixArrayCoefficient {
  height: usize,
  width: usize,
  entries: Vec<Option<Box<dyn Coefficient>>>,
}
impl MatrixArrayCoefficient {
  pub fn new(height: usize, width: usize) -> Self {
    Self {
      height,
      width,
      entries: (0..height * width).map(|_| None).collect(),
    }
  }
  pub fn set<C: Coefficient + 'static>(&mut self, i: usize, j: usize, coeff: C) {
    self.entries[i * self.width + j] = Some(Box::new(coeff));
  }
}
impl MatrixCoefficient for MatrixArrayCoefficient {
  fn height(&self) -> usize {
    self.height
  }
  fn width(&self) -> usize {
    self.width
  }
  fn eval(&self, p: &ElementPoint) -> na::DMatrix<f64> {
    na::DMatrix::from_fn(self.height, self.width, |i, j| {
      self.entries[i * self.width + j].as_ref().map_or(0.0, |c| c.eval(p))
    })
  }
}

pub struct MatrixRestrictedCoefficient<M> {
  coeff: M,
  active_attr: Vec<bool>,
}
impl<M: MatrixCoefficient> MatrixRestrictedCoefficient<M> {
  pub fn new(coeff: M, active_attr: Vec<bool>) -> Self {
    Self { coeff, active_attr }
  }
}
impl<M: MatrixCoefficient> MatrixCoefficient for MatrixRestrictedCoefficient<M> {
  fn height(&self) -> usize {
    self.coeff.height()
  }
  fn width(&self) -> usize {
    self.coeff.width()
  }
  fn eval(&self, p: &ElementPoint) -> na::DMatrix<f64> {
    if self.active_attr.get(p.attribute - 1).copied().unwrap_or(false) {
      self.coeff.eval(p)
    } else {
      na::DMatrix::zeros(self.coeff.height(), self.coeff.width())
    }
  }
}

pub fn element_point(mesh: &SimplicialMesh, cell: CellIdx, bary: na::DVectorView<f64>) -> ElementPoint {
  let geo = mesh.cell_geometry(cell);
  ElementPoint {
    cell,
    attribute: geo.attribute(),
    phys: geo.bary_to_phys(bary),
    bary: bary.clone_owned(),
  }
}

fn lp_norm_loop<F>(p: f64, mesh: &SimplicialMesh, rule: &QuadRule, eval_abs: F) -> f64
where
  F: Fn(&ElementPoint, &mut dyn FnMut(f64)),
{
  let mut norm = 0.0f64;
  for icell in 0..mesh.ncells() {
    let geo = mesh.cell_geometry(icell);
    for q in 0..rule.npoints() {
      let ep = element_point(mesh, icell, rule.point(q));
      let w = rule.weight(q) * geo.vol();
      eval_abs(&ep, &mut |val| {
        if p < f64::INFINITY {
          norm += w * val.powf(p);
        } else if norm < val {
          norm = val;
        }
      });
    }
  }
  norm
}

/// Takes the p-th root, preserving the sign of the accumulated sum: negative
/// quadrature weights may drive the sum negative.
fn signed_root(norm: f64, p: f64) -> f64 {
  if p < f64::INFINITY {
    if norm < 0.0 {
      -(-norm).powf(1.0 / p)
    } else {
      norm.powf(1.0 / p)
    }
  } else {
    norm
  }
}

/// The Lp norm of a scalar coefficient over the mesh; `p = f64::INFINITY`
/// gives the maximum absolute value over all quadrature points.
pub fn compute_lp_norm(
  p: f64,
  coeff: &dyn Coefficient,
  mesh: &SimplicialMesh,
  rule: &QuadRule,
) -> f64 {
  let norm = lp_norm_loop(p, mesh, rule, |ep, accumulate| accumulate(coeff.eval(ep).abs()));
  signed_root(norm, p)
}

/// The componentwise Lp norm of a vector coefficient.
pub fn compute_vector_lp_norm(
  p: f64,
  coeff: &dyn VectorCoefficient,
  mesh: &SimplicialMesh,
  rule: &QuadRule,
) -> f64 {
  let norm = lp_norm_loop(p, mesh, rule, |ep, accumulate| {
    for &v in coeff.eval(ep).iter() {
      accumulate(v.abs());
    }
  });
  signed_root(norm, p)
}

/// Lp norm over all ranks of a distributed mesh: the finite-p sums reduce
/// with a sum, the sup-norm with a max — the only collective points.
pub fn compute_global_lp_norm(
  p: f64,
  coeff: &dyn Coefficient,
  mesh: &SimplicialMesh,
  rule: &QuadRule,
  comm: &dyn crate::par::Communicator,
) -> f64 {
  let loc = lp_norm_loop(p, mesh, rule, |ep, accumulate| accumulate(coeff.eval(ep).abs()));
  let glob = if p < f64::INFINITY {
    comm.allreduce_sum(loc)
  } else {
    comm.allreduce_max(loc)
  };
  signed_root(glob, p)
}

pub fn compute_global_vector_lp_norm(
  p: f64,
  coeff: &dyn VectorCoefficient,
  mesh: &SimplicialMesh,
  rule: &QuadRule,
  comm: &dyn crate::par::Communicator,
) -> f64 {
  let loc = lp_norm_loop(p, mesh, rule, |ep, accumulate| {
    for &v in coeff.eval(ep).iter() {
      accumulate(v.abs());
    }
  });
  let glob = if p < f64::INFINITY {
    comm.allreduce_sum(loc)
  } else {
    comm.allreduce_max(loc)
  };
  signed_root(glob, p)
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::{mesh::SimplicialMesh, quadrature::QuadRule};

  #[test]
  fn lp_norm_of_identity_on_interval() {
    // two-element mesh of [0, 1], f(x) = x, hand-checked:
    // ‖f‖_L2 = (∫₀¹ x²)^(1/2) = 1/√3, ‖f‖_∞ over Gauss points < 1.
    let mesh = SimplicialMesh::interval(0.0, 1.0, 2);
    let f = |x: &na::DVector<f64>| x[0];
    let rule = QuadRule::for_simplex(1, 3);

    let l2 = compute_lp_norm(2.0, &f, &mesh, rule);
    assert!((l2 - (1.0f64 / 3.0).sqrt()).abs() <= 1e-12);

    let linf = compute_lp_norm(f64::INFINITY, &f, &mesh, rule);
    let top_gauss = 0.75 + 0.25 * (3.0f64 / 5.0).sqrt();
    assert!((linf - top_gauss).abs() <= 1e-12);
  }

  #[test]
  fn negative_weights_keep_sign() {
    let mesh = SimplicialMesh::interval(0.0, 1.0, 1);
    let rule = QuadRule::new(na::DMatrix::from_column_slice(2, 1, &[0.5, 0.5]), na::dvector![-1.0]);
    let one = ConstantCoefficient(1.0);
    let norm = compute_lp_norm(2.0, &one, &mesh, &rule);
    assert!((norm + 1.0).abs() <= 1e-12);
  }

  #[test]
  fn restricted_and_pwconst() {
    let mesh = SimplicialMesh::interval(0.0, 1.0, 2);
    let ep = element_point(&mesh, 0, na::dvector![0.5, 0.5].as_view());

    let pw = PwConstCoefficient::new(vec![7.0]);
    assert_eq!(pw.eval(&ep), 7.0);

    let active = RestrictedCoefficient::new(ConstantCoefficient(3.0), vec![true]);
    assert_eq!(active.eval(&ep), 3.0);
    let inactive = RestrictedCoefficient::new(ConstantCoefficient(3.0), vec![false]);
    assert_eq!(inactive.eval(&ep), 0.0);
  }

  #[test]
  #[should_panic]
  fn delta_center_dimension_checked() {
    DeltaCoefficient::new(&[0.0; 4], 1.0);
  }
}
