//! Quadrature rules on reference simplices, in barycentric coordinates.

use crate::Dim;

use once_cell::sync::Lazy;

/// A quadrature rule on the reference d-simplex.
///
/// Points are the columns of a barycentric coordinate matrix and the weights
/// are normalized so that they sum to one; integrals are evaluated as
/// `vol * Σ w f(x_q)`.
#[derive(Debug, Clone)]
pub struct QuadRule {
  points: na::DMatrix<f64>,
  weights: na::DVector<f64>,
}

impl QuadRule {
  pub fn new(points: na::DMatrix<f64>, weights: na::DVector<f64>) -> Self {
    assert!(points.ncols() == weights.len(), "one weight per point");
    assert!(points.nrows() >= 1);
    Self { points, weights }
  }

  pub fn dim(&self) -> Dim {
    self.points.nrows() - 1
  }
  pub fn npoints(&self) -> usize {
    self.points.ncols()
  }
  pub fn point(&self, q: usize) -> na::DVectorView<f64> {
    self.points.column(q)
  }
  pub fn weight(&self, q: usize) -> f64 {
    self.weights[q]
  }

  /// The rule used for a d-simplex integrand of (at least) the given
  /// polynomial order.
  pub fn for_simplex(dim: Dim, order: usize) -> &'static QuadRule {
    match dim {
      0 => &POINT,
      1 => {
        if order <= 1 {
          &SEGMENT_MIDPOINT
        } else if order <= 3 {
          &SEGMENT_GAUSS2
        } else {
          assert!(order <= 5, "no segment rule of order {order}");
          &SEGMENT_GAUSS3
        }
      }
      2 => {
        if order <= 1 {
          &TRIANGLE_CENTROID
        } else if order <= 2 {
          &TRIANGLE_MIDEDGE
        } else {
          assert!(order <= 4, "no triangle rule of order {order}");
          &TRIANGLE_SIX
        }
      }
      _ => panic!("no quadrature rules for dimension {dim}"),
    }
  }

  /// The vertex (trapezoidal) rule on the reference d-simplex.
  pub fn vertices(dim: Dim) -> QuadRule {
    let n = dim + 1;
    QuadRule::new(
      na::DMatrix::identity(n, n),
      na::DVector::from_element(n, (n as f64).recip()),
    )
  }
}

static POINT: Lazy<QuadRule> = Lazy::new(|| {
  QuadRule::new(na::DMatrix::from_element(1, 1, 1.0), na::dvector![1.0])
});

static SEGMENT_MIDPOINT: Lazy<QuadRule> = Lazy::new(|| {
  QuadRule::new(na::DMatrix::from_column_slice(2, 1, &[0.5, 0.5]), na::dvector![1.0])
});

static SEGMENT_GAUSS2: Lazy<QuadRule> = Lazy::new(|| {
  let xi0 = 0.5 * (1.0 - 1.0 / 3.0f64.sqrt());
  let xi1 = 0.5 * (1.0 + 1.0 / 3.0f64.sqrt());
  QuadRule::new(
    na::DMatrix::from_column_slice(2, 2, &[1.0 - xi0, xi0, 1.0 - xi1, xi1]),
    na::dvector![0.5, 0.5],
  )
});

static SEGMENT_GAUSS3: Lazy<QuadRule> = Lazy::new(|| {
  let d = 0.5 * (3.0f64 / 5.0).sqrt();
  let xis = [0.5 - d, 0.5, 0.5 + d];
  let mut points = na::DMatrix::zeros(2, 3);
  for (q, xi) in xis.iter().enumerate() {
    points[(0, q)] = 1.0 - xi;
    points[(1, q)] = *xi;
  }
  QuadRule::new(points, na::dvector![5.0 / 18.0, 8.0 / 18.0, 5.0 / 18.0])
});

static TRIANGLE_CENTROID: Lazy<QuadRule> = Lazy::new(|| {
  let third = 1.0 / 3.0;
  QuadRule::new(
    na::DMatrix::from_column_slice(3, 1, &[third, third, third]),
    na::dvector![1.0],
  )
});

static TRIANGLE_MIDEDGE: Lazy<QuadRule> = Lazy::new(|| {
  #[rustfmt::skip]
  let points = na::DMatrix::from_column_slice(3, 3, &[
    0.5, 0.5, 0.0,
    0.0, 0.5, 0.5,
    0.5, 0.0, 0.5,
  ]);
  let third = 1.0 / 3.0;
  QuadRule::new(points, na::dvector![third, third, third])
});

/// Six-point order-4 triangle rule (Dunavant).
static TRIANGLE_SIX: Lazy<QuadRule> = Lazy::new(|| {
  let a = 0.445948490915965;
  let wa = 0.223381589678011;
  let b = 0.091576213509771;
  let wb = 0.109951743655322;

  let mut points = na::DMatrix::zeros(3, 6);
  let mut weights = na::DVector::zeros(6);
  for (orbit, (c, w)) in [(a, wa), (b, wb)].iter().enumerate() {
    for rot in 0..3 {
      let q = 3 * orbit + rot;
      points[(rot, q)] = 1.0 - 2.0 * c;
      points[((rot + 1) % 3, q)] = *c;
      points[((rot + 2) % 3, q)] = *c;
      weights[q] = *w;
    }
  }
  QuadRule::new(points, weights)
});
