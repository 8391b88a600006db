//! The composite complex vector: one owned buffer of `2N` reals, the first
//! `N` of which are the real part and the last `N` the imaginary part.
//!
//! The halves are exposed as non-owning views created on demand by a single
//! internal split procedure, so the aliasing invariant is structural: views
//! borrow the buffer and can never outlive a resize.

use num_complex::Complex64;

#[derive(Debug, Clone, PartialEq)]
pub struct ComplexVector {
  data: na::DVector<f64>,
}

impl ComplexVector {
  /// A zero vector with parts of length `part_size`.
  pub fn new(part_size: usize) -> Self {
    Self {
      data: na::DVector::zeros(2 * part_size),
    }
  }

  pub fn from_vector(data: na::DVector<f64>) -> Self {
    assert!(data.len() % 2 == 0, "composite complex vectors have even length");
    Self { data }
  }

  pub fn from_parts(real: na::DVectorView<f64>, imag: na::DVectorView<f64>) -> Self {
    assert!(real.len() == imag.len(), "real and imaginary parts of different length");
    let mut vec = Self::new(real.len());
    for (dst, v) in vec.real_slice_mut().iter_mut().zip(real.iter()) {
      *dst = *v;
    }
    for (dst, v) in vec.imag_slice_mut().iter_mut().zip(imag.iter()) {
      *dst = *v;
    }
    vec
  }

  /// Length of one part.
  pub fn part_size(&self) -> usize {
    self.data.len() / 2
  }
  /// Total buffer length, `2 × part_size`.
  pub fn size(&self) -> usize {
    self.data.len()
  }

  // The one place that knows the layout; every view goes through here.
  fn split(&self) -> (&[f64], &[f64]) {
    self.data.as_slice().split_at(self.part_size())
  }
  fn split_mut(&mut self) -> (&mut [f64], &mut [f64]) {
    let n = self.part_size();
    self.data.as_mut_slice().split_at_mut(n)
  }

  pub fn real(&self) -> na::DVectorView<f64> {
    na::DVectorView::from(self.split().0)
  }
  pub fn imag(&self) -> na::DVectorView<f64> {
    na::DVectorView::from(self.split().1)
  }

  pub fn real_slice(&self) -> &[f64] {
    self.split().0
  }
  pub fn imag_slice(&self) -> &[f64] {
    self.split().1
  }
  pub fn real_slice_mut(&mut self) -> &mut [f64] {
    self.split_mut().0
  }
  pub fn imag_slice_mut(&mut self) -> &mut [f64] {
    self.split_mut().1
  }
  /// Both mutable halves at once, for independent in-place assembly.
  pub fn split_slices_mut(&mut self) -> (&mut [f64], &mut [f64]) {
    self.split_mut()
  }

  /// Resizes each part to `part_size`, keeping the raw buffer prefix; a
  /// resize to the current size leaves the values untouched. Callers that
  /// need the halves preserved copy them around the resize.
  pub fn resize(&mut self, part_size: usize) {
    if 2 * part_size != self.data.len() {
      self.data.resize_vertically_mut(2 * part_size, 0.0);
    }
  }

  pub fn fill(&mut self, value: f64) {
    self.data.fill(value);
  }

  pub fn get(&self, i: usize) -> Complex64 {
    let (re, im) = self.split();
    Complex64::new(re[i], im[i])
  }
  pub fn set(&mut self, i: usize, z: Complex64) {
    let (re, im) = self.split_mut();
    re[i] = z.re;
    im[i] = z.im;
  }

  pub fn as_vector(&self) -> &na::DVector<f64> {
    &self.data
  }
  pub fn as_vector_mut(&mut self) -> &mut na::DVector<f64> {
    &mut self.data
  }
  pub fn into_vector(self) -> na::DVector<f64> {
    self.data
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn parts_alias_one_buffer() {
    let n = 5;
    let mut v = ComplexVector::new(n);
    assert_eq!(v.size(), 2 * n);
    assert_eq!(v.real().len(), n);
    assert_eq!(v.imag().len(), n);

    // the parts live exactly n doubles apart in one allocation
    let dist = unsafe { v.imag_slice().as_ptr().offset_from(v.real_slice().as_ptr()) };
    assert_eq!(dist, n as isize);

    v.real_slice_mut()[2] = 1.5;
    v.imag_slice_mut()[2] = -0.5;
    assert_eq!(v.get(2), Complex64::new(1.5, -0.5));
    assert_eq!(v.as_vector()[2], 1.5);
    assert_eq!(v.as_vector()[n + 2], -0.5);
  }

  #[test]
  fn resize_is_prefix_preserving_and_idempotent() {
    let mut v = ComplexVector::new(3);
    for i in 0..6 {
      v.as_vector_mut()[i] = i as f64;
    }
    let before = v.clone();
    v.resize(3);
    assert_eq!(v, before);

    v.resize(4);
    assert_eq!(v.size(), 8);
    assert_eq!(v.as_vector()[5], 5.0);
    assert_eq!(v.as_vector()[7], 0.0);
  }
}
