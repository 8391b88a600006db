//! Complex-valued finite element fields, forms and operators.
//!
//! The core of this crate is the complex layer in [`complex`]: complex grid
//! functions, complex linear forms and sesquilinear forms are composites of
//! *pairs* of real objects together with a sign [`complex::Convention`].
//! Assembling and reducing a complex linear system
//! `(A_r + i A_i)(x_r + i x_i) = b_r + i b_i` is done entirely through the
//! real machinery in [`assemble`], invoked once per real/imaginary
//! input/output combination.
//!
//! Everything else is the real substrate the complex layer is built on:
//! simplicial meshes ([`mesh`]), Lagrange spaces ([`space`]), coefficients
//! ([`coefficient`]), element kernels ([`fe`]) and global forms
//! ([`assemble`]). The distribution layer is consumed through the
//! capability traits in [`par`].

extern crate nalgebra as na;
extern crate nalgebra_sparse as nas;

pub mod assemble;
pub mod coefficient;
pub mod complex;
pub mod fe;
pub mod gridfunc;
pub mod helmholtz;
pub mod hierarchy;
pub mod linalg;
pub mod mesh;
pub mod par;
pub mod quadrature;
pub mod space;
pub mod sparse;

pub type Dim = usize;
pub type DofIdx = usize;
