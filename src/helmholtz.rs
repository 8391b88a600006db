//! Damped Helmholtz problems: the application control flow of the complex
//! layer, from integrator pairs to the recovered complex field.

use crate::{
  coefficient::{Coefficient, ConstantCoefficient},
  complex::{ComplexGridFunction, ComplexLinearForm, Convention, SesquilinearForm},
  fe::{DiffusionIntegrator, DomainLFIntegrator, MassIntegrator},
  linalg::FaerLu,
  space::FeSpace,
};

use std::rc::Rc;

/// Solves `−Δu − k²u + iωu = f` with homogeneous Dirichlet boundary
/// conditions: assembles the sesquilinear/linear form pair, reduces the
/// complex system, solves its real-equivalent block form directly and
/// recovers the complex field.
pub fn solve_helmholtz(
  space: &Rc<FeSpace>,
  conv: Convention,
  wavenumber: f64,
  damping: f64,
  source_re: impl Coefficient + 'static,
  source_im: impl Coefficient + 'static,
) -> ComplexGridFunction {
  let mut a = SesquilinearForm::new(space, conv);
  a.add_domain_integrator(
    Some(Box::new(DiffusionIntegrator::new(ConstantCoefficient(1.0)))),
    None,
  );
  a.add_domain_integrator(
    Some(Box::new(MassIntegrator::new(ConstantCoefficient(
      -wavenumber * wavenumber,
    )))),
    Some(Box::new(MassIntegrator::new(ConstantCoefficient(damping)))),
  );
  a.assemble(true);

  let mut b = ComplexLinearForm::new(space, conv);
  b.add_domain_integrator(
    Some(Box::new(DomainLFIntegrator::new(source_re))),
    Some(Box::new(DomainLFIntegrator::new(source_im))),
  );
  b.assemble();

  let mut u = ComplexGridFunction::new(space);
  let nattr = space.mesh().max_boundary_attribute();
  let ess_tdofs = space.essential_true_dofs(&vec![true; nattr]);

  let (system, x, rhs) = a.form_linear_system(&ess_tdofs, u.vec(), b.vec(), false);
  tracing::info!(
    tvsize = x.part_size(),
    wavenumber,
    damping,
    "reduced damped helmholtz system"
  );

  let solver = FaerLu::new(system.system_matrix());
  let solution = crate::complex::ComplexVector::from_vector(solver.solve(rhs.as_vector()));
  a.recover_fem_solution(&solution, b.vec(), u.vec_mut());
  u
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::{
    assemble::{BilinearForm, LinearForm},
    mesh::SimplicialMesh,
  };

  #[test]
  fn zero_frequency_reduces_to_poisson() {
    // with k = ω = 0 and a real source the problem is a real Poisson solve
    let mesh = Rc::new(SimplicialMesh::interval(0.0, 1.0, 16));
    let space = Rc::new(FeSpace::new(Rc::clone(&mesh), 1));
    let u = solve_helmholtz(
      &space,
      Convention::Hermitian,
      0.0,
      0.0,
      ConstantCoefficient(1.0),
      ConstantCoefficient(0.0),
    );

    // independent real solve
    let mut blf = BilinearForm::new(&space);
    blf.add_domain_integrator(Box::new(DiffusionIntegrator::new(ConstantCoefficient(1.0))));
    blf.assemble(true);
    let mut lf = LinearForm::new(&space);
    lf.add_domain_integrator(Box::new(DomainLFIntegrator::new(ConstantCoefficient(1.0))));
    lf.assemble();

    let ess = space.essential_dofs(&[true, true]);
    let x = na::DVector::zeros(space.vsize());
    let (_, rhs) = blf.form_linear_system(&ess, &x, lf.vector(), false);
    let direct = FaerLu::new((*blf.spmat()).clone()).solve(&rhs);

    assert!((u.real().clone_owned() - direct).norm() <= 1e-11);
    assert!(u.imag().norm() <= 1e-12);
  }

  #[test]
  fn damping_produces_an_imaginary_response() {
    let mesh = Rc::new(SimplicialMesh::interval(0.0, 1.0, 16));
    let space = Rc::new(FeSpace::new(mesh, 1));
    for conv in [Convention::Hermitian, Convention::BlockSymmetric] {
      let u = solve_helmholtz(
        &space,
        conv,
        2.0,
        5.0,
        ConstantCoefficient(1.0),
        ConstantCoefficient(0.0),
      );
      assert!(u.imag().norm() > 1e-6);
    }
  }
}
