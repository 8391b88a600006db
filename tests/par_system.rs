//! Tests of the distributed-variant complex pipeline against its serial
//! mirror, including the essential-row fixups and the reduced (true-dof)
//! path through a constrained space.

extern crate nalgebra as na;
extern crate nalgebra_sparse as nas;

use cfem::{
  coefficient::ConstantCoefficient,
  complex::{
    par::{
      wrap_complex_operator, ComplexParOperator, ParComplexGridFunction, ParComplexLinearForm,
      ParSesquilinearForm,
    },
    ComplexGridFunction, ComplexLinearForm, ComplexVector, Convention, SesquilinearForm,
  },
  fe::{DiffusionIntegrator, DomainLFIntegrator, MassIntegrator},
  linalg::{csc_mul_vec, csc_tr_mul_vec, FaerLu},
  mesh::SimplicialMesh,
  par::{OperatorHandle, ParFeSpace, SelfComm},
  space::FeSpace,
};

use std::rc::Rc;

fn par_space(space: &Rc<FeSpace>) -> Rc<ParFeSpace> {
  Rc::new(ParFeSpace::new(space, Rc::new(SelfComm)))
}

fn add_damped_helmholtz(a: &mut ParSesquilinearForm, k2: f64, omega: f64) {
  a.add_domain_integrator(
    Some(Box::new(DiffusionIntegrator::new(ConstantCoefficient(1.0)))),
    None,
  );
  a.add_domain_integrator(
    Some(Box::new(MassIntegrator::new(ConstantCoefficient(-k2)))),
    Some(Box::new(MassIntegrator::new(ConstantCoefficient(omega)))),
  );
}

#[test]
fn par_round_trip_matches_serial_on_conforming_space() {
  let mesh = Rc::new(SimplicialMesh::interval(0.0, 1.0, 8));
  let space = Rc::new(FeSpace::new(Rc::clone(&mesh), 1));
  let pfes = par_space(&space);
  let marker = vec![true, true];

  for conv in [Convention::Hermitian, Convention::BlockSymmetric] {
    // serial reference
    let mut a = SesquilinearForm::new(&space, conv);
    a.add_domain_integrator(
      Some(Box::new(DiffusionIntegrator::new(ConstantCoefficient(1.0)))),
      None,
    );
    a.add_domain_integrator(
      Some(Box::new(MassIntegrator::new(ConstantCoefficient(-1.5)))),
      Some(Box::new(MassIntegrator::new(ConstantCoefficient(0.8)))),
    );
    a.assemble(true);
    let mut b = ComplexLinearForm::new(&space, conv);
    b.add_domain_integrator(
      Some(Box::new(DomainLFIntegrator::new(ConstantCoefficient(1.0)))),
      Some(Box::new(DomainLFIntegrator::new(ConstantCoefficient(0.5)))),
    );
    b.assemble();
    let mut u = ComplexGridFunction::new(&space);
    u.project_bdr_coefficient(&ConstantCoefficient(2.0), &ConstantCoefficient(-1.0), &marker);
    let ess = space.essential_dofs(&marker);
    let (system, _x, rhs) = a.form_linear_system(&ess, u.vec(), b.vec(), true);
    let sol = ComplexVector::from_vector(FaerLu::new(system.system_matrix()).solve(rhs.as_vector()));
    a.recover_fem_solution(&sol, b.vec(), u.vec_mut());

    // distributed variant
    let mut pa = ParSesquilinearForm::new(&pfes, conv);
    add_damped_helmholtz(&mut pa, 1.5, 0.8);
    pa.assemble(true);
    let mut pb = ParComplexLinearForm::new(&pfes, conv);
    pb.add_domain_integrator(
      Some(Box::new(DomainLFIntegrator::new(ConstantCoefficient(1.0)))),
      Some(Box::new(DomainLFIntegrator::new(ConstantCoefficient(0.5)))),
    );
    pb.assemble();
    let mut pu = ParComplexGridFunction::new(&pfes);
    pu.project_bdr_coefficient(&ConstantCoefficient(2.0), &ConstantCoefficient(-1.0), &marker);
    let ess_tdofs = pfes.essential_true_dofs(&marker);
    let (psystem, _px, prhs) = pa.form_linear_system(&ess_tdofs, pu.vec(), pb.vec(), true);
    let ComplexParOperator::Matrix(pmat) = psystem else {
      panic!("parallel matrices must wrap as a complex parallel matrix");
    };
    let psol =
      ComplexVector::from_vector(FaerLu::new(pmat.system_matrix()).solve(prhs.as_vector()));
    let mut precovered = ComplexVector::new(pfes.vsize());
    pa.recover_fem_solution(&psol, pb.vec(), &mut precovered);

    assert!((u.real().clone_owned() - precovered.real().clone_owned()).norm() <= 1e-10);
    assert!((u.imag().clone_owned() - precovered.imag().clone_owned()).norm() <= 1e-10);
  }
}

#[test]
fn essential_rows_lose_imaginary_diagonal_and_carry_values() {
  let mesh = Rc::new(SimplicialMesh::interval(0.0, 1.0, 6));
  let space = Rc::new(FeSpace::new(mesh, 1));
  let pfes = par_space(&space);
  let marker = vec![true, true];
  let ess_tdofs = pfes.essential_true_dofs(&marker);

  let mut pa = ParSesquilinearForm::new(&pfes, Convention::Hermitian);
  add_damped_helmholtz(&mut pa, 1.0, 2.0);
  pa.assemble(true);

  let mut pu = ParComplexGridFunction::new(&pfes);
  pu.project_bdr_coefficient(&ConstantCoefficient(3.0), &ConstantCoefficient(0.5), &marker);
  let b = ComplexVector::new(pfes.vsize());

  let (system, x, rhs) = pa.form_linear_system(&ess_tdofs, pu.vec(), &b, false);
  let ComplexParOperator::Matrix(pmat) = system else {
    panic!("expected the matrix-backed wrapper");
  };

  let imag = na::DMatrix::from(pmat.imag().mat());
  for &j in &ess_tdofs {
    // the complex identity of an essential row lives on the real block only
    assert_eq!(imag[(j, j)], 0.0);
    // and the right-hand side carries the prescribed value directly
    assert_eq!(rhs.real_slice()[j], x.real_slice()[j]);
    assert_eq!(rhs.imag_slice()[j], x.imag_slice()[j]);
    assert_eq!(x.real_slice()[j], 3.0);
    assert_eq!(x.imag_slice()[j], 0.5);
  }
  let real = na::DMatrix::from(pmat.real().mat());
  for &j in &ess_tdofs {
    assert_eq!(real[(j, j)], 1.0);
  }
}

#[test]
fn periodic_space_solves_through_the_prolongation() {
  // -u'' + u = f with periodic ends: tvsize < vsize exercises the reduced
  // path and the prolongation-based recovery
  let mesh = Rc::new(SimplicialMesh::interval(0.0, 1.0, 8));
  let space = Rc::new(FeSpace::new_periodic(Rc::clone(&mesh), 1));
  let pfes = par_space(&space);
  assert!(pfes.true_vsize() < pfes.vsize());

  let mut pa = ParSesquilinearForm::new(&pfes, Convention::Hermitian);
  pa.add_domain_integrator(
    Some(Box::new(DiffusionIntegrator::new(ConstantCoefficient(1.0)))),
    Some(Box::new(MassIntegrator::new(ConstantCoefficient(0.4)))),
  );
  pa.add_domain_integrator(
    Some(Box::new(MassIntegrator::new(ConstantCoefficient(1.0)))),
    None,
  );
  pa.assemble(true);

  let mut pb = ParComplexLinearForm::new(&pfes, Convention::Hermitian);
  pb.add_domain_integrator(
    Some(Box::new(DomainLFIntegrator::new(|x: &na::DVector<f64>| {
      (std::f64::consts::TAU * x[0]).sin()
    }))),
    None,
  );
  pb.assemble();

  let pu = ParComplexGridFunction::new(&pfes);
  let (system, _x, rhs) = pa.form_linear_system(&[], pu.vec(), pb.vec(), false);
  assert_eq!(rhs.part_size(), pfes.true_vsize());

  let ComplexParOperator::Matrix(pmat) = system else {
    panic!("expected the matrix-backed wrapper");
  };
  let sol = ComplexVector::from_vector(FaerLu::new(pmat.system_matrix()).solve(rhs.as_vector()));
  let mut u = ComplexVector::new(pfes.vsize());
  pa.recover_fem_solution(&sol, pb.vec(), &mut u);

  // recovery through the prolongation makes the field periodic
  let n = pfes.vsize() - 1;
  assert_eq!(u.real_slice()[0], u.real_slice()[n]);
  assert_eq!(u.imag_slice()[0], u.imag_slice()[n]);

  // and the reduced residual of the full equations vanishes
  let p = pfes.prolongation_matrix();
  let ar = csc_mul_vec(pmat.real().mat(), sol.real());
  let ai_xi = csc_mul_vec(pmat.imag().mat(), sol.imag());
  let res_r = ar - ai_xi - csc_tr_mul_vec(&p, pb.real());
  assert!(res_r.norm() <= 1e-10);
}

#[test]
fn parallel_assembly_produces_true_dof_objects() {
  let mesh = Rc::new(SimplicialMesh::interval(0.0, 1.0, 4));
  let space = Rc::new(FeSpace::new_periodic(mesh, 1));
  let pfes = par_space(&space);

  let mut pa = ParSesquilinearForm::new(&pfes, Convention::Hermitian);
  add_damped_helmholtz(&mut pa, 1.0, 1.0);
  pa.assemble(true);
  let pmat = pa.parallel_assemble();
  assert_eq!(pmat.part_nrows(), pfes.true_vsize());
  assert_eq!(pmat.real().tdof_offsets(), &[0, 4, 4]);

  let mut pb = ParComplexLinearForm::new(&pfes, Convention::Hermitian);
  pb.add_domain_integrator(
    Some(Box::new(DomainLFIntegrator::new(ConstantCoefficient(1.0)))),
    None,
  );
  pb.assemble();
  // doubled partition offsets for the composite true-dof vector
  assert_eq!(pb.tdof_offsets(), &[0, 8, 8]);
  let tv = pb.parallel_assemble();
  assert_eq!(tv.part_size(), pfes.true_vsize());
  // the identified endpoint dofs sum into their shared true dof
  let full = pb.real().clone_owned();
  assert!((tv.real_slice()[0] - (full[0] + full[4])).abs() <= 1e-14);
}

#[test]
fn distribute_and_parallel_project_round_trip() {
  let mesh = Rc::new(SimplicialMesh::interval(0.0, 1.0, 5));
  let space = Rc::new(FeSpace::new_periodic(mesh, 1));
  let pfes = par_space(&space);

  let mut tv = ComplexVector::new(pfes.true_vsize());
  for i in 0..pfes.true_vsize() {
    tv.set(i, num_complex::Complex64::new(i as f64, -(i as f64)));
  }

  let mut gf = ParComplexGridFunction::new(&pfes);
  gf.distribute(&tv);
  assert_eq!(gf.real()[0], gf.real()[pfes.vsize() - 1]);

  let back = gf.parallel_project();
  assert_eq!(back, tv);
}

#[test]
fn non_matrix_halves_fall_back_to_the_generic_wrapper() {
  let mut coo = nas::CooMatrix::new(3, 3);
  for i in 0..3 {
    coo.push(i, i, 2.0);
  }
  let a = Rc::new(nas::CscMatrix::from(&coo));

  let wrapped = wrap_complex_operator(
    OperatorHandle::Sparse(Rc::clone(&a)),
    OperatorHandle::Sparse(a),
    Convention::Hermitian,
  );
  let ComplexParOperator::Operator(op) = wrapped else {
    panic!("sparse (non-parallel) halves must take the generic fallback");
  };

  let mut x = ComplexVector::new(3);
  x.real_slice_mut().copy_from_slice(&[1.0, 0.0, 0.0]);
  x.imag_slice_mut().copy_from_slice(&[0.0, 1.0, 0.0]);
  let mut y = ComplexVector::new(3);
  op.mult(&x, &mut y);
  // (2 + 2i) * (x_r + i x_i): y_r = 2 x_r - 2 x_i, y_i = 2 x_i + 2 x_r
  assert_eq!(y.real_slice(), &[2.0, -2.0, 0.0]);
  assert_eq!(y.imag_slice(), &[2.0, 2.0, 0.0]);
}
