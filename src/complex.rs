//! Complex-valued fields, forms and operators, composed from pairs of real
//! objects plus a sign [`Convention`].
//!
//! The composite types share one storage buffer between the complex whole
//! and its real/imaginary halves; the system-level algorithm lives in
//! [`sesquilinear::SesquilinearForm::form_linear_system`], which reduces a
//! complex linear system by invoking the real elimination machinery four
//! times and recombining the results with the convention's cross-signs.

pub mod gridfunc;
pub mod linearform;
pub mod operator;
pub mod par;
pub mod sesquilinear;
pub mod vector;

pub use gridfunc::ComplexGridFunction;
pub use linearform::ComplexLinearForm;
pub use operator::{ComplexOperator, ComplexSparseMatrix, Convention};
pub use sesquilinear::SesquilinearForm;
pub use vector::ComplexVector;
