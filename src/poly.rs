//! Sparse multivariate polynomials over the integers.
//!
//! A [MultivariatePolynomial](polynomial::MultivariatePolynomial) stores its terms sorted from
//! largest to smallest monomial under the [MonomialOrder](order::MonomialOrder) of its
//! [Context](context::Context). Exponent vectors are packed into fixed-width fields, see
//! [packing].
pub mod coefficients;
pub mod context;
pub mod division;
pub mod mul;
pub mod order;
pub mod packing;
pub mod polynomial;
pub mod resultant;
pub mod univariate;

use smallvec::SmallVec;

/// The number of exponents that are stored inline before spilling to the heap.
pub const INLINED_EXPONENTS: usize = 6;

/// The exponent type of a single variable.
pub type Exponent = u32;

/// An unpacked exponent vector.
pub type Exponents = SmallVec<[Exponent; INLINED_EXPONENTS]>;
