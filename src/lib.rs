//! Sparse multivariate polynomials over the integers, with resultants and discriminants.
//!
//! Polynomials live in a shared [Context](poly::context::Context) that fixes the variables
//! and the monomial ordering. Their exponent vectors are packed into machine words whose
//! field width grows on demand, products are formed with Johnson's heap algorithm and
//! variables are eliminated with subresultant sequences.
//!
//! For example:
//!
//! ```
//! use sparsepoly::{Context, MonomialOrder, MultivariatePolynomial};
//!
//! let ctx = Context::with_variables(["x", "y"], MonomialOrder::Lex).unwrap();
//! let a = MultivariatePolynomial::parse("x^2*y + 1", &ctx).unwrap();
//! let b = MultivariatePolynomial::parse("x*y - 1", &ctx).unwrap();
//!
//! let r = a.resultant(&b, 0).unwrap();
//! assert_eq!(r.to_string(), "y^2+y");
//! ```

pub mod domains;
pub mod error;
pub mod parser;
pub mod poly;
pub mod printer;

pub use domains::integer::Integer;
pub use error::{PolyError, Result};
pub use poly::context::Context;
pub use poly::order::MonomialOrder;
pub use poly::polynomial::MultivariatePolynomial;
