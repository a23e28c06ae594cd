//! Defines the coefficient rings used by the polynomial algorithms.
//!
//! The core trait is [Ring]. Each ring has an associated element type, that should not be
//! confused with the ring type itself:
//! - The ring of integers [Z](type@integer::Z) has elements of type [Integer](integer::Integer).
//! - The prime fields [Zp64](finite_field::Zp64) have elements of type
//!   [FiniteFieldElement](finite_field::FiniteFieldElement).
//! - The ring of polynomials [PolynomialRing](crate::poly::polynomial::PolynomialRing) has elements
//!   of type [MultivariatePolynomial](crate::poly::polynomial::MultivariatePolynomial).
//!
//! The ring elements do not implement the arithmetic themselves, the ring does. This lets
//! the dense univariate algorithms, such as the subresultant resultant, be written once
//! for integers, prime fields and polynomial coefficients.
pub mod crt;
pub mod finite_field;
pub mod integer;

use std::fmt::Debug;

/// A commutative ring with unit. All rings in this crate are integral domains,
/// which makes [Ring::try_div] well defined.
pub trait Ring: Clone + PartialEq + Debug {
    type Element: Clone + PartialEq + Debug;

    fn add(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;
    fn sub(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;
    fn mul(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;
    fn neg(&self, a: &Self::Element) -> Self::Element;
    fn zero(&self) -> Self::Element;
    fn one(&self) -> Self::Element;
    /// Return the nth element by computing `n * 1`.
    fn nth(&self, n: i64) -> Self::Element;
    fn is_zero(&self, a: &Self::Element) -> bool;
    fn is_one(&self, a: &Self::Element) -> bool;

    /// Return `a / b` if `b` divides `a` exactly.
    fn try_div(&self, a: &Self::Element, b: &Self::Element) -> Option<Self::Element>;

    fn add_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = self.add(a, b);
    }

    fn sub_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = self.sub(a, b);
    }

    fn mul_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = self.mul(a, b);
    }

    fn add_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element) {
        let p = self.mul(b, c);
        self.add_assign(a, &p);
    }

    /// Compute `b^e` by repeated squaring.
    fn pow(&self, b: &Self::Element, mut e: u64) -> Self::Element {
        if e == 0 {
            return self.one();
        }

        let mut x = b.clone();
        let mut y = self.one();
        while e != 1 {
            if e % 2 == 1 {
                y = self.mul(&y, &x);
            }

            x = self.mul(&x, &x);
            e /= 2;
        }

        self.mul(&x, &y)
    }

    /// Divide `a` by `b`, panicking when the division is not exact.
    fn div_exact(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        self.try_div(a, b)
            .unwrap_or_else(|| panic!("No clean division of {:?} by {:?}", a, b))
    }
}
