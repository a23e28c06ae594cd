//! Resultants and discriminants of sparse polynomials.
use tracing::{debug, instrument};

use super::polynomial::MultivariatePolynomial;
use crate::domains::Ring;
use crate::error::{PolyError, Result};

/// Above this coefficient size the dense fast path switches to the modular algorithm.
const MODULAR_COEFF_BITS: u32 = 64;

impl MultivariatePolynomial {
    /// Compute the resultant of `self` and `other` with respect to `var`. The result
    /// is a polynomial in the same context that does not depend on `var`.
    #[instrument(level = "debug", skip_all, fields(var = var, nterms = self.nterms(), nterms_other = other.nterms()))]
    pub fn resultant(&self, other: &Self, var: usize) -> Result<Self> {
        self.ctx.check_variable(var)?;
        self.check_same_context(other);

        if self.nvars() == 1 {
            return self.resultant_dense(other, var);
        }

        self.resultant_general(other, var)
    }

    /// The resultant of two polynomials in a single variable, computed on their
    /// dense images.
    fn resultant_dense(&self, other: &Self, var: usize) -> Result<Self> {
        let a = self.to_univariate_dense(var)?;
        let b = other.to_univariate_dense(var)?;

        if a.poly.is_zero() || b.poly.is_zero() {
            return Ok(self.zero());
        }

        // both vanish at 0
        if a.shift > 0 && b.shift > 0 {
            return Ok(self.zero());
        }

        let mut res = if a.poly.max_coeff_bits().max(b.poly.max_coeff_bits()) > MODULAR_COEFF_BITS
        {
            debug!("Using the modular resultant");
            a.poly.resultant_modular(&b.poly)?
        } else {
            debug!("Using the subresultant sequence");
            a.poly.resultant(&b.poly)
        };

        // res(x^s f, g) = res(x, g)^s res(f, g) = g(0)^s res(f, g)
        let ring = a.poly.ring;
        if a.shift > 0 {
            res *= ring.pow(&b.poly.coefficients()[0], a.shift as u64);
        }
        if b.shift > 0 {
            // res(f, x^t g) = (-1)^(t deg f) f(0)^t res(f, g)
            res *= ring.pow(&a.poly.coefficients()[0], b.shift as u64);
            if (b.shift as u64 * (a.poly.degree() as u64 + a.shift as u64)) % 2 == 1 {
                res = -res;
            }
        }

        Ok(self.constant(res))
    }

    /// Compute the resultant with the subresultant sequence over the ring of
    /// polynomials in the remaining variables.
    pub fn resultant_general(&self, other: &Self, var: usize) -> Result<Self> {
        self.ctx.check_variable(var)?;
        self.check_same_context(other);

        let a = self.to_univariate(var)?;
        let b = other.to_univariate(var)?;

        debug!(
            "General resultant of degrees {} and {}",
            a.degree(),
            b.degree()
        );

        Ok(a.resultant(&b))
    }

    /// Compute the discriminant of the polynomial with respect to `var`,
    /// `(-1)^(d (d - 1) / 2) res(f, f') / lc(f)`, where `d` is the degree in `var`.
    #[instrument(level = "debug", skip_all, fields(var = var, nterms = self.nterms()))]
    pub fn discriminant(&self, var: usize) -> Result<Self> {
        let d = self.degree(var)?;
        if d < 1 {
            return Err(PolyError::invalid(format!(
                "the discriminant needs a degree of at least 1 in {}, got {}",
                self.ctx.variable_name(var),
                d
            )));
        }

        if d == 1 {
            return Ok(self.one());
        }

        let df = self.derivative(var)?;
        let r = self.resultant(&df, var)?;
        let lc = self.lcoeff_var(var)?;

        let Some(disc) = r.divides(&lc) else {
            panic!(
                "No clean division of the resultant {:?} by the leading coefficient {:?}",
                r, lc
            )
        };

        let d = d as u64;
        if (d * (d - 1) / 2) % 2 == 1 {
            Ok(-disc)
        } else {
            Ok(disc)
        }
    }
}
