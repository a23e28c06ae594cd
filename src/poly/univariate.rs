//! Dense univariate polynomials over an arbitrary [Ring], and the bridge between
//! sparse single-variable polynomials and their dense images.
use std::ops::Mul;
use std::sync::Arc;

use rug::Complete;
use smallvec::smallvec;
use tracing::debug;

use super::context::Context;
use super::polynomial::MultivariatePolynomial;
use super::{Exponent, Exponents};
use crate::domains::crt::Comb;
use crate::domains::finite_field::{PrimeIteratorU64, Zp64};
use crate::domains::integer::{rem_u64, Integer, IntegerRing};
use crate::domains::Ring;
use crate::error::{PolyError, Result};

/// A dense univariate polynomial. The coefficient of `x^k` is stored at index `k`
/// and the last coefficient is never zero.
#[derive(Clone, PartialEq, Debug)]
pub struct UnivariatePolynomial<R: Ring> {
    pub(crate) coefficients: Vec<R::Element>,
    pub ring: R,
}

impl<R: Ring> UnivariatePolynomial<R> {
    /// Constructs a zero polynomial.
    #[inline]
    pub fn new(ring: R) -> Self {
        Self {
            coefficients: vec![],
            ring,
        }
    }

    /// Construct a polynomial from its coefficients, starting at the constant term.
    pub fn from_coefficients(ring: R, coefficients: Vec<R::Element>) -> Self {
        let mut p = Self { coefficients, ring };
        p.truncate();
        p
    }

    #[inline]
    pub fn zero(&self) -> Self {
        Self::new(self.ring.clone())
    }

    #[inline]
    pub fn constant(&self, coeff: R::Element) -> Self {
        Self::from_coefficients(self.ring.clone(), vec![coeff])
    }

    #[inline]
    pub fn one(&self) -> Self {
        self.constant(self.ring.one())
    }

    #[inline]
    pub fn coefficients(&self) -> &[R::Element] {
        &self.coefficients
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// Returns true if the polynomial is constant, including zero.
    #[inline]
    pub fn is_constant(&self) -> bool {
        self.coefficients.len() <= 1
    }

    /// Get the leading coefficient.
    pub fn lcoeff(&self) -> R::Element {
        self.coefficients
            .last()
            .cloned()
            .unwrap_or_else(|| self.ring.zero())
    }

    /// The degree of the polynomial. The zero polynomial has degree 0.
    pub fn degree(&self) -> usize {
        if self.is_zero() {
            return 0;
        }

        self.coefficients.len() - 1
    }

    fn truncate(&mut self) {
        let d = self
            .coefficients
            .iter()
            .rev()
            .position(|c| !self.ring.is_zero(c))
            .unwrap_or(self.coefficients.len());

        self.coefficients.truncate(self.coefficients.len() - d);
    }

    pub fn mul_coeff(mut self, coeff: &R::Element) -> Self {
        for c in &mut self.coefficients {
            self.ring.mul_assign(c, coeff);
        }
        self.truncate();
        self
    }

    /// Divide every coefficient by `coeff`. Panics when a division is not exact.
    pub fn div_coeff(mut self, coeff: &R::Element) -> Self {
        if self.ring.is_one(coeff) {
            return self;
        }

        for c in &mut self.coefficients {
            *c = self.ring.div_exact(c, coeff);
        }
        self
    }

    /// Compute the pseudo-remainder `lc(b)^(deg(self) - deg(b) + 1) * self mod b`.
    pub fn pseudo_rem(&self, b: &Self) -> Self {
        if b.is_zero() {
            panic!("Cannot divide by 0 polynomial");
        }

        if self.is_zero() || self.degree() < b.degree() {
            return self.clone();
        }

        let db = b.degree();
        let lb = b.lcoeff();
        let mut e = self.degree() - db + 1;
        let mut r = self.clone();

        while !r.is_zero() && r.degree() >= db {
            let dr = r.degree();
            let lr = r.lcoeff();
            let shift = dr - db;

            for c in &mut r.coefficients {
                self.ring.mul_assign(c, &lb);
            }

            for (i, bc) in b.coefficients.iter().enumerate() {
                let t = self.ring.mul(&lr, bc);
                self.ring.sub_assign(&mut r.coefficients[i + shift], &t);
            }

            debug_assert!(self.ring.is_zero(&r.coefficients[dr]));
            r.truncate();
            e -= 1;
        }

        if e == 0 {
            r
        } else {
            let f = self.ring.pow(&lb, e as u64);
            r.mul_coeff(&f)
        }
    }

    /// Compute the resultant with the subresultant pseudo-remainder sequence.
    /// Every division in the sequence is exact, so this works over any integral domain.
    pub fn resultant(&self, other: &Self) -> R::Element {
        let ring = &self.ring;

        if self.is_zero() || other.is_zero() {
            return ring.zero();
        }

        let (mut a, mut b) = (self.clone(), other.clone());
        let mut s = false; // negate the result
        if a.degree() < b.degree() {
            std::mem::swap(&mut a, &mut b);
            if a.degree() % 2 == 1 && b.degree() % 2 == 1 {
                s = true;
            }
        }

        let sign = |x: R::Element, s: bool| if s { ring.neg(&x) } else { x };

        if b.degree() == 0 {
            return sign(ring.pow(&b.lcoeff(), a.degree() as u64), s);
        }

        let mut g = ring.one();
        let mut h = ring.one();
        loop {
            let (da, db) = (a.degree(), b.degree());
            let delta = (da - db) as u64;
            if da % 2 == 1 && db % 2 == 1 {
                s = !s;
            }

            let r = a.pseudo_rem(&b);
            if r.is_zero() {
                return ring.zero();
            }

            a = b;
            let d = ring.mul(&g, &ring.pow(&h, delta));
            b = r.div_coeff(&d);

            g = a.lcoeff();
            h = match delta {
                0 => h,
                1 => g.clone(),
                _ => ring.div_exact(&ring.pow(&g, delta), &ring.pow(&h, delta - 1)),
            };

            if b.degree() == 0 {
                break;
            }
        }

        let da = a.degree() as u64;
        let lb = b.lcoeff();
        let h = if da == 1 {
            lb
        } else {
            ring.div_exact(&ring.pow(&lb, da), &ring.pow(&h, da - 1))
        };

        sign(h, s)
    }
}

impl<'a, 'b, R: Ring> Mul<&'a UnivariatePolynomial<R>> for &'b UnivariatePolynomial<R> {
    type Output = UnivariatePolynomial<R>;

    fn mul(self, other: &'a UnivariatePolynomial<R>) -> Self::Output {
        if self.is_zero() || other.is_zero() {
            return self.zero();
        }

        let mut coefficients = vec![self.ring.zero(); self.degree() + other.degree() + 1];
        for (i, a) in self.coefficients.iter().enumerate() {
            if self.ring.is_zero(a) {
                continue;
            }

            for (j, b) in other.coefficients.iter().enumerate() {
                self.ring.add_mul_assign(&mut coefficients[i + j], a, b);
            }
        }

        UnivariatePolynomial::from_coefficients(self.ring.clone(), coefficients)
    }
}

impl UnivariatePolynomial<IntegerRing> {
    /// Map the coefficients into a prime field.
    pub fn to_finite_field(&self, field: Zp64) -> UnivariatePolynomial<Zp64> {
        let coefficients = self
            .coefficients
            .iter()
            .map(|c| field.element_from_integer(c))
            .collect();
        UnivariatePolynomial::from_coefficients(field, coefficients)
    }

    /// The largest number of bits of any coefficient.
    pub fn max_coeff_bits(&self) -> u32 {
        self.coefficients
            .iter()
            .map(|c| c.significant_bits())
            .max()
            .unwrap_or(0)
    }

    /// The square of the Hadamard bound on the resultant,
    /// `|res(a, b)|^2 <= |a|^(2 deg b) |b|^(2 deg a)`.
    pub fn hadamard_bound_squared(&self, other: &Self) -> Integer {
        let norm = |p: &Self| -> Integer {
            p.coefficients
                .iter()
                .map(|c| c.square_ref().complete())
                .fold(Integer::new(), |acc, c| acc + c)
        };

        let bound = IntegerRing::new().pow(&norm(self), other.degree() as u64);
        bound * IntegerRing::new().pow(&norm(other), self.degree() as u64)
    }

    /// Compute the resultant from images modulo 62-bit primes, combined with the
    /// Chinese remainder theorem.
    pub fn resultant_modular(&self, other: &Self) -> Result<Integer> {
        if self.is_zero() || other.is_zero() {
            return Ok(Integer::new());
        }

        if self.is_constant() || other.is_constant() {
            return Ok(self.resultant(other));
        }

        // the primes must cover the symmetric range [-B, B]
        let target = self.hadamard_bound_squared(other) << 2u32;

        let (la, lb) = (self.lcoeff(), other.lcoeff());
        let mut primes = vec![];
        let mut product = Integer::from(1);
        for p in PrimeIteratorU64::new(1 << 62) {
            if rem_u64(&la, p) == 0 || rem_u64(&lb, p) == 0 {
                continue;
            }

            primes.push(p);
            product *= p;
            if product.square_ref().complete() > target {
                break;
            }
        }

        debug!("Modular resultant with {} primes", primes.len());

        let residues: Vec<u64> = primes
            .iter()
            .map(|p| {
                let field = Zp64::new(*p);
                let a = self.to_finite_field(field);
                let b = other.to_finite_field(field);
                a.resultant(&b).value()
            })
            .collect();

        let comb = Comb::new(&primes)?;
        comb.reconstruct(&residues, true)
    }
}

/// A sparse polynomial that only depends on one variable, stored densely.
#[derive(Clone, PartialEq, Debug)]
pub struct UnivariateImage {
    /// The coefficient of `x^k` is the coefficient of `x^(k + shift)` in the sparse
    /// polynomial.
    pub poly: UnivariatePolynomial<IntegerRing>,
    pub shift: Exponent,
    pub var: usize,
    /// The exponents shared by all terms in the other variables, with a zero at `var`.
    pub offset: Exponents,
}

impl UnivariateImage {
    /// Convert back to the sparse polynomial the image was made from.
    pub fn to_multivariate(&self, ctx: &Arc<Context>) -> Result<MultivariatePolynomial> {
        MultivariatePolynomial::from_dense(ctx, &self.poly, self.shift, self.var, &self.offset)
    }
}

impl MultivariatePolynomial {
    /// Convert a polynomial that depends on `var` only, up to a common monomial
    /// factor in the other variables, to a dense univariate polynomial. The
    /// smallest exponent of `var` is split off as the shift.
    pub fn to_univariate_dense(&self, var: usize) -> Result<UnivariateImage> {
        self.ctx.check_variable(var)?;

        let ring = IntegerRing::new();
        if self.is_zero() {
            return Ok(UnivariateImage {
                poly: UnivariatePolynomial::new(ring),
                shift: 0,
                var,
                offset: smallvec![0; self.nvars()],
            });
        }

        let mut offset = self.exponents(0);
        offset[var] = 0;

        let mut shift = Exponent::MAX;
        let mut max = 0;
        for i in 0..self.nterms() {
            let e = self.exponents(i);
            if e.iter()
                .zip(&offset)
                .enumerate()
                .any(|(v, (a, b))| v != var && a != b)
            {
                return Err(PolyError::invalid(format!(
                    "the polynomial depends on variables other than {}",
                    self.ctx.variable_name(var)
                )));
            }
            shift = shift.min(e[var]);
            max = max.max(e[var]);
        }

        let mut coefficients = vec![Integer::new(); (max - shift) as usize + 1];
        for i in 0..self.nterms() {
            let k = self.layout.exponent(self.packed_exponents(i), var) - shift;
            coefficients[k as usize] = self.coefficients[i].clone();
        }

        Ok(UnivariateImage {
            poly: UnivariatePolynomial::from_coefficients(ring, coefficients),
            shift,
            var,
            offset,
        })
    }

    /// Convert a dense polynomial to a sparse polynomial in `var`, multiplied by
    /// `var^shift`.
    pub fn from_univariate_dense(
        ctx: &Arc<Context>,
        poly: &UnivariatePolynomial<IntegerRing>,
        shift: Exponent,
        var: usize,
    ) -> Result<Self> {
        let offset: Exponents = smallvec![0; ctx.nvars()];
        Self::from_dense(ctx, poly, shift, var, &offset)
    }

    fn from_dense(
        ctx: &Arc<Context>,
        poly: &UnivariatePolynomial<IntegerRing>,
        shift: Exponent,
        var: usize,
        offset: &[Exponent],
    ) -> Result<Self> {
        ctx.check_variable(var)?;
        if offset.len() != ctx.nvars() {
            return Err(PolyError::invalid(format!(
                "expected {} exponents, got {}",
                ctx.nvars(),
                offset.len()
            )));
        }

        if !poly.is_zero() && shift as u64 + poly.degree() as u64 > Exponent::MAX as u64 {
            return Err(PolyError::invalid(format!(
                "exponent {} does not fit into 32 bits",
                shift as u64 + poly.degree() as u64
            )));
        }

        let terms = poly
            .coefficients
            .iter()
            .enumerate()
            .filter(|(_, c)| **c != 0)
            .map(|(k, c)| {
                let mut e = Exponents::from_slice(offset);
                e[var] = shift + k as Exponent;
                (c.clone(), e)
            })
            .collect();

        Ok(Self::from_unsorted(ctx, terms))
    }
}
