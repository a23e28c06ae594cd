use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt::Debug;
use std::ops::{Add, Mul, Neg, Sub};
use std::sync::Arc;

use rand::Rng;
use rug::Complete;
use smallvec::{smallvec, SmallVec};
use tracing::trace;

use super::context::Context;
use super::packing::{bits_for_bounds, bits_for_value, bits_required, ExponentLayout, MIN_BITS};
use super::univariate::UnivariatePolynomial;
use super::{Exponent, Exponents};
use crate::domains::integer::{random_integer, Integer, Z};
use crate::domains::Ring;
use crate::error::{PolyError, Result};

/// The ring of multivariate polynomials with integer coefficients in the
/// variables of a [Context].
#[derive(Clone, PartialEq, Debug)]
pub struct PolynomialRing {
    ctx: Arc<Context>,
}

impl PolynomialRing {
    pub fn new(ctx: Arc<Context>) -> PolynomialRing {
        PolynomialRing { ctx }
    }

    pub fn new_from_poly(poly: &MultivariatePolynomial) -> PolynomialRing {
        PolynomialRing {
            ctx: poly.ctx.clone(),
        }
    }

    pub fn context(&self) -> &Arc<Context> {
        &self.ctx
    }
}

impl Ring for PolynomialRing {
    type Element = MultivariatePolynomial;

    #[inline]
    fn add(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a + b
    }

    #[inline]
    fn sub(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a - b
    }

    #[inline]
    fn mul(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a * b
    }

    #[inline]
    fn neg(&self, a: &Self::Element) -> Self::Element {
        -a.clone()
    }

    fn zero(&self) -> Self::Element {
        MultivariatePolynomial::new(&self.ctx)
    }

    fn one(&self) -> Self::Element {
        self.zero().one()
    }

    fn nth(&self, n: i64) -> Self::Element {
        self.zero().constant(Integer::from(n))
    }

    #[inline]
    fn is_zero(&self, a: &Self::Element) -> bool {
        a.is_zero()
    }

    #[inline]
    fn is_one(&self, a: &Self::Element) -> bool {
        a.is_one()
    }

    fn try_div(&self, a: &Self::Element, b: &Self::Element) -> Option<Self::Element> {
        if b.is_zero() {
            return None;
        }

        a.divides(b)
    }

    fn pow(&self, b: &Self::Element, e: u64) -> Self::Element {
        b.pow(e as usize)
    }
}

/// A sparse multivariate polynomial with integer coefficients.
///
/// The terms are sorted from the largest to the smallest monomial, so that the
/// leading term has index 0. Every exponent vector is packed according to the
/// polynomial's [ExponentLayout]. The field width only ever grows, except through an
/// explicit call to [MultivariatePolynomial::compact].
#[derive(Clone)]
pub struct MultivariatePolynomial {
    pub(crate) coefficients: Vec<Integer>,
    pub(crate) exponents: Vec<u64>,
    pub(crate) layout: ExponentLayout,
    pub(crate) ctx: Arc<Context>,
}

impl MultivariatePolynomial {
    /// Create the zero polynomial in the given context.
    pub fn new(ctx: &Arc<Context>) -> Self {
        Self::with_capacity(ctx, 0)
    }

    pub fn with_capacity(ctx: &Arc<Context>, cap: usize) -> Self {
        let layout = ExponentLayout::new(ctx.nvars(), ctx.order(), MIN_BITS);
        MultivariatePolynomial {
            coefficients: Vec::with_capacity(cap),
            exponents: Vec::with_capacity(cap * layout.words()),
            layout,
            ctx: ctx.clone(),
        }
    }

    /// Constructs a zero polynomial with the same context and field width.
    #[inline]
    pub fn zero(&self) -> Self {
        self.zero_with_capacity(0)
    }

    #[inline]
    pub fn zero_with_capacity(&self, cap: usize) -> Self {
        MultivariatePolynomial {
            coefficients: Vec::with_capacity(cap),
            exponents: Vec::with_capacity(cap * self.layout.words()),
            layout: self.layout,
            ctx: self.ctx.clone(),
        }
    }

    /// Constructs a constant polynomial with the same context as the current one.
    pub fn constant(&self, coeff: Integer) -> Self {
        if coeff == 0 {
            return self.zero();
        }

        let mut res = self.zero_with_capacity(1);
        res.coefficients.push(coeff);
        res.exponents
            .extend(std::iter::repeat(0).take(self.layout.words()));
        res
    }

    #[inline]
    pub fn one(&self) -> Self {
        self.constant(Integer::from(1))
    }

    /// Constructs a polynomial with a single term.
    pub fn monomial(&self, coeff: Integer, exponents: &[Exponent]) -> Result<Self> {
        self.check_exponent_count(exponents)?;

        let mut res = self.zero_with_capacity(1);
        if coeff == 0 {
            return Ok(res);
        }

        res.grow_to_fit(exponents);
        let packed = res.layout.pack(exponents);
        res.push_packed(coeff, &packed);
        Ok(res)
    }

    /// Build a polynomial from terms in arbitrary order. Terms with equal monomials
    /// are summed and zero terms are dropped.
    pub fn from_terms<I, E>(ctx: &Arc<Context>, terms: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Integer, E)>,
        E: AsRef<[Exponent]>,
    {
        let mut collected = vec![];
        for (c, e) in terms {
            let e = e.as_ref();
            if e.len() != ctx.nvars() {
                return Err(PolyError::invalid(format!(
                    "expected {} exponents, got {}",
                    ctx.nvars(),
                    e.len()
                )));
            }
            collected.push((c, Exponents::from_slice(e)));
        }

        Ok(Self::from_unsorted(ctx, collected))
    }

    pub(crate) fn from_unsorted(ctx: &Arc<Context>, mut terms: Vec<(Integer, Exponents)>) -> Self {
        let order = ctx.order();
        terms.sort_by(|a, b| order.cmp(&b.1, &a.1));

        let mut merged: Vec<(Integer, Exponents)> = Vec::with_capacity(terms.len());
        for (c, e) in terms {
            match merged.last_mut() {
                Some(last) if last.1 == e => last.0 += c,
                _ => merged.push((c, e)),
            }
        }
        merged.retain(|t| t.0 != 0);

        let layout = ExponentLayout::for_exponents(
            ctx.nvars(),
            order,
            merged.iter().map(|t| t.1.as_slice()),
        );

        let mut res = MultivariatePolynomial {
            coefficients: Vec::with_capacity(merged.len()),
            exponents: vec![0; merged.len() * layout.words()],
            layout,
            ctx: ctx.clone(),
        };

        for (i, (c, e)) in merged.into_iter().enumerate() {
            let w = layout.words();
            layout.pack_into(&e, &mut res.exponents[i * w..(i + 1) * w]);
            res.coefficients.push(c);
        }

        res
    }

    /// Sample a polynomial with at most `max_terms` terms, exponents in `[0, exp_bound]`
    /// and coefficients of at most `coeff_bits` bits.
    pub fn sample(
        ctx: &Arc<Context>,
        rng: &mut impl Rng,
        max_terms: usize,
        exp_bound: Exponent,
        coeff_bits: u32,
    ) -> Self {
        let terms = (0..max_terms)
            .map(|_| {
                let e: Exponents = (0..ctx.nvars())
                    .map(|_| rng.gen_range(0..=exp_bound))
                    .collect();
                (random_integer(rng, coeff_bits), e)
            })
            .collect();

        Self::from_unsorted(ctx, terms)
    }

    #[inline]
    pub fn context(&self) -> &Arc<Context> {
        &self.ctx
    }

    #[inline]
    pub fn layout(&self) -> &ExponentLayout {
        &self.layout
    }

    /// The current field width of the packed exponents.
    #[inline]
    pub fn bits(&self) -> u32 {
        self.layout.bits()
    }

    #[inline]
    pub fn nterms(&self) -> usize {
        self.coefficients.len()
    }

    #[inline]
    pub fn nvars(&self) -> usize {
        self.ctx.nvars()
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.nterms() == 0
    }

    pub fn is_one(&self) -> bool {
        self.is_constant() && self.nterms() == 1 && self.coefficients[0] == 1
    }

    /// Returns true if the polynomial is constant, including zero.
    pub fn is_constant(&self) -> bool {
        match self.nterms() {
            0 => true,
            1 => self.packed_exponents(0).iter().all(|w| *w == 0),
            _ => false,
        }
    }

    /// Get the constant term of the polynomial.
    pub fn get_constant(&self) -> Integer {
        match self.nterms() {
            0 => Integer::new(),
            n if self.packed_exponents(n - 1).iter().all(|w| *w == 0) => {
                self.coefficients[n - 1].clone()
            }
            _ => Integer::new(),
        }
    }

    #[inline]
    pub fn coefficients(&self) -> &[Integer] {
        &self.coefficients
    }

    /// The packed exponents of the term at `index`.
    #[inline]
    pub fn packed_exponents(&self, index: usize) -> &[u64] {
        let w = self.layout.words();
        &self.exponents[index * w..(index + 1) * w]
    }

    /// The unpacked exponents of the term at `index`.
    #[inline]
    pub fn exponents(&self, index: usize) -> Exponents {
        self.layout.unpack(self.packed_exponents(index))
    }

    /// Iterate over the terms, from largest to smallest.
    pub fn iter(&self) -> impl Iterator<Item = (&Integer, Exponents)> + '_ {
        self.coefficients
            .iter()
            .zip(self.exponents.chunks(self.layout.words()))
            .map(|(c, e)| (c, self.layout.unpack(e)))
    }

    /// The coefficient of the leading term.
    pub fn lcoeff(&self) -> Integer {
        self.coefficients.first().cloned().unwrap_or_default()
    }

    pub(crate) fn check_exponent_count(&self, exponents: &[Exponent]) -> Result<()> {
        if exponents.len() != self.nvars() {
            Err(PolyError::invalid(format!(
                "expected {} exponents, got {}",
                self.nvars(),
                exponents.len()
            )))
        } else {
            Ok(())
        }
    }

    pub(crate) fn check_same_context(&self, other: &Self) {
        assert!(
            Arc::ptr_eq(&self.ctx, &other.ctx) || self.ctx == other.ctx,
            "Polynomials are defined in different contexts"
        );
    }

    /// Check the canonical invariants: the term count matches the storage, no
    /// coefficient is zero, every field fits the width and the terms are strictly
    /// decreasing.
    pub fn check_consistency(&self) {
        assert_eq!(
            self.exponents.len(),
            self.nterms() * self.layout.words(),
            "Inconsistent polynomial (storage does not match term count)"
        );
        assert_eq!(self.layout.nvars(), self.nvars());

        for c in &self.coefficients {
            if *c == 0 {
                panic!("Inconsistent polynomial (0 coefficient): {:?}", self);
            }
        }

        for t in 0..self.nterms() {
            let e = self.exponents(t);
            let repacked = self.layout.pack(&e);
            if repacked.as_slice() != self.packed_exponents(t) {
                panic!("Inconsistent polynomial (corrupt packed field): {:?}", self);
            }
        }

        for t in 1..self.nterms() {
            match self
                .layout
                .cmp(self.packed_exponents(t - 1), self.packed_exponents(t))
            {
                Ordering::Equal => panic!("Inconsistent polynomial (equal monomials): {:?}", self),
                Ordering::Less => panic!(
                    "Inconsistent polynomial (wrong monomial ordering): {:?}",
                    self
                ),
                Ordering::Greater => {}
            }
        }
    }

    /// Append a term that is smaller than all current terms.
    #[inline]
    pub(crate) fn push_packed(&mut self, coefficient: Integer, packed: &[u64]) {
        debug_assert!(coefficient != 0);
        debug_assert!(
            self.is_zero()
                || self
                    .layout
                    .cmp(self.packed_exponents(self.nterms() - 1), packed)
                    .is_gt()
        );
        self.coefficients.push(coefficient);
        self.exponents.extend_from_slice(packed);
    }

    /// Re-pack all terms with fields of `bits` bits. The width never shrinks:
    /// a request for a narrower width is ignored.
    pub fn repack(&mut self, bits: u32) {
        if bits <= self.layout.bits() {
            return;
        }

        let new_layout = self.layout.with_bits(bits);
        trace!(
            "Repacking {} terms from {} to {} bits",
            self.nterms(),
            self.layout.bits(),
            bits
        );

        let w = new_layout.words();
        let mut buffer = vec![0; self.nterms() * w];
        for (old, new) in self
            .exponents
            .chunks(self.layout.words())
            .zip(buffer.chunks_mut(w))
        {
            self.layout.repack_into(old, &new_layout, new);
        }

        self.exponents = buffer;
        self.layout = new_layout;
    }

    /// Grow the field width so that `exponents` can be stored.
    pub(crate) fn grow_to_fit(&mut self, exponents: &[Exponent]) {
        if !self.layout.fits(exponents) {
            let bits = bits_required(self.layout.order(), exponents);
            self.repack(bits);
        }
    }

    /// Re-pack with the narrowest width that holds all terms.
    pub fn compact(&mut self) {
        let bits = bits_for_value(self.max_field());
        if bits < self.layout.bits() {
            let new_layout = self.layout.with_bits(bits);
            let w = new_layout.words();
            let mut buffer = vec![0; self.nterms() * w];
            for (old, new) in self
                .exponents
                .chunks(self.layout.words())
                .zip(buffer.chunks_mut(w))
            {
                self.layout.repack_into(old, &new_layout, new);
            }
            self.exponents = buffer;
            self.layout = new_layout;
        }
    }

    fn max_field(&self) -> u64 {
        if self.layout.order().is_degree() {
            self.max_total_degree()
        } else {
            self.max_exponents().iter().copied().max().unwrap_or(0) as u64
        }
    }

    /// A view of the polynomial with at least `bits` bits per field.
    pub(crate) fn widened(&self, bits: u32) -> Cow<'_, Self> {
        if bits <= self.bits() {
            Cow::Borrowed(self)
        } else {
            let mut p = self.clone();
            p.repack(bits);
            Cow::Owned(p)
        }
    }

    /// The maximal exponent of every variable.
    pub fn max_exponents(&self) -> Exponents {
        let mut max: Exponents = smallvec![0; self.nvars()];
        for e in self.exponents.chunks(self.layout.words()) {
            for (v, m) in max.iter_mut().enumerate() {
                *m = (*m).max(self.layout.exponent(e, v));
            }
        }
        max
    }

    /// The largest total degree of a term, or 0 for the zero polynomial.
    pub fn max_total_degree(&self) -> u64 {
        self.exponents
            .chunks(self.layout.words())
            .map(|e| self.layout.total_degree(e))
            .max()
            .unwrap_or(0)
    }

    /// The maximal exponent of variable `var`, or -1 for the zero polynomial.
    pub fn degree(&self, var: usize) -> Result<i64> {
        self.ctx.check_variable(var)?;
        Ok(self.degree_unchecked(var))
    }

    pub(crate) fn degree_unchecked(&self, var: usize) -> i64 {
        self.exponents
            .chunks(self.layout.words())
            .map(|e| self.layout.exponent(e, var) as i64)
            .max()
            .unwrap_or(-1)
    }

    /// The total degree, or -1 for the zero polynomial.
    pub fn total_degree(&self) -> i64 {
        if self.is_zero() {
            -1
        } else {
            self.max_total_degree() as i64
        }
    }

    /// Multiply every coefficient with `other`.
    pub fn mul_coeff(mut self, other: &Integer) -> Self {
        if *other == 0 {
            return self.zero();
        }

        for c in &mut self.coefficients {
            *c *= other;
        }

        self
    }

    /// Divide every coefficient by `other`, or return `None` when one of the
    /// divisions is not exact.
    pub fn try_div_coeff(&self, other: &Integer) -> Option<Self> {
        let mut res = self.clone();
        for c in &mut res.coefficients {
            *c = Z.try_div(c, other)?;
        }
        Some(res)
    }

    /// Divide every coefficient by `other`. Panics when a division is not exact.
    pub fn div_coeff(self, other: &Integer) -> Self {
        self.try_div_coeff(other)
            .unwrap_or_else(|| panic!("No clean division of {:?} by {}", self, other))
    }

    /// Multiply the polynomial by the monomial with the given exponents.
    pub fn mul_exp(&self, exponents: &[Exponent]) -> Result<Self> {
        self.check_exponent_count(exponents)?;

        let max: Vec<u64> = self
            .max_exponents()
            .iter()
            .zip(exponents)
            .map(|(a, b)| *a as u64 + *b as u64)
            .collect();
        if let Some(m) = max.iter().find(|m| **m > Exponent::MAX as u64) {
            return Err(PolyError::invalid(format!(
                "exponent {} does not fit into 32 bits",
                m
            )));
        }

        let deg = self.max_total_degree() + exponents.iter().map(|e| *e as u64).sum::<u64>();
        let bits = bits_for_bounds(self.layout.order(), &max, deg);

        let mut res = self.widened(bits).into_owned();
        let shift = res.layout.pack(exponents);
        let w = res.layout.words();
        for e in res.exponents.chunks_mut(w) {
            let m: SmallVec<[u64; 2]> = e.iter().copied().collect();
            res.layout.add_into(&m, &shift, e);
        }

        Ok(res)
    }

    /// Compute `self^pow`.
    pub fn pow(&self, mut pow: usize) -> Self {
        if pow == 0 {
            return self.one();
        }

        if self.is_constant() {
            return self.constant(Z.pow(&self.lcoeff(), pow as u64));
        }

        let mut x = self.clone();
        let mut y = self.one();
        while pow != 1 {
            if pow % 2 == 1 {
                y = &y * &x;
                pow -= 1;
            }

            x = &x * &x;
            pow /= 2;
        }

        &x * &y
    }

    /// The formal derivative with respect to `var`.
    pub fn derivative(&self, var: usize) -> Result<Self> {
        self.ctx.check_variable(var)?;

        let mut unit: Exponents = smallvec![0; self.nvars()];
        unit[var] = 1;
        let unit = self.layout.pack(&unit);

        let mut res = self.zero_with_capacity(self.nterms());
        let mut m = unit.clone();
        for (c, e) in self
            .coefficients
            .iter()
            .zip(self.exponents.chunks(self.layout.words()))
        {
            let pow = self.layout.exponent(e, var);
            if pow > 0 {
                self.layout.sub_into(e, &unit, &mut m);
                res.push_packed((c * pow).complete(), &m);
            }
        }

        Ok(res)
    }

    /// The coefficient of `var^d`, where `d` is the degree in `var`, as a polynomial
    /// in the remaining variables.
    pub fn lcoeff_var(&self, var: usize) -> Result<Self> {
        let d = self.degree(var)?;
        if d < 0 {
            return Ok(self.zero());
        }

        Ok(self.coefficient_of_power(var, d as Exponent))
    }

    fn coefficient_of_power(&self, var: usize, pow: Exponent) -> Self {
        let mut shift: Exponents = smallvec![0; self.nvars()];
        shift[var] = pow;
        let shift = self.layout.pack(&shift);

        let mut res = self.zero();
        let mut m = shift.clone();
        for (c, e) in self
            .coefficients
            .iter()
            .zip(self.exponents.chunks(self.layout.words()))
        {
            if self.layout.exponent(e, var) == pow {
                self.layout.sub_into(e, &shift, &mut m);
                res.push_packed(c.clone(), &m);
            }
        }
        res
    }

    /// Split the polynomial into the coefficients of the powers of `var`.
    /// The `k`-th entry is the coefficient of `var^k`. The zero polynomial
    /// yields an empty list.
    pub fn coefficients_in(&self, var: usize) -> Result<Vec<Self>> {
        let d = self.degree(var)?;
        let mut res = vec![self.zero(); (d + 1) as usize];

        let w = self.layout.words();
        let mut buf: Exponents = smallvec![0; self.nvars()];
        let mut m: SmallVec<[u64; 2]> = smallvec![0; w];
        for (c, e) in self.coefficients.iter().zip(self.exponents.chunks(w)) {
            self.layout.unpack_into(e, &mut buf);
            let k = buf[var] as usize;
            buf[var] = 0;
            self.layout.pack_into(&buf, &mut m);
            res[k].push_packed(c.clone(), &m);
        }

        Ok(res)
    }

    /// Convert the polynomial to a univariate polynomial in `var` with polynomial
    /// coefficients in the remaining variables.
    pub fn to_univariate(&self, var: usize) -> Result<UnivariatePolynomial<PolynomialRing>> {
        let coefficients = self.coefficients_in(var)?;
        Ok(UnivariatePolynomial::from_coefficients(
            PolynomialRing::new_from_poly(self),
            coefficients,
        ))
    }

    fn merge(&self, other: &Self, negate: bool) -> Self {
        self.check_same_context(other);

        let bits = self.bits().max(other.bits());
        let a = self.widened(bits);
        let b = other.widened(bits);

        let mut res = a.zero_with_capacity(a.nterms() + b.nterms());
        let (mut i, mut j) = (0, 0);
        while i < a.nterms() && j < b.nterms() {
            match a
                .layout
                .cmp(a.packed_exponents(i), b.packed_exponents(j))
            {
                Ordering::Greater => {
                    res.push_packed(a.coefficients[i].clone(), a.packed_exponents(i));
                    i += 1;
                }
                Ordering::Less => {
                    let c = if negate {
                        (-&b.coefficients[j]).complete()
                    } else {
                        b.coefficients[j].clone()
                    };
                    res.push_packed(c, b.packed_exponents(j));
                    j += 1;
                }
                Ordering::Equal => {
                    let c = if negate {
                        (&a.coefficients[i] - &b.coefficients[j]).complete()
                    } else {
                        (&a.coefficients[i] + &b.coefficients[j]).complete()
                    };
                    if c != 0 {
                        res.push_packed(c, a.packed_exponents(i));
                    }
                    i += 1;
                    j += 1;
                }
            }
        }

        for k in i..a.nterms() {
            res.push_packed(a.coefficients[k].clone(), a.packed_exponents(k));
        }

        for k in j..b.nterms() {
            let c = if negate {
                (-&b.coefficients[k]).complete()
            } else {
                b.coefficients[k].clone()
            };
            res.push_packed(c, b.packed_exponents(k));
        }

        res
    }
}

impl Debug for MultivariatePolynomial {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if self.is_zero() {
            return write!(f, "[]");
        }
        let mut first = true;
        write!(f, "[ ")?;
        for (c, e) in self.iter() {
            if first {
                first = false;
            } else {
                write!(f, ", ")?;
            }
            write!(f, "{{ {}, {:?} }}", c, e.as_slice())?;
        }
        write!(f, " ]")
    }
}

impl PartialEq for MultivariatePolynomial {
    /// Two polynomials are equal when they have the same terms, regardless of
    /// their field width.
    fn eq(&self, other: &Self) -> bool {
        if !Arc::ptr_eq(&self.ctx, &other.ctx) && self.ctx != other.ctx {
            return false;
        }

        if self.nterms() != other.nterms() || self.coefficients != other.coefficients {
            return false;
        }

        if self.bits() == other.bits() {
            return self.exponents == other.exponents;
        }

        (0..self.nterms()).all(|i| self.exponents(i) == other.exponents(i))
    }
}

impl Eq for MultivariatePolynomial {}

impl<'a, 'b> Add<&'a MultivariatePolynomial> for &'b MultivariatePolynomial {
    type Output = MultivariatePolynomial;

    fn add(self, other: &'a MultivariatePolynomial) -> Self::Output {
        self.merge(other, false)
    }
}

impl Add for MultivariatePolynomial {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        if self.is_zero() {
            self.check_same_context(&other);
            return other;
        }
        if other.is_zero() {
            self.check_same_context(&other);
            return self;
        }

        self.merge(&other, false)
    }
}

impl<'a, 'b> Sub<&'a MultivariatePolynomial> for &'b MultivariatePolynomial {
    type Output = MultivariatePolynomial;

    fn sub(self, other: &'a MultivariatePolynomial) -> Self::Output {
        self.merge(other, true)
    }
}

impl Sub for MultivariatePolynomial {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        self.merge(&other, true)
    }
}

impl Neg for MultivariatePolynomial {
    type Output = Self;

    fn neg(mut self) -> Self::Output {
        for c in &mut self.coefficients {
            *c = -std::mem::take(c);
        }
        self
    }
}

impl<'a, 'b> Mul<&'a MultivariatePolynomial> for &'b MultivariatePolynomial {
    type Output = MultivariatePolynomial;

    fn mul(self, other: &'a MultivariatePolynomial) -> Self::Output {
        self.heap_mul(other)
    }
}

impl Mul for MultivariatePolynomial {
    type Output = Self;

    fn mul(self, other: Self) -> Self::Output {
        self.heap_mul(&other)
    }
}

#[cfg(test)]
mod test {
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    use super::MultivariatePolynomial;
    use crate::domains::integer::Integer;
    use crate::error::PolyError;
    use crate::poly::context::Context;
    use crate::poly::order::MonomialOrder;

    fn terms(t: &[(i64, &[u32])]) -> Vec<(Integer, Vec<u32>)> {
        t.iter().map(|(c, e)| (Integer::from(*c), e.to_vec())).collect()
    }

    #[test]
    fn canonical_construction() {
        let ctx = Context::new(2, MonomialOrder::Lex).unwrap();
        let p = MultivariatePolynomial::from_terms(
            &ctx,
            terms(&[(1, &[0, 1]), (3, &[2, 0]), (-1, &[0, 1]), (5, &[0, 0]), (2, &[2, 0])]),
        )
        .unwrap();
        p.check_consistency();

        assert_eq!(p.nterms(), 2);
        assert_eq!(p.coefficients(), &[Integer::from(5), Integer::from(5)]);
        assert_eq!(p.exponents(0).as_slice(), &[2, 0]);
        assert_eq!(p.get_constant(), 5);

        assert!(matches!(
            MultivariatePolynomial::from_terms(&ctx, terms(&[(1, &[1])])),
            Err(PolyError::InvalidArgument(_))
        ));
    }

    #[test]
    fn width_growth() {
        let ctx = Context::new(2, MonomialOrder::DegLex).unwrap();
        let mut p = MultivariatePolynomial::from_terms(&ctx, terms(&[(1, &[3, 1]), (2, &[0, 0])]))
            .unwrap();
        assert_eq!(p.bits(), 8);

        let q = p.monomial(Integer::from(1), &[300, 0]).unwrap();
        assert_eq!(q.bits(), 9);

        let s = &p + &q;
        s.check_consistency();
        assert_eq!(s.bits(), 9);
        assert_eq!(s.exponents(0).as_slice(), &[300, 0]);

        p.repack(40);
        p.check_consistency();
        assert_eq!(p.bits(), 40);
        p.repack(20);
        assert_eq!(p.bits(), 40);

        let r = p.clone();
        p.compact();
        assert_eq!(p.bits(), 8);
        assert_eq!(p, r);
    }

    #[test]
    fn arithmetic() {
        let ctx = Context::new(2, MonomialOrder::DegRevLex).unwrap();
        let a = MultivariatePolynomial::from_terms(&ctx, terms(&[(1, &[1, 0]), (1, &[0, 1])]))
            .unwrap();
        let b = MultivariatePolynomial::from_terms(&ctx, terms(&[(1, &[1, 0]), (-1, &[0, 1])]))
            .unwrap();

        let expected =
            MultivariatePolynomial::from_terms(&ctx, terms(&[(1, &[2, 0]), (-1, &[0, 2])]))
                .unwrap();
        assert_eq!(&a * &b, expected);
        assert!((&a - &a).is_zero());
        assert_eq!(&(&a + &b) - &b, a);
        assert_eq!(-(-a.clone()), a);

        let cube = a.pow(3);
        cube.check_consistency();
        assert_eq!(cube.nterms(), 4);
        assert_eq!(cube.degree(0).unwrap(), 3);
        assert_eq!(cube.total_degree(), 3);
        assert_eq!(a.zero().degree(1).unwrap(), -1);
        assert!(a.degree(2).is_err());
    }

    #[test]
    fn derivatives_and_coefficients() {
        let ctx = Context::new(2, MonomialOrder::Lex).unwrap();
        // 3 x^2 y + 2 x y^3 - y + 7
        let p = MultivariatePolynomial::from_terms(
            &ctx,
            terms(&[(3, &[2, 1]), (2, &[1, 3]), (-1, &[0, 1]), (7, &[0, 0])]),
        )
        .unwrap();

        let dx = p.derivative(0).unwrap();
        dx.check_consistency();
        let expected =
            MultivariatePolynomial::from_terms(&ctx, terms(&[(6, &[1, 1]), (2, &[0, 3])])).unwrap();
        assert_eq!(dx, expected);

        let dy = p.derivative(1).unwrap();
        dy.check_consistency();
        assert_eq!(dy.nterms(), 3);
        assert_eq!(dy.get_constant(), -1);

        let lc = p.lcoeff_var(0).unwrap();
        assert_eq!(
            lc,
            MultivariatePolynomial::from_terms(&ctx, terms(&[(3, &[0, 1])])).unwrap()
        );

        let parts = p.coefficients_in(1).unwrap();
        assert_eq!(parts.len(), 4);
        let mut sum = p.zero();
        for (k, c) in parts.iter().enumerate() {
            c.check_consistency();
            sum = sum + c.mul_exp(&[0, k as u32]).unwrap();
        }
        assert_eq!(sum, p);
    }

    #[test]
    fn scalar_operations() {
        let ctx = Context::new(3, MonomialOrder::Lex).unwrap();
        let mut rng = Xoshiro256StarStar::seed_from_u64(3);
        let p = MultivariatePolynomial::sample(&ctx, &mut rng, 10, 4, 30);
        p.check_consistency();

        let c = Integer::from(-12);
        let q = p.clone().mul_coeff(&c);
        assert_eq!(q.try_div_coeff(&c).unwrap(), p);
        assert!(p.clone().mul_coeff(&Integer::new()).is_zero());

        let shifted = p.mul_exp(&[1, 0, 2]).unwrap();
        shifted.check_consistency();
        assert_eq!(shifted.nterms(), p.nterms());
        assert_eq!(shifted.degree(2).unwrap(), p.degree(2).unwrap() + 2);
    }
}
