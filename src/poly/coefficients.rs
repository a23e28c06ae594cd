//! Reading and writing individual terms.
use std::cmp::Ordering;

use super::packing::PackedMonomial;
use super::polynomial::MultivariatePolynomial;
use super::{Exponent, Exponents};
use crate::domains::integer::Integer;
use crate::error::{PolyError, Result};

impl MultivariatePolynomial {
    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.nterms() {
            Err(PolyError::Index {
                index,
                len: self.nterms(),
            })
        } else {
            Ok(())
        }
    }

    /// The coefficient of the term at `index`.
    pub fn get_coefficient_at(&self, index: usize) -> Result<&Integer> {
        self.check_index(index)?;
        Ok(&self.coefficients[index])
    }

    /// The exponents of the term at `index`.
    pub fn get_monomial_at(&self, index: usize) -> Result<Exponents> {
        self.check_index(index)?;
        Ok(self.exponents(index))
    }

    /// Overwrite the coefficient of the term at `index`. Setting it to zero
    /// removes the term.
    pub fn set_coefficient_at(&mut self, index: usize, value: Integer) -> Result<()> {
        self.check_index(index)?;

        if value == 0 {
            self.remove_term(index);
        } else {
            self.coefficients[index] = value;
        }
        Ok(())
    }

    fn remove_term(&mut self, index: usize) {
        let w = self.layout.words();
        self.coefficients.remove(index);
        self.exponents.drain(index * w..(index + 1) * w);
    }

    /// Find the term with the packed monomial `m`. Returns the index of the term, or
    /// the position where it would have to be inserted.
    fn search(&self, m: &[u64]) -> std::result::Result<usize, usize> {
        let (mut l, mut r) = (0, self.nterms());
        while l < r {
            let mid = l + (r - l) / 2;
            // the terms are decreasing
            match self.layout.cmp(self.packed_exponents(mid), m) {
                Ordering::Equal => return Ok(mid),
                Ordering::Greater => l = mid + 1,
                Ordering::Less => r = mid,
            }
        }
        Err(l)
    }

    /// The coefficient of the monomial with the given exponents, or zero if the
    /// polynomial has no such term.
    pub fn get_coefficient_at_monomial(&self, exponents: &[Exponent]) -> Result<Integer> {
        self.check_exponent_count(exponents)?;

        if !self.layout.fits(exponents) {
            return Ok(Integer::new());
        }

        let m = self.layout.pack(exponents);
        Ok(match self.search(&m) {
            Ok(i) => self.coefficients[i].clone(),
            Err(_) => Integer::new(),
        })
    }

    /// Set the coefficient of the monomial with the given exponents. A zero value
    /// removes the term, a new monomial is inserted at its ordered position and
    /// grows the field width if needed.
    pub fn set_coefficient_at_monomial(
        &mut self,
        exponents: &[Exponent],
        value: Integer,
    ) -> Result<()> {
        self.check_exponent_count(exponents)?;

        if !self.layout.fits(exponents) {
            if value == 0 {
                return Ok(());
            }
            self.grow_to_fit(exponents);
        }

        let m: PackedMonomial = self.layout.pack(exponents);
        match self.search(&m) {
            Ok(i) => {
                if value == 0 {
                    self.remove_term(i);
                } else {
                    self.coefficients[i] = value;
                }
            }
            Err(i) => {
                if value != 0 {
                    let w = self.layout.words();
                    self.coefficients.insert(i, value);
                    self.exponents.splice(i * w..i * w, m.iter().copied());
                }
            }
        }

        Ok(())
    }

    /// Add `coefficient` times the monomial with the given exponents.
    pub fn append_monomial(&mut self, coefficient: Integer, exponents: &[Exponent]) -> Result<()> {
        if coefficient == 0 {
            return self.check_exponent_count(exponents);
        }

        let c = self.get_coefficient_at_monomial(exponents)? + coefficient;
        self.set_coefficient_at_monomial(exponents, c)
    }

    /// Replace the polynomial by the constant `c`. The field width is kept.
    pub fn set_scalar<T: Into<Integer>>(&mut self, c: T) {
        let c = c.into();
        self.coefficients.clear();
        self.exponents.clear();

        if c != 0 {
            self.coefficients.push(c);
            self.exponents
                .extend(std::iter::repeat(0).take(self.layout.words()));
        }
    }
}
