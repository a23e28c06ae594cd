use std::fmt::{Display, Formatter};

use super::integer::{rem_u64, Integer};
use super::Ring;

/// A finite field element. The representative is always reduced into `[0, p)`.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub struct FiniteFieldElement(pub(crate) u64);

impl FiniteFieldElement {
    #[inline]
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// The prime field `Z/pZ` for a prime `p < 2^64`.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
pub struct Zp64 {
    p: u64,
}

impl Zp64 {
    /// Create a new prime field. The primality of `p` is not checked, only
    /// that it is at least 2.
    pub fn new(p: u64) -> Zp64 {
        assert!(p > 1, "The modulus {} must be at least 2", p);
        Zp64 { p }
    }

    #[inline]
    pub fn to_element(&self, a: u64) -> FiniteFieldElement {
        FiniteFieldElement(a % self.p)
    }

    /// Map an integer to its residue class.
    #[inline]
    pub fn element_from_integer(&self, a: &Integer) -> FiniteFieldElement {
        FiniteFieldElement(rem_u64(a, self.p))
    }

    /// Computes `a^-1 mod p`, or `None` when `a` is zero.
    pub fn try_inv(&self, a: &FiniteFieldElement) -> Option<FiniteFieldElement> {
        if a.0 == 0 {
            return None;
        }

        // extended Euclidean algorithm: a x + b p = gcd(x, p) = 1 or a x = 1 (mod p)
        let mut u1: u64 = 1;
        let mut u3 = a.0;
        let mut v1: u64 = 0;
        let mut v3 = self.p;
        let mut even_iter: bool = true;

        while v3 != 0 {
            let q = u3 / v3;
            let t3 = u3 % v3;
            let t1 = u1 + q * v1;
            u1 = v1;
            v1 = t1;
            u3 = v3;
            v3 = t3;
            even_iter = !even_iter;
        }

        if u3 != 1 {
            return None;
        }

        if even_iter {
            Some(FiniteFieldElement(u1))
        } else {
            Some(FiniteFieldElement(self.p - u1))
        }
    }

    pub fn inv(&self, a: &FiniteFieldElement) -> FiniteFieldElement {
        self.try_inv(a)
            .unwrap_or_else(|| panic!("{} is not invertible mod {}", a.0, self.p))
    }
}

impl Display for Zp64 {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Z_{}", self.p)
    }
}

impl Ring for Zp64 {
    type Element = FiniteFieldElement;

    #[inline]
    fn add(&self, a: &FiniteFieldElement, b: &FiniteFieldElement) -> FiniteFieldElement {
        let (s, overflow) = a.0.overflowing_add(b.0);
        if overflow || s >= self.p {
            FiniteFieldElement(s.wrapping_sub(self.p))
        } else {
            FiniteFieldElement(s)
        }
    }

    #[inline]
    fn sub(&self, a: &FiniteFieldElement, b: &FiniteFieldElement) -> FiniteFieldElement {
        if a.0 >= b.0 {
            FiniteFieldElement(a.0 - b.0)
        } else {
            FiniteFieldElement(a.0.wrapping_sub(b.0).wrapping_add(self.p))
        }
    }

    #[inline]
    fn mul(&self, a: &FiniteFieldElement, b: &FiniteFieldElement) -> FiniteFieldElement {
        FiniteFieldElement(((a.0 as u128 * b.0 as u128) % self.p as u128) as u64)
    }

    #[inline]
    fn neg(&self, a: &FiniteFieldElement) -> FiniteFieldElement {
        if a.0 == 0 {
            *a
        } else {
            FiniteFieldElement(self.p - a.0)
        }
    }

    #[inline]
    fn zero(&self) -> FiniteFieldElement {
        FiniteFieldElement(0)
    }

    #[inline]
    fn one(&self) -> FiniteFieldElement {
        FiniteFieldElement(1)
    }

    fn nth(&self, n: i64) -> FiniteFieldElement {
        let r = n.unsigned_abs() % self.p;
        let e = FiniteFieldElement(r);
        if n < 0 {
            self.neg(&e)
        } else {
            e
        }
    }

    #[inline]
    fn is_zero(&self, a: &FiniteFieldElement) -> bool {
        a.0 == 0
    }

    #[inline]
    fn is_one(&self, a: &FiniteFieldElement) -> bool {
        a.0 == 1
    }

    fn try_div(&self, a: &FiniteFieldElement, b: &FiniteFieldElement) -> Option<FiniteFieldElement> {
        self.try_inv(b).map(|inv| self.mul(a, &inv))
    }
}

/// Do a deterministic Miller test to check if `n` is a prime.
/// Since `n` is a `u64`, a basis of only 7 witnesses has to be tested.
///
/// Based on [Wojciech Izykowski's implementation](https://github.com/wizykowski/miller-rabin).
pub fn is_prime_u64(n: u64) -> bool {
    let w = if n < 341531 {
        [9345883071009581737].as_slice()
    } else if n < 1050535501 {
        [336781006125, 9639812373923155].as_slice()
    } else if n < 350269456337 {
        [
            4230279247111683200,
            14694767155120705706,
            16641139526367750375,
        ]
        .as_slice()
    } else {
        // shortest SPRP basis from Jim Sinclair for testing primality of u64
        [2, 325, 9375, 28178, 450775, 9780504, 1795265022].as_slice()
    };

    if n < 2 {
        return false;
    }

    if n % 2 == 0 {
        return n == 2;
    }

    let mut s = 0;
    let mut d = n - 1;
    while d % 2 == 0 {
        d /= 2;
        s += 1;
    }

    let f = Zp64::new(n);
    let neg_one = FiniteFieldElement(n - 1);

    'test: for a in w {
        let a = f.to_element(*a);

        if a.0 == 0 {
            continue;
        }

        let mut x = f.pow(&a, d);

        if x == f.one() || x == neg_one {
            continue;
        }

        for _ in 0..s {
            x = f.mul(&x, &x);

            if x == f.one() {
                return false;
            }
            if x == neg_one {
                continue 'test;
            }
        }

        return false;
    }

    true
}

/// An iterator over consecutive 64-bit primes.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub struct PrimeIteratorU64 {
    current_number: u64,
}

impl PrimeIteratorU64 {
    /// Create a new prime iterator that is larger than `start`.
    pub fn new(start: u64) -> PrimeIteratorU64 {
        PrimeIteratorU64 {
            current_number: start.max(1),
        }
    }
}

impl Iterator for PrimeIteratorU64 {
    type Item = u64;

    /// Yield the next prime or `None` if `u64::MAX` has been reached.
    fn next(&mut self) -> Option<u64> {
        while self.current_number < u64::MAX {
            self.current_number += 1;

            if is_prime_u64(self.current_number) {
                return Some(self.current_number);
            }
        }

        None
    }
}

#[cfg(test)]
mod test {
    use super::{is_prime_u64, PrimeIteratorU64, Zp64};
    use crate::domains::Ring;

    #[test]
    fn primality() {
        let small: Vec<u64> = PrimeIteratorU64::new(1).take(10).collect();
        assert_eq!(small, vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
        assert!(is_prime_u64(18446744073709551557));
        assert!(!is_prime_u64(18446744073709551559));
        assert!(!is_prime_u64(3215031751));
    }

    #[test]
    fn arithmetic() {
        let f = Zp64::new(18446744073709551557);
        let a = f.nth(-5);
        let b = f.to_element(7);
        assert_eq!(f.add(&a, &b).value(), 2);
        assert_eq!(f.sub(&b, &f.nth(9)), f.nth(-2));
        let inv = f.inv(&b);
        assert!(f.is_one(&f.mul(&inv, &b)));
        assert_eq!(f.try_div(&a, &f.zero()), None);
    }

    #[test]
    #[should_panic(expected = "must be at least 2")]
    fn trivial_modulus() {
        let _ = Zp64::new(1);
    }
}
