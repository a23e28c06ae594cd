use rand::Rng;
use rug::{
    ops::{Pow, RemRounding},
    Complete,
};

pub use rug::Integer;

use super::Ring;

/// The integer ring.
pub type Z = IntegerRing;
/// The integer ring.
pub const Z: IntegerRing = IntegerRing::new();

/// The ring of arbitrary-precision integers.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct IntegerRing;

impl IntegerRing {
    pub const fn new() -> IntegerRing {
        IntegerRing
    }
}

impl Ring for IntegerRing {
    type Element = Integer;

    #[inline]
    fn add(&self, a: &Integer, b: &Integer) -> Integer {
        (a + b).complete()
    }

    #[inline]
    fn sub(&self, a: &Integer, b: &Integer) -> Integer {
        (a - b).complete()
    }

    #[inline]
    fn mul(&self, a: &Integer, b: &Integer) -> Integer {
        (a * b).complete()
    }

    #[inline]
    fn neg(&self, a: &Integer) -> Integer {
        (-a).complete()
    }

    #[inline]
    fn zero(&self) -> Integer {
        Integer::new()
    }

    #[inline]
    fn one(&self) -> Integer {
        Integer::from(1)
    }

    #[inline]
    fn nth(&self, n: i64) -> Integer {
        Integer::from(n)
    }

    #[inline]
    fn is_zero(&self, a: &Integer) -> bool {
        *a == 0
    }

    #[inline]
    fn is_one(&self, a: &Integer) -> bool {
        *a == 1
    }

    fn try_div(&self, a: &Integer, b: &Integer) -> Option<Integer> {
        if *b == 0 || !a.is_divisible(b) {
            return None;
        }

        Some(a.clone().div_exact(b))
    }

    #[inline]
    fn add_assign(&self, a: &mut Integer, b: &Integer) {
        *a += b;
    }

    #[inline]
    fn sub_assign(&self, a: &mut Integer, b: &Integer) {
        *a -= b;
    }

    #[inline]
    fn mul_assign(&self, a: &mut Integer, b: &Integer) {
        *a *= b;
    }

    #[inline]
    fn add_mul_assign(&self, a: &mut Integer, b: &Integer, c: &Integer) {
        *a += (b * c).complete();
    }

    fn pow(&self, b: &Integer, e: u64) -> Integer {
        let e = u32::try_from(e).unwrap_or_else(|_| panic!("Power {} is too large", e));
        b.clone().pow(e)
    }
}

/// Reduce `a` into `[0, p)`.
#[inline]
pub fn rem_u64(a: &Integer, p: u64) -> u64 {
    a.clone().rem_euc(&Integer::from(p)).to_u64_wrapping()
}

/// Compute the representative of `a mod p` in `(-p/2, p/2]`.
pub fn symmetric_mod(a: &Integer, p: &Integer) -> Integer {
    let r = a.clone().rem_euc(p);
    if (r.clone() << 1u32) > *p {
        r - p
    } else {
        r
    }
}

/// Sample a signed integer whose absolute value has at most `bits` bits.
pub fn random_integer(rng: &mut impl Rng, bits: u32) -> Integer {
    if bits == 0 {
        return Integer::new();
    }

    let mut r = Integer::new();
    let words = (bits + 63) / 64;
    for _ in 0..words {
        r <<= 64u32;
        r += rng.gen::<u64>();
    }
    r >>= words * 64 - bits;

    if rng.gen_bool(0.5) {
        -r
    } else {
        r
    }
}

#[cfg(test)]
mod test {
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    use super::{random_integer, rem_u64, symmetric_mod, Integer, Z};
    use crate::domains::Ring;

    #[test]
    fn exact_division() {
        let a = Integer::from(-91);
        assert_eq!(Z.try_div(&a, &Integer::from(7)), Some(Integer::from(-13)));
        assert_eq!(Z.try_div(&a, &Integer::from(5)), None);
        assert_eq!(Z.try_div(&a, &Integer::new()), None);
    }

    #[test]
    fn reductions() {
        assert_eq!(rem_u64(&Integer::from(-1), 7), 6);
        assert_eq!(rem_u64(&Integer::from(15), 7), 1);
        assert_eq!(symmetric_mod(&Integer::from(4), &Integer::from(7)), -3);
        assert_eq!(symmetric_mod(&Integer::from(3), &Integer::from(7)), 3);
        assert_eq!(symmetric_mod(&Integer::from(3), &Integer::from(6)), 3);
    }

    #[test]
    fn random_bit_bound() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(1);
        for bits in [0, 1, 7, 64, 65, 200] {
            for _ in 0..20 {
                let r = random_integer(&mut rng, bits);
                assert!(r.significant_bits() <= bits);
            }
        }
    }

    #[test]
    fn powers() {
        assert_eq!(Z.pow(&Integer::from(-3), 5), -243);
        assert_eq!(Z.pow(&Integer::from(12), 0), 1);
    }
}
