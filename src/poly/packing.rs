//! Packed exponent vectors.
//!
//! An exponent vector is stored as a fixed number of `u64` words. Every variable
//! gets a field of `bits` bits and degree orderings reserve one extra field for the
//! total degree. Fields are laid out from the most significant one, starting at the
//! high bits of the first word, so that comparing the words lexicographically
//! compares the monomials:
//!
//! | order       | fields                          |
//! |-------------|---------------------------------|
//! | `lex`       | `e0, e1, ..., en-1`             |
//! | `deglex`    | `deg, e0, e1, ..., en-1`        |
//! | `degrevlex` | `deg, !en-1, ..., !e1, !e0`     |
//!
//! For `degrevlex` the complemented fields are realized by XOR-ing a comparison mask
//! before comparing. The stored words are never masked, so that multiplying two
//! monomials is a word-wise addition as long as no field overflows.
use std::cmp::Ordering;

use smallvec::{smallvec, SmallVec};

use super::order::MonomialOrder;
use super::{Exponent, Exponents};

/// The smallest field width a polynomial is packed with.
pub const MIN_BITS: u32 = 8;
/// The widest field. Any `u32` exponent and any total degree of up to `2^32` variables fit.
pub const MAX_BITS: u32 = 64;

/// A single packed monomial.
pub type PackedMonomial = SmallVec<[u64; 2]>;

/// The packing layout of all terms of a polynomial.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExponentLayout {
    bits: u32,
    nvars: usize,
    order: MonomialOrder,
    fields_per_word: usize,
    words: usize,
    mask_first: u64,
    mask_rest: u64,
}

impl ExponentLayout {
    pub fn new(nvars: usize, order: MonomialOrder, bits: u32) -> ExponentLayout {
        assert!(
            (MIN_BITS..=MAX_BITS).contains(&bits),
            "Unsupported field width {}",
            bits
        );

        let fields = nvars + order.is_degree() as usize;
        let fields_per_word = (64 / bits) as usize;
        let words = ((fields + fields_per_word - 1) / fields_per_word).max(1);

        let (mask_first, mask_rest) = match order {
            MonomialOrder::DegRevLex => {
                let top = field_mask(bits) << (64 - bits);
                (!top, u64::MAX)
            }
            _ => (0, 0),
        };

        ExponentLayout {
            bits,
            nvars,
            order,
            fields_per_word,
            words,
            mask_first,
            mask_rest,
        }
    }

    /// The narrowest layout that can hold every exponent vector in `exponents`.
    pub fn for_exponents<'a>(
        nvars: usize,
        order: MonomialOrder,
        exponents: impl IntoIterator<Item = &'a [Exponent]>,
    ) -> ExponentLayout {
        let bits = exponents
            .into_iter()
            .map(|e| bits_required(order, e))
            .max()
            .unwrap_or(MIN_BITS);
        ExponentLayout::new(nvars, order, bits)
    }

    #[inline]
    pub fn bits(&self) -> u32 {
        self.bits
    }

    #[inline]
    pub fn nvars(&self) -> usize {
        self.nvars
    }

    #[inline]
    pub fn order(&self) -> MonomialOrder {
        self.order
    }

    /// The number of words per packed monomial.
    #[inline]
    pub fn words(&self) -> usize {
        self.words
    }

    /// The largest value a field can hold.
    #[inline]
    pub fn max_field(&self) -> u64 {
        field_mask(self.bits)
    }

    /// The same layout with a different field width.
    pub fn with_bits(&self, bits: u32) -> ExponentLayout {
        ExponentLayout::new(self.nvars, self.order, bits)
    }

    #[inline]
    fn position(&self, field: usize) -> (usize, u32) {
        let word = field / self.fields_per_word;
        let slot = (field % self.fields_per_word) as u32;
        (word, 64 - self.bits * (slot + 1))
    }

    #[inline]
    fn var_field(&self, var: usize) -> usize {
        match self.order {
            MonomialOrder::Lex => var,
            MonomialOrder::DegLex => var + 1,
            MonomialOrder::DegRevLex => self.nvars - var,
        }
    }

    #[inline]
    fn read_field(&self, packed: &[u64], field: usize) -> u64 {
        let (word, shift) = self.position(field);
        (packed[word] >> shift) & self.max_field()
    }

    /// Check whether an exponent vector can be packed with this layout.
    pub fn fits(&self, exponents: &[Exponent]) -> bool {
        bits_required(self.order, exponents) <= self.bits
    }

    /// Pack `exponents` into `out`, which must have length [ExponentLayout::words].
    /// Panics when an exponent does not fit into a field.
    pub fn pack_into(&self, exponents: &[Exponent], out: &mut [u64]) {
        debug_assert_eq!(exponents.len(), self.nvars);
        assert!(
            self.fits(exponents),
            "Exponents {:?} do not fit into {}-bit fields",
            exponents,
            self.bits
        );

        out.iter_mut().for_each(|w| *w = 0);

        if self.order.is_degree() {
            let deg: u64 = exponents.iter().map(|e| *e as u64).sum();
            let (word, shift) = self.position(0);
            out[word] |= deg << shift;
        }

        for (var, e) in exponents.iter().enumerate() {
            let (word, shift) = self.position(self.var_field(var));
            out[word] |= (*e as u64) << shift;
        }
    }

    pub fn pack(&self, exponents: &[Exponent]) -> PackedMonomial {
        let mut out: PackedMonomial = smallvec![0; self.words];
        self.pack_into(exponents, &mut out);
        out
    }

    pub fn unpack_into(&self, packed: &[u64], out: &mut [Exponent]) {
        for (var, e) in out.iter_mut().enumerate() {
            *e = self.read_field(packed, self.var_field(var)) as Exponent;
        }
    }

    pub fn unpack(&self, packed: &[u64]) -> Exponents {
        let mut out: Exponents = smallvec![0; self.nvars];
        self.unpack_into(packed, &mut out);
        out
    }

    /// The exponent of variable `var`.
    #[inline]
    pub fn exponent(&self, packed: &[u64], var: usize) -> Exponent {
        self.read_field(packed, self.var_field(var)) as Exponent
    }

    /// The total degree of a packed monomial.
    pub fn total_degree(&self, packed: &[u64]) -> u64 {
        if self.order.is_degree() {
            self.read_field(packed, 0)
        } else {
            (0..self.nvars)
                .map(|v| self.read_field(packed, v) as u64)
                .sum()
        }
    }

    #[inline]
    fn mask(&self, word: usize) -> u64 {
        if word == 0 {
            self.mask_first
        } else {
            self.mask_rest
        }
    }

    /// Compare two packed monomials under the ordering of the layout.
    #[inline]
    pub fn cmp(&self, a: &[u64], b: &[u64]) -> Ordering {
        for (w, (x, y)) in a.iter().zip(b).enumerate() {
            let m = self.mask(w);
            match (x ^ m).cmp(&(y ^ m)) {
                Ordering::Equal => {}
                o => return o,
            }
        }
        Ordering::Equal
    }

    /// Toggle the comparison mask. A masked monomial compares correctly with
    /// plain word-wise comparison, see [PackedMonomial]'s `Ord`.
    #[inline]
    pub fn toggle_mask(&self, packed: &mut [u64]) {
        for (w, x) in packed.iter_mut().enumerate() {
            *x ^= self.mask(w);
        }
    }

    /// Compute `out = a * b`. The caller guarantees that no field overflows.
    #[inline]
    pub fn add_into(&self, a: &[u64], b: &[u64], out: &mut [u64]) {
        for ((o, x), y) in out.iter_mut().zip(a).zip(b) {
            *o = x.wrapping_add(*y);
        }
    }

    /// Check whether `b` divides `a`.
    pub fn divides(&self, a: &[u64], b: &[u64]) -> bool {
        let fields = self.nvars + self.order.is_degree() as usize;
        (0..fields).all(|f| self.read_field(a, f) >= self.read_field(b, f))
    }

    /// Compute `out = a / b`. `b` must divide `a`.
    #[inline]
    pub fn sub_into(&self, a: &[u64], b: &[u64], out: &mut [u64]) {
        for ((o, x), y) in out.iter_mut().zip(a).zip(b) {
            *o = x.wrapping_sub(*y);
        }
    }

    /// Pack the monomial of `packed` into the layout `target`.
    pub fn repack_into(&self, packed: &[u64], target: &ExponentLayout, out: &mut [u64]) {
        let exps = self.unpack(packed);
        target.pack_into(&exps, out);
    }
}

#[inline]
fn field_mask(bits: u32) -> u64 {
    if bits == 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

/// The smallest field width that holds every field of the exponent vector,
/// including the total degree for degree orderings.
pub fn bits_required(order: MonomialOrder, exponents: &[Exponent]) -> u32 {
    let max = if order.is_degree() {
        exponents.iter().map(|e| *e as u64).sum::<u64>()
    } else {
        exponents.iter().copied().max().unwrap_or(0) as u64
    };

    bits_for_value(max)
}

/// The field width for monomials whose exponents are bounded by `max_exponents`
/// and whose total degree is bounded by `max_degree`.
pub fn bits_for_bounds(order: MonomialOrder, max_exponents: &[u64], max_degree: u64) -> u32 {
    let max = max_exponents.iter().copied().max().unwrap_or(0);
    if order.is_degree() {
        bits_for_value(max.max(max_degree))
    } else {
        bits_for_value(max)
    }
}

/// The field width needed to store `max`, rounded up to [MIN_BITS].
#[inline]
pub fn bits_for_value(max: u64) -> u32 {
    (64 - max.leading_zeros()).max(MIN_BITS)
}

#[cfg(test)]
mod test {
    use std::cmp::Ordering;

    use rand::{Rng, SeedableRng};
    use rand_xoshiro::Xoshiro256StarStar;

    use super::{bits_required, ExponentLayout, MAX_BITS, MIN_BITS};
    use crate::poly::order::MonomialOrder;

    #[test]
    fn layout_sizes() {
        let l = ExponentLayout::new(3, MonomialOrder::Lex, 8);
        assert_eq!(l.words(), 1);
        let l = ExponentLayout::new(8, MonomialOrder::DegLex, 8);
        assert_eq!(l.words(), 2);
        let l = ExponentLayout::new(2, MonomialOrder::DegRevLex, 64);
        assert_eq!(l.words(), 3);
        let l = ExponentLayout::new(5, MonomialOrder::Lex, 21);
        assert_eq!(l.words(), 2);
    }

    #[test]
    fn required_bits() {
        assert_eq!(bits_required(MonomialOrder::Lex, &[0, 0]), MIN_BITS);
        assert_eq!(bits_required(MonomialOrder::Lex, &[255, 3]), 8);
        assert_eq!(bits_required(MonomialOrder::Lex, &[256, 3]), 9);
        assert_eq!(bits_required(MonomialOrder::DegLex, &[255, 1]), 9);
        assert_eq!(bits_required(MonomialOrder::Lex, &[u32::MAX]), 32);
        assert_eq!(
            bits_required(MonomialOrder::DegLex, &[u32::MAX, u32::MAX]),
            33
        );
    }

    #[test]
    fn pack_unpack() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(11);

        for order in MonomialOrder::ALL {
            for bits in [MIN_BITS, 13, 32, 40, MAX_BITS] {
                let nvars = rng.gen_range(1..6);
                let layout = ExponentLayout::new(nvars, order, bits);
                let bound = if order.is_degree() {
                    (layout.max_field() / nvars as u64).min(u32::MAX as u64)
                } else {
                    layout.max_field().min(u32::MAX as u64)
                };

                for _ in 0..50 {
                    let e: Vec<u32> = (0..nvars)
                        .map(|_| rng.gen_range(0..=bound) as u32)
                        .collect();
                    let p = layout.pack(&e);
                    assert_eq!(layout.unpack(&p).as_slice(), e.as_slice());
                    assert_eq!(
                        layout.total_degree(&p),
                        e.iter().map(|x| *x as u64).sum::<u64>()
                    );
                }
            }
        }
    }

    #[test]
    fn packed_comparison_matches_ordering() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(12);

        for order in MonomialOrder::ALL {
            for bits in [MIN_BITS, 20] {
                let layout = ExponentLayout::new(4, order, bits);
                for _ in 0..200 {
                    let a: Vec<u32> = (0..4).map(|_| rng.gen_range(0..4)).collect();
                    let b: Vec<u32> = (0..4).map(|_| rng.gen_range(0..4)).collect();
                    let (pa, pb) = (layout.pack(&a), layout.pack(&b));
                    assert_eq!(layout.cmp(&pa, &pb), order.cmp(&a, &b));

                    let (mut ma, mut mb) = (pa.clone(), pb.clone());
                    layout.toggle_mask(&mut ma);
                    layout.toggle_mask(&mut mb);
                    assert_eq!(ma.cmp(&mb), order.cmp(&a, &b));
                    layout.toggle_mask(&mut ma);
                    assert_eq!(ma, pa);
                }
            }
        }
    }

    #[test]
    fn monomial_arithmetic() {
        let layout = ExponentLayout::new(3, MonomialOrder::DegRevLex, 8);
        let a = layout.pack(&[1, 2, 3]);
        let b = layout.pack(&[0, 2, 1]);
        let mut out = layout.pack(&[0, 0, 0]);

        layout.add_into(&a, &b, &mut out);
        assert_eq!(layout.unpack(&out).as_slice(), &[1, 4, 4]);
        assert_eq!(layout.total_degree(&out), 9);

        assert!(layout.divides(&a, &b));
        assert!(!layout.divides(&b, &a));
        layout.sub_into(&a, &b, &mut out);
        assert_eq!(layout.unpack(&out).as_slice(), &[1, 0, 2]);

        let wide = layout.with_bits(30);
        let mut w = wide.pack(&[0, 0, 0]);
        layout.repack_into(&a, &wide, &mut w);
        assert_eq!(wide.unpack(&w).as_slice(), &[1, 2, 3]);
        assert_eq!(layout.cmp(&a, &b), Ordering::Greater);
    }
}
