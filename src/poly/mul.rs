//! Johnson's heap multiplication of sparse polynomials.
use std::collections::BinaryHeap;

use ahash::{HashMap, HashMapExt};
use smallvec::smallvec;

use super::packing::{bits_for_bounds, PackedMonomial};
use super::polynomial::MultivariatePolynomial;
use super::Exponent;
use crate::domains::integer::Z;
use crate::domains::Ring;

impl MultivariatePolynomial {
    /// The field width of the product `self * rhs`, computed from the
    /// per-variable maxima and the maximal total degrees of both factors.
    pub(crate) fn product_bits(&self, rhs: &Self) -> u32 {
        let max: Vec<u64> = self
            .max_exponents()
            .iter()
            .zip(rhs.max_exponents().iter())
            .map(|(a, b)| *a as u64 + *b as u64)
            .collect();

        if let Some(m) = max.iter().find(|m| **m > Exponent::MAX as u64) {
            panic!("Exponent overflow in multiplication: {} does not fit in 32 bits", m);
        }

        let deg = self.max_total_degree() + rhs.max_total_degree();
        bits_for_bounds(self.layout.order(), &max, deg)
            .max(self.bits())
            .max(rhs.bits())
    }

    /// Multiply two polynomials with a heap over the pending products.
    ///
    /// The terms of the smaller polynomial `a` are merged against the chains
    /// `a[i] * b[j], j = 0, 1, ...`. The heap holds every monomial at most once and the
    /// cache maps it to all pairs `(i, j)` that produce it. The output width is fixed
    /// before the merge starts.
    pub fn heap_mul(&self, rhs: &Self) -> Self {
        self.check_same_context(rhs);

        // place the smallest polynomial first, as this is faster
        // in the heap algorithm
        if self.nterms() > rhs.nterms() {
            return rhs.heap_mul(self);
        }

        if self.is_zero() {
            return self.zero();
        }

        let bits = self.product_bits(rhs);
        let a = self.widened(bits);
        let b = rhs.widened(bits);
        let layout = a.layout;
        let w = layout.words();

        let mut res = a.zero_with_capacity(a.nterms().max(b.nterms()));

        let mut cache: HashMap<PackedMonomial, Vec<(usize, usize)>> = HashMap::new();
        let mut q_cache: Vec<Vec<(usize, usize)>> = vec![];

        // a max-heap of masked monomials, since the terms are sorted largest first
        let mut h: BinaryHeap<PackedMonomial> = BinaryHeap::with_capacity(a.nterms());

        let mut m: PackedMonomial = smallvec![0; w];
        let push = |i: usize,
                    j: usize,
                    m: &mut PackedMonomial,
                    h: &mut BinaryHeap<PackedMonomial>,
                    cache: &mut HashMap<PackedMonomial, Vec<(usize, usize)>>,
                    q_cache: &mut Vec<Vec<(usize, usize)>>| {
            layout.add_into(a.packed_exponents(i), b.packed_exponents(j), m);
            layout.toggle_mask(m);

            if let Some(e) = cache.get_mut(&*m) {
                e.push((i, j));
            } else {
                h.push(m.clone()); // only add when new
                if let Some(mut qq) = q_cache.pop() {
                    qq.push((i, j));
                    cache.insert(m.clone(), qq);
                } else {
                    cache.insert(m.clone(), vec![(i, j)]);
                }
            }
        };

        push(0, 0, &mut m, &mut h, &mut cache, &mut q_cache);

        // i = merged_index[j] signifies that a[i] * b[j] has been merged
        let mut merged_index = vec![0; b.nterms()];
        // in_heap[j] signifies that b[j] is in the heap
        let mut in_heap = vec![false; b.nterms()];
        in_heap[0] = true;

        while let Some(mut cur_mon) = h.pop() {
            let mut coefficient = Z.zero();

            let Some(mut q) = cache.remove(&cur_mon) else {
                unreachable!("Heap monomial without cached products")
            };

            for (i, j) in q.drain(..) {
                Z.add_mul_assign(&mut coefficient, &a.coefficients[i], &b.coefficients[j]);

                merged_index[j] = i + 1;

                if i + 1 < a.nterms() && (j == 0 || merged_index[j - 1] > i + 1) {
                    push(i + 1, j, &mut m, &mut h, &mut cache, &mut q_cache);
                } else {
                    in_heap[j] = false;
                }

                if j + 1 < b.nterms() && !in_heap[j + 1] {
                    push(i, j + 1, &mut m, &mut h, &mut cache, &mut q_cache);
                    in_heap[j + 1] = true;
                }
            }

            q_cache.push(q);

            if coefficient != 0 {
                layout.toggle_mask(&mut cur_mon);
                res.push_packed(coefficient, &cur_mon);
            }
        }

        res
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;
    use rug::Complete;

    use crate::domains::integer::Integer;
    use crate::poly::context::Context;
    use crate::poly::order::MonomialOrder;
    use crate::poly::polynomial::MultivariatePolynomial;
    use crate::poly::Exponents;

    fn poly(ctx: &Arc<Context>, terms: &[(i64, &[u32])]) -> MultivariatePolynomial {
        MultivariatePolynomial::from_terms(ctx, terms.iter().map(|(c, e)| (Integer::from(*c), *e)))
            .unwrap()
    }

    /// Multiply by forming every product and sorting.
    fn schoolbook(a: &MultivariatePolynomial, b: &MultivariatePolynomial) -> MultivariatePolynomial {
        let mut terms = vec![];
        for (c1, e1) in a.iter() {
            for (c2, e2) in b.iter() {
                let e: Exponents = e1.iter().zip(&e2).map(|(x, y)| x + y).collect();
                terms.push(((c1 * c2).complete(), e));
            }
        }
        MultivariatePolynomial::from_terms(a.context(), terms).unwrap()
    }

    fn random_pairs(ctx: &Arc<Context>, rng: &mut Xoshiro256StarStar, iterations: usize) {
        for _ in 0..iterations {
            let a = MultivariatePolynomial::sample(ctx, rng, 12, 6, 40);
            let b = MultivariatePolynomial::sample(ctx, rng, 7, 6, 100);

            let p = &a * &b;
            p.check_consistency();
            assert_eq!(p, schoolbook(&a, &b));
            assert_eq!(p, &b * &a);
        }
    }

    #[test]
    fn matches_schoolbook() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(21);
        for order in MonomialOrder::ALL {
            for nvars in 1..4 {
                let ctx = Context::new(nvars, order).unwrap();
                random_pairs(&ctx, &mut rng, 20);
            }
        }
    }

    #[test]
    fn cancellation() {
        let ctx = Context::new(2, MonomialOrder::Lex).unwrap();
        // (x^2 + x y + y^2) (x - y) = x^3 - y^3
        let a = poly(&ctx, &[(1, &[2, 0]), (1, &[1, 1]), (1, &[0, 2])]);
        let b = poly(&ctx, &[(1, &[1, 0]), (-1, &[0, 1])]);

        let p = &a * &b;
        p.check_consistency();
        assert_eq!(p.nterms(), 2);
        assert_eq!(p.exponents(0).as_slice(), &[3, 0]);
        assert_eq!(p.exponents(1).as_slice(), &[0, 3]);
        assert_eq!(p.coefficients()[1], -1);

        assert!((&a * &a.zero()).is_zero());
        assert_eq!(&a * &a.one(), a);
    }

    #[test]
    fn output_width_is_precomputed() {
        let ctx = Context::new(2, MonomialOrder::DegRevLex).unwrap();
        let a = poly(&ctx, &[(3, &[200, 0]), (1, &[0, 1])]);
        let b = poly(&ctx, &[(-2, &[100, 5]), (1, &[0, 0])]);
        assert_eq!((a.bits(), b.bits()), (8, 8));

        let p = &a * &b;
        p.check_consistency();
        assert_eq!(p.bits(), 9);
        assert_eq!(p.exponents(0).as_slice(), &[300, 5]);
        assert_eq!(p.coefficients()[0], -6);
        assert_eq!(p, schoolbook(&a, &b));
    }

    #[test]
    #[should_panic]
    fn exponent_overflow() {
        let ctx = Context::new(1, MonomialOrder::Lex).unwrap();
        let a = poly(&ctx, &[(1, &[u32::MAX])]);
        let _ = &a * &a;
    }
}
