//! Exact division of sparse polynomials.
use std::collections::BinaryHeap;

use rug::Complete;
use smallvec::smallvec;

use super::packing::PackedMonomial;
use super::polynomial::MultivariatePolynomial;
use crate::domains::integer::{Integer, Z};
use crate::domains::Ring;

impl MultivariatePolynomial {
    /// Divide by `div`, returning `None` if the division is not exact.
    ///
    /// The remainder is never formed: the terms of `self` are merged with the chains
    /// `-q[i] * div[j], j >= 1` in a heap, and every monomial that survives the merge
    /// either yields the next quotient term or proves that `div` does not divide `self`.
    pub fn divides(&self, div: &MultivariatePolynomial) -> Option<MultivariatePolynomial> {
        self.check_same_context(div);

        if div.is_zero() {
            panic!("Cannot divide by 0 polynomial");
        }

        if self.is_zero() {
            return Some(self.clone());
        }

        if div.is_constant() {
            return self.try_div_coeff(&div.coefficients[0]);
        }

        let max_a = self.max_exponents();
        let max_b = div.max_exponents();
        if max_a.iter().zip(&max_b).any(|(a, b)| a < b) {
            return None;
        }
        let deg_a = self.max_total_degree();
        let deg_b = div.max_total_degree();
        if deg_a < deg_b {
            return None;
        }

        // every monomial below is bounded by the maxima of `self`
        let bits = self.bits().max(div.bits());
        let a = self.widened(bits);
        let b = div.widened(bits);
        let layout = a.layout;
        let w = layout.words();

        let mut q = a.zero_with_capacity(a.nterms() / b.nterms() + 1);

        // max-heap of (masked monomial, quotient index, divisor index)
        let mut h: BinaryHeap<(PackedMonomial, usize, usize)> = BinaryHeap::new();

        let mut cur: PackedMonomial = smallvec![0; w];
        let mut a_masked: PackedMonomial = smallvec![0; w];
        let mut qm: PackedMonomial = smallvec![0; w];
        let mut k = 0;

        loop {
            // select the largest pending monomial
            if k < a.nterms() {
                a_masked.copy_from_slice(a.packed_exponents(k));
                layout.toggle_mask(&mut a_masked);
            }

            let from_a = match h.peek() {
                Some((top, _, _)) => {
                    if k < a.nterms() && a_masked >= *top {
                        cur.copy_from_slice(&a_masked);
                        true
                    } else {
                        cur.copy_from_slice(top);
                        false
                    }
                }
                None if k < a.nterms() => {
                    cur.copy_from_slice(&a_masked);
                    true
                }
                None => break,
            };

            let mut coefficient = Integer::new();
            if from_a {
                coefficient += &a.coefficients[k];
                k += 1;
            }

            while h.peek().map_or(false, |(top, _, _)| *top == cur) {
                let Some((_, i, j)) = h.pop() else {
                    unreachable!()
                };

                coefficient -= (&q.coefficients[i] * &b.coefficients[j]).complete();

                if j + 1 < b.nterms() {
                    let mut m: PackedMonomial = smallvec![0; w];
                    layout.add_into(q.packed_exponents(i), b.packed_exponents(j + 1), &mut m);
                    layout.toggle_mask(&mut m);
                    h.push((m, i, j + 1));
                }
            }

            if coefficient == 0 {
                continue;
            }

            layout.toggle_mask(&mut cur);
            if !layout.divides(&cur, b.packed_exponents(0)) {
                return None;
            }

            let qc = Z.try_div(&coefficient, &b.coefficients[0])?;
            layout.sub_into(&cur, b.packed_exponents(0), &mut qm);

            // the cofactor must stay within the degree bounds of the dividend
            let qe = layout.unpack(&qm);
            if qe
                .iter()
                .zip(&max_b)
                .zip(&max_a)
                .any(|((e, mb), ma)| *e as u64 + *mb as u64 > *ma as u64)
                || layout.total_degree(&qm) + deg_b > deg_a
            {
                return None;
            }

            q.push_packed(qc, &qm);

            // a monomial divisor has no tail to merge
            if b.nterms() > 1 {
                let i = q.nterms() - 1;
                let mut m: PackedMonomial = smallvec![0; w];
                layout.add_into(&qm, b.packed_exponents(1), &mut m);
                layout.toggle_mask(&mut m);
                h.push((m, i, 1));
            }
        }

        Some(q)
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    use crate::domains::integer::Integer;
    use crate::poly::context::Context;
    use crate::poly::order::MonomialOrder;
    use crate::poly::polynomial::MultivariatePolynomial;

    fn poly(ctx: &Arc<Context>, terms: &[(i64, &[u32])]) -> MultivariatePolynomial {
        MultivariatePolynomial::from_terms(ctx, terms.iter().map(|(c, e)| (Integer::from(*c), *e)))
            .unwrap()
    }

    #[test]
    fn small_quotients() {
        let ctx = Context::new(1, MonomialOrder::Lex).unwrap();
        let a = poly(&ctx, &[(1, &[2]), (-1, &[0])]);
        let b = poly(&ctx, &[(1, &[1]), (1, &[0])]);
        let q = a.divides(&b).unwrap();
        q.check_consistency();
        assert_eq!(q, poly(&ctx, &[(1, &[1]), (-1, &[0])]));

        let c = poly(&ctx, &[(1, &[2]), (1, &[0])]);
        assert_eq!(c.divides(&b), None);
        assert_eq!(b.divides(&a), None);

        let two = a.constant(Integer::from(2));
        assert_eq!(a.divides(&two), None);
        assert_eq!(
            a.clone().mul_coeff(&Integer::from(2)).divides(&two),
            Some(a.clone())
        );
        assert!(a.zero().divides(&b).unwrap().is_zero());
    }

    #[test]
    fn exact_products() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(31);
        for order in MonomialOrder::ALL {
            let ctx = Context::new(3, order).unwrap();
            for _ in 0..25 {
                let a = MultivariatePolynomial::sample(&ctx, &mut rng, 8, 4, 20);
                let b = MultivariatePolynomial::sample(&ctx, &mut rng, 5, 3, 20);
                if b.is_zero() {
                    continue;
                }

                let p = &a * &b;
                let q = p.divides(&b).unwrap();
                q.check_consistency();
                assert_eq!(q, a);

                if !b.is_constant() {
                    let r = &p + &p.one();
                    assert_eq!(r.divides(&b), None);
                }
            }
        }
    }

    #[test]
    fn monomial_divisors() {
        let ctx = Context::new(2, MonomialOrder::Lex).unwrap();
        // x y^2 / y = x y
        let a = poly(&ctx, &[(1, &[1, 2])]);
        let y = poly(&ctx, &[(1, &[0, 1])]);
        let q = a.divides(&y).unwrap();
        q.check_consistency();
        assert_eq!(q, poly(&ctx, &[(1, &[1, 1])]));

        // (6 x^3 y - 4 x y^2) / (2 x y) = 3 x^2 - 2 y
        let b = poly(&ctx, &[(6, &[3, 1]), (-4, &[1, 2])]);
        let m = poly(&ctx, &[(2, &[1, 1])]);
        assert_eq!(b.divides(&m), Some(poly(&ctx, &[(3, &[2, 0]), (-2, &[0, 1])])));

        assert_eq!(y.divides(&a), None);
        let c = poly(&ctx, &[(1, &[1, 2]), (1, &[0, 0])]);
        assert_eq!(c.divides(&y), None);
        let odd = poly(&ctx, &[(3, &[1, 1])]);
        assert_eq!(odd.divides(&m), None);

        let mut rng = Xoshiro256StarStar::seed_from_u64(32);
        for order in MonomialOrder::ALL {
            let ctx = Context::new(3, order).unwrap();
            for _ in 0..20 {
                let a = MultivariatePolynomial::sample(&ctx, &mut rng, 8, 4, 20);
                let m = MultivariatePolynomial::sample(&ctx, &mut rng, 1, 3, 10);
                if m.is_zero() {
                    continue;
                }

                let p = &a * &m;
                let q = p.divides(&m).unwrap();
                q.check_consistency();
                assert_eq!(q, a);
            }
        }
    }

    #[test]
    #[should_panic]
    fn division_by_zero() {
        let ctx = Context::new(2, MonomialOrder::Lex).unwrap();
        let a = poly(&ctx, &[(1, &[1, 0])]);
        let _ = a.divides(&a.zero());
    }
}
