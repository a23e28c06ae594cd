//! Multi-modular reduction and Chinese remaindering over a fixed set of primes.
//!
//! A [Comb] is a balanced product tree over the primes. It is built once and then
//! shared: both [Comb::reduce] and [Comb::reconstruct] walk the tree level by level
//! and only allocate call-local scratch space.

use rug::{ops::RemRounding, Complete};

use super::finite_field::{is_prime_u64, Zp64};
use super::integer::{rem_u64, symmetric_mod, Integer};
use super::Ring;
use crate::error::{PolyError, Result};

/// A precomputed product tree over a list of pairwise distinct primes.
#[derive(Clone, Debug)]
pub struct Comb {
    primes: Vec<u64>,
    // levels[0][i] is primes[i]; levels[k][i] = levels[k - 1][2i] * levels[k - 1][2i + 1],
    // where an unpaired last node is carried up unchanged. The last level holds only P.
    levels: Vec<Vec<Integer>>,
    // (P / p_i)^-1 mod p_i
    inverses: Vec<u64>,
}

impl Comb {
    /// Build a comb for `primes`. The list must be non-empty and consist of
    /// pairwise distinct primes.
    pub fn new(primes: &[u64]) -> Result<Comb> {
        if primes.is_empty() {
            return Err(PolyError::invalid("a comb needs at least one prime"));
        }

        if let Some(p) = primes.iter().find(|p| !is_prime_u64(**p)) {
            return Err(PolyError::invalid(format!("{} is not a prime", p)));
        }

        let mut sorted = primes.to_vec();
        sorted.sort_unstable();
        if let Some(w) = sorted.windows(2).find(|w| w[0] == w[1]) {
            return Err(PolyError::invalid(format!(
                "the prime {} occurs more than once",
                w[0]
            )));
        }

        let mut levels = vec![primes.iter().map(|p| Integer::from(*p)).collect::<Vec<_>>()];
        while levels.last().map_or(0, |l| l.len()) > 1 {
            let prev = &levels[levels.len() - 1];
            let next = prev
                .chunks(2)
                .map(|c| match c {
                    [a, b] => (a * b).complete(),
                    [a] => a.clone(),
                    _ => unreachable!(),
                })
                .collect();
            levels.push(next);
        }

        let modulus = &levels[levels.len() - 1][0];
        let inverses = primes
            .iter()
            .map(|p| {
                let field = Zp64::new(*p);
                let cofactor = (modulus / &Integer::from(*p)).complete();
                field.inv(&field.element_from_integer(&cofactor)).value()
            })
            .collect();

        Ok(Comb {
            primes: primes.to_vec(),
            levels,
            inverses,
        })
    }

    pub fn primes(&self) -> &[u64] {
        &self.primes
    }

    /// The product `P` of all primes.
    pub fn modulus(&self) -> &Integer {
        &self.levels[self.levels.len() - 1][0]
    }

    /// Compute `value mod p_i` for every prime, each in `[0, p_i)`.
    pub fn reduce(&self, value: &Integer) -> Vec<u64> {
        let top = self.levels.len() - 1;
        let mut current = vec![value.clone().rem_euc(self.modulus())];

        for level in (0..top).rev() {
            let moduli = &self.levels[level];
            current = moduli
                .iter()
                .enumerate()
                .map(|(i, m)| {
                    let parent = &current[i / 2];
                    if parent < m {
                        parent.clone()
                    } else {
                        parent.clone().rem_euc(m)
                    }
                })
                .collect();
        }

        current
            .iter()
            .zip(&self.primes)
            .map(|(r, p)| rem_u64(r, *p))
            .collect()
    }

    /// Reconstruct the integer with the given residues. If `signed` is true, the
    /// representative in `(-P/2, P/2]` is returned, otherwise the one in `[0, P)`.
    pub fn reconstruct(&self, residues: &[u64], signed: bool) -> Result<Integer> {
        if residues.len() != self.primes.len() {
            return Err(PolyError::invalid(format!(
                "expected {} residues, got {}",
                self.primes.len(),
                residues.len()
            )));
        }

        let mut current: Vec<Integer> = residues
            .iter()
            .zip(&self.primes)
            .zip(&self.inverses)
            .map(|((r, p), inv)| {
                let field = Zp64::new(*p);
                let c = field.mul(&field.to_element(*r), &field.to_element(*inv));
                Integer::from(c.value())
            })
            .collect();

        for level in 0..self.levels.len() - 1 {
            let moduli = &self.levels[level];
            current = current
                .chunks(2)
                .enumerate()
                .map(|(i, c)| match c {
                    [l, r] => {
                        let mut v = (l * &moduli[2 * i + 1]).complete();
                        v += (r * &moduli[2 * i]).complete();
                        v
                    }
                    [l] => l.clone(),
                    _ => unreachable!(),
                })
                .collect();
        }

        let modulus = self.modulus();
        let v = current.swap_remove(0);
        if signed {
            Ok(symmetric_mod(&v, modulus))
        } else {
            Ok(v.rem_euc(modulus))
        }
    }
}

#[cfg(test)]
mod test {
    use super::Comb;
    use crate::domains::integer::Integer;
    use crate::error::PolyError;

    #[test]
    fn invalid_prime_sets() {
        assert!(matches!(Comb::new(&[]), Err(PolyError::InvalidArgument(_))));
        assert!(matches!(
            Comb::new(&[5, 7, 5]),
            Err(PolyError::InvalidArgument(_))
        ));
        assert!(matches!(
            Comb::new(&[0, 7]),
            Err(PolyError::InvalidArgument(_))
        ));
        assert!(matches!(
            Comb::new(&[9, 7]),
            Err(PolyError::InvalidArgument(_))
        ));
    }

    #[test]
    fn small_round_trip() {
        let comb = Comb::new(&[3, 5, 7]).unwrap();
        assert_eq!(*comb.modulus(), 105);

        let r = comb.reduce(&Integer::from(-1));
        assert_eq!(r, vec![2, 4, 6]);
        assert_eq!(comb.reconstruct(&r, true).unwrap(), -1);
        assert_eq!(comb.reconstruct(&r, false).unwrap(), 104);

        let r = comb.reduce(&Integer::from(52));
        assert_eq!(comb.reconstruct(&r, true).unwrap(), 52);
        let r = comb.reduce(&Integer::from(53));
        assert_eq!(comb.reconstruct(&r, true).unwrap(), -52);

        assert!(comb.reconstruct(&[1, 2], true).is_err());
    }

    #[test]
    fn single_prime() {
        let comb = Comb::new(&[2]).unwrap();
        assert_eq!(comb.reduce(&Integer::from(-3)), vec![1]);
        assert_eq!(comb.reconstruct(&[1], true).unwrap(), 1);
        assert_eq!(comb.reconstruct(&[0], true).unwrap(), 0);
    }
}
