use std::cmp::Ordering::{self, Equal};
use std::fmt::Display;
use std::str::FromStr;

use super::Exponent;
use crate::error::PolyError;

/// A monomial ordering. The first variable has the highest priority.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MonomialOrder {
    /// Lexicographic ordering of monomials.
    #[default]
    Lex,
    /// Graded lexicographic ordering of monomials.
    DegLex,
    /// Graded reverse lexicographic ordering of monomials.
    DegRevLex,
}

impl MonomialOrder {
    pub const ALL: [MonomialOrder; 3] = [
        MonomialOrder::Lex,
        MonomialOrder::DegLex,
        MonomialOrder::DegRevLex,
    ];

    /// Returns true if the packed exponents reserve a field for the total degree.
    #[inline]
    pub fn is_degree(&self) -> bool {
        !matches!(self, MonomialOrder::Lex)
    }

    /// Compare two unpacked exponent vectors.
    pub fn cmp(&self, a: &[Exponent], b: &[Exponent]) -> Ordering {
        match self {
            MonomialOrder::Lex => a.cmp(b),
            MonomialOrder::DegLex => {
                let deg: u64 = a.iter().map(|e| *e as u64).sum();
                let deg2: u64 = b.iter().map(|e| *e as u64).sum();

                deg.cmp(&deg2).then_with(|| a.cmp(b))
            }
            MonomialOrder::DegRevLex => {
                let deg: u64 = a.iter().map(|e| *e as u64).sum();
                let deg2: u64 = b.iter().map(|e| *e as u64).sum();

                match deg.cmp(&deg2) {
                    Equal => {}
                    x => {
                        return x;
                    }
                }

                for (a1, a2) in a.iter().rev().zip(b.iter().rev()) {
                    match a1.cmp(a2) {
                        Equal => {}
                        x => {
                            return x.reverse();
                        }
                    }
                }

                Equal
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MonomialOrder::Lex => "lex",
            MonomialOrder::DegLex => "deglex",
            MonomialOrder::DegRevLex => "degrevlex",
        }
    }
}

impl Display for MonomialOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MonomialOrder {
    type Err = PolyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lex" => Ok(MonomialOrder::Lex),
            "deglex" => Ok(MonomialOrder::DegLex),
            "degrevlex" => Ok(MonomialOrder::DegRevLex),
            other => Err(PolyError::invalid(format!(
                "unsupported monomial ordering '{}'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod test {
    use std::cmp::Ordering;

    use super::MonomialOrder;

    #[test]
    fn orderings() {
        // x^2*z vs x*y^2 in three variables
        let a = [2, 0, 1];
        let b = [1, 2, 0];
        assert_eq!(MonomialOrder::Lex.cmp(&a, &b), Ordering::Greater);
        assert_eq!(MonomialOrder::DegLex.cmp(&a, &b), Ordering::Greater);
        assert_eq!(MonomialOrder::DegRevLex.cmp(&a, &b), Ordering::Less);

        // x vs y^2
        assert_eq!(MonomialOrder::Lex.cmp(&[1, 0], &[0, 2]), Ordering::Greater);
        assert_eq!(MonomialOrder::DegLex.cmp(&[1, 0], &[0, 2]), Ordering::Less);
    }

    #[test]
    fn parse_tags() {
        assert_eq!("lex".parse::<MonomialOrder>().unwrap(), MonomialOrder::Lex);
        assert_eq!(
            " DegRevLex ".parse::<MonomialOrder>().unwrap(),
            MonomialOrder::DegRevLex
        );
        assert!("revlex".parse::<MonomialOrder>().is_err());
        for o in MonomialOrder::ALL {
            assert_eq!(o.to_string().parse::<MonomialOrder>().unwrap(), o);
        }
    }
}
