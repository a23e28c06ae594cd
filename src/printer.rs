//! The text form of polynomials, readable by [MultivariatePolynomial::parse].
use std::fmt::{self, Display, Write};

use crate::poly::polynomial::MultivariatePolynomial;

/// Prints the terms of a polynomial in canonical order, for example `3*x1^2*x2-x2+5`.
pub struct PolynomialPrinter<'a> {
    pub poly: &'a MultivariatePolynomial,
    /// Separate the terms with spaces around `+` and `-`.
    pub spaced: bool,
}

impl<'a> PolynomialPrinter<'a> {
    pub fn new(poly: &'a MultivariatePolynomial) -> PolynomialPrinter<'a> {
        PolynomialPrinter {
            poly,
            spaced: false,
        }
    }
}

impl<'a> Display for PolynomialPrinter<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.poly.is_zero() {
            return f.write_char('0');
        }

        let ctx = self.poly.context();
        for (i, (c, e)) in self.poly.iter().enumerate() {
            let negative = *c < 0;
            if i == 0 {
                if negative {
                    f.write_char('-')?;
                }
            } else {
                let sign = if negative { '-' } else { '+' };
                if self.spaced {
                    write!(f, " {} ", sign)?;
                } else {
                    f.write_char(sign)?;
                }
            }

            let abs = c.as_abs();
            let mut first = if *abs == 1 {
                true
            } else {
                write!(f, "{}", &*abs)?;
                false
            };

            for (v, p) in e.iter().enumerate() {
                if *p == 0 {
                    continue;
                }

                if !first {
                    f.write_char('*')?;
                }
                first = false;

                f.write_str(ctx.variable_name(v))?;
                if *p > 1 {
                    write!(f, "^{}", p)?;
                }
            }

            // a unit constant term
            if first {
                f.write_char('1')?;
            }
        }

        Ok(())
    }
}

impl Display for MultivariatePolynomial {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        PolynomialPrinter::new(self).fmt(f)
    }
}

#[cfg(test)]
mod test {
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    use super::PolynomialPrinter;
    use crate::poly::context::Context;
    use crate::poly::order::MonomialOrder;
    use crate::poly::polynomial::MultivariatePolynomial;

    #[test]
    fn canonical_text() {
        let ctx = Context::new(2, MonomialOrder::Lex).unwrap();
        let p = MultivariatePolynomial::parse("5 - x2 + 3*x2*x1^2", &ctx).unwrap();
        assert_eq!(p.to_string(), "3*x1^2*x2-x2+5");
        assert_eq!((-p.clone()).to_string(), "-3*x1^2*x2+x2-5");
        assert_eq!(
            PolynomialPrinter {
                poly: &p,
                spaced: true
            }
            .to_string(),
            "3*x1^2*x2 - x2 + 5"
        );

        assert_eq!(p.zero().to_string(), "0");
        assert_eq!(p.one().to_string(), "1");
        assert_eq!((-p.one()).to_string(), "-1");

        let ctx = Context::with_variables(["a", "b"], MonomialOrder::DegRevLex).unwrap();
        let q = MultivariatePolynomial::parse("a^3 + a*b^2 - 12*a", &ctx).unwrap();
        assert_eq!(q.to_string(), "a^3+a*b^2-12*a");
    }

    #[test]
    fn parse_print_round_trip() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(61);
        for order in MonomialOrder::ALL {
            let ctx = Context::new(3, order).unwrap();
            for _ in 0..30 {
                let p = MultivariatePolynomial::sample(&ctx, &mut rng, 10, 400, 90);
                let q = MultivariatePolynomial::parse(&p.to_string(), &ctx).unwrap();
                q.check_consistency();
                assert_eq!(p, q);
                assert_eq!(p.bits(), q.bits());
            }
        }
    }
}
