use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use sparsepoly::{Context, Integer, MonomialOrder, MultivariatePolynomial, PolyError};

#[test]
fn print_parse_round_trip() {
    let mut rng = Xoshiro256StarStar::seed_from_u64(301);
    let names = ["a", "b_2", "zeta"];
    for order in MonomialOrder::ALL {
        let ctx = Context::with_variables(names, order).unwrap();
        for _ in 0..25 {
            let f = MultivariatePolynomial::sample(&ctx, &mut rng, 12, 70, 70);
            f.check_consistency();

            let text = f.to_string();
            let g = MultivariatePolynomial::parse(&text, &ctx).unwrap();
            g.check_consistency();
            assert_eq!(f, g, "{}", text);
            assert_eq!(g.to_string(), text);
        }
    }
}

#[test]
fn order_tags() {
    for order in MonomialOrder::ALL {
        let parsed: MonomialOrder = order.to_string().parse().unwrap();
        assert_eq!(parsed, order);
    }
    assert!(matches!(
        "grevlex".parse::<MonomialOrder>(),
        Err(PolyError::InvalidArgument(_))
    ));
}

#[test]
fn set_get_is_identity() {
    let mut rng = Xoshiro256StarStar::seed_from_u64(302);
    for order in MonomialOrder::ALL {
        let ctx = Context::new(4, order).unwrap();
        for _ in 0..20 {
            let mut f = MultivariatePolynomial::sample(&ctx, &mut rng, 20, 10, 30);
            let orig = f.clone();

            // absent and present monomials
            for k in 0..10 {
                let m: Vec<u32> = if k % 2 == 0 && !f.is_zero() {
                    let i = rng.gen_range(0..f.nterms());
                    f.get_monomial_at(i).unwrap().to_vec()
                } else {
                    (0..4).map(|_| rng.gen_range(0..=300)).collect()
                };

                let c = f.get_coefficient_at_monomial(&m).unwrap();
                f.set_coefficient_at_monomial(&m, c).unwrap();
                f.check_consistency();
                assert_eq!(f, orig);
            }
        }
    }
}

#[test]
fn removal_changes_length_by_one() {
    let mut rng = Xoshiro256StarStar::seed_from_u64(303);
    let ctx = Context::new(3, MonomialOrder::DegLex).unwrap();
    for _ in 0..20 {
        let mut f = MultivariatePolynomial::sample(&ctx, &mut rng, 15, 6, 20);
        if f.is_zero() {
            continue;
        }

        let n = f.nterms();
        let i = rng.gen_range(0..n);
        let m = f.get_monomial_at(i).unwrap();
        f.set_coefficient_at_monomial(&m, Integer::new()).unwrap();
        f.check_consistency();
        assert_eq!(f.nterms(), n - 1);

        f.set_coefficient_at_monomial(&m, Integer::new()).unwrap();
        assert_eq!(f.nterms(), n - 1);

        f.set_coefficient_at_monomial(&m, Integer::from(-8)).unwrap();
        f.check_consistency();
        assert_eq!(f.nterms(), n);
        assert_eq!(*f.get_coefficient_at(i).unwrap(), -8);
    }
}

#[test]
fn term_index_errors() {
    let ctx = Context::new(2, MonomialOrder::Lex).unwrap();
    let mut f = MultivariatePolynomial::parse("x1^2 - 7", &ctx).unwrap();

    assert_eq!(*f.get_coefficient_at(1).unwrap(), -7);
    assert_eq!(
        f.get_coefficient_at(2),
        Err(PolyError::Index { index: 2, len: 2 })
    );
    assert!(matches!(
        f.set_coefficient_at(5, Integer::from(1)),
        Err(PolyError::Index { .. })
    ));

    f.set_scalar(3);
    assert_eq!(f.to_string(), "3");
    f.set_scalar(0);
    assert!(f.is_zero());
    assert!(f.get_coefficient_at(0).is_err());
}
