// tests/generator_tests.rs
// Canonical generators, P¹ labels, square relations and word relations

use std::collections::BTreeSet;

use num_bigint::BigInt;
use prime_quaternions::generators::{find_all_quaternions, generate_canonical_generators};
use prime_quaternions::modular::{find_xy_solution, QuaternionSplitting};
use prime_quaternions::params::{RelationParams, WordSearchParams};
use prime_quaternions::quaternion::projective::{equals, normalize};
use prime_quaternions::word_search::RelationValue;
use prime_quaternions::{
    compute_relations, generate_generators, search_word_relations, P1Point, Quaternion,
};

const TEST_PRIMES: [u64; 4] = [5, 7, 13, 17];

fn units() -> Vec<Quaternion> {
    let mut units = Vec::new();
    for u in [Quaternion::one(), Quaternion::i(), Quaternion::j(), Quaternion::k()] {
        units.push(-&u);
        units.push(u);
    }
    units
}

#[test]
fn xy_solution_for_5() {
    let (x, y) = find_xy_solution(5).unwrap();
    assert_eq!((x * x + y * y) % 5, 4);
    assert_eq!((x, y), (2, 0));
}

#[test]
fn one_generator_per_projective_point() {
    for p in TEST_PRIMES {
        let generators = generate_canonical_generators(p).unwrap();
        assert_eq!(generators.len() as u64, p + 1, "p = {}", p);

        let labels: BTreeSet<P1Point> = generators.iter().map(|g| g.label).collect();
        let expected: BTreeSet<P1Point> = P1Point::all(p).collect();
        assert_eq!(labels, expected, "p = {}", p);

        for g in &generators {
            assert_eq!(g.quaternion.norm(), BigInt::from(p));
        }
    }
}

#[test]
fn labels_are_left_unit_invariant() {
    for p in TEST_PRIMES {
        let splitting = QuaternionSplitting::new(p).unwrap();
        for q in find_all_quaternions(p) {
            let label = splitting.label(&q);
            assert!(label.is_some());
            for u in units() {
                assert_eq!(splitting.label(&(&u * &q)), label, "{} · {}", u, q);
            }
        }
    }
}

#[test]
fn generators_pair_with_their_conjugates() {
    let set = generate_generators(&TEST_PRIMES).unwrap();
    let expected: usize = TEST_PRIMES.iter().map(|&p| p as usize + 1).sum();
    assert_eq!(set.len(), expected);

    for g in &set {
        assert_eq!(g.conjugate, g.quaternion.conjugate());
        let product = &g.quaternion * &g.conjugate;
        assert_eq!(product, Quaternion::scalar(g.prime));
        assert_eq!(normalize(&product), normalize(&Quaternion::one()));

        let pair = set.get(g.pair.unwrap()).unwrap();
        assert_eq!(pair.quaternion, g.conjugate);
    }

    let conjugates = set.iter().filter(|g| g.is_conjugate).count();
    assert_eq!(conjugates * 2, set.len());
}

#[test]
fn cross_prime_relations_are_sound() {
    for primes in [[5u64, 13], [3, 7], [5, 17]] {
        let set = generate_generators(&primes).unwrap();
        let relations = compute_relations(&set, &RelationParams::cross_prime());

        let primaries = |p: u64| set.for_prime(p).filter(|g| !g.is_conjugate).count();
        assert_eq!(relations.len(), 2 * primaries(primes[0]) * primaries(primes[1]));

        for r in &relations {
            let a = &set.get(r.a).unwrap().quaternion;
            let b = &set.get(r.b).unwrap().quaternion;
            let b_prime = &set.get(r.b_prime).unwrap().quaternion;
            let a_prime = &set.get(r.a_prime).unwrap().quaternion;
            assert!(equals(&(a * b), &(b_prime * a_prime)), "{:?}", r);
            assert_eq!(r.degenerate, r.a_prime == r.a && r.b_prime == r.b);
        }
    }
}

#[test]
fn all_pair_relations_are_sound() {
    let set = generate_generators(&[5, 13]).unwrap();
    let relations = compute_relations(&set, &RelationParams::all_pairs());
    assert!(relations.len() >= 42);
    for r in &relations {
        assert!(r.holds_in(&set));
    }
}

#[test]
fn word_relations_among_generators_evaluate_to_scalars() {
    let set = generate_generators(&[5, 13]).unwrap();
    let gens: Vec<Quaternion> = set.iter().map(|g| g.quaternion.clone()).collect();

    // beam keeps every letter, so depth 2 sees every product of two letters
    let relations = search_word_relations(&gens, &WordSearchParams::new(400, 2)).unwrap();
    assert_eq!(relations.len(), 456);

    for r in &relations {
        assert!(r.holds(&gens), "{}", r);
        let value = r.evaluate(&gens).unwrap();
        let unit = match r.value {
            RelationValue::One => Quaternion::one(),
            RelationValue::MinusOne => -Quaternion::one(),
        };
        assert!(equals(&value, &unit));
        assert_eq!(normalize(&value), normalize(&Quaternion::one()));
    }
}

#[test]
fn commuting_generators_yield_a_commutator() {
    let gens = [Quaternion::new(1, 2, 0, 0), Quaternion::new(3, 2, 0, 0)];
    let relations = search_word_relations(&gens, &WordSearchParams::new(100, 4)).unwrap();

    let commutator = relations.iter().find(|r| {
        let w = r.relator();
        w.len() == 4 && w[0].index != w[1].index && w[2].is_inverse_of(w[0]) && w[3].is_inverse_of(w[1])
    });
    let commutator = commutator.expect("1+2i and 3+2i commute");
    assert_eq!(commutator.value, RelationValue::One);
    assert!(commutator.holds(&gens));
}
