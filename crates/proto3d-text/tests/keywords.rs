use proto3d_text::keywords::{match_counts, size_multiplier, KEYWORDS};
use proto3d_text::{extract_descriptor, Shape};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;

fn describe(text: &str) -> (Shape, f64) {
    let d = extract_descriptor(text, &mut StdRng::seed_from_u64(7));
    (d.shape, d.size)
}

#[test]
fn size_cues_scale_the_shape() {
    assert_eq!((Shape::Cube, 2.0), describe("giant cube"));
    assert_eq!((Shape::Sphere, 0.5), describe("tiny ball"));
    assert_eq!((Shape::Chair, 1.0), describe("a wooden chair"));
    assert_eq!((Shape::Cone, 2.0), describe("a HUGE Pyramid"));
}

#[test]
fn small_cues_win_over_large_ones() {
    assert_eq!(0.5, size_multiplier("a big little box"));
    assert_eq!(0.5, size_multiplier("large but small"));
}

#[test]
fn the_most_keyword_hits_win() {
    assert_eq!(Shape::Cylinder, describe("a cylindrical tube, like a pipe, with a round lid").0);
    assert_eq!(Shape::Mug, describe("a glass cup on the table shaped like a mug").0);
}

#[test]
fn ties_resolve_to_the_earlier_vocabulary_entry() {
    // sphere: round, cube: box
    assert_eq!(Shape::Sphere, describe("a round box").0);
    // torus: ring, mug: glass
    assert_eq!(Shape::Torus, describe("a ring of glass").0);
    // sphere: circular, cylinder: tube, torus: circular tube
    let counts = match_counts("circular tube");
    assert_eq!(1, counts[0].1);
    assert_eq!(1, counts[2].1);
    assert_eq!(1, counts[4].1);
    assert_eq!(Shape::Sphere, describe("circular tube").0);
}

#[test]
fn keywords_match_inside_longer_words() {
    assert_eq!(Shape::Car, describe("a carpet").0);
}

#[test]
fn unmatched_prompt_picks_a_seeded_random_shape() {
    let d = extract_descriptor("qwerty zxcv", &mut StdRng::seed_from_u64(3));
    assert!(d.random);
    assert_eq!(1.0, d.size);
    let again = extract_descriptor("qwerty zxcv", &mut StdRng::seed_from_u64(3));
    assert_eq!(d, again);

    let shapes: HashSet<Shape> = (0..64)
        .map(|seed| extract_descriptor("qwerty zxcv", &mut StdRng::seed_from_u64(seed)).shape)
        .collect();
    assert!(shapes.len() > 1);
}

#[test]
fn vocabulary_order_is_fixed() {
    let order: Vec<Shape> = KEYWORDS.iter().map(|(s, _)| *s).collect();
    assert_eq!(Shape::ALL.to_vec(), order);
    assert!(Shape::Torus.keywords().contains(&"circular tube"));
}

#[test]
fn shape_serializes_lowercase() {
    assert_eq!("\"bottle\"", serde_json::to_string(&Shape::Bottle).unwrap());
    assert_eq!("bottle", Shape::Bottle.to_string());
}
