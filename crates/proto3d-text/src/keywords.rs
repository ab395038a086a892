//! Maps a free-text prompt onto one of a fixed set of shapes plus a size
//! multiplier.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Sphere,
    Cube,
    Cylinder,
    Cone,
    Torus,
    Car,
    Chair,
    Table,
    Mug,
    Bottle,
}

impl Shape {
    /// Vocabulary order. Ties between shapes resolve to the earlier entry.
    pub const ALL: [Shape; 10] = [
        Shape::Sphere,
        Shape::Cube,
        Shape::Cylinder,
        Shape::Cone,
        Shape::Torus,
        Shape::Car,
        Shape::Chair,
        Shape::Table,
        Shape::Mug,
        Shape::Bottle,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Shape::Sphere => "sphere",
            Shape::Cube => "cube",
            Shape::Cylinder => "cylinder",
            Shape::Cone => "cone",
            Shape::Torus => "torus",
            Shape::Car => "car",
            Shape::Chair => "chair",
            Shape::Table => "table",
            Shape::Mug => "mug",
            Shape::Bottle => "bottle",
        }
    }

    pub fn keywords(self) -> &'static [&'static str] {
        KEYWORDS
            .iter()
            .find(|(shape, _)| *shape == self)
            .map(|(_, words)| *words)
            .unwrap_or(&[])
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub static KEYWORDS: [(Shape, &[&str]); 10] = [
    (Shape::Sphere, &["sphere", "ball", "round", "circular"]),
    (Shape::Cube, &["cube", "box", "square", "rectangular", "block"]),
    (Shape::Cylinder, &["cylinder", "cylindrical", "tube", "pipe"]),
    (Shape::Cone, &["cone", "conical", "pyramid"]),
    (Shape::Torus, &["torus", "donut", "ring", "circular tube"]),
    (Shape::Car, &["car", "vehicle", "automobile"]),
    (Shape::Chair, &["chair", "seat", "stool"]),
    (Shape::Table, &["table", "desk"]),
    (Shape::Mug, &["mug", "cup", "glass"]),
    (Shape::Bottle, &["bottle", "flask"]),
];

pub const SMALL_CUES: [&str; 3] = ["small", "tiny", "little"];
pub const LARGE_CUES: [&str; 4] = ["large", "big", "huge", "giant"];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeDescriptor {
    pub shape: Shape,
    /// 0.5, 1.0 or 2.0
    pub size: f64,
    /// No keyword matched and the shape was drawn at random.
    pub random: bool,
}

/// Number of trigger keywords of each shape contained in `text`, in
/// vocabulary order. Matching is plain substring containment on the
/// lower-cased text, so "carpet" counts for car.
pub fn match_counts(text: &str) -> [(Shape, usize); 10] {
    let text = text.to_lowercase();
    KEYWORDS.map(|(shape, words)| (shape, words.iter().filter(|w| text.contains(*w)).count()))
}

pub fn size_multiplier(text: &str) -> f64 {
    let text = text.to_lowercase();
    if SMALL_CUES.iter().any(|w| text.contains(w)) {
        0.5
    } else if LARGE_CUES.iter().any(|w| text.contains(w)) {
        2.0
    } else {
        1.0
    }
}

pub fn extract_descriptor<R: Rng + ?Sized>(text: &str, rng: &mut R) -> ShapeDescriptor {
    let mut best: Option<(Shape, usize)> = None;
    for (shape, count) in match_counts(text) {
        if count > 0 && best.map_or(true, |(_, c)| count > c) {
            best = Some((shape, count));
        }
    }

    let size = size_multiplier(text);
    match best {
        Some((shape, count)) => {
            tracing::debug!(%shape, count, size, "matched shape keywords");
            ShapeDescriptor {
                shape,
                size,
                random: false,
            }
        }
        None => {
            let shape = Shape::ALL[rng.gen_range(0..Shape::ALL.len())];
            tracing::info!(%shape, "no shape keyword in prompt, picked one at random");
            ShapeDescriptor {
                shape,
                size,
                random: true,
            }
        }
    }
}
