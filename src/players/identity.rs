//! Random display names and colors handed out per session

use rand::seq::SliceRandom;
use rand::Rng;

const DESCRIPTORS: &[&str] = &[
    "Big",
    "Cool",
    "Zany",
    "Swell",
    "Great",
    "Jaunty",
    "Social",
    "Elegant",
    "Ancient",
    "Strange",
    "Electric",
    "Reclusive",
    "Brilliant",
    "Incredible",
    "Astounding",
    "Intelligent",
    "Inquisitive",
];

const ANIMALS: &[&str] = &[
    "Bug", "Bee", "Dog", "Cat", "Pug", "Bird", "Fish", "Frog", "Snake", "Koala", "Tapir", "Tiger",
    "Whale", "Zebra", "Insect", "Octopus", "Giraffe", "Elephant", "Wombat", "Anteater",
];

/// Colors a session may be assigned
pub const PALETTE: &[&str] = &[
    "#3DFAFF", // Aqua
    "#AFF9C9", // Mint
    "#D81E5B", // Ruby
    "#A44200", // Rust
    "#DE3F82", // Pink
    "#48BEFF", // Capri
    "#FFC2B4", // Melon
    "#FB8F67", // Coral
    "#F4B860", // Sunray
    "#99AA38", // Citron
    "#53DD6C", // Malachite
    "#C7DBE6", // Beau blue
    "#C83E4D", // Brick red
    "#DB5461", // Indian red
    "#9792E3", // Blue purple
    "#43C59E", // Ocean green
    "#3C32C3", // Persian blue
    "#009F93", // Persian green
    "#F8E16C", // Naples yellow
    "#00C49A", // Caribbean green
    "#C307ED", // Electric purple
];

/// Descriptor followed by an animal, e.g. `JauntyTapir`
pub fn random_display_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    let descriptor = DESCRIPTORS.choose(rng).copied().unwrap_or("Mystery");
    let animal = ANIMALS.choose(rng).copied().unwrap_or("Guest");
    format!("{descriptor}{animal}")
}

pub fn random_color<R: Rng + ?Sized>(rng: &mut R) -> String {
    PALETTE.choose(rng).copied().unwrap_or(PALETTE[0]).to_string()
}

/// Pick a palette color different from `exclude`.
pub fn random_color_excluding<R: Rng + ?Sized>(rng: &mut R, exclude: &str) -> String {
    let candidates: Vec<&str> = PALETTE
        .iter()
        .copied()
        .filter(|c| !c.eq_ignore_ascii_case(exclude))
        .collect();
    candidates
        .choose(rng)
        .copied()
        .unwrap_or(PALETTE[0])
        .to_string()
}
