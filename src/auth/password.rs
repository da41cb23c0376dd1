use argon2::{password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use lazy_static::lazy_static;
use rand::rngs::OsRng;
use rand::Rng;
use regex::Regex;
use tracing::error;

pub fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

/// Fixed vocabulary for generated passphrases. 129 entries; three draws plus
/// a digit gives 9 * 129^3, about 19 million combinations. Passwords are
/// handed out by an admin out of band, so memorability wins over entropy.
const WORDS: &[&str] = &[
    "Apple", "Anchor", "Bear", "Bird", "Bridge", "Cactus", "Castle", "Cloud", "Comet", "Cost",
    "Craving", "Crown", "Dolphin", "Eagle", "Echo", "Falcon", "Feast", "Fire", "Flower", "Forest",
    "Fox", "Garden", "Ghost", "Giant", "Globe", "Goat", "Grape", "Hawk", "Hill", "Honey",
    "Horse", "House", "Island", "Jelly", "Joy", "King", "Kite", "Koala", "Lake", "Leaf",
    "Lemon", "Lettuce", "Light", "Lime", "Lion", "Llama", "Luck", "Luna", "Mango", "Maple",
    "Melon", "Mint", "Moon", "Moose", "Moss", "Mountain", "Mouse", "Night", "Nova", "Ocean",
    "Oink", "Olive", "Onion", "Otter", "Owl", "Panda", "Paralyses", "Peach", "Pearl", "Penguin",
    "Pine", "Pizza", "Planet", "Plum", "Polar", "Pond", "Pool", "Prize", "Pug", "Quest",
    "Rain", "Raven", "Reef", "River", "Robot", "Rocket", "Rose", "Ruby", "Sage", "Sand",
    "Sea", "Seal", "Shark", "Sheep", "Shell", "Ship", "Sky", "Snow", "Solar", "Spark",
    "Star", "Stone", "Storm", "Sun", "Swan", "Swift", "Taco", "Tiger", "Toast", "Tower",
    "Tree", "Tulip", "Turtle", "Valley", "View", "Vine", "Wave", "Whale", "Wind", "Wish",
    "Wolf", "Wood", "Wool", "World", "Worm", "Wren", "Yard", "Zebra", "Zen",
];

/// Generate a memorable passphrase shaped `Word9#Word#Word`. Words are drawn
/// independently with replacement; the digit is uniform in 1-9.
pub fn generate_password() -> String {
    let mut rng = rand::thread_rng();
    let word1 = WORDS[rng.gen_range(0..WORDS.len())];
    let digit = rng.gen_range(1..=9);
    let word2 = WORDS[rng.gen_range(0..WORDS.len())];
    let word3 = WORDS[rng.gen_range(0..WORDS.len())];
    format!("{word1}{digit}#{word2}#{word3}")
}
