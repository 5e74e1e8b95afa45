//! Random test data
//!
//! Values look realistic and are fully determined by the seed. The runner
//! draws a fresh seed unless one is configured, and logs it.

use rand::distributions::{Alphanumeric, DistString};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

const FIRST_NAMES: &[&str] = &[
    "Olivia", "Liam", "Emma", "Noah", "Amelia", "Oliver", "Sophia", "Elijah", "Mia", "Lucas",
    "Harper", "Mateo", "Evelyn", "Levi", "Aria", "Ezra", "Chloe", "Kai", "Nora", "Hiroshi",
    "Priya", "Tomasz", "Ingrid", "Kwame",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Garcia", "Miller", "Davis", "Rodriguez", "Martinez",
    "Hernandez", "Lopez", "Wilson", "Anderson", "Thomas", "Taylor", "Moore", "Nakamura", "Okafor",
    "Kowalski", "Larsen", "Patel", "Schmidt",
];

const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Input for a signup or signin attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

pub struct DataGenerator {
    rng: StdRng,
}

impl DataGenerator {
    pub fn seeded(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }

    pub fn first_name(&mut self) -> String {
        FIRST_NAMES.choose(&mut self.rng).copied().unwrap_or("Alex").to_string()
    }

    pub fn last_name(&mut self) -> String {
        LAST_NAMES.choose(&mut self.rng).copied().unwrap_or("Doe").to_string()
    }

    /// Something like `Olivia.Smith42` or `liam_garcia`
    pub fn username(&mut self) -> String {
        let first = self.first_name();
        let last = self.last_name();
        match self.rng.gen_range(0..3) {
            0 => format!("{}.{}{}", first, last, self.rng.gen_range(1..100)),
            1 => format!("{}_{}", first.to_lowercase(), last.to_lowercase()),
            _ => format!("{}{}", first, self.rng.gen_range(10..10_000)),
        }
    }

    pub fn email(&mut self, domain: &str) -> String {
        format!("{}@{}", self.username(), domain)
    }

    pub fn alpha(&mut self, len: usize) -> String {
        (0..len)
            .map(|_| LETTERS[self.rng.gen_range(0..LETTERS.len())] as char)
            .collect()
    }

    pub fn alphanumeric(&mut self, len: usize) -> String {
        Alphanumeric.sample_string(&mut self.rng, len)
    }

    /// Alphanumeric string guaranteed to contain at least one letter
    pub fn alphanumeric_with_letter(&mut self, len: usize) -> String {
        if len == 0 {
            return String::new();
        }
        let mut chars: Vec<char> = self.alphanumeric(len).chars().collect();
        if !chars.iter().any(|c| c.is_ascii_alphabetic()) {
            let at = self.rng.gen_range(0..len);
            chars[at] = LETTERS[self.rng.gen_range(0..LETTERS.len())] as char;
        }
        chars.into_iter().collect()
    }

    pub fn password(&mut self) -> String {
        self.alphanumeric(15)
    }

    /// Full signup input at `domain` with the given password
    pub fn credentials(&mut self, domain: &str, password: &str) -> Credentials {
        Credentials {
            email: self.email(domain),
            first_name: self.first_name(),
            last_name: self.last_name(),
            password: password.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0 ; "empty")]
    #[test_case(40 ; "name limit")]
    #[test_case(41 ; "over name limit")]
    #[test_case(300 ; "long email local part")]
    fn test_lengths_are_exact(len: usize) {
        let mut data = DataGenerator::seeded(7);
        assert_eq!(data.alpha(len).chars().count(), len);
        assert_eq!(data.alphanumeric(len).chars().count(), len);
        assert_eq!(data.alphanumeric_with_letter(len).chars().count(), len);
    }

    #[test]
    fn test_alpha_is_letters_only() {
        let mut data = DataGenerator::seeded(1);
        assert!(data.alpha(200).chars().all(|c| c.is_ascii_alphabetic()));
    }

    #[test]
    fn test_alphanumeric_with_letter_always_has_letter() {
        let mut data = DataGenerator::seeded(3);
        for _ in 0..500 {
            assert!(data.alphanumeric_with_letter(2).chars().any(|c| c.is_ascii_alphabetic()));
        }
    }

    #[test]
    fn test_usernames_are_email_safe() {
        let mut data = DataGenerator::seeded(11);
        for _ in 0..200 {
            let username = data.username();
            assert!(!username.is_empty());
            assert!(!username.starts_with('.'));
            assert!(!username.contains(".."));
            assert!(username.chars().all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_'));
        }
    }

    #[test]
    fn test_seed_is_reproducible() {
        let a = DataGenerator::seeded(42).credentials("abcdef.com", "Password123!123");
        let b = DataGenerator::seeded(42).credentials("abcdef.com", "Password123!123");
        assert_eq!(a, b);
        assert!(a.email.ends_with("@abcdef.com"));
    }
}
