//! Source fingerprinting: a cheap strong-equality token distinguishing
//! "same logical name, different content" from "same logical name,
//! unchanged content".

use std::hash::{DefaultHasher, Hash, Hasher};

pub fn fingerprint_of(source: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    source.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_source_yields_identical_fingerprint() {
        assert_eq!(fingerprint_of("class A {}"), fingerprint_of("class A {}"));
    }

    #[test]
    fn differing_source_yields_differing_fingerprint() {
        assert_ne!(fingerprint_of("class A {}"), fingerprint_of("class B {}"));
    }
}
