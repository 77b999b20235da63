use std::sync::{Arc, OnceLock};

use regex::Regex;
use serde::Serialize;

use super::lemmatizer::{Lemmatizer, MAX_WORD_LEN};

static PUNCTUATION: OnceLock<Regex> = OnceLock::new();

fn punctuation() -> &'static Regex {
    PUNCTUATION.get_or_init(|| Regex::new(r"[^\w\s]").expect("valid punctuation pattern"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchPolicy {
    /// Verb root compared against lemmatized tokens, particles matched literally.
    Lemmatized,
    /// Whole phrase must appear verbatim in the sentence.
    Literal,
}

/// Decides whether a learner sentence uses a target phrasal verb.
///
/// Particle order and adjacency are deliberately not checked, so separated
/// forms such as "turn the music down" are accepted for "turn down".
#[derive(Clone)]
pub struct UsageValidator {
    lemmatizer: Option<Arc<dyn Lemmatizer>>,
}

impl UsageValidator {
    pub fn new(lemmatizer: Option<Arc<dyn Lemmatizer>>) -> Self {
        Self { lemmatizer }
    }

    pub fn literal() -> Self {
        Self { lemmatizer: None }
    }

    pub fn policy(&self) -> MatchPolicy {
        if self.lemmatizer.is_some() {
            MatchPolicy::Lemmatized
        } else {
            MatchPolicy::Literal
        }
    }

    pub fn validate(&self, sentence: &str, target_phrase: &str) -> bool {
        if sentence.trim().is_empty() {
            return false;
        }

        let target = target_phrase.to_lowercase();
        let mut parts = target.split_whitespace();
        let Some(verb_root) = parts.next() else {
            return false;
        };
        let particles: Vec<&str> = parts.collect();
        let lowered = sentence.to_lowercase();

        let Some(lemmatizer) = self.lemmatizer.as_deref() else {
            return literal_match(&lowered, verb_root, &particles);
        };

        let cleaned = punctuation().replace_all(&lowered, "");
        let root_present = cleaned.split_whitespace().any(|token| {
            if token.len() > MAX_WORD_LEN {
                token == verb_root
            } else {
                lemmatizer.lemmatize_verb(token) == verb_root
            }
        });

        root_present && particles.iter().all(|particle| lowered.contains(particle))
    }
}

fn literal_match(lowered_sentence: &str, verb_root: &str, particles: &[&str]) -> bool {
    let phrase = std::iter::once(verb_root)
        .chain(particles.iter().copied())
        .collect::<Vec<_>>()
        .join(" ");
    lowered_sentence.contains(&phrase)
}

impl std::fmt::Debug for UsageValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UsageValidator")
            .field("policy", &self.policy())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::lemmatizer::tests::sample_lemmatizer;

    fn lemmatizing() -> UsageValidator {
        UsageValidator::new(Some(Arc::new(sample_lemmatizer())))
    }

    #[test]
    fn conjugated_root_with_particles() {
        assert!(lemmatizing().validate("I came up with a plan", "come up with"));
        assert!(lemmatizing().validate("She comes up with ideas daily.", "come up with"));
    }

    #[test]
    fn separated_particle_is_accepted() {
        assert!(lemmatizing().validate("He turned the music down", "turn down"));
    }

    #[test]
    fn missing_root_is_rejected() {
        assert!(!lemmatizing().validate("I like music", "come up with"));
    }

    #[test]
    fn missing_particle_is_rejected() {
        assert!(!lemmatizing().validate("I came with a plan", "come up with"));
    }

    #[test]
    fn empty_sentence_is_rejected() {
        assert!(!lemmatizing().validate("", "come up with"));
        assert!(!lemmatizing().validate("   ", "turn down"));
        assert!(!UsageValidator::literal().validate("", "come up with"));
    }

    #[test]
    fn blank_target_is_rejected() {
        assert!(!lemmatizing().validate("I came up with a plan", "  "));
    }

    #[test]
    fn particle_order_is_not_enforced() {
        assert!(lemmatizing().validate("with I came up", "come up with"));
    }

    #[test]
    fn punctuation_and_case_are_ignored() {
        assert!(lemmatizing().validate("Yesterday, I CAME UP WITH it!", "Come up with"));
        assert!(lemmatizing().validate("Don't give up!", "give up"));
    }

    #[test]
    fn particles_match_as_substrings_of_the_sentence() {
        // "up" is found inside "cup"; the check is presence only.
        assert!(lemmatizing().validate("She took the cup", "take up"));
    }

    #[test]
    fn literal_fallback_diverges_on_conjugated_forms() {
        let sentence = "I came up with a plan";
        assert!(lemmatizing().validate(sentence, "come up with"));
        assert!(!UsageValidator::literal().validate(sentence, "come up with"));
    }

    #[test]
    fn literal_fallback_accepts_exact_phrase() {
        let validator = UsageValidator::literal();
        assert!(validator.validate("We need to Come Up With a name.", "come up  with"));
        assert!(!validator.validate("He turned the music down", "turn down"));
    }

    #[test]
    fn overlong_tokens_are_not_lemmatized() {
        let sentence = format!("{} up with", "s".repeat(200_000));
        let started = std::time::Instant::now();
        assert!(!lemmatizing().validate(&sentence, "come up with"));
        assert!(started.elapsed() < std::time::Duration::from_secs(2));

        let sentence = format!("{} came up with it", "s".repeat(200_000));
        assert!(lemmatizing().validate(&sentence, "come up with"));
    }

    #[test]
    fn reports_active_policy() {
        assert_eq!(lemmatizing().policy(), MatchPolicy::Lemmatized);
        assert_eq!(UsageValidator::literal().policy(), MatchPolicy::Literal);
    }
}
