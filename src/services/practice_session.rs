use rand::Rng;
use serde::Serialize;

use super::phrasal_verbs::{dictionary_url, sample_one, DataError, PhrasalVerbEntry};
use super::usage_validator::UsageValidator;

const DEFAULT_CATEGORY: &str = "General";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FeedbackKind {
    Correct,
    Incorrect,
    EmptyInput,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub kind: FeedbackKind,
    pub message: String,
}

impl Feedback {
    fn correct(phrase: &str) -> Self {
        Self {
            kind: FeedbackKind::Correct,
            message: format!("Detected a valid form of \"{phrase}\"."),
        }
    }

    fn incorrect(phrase: &str) -> Self {
        Self {
            kind: FeedbackKind::Incorrect,
            message: format!("Could not detect \"{phrase}\" in your sentence. Check the spelling?"),
        }
    }

    fn empty_input() -> Self {
        Self {
            kind: FeedbackKind::EmptyInput,
            message: "Write something first.".to_string(),
        }
    }
}

/// One learner's drill state: the card on screen and the last verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    current_entry: PhrasalVerbEntry,
    last_feedback: Option<Feedback>,
}

impl SessionState {
    pub fn start<R: Rng + ?Sized>(
        entries: &[PhrasalVerbEntry],
        rng: &mut R,
    ) -> Result<Self, DataError> {
        let entry = sample_one(entries, rng)?;
        Ok(Self {
            current_entry: entry.clone(),
            last_feedback: None,
        })
    }

    pub fn current_entry(&self) -> &PhrasalVerbEntry {
        &self.current_entry
    }

    pub fn last_feedback(&self) -> Option<&Feedback> {
        self.last_feedback.as_ref()
    }

    /// Verdict for a sentence written against `phrase`. Blank input is
    /// answered with a prompt and never reaches the validator. Needs no
    /// session, so callers can run it without holding the session lock.
    pub fn evaluate(phrase: &str, user_text: &str, validator: &UsageValidator) -> Feedback {
        if user_text.is_empty() {
            Feedback::empty_input()
        } else if validator.validate(user_text, phrase) {
            Feedback::correct(phrase)
        } else {
            Feedback::incorrect(phrase)
        }
    }

    /// Store a verdict produced for `phrase`. Returns false and drops it when
    /// the card has changed since, so feedback never lands on the wrong card.
    pub fn record_feedback(&mut self, phrase: &str, feedback: Feedback) -> bool {
        if self.current_entry.phrase != phrase {
            return false;
        }
        self.last_feedback = Some(feedback);
        true
    }

    /// Replace the card with a fresh random one. On failure the state is untouched.
    pub fn next<R: Rng + ?Sized>(
        &mut self,
        entries: &[PhrasalVerbEntry],
        rng: &mut R,
    ) -> Result<(), DataError> {
        *self = Self::start(entries, rng)?;
        Ok(())
    }

    pub fn render(&self, dictionary_base_url: &str) -> (CardView, Option<Feedback>) {
        (
            CardView::render(&self.current_entry, dictionary_base_url),
            self.last_feedback.clone(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardView {
    pub phrase: String,
    pub definition: String,
    pub example: String,
    pub category: String,
    pub dictionary_url: String,
}

impl CardView {
    pub fn render(entry: &PhrasalVerbEntry, dictionary_base_url: &str) -> Self {
        Self {
            phrase: entry.phrase.clone(),
            definition: entry.definition.clone(),
            example: entry.example.clone(),
            category: entry
                .category
                .clone()
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            dictionary_url: dictionary_url(dictionary_base_url, &entry.phrase),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::services::lemmatizer::tests::sample_lemmatizer;

    const BASE: &str = "https://dictionary.cambridge.org/dictionary/english/";

    fn entry(phrase: &str, category: Option<&str>) -> PhrasalVerbEntry {
        PhrasalVerbEntry {
            phrase: phrase.to_string(),
            definition: format!("definition of {phrase}"),
            example: format!("example of {phrase}"),
            category: category.map(str::to_string),
        }
    }

    fn validator() -> UsageValidator {
        UsageValidator::new(Some(Arc::new(sample_lemmatizer())))
    }

    #[test]
    fn start_picks_a_dataset_member_without_feedback() {
        let entries = vec![entry("come up with", None), entry("turn down", None)];
        let mut rng = StdRng::seed_from_u64(1);
        let state = SessionState::start(&entries, &mut rng).unwrap();
        assert!(entries.contains(state.current_entry()));
        assert!(state.last_feedback().is_none());
    }

    #[test]
    fn start_on_empty_dataset_fails() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            SessionState::start(&[], &mut rng),
            Err(DataError::EmptyDataset)
        ));
    }

    fn submit(state: &mut SessionState, text: &str) -> Feedback {
        let phrase = state.current_entry().phrase.clone();
        let feedback = SessionState::evaluate(&phrase, text, &validator());
        assert!(state.record_feedback(&phrase, feedback.clone()));
        feedback
    }

    #[test]
    fn submit_records_verdicts() {
        let entries = vec![entry("turn down", None)];
        let mut rng = StdRng::seed_from_u64(1);
        let mut state = SessionState::start(&entries, &mut rng).unwrap();

        let feedback = submit(&mut state, "He turned the radio down");
        assert_eq!(feedback.kind, FeedbackKind::Correct);
        assert!(feedback.message.contains("turn down"));

        let feedback = submit(&mut state, "I like music");
        assert_eq!(feedback.kind, FeedbackKind::Incorrect);
        assert_eq!(state.last_feedback().map(|f| f.kind), Some(FeedbackKind::Incorrect));
    }

    #[test]
    fn empty_submission_prompts_instead_of_validating() {
        let feedback = SessionState::evaluate("turn down", "", &validator());
        assert_eq!(feedback.kind, FeedbackKind::EmptyInput);
        assert_eq!(feedback.message, "Write something first.");
    }

    #[test]
    fn huge_single_token_is_judged_quickly() {
        let sentence = format!("{} down", "s".repeat(200_000));
        let started = std::time::Instant::now();
        let feedback = SessionState::evaluate("turn down", &sentence, &validator());
        assert_eq!(feedback.kind, FeedbackKind::Incorrect);
        assert!(started.elapsed() < std::time::Duration::from_secs(2));
    }

    #[test]
    fn verdict_for_a_replaced_card_is_dropped() {
        let entries = vec![entry("turn down", None)];
        let mut rng = StdRng::seed_from_u64(1);
        let mut state = SessionState::start(&entries, &mut rng).unwrap();

        let stale = SessionState::evaluate("give up", "I gave up", &validator());
        assert!(!state.record_feedback("give up", stale));
        assert!(state.last_feedback().is_none());
    }

    #[test]
    fn next_replaces_card_and_clears_feedback() {
        let entries = vec![entry("turn down", None)];
        let mut rng = StdRng::seed_from_u64(1);
        let mut state = SessionState::start(&entries, &mut rng).unwrap();
        submit(&mut state, "nothing relevant");

        state.next(&entries, &mut rng).unwrap();
        assert_eq!(state.current_entry().phrase, "turn down");
        assert!(state.last_feedback().is_none());
    }

    #[test]
    fn failed_next_keeps_state() {
        let entries = vec![entry("turn down", None)];
        let mut rng = StdRng::seed_from_u64(1);
        let mut state = SessionState::start(&entries, &mut rng).unwrap();
        submit(&mut state, "");
        let before = state.clone();

        assert!(state.next(&[], &mut rng).is_err());
        assert_eq!(state, before);
    }

    #[test]
    fn render_carries_the_last_verdict() {
        let entries = vec![entry("turn down", None)];
        let mut rng = StdRng::seed_from_u64(1);
        let mut state = SessionState::start(&entries, &mut rng).unwrap();
        assert!(state.render(BASE).1.is_none());

        let feedback = submit(&mut state, "Turn it down");
        assert_eq!(state.render(BASE).1, Some(feedback));
    }

    #[test]
    fn card_defaults_category_and_links_dictionary() {
        let card = CardView::render(&entry("Come up with", None), BASE);
        assert_eq!(card.category, "General");
        assert_eq!(card.dictionary_url, format!("{BASE}Come-up-with"));

        let card = CardView::render(&entry("give up", Some("Effort")), BASE);
        assert_eq!(card.category, "Effort");
    }
}
