pub mod lemmatizer;
pub mod phrasal_verbs;
pub mod practice_session;
pub mod session_store;
pub mod usage_validator;
