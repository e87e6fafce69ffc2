pub mod asked_set;
pub mod belief_state;
pub mod belief_updater;
pub mod candidate;
pub mod diagnosis_session;
pub mod question_catalog;
pub mod question_selector;
pub mod session_registry;
pub mod stopping_policy;
