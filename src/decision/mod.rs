//! Agent decisions: what is legal, how it is asked for, how answers are checked
//!
//! The engine never talks to an oracle directly. It builds a
//! [`DecisionRequest`] per live agent, hands the batch to a
//! [`DecisionSource`], and keeps asking (boundedly) until every agent has a
//! decision that is legal for it this turn.

pub mod legal;
pub mod parse;
pub mod prompt;
pub mod retry;
pub mod source;

pub use legal::{ArgumentOption, LegalActions};
pub use parse::{extract_json, parse_decision, Decision, DecisionPayload};
pub use prompt::{decision_prompt, knowledge_base, status_description};
pub use retry::{collect_decisions, RetryPolicy};
pub use source::{DecisionRequest, DecisionSource, ManualSource, RandomSource, ScriptedSource};
