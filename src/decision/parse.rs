//! Turning decision-source output into structured decisions
//!
//! Sources usually answer in free text with a JSON object somewhere inside.
//! Only the first `{` to the last `}` is parsed.

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};
use crate::core::types::EntityId;
use crate::skills::ActionKind;

/// Wire shape of a decision as the oracle writes it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionPayload {
    pub action: String,
    #[serde(default)]
    pub arguments: Vec<String>,
    #[serde(default)]
    pub reasoning: String,
}

impl DecisionPayload {
    pub fn into_decision(self) -> Result<Decision> {
        let action: ActionKind = self
            .action
            .parse()
            .map_err(|_| SimError::InvalidDecision(format!("unknown action '{}'", self.action)))?;

        let arguments = self
            .arguments
            .iter()
            .map(|raw| {
                EntityId::parse_str(raw.trim())
                    .ok_or_else(|| SimError::InvalidDecision(format!("'{}' is not an entity id", raw)))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Decision {
            action,
            arguments,
            reasoning: self.reasoning,
        })
    }
}

/// One agent's chosen action for the turn
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub action: ActionKind,
    pub arguments: Vec<EntityId>,
    pub reasoning: String,
}

impl Decision {
    pub fn new(action: ActionKind, arguments: Vec<EntityId>) -> Self {
        Self {
            action,
            arguments,
            reasoning: String::new(),
        }
    }

    pub fn wait() -> Self {
        Self::new(ActionKind::Wait, Vec::new())
    }

    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = reasoning.into();
        self
    }

    /// Back to the wire shape, e.g. for decision logs
    pub fn to_payload(&self) -> DecisionPayload {
        DecisionPayload {
            action: self.action.to_string(),
            arguments: self.arguments.iter().map(EntityId::to_string).collect(),
            reasoning: self.reasoning.clone(),
        }
    }
}

/// Slice out the outermost JSON object of a response
pub fn extract_json(response: &str) -> Result<&str> {
    let start = response
        .find('{')
        .ok_or_else(|| SimError::InvalidDecision("no JSON object in response".into()))?;
    let end = response
        .rfind('}')
        .ok_or_else(|| SimError::InvalidDecision("no closing brace in response".into()))?;
    if end < start {
        return Err(SimError::InvalidDecision("malformed JSON object in response".into()));
    }
    Ok(&response[start..=end])
}

pub fn parse_decision(response: &str) -> Result<Decision> {
    let json = extract_json(response)?;
    let payload: DecisionPayload = serde_json::from_str(json)?;
    payload.into_decision()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wrapped_response() {
        let id = EntityId::new();
        let response = format!(
            "Sure, here is my move:\n```json\n{{\"action\": \"sneak\", \"arguments\": [\"{}\"], \"reasoning\": \"guard is facing away\"}}\n```",
            id
        );
        let decision = parse_decision(&response).unwrap();
        assert_eq!(decision.action, ActionKind::Sneak);
        assert_eq!(decision.arguments, vec![id]);
        assert_eq!(decision.reasoning, "guard is facing away");
    }

    #[test]
    fn test_missing_fields_default() {
        let decision = parse_decision(r#"{"action": "hide"}"#).unwrap();
        assert_eq!(decision.action, ActionKind::Hide);
        assert!(decision.arguments.is_empty());
    }

    #[test]
    fn test_rejects_unknown_action_and_bad_ids() {
        assert!(matches!(
            parse_decision(r#"{"action": "teleport", "arguments": []}"#),
            Err(SimError::InvalidDecision(_))
        ));
        assert!(matches!(
            parse_decision(r#"{"action": "shoot", "arguments": ["guard-1"]}"#),
            Err(SimError::InvalidDecision(_))
        ));
    }

    #[test]
    fn test_no_json_is_error() {
        assert!(parse_decision("I will wait here.").is_err());
        assert!(parse_decision("} backwards {").is_err());
    }

    #[test]
    fn test_payload_round_trip_keeps_ids() {
        let id = EntityId::new();
        let decision = Decision::new(ActionKind::Capture, vec![id]).with_reasoning("grab it");
        let json = serde_json::to_string(&decision.to_payload()).unwrap();
        assert_eq!(parse_decision(&json).unwrap(), decision);
    }
}
