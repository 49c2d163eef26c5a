//! Bounded retry around a decision source
//!
//! Valid decisions are kept; only agents still missing one are asked again.
//! Running out of attempts fails the whole turn.

use std::time::Duration;

use crate::core::config::TuningConfig;
use crate::core::error::{Result, SimError};
use crate::decision::parse::Decision;
use crate::decision::source::{DecisionRequest, DecisionSource};

#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
    pub backoff_factor: f32,
}

impl RetryPolicy {
    pub fn new(config: &TuningConfig) -> Self {
        Self {
            max_attempts: config.max_decision_attempts,
            backoff: config.retry_backoff(),
            backoff_factor: config.retry_backoff_factor,
        }
    }
}

/// Ask `source` until every request has a decision legal for its agent.
///
/// The returned decisions line up with `requests`.
pub fn collect_decisions(
    source: &mut dyn DecisionSource,
    requests: &[DecisionRequest],
    policy: &RetryPolicy,
) -> Result<Vec<Decision>> {
    let mut decided: Vec<Option<Decision>> = vec![None; requests.len()];
    let mut delay = policy.backoff;

    for attempt in 1..=policy.max_attempts {
        let pending: Vec<usize> = (0..requests.len()).filter(|&i| decided[i].is_none()).collect();
        if pending.is_empty() {
            break;
        }
        if attempt > 1 && !delay.is_zero() {
            std::thread::sleep(delay);
            delay = delay.mul_f32(policy.backoff_factor.max(1.0));
        }

        let batch: Vec<DecisionRequest> = pending.iter().map(|&i| requests[i].clone()).collect();
        let results = match source.decide(&batch) {
            Ok(results) => results,
            Err(err) => {
                tracing::warn!(attempt, error = %err, "decision source failed");
                continue;
            }
        };

        for (slot, result) in pending.iter().zip(results) {
            let request = &requests[*slot];
            match result.and_then(|decision| request.legal.validate(&decision).map(|_| decision)) {
                Ok(decision) => {
                    tracing::debug!(
                        agent = %request.agent_name,
                        decision = ?decision.to_payload(),
                        "decision accepted"
                    );
                    decided[*slot] = Some(decision);
                }
                Err(err) => {
                    tracing::warn!(attempt, agent = %request.agent_name, error = %err, "decision rejected");
                }
            }
        }
    }

    let missing = decided.iter().filter(|d| d.is_none()).count();
    if missing > 0 {
        return Err(SimError::RetriesExhausted {
            attempts: policy.max_attempts,
            pending: missing,
        });
    }
    Ok(decided.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::EntityId;
    use crate::decision::legal::LegalActions;
    use crate::skills::ActionKind;

    /// Returns invalid output `failures` times, then waits.
    /// Agents named in `stubborn` never get a valid answer.
    struct Flaky {
        failures: u32,
        stubborn: Vec<String>,
        calls: u32,
        batch_sizes: Vec<usize>,
    }

    impl Flaky {
        fn new(failures: u32, stubborn: &[&str]) -> Self {
            Self {
                failures,
                stubborn: stubborn.iter().map(|name| name.to_string()).collect(),
                calls: 0,
                batch_sizes: Vec::new(),
            }
        }
    }

    impl DecisionSource for Flaky {
        fn decide(&mut self, requests: &[DecisionRequest]) -> Result<Vec<Result<Decision>>> {
            self.calls += 1;
            self.batch_sizes.push(requests.len());
            Ok(requests
                .iter()
                .enumerate()
                .map(|(i, request)| {
                    let stubborn = self.stubborn.contains(&request.agent_name);
                    // The first request in every batch is otherwise fine
                    if !stubborn && (i == 0 || self.calls > self.failures) {
                        Ok(Decision::wait())
                    } else {
                        Ok(Decision::new(ActionKind::Shoot, vec![EntityId::new()]))
                    }
                })
                .collect())
        }
    }

    fn requests(n: usize) -> Vec<DecisionRequest> {
        (0..n)
            .map(|i| {
                let mut legal = LegalActions::default();
                legal.insert(ActionKind::Wait, Vec::new());
                DecisionRequest {
                    agent: EntityId::new(),
                    agent_name: format!("Agent {}", i),
                    prompt: String::new(),
                    legal,
                }
            })
            .collect()
    }

    fn policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            backoff: Duration::ZERO,
            backoff_factor: 2.0,
        }
    }

    #[test]
    fn test_only_pending_agents_are_asked_again() {
        let mut source = Flaky::new(1, &[]);
        let decisions = collect_decisions(&mut source, &requests(3), &policy(5)).unwrap();
        assert_eq!(decisions.len(), 3);
        assert_eq!(source.batch_sizes, vec![3, 2]);
    }

    #[test]
    fn test_exhausted_retries_fail_the_turn() {
        let mut source = Flaky::new(0, &["Agent 2"]);
        let result = collect_decisions(&mut source, &requests(3), &policy(5));
        assert!(matches!(
            result,
            Err(SimError::RetriesExhausted { attempts: 5, pending: 1 })
        ));
        assert_eq!(source.calls, 5);
        assert_eq!(source.batch_sizes, vec![3, 1, 1, 1, 1]);
    }

    #[test]
    fn test_every_agent_failing_keeps_all_pending() {
        let mut source = Flaky::new(10, &["Agent 0", "Agent 1", "Agent 2"]);
        let result = collect_decisions(&mut source, &requests(3), &policy(4));
        assert!(matches!(
            result,
            Err(SimError::RetriesExhausted { attempts: 4, pending: 3 })
        ));
        assert_eq!(source.batch_sizes, vec![3, 3, 3, 3]);
    }

    #[test]
    fn test_no_requests_is_trivially_done() {
        let mut source = Flaky::new(0, &[]);
        assert!(collect_decisions(&mut source, &[], &policy(5)).unwrap().is_empty());
        assert_eq!(source.calls, 0);
    }
}
