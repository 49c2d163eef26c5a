//! Decision sources: whatever picks the agents' actions
//!
//! The engine hands a source one request per live agent and gets back one
//! fallible decision per request. The source may batch the work however it
//! likes; an `Err` for the whole call means nothing came back at all.

use std::collections::VecDeque;
use std::io::{BufRead, Write};

use ahash::AHashMap;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::core::error::{Result, SimError};
use crate::core::types::EntityId;
use crate::decision::legal::LegalActions;
use crate::decision::parse::{parse_decision, Decision};

/// Everything a source needs to decide for one agent
#[derive(Debug, Clone)]
pub struct DecisionRequest {
    pub agent: EntityId,
    pub agent_name: String,
    /// Full situational prompt: status, briefing and options
    pub prompt: String,
    pub legal: LegalActions,
}

pub trait DecisionSource {
    /// One result per request, in request order
    fn decide(&mut self, requests: &[DecisionRequest]) -> Result<Vec<Result<Decision>>>;
}

/// Canned raw responses per agent; an agent with nothing queued waits
#[derive(Debug, Default)]
pub struct ScriptedSource {
    scripts: AHashMap<EntityId, VecDeque<String>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw oracle response for `agent`
    pub fn push(&mut self, agent: EntityId, response: impl Into<String>) -> &mut Self {
        self.scripts.entry(agent).or_default().push_back(response.into());
        self
    }

    /// Queue a structured decision for `agent`
    pub fn push_decision(&mut self, agent: EntityId, decision: &Decision) -> Result<&mut Self> {
        let json = serde_json::to_string(&decision.to_payload())?;
        Ok(self.push(agent, json))
    }

    pub fn remaining(&self, agent: EntityId) -> usize {
        self.scripts.get(&agent).map_or(0, VecDeque::len)
    }
}

impl DecisionSource for ScriptedSource {
    fn decide(&mut self, requests: &[DecisionRequest]) -> Result<Vec<Result<Decision>>> {
        Ok(requests
            .iter()
            .map(|request| {
                match self.scripts.get_mut(&request.agent).and_then(VecDeque::pop_front) {
                    Some(response) => parse_decision(&response),
                    None => Ok(Decision::wait()),
                }
            })
            .collect())
    }
}

/// Picks uniformly among the legal options
#[derive(Debug)]
pub struct RandomSource {
    rng: ChaCha8Rng,
}

impl RandomSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl DecisionSource for RandomSource {
    fn decide(&mut self, requests: &[DecisionRequest]) -> Result<Vec<Result<Decision>>> {
        let mut out = Vec::with_capacity(requests.len());
        for request in requests {
            let actions: Vec<_> = request.legal.iter().collect();
            let decision = match actions.choose(&mut self.rng) {
                Some(&(action, options)) => {
                    let arguments = options
                        .choose(&mut self.rng)
                        .filter(|_| action.arity() > 0)
                        .map(|option| vec![option.id])
                        .unwrap_or_default();
                    Ok(Decision::new(action, arguments).with_reasoning("picked at random"))
                }
                None => Err(SimError::DecisionSource(format!(
                    "no legal actions for {}",
                    request.agent_name
                ))),
            };
            out.push(decision);
        }
        Ok(out)
    }
}

/// Operator at a terminal, choosing by option index
pub struct ManualSource<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ManualSource<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> DecisionSource for ManualSource<R, W> {
    fn decide(&mut self, requests: &[DecisionRequest]) -> Result<Vec<Result<Decision>>> {
        let mut out = Vec::with_capacity(requests.len());
        for request in requests {
            write!(
                self.output,
                "{}\n{} action: ",
                request.legal.describe_manual(),
                request.agent_name
            )?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(SimError::DecisionSource("operator input closed".into()));
            }
            out.push(request.legal.resolve_manual(&line));
        }
        Ok(out)
    }
}
