//! Exchange state machine.
//!
//! ```text
//! Idle -> Requesting -> Streaming -> Completed -> Idle
//!             |             |
//!             +-------------+-----> Failed -> Idle
//! ```
//!
//! `Completed` and `Failed` are passed through on the way back to `Idle`; the
//! result is kept in [`ExchangeState::last_outcome`].

use std::fmt;

use crate::error::{ChatError, ChatResult};

/// Phase of the current request/response exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExchangePhase {
    #[default]
    Idle,
    Requesting,
    Streaming,
    Completed,
    Failed,
}

impl ExchangePhase {
    /// Whether an exchange is in flight
    pub fn is_busy(self) -> bool {
        matches!(self, ExchangePhase::Requesting | ExchangePhase::Streaming)
    }
}

impl fmt::Display for ExchangePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExchangePhase::Idle => "idle",
            ExchangePhase::Requesting => "requesting",
            ExchangePhase::Streaming => "streaming",
            ExchangePhase::Completed => "completed",
            ExchangePhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// How the last exchange ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeOutcome {
    Completed,
    Failed,
}

#[derive(Debug, Clone, Default)]
pub struct ExchangeState {
    phase: ExchangePhase,
    last_outcome: Option<ExchangeOutcome>,
    started: u64,
}

impl ExchangeState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> ExchangePhase {
        self.phase
    }

    pub fn last_outcome(&self) -> Option<ExchangeOutcome> {
        self.last_outcome
    }

    /// Number of exchanges started on this state
    pub fn started(&self) -> u64 {
        self.started
    }

    pub fn can_submit(&self) -> bool {
        !self.phase.is_busy()
    }

    /// `Idle -> Requesting`. Rejected while another exchange is in flight.
    pub fn begin(&mut self) -> ChatResult<()> {
        if self.phase.is_busy() {
            return Err(ChatError::ExchangeBusy { phase: self.phase });
        }
        self.started += 1;
        self.set_phase(ExchangePhase::Requesting);
        Ok(())
    }

    /// `Requesting -> Streaming`
    pub fn mark_streaming(&mut self) -> ChatResult<()> {
        self.require(&[ExchangePhase::Requesting], ExchangePhase::Streaming)?;
        self.set_phase(ExchangePhase::Streaming);
        Ok(())
    }

    /// `Streaming -> Completed -> Idle`
    pub fn complete(&mut self) -> ChatResult<()> {
        self.require(&[ExchangePhase::Streaming], ExchangePhase::Completed)?;
        self.finish(ExchangePhase::Completed, ExchangeOutcome::Completed);
        Ok(())
    }

    /// `Requesting | Streaming -> Failed -> Idle`
    pub fn fail(&mut self) -> ChatResult<()> {
        self.require(
            &[ExchangePhase::Requesting, ExchangePhase::Streaming],
            ExchangePhase::Failed,
        )?;
        self.finish(ExchangePhase::Failed, ExchangeOutcome::Failed);
        Ok(())
    }

    fn require(&self, allowed: &[ExchangePhase], to: ExchangePhase) -> ChatResult<()> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(ChatError::InvalidTransition {
                from: self.phase,
                to,
            })
        }
    }

    fn finish(&mut self, terminal: ExchangePhase, outcome: ExchangeOutcome) {
        self.set_phase(terminal);
        self.last_outcome = Some(outcome);
        self.set_phase(ExchangePhase::Idle);
    }

    fn set_phase(&mut self, phase: ExchangePhase) {
        tracing::debug!("Exchange phase: {} -> {}", self.phase, phase);
        self.phase = phase;
    }
}
