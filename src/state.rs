use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use chrono::Local;

use crate::form::FormState;
use crate::predict_fetch::{PredictionRequest, PredictionResult, SubmitError};

const MAX_LOGS: usize = 200;

/// Shared flag between the controller and the worker for one submission.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone)]
pub enum SubmitPhase {
    Idle,
    Submitting {
        ticket: u64,
        cancel: CancelToken,
        started: Instant,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResultPanel {
    Empty,
    Success {
        result: PredictionResult,
        received_at: String,
    },
    Failure {
        message: String,
    },
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub form: FormState,
    pub phase: SubmitPhase,
    pub result: ResultPanel,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
    pub spinner_frame: usize,
    next_ticket: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::with_form(FormState::new())
    }

    pub fn with_form(form: FormState) -> Self {
        Self {
            form,
            phase: SubmitPhase::Idle,
            result: ResultPanel::Empty,
            logs: VecDeque::new(),
            help_overlay: false,
            spinner_frame: 0,
            next_ticket: 1,
        }
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.phase, SubmitPhase::Submitting { .. })
    }

    /// The submit control is disabled for the whole round-trip.
    pub fn submit_enabled(&self) -> bool {
        !self.is_submitting()
    }

    pub fn in_flight_ticket(&self) -> Option<u64> {
        match &self.phase {
            SubmitPhase::Submitting { ticket, .. } => Some(*ticket),
            SubmitPhase::Idle => None,
        }
    }

    /// Idle -> Submitting. Returns the new ticket and its cancel token, or
    /// `None` when a submission is already in flight.
    pub fn begin_submit(&mut self, now: Instant) -> Option<(u64, CancelToken)> {
        if self.is_submitting() {
            return None;
        }
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        let cancel = CancelToken::new();
        self.phase = SubmitPhase::Submitting {
            ticket,
            cancel: cancel.clone(),
            started: now,
        };
        self.spinner_frame = 0;
        Some((ticket, cancel))
    }

    /// Submitting -> Idle with a rendered outcome. Returns false (and leaves
    /// everything untouched) when `ticket` is not the one in flight.
    pub fn finish_submit(
        &mut self,
        ticket: u64,
        outcome: Result<PredictionResult, SubmitError>,
    ) -> bool {
        if self.in_flight_ticket() != Some(ticket) {
            return false;
        }
        self.phase = SubmitPhase::Idle;
        match outcome {
            Ok(result) => {
                self.push_log(format!("[INFO] Prediction received: {}", result.prediction));
                self.result = ResultPanel::Success {
                    result,
                    received_at: Local::now().format("%H:%M:%S").to_string(),
                };
            }
            Err(err) => {
                let message = err.to_string();
                let first = message.lines().next().unwrap_or_default().to_string();
                self.push_log(format!("[WARN] Prediction failed: {first}"));
                self.result = ResultPanel::Failure { message };
            }
        }
        true
    }

    /// Flags the in-flight submission as cancelled and re-enables submit.
    pub fn cancel_submit(&mut self, reason: &str) -> Option<u64> {
        let SubmitPhase::Submitting { ticket, cancel, .. } = &self.phase else {
            return None;
        };
        let ticket = *ticket;
        cancel.cancel();
        self.phase = SubmitPhase::Idle;
        self.push_log(format!("[INFO] Submission #{ticket} cancelled: {reason}"));
        Some(ticket)
    }

    pub fn advance_spinner(&mut self) {
        if self.is_submitting() {
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        let stamp = Local::now().format("%H:%M:%S");
        self.logs.push_back(format!("{stamp} {}", msg.into()));
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}

#[derive(Debug)]
pub enum Delta {
    Log(String),
    SubmitFinished {
        ticket: u64,
        outcome: Result<PredictionResult, SubmitError>,
    },
    SubmitCancelled {
        ticket: u64,
    },
}

#[derive(Debug)]
pub enum ProviderCommand {
    Submit {
        ticket: u64,
        request: PredictionRequest,
        cancel: CancelToken,
    },
    Shutdown,
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::Log(msg) => state.push_log(msg),
        Delta::SubmitFinished { ticket, outcome } => {
            if !state.finish_submit(ticket, outcome) {
                state.push_log(format!("[INFO] Dropped stale response for submission #{ticket}"));
            }
        }
        Delta::SubmitCancelled { ticket } => {
            state.push_log(format!("[INFO] Worker discarded submission #{ticket}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok_result() -> PredictionResult {
        PredictionResult {
            prediction: "4-3-3".to_string(),
            confidence: Some(87.0),
        }
    }

    #[test]
    fn second_begin_is_refused_while_in_flight() {
        let mut state = AppState::new();
        let now = Instant::now();
        let (first, _) = state.begin_submit(now).expect("idle state accepts submit");
        assert!(state.begin_submit(now).is_none());
        assert!(state.finish_submit(first, Ok(ok_result())));
        let (second, _) = state.begin_submit(now).expect("idle again");
        assert!(second > first);
    }

    #[test]
    fn cancel_flags_token_and_drops_late_result() {
        let mut state = AppState::new();
        let (ticket, token) = state.begin_submit(Instant::now()).unwrap();
        assert_eq!(state.cancel_submit("edited"), Some(ticket));
        assert!(token.is_cancelled());
        assert!(state.submit_enabled());

        apply_delta(
            &mut state,
            Delta::SubmitFinished {
                ticket,
                outcome: Ok(ok_result()),
            },
        );
        assert_eq!(state.result, ResultPanel::Empty);
        assert!(state.logs.back().unwrap().contains("Dropped stale response"));
    }

    #[test]
    fn logs_are_bounded() {
        let mut state = AppState::new();
        for i in 0..(MAX_LOGS + 25) {
            state.push_log(format!("[INFO] line {i}"));
        }
        assert_eq!(state.logs.len(), MAX_LOGS);
        assert!(state.logs.back().unwrap().ends_with("line 224"));
    }
}
