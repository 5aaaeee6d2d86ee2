use std::sync::mpsc::Sender;
use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::config::Config;
use crate::debounce::Debouncer;
use crate::fields::Field;
use crate::form::Focus;
use crate::predict_fetch::{PredictionRequest, SubmitError};
use crate::state::{AppState, ProviderCommand};
use crate::validation::validate;

/// What a submit attempt turned into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitAttempt {
    /// A request went to the worker under this ticket.
    Sent(u64),
    /// Validation failed; the error panel is already rendered.
    Rejected,
    /// The worker could not be reached; the error panel is already rendered.
    Unavailable,
    /// Another submission is still in flight.
    Busy,
}

/// Binds key input to the form, runs per-field debounced checks on ticks,
/// and drives the submission state machine.
pub struct FormController {
    pub state: AppState,
    pub should_quit: bool,
    debounce: Debouncer<Field>,
    cmd_tx: Option<Sender<ProviderCommand>>,
}

impl FormController {
    pub fn new(state: AppState, config: &Config, cmd_tx: Option<Sender<ProviderCommand>>) -> Self {
        Self {
            state,
            should_quit: false,
            debounce: Debouncer::new(config.debounce),
            cmd_tx,
        }
    }

    pub fn pending_checks(&self) -> usize {
        self.debounce.pending()
    }

    pub fn on_key(&mut self, key: KeyEvent, now: Instant) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') if ctrl => self.should_quit = true,
            KeyCode::Char('s') if ctrl => {
                self.submit(now);
            }
            KeyCode::Enter => {
                self.submit(now);
            }
            KeyCode::Esc => {
                if self.state.help_overlay {
                    self.state.help_overlay = false;
                } else {
                    self.cancel_submission("cancelled by user");
                }
            }
            KeyCode::F(1) => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Tab | KeyCode::Down => self.state.form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.state.form.focus_prev(),
            KeyCode::Backspace => {
                if let Some(field) = self.state.form.backspace() {
                    self.on_field_edited(field, now);
                }
            }
            KeyCode::Delete => {
                if let Some(field) = self.state.form.clear_focused() {
                    self.on_field_edited(field, now);
                }
            }
            KeyCode::Char(c) if !ctrl => {
                if let Some(field) = self.state.form.insert_char(c) {
                    self.on_field_edited(field, now);
                }
            }
            _ => {}
        }
    }

    /// Restarts `field`'s quiet period. An edit during a submission makes the
    /// in-flight values stale, so that submission is cancelled.
    pub fn on_field_edited(&mut self, field: Field, now: Instant) {
        self.debounce.trigger(field, now);
        if self.state.is_submitting() {
            self.cancel_submission(&format!("{} edited", field.element_id()));
        }
    }

    /// Runs every due field check against the field's current text.
    pub fn tick(&mut self, now: Instant) {
        for field in self.debounce.take_due(now) {
            self.state.form.apply_check(field);
        }
        self.state.advance_spinner();
    }

    pub fn submit(&mut self, now: Instant) -> SubmitAttempt {
        let Some((ticket, cancel)) = self.state.begin_submit(now) else {
            self.state
                .push_log("[INFO] Submit ignored: a prediction is already in progress");
            return SubmitAttempt::Busy;
        };

        let values = self.state.form.collect();
        let errors = validate(&values);
        if !errors.is_empty() {
            self.state.finish_submit(ticket, Err(SubmitError::Validation(errors)));
            return SubmitAttempt::Rejected;
        }

        let request = match PredictionRequest::from_values(&values) {
            Ok(request) => request,
            Err(err) => {
                self.state.finish_submit(ticket, Err(err));
                return SubmitAttempt::Rejected;
            }
        };

        let Some(tx) = &self.cmd_tx else {
            self.state.finish_submit(
                ticket,
                Err(SubmitError::Unexpected(
                    "Prediction service is not configured".to_string(),
                )),
            );
            return SubmitAttempt::Unavailable;
        };
        if tx
            .send(ProviderCommand::Submit {
                ticket,
                request,
                cancel,
            })
            .is_err()
        {
            self.state.finish_submit(
                ticket,
                Err(SubmitError::Network("Prediction worker stopped".to_string())),
            );
            return SubmitAttempt::Unavailable;
        }

        self.state
            .push_log(format!("[INFO] Prediction request #{ticket} sent"));
        SubmitAttempt::Sent(ticket)
    }

    pub fn cancel_submission(&mut self, reason: &str) -> bool {
        self.state.cancel_submit(reason).is_some()
    }

    pub fn shutdown(&mut self) {
        self.cancel_submission("shutting down");
        if let Some(tx) = self.cmd_tx.take() {
            let _ = tx.send(ProviderCommand::Shutdown);
        }
    }

    pub fn focus_is_submit(&self) -> bool {
        self.state.form.focus == Focus::Submit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn controller() -> (FormController, mpsc::Receiver<ProviderCommand>) {
        let (tx, rx) = mpsc::channel();
        let ctrl = FormController::new(AppState::new(), &Config::default(), Some(tx));
        (ctrl, rx)
    }

    #[test]
    fn typing_schedules_one_check_per_field() {
        let (mut ctrl, _rx) = controller();
        let t0 = Instant::now();
        ctrl.on_key(press(KeyCode::Char('1')), t0);
        ctrl.on_key(press(KeyCode::Char('2')), t0 + Duration::from_millis(100));
        assert_eq!(ctrl.pending_checks(), 1);

        ctrl.tick(t0 + Duration::from_millis(350));
        assert!(ctrl.state.form.field(Field::ExpectedGoals).error.is_none());
        assert_eq!(ctrl.pending_checks(), 1);

        ctrl.tick(t0 + Duration::from_millis(400));
        assert_eq!(
            ctrl.state.form.field(Field::ExpectedGoals).error.as_deref(),
            Some("Maximum value is 10")
        );
        assert_eq!(ctrl.pending_checks(), 0);
    }

    #[test]
    fn ctrl_c_quits_but_plain_c_types() {
        let (mut ctrl, _rx) = controller();
        let now = Instant::now();
        ctrl.on_key(press(KeyCode::Char('c')), now);
        assert!(!ctrl.should_quit);
        assert_eq!(ctrl.state.form.field(Field::ExpectedGoals).buffer, "c");
        ctrl.on_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), now);
        assert!(ctrl.should_quit);
    }

    #[test]
    fn edit_during_submission_supersedes_it() {
        let (mut ctrl, rx) = controller();
        let now = Instant::now();
        for (field, value) in [
            (Field::ExpectedGoals, "1.5"),
            (Field::ExpectedGoalsAgainst, "1.0"),
            (Field::Possession, "55"),
            (Field::ExpectedAssists, "0.8"),
            (Field::KeyPasses, "10"),
            (Field::PassesPenaltyArea, "20"),
            (Field::ProgressivePasses, "30"),
        ] {
            ctrl.state.form.set_value(field, value);
        }
        assert!(matches!(ctrl.submit(now), SubmitAttempt::Sent(_)));
        let Ok(ProviderCommand::Submit { cancel, .. }) = rx.try_recv() else {
            panic!("expected a submit command");
        };

        ctrl.on_key(press(KeyCode::Char('5')), now);
        assert!(cancel.is_cancelled());
        assert!(ctrl.state.submit_enabled());
    }

    #[test]
    fn missing_worker_renders_error() {
        let mut ctrl = FormController::new(AppState::new(), &Config::default(), None);
        for field in Field::ALL {
            ctrl.state.form.set_value(field, "1");
        }
        assert_eq!(ctrl.submit(Instant::now()), SubmitAttempt::Unavailable);
        assert!(ctrl.state.submit_enabled());
    }
}
