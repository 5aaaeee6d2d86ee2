use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crate::predict_fetch::{PredictionRequest, PredictionTransport, request_prediction};
use crate::state::{CancelToken, Delta, ProviderCommand};

/// Runs submissions one at a time on a background thread until the command
/// channel closes or `Shutdown` arrives.
pub fn spawn_prediction_worker<T>(
    transport: T,
    api_url: String,
    tx: Sender<Delta>,
    cmd_rx: Receiver<ProviderCommand>,
) -> JoinHandle<()>
where
    T: PredictionTransport + 'static,
{
    thread::spawn(move || {
        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                ProviderCommand::Submit {
                    ticket,
                    request,
                    cancel,
                } => {
                    let delta = run_submission(&transport, &api_url, ticket, &request, &cancel, &tx);
                    if tx.send(delta).is_err() {
                        break;
                    }
                }
                ProviderCommand::Shutdown => break,
            }
        }
    })
}

/// Performs one POST and turns it into the delta the UI should apply. A
/// cancelled token short-circuits before the request and suppresses the
/// result after it.
pub fn run_submission(
    transport: &dyn PredictionTransport,
    api_url: &str,
    ticket: u64,
    request: &PredictionRequest,
    cancel: &CancelToken,
    tx: &Sender<Delta>,
) -> Delta {
    if cancel.is_cancelled() {
        return Delta::SubmitCancelled { ticket };
    }

    let started = Instant::now();
    let _ = tx.send(Delta::Log(format!("[INFO] POST {api_url} (#{ticket})")));
    let outcome = request_prediction(transport, api_url, request);
    let elapsed_ms = started.elapsed().as_millis();

    if cancel.is_cancelled() {
        let _ = tx.send(Delta::Log(format!(
            "[INFO] Response for #{ticket} arrived after cancel ({elapsed_ms} ms)"
        )));
        return Delta::SubmitCancelled { ticket };
    }

    if let Err(err) = &outcome {
        let _ = tx.send(Delta::Log(format!(
            "[WARN] Request #{ticket} failed after {elapsed_ms} ms: {err:?}"
        )));
    }
    Delta::SubmitFinished { ticket, outcome }
}
