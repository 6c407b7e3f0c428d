//! Speech synthesis worker

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc, watch};
use tracing::{debug, warn};

use super::{Segment, SynthesisRequest};
use crate::ports::SpeechPort;

/// Request queue shared by the worker pool
pub(crate) type SharedRequests = Arc<Mutex<mpsc::Receiver<SynthesisRequest>>>;

/// Turns requests into segments until stopped
///
/// A worker never writes files and never ends the run on its own: a failed
/// synthesis is reported as a segment carrying the error, and the worker
/// moves on to the next request.
pub(crate) struct SpeechWorker {
    id: usize,
    speech: Arc<dyn SpeechPort>,
    requests: SharedRequests,
    results: mpsc::Sender<Segment>,
    stop: watch::Receiver<bool>,
}

impl SpeechWorker {
    pub(crate) fn new(
        id: usize,
        speech: Arc<dyn SpeechPort>,
        requests: SharedRequests,
        results: mpsc::Sender<Segment>,
        stop: watch::Receiver<bool>,
    ) -> Self {
        Self {
            id,
            speech,
            requests,
            results,
            stop,
        }
    }

    /// Serve requests until stop is signalled or a queue closes
    pub(crate) async fn run(mut self) {
        debug!(worker = self.id, "Speech worker started");

        loop {
            let request = tokio::select! {
                biased;
                () = stopped(&mut self.stop) => break,
                request = next_request(&self.requests) => match request {
                    Some(request) => request,
                    None => break,
                },
            };

            let index = request.index;
            let outcome = tokio::select! {
                biased;
                () = stopped(&mut self.stop) => {
                    debug!(worker = self.id, index, "Abandoning synthesis");
                    break;
                },
                outcome = self
                    .speech
                    .synthesize(request.line.text.clone(), request.voice_config()) => outcome,
            };

            let segment = match outcome {
                Ok(result) => Segment::synthesized(index, request.line, result.audio_data),
                Err(e) => {
                    warn!(worker = self.id, index, error = %e, "Synthesis failed");
                    Segment::failed(index, request.line, e)
                },
            };

            let delivered = tokio::select! {
                biased;
                () = stopped(&mut self.stop) => false,
                sent = self.results.send(segment) => sent.is_ok(),
            };
            if !delivered {
                break;
            }
        }

        debug!(worker = self.id, "Speech worker stopped");
    }
}

/// Resolves once stop is signalled or the coordinator is gone
async fn stopped(stop: &mut watch::Receiver<bool>) {
    // An error means the sender was dropped, which also means stop
    let _ = stop.wait_for(|stop| *stop).await;
}

async fn next_request(requests: &SharedRequests) -> Option<SynthesisRequest> {
    requests.lock().await.recv().await
}
