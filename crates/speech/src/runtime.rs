//! Speech runtime integration.
//!
//! Bridges the sync game loop with async TTS processes.

use std::io::ErrorKind;
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::process::Command;
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::types::{AnnounceRequest, CompletionMode, MoleId, SpeechOutcome};
use crate::SpeechConfig;

/// Request delivered to the speech worker.
#[derive(Debug, Clone)]
pub enum SpeechRequest {
    Speak(AnnounceRequest),
    Cancel,
}

/// Settlement of one announcement, delivered to the game loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeechReport {
    pub mole_id: Option<MoleId>,
    pub outcome: SpeechOutcome,
}

/// Running speech instance.
pub struct SpeechRuntime {
    _rt: Runtime,
    req_tx: mpsc::UnboundedSender<SpeechRequest>,
    report_rx: mpsc::UnboundedReceiver<SpeechReport>,
}

impl SpeechRuntime {
    pub fn start(config: SpeechConfig) -> anyhow::Result<Self> {
        let (req_tx, req_rx) = mpsc::unbounded_channel::<SpeechRequest>();
        let (report_tx, report_rx) = mpsc::unbounded_channel::<SpeechReport>();

        let rt = Runtime::new().context("failed to create tokio runtime for speech")?;
        rt.spawn(run_speaker(config, req_rx, report_tx));

        Ok(Self {
            _rt: rt,
            req_tx,
            report_rx,
        })
    }

    pub fn announce(&self, request: AnnounceRequest) {
        let _ = self.req_tx.send(SpeechRequest::Speak(request));
    }

    /// Best-effort; returns immediately.
    pub fn cancel(&self) {
        let _ = self.req_tx.send(SpeechRequest::Cancel);
    }

    pub fn try_recv(&mut self) -> Option<SpeechReport> {
        self.report_rx.try_recv().ok()
    }
}

struct Utterance {
    text: String,
    cancel: mpsc::UnboundedSender<()>,
    handle: JoinHandle<()>,
}

impl Utterance {
    fn in_flight(&self) -> bool {
        !self.handle.is_finished()
    }

    fn cancel(self) {
        let _ = self.cancel.send(());
    }
}

/// Worker loop: one utterance at a time, newest wins when asked to.
pub async fn run_speaker(
    config: SpeechConfig,
    mut req_rx: mpsc::UnboundedReceiver<SpeechRequest>,
    report_tx: mpsc::UnboundedSender<SpeechReport>,
) {
    let config = Arc::new(config);
    let unsupported = Arc::new(AtomicBool::new(config.program().is_none()));
    let mut current: Option<Utterance> = None;

    while let Some(request) = req_rx.recv().await {
        let request = match request {
            SpeechRequest::Cancel => {
                if let Some(utterance) = current.take() {
                    utterance.cancel();
                }
                continue;
            }
            SpeechRequest::Speak(request) => request,
        };

        if unsupported.load(Ordering::Relaxed) {
            let _ = report_tx.send(SpeechReport {
                mole_id: request.mole_id,
                outcome: SpeechOutcome::unsupported(),
            });
            continue;
        }

        if let Some(utterance) = current.as_ref().filter(|u| u.in_flight()) {
            if utterance.text == request.text {
                debug!(text = %request.text, "duplicate announcement in flight");
                let _ = report_tx.send(SpeechReport {
                    mole_id: request.mole_id,
                    outcome: SpeechOutcome::started_after(0),
                });
                continue;
            }
        }

        if request.cancel_previous {
            if let Some(utterance) = current.take() {
                utterance.cancel();
            }
        }

        let (cancel_tx, cancel_rx) = mpsc::unbounded_channel();
        let text = request.text.clone();
        let handle = tokio::spawn(speak(
            Arc::clone(&config),
            request,
            cancel_rx,
            report_tx.clone(),
            Arc::clone(&unsupported),
        ));
        // Without cancel_previous the older utterance keeps playing on its own.
        current = Some(Utterance {
            text,
            cancel: cancel_tx,
            handle,
        });
    }
}

async fn speak(
    config: Arc<SpeechConfig>,
    request: AnnounceRequest,
    mut cancel_rx: mpsc::UnboundedReceiver<()>,
    report_tx: mpsc::UnboundedSender<SpeechReport>,
    unsupported: Arc<AtomicBool>,
) {
    let report = |outcome: SpeechOutcome| {
        let _ = report_tx.send(SpeechReport {
            mole_id: request.mole_id,
            outcome,
        });
    };

    let Some(program) = config.program() else {
        report(SpeechOutcome::unsupported());
        return;
    };

    let requested_at = Instant::now();
    let spawned = Command::new(program)
        .args(config.args_for(&request.text))
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn();
    let mut child = match spawned {
        Ok(child) => child,
        Err(err) => {
            if err.kind() == ErrorKind::NotFound {
                warn!(program, "speech command not found; speech disabled");
                unsupported.store(true, Ordering::Relaxed);
                report(SpeechOutcome::unsupported());
            } else {
                warn!(program, error = %err, "failed to start speech command");
                report(SpeechOutcome::failed());
            }
            return;
        }
    };
    let start_delay = requested_at.elapsed().as_millis().min(u32::MAX as u128) as u32;

    if request.completion == CompletionMode::OnStart {
        report(SpeechOutcome::started_after(start_delay));
        tokio::select! {
            _ = child.wait() => {}
            Some(()) = cancel_rx.recv() => {
                let _ = child.kill().await;
            }
        }
        return;
    }

    let timeout = tokio::time::sleep(Duration::from_millis(request.timeout_ms as u64));
    tokio::pin!(timeout);
    tokio::select! {
        _ = child.wait() => report(SpeechOutcome::finished(start_delay)),
        _ = &mut timeout => {
            report(SpeechOutcome {
                timed_out: true,
                ..SpeechOutcome::started_after(start_delay)
            });
            // Keep supervising so a later cancel can still stop it.
            tokio::select! {
                _ = child.wait() => {}
                Some(()) = cancel_rx.recv() => {
                    let _ = child.kill().await;
                }
            }
        }
        Some(()) = cancel_rx.recv() => {
            let _ = child.kill().await;
            report(SpeechOutcome {
                ended: true,
                ..SpeechOutcome::started_after(start_delay)
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ANNOUNCE_TIMEOUT_MS;

    fn config(program: &str) -> SpeechConfig {
        SpeechConfig {
            command: vec![program.to_string()],
            rate_percent: 50,
        }
    }

    async fn next_report(rx: &mut mpsc::UnboundedReceiver<SpeechReport>) -> SpeechReport {
        tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("speech report timed out")
            .expect("speech worker gone")
    }

    #[test]
    fn test_missing_command_reports_unsupported() {
        tokio_test::block_on(async {
            let (req_tx, req_rx) = mpsc::unbounded_channel();
            let (report_tx, mut report_rx) = mpsc::unbounded_channel();
            let worker = tokio::spawn(run_speaker(
                config("whack-a-braille-no-such-tts"),
                req_rx,
                report_tx,
            ));

            req_tx
                .send(SpeechRequest::Speak(AnnounceRequest::for_mole(
                    MoleId(1),
                    "a",
                    ANNOUNCE_TIMEOUT_MS,
                )))
                .unwrap();
            let report = next_report(&mut report_rx).await;
            assert_eq!(report.mole_id, Some(MoleId(1)));
            assert!(report.outcome.unsupported);
            assert!(!report.outcome.started);

            // Subsequent requests short-circuit.
            req_tx
                .send(SpeechRequest::Speak(AnnounceRequest::message("b")))
                .unwrap();
            assert!(next_report(&mut report_rx).await.outcome.unsupported);

            drop(req_tx);
            worker.await.unwrap();
        });
    }

    #[tokio::test]
    async fn test_spawn_counts_as_start() {
        let (req_tx, req_rx) = mpsc::unbounded_channel();
        let (report_tx, mut report_rx) = mpsc::unbounded_channel();
        tokio::spawn(run_speaker(config("true"), req_rx, report_tx));

        req_tx
            .send(SpeechRequest::Speak(AnnounceRequest::for_mole(
                MoleId(3),
                "c",
                ANNOUNCE_TIMEOUT_MS,
            )))
            .unwrap();
        let report = next_report(&mut report_rx).await;
        assert_eq!(report.mole_id, Some(MoleId(3)));
        assert!(report.outcome.started);
        assert!(report.outcome.start_delay_ms.is_some());
    }

    #[tokio::test]
    async fn test_on_end_waits_for_exit() {
        let (req_tx, req_rx) = mpsc::unbounded_channel();
        let (report_tx, mut report_rx) = mpsc::unbounded_channel();
        tokio::spawn(run_speaker(config("true"), req_rx, report_tx));

        let request = AnnounceRequest {
            completion: CompletionMode::OnEnd,
            timeout_ms: 5_000,
            ..AnnounceRequest::message("done")
        };
        req_tx.send(SpeechRequest::Speak(request)).unwrap();
        let report = next_report(&mut report_rx).await;
        assert!(report.outcome.started);
        assert!(report.outcome.ended);
        assert!(!report.outcome.timed_out);
    }

    #[tokio::test]
    async fn test_identical_text_in_flight_is_deduplicated() {
        let (req_tx, req_rx) = mpsc::unbounded_channel();
        let (report_tx, mut report_rx) = mpsc::unbounded_channel();
        tokio::spawn(run_speaker(config("sleep"), req_rx, report_tx));

        req_tx
            .send(SpeechRequest::Speak(AnnounceRequest::for_mole(
                MoleId(1),
                "2",
                ANNOUNCE_TIMEOUT_MS,
            )))
            .unwrap();
        let first = next_report(&mut report_rx).await;
        assert_eq!(first.mole_id, Some(MoleId(1)));
        assert!(first.outcome.started);

        req_tx
            .send(SpeechRequest::Speak(AnnounceRequest::for_mole(
                MoleId(2),
                "2",
                ANNOUNCE_TIMEOUT_MS,
            )))
            .unwrap();
        let second = next_report(&mut report_rx).await;
        assert_eq!(
            second,
            SpeechReport {
                mole_id: Some(MoleId(2)),
                outcome: SpeechOutcome::started_after(0),
            }
        );
        req_tx.send(SpeechRequest::Cancel).unwrap();
    }

    #[tokio::test]
    async fn test_cancel_kills_current_utterance() {
        let (req_tx, req_rx) = mpsc::unbounded_channel();
        let (report_tx, mut report_rx) = mpsc::unbounded_channel();
        tokio::spawn(run_speaker(config("sleep"), req_rx, report_tx));

        let waiting = AnnounceRequest {
            completion: CompletionMode::OnEnd,
            timeout_ms: 5_000,
            ..AnnounceRequest::for_mole(MoleId(1), "2", ANNOUNCE_TIMEOUT_MS)
        };
        let sent_at = Instant::now();
        req_tx.send(SpeechRequest::Speak(waiting)).unwrap();
        req_tx.send(SpeechRequest::Cancel).unwrap();

        let killed = next_report(&mut report_rx).await;
        assert_eq!(killed.mole_id, Some(MoleId(1)));
        assert!(killed.outcome.ended);
        assert!(!killed.outcome.timed_out);
        assert!(sent_at.elapsed() < Duration::from_millis(1_500));

        // Same text again spawns a fresh process: it runs into its own
        // timeout instead of settling at once as a duplicate.
        let again = AnnounceRequest {
            completion: CompletionMode::OnEnd,
            timeout_ms: 100,
            ..AnnounceRequest::for_mole(MoleId(3), "2", ANNOUNCE_TIMEOUT_MS)
        };
        req_tx.send(SpeechRequest::Speak(again)).unwrap();
        let fresh = next_report(&mut report_rx).await;
        assert_eq!(fresh.mole_id, Some(MoleId(3)));
        assert!(fresh.outcome.started);
        assert!(fresh.outcome.timed_out);
        req_tx.send(SpeechRequest::Cancel).unwrap();
    }

    #[test]
    fn test_runtime_bridge_try_recv() {
        let mut runtime = SpeechRuntime::start(config("whack-a-braille-no-such-tts")).unwrap();
        runtime.announce(AnnounceRequest::for_mole(MoleId(2), "b", ANNOUNCE_TIMEOUT_MS));

        let mut report = None;
        for _ in 0..200 {
            if let Some(r) = runtime.try_recv() {
                report = Some(r);
                break;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        let report = report.expect("no report from speech runtime");
        assert_eq!(report.mole_id, Some(MoleId(2)));
        assert!(report.outcome.unsupported);
        runtime.cancel();
    }
}
