//! Tasks that own a running child and its pipes.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, ChildStderr, ChildStdin, ChildStdout};
use tokio::sync::{mpsc, watch};

use super::prompt::{Detected, PromptDetector, Utf8Decoder};
use super::{OutputStream, RunEvent, RunExit, RunOptions};
use crate::config::PromptConfig;

/// Requests from a [`super::RunHandle`].
#[derive(Debug)]
pub(super) enum Control {
    Input(String),
    CloseInput,
    Kill,
}

pub(super) struct Pipes {
    pub child: Child,
    pub stdin: ChildStdin,
    pub stdout: ChildStdout,
    pub stderr: ChildStderr,
}

/// Waits for the child while serving control requests, then drains the
/// readers and reports the exit.
///
/// The drain has no deadline of its own. A reader only gives up when a read
/// stays silent for `drain_timeout` after the exit, which is what a
/// grandchild holding the pipe looks like. Time spent waiting for the
/// consumer to take events does not count.
pub(super) async fn supervise(
    pipes: Pipes,
    mut control: mpsc::UnboundedReceiver<Control>,
    events: mpsc::Sender<RunEvent>,
    options: RunOptions,
    alive: Arc<AtomicBool>,
) {
    let Pipes {
        mut child,
        stdin,
        stdout,
        stderr,
    } = pipes;

    let (exited_tx, exited_rx) = watch::channel(false);
    let reader = |stream, prompt| Reader {
        stream,
        detector: PromptDetector::new(prompt),
        idle: options.prompt.idle(),
        drain_timeout: options.drain_timeout,
        exited: exited_rx.clone(),
        events: events.clone(),
    };
    let stdout_reader = reader(OutputStream::Stdout, options.prompt.clone());
    let stderr_reader = reader(OutputStream::Stderr, PromptConfig::disabled());
    let stdout_task = tokio::spawn(stdout_reader.run(stdout));
    let stderr_task = tokio::spawn(stderr_reader.run(stderr));

    // Writes go through their own task so a child that never reads stdin
    // cannot stall kill requests.
    let (input_tx, input_rx) = mpsc::unbounded_channel();
    let writer_task = tokio::spawn(write_input(stdin, input_rx));
    let mut input_tx = Some(input_tx);

    let mut killed = false;
    let mut control_open = true;

    let status = loop {
        tokio::select! {
            status = child.wait() => break status,
            request = control.recv(), if control_open => match request {
                Some(Control::Input(text)) => match &input_tx {
                    Some(tx) => {
                        let _ = tx.send(text);
                    }
                    None => tracing::debug!("Dropping input after stdin was closed"),
                },
                Some(Control::CloseInput) => {
                    input_tx = None;
                }
                Some(Control::Kill) => {
                    killed |= kill(&mut child);
                }
                None => {
                    // Every handle is gone, nobody can stop the script anymore
                    control_open = false;
                    killed |= kill(&mut child);
                }
            },
        }
    };

    alive.store(false, Ordering::Release);
    drop(input_tx);
    writer_task.abort();

    let exit = match status {
        Ok(status) => RunExit::from_status(status, killed),
        Err(e) => {
            tracing::error!("Failed to wait for child: {}", e);
            RunExit {
                code: None,
                signal: None,
                success: false,
                killed,
            }
        }
    };

    let _ = exited_tx.send(true);
    let _ = stdout_task.await;
    let _ = stderr_task.await;

    tracing::info!("Script finished: {}", exit);
    let _ = events.send(RunEvent::Exited(exit)).await;
}

fn kill(child: &mut Child) -> bool {
    match child.start_kill() {
        Ok(()) => {
            tracing::info!(pid = ?child.id(), "Killing script");
            true
        }
        Err(e) => {
            tracing::debug!("Kill failed, child already gone: {}", e);
            false
        }
    }
}

async fn write_input(mut stdin: ChildStdin, mut lines: mpsc::UnboundedReceiver<String>) {
    while let Some(line) = lines.recv().await {
        let mut bytes = line.into_bytes();
        bytes.push(b'\n');
        let written = async {
            stdin.write_all(&bytes).await?;
            stdin.flush().await
        };
        if let Err(e) = written.await {
            tracing::warn!("Failed to write to stdin: {}", e);
            break;
        }
    }
    tracing::debug!("stdin closed");
}

/// One output pipe: decodes, classifies and forwards what the child writes.
struct Reader {
    stream: OutputStream,
    detector: PromptDetector,
    idle: Duration,
    drain_timeout: Duration,
    /// Flips to true once the child has exited
    exited: watch::Receiver<bool>,
    events: mpsc::Sender<RunEvent>,
}

enum Wake {
    Read(std::io::Result<usize>),
    Idle,
    ChildExited,
    Stalled,
}

impl Reader {
    async fn run<R>(mut self, mut pipe: R)
    where
        R: AsyncRead + Unpin,
    {
        let mut decoder = Utf8Decoder::new();
        let mut buf = vec![0u8; 8192];
        let mut child_exited = *self.exited.borrow();

        loop {
            let idle_armed = self.detector.has_pending() && !self.idle.is_zero();

            // Reads are cancel safe, nothing is lost when another arm wins
            let wake = tokio::select! {
                read = pipe.read(&mut buf) => Wake::Read(read),
                _ = tokio::time::sleep(self.idle), if idle_armed => Wake::Idle,
                _ = self.exited.changed(), if !child_exited => Wake::ChildExited,
                _ = tokio::time::sleep(self.drain_timeout), if child_exited => Wake::Stalled,
            };

            match wake {
                Wake::Read(Ok(0)) => break,
                Wake::Read(Ok(n)) => {
                    let text = decoder.decode(&buf[..n]);
                    for detected in self.detector.feed(&text) {
                        if !self.emit(detected).await {
                            return;
                        }
                    }
                }
                Wake::Read(Err(e)) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Wake::Read(Err(e)) => {
                    tracing::warn!("Failed to read {:?}: {}", self.stream, e);
                    break;
                }
                Wake::Idle => {
                    if let Some(detected) = self.detector.idle() {
                        if !self.emit(detected).await {
                            return;
                        }
                    }
                }
                Wake::ChildExited => child_exited = true,
                Wake::Stalled => {
                    // A grandchild still holds the pipe open
                    tracing::warn!(
                        "{:?} silent for {:?} after exit, detaching",
                        self.stream,
                        self.drain_timeout
                    );
                    break;
                }
            }
        }

        let mut tail = self.detector.feed(&decoder.finish());
        tail.extend(self.detector.finish());
        for detected in tail {
            if !self.emit(detected).await {
                return;
            }
        }
    }

    /// Returns false once the receiving side is gone.
    async fn emit(&self, detected: Detected) -> bool {
        let stream = self.stream;
        let event = match detected {
            Detected::Output(text) => RunEvent::Output { stream, text },
            Detected::Prompt(prompt) => RunEvent::InputRequested { prompt },
        };
        self.events.send(event).await.is_ok()
    }
}
