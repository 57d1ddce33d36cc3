//! Bridges a runner session into an iced stream.

use iced::futures::Stream;
use iced::futures::stream;
use runpad_core::runner::{self, RunEvent, RunOptions, RunRequest, RunSession};
use tokio::sync::mpsc;

use super::types::RunUpdate;

enum State {
    Start(RunRequest, RunOptions),
    Streaming(mpsc::Receiver<RunEvent>),
    Done,
}

/// Spawns the script when first polled, then yields its events.
///
/// The first item is either `Attached` or `Failed`; the stream ends after
/// the runner closes its channel.
pub fn run_stream(request: RunRequest, options: RunOptions) -> impl Stream<Item = RunUpdate> {
    stream::unfold(State::Start(request, options), |state| async move {
        match state {
            State::Start(request, options) => match runner::spawn(request, options) {
                Ok(RunSession { handle, events }) => {
                    Some((RunUpdate::Attached(handle), State::Streaming(events)))
                }
                Err(e) => {
                    tracing::warn!("Run failed to start: {}", e);
                    Some((RunUpdate::Failed(e.to_string()), State::Done))
                }
            },
            State::Streaming(mut events) => events
                .recv()
                .await
                .map(|event| (RunUpdate::Event(event), State::Streaming(events))),
            State::Done => None,
        }
    })
}
