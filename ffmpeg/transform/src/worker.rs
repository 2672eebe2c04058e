/*!
    Worker thread that drives a frame processor from a bounded queue.
*/

use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, TrySendError};

use ffmpeg_types::{Error, MediaFrame, Result};

use crate::engine::CompleteHandler;
use crate::urn::QueueUrn;

/**
    Per-frame work executed on the worker thread.
*/
pub(crate) trait FrameProcessor: Send + 'static {
    fn process(&mut self, frame: MediaFrame) -> Result<MediaFrame>;
}

/**
    Owns one worker thread and the sending half of its queue.

    Stopping closes the queue; the worker finishes every frame already
    queued, delivering each result to the handler, before it exits.
*/
pub(crate) struct FilterWorker {
    urn: String,
    sender: Option<Sender<MediaFrame>>,
    handle: Option<JoinHandle<()>>,
}

impl FilterWorker {
    pub fn spawn<P: FrameProcessor>(
        urn: &QueueUrn,
        capacity: usize,
        processor: P,
        handler: Option<CompleteHandler>,
    ) -> Result<Self> {
        let urn = urn.to_string();
        let (sender, receiver) = crossbeam_channel::bounded(capacity.max(1));

        let handle = {
            let urn = urn.clone();
            thread::Builder::new()
                .name(urn.clone())
                .spawn(move || run(urn, receiver, processor, handler))?
        };

        Ok(Self {
            urn,
            sender: Some(sender),
            handle: Some(handle),
        })
    }

    pub fn send(&self, frame: MediaFrame) -> Result<()> {
        let sender = self.sender.as_ref().ok_or(Error::NotRunning)?;
        match sender.try_send(frame) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(Error::QueueFull {
                urn: self.urn.clone(),
            }),
            Err(TrySendError::Disconnected(_)) => Err(Error::NotRunning),
        }
    }

    pub fn stop(&mut self) {
        drop(self.sender.take());
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!(urn = %self.urn, "filter worker panicked");
            }
        }
    }
}

impl Drop for FilterWorker {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run<P: FrameProcessor>(
    urn: String,
    receiver: Receiver<MediaFrame>,
    mut processor: P,
    handler: Option<CompleteHandler>,
) {
    tracing::debug!(%urn, "filter worker started");
    for frame in receiver.iter() {
        match processor.process(frame) {
            Ok(output) => {
                if let Some(handler) = &handler {
                    handler(output);
                }
            }
            Err(e) => tracing::warn!(%urn, error = %e, "dropping frame that failed to transform"),
        }
    }
    tracing::debug!(%urn, "filter worker exited");
}
