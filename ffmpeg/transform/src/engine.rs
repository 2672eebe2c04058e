/*!
    The filter engine interface shared by the resampler and the rescaler.
*/

use std::sync::Arc;

use ffmpeg_types::{Error, MediaFrame, MediaTrack, Rational, Result};

use crate::urn::QueueUrn;
use crate::worker::{FilterWorker, FrameProcessor};

/**
    Callback receiving each transformed frame.

    Invoked from the engine's worker thread, never from the caller of
    [`FilterEngine::send_buffer`].
*/
pub type CompleteHandler = Arc<dyn Fn(MediaFrame) + Send + Sync>;

/**
    Queue depth used when none is given.
*/
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/**
    A format-conversion filter running on its own worker thread.

    The expected call order is `set_queue_urn` / `set_complete_handler`,
    then `configure`, then `start`. Frames passed to `send_buffer` are
    queued and transformed asynchronously; each result is handed to the
    complete handler. `stop` drains the queue and joins the worker.
*/
pub trait FilterEngine: Send + Sync {
    fn set_queue_urn(&mut self, urn: QueueUrn);

    fn set_complete_handler(&mut self, handler: CompleteHandler);

    /**
        Validate the tracks and prepare the transform. Does not start the worker.
    */
    fn configure(&mut self, input: &Arc<MediaTrack>, output: &Arc<MediaTrack>) -> Result<()>;

    fn start(&mut self) -> Result<()>;

    fn stop(&mut self);

    /**
        Queue one frame. Fails if the engine is not running or its queue is full.
    */
    fn send_buffer(&self, frame: MediaFrame) -> Result<()>;

    /// Input width recorded at configure time (0 for audio).
    fn input_width(&self) -> u32;

    /// Input height recorded at configure time (0 for audio).
    fn input_height(&self) -> u32;

    fn input_time_base(&self) -> Rational;

    fn output_time_base(&self) -> Rational;
}

/**
    Queue, handler and worker bookkeeping common to both engines.
*/
pub(crate) struct EngineCore {
    urn: QueueUrn,
    handler: Option<CompleteHandler>,
    queue_capacity: usize,
    worker: Option<FilterWorker>,
}

impl EngineCore {
    pub fn new(queue_capacity: usize) -> Self {
        Self {
            urn: QueueUrn::default(),
            handler: None,
            queue_capacity,
            worker: None,
        }
    }

    pub fn urn(&self) -> &QueueUrn {
        &self.urn
    }

    pub fn set_urn(&mut self, urn: QueueUrn) {
        self.urn = urn;
    }

    pub fn set_handler(&mut self, handler: CompleteHandler) {
        self.handler = Some(handler);
    }

    pub fn start<P: FrameProcessor>(&mut self, processor: P) -> Result<()> {
        if self.worker.is_some() {
            return Err(Error::invalid_config(format!(
                "engine {} is already running",
                self.urn
            )));
        }
        let worker = FilterWorker::spawn(
            &self.urn,
            self.queue_capacity,
            processor,
            self.handler.clone(),
        )?;
        self.worker = Some(worker);
        Ok(())
    }

    pub fn stop(&mut self) {
        if let Some(mut worker) = self.worker.take() {
            worker.stop();
            tracing::debug!(urn = %self.urn, "engine stopped");
        }
    }

    pub fn send(&self, frame: MediaFrame) -> Result<()> {
        match &self.worker {
            Some(worker) => worker.send(frame),
            None => Err(Error::NotRunning),
        }
    }
}
