/*!
    In-process engine doubles for filter tests.
*/

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::Mutex;

use ffmpeg_transform::{CompleteHandler, FilterEngine, QueueUrn};
use ffmpeg_types::{Error, MediaFrame, MediaTrack, MediaType, Rational, Result};

use crate::factory::EngineFactory;

/**
    Counters shared by every engine a [`MockFactory`] builds.
*/
#[derive(Default)]
pub struct EngineStats {
    created: AtomicUsize,
    configured: AtomicUsize,
    started: AtomicUsize,
    stopped: AtomicUsize,
    fail_configure_at: AtomicUsize,
    fail_start: AtomicBool,
    kinds: Mutex<Vec<MediaType>>,
    last_urn: Mutex<Option<String>>,
    // (engine generation, frame dimensions)
    delivered: Mutex<Vec<(usize, Option<(u32, u32)>)>>,
}

impl EngineStats {
    /**
        Make the `n`-th configure call (1-based) fail.
    */
    pub fn fail_configure_at(&self, n: usize) {
        self.fail_configure_at.store(n, Ordering::SeqCst);
    }

    pub fn fail_start(&self) {
        self.fail_start.store(true, Ordering::SeqCst);
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn configured(&self) -> usize {
        self.configured.load(Ordering::SeqCst)
    }

    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub fn stopped(&self) -> usize {
        self.stopped.load(Ordering::SeqCst)
    }

    pub fn kinds(&self) -> Vec<MediaType> {
        self.kinds.lock().clone()
    }

    pub fn last_urn(&self) -> Option<String> {
        self.last_urn.lock().clone()
    }

    pub fn delivered(&self) -> Vec<(usize, Option<(u32, u32)>)> {
        self.delivered.lock().clone()
    }
}

/**
    Engine that completes frames synchronously on the sending thread.
*/
pub struct MockEngine {
    generation: usize,
    stats: Arc<EngineStats>,
    handler: Option<CompleteHandler>,
    input_size: (u32, u32),
    input_time_base: Rational,
    output_time_base: Rational,
    running: bool,
}

impl FilterEngine for MockEngine {
    fn set_queue_urn(&mut self, urn: QueueUrn) {
        *self.stats.last_urn.lock() = Some(urn.to_string());
    }

    fn set_complete_handler(&mut self, handler: CompleteHandler) {
        self.handler = Some(handler);
    }

    fn configure(&mut self, input: &Arc<MediaTrack>, output: &Arc<MediaTrack>) -> Result<()> {
        let call = self.stats.configured.fetch_add(1, Ordering::SeqCst) + 1;
        if call == self.stats.fail_configure_at.load(Ordering::SeqCst) {
            return Err(Error::invalid_config("mock configure failure"));
        }
        self.input_size = input.resolution();
        self.input_time_base = input.time_base();
        self.output_time_base = output.time_base();
        Ok(())
    }

    fn start(&mut self) -> Result<()> {
        if self.stats.fail_start.load(Ordering::SeqCst) {
            return Err(Error::invalid_config("mock start failure"));
        }
        self.stats.started.fetch_add(1, Ordering::SeqCst);
        self.running = true;
        Ok(())
    }

    fn stop(&mut self) {
        if self.running {
            self.running = false;
            self.stats.stopped.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn send_buffer(&self, frame: MediaFrame) -> Result<()> {
        if !self.running {
            return Err(Error::NotRunning);
        }
        self.stats
            .delivered
            .lock()
            .push((self.generation, frame.dimensions()));
        if let Some(handler) = &self.handler {
            handler(frame);
        }
        Ok(())
    }

    fn input_width(&self) -> u32 {
        self.input_size.0
    }

    fn input_height(&self) -> u32 {
        self.input_size.1
    }

    fn input_time_base(&self) -> Rational {
        self.input_time_base
    }

    fn output_time_base(&self) -> Rational {
        self.output_time_base
    }
}

pub struct MockFactory {
    stats: Arc<EngineStats>,
}

impl MockFactory {
    pub fn new(stats: Arc<EngineStats>) -> Self {
        Self { stats }
    }

    fn build(&self, kind: MediaType) -> Box<dyn FilterEngine> {
        let generation = self.stats.created.fetch_add(1, Ordering::SeqCst) + 1;
        self.stats.kinds.lock().push(kind);
        Box::new(MockEngine {
            generation,
            stats: Arc::clone(&self.stats),
            handler: None,
            input_size: (0, 0),
            input_time_base: Rational::new(1, 1),
            output_time_base: Rational::new(1, 1),
            running: false,
        })
    }
}

impl EngineFactory for MockFactory {
    fn resampler(&self) -> Box<dyn FilterEngine> {
        self.build(MediaType::Audio)
    }

    fn rescaler(&self) -> Box<dyn FilterEngine> {
        self.build(MediaType::Video)
    }
}
