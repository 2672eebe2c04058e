/*!
    Stream discontinuity detection.
*/

use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

/**
    Sentinel stored while no frame has been seen.
*/
const NO_PTS: i64 = -1;

/**
    A break in stream continuity that invalidates the current filter engine.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Discontinuity {
    /// Two consecutive timestamps differ by more than the threshold.
    TimestampJump { from: i64, to: i64 },
    /// Frame dimensions no longer match the engine's input dimensions.
    ResolutionChange { from: (u32, u32), to: (u32, u32) },
}

impl fmt::Display for Discontinuity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TimestampJump { from, to } => write!(f, "timestamp jump {from} -> {to}"),
            Self::ResolutionChange { from, to } => write!(
                f,
                "resolution change {}x{} -> {}x{}",
                from.0, from.1, to.0, to.1
            ),
        }
    }
}

/**
    Tracks the last seen PTS and flags abnormal jumps.

    The last PTS is replaced on every observation, before the verdict is
    returned, so one abnormal frame triggers exactly once. Updates are
    atomic, but verdicts are only meaningful with a single producer.
*/
#[derive(Debug)]
pub struct PtsTracker {
    threshold: i64,
    last_pts: AtomicI64,
}

impl PtsTracker {
    pub fn new(threshold: i64) -> Self {
        Self {
            threshold,
            last_pts: AtomicI64::new(NO_PTS),
        }
    }

    pub fn threshold(&self) -> i64 {
        self.threshold
    }

    /**
        Last observed PTS, or `None` if nothing was observed yet.
    */
    pub fn last_pts(&self) -> Option<i64> {
        match self.last_pts.load(Ordering::Acquire) {
            NO_PTS => None,
            pts => Some(pts),
        }
    }

    /**
        Record `pts` and report a jump if it differs from the previous
        PTS by strictly more than the threshold.
    */
    pub fn observe(&self, pts: i64) -> Option<Discontinuity> {
        let last = self.last_pts.swap(pts, Ordering::AcqRel);
        if last == NO_PTS {
            return None;
        }
        let delta = pts.abs_diff(last);
        (delta > self.threshold.unsigned_abs())
            .then_some(Discontinuity::TimestampJump { from: last, to: pts })
    }
}
