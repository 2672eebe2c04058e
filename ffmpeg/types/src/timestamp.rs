/*!
    Timestamp types for media timing.
*/

use std::time::Duration;

use crate::Rational;

/**
    Presentation timestamp in time_base units.

    This is the raw timestamp value from the media stream. To convert to
    a meaningful duration, you need the stream's time base.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pts(pub i64);

impl Pts {
    /**
        Convert this PTS to a Duration using the given time base.

        Negative PTS values are clamped to zero.
    */
    #[inline]
    pub fn to_duration(self, time_base: Rational) -> Duration {
        if self.0 <= 0 {
            return Duration::ZERO;
        }
        let seconds = self.0 as f64 * time_base.to_f64();
        Duration::from_secs_f64(seconds.max(0.0))
    }

    /**
        Express this PTS in another time base, rounding to the nearest unit.
    */
    pub fn rescale(self, from: Rational, to: Rational) -> Self {
        if from == to {
            return self;
        }
        let num = self.0 as i128 * from.num as i128 * to.den as i128;
        let den = from.den as i128 * to.num as i128;
        if den == 0 {
            return self;
        }
        // round half away from zero
        let half = den.abs() / 2;
        let rounded = if (num < 0) != (den < 0) {
            (num - half * den.signum()) / den
        } else {
            (num + half * den.signum()) / den
        };
        Self(rounded as i64)
    }
}

impl From<i64> for Pts {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Pts> for i64 {
    fn from(pts: Pts) -> Self {
        pts.0
    }
}
