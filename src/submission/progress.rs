//! Optimistic client-side progress model for an in-flight submission.
//!
//! The bar is a linear ramp calibrated from the file size, not a report of
//! real backend progress. It holds at 95% until the response actually
//! arrives, and only a confirmed success snaps it to 100%.

/// Fixed interval between ticks, in milliseconds.
pub const TICK_INTERVAL_MS: u64 = 500;

/// The ramp never crosses this on its own while the request is in flight.
const IN_FLIGHT_CEILING_PERCENT: f64 = 95.0;

/// Heuristic seconds of processing per megabyte of audio.
const SECONDS_PER_MB: f64 = 15.0;

/// Minimum estimate, so tiny files still show a believable ramp.
const MIN_ESTIMATED_SECONDS: f64 = 20.0;

/// Simulated progress for one submission attempt.
#[derive(Clone, Debug)]
pub struct ProgressEstimate {
    estimated_total_secs: u64,
    percent: f64,
    remaining_secs: f64,
    tick_increment: f64,
}

impl ProgressEstimate {
    /// Build the estimate from the attached file size:
    /// `max(20, ceil(size_in_MB * 15))` seconds.
    pub fn for_file_size(size_bytes: u64) -> Self {
        let size_mb = size_bytes as f64 / (1024.0 * 1024.0);
        let estimated = (size_mb * SECONDS_PER_MB).ceil().max(MIN_ESTIMATED_SECONDS);
        let ticks = estimated * 1000.0 / TICK_INTERVAL_MS as f64;
        Self {
            estimated_total_secs: estimated as u64,
            percent: 0.0,
            remaining_secs: estimated,
            tick_increment: 100.0 / ticks,
        }
    }

    /// Advance the ramp by one tick. The percent is capped at the in-flight
    /// ceiling; the countdown is floored at zero and may hit it before the
    /// backend replies.
    pub fn advance_tick(&mut self) {
        self.percent = (self.percent + self.tick_increment).min(IN_FLIGHT_CEILING_PERCENT);
        self.remaining_secs =
            (self.remaining_secs - TICK_INTERVAL_MS as f64 / 1000.0).max(0.0);
    }

    /// Snap to 100% / 0s. Called only on confirmed success.
    pub fn complete(&mut self) {
        self.percent = 100.0;
        self.remaining_secs = 0.0;
    }

    pub fn percent(&self) -> f64 {
        self.percent
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs.ceil() as u64
    }

    pub fn estimated_total_secs(&self) -> u64 {
        self.estimated_total_secs
    }

    /// Countdown formatted as `MmSSs` for the status line.
    pub fn remaining_label(&self) -> String {
        let secs = self.remaining_secs();
        format!("{}m {:02}s", secs / 60, secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MB: u64 = 1024 * 1024;

    #[test]
    fn estimate_uses_floor_of_twenty_seconds() {
        assert_eq!(ProgressEstimate::for_file_size(0).estimated_total_secs(), 20);
        assert_eq!(ProgressEstimate::for_file_size(MB).estimated_total_secs(), 20);
    }

    #[test]
    fn estimate_scales_with_file_size() {
        // 2 MB -> max(20, ceil(2 * 15)) = 30 seconds.
        assert_eq!(
            ProgressEstimate::for_file_size(2 * MB).estimated_total_secs(),
            30
        );
        // 10.1 MB rounds the product up.
        let p = ProgressEstimate::for_file_size(10 * MB + 105 * 1024);
        assert_eq!(p.estimated_total_secs(), 152);
    }

    #[test]
    fn ramp_is_monotone_and_capped_at_95() {
        let mut p = ProgressEstimate::for_file_size(2 * MB);
        let mut last = p.percent();
        // Far more ticks than the estimate needs.
        for _ in 0..1000 {
            p.advance_tick();
            assert!(p.percent() >= last);
            assert!(p.percent() <= 95.0);
            last = p.percent();
        }
        assert_eq!(p.percent(), 95.0);
        assert_eq!(p.remaining_secs(), 0);
    }

    #[test]
    fn ramp_would_reach_full_at_the_estimate_if_uncapped() {
        // 30s estimate at 500ms ticks = 60 ticks; each tick moves 100/60.
        let mut p = ProgressEstimate::for_file_size(2 * MB);
        for _ in 0..57 {
            p.advance_tick();
        }
        assert!((p.percent() - 95.0).abs() < 1e-9);
    }

    #[test]
    fn countdown_floors_at_zero() {
        let mut p = ProgressEstimate::for_file_size(0);
        for _ in 0..100 {
            p.advance_tick();
        }
        assert_eq!(p.remaining_secs(), 0);
        assert_eq!(p.remaining_label(), "0m 00s");
    }

    #[test]
    fn complete_snaps_to_full() {
        let mut p = ProgressEstimate::for_file_size(2 * MB);
        p.advance_tick();
        p.complete();
        assert_eq!(p.percent(), 100.0);
        assert_eq!(p.remaining_secs(), 0);
    }
}
