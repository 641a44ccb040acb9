use crate::codec::{AxisSample, Frame, FRAME_SIZE, SYNC};

/// Running counters over one analysis pass.
///
/// `sequence_min`/`sequence_max` are plain numeric extremes of the observed
/// sequence numbers; they are not wraparound-aware on their own. Loss
/// estimation uses the traversed-span accounting in [`Analyzer`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Statistics {
    /// Every byte consumed by the scan loop, noise and frames alike.
    pub bytes_total: u64,
    /// Bytes that never aligned to a frame.
    pub noise_bytes: u64,
    /// Frames located and decoded.
    pub valid_frames: u64,
    /// Frames with at least one axis above the current threshold.
    pub alert_frames: u64,
    /// Smallest sequence number seen (255 until the first frame).
    pub sequence_min: u8,
    /// Largest sequence number seen (0 until the first frame).
    pub sequence_max: u8,
}

impl Default for Statistics {
    fn default() -> Self {
        Self {
            bytes_total: 0,
            noise_bytes: 0,
            valid_frames: 0,
            alert_frames: 0,
            sequence_min: u8::MAX,
            sequence_max: 0,
        }
    }
}

/// True iff the frame's sync bytes equal the protocol constants.
///
/// Frames produced by the scanner always pass; this is the explicit guard
/// against running the codec over an arbitrary buffer.
pub fn is_frame_valid(frame: &Frame) -> bool {
    frame.sync == SYNC
}

/// True iff the axis draws strictly more current than the threshold.
/// A reading exactly at the threshold is not an alert.
pub fn axis_in_alert(axis: &AxisSample, threshold_amperes: f32) -> bool {
    axis.current_amperes() > threshold_amperes
}

/// Consumes decoded frames in arrival order and maintains the statistics
/// accumulator, including the wraparound-aware sequence span used to
/// estimate lost frames.
#[derive(Debug)]
pub struct Analyzer {
    threshold_amperes: f32,
    stats: Statistics,
    last_sequence: Option<u8>,
    /// Frames the traversed sequence span should have contained, counting a
    /// decrease between consecutive frames as a +256 wrap.
    span_frames: u64,
}

impl Analyzer {
    pub fn new(threshold_amperes: f32) -> Self {
        Self {
            threshold_amperes,
            stats: Statistics::default(),
            last_sequence: None,
            span_frames: 0,
        }
    }

    /// Count bytes the scanner classified as noise.
    pub fn record_noise(&mut self, bytes: u64) {
        self.stats.noise_bytes += bytes;
        self.stats.bytes_total += bytes;
    }

    /// Fold one decoded frame into the statistics. Returns whether any axis
    /// is in alert, for the caller to annotate its report line.
    pub fn analyze(&mut self, frame: &Frame) -> bool {
        let seq = frame.sequence;
        self.stats.sequence_min = self.stats.sequence_min.min(seq);
        self.stats.sequence_max = self.stats.sequence_max.max(seq);

        match self.last_sequence {
            None => self.span_frames = 1,
            // wrapping_sub turns a 255 -> 0 rollover into a delta of 1.
            Some(prev) => self.span_frames += u64::from(seq.wrapping_sub(prev)),
        }
        self.last_sequence = Some(seq);

        self.stats.valid_frames += 1;
        self.stats.bytes_total += FRAME_SIZE as u64;

        let has_alert = frame
            .axes
            .iter()
            .any(|axis| axis_in_alert(axis, self.threshold_amperes));
        if has_alert {
            self.stats.alert_frames += 1;
        }
        has_alert
    }

    /// Frames the sequence numbering says should have arrived but did not.
    /// Never negative; zero for a contiguous run even across a wrap.
    pub fn estimated_lost_frames(&self) -> u64 {
        self.span_frames.saturating_sub(self.stats.valid_frames)
    }

    pub fn stats(&self) -> Statistics {
        self.stats
    }

    pub fn threshold_amperes(&self) -> f32 {
        self.threshold_amperes
    }
}
