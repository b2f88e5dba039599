use crate::snapshot::Snapshot;

/// Global (min, max) extrema across every snapshot referenced by a
/// selection plan, shared read-only by every render call so color intensity
/// is comparable across the whole video.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl Default for ValueRange {
    fn default() -> Self {
        Self {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }
}

impl ValueRange {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one snapshot's elements into the accumulator.
    pub fn observe(&mut self, snapshot: &Snapshot) {
        for &x in snapshot.values() {
            self.min = self.min.min(x);
            self.max = self.max.max(x);
        }
    }

    /// True until at least one element has been observed.
    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    /// Map `x` into `[0, 1]` relative to the range, clamping values that
    /// fall outside it. A flat range (`min == max`) maps every element to
    /// 0.0 so a constant field renders black rather than dividing by zero.
    pub fn normalize(&self, x: f64) -> f64 {
        if self.max <= self.min {
            return 0.0;
        }
        ((x - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
    }

    /// One-shot reduction over a set of snapshots. Order-independent.
    pub fn compute<'a>(snapshots: impl IntoIterator<Item = &'a Snapshot>) -> Self {
        let mut range = Self::new();
        for snap in snapshots {
            range.observe(snap);
        }
        range
    }
}
