use std::path::Path;

use anyhow::Context as _;

use crate::error::{SimanimError, SimanimResult};

/// Ordered snapshot timestamps, paired 1:1 with on-disk `frame<N>.txt` files.
///
/// Timestamps are assumed non-decreasing (the simulation writes them in
/// order); this is not enforced.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeSeries {
    times: Vec<f64>,
}

impl TimeSeries {
    pub fn new(times: Vec<f64>) -> SimanimResult<Self> {
        if times.is_empty() {
            return Err(SimanimError::data("timestamp series is empty"));
        }
        Ok(Self { times })
    }

    /// Parse the `time.txt` format: one float per line, trailing newline
    /// expected (the final empty line it produces is discarded).
    pub fn parse(text: &str) -> SimanimResult<Self> {
        let mut times = Vec::new();
        let mut lines = text.split('\n').enumerate().peekable();
        while let Some((lineno, line)) = lines.next() {
            if line.is_empty() && lines.peek().is_none() {
                break;
            }
            let t: f64 = line.trim().parse().map_err(|_| {
                SimanimError::data(format!(
                    "timestamp line {} is not a number: '{line}'",
                    lineno + 1
                ))
            })?;
            times.push(t);
        }
        Self::new(times)
    }

    pub fn load(path: &Path) -> SimanimResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read timestamp file '{}'", path.display()))?;
        Self::parse(&text).map_err(|e| match e {
            SimanimError::Data(msg) => {
                SimanimError::data(format!("timestamp file '{}': {msg}", path.display()))
            }
            other => other,
        })
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn first(&self) -> f64 {
        self.times[0]
    }

    pub fn last(&self) -> f64 {
        self.times[self.times.len() - 1]
    }

    /// Pick one source index per output frame by nearest-timestamp matching.
    ///
    /// Target times are generated in non-decreasing order, which lets a
    /// single forward cursor walk the series without ever rewinding; that
    /// monotonicity is a precondition of the walk, not a general property.
    /// Equal-distance ties resolve to the later index. With a single
    /// requested frame the target is the window start. A series with fewer
    /// than two entries maps every frame to index 0.
    pub fn select(&self, window: TimeWindow, image_count: usize) -> SimanimResult<SelectionPlan> {
        if image_count == 0 {
            return Err(SimanimError::validation("image_count must be >= 1"));
        }
        let (t_start, t_end) = window.resolve(self)?;

        let step = if image_count > 1 {
            (t_end - t_start) / (image_count - 1) as f64
        } else {
            0.0
        };

        let mut indices = Vec::with_capacity(image_count);
        let mut i = 0usize;
        let mut t = t_start;
        for _ in 0..image_count {
            while i + 1 < self.times.len()
                && (self.times[i + 1] - t).abs() <= (self.times[i] - t).abs()
            {
                i += 1;
            }
            indices.push(i);
            t += step;
        }

        Ok(SelectionPlan { indices })
    }
}

/// Time window with explicitly optional bounds.
///
/// `None` means "use the corresponding bound of the series". The original
/// tooling encoded this with negative sentinel values; that convention is
/// isolated in [`TimeWindow::from_sentinels`] so legitimate negative
/// timestamps stay expressible through the plain constructor.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TimeWindow {
    pub start: Option<f64>,
    pub end: Option<f64>,
}

impl TimeWindow {
    pub fn new(start: Option<f64>, end: Option<f64>) -> Self {
        Self { start, end }
    }

    /// Caller contract inherited from the CLI: a negative component means
    /// "default to the series bound".
    pub fn from_sentinels(start: f64, end: f64) -> Self {
        Self {
            start: (start >= 0.0).then_some(start),
            end: (end >= 0.0).then_some(end),
        }
    }

    /// Substitute series bounds for unspecified ends. A resolved window with
    /// `end < start` is rejected rather than fed to the selector, which
    /// would otherwise walk a degenerate plan.
    pub fn resolve(&self, times: &TimeSeries) -> SimanimResult<(f64, f64)> {
        let start = self.start.unwrap_or_else(|| times.first());
        let end = self.end.unwrap_or_else(|| times.last());
        if end < start {
            return Err(SimanimError::validation(format!(
                "time window end ({end}) is before start ({start})"
            )));
        }
        Ok((start, end))
    }
}

/// Ordered source indices, one per output frame. Non-decreasing by
/// construction of the selector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectionPlan {
    indices: Vec<usize>,
}

impl SelectionPlan {
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(times: &[f64]) -> TimeSeries {
        TimeSeries::new(times.to_vec()).unwrap()
    }

    #[test]
    fn parse_discards_trailing_empty_line() {
        let ts = TimeSeries::parse("0.0\n0.5\n1.25\n").unwrap();
        assert_eq!(ts.len(), 3);
        assert_eq!(ts.first(), 0.0);
        assert_eq!(ts.last(), 1.25);
    }

    #[test]
    fn parse_rejects_garbage_and_empty_input() {
        assert!(matches!(
            TimeSeries::parse("0.0\nabc\n"),
            Err(SimanimError::Data(_))
        ));
        assert!(matches!(TimeSeries::parse(""), Err(SimanimError::Data(_))));
        assert!(matches!(TimeSeries::parse("\n"), Err(SimanimError::Data(_))));
    }

    #[test]
    fn load_keeps_the_data_taxonomy_and_names_the_file() {
        let dir = std::path::PathBuf::from("target").join("timeline_tests");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("malformed_time.txt");
        std::fs::write(&path, "0.0\nabc\n").unwrap();

        let err = TimeSeries::load(&path).unwrap_err();
        assert!(matches!(err, SimanimError::Data(_)), "got {err:?}");
        assert!(err.to_string().contains("malformed_time.txt"));
    }

    #[test]
    fn select_length_matches_and_indices_non_decreasing() {
        let ts = series(&[0.0, 0.1, 0.3, 0.7, 1.0, 1.9, 2.0]);
        let plan = ts.select(TimeWindow::default(), 13).unwrap();
        assert_eq!(plan.len(), 13);
        for w in plan.indices().windows(2) {
            assert!(w[0] <= w[1]);
        }
    }

    #[test]
    fn single_frame_picks_index_nearest_start() {
        let ts = series(&[0.0, 1.0, 2.0, 3.0]);
        let plan = ts
            .select(TimeWindow::new(Some(1.9), None), 1)
            .unwrap();
        assert_eq!(plan.indices(), &[2]);
    }

    #[test]
    fn ties_resolve_to_later_index() {
        let ts = series(&[0.0, 10.0]);
        let plan = ts
            .select(TimeWindow::new(Some(5.0), Some(5.0)), 1)
            .unwrap();
        assert_eq!(plan.indices(), &[1]);
    }

    #[test]
    fn exact_matches_select_every_frame() {
        let ts = series(&[0.0, 1.0, 2.0, 3.0]);
        let plan = ts.select(TimeWindow::default(), 4).unwrap();
        assert_eq!(plan.indices(), &[0, 1, 2, 3]);
    }

    #[test]
    fn short_series_pins_every_frame_to_zero() {
        let ts = series(&[4.2]);
        let plan = ts.select(TimeWindow::default(), 5).unwrap();
        assert_eq!(plan.indices(), &[0, 0, 0, 0, 0]);
    }

    #[test]
    fn zero_frames_is_a_validation_error() {
        let ts = series(&[0.0, 1.0]);
        assert!(matches!(
            ts.select(TimeWindow::default(), 0),
            Err(SimanimError::Validation(_))
        ));
    }

    #[test]
    fn sentinels_map_negative_to_unset() {
        assert_eq!(
            TimeWindow::from_sentinels(-1.0, -1.0),
            TimeWindow::default()
        );
        assert_eq!(
            TimeWindow::from_sentinels(0.5, -1.0),
            TimeWindow::new(Some(0.5), None)
        );
    }

    #[test]
    fn reversed_window_is_rejected() {
        let ts = series(&[0.0, 1.0, 2.0]);
        let window = TimeWindow::new(Some(2.0), Some(1.0));
        assert!(matches!(
            ts.select(window, 3),
            Err(SimanimError::Validation(_))
        ));
    }

    #[test]
    fn unset_bounds_resolve_to_series_bounds() {
        let ts = series(&[0.25, 1.0, 3.5]);
        assert_eq!(TimeWindow::default().resolve(&ts).unwrap(), (0.25, 3.5));
    }
}
