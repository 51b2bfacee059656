use std::ops::RangeInclusive;

use rayon::prelude::*;

use crate::{
    assets::GlyphSet,
    foundation::{
        error::{ClockError, ClockResult},
        time::TimeValue,
    },
    render::{Frame, compose},
};

/// What to render: a countdown to zero or a count up to a whole number of hours.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Mode {
    Timer {
        hours: u64,
        minutes: u64,
        seconds: u64,
    },
    Stopwatch {
        duration_hours: u64,
    },
}

impl Mode {
    /// The largest reading in the sequence (the first timer frame, the last stopwatch frame).
    pub fn total(&self) -> ClockResult<TimeValue> {
        match *self {
            Mode::Timer {
                hours,
                minutes,
                seconds,
            } => TimeValue::from_hms(hours, minutes, seconds),
            Mode::Stopwatch { duration_hours } => TimeValue::from_hms(duration_hours, 0, 0),
        }
    }

    /// Readings in playback order, one per second, both endpoints included.
    pub fn times(&self) -> ClockResult<TimeSequence> {
        let total = self.total()?.total_seconds();
        Ok(TimeSequence {
            range: 0..=total,
            descending: matches!(self, Mode::Timer { .. }),
        })
    }

    pub fn frame_count(&self) -> ClockResult<u64> {
        self.total()?
            .total_seconds()
            .checked_add(1)
            .ok_or_else(|| ClockError::validation("frame count overflows u64"))
    }

    pub fn default_file_name(&self) -> &'static str {
        match self {
            Mode::Timer { .. } => "timer.mp4",
            Mode::Stopwatch { .. } => "stopwatch.mp4",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Mode::Timer { .. } => "timer",
            Mode::Stopwatch { .. } => "stopwatch",
        }
    }
}

/// Lazy iterator over the readings of a [`Mode`].
#[derive(Clone, Debug)]
pub struct TimeSequence {
    range: RangeInclusive<u64>,
    descending: bool,
}

impl Iterator for TimeSequence {
    type Item = TimeValue;

    fn next(&mut self) -> Option<TimeValue> {
        let next = if self.descending {
            self.range.next_back()
        } else {
            self.range.next()
        };
        next.map(TimeValue)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.range.size_hint()
    }
}

#[derive(Clone, Debug)]
pub struct RenderThreading {
    pub parallel: bool,
    pub chunk_size: usize,
    pub threads: Option<usize>,
}

impl Default for RenderThreading {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: 256,
            threads: None,
        }
    }
}

/// Compose one frame per reading of `mode`, in playback order.
///
/// Parallel rendering works chunk by chunk and keeps output order identical to the sequential
/// path.
#[tracing::instrument(skip(glyphs, threading))]
pub fn render_sequence(
    mode: Mode,
    glyphs: &GlyphSet,
    threading: &RenderThreading,
) -> ClockResult<Vec<Frame>> {
    let count = mode.frame_count()?;
    let mut times = mode.times()?;
    let max_size = glyphs.max_size();
    tracing::info!(
        frames = count,
        width = max_size.0,
        height = max_size.1,
        parallel = threading.parallel,
        "rendering frame sequence"
    );

    let mut out = Vec::with_capacity(count.min(4096) as usize);
    if !threading.parallel {
        out.extend(times.map(|t| compose(t, glyphs, max_size)));
        return Ok(out);
    }

    let pool = build_thread_pool(threading.threads)?;
    let chunk_size = threading.chunk_size.max(1);
    loop {
        let chunk: Vec<TimeValue> = times.by_ref().take(chunk_size).collect();
        if chunk.is_empty() {
            break;
        }
        let frames: Vec<Frame> = pool.install(|| {
            chunk
                .par_iter()
                .map(|&t| compose(t, glyphs, max_size))
                .collect()
        });
        out.extend(frames);
    }
    Ok(out)
}

/// Pool for parallel frame composition; `None` lets rayon pick the worker count.
fn build_thread_pool(threads: Option<usize>) -> ClockResult<rayon::ThreadPool> {
    let builder = match threads {
        Some(0) => {
            return Err(ClockError::validation(
                "frame renderer thread count must be at least 1",
            ));
        }
        Some(n) => rayon::ThreadPoolBuilder::new().num_threads(n),
        None => rayon::ThreadPoolBuilder::new(),
    };
    builder.build().map_err(|e| {
        ClockError::validation(format!("cannot start frame renderer thread pool: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(mode: Mode) -> Vec<String> {
        mode.times().unwrap().map(|t| t.to_string()).collect()
    }

    #[test]
    fn timer_counts_down_to_zero() {
        let mode = Mode::Timer {
            hours: 0,
            minutes: 0,
            seconds: 3,
        };
        assert_eq!(
            strings(mode),
            vec!["00:00:03", "00:00:02", "00:00:01", "00:00:00"]
        );
        assert_eq!(mode.frame_count().unwrap(), 4);
    }

    #[test]
    fn timer_zero_has_one_frame() {
        let mode = Mode::Timer {
            hours: 0,
            minutes: 0,
            seconds: 0,
        };
        assert_eq!(strings(mode), vec!["00:00:00"]);
    }

    #[test]
    fn stopwatch_counts_up_to_duration() {
        let mode = Mode::Stopwatch { duration_hours: 1 };
        let times: Vec<TimeValue> = mode.times().unwrap().collect();
        assert_eq!(times.len(), 3601);
        assert_eq!(times.first().unwrap().to_string(), "00:00:00");
        assert_eq!(times.last().unwrap().to_string(), "01:00:00");
        assert!(times.windows(2).all(|w| w[1].0 == w[0].0 + 1));
    }

    #[test]
    fn stopwatch_zero_hours_is_a_single_frame() {
        assert_eq!(strings(Mode::Stopwatch { duration_hours: 0 }), vec!["00:00:00"]);
    }

    #[test]
    fn timer_sequence_is_strictly_descending() {
        let mode = Mode::Timer {
            hours: 0,
            minutes: 2,
            seconds: 5,
        };
        let times: Vec<TimeValue> = mode.times().unwrap().collect();
        assert_eq!(times.len() as u64, mode.frame_count().unwrap());
        assert_eq!(times[0].to_string(), "00:02:05");
        assert!(times.windows(2).all(|w| w[0].0 == w[1].0 + 1));
    }

    #[test]
    fn overflowing_duration_is_rejected() {
        let mode = Mode::Stopwatch {
            duration_hours: u64::MAX,
        };
        assert!(matches!(mode.times(), Err(ClockError::Validation(_))));
    }

    #[test]
    fn file_names() {
        assert_eq!(
            Mode::Timer {
                hours: 0,
                minutes: 0,
                seconds: 1
            }
            .default_file_name(),
            "timer.mp4"
        );
        assert_eq!(
            Mode::Stopwatch { duration_hours: 1 }.default_file_name(),
            "stopwatch.mp4"
        );
    }

    #[test]
    fn mode_json_is_tagged() {
        let json = serde_json::to_string(&Mode::Stopwatch { duration_hours: 2 }).unwrap();
        assert_eq!(json, r#"{"mode":"stopwatch","duration_hours":2}"#);
        let back: Mode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Mode::Stopwatch { duration_hours: 2 });
    }

    #[test]
    fn zero_threads_is_rejected() {
        assert!(build_thread_pool(Some(0)).is_err());
    }
}
