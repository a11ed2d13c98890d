use std::{fmt, time::Duration};

use serde::{Serialize, Serializer};

/// Counters collected while a sort runs. Reset at every new run and every
/// array change; never decrease during a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub comparisons: u64,
    pub swaps: u64,
    /// Direct writes performed by merge sort.
    pub writes: u64,
    #[serde(rename = "elapsed_ms", serialize_with = "serialize_millis")]
    pub elapsed: Duration,
}

impl Stats {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Total number of counted operations.
    pub fn operations(&self) -> u64 {
        self.comparisons + self.swaps + self.writes
    }
}

fn serialize_millis<S: Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "comparisons: {}, swaps: {}, writes: {}, elapsed: {}ms",
            self.comparisons,
            self.swaps,
            self.writes,
            self.elapsed.as_millis()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_clears_every_counter() {
        let mut stats = Stats {
            comparisons: 4,
            swaps: 2,
            writes: 1,
            elapsed: Duration::from_millis(30),
        };
        assert_eq!(stats.operations(), 7);

        stats.reset();
        assert_eq!(stats, Stats::default());
    }

    #[test]
    fn display_reports_milliseconds() {
        let stats = Stats {
            comparisons: 3,
            elapsed: Duration::from_micros(12_500),
            ..Default::default()
        };
        assert_eq!(
            stats.to_string(),
            "comparisons: 3, swaps: 0, writes: 0, elapsed: 12ms"
        );
    }

    #[test]
    fn serialises_elapsed_as_milliseconds() {
        let stats = Stats {
            swaps: 2,
            elapsed: Duration::from_millis(714),
            ..Default::default()
        };
        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "comparisons": 0,
                "swaps": 2,
                "writes": 0,
                "elapsed_ms": 714
            })
        );
    }
}
