use std::{path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{
    sequence::{MAX_LEN, MAX_VALUE, MIN_VALUE},
    Result,
};

/// Longest accepted time unit: one second.
pub const MAX_UNIT_MICROS: u64 = 1_000_000;
/// Longest accepted pause poll, in time units.
pub const MAX_PAUSE_POLL_UNITS: u64 = 10_000;

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub timing: TimingConfig,
    pub random: RandomConfig,
}

impl AppConfig {
    /// Parses a (possibly partial) JSON document. Missing fields take their
    /// defaults and out-of-range values are normalised.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: AppConfig = serde_json::from_str(json)?;
        Ok(config.normalised())
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn normalised(mut self) -> Self {
        let timing = &mut self.timing;
        timing.default_speed = timing.default_speed.clamp(1, 100);
        timing.pause_poll_units = timing.pause_poll_units.clamp(1, MAX_PAUSE_POLL_UNITS);
        timing.unit_micros = timing.unit_micros.clamp(1, MAX_UNIT_MICROS);

        let random = &mut self.random;
        if random.min_len > random.max_len {
            std::mem::swap(&mut random.min_len, &mut random.max_len);
        }
        random.min_len = random.min_len.clamp(1, MAX_LEN);
        random.max_len = random.max_len.clamp(1, MAX_LEN);

        if random.min_value > random.max_value {
            std::mem::swap(&mut random.min_value, &mut random.max_value);
        }
        random.min_value = random.min_value.clamp(MIN_VALUE, MAX_VALUE);
        random.max_value = random.max_value.clamp(MIN_VALUE, MAX_VALUE);
        self
    }
}

/// Pacing of the animation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Speed used until the user picks another one, in 1..=100.
    pub default_speed: u8,
    /// Length of one wait while paused, in time units.
    pub pause_poll_units: u64,
    /// Length of one time unit in microseconds.
    pub unit_micros: u64,
}

impl TimingConfig {
    /// Never zero, even for a config that skipped normalisation.
    pub fn time_unit(&self) -> Duration {
        Duration::from_micros(self.unit_micros.max(1))
    }

    /// Never zero, so a paused run always blocks between polls.
    pub fn pause_poll(&self) -> Duration {
        let units = self.pause_poll_units.max(1);
        Duration::from_micros(self.unit_micros.max(1).saturating_mul(units))
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            default_speed: 50,
            pause_poll_units: 100,
            unit_micros: 1_000,
        }
    }
}

/// Ranges used when generating a random sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomConfig {
    pub min_len: usize,
    pub max_len: usize,
    pub min_value: u8,
    pub max_value: u8,
}

impl Default for RandomConfig {
    fn default() -> Self {
        Self {
            min_len: 8,
            max_len: 18,
            min_value: 10,
            max_value: 99,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = AppConfig::from_json_str(r#"{ "timing": { "default_speed": 90 } }"#).unwrap();

        assert_eq!(config.timing.default_speed, 90);
        assert_eq!(config.timing.pause_poll_units, 100);
        assert_eq!(config.random, RandomConfig::default());
    }

    #[test]
    fn normalises_inverted_and_out_of_range_values() {
        let config = AppConfig::from_json_str(
            r#"{
                "timing": { "default_speed": 0, "unit_micros": 0 },
                "random": { "min_len": 40, "max_len": 2, "min_value": 200, "max_value": 0 }
            }"#,
        )
        .unwrap();

        assert_eq!(config.timing.default_speed, 1);
        assert_eq!(config.timing.unit_micros, 1);
        assert_eq!(config.random.min_len, 2);
        assert_eq!(config.random.max_len, MAX_LEN);
        assert_eq!(config.random.min_value, MIN_VALUE);
        assert_eq!(config.random.max_value, MAX_VALUE);
    }

    #[test]
    fn caps_oversized_timing_values() {
        let config = AppConfig::from_json_str(
            r#"{ "timing": { "pause_poll_units": 4294967296, "unit_micros": 18446744073709551615 } }"#,
        )
        .unwrap();

        assert_eq!(config.timing.pause_poll_units, MAX_PAUSE_POLL_UNITS);
        assert_eq!(config.timing.unit_micros, MAX_UNIT_MICROS);
        assert_eq!(config.timing.time_unit(), Duration::from_secs(1));
        assert_eq!(config.timing.pause_poll(), Duration::from_secs(10_000));
    }

    #[test]
    fn pause_poll_never_truncates_to_zero() {
        let timing = TimingConfig {
            pause_poll_units: 4_294_967_296,
            unit_micros: 1,
            ..Default::default()
        };
        assert_eq!(timing.pause_poll(), Duration::from_micros(4_294_967_296));

        let extreme = TimingConfig {
            pause_poll_units: u64::MAX,
            unit_micros: u64::MAX,
            ..Default::default()
        };
        assert_eq!(extreme.pause_poll(), Duration::from_micros(u64::MAX));

        let zeroed = TimingConfig {
            pause_poll_units: 0,
            unit_micros: 0,
            ..Default::default()
        };
        assert_eq!(zeroed.pause_poll(), Duration::from_micros(1));
    }

    #[test]
    fn pause_poll_scales_with_time_unit() {
        let timing = TimingConfig {
            unit_micros: 10,
            pause_poll_units: 100,
            ..Default::default()
        };
        assert_eq!(timing.pause_poll(), Duration::from_millis(1));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = AppConfig::from_json_str("{ timing: ").unwrap_err();
        assert!(matches!(err, crate::SortVizError::Json(_)));
    }
}
