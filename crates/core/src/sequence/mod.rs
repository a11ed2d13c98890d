use std::{fmt, str::FromStr};

use rand::Rng;
use serde::Serialize;

use crate::{config::RandomConfig, Result, SortVizError};

/// Smallest value a bar may hold.
pub const MIN_VALUE: u8 = 1;
/// Largest value a bar may hold.
pub const MAX_VALUE: u8 = 100;
/// Maximum number of bars.
pub const MAX_LEN: usize = 20;

/// Ordered list of bar values, each within `MIN_VALUE..=MAX_VALUE`, holding
/// at most `MAX_LEN` entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Sequence(Vec<u8>);

impl Sequence {
    /// Builds a sequence, clamping every value into range. Fails without
    /// clamping the length when more than `MAX_LEN` values are supplied.
    pub fn new<I>(values: I) -> Result<Self>
    where
        I: IntoIterator<Item = i64>,
    {
        let values: Vec<u8> = values.into_iter().map(clamp_value).collect();
        if values.len() > MAX_LEN {
            return Err(SortVizError::TooManyElements {
                count: values.len(),
                limit: MAX_LEN,
            });
        }
        Ok(Self(values))
    }

    /// Parses comma separated integers such as `"3, 150, -2"`.
    ///
    /// Any token that is not an integer rejects the whole input.
    pub fn parse(input: &str) -> Result<Self> {
        if input.trim().is_empty() {
            return Err(SortVizError::InvalidInput("no values supplied".to_string()));
        }

        let values = input
            .split(',')
            .map(|token| {
                let token = token.trim();
                token
                    .parse::<i64>()
                    .map_err(|_| SortVizError::InvalidInput(format!("`{token}` is not a number")))
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(values)
    }

    /// Generates a random sequence within the configured ranges.
    pub fn random<R: Rng + ?Sized>(config: &RandomConfig, rng: &mut R) -> Self {
        let (min_len, max_len) = ordered(config.min_len, config.max_len);
        let (min_value, max_value) = ordered(config.min_value, config.max_value);

        let len = rng.gen_range(min_len..=max_len).min(MAX_LEN);
        let values = (0..len)
            .map(|_| rng.gen_range(min_value..=max_value))
            .map(|value| value.clamp(MIN_VALUE, MAX_VALUE))
            .collect();
        Self(values)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_sorted(&self) -> bool {
        self.0.windows(2).all(|pair| pair[0] <= pair[1])
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl FromStr for Sequence {
    type Err = SortVizError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for value in &self.0 {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{value}")?;
            first = false;
        }
        Ok(())
    }
}

fn clamp_value(value: i64) -> u8 {
    value.clamp(i64::from(MIN_VALUE), i64::from(MAX_VALUE)) as u8
}

fn ordered<T: PartialOrd>(a: T, b: T) -> (T, T) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn clamps_out_of_range_values() {
        let sequence = Sequence::parse("3, 150, -2").unwrap();
        assert_eq!(sequence.as_slice(), &[3, 100, 1]);
    }

    #[test]
    fn rejects_whole_input_on_bad_token() {
        let err = Sequence::parse("3, 150, -2, abc").unwrap_err();
        assert!(matches!(err, SortVizError::InvalidInput(ref msg) if msg.contains("abc")));
    }

    #[test]
    fn rejects_empty_input() {
        assert!(matches!(
            Sequence::parse("   ").unwrap_err(),
            SortVizError::InvalidInput(_)
        ));
    }

    #[test]
    fn rejects_more_than_twenty_values() {
        let input = (1..=21).map(|v| v.to_string()).collect::<Vec<_>>().join(",");
        let err = Sequence::parse(&input).unwrap_err();
        assert!(matches!(
            err,
            SortVizError::TooManyElements {
                count: 21,
                limit: MAX_LEN
            }
        ));

        let twenty = (1..=20).map(|v| v.to_string()).collect::<Vec<_>>().join(",");
        assert_eq!(Sequence::parse(&twenty).unwrap().len(), 20);
    }

    #[test]
    fn random_sequences_respect_configured_ranges() {
        let config = RandomConfig::default();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..50 {
            let sequence = Sequence::random(&config, &mut rng);
            assert!((config.min_len..=config.max_len).contains(&sequence.len()));
            assert!(sequence
                .as_slice()
                .iter()
                .all(|v| (config.min_value..=config.max_value).contains(v)));
        }
    }

    #[test]
    fn displays_as_comma_separated_list() {
        let sequence = Sequence::new([5, 3, 8]).unwrap();
        assert_eq!(sequence.to_string(), "5, 3, 8");
        assert_eq!(Sequence::default().to_string(), "");
    }
}
