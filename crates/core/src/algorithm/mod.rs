use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{InstrumentedArray, Result, SortVizError};

mod sorts;

pub use sorts::{bubble_sort, insertion_sort, merge_sort, quick_sort, selection_sort};

/// The sorting algorithms the visualiser can animate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Bubble,
    Selection,
    Insertion,
    Merge,
    Quick,
}

impl Algorithm {
    pub const ALL: [Algorithm; 5] = [
        Algorithm::Bubble,
        Algorithm::Selection,
        Algorithm::Insertion,
        Algorithm::Merge,
        Algorithm::Quick,
    ];

    /// Short lowercase identifier, as accepted by [`FromStr`].
    pub fn key(self) -> &'static str {
        match self {
            Algorithm::Bubble => "bubble",
            Algorithm::Selection => "selection",
            Algorithm::Insertion => "insertion",
            Algorithm::Merge => "merge",
            Algorithm::Quick => "quick",
        }
    }

    pub fn info(self) -> AlgorithmInfo {
        match self {
            Algorithm::Bubble => AlgorithmInfo {
                name: "Bubble Sort",
                description: "Repeatedly steps through the list, compares adjacent elements and swaps them if they are in the wrong order.",
                time_complexity: "O(n²)",
                space_complexity: "O(1)",
            },
            Algorithm::Selection => AlgorithmInfo {
                name: "Selection Sort",
                description: "Divides the list into sorted and unsorted regions, repeatedly selecting the minimum element.",
                time_complexity: "O(n²)",
                space_complexity: "O(1)",
            },
            Algorithm::Insertion => AlgorithmInfo {
                name: "Insertion Sort",
                description: "Builds the sorted array one element at a time by inserting each element into its correct position.",
                time_complexity: "O(n²)",
                space_complexity: "O(1)",
            },
            Algorithm::Merge => AlgorithmInfo {
                name: "Merge Sort",
                description: "Divides the array into halves, sorts them recursively, then merges the sorted halves.",
                time_complexity: "O(n log n)",
                space_complexity: "O(n)",
            },
            Algorithm::Quick => AlgorithmInfo {
                name: "Quick Sort",
                description: "Picks a pivot element, partitions the array around it, then recursively sorts sub-arrays.",
                time_complexity: "O(n log n)",
                space_complexity: "O(log n)",
            },
        }
    }

    /// Runs the algorithm to completion over `array`.
    pub fn run(self, array: &mut InstrumentedArray<'_>) -> Result<()> {
        match self {
            Algorithm::Bubble => bubble_sort(array),
            Algorithm::Selection => selection_sort(array),
            Algorithm::Insertion => insertion_sort(array),
            Algorithm::Merge => merge_sort(array),
            Algorithm::Quick => quick_sort(array),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Algorithm {
    type Err = SortVizError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Algorithm::ALL
            .into_iter()
            .find(|algorithm| algorithm.key().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| SortVizError::InvalidInput(format!("unknown algorithm `{wanted}`")))
    }
}

/// Static description shown next to the bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AlgorithmInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub time_complexity: &'static str,
    pub space_complexity: &'static str,
}
