use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};

/// Notification emitted by the engine for the presentation layer. Delivery
/// is fire-and-forget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum VisualEvent {
    /// A new sequence was loaded.
    Loaded { values: Vec<u8> },
    Comparing { i: usize, j: usize },
    CompareEnd { i: usize, j: usize },
    /// Carries the values now stored at `i` and `j`.
    Swapping {
        i: usize,
        j: usize,
        value_i: u8,
        value_j: u8,
    },
    SwapEnd { i: usize, j: usize },
    ValueWritten { index: usize, value: u8 },
    WriteEnd { index: usize },
    PivotMarked { index: usize },
    PivotUnmarked { index: usize },
    /// The run completed; `values` is the final order.
    Sorted { values: Vec<u8> },
    /// The run ended early.
    Aborted { reason: String },
    /// Animation state was cleared.
    Reset { values: Vec<u8> },
}

/// Consumer of [`VisualEvent`]s.
pub trait Presenter: Send {
    fn present(&mut self, event: &VisualEvent);
}

/// Records every event. Clones share the same log, so a caller can inspect
/// what a controller-owned clone received.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    events: Arc<Mutex<Vec<VisualEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<VisualEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Presenter for EventLog {
    fn present(&mut self, event: &VisualEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}

/// Forwards every event to each inner presenter in order.
#[derive(Default)]
pub struct Fanout {
    presenters: Vec<Box<dyn Presenter>>,
}

impl Fanout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, presenter: impl Presenter + 'static) -> Self {
        self.presenters.push(Box::new(presenter));
        self
    }

    pub fn push(&mut self, presenter: Box<dyn Presenter>) {
        self.presenters.push(presenter);
    }
}

impl Presenter for Fanout {
    fn present(&mut self, event: &VisualEvent) {
        for presenter in &mut self.presenters {
            presenter.present(event);
        }
    }
}

impl std::fmt::Debug for Fanout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fanout")
            .field("presenters", &self.presenters.len())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Highlight {
    #[default]
    None,
    Comparing,
    Swapping,
    Writing,
    Pivot,
    Sorted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bar {
    pub value: u8,
    pub highlight: Highlight,
}

/// Presentation state of the bars, rebuilt from the event stream.
#[derive(Debug, Clone, Default)]
pub struct BarBoard {
    bars: Vec<Bar>,
    pivot: Option<usize>,
}

impl BarBoard {
    pub fn new(values: &[u8]) -> Self {
        let mut board = Self::default();
        board.load(values, Highlight::None);
        board
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn values(&self) -> Vec<u8> {
        self.bars.iter().map(|bar| bar.value).collect()
    }

    pub fn apply(&mut self, event: &VisualEvent) {
        match event {
            VisualEvent::Loaded { values } | VisualEvent::Reset { values } => {
                self.load(values, Highlight::None)
            }
            VisualEvent::Sorted { values } => self.load(values, Highlight::Sorted),
            VisualEvent::Comparing { i, j } => {
                self.highlight(*i, Highlight::Comparing);
                self.highlight(*j, Highlight::Comparing);
            }
            VisualEvent::Swapping {
                i,
                j,
                value_i,
                value_j,
            } => {
                self.set_value(*i, *value_i);
                self.set_value(*j, *value_j);
                self.highlight(*i, Highlight::Swapping);
                self.highlight(*j, Highlight::Swapping);
            }
            VisualEvent::CompareEnd { i, j } | VisualEvent::SwapEnd { i, j } => {
                self.settle(*i);
                self.settle(*j);
            }
            VisualEvent::ValueWritten { index, value } => {
                self.set_value(*index, *value);
                self.highlight(*index, Highlight::Writing);
            }
            VisualEvent::WriteEnd { index } => self.settle(*index),
            VisualEvent::PivotMarked { index } => {
                self.pivot = Some(*index);
                self.highlight(*index, Highlight::Pivot);
            }
            VisualEvent::PivotUnmarked { index } => {
                if self.pivot == Some(*index) {
                    self.pivot = None;
                }
                self.settle(*index);
            }
            VisualEvent::Aborted { .. } => {
                self.pivot = None;
                for bar in &mut self.bars {
                    bar.highlight = Highlight::None;
                }
            }
        }
    }

    fn load(&mut self, values: &[u8], highlight: Highlight) {
        self.pivot = None;
        self.bars = values
            .iter()
            .map(|&value| Bar { value, highlight })
            .collect();
    }

    fn set_value(&mut self, index: usize, value: u8) {
        if let Some(bar) = self.bars.get_mut(index) {
            bar.value = value;
        }
    }

    fn highlight(&mut self, index: usize, highlight: Highlight) {
        if let Some(bar) = self.bars.get_mut(index) {
            bar.highlight = highlight;
        }
    }

    /// Returns a bar to its resting highlight once an operation ends.
    fn settle(&mut self, index: usize) {
        let resting = if self.pivot == Some(index) {
            Highlight::Pivot
        } else {
            Highlight::None
        };
        self.highlight(index, resting);
    }
}

impl Presenter for BarBoard {
    fn present(&mut self, event: &VisualEvent) {
        self.apply(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn highlights(board: &BarBoard) -> Vec<Highlight> {
        board.bars().iter().map(|bar| bar.highlight).collect()
    }

    #[test]
    fn tracks_values_and_highlights() {
        let mut board = BarBoard::new(&[3, 1, 2]);

        board.apply(&VisualEvent::Comparing { i: 0, j: 1 });
        assert_eq!(
            highlights(&board),
            vec![Highlight::Comparing, Highlight::Comparing, Highlight::None]
        );

        board.apply(&VisualEvent::CompareEnd { i: 0, j: 1 });
        board.apply(&VisualEvent::Swapping {
            i: 0,
            j: 1,
            value_i: 1,
            value_j: 3,
        });
        assert_eq!(board.values(), vec![1, 3, 2]);
        assert_eq!(board.bars()[0].highlight, Highlight::Swapping);

        board.apply(&VisualEvent::SwapEnd { i: 0, j: 1 });
        assert!(highlights(&board).iter().all(|h| *h == Highlight::None));
    }

    #[test]
    fn pivot_survives_comparisons_until_unmarked() {
        let mut board = BarBoard::new(&[4, 2, 3]);
        board.apply(&VisualEvent::PivotMarked { index: 2 });
        board.apply(&VisualEvent::Comparing { i: 2, j: 0 });
        board.apply(&VisualEvent::CompareEnd { i: 2, j: 0 });
        assert_eq!(board.bars()[2].highlight, Highlight::Pivot);

        board.apply(&VisualEvent::PivotUnmarked { index: 2 });
        assert_eq!(board.bars()[2].highlight, Highlight::None);
    }

    #[test]
    fn aborted_clears_highlights_and_sorted_marks_everything() {
        let mut board = BarBoard::new(&[2, 1]);
        board.apply(&VisualEvent::PivotMarked { index: 1 });
        board.apply(&VisualEvent::ValueWritten { index: 0, value: 9 });
        board.apply(&VisualEvent::Aborted {
            reason: "cancelled".to_string(),
        });
        assert_eq!(board.values(), vec![9, 1]);
        assert!(highlights(&board).iter().all(|h| *h == Highlight::None));

        board.apply(&VisualEvent::Sorted { values: vec![1, 9] });
        assert!(highlights(&board).iter().all(|h| *h == Highlight::Sorted));
    }

    #[test]
    fn out_of_range_indices_are_ignored() {
        let mut board = BarBoard::new(&[1]);
        board.apply(&VisualEvent::ValueWritten { index: 5, value: 2 });
        assert_eq!(board.values(), vec![1]);
    }

    #[test]
    fn fanout_forwards_to_every_presenter() {
        let first = EventLog::new();
        let second = EventLog::new();
        let mut fanout = Fanout::new().with(first.clone()).with(second.clone());

        fanout.present(&VisualEvent::PivotMarked { index: 0 });

        assert_eq!(first.events(), second.events());
        assert_eq!(first.len(), 1);
    }

    #[test]
    fn events_serialise_with_a_tag() {
        let json = serde_json::to_string(&VisualEvent::Comparing { i: 1, j: 2 }).unwrap();
        assert_eq!(json, r#"{"event":"comparing","i":1,"j":2}"#);
    }
}
