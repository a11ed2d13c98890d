use crate::{Presenter, Result, SortVizError, Stats, Stepper, VisualEvent};

/// Sequence view handed to the sorting algorithms.
///
/// Every mutating or comparing operation counts itself, notifies the
/// presenter and suspends through the [`Stepper`]. Algorithms never touch
/// stats, timing or presentation any other way.
pub struct InstrumentedArray<'a> {
    values: &'a mut [u8],
    stats: &'a mut Stats,
    stepper: &'a mut Stepper,
    presenter: &'a mut dyn Presenter,
}

impl<'a> InstrumentedArray<'a> {
    pub fn new(
        values: &'a mut [u8],
        stats: &'a mut Stats,
        stepper: &'a mut Stepper,
        presenter: &'a mut dyn Presenter,
    ) -> Self {
        Self {
            values,
            stats,
            stepper,
            presenter,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[u8] {
        self.values
    }

    pub fn stats(&self) -> &Stats {
        self.stats
    }

    pub fn get(&self, index: usize) -> Result<u8> {
        self.values
            .get(index)
            .copied()
            .ok_or(SortVizError::IndexOutOfRange {
                index,
                len: self.values.len(),
            })
    }

    /// Returns `values[i] > values[j]` after one counted, visible step.
    pub fn compare(&mut self, i: usize, j: usize) -> Result<bool> {
        let (left, right) = (self.get(i)?, self.get(j)?);

        self.stats.comparisons += 1;
        self.presenter.present(&VisualEvent::Comparing { i, j });
        self.stepper.suspend(self.stats)?;
        self.presenter.present(&VisualEvent::CompareEnd { i, j });

        Ok(left > right)
    }

    /// Exchanges two slots. Swapping a slot with itself does nothing: no
    /// count, no notification, no suspension.
    pub fn swap(&mut self, i: usize, j: usize) -> Result<()> {
        self.get(i)?;
        self.get(j)?;
        if i == j {
            return Ok(());
        }

        self.values.swap(i, j);
        self.stats.swaps += 1;
        self.presenter.present(&VisualEvent::Swapping {
            i,
            j,
            value_i: self.values[i],
            value_j: self.values[j],
        });
        self.stepper.suspend(self.stats)?;
        self.presenter.present(&VisualEvent::SwapEnd { i, j });

        Ok(())
    }

    /// Stores `value` at `index` as one counted, visible step.
    pub fn write(&mut self, index: usize, value: u8) -> Result<()> {
        self.get(index)?;

        self.values[index] = value;
        self.stats.writes += 1;
        self.presenter
            .present(&VisualEvent::ValueWritten { index, value });
        self.stepper.suspend(self.stats)?;
        self.presenter.present(&VisualEvent::WriteEnd { index });

        Ok(())
    }

    /// Counts a comparison made outside the sequence, e.g. between merge
    /// buffers. The subsequent write carries the visible step.
    pub fn count_comparison(&mut self) {
        self.stats.comparisons += 1;
    }

    pub fn mark_pivot(&mut self, index: usize) {
        self.presenter.present(&VisualEvent::PivotMarked { index });
    }

    pub fn unmark_pivot(&mut self, index: usize) {
        self.presenter.present(&VisualEvent::PivotUnmarked { index });
    }
}

impl std::fmt::Debug for InstrumentedArray<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstrumentedArray")
            .field("values", &self.values)
            .field("stats", &self.stats)
            .finish()
    }
}
