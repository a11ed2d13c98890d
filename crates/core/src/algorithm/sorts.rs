//! The five sorts, written purely against [`InstrumentedArray`].

use crate::{InstrumentedArray, Result};

pub fn bubble_sort(array: &mut InstrumentedArray<'_>) -> Result<()> {
    let n = array.len();
    for pass in 0..n.saturating_sub(1) {
        for j in 0..n - pass - 1 {
            if array.compare(j, j + 1)? {
                array.swap(j, j + 1)?;
            }
        }
    }
    Ok(())
}

pub fn selection_sort(array: &mut InstrumentedArray<'_>) -> Result<()> {
    let n = array.len();
    for i in 0..n.saturating_sub(1) {
        let mut min_index = i;
        for j in i + 1..n {
            if array.compare(min_index, j)? {
                min_index = j;
            }
        }
        if min_index != i {
            array.swap(i, min_index)?;
        }
    }
    Ok(())
}

pub fn insertion_sort(array: &mut InstrumentedArray<'_>) -> Result<()> {
    for i in 1..array.len() {
        let mut j = i;
        while j > 0 && array.compare(j - 1, j)? {
            array.swap(j - 1, j)?;
            j -= 1;
        }
    }
    Ok(())
}

pub fn merge_sort(array: &mut InstrumentedArray<'_>) -> Result<()> {
    let len = array.len();
    if len < 2 {
        return Ok(());
    }
    merge_sort_range(array, 0, len - 1)
}

fn merge_sort_range(array: &mut InstrumentedArray<'_>, left: usize, right: usize) -> Result<()> {
    if left >= right {
        return Ok(());
    }
    let mid = left + (right - left) / 2;

    merge_sort_range(array, left, mid)?;
    merge_sort_range(array, mid + 1, right)?;
    merge(array, left, mid, right)
}

/// Merges `[left, mid]` and `[mid + 1, right]` through scratch buffers.
/// Ties take from the left half, keeping the merge stable.
fn merge(array: &mut InstrumentedArray<'_>, left: usize, mid: usize, right: usize) -> Result<()> {
    let left_half = array.values()[left..=mid].to_vec();
    let right_half = array.values()[mid + 1..=right].to_vec();

    let (mut i, mut j, mut k) = (0, 0, left);

    while i < left_half.len() && j < right_half.len() {
        array.count_comparison();
        if left_half[i] <= right_half[j] {
            array.write(k, left_half[i])?;
            i += 1;
        } else {
            array.write(k, right_half[j])?;
            j += 1;
        }
        k += 1;
    }

    // Tails are copied without comparing.
    for &value in left_half[i..].iter().chain(&right_half[j..]) {
        array.write(k, value)?;
        k += 1;
    }
    Ok(())
}

pub fn quick_sort(array: &mut InstrumentedArray<'_>) -> Result<()> {
    let len = array.len();
    if len < 2 {
        return Ok(());
    }
    quick_sort_range(array, 0, len - 1)
}

fn quick_sort_range(array: &mut InstrumentedArray<'_>, low: usize, high: usize) -> Result<()> {
    if low >= high {
        return Ok(());
    }
    let pivot = partition(array, low, high)?;

    if pivot > low {
        quick_sort_range(array, low, pivot - 1)?;
    }
    quick_sort_range(array, pivot + 1, high)
}

/// Lomuto partition around `values[high]`; returns the pivot's final slot.
/// The pivot is released even when the partition ends early.
fn partition(array: &mut InstrumentedArray<'_>, low: usize, high: usize) -> Result<usize> {
    array.mark_pivot(high);
    let placed = partition_around_pivot(array, low, high);
    array.unmark_pivot(high);
    placed
}

fn partition_around_pivot(
    array: &mut InstrumentedArray<'_>,
    low: usize,
    high: usize,
) -> Result<usize> {
    let mut store = low;
    for j in low..high {
        if array.compare(high, j)? {
            array.swap(store, j)?;
            store += 1;
        }
    }
    array.swap(store, high)?;
    Ok(store)
}
