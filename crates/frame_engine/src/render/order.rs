//! Render ordering
//!
//! Surfaces are kept sorted by ascending priority with a selection sort that
//! is re-run after every registry change. O(n²) per change, which is fine
//! while surfaces are added and removed far less often than frames are
//! drawn. Equal priorities may swap places (the sort is not stable).

/// Sort `items` in place by ascending `priority_of`
///
/// Slices of length 0 or 1 are left untouched.
pub fn selection_sort_by_priority<T, P, F>(items: &mut [T], mut priority_of: F)
where
    P: Ord,
    F: FnMut(&T) -> P,
{
    let len = items.len();
    if len < 2 {
        return;
    }

    for i in 0..len - 1 {
        let mut lowest = i;
        for j in (i + 1)..len {
            if priority_of(&items[j]) < priority_of(&items[lowest]) {
                lowest = j;
            }
        }
        if lowest != i {
            items.swap(i, lowest);
        }
    }
}
