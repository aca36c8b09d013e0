use std::collections::HashSet;
use std::hash::Hash;

/// Copies `list`, dropping repeated elements but keeping the first occurrence of each in place.
pub fn dedup_in_order<T>(list: &[T]) -> Vec<T>
where
    T: Copy + Eq + Hash,
{
    let mut seen = HashSet::with_capacity(list.len());

    list.iter().copied().filter(|item| seen.insert(*item)).collect()
}

/// Keeps only the elements of `list` that also appear in `other`. The order of `list` is kept.
pub fn retain_common<T>(list: &mut Vec<T>, other: &[T])
where
    T: Eq,
{
    list.retain(|item| other.contains(item));
}
