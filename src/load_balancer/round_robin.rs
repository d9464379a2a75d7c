//! Round-robin selection.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Round-robin selector.
/// Owns the items and an internal cursor that rotates through them.
///
/// Selection ignores load and health: every call advances the cursor by
/// exactly one position, atomically, so concurrent callers never share a slot.
#[derive(Debug)]
pub struct RoundRobin<T> {
    items: Vec<T>,
    cursor: AtomicUsize,
}

impl<T> RoundRobin<T> {
    /// Returns `None` when `items` is empty.
    pub fn new(items: Vec<T>) -> Option<Self> {
        if items.is_empty() {
            return None;
        }
        Some(Self {
            items,
            cursor: AtomicUsize::new(0),
        })
    }

    /// Hand out the item at the cursor and advance it.
    pub fn next(&self) -> &T {
        let len = self.items.len();
        // The closure never returns None, so both arms carry the previous value.
        let index = match self
            .cursor
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |i| Some((i + 1) % len))
        {
            Ok(i) | Err(i) => i,
        };
        &self.items[index]
    }

    /// Items in rotation order.
    pub fn items(&self) -> &[T] {
        &self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;

    #[test]
    fn test_round_robin() {
        let lb = RoundRobin::new(vec!["b1", "b2"]).unwrap();

        assert_eq!(*lb.next(), "b1");
        assert_eq!(*lb.next(), "b2");
        assert_eq!(*lb.next(), "b1");
    }

    #[test]
    fn test_sequence_is_configured_list_repeated() {
        let names = vec!["r1", "r2", "r3"];
        for n in [0usize, 1, 2, 3, 4, 7, 9, 10] {
            let lb = RoundRobin::new(names.clone()).unwrap();
            let got: Vec<_> = (0..n).map(|_| *lb.next()).collect();
            let expected: Vec<_> = names.iter().copied().cycle().take(n).collect();
            assert_eq!(got, expected, "n = {n}");
        }
    }

    #[test]
    fn test_single_item() {
        let lb = RoundRobin::new(vec![42]).unwrap();
        assert!((0..5).all(|_| *lb.next() == 42));
    }

    #[test]
    fn test_empty_is_rejected() {
        assert!(RoundRobin::<u8>::new(Vec::new()).is_none());
    }

    #[test]
    fn test_concurrent_callers_split_evenly() {
        let lb = Arc::new(RoundRobin::new(vec!["r1", "r2", "r3"]).unwrap());
        let threads: Vec<_> = (0..6)
            .map(|_| {
                let lb = lb.clone();
                std::thread::spawn(move || (0..500).map(|_| *lb.next()).collect::<Vec<_>>())
            })
            .collect();

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for t in threads {
            for name in t.join().unwrap() {
                *counts.entry(name).or_default() += 1;
            }
        }

        // 3000 advances over 3 items: no lost or duplicated steps
        assert_eq!(counts["r1"], 1000);
        assert_eq!(counts["r2"], 1000);
        assert_eq!(counts["r3"], 1000);
    }
}
