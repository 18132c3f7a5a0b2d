//! Completion queue
//!
//! Workers push finished results; the interactive tick drains them. The lock
//! is held only for the push or the swap, never while a result is computed.

use parking_lot::Mutex;
use std::collections::VecDeque;

/// FIFO hand-off from worker threads to the interactive thread
#[derive(Debug)]
pub struct CompletionQueue<T> {
    items: Mutex<VecDeque<T>>,
}

impl<T> Default for CompletionQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> CompletionQueue<T> {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
        }
    }

    pub fn push(&self, item: T) {
        self.items.lock().push_back(item);
    }

    /// Take everything queued so far, oldest first
    pub fn drain(&self) -> Vec<T> {
        let taken = std::mem::take(&mut *self.items.lock());
        taken.into()
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_drain_preserves_push_order() {
        let queue = CompletionQueue::new();
        for i in 0..5 {
            queue.push(i);
        }
        assert_eq!(queue.len(), 5);
        assert_eq!(queue.drain(), vec![0, 1, 2, 3, 4]);
        assert!(queue.is_empty());
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn test_concurrent_producers_lose_nothing() {
        let queue = Arc::new(CompletionQueue::new());
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let queue = Arc::clone(&queue);
                std::thread::spawn(move || {
                    for i in 0..250 {
                        queue.push(t * 1000 + i);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let mut items = queue.drain();
        assert_eq!(items.len(), 1000);

        // each producer's items keep their relative order
        for t in 0..4 {
            let own: Vec<_> = items.iter().copied().filter(|v| v / 1000 == t).collect();
            assert!(own.windows(2).all(|w| w[0] < w[1]));
        }
        items.sort_unstable();
        items.dedup();
        assert_eq!(items.len(), 1000);
    }
}
