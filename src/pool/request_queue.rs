//! FIFO of pooled request records drained under a per-frame budget

use std::collections::VecDeque;

use super::object_pool::{ObjectPool, PoolHandle};

/// Requests queued during a frame and consumed later, a bounded number at a
/// time. Each request lives in a pool slot until it is popped.
#[derive(Debug)]
pub struct RequestQueue<T: Copy> {
    pool: ObjectPool<T>,
    order: VecDeque<PoolHandle>,
}

impl<T: Copy> RequestQueue<T> {
    pub fn new(label: &'static str, capacity: usize) -> Self {
        Self {
            pool: ObjectPool::new(label, capacity),
            order: VecDeque::with_capacity(capacity),
        }
    }

    /// Queue a request. Returns false (and drops it) when the queue is full.
    pub fn push(&mut self, request: T) -> bool {
        match self.pool.acquire(request) {
            Some(handle) => {
                self.order.push_back(handle);
                true
            }
            None => false,
        }
    }

    /// Take the oldest request and return its slot to the pool.
    pub fn pop(&mut self) -> Option<T> {
        let handle = self.order.pop_front()?;
        let request = self.pool.get(handle).copied();
        self.pool.release(handle);
        request
    }

    /// Pop at most `budget` requests into `consume`; returns how many ran.
    pub fn drain_budgeted(&mut self, budget: usize, mut consume: impl FnMut(T)) -> usize {
        let mut consumed = 0;
        while consumed < budget {
            let Some(request) = self.pop() else { break };
            consume(request);
            consumed += 1;
        }
        consumed
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.pool.capacity()
    }

    /// Requests refused because the queue was full.
    pub fn dropped(&self) -> u64 {
        self.pool.dropped()
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.pool.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut queue = RequestQueue::new("test", 8);
        for i in 0..5u32 {
            assert!(queue.push(i));
        }
        assert_eq!(queue.pop(), Some(0));
        assert_eq!(queue.pop(), Some(1));
        assert_eq!(queue.len(), 3);
    }

    #[test]
    fn test_budget_limits_drain() {
        let mut queue = RequestQueue::new("test", 64);
        for i in 0..50u32 {
            queue.push(i);
        }
        let mut seen = Vec::new();
        assert_eq!(queue.drain_budgeted(30, |r| seen.push(r)), 30);
        assert_eq!(seen.len(), 30);
        assert_eq!(queue.len(), 20);
        assert_eq!(queue.drain_budgeted(30, |r| seen.push(r)), 20);
        assert_eq!(seen, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_full_queue_drops_requests() {
        let mut queue = RequestQueue::new("test", 2);
        assert!(queue.push(1u8));
        assert!(queue.push(2u8));
        assert!(!queue.push(3u8));
        assert_eq!(queue.dropped(), 1);

        queue.pop();
        assert!(queue.push(4u8));
        assert_eq!(queue.pop(), Some(2));
        assert_eq!(queue.pop(), Some(4));
        assert!(queue.is_empty());
    }
}
