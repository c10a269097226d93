use ringbuffer::{AllocRingBuffer, RingBuffer};

use crate::error::{Result, ValueFunctionError};

/// Bounded history of whole items, oldest evicted first.
///
/// The value function stores complete training batches here, so a capacity
/// of one means "exactly the previous generation".
pub struct ReplayMemory<T> {
    buffer: AllocRingBuffer<T>,
}

impl<T> ReplayMemory<T> {
    pub fn new(capacity: usize) -> Result<ReplayMemory<T>> {
        if capacity == 0 {
            return Err(ValueFunctionError::InvalidConfig(
                "replay memory capacity should be at least 1".to_string(),
            ));
        }
        Ok(ReplayMemory {
            buffer: AllocRingBuffer::new(capacity),
        })
    }

    pub fn push(&mut self, value: T) {
        self.buffer.push(value);
    }

    /// Retained items, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.buffer.iter()
    }

    pub fn latest(&self) -> Option<&T> {
        self.buffer.back()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use expect_test::expect;

    use super::ReplayMemory;
    use crate::error::ValueFunctionError;

    #[test]
    fn test_replay_memory_single_generation() {
        let mut memory = ReplayMemory::new(1).unwrap();
        assert!(memory.is_empty());
        assert_eq!(memory.latest(), None);

        memory.push(vec![1, 2, 3]);
        memory.push(vec![4, 5]);
        let expected = expect![[r#"
            [
                [
                    4,
                    5,
                ],
            ]
        "#]];
        expected.assert_debug_eq(&memory.iter().collect::<Vec<_>>());
        assert_eq!(memory.len(), 1);
        assert_eq!(memory.latest(), Some(&vec![4, 5]));
    }

    #[test]
    fn test_replay_memory_eviction_order() {
        let mut memory = ReplayMemory::new(3).unwrap();
        for i in 0..5 {
            memory.push(i);
        }
        let expected = expect![[r#"
            [
                2,
                3,
                4,
            ]
        "#]];
        expected.assert_debug_eq(&memory.iter().copied().collect::<Vec<_>>());
        assert_eq!(memory.len(), 3);
        assert_eq!(memory.latest(), Some(&4));
    }

    #[test]
    fn test_replay_memory_rejects_zero_capacity() {
        let result = ReplayMemory::<u8>::new(0);
        assert!(matches!(result, Err(ValueFunctionError::InvalidConfig(_))));
    }
}
