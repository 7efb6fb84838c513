/*!
 * FIFO Storage
 * First-in-first-out message buffer; only touched under the queue lock
 */

use std::collections::VecDeque;

/// Unbounded FIFO buffer
#[derive(Debug)]
pub(crate) struct Storage<T> {
    messages: VecDeque<T>,
}

impl<T> Storage<T> {
    pub fn new() -> Self {
        Self {
            messages: VecDeque::new(),
        }
    }

    pub fn push(&mut self, message: T) {
        self.messages.push_back(message);
    }

    pub fn pop(&mut self) -> Option<T> {
        self.messages.pop_front()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl<T> Default for Storage<T> {
    fn default() -> Self {
        Self::new()
    }
}
