use crate::error::Result;

const INITIAL_CAPACITY: usize = 16;

/// FIFO ring buffer that doubles its storage when full.
#[derive(Debug, Default)]
pub struct RingQueue<T: Copy + Default> {
    buf: Vec<T>,
    head: usize,
    len: usize,
}

impl<T: Copy + Default> RingQueue<T> {
    pub fn new() -> Self {
        RingQueue {
            buf: Vec::new(),
            head: 0,
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    pub fn push(&mut self, item: T) -> Result<()> {
        if self.len == self.buf.len() {
            self.grow()?;
        }
        let tail = (self.head + self.len) % self.buf.len();
        self.buf[tail] = item;
        self.len += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let item = self.buf[self.head];
        self.head = (self.head + 1) % self.buf.len();
        self.len -= 1;
        Some(item)
    }

    pub fn front(&self) -> Option<T> {
        (self.len > 0).then(|| self.buf[self.head])
    }

    /// Drops every queued item, keeping the storage.
    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }

    fn grow(&mut self) -> Result<()> {
        let capacity = (self.buf.len() * 2).max(INITIAL_CAPACITY);
        let mut buf = Vec::new();
        buf.try_reserve_exact(capacity)?;
        // Unwrap the ring so the oldest item lands at index 0.
        let (wrapped, front) = self.buf.split_at(self.head);
        buf.extend_from_slice(front);
        buf.extend_from_slice(wrapped);
        buf.resize(capacity, T::default());
        self.buf = buf;
        self.head = 0;
        Ok(())
    }
}
