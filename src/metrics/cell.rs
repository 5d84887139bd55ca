use std::cell::Cell;

/// Counter that can be bumped through `&self`.
///
/// Used for reads that take `&self` on the cache (`peek`, `peek_lru`,
/// `recency_rank`). The cache is single-threaded, so `Cell` is enough; the
/// type is deliberately `!Sync`.
#[repr(transparent)]
#[derive(Debug, Default, Clone)]
pub struct MetricsCell(Cell<u64>);

impl MetricsCell {
    #[inline]
    pub fn new() -> Self {
        Self(Cell::new(0))
    }

    #[inline]
    pub fn get(&self) -> u64 {
        self.0.get()
    }

    #[inline]
    pub fn incr(&self) {
        self.0.set(self.0.get() + 1);
    }

    #[inline]
    pub fn reset(&self) {
        self.0.set(0);
    }
}
