// partition.rs - Row-band decomposition over a ring of workers

/// Position of one worker in the ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerTopology {
    pub rank: usize,
    pub workers: usize,
}

impl WorkerTopology {
    pub fn new(rank: usize, workers: usize) -> Self {
        debug_assert!(workers >= 1 && rank < workers);
        Self { rank, workers }
    }

    pub fn lower_neighbor(&self) -> usize {
        (self.rank + self.workers - 1) % self.workers
    }

    pub fn higher_neighbor(&self) -> usize {
        (self.rank + 1) % self.workers
    }
}

/// The contiguous global rows owned by one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    pub local_rows: usize,
    pub row_offset: usize,
}

impl Partition {
    pub fn global_rows(&self) -> std::ops::Range<usize> {
        self.row_offset..self.row_offset + self.local_rows
    }
}

/// Every worker gets `total_rows / workers`; the highest rank also takes the remainder.
pub fn partition(total_rows: usize, workers: usize, rank: usize) -> Partition {
    let base = total_rows / workers;
    let local_rows = if rank + 1 == workers { base + total_rows % workers } else { base };
    Partition { local_rows, row_offset: base * rank }
}
