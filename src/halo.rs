// halo.rs - Ghost border refresh: local toroidal wrap and ring exchange between workers

use log::trace;
use tokio::sync::mpsc::{channel, Receiver, Sender};

use crate::error::{LifeError, Result};
use crate::grid::{CellBuffer, CellState, GRID_START};
use crate::partition::WorkerTopology;

/// A full-width row (ghost columns included) in flight between workers.
pub type Row = Vec<CellState>;

/// Rows a link may buffer. Sends and receives are posted together, so any
/// capacity >= 1 is deadlock-free; 2 lets a worker run one exchange ahead.
pub const RING_CAPACITY: usize = 2;

/// Top ghost row <- last interior row, bottom ghost row <- first interior row.
pub fn wrap_rows(buf: &mut CellBuffer) {
    let last = buf.local_rows();
    let bottom = buf.bottom_ghost();
    buf.copy_row(last, 0);
    buf.copy_row(GRID_START, bottom);
}

/// Left ghost column <- last interior column, right ghost column <- first,
/// for every row including both ghost rows (so corners come out right).
pub fn wrap_columns(buf: &mut CellBuffer) {
    let columns = buf.columns();
    let right = buf.right_ghost();
    for row in 0..buf.height() {
        let cells = buf.row_mut(row);
        cells[0] = cells[columns];
        cells[right] = cells[GRID_START];
    }
}

/// Single-worker form: the band is the whole torus.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalWrapExchanger;

impl LocalWrapExchanger {
    pub fn exchange_rows(&self, buf: &mut CellBuffer) {
        wrap_rows(buf);
    }
}

/// One worker's four channel ends in the ring.
#[derive(Debug)]
pub struct RingLinks {
    to_lower: Sender<Row>,
    to_higher: Sender<Row>,
    from_lower: Receiver<Row>,
    from_higher: Receiver<Row>,
}

/// Wires `workers` ranks into a ring, returning links indexed by rank.
///
/// Rank `r` owns an "up" channel carrying its last interior row to
/// `higher(r)` and a "down" channel carrying its first interior row to
/// `lower(r)`. Separate directions keep two-worker rings unambiguous.
pub fn ring_links(workers: usize) -> Vec<RingLinks> {
    let (up_tx, mut up_rx): (Vec<_>, Vec<_>) = (0..workers).map(|_| channel(RING_CAPACITY)).unzip();
    let (down_tx, mut down_rx): (Vec<_>, Vec<_>) = (0..workers).map(|_| channel(RING_CAPACITY)).unzip();

    // worker r listens on up[r - 1] and down[r + 1]
    up_rx.rotate_right(1);
    down_rx.rotate_left(1);

    up_tx
        .into_iter()
        .zip(down_tx)
        .zip(up_rx.into_iter().zip(down_rx))
        .map(|((to_higher, to_lower), (from_lower, from_higher))| RingLinks {
            to_lower,
            to_higher,
            from_lower,
            from_higher,
        })
        .collect()
}

/// Multi-worker form: ghost rows come from the ring neighbours.
#[derive(Debug)]
pub struct RingMessageExchanger {
    topology: WorkerTopology,
    links: RingLinks,
}

impl RingMessageExchanger {
    pub fn new(topology: WorkerTopology, links: RingLinks) -> Self {
        Self { topology, links }
    }

    /// Sends first/last interior rows down/up the ring and fills both ghost
    /// rows from the neighbours. All four operations are in flight at once.
    pub async fn exchange_rows(&mut self, buf: &mut CellBuffer) -> Result<()> {
        let rank = self.topology.rank;
        let comm = |operation: &'static str| LifeError::Communication { rank, operation };
        let RingLinks { to_lower, to_higher, from_lower, from_higher } = &mut self.links;

        let first = buf.row(GRID_START).to_vec();
        let last = buf.row(buf.local_rows()).to_vec();

        let ((), (), top, bottom) = tokio::try_join!(
            async { to_lower.send(first).await.map_err(|_| comm("send(top row)")) },
            async { to_higher.send(last).await.map_err(|_| comm("send(bottom row)")) },
            async { from_lower.recv().await.ok_or_else(|| comm("recv(top row)")) },
            async { from_higher.recv().await.ok_or_else(|| comm("recv(bottom row)")) },
        )?;

        if top.len() != buf.width() {
            return Err(comm("recv(top row): width mismatch"));
        }
        if bottom.len() != buf.width() {
            return Err(comm("recv(bottom row): width mismatch"));
        }
        buf.row_mut(0).copy_from_slice(&top);
        let bottom_ghost = buf.bottom_ghost();
        buf.row_mut(bottom_ghost).copy_from_slice(&bottom);
        trace!(
            "rank {rank}: ghost rows from {} and {}",
            self.topology.lower_neighbor(),
            self.topology.higher_neighbor()
        );
        Ok(())
    }
}

/// Refreshes every ghost cell of a band from the cell it wraps to.
#[derive(Debug)]
pub enum HaloExchanger {
    LocalWrap(LocalWrapExchanger),
    Ring(RingMessageExchanger),
}

impl HaloExchanger {
    /// Row ghosts first, then column ghosts; the column pass copies corners
    /// out of the freshly filled ghost rows.
    pub async fn exchange(&mut self, buf: &mut CellBuffer) -> Result<()> {
        match self {
            HaloExchanger::LocalWrap(local) => local.exchange_rows(buf),
            HaloExchanger::Ring(ring) => ring.exchange_rows(buf).await?,
        }
        wrap_columns(buf);
        Ok(())
    }
}

/// One exchanger per rank: local wrap for a single worker, the ring otherwise.
pub fn exchangers(workers: usize) -> Vec<HaloExchanger> {
    if workers == 1 {
        return vec![HaloExchanger::LocalWrap(LocalWrapExchanger)];
    }
    ring_links(workers)
        .into_iter()
        .enumerate()
        .map(|(rank, links)| {
            HaloExchanger::Ring(RingMessageExchanger::new(WorkerTopology::new(rank, workers), links))
        })
        .collect()
}
