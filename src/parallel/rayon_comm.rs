// rayon-based in-process worker group
//
// Each participant runs on its own thread of a dedicated pool and talks to the
// others over crossbeam channels, one channel per ordered pair of ranks. Per-pair
// FIFO ordering keeps consecutive collectives from interleaving.

use super::{check_root, check_scatter, Comm, Partition};
use crate::error::{zeroed, RegError};
use crossbeam::channel::{unbounded, Receiver, Sender};
use log::debug;

enum Packet {
    Data(Vec<f64>),
    Barrier,
}

/// One participant's handle into an in-process group.
pub struct RayonComm {
    rank: usize,
    size: usize,
    /// `outbound[j]` delivers to rank `j`.
    outbound: Vec<Sender<Packet>>,
    /// `inbound[i]` receives from rank `i`.
    inbound: Vec<Receiver<Packet>>,
}

impl RayonComm {
    /// Group size used when none is requested: one participant per CPU.
    pub fn default_size() -> usize {
        num_cpus::get()
    }

    /// Build the handles for a group of `size` participants, indexed by rank.
    pub fn group(size: usize) -> Result<Vec<RayonComm>, RegError> {
        if size < 1 {
            return Err(RegError::Precondition("worker group must not be empty".into()));
        }
        let mut outbound: Vec<Vec<Sender<Packet>>> = (0..size).map(|_| Vec::with_capacity(size)).collect();
        let mut inbound: Vec<Vec<Option<Receiver<Packet>>>> =
            (0..size).map(|_| (0..size).map(|_| None).collect()).collect();
        for (from, senders) in outbound.iter_mut().enumerate() {
            for receivers in inbound.iter_mut() {
                let (tx, rx) = unbounded();
                senders.push(tx);
                receivers[from] = Some(rx);
            }
        }
        outbound
            .into_iter()
            .zip(inbound)
            .enumerate()
            .map(|(rank, (outbound, inbound))| {
                let inbound = inbound
                    .into_iter()
                    .collect::<Option<Vec<_>>>()
                    .ok_or_else(|| RegError::CommInit(format!("rank {rank} is missing a link")))?;
                Ok(RayonComm { rank, size, outbound, inbound })
            })
            .collect()
    }

    /// Run `f` once per rank, each on its own pool thread, and collect the
    /// results in rank order.
    ///
    /// A panic on any rank aborts the whole group: the ranks still waiting on it
    /// observe [`RegError::PeerLost`] and the panic is re-raised here.
    pub fn run<F, R>(size: usize, f: F) -> Result<Vec<R>, RegError>
    where
        F: Fn(&RayonComm) -> R + Sync,
        R: Send,
    {
        let comms = Self::group(size)?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(size)
            .thread_name(|i| format!("parareg-worker-{i}"))
            .build()
            .map_err(|e| RegError::CommInit(e.to_string()))?;
        let mut results: Vec<Option<R>> = (0..size).map(|_| None).collect();
        let f = &f;
        pool.scope(|s| {
            for (comm, slot) in comms.into_iter().zip(results.iter_mut()) {
                s.spawn(move |_| {
                    *slot = Some(f(&comm));
                });
            }
        });
        results
            .into_iter()
            .enumerate()
            .map(|(rank, r)| r.ok_or(RegError::PeerLost { rank }))
            .collect()
    }

    fn send(&self, to: usize, packet: Packet) -> Result<(), RegError> {
        self.outbound[to]
            .send(packet)
            .map_err(|_| RegError::PeerLost { rank: to })
    }

    fn recv_data(&self, from: usize, len: usize) -> Result<Vec<f64>, RegError> {
        match self.inbound[from].recv() {
            Ok(Packet::Data(buf)) if buf.len() == len => Ok(buf),
            Ok(Packet::Data(buf)) => Err(RegError::Protocol(format!(
                "rank {} expected {len} values from rank {from}, got {}",
                self.rank,
                buf.len()
            ))),
            Ok(Packet::Barrier) => Err(RegError::Protocol(format!(
                "rank {} expected data from rank {from}, got a barrier",
                self.rank
            ))),
            Err(_) => Err(RegError::PeerLost { rank: from }),
        }
    }

    fn recv_barrier(&self, from: usize) -> Result<(), RegError> {
        match self.inbound[from].recv() {
            Ok(Packet::Barrier) => Ok(()),
            Ok(Packet::Data(_)) => Err(RegError::Protocol(format!(
                "rank {} expected a barrier from rank {from}, got data",
                self.rank
            ))),
            Err(_) => Err(RegError::PeerLost { rank: from }),
        }
    }
}

impl Comm for RayonComm {
    fn rank(&self) -> usize { self.rank }
    fn size(&self) -> usize { self.size }

    fn barrier(&self) -> Result<(), RegError> {
        // gather at rank 0, then release
        if self.rank == 0 {
            for peer in 1..self.size {
                self.recv_barrier(peer)?;
            }
            for peer in 1..self.size {
                self.send(peer, Packet::Barrier)?;
            }
        } else {
            self.send(0, Packet::Barrier)?;
            self.recv_barrier(0)?;
        }
        Ok(())
    }

    fn scatter_rows(
        &self,
        global: Option<&[f64]>,
        partition: &Partition,
        root: usize,
    ) -> Result<Vec<f64>, RegError> {
        check_root(self.size, root)?;
        check_scatter(global, partition, self.size, self.rank == root)?;
        if self.rank != root {
            return self.recv_data(root, partition.count(self.rank));
        }
        let global = global.unwrap_or_default();
        for peer in (0..self.size).filter(|&r| r != root) {
            let range = partition.range(peer);
            let mut chunk = zeroed("scatter slice", range.len())?;
            chunk.copy_from_slice(&global[range]);
            self.send(peer, Packet::Data(chunk))?;
        }
        debug!("rank {root} scattered {} values to {} ranks", global.len(), self.size);
        let mut own = zeroed("scatter slice", partition.count(root))?;
        own.copy_from_slice(&global[partition.range(root)]);
        Ok(own)
    }

    fn reduce_sum(&self, local: &[f64], root: usize) -> Result<Option<Vec<f64>>, RegError> {
        check_root(self.size, root)?;
        if self.rank != root {
            let mut payload = zeroed("reduction payload", local.len())?;
            payload.copy_from_slice(local);
            self.send(root, Packet::Data(payload))?;
            return Ok(None);
        }
        let mut acc = zeroed("reduction result", local.len())?;
        for peer in 0..self.size {
            let incoming;
            let contribution = if peer == root {
                local
            } else {
                incoming = self.recv_data(peer, local.len())?;
                &incoming[..]
            };
            for (a, v) in acc.iter_mut().zip(contribution) {
                *a += *v;
            }
        }
        debug!("rank {root} reduced {} values from {} ranks", local.len(), self.size);
        Ok(Some(acc))
    }

    fn broadcast(&self, buf: &mut [f64], root: usize) -> Result<(), RegError> {
        check_root(self.size, root)?;
        if self.rank == root {
            for peer in (0..self.size).filter(|&r| r != root) {
                let mut copy = zeroed("broadcast payload", buf.len())?;
                copy.copy_from_slice(buf);
                self.send(peer, Packet::Data(copy))?;
            }
        } else {
            let received = self.recv_data(root, buf.len())?;
            buf.copy_from_slice(&received);
        }
        Ok(())
    }
}
