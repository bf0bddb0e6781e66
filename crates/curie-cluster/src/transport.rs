//! Blocking point-to-point transport between ranks.
//!
//! The protocol's traffic is strictly master ↔ worker, so the channel
//! topology is a star: the master holds one sender per worker and one
//! shared inbox; each worker holds a sender to the master and its own
//! inbox, fed only by the master. The topology doubles as failure
//! detection — when the single feeder of an inbox is gone, a blocking
//! receive reports it instead of waiting forever.
//!
//! Channels are unbounded. The protocol is self-limiting: a worker sends
//! at most its row block per sweep and then blocks on the resync, so a
//! queue never holds more than one sweep of traffic.

use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::warn;

use crate::context::Rank;
use crate::error::ClusterError;
use crate::message::Message;

// ── MasterEndpoint ──────────────────────────────────────────────

/// The master's side of the star: senders to every worker, one inbox.
pub struct MasterEndpoint {
    to_workers: Vec<Sender<Message>>,
    inbox: Receiver<Message>,
}

impl MasterEndpoint {
    /// Blocking point-to-point send to a worker rank.
    pub fn send(&self, to: Rank, message: Message) -> Result<(), ClusterError> {
        let sender = self
            .to_workers
            .get((to.0 as usize).wrapping_sub(1))
            .ok_or(ClusterError::Disconnected { rank: to })?;
        sender
            .send(message)
            .map_err(|_| ClusterError::Disconnected { rank: to })
    }

    /// Broadcast collective: deliver a copy of `message` to every worker.
    ///
    /// Same per-rank delivery as a send loop, expressed as one primitive;
    /// the barrier semantics live in the receivers, which block on it.
    pub fn broadcast(&self, message: &Message) -> Result<(), ClusterError> {
        for (w, sender) in self.to_workers.iter().enumerate() {
            sender.send(message.clone()).map_err(|_| {
                ClusterError::Disconnected {
                    rank: Rank(w as u32 + 1),
                }
            })?;
        }
        Ok(())
    }

    /// Blocking receive from any worker.
    pub fn recv(&self) -> Result<Message, ClusterError> {
        self.inbox.recv().map_err(|_| ClusterError::InboxClosed)
    }

    /// Number of connected workers.
    pub fn worker_count(&self) -> usize {
        self.to_workers.len()
    }
}

// ── WorkerEndpoint ──────────────────────────────────────────────

/// A worker's side of the star: a sender to the master, its own inbox.
pub struct WorkerEndpoint {
    rank: Rank,
    to_master: Sender<Message>,
    inbox: Receiver<Message>,
}

impl WorkerEndpoint {
    /// This worker's rank.
    pub fn rank(&self) -> Rank {
        self.rank
    }

    /// Blocking send to the master.
    pub fn send(&self, message: Message) -> Result<(), ClusterError> {
        self.to_master
            .send(message)
            .map_err(|_| ClusterError::Disconnected { rank: Rank::MASTER })
    }

    /// Blocking receive from the master.
    pub fn recv(&self) -> Result<Message, ClusterError> {
        self.inbox.recv().map_err(|_| ClusterError::InboxClosed)
    }

    /// Best-effort fatal-failure notification to the master.
    ///
    /// Send failure is ignored: if the master is already gone the run is
    /// collapsing anyway and the caller is about to return its own error.
    pub fn abort(&self, reason: &str) {
        if self
            .to_master
            .send(Message::Abort {
                from: self.rank,
                reason: reason.to_string(),
            })
            .is_err()
        {
            warn!(rank = %self.rank, "abort notification not delivered, master already gone");
        }
    }
}

/// Wire up a star of `worker_count` workers around one master.
pub fn connect(worker_count: usize) -> (MasterEndpoint, Vec<WorkerEndpoint>) {
    let (to_master, master_inbox) = unbounded();
    let mut to_workers = Vec::with_capacity(worker_count);
    let mut workers = Vec::with_capacity(worker_count);
    for w in 0..worker_count {
        let (to_worker, worker_inbox) = unbounded();
        to_workers.push(to_worker);
        workers.push(WorkerEndpoint {
            rank: Rank(w as u32 + 1),
            to_master: to_master.clone(),
            inbox: worker_inbox,
        });
    }
    (
        MasterEndpoint {
            to_workers,
            inbox: master_inbox,
        },
        workers,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::GridSync;

    fn sync(epoch: u64) -> Message {
        Message::Sync(GridSync {
            epoch,
            spins: vec![],
        })
    }

    #[test]
    fn point_to_point_reaches_one_worker() {
        let (master, workers) = connect(2);
        master.send(Rank(2), sync(5)).unwrap();
        assert_eq!(workers[1].recv().unwrap(), sync(5));
        // Worker 1's inbox stays empty; prove it without blocking by
        // dropping the master and observing the closed channel.
        drop(master);
        assert_eq!(workers[0].recv().unwrap_err(), ClusterError::InboxClosed);
    }

    #[test]
    fn broadcast_reaches_every_worker() {
        let (master, workers) = connect(3);
        master.broadcast(&sync(1)).unwrap();
        for worker in &workers {
            assert_eq!(worker.recv().unwrap(), sync(1));
        }
    }

    #[test]
    fn worker_messages_funnel_into_master_inbox() {
        let (master, workers) = connect(2);
        workers[0].abort("first");
        workers[1].abort("second");
        let mut froms = vec![];
        for _ in 0..2 {
            match master.recv().unwrap() {
                Message::Abort { from, .. } => froms.push(from),
                other => panic!("unexpected {other:?}"),
            }
        }
        froms.sort();
        assert_eq!(froms, vec![Rank(1), Rank(2)]);
    }

    #[test]
    fn vanished_worker_fails_the_send() {
        let (master, workers) = connect(2);
        drop(workers);
        assert_eq!(
            master.send(Rank(1), sync(0)).unwrap_err(),
            ClusterError::Disconnected { rank: Rank(1) }
        );
        assert_eq!(
            master.broadcast(&sync(0)).unwrap_err(),
            ClusterError::Disconnected { rank: Rank(1) }
        );
    }

    #[test]
    fn out_of_world_rank_is_disconnected() {
        let (master, _workers) = connect(1);
        assert_eq!(
            master.send(Rank(9), sync(0)).unwrap_err(),
            ClusterError::Disconnected { rank: Rank(9) }
        );
        assert_eq!(
            master.send(Rank::MASTER, sync(0)).unwrap_err(),
            ClusterError::Disconnected { rank: Rank::MASTER }
        );
    }

    #[test]
    fn master_recv_fails_only_when_every_worker_is_gone() {
        use crossbeam_channel::TryRecvError;

        let (master, mut workers) = connect(2);
        workers.remove(0);
        // One worker still holds a sender: the inbox is empty, not closed.
        assert_eq!(master.inbox.try_recv(), Err(TryRecvError::Empty));
        workers.clear();
        assert_eq!(master.recv().unwrap_err(), ClusterError::InboxClosed);
    }
}
