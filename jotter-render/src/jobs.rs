//! A small prioritized job queue for long renders.
//!
//! Jobs wait in one of three lanes and a fixed pool of named worker threads
//! always takes from the highest non-empty lane, FIFO within a lane. Each
//! job gets its own [`CancelToken`]; the caller keeps a [`JobHandle`] to
//! poll progress, cancel, or block for the result.

use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;

use tracing::{debug, error};

use jotter_core::CancelToken;

use crate::error::RenderError;
use crate::renderer::{render_julia, JuliaRequest, RenderResult};

/// Scheduling lane; higher lanes are always drained first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Priority {
    High,
    #[default]
    Default,
    Low,
}

impl Priority {
    fn lane(self) -> usize {
        match self {
            Self::High => 0,
            Self::Default => 1,
            Self::Low => 2,
        }
    }
}

type Work = Box<dyn FnOnce(&CancelToken) + Send>;

struct Queued {
    id: u64,
    cancel: Arc<CancelToken>,
    work: Work,
}

#[derive(Default)]
struct Lanes {
    lanes: [VecDeque<Queued>; 3],
    shutdown: bool,
}

impl Lanes {
    fn pop(&mut self) -> Option<Queued> {
        self.lanes.iter_mut().find_map(VecDeque::pop_front)
    }

    fn len(&self) -> usize {
        self.lanes.iter().map(VecDeque::len).sum()
    }
}

#[derive(Default)]
struct Shared {
    state: Mutex<Lanes>,
    ready: Condvar,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Lanes> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Fixed pool of worker threads fed from three priority lanes.
///
/// Dropping the queue cancels everything still waiting and joins the
/// workers after their current job returns.
pub struct JobQueue {
    shared: Arc<Shared>,
    workers: Vec<JoinHandle<()>>,
    next_id: AtomicU64,
}

impl JobQueue {
    /// Start `workers` threads (at least one).
    pub fn new(workers: usize) -> crate::Result<Self> {
        let shared = Arc::new(Shared::default());
        let handles = (0..workers.max(1))
            .map(|i| {
                let shared = Arc::clone(&shared);
                std::thread::Builder::new()
                    .name(format!("job-worker-{i}"))
                    .spawn(move || worker_loop(&shared))
            })
            .collect::<std::io::Result<Vec<_>>>()?;
        debug!(workers = handles.len(), "Job queue started");
        Ok(Self {
            shared,
            workers: handles,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn workers(&self) -> usize {
        self.workers.len()
    }

    /// Jobs waiting for a worker, across all lanes.
    pub fn pending(&self) -> usize {
        self.shared.lock().len()
    }

    /// Queue `job`. It receives the job's cancel token and should return
    /// `Err(RenderError::Cancelled)` when it notices cancellation. A job
    /// cancelled before a worker reaches it never runs.
    pub fn submit<T, F>(&self, priority: Priority, job: F) -> JobHandle<T>
    where
        T: Send + 'static,
        F: FnOnce(&CancelToken) -> crate::Result<T> + Send + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let cancel = Arc::new(CancelToken::new());
        let (tx, rx) = mpsc::channel();

        let work: Work = Box::new(move |token| {
            let outcome = if token.is_cancelled() {
                Err(RenderError::Cancelled)
            } else {
                job(token)
            };
            // The handle may already be gone; nobody is waiting then.
            let _ = tx.send(outcome);
        });

        {
            let mut state = self.shared.lock();
            state.lanes[priority.lane()].push_back(Queued {
                id,
                cancel: Arc::clone(&cancel),
                work,
            });
            debug!(job = id, ?priority, pending = state.len(), "Job submitted");
        }
        self.shared.ready.notify_one();

        JobHandle { id, cancel, rx }
    }

    /// Queue a banded Julia render.
    pub fn submit_julia(&self, priority: Priority, request: JuliaRequest) -> JobHandle<RenderResult> {
        self.submit(priority, move |cancel| render_julia(&request, cancel))
    }
}

impl Drop for JobQueue {
    fn drop(&mut self) {
        {
            let mut state = self.shared.lock();
            state.shutdown = true;
            for job in state.lanes.iter().flatten() {
                job.cancel.cancel();
            }
        }
        self.shared.ready.notify_all();
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                error!("Job worker panicked during shutdown");
            }
        }
        debug!("Job queue stopped");
    }
}

fn worker_loop(shared: &Shared) {
    loop {
        let next = {
            let mut state = shared.lock();
            loop {
                if let Some(job) = state.pop() {
                    break Some(job);
                }
                if state.shutdown {
                    break None;
                }
                state = shared
                    .ready
                    .wait(state)
                    .unwrap_or_else(PoisonError::into_inner);
            }
        };
        let Some(Queued { id, cancel, work }) = next else {
            return;
        };

        debug!(job = id, "Job started");
        if catch_unwind(AssertUnwindSafe(|| work(cancel.as_ref()))).is_err() {
            error!(job = id, "Job panicked");
        }
    }
}

/// Caller's side of a queued job.
pub struct JobHandle<T> {
    id: u64,
    cancel: Arc<CancelToken>,
    rx: mpsc::Receiver<crate::Result<T>>,
}

impl<T> JobHandle<T> {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Ask the job to stop at its next cancellation check.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// `(done, total)` work units reported by the job so far.
    pub fn progress(&self) -> (u64, u64) {
        self.cancel.progress()
    }

    /// Block until the job finishes.
    pub fn wait(self) -> crate::Result<T> {
        self.rx.recv().map_err(|_| RenderError::JobLost(self.id))?
    }

    /// The result if the job has finished, without blocking. Yields the
    /// result once; later calls report the job as lost.
    pub fn try_result(&self) -> Option<crate::Result<T>> {
        match self.rx.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(mpsc::TryRecvError::Empty) => None,
            Err(mpsc::TryRecvError::Disconnected) => Some(Err(RenderError::JobLost(self.id))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jotter_core::{ComplexGrid, EscapeParameters, ResolutionSpec};

    /// Occupy the single worker until the returned sender is dropped or
    /// sent to.
    fn block_worker(queue: &JobQueue) -> (mpsc::Sender<()>, JobHandle<()>) {
        let (gate_tx, gate_rx) = mpsc::channel::<()>();
        let (started_tx, started_rx) = mpsc::channel::<()>();
        let handle = queue.submit(Priority::High, move |_| {
            let _ = started_tx.send(());
            let _ = gate_rx.recv();
            Ok(())
        });
        started_rx.recv().unwrap();
        (gate_tx, handle)
    }

    #[test]
    fn returns_job_result() {
        let queue = JobQueue::new(2).unwrap();
        let handle = queue.submit(Priority::Default, |_| Ok(6 * 7));
        assert_eq!(handle.wait().unwrap(), 42);
    }

    #[test]
    fn higher_lanes_run_first() {
        let queue = JobQueue::new(1).unwrap();
        let (gate, blocker) = block_worker(&queue);

        let order = Arc::new(Mutex::new(Vec::new()));
        let mut handles = Vec::new();
        for (priority, tag) in [
            (Priority::Low, "low"),
            (Priority::Default, "default"),
            (Priority::High, "high"),
            (Priority::Default, "default-2"),
        ] {
            let order = Arc::clone(&order);
            handles.push(queue.submit(priority, move |_| {
                order.lock().unwrap().push(tag);
                Ok(())
            }));
        }
        assert_eq!(queue.pending(), 4);

        gate.send(()).unwrap();
        blocker.wait().unwrap();
        for h in handles {
            h.wait().unwrap();
        }
        assert_eq!(
            *order.lock().unwrap(),
            vec!["high", "default", "default-2", "low"]
        );
    }

    #[test]
    fn cancelled_before_start_never_runs() {
        let queue = JobQueue::new(1).unwrap();
        let (gate, blocker) = block_worker(&queue);

        let ran = Arc::new(Mutex::new(false));
        let flag = Arc::clone(&ran);
        let handle = queue.submit(Priority::Default, move |_| {
            *flag.lock().unwrap() = true;
            Ok(())
        });
        handle.cancel();
        assert!(handle.try_result().is_none());

        gate.send(()).unwrap();
        blocker.wait().unwrap();
        assert!(matches!(handle.wait(), Err(RenderError::Cancelled)));
        assert!(!*ran.lock().unwrap());
    }

    #[test]
    fn cancel_stops_a_running_render() {
        let queue = JobQueue::new(1).unwrap();
        // Cells inside the unit circle never escape for c = 0.
        let request = JuliaRequest::new(
            ResolutionSpec::new(64, 64).unwrap(),
            EscapeParameters::new(jotter_core::Complex::ZERO, 2_000_000),
        );
        let handle = queue.submit_julia(Priority::Default, request);
        while handle.progress().0 == 0 {
            std::thread::yield_now();
        }
        handle.cancel();

        let outcome = loop {
            if let Some(outcome) = handle.try_result() {
                break outcome;
            }
            std::thread::sleep(std::time::Duration::from_millis(1));
        };
        assert!(matches!(outcome, Err(RenderError::Cancelled)));
        let (done, total) = handle.progress();
        assert!(done > 0);
        assert!(done < total);
    }

    #[test]
    fn panicking_job_is_reported_lost() {
        let queue = JobQueue::new(1).unwrap();
        let handle = queue.submit::<(), _>(Priority::Default, |_| panic!("boom"));
        assert!(matches!(handle.wait(), Err(RenderError::JobLost(_))));
        // The worker survives the panic.
        assert_eq!(queue.submit(Priority::Low, |_| Ok(1)).wait().unwrap(), 1);
    }

    #[test]
    fn julia_job_matches_direct_engine() {
        let queue = JobQueue::new(2).unwrap();
        let request = JuliaRequest::new(
            ResolutionSpec::new(48, 36).unwrap(),
            EscapeParameters::default(),
        );
        let handle = queue.submit_julia(Priority::High, request);
        let id = handle.id();
        let result = handle.wait().unwrap();

        let grid = ComplexGrid::build(request.resolution, &request.extent);
        assert_eq!(result.field, jotter_core::compute(&grid, &request.params));
        assert!(id >= 1);
    }

    #[test]
    fn progress_is_visible_through_handle() {
        let queue = JobQueue::new(1).unwrap();
        let request = JuliaRequest::new(
            ResolutionSpec::new(10, 10).unwrap(),
            EscapeParameters::default().with_max_iterations(30),
        );
        let handle = queue.submit_julia(Priority::Default, request);
        let (tx, rx) = mpsc::channel();
        let follower = queue.submit(Priority::Low, move |_| {
            let _ = tx.send(());
            Ok(())
        });
        // Single worker: the render has finished once the follower runs.
        rx.recv().unwrap();
        follower.wait().unwrap();
        assert_eq!(handle.progress(), (30, 30));
        assert!(handle.wait().is_ok());
    }
}
