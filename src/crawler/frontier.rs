//! Frontier: the shared task queue and visited set for one crawl run
//!
//! The frontier is the only mutable state shared between crawl workers.
//! A single mutex guards the queue, the visited set, and the in-flight
//! counter together, so the "claim a task" and "enqueue if unvisited"
//! decisions are atomic with respect to every other worker.

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use url::Url;

/// A unit of crawl work: fetch one page, expand its links
#[derive(Debug, Clone)]
pub struct CrawlTask {
    /// Normalized page URL to fetch
    pub url: Url,

    /// How many more link hops may be taken from this page.
    /// 0 means the page is inspected but its links are not followed.
    pub remaining_depth: u32,
}

/// Result of asking the frontier for work
#[derive(Debug)]
pub enum Claim {
    /// A task was claimed; the caller must call `task_done` afterwards
    Task(CrawlTask),

    /// The queue is empty but other workers are still fetching; their
    /// pages may yield new tasks, so check back shortly
    Wait,

    /// The queue is empty and nothing is in flight; the crawl is over
    Done,
}

struct Inner {
    queue: VecDeque<CrawlTask>,
    visited: HashSet<String>,
    in_flight: usize,
}

/// Shared crawl frontier
///
/// Owned by one `Crawler` for the lifetime of one crawl run; no state
/// leaks across runs.
pub struct Frontier {
    inner: Mutex<Inner>,
    stop: AtomicBool,
}

impl Frontier {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                queue: VecDeque::new(),
                visited: HashSet::new(),
                in_flight: 0,
            }),
            stop: AtomicBool::new(false),
        }
    }

    /// Enqueues a task if its URL has not been seen this run
    ///
    /// Membership check and insert happen under one lock acquisition, so a
    /// URL discovered simultaneously by two workers is enqueued exactly
    /// once.
    ///
    /// Returns true if the task was enqueued.
    pub fn push_if_unvisited(&self, task: CrawlTask) -> bool {
        let mut inner = self.inner.lock().unwrap();
        if inner.visited.insert(task.url.as_str().to_string()) {
            inner.queue.push_back(task);
            true
        } else {
            false
        }
    }

    /// Claims the next task, if any
    ///
    /// A claimed task counts as in-flight until `task_done` is called;
    /// workers must pair every `Claim::Task` with exactly one `task_done`.
    pub fn try_claim(&self) -> Claim {
        let mut inner = self.inner.lock().unwrap();

        if self.stop_requested() {
            // Cooperative stop: drop queued work, let in-flight fetches finish
            inner.queue.clear();
            return if inner.in_flight == 0 {
                Claim::Done
            } else {
                Claim::Wait
            };
        }

        match inner.queue.pop_front() {
            Some(task) => {
                inner.in_flight += 1;
                Claim::Task(task)
            }
            None if inner.in_flight == 0 => Claim::Done,
            None => Claim::Wait,
        }
    }

    /// Marks a previously claimed task as finished
    pub fn task_done(&self) {
        let mut inner = self.inner.lock().unwrap();
        debug_assert!(inner.in_flight > 0, "task_done without a claimed task");
        inner.in_flight = inner.in_flight.saturating_sub(1);
    }

    /// Requests a cooperative stop
    ///
    /// Checked between task dequeues; in-flight fetches are not aborted.
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    /// Returns true if a stop has been requested
    pub fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }

    /// Number of distinct URLs seen this run (queued, in flight, or done)
    pub fn visited_count(&self) -> usize {
        self.inner.lock().unwrap().visited.len()
    }

    /// Number of tasks waiting in the queue
    pub fn queue_len(&self) -> usize {
        self.inner.lock().unwrap().queue.len()
    }
}

impl Default for Frontier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(url: &str, depth: u32) -> CrawlTask {
        CrawlTask {
            url: Url::parse(url).unwrap(),
            remaining_depth: depth,
        }
    }

    #[test]
    fn test_push_deduplicates() {
        let frontier = Frontier::new();

        assert!(frontier.push_if_unvisited(task("https://example.com/a", 2)));
        assert!(!frontier.push_if_unvisited(task("https://example.com/a", 2)));
        assert_eq!(frontier.queue_len(), 1);
        assert_eq!(frontier.visited_count(), 1);
    }

    #[test]
    fn test_duplicate_rejected_even_at_different_depth() {
        let frontier = Frontier::new();

        assert!(frontier.push_if_unvisited(task("https://example.com/a", 2)));
        assert!(!frontier.push_if_unvisited(task("https://example.com/a", 0)));
    }

    #[test]
    fn test_claim_returns_fifo_order() {
        let frontier = Frontier::new();
        frontier.push_if_unvisited(task("https://example.com/a", 1));
        frontier.push_if_unvisited(task("https://example.com/b", 1));

        match frontier.try_claim() {
            Claim::Task(t) => assert_eq!(t.url.as_str(), "https://example.com/a"),
            other => panic!("expected task, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_frontier_is_done() {
        let frontier = Frontier::new();
        assert!(matches!(frontier.try_claim(), Claim::Done));
    }

    #[test]
    fn test_wait_while_task_in_flight() {
        let frontier = Frontier::new();
        frontier.push_if_unvisited(task("https://example.com/a", 1));

        let claim = frontier.try_claim();
        assert!(matches!(claim, Claim::Task(_)));

        // Queue is empty but the claimed task may still produce children
        assert!(matches!(frontier.try_claim(), Claim::Wait));

        frontier.task_done();
        assert!(matches!(frontier.try_claim(), Claim::Done));
    }

    #[test]
    fn test_stop_clears_queue() {
        let frontier = Frontier::new();
        frontier.push_if_unvisited(task("https://example.com/a", 1));
        frontier.push_if_unvisited(task("https://example.com/b", 1));

        frontier.request_stop();
        assert!(matches!(frontier.try_claim(), Claim::Done));
        assert_eq!(frontier.queue_len(), 0);
    }

    #[test]
    fn test_stop_waits_for_in_flight() {
        let frontier = Frontier::new();
        frontier.push_if_unvisited(task("https://example.com/a", 1));
        let _ = frontier.try_claim();

        frontier.request_stop();
        assert!(matches!(frontier.try_claim(), Claim::Wait));

        frontier.task_done();
        assert!(matches!(frontier.try_claim(), Claim::Done));
    }

    #[test]
    fn test_concurrent_push_single_enqueue() {
        use std::sync::Arc;

        let frontier = Arc::new(Frontier::new());
        let mut handles = Vec::new();

        for _ in 0..8 {
            let f = Arc::clone(&frontier);
            handles.push(std::thread::spawn(move || {
                f.push_if_unvisited(task("https://example.com/contended", 1))
            }));
        }

        let enqueued = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|&pushed| pushed)
            .count();

        assert_eq!(enqueued, 1);
        assert_eq!(frontier.queue_len(), 1);
        assert_eq!(frontier.visited_count(), 1);
    }
}
