//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that coordinates the whole run:
//! - Seeding and validating the frontier
//! - Spawning the fixed-size worker pool
//! - Fetching pages, extracting links and images
//! - Enforcing the depth bound and the same-host restriction
//! - Accumulating results and per-page failures

use crate::config::Config;
use crate::crawler::extract::{Extractor, HtmlExtractor};
use crate::crawler::fetcher::{build_http_client, fetch_page, FetchOutcome};
use crate::crawler::frontier::{Claim, CrawlTask, Frontier};
use crate::download::ImageRef;
use crate::state::TaskState;
use crate::url::{normalize_url, same_host, LinkFilter};
use crate::{PichoundError, Result};
use reqwest::Client;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

/// A page that could not be fetched or parsed during the crawl
#[derive(Debug, Clone)]
pub struct PageFailure {
    /// The page URL
    pub url: String,

    /// Short description of what went wrong
    pub reason: String,
}

/// Aggregate outcome of one crawl run
#[derive(Debug, Clone, Default)]
pub struct CrawlResult {
    /// Union of all images discovered across visited pages
    pub images: Vec<ImageRef>,

    /// Pages that reached the `Expanded` state
    pub pages_expanded: usize,

    /// Pages that reached the `Failed` state
    pub pages_failed: usize,

    /// Per-page failure details
    pub failures: Vec<PageFailure>,
}

impl CrawlResult {
    /// Total pages that were claimed and fetched (or attempted)
    pub fn pages_visited(&self) -> usize {
        self.pages_expanded + self.pages_failed
    }
}

/// Shared accumulator the workers write into
#[derive(Default)]
struct Collector {
    images: HashSet<ImageRef>,
    failures: Vec<PageFailure>,
    expanded: usize,
    failed: usize,
}

impl Collector {
    fn record(&mut self, state: TaskState) {
        match state {
            TaskState::Expanded => self.expanded += 1,
            TaskState::Failed => self.failed += 1,
            // Workers only report terminal states
            TaskState::Pending | TaskState::Fetching => {}
        }
    }

    fn pages_visited(&self) -> usize {
        self.expanded + self.failed
    }
}

/// Handle for requesting a cooperative stop of a running crawl
///
/// The flag is checked between task dequeues; in-flight fetches complete
/// or time out naturally.
#[derive(Clone)]
pub struct StopHandle {
    frontier: Arc<Frontier>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.frontier.request_stop();
    }
}

/// Breadth-limited site crawler
///
/// The crawler owns the visited set and the task queue for the lifetime of
/// one `crawl` call; create a fresh instance per run.
pub struct Crawler {
    config: Arc<Config>,
    client: Client,
    extractor: Arc<dyn Extractor>,
    link_filter: LinkFilter,
    frontier: Arc<Frontier>,
}

impl Crawler {
    /// Creates a new crawler from a validated configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Ready to crawl
    /// * `Err(PichoundError)` - HTTP client construction failed
    pub fn new(config: Config) -> Result<Self> {
        let client = build_http_client(&config.user_agent, config.crawler.request_timeout)?;
        let link_filter = LinkFilter::from_config(&config.filters);

        Ok(Self {
            config: Arc::new(config),
            client,
            extractor: Arc::new(HtmlExtractor),
            link_filter,
            frontier: Arc::new(Frontier::new()),
        })
    }

    /// Replaces the default HTML extractor
    ///
    /// This is the seam for site-specific extraction logic; the crawl loop
    /// itself never touches markup.
    pub fn with_extractor(mut self, extractor: Arc<dyn Extractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Returns the HTTP client, for reuse by the download stage
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Returns a handle that can stop this crawl from another task
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            frontier: Arc::clone(&self.frontier),
        }
    }

    /// Runs the crawl to completion
    ///
    /// Seeds are fetched first; every same-host link found within the
    /// depth bound is followed exactly once. Fetch and parse failures are
    /// recorded per page and never abort the run.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlResult)` - Best-effort result plus the failure list
    /// * `Err(PichoundError::Validation)` - Empty or malformed seed list,
    ///   or zero concurrency; detected before any network activity
    pub async fn crawl(&self) -> Result<CrawlResult> {
        let crawler_config = &self.config.crawler;

        if self.config.seeds.is_empty() {
            return Err(PichoundError::Validation(
                "at least one seed URL is required".to_string(),
            ));
        }

        if crawler_config.max_concurrency == 0 {
            return Err(PichoundError::Validation(
                "max_concurrency must be >= 1".to_string(),
            ));
        }

        // Validate every seed before touching the network
        let mut seeds = Vec::with_capacity(self.config.seeds.len());
        for seed in &self.config.seeds {
            let normalized = normalize_url(seed).map_err(|e| {
                PichoundError::Validation(format!("invalid seed URL '{}': {}", seed, e))
            })?;
            seeds.push(normalized);
        }

        for seed in seeds {
            self.frontier.push_if_unvisited(CrawlTask {
                url: seed,
                remaining_depth: crawler_config.max_depth,
            });
        }

        tracing::info!(
            "Starting crawl: {} seeds, max depth {}, {} workers",
            self.frontier.queue_len(),
            crawler_config.max_depth,
            crawler_config.max_concurrency
        );

        let collector = Arc::new(Mutex::new(Collector::default()));
        let start_time = std::time::Instant::now();

        let mut handles = Vec::with_capacity(crawler_config.max_concurrency);
        for worker_id in 0..crawler_config.max_concurrency {
            let context = WorkerContext {
                client: self.client.clone(),
                extractor: Arc::clone(&self.extractor),
                link_filter: self.link_filter.clone(),
                frontier: Arc::clone(&self.frontier),
                collector: Arc::clone(&collector),
                output_dir: PathBuf::from(&self.config.output.image_dir),
            };
            handles.push(tokio::spawn(worker_loop(worker_id, context)));
        }

        for handle in handles {
            if let Err(e) = handle.await {
                tracing::error!("Crawl worker panicked: {}", e);
            }
        }

        let collector = Arc::try_unwrap(collector)
            .map_err(|_| {
                PichoundError::Validation("crawl workers still hold the collector".to_string())
            })?
            .into_inner()
            .unwrap();

        let result = CrawlResult {
            images: collector.images.into_iter().collect(),
            pages_expanded: collector.expanded,
            pages_failed: collector.failed,
            failures: collector.failures,
        };

        tracing::info!(
            "Crawl finished in {:?}: {} pages visited, {} images found, {} failures",
            start_time.elapsed(),
            result.pages_visited(),
            result.images.len(),
            result.failures.len()
        );

        Ok(result)
    }
}

/// Everything a worker needs, cloned per task
struct WorkerContext {
    client: Client,
    extractor: Arc<dyn Extractor>,
    link_filter: LinkFilter,
    frontier: Arc<Frontier>,
    collector: Arc<Mutex<Collector>>,
    output_dir: PathBuf,
}

/// Drains the frontier until it reports `Done`
///
/// Workers poll rather than block: `Wait` means another worker's in-flight
/// page may still enqueue children, so back off briefly and retry.
async fn worker_loop(worker_id: usize, context: WorkerContext) {
    loop {
        match context.frontier.try_claim() {
            Claim::Task(task) => {
                let state = process_task(&context, &task).await;
                {
                    let mut collector = context.collector.lock().unwrap();
                    collector.record(state);
                    let visited = collector.pages_visited();
                    if visited % 10 == 0 {
                        tracing::info!(
                            "Progress: {} pages visited, {} queued, {} images found",
                            visited,
                            context.frontier.queue_len(),
                            collector.images.len()
                        );
                    }
                }
                context.frontier.task_done();
            }
            Claim::Wait => {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
            Claim::Done => {
                tracing::debug!("Worker {} finished", worker_id);
                break;
            }
        }
    }
}

/// Processes one claimed task: fetch, extract, enqueue children
///
/// Returns the terminal state the task reached. All failures are recorded
/// in the collector; nothing propagates.
async fn process_task(context: &WorkerContext, task: &CrawlTask) -> TaskState {
    tracing::debug!(
        "Fetching {} (remaining depth {})",
        task.url,
        task.remaining_depth
    );

    let outcome = fetch_page(&context.client, &task.url).await;

    let (final_url, body) = match outcome {
        FetchOutcome::Success {
            final_url, body, ..
        } => (final_url, body),
        other => {
            // failure_reason is Some for every non-success outcome
            let reason = other
                .failure_reason()
                .unwrap_or_else(|| "unknown".to_string());
            tracing::warn!("Failed to fetch {}: {}", task.url, reason);
            let mut collector = context.collector.lock().unwrap();
            collector.failures.push(PageFailure {
                url: task.url.to_string(),
                reason,
            });
            return TaskState::Failed;
        }
    };

    let content = context.extractor.extract(&body, &final_url);

    {
        let mut collector = context.collector.lock().unwrap();
        for image_url in content.images {
            collector
                .images
                .insert(ImageRef::new(image_url, &final_url, &context.output_dir));
        }
    }

    // Depth 0 pages are inspected but their links are not followed
    if task.remaining_depth > 0 {
        expand_links(context, task, &content.links);
    }

    TaskState::Expanded
}

/// Enqueues the same-host links of a page at `remaining_depth - 1`
fn expand_links(context: &WorkerContext, task: &CrawlTask, links: &[Url]) {
    let mut enqueued = 0;

    for link in links {
        let normalized = match normalize_url(link.as_str()) {
            Ok(n) => n,
            Err(e) => {
                tracing::debug!("Skipping link {}: {}", link, e);
                continue;
            }
        };

        // Cross-host links are recorded nowhere: the crawl never leaves
        // the host it was seeded on
        if !same_host(&normalized, &task.url) {
            tracing::trace!("Skipping cross-host link {}", normalized);
            continue;
        }

        if !context.link_filter.allows(&normalized) {
            tracing::trace!("Link {} rejected by filter", normalized);
            continue;
        }

        if context.frontier.push_if_unvisited(CrawlTask {
            url: normalized,
            remaining_depth: task.remaining_depth - 1,
        }) {
            enqueued += 1;
        }
    }

    if enqueued > 0 {
        tracing::debug!("{}: enqueued {} child pages", task.url, enqueued);
    }
}
