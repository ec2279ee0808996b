use crate::config::{Config, Task};
use crate::download::{EnclosureOutcome, download_item};
use crate::error::RssGetError;
use crate::feed::fetch_feed;
use crate::matcher::ShowMatcher;
use crate::session::{HttpOptions, Session};
use futures::stream::{self, StreamExt};
use itertools::Itertools;
use tracing::{debug, info, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunOptions {
    pub http: HttpOptions,
    /// Number of tasks processed at the same time. 1 keeps everything sequential.
    pub parallelism: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            http: HttpOptions::default(),
            parallelism: 1,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TaskSummary {
    pub items: usize,
    pub matched: usize,
    pub stored: usize,
    pub already_present: usize,
    pub failed: usize,
}

impl TaskSummary {
    fn record(&mut self, outcome: &EnclosureOutcome) {
        match outcome {
            EnclosureOutcome::Stored { .. } => self.stored += 1,
            EnclosureOutcome::AlreadyExists { .. } => self.already_present += 1,
            EnclosureOutcome::Failed { .. } => self.failed += 1,
        }
    }

    fn add(&mut self, other: &TaskSummary) {
        self.items += other.items;
        self.matched += other.matched;
        self.stored += other.stored;
        self.already_present += other.already_present;
        self.failed += other.failed;
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub tasks: usize,
    /// Names of tasks skipped because their feed could not be used
    pub failed_tasks: Vec<String>,
    pub totals: TaskSummary,
}

/// Runs one task: fresh session, feed fetch, show matching and downloads.
///
/// Only session setup and the feed itself can fail the task; enclosure
/// problems are logged and counted in the summary.
pub async fn run_task(
    name: &str,
    task: &Task,
    http: &HttpOptions,
) -> Result<TaskSummary, RssGetError> {
    info!(task = %name, title = %task.title, "Executing task");

    let feed_url = task
        .feed_url()
        .map_err(|details| RssGetError::ConfigValidation {
            task: name.to_string(),
            details,
        })?;
    let matcher = ShowMatcher::new(&task.shows, &task.quality, task.ignore_case);
    if matcher.is_empty() {
        warn!(task = %name, "No usable show patterns, skipping feed");
        return Ok(TaskSummary::default());
    }
    debug!(task = %name, patterns = matcher.len(), "Compiled show patterns");

    let session = Session::new(feed_url, &task.cookies, http)?;
    let items = fetch_feed(&session).await?;

    let mut summary = TaskSummary {
        items: items.len(),
        ..TaskSummary::default()
    };

    for item in &items {
        let Some(show) = matcher.find(&item.title) else {
            debug!(task = %name, title = %item.title, "No show matched");
            continue;
        };
        debug!(task = %name, title = %item.title, show = %show, "Matched");
        summary.matched += 1;

        for outcome in download_item(item, &session, &task.download).await {
            summary.record(&outcome);
        }
    }

    info!(
        task = %name,
        items = summary.items,
        matched = summary.matched,
        stored = summary.stored,
        already_present = summary.already_present,
        failed = summary.failed,
        "Task finished"
    );
    Ok(summary)
}

/// Runs every configured task, in name order, `parallelism` at a time.
///
/// A failing task is logged and skipped; it never stops the others.
pub async fn run_tasks(config: &Config, options: &RunOptions) -> RunSummary {
    info!("Tasks count: {}", config.tasks.len());
    if config.tasks.is_empty() {
        warn!("No tasks configured, nothing to do");
    }

    let results: Vec<_> = stream::iter(config.tasks.iter().sorted_by(|a, b| a.0.cmp(b.0)))
        .map(|(name, task)| async move { (name, run_task(name, task, &options.http).await) })
        .buffer_unordered(options.parallelism.max(1))
        .collect()
        .await;

    let mut summary = RunSummary {
        tasks: results.len(),
        ..RunSummary::default()
    };
    for (name, result) in results {
        match result {
            Ok(task_summary) => summary.totals.add(&task_summary),
            Err(err) => {
                warn!(task = %name, "Could not run task: {}", err);
                summary.failed_tasks.push(name.clone());
            }
        }
    }
    summary.failed_tasks.sort();

    info!(
        tasks = summary.tasks,
        failed_tasks = summary.failed_tasks.len(),
        stored = summary.totals.stored,
        already_present = summary.totals.already_present,
        failed = summary.totals.failed,
        "All tasks finished"
    );
    summary
}
