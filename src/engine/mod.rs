//! Execution engine module
//!
//! Stream orchestration and the page loop.
//!
//! # Overview
//!
//! The engine module provides:
//! - `SyncEngine` - Drains streams one at a time, page by page
//! - `probe` - Resolves the store dialect once per run
//! - `discovery` - Finds the streams a store actually serves
//!
//! Parent streams queue a context per record for their children; once the
//! parent finishes, each child drains that queue before the next top-level
//! stream starts.

mod discovery;
mod probe;
mod types;

pub(crate) use discovery::body_shape;
pub use discovery::{discover, is_available, AVAILABILITY_RETRIES};
pub use probe::{dialect_from_status, parse_version, probe_dialect, SYSTEM_STATUS_PATH};
pub use types::{EngineConfig, StreamRun, SyncStats};

pub use crate::types::Dialect;

use crate::catalog::{Catalog, Context, StreamDefinition};
use crate::error::{Error, Result};
use crate::http::{Fetched, HttpClient, RequestConfig, Retried};
use crate::output::RecordSink;
use crate::pagination::{NextPage, PaginationState, Paginator, TotalPagesPaginator};
use crate::state::{format_timestamp, CheckpointStore, ReplicationTracker};
use crate::types::JsonObject;
use std::collections::VecDeque;
use std::time::Instant;
use tokio::sync::OnceCell;
use tracing::{debug, error, info, warn};

/// Sync engine for orchestrating data extraction
pub struct SyncEngine {
    client: HttpClient,
    config: EngineConfig,
    paginator: Box<dyn Paginator>,
    dialect: OnceCell<Dialect>,
    stats: SyncStats,
}

impl SyncEngine {
    /// Create a new sync engine
    pub fn new(client: HttpClient, config: EngineConfig) -> Self {
        Self {
            client,
            config,
            paginator: Box::new(TotalPagesPaginator::new()),
            dialect: OnceCell::new(),
            stats: SyncStats::default(),
        }
    }

    /// Replace the pagination strategy
    #[must_use]
    pub fn with_paginator(mut self, paginator: impl Paginator + 'static) -> Self {
        self.paginator = Box::new(paginator);
        self
    }

    /// Get the HTTP client
    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    /// Get the engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Get statistics of the last run
    pub fn stats(&self) -> &SyncStats {
        &self.stats
    }

    /// Dialect resolved so far in this run, if any
    pub fn resolved_dialect(&self) -> Option<Dialect> {
        self.dialect.get().copied()
    }

    /// Store dialect, probed on first use
    pub async fn dialect(&self) -> Dialect {
        *self
            .dialect
            .get_or_init(|| probe_dialect(&self.client, &self.config))
            .await
    }

    /// Sync every stream in the catalog
    ///
    /// Stream failures are logged and the run continues; they surface as
    /// [`Error::StreamsFailed`] once every stream has had its turn. Errors
    /// that affect the whole run abort immediately.
    pub async fn sync(
        &mut self,
        catalog: &Catalog,
        store: &dyn CheckpointStore,
        sink: &mut dyn RecordSink,
    ) -> Result<SyncStats> {
        let start = Instant::now();
        self.dialect = OnceCell::new();
        self.stats = SyncStats::new();

        let mut work: VecDeque<(StreamDefinition, Option<VecDeque<Context>>)> =
            catalog.top_level().map(|s| (*s, None)).collect();

        while let Some((stream, contexts)) = work.pop_front() {
            let children: Vec<StreamDefinition> =
                catalog.children_of(stream.name).copied().collect();
            let mut run = self
                .start_stream(stream, catalog, store, !children.is_empty())
                .await?;

            info!("Syncing stream '{}'", stream.name);
            let result = match contexts {
                None => self.drain_pages(&mut run, None, sink).await,
                Some(mut queue) => self.drain_contexts(&mut run, &mut queue, sink).await,
            };
            self.stats.add_run(&run);

            match result {
                Ok(()) => {
                    self.finish_stream(&run, store, sink).await?;
                    self.stats.add_stream();
                }
                Err(e) if e.is_run_fatal() => {
                    error!("Aborting sync in stream '{}': {}", stream.name, e);
                    return Err(e);
                }
                Err(e) => {
                    error!(
                        stream = stream.name,
                        path = e.path().unwrap_or_default(),
                        status = ?e.status(),
                        "Stream failed: {e}"
                    );
                    self.stats.add_failure(stream.name);
                }
            }

            for child in children.into_iter().rev() {
                work.push_front((child, Some(run.child_contexts.clone())));
            }
        }

        self.stats.set_duration(start.elapsed().as_millis() as u64);
        info!(
            "Sync finished: {} records, {} pages, {} streams in {}ms",
            self.stats.records_synced,
            self.stats.pages_fetched,
            self.stats.streams_synced,
            self.stats.duration_ms
        );

        if self.stats.has_failures() {
            return Err(Error::StreamsFailed {
                count: self.stats.failed_streams.len(),
                streams: self.stats.failed_streams.join(", "),
            });
        }

        Ok(self.stats.clone())
    }

    async fn start_stream(
        &self,
        stream: StreamDefinition,
        catalog: &Catalog,
        store: &dyn CheckpointStore,
        has_children: bool,
    ) -> Result<StreamRun> {
        let tracker = match stream.replication_key {
            Some(_) => {
                let stored = store.get_watermark(stream.name).await;
                let tracker = ReplicationTracker::resume(
                    stored.as_deref(),
                    self.config.start_date,
                    self.config.lookback_days,
                );
                debug!(
                    "Stream '{}' resumes from {}",
                    stream.name,
                    format_timestamp(&tracker.watermark())
                );
                Some(tracker)
            }
            None => None,
        };

        StreamRun::new(
            stream,
            tracker,
            catalog.is_selected(stream.name),
            has_children && stream.child_context.is_some(),
        )
    }

    async fn drain_contexts(
        &self,
        run: &mut StreamRun,
        queue: &mut VecDeque<Context>,
        sink: &mut dyn RecordSink,
    ) -> Result<()> {
        debug!("{} contexts queued for '{}'", queue.len(), run.stream.name);
        while let Some(context) = queue.pop_front() {
            self.drain_pages(run, Some(&context), sink).await?;
        }
        Ok(())
    }

    /// Fetch every page of one resolved path
    async fn drain_pages(
        &self,
        run: &mut StreamRun,
        context: Option<&Context>,
        sink: &mut dyn RecordSink,
    ) -> Result<()> {
        let path = run.stream.render_path(context)?;
        let shape = body_shape(&run.stream);
        let ignore_errors = self.client.config().ignore_server_errors;
        let mut state = PaginationState::new();

        loop {
            let mut params = self.paginator.request_params(state.cursor);
            let dialect = match &run.tracker {
                Some(tracker) => {
                    let dialect = self.dialect().await;
                    let (key, value) = tracker.filter_param(dialect);
                    params.insert(key.to_string(), value);
                    Some(dialect)
                }
                None => None,
            };

            let request = RequestConfig::new().queries(params).shape(shape);
            let next = match self.client.get(&path, &request).await {
                Ok(Retried {
                    value: Fetched::Page(page),
                    ..
                }) => {
                    state.record_success();
                    run.pages += 1;

                    let legacy = match dialect {
                        Some(Dialect::Legacy) => run.tracker.as_ref(),
                        _ => None,
                    };
                    let records = run.normalizer.normalize_page(&page.body, context, legacy)?;
                    debug!(
                        "'{}' {}: {} records",
                        path,
                        state.cursor,
                        records.len()
                    );
                    emit_records(run, records, sink)?;

                    self.paginator.next_page(&page.headers, state.cursor)
                }
                Ok(Retried {
                    value: Fetched::Ignored { status },
                    ..
                }) => {
                    warn!("Skipping {} of '{}' after HTTP {}", state.cursor, path, status);
                    match self.degrade(run, &mut state, &path) {
                        Some(next) => next,
                        None => return Ok(()),
                    }
                }
                Err(e @ Error::RetriesExhausted { .. }) if ignore_errors && !e.is_run_fatal() => {
                    warn!("Skipping {} of '{}': {}", state.cursor, path, e);
                    match self.degrade(run, &mut state, &path) {
                        Some(next) => next,
                        None => return Ok(()),
                    }
                }
                Err(e) => return Err(e),
            };

            match next {
                NextPage::Continue(cursor) => state.advance(cursor, &path)?,
                NextPage::Done => {
                    state.mark_done();
                    return Ok(());
                }
            }
        }
    }

    /// Treat a failed page as empty and guess that another one follows
    fn degrade(
        &self,
        run: &mut StreamRun,
        state: &mut PaginationState,
        path: &str,
    ) -> Option<NextPage> {
        run.degraded_pages += 1;
        if state.record_failure() {
            warn!(
                "Giving up on '{}' after {} consecutive failed pages",
                path, state.consecutive_errors
            );
            return None;
        }
        Some(self.paginator.next_after_failure(state.cursor))
    }

    /// Commit the watermark of a completed stream
    async fn finish_stream(
        &self,
        run: &StreamRun,
        store: &dyn CheckpointStore,
        sink: &mut dyn RecordSink,
    ) -> Result<()> {
        if run.selected {
            if let (Some(key), Some(tracker)) = (run.stream.replication_key, &run.tracker) {
                let value = format_timestamp(&tracker.next_watermark());
                store.set_watermark(run.stream.name, key, &value).await?;
                sink.write_state(&store.snapshot().await)?;
            }
        }

        info!(
            "Completed '{}': {} records in {} pages",
            run.stream.name, run.records, run.pages
        );
        Ok(())
    }
}

impl std::fmt::Debug for SyncEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncEngine")
            .field("client", &self.client)
            .field("config", &self.config)
            .field("dialect", &self.dialect.get())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

/// Hand normalized records to the tracker, the child queue and the sink
fn emit_records(
    run: &mut StreamRun,
    records: Vec<JsonObject>,
    sink: &mut dyn RecordSink,
) -> Result<()> {
    for record in records {
        if let (Some(key), Some(tracker)) = (run.stream.replication_key, run.tracker.as_mut()) {
            if let Some(value) = record.get(key) {
                tracker.observe(value);
            }
        }

        if run.collect_children {
            if let Some(context) = run.stream.child_context.and_then(|derive| derive(&record)) {
                run.child_contexts.push_back(context);
            }
        }

        if run.selected {
            if !run.schema_written {
                sink.write_schema(&run.stream)?;
                run.schema_written = true;
            }
            sink.write_record(run.stream.name, record)?;
            run.records += 1;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests;
