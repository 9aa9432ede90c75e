//! The scrape engine: drives the fetch/filter/accumulate cycle for
//! every resolved scope, respecting global budgets.
//!
//! Each scope runs a small finite-state machine
//! (`Fetching → Evaluating → (Fetching | stopped)`) so the stop-reason
//! taxonomy stays exhaustive and testable in isolation from network
//! I/O. Scopes are independent; a bounded worker pool runs across
//! scopes (never across pages within a scope, because the upstream is
//! the scarce, rate-limited resource the inter-page delay exists to
//! protect).

use crate::context::RunContext;
use crate::error::{Result, ScrapeError};
use crate::freshness::{Freshness, FreshnessGate, FreshnessState};
use crate::normalizer::{NormalizedRecord, Normalizer};
use crate::sink::{CollectingSink, RecordSink};
use crate::stats::{RunStats, ScopeOutcome, StopReason};
use chine_core::{ScrapeConfig, StalePolicy};
use chine_fetch::{FetchError, Page, PageFetcher, PageRequest};
use chine_search::{resolve_scopes, SearchRequest, SearchScope};
use chrono::Utc;
use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// A completed run: the collected records plus the run statistics.
#[derive(Debug)]
pub struct ScrapeReport {
    /// Records in emission order
    pub records: Vec<NormalizedRecord>,
    /// Run counters and per-scope outcomes
    pub stats: RunStats,
}

/// Per-scope lifecycle states.
enum ScopeState {
    /// About to issue the next page fetch
    Fetching,
    /// Holding a fetched page, applying dedup/freshness/normalization
    Evaluating(Page),
}

/// Orchestrates a scrape run across all resolved scopes.
pub struct ScrapeEngine<F> {
    fetcher: Arc<F>,
    config: ScrapeConfig,
    normalizer: Normalizer,
}

impl<F: PageFetcher> ScrapeEngine<F> {
    /// Create an engine over a fetcher with the given configuration.
    ///
    /// # Errors
    /// Returns a configuration error if the config fails validation.
    pub fn new(fetcher: Arc<F>, config: ScrapeConfig) -> Result<Self> {
        config.validate()?;
        let normalizer = Normalizer::new(config.output.shape);
        Ok(Self {
            fetcher,
            config,
            normalizer,
        })
    }

    /// Run a search to completion, collecting records in memory.
    ///
    /// # Errors
    /// Returns error on invalid requests; per-scope fetch failures are
    /// recorded in the stats instead.
    pub async fn run(&self, request: &SearchRequest) -> Result<ScrapeReport> {
        let sink = Arc::new(CollectingSink::new());
        let stats = self
            .run_with(request, sink.clone(), CancellationToken::new())
            .await?;
        Ok(ScrapeReport {
            records: sink.take(),
            stats,
        })
    }

    /// Run a search, streaming records into the given sink.
    ///
    /// The cancellation token aborts the run promptly: in-flight scope
    /// workers stop issuing page requests and the remaining scopes are
    /// recorded as skipped. A cancelled run still returns its partial
    /// stats, flagged as aborted.
    ///
    /// # Errors
    /// Returns error on invalid requests or when the sink rejects a
    /// record. Per-scope fetch failures never abort the run.
    pub async fn run_with(
        &self,
        request: &SearchRequest,
        sink: Arc<dyn RecordSink>,
        cancel: CancellationToken,
    ) -> Result<RunStats> {
        let scopes = resolve_scopes(request)?;
        let ctx = Arc::new(RunContext::new());
        tracing::info!(
            run_id = %ctx.run_id(),
            scopes = scopes.len(),
            max_pages = self.config.pagination.max_pages,
            "Starting scrape run"
        );

        // Child token so an internal abort never cancels the caller's token.
        let cancel = cancel.child_token();
        let max_concurrent = self.config.run.max_concurrent_scopes.max(1);
        let between_scopes = Duration::from_millis(self.config.delays.between_scopes_ms);

        let mut workers = FuturesUnordered::new();
        let mut launched = 0usize;
        let mut sink_error: Option<ScrapeError> = None;

        for scope in scopes {
            if ctx.is_aborted() || cancel.is_cancelled() {
                ctx.absorb_outcome(ScopeOutcome::new(scope.label, StopReason::Skipped));
                continue;
            }

            // Inter-scope pacing only makes sense sequentially.
            if launched > 0 && max_concurrent == 1 && !between_scopes.is_zero() {
                tokio::select! {
                    () = cancel.cancelled() => {}
                    () = tokio::time::sleep(between_scopes) => {}
                }
                if ctx.is_aborted() || cancel.is_cancelled() {
                    ctx.absorb_outcome(ScopeOutcome::new(scope.label, StopReason::Skipped));
                    continue;
                }
            }

            workers.push(self.scrape_scope(scope, ctx.clone(), sink.clone(), cancel.clone()));
            launched += 1;

            while workers.len() >= max_concurrent {
                if let Some(result) = workers.next().await {
                    if let Err(err) = result {
                        sink_error.get_or_insert(err);
                        ctx.mark_aborted();
                        cancel.cancel();
                    }
                }
            }
        }

        while let Some(result) = workers.next().await {
            if let Err(err) = result {
                sink_error.get_or_insert(err);
                ctx.mark_aborted();
                cancel.cancel();
            }
        }

        if cancel.is_cancelled() {
            ctx.mark_aborted();
        }

        if let Some(err) = sink_error {
            return Err(err);
        }

        let stats = ctx.finalize();
        tracing::info!(
            run_id = %stats.run_id,
            unique = stats.unique_emitted,
            duplicates = stats.duplicates,
            pages = stats.pages_fetched,
            errors = stats.errors,
            aborted = stats.aborted,
            "Scrape run completed"
        );
        Ok(stats)
    }

    /// Drive one scope to a stop reason, recording its outcome.
    ///
    /// Returns `Err` only when the sink rejects a record; fetch failures
    /// are demoted to scope-level stop reasons.
    async fn scrape_scope(
        &self,
        scope: SearchScope,
        ctx: Arc<RunContext>,
        sink: Arc<dyn RecordSink>,
        cancel: CancellationToken,
    ) -> Result<()> {
        let gate = FreshnessGate::from_config(&self.config.freshness);
        let stale_limit = self.config.freshness.consecutive_stale_limit;
        let stale_policy = self.config.freshness.stale_policy;
        let max_pages = self.config.pagination.effective_max_pages();
        let page_size = self.config.pagination.effective_page_size();
        let between_pages = Duration::from_millis(self.config.delays.between_pages_ms);

        let mut outcome = ScopeOutcome::new(scope.label.clone(), StopReason::EndOfResults);
        let mut fresh_state = FreshnessState::new();
        let mut page_index: u32 = 1;
        let mut state = ScopeState::Fetching;

        tracing::debug!(scope = %scope.label, "Scope started");

        let stop_reason = loop {
            state = match state {
                ScopeState::Fetching => {
                    if cancel.is_cancelled() {
                        break StopReason::Aborted;
                    }
                    let request = PageRequest::new(page_index, page_size);
                    match self.fetch_with_retry(&scope, &request, &cancel).await {
                        Ok(page) => {
                            outcome.pages_fetched += 1;
                            ScopeState::Evaluating(page)
                        }
                        Err(err) => {
                            if cancel.is_cancelled() {
                                break StopReason::Aborted;
                            }
                            outcome.error = Some(err.to_string());
                            if err.is_retryable() {
                                tracing::error!(
                                    scope = %scope.label,
                                    page = page_index,
                                    error = %err,
                                    "Retries exhausted, stopping scope"
                                );
                                break StopReason::Error;
                            }
                            tracing::error!(
                                scope = %scope.label,
                                page = page_index,
                                error = %err,
                                "Upstream rejected scope"
                            );
                            break StopReason::Fatal;
                        }
                    }
                }
                ScopeState::Evaluating(page) => {
                    if page.is_empty() {
                        break StopReason::EndOfResults;
                    }
                    if page_index == 1 {
                        outcome.advertised_total = page.total;
                        if let (Some(total), Some(pages)) = (page.total, page.max_pages) {
                            tracing::info!(
                                scope = %scope.label,
                                total,
                                pages,
                                "Upstream reported result set"
                            );
                        }
                    }

                    let now = Utc::now();
                    let mut stale_tripped = false;

                    for listing in &page.listings {
                        outcome.listings_seen += 1;

                        // Re-sent listings never touch the freshness state.
                        if !ctx.claim_fingerprint(listing.id.clone()) {
                            outcome.duplicates += 1;
                            continue;
                        }

                        let emit = match gate.classify(listing.recency(), now) {
                            Freshness::Fresh => {
                                fresh_state.reset();
                                true
                            }
                            Freshness::Stale => {
                                // The limit counts tolerated back-to-back stale
                                // listings; one more trips the early stop.
                                if fresh_state.record_stale() > stale_limit {
                                    stale_tripped = true;
                                }
                                // Emit-and-stop emits stale records (staleness is a
                                // stopping heuristic here); exclude drops them.
                                stale_policy == StalePolicy::EmitAndStop
                            }
                        };

                        if emit {
                            let record = self.normalizer.normalize(listing, &scope, now);
                            match sink.push(record).await {
                                Ok(()) => outcome.emitted += 1,
                                Err(err) => {
                                    outcome.error = Some(err.to_string());
                                    outcome.stop_reason = StopReason::Aborted;
                                    ctx.absorb_outcome(outcome);
                                    return Err(err);
                                }
                            }
                        }
                    }

                    // The stale-limit break happens only after the whole page
                    // has been processed.
                    if stale_tripped {
                        break StopReason::StaleLimit;
                    }
                    if page_index >= max_pages {
                        break StopReason::PageBudget;
                    }
                    page_index += 1;

                    if !between_pages.is_zero() {
                        tokio::select! {
                            () = cancel.cancelled() => break StopReason::Aborted,
                            () = tokio::time::sleep(between_pages) => {}
                        }
                    }
                    ScopeState::Fetching
                }
            };
        };

        outcome.stop_reason = stop_reason;
        tracing::info!(
            scope = %scope.label,
            stop = %stop_reason,
            pages = outcome.pages_fetched,
            emitted = outcome.emitted,
            duplicates = outcome.duplicates,
            "Scope finished"
        );

        let errors = ctx.absorb_outcome(outcome);
        let threshold = self.config.run.error_threshold;
        if threshold > 0 && errors >= threshold && !ctx.is_aborted() {
            tracing::warn!(
                errors,
                threshold,
                "Error threshold reached, aborting remaining scopes"
            );
            ctx.mark_aborted();
            cancel.cancel();
        }
        Ok(())
    }

    /// Fetch one page with retry and exponential backoff.
    ///
    /// Transient failures, timeouts, and rate limits are retried up to
    /// the configured ceiling; rate limits switch to the longer backoff
    /// multiplier and honor the upstream's retry-after hint when it is
    /// larger. Fatal errors are returned immediately.
    async fn fetch_with_retry(
        &self,
        scope: &SearchScope,
        request: &PageRequest,
        cancel: &CancellationToken,
    ) -> chine_fetch::Result<Page> {
        let retry = &self.config.retry;
        let timeout = Duration::from_millis(retry.fetch_timeout_ms);
        let mut last_error: Option<FetchError> = None;
        let mut backoff_multiplier: u64 = 1;

        for attempt in 0..retry.max_retries {
            if cancel.is_cancelled() {
                break;
            }

            let result = match tokio::time::timeout(timeout, self.fetcher.fetch(scope, request))
                .await
            {
                Ok(result) => result,
                Err(_) => Err(FetchError::Timeout(timeout)),
            };

            match result {
                Ok(page) => return Ok(page),
                Err(err) if !err.is_retryable() => return Err(err),
                Err(err) => {
                    if err.is_rate_limited() {
                        backoff_multiplier = retry.rate_limit_multiplier.max(1);
                        tracing::warn!(
                            scope = %scope.label,
                            "Rate limited, using longer backoff"
                        );
                    }

                    let mut delay = Duration::from_millis(
                        retry.base_delay_ms * backoff_multiplier * u64::from(attempt + 1),
                    );
                    if let FetchError::RateLimited {
                        retry_after: Some(hint),
                    } = &err
                    {
                        delay = delay.max(*hint);
                    }

                    last_error = Some(err);

                    if attempt < retry.max_retries - 1 {
                        tracing::warn!(
                            scope = %scope.label,
                            page = request.page,
                            attempt = attempt + 1,
                            max_retries = retry.max_retries,
                            delay = ?delay,
                            "Fetch failed, retrying"
                        );
                        tokio::select! {
                            () = cancel.cancelled() => break,
                            () = tokio::time::sleep(delay) => {}
                        }
                    }
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| FetchError::Transient("cancelled before fetch".to_string())))
    }
}
