//! Batch fetcher: partition the universe and drive a [`QuoteProvider`].
//!
//! - Duplicate tickers collapse to their first occurrence.
//! - Chunks are consecutive slices of at most `batch_size` symbols.
//! - Up to `concurrency` chunk requests are in flight; results are merged by
//!   chunk index so the output order is the universe order regardless of
//!   completion order. `concurrency = 1` is strictly sequential.
//! - No retries: the first failed chunk fails the whole fetch.

use std::collections::HashSet;

use futures_util::stream::{self, StreamExt, TryStreamExt};

use crate::provider::{FetchError, QuoteProvider};
use crate::Quote;

/// Result of fetching a whole universe.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome {
    /// One quote per unique requested ticker, in universe order.
    pub quotes: Vec<Quote>,
    /// Number of requests issued.
    pub batches: usize,
    /// Change fields that were missing upstream and treated as zero.
    pub zero_filled_fields: usize,
}

/// Keep the first occurrence of each ticker, preserving order.
///
/// Comparison ignores ASCII case: the upstream keys symbols upper-cased, so
/// `aapl` and `AAPL` are one instrument.
pub fn dedupe_symbols(tickers: &[String]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(tickers.len());
    let mut out = Vec::with_capacity(tickers.len());
    for t in tickers {
        if seen.insert(t.to_ascii_uppercase()) {
            out.push(t.clone());
        } else {
            tracing::warn!(ticker = %t, "duplicate ticker in universe ignored");
        }
    }
    out
}

/// Consecutive chunks of at most `batch_size` symbols. The last may be shorter.
///
/// `batch_size` of 0 is treated as 1.
pub fn chunk_symbols(symbols: &[String], batch_size: usize) -> Vec<Vec<String>> {
    symbols
        .chunks(batch_size.max(1))
        .map(|c| c.to_vec())
        .collect()
}

pub struct BatchFetcher<P: QuoteProvider> {
    provider: P,
    batch_size: usize,
    concurrency: usize,
}

impl<P: QuoteProvider> BatchFetcher<P> {
    pub fn new(provider: P, batch_size: usize) -> Self {
        Self {
            provider,
            batch_size: batch_size.max(1),
            concurrency: 1,
        }
    }

    /// Allow up to `n` chunk requests in flight (`n` of 0 is treated as 1).
    pub fn with_concurrency(mut self, n: usize) -> Self {
        self.concurrency = n.max(1);
        self
    }

    pub async fn fetch_all(&self, tickers: &[String]) -> Result<FetchOutcome, FetchError> {
        let symbols = dedupe_symbols(tickers);
        let chunks = chunk_symbols(&symbols, self.batch_size);
        let batches = chunks.len();

        tracing::info!(
            source = self.provider.source_name(),
            symbols = symbols.len(),
            batches,
            concurrency = self.concurrency,
            "fetching quotes"
        );

        let provider = &self.provider;
        let mut indexed: Vec<(usize, Vec<Quote>)> = stream::iter(chunks.into_iter().enumerate())
            .map(|(idx, chunk)| async move {
                let quotes = provider.fetch_batch(&chunk).await.map_err(|e| {
                    tracing::error!(batch = idx, size = chunk.len(), error = %e, "batch fetch failed");
                    e
                })?;
                if quotes.len() != chunk.len() {
                    return Err(FetchError::Decode(format!(
                        "batch {idx}: provider returned {} quotes for {} symbols",
                        quotes.len(),
                        chunk.len()
                    )));
                }
                tracing::debug!(batch = idx, size = chunk.len(), "batch fetched");
                Ok((idx, quotes))
            })
            .buffer_unordered(self.concurrency)
            .try_collect()
            .await?;

        indexed.sort_by_key(|(idx, _)| *idx);

        let quotes: Vec<Quote> = indexed.into_iter().flat_map(|(_, q)| q).collect();
        let zero_filled_fields = quotes.iter().map(|q| q.zero_filled as usize).sum();

        if zero_filled_fields > 0 {
            tracing::info!(
                zero_filled_fields,
                "missing change fields treated as zero return (known accuracy limitation)"
            );
        }

        Ok(FetchOutcome {
            quotes,
            batches,
            zero_filled_fields,
        })
    }
}
