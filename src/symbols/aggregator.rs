//! Per-file symbol aggregation over overlapping windows.
//!
//! Each retained window is extracted independently and concurrently. A
//! failed window contributes nothing; the merge keeps window order and the
//! first record of every `(symbol, kind)` pair.

use std::future::Future;
use std::pin::Pin;

use futures::future::join_all;
use tracing::{debug, warn};

use super::record::{dedupe_symbols, SymbolBatch, SymbolRecord};
use super::window::{split_windows, WindowConfig};
use crate::config::ModelSettings;
use crate::context::ServiceContext;
use crate::error::ReportError;
use crate::pipeline::prompts;
use crate::pipeline::state::Step;
use crate::pipeline::structured::request_structured;

/// Boxed future returned by [`SymbolExtractor::extract`].
pub type ExtractFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Vec<SymbolRecord>, ReportError>> + Send + 'a>>;

/// Extracts symbols from one window of a file.
pub trait SymbolExtractor: Send + Sync {
    /// Returns the symbols declared in `window`, a slice of `path`.
    fn extract<'a>(&'a self, path: &'a str, window: &'a str) -> ExtractFuture<'a>;
}

/// Extractor backed by a structured model call.
pub struct LlmSymbolExtractor<'c> {
    ctx: &'c ServiceContext,
    model: ModelSettings,
}

impl<'c> LlmSymbolExtractor<'c> {
    /// Creates an extractor that calls `ctx.llm` with the given model settings.
    #[must_use]
    pub fn new(ctx: &'c ServiceContext, model: ModelSettings) -> Self {
        Self { ctx, model }
    }
}

impl SymbolExtractor for LlmSymbolExtractor<'_> {
    fn extract<'a>(&'a self, path: &'a str, window: &'a str) -> ExtractFuture<'a> {
        Box::pin(async move {
            let prompt = prompts::symbols(path, window);
            let batch: SymbolBatch = request_structured(
                self.ctx,
                &self.model,
                Step::ExtractingSymbols,
                "symbol_batch",
                prompt,
            )
            .await?;
            Ok(batch.symbols)
        })
    }
}

/// Extracts, merges and deduplicates the symbols of one file.
///
/// Never fails: a window whose extraction errors is logged and skipped, so
/// the worst case is an empty list.
pub async fn aggregate_symbols(
    extractor: &dyn SymbolExtractor,
    path: &str,
    content: &str,
    config: &WindowConfig,
) -> Vec<SymbolRecord> {
    let windows = split_windows(content, config);
    debug!(file = path, windows = windows.len(), "extracting symbols");

    let results = join_all(windows.iter().map(|window| extractor.extract(path, window))).await;

    let mut merged = Vec::new();
    for (index, result) in results.into_iter().enumerate() {
        match result {
            Ok(records) => merged.extend(records.into_iter().map(|mut record| {
                record.file = path.to_string();
                record
            })),
            Err(err) => {
                warn!(
                    file = path,
                    window = index,
                    error = %err,
                    "window extraction failed; skipping"
                );
            }
        }
    }
    dedupe_symbols(merged)
}
