//! Symbol extraction: windowing, records, and per-file aggregation.

pub mod aggregator;
pub mod record;
pub mod window;

pub use aggregator::{aggregate_symbols, LlmSymbolExtractor, SymbolExtractor};
pub use record::{dedupe_symbols, FileSymbols, SymbolBatch, SymbolKind, SymbolRecord};
pub use window::{split_windows, WindowConfig};
