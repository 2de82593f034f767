//! Symbol records returned by extraction.

use std::collections::HashSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Category of an extracted symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    /// Free function or method.
    Function,
    /// Class, struct, or similar nominal type with behavior.
    Class,
    /// Variable or constant.
    Variable,
    /// Interface, trait, or protocol.
    Interface,
    /// Type alias or plain data type.
    Type,
    /// Anything else, including kinds the model invents.
    #[serde(other)]
    Other,
}

impl SymbolKind {
    /// Lowercase label as it appears on the wire.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Class => "class",
            Self::Variable => "variable",
            Self::Interface => "interface",
            Self::Type => "type",
            Self::Other => "other",
        }
    }
}

/// One symbol found in a source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SymbolRecord {
    /// File the symbol was found in.
    #[serde(default)]
    pub file: String,
    /// Symbol name.
    pub symbol: String,
    /// Symbol category.
    pub kind: SymbolKind,
    /// Declaration line or signature.
    #[serde(default)]
    pub signature: String,
    /// One-sentence purpose.
    #[serde(default)]
    pub description: String,
    /// Names this symbol uses.
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Free-form remarks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Model confidence between 0 and 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

/// Wire shape of one extraction response.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct SymbolBatch {
    /// Symbols declared in the window.
    #[serde(default)]
    pub symbols: Vec<SymbolRecord>,
}

/// Symbols grouped by file, as stored in the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileSymbols {
    /// File path.
    pub file: String,
    /// Deduplicated symbols in first-seen order.
    pub symbols: Vec<SymbolRecord>,
}

/// Keeps the first record for every `(symbol, kind)` pair, preserving order.
#[must_use]
pub fn dedupe_symbols(records: Vec<SymbolRecord>) -> Vec<SymbolRecord> {
    let mut seen: HashSet<(String, SymbolKind)> = HashSet::new();
    records.into_iter().filter(|r| seen.insert((r.symbol.clone(), r.kind))).collect()
}
