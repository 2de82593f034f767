//! ID generator port for producing unique identifiers.

/// Generates unique identifiers.
///
/// Each analysis run is tagged with one ID; replay substitutes a
/// predictable sequence.
pub trait IdGenerator: Send + Sync {
    /// Generates a new unique identifier string.
    fn generate_id(&self) -> String;
}
