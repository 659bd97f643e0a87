//! Error types for the `wayfarer-world` crate.

/// Errors that can occur while generating a world.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorldGenError {
    /// More locations were requested than the grid has cells.
    #[error("grid of {cells} cells cannot hold {requested} locations")]
    GridTooSmall {
        /// Locations requested across all types.
        requested: u64,
        /// Cells available on the grid.
        cells: u64,
    },

    /// A configuration value is outside its valid range.
    #[error("invalid world config: {0}")]
    InvalidConfig(&'static str),

    /// Arithmetic overflow while scaling stats or prices.
    #[error("arithmetic overflow in world generation: {0}")]
    Overflow(&'static str),
}
