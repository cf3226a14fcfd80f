//! Per-pattern error kinds.
//!
//! Every variant describes something wrong with one input block. None of them
//! stops a batch: decode failures and detector rejections are recorded on the
//! block's [`Classification`](crate::Classification) and processing moves on.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// The block has no `x = .., y = .., rule = B3/S23` header.
    #[error("no `rule = B3/S23` declaration")]
    MissingRuleDeclaration,

    /// A run count pushed the body past the coordinate or cell limit.
    #[error("run-length body exceeds the decoder's size limits")]
    OversizedPattern,

    /// The decoded coordinate list had odd length (multi-state data read as
    /// binary). Recovered by dropping the dangling value.
    #[error("odd-length coordinate list ({len} values); dangling value ignored")]
    MalformedCoordinateParity { len: usize },

    /// Every cell died.
    #[error("dies out completely at generation {generation}")]
    Extinct { generation: u64 },

    /// The pattern never returned to its starting cell set.
    #[error("no return to the starting cells within {generations} generations")]
    GenerationLimitExceeded { generations: u64 },
}

impl CatalogError {
    /// Short, stable identifier used in reports.
    pub fn kind(&self) -> &'static str {
        match self {
            CatalogError::MissingRuleDeclaration => "missing-rule-declaration",
            CatalogError::OversizedPattern => "oversized-pattern",
            CatalogError::MalformedCoordinateParity { .. } => "malformed-coordinate-parity",
            CatalogError::Extinct { .. } => "extinct",
            CatalogError::GenerationLimitExceeded { .. } => "generation-limit-exceeded",
        }
    }
}
