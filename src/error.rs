use thiserror::Error;

/// Everything that can keep `split` from producing a two-step artifact.
///
/// Every fallible operation in this crate returns `Result<T, SplitError>`;
/// there is no stringly-typed error path.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SplitError {
    /// An upstream collaborator (e.g. a text-SQL adapter on top of this
    /// crate's closed `AggKind`) named an aggregate function this crate
    /// has no decomposition rule for. `AggKind` itself is exhaustively
    /// matched everywhere internally, so this variant only ever originates
    /// at that wider boundary.
    #[error("aggregate {name} at projection {index} has no map/reduce decomposition")]
    UnsupportedAggregate { name: String, index: usize },

    /// A structural assumption about the input AST failed. These indicate
    /// a bug in the caller or the upstream parser, not bad SQL: the input
    /// was not well-formed per the contract in `Select`'s doc comment.
    #[error("invariant violated: {0}")]
    InvariantViolated(String),
}

pub type SplitResult<T> = Result<T, SplitError>;
