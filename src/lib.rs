//! Algebraic map/reduce rewriting of single-node SQL `SELECT` statements.
//!
//! Given a typed `SELECT` AST, [`split`] produces a map query to run on
//! each data-bearing node and a reduce query to run on a coordinator over
//! the merged map results, decomposing `AVG`/`SUM`/`MIN`/`MAX`/`COUNT`
//! aggregates and rehoming `GROUP BY`/`HAVING`/`ORDER BY`/`LIMIT`/`OFFSET`/
//! `DISTINCT` so the reduce query can run against the map output alone.
//!
//! Parsing SQL text into the AST, rendering a dialect's own SQL back out,
//! and shipping the map query to nodes are all someone else's job; this
//! crate owns the rewrite and a reference renderer, nothing else.

pub mod assembler;
pub mod ast;
pub mod builder;
pub mod error;
pub mod factories;
pub mod naming;
pub mod render;
mod splitter;

pub use assembler::{MapEntry, SplitArtifact};
pub use ast::{
    AggKind, BinaryOpKind, ColumnRef, Expr, FunctionKind, Having, Literal, NullsOrder, OrderByItem, Select,
    SortDirection, SortSpec, Table,
};
pub use builder::SelectBuilder;
pub use error::{SplitError, SplitResult};
pub use splitter::split;
