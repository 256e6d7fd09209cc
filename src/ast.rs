//! The closed SQL AST operated on by the splitter.
//!
//! This is a tagged-variant tree, not a class hierarchy: every node a query
//! can contain is a variant of [`Expr`], matched exhaustively wherever the
//! splitter needs to dispatch on node shape. There is deliberately no
//! `Box<dyn Expr>` escape hatch — anything the splitter must handle has to
//! be a variant here first.

use std::fmt;

/// A single AST node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Column(ColumnRef),
    Literal(Literal),
    /// `alias AS (child)`.
    Alias(String, Box<Expr>),
    BinaryOp(BinaryOpKind, Box<Expr>, Box<Expr>),
    /// A non-aggregate function call. Only `CAST` is modeled; everything
    /// else this crate needs to build is either a `Column` or an
    /// `Aggregate`.
    Function(FunctionKind, Vec<Expr>, Option<String>),
    Aggregate {
        kind: AggKind,
        distinct: bool,
        arg: Option<Box<Expr>>,
    },
}

impl Expr {
    pub fn is_aggregate(&self) -> bool {
        matches!(self, Expr::Aggregate { .. })
    }

    /// Strip a single layer of `Alias`, returning the alias name (if any)
    /// and the unwrapped expression.
    pub fn unwrap_alias(&self) -> (Option<&str>, &Expr) {
        match self {
            Expr::Alias(name, inner) => (Some(name.as_str()), inner.as_ref()),
            other => (None, other),
        }
    }

    /// `true` if this expression, or any of its children, is an aggregate.
    /// Used to enforce the non-nesting invariant on freshly built nodes.
    pub fn contains_aggregate(&self) -> bool {
        match self {
            Expr::Aggregate { .. } => true,
            Expr::Column(_) | Expr::Literal(_) => false,
            Expr::Alias(_, inner) => inner.contains_aggregate(),
            Expr::BinaryOp(_, l, r) => l.contains_aggregate() || r.contains_aggregate(),
            Expr::Function(_, args, _) => args.iter().any(Expr::contains_aggregate),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    pub qualifier: Option<String>,
    pub name: String,
}

impl ColumnRef {
    pub fn bare(name: impl Into<String>) -> Self {
        ColumnRef {
            qualifier: None,
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(String),
    String(String),
    Boolean(bool),
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOpKind {
    Add,
    Subtract,
    Multiply,
    Divide,
    And,
    Or,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

impl fmt::Display for BinaryOpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BinaryOpKind::Add => "+",
            BinaryOpKind::Subtract => "-",
            BinaryOpKind::Multiply => "*",
            BinaryOpKind::Divide => "/",
            BinaryOpKind::And => "AND",
            BinaryOpKind::Or => "OR",
            BinaryOpKind::Eq => "=",
            BinaryOpKind::NotEq => "<>",
            BinaryOpKind::Lt => "<",
            BinaryOpKind::LtEq => "<=",
            BinaryOpKind::Gt => ">",
            BinaryOpKind::GtEq => ">=",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    Cast,
}

/// The aggregate functions the splitter knows how to decompose.
///
/// `CountAll` is kept distinct from `Count` because `COUNT(*)` has no
/// argument and a different node-side rendering (`COUNT(*)`, never
/// `COUNT(*) DISTINCT`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggKind {
    Avg,
    Sum,
    Min,
    Max,
    Count,
    CountAll,
}

impl fmt::Display for AggKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AggKind::Avg => "AVG",
            AggKind::Sum => "SUM",
            AggKind::Min => "MIN",
            AggKind::Max => "MAX",
            AggKind::Count | AggKind::CountAll => "COUNT",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub schema: Option<String>,
    pub name: String,
}

impl Table {
    pub fn bare(name: impl Into<String>) -> Self {
        Table {
            schema: None,
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullsOrder {
    Default,
    First,
    Last,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub direction: SortDirection,
    pub nulls: NullsOrder,
}

/// A single `ORDER BY` entry, referencing a projection by index the way
/// the rest of the clause-binding machinery does.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderByItem {
    pub column_index: usize,
    pub spec: SortSpec,
}

/// `HAVING predicate`, where `column_index` names the slot in
/// [`Select::all_expressions`] holding the (pre-split) aggregate operand
/// that `predicate` tests. The slot is either an existing user-visible
/// projection (when the operand is structurally identical to one, as in
/// worked example 5) or a synthetic slot appended past
/// `Select::projections` (when the predicate's aggregate never appears in
/// the output list at all).
#[derive(Debug, Clone, PartialEq)]
pub struct Having {
    pub predicate: Expr,
    pub column_index: usize,
}

/// A single-table `SELECT`, the only statement shape this crate splits.
///
/// `projections` holds the user-visible output columns; `extra` holds
/// clause-only helper expressions appended past them (currently only a
/// `HAVING` aggregate with no corresponding projection). [`Select::all_expressions`]
/// is the concatenation of the two and is what the splitter iterates.
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub projections: Vec<Expr>,
    pub extra: Vec<Expr>,
    pub from: Table,
    pub filter: Option<Expr>,
    /// Indices into `projections` (grouping is never on a synthetic slot).
    pub group_by: Vec<usize>,
    pub having: Option<Having>,
    pub order_by: Vec<OrderByItem>,
    pub limit: Option<Expr>,
    pub offset: Option<Expr>,
    pub distinct: bool,
}

impl Select {
    /// Number of user-visible output columns.
    pub fn select_size(&self) -> usize {
        self.projections.len()
    }

    /// The full indexable expression list the splitter walks: user-visible
    /// projections followed by clause-only helper slots.
    pub fn all_expressions(&self) -> Vec<&Expr> {
        self.projections.iter().chain(self.extra.iter()).collect()
    }

    pub fn all_expressions_len(&self) -> usize {
        self.projections.len() + self.extra.len()
    }
}
