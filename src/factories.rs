//! Node constructors used by the splitter to synthesize AST fragments.
//!
//! Keeping allocation behind small functions here (rather than spelling
//! out variant literals at every call site) is what lets `splitter::expr`
//! read as a table of rewrite rules instead of AST plumbing.

use crate::ast::{AggKind, BinaryOpKind, ColumnRef, Expr, FunctionKind, Table};

pub fn column(name: impl Into<String>) -> Expr {
    Expr::Column(ColumnRef::bare(name))
}

pub fn alias(name: impl Into<String>, child: Expr) -> Expr {
    Expr::Alias(name.into(), Box::new(child))
}

pub fn binary_op(kind: BinaryOpKind, left: Expr, right: Expr) -> Expr {
    Expr::BinaryOp(kind, Box::new(left), Box::new(right))
}

pub fn cast(expr: Expr, target_type: impl Into<String>) -> Expr {
    Expr::Function(FunctionKind::Cast, vec![expr], Some(target_type.into()))
}

pub fn aggregate(kind: AggKind, distinct: bool, arg: Option<Expr>) -> Expr {
    Expr::Aggregate {
        kind,
        distinct,
        arg: arg.map(Box::new),
    }
}

pub fn count_star() -> Expr {
    aggregate(AggKind::CountAll, false, None)
}

pub fn table(name: impl Into<String>) -> Table {
    Table::bare(name)
}

pub fn number(literal: impl Into<String>) -> Expr {
    Expr::Literal(crate::ast::Literal::Number(literal.into()))
}
