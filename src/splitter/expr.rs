//! Per-slot rewrite: turn one source projection into a map-side expression
//! and its reduce-side equivalent.
//!
//! `reduce_slots` is sized to the frozen pre-split length of `map_list`
//! (every slot gets an entry, including clause-only helper slots past the
//! user-visible projections) — it is up to the caller to decide which
//! entries become actual reduce-query projections versus which are only
//! consulted to rewrite a `HAVING` predicate.

use crate::ast::{AggKind, BinaryOpKind, Expr};
use crate::error::{SplitError, SplitResult};
use crate::factories;
use crate::naming;

/// Rewrite `map_list[idx]` in place and record its reduce-side equivalent
/// in `reduce_slots[idx]`.
///
/// `map_list` is grown in place by the `AVG` case, which appends a second
/// map column past the frozen iteration bound the caller is using; slots
/// appended this way are plain `COUNT` aggregates and must not be
/// re-visited by a later call with their own index.
pub fn split_select_expression(
    map_list: &mut Vec<Expr>,
    reduce_slots: &mut [Option<Expr>],
    idx: usize,
) -> SplitResult<()> {
    let item = map_list[idx].clone();
    let (user_alias, inner) = item.unwrap_alias();
    let user_alias = user_alias.map(str::to_string);
    let inner = inner.clone();

    if !inner.is_aggregate() {
        split_pass_through(map_list, reduce_slots, idx, user_alias, inner);
        log::trace!(target: "sql_splitter", "slot {idx}: pass-through");
        return Ok(());
    }

    let Expr::Aggregate { kind, distinct, arg } = inner else {
        unreachable!("is_aggregate() guarantees the Aggregate variant");
    };

    log::debug!(target: "sql_splitter", "slot {idx}: decomposing {kind} aggregate");

    match kind {
        AggKind::Sum | AggKind::Min | AggKind::Max => {
            let arg = require_arg(kind, idx, arg)?;
            split_algebraic(map_list, reduce_slots, idx, kind, distinct, arg, user_alias);
        }
        AggKind::Count => {
            let arg = require_arg(kind, idx, arg)?;
            split_count(map_list, reduce_slots, idx, distinct, arg, user_alias);
        }
        AggKind::CountAll => split_count_all(map_list, reduce_slots, idx, user_alias),
        AggKind::Avg => {
            let arg = require_arg(kind, idx, arg)?;
            split_avg(map_list, reduce_slots, idx, distinct, arg, user_alias);
        }
    }

    Ok(())
}

/// Every `AggKind` but `CountAll` carries a required argument (`Expr::Aggregate.arg`
/// is `Option` only because `COUNT(*)` has none). A caller building an
/// `Aggregate` node by hand — e.g. via `factories::aggregate` — can still
/// construct `SUM`/`MIN`/`MAX`/`COUNT`/`AVG` with no argument, so this is
/// checked here rather than assumed.
fn require_arg(kind: AggKind, idx: usize, arg: Option<Box<Expr>>) -> SplitResult<Box<Expr>> {
    arg.ok_or_else(|| {
        SplitError::InvariantViolated(format!(
            "{kind} at projection {idx} has no argument to decompose"
        ))
    })
}

fn chosen_alias(idx: usize, user_alias: &Option<String>, inner: &Expr) -> String {
    if let Some(a) = user_alias {
        return a.clone();
    }
    if let Expr::Column(c) = inner {
        return c.name.clone();
    }
    naming::column_alias(idx)
}

fn split_pass_through(
    map_list: &mut [Expr],
    reduce_slots: &mut [Option<Expr>],
    idx: usize,
    user_alias: Option<String>,
    inner: Expr,
) {
    let name = chosen_alias(idx, &user_alias, &inner);
    map_list[idx] = factories::alias(name.clone(), inner);
    reduce_slots[idx] = Some(factories::column(name));
}

fn wrap_user_alias(expr: Expr, user_alias: Option<String>) -> Expr {
    match user_alias {
        Some(name) => factories::alias(name, expr),
        None => expr,
    }
}

fn split_algebraic(
    map_list: &mut [Expr],
    reduce_slots: &mut [Option<Expr>],
    idx: usize,
    kind: AggKind,
    distinct: bool,
    arg: Box<Expr>,
    user_alias: Option<String>,
) {
    let m = naming::column_alias(idx);
    map_list[idx] = factories::alias(m.clone(), factories::aggregate(kind, distinct, Some(*arg)));
    let reduce_expr = factories::aggregate(kind, distinct, Some(factories::column(m)));
    reduce_slots[idx] = Some(wrap_user_alias(reduce_expr, user_alias));
}

const COUNT_CAST_TYPE: &str = "BIGINT";

fn split_count(
    map_list: &mut [Expr],
    reduce_slots: &mut [Option<Expr>],
    idx: usize,
    distinct: bool,
    arg: Box<Expr>,
    user_alias: Option<String>,
) {
    let m = naming::column_alias(idx);
    map_list[idx] = factories::alias(
        m.clone(),
        factories::aggregate(AggKind::Count, distinct, Some(*arg)),
    );
    let reduce_expr = factories::cast(
        factories::aggregate(AggKind::Sum, false, Some(factories::column(m))),
        COUNT_CAST_TYPE,
    );
    reduce_slots[idx] = Some(wrap_user_alias(reduce_expr, user_alias));
}

fn split_count_all(
    map_list: &mut [Expr],
    reduce_slots: &mut [Option<Expr>],
    idx: usize,
    user_alias: Option<String>,
) {
    let m = naming::column_alias(idx);
    map_list[idx] = factories::alias(m.clone(), factories::count_star());
    let reduce_expr = factories::cast(
        factories::aggregate(AggKind::Sum, false, Some(factories::column(m))),
        COUNT_CAST_TYPE,
    );
    reduce_slots[idx] = Some(wrap_user_alias(reduce_expr, user_alias));
}

fn split_avg(
    map_list: &mut Vec<Expr>,
    reduce_slots: &mut [Option<Expr>],
    idx: usize,
    distinct: bool,
    arg: Box<Expr>,
    user_alias: Option<String>,
) {
    let arg_expr = *arg;

    let m = naming::column_alias(idx);
    map_list[idx] = factories::alias(
        m.clone(),
        factories::aggregate(
            AggKind::Avg,
            distinct,
            Some(factories::cast(arg_expr.clone(), "DOUBLE")),
        ),
    );

    // The count column is appended past the frozen iteration bound; its
    // alias must be computed from the list length *after* idx was
    // rewritten, which is safe because map indices only ever grow.
    let c = naming::column_alias(map_list.len());
    map_list.push(factories::alias(
        c.clone(),
        factories::aggregate(AggKind::Count, distinct, Some(arg_expr)),
    ));

    let reduce_expr = factories::binary_op(
        BinaryOpKind::Divide,
        factories::aggregate(
            AggKind::Sum,
            false,
            Some(factories::binary_op(
                BinaryOpKind::Multiply,
                factories::column(m),
                factories::column(c.clone()),
            )),
        ),
        factories::aggregate(AggKind::Sum, false, Some(factories::column(c))),
    );

    reduce_slots[idx] = Some(wrap_user_alias(reduce_expr, user_alias));
}
