//! Orchestrates a single `SELECT` into a map query and a reduce query.

mod expr;

use crate::assembler::{MapEntry, SplitArtifact};
use crate::ast::{Expr, Having, Select};
use crate::error::{SplitError, SplitResult};
use crate::factories;
use crate::naming;
use crate::render::render_select;

/// Split `select` into a map/reduce pair, packaging the result alongside
/// `params` (passed through untouched — this crate never interprets bind
/// parameters).
///
/// A single (non-nested) split always targets merge table `__T0`.
pub fn split<P: Clone>(select: &Select, params: Vec<P>) -> SplitResult<SplitArtifact<P>> {
    let merge_table = naming::table_name(0);
    let select_size = select.select_size();

    log::debug!(
        target: "sql_splitter",
        "splitting select: {} user-visible projection(s), {} helper slot(s)",
        select_size,
        select.extra.len()
    );

    let mut map_exps: Vec<Expr> = select.all_expressions().into_iter().cloned().collect();
    let frozen_len = map_exps.len();
    let mut reduce_slots: Vec<Option<Expr>> = vec![None; frozen_len];

    for idx in 0..frozen_len {
        expr::split_select_expression(&mut map_exps, &mut reduce_slots, idx)?;
    }

    let mut reduce_projections = Vec::with_capacity(select_size);
    for idx in 0..select_size {
        let slot = reduce_slots[idx].clone().ok_or_else(|| {
            SplitError::InvariantViolated(format!("projection {idx} produced no reduce-side expression"))
        })?;
        reduce_projections.push(slot);
    }

    let map_select = Select {
        projections: map_exps,
        extra: vec![],
        from: select.from.clone(),
        filter: select.filter.clone(),
        group_by: select.group_by.clone(),
        having: None,
        order_by: vec![],
        limit: None,
        offset: None,
        distinct: false,
    };

    let mut reduce_select = Select {
        projections: reduce_projections,
        extra: vec![],
        from: factories::table(merge_table.clone()),
        filter: None,
        group_by: select.group_by.clone(),
        having: None,
        order_by: select.order_by.clone(),
        limit: select.limit.clone(),
        offset: select.offset.clone(),
        distinct: select.distinct,
    };

    if let Some(having) = &select.having {
        reduce_select.filter = Some(rewrite_having(select, having, &reduce_slots)?);
        log::debug!(target: "sql_splitter", "folded HAVING into reduce-side WHERE");
    }

    let map_sql = render_select(&map_select);
    let reduce_sql = render_select(&reduce_select);

    Ok(SplitArtifact {
        reduce_sql,
        map_entries: vec![MapEntry {
            merge_table,
            map_sql,
            params,
        }],
    })
}

/// Rebuild the reduce-side `WHERE` conjunct contributed by a source
/// `HAVING`: the original predicate with its pre-split aggregate operand
/// (found verbatim at `having.column_index` in the source's
/// `all_expressions()`) replaced by the already-split reduce-side
/// expression for that same slot.
fn rewrite_having(select: &Select, having: &Having, reduce_slots: &[Option<Expr>]) -> SplitResult<Expr> {
    let original_operand = select
        .all_expressions()
        .get(having.column_index)
        .copied()
        .cloned()
        .ok_or_else(|| {
            SplitError::InvariantViolated(format!(
                "having.column_index {} out of range",
                having.column_index
            ))
        })?;

    let (_, unwrapped_operand) = original_operand.unwrap_alias();

    let split_operand = reduce_slots
        .get(having.column_index)
        .cloned()
        .flatten()
        .ok_or_else(|| {
            SplitError::InvariantViolated(format!(
                "having.column_index {} produced no reduce-side expression",
                having.column_index
            ))
        })?;
    let (_, unwrapped_split) = split_operand.unwrap_alias();

    Ok(replace_subexpr(&having.predicate, unwrapped_operand, unwrapped_split.clone()))
}

/// Structurally replace every occurrence of `needle` inside `tree` with
/// `replacement`. Used to rebuild a `HAVING` predicate around its
/// now-split aggregate operand without knowing which sub-position that
/// operand occupies.
fn replace_subexpr(tree: &Expr, needle: &Expr, replacement: Expr) -> Expr {
    if tree == needle {
        return replacement;
    }
    match tree {
        Expr::Alias(name, inner) => {
            Expr::Alias(name.clone(), Box::new(replace_subexpr(inner, needle, replacement)))
        }
        Expr::BinaryOp(kind, left, right) => Expr::BinaryOp(
            *kind,
            Box::new(replace_subexpr(left, needle, replacement.clone())),
            Box::new(replace_subexpr(right, needle, replacement)),
        ),
        Expr::Function(kind, args, cast_type) => Expr::Function(
            *kind,
            args.iter()
                .map(|a| replace_subexpr(a, needle, replacement.clone()))
                .collect(),
            cast_type.clone(),
        ),
        Expr::Aggregate { .. } | Expr::Column(_) | Expr::Literal(_) => tree.clone(),
    }
}
