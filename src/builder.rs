//! A fluent constructor for [`Select`], standing in for the parser
//! collaborator in tests and for callers that already hold a structured
//! query rather than SQL text.

use crate::ast::{Expr, Having, OrderByItem, Select, SortSpec, Table};

#[derive(Debug, Clone)]
pub struct SelectBuilder {
    select: Select,
}

impl SelectBuilder {
    pub fn from(table: Table) -> Self {
        SelectBuilder {
            select: Select {
                projections: vec![],
                extra: vec![],
                from: table,
                filter: None,
                group_by: vec![],
                having: None,
                order_by: vec![],
                limit: None,
                offset: None,
                distinct: false,
            },
        }
    }

    /// Append a projection, returning its index for use in `group_by`/`order_by`.
    pub fn project(mut self, expr: Expr) -> (Self, usize) {
        self.select.projections.push(expr);
        let index = self.select.projections.len() - 1;
        (self, index)
    }

    pub fn filter(mut self, predicate: Expr) -> Self {
        self.select.filter = Some(predicate);
        self
    }

    pub fn group_by(mut self, indices: Vec<usize>) -> Self {
        self.select.group_by = indices;
        self
    }

    pub fn order_by(mut self, column_index: usize, spec: SortSpec) -> Self {
        self.select.order_by.push(OrderByItem { column_index, spec });
        self
    }

    pub fn limit(mut self, expr: Expr) -> Self {
        self.select.limit = Some(expr);
        self
    }

    pub fn offset(mut self, expr: Expr) -> Self {
        self.select.offset = Some(expr);
        self
    }

    pub fn distinct(mut self) -> Self {
        self.select.distinct = true;
        self
    }

    /// `HAVING predicate`, where `predicate` contains `aggregate_operand`
    /// as a subexpression. Reuses an existing projection's slot when
    /// `aggregate_operand` is structurally identical to one (the operand
    /// is already user-visible, as in `HAVING COUNT(b) > 5` alongside a
    /// projected `COUNT(b) AS c`); otherwise appends a synthetic slot past
    /// the user-visible projections so the splitter still has something
    /// to decompose.
    pub fn having(mut self, predicate: Expr, aggregate_operand: Expr) -> Self {
        let reused = self
            .select
            .projections
            .iter()
            .position(|p| p.unwrap_alias().1 == &aggregate_operand);

        let column_index = match reused {
            Some(index) => index,
            None => {
                self.select.extra.push(aggregate_operand);
                self.select.all_expressions_len() - 1
            }
        };

        self.select.having = Some(Having {
            predicate,
            column_index,
        });
        self
    }

    pub fn build(self) -> Select {
        self.select
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AggKind, BinaryOpKind};
    use crate::factories;
    use pretty_assertions::assert_eq;

    #[test]
    fn having_reuses_existing_projection() {
        let (b, _a_idx) = SelectBuilder::from(Table::bare("t")).project(factories::column("a"));
        let (b, c_idx) = b.project(factories::alias(
            "c",
            factories::aggregate(AggKind::Count, false, Some(factories::column("b"))),
        ));
        let select = b
            .having(
                factories::binary_op(
                    BinaryOpKind::Gt,
                    factories::aggregate(AggKind::Count, false, Some(factories::column("b"))),
                    factories::number("5"),
                ),
                factories::aggregate(AggKind::Count, false, Some(factories::column("b"))),
            )
            .build();

        assert_eq!(select.having.unwrap().column_index, c_idx);
    }

    #[test]
    fn having_appends_synthetic_slot_when_not_projected() {
        let (b, _a_idx) = SelectBuilder::from(Table::bare("t")).project(factories::column("a"));
        let select_size_before = b.select.select_size();
        let select = b
            .having(
                factories::binary_op(
                    BinaryOpKind::Gt,
                    factories::aggregate(AggKind::Count, false, Some(factories::column("b"))),
                    factories::number("5"),
                ),
                factories::aggregate(AggKind::Count, false, Some(factories::column("b"))),
            )
            .build();

        let having = select.having.unwrap();
        assert_eq!(having.column_index, select_size_before);
        assert_eq!(select.extra.len(), 1);
    }
}
