//! Canonical SQL text rendering for the closed AST.
//!
//! Rather than hand-roll operator precedence and identifier quoting, this
//! builds an equivalent `sqlparser::ast` tree and delegates to its
//! `Display` impl — the same technique this codebase's distributed query
//! decomposition already uses (`swarm::aggregation::build_select` /
//! `build_query`).

use sqlparser::ast::{
    helpers::attached_token::AttachedToken, BinaryOperator, CastKind, DataType, Distinct, Expr as SqlExpr,
    Function as SqlFunction, FunctionArg, FunctionArgExpr, FunctionArgumentList, FunctionArguments,
    GroupByExpr, Ident, Offset, OffsetRows, ObjectName, OrderBy, OrderByExpr, Query, Select as SqlSelect,
    SelectItem, SetExpr, Statement, TableFactor, TableWithJoins, Value,
};
use sqlparser::tokenizer::{Span, Token, TokenWithSpan};

use crate::ast::{AggKind, BinaryOpKind, Expr, FunctionKind, Literal, NullsOrder, Select, SortDirection};

/// Render a [`Select`] to canonical SQL text.
pub fn render_select(select: &Select) -> String {
    let query = to_sqlparser_query(select);
    Statement::Query(Box::new(query)).to_string()
}

fn select_token() -> AttachedToken {
    AttachedToken(TokenWithSpan {
        token: Token::make_keyword("SELECT"),
        span: Span::empty(),
    })
}

fn to_sqlparser_query(select: &Select) -> Query {
    let projection = select
        .projections
        .iter()
        .map(to_select_item)
        .collect::<Vec<_>>();

    let group_by = if select.group_by.is_empty() {
        GroupByExpr::Expressions(vec![], vec![])
    } else {
        let exprs = select
            .group_by
            .iter()
            .map(|&i| to_sqlparser_expr(&group_by_reference(select, i)))
            .collect();
        GroupByExpr::Expressions(exprs, vec![])
    };

    let having = select.having.as_ref().map(|h| to_sqlparser_expr(&h.predicate));

    let sql_select = SqlSelect {
        select_token: select_token(),
        distinct: if select.distinct {
            Some(Distinct::Distinct)
        } else {
            None
        },
        top: None,
        top_before_distinct: false,
        projection,
        into: None,
        from: vec![table_with_joins(select)],
        lateral_views: vec![],
        prewhere: None,
        selection: select.filter.as_ref().map(to_sqlparser_expr),
        group_by,
        cluster_by: vec![],
        distribute_by: vec![],
        sort_by: vec![],
        having,
        named_window: vec![],
        qualify: None,
        window_before_qualify: false,
        value_table_mode: None,
        connect_by: None,
    };

    let order_by = if select.order_by.is_empty() {
        None
    } else {
        Some(OrderBy {
            exprs: select
                .order_by
                .iter()
                .map(|item| OrderByExpr {
                    expr: to_sqlparser_expr(&group_by_reference(select, item.column_index)),
                    asc: Some(item.spec.direction == SortDirection::Asc),
                    nulls_first: match item.spec.nulls {
                        NullsOrder::Default => None,
                        NullsOrder::First => Some(true),
                        NullsOrder::Last => Some(false),
                    },
                    with_fill: None,
                })
                .collect(),
            interpolate: None,
        })
    };

    Query {
        with: None,
        body: Box::new(SetExpr::Select(Box::new(sql_select))),
        order_by,
        limit: select.limit.as_ref().map(to_sqlparser_expr),
        limit_by: vec![],
        offset: select.offset.as_ref().map(|e| Offset {
            value: to_sqlparser_expr(e),
            rows: OffsetRows::None,
        }),
        fetch: None,
        locks: vec![],
        for_clause: None,
        settings: None,
        format_clause: None,
    }
}

/// `GROUP BY`/`ORDER BY` bind to a projection by index; the map and reduce
/// queries this crate builds always alias that projection, so the bound
/// expression is just a reference to that alias.
fn group_by_reference(select: &Select, index: usize) -> Expr {
    match &select.projections[index] {
        Expr::Alias(name, _) => Expr::Column(crate::ast::ColumnRef::bare(name.clone())),
        other => other.clone(),
    }
}

fn table_with_joins(select: &Select) -> TableWithJoins {
    TableWithJoins {
        relation: TableFactor::Table {
            name: object_name(&select.from.name),
            alias: None,
            args: None,
            with_hints: vec![],
            version: None,
            with_ordinality: false,
            partitions: vec![],
            json_path: None,
        },
        joins: vec![],
    }
}

fn object_name(name: &str) -> ObjectName {
    ObjectName(vec![Ident::new(name)])
}

fn to_select_item(expr: &Expr) -> SelectItem {
    match expr {
        Expr::Alias(name, inner) => SelectItem::ExprWithAlias {
            expr: to_sqlparser_expr(inner),
            alias: Ident::new(name),
        },
        other => SelectItem::UnnamedExpr(to_sqlparser_expr(other)),
    }
}

fn to_sqlparser_expr(expr: &Expr) -> SqlExpr {
    match expr {
        Expr::Column(col) => match &col.qualifier {
            Some(q) => SqlExpr::CompoundIdentifier(vec![Ident::new(q), Ident::new(&col.name)]),
            None => SqlExpr::Identifier(Ident::new(&col.name)),
        },
        Expr::Literal(lit) => SqlExpr::Value(to_sqlparser_value(lit)),
        Expr::Alias(_, inner) => to_sqlparser_expr(inner),
        Expr::BinaryOp(kind, left, right) => SqlExpr::BinaryOp {
            left: Box::new(to_sqlparser_expr(left)),
            op: to_binary_operator(*kind),
            right: Box::new(to_sqlparser_expr(right)),
        },
        Expr::Function(FunctionKind::Cast, args, cast_type) => {
            let target = cast_type.as_deref().unwrap_or("TEXT");
            SqlExpr::Cast {
                kind: CastKind::Cast,
                expr: Box::new(to_sqlparser_expr(&args[0])),
                data_type: DataType::Custom(object_name(target), vec![]),
                format: None,
            }
        }
        Expr::Aggregate { kind, distinct, arg } => SqlExpr::Function(to_sqlparser_function(*kind, *distinct, arg)),
    }
}

fn to_sqlparser_value(lit: &Literal) -> Value {
    match lit {
        Literal::Number(n) => Value::Number(n.clone(), false),
        Literal::String(s) => Value::SingleQuotedString(s.clone()),
        Literal::Boolean(b) => Value::Boolean(*b),
        Literal::Null => Value::Null,
    }
}

fn to_binary_operator(kind: BinaryOpKind) -> BinaryOperator {
    match kind {
        BinaryOpKind::Add => BinaryOperator::Plus,
        BinaryOpKind::Subtract => BinaryOperator::Minus,
        BinaryOpKind::Multiply => BinaryOperator::Multiply,
        BinaryOpKind::Divide => BinaryOperator::Divide,
        BinaryOpKind::And => BinaryOperator::And,
        BinaryOpKind::Or => BinaryOperator::Or,
        BinaryOpKind::Eq => BinaryOperator::Eq,
        BinaryOpKind::NotEq => BinaryOperator::NotEq,
        BinaryOpKind::Lt => BinaryOperator::Lt,
        BinaryOpKind::LtEq => BinaryOperator::LtEq,
        BinaryOpKind::Gt => BinaryOperator::Gt,
        BinaryOpKind::GtEq => BinaryOperator::GtEq,
    }
}

fn to_sqlparser_function(kind: AggKind, distinct: bool, arg: &Option<Box<Expr>>) -> SqlFunction {
    let args = match (kind, arg) {
        (AggKind::CountAll, _) => vec![FunctionArg::Unnamed(FunctionArgExpr::Wildcard)],
        (_, Some(a)) => vec![FunctionArg::Unnamed(FunctionArgExpr::Expr(to_sqlparser_expr(a)))],
        (_, None) => vec![],
    };

    SqlFunction {
        name: object_name(&kind.to_string()),
        uses_odbc_syntax: false,
        parameters: FunctionArguments::None,
        args: FunctionArguments::List(FunctionArgumentList {
            duplicate_treatment: if distinct {
                Some(sqlparser::ast::DuplicateTreatment::Distinct)
            } else {
                None
            },
            args,
            clauses: vec![],
        }),
        filter: None,
        null_treatment: None,
        over: None,
        within_group: vec![],
    }
}
