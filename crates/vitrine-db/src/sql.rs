//! Compiles [`Filter`] trees into a Postgres `WHERE` fragment over the
//! `documents.doc` JSONB column.

use sqlx::{types::Json, Postgres, QueryBuilder};

use crate::Filter;

/// Appends the SQL form of `filter` to `qb`. Every value, field names
/// included, is bound as a parameter.
pub(crate) fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &Filter) {
    match filter {
        Filter::All => {
            qb.push("TRUE");
        }
        Filter::Never => {
            qb.push("FALSE");
        }
        Filter::Eq { field, value } => {
            qb.push("(doc -> ");
            qb.push_bind(field.clone());
            qb.push(") = ");
            qb.push_bind(Json(value.clone()));
        }
        Filter::EqIgnoreCase { field, value } => {
            qb.push("lower(doc ->> ");
            qb.push_bind(field.clone());
            qb.push(") = ");
            qb.push_bind(value.to_lowercase());
        }
        Filter::Prefix { field, value } => {
            qb.push("(doc ->> ");
            qb.push_bind(field.clone());
            qb.push(") ILIKE ");
            qb.push_bind(format!("{}%", escape_like(value)));
        }
        Filter::Contains { field, value } => {
            qb.push("(doc ->> ");
            qb.push_bind(field.clone());
            qb.push(") ILIKE ");
            qb.push_bind(format!("%{}%", escape_like(value)));
        }
        Filter::GreaterThan { field, value } => {
            qb.push("CASE WHEN jsonb_typeof(doc -> ");
            qb.push_bind(field.clone());
            qb.push(") = 'number' THEN (doc ->> ");
            qb.push_bind(field.clone());
            qb.push(")::numeric > ");
            qb.push_bind(*value);
            qb.push(" ELSE FALSE END");
        }
        Filter::IdEq(id) => {
            qb.push("id = ");
            qb.push_bind(id.as_uuid());
        }
        Filter::Not(inner) => {
            qb.push("NOT COALESCE((");
            push_filter(qb, inner);
            qb.push("), FALSE)");
        }
        Filter::And(clauses) => push_joined(qb, clauses, " AND ", "TRUE"),
        Filter::Or(clauses) => push_joined(qb, clauses, " OR ", "FALSE"),
    }
}

fn push_joined(
    qb: &mut QueryBuilder<'_, Postgres>,
    clauses: &[Filter],
    separator: &str,
    empty: &str,
) {
    if clauses.is_empty() {
        qb.push(empty);
        return;
    }
    qb.push("(");
    for (i, clause) in clauses.iter().enumerate() {
        if i > 0 {
            qb.push(separator);
        }
        qb.push("(");
        push_filter(qb, clause);
        qb.push(")");
    }
    qb.push(")");
}

/// Escapes `LIKE` metacharacters so user input matches literally.
fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}
