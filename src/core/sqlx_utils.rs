use chrono::{DateTime, FixedOffset};
use sqlx::{
    postgres::{PgArguments, PgRow},
    query::QueryAs,
    Postgres,
};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq)]
pub enum SqlxBinds {
    String(String),
    Bool(bool),
    Uuid(Uuid),
    DateTimeFixedOffset(DateTime<FixedOffset>),
}

pub fn binds_query_as<'a, T: for<'r> sqlx::FromRow<'r, PgRow>>(
    stmt: &'a str,
    binds: Vec<SqlxBinds>,
) -> QueryAs<'a, Postgres, T, PgArguments> {
    let mut q: QueryAs<'_, Postgres, T, PgArguments> = sqlx::query_as(stmt);
    for bind in binds.into_iter() {
        q = match bind {
            SqlxBinds::String(val) => q.bind(val),
            SqlxBinds::Bool(val) => q.bind(val),
            SqlxBinds::Uuid(val) => q.bind(val),
            SqlxBinds::DateTimeFixedOffset(val) => q.bind(val),
        };
    }
    q
}

/// Accumulates `WHERE` conditions together with their positional binds so
/// that `$n` placeholders always line up with the bind order.
#[derive(Debug, Default)]
pub struct WhereBuilder {
    pub filters: Vec<String>,
    pub binds: Vec<SqlxBinds>,
}

impl WhereBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a condition where `{}` is replaced with the placeholder of `bind`.
    pub fn push(&mut self, condition: &str, bind: SqlxBinds) {
        self.binds.push(bind);
        let placeholder = format!("${}", self.binds.len());
        self.filters.push(condition.replace("{}", &placeholder));
    }
}

pub fn query_builder(table_name: &str, wheres: &[String]) -> String {
    let mut stmt = format!("SELECT * FROM {}", table_name);
    if !wheres.is_empty() {
        stmt.push_str(&format!(" WHERE {}", wheres.join(" AND ")));
    }
    stmt
}
