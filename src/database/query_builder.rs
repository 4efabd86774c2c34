use serde_json::Value;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::{Query, QueryAs};
use sqlx::{FromRow, PgPool, Postgres, Row};

use crate::database::manager::DatabaseError;
use crate::filter::types::SqlResult;
use crate::filter::{Filter, FilterData, FilterError};

impl From<FilterError> for DatabaseError {
    fn from(err: FilterError) -> Self {
        DatabaseError::QueryError(err.to_string())
    }
}

/// Runs the SQL produced by a `Filter`, binding its parameters in order
pub struct QueryBuilder<T> {
    filter: Filter,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> QueryBuilder<T>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    pub fn new(table_name: &str) -> Result<Self, DatabaseError> {
        Ok(Self {
            filter: Filter::new(table_name)?,
            _phantom: std::marker::PhantomData,
        })
    }

    pub fn filter(mut self, filter_data: FilterData) -> Result<Self, DatabaseError> {
        self.filter.assign(filter_data)?;
        Ok(self)
    }

    pub async fn select_all(self, pool: &PgPool) -> Result<Vec<T>, DatabaseError> {
        let sql = self.filter.to_sql()?;
        let rows = bind_all_as::<T>(&sql).fetch_all(pool).await?;
        Ok(rows)
    }

    pub async fn select_optional(self, pool: &PgPool) -> Result<Option<T>, DatabaseError> {
        let sql = self.filter.to_sql()?;
        let row = bind_all_as::<T>(&sql).fetch_optional(pool).await?;
        Ok(row)
    }

    pub async fn count(self, pool: &PgPool) -> Result<i64, DatabaseError> {
        let sql = self.filter.to_count_sql()?;
        let row = bind_all(&sql).fetch_one(pool).await?;
        Ok(row.try_get("count")?)
    }

    pub async fn exists(self, pool: &PgPool) -> Result<bool, DatabaseError> {
        let sql = self.filter.to_exists_sql()?;
        let row = bind_all(&sql).fetch_one(pool).await?;
        Ok(row.try_get("found")?)
    }

    pub async fn delete(self, pool: &PgPool) -> Result<u64, DatabaseError> {
        let sql = self.filter.to_delete_sql()?;
        let result = bind_all(&sql).execute(pool).await?;
        Ok(result.rows_affected())
    }
}

fn bind_all(sql: &SqlResult) -> Query<'_, Postgres, PgArguments> {
    sql.params
        .iter()
        .fold(sqlx::query(&sql.query), |q, p| match p {
            Value::Null => q.bind(None::<String>),
            Value::Bool(b) => q.bind(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => q.bind(i),
                None => q.bind(n.as_f64()),
            },
            Value::String(s) => q.bind(s.as_str()),
            // FilterWhere only emits scalars
            other => q.bind(other.to_string()),
        })
}

fn bind_all_as<T>(sql: &SqlResult) -> QueryAs<'_, Postgres, T, PgArguments>
where
    T: for<'r> FromRow<'r, PgRow>,
{
    sql.params
        .iter()
        .fold(sqlx::query_as::<_, T>(&sql.query), |q, p| match p {
            Value::Null => q.bind(None::<String>),
            Value::Bool(b) => q.bind(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => q.bind(i),
                None => q.bind(n.as_f64()),
            },
            Value::String(s) => q.bind(s.as_str()),
            other => q.bind(other.to_string()),
        })
}
