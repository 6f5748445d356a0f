//! Parts table accessed directly over a PostgreSQL connection pool.

use crate::domain::part::{Part, PartRow, PartType};
use crate::storage::remote::{ColumnValue, PartTable, Predicate, RemoteError, SelectQuery};
use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

const COLUMNS: &str =
    "id::text AS id, part_type, car_brand, car_model, car_year, stock_number, image_url, created_at, updated_at";

#[derive(Clone)]
pub struct PgPartTable {
    pool: PgPool,
    table: String,
}

/// Table names are interpolated into SQL, so only plain identifiers are accepted.
pub fn validate_ident(ident: &str) -> bool {
    let mut chars = ident.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn remote_error(e: sqlx::Error) -> RemoteError {
    match &e {
        sqlx::Error::Database(db) => match db.code() {
            Some(code) => RemoteError::with_code(code.to_string(), db.message()),
            None => RemoteError::new(db.message()),
        },
        _ => RemoteError::new(e.to_string()),
    }
}

/// Escapes `%`, `_` and `\` so user text is matched literally inside `ILIKE`.
fn escape_like(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn part_from_row(row: &PgRow) -> Result<Part, RemoteError> {
    let part_type: String = row.try_get("part_type").map_err(remote_error)?;
    Ok(Part {
        id: row.try_get("id").map_err(remote_error)?,
        part_type: part_type
            .parse::<PartType>()
            .map_err(|e| RemoteError::new(e.to_string()))?,
        car_brand: row.try_get("car_brand").map_err(remote_error)?,
        car_model: row.try_get("car_model").map_err(remote_error)?,
        car_year: row.try_get("car_year").map_err(remote_error)?,
        stock_number: row.try_get("stock_number").map_err(remote_error)?,
        image_url: row.try_get("image_url").map_err(remote_error)?,
        created_at: row.try_get("created_at").map_err(remote_error)?,
        updated_at: row.try_get("updated_at").map_err(remote_error)?,
    })
}

impl PgPartTable {
    /// Connects and makes sure the parts table exists.
    pub async fn connect(database_url: &str, table: &str) -> anyhow::Result<Self> {
        if !validate_ident(table) {
            return Err(anyhow::anyhow!("Invalid table name '{}'", table));
        }
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        let store = Self {
            pool,
            table: table.to_string(),
        };
        store.ensure_schema().await?;
        Ok(store)
    }

    async fn ensure_schema(&self) -> anyhow::Result<()> {
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                part_type TEXT NOT NULL CHECK (part_type IN ('dash_kit', 'wiring_harness', 'headlight')),
                car_brand TEXT NOT NULL,
                car_model TEXT NOT NULL,
                car_year INTEGER NOT NULL,
                stock_number TEXT NOT NULL UNIQUE,
                image_url TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )",
            self.table
        );
        sqlx::query(&sql).execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl PartTable for PgPartTable {
    async fn select(&self, query: &SelectQuery) -> Result<Vec<Part>, RemoteError> {
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {} FROM {} WHERE TRUE", COLUMNS, self.table));
        for predicate in &query.predicates {
            match predicate {
                Predicate::Eq(column, ColumnValue::Int(n)) => {
                    qb.push(format!(" AND {} = ", column.as_str()));
                    qb.push_bind(*n);
                }
                Predicate::Eq(column, ColumnValue::Text(s)) => {
                    qb.push(format!(" AND {}::text = ", column.as_str()));
                    qb.push_bind(s.clone());
                }
                Predicate::ILike(column, needle) => {
                    qb.push(format!(" AND {}::text ILIKE ", column.as_str()));
                    qb.push_bind(format!("%{}%", escape_like(needle)));
                }
            }
        }
        if let Some(order) = query.order {
            qb.push(format!(
                " ORDER BY {} {}",
                order.column.as_str(),
                if order.ascending { "ASC" } else { "DESC" }
            ));
        }
        let rows = qb
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(remote_error)?;
        rows.iter().map(part_from_row).collect()
    }

    async fn insert(&self, row: &PartRow) -> Result<Part, RemoteError> {
        let sql = format!(
            "INSERT INTO {} (part_type, car_brand, car_model, car_year, stock_number, image_url)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {}",
            self.table, COLUMNS
        );
        let inserted = sqlx::query(&sql)
            .bind(row.input.part_type.as_str())
            .bind(&row.input.car_brand)
            .bind(&row.input.car_model)
            .bind(row.input.car_year)
            .bind(&row.input.stock_number)
            .bind(row.image_url.as_deref())
            .fetch_one(&self.pool)
            .await
            .map_err(remote_error)?;
        part_from_row(&inserted)
    }

    async fn update(&self, id: &str, row: &PartRow) -> Result<Option<Part>, RemoteError> {
        let sql = format!(
            "UPDATE {} SET part_type = $1, car_brand = $2, car_model = $3, car_year = $4,
                 stock_number = $5, image_url = COALESCE($6, image_url), updated_at = now()
             WHERE id::text = $7
             RETURNING {}",
            self.table, COLUMNS
        );
        let updated = sqlx::query(&sql)
            .bind(row.input.part_type.as_str())
            .bind(&row.input.car_brand)
            .bind(&row.input.car_model)
            .bind(row.input.car_year)
            .bind(&row.input.stock_number)
            .bind(row.image_url.as_deref())
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(remote_error)?;
        updated.as_ref().map(part_from_row).transpose()
    }

    async fn delete(&self, id: &str) -> Result<(), RemoteError> {
        let sql = format!("DELETE FROM {} WHERE id::text = $1", self.table);
        sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(remote_error)?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), RemoteError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(remote_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("Toy"), "Toy");
    }

    #[test]
    fn table_names_must_be_identifiers() {
        assert!(validate_ident("car_parts"));
        assert!(!validate_ident("car_parts; DROP TABLE x"));
        assert!(!validate_ident("1parts"));
    }
}
