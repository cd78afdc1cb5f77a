//! Read-only introspection of the retail tables.
//!
//! Callers that issue statements against the schema from outside this crate
//! can use [`table_columns`] to confirm the column contract they depend on.

use sea_orm::{ConnectionTrait, DbBackend, Statement};
use serde::Serialize;
use tracing::debug;

use crate::db::DbPool;
use crate::errors::AppError;

/// Retail tables in creation order (referenced tables first).
pub const TABLES: [&str; 5] = ["products", "sellers", "sales", "returns", "payments"];

/// One column as reported by the backend's catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
    pub not_null: bool,
    pub default_value: Option<String>,
    pub primary_key: bool,
}

/// Lists the columns of `table` in declaration order.
pub async fn table_columns(db: &DbPool, table: &str) -> Result<Vec<ColumnInfo>, AppError> {
    if !TABLES.contains(&table) {
        return Err(AppError::InvalidInput(format!("unknown table '{}'", table)));
    }

    let backend = db.get_database_backend();
    let columns = match backend {
        DbBackend::Sqlite => {
            // PRAGMA arguments cannot be bound; the name is checked against TABLES above.
            let rows = db
                .query_all(Statement::from_string(
                    backend,
                    format!("PRAGMA table_info({})", table),
                ))
                .await?;

            rows.iter()
                .map(|row| -> Result<ColumnInfo, AppError> {
                    Ok(ColumnInfo {
                        name: row.try_get("", "name")?,
                        data_type: row.try_get("", "type")?,
                        not_null: row.try_get::<i64>("", "notnull")? != 0,
                        default_value: row.try_get("", "dflt_value")?,
                        primary_key: row.try_get::<i64>("", "pk")? != 0,
                    })
                })
                .collect::<Result<Vec<_>, AppError>>()?
        }
        DbBackend::Postgres => {
            let rows = db
                .query_all(Statement::from_sql_and_values(
                    backend,
                    r#"SELECT c.column_name::text AS name,
                              c.data_type::text AS data_type,
                              c.is_nullable::text AS is_nullable,
                              c.column_default::text AS column_default,
                              EXISTS (
                                  SELECT 1
                                    FROM information_schema.table_constraints tc
                                    JOIN information_schema.key_column_usage k
                                      ON tc.constraint_name = k.constraint_name
                                   WHERE tc.table_name = c.table_name
                                     AND tc.constraint_type = 'PRIMARY KEY'
                                     AND k.column_name = c.column_name
                              ) AS primary_key
                         FROM information_schema.columns c
                        WHERE c.table_name = $1
                        ORDER BY c.ordinal_position"#,
                    [table.into()],
                ))
                .await?;

            rows.iter()
                .map(|row| -> Result<ColumnInfo, AppError> {
                    Ok(ColumnInfo {
                        name: row.try_get("", "name")?,
                        data_type: row.try_get("", "data_type")?,
                        not_null: row.try_get::<String>("", "is_nullable")? == "NO",
                        default_value: row.try_get("", "column_default")?,
                        primary_key: row.try_get("", "primary_key")?,
                    })
                })
                .collect::<Result<Vec<_>, AppError>>()?
        }
        other => {
            return Err(AppError::InternalError(format!(
                "schema introspection is not supported for {:?}",
                other
            )))
        }
    };

    debug!(table, columns = columns.len(), "Introspected table");
    Ok(columns)
}

/// Confirms that every retail table exists.
pub async fn verify_schema(db: &DbPool) -> Result<(), AppError> {
    let mut missing = Vec::new();
    for table in TABLES {
        if table_columns(db, table).await?.is_empty() {
            missing.push(table);
        }
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::MigrationError(format!(
            "missing tables: {}",
            missing.join(", ")
        )))
    }
}
