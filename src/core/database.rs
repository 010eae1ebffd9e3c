use crate::core::config::DatabaseConfig;
use crate::shared::types::ListCursor;
use sqlx::{postgres::PgPoolOptions, PgPool, Postgres, QueryBuilder};
use std::time::Duration;

pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
        .connect(&config.url)
        .await?;

    tracing::info!(
        max_connections = config.max_connections,
        "Database connection pool created"
    );

    Ok(pool)
}

/// Applies pending migrations from `./migrations`
pub async fn migrate(pool: &PgPool) -> anyhow::Result<()> {
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
    tracing::info!("Database migrations completed successfully");
    Ok(())
}

/// Finishes a `SELECT ... WHERE deleted_at IS NULL ...` listing with the
/// cursor condition, ordering and paging.
///
/// `after`/`before` compare against the anchor row's `created_at`; an anchor
/// that does not exist yields no rows.
pub fn push_cursor(
    builder: &mut QueryBuilder<'_, Postgres>,
    table: &'static str,
    cursor: ListCursor,
    offset: i64,
    limit: i64,
) {
    match cursor {
        ListCursor::Since(at) => {
            builder
                .push(" AND updated_at > ")
                .push_bind(at)
                .push(" ORDER BY updated_at ASC, id");
        }
        ListCursor::After(anchor) => {
            builder
                .push(format!(
                    " AND created_at > (SELECT created_at FROM {table} WHERE id = "
                ))
                .push_bind(anchor)
                .push(") ORDER BY created_at DESC, id");
        }
        ListCursor::Before(anchor) => {
            builder
                .push(format!(
                    " AND created_at < (SELECT created_at FROM {table} WHERE id = "
                ))
                .push_bind(anchor)
                .push(") ORDER BY created_at DESC, id");
        }
        ListCursor::Page => {
            builder.push(" ORDER BY created_at DESC, id");
        }
    }

    builder
        .push(" LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(offset);
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn build(cursor: ListCursor) -> String {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT id FROM promos WHERE deleted_at IS NULL");
        push_cursor(&mut builder, "promos", cursor, 20, 10);
        builder.sql().to_string()
    }

    #[test]
    fn test_page_orders_newest_first() {
        assert_eq!(
            build(ListCursor::Page),
            "SELECT id FROM promos WHERE deleted_at IS NULL ORDER BY created_at DESC, id LIMIT $1 OFFSET $2"
        );
    }

    #[test]
    fn test_after_compares_with_anchor() {
        let sql = build(ListCursor::After(Uuid::new_v4()));
        assert!(sql.contains("created_at > (SELECT created_at FROM promos WHERE id = $1)"));
        assert!(sql.ends_with("LIMIT $2 OFFSET $3"));
    }

    #[test]
    fn test_since_orders_by_update() {
        let sql = build(ListCursor::Since(chrono::Utc::now()));
        assert!(sql.contains("updated_at > $1 ORDER BY updated_at ASC"));
    }
}
