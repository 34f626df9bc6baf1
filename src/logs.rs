use sqlx::PgPool;

/// Write-only audit trail. The application only ever inserts here; rows are
/// read with external tooling.
pub struct LogEntry;

impl LogEntry {
    pub async fn create(
        db: &PgPool,
        level: &str,
        message: &str,
        stack: Option<&str>,
        meta: Option<serde_json::Value>,
    ) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO logs (level, message, stack, meta)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(level)
        .bind(message)
        .bind(stack)
        .bind(meta)
        .execute(db)
        .await?;
        Ok(())
    }
}
