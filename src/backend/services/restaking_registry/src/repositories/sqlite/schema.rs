use tracing::info;

use super::Database;
use crate::utils::Result;

const CREATE_TABLES: [&str; 4] = [
    r#"
    CREATE TABLE IF NOT EXISTS restakers (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_address TEXT NOT NULL,
        amount_restaked REAL NOT NULL,
        validator_address TEXT NOT NULL,
        restaked_at DATETIME DEFAULT CURRENT_TIMESTAMP,
        created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
        UNIQUE(user_address, validator_address)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS validators (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        operator_id TEXT UNIQUE NOT NULL,
        operator_address TEXT UNIQUE NOT NULL,
        total_delegated_stake REAL DEFAULT 0,
        status TEXT DEFAULT 'active',
        commission_rate REAL DEFAULT 0.05,
        name TEXT,
        description TEXT,
        logo TEXT,
        website TEXT,
        created_at DATETIME DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS slash_events (
        id TEXT PRIMARY KEY,
        validator_operator_id TEXT NOT NULL,
        slashed_at DATETIME NOT NULL,
        amount_slashed REAL NOT NULL,
        reason TEXT,
        block_number INTEGER,
        transaction_hash TEXT,
        created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
        FOREIGN KEY (validator_operator_id) REFERENCES validators (operator_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS rewards (
        id TEXT PRIMARY KEY,
        user_address TEXT NOT NULL,
        validator_address TEXT NOT NULL,
        amount REAL NOT NULL,
        received_at DATETIME NOT NULL,
        transaction_hash TEXT,
        block_number INTEGER,
        created_at DATETIME DEFAULT CURRENT_TIMESTAMP
    )
    "#,
];

const CREATE_INDEXES: [&str; 9] = [
    "CREATE INDEX IF NOT EXISTS idx_restakers_user_address ON restakers(user_address)",
    "CREATE INDEX IF NOT EXISTS idx_restakers_validator_address ON restakers(validator_address)",
    "CREATE INDEX IF NOT EXISTS idx_restakers_amount ON restakers(amount_restaked)",
    "CREATE INDEX IF NOT EXISTS idx_validators_status ON validators(status)",
    "CREATE INDEX IF NOT EXISTS idx_validators_stake ON validators(total_delegated_stake)",
    "CREATE INDEX IF NOT EXISTS idx_rewards_user_address ON rewards(user_address)",
    "CREATE INDEX IF NOT EXISTS idx_rewards_validator_address ON rewards(validator_address)",
    "CREATE INDEX IF NOT EXISTS idx_rewards_received_at ON rewards(received_at)",
    "CREATE INDEX IF NOT EXISTS idx_slash_events_validator ON slash_events(validator_operator_id)",
];

/// Creates every table and index. Safe to call on an initialized database.
pub async fn initialize_schema(db: &Database) -> Result<()> {
    for statement in CREATE_TABLES.iter().chain(CREATE_INDEXES.iter()) {
        db.run("initialize_schema", sqlx::query(statement).execute(db.pool()))
            .await?;
    }

    info!("Database tables and indexes created successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_initialize_schema_twice() {
        let db = Database::in_memory().await.unwrap();
        initialize_schema(&db).await.unwrap();
        initialize_schema(&db).await.unwrap();

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(db.pool())
        .await
        .unwrap();

        assert_eq!(tables, vec!["restakers", "rewards", "slash_events", "validators"]);
    }
}
