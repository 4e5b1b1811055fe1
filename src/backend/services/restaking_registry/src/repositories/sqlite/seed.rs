use chrono::{DateTime, Duration, Utc};
use tracing::info;

use super::Database;
use crate::utils::Result;

struct SeedValidator {
    operator_id: &'static str,
    operator_address: &'static str,
    total_delegated_stake: f64,
    status: &'static str,
    commission_rate: f64,
    name: &'static str,
    description: &'static str,
    logo: &'static str,
    website: &'static str,
}

struct SeedRestaker {
    user_address: &'static str,
    amount_restaked: f64,
    validator_address: &'static str,
}

struct SeedReward {
    id: &'static str,
    user_address: &'static str,
    validator_address: &'static str,
    amount: f64,
    hours_ago: i64,
    transaction_hash: &'static str,
    block_number: i64,
}

struct SeedSlashEvent {
    id: &'static str,
    validator_operator_id: &'static str,
    days_ago: i64,
    amount_slashed: f64,
    reason: &'static str,
    block_number: i64,
    transaction_hash: &'static str,
}

const VALIDATORS: [SeedValidator; 5] = [
    SeedValidator {
        operator_id: "val_001",
        operator_address: "0x1234567890abcdef1234567890abcdef12345678",
        total_delegated_stake: 15000.5,
        status: "active",
        commission_rate: 0.05,
        name: "EigenLayer Pro Validator",
        description: "Professional validator with 99.9% uptime",
        logo: "https://images.pexels.com/photos/730547/pexels-photo-730547.jpeg?auto=compress&cs=tinysrgb&w=64",
        website: "https://eigenvalidator.com",
    },
    SeedValidator {
        operator_id: "val_002",
        operator_address: "0x2345678901bcdef12345678901bcdef123456789",
        total_delegated_stake: 8750.25,
        status: "active",
        commission_rate: 0.07,
        name: "Secure Stake Validator",
        description: "Security-focused validator with institutional backing",
        logo: "https://images.pexels.com/photos/534216/pexels-photo-534216.jpeg?auto=compress&cs=tinysrgb&w=64",
        website: "https://securestake.io",
    },
    SeedValidator {
        operator_id: "val_003",
        operator_address: "0x3456789012cdef123456789012cdef12345678901",
        total_delegated_stake: 12300.75,
        status: "jailed",
        commission_rate: 0.04,
        name: "Lightning Validator",
        description: "High-performance validator with cutting-edge infrastructure",
        logo: "https://images.pexels.com/photos/844124/pexels-photo-844124.jpeg?auto=compress&cs=tinysrgb&w=64",
        website: "https://lightningval.com",
    },
    SeedValidator {
        operator_id: "val_004",
        operator_address: "0x4567890123def1234567890123def123456789012",
        total_delegated_stake: 9800.0,
        status: "active",
        commission_rate: 0.06,
        name: "Decentralized Validator Network",
        description: "Community-driven validator with transparent operations",
        logo: "https://images.pexels.com/photos/1181263/pexels-photo-1181263.jpeg?auto=compress&cs=tinysrgb&w=64",
        website: "https://dvn.network",
    },
    SeedValidator {
        operator_id: "val_005",
        operator_address: "0x567890123def4567890123def4567890123456789",
        total_delegated_stake: 6500.5,
        status: "slashed",
        commission_rate: 0.08,
        name: "Enterprise Validator Solutions",
        description: "Enterprise-grade validator infrastructure",
        logo: "https://images.pexels.com/photos/159888/pexels-photo-159888.jpeg?auto=compress&cs=tinysrgb&w=64",
        website: "https://evs.com",
    },
];

const RESTAKERS: [SeedRestaker; 6] = [
    SeedRestaker {
        user_address: "0xabcdef1234567890abcdef1234567890abcdef12",
        amount_restaked: 500.0,
        validator_address: "0x1234567890abcdef1234567890abcdef12345678",
    },
    SeedRestaker {
        user_address: "0xbcdef1234567890abcdef1234567890abcdef123",
        amount_restaked: 1250.5,
        validator_address: "0x2345678901bcdef12345678901bcdef123456789",
    },
    SeedRestaker {
        user_address: "0xcdef1234567890abcdef1234567890abcdef1234",
        amount_restaked: 750.25,
        validator_address: "0x1234567890abcdef1234567890abcdef12345678",
    },
    SeedRestaker {
        user_address: "0xdef1234567890abcdef1234567890abcdef12345",
        amount_restaked: 2000.0,
        validator_address: "0x3456789012cdef123456789012cdef12345678901",
    },
    SeedRestaker {
        user_address: "0xef1234567890abcdef1234567890abcdef123456",
        amount_restaked: 875.75,
        validator_address: "0x4567890123def1234567890123def123456789012",
    },
    SeedRestaker {
        user_address: "0xf1234567890abcdef1234567890abcdef1234567",
        amount_restaked: 1500.0,
        validator_address: "0x2345678901bcdef12345678901bcdef123456789",
    },
];

const REWARDS: [SeedReward; 4] = [
    SeedReward {
        id: "reward_001",
        user_address: "0xabcdef1234567890abcdef1234567890abcdef12",
        validator_address: "0x1234567890abcdef1234567890abcdef12345678",
        amount: 2.5,
        hours_ago: 24,
        transaction_hash: "0xreward1hash",
        block_number: 18_500_000,
    },
    SeedReward {
        id: "reward_002",
        user_address: "0xbcdef1234567890abcdef1234567890abcdef123",
        validator_address: "0x2345678901bcdef12345678901bcdef123456789",
        amount: 5.25,
        hours_ago: 12,
        transaction_hash: "0xreward2hash",
        block_number: 18_500_100,
    },
    SeedReward {
        id: "reward_003",
        user_address: "0xcdef1234567890abcdef1234567890abcdef1234",
        validator_address: "0x1234567890abcdef1234567890abcdef12345678",
        amount: 3.75,
        hours_ago: 6,
        transaction_hash: "0xreward3hash",
        block_number: 18_500_200,
    },
    SeedReward {
        id: "reward_004",
        user_address: "0xdef1234567890abcdef1234567890abcdef12345",
        validator_address: "0x3456789012cdef123456789012cdef12345678901",
        amount: 8.0,
        hours_ago: 3,
        transaction_hash: "0xreward4hash",
        block_number: 18_500_300,
    },
];

const SLASH_EVENTS: [SeedSlashEvent; 2] = [
    SeedSlashEvent {
        id: "slash_001",
        validator_operator_id: "val_003",
        days_ago: 7,
        amount_slashed: 100.0,
        reason: "Double signing violation",
        block_number: 18_480_000,
        transaction_hash: "0xslash1hash",
    },
    SeedSlashEvent {
        id: "slash_002",
        validator_operator_id: "val_005",
        days_ago: 14,
        amount_slashed: 250.0,
        reason: "Downtime penalty",
        block_number: 18_470_000,
        transaction_hash: "0xslash2hash",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The store already held validators; nothing was written.
    Skipped,
    Seeded {
        validators: u64,
        restakers: u64,
        rewards: u64,
        slash_events: u64,
    },
}

/// Loads the sample data set unless the store already contains validators.
///
/// All inserts share one transaction, so a failed seed leaves the store empty
/// and the next start-up retries it.
pub async fn seed_initial_data(db: &Database) -> Result<SeedOutcome> {
    seed_initial_data_at(db, Utc::now()).await
}

pub async fn seed_initial_data_at(db: &Database, now: DateTime<Utc>) -> Result<SeedOutcome> {
    let existing: i64 = db
        .run(
            "count_validators",
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM validators").fetch_one(db.pool()),
        )
        .await?;

    if existing > 0 {
        info!(existing, "Database already contains data, skipping seed");
        return Ok(SeedOutcome::Skipped);
    }

    info!("Seeding initial data...");

    let outcome = db
        .run("seed_initial_data", async {
            let mut tx = db.pool().begin().await?;
            let (mut validators, mut restakers, mut rewards, mut slash_events) = (0, 0, 0, 0);

            for v in &VALIDATORS {
                validators += sqlx::query(
                    r#"
                    INSERT INTO validators (
                        operator_id, operator_address, total_delegated_stake, status,
                        commission_rate, name, description, logo, website
                    ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                    "#,
                )
                .bind(v.operator_id)
                .bind(v.operator_address)
                .bind(v.total_delegated_stake)
                .bind(v.status)
                .bind(v.commission_rate)
                .bind(v.name)
                .bind(v.description)
                .bind(v.logo)
                .bind(v.website)
                .execute(&mut *tx)
                .await?
                .rows_affected();
            }

            for r in &RESTAKERS {
                restakers += sqlx::query(
                    r#"
                    INSERT OR IGNORE INTO restakers (user_address, amount_restaked, validator_address)
                    VALUES (?, ?, ?)
                    "#,
                )
                .bind(r.user_address)
                .bind(r.amount_restaked)
                .bind(r.validator_address)
                .execute(&mut *tx)
                .await?
                .rows_affected();
            }

            for r in &REWARDS {
                rewards += sqlx::query(
                    r#"
                    INSERT OR IGNORE INTO rewards (
                        id, user_address, validator_address, amount, received_at,
                        transaction_hash, block_number
                    ) VALUES (?, ?, ?, ?, ?, ?, ?)
                    "#,
                )
                .bind(r.id)
                .bind(r.user_address)
                .bind(r.validator_address)
                .bind(r.amount)
                .bind(now - Duration::hours(r.hours_ago))
                .bind(r.transaction_hash)
                .bind(r.block_number)
                .execute(&mut *tx)
                .await?
                .rows_affected();
            }

            for s in &SLASH_EVENTS {
                slash_events += sqlx::query(
                    r#"
                    INSERT OR IGNORE INTO slash_events (
                        id, validator_operator_id, slashed_at, amount_slashed, reason,
                        block_number, transaction_hash
                    ) VALUES (?, ?, ?, ?, ?, ?, ?)
                    "#,
                )
                .bind(s.id)
                .bind(s.validator_operator_id)
                .bind(now - Duration::days(s.days_ago))
                .bind(s.amount_slashed)
                .bind(s.reason)
                .bind(s.block_number)
                .bind(s.transaction_hash)
                .execute(&mut *tx)
                .await?
                .rows_affected();
            }

            tx.commit().await?;

            Ok::<_, sqlx::Error>(SeedOutcome::Seeded {
                validators,
                restakers,
                rewards,
                slash_events,
            })
        })
        .await?;

    info!(?outcome, "Initial data seeded successfully");
    Ok(outcome)
}
