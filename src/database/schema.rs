// database/schema.rs - PostgreSQL schema and a small versioned migration runner
//
// Each migration is a list of single statements applied inside one transaction;
// applied versions are recorded in `_migrations`.

use sqlx::{PgPool, Row};
use tracing::info;

use super::manager::{DatabaseError, DbResult};

const MIGRATION_TABLE_DDL: &str = "\
CREATE TABLE IF NOT EXISTS _migrations (
    version INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)";

pub struct Migration {
    pub version: i32,
    pub name: &'static str,
    pub statements: &'static [&'static str],
}

pub static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    statements: SCHEMA_V1,
}];

// Property status, maintenance priority/status and transaction type are TEXT
// guarded by CHECK constraints; the Rust enums parse them on read.
const SCHEMA_V1: &[&str] = &[
    "CREATE TABLE users (
        id VARCHAR PRIMARY KEY,
        email VARCHAR,
        first_name VARCHAR,
        last_name VARCHAR,
        profile_image_url VARCHAR,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )",
    "CREATE TABLE properties (
        id SERIAL PRIMARY KEY,
        user_id VARCHAR NOT NULL REFERENCES users(id),
        name VARCHAR(255) NOT NULL,
        address TEXT NOT NULL,
        city VARCHAR(100) NOT NULL,
        province VARCHAR(10) NOT NULL DEFAULT 'BC',
        postal_code VARCHAR(10) NOT NULL,
        property_type VARCHAR(50) NOT NULL,
        bedrooms INTEGER NOT NULL DEFAULT 0,
        bathrooms NUMERIC(3, 1) NOT NULL DEFAULT 1.0,
        square_footage INTEGER,
        rent_amount NUMERIC(10, 2) NOT NULL CHECK (rent_amount >= 0),
        status TEXT NOT NULL DEFAULT 'vacant'
            CHECK (status IN ('vacant', 'occupied', 'maintenance')),
        description TEXT,
        images JSONB NOT NULL DEFAULT '[]',
        amenities TEXT[] NOT NULL DEFAULT '{}',
        pet_policy VARCHAR(50) NOT NULL DEFAULT 'no_pets',
        smoking_policy VARCHAR(50) NOT NULL DEFAULT 'no_smoking',
        available_date TIMESTAMPTZ,
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )",
    "CREATE INDEX idx_properties_user_id ON properties (user_id)",
    "CREATE TABLE tenants (
        id SERIAL PRIMARY KEY,
        property_id INTEGER REFERENCES properties(id) ON DELETE SET NULL,
        first_name VARCHAR(100) NOT NULL,
        last_name VARCHAR(100) NOT NULL,
        email VARCHAR(255) NOT NULL,
        phone VARCHAR(20),
        emergency_contact JSONB,
        lease_start TIMESTAMPTZ,
        lease_end TIMESTAMPTZ,
        rent_amount NUMERIC(10, 2),
        deposit_amount NUMERIC(10, 2),
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )",
    "CREATE INDEX idx_tenants_property_id ON tenants (property_id)",
    "CREATE TABLE maintenance_requests (
        id SERIAL PRIMARY KEY,
        property_id INTEGER NOT NULL REFERENCES properties(id) ON DELETE CASCADE,
        tenant_id INTEGER REFERENCES tenants(id) ON DELETE SET NULL,
        title VARCHAR(255) NOT NULL,
        description TEXT NOT NULL,
        priority TEXT NOT NULL DEFAULT 'medium'
            CHECK (priority IN ('low', 'medium', 'high', 'urgent')),
        status TEXT NOT NULL DEFAULT 'pending'
            CHECK (status IN ('pending', 'in_progress', 'completed', 'cancelled')),
        category VARCHAR(50) NOT NULL,
        estimated_cost NUMERIC(10, 2),
        actual_cost NUMERIC(10, 2),
        scheduled_date TIMESTAMPTZ,
        completed_date TIMESTAMPTZ,
        images JSONB NOT NULL DEFAULT '[]',
        notes TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )",
    "CREATE INDEX idx_maintenance_property_status ON maintenance_requests (property_id, status)",
    "CREATE TABLE transactions (
        id SERIAL PRIMARY KEY,
        property_id INTEGER NOT NULL REFERENCES properties(id) ON DELETE CASCADE,
        tenant_id INTEGER REFERENCES tenants(id) ON DELETE SET NULL,
        type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
        category VARCHAR(50) NOT NULL,
        amount NUMERIC(10, 2) NOT NULL CHECK (amount > 0),
        description TEXT NOT NULL,
        transaction_date TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        is_paid BOOLEAN NOT NULL DEFAULT FALSE,
        payment_method VARCHAR(50),
        receipt_url VARCHAR,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )",
    "CREATE INDEX idx_transactions_property_id ON transactions (property_id)",
];

/// Apply every migration not yet recorded in `_migrations`. Safe to run on each start.
pub async fn run_migrations(pool: &PgPool) -> DbResult<usize> {
    sqlx::query(MIGRATION_TABLE_DDL).execute(pool).await?;

    let applied: Vec<i32> = sqlx::query("SELECT version FROM _migrations ORDER BY version")
        .fetch_all(pool)
        .await?
        .iter()
        .map(|row| row.get::<i32, _>("version"))
        .collect();

    let mut count = 0;
    for migration in pending(MIGRATIONS, &applied) {
        info!(version = migration.version, name = migration.name, "Applying migration");

        let mut tx = pool.begin().await?;
        for statement in migration.statements.iter().copied() {
            sqlx::query(statement).execute(&mut *tx).await.map_err(|e| {
                DatabaseError::MigrationError(format!(
                    "v{} {}: {}",
                    migration.version, migration.name, e
                ))
            })?;
        }
        sqlx::query("INSERT INTO _migrations (version, name) VALUES ($1, $2)")
            .bind(migration.version)
            .bind(migration.name)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        count += 1;
    }

    if count == 0 {
        info!("Schema is up to date");
    }
    Ok(count)
}

fn pending<'a>(migrations: &'a [Migration], applied: &[i32]) -> Vec<&'a Migration> {
    migrations
        .iter()
        .filter(|m| !applied.contains(&m.version))
        .collect()
}
