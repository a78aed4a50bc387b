//! Database migrations.
//!
//! Migrations are managed using sea-orm-migration.

pub use sea_orm_migration::prelude::*;

mod m20250601_000001_initial;
mod m20250601_000002_recurring_claims;
mod m20250601_000003_profile_details;

/// Migrator for running database migrations.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_initial::Migration),
            Box::new(m20250601_000002_recurring_claims::Migration),
            Box::new(m20250601_000003_profile_details::Migration),
        ]
    }
}
