//! Profile details.
//!
//! Personal fields edited from the settings screen.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(PROFILE_DETAILS_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            r"
            ALTER TABLE profiles
                DROP COLUMN IF EXISTS avatar_url,
                DROP COLUMN IF EXISTS document_number,
                DROP COLUMN IF EXISTS phone_number,
                DROP COLUMN IF EXISTS date_of_birth,
                DROP COLUMN IF EXISTS updated_at;
            ",
        )
        .await?;
        Ok(())
    }
}

const PROFILE_DETAILS_SQL: &str = r"
ALTER TABLE profiles
    ADD COLUMN date_of_birth DATE,
    ADD COLUMN phone_number TEXT,
    ADD COLUMN document_number TEXT,
    ADD COLUMN avatar_url TEXT,
    ADD COLUMN updated_at TIMESTAMPTZ NOT NULL DEFAULT now();
";
