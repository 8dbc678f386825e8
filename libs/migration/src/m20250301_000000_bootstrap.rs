use sea_orm_migration::prelude::*;

/// Shared `util` schema with the `updated_at` trigger function.
#[derive(DeriveMigrationName)]
pub struct Migration;

const UP: &[&str] = &[
    "CREATE SCHEMA IF NOT EXISTS util",
    r#"
    CREATE OR REPLACE FUNCTION util.touch_updated_at()
    RETURNS TRIGGER AS $$
    BEGIN
        NEW.updated_at = NOW();
        RETURN NEW;
    END;
    $$ LANGUAGE plpgsql
    "#,
];

const DOWN: &[&str] = &[
    "DROP FUNCTION IF EXISTS util.touch_updated_at()",
    "DROP SCHEMA IF EXISTS util",
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        for sql in UP {
            db.execute_unprepared(sql).await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        for sql in DOWN {
            db.execute_unprepared(sql).await?;
        }
        Ok(())
    }
}
