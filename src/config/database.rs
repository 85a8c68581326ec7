use crate::config::AppConfig;
use crate::domain::{
    form::entity::form, registration::entity::form_registration, user::entity::user,
};
use sea_orm::{
    ConnectionTrait, Database, DatabaseConnection, DbErr, EntityName, Schema, Statement,
};
use tracing::info;

pub async fn establish_connection(config: &AppConfig) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(config.database_url.as_str()).await?;
    info!("Successfully connected to the database.");

    if config.db_schema_update {
        create_tables(&db).await?;
    } else {
        info!("Skipping database schema synchronization (DB_SCHEMA_UPDATE is not true).");
    }

    Ok(db)
}

async fn create_tables(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    info!("Starting database schema synchronization...");

    // 부모 테이블 먼저 (외래 키)
    create_table_if_not_exists(db, &schema, user::Entity).await?;
    create_table_if_not_exists(db, &schema, form::Entity).await?;
    create_table_if_not_exists(db, &schema, form_registration::Entity).await?;

    create_index_if_not_exists(
        db,
        "idx_form_registration_form_id",
        "form_registration",
        "(form_id)",
    )
    .await?;
    // 멤버 이메일 포함 여부(`= ANY(...)`) 조회용
    create_index_if_not_exists(
        db,
        "idx_form_registration_member_emails",
        "form_registration",
        "USING GIN (reg_team_mem_emails)",
    )
    .await?;

    info!("Database schema synchronization completed.");
    Ok(())
}

async fn create_index_if_not_exists(
    db: &DatabaseConnection,
    index_name: &str,
    table_name: &str,
    definition: &str,
) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let sql = format!(
        "CREATE INDEX IF NOT EXISTS {} ON {} {}",
        index_name, table_name, definition
    );

    db.execute(Statement::from_string(backend, sql))
        .await
        .map(|_| ())
        .map_err(|e| {
            tracing::error!("Failed to create index {}: {}", index_name, e);
            e
        })
}

async fn create_table_if_not_exists<E>(
    db: &DatabaseConnection,
    schema: &Schema,
    entity: E,
) -> Result<(), DbErr>
where
    E: sea_orm::EntityTrait,
{
    let backend = db.get_database_backend();
    let table = entity.table_name().to_string();
    let create_stmt: Statement =
        backend.build(schema.create_table_from_entity(entity).if_not_exists());

    match db.execute(create_stmt).await {
        Ok(_) => {
            info!(table = %table, "table ready");
            Ok(())
        }
        Err(e) => {
            tracing::error!("Failed to create table {}: {}", table, e);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    #[tokio::test]
    async fn should_create_tables_in_dependency_order() {
        // Arrange: 테이블 3개 + 인덱스 2개
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results((0..5).map(|_| MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }))
            .into_connection();

        // Act
        create_tables(&db).await.unwrap();

        // Assert
        let log = format!("{:?}", db.into_transaction_log());
        let user_at = log.find("CREATE TABLE IF NOT EXISTS \\\"user\\\"");
        let form_at = log.find("CREATE TABLE IF NOT EXISTS \\\"form\\\"");
        let registration_at = log.find("CREATE TABLE IF NOT EXISTS \\\"form_registration\\\"");
        assert!(user_at.is_some() && form_at.is_some() && registration_at.is_some());
        assert!(user_at < registration_at);
        assert!(form_at < registration_at);
        assert!(log.contains("USING GIN (reg_team_mem_emails)"));
    }
}
