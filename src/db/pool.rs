use crate::config::Config;
use crate::entities::{follows, likes, message, user};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, EntityTrait, Schema,
};

pub type DbPool = DatabaseConnection;

pub async fn create_pool(config: &Config) -> Result<DbPool, anyhow::Error> {
    let mut options = ConnectOptions::new(config.database.url.clone());
    options
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .sqlx_logging(false);

    let db = Database::connect(options).await?;
    create_schema(&db).await?;

    log::info!("Database schema ready on {:?}", db.get_database_backend());
    Ok(db)
}

/// Creates the Warbler tables from the entity definitions. Referenced tables
/// come first so foreign keys resolve.
pub async fn create_schema(db: &DbPool) -> Result<(), DbErr> {
    create_table(db, user::Entity).await?;
    create_table(db, message::Entity).await?;
    create_table(db, follows::Entity).await?;
    create_table(db, likes::Entity).await?;
    Ok(())
}

async fn create_table<E>(db: &DbPool, entity: E) -> Result<(), DbErr>
where
    E: EntityTrait,
{
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    let mut stmt = schema.create_table_from_entity(entity);
    stmt.if_not_exists();

    db.execute(backend.build(&stmt)).await?;
    Ok(())
}
