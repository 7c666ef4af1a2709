//! SeaORM adapter for the drinks repository - generic over ConnectionTrait.

use sea_orm::{
    ActiveModelTrait, ConnectionTrait, EntityTrait, NotSet, PaginatorTrait, QueryOrder, Set,
};

use crate::entities::drinks;

pub mod dto;

pub use dto::{DrinkCreate, DrinkUpdate};

// Adapter functions return DbErr; repos layer maps to DomainError via From<DbErr>.

pub async fn find_all<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<drinks::Model>, sea_orm::DbErr> {
    drinks::Entity::find()
        .order_by_asc(drinks::Column::Id)
        .all(conn)
        .await
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i32,
) -> Result<Option<drinks::Model>, sea_orm::DbErr> {
    drinks::Entity::find_by_id(id).one(conn).await
}

pub async fn count<C: ConnectionTrait + Send + Sync>(conn: &C) -> Result<u64, sea_orm::DbErr> {
    drinks::Entity::find().count(conn).await
}

pub async fn create_drink<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: DrinkCreate,
) -> Result<drinks::Model, sea_orm::DbErr> {
    let active = drinks::ActiveModel {
        id: NotSet,
        title: Set(dto.title),
        recipe: Set(dto.recipe),
    };
    active.insert(conn).await
}

/// Apply `dto` to an existing row. Returns `None` when the id does not exist.
pub async fn update_drink<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i32,
    dto: DrinkUpdate,
) -> Result<Option<drinks::Model>, sea_orm::DbErr> {
    let Some(existing) = find_by_id(conn, id).await? else {
        return Ok(None);
    };

    if dto.is_empty() {
        return Ok(Some(existing));
    }

    let mut active: drinks::ActiveModel = existing.into();
    if let Some(title) = dto.title {
        active.title = Set(title);
    }
    if let Some(recipe) = dto.recipe {
        active.recipe = Set(recipe);
    }
    active.update(conn).await.map(Some)
}

/// Delete by id. Returns the number of rows removed (0 or 1).
pub async fn delete_drink<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i32,
) -> Result<u64, sea_orm::DbErr> {
    let result = drinks::Entity::delete_by_id(id).exec(conn).await?;
    Ok(result.rows_affected)
}
