use sqlx::SqlitePool;

use crate::error::{AppError, AppResult};
use crate::models::*;

// ── Ice creams ────────────────────────────────────────────────────────────────

pub async fn fetch_all_ice_creams(pool: &SqlitePool) -> AppResult<Vec<IceCream>> {
    let ice_creams = sqlx::query_as::<_, IceCream>(
        "SELECT id, name, description, price, quantity FROM ice_creams ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    Ok(ice_creams)
}

pub async fn fetch_ice_cream_by_id(pool: &SqlitePool, id: i64) -> AppResult<IceCream> {
    sqlx::query_as::<_, IceCream>(
        "SELECT id, name, description, price, quantity FROM ice_creams WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Ice cream not found".to_string()))
}

pub async fn insert_ice_cream(pool: &SqlitePool, payload: &CreateIceCream) -> AppResult<IceCream> {
    let ice_cream = sqlx::query_as::<_, IceCream>(
        r#"
        INSERT INTO ice_creams (name, description, price, quantity)
        VALUES (?, ?, ?, ?)
        RETURNING id, name, description, price, quantity
        "#,
    )
    .bind(&payload.name)
    .bind(&payload.description)
    .bind(payload.price)
    .bind(payload.quantity)
    .fetch_one(pool)
    .await?;

    Ok(ice_cream)
}

pub async fn update_ice_cream(
    pool: &SqlitePool,
    id: i64,
    payload: &UpdateIceCream,
) -> AppResult<IceCream> {
    // Fetch existing to merge optional fields
    let existing = fetch_ice_cream_by_id(pool, id).await?;

    let ice_cream = sqlx::query_as::<_, IceCream>(
        r#"
        UPDATE ice_creams
        SET name        = ?,
            description = ?,
            price       = ?,
            quantity    = ?
        WHERE id = ?
        RETURNING id, name, description, price, quantity
        "#,
    )
    .bind(payload.name.as_deref().unwrap_or(&existing.name))
    .bind(payload.description.as_deref().unwrap_or(&existing.description))
    .bind(payload.price.unwrap_or(existing.price))
    .bind(payload.quantity.unwrap_or(existing.quantity))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Ice cream not found".to_string()))?;

    Ok(ice_cream)
}

pub async fn delete_ice_cream(pool: &SqlitePool, id: i64) -> AppResult<()> {
    let result = sqlx::query("DELETE FROM ice_creams WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Ice cream not found".to_string()));
    }
    Ok(())
}

pub async fn count_ice_creams(pool: &SqlitePool) -> AppResult<i64> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM ice_creams")
        .fetch_one(pool)
        .await?;
    Ok(row.0)
}
