use chrono::Utc;
use serde_json::Value;

use super::{decode, new_id, require_id};
use crate::database::models::{Column, ColumnCreate, ColumnPatch};
use crate::database::Store;
use crate::error::ApiError;
use crate::schemas::columns::{COLUMN_CREATE, COLUMN_UPDATE};

pub async fn list(store: &dyn Store) -> Result<Vec<Column>, ApiError> {
    Ok(store.select_columns().await?)
}

pub async fn get(store: &dyn Store, id: &str) -> Result<Column, ApiError> {
    require_id(id, "id")?;
    Ok(store.select_column(id).await?)
}

pub async fn create(store: &dyn Store, input: &Value) -> Result<Column, ApiError> {
    let normalized = COLUMN_CREATE.validate(input)?;
    let body: ColumnCreate = decode(normalized)?;

    let now = Utc::now();
    let row = Column {
        id: new_id(),
        name: body.name,
        frame_id: body.frame_id,
        tickets: body.tickets,
        created_at: now,
        updated_at: now,
    };
    Ok(store.insert_column(row).await?)
}

pub async fn update(store: &dyn Store, id: &str, input: &Value) -> Result<Column, ApiError> {
    require_id(id, "id")?;
    let normalized = COLUMN_UPDATE.validate(input)?;
    let patch: ColumnPatch = decode(normalized)?;
    Ok(store.update_column(id, patch, Utc::now()).await?)
}

pub async fn remove(store: &dyn Store, id: &str) -> Result<(), ApiError> {
    require_id(id, "id")?;
    Ok(store.delete_column(id).await?)
}
