//! Equipment service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::equipment::{CreateEquipment, Equipment},
    repository::Repository,
};

#[derive(Clone)]
pub struct EquipmentService {
    repository: Repository,
}

impl EquipmentService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Equipment>> {
        self.repository.equipment.list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Equipment> {
        self.repository.equipment.get_by_id(id).await
    }

    pub async fn create(&self, data: &CreateEquipment) -> AppResult<Equipment> {
        data.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        if data.name.trim().is_empty() {
            return Err(AppError::Validation("name is required".to_string()));
        }
        self.repository.equipment.create(data).await
    }
}
