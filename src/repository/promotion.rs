use sqlx::{Postgres, Transaction};
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    core::{
        error::ValidationError,
        sqlx_utils::{binds_query_as, query_builder, SqlxBinds},
        utils::now,
    },
    model::{
        promotion::{Promotion, TABLE_NAME},
        promotion_filter::PromotionFilter,
    },
};

/// Storage for promotions.
///
/// Writes fail with a `PersistenceFailure` validation error; reads fail with
/// whatever infrastructure error occurred.
#[allow(async_fn_in_trait)]
pub trait PromotionRepository {
    async fn create(&mut self, promotion: &Promotion) -> Result<(), ValidationError>;

    /// Replace every column except `id` and `created_at`, refreshing
    /// `updated_at`.
    async fn update(&mut self, promotion: &mut Promotion) -> Result<(), ValidationError>;

    /// Write only `active_status` and `updated_at`.
    async fn update_active_status(&mut self, promotion: &Promotion)
        -> Result<(), ValidationError>;

    /// Returns whether a row was removed.
    async fn delete(&mut self, id: &Uuid) -> Result<bool, ValidationError>;

    async fn find_by_id(&mut self, id: &Uuid) -> anyhow::Result<Option<Promotion>>;

    async fn find_all(&mut self, filter: &PromotionFilter) -> anyhow::Result<Vec<Promotion>>;
}

fn missing_promotion(id: &Uuid) -> ValidationError {
    ValidationError::persistence(format!("promotion with id = {} no longer exists", id))
}

impl PromotionRepository for Transaction<'_, Postgres> {
    async fn create(&mut self, promotion: &Promotion) -> Result<(), ValidationError> {
        info!("Creating {}", promotion.name);
        sqlx::query(
            format!(
                r#"
        INSERT INTO {} (id, name, description, start_date, end_date, active_status,
        created_by, updated_by, created_at, updated_at, product_ids, extra)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)"#,
                TABLE_NAME
            )
            .as_str(),
        )
        .bind(promotion.id)
        .bind(&promotion.name)
        .bind(&promotion.description)
        .bind(promotion.start_date)
        .bind(promotion.end_date)
        .bind(promotion.active_status)
        .bind(promotion.created_by)
        .bind(promotion.updated_by)
        .bind(promotion.created_at)
        .bind(promotion.updated_at)
        .bind(&promotion.product_ids)
        .bind(&promotion.extra)
        .execute(&mut **self)
        .await
        .map_err(|err| {
            error!("Error creating record {}: {}", promotion.id, err);
            ValidationError::persistence(err)
        })?;
        Ok(())
    }

    async fn update(&mut self, promotion: &mut Promotion) -> Result<(), ValidationError> {
        info!("Saving {}", promotion.name);
        promotion.touch(now());
        let result = sqlx::query(
            format!(
                r#"
        UPDATE {}
        SET name = $1, description = $2, start_date = $3, end_date = $4, active_status = $5,
        created_by = $6, updated_by = $7, updated_at = $8, product_ids = $9, extra = $10
        WHERE id = $11"#,
                TABLE_NAME
            )
            .as_str(),
        )
        .bind(&promotion.name)
        .bind(&promotion.description)
        .bind(promotion.start_date)
        .bind(promotion.end_date)
        .bind(promotion.active_status)
        .bind(promotion.created_by)
        .bind(promotion.updated_by)
        .bind(promotion.updated_at)
        .bind(&promotion.product_ids)
        .bind(&promotion.extra)
        .bind(promotion.id)
        .execute(&mut **self)
        .await
        .map_err(|err| {
            error!("Error updating record {}: {}", promotion.id, err);
            ValidationError::persistence(err)
        })?;
        if result.rows_affected() == 0 {
            return Err(missing_promotion(&promotion.id));
        }
        Ok(())
    }

    async fn update_active_status(
        &mut self,
        promotion: &Promotion,
    ) -> Result<(), ValidationError> {
        info!(
            "Setting active_status={} on {}",
            promotion.active_status, promotion.id
        );
        let result = sqlx::query(
            format!(
                "UPDATE {} SET active_status = $1, updated_at = $2 WHERE id = $3",
                TABLE_NAME
            )
            .as_str(),
        )
        .bind(promotion.active_status)
        .bind(promotion.updated_at)
        .bind(promotion.id)
        .execute(&mut **self)
        .await
        .map_err(|err| {
            error!("Error updating record {}: {}", promotion.id, err);
            ValidationError::persistence(err)
        })?;
        if result.rows_affected() == 0 {
            return Err(missing_promotion(&promotion.id));
        }
        Ok(())
    }

    async fn delete(&mut self, id: &Uuid) -> Result<bool, ValidationError> {
        info!("Deleting {}", id);
        let result = sqlx::query(format!("DELETE FROM {} WHERE id = $1", TABLE_NAME).as_str())
            .bind(*id)
            .execute(&mut **self)
            .await
            .map_err(|err| {
                error!("Error deleting record {}: {}", id, err);
                ValidationError::persistence(err)
            })?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_by_id(&mut self, id: &Uuid) -> anyhow::Result<Option<Promotion>> {
        info!("Processing lookup for id {} ...", id);
        let filters = vec!["id = $1".to_string()];
        let stmt = query_builder(TABLE_NAME, &filters);
        let q = binds_query_as::<Promotion>(&stmt, vec![SqlxBinds::Uuid(*id)]);
        let data = q.fetch_optional(&mut **self).await?;
        Ok(data)
    }

    async fn find_all(&mut self, filter: &PromotionFilter) -> anyhow::Result<Vec<Promotion>> {
        info!("Processing promotion query {:?} ...", filter);
        let wheres = filter.to_sql();
        let stmt = query_builder(TABLE_NAME, &wheres.filters);
        let q = binds_query_as::<Promotion>(&stmt, wheres.binds);
        let data = q.fetch_all(&mut **self).await?;
        Ok(data)
    }
}

/// Vec-backed repository keeping insertion order.
#[derive(Clone, Debug, Default)]
pub struct MemoryPromotionRepository {
    promotions: Vec<Promotion>,
}

impl MemoryPromotionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, id: &Uuid) -> Option<usize> {
        self.promotions.iter().position(|x| x.id == *id)
    }
}

impl PromotionRepository for MemoryPromotionRepository {
    async fn create(&mut self, promotion: &Promotion) -> Result<(), ValidationError> {
        if self.position(&promotion.id).is_some() {
            return Err(ValidationError::persistence(format!(
                "duplicate key value violates unique constraint: id = {}",
                promotion.id
            )));
        }
        self.promotions.push(promotion.clone());
        Ok(())
    }

    async fn update(&mut self, promotion: &mut Promotion) -> Result<(), ValidationError> {
        let idx = self
            .position(&promotion.id)
            .ok_or_else(|| missing_promotion(&promotion.id))?;
        promotion.touch(now());
        let created_at = self.promotions[idx].created_at;
        self.promotions[idx] = Promotion {
            created_at,
            ..promotion.clone()
        };
        Ok(())
    }

    async fn update_active_status(
        &mut self,
        promotion: &Promotion,
    ) -> Result<(), ValidationError> {
        let idx = self
            .position(&promotion.id)
            .ok_or_else(|| missing_promotion(&promotion.id))?;
        self.promotions[idx].active_status = promotion.active_status;
        self.promotions[idx].updated_at = promotion.updated_at;
        Ok(())
    }

    async fn delete(&mut self, id: &Uuid) -> Result<bool, ValidationError> {
        let before = self.promotions.len();
        self.promotions.retain(|x| x.id != *id);
        Ok(self.promotions.len() < before)
    }

    async fn find_by_id(&mut self, id: &Uuid) -> anyhow::Result<Option<Promotion>> {
        Ok(self.promotions.iter().find(|x| x.id == *id).cloned())
    }

    async fn find_all(&mut self, filter: &PromotionFilter) -> anyhow::Result<Vec<Promotion>> {
        Ok(filter.apply(self.promotions.clone()))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use sqlx::PgPool;

    use super::*;
    use crate::core::error::ValidationErrorKind;

    fn promotion(name: &str, start: &str, end: &str) -> Promotion {
        Promotion::from_json(&json!({
            "name": name,
            "start_date": start,
            "end_date": end,
            "active_status": false,
            "created_by": "0b7d6d8e-3a48-4a3e-9c85-4a1c1b3e9a01",
            "updated_by": "6f1e7a1c-8c42-4d8e-a4e5-0f8a2b3c4d5e",
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_memory_repository_crud() -> anyhow::Result<()> {
        let mut repo = MemoryPromotionRepository::new();
        let mut first = promotion("first", "2023-12-01", "2023-12-31");
        let second = promotion("second", "2023-12-11", "2024-01-05");
        repo.create(&first).await?;
        repo.create(&second).await?;

        let err = repo.create(&first).await.unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::PersistenceFailure);

        first.name = "renamed".to_string();
        repo.update(&mut first).await?;
        let stored = repo.find_by_id(&first.id).await?.unwrap();
        assert_eq!(stored.name, "renamed");
        assert!(stored.updated_at >= stored.created_at);

        first.activate();
        repo.update_active_status(&first).await?;
        first.activate();
        repo.update_active_status(&first).await?;
        assert!(repo.find_by_id(&first.id).await?.unwrap().active_status);

        let all = repo.find_all(&PromotionFilter::default()).await?;
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, first.id);

        assert!(repo.delete(&first.id).await?);
        assert!(!repo.delete(&first.id).await?);
        assert!(repo.find_by_id(&first.id).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_memory_repository_update_missing() {
        let mut repo = MemoryPromotionRepository::new();
        let mut missing = promotion("missing", "2023-12-01", "2023-12-31");
        let err = repo.update(&mut missing).await.unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::PersistenceFailure);
        missing.activate();
        let err = repo.update_active_status(&missing).await.unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::PersistenceFailure);
    }

    #[sqlx::test]
    async fn test_postgres_update_missing(pool: PgPool) -> anyhow::Result<()> {
        let mut missing = promotion("missing", "2023-12-01", "2023-12-31");
        let mut tx = pool.begin().await?;

        let err = tx.update(&mut missing).await.unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::PersistenceFailure);

        missing.activate();
        let err = tx.update_active_status(&missing).await.unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::PersistenceFailure);
        assert!(err.to_string().contains("no longer exists"));
        Ok(())
    }
}
