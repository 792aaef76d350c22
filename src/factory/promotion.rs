use chrono::{DateTime, Duration, SubsecRound, TimeZone, Utc};
use fake::{
    faker::{chrono::en::DateTimeBetween, lorem::en::Sentence, lorem::en::Word},
    Dummy, Fake, Faker,
};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{model::promotion::Promotion, repository::promotion::PromotionRepository};

pub const PROMOTION_DURATION_DAYS: i64 = 30;

pub struct PromotionFactory<T: Clone> {
    modifier_one: fn(x: &Promotion, ext: T) -> Promotion,
    modifier_many: fn(x: &Promotion, idx: usize, ext: T) -> Promotion,
}

impl<T: Clone> Default for PromotionFactory<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> PromotionFactory<T> {
    pub fn new() -> Self {
        Self {
            modifier_one: |x, _| x.clone(),
            modifier_many: |x, _, _| x.clone(),
        }
    }

    pub fn modified_one(&mut self, modifier: fn(x: &Promotion, ext: T) -> Promotion) {
        self.modifier_one = modifier
    }

    pub fn modified_many(&mut self, modifier: fn(x: &Promotion, idx: usize, ext: T) -> Promotion) {
        self.modifier_many = modifier
    }

    /// Build one promotion without touching the database.
    pub fn build_one(&self, ext: T) -> Promotion {
        (self.modifier_one)(&PromotionDummy::generate(), ext)
    }

    /// Build `num` promotions without touching the database.
    pub fn build_many(&self, num: u32, ext: T) -> Vec<Promotion> {
        (0..num as usize)
            .map(|idx| (self.modifier_many)(&PromotionDummy::generate(), idx, ext.clone()))
            .collect()
    }

    pub async fn generate_one(&mut self, db: &PgPool, ext: T) -> anyhow::Result<Promotion> {
        let data = self.build_one(ext);
        let mut tx = db.begin().await?;
        tx.create(&data).await?;
        tx.commit().await?;
        Ok(data)
    }

    pub async fn generate_many(
        &mut self,
        db: &PgPool,
        num: u32,
        ext: T,
    ) -> anyhow::Result<Vec<Promotion>> {
        let result = self.build_many(num, ext);
        let mut tx = db.begin().await?;
        for item in result.iter() {
            tx.create(item).await?;
        }
        tx.commit().await?;
        Ok(result)
    }
}

#[derive(Debug, Dummy, Clone)]
struct PromotionDummy {
    pub id: Uuid,
    #[dummy(faker = "Word()")]
    pub name: String,
    #[dummy(faker = "Sentence(3..8)")]
    pub description: String,
    pub active_status: bool,
    pub created_by: Uuid,
    pub updated_by: Uuid,
}

impl PromotionDummy {
    fn generate() -> Promotion {
        let dummy = Faker.fake::<PromotionDummy>();
        let start_date = random_datetime();
        let end_date = start_date + Duration::days(PROMOTION_DURATION_DAYS);
        let created_at = random_past_datetime();
        Promotion {
            id: dummy.id,
            name: dummy.name,
            description: Some(dummy.description),
            start_date: start_date.fixed_offset(),
            end_date: end_date.fixed_offset(),
            active_status: dummy.active_status,
            created_by: dummy.created_by,
            updated_by: dummy.updated_by,
            created_at: created_at.fixed_offset(),
            updated_at: created_at.fixed_offset(),
            product_ids: Some((0..3).map(|_| Uuid::new_v4().to_string()).collect()),
            extra: Some(json!({
                "promotion_type": "description",
                "value": null,
            })),
        }
    }
}

/// Random instant in 2020..2030, truncated to the precision Postgres stores.
fn random_datetime() -> DateTime<Utc> {
    let from = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    let to = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
    DateTimeBetween(from, to)
        .fake::<DateTime<Utc>>()
        .trunc_subsecs(6)
}

/// Random instant between 2020 and now, so later writes always move `updated_at` forward.
fn random_past_datetime() -> DateTime<Utc> {
    let from = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    DateTimeBetween(from, Utc::now() - Duration::days(1))
        .fake::<DateTime<Utc>>()
        .trunc_subsecs(6)
}
