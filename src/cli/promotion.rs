use std::collections::HashMap;

use sqlx::PgPool;

use crate::{
    factory::promotion::PromotionFactory,
    model::{promotion::Promotion, promotion_filter::PromotionFilter},
    repository::promotion::PromotionRepository,
};

pub async fn seed_promotion(pool: &PgPool, count: u32) -> anyhow::Result<Vec<Promotion>> {
    let mut factory = PromotionFactory::<()>::new();
    factory.generate_many(pool, count, ()).await
}

/// Parse `key=value` pairs into filter parameters; entries without `=` are
/// skipped.
pub fn parse_filter_args(args: &[String]) -> HashMap<String, String> {
    args.iter()
        .filter_map(|arg| arg.split_once('='))
        .map(|(key, val)| (key.trim().to_string(), val.trim().to_string()))
        .collect()
}

pub async fn list_promotion(pool: &PgPool, args: &[String]) -> anyhow::Result<()> {
    let filter = PromotionFilter::from_query(&parse_filter_args(args));
    let mut tx = pool.begin().await?;
    let promotions = tx.find_all(&filter).await?;
    for promotion in promotions.iter() {
        println!("{}", serde_json::to_string(&promotion.serialize())?);
    }
    Ok(())
}
