use std::collections::BTreeSet;

use sqlx::{migrate::Migrate, PgPool};
use tokio::process::Command;

use crate::core::db::MIGRATOR;

pub async fn db_generate(migration_name: &str) -> anyhow::Result<()> {
    let status = Command::new("sqlx")
        .arg("migrate")
        .arg("add")
        .arg(migration_name)
        .arg("-r")
        .status()
        .await?;
    if !status.success() {
        anyhow::bail!("sqlx migrate add exited with {}", status);
    }
    Ok(())
}

async fn applied_versions(pool: &PgPool) -> anyhow::Result<BTreeSet<i64>> {
    let mut conn = pool.acquire().await?;
    conn.ensure_migrations_table().await?;
    let applied = conn
        .list_applied_migrations()
        .await?
        .into_iter()
        .map(|x| x.version)
        .collect();
    Ok(applied)
}

pub async fn db_list(pool: &PgPool) -> anyhow::Result<()> {
    let applied = applied_versions(pool).await?;
    for migration in MIGRATOR.iter() {
        if migration.migration_type.is_down_migration() {
            continue;
        }
        let status = if applied.contains(&migration.version) {
            "applied"
        } else {
            "pending"
        };
        println!(
            "{} {} ({})",
            migration.version, migration.description, status
        );
    }
    Ok(())
}

pub async fn db_migrate(pool: &PgPool) -> anyhow::Result<()> {
    MIGRATOR.run(pool).await?;
    Ok(())
}

/// Undo the most recently applied migration only.
pub async fn db_revert(pool: &PgPool) -> anyhow::Result<()> {
    let applied = applied_versions(pool).await?;
    let mut versions = applied.iter().rev();
    let Some(latest) = versions.next() else {
        println!("no migration to revert");
        return Ok(());
    };
    let target = versions.next().copied().unwrap_or(0);
    println!("revert migration {}", latest);
    MIGRATOR.undo(pool, target).await?;
    Ok(())
}
