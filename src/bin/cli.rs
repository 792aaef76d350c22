use clap::{Args, Parser, Subcommand};
use promotion_service::{
    cli::{
        db::{db_generate, db_list, db_migrate, db_revert},
        promotion::{list_promotion, seed_promotion},
    },
    core::db::init_pool,
    settings::get_config,
};

#[derive(Parser)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database related command
    Db(DbArgs),
    /// Promotion related command
    Promotion(PromotionArgs),
}

#[derive(Debug, Args)]
struct DbArgs {
    #[command(subcommand)]
    command: DbCommands,
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Generate new migration file
    Generate { migration_name: String },
    /// List all migration
    List,
    /// Run all pending migration
    Migrate,
    /// Revert latest migration
    Revert,
}

#[derive(Debug, Args)]
struct PromotionArgs {
    #[command(subcommand)]
    command: PromotionCommands,
}

#[derive(Debug, Subcommand)]
enum PromotionCommands {
    /// Insert fake promotions
    Seed {
        #[arg(short, long, default_value_t = 10)]
        count: u32,
    },
    /// Print promotions as JSON lines, filtered by key=value pairs
    List {
        #[arg(short, long)]
        filter: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match &cli.command {
        Commands::Db(db_args) => match &db_args.command {
            DbCommands::Generate { migration_name } => {
                println!("generate migration: {migration_name:?}");
                db_generate(migration_name).await?;
            }
            DbCommands::List => {
                println!("list migration");
                let config = get_config()?;
                let pool = init_pool(&config).await?;
                db_list(&pool).await?;
            }
            DbCommands::Migrate => {
                println!("run all pending migration");
                let config = get_config()?;
                println!("run migration on {}", config.database_url);
                let pool = init_pool(&config).await?;
                db_migrate(&pool).await?;
            }
            DbCommands::Revert => {
                println!("revert latest migration");
                let config = get_config()?;
                let pool = init_pool(&config).await?;
                db_revert(&pool).await?;
            }
        },
        Commands::Promotion(promotion_args) => match &promotion_args.command {
            PromotionCommands::Seed { count } => {
                println!("seed {count} promotion");
                let config = get_config()?;
                let pool = init_pool(&config).await?;
                let promotions = seed_promotion(&pool, *count).await?;
                for promotion in promotions.iter() {
                    println!("{} {}", promotion.id, promotion.name);
                }
            }
            PromotionCommands::List { filter } => {
                let config = get_config()?;
                let pool = init_pool(&config).await?;
                list_promotion(&pool, filter).await?;
            }
        },
    }
    Ok(())
}
