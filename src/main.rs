use anyhow::{Context, Result};
use hsr_seed::{
    cli::{Cli, Commands, SeedArgs},
    config::Settings,
    schema::DependencyResolver,
    seed::{SeedReport, Seeder},
    writer::SqliteWriter,
};
use std::path::Path;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    let settings = Settings::load(cli.config.as_deref()).context("Failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(settings.default_log_filter())),
        )
        .init();

    let db_path = cli.db.clone().unwrap_or_else(|| settings.database.path.clone());

    match cli.command {
        Commands::Migrate => {
            let start = Instant::now();
            let writer = open(&db_path)?;
            let tables = writer.migrate().context("Migration failed")?;
            writer.finalize()?;

            println!(
                "\nMigrated {} tables in {:?} in {:.1}s",
                tables,
                db_path,
                start.elapsed().as_secs_f64()
            );
        }

        Commands::Seed(args) => {
            let start = Instant::now();
            let writer = open(&db_path)?;
            writer.migrate().context("Migration failed")?;

            let report = seed(&writer, &settings, &args)?;
            writer.finalize()?;

            println!(
                "\nSeeded {:?} ({}) in {:.1}s",
                db_path,
                report,
                start.elapsed().as_secs_f64()
            );
        }

        Commands::Fresh(args) => {
            let start = Instant::now();
            let writer = open(&db_path)?;
            writer.drop_all().context("Failed to drop tables")?;
            writer.migrate().context("Migration failed")?;

            let report = seed(&writer, &settings, &args)?;
            writer.finalize()?;

            println!(
                "\nRebuilt {:?} ({} rows: {}) in {:.1}s",
                db_path,
                report.total(),
                report,
                start.elapsed().as_secs_f64()
            );
        }

        Commands::ListTables => {
            let tables = DependencyResolver::new()
                .all_tables_ordered()
                .map_err(anyhow::Error::msg)?;

            println!("Tables in creation order:\n");
            for table in tables {
                println!("  {}", table.name);
            }
        }
    }

    Ok(())
}

fn open(db_path: &Path) -> Result<SqliteWriter> {
    SqliteWriter::open(db_path).with_context(|| format!("Failed to open database: {:?}", db_path))
}

fn seed(writer: &SqliteWriter, settings: &Settings, args: &SeedArgs) -> Result<SeedReport> {
    let mut options = settings.seed_options();
    args.apply(&mut options);

    let data_dir = args.data_dir.clone().unwrap_or_else(|| settings.data_dir());

    Seeder::new(writer, options)
        .run(&data_dir)
        .context("Seeding failed")
}
