//! Command-line front end for the mutual-fund admin service and the local
//! fallback store.
//!
//! # Usage
//!
//! ```sh
//! export MF_ADMIN_API_BASE_URL="http://localhost:8080"
//! cargo run --bin mf-admin --features cli -- schemes --search flexi
//! cargo run --bin mf-admin --features cli -- console "fund:HDFC Flexi,amc:HDFC AMC,aum:12000"
//! ```
//!
//! A `.env` file in the working directory is loaded first.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use mf_admin::console::{Console, Created};
use mf_admin::constants::DEFAULT_PAGE_SIZE;
use mf_admin::screens::data_loader::DataLoader;
use mf_admin::screens::fund_houses::FundHousesScreen;
use mf_admin::screens::funds::FundsScreen;
use mf_admin::screens::migration::MigrationScreen;
use mf_admin::screens::scheme_detail::SchemeDetailScreen;
use mf_admin::screens::schemes::{LocalSchemesScreen, SchemesScreen};
use mf_admin::store::{LocalStore, ReferenceRepository};
use mf_admin::types::scheme::{SchemeApiItem, SchemePageQuery};
use mf_admin::{AdminClient, AdminConfig, AdminError};

#[derive(Debug, Parser)]
#[command(name = "mf-admin", version, about = "Mutual fund reference data admin console")]
struct Cli {
    /// Admin service base URL (overrides MF_ADMIN_API_BASE_URL).
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Local store directory (overrides MF_ADMIN_DATA_DIR).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List every fund house.
    FundHouses,
    /// Show the raw scheme records of a fund house by AMFI id.
    AmfiSchemes { amfi_id: String },
    /// Browse the remote scheme list.
    Schemes {
        /// Zero-based page.
        #[arg(long, default_value_t = 0)]
        page: u32,
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        size: u32,
        #[arg(long)]
        fund_house: Option<String>,
        #[arg(long)]
        search: Option<String>,
    },
    /// Show overview, plan options and transaction rules of a scheme.
    Detail {
        scheme_id: i64,
        /// Scheme name shown when no overview exists.
        #[arg(long, default_value = "")]
        name: String,
    },
    /// Browse grouped schemes awaiting migration.
    Migration {
        /// Zero-based page.
        #[arg(long, default_value_t = 0)]
        page: u32,
        /// One of 5, 10 or 20.
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        size: u32,
    },
    /// Ask the service to load its scheme CSV.
    LoadCsv,
    /// Migrate every NAV option of a scheme by name.
    Migrate { scheme_name: String },
    /// List locally stored funds.
    Funds {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// List locally stored schemes.
    LocalSchemes {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Delete a local fund and its schemes.
    DeleteFund { id: String },
    /// Remove every locally stored fund and scheme.
    Clear,
    /// Run a console instruction against the local store.
    Console { instruction: String },
    /// Import funds and schemes from a .json or .csv file.
    Import { file: PathBuf },
}

#[tokio::main]
async fn main() -> mf_admin::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = AdminConfig::from_env()?;
    if let Some(url) = cli.base_url {
        config = config.with_api_base_url(url);
    }
    if let Some(dir) = cli.data_dir {
        config = config.with_data_dir(dir);
    }

    let client = AdminClient::from_config(&config)?;
    let repo: Arc<dyn ReferenceRepository> = Arc::new(LocalStore::from_config(&config));

    match cli.command {
        Command::FundHouses => {
            let screen = FundHousesScreen::open(client).await;
            print!("{}", screen.view());
        }
        Command::AmfiSchemes { amfi_id } => {
            let records = client.get_schemes_by_amfi(&amfi_id).await;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        Command::Schemes {
            page,
            size,
            fund_house,
            search,
        } => {
            let mut query = SchemePageQuery::new(page, size);
            query.fund_house_id = fund_house;
            query.search = search;
            let mut screen = SchemesScreen::with_query(client, query)?;
            screen.refresh().await;
            print!("{}", screen.view());
            println!("{}", screen.pager());
        }
        Command::Detail { scheme_id, name } => {
            let item = SchemeApiItem {
                id: scheme_id,
                name,
                amfi_id: None,
            };
            let screen = SchemeDetailScreen::open(client, item).await;
            if screen.overview().is_none() {
                println!("No overview available for scheme {scheme_id}.");
            }
            for (label, value) in screen.overview_fields() {
                println!("{label:<24} {value}");
            }
            println!("\nPlan options");
            print!("{}", screen.plan_view());
            println!("\nTransaction rules");
            print!("{}", screen.rule_view());
        }
        Command::Migration { page, size } => {
            let mut screen = MigrationScreen::with_page(client, page, size)?;
            screen.refresh().await;
            print!("{}", screen.view());
            println!("{}  (total schemes: {})", screen.pager(), screen.total_count());
        }
        Command::LoadCsv => {
            let mut screen = MigrationScreen::new(client);
            let loaded = screen.load_csv().await;
            println!("CSV load {}", if loaded { "triggered" } else { "failed" });
            print!("{}", screen.view());
        }
        Command::Migrate { scheme_name } => {
            let screen = MigrationScreen::new(client);
            let migrated = screen.migrate(&scheme_name, &scheme_name).await?;
            println!(
                "{scheme_name}: {}",
                if migrated { "migrated" } else { "migration failed" }
            );
        }
        Command::Funds { page } => {
            let mut screen = FundsScreen::new(repo);
            screen.set_page(page).await?;
            print!("{}", screen.view());
        }
        Command::LocalSchemes { page } => {
            let mut screen = LocalSchemesScreen::new(repo);
            screen.set_page(page).await?;
            print!("{}", screen.view());
        }
        Command::DeleteFund { id } => {
            repo.delete_fund(&id).await?;
            println!("Deleted fund {id} and its schemes.");
        }
        Command::Clear => {
            repo.clear_all_data().await?;
            println!("Local data cleared.");
        }
        Command::Console { instruction } => {
            let report = Console::new(repo).run(&instruction).await?;
            for created in &report.created {
                match created {
                    Created::Fund(fund) => println!("+ fund   {} {}", fund.id, fund.name),
                    Created::Scheme(scheme) => println!("+ scheme {} {}", scheme.id, scheme.name),
                }
            }
            println!("{report}");
            if let Some(err) = report.failure {
                return Err(err);
            }
        }
        Command::Import { file } => {
            let loader = DataLoader::new(repo);
            let report = loader
                .import_file(&file, |progress| {
                    tracing::debug!(
                        processed = progress.processed,
                        total = progress.total,
                        "{}%",
                        progress.percent()
                    );
                })
                .await?;
            for error in &report.errors {
                eprintln!("  {error}");
            }
            println!("Imported: {} succeeded, {} failed", report.success, report.failed);
            if report.failed > 0 && report.success == 0 {
                return Err(AdminError::Validation("nothing could be imported".into()));
            }
        }
    }

    Ok(())
}
