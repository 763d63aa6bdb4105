use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chrono::Utc;
use drydock::{analytics, api, fleet::Fleet, notify};

#[derive(Parser)]
#[command(name = "drydock")]
#[command(about = "Fleet maintenance record keeper")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the Drydock server
    Serve {
        /// Port for HTTP API
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },
    /// Insert the demo fleet (no-op if ships already exist)
    Seed,
    /// Print current maintenance alerts
    Alerts,
    /// Print dashboard counts
    Stats,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "drydock=debug,tower_http=debug".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn serve(port: u16) -> anyhow::Result<()> {
    tracing::info!("Starting Drydock server on port {}", port);

    let fleet = Fleet::open_default()?;
    let app = api::create_router(fleet);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    tracing::info!("Drydock server listening on http://127.0.0.1:{}", port);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Some(Commands::Serve { port }) => serve(port).await?,
        Some(Commands::Seed) => {
            let fleet = Fleet::open_default()?;
            if fleet.seed_demo()? {
                println!("Seeded demo fleet");
            } else {
                println!("Ships already exist, nothing seeded");
            }
        }
        Some(Commands::Alerts) => {
            let fleet = Fleet::open_default()?;
            let alerts = notify::derive_alerts(
                &fleet.jobs.list(),
                &fleet.ships.list(),
                &fleet.components.list(),
                Utc::now(),
            );
            if alerts.is_empty() {
                println!("No maintenance alerts");
            }
            for alert in alerts {
                println!("[{}] {}", alert.priority.as_str(), alert.message);
            }
        }
        Some(Commands::Stats) => {
            let fleet = Fleet::open_default()?;
            let kpis = analytics::kpi_counts(
                &fleet.users.list(),
                &fleet.ships.list(),
                &fleet.components.list(),
                &fleet.jobs.list(),
            );
            let breakdown = analytics::jobs_by_status(&fleet.jobs.list());
            println!(
                "ships: {}  components: {}  jobs: {}  users: {}",
                kpis.ship_count, kpis.component_count, kpis.job_count, kpis.user_count
            );
            println!(
                "jobs by status: open {}  in progress {}  completed {}",
                breakdown.open, breakdown.in_progress, breakdown.completed
            );
        }
        None => serve(3000).await?,
    }

    Ok(())
}
