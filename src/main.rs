use clap::Parser;
use ion_prefixlist::core::grouper;
use ion_prefixlist::utils::logger;
use ion_prefixlist::{CliConfig, PlatformClient, Reconciler, SaseClient, Settings};

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.debug);

    tracing::info!("Starting ion-prefixlist");
    if config.debug {
        tracing::debug!("CLI config: {:?}", config);
    }

    // The CSV is parsed and validated in full before any API call, so a
    // structural error can never leave a tenant half-applied.
    let definitions = match grouper::load_definitions(&config.csv_filepath) {
        Ok(definitions) => definitions,
        Err(e) => {
            tracing::error!("Failed to load '{}': {}", config.csv_filepath.display(), e);
            eprintln!("❌ {}: {}", config.csv_filepath.display(), e);
            std::process::exit(1);
        }
    };
    tracing::info!(
        "Parsed {} prefix list definition(s) from '{}'",
        definitions.len(),
        config.csv_filepath.display()
    );

    let settings = match Settings::load(&config.settings) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("Credentials not configured: {}", e);
            eprintln!("❌ {}", e);
            eprintln!(
                "💡 Provide '{}' or set PRISMASASE_CLIENT_ID / PRISMASASE_CLIENT_SECRET / PRISMASASE_TSG_ID",
                config.settings.display()
            );
            std::process::exit(1);
        }
    };

    let client = match SaseClient::new(settings) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Attempting to log in...");
    if let Err(e) = client.login().await {
        tracing::error!("Login failed: {}", e);
        eprintln!("❌ {}", e);
        eprintln!("💡 Check the client id, client secret and tsg id");
        std::process::exit(1);
    }

    let reconciler = Reconciler::new(&client);
    let report = reconciler.apply_all(&definitions).await;

    if report.is_clean() {
        println!(
            "✅ Applied {} definition(s): {} created, {} updated",
            definitions.len(),
            report.created,
            report.updated
        );
    } else {
        println!(
            "Applied what was reachable: {} created, {} updated",
            report.created, report.updated
        );
        eprintln!("❌ {} target(s) failed:", report.failures.len());
        for failure in &report.failures {
            eprintln!("  - {}", failure);
        }
        std::process::exit(2);
    }
}
