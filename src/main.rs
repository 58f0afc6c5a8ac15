use anyhow::{anyhow, Context};
use clap::Parser;
use disudata::config::cli::Command;
use disudata::core::validator::validate_phone;
use disudata::utils::error::ErrorSeverity;
use disudata::utils::{logger, validation::Validate};
use disudata::{
    Cli, GatewayConfig, HttpBillingGateway, Network, PlanCatalog, PlanLoad, PurchaseFlow,
    TomlConfig, VtuError,
};

struct Settings {
    gateway: GatewayConfig,
    log_level: Option<String>,
    json_logs: bool,
}

fn load_settings(cli: &Cli) -> anyhow::Result<Settings> {
    match &cli.config {
        Some(path) => {
            let file = TomlConfig::from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            Ok(Settings {
                log_level: file.log_level().map(str::to_string),
                json_logs: file.json_logs(),
                gateway: file.gateway,
            })
        }
        None => Ok(Settings {
            gateway: GatewayConfig::from_env()?,
            log_level: None,
            json_logs: false,
        }),
    }
}

fn init_logging(cli: &Cli, settings: Option<&Settings>) {
    let level = settings.and_then(|s| s.log_level.as_deref());
    if cli.json_logs || settings.is_some_and(|s| s.json_logs) {
        logger::init_json_logger(cli.verbose, level);
    } else {
        logger::init_cli_logger(cli.verbose, level);
    }
}

fn parse_network(raw: &str) -> anyhow::Result<Network> {
    Ok(raw.parse::<Network>().map_err(VtuError::from)?)
}

/// Gateway for the subcommands that talk to the provider.
fn connect(settings: Option<anyhow::Result<Settings>>) -> anyhow::Result<HttpBillingGateway> {
    let settings = settings.context("Configuration was not loaded")??;
    settings.gateway.validate()?;
    Ok(HttpBillingGateway::new(&settings.gateway))
}

/// Runs one subcommand. Returns the process exit code for outcomes that are not errors.
async fn run(command: Command, settings: Option<anyhow::Result<Settings>>) -> anyhow::Result<i32> {
    match command {
        Command::Networks => {
            print_networks();
            Ok(0)
        }
        Command::Plans { network } => {
            let network = parse_network(&network)?;
            let catalog = PlanCatalog::new(connect(settings)?)
                .resolve(network)
                .await
                .map_err(VtuError::from)?;

            println!("📶 {} data plans:", network.display_name());
            for plan in catalog.plans() {
                println!("  [{}] {}", plan.id, plan);
            }
            Ok(0)
        }
        Command::Buy {
            phone,
            network,
            plan,
        } => {
            let network = parse_network(&network)?;
            // Reject a bad number before touching the provider.
            validate_phone(&phone).map_err(VtuError::from)?;

            let flow = PurchaseFlow::new(connect(settings)?);
            match flow.select_network(network).await? {
                PlanLoad::Ready(catalog) => {
                    tracing::debug!("📂 {} plans on offer for {}", catalog.len(), network);
                }
                PlanLoad::Failed(reason) => return Err(VtuError::from(reason).into()),
                PlanLoad::Superseded => return Err(anyhow!("Plan lookup for {} was superseded", network)),
            }

            let request = flow.validate_and_build_request(&phone, &plan).await?;
            tracing::info!("💳 Buying plan {} on {}", request.plan_id(), network);

            let outcome = flow.submit(request).await?;
            if outcome.succeeded() {
                println!("✅ {}", outcome.message());
                if let Some(reference) = outcome.reference() {
                    println!("🧾 Reference: {}", reference);
                }
                if let Some(amount) = outcome.amount() {
                    println!("💰 Amount: ₦{}", amount);
                }
                Ok(0)
            } else {
                eprintln!("❌ {}", outcome.message());
                Ok(1)
            }
        }
    }
}

fn print_networks() {
    for network in Network::ALL {
        println!("{:<10} {}", network.as_str(), network.display_name());
    }
}

fn exit_code(severity: ErrorSeverity) -> i32 {
    match severity {
        ErrorSeverity::Low => 0,      // reported, nothing to retry
        ErrorSeverity::Medium => 2,   // upstream, retryable
        ErrorSeverity::High => 1,     // bad input or flow misuse
        ErrorSeverity::Critical => 3, // configuration or system
    }
}

/// A purchase that did not happen is never a zero exit, even for low-severity errors.
fn error_exit_code(err: &VtuError, buying: bool) -> i32 {
    match exit_code(err.severity()) {
        0 if buying => 1,
        code => code,
    }
}

fn report(err: &anyhow::Error, buying: bool) -> i32 {
    match err.downcast_ref::<VtuError>() {
        Some(e) => {
            tracing::error!(
                "❌ {:#} (Category: {:?}, Severity: {:?})",
                err,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            error_exit_code(e, buying)
        }
        None => {
            tracing::error!("❌ {:#}", err);
            eprintln!("❌ {:#}", err);
            1
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // `networks` is static and needs no configuration.
    let settings = match cli.command {
        Command::Networks => None,
        _ => Some(load_settings(&cli)),
    };
    init_logging(&cli, settings.as_ref().and_then(|s| s.as_ref().ok()));

    tracing::info!("Starting disudata CLI");
    if cli.verbose {
        if let Some(Ok(settings)) = &settings {
            tracing::debug!("Gateway config: {:?}", settings.gateway);
        }
    }

    let buying = matches!(cli.command, Command::Buy { .. });
    let code = match run(cli.command, settings).await {
        Ok(code) => code,
        Err(e) => report(&e, buying),
    };

    if code > 0 {
        std::process::exit(code);
    }
}
