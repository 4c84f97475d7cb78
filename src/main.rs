use std::process::ExitCode;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use ozcalc::config::AppConfig;
use ozcalc::core::{
    Calculator, FilingStatus, ProfileDraft, Scenario, format_currency, format_percentage,
};
use ozcalc::wizard::{DEFAULT_HOLD_PERIOD, Estimate, EstimateRequest, run_estimate};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliFilingStatus {
    Single,
    MarriedJoint,
    MarriedSeparate,
}

impl From<CliFilingStatus> for FilingStatus {
    fn from(value: CliFilingStatus) -> Self {
        match value {
            CliFilingStatus::Single => FilingStatus::Single,
            CliFilingStatus::MarriedJoint => FilingStatus::MarriedJoint,
            CliFilingStatus::MarriedSeparate => FilingStatus::MarriedSeparate,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliScenario {
    Conservative,
    Moderate,
    Optimistic,
}

impl From<CliScenario> for Scenario {
    fn from(value: CliScenario) -> Self {
        match value {
            CliScenario::Conservative => Scenario::Conservative,
            CliScenario::Moderate => Scenario::Moderate,
            CliScenario::Optimistic => Scenario::Optimistic,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "ozcalc",
    about = "Opportunity Zone tax savings calculator and lead capture API"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API.
    Serve {
        /// Overrides OZCALC_PORT.
        #[arg(long)]
        port: Option<u16>,
    },
    /// Estimate tax liability and fund benefits for one investor.
    Estimate {
        #[arg(long)]
        gain: f64,
        #[arg(long, help = "Sale date, YYYY-MM-DD")]
        sale_date: NaiveDate,
        #[arg(long, help = "Two-letter state code")]
        state: String,
        #[arg(long, value_enum, default_value_t = CliFilingStatus::Single)]
        filing_status: CliFilingStatus,
        #[arg(long)]
        income: f64,
        #[arg(long, help = "Amount placed in the fund; defaults to the gain")]
        investment: Option<f64>,
        #[arg(long, value_enum, default_value_t = CliScenario::Moderate)]
        scenario: CliScenario,
        #[arg(long, default_value_t = DEFAULT_HOLD_PERIOD)]
        hold: u32,
        #[arg(long, help = "Print the full result as JSON")]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ozcalc=info,tower_http=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve { port } => {
            let mut config = match AppConfig::from_env() {
                Ok(config) => config,
                Err(e) => {
                    tracing::error!(error = %e, "invalid configuration");
                    return ExitCode::FAILURE;
                }
            };
            if let Some(port) = port {
                config.port = port;
            }
            if let Err(e) = ozcalc::api::run_http_server(config).await {
                tracing::error!(error = %e, "server error");
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Command::Estimate {
            gain,
            sale_date,
            state,
            filing_status,
            income,
            investment,
            scenario,
            hold,
            json,
        } => {
            let request = EstimateRequest {
                profile: ProfileDraft {
                    capital_gain_amount: Some(gain),
                    gain_type: None,
                    sale_date: Some(sale_date),
                    state: Some(state),
                    filing_status: Some(filing_status.into()),
                    annual_income: Some(income),
                },
                investment_amount: investment,
                scenario: Some(scenario.into()),
                hold_period: Some(hold),
            };
            let today = Local::now().date_naive();
            let estimate = match run_estimate(Arc::new(Calculator::default()), request, today) {
                Ok(estimate) => estimate,
                Err(e) => {
                    eprintln!("Error: {e}");
                    return ExitCode::FAILURE;
                }
            };

            if json {
                match serde_json::to_string_pretty(&estimate) {
                    Ok(s) => println!("{s}"),
                    Err(e) => {
                        eprintln!("Error: {e}");
                        return ExitCode::FAILURE;
                    }
                }
            } else {
                print_summary(&estimate);
            }
            ExitCode::SUCCESS
        }
    }
}

fn print_summary(estimate: &Estimate) {
    let tax = &estimate.tax_calculation;
    let p = &estimate.projection;
    let c = &estimate.comparison;

    println!("Current tax liability");
    println!("  Federal rate:       {}", format_percentage(tax.federal_rate));
    println!("  State rate:         {}", format_percentage(tax.state_rate));
    println!("  Total tax owed:     {}", format_currency(tax.total_tax_owed));
    println!("  Reinvest by:        {}", tax.deadline_date);
    println!();
    println!(
        "Fund projection ({} years, {:?})",
        p.hold_period, p.scenario
    );
    println!("  Investment:         {}", format_currency(p.investment_amount));
    println!("  Projected value:    {}", format_currency(p.projected_value));
    println!("  Deferred tax:       {}", format_currency(p.deferred_tax));
    println!("  Appreciation saved: {}", format_currency(p.appreciation_tax_saved));
    println!("  Depreciation saved: {}", format_currency(p.depreciation_tax_savings));
    println!("  Stacked benefits:   {}", format_currency(p.total_stacked_benefits));
    println!();
    println!("Net wealth");
    println!("  Without fund:       {}", format_currency(c.without_fund.net_wealth));
    println!("  With fund:          {}", format_currency(c.with_fund.net_wealth));
    println!("  Difference:         {}", format_currency(c.net_wealth_difference));
}
