use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use quota_tester::report;
use quota_tester::runner::{self, Scenario, SuitePlan};
use quota_tester::utils::config::HarnessConfig;
use quota_tester::utils::document::TestDocument;

#[derive(Parser)]
#[command(name = "quota-tester")]
#[command(version)]
#[command(about = "Plan-limit integration testing CLI for REST backends", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the plan-limit suite (free analysis, project upload, premium)
    Run {
        #[command(flatten)]
        connection: ConnectionArgs,

        /// Scenarios to run (comma-separated: free-analysis, project-upload, premium)
        #[arg(short, long, value_delimiter = ',')]
        scenario: Option<Vec<Scenario>>,

        /// Also write a JUnit XML report
        #[arg(long)]
        junit: Option<PathBuf>,
    },

    /// Run only the premium account scenario
    Premium {
        #[command(flatten)]
        connection: ConnectionArgs,

        /// Also write a JUnit XML report
        #[arg(long)]
        junit: Option<PathBuf>,
    },

    /// Render a saved results file
    Report {
        /// Path to results JSON
        results: PathBuf,

        /// Output format (json, junit, text)
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write the default configuration as YAML
    InitConfig {
        /// Output file path (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
struct ConnectionArgs {
    /// YAML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend root URL (without the /api prefix)
    #[arg(short, long)]
    base_url: Option<String>,

    /// Test document attached to analyses and uploads
    #[arg(short, long)]
    document: Option<PathBuf>,

    /// Create a sample test document if none exists
    #[arg(long, default_value = "false")]
    create_document: bool,

    /// Results JSON path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Premium fixture email
    #[arg(long)]
    premium_email: Option<String>,

    /// Premium fixture password
    #[arg(long)]
    premium_password: Option<String>,

    /// Do not register an account when the premium login fails
    #[arg(long, default_value = "false")]
    no_register_fallback: bool,

    /// Per-request timeout in seconds
    #[arg(short, long)]
    timeout: Option<u64>,
}

impl ConnectionArgs {
    /// Config file (or defaults) with command-line overrides applied.
    fn resolve(&self) -> anyhow::Result<HarnessConfig> {
        let mut config = match &self.config {
            Some(path) => HarnessConfig::load(path)?,
            None => HarnessConfig::default(),
        };

        if let Some(url) = &self.base_url {
            config.base_url = url.clone();
        }
        if let Some(document) = &self.document {
            config.document_path = document.clone();
        }
        if let Some(output) = &self.output {
            config.report_path = output.clone();
        }
        if let Some(email) = &self.premium_email {
            config.premium.email = email.clone();
        }
        if let Some(password) = &self.premium_password {
            config.premium.password = password.clone();
        }
        if self.no_register_fallback {
            config.premium.register_fallback = false;
        }
        if let Some(timeout) = self.timeout {
            config.request_timeout_secs = timeout;
        }

        config.validate()?;
        Ok(config)
    }

    fn prepare_document(&self, config: &HarnessConfig) -> anyhow::Result<()> {
        if !self.create_document {
            return Ok(());
        }
        let document = TestDocument::new(&config.document_path);
        if document.ensure_exists()? {
            println!(
                "{} Created sample test document: {}",
                "📝".to_string().blue(),
                document.path().display()
            );
        }
        Ok(())
    }
}

async fn run_plan(
    connection: &ConnectionArgs,
    plan: SuitePlan,
    junit: Option<PathBuf>,
) -> anyhow::Result<bool> {
    let config = connection.resolve()?;
    connection.prepare_document(&config)?;

    let summary = runner::run_suite(&config, &plan, junit.as_deref()).await?;
    Ok(summary.all_passed())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            connection,
            scenario,
            junit,
        } => {
            let passed = run_plan(&connection, SuitePlan::full(scenario), junit).await?;
            if !passed {
                std::process::exit(1);
            }
        }

        Commands::Premium { connection, junit } => {
            let passed = run_plan(&connection, SuitePlan::premium(), junit).await?;
            if !passed {
                std::process::exit(1);
            }
        }

        Commands::Report {
            results,
            format,
            output,
        } => {
            println!(
                "{} Generating {} report from: {}",
                "📊".to_string().blue(),
                format.cyan(),
                results.display()
            );
            report::generate_report(&results, &format, output.as_deref()).await?;
        }

        Commands::InitConfig { output } => {
            let yaml = HarnessConfig::default().to_yaml()?;
            match output {
                Some(path) => {
                    std::fs::write(&path, yaml)?;
                    println!("Config written to: {}", path.display());
                }
                None => print!("{}", yaml),
            }
        }
    }

    Ok(())
}
