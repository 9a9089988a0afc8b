pub mod scenarios;

use colored::Colorize;
use std::path::Path;
use std::str::FromStr;
use uuid::Uuid;

use crate::client::{ApiTransport, HttpDispatcher};
use crate::error::Result;
use crate::identity::{ClockIdentity, IdentityGenerator};
use crate::report::{self, RunSummary};
use crate::utils::config::HarnessConfig;

pub use scenarios::ScenarioRunner;

/// Report `test_type` of the full plan-limit suite
pub const DOCUMENT_ANALYSIS_SUITE: &str = "document_analysis_error_handling";
/// Report `test_type` of the premium-only suite
pub const PREMIUM_SUITE: &str = "premium_account";

/// Independently selectable scenario groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    /// Free account: one analysis allowed, the second rejected
    FreeAnalysis,
    /// Free account: project uploads up to and past the limit
    ProjectUpload,
    /// Premium account: repeated analyses never rejected
    Premium,
}

impl Scenario {
    pub fn all() -> Vec<Scenario> {
        vec![Scenario::FreeAnalysis, Scenario::ProjectUpload, Scenario::Premium]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Scenario::FreeAnalysis => "free-analysis",
            Scenario::ProjectUpload => "project-upload",
            Scenario::Premium => "premium",
        }
    }
}

impl FromStr for Scenario {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "free-analysis" | "analysis" => Ok(Scenario::FreeAnalysis),
            "project-upload" | "upload" => Ok(Scenario::ProjectUpload),
            "premium" => Ok(Scenario::Premium),
            other => Err(format!(
                "Unknown scenario '{}'. Available: free-analysis, project-upload, premium",
                other
            )),
        }
    }
}

/// What to run and how to label it in the report.
#[derive(Debug, Clone)]
pub struct SuitePlan {
    pub scenarios: Vec<Scenario>,
    pub test_type: String,
    pub headline: String,
}

impl SuitePlan {
    pub fn full(scenarios: Option<Vec<Scenario>>) -> Self {
        Self {
            scenarios: scenarios.unwrap_or_else(Scenario::all),
            test_type: DOCUMENT_ANALYSIS_SUITE.to_string(),
            headline: "Testing Document Analysis Error Handling Fix".to_string(),
        }
    }

    pub fn premium() -> Self {
        Self {
            scenarios: vec![Scenario::Premium],
            test_type: PREMIUM_SUITE.to_string(),
            headline: "Testing Premium Account Functionality".to_string(),
        }
    }
}

/// Run a suite against any transport and return its summary. Nothing is
/// written to disk.
pub async fn execute(
    transport: &dyn ApiTransport,
    identity: &dyn IdentityGenerator,
    config: &HarnessConfig,
    plan: &SuitePlan,
) -> RunSummary {
    let run_id = Uuid::new_v4().to_string();

    println!("{} {}", "🚀".green(), plan.headline.bold());
    println!("{} Testing against: {}", "🔗".blue(), config.base_url.cyan());
    println!("{}", "=".repeat(60));
    log::info!(
        "run {} scenarios: {}",
        run_id,
        plan.scenarios.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(", ")
    );

    let mut runner = ScenarioRunner::new(transport, identity, config);
    runner.run(&plan.scenarios).await;

    let summary = runner
        .reporter()
        .summarize(&run_id, &config.base_url, &plan.test_type);
    report::print_summary(&summary, &report::summary_title(&plan.test_type));
    summary
}

/// Run a suite over HTTP and write the JSON report (and optionally JUnit).
pub async fn run_suite(
    config: &HarnessConfig,
    plan: &SuitePlan,
    junit_path: Option<&Path>,
) -> anyhow::Result<RunSummary> {
    config.validate()?;
    let dispatcher = HttpDispatcher::new(config)?;

    let summary = execute(&dispatcher, &ClockIdentity, config, plan).await;

    write_reports(&summary, &config.report_path, junit_path)?;
    Ok(summary)
}

fn write_reports(summary: &RunSummary, json_path: &Path, junit_path: Option<&Path>) -> Result<()> {
    report::json::write_summary(summary, json_path)?;
    println!("\n{} Results saved to: {}", "💾".blue(), json_path.display());

    if let Some(path) = junit_path {
        if let Err(e) = report::junit::write_report(summary, path) {
            // The JSON report is the primary artifact; a JUnit failure is not fatal
            log::error!("Failed to write JUnit report {}: {:#}", path.display(), e);
        } else {
            println!("{} JUnit report saved to: {}", "💾".blue(), path.display());
        }
    }
    Ok(())
}
