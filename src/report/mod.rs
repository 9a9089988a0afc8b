pub mod json;
pub mod junit;
pub mod types;

use anyhow::Result;
use colored::Colorize;
use serde_json::Value;
use std::path::Path;

pub use types::{success_rate, RunSummary, TestRecord};

/// Collects test records in execution order and echoes each one as it lands.
#[derive(Debug, Default)]
pub struct Reporter {
    records: Vec<TestRecord>,
}

impl Reporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record and print it immediately.
    pub fn record(
        &mut self,
        name: impl Into<String>,
        success: bool,
        details: impl Into<String>,
        response_data: Option<Value>,
    ) {
        let record = TestRecord {
            name: name.into(),
            success,
            details: details.into(),
            response_data,
        };

        if record.success {
            println!("{} {}", "✅".green(), record.name);
        } else {
            println!("{} {} - {}", "❌".red(), record.name, record.details.red());
        }
        log::debug!("record #{}: {} success={}", self.records.len() + 1, record.name, record.success);

        self.records.push(record);
    }

    pub fn records(&self) -> &[TestRecord] {
        &self.records
    }

    pub fn total(&self) -> u32 {
        self.records.len() as u32
    }

    pub fn passed(&self) -> u32 {
        self.records.iter().filter(|r| r.success).count() as u32
    }

    pub fn failed(&self) -> u32 {
        self.total() - self.passed()
    }

    pub fn success_rate(&self) -> f64 {
        success_rate(self.passed(), self.total())
    }

    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }

    /// Snapshot the records into a run summary.
    pub fn summarize(&self, run_id: &str, backend_url: &str, test_type: &str) -> RunSummary {
        let total = self.total();
        let passed = self.passed();
        RunSummary {
            run_id: run_id.to_string(),
            timestamp: chrono::Local::now().to_rfc3339(),
            backend_url: backend_url.to_string(),
            test_type: test_type.to_string(),
            total,
            passed,
            failed: total - passed,
            success_rate: self.success_rate(),
            records: self.records.clone(),
        }
    }
}

fn format_rate(summary: &RunSummary) -> String {
    if summary.total > 0 {
        format!("{:.1}%", summary.success_rate)
    } else {
        "0%".to_string()
    }
}

/// Plain-text summary with a breakdown of every failed record.
pub fn render_text(summary: &RunSummary, title: &str) -> String {
    let rule = "=".repeat(60);
    let mut out = String::new();
    out.push_str(&format!("{}\n📊 {}\n{}\n", rule, title, rule));
    out.push_str(&format!("Total tests run: {}\n", summary.total));
    out.push_str(&format!("Tests passed: {}\n", summary.passed));
    out.push_str(&format!("Tests failed: {}\n", summary.failed));
    out.push_str(&format!("Success rate: {}\n", format_rate(summary)));

    let failed: Vec<&TestRecord> = summary.failed_records().collect();
    if failed.is_empty() {
        out.push_str("\n✅ ALL TESTS PASSED!\n");
    } else {
        out.push_str(&format!("\n❌ FAILED TESTS ({}):\n", failed.len()));
        for record in failed {
            out.push_str(&format!("  • {}: {}\n", record.name, record.details));
        }
    }
    out
}

/// Print the end-of-run summary to stdout.
pub fn print_summary(summary: &RunSummary, title: &str) {
    let rule = "=".repeat(60);
    println!("\n{}", rule);
    println!("{} {}", "📊".blue(), title.bold());
    println!("{}", rule);
    println!("Total tests run: {}", summary.total);
    println!("Tests passed: {}", summary.passed.to_string().green());
    println!("Tests failed: {}", summary.failed.to_string().red());
    println!("Success rate: {}", format_rate(summary).cyan());

    let failed: Vec<&TestRecord> = summary.failed_records().collect();
    if failed.is_empty() {
        println!("\n{}", "✅ ALL TESTS PASSED!".green().bold());
    } else {
        println!("\n{}", format!("❌ FAILED TESTS ({}):", failed.len()).red().bold());
        for record in failed {
            println!("  • {}: {}", record.name, record.details);
        }
    }
}

/// Title used in summaries for a given test type
pub fn summary_title(test_type: &str) -> String {
    format!("{} TEST SUMMARY", test_type.replace('_', " ").to_uppercase())
}

/// Re-render a saved run summary
pub async fn generate_report(
    results_path: &Path,
    format: &str,
    output: Option<&Path>,
) -> Result<()> {
    let summary = json::read_summary(results_path)?;

    let rendered = match format {
        "json" => json::to_json(&summary)?,
        "junit" => junit::generate_junit_xml(&summary)?,
        "text" => render_text(&summary, &summary_title(&summary.test_type)),
        _ => anyhow::bail!("Unknown format: {}", format),
    };

    if let Some(path) = output {
        std::fs::write(path, rendered)?;
        println!("{} report saved to: {}", format, path.display());
    } else {
        println!("{}", rendered);
    }

    Ok(())
}
