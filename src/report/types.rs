use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One assertion made during a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestRecord {
    pub name: String,
    pub success: bool,
    pub details: String,
    pub response_data: Option<Value>,
}

/// Everything written to the report file at the end of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    #[serde(default)]
    pub run_id: String,
    pub timestamp: String,
    pub backend_url: String,
    pub test_type: String,
    #[serde(rename = "total_tests")]
    pub total: u32,
    #[serde(rename = "passed_tests")]
    pub passed: u32,
    #[serde(rename = "failed_tests")]
    pub failed: u32,
    pub success_rate: f64,
    #[serde(rename = "test_details")]
    pub records: Vec<TestRecord>,
}

impl RunSummary {
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    pub fn failed_records(&self) -> impl Iterator<Item = &TestRecord> {
        self.records.iter().filter(|r| !r.success)
    }
}

/// Percentage of passed records; 0 when nothing ran.
pub fn success_rate(passed: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        passed as f64 / total as f64 * 100.0
    }
}
