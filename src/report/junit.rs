use super::types::{RunSummary, TestRecord};
use anyhow::Result;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Cursor;
use std::path::Path;

/// Generate JUnit XML report string from a run summary
pub fn generate_junit_xml(summary: &RunSummary) -> Result<String> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let total = summary.total.to_string();
    let failures = summary.failed.to_string();

    // <testsuites>
    let mut suites_start = BytesStart::new("testsuites");
    suites_start.push_attribute(("name", "quota-tester-run"));
    suites_start.push_attribute(("tests", total.as_str()));
    suites_start.push_attribute(("failures", failures.as_str()));
    suites_start.push_attribute(("skipped", "0"));
    writer.write_event(Event::Start(suites_start))?;

    // One suite per run; records keep execution order
    let mut suite_start = BytesStart::new("testsuite");
    suite_start.push_attribute(("name", summary.test_type.as_str()));
    suite_start.push_attribute(("tests", total.as_str()));
    suite_start.push_attribute(("failures", failures.as_str()));
    suite_start.push_attribute(("skipped", "0"));
    suite_start.push_attribute(("id", summary.run_id.as_str()));
    suite_start.push_attribute(("hostname", summary.backend_url.as_str()));
    suite_start.push_attribute(("timestamp", summary.timestamp.as_str()));
    writer.write_event(Event::Start(suite_start))?;

    for record in &summary.records {
        write_test_case(&mut writer, &summary.test_type, record)?;
    }

    writer.write_event(Event::End(BytesEnd::new("testsuite")))?;
    writer.write_event(Event::End(BytesEnd::new("testsuites")))?;

    let result = writer.into_inner().into_inner();
    let xml = String::from_utf8(result)?;
    Ok(xml)
}

fn write_test_case<W: std::io::Write>(
    writer: &mut Writer<W>,
    classname: &str,
    record: &TestRecord,
) -> Result<()> {
    let mut case_start = BytesStart::new("testcase");
    case_start.push_attribute(("name", record.name.as_str()));
    case_start.push_attribute(("classname", classname));
    writer.write_event(Event::Start(case_start))?;

    if !record.success {
        let mut fail_start = BytesStart::new("failure");
        fail_start.push_attribute(("message", record.details.as_str()));
        fail_start.push_attribute(("type", "AssertionError"));
        writer.write_event(Event::Start(fail_start))?;

        if let Some(data) = &record.response_data {
            let body = serde_json::to_string_pretty(data)?;
            writer.write_event(Event::Text(BytesText::new(&body)))?;
        }

        writer.write_event(Event::End(BytesEnd::new("failure")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("testcase")))?;
    Ok(())
}

/// Write report to file
pub fn write_report(summary: &RunSummary, path: &Path) -> Result<()> {
    let xml = generate_junit_xml(summary)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, xml)?;
    log::info!("JUnit report written to {}", path.display());
    Ok(())
}
