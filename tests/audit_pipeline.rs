//! End-to-end runs of the audit and rematch commands against a mock LLM.

mod common;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use syllabus_audit_lib::commands::{
    run_audit, run_rematch, AuditRequest, RematchRequest, RunError, TableOverrides,
};
use syllabus_audit_lib::config::{AuditConfig, RetrySettings};
use syllabus_audit_lib::models::MatchResult;
use syllabus_audit_lib::pipeline::llm::{LlmError, MockLlmClient};
use syllabus_audit_lib::reference::ReferenceError;
use syllabus_audit_lib::report::read_records;

const HU_STATEMENT: &str = "Courses in Humanities, Arts and Design examine human expression.";

struct Fixture {
    _dir: tempfile::TempDir,
    root: PathBuf,
    config: AuditConfig,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_path_buf();

        std::fs::create_dir_all(root.join("Map")).unwrap();
        std::fs::write(
            root.join("Map/courses.csv"),
            "Subject,Nbr,Gold Designation\n\
             ABS,130,\"Humanities, Arts and Design (HU)\"\n\
             CIS,105,Quantitative Reasoning (QTR)\n",
        )
        .unwrap();
        std::fs::write(
            root.join("Map/gold_statements.csv"),
            format!("gold_designation,statements\n\"Humanities, Arts and Design\",\"{HU_STATEMENT}\"\n"),
        )
        .unwrap();
        std::fs::create_dir_all(root.join("Data")).unwrap();

        let mut config = AuditConfig::default();
        config.retry = RetrySettings {
            attempts: 3,
            success_delay_ms: 0,
            failure_delay_ms: 0,
        };
        config.paths.course_table = root.join("Map/courses.csv");
        config.paths.statement_table = root.join("Map/gold_statements.csv");
        config.paths.output_dir = root.join("Output");

        Self {
            _dir: dir,
            root,
            config,
        }
    }

    fn add_pdf(&self, name: &str, text: &str) -> PathBuf {
        let path = self.root.join("Data").join(name);
        std::fs::write(&path, common::syllabus_pdf(text)).unwrap();
        path
    }

    fn add_bytes(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.root.join("Data").join(name);
        std::fs::write(&path, bytes).unwrap();
        path
    }

    fn data_dir(&self) -> PathBuf {
        self.root.join("Data")
    }

    fn audit(&self, input: &Path, client: Arc<MockLlmClient>) -> Result<PathBuf, RunError> {
        let report = run_audit(
            &self.config,
            &AuditRequest {
                input: input.to_path_buf(),
                output: None,
                max_files: None,
                tables: TableOverrides::default(),
            },
            client,
        )?;
        Ok(report.output.expect("output written"))
    }
}

fn extraction_json(code: &str, statement: &str) -> String {
    serde_json::json!({
        "file_name": "model-invented-name.pdf",
        "full_title": format!("{code} Course"),
        "course_code": code,
        "course_name": "Course",
        "instructor_name": "Dr. Jane Smith",
        "gold_statement": statement,
        "learning_outcome": ["Analyze.", "Apply."],
    })
    .to_string()
}

/// Answers extraction prompts per file name and judge prompts with "yes".
fn routed_client(routes: Vec<(&'static str, Result<String, ()>)>) -> Arc<MockLlmClient> {
    Arc::new(MockLlmClient::with_handler(move |prompt| {
        if !prompt.contains("<document") {
            return Ok(r#"Verdict: {"match": "yes", "reason": "equivalent"}"#.to_string());
        }
        for (name, answer) in &routes {
            if prompt.contains(&format!("<document name=\"{name}\">")) {
                return answer
                    .clone()
                    .map_err(|_| LlmError::Connection("http://llm.test".into()));
            }
        }
        Ok(extraction_json("NA", "NA"))
    }))
}

#[test]
fn batch_isolation_keeps_siblings_complete() {
    let fixture = Fixture::new();
    fixture.add_pdf("A ABS 130.pdf", "ABS 130 syllabus");
    fixture.add_pdf("B broken.pdf", "broken");
    fixture.add_pdf("C CIS 105.pdf", "CIS 105 syllabus");

    let client = routed_client(vec![
        ("A ABS 130.pdf", Ok(extraction_json("ABS 130", "Some HU statement"))),
        ("B broken.pdf", Err(())),
        ("C CIS 105.pdf", Ok(extraction_json("CIS 105", "Some QTR statement"))),
    ]);

    let output = fixture.audit(&fixture.data_dir(), client.clone()).unwrap();
    assert_eq!(output, fixture.root.join("Output/all_results.csv"));

    let records = read_records(&output).unwrap();
    let names: Vec<_> = records.iter().map(|r| r.file_name.as_str()).collect();
    assert_eq!(names, ["A ABS 130.pdf", "B broken.pdf", "C CIS 105.pdf"]);

    // File names come from the input, never from the model
    assert!(records.iter().all(|r| r.file_name != "model-invented-name.pdf"));

    assert_eq!(records[0].gold_designation, "Humanities, Arts and Design");
    assert_eq!(records[0].match_result, MatchResult::Matched);
    assert_eq!(records[0].learning_outcome_text, "Analyze.\nApply.");

    assert!(records[1].audit_error.is_some());
    assert_eq!(records[1].course_code, "NA");
    assert_eq!(records[1].match_result, MatchResult::NotMatched);

    // No statement registered for QTR, so the judge is never asked
    assert_eq!(records[2].gold_designation, "Quantitative Reasoning");
    assert_eq!(records[2].match_result, MatchResult::NotMatched);
    assert!(records[2].audit_error.is_none());

    // 1 extraction + 1 judge for A, 3 failed attempts for B, 1 extraction for C
    assert_eq!(client.call_count(), 6);
}

#[test]
fn missing_gold_statement_is_not_present_without_judge_call() {
    let fixture = Fixture::new();
    let pdf = fixture.add_pdf("ABS130_Fall.pdf", "No statement here");
    let client = routed_client(vec![(
        "ABS130_Fall.pdf",
        Ok(extraction_json("ABS 130", "NA")),
    )]);

    let output = fixture.audit(&pdf, client.clone()).unwrap();
    assert_eq!(output, fixture.root.join("Output/ABS130_Fall.csv"));

    let records = read_records(&output).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].match_result, MatchResult::NotPresent);
    assert_eq!(client.call_count(), 1);
}

#[test]
fn missing_reference_table_aborts_before_any_call() {
    let mut fixture = Fixture::new();
    fixture.add_pdf("a.pdf", "text");
    fixture.config.paths.statement_table = fixture.root.join("Map/missing.csv");
    let client = routed_client(vec![]);

    let err = fixture.audit(&fixture.data_dir(), client.clone()).unwrap_err();
    assert!(matches!(err, RunError::Reference(ReferenceError::NotFound(_))));
    assert_eq!(client.call_count(), 0);
}

#[test]
fn missing_input_is_fatal() {
    let fixture = Fixture::new();
    let err = fixture
        .audit(&fixture.root.join("nope.pdf"), routed_client(vec![]))
        .unwrap_err();
    assert!(matches!(err, RunError::Input(_)));
}

#[test]
fn empty_folder_writes_nothing() {
    let fixture = Fixture::new();
    let report = run_audit(
        &fixture.config,
        &AuditRequest {
            input: fixture.data_dir(),
            output: None,
            max_files: None,
            tables: TableOverrides::default(),
        },
        routed_client(vec![]),
    )
    .unwrap();

    assert!(report.output.is_none());
    assert_eq!(report.summary.total, 0);
    assert!(!fixture.root.join("Output").exists());
}

#[test]
fn rematch_is_idempotent() {
    let fixture = Fixture::new();
    fixture.add_pdf("abs.pdf", "ABS 130 syllabus");
    let client = routed_client(vec![("abs.pdf", Ok(extraction_json("abs130", "Statement")))]);
    let output = fixture.audit(&fixture.data_dir(), client.clone()).unwrap();
    let audited = read_records(&output).unwrap();

    let request = RematchRequest {
        results: output.clone(),
        output: None,
        tables: TableOverrides::default(),
    };
    run_rematch(&fixture.config, &request, client.clone()).unwrap();
    let first = read_records(&output).unwrap();
    run_rematch(&fixture.config, &request, client).unwrap();
    let second = read_records(&output).unwrap();

    assert_eq!(audited, first);
    assert_eq!(first, second);
    assert_eq!(first[0].gold_designation, "Humanities, Arts and Design");
}

#[test]
fn malformed_pdf_does_not_abort_batch() {
    let fixture = Fixture::new();
    fixture.add_pdf("a_good.pdf", "ABS 130 syllabus");
    fixture.add_bytes("b_bad.pdf", &common::pdf_with_undeclared_font("Gold Statement"));
    fixture.add_pdf("c_good.pdf", "CIS 105 syllabus");

    let client = routed_client(vec![
        ("a_good.pdf", Ok(extraction_json("ABS 130", "Some HU statement"))),
        ("c_good.pdf", Ok(extraction_json("CIS 105", "NA"))),
    ]);

    let output = fixture.audit(&fixture.data_dir(), client).unwrap();
    let records = read_records(&output).unwrap();
    let names: Vec<_> = records.iter().map(|r| r.file_name.as_str()).collect();
    assert_eq!(names, ["a_good.pdf", "b_bad.pdf", "c_good.pdf"]);

    // Unreadable text layer is audited as empty text, not dropped
    assert!(records[1].audit_error.is_none());
    assert_eq!(records[1].match_result, MatchResult::NotPresent);
    assert_eq!(records[0].match_result, MatchResult::Matched);
    assert_eq!(records[2].match_result, MatchResult::NotPresent);
}

#[test]
fn rematch_reads_json_results() {
    let fixture = Fixture::new();
    fixture.add_pdf("abs.pdf", "ABS 130 syllabus");
    let client = routed_client(vec![("abs.pdf", Ok(extraction_json("ABS 130", "Statement")))]);

    let json_output = fixture.root.join("Output/results.json");
    run_audit(
        &fixture.config,
        &AuditRequest {
            input: fixture.data_dir(),
            output: Some(json_output.clone()),
            max_files: None,
            tables: TableOverrides::default(),
        },
        client.clone(),
    )
    .unwrap();

    let report = run_rematch(
        &fixture.config,
        &RematchRequest {
            results: json_output.clone(),
            output: None,
            tables: TableOverrides::default(),
        },
        client,
    )
    .unwrap();

    assert_eq!(report.output.as_deref(), Some(json_output.as_path()));
    assert_eq!(report.summary.matched, 1);
    let records = read_records(&json_output).unwrap();
    assert_eq!(records[0].gold_designation, "Humanities, Arts and Design");
}
