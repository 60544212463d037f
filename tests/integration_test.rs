use std::fs;
use std::path::Path;
use std::process::Command;

fn cargo_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_bubble-sheet"))
}

fn output_dir() -> &'static Path {
    Path::new("tests/output")
}

fn setup() {
    fs::create_dir_all(output_dir()).expect("Failed to create output directory");
}

fn cleanup_file(name: &str) {
    let path = output_dir().join(name);
    if path.exists() {
        fs::remove_file(&path).ok();
    }
}

fn assert_pdf(name: &str) {
    let path = output_dir().join(name);
    assert!(path.exists(), "PDF file was not created");

    let bytes = fs::read(&path).expect("Failed to read PDF");
    assert!(bytes.starts_with(b"%PDF"), "Output is not a PDF");
    assert!(bytes.len() > 500, "PDF file is too small, likely empty or corrupt");
}

#[test]
fn test_fill_records() {
    setup();
    let output_file = "test-fill.pdf";
    cleanup_file(output_file);

    let output = cargo_bin()
        .args([
            "fill",
            "-f", "demos/answer_card.json",
            "-r", "demos/records.json",
            "-o", &format!("tests/output/{}", output_file),
        ])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command failed: {:?}", output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Pages: 3"), "Unexpected output: {}", stdout);

    assert_pdf(output_file);
    let saved = lopdf::Document::load(output_dir().join(output_file))
        .expect("Failed to parse PDF");
    assert_eq!(saved.get_pages().len(), 3, "Expected one page per record");
}

#[test]
fn test_fill_with_date_stamp() {
    setup();
    let output_file = "test-fill-date.pdf";
    cleanup_file(output_file);

    let output = cargo_bin()
        .args([
            "fill",
            "-f", "demos/answer_card.json",
            "-r", "demos/records.json",
            "--date-field", "Date",
            "-d", "2015-03-15",
            "-o", &format!("tests/output/{}", output_file),
        ])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command failed: {:?}", output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Date: 3/15/2015"), "Unexpected output: {}", stdout);

    assert_pdf(output_file);
}

#[test]
fn test_fill_with_offset_and_font() {
    setup();
    let output_file = "test-fill-offset.pdf";
    cleanup_file(output_file);

    let output = cargo_bin()
        .args([
            "fill",
            "-f", "demos/answer_card.json",
            "-r", "demos/records.json",
            "--font", "Helvetica",
            "--font-size", "9",
            "--x-offset", "-4",
            "--y-offset", "12",
            "-o", &format!("tests/output/{}", output_file),
        ])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert_pdf(output_file);
}

#[test]
fn test_test_page() {
    setup();
    let output_file = "test-alignment.pdf";
    cleanup_file(output_file);

    let output = cargo_bin()
        .args([
            "test-page",
            "-f", "demos/answer_card.json",
            "-o", &format!("tests/output/{}", output_file),
        ])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert_pdf(output_file);
}

#[test]
fn test_check_lists_fields() {
    let output = cargo_bin()
        .args(["check", "-f", "demos/answer_card.json"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command failed: {:?}", output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Student ID Number (numeric, 9 digits)"));
    assert!(stdout.contains("Name (text at 72, 96)"));
}

#[test]
fn test_duplicate_field_names() {
    let output = cargo_bin()
        .args(["check", "-f", "demos/duplicate_fields.json"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "Command should have failed for duplicate fields");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("duplicate field name"), "Unexpected error: {}", stderr);
}

#[test]
fn test_bad_record_writes_nothing() {
    setup();
    let output_file = "should-not-exist-bad-record.pdf";
    cleanup_file(output_file);

    let output = cargo_bin()
        .args([
            "fill",
            "-f", "demos/answer_card.json",
            "-r", "demos/bad_records.json",
            "-o", &format!("tests/output/{}", output_file),
        ])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "Command should have failed for non-numeric id");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("must be numeric"), "Unexpected error: {}", stderr);
    assert!(!output_dir().join(output_file).exists());
}

#[test]
fn test_invalid_records_file() {
    let output = cargo_bin()
        .args([
            "fill",
            "-f", "demos/answer_card.json",
            "-r", "nonexistent.json",
            "-o", "tests/output/should-not-exist.pdf",
        ])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "Command should have failed for missing records");
}

#[test]
fn test_invalid_date_format() {
    let output = cargo_bin()
        .args([
            "fill",
            "-f", "demos/answer_card.json",
            "-r", "demos/records.json",
            "-d", "not-a-date",
            "-o", "tests/output/should-not-exist.pdf",
        ])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "Command should have failed for invalid date");
}

#[test]
fn test_zero_font_size_rejected() {
    let output = cargo_bin()
        .args([
            "test-page",
            "-f", "demos/answer_card.json",
            "--font-size", "0",
            "-o", "tests/output/should-not-exist-font.pdf",
        ])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "Command should have failed for zero font size");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("font size"), "Unexpected error: {}", stderr);
}
