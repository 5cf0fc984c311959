//! CLI Doctor Command
//!
//! Verifies everything the bot needs before it starts polling.

use std::path::Path;

use ocrbot_config::{validate, OcrBotConfig};
use ocrbot_media::ArchiveWriter;
use ocrbot_understanding::TesseractRecognizer;

use crate::config::{describe_timeout, tesseract_config};
use crate::terminal_output::{
    note_error, note_info, note_success, note_warn, render_report, supports_color, ReportRow,
};

fn pass(check: &str, detail: impl Into<String>) -> ReportRow {
    ReportRow { check: check.into(), passed: true, detail: detail.into() }
}

fn fail(check: &str, detail: impl Into<String>) -> ReportRow {
    ReportRow { check: check.into(), passed: false, detail: detail.into() }
}

/// Executes the full doctor diagnosis. Returns `true` when every check passed.
pub async fn run(config: &OcrBotConfig, config_path: &Path) -> bool {
    println!("\n🔍 Running ocrbot doctor...\n");

    if config_path.exists() {
        note_info(&format!("Config file: {}", config_path.display()));
    } else {
        note_warn(&format!(
            "Config file {} not found; using defaults",
            config_path.display()
        ));
    }

    let mut rows = vec![check_config(config)];
    rows.extend(check_tesseract(config).await);
    rows.push(check_archive(config).await);

    println!("{}", render_report(&rows, supports_color()));

    let all_ok = rows.iter().all(|row| row.passed);
    if all_ok {
        note_success("All checks passed! ocrbot is ready to run.");
    } else {
        note_error("Some checks failed! Please fix the errors above.");
    }
    all_ok
}

fn check_config(config: &OcrBotConfig) -> ReportRow {
    let report = validate(config);
    for warning in &report.warnings {
        note_warn(&format!("{}: {}", warning.path, warning.message));
    }
    for error in &report.errors {
        note_error(&format!("{}: {}", error.path, error.message));
    }
    if report.is_valid() {
        pass("config", format!("{} warning(s)", report.warnings.len()))
    } else {
        fail("config", format!("{} error(s)", report.errors.len()))
    }
}

async fn check_tesseract(config: &OcrBotConfig) -> Vec<ReportRow> {
    let settings = tesseract_config(config);
    let timeout = describe_timeout(settings.timeout);
    let recognizer = TesseractRecognizer::new(settings);

    let version = match recognizer.version().await {
        Ok(version) => version,
        Err(e) => return vec![fail("tesseract", format!("{e:#}"))],
    };
    let binary = pass("tesseract", format!("{version} (timeout {timeout})"));

    let languages = match recognizer.missing_languages().await {
        Ok(missing) if missing.is_empty() => {
            pass("languages", recognizer.language_arg())
        }
        Ok(missing) => fail("languages", format!("missing: {}", missing.join(", "))),
        Err(e) => fail("languages", format!("{e:#}")),
    };
    vec![binary, languages]
}

async fn check_archive(config: &OcrBotConfig) -> ReportRow {
    let archive = ArchiveWriter::new(config.archive_dir());
    match archive.check_writable().await {
        Ok(()) => pass("archive", format!("{} is writable", archive.dir().display())),
        Err(e) => fail("archive", format!("{e:#}")),
    }
}
