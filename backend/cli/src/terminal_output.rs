//! Console notes and the `check` report table.

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

/// Honors `NO_COLOR` and dumb terminals.
pub fn supports_color() -> bool {
    std::env::var_os("NO_COLOR").is_none()
        && (std::env::var_os("COLORTERM").is_some()
            || std::env::var("TERM").is_ok_and(|t| t != "dumb"))
}

/// Severity of a console note or a report cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Ok,
    Warn,
    Fail,
}

impl Tone {
    fn color(self) -> &'static str {
        match self {
            Tone::Info => CYAN,
            Tone::Ok => GREEN,
            Tone::Warn => YELLOW,
            Tone::Fail => RED,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            Tone::Info => "ℹ",
            Tone::Ok => "✓",
            Tone::Warn => "⚠",
            Tone::Fail => "✗",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Tone::Info => "INFO",
            Tone::Ok => "OK",
            Tone::Warn => "WARN",
            Tone::Fail => "ERROR",
        }
    }
}

fn format_note(tone: Tone, msg: &str, color: bool) -> String {
    if color {
        format!("{}{BOLD}{}{RESET} {msg}", tone.color(), tone.symbol())
    } else {
        format!("{}: {msg}", tone.label())
    }
}

/// Print a note; failures go to stderr.
pub fn note(tone: Tone, msg: &str) {
    let line = format_note(tone, msg, supports_color());
    if tone == Tone::Fail {
        eprintln!("{line}");
    } else {
        println!("{line}");
    }
}

pub fn note_info(msg: &str) {
    note(Tone::Info, msg);
}

pub fn note_warn(msg: &str) {
    note(Tone::Warn, msg);
}

pub fn note_error(msg: &str) {
    note(Tone::Fail, msg);
}

pub fn note_success(msg: &str) {
    note(Tone::Ok, msg);
}

/// One row of the `check` report.
pub struct ReportRow {
    pub check: String,
    pub passed: bool,
    pub detail: String,
}

/// Widest detail cell before it is cut with an ellipsis.
pub const DETAIL_WIDTH: usize = 60;

/// Render the report as aligned `Check  Status  Detail` columns.
///
/// Widths count characters, so Cyrillic paths line up. The status cell is
/// colored only when `color` is set.
pub fn render_report(rows: &[ReportRow], color: bool) -> String {
    let details: Vec<String> = rows.iter().map(|r| truncate(&r.detail, DETAIL_WIDTH)).collect();
    let status = |passed: bool| if passed { "ok" } else { "FAILED" };

    let check_w = column_width("Check", rows.iter().map(|r| r.check.as_str()));
    let status_w = column_width("Status", rows.iter().map(|r| status(r.passed)));
    let detail_w = column_width("Detail", details.iter().map(String::as_str));

    let mut out = String::new();
    let header = format!(
        "  {}  {}  {}",
        pad("Check", check_w),
        pad("Status", status_w),
        pad("Detail", detail_w)
    );
    if color {
        out.push_str(&format!("{BOLD}{}{RESET}\n", header.trim_end()));
    } else {
        out.push_str(header.trim_end());
        out.push('\n');
    }
    out.push_str(&format!(
        "  {}  {}  {}\n",
        "-".repeat(check_w),
        "-".repeat(status_w),
        "-".repeat(detail_w)
    ));

    for (row, detail) in rows.iter().zip(&details) {
        let mut cell = pad(status(row.passed), status_w);
        if color {
            let tone = if row.passed { Tone::Ok } else { Tone::Fail };
            cell = format!("{}{cell}{RESET}", tone.color());
        }
        let line = format!("  {}  {cell}  {detail}", pad(&row.check, check_w));
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

fn column_width<'a>(header: &str, cells: impl Iterator<Item = &'a str>) -> usize {
    cells.map(|c| c.chars().count()).fold(header.chars().count(), usize::max)
}

fn pad(s: &str, width: usize) -> String {
    let fill = width.saturating_sub(s.chars().count());
    format!("{s}{}", " ".repeat(fill))
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{kept}…")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(check: &str, passed: bool, detail: &str) -> ReportRow {
        ReportRow { check: check.into(), passed, detail: detail.into() }
    }

    #[test]
    fn plain_notes_carry_a_label() {
        assert_eq!(format_note(Tone::Warn, "No text found.", false), "WARN: No text found.");
        assert_eq!(format_note(Tone::Fail, "boom", false), "ERROR: boom");
        assert!(format_note(Tone::Ok, "done", true).contains("✓"));
    }

    #[test]
    fn report_columns_line_up() {
        let table = render_report(
            &[
                row("tesseract", true, "5.3.0"),
                row("archive", false, "ocr_results/отчёты is not writable"),
            ],
            false,
        );
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "  Check      Status  Detail");
        assert_eq!(lines[2], "  tesseract  ok      5.3.0");
        assert_eq!(lines[3], "  archive    FAILED  ocr_results/отчёты is not writable");
        assert!(!table.contains('\x1b'));
    }

    #[test]
    fn long_detail_is_cut() {
        let detail = "x".repeat(DETAIL_WIDTH + 20);
        let table = render_report(&[row("config", true, &detail)], false);
        let last = table.lines().last().unwrap();
        assert!(last.ends_with('…'));
        assert_eq!(last.split("  ").last().unwrap().chars().count(), DETAIL_WIDTH);
    }

    #[test]
    fn color_only_touches_the_status_cell() {
        let table = render_report(&[row("languages", false, "missing: rus")], true);
        assert!(table.contains(&format!("{RED}FAILED{RESET}")));
        assert!(table.contains("missing: rus"));
    }
}
