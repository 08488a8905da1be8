use anyhow::{Context, Result};
use paperwork_cwr::layout;
use paperwork_cwr::{RecordKind, LINE_TERMINATOR};
use std::io::Write;
use std::path::Path;

pub fn run_inspect(file: &Path) -> Result<()> {
    let contents = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    if contents.contains('\n') && !contents.contains(LINE_TERMINATOR) {
        println!("⚠ Lines end in LF, not CRLF\n");
    }

    let mut stdout = std::io::stdout().lock();
    for (number, line) in contents.lines().enumerate() {
        let warnings = describe_line(number + 1, line, &mut stdout)?;
        for warning in warnings {
            writeln!(stdout, "  ⚠ {warning}")?;
        }
        writeln!(stdout)?;
    }

    Ok(())
}

/// Print the fields of one line and return any problems found with it.
fn describe_line(
    number: usize,
    line: &str,
    out: &mut impl Write,
) -> Result<Vec<String>> {
    let Some(kind) = RecordKind::of_line(line) else {
        writeln!(out, "{number:>4} ???")?;
        return Ok(vec![format!("unknown record tag in {line:?}")]);
    };

    writeln!(out, "{number:>4} {kind}")?;
    for (name, value) in layout::fields(kind, line) {
        writeln!(out, "       {name:<20} {value:?}")?;
    }

    let mut warnings = Vec::new();
    if line.len() != kind.width() {
        warnings.push(format!(
            "{kind} is {} characters wide, expected {}",
            line.len(),
            kind.width()
        ));
    }
    if !line.is_ascii() {
        warnings.push(String::from("line contains non-ASCII characters"));
    }
    Ok(warnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_trailer() {
        let mut out = Vec::new();
        let warnings = describe_line(5, "TRL000010000000100000003", &mut out).unwrap();
        let printed = String::from_utf8(out).unwrap();

        assert!(warnings.is_empty());
        assert!(printed.contains("record_count"));
        assert!(printed.contains("\"00000003\""));
    }

    #[test]
    fn test_describe_short_line() {
        let mut out = Vec::new();
        let warnings = describe_line(1, "TRL00001", &mut out).unwrap();
        assert_eq!(warnings, vec!["TRL is 8 characters wide, expected 24"]);
    }

    #[test]
    fn test_describe_unknown_tag() {
        let mut out = Vec::new();
        let warnings = describe_line(1, "XYZ123", &mut out).unwrap();
        assert_eq!(warnings.len(), 1);
    }
}
