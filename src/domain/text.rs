//! Whitespace and phrasing rules shared by the model and the converter.

/// Prefix marking an argument in favour of an option.
pub const GOOD_BECAUSE: &str = "Good, because";
/// Prefix marking an argument against an option.
pub const BAD_BECAUSE: &str = "Bad, because";

/// Which way a pro/con bullet argues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Good,
    Bad,
}

/// Normalizes a block of free text.
///
/// Trailing whitespace is removed from every line, runs of blank lines are
/// collapsed into one, and the block as a whole is trimmed.
pub fn normalize_text(text: &str) -> String {
    normalize_lines(text.lines())
}

/// [`normalize_text`] over lines that have already been split.
pub fn normalize_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> String {
    let mut out: Vec<&str> = Vec::new();
    for line in lines {
        let line = line.trim_end();
        if line.is_empty() && out.last().is_none_or(|last| last.is_empty()) {
            continue;
        }
        out.push(line);
    }
    while out.last().is_some_and(|last| last.is_empty()) {
        out.pop();
    }
    out.join("\n").trim().to_owned()
}

/// Folds a possibly multi-line value onto one line.
pub fn single_line(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalizes raw front matter.
///
/// Indentation and inner blank lines are kept since they are significant in
/// YAML. Delimiter lines cannot appear inside the block and are dropped.
pub fn normalize_yaml(yaml: &str) -> String {
    let mut lines: Vec<&str> = yaml
        .lines()
        .map(str::trim_end)
        .filter(|line| line.trim() != "---")
        .collect();
    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    let start = lines
        .iter()
        .position(|line| !line.is_empty())
        .unwrap_or(lines.len());
    lines[start..].join("\n")
}

/// Strips every leading `Good, because` / `Bad, because` from a pro or con.
///
/// Returns the verdict of the first prefix found, if any. Stripping repeats so
/// the remaining text never starts with another prefix.
pub fn strip_verdict(text: &str) -> (Option<Verdict>, &str) {
    let mut verdict = None;
    let mut rest = text.trim();
    loop {
        let (found, stripped) = if let Some(stripped) = rest.strip_prefix(GOOD_BECAUSE) {
            (Verdict::Good, stripped)
        } else if let Some(stripped) = rest.strip_prefix(BAD_BECAUSE) {
            (Verdict::Bad, stripped)
        } else {
            return (verdict, rest);
        };
        verdict.get_or_insert(found);
        rest = stripped.trim_start();
    }
}
