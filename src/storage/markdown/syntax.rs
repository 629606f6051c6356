//! Line-level recognisers for the subset of markdown used by MADR.
//!
//! Every recogniser looks at the trimmed line, so indentation never changes
//! how a line is read.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::text::Verdict;

pub const CONTEXT: &str = "Context and Problem Statement";
pub const DECISION_DRIVERS: &str = "Decision Drivers";
pub const CONSIDERED_OPTIONS: &str = "Considered Options";
pub const PROS_AND_CONS: &str = "Pros and Cons of the Options";
pub const DECISION_OUTCOME: &str = "Decision Outcome";
pub const LINKS: &str = "Links";
pub const TECHNICAL_STORY: &str = "Technical Story";

pub const CHOSEN_OPTION: &str = "Chosen option:";
pub const PROS: &str = "Pros";
pub const CONS: &str = "Cons";
pub const POSITIVE_CONSEQUENCES: &str = "Positive Consequences";
pub const NEGATIVE_CONSEQUENCES: &str = "Negative Consequences";

/// Matches the label of one inline metadata field.
///
/// A label is either bulleted (`* Status:`, `- Date:`) anywhere in the line,
/// or bare at the very start of the line.
pub static METADATA_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[*-])\s*(Status|Deciders|Date|Technical Story):").expect("valid regex")
});

/// The level-2 sections the converter understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Context,
    DecisionDrivers,
    ConsideredOptions,
    ProsAndCons,
    DecisionOutcome,
    Links,
    TechnicalStory,
}

impl Section {
    pub fn from_heading(name: &str) -> Option<Self> {
        Some(match name {
            CONTEXT => Self::Context,
            DECISION_DRIVERS => Self::DecisionDrivers,
            CONSIDERED_OPTIONS => Self::ConsideredOptions,
            PROS_AND_CONS => Self::ProsAndCons,
            DECISION_OUTCOME => Self::DecisionOutcome,
            LINKS => Self::Links,
            TECHNICAL_STORY => Self::TechnicalStory,
            _ => return None,
        })
    }
}

/// Recognises an ATX heading, returning its level and text.
///
/// `#` alone is a level-1 heading with empty text; `#title` is not a heading.
pub fn heading(line: &str) -> Option<(usize, &str)> {
    let line = line.trim();
    let level = line.bytes().take_while(|&b| b == b'#').count();
    if !(1..=6).contains(&level) {
        return None;
    }
    let rest = &line[level..];
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some((level, rest.trim()))
}

/// Recognises a bullet item, returning its trimmed content.
///
/// A bare marker is an empty item.
pub fn bullet(line: &str) -> Option<&str> {
    let rest = line.trim().strip_prefix(['-', '*', '+'])?;
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some(rest.trim())
    } else {
        None
    }
}

/// Returns `true` for a front matter delimiter.
pub fn is_delimiter(line: &str) -> bool {
    line.trim() == "---"
}

/// Recognises a line that introduces a sub-list, returning the label text.
///
/// Accepted shapes are `**Label:**`, `**Label**:`, `**Label**`, `Label:` and
/// headings of level 3 or deeper.
fn label(line: &str) -> Option<&str> {
    let line = line.trim();
    let name = if let Some((level, text)) = heading(line) {
        if level < 3 {
            return None;
        }
        text
    } else if let Some(rest) = line.strip_prefix("**") {
        rest.strip_suffix("**:")
            .or_else(|| rest.strip_suffix("**"))?
    } else {
        line.strip_suffix(':')?
    };
    let name = name.trim();
    Some(name.strip_suffix(':').unwrap_or(name).trim_end())
}

/// Recognises a `Pros` or `Cons` label inside an option.
pub fn option_label(line: &str) -> Option<Verdict> {
    match label(line)? {
        name if name.eq_ignore_ascii_case(PROS) => Some(Verdict::Good),
        name if name.eq_ignore_ascii_case(CONS) => Some(Verdict::Bad),
        _ => None,
    }
}

/// Recognises a `Positive Consequences` or `Negative Consequences` label.
pub fn consequence_label(line: &str) -> Option<Verdict> {
    match label(line)? {
        name if name.eq_ignore_ascii_case(POSITIVE_CONSEQUENCES) => Some(Verdict::Good),
        name if name.eq_ignore_ascii_case(NEGATIVE_CONSEQUENCES) => Some(Verdict::Bad),
        _ => None,
    }
}

/// Parses a `Chosen option: "Title", because ...` line.
///
/// The title must be quoted or bold and non-empty. Returns the title and the
/// rest of the line with the `, because` connective removed.
pub fn chosen_option(line: &str) -> Option<(&str, &str)> {
    let rest = line.trim().strip_prefix(CHOSEN_OPTION)?.trim_start();
    let (title, after) = if let Some(quoted) = rest.strip_prefix('"') {
        quoted.split_once('"')?
    } else if let Some(bold) = rest.strip_prefix("**") {
        bold.split_once("**")?
    } else {
        return None;
    };
    let title = title.trim();
    if title.is_empty() {
        return None;
    }
    let after = after.trim_start();
    let after = after.strip_prefix(',').unwrap_or(after).trim_start();
    let after = after.strip_prefix("because").unwrap_or(after).trim_start();
    Some((title, after))
}
