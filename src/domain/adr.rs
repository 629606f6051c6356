use std::{convert::Infallible, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    domain::text::{normalize_text, normalize_yaml, single_line, strip_verdict},
    storage::markdown::{adr2md, md2adr},
};

/// An architectural decision record, decoded from (or destined for) a MADR
/// markdown document.
///
/// Every field defaults to the empty string or the empty list, so a record is
/// always fully populated. Records are plain values: decoding produces a fresh
/// instance each time and nothing is shared between instances.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StructuredAdr {
    /// Raw YAML front matter, without the `---` delimiters.
    ///
    /// This is passed through untouched; see [`StructuredAdr::front_matter`]
    /// for typed access.
    pub yaml: String,
    /// The level-1 heading of the document.
    pub title: String,
    /// Decision date, in whatever format the author chose.
    pub date: String,
    /// Decision status, e.g. `proposed` or `accepted`.
    pub status: String,
    /// Everyone involved in the decision.
    pub deciders: String,
    /// Ticket or issue the decision belongs to.
    pub technical_story: String,
    /// Free-text description of the problem being decided.
    pub context_and_problem_statement: String,
    /// Forces and concerns that drive the decision, in display order.
    pub decision_drivers: Vec<String>,
    /// The options that were on the table.
    pub considered_options: Vec<ConsideredOption>,
    /// Which option won and what follows from it.
    pub decision_outcome: DecisionOutcome,
    /// Related links, one entry per bullet.
    pub links: Vec<String>,
}

/// A single option considered for the decision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConsideredOption {
    /// The option's heading.
    pub title: String,
    /// Prose describing the option.
    pub description: String,
    /// Arguments in favour of the option.
    pub pros: Vec<String>,
    /// Arguments against the option.
    pub cons: Vec<String>,
}

impl ConsideredOption {
    /// Creates an option with a title and nothing else.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    fn normalized(&self) -> Self {
        Self {
            title: single_line(&self.title),
            description: normalize_text(&self.description),
            pros: normalize_verdicts(&self.pros),
            cons: normalize_verdicts(&self.cons),
        }
    }
}

/// The outcome of the decision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DecisionOutcome {
    /// Title of the chosen option.
    pub chosen_option: String,
    /// Justification for the choice.
    pub explanation: String,
    /// Expected benefits of the choice.
    pub positive_consequences: Vec<String>,
    /// Expected drawbacks of the choice.
    pub negative_consequences: Vec<String>,
}

impl DecisionOutcome {
    /// Returns `true` if the outcome carries no content at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chosen_option.is_empty()
            && self.explanation.is_empty()
            && self.positive_consequences.is_empty()
            && self.negative_consequences.is_empty()
    }

    fn normalized(&self) -> Self {
        Self {
            chosen_option: single_line(&self.chosen_option),
            explanation: normalize_text(&self.explanation),
            positive_consequences: normalize_items(&self.positive_consequences),
            negative_consequences: normalize_items(&self.negative_consequences),
        }
    }
}

impl StructuredAdr {
    /// Returns the canonical form of this record.
    ///
    /// Single-line fields have line breaks folded into spaces, free text is
    /// trimmed with blank-line runs collapsed, empty list entries are dropped
    /// and `Good, because`/`Bad, because` prefixes are removed from pros and
    /// cons. Every record produced by [`md2adr`] is already normalized, and
    /// [`adr2md`] renders the normalized form.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            yaml: normalize_yaml(&self.yaml),
            title: single_line(&self.title),
            date: single_line(&self.date),
            status: single_line(&self.status),
            deciders: single_line(&self.deciders),
            technical_story: single_line(&self.technical_story),
            context_and_problem_statement: normalize_text(&self.context_and_problem_statement),
            decision_drivers: normalize_items(&self.decision_drivers),
            considered_options: self
                .considered_options
                .iter()
                .map(ConsideredOption::normalized)
                .collect(),
            decision_outcome: self.decision_outcome.normalized(),
            links: normalize_items(&self.links),
        }
    }

    /// Parses the YAML front matter.
    ///
    /// Returns `Ok(None)` when the record has no front matter.
    ///
    /// # Errors
    ///
    /// Returns an error if the front matter is not valid YAML.
    pub fn front_matter(&self) -> Result<Option<serde_yaml::Value>, serde_yaml::Error> {
        if self.yaml.trim().is_empty() {
            return Ok(None);
        }
        serde_yaml::from_str(&self.yaml).map(Some)
    }

    /// Returns `true` if any of the inline metadata fields is set.
    #[must_use]
    pub fn has_metadata(&self) -> bool {
        [&self.status, &self.deciders, &self.date, &self.technical_story]
            .iter()
            .any(|field| !field.is_empty())
    }
}

fn normalize_items(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|item| single_line(item))
        .filter(|item| !item.is_empty())
        .collect()
}

fn normalize_verdicts(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|item| strip_verdict(&single_line(item)).1.to_owned())
        .filter(|item| !item.is_empty())
        .collect()
}

impl FromStr for StructuredAdr {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(md2adr(s))
    }
}

impl fmt::Display for StructuredAdr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&adr2md(self))
    }
}
