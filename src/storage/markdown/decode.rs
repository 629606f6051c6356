use crate::{
    domain::{
        ConsideredOption, DecisionOutcome, StructuredAdr,
        text::{Verdict, normalize_lines, normalize_yaml, single_line, strip_verdict},
    },
    storage::markdown::syntax::{
        METADATA_LABEL, Section, bullet, chosen_option, consequence_label, heading,
        is_delimiter, option_label,
    },
};

/// A markdown document cut into the pieces the decoder cares about.
struct Document<'a> {
    yaml: String,
    title: &'a str,
    /// Lines between the start of the body and the first level-2 heading.
    preamble: Vec<&'a str>,
    /// Recognised sections in document order. A section may appear more than
    /// once.
    sections: Vec<(Section, Vec<&'a str>)>,
}

impl<'a> Document<'a> {
    fn split(markdown: &'a str) -> Self {
        let (yaml, body) = split_front_matter(markdown);
        let lines: Vec<&str> = body.lines().collect();

        // The first level-1 heading is the title wherever it appears.
        let title_line = lines
            .iter()
            .position(|line| matches!(heading(line), Some((1, _))));
        let title = title_line
            .and_then(|index| heading(lines[index]))
            .map_or("", |(_, text)| text);

        let mut preamble = Vec::new();
        let mut sections: Vec<(Section, Vec<&str>)> = Vec::new();
        // `None` until the first level-2 heading, then whether the current
        // section is recognised.
        let mut current: Option<bool> = None;

        for (index, line) in lines.into_iter().enumerate() {
            if Some(index) == title_line {
                continue;
            }
            if let Some((2, name)) = heading(line) {
                let section = Section::from_heading(name);
                if section.is_none() {
                    tracing::debug!("ignoring unrecognised section '{name}'");
                }
                current = Some(section.is_some());
                if let Some(section) = section {
                    sections.push((section, Vec::new()));
                }
                continue;
            }
            match current {
                None => preamble.push(line),
                Some(true) => {
                    if let Some((_, section_lines)) = sections.last_mut() {
                        section_lines.push(line);
                    }
                }
                Some(false) => {}
            }
        }

        Self {
            yaml,
            title,
            preamble,
            sections,
        }
    }

    fn segments(&self, section: Section) -> impl Iterator<Item = &[&'a str]> {
        self.sections
            .iter()
            .filter(move |(kind, _)| *kind == section)
            .map(|(_, lines)| lines.as_slice())
    }
}

/// Separates the YAML front matter from the body.
///
/// Front matter must open on the very first line and be closed by a later
/// delimiter; otherwise the whole text is body.
fn split_front_matter(markdown: &str) -> (String, &str) {
    let mut lines = markdown.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return (String::new(), markdown);
    };
    if !is_delimiter(first) {
        return (String::new(), markdown);
    }

    let start = first.len();
    let mut offset = start;
    for line in lines {
        if is_delimiter(line) {
            let yaml = normalize_yaml(&markdown[start..offset]);
            return (yaml, &markdown[offset + line.len()..]);
        }
        offset += line.len();
    }

    tracing::debug!("front matter is never closed, reading it as body text");
    (String::new(), markdown)
}

/// Parses MADR markdown into a structured record.
///
/// This never fails: sections that are missing or malformed leave their fields
/// empty, and unrecognised sections are skipped. The result is always
/// [normalized](StructuredAdr::normalized).
#[must_use]
pub fn md2adr(markdown: &str) -> StructuredAdr {
    let document = Document::split(markdown);
    let metadata = Metadata::parse(&document.preamble);

    let technical_story = single_line(&text(document.segments(Section::TechnicalStory)));
    let technical_story = match metadata_value(&technical_story) {
        "" => metadata.technical_story,
        from_section => from_section.to_owned(),
    };

    let mut considered_options: Vec<ConsideredOption> = document
        .segments(Section::ConsideredOptions)
        .flat_map(parse_options)
        .collect();
    for option in document.segments(Section::ProsAndCons).flat_map(parse_options) {
        merge_option(&mut considered_options, option);
    }

    StructuredAdr {
        yaml: document.yaml.clone(),
        title: document.title.to_owned(),
        date: metadata.date,
        status: metadata.status,
        deciders: metadata.deciders,
        technical_story,
        context_and_problem_statement: text(document.segments(Section::Context)),
        decision_drivers: document
            .segments(Section::DecisionDrivers)
            .flat_map(|lines| lines.iter().filter_map(|line| bullet(line)))
            .filter(|item| !item.is_empty())
            .map(str::to_owned)
            .collect(),
        considered_options,
        decision_outcome: document
            .segments(Section::DecisionOutcome)
            .map(parse_outcome)
            .fold(DecisionOutcome::default(), merge_outcome),
        links: document
            .segments(Section::Links)
            .flat_map(|lines| lines.iter().filter_map(|line| link(line)))
            .collect(),
    }
}

/// Joins the text of every segment, one blank line apart.
fn text<'a, 'b>(segments: impl Iterator<Item = &'b [&'a str]>) -> String
where
    'a: 'b,
{
    let mut lines = Vec::new();
    for segment in segments {
        lines.extend_from_slice(segment);
        lines.push("");
    }
    normalize_lines(lines)
}

/// The inline metadata fields found in the preamble.
#[derive(Debug, Default)]
struct Metadata {
    status: String,
    deciders: String,
    date: String,
    technical_story: String,
}

impl Metadata {
    /// Reads every metadata line in the preamble.
    ///
    /// Fields are keyed by label, so the order they appear in and any fields
    /// left out make no difference. The first non-empty value of a field
    /// wins.
    fn parse(preamble: &[&str]) -> Self {
        let mut metadata = Self::default();
        for line in preamble {
            let line = line.trim();
            let labels: Vec<_> = METADATA_LABEL.captures_iter(line).collect();
            let Some(first) = labels.first() else {
                continue;
            };
            if first.get(0).is_none_or(|m| m.start() != 0) {
                continue;
            }

            for (index, captures) in labels.iter().enumerate() {
                let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
                    continue;
                };
                let end = labels
                    .get(index + 1)
                    .and_then(|next| next.get(0))
                    .map_or(line.len(), |next| next.start());
                let value = line[whole.end()..end].trim();

                let field = match name.as_str() {
                    "Status" => &mut metadata.status,
                    "Deciders" => &mut metadata.deciders,
                    "Date" => &mut metadata.date,
                    _ => &mut metadata.technical_story,
                };
                if field.is_empty() {
                    value.clone_into(field);
                }
            }
        }
        metadata
    }
}

/// Cuts a value at the first thing that would read as a metadata label.
fn metadata_value(text: &str) -> &str {
    METADATA_LABEL
        .find(text)
        .map_or(text, |label| &text[..label.start()])
        .trim()
}

fn link(line: &str) -> Option<String> {
    let entry = bullet(line).unwrap_or_else(|| line.trim());
    (!entry.is_empty()).then(|| entry.to_owned())
}

/// Parses the options of a `Considered Options` or `Pros and Cons` section.
///
/// Bullets before the first option heading are MADR's summary list and yield
/// options with just a title.
fn parse_options(lines: &[&str]) -> Vec<ConsideredOption> {
    let mut options = Vec::new();
    let mut current: Option<OptionBuilder<'_>> = None;

    for line in lines {
        if let Some((3, title)) = heading(line) {
            options.extend(current.take().map(OptionBuilder::build));
            current = Some(OptionBuilder::new(title));
            continue;
        }
        match current.as_mut() {
            Some(builder) => builder.push(line),
            None => {
                if let Some(title) = bullet(line).filter(|title| !title.is_empty()) {
                    options.push(ConsideredOption::new(title));
                }
            }
        }
    }
    options.extend(current.map(OptionBuilder::build));
    options
}

/// Accumulates the body of one option.
struct OptionBuilder<'a> {
    title: &'a str,
    description: Vec<&'a str>,
    /// The list bullets currently go to; `None` while still in the
    /// description.
    list: Option<Verdict>,
    pros: Vec<String>,
    cons: Vec<String>,
}

impl<'a> OptionBuilder<'a> {
    const fn new(title: &'a str) -> Self {
        Self {
            title,
            description: Vec::new(),
            list: None,
            pros: Vec::new(),
            cons: Vec::new(),
        }
    }

    fn push(&mut self, line: &'a str) {
        if let Some(verdict) = option_label(line) {
            self.list = Some(verdict);
            return;
        }

        if let Some(item) = bullet(line) {
            let (verdict, item) = strip_verdict(item);
            // A `Good, because` bullet starts the list even without a label.
            if self.list.is_none() && verdict.is_some() {
                self.list = verdict;
            }
            if let Some(target) = verdict.or(self.list) {
                if !item.is_empty() {
                    self.list_mut(target).push(item.to_owned());
                }
                return;
            }
        }

        if self.list.is_none() {
            self.description.push(line);
        }
    }

    fn list_mut(&mut self, verdict: Verdict) -> &mut Vec<String> {
        match verdict {
            Verdict::Good => &mut self.pros,
            Verdict::Bad => &mut self.cons,
        }
    }

    fn build(self) -> ConsideredOption {
        ConsideredOption {
            title: self.title.to_owned(),
            description: normalize_lines(self.description),
            pros: self.pros,
            cons: self.cons,
        }
    }
}

/// Folds an option from a `Pros and Cons of the Options` section into the
/// option with the same title.
fn merge_option(options: &mut Vec<ConsideredOption>, option: ConsideredOption) {
    let Some(existing) = options.iter_mut().find(|o| o.title == option.title) else {
        options.push(option);
        return;
    };
    existing.description = join_paragraphs(&existing.description, &option.description);
    existing.pros.extend(option.pros);
    existing.cons.extend(option.cons);
}

fn parse_outcome(lines: &[&str]) -> DecisionOutcome {
    let mut outcome = DecisionOutcome::default();
    let mut paragraph: Vec<&str> = Vec::new();
    let mut chosen_found = false;
    let mut list: Option<Verdict> = None;

    for line in lines {
        if let Some(verdict) = consequence_label(line) {
            list = Some(verdict);
            continue;
        }
        match list {
            None => {
                if !chosen_found {
                    if let Some((title, rest)) =
                        chosen_option(line).filter(|&(_, rest)| !is_outcome_structure(rest))
                    {
                        chosen_found = true;
                        title.clone_into(&mut outcome.chosen_option);
                        // Lines before the phrase stay ahead of its remainder.
                        paragraph.push(rest);
                        continue;
                    }
                }
                paragraph.push(line);
            }
            Some(verdict) => {
                if let Some(item) = bullet(line).filter(|item| !item.is_empty()) {
                    let target = match verdict {
                        Verdict::Good => &mut outcome.positive_consequences,
                        Verdict::Bad => &mut outcome.negative_consequences,
                    };
                    target.push(item.to_owned());
                }
            }
        }
    }

    outcome.explanation = normalize_lines(paragraph);
    outcome
}

/// Returns `true` if `line` would end the explanation when it stood alone.
///
/// The encoder moves the first explanation line onto the chosen option
/// sentence, which can leave the remainder of that sentence on a line of its
/// own.
fn is_outcome_structure(line: &str) -> bool {
    consequence_label(line).is_some() || heading(line).is_some_and(|(level, _)| level == 2)
}

fn merge_outcome(mut merged: DecisionOutcome, outcome: DecisionOutcome) -> DecisionOutcome {
    if merged.chosen_option.is_empty() {
        merged.chosen_option = outcome.chosen_option;
    }
    merged.explanation = join_paragraphs(&merged.explanation, &outcome.explanation);
    merged
        .positive_consequences
        .extend(outcome.positive_consequences);
    merged
        .negative_consequences
        .extend(outcome.negative_consequences);
    merged
}

fn join_paragraphs(first: &str, second: &str) -> String {
    match (first.is_empty(), second.is_empty()) {
        (_, true) => first.to_owned(),
        (true, false) => second.to_owned(),
        (false, false) => format!("{first}\n\n{second}"),
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test]
    fn empty_input_yields_defaults() {
        assert_eq!(md2adr(""), StructuredAdr::default());
    }

    #[test]
    fn example_document() {
        let adr = md2adr(
            "# Use PostgreSQL\n## Context and Problem Statement\nWe need a database.\n## \
             Decision Outcome\nChosen option: \"PostgreSQL\", because it is mature.\n",
        );

        assert_eq!(adr.title, "Use PostgreSQL");
        assert_eq!(adr.context_and_problem_statement, "We need a database.");
        assert_eq!(adr.decision_outcome.chosen_option, "PostgreSQL");
        assert!(adr.decision_outcome.explanation.contains("it is mature."));
        assert!(adr.decision_drivers.is_empty());
        assert!(adr.considered_options.is_empty());
        assert!(adr.links.is_empty());
    }

    #[test]
    fn front_matter_is_captured() {
        let adr = md2adr("---\nstatus: accepted\ndate: 2024-01-01\n---\n# Title\n");
        assert_eq!(adr.yaml, "status: accepted\ndate: 2024-01-01");
        assert_eq!(adr.title, "Title");
    }

    #[test]
    fn unclosed_front_matter_is_body() {
        let adr = md2adr("---\nstatus: accepted\n# Title\n");
        assert!(adr.yaml.is_empty());
        assert_eq!(adr.title, "Title");
    }

    #[test]
    fn indented_delimiters_fence_front_matter() {
        let adr = md2adr("  ---\nstatus: accepted\n   ---\n# Title\n");
        assert_eq!(adr.yaml, "status: accepted");
        assert_eq!(adr.title, "Title");
    }

    #[test]
    fn front_matter_must_start_the_document() {
        let adr = md2adr("# Title\n---\nkey: value\n---\n");
        assert!(adr.yaml.is_empty());
    }

    #[test]
    fn metadata_on_one_line() {
        let adr = md2adr(
            "# T\n\n* Status: accepted * Deciders: Alice, Bob * Date: 2021-03-04 * Technical \
             Story: #12\n",
        );
        assert_eq!(adr.status, "accepted");
        assert_eq!(adr.deciders, "Alice, Bob");
        assert_eq!(adr.date, "2021-03-04");
        assert_eq!(adr.technical_story, "#12");
    }

    #[test]
    fn metadata_is_keyed_by_label() {
        let adr = md2adr("# T\n\n* Date: 2020-01-01 * Status: proposed\n");
        assert_eq!(adr.status, "proposed");
        assert_eq!(adr.date, "2020-01-01");
        assert!(adr.deciders.is_empty());
    }

    #[test]
    fn metadata_one_field_per_line() {
        let adr = md2adr(
            "# T\n\n* Status: rejected\n* Deciders: team\n\nTechnical Story: ticket 7\n\n## \
             Context and Problem Statement\n\n* Status: ignored here\n",
        );
        assert_eq!(adr.status, "rejected");
        assert_eq!(adr.deciders, "team");
        assert_eq!(adr.technical_story, "ticket 7");
        assert_eq!(adr.context_and_problem_statement, "* Status: ignored here");
    }

    #[test]
    fn technical_story_section_overrides_inline() {
        let adr = md2adr(
            "# T\n\n* Technical Story: inline\n\n## Technical Story\n\nfrom the\nsection\n",
        );
        assert_eq!(adr.technical_story, "from the section");

        let adr = md2adr("# T\n\n* Technical Story: inline\n\n## Technical Story\n\n");
        assert_eq!(adr.technical_story, "inline");
    }

    #[test]
    fn unrecognised_sections_are_dropped() {
        let adr = md2adr(
            "# T\n\n## Appendix\n\n- not a driver\n\n## Decision Drivers\n\n- real driver\n",
        );
        assert_eq!(adr.decision_drivers, vec!["real driver"]);
    }

    #[test]
    fn drivers_and_links() {
        let adr = md2adr(
            "# T\n\n## Decision Drivers\n\n* speed\n- cost\n\n  + safety  \nprose is \
             skipped\n-\n\n## Links\n\n* [ADR-0001](0001-first.md)\nsee also the wiki\n",
        );
        assert_eq!(adr.decision_drivers, vec!["speed", "cost", "safety"]);
        assert_eq!(
            adr.links,
            vec!["[ADR-0001](0001-first.md)", "see also the wiki"]
        );
    }

    #[test]
    fn considered_options_with_labels() {
        let adr = md2adr(
            "# T\n\n## Considered Options\n\n### MySQL\n\nPopular.\n\nWidely hosted.\n\n\
             **Pros:**\n\n- cheap\n- Good, because known\n\n**Cons:**\n\n- licensing\n\n\
             ### PostgreSQL\n\nMature.\n",
        );

        assert_eq!(adr.considered_options.len(), 2);
        let mysql = &adr.considered_options[0];
        assert_eq!(mysql.title, "MySQL");
        assert_eq!(mysql.description, "Popular.\n\nWidely hosted.");
        assert_eq!(mysql.pros, vec!["cheap", "known"]);
        assert_eq!(mysql.cons, vec!["licensing"]);

        let postgres = &adr.considered_options[1];
        assert_eq!(postgres.title, "PostgreSQL");
        assert_eq!(postgres.description, "Mature.");
        assert!(postgres.pros.is_empty());
    }

    #[test]
    fn considered_options_with_madr_bullets() {
        let adr = md2adr(
            "# T\n\n## Considered Options\n\n### Kafka\n\nA log.\n\n* Good, because \
             durable\n* Bad, because heavy\n* Good, because fast\n",
        );
        let kafka = &adr.considered_options[0];
        assert_eq!(kafka.description, "A log.");
        assert_eq!(kafka.pros, vec!["durable", "fast"]);
        assert_eq!(kafka.cons, vec!["heavy"]);
    }

    #[test]
    fn plain_bullets_stay_in_the_description() {
        let adr = md2adr(
            "# T\n\n## Considered Options\n\n### A\n\nSteps:\n\n- one\n- two\n\nCons:\n- \
             slow\ntrailing prose is dropped\n",
        );
        let option = &adr.considered_options[0];
        assert_eq!(option.description, "Steps:\n\n- one\n- two");
        assert_eq!(option.cons, vec!["slow"]);
    }

    #[test]
    fn madr_two_layout_is_merged() {
        let adr = md2adr(
            "# T\n\n## Considered Options\n\n* Redis\n* Memcached\n\n## Decision Outcome\n\n\
             Chosen option: \"Redis\", because persistence.\n\n## Pros and Cons of the \
             Options\n\n### Redis\n\nKey-value store.\n\n* Good, because persistent\n\n### \
             Hazelcast\n\n* Bad, because JVM\n",
        );
        let titles: Vec<_> = adr
            .considered_options
            .iter()
            .map(|o| o.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Redis", "Memcached", "Hazelcast"]);
        assert_eq!(adr.considered_options[0].description, "Key-value store.");
        assert_eq!(adr.considered_options[0].pros, vec!["persistent"]);
        assert_eq!(adr.considered_options[2].cons, vec!["JVM"]);
    }

    #[test]
    fn outcome_with_consequences() {
        let adr = md2adr(
            "# T\n\n## Decision Outcome\n\nChosen option: \"Rust\", because it is safe\nand \
             fast.\n\n### Positive Consequences\n\n* fewer crashes\n\n### Negative \
             Consequences\n\n* longer builds\nignored prose\n",
        );
        let outcome = &adr.decision_outcome;
        assert_eq!(outcome.chosen_option, "Rust");
        assert_eq!(outcome.explanation, "it is safe\nand fast.");
        assert_eq!(outcome.positive_consequences, vec!["fewer crashes"]);
        assert_eq!(outcome.negative_consequences, vec!["longer builds"]);
    }

    #[test]
    fn outcome_without_phrase_keeps_text() {
        let adr = md2adr("# T\n\n## Decision Outcome\n\nWe went with the flow.\n");
        assert!(adr.decision_outcome.chosen_option.is_empty());
        assert_eq!(adr.decision_outcome.explanation, "We went with the flow.");
    }

    #[test]
    fn text_before_the_phrase_leads_the_explanation() {
        let adr = md2adr(
            "# T\n\n## Decision Outcome\n\nAfter a long debate.\n\nChosen option: **B**, \
             because cost.\n",
        );
        assert_eq!(adr.decision_outcome.chosen_option, "B");
        assert_eq!(
            adr.decision_outcome.explanation,
            "After a long debate.\n\ncost."
        );
    }

    #[test_case("Positive Consequences:"; "plain consequence label")]
    #[test_case("### Negative Consequences"; "consequence heading")]
    #[test_case("## Links"; "section heading")]
    fn phrase_followed_by_structure_stays_text(remainder: &str) {
        let line = format!("Chosen option: \"A\", because {remainder}");
        let adr = md2adr(&format!("# T\n\n## Decision Outcome\n\nSome context.\n{line}\n"));
        let outcome = &adr.decision_outcome;
        assert!(outcome.chosen_option.is_empty());
        assert_eq!(outcome.explanation, format!("Some context.\n{line}"));
        assert!(outcome.positive_consequences.is_empty());
    }

    #[test]
    fn later_phrase_is_chosen_after_one_left_as_text() {
        let adr = md2adr(
            "# T\n\n## Decision Outcome\n\nChosen option: \"A\", because ## Links\nChosen \
             option: \"B\", because cost.\n",
        );
        let outcome = &adr.decision_outcome;
        assert_eq!(outcome.chosen_option, "B");
        assert_eq!(
            outcome.explanation,
            "Chosen option: \"A\", because ## Links\ncost."
        );
    }

    #[test]
    fn title_may_appear_anywhere() {
        let adr = md2adr("## Context and Problem Statement\n\n# Late Title\n\nbody\n");
        assert_eq!(adr.title, "Late Title");
        assert_eq!(adr.context_and_problem_statement, "body");
    }

    #[test]
    fn repeated_sections_accumulate() {
        let adr = md2adr(
            "# T\n\n## Context and Problem Statement\n\nfirst\n\n## Decision Drivers\n\n- \
             a\n\n## Context and Problem Statement\n\nsecond\n\n## Decision Drivers\n\n- b\n",
        );
        assert_eq!(adr.context_and_problem_statement, "first\n\nsecond");
        assert_eq!(adr.decision_drivers, vec!["a", "b"]);
    }

    #[test]
    fn crlf_line_endings() {
        let adr = md2adr(
            "---\r\nk: v\r\n---\r\n# T\r\n\r\n## Context and Problem Statement\r\n\r\nctx\r\n",
        );
        assert_eq!(adr.yaml, "k: v");
        assert_eq!(adr.title, "T");
        assert_eq!(adr.context_and_problem_statement, "ctx");
    }
}
