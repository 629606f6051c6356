use crate::{
    domain::{ConsideredOption, DecisionOutcome, StructuredAdr},
    storage::markdown::syntax::{
        CHOSEN_OPTION, CONS, CONSIDERED_OPTIONS, CONTEXT, DECISION_DRIVERS, DECISION_OUTCOME,
        LINKS, NEGATIVE_CONSEQUENCES, POSITIVE_CONSEQUENCES, PROS,
    },
};

/// Renders a record as canonical MADR markdown.
///
/// The [normalized](StructuredAdr::normalized) form of the record is written.
/// Sections with nothing in them are left out, except for the context which
/// is always present. Blocks are separated by a single blank line and the
/// output ends with one newline.
#[must_use]
pub fn adr2md(adr: &StructuredAdr) -> String {
    let adr = adr.normalized();
    let mut blocks: Vec<String> = Vec::new();

    if !adr.yaml.is_empty() {
        blocks.push(format!("---\n{}\n---", adr.yaml));
    }

    blocks.push(heading(1, &adr.title));

    if adr.has_metadata() {
        blocks.push(metadata_line(&adr));
    }

    blocks.push(heading(2, CONTEXT));
    push_text(&mut blocks, &adr.context_and_problem_statement);

    if !adr.decision_drivers.is_empty() {
        blocks.push(heading(2, DECISION_DRIVERS));
        blocks.push(bullets(&adr.decision_drivers));
    }

    if !adr.considered_options.is_empty() {
        blocks.push(heading(2, CONSIDERED_OPTIONS));
        for option in &adr.considered_options {
            push_option(&mut blocks, option);
        }
    }

    if !adr.decision_outcome.is_empty() {
        blocks.push(heading(2, DECISION_OUTCOME));
        push_outcome(&mut blocks, &adr.decision_outcome);
    }

    if !adr.links.is_empty() {
        blocks.push(heading(2, LINKS));
        blocks.push(bullets(&adr.links));
    }

    let mut markdown = blocks.join("\n\n");
    markdown.push('\n');
    markdown
}

fn heading(level: usize, text: &str) -> String {
    let marker = "#".repeat(level);
    if text.is_empty() {
        marker
    } else {
        format!("{marker} {text}")
    }
}

fn metadata_line(adr: &StructuredAdr) -> String {
    [
        ("Status", &adr.status),
        ("Deciders", &adr.deciders),
        ("Date", &adr.date),
        ("Technical Story", &adr.technical_story),
    ]
    .into_iter()
    .filter(|(_, value)| !value.is_empty())
    .map(|(label, value)| format!("* {label}: {value}"))
    .collect::<Vec<_>>()
    .join(" ")
}

fn bullets(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn push_text(blocks: &mut Vec<String>, text: &str) {
    if !text.is_empty() {
        blocks.push(text.to_owned());
    }
}

fn push_list(blocks: &mut Vec<String>, label: String, items: &[String]) {
    if !items.is_empty() {
        blocks.push(label);
        blocks.push(bullets(items));
    }
}

fn push_option(blocks: &mut Vec<String>, option: &ConsideredOption) {
    blocks.push(heading(3, &option.title));
    push_text(blocks, &option.description);
    push_list(blocks, format!("**{PROS}:**"), &option.pros);
    push_list(blocks, format!("**{CONS}:**"), &option.cons);
}

fn push_outcome(blocks: &mut Vec<String>, outcome: &DecisionOutcome) {
    if outcome.chosen_option.is_empty() {
        push_text(blocks, &outcome.explanation);
    } else {
        let title = &outcome.chosen_option;
        let mut sentence = if title.contains('"') {
            format!("{CHOSEN_OPTION} **{title}**")
        } else {
            format!("{CHOSEN_OPTION} \"{title}\"")
        };
        if !outcome.explanation.is_empty() {
            sentence.push_str(", because ");
            sentence.push_str(&outcome.explanation);
        }
        blocks.push(sentence);
    }

    push_list(
        blocks,
        heading(3, POSITIVE_CONSEQUENCES),
        &outcome.positive_consequences,
    );
    push_list(
        blocks,
        heading(3, NEGATIVE_CONSEQUENCES),
        &outcome.negative_consequences,
    );
}
