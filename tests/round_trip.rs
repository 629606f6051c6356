//! Property tests for the markdown converter.

#![allow(missing_docs)]

use adr_manager::{ConsideredOption, DecisionOutcome, StructuredAdr, adr2md, md2adr};
use proptest::prelude::*;

/// Lines that carry meaning somewhere in a MADR document.
const FRAGMENTS: &[&str] = &[
    "---",
    "",
    "   ",
    "#",
    "# Title",
    "## Context and Problem Statement",
    "## Decision Drivers",
    "## Considered Options",
    "## Pros and Cons of the Options",
    "## Decision Outcome",
    "## Links",
    "## Technical Story",
    "## Unknown Section",
    "### Option",
    "###",
    "#### Pros",
    "**Pros:**",
    "**Cons**:",
    "Cons:",
    "### Positive Consequences",
    "**Negative Consequences:**",
    "- item",
    "* item",
    "+ item",
    "-",
    "- Good, because fast",
    "* Bad, because slow",
    "- Good, because Bad, because",
    "Chosen option: \"A\", because reasons",
    "Chosen option: **B**",
    "Chosen option: \"\"",
    "Chosen option: \"a\"b\", because",
    "Chosen option: \"a\", because ### Positive Consequences",
    "Chosen option: \"a\", because Negative Consequences:",
    "Chosen option: **b**, because ## Links",
    "* Status: accepted * Deciders: team * Date: today * Technical Story: #1",
    "- Date: yesterday",
    "Technical Story: inline",
    "Status: bare",
    "text * Status: trailing",
    "key: value",
    "  indented text",
    "plain text",
    "\t- tabbed bullet",
];

fn soup() -> impl Strategy<Value = String> {
    let line = prop_oneof![
        3 => prop::sample::select(FRAGMENTS).prop_map(str::to_owned),
        1 => "[ -~]{0,12}",
    ];
    prop::collection::vec(line, 0..40).prop_map(|lines| lines.join("\n"))
}

/// Text that never looks like markdown structure.
fn words(max: usize) -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z][a-z0-9]{0,7}", 0..max).prop_map(|words| words.join(" "))
}

fn paragraphs() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::collection::vec(words(6), 1..3), 0..3).prop_map(|paragraphs| {
        paragraphs
            .iter()
            .map(|lines| lines.join("\n"))
            .collect::<Vec<_>>()
            .join("\n\n")
    })
}

fn items() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(words(4), 0..4)
}

prop_compose! {
    fn option()(
        title in words(3),
        description in paragraphs(),
        pros in items(),
        cons in items(),
    ) -> ConsideredOption {
        ConsideredOption { title, description, pros, cons }
    }
}

prop_compose! {
    fn plain_record()(
        yaml in prop::collection::vec("[a-z]{1,6}: [a-z0-9]{0,6}", 0..3),
        title in words(5),
        metadata in (words(2), words(2), words(2), words(2)),
        context in paragraphs(),
        decision_drivers in items(),
        considered_options in prop::collection::vec(option(), 0..3),
        chosen_option in words(3),
        explanation in paragraphs(),
        positive_consequences in items(),
        negative_consequences in items(),
        links in items(),
    ) -> StructuredAdr {
        let (date, status, deciders, technical_story) = metadata;
        StructuredAdr {
            yaml: yaml.join("\n"),
            title,
            date,
            status,
            deciders,
            technical_story,
            context_and_problem_statement: context,
            decision_drivers,
            considered_options,
            decision_outcome: DecisionOutcome {
                chosen_option,
                explanation,
                positive_consequences,
                negative_consequences,
            },
            links,
        }
    }
}

prop_compose! {
    fn arbitrary_record()(
        strings in prop::collection::vec(any::<String>(), 10),
        lists in prop::collection::vec(prop::collection::vec(any::<String>(), 0..3), 7),
    ) -> StructuredAdr {
        let [yaml, title, date, status, deciders, technical_story, context, chosen, explanation, option_title] =
            <[String; 10]>::try_from(strings).unwrap();
        let [drivers, links, positive, negative, pros, cons, _] =
            <[Vec<String>; 7]>::try_from(lists).unwrap();
        StructuredAdr {
            yaml,
            title,
            date,
            status,
            deciders,
            technical_story,
            context_and_problem_statement: context,
            decision_drivers: drivers,
            considered_options: vec![ConsideredOption {
                title: option_title,
                description: String::new(),
                pros,
                cons,
            }],
            decision_outcome: DecisionOutcome {
                chosen_option: chosen,
                explanation,
                positive_consequences: positive,
                negative_consequences: negative,
            },
            links,
        }
    }
}

fn assert_converges(input: &str) -> Result<(), TestCaseError> {
    let once = adr2md(&md2adr(input));
    let twice = adr2md(&md2adr(&once));
    prop_assert_eq!(&once, &twice, "input: {:?}", input);
    Ok(())
}

proptest! {
    #[test]
    fn arbitrary_strings_converge(input in any::<String>()) {
        assert_converges(&input)?;
    }

    #[test]
    fn markdown_soup_converges(input in soup()) {
        assert_converges(&input)?;
    }

    #[test]
    fn plain_records_round_trip(adr in plain_record()) {
        prop_assert_eq!(md2adr(&adr2md(&adr)), adr.normalized());
    }

    #[test]
    fn canonical_output_is_a_fixed_point(adr in plain_record()) {
        let markdown = adr2md(&adr);
        prop_assert_eq!(adr2md(&md2adr(&markdown)), markdown);
    }

    #[test]
    fn arbitrary_records_converge(adr in arbitrary_record()) {
        let once = adr2md(&adr);
        assert_converges(&once)?;
    }

    #[test]
    fn decoded_records_are_normalized(input in soup()) {
        let adr = md2adr(&input);
        prop_assert_eq!(adr.normalized(), adr);
    }
}

#[test]
fn empty_input_gives_empty_record() {
    assert_eq!(md2adr(""), StructuredAdr::default());
    assert_eq!(adr2md(&StructuredAdr::default()), "#\n\n## Context and Problem Statement\n");
}
