use winnow::ascii::space0;
use winnow::combinator::delimited;
use winnow::error::ModalResult;
use winnow::prelude::*;
use winnow::token::take_while;

/// Name of the section holding the rule block.
pub const RULES_SECTION: &str = "RULES";
/// Name of the section holding `KEY=VALUE` policy settings.
pub const POLICY_SECTION: &str = "POLICY";

/// A block of lines under one `[NAME]` header.
///
/// Lines before the first header form an unnamed preamble section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section<'a> {
    name: Option<&'a str>,
    lines: Vec<(usize, &'a str)>,
}

impl<'a> Section<'a> {
    /// Header name, or `None` for the preamble.
    #[must_use]
    pub fn name(&self) -> Option<&'a str> {
        self.name
    }

    /// Body lines with their 1-based line numbers in the full document.
    pub fn lines(&self) -> impl Iterator<Item = (usize, &'a str)> + '_ {
        self.lines.iter().copied()
    }

    fn is_blank(&self) -> bool {
        self.lines.iter().all(|(_, l)| l.trim().is_empty())
    }

    /// Body text joined with newlines and trimmed, as handed to collaborators
    /// such as a diagram renderer.
    #[must_use]
    pub fn text(&self) -> String {
        let joined: Vec<&str> = self.lines.iter().map(|&(_, l)| l).collect();
        joined.join("\n").trim().to_owned()
    }
}

/// Instruction text split into sections.
///
/// Only the rule and policy sections are interpreted by the engine; every
/// other section is carried verbatim and never read by the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document<'a> {
    sections: Vec<Section<'a>>,
    has_headers: bool,
}

impl<'a> Document<'a> {
    #[must_use]
    pub fn parse(text: &'a str) -> Self {
        let mut sections = vec![Section {
            name: None,
            lines: Vec::new(),
        }];
        let mut has_headers = false;

        for (idx, line) in text.lines().enumerate() {
            if let Some(name) = header_name(line) {
                has_headers = true;
                sections.push(Section {
                    name: Some(name),
                    lines: Vec::new(),
                });
            } else if let Some(current) = sections.last_mut() {
                current.lines.push((idx + 1, line));
            }
        }

        Self {
            sections,
            has_headers,
        }
    }

    /// First section with the given header name (ASCII case-insensitive).
    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Section<'a>> {
        self.sections
            .iter()
            .find(|s| s.name.is_some_and(|n| n.eq_ignore_ascii_case(name)))
    }

    /// The rule block.
    ///
    /// The first `[RULES]` section when there is one. Otherwise the text
    /// before the first header, which covers a document without headers and
    /// rules followed by `[POLICY]` or `[MERMAID]`. `None` means there is no
    /// `[RULES]` section and the preamble is blank.
    #[must_use]
    pub fn rule_block(&self) -> Option<&Section<'a>> {
        if let Some(rules) = self.section(RULES_SECTION) {
            return Some(rules);
        }
        self.sections
            .first()
            .filter(|s| !self.has_headers || !s.is_blank())
    }

    #[must_use]
    pub fn policy_block(&self) -> Option<&Section<'a>> {
        self.section(POLICY_SECTION)
    }

    #[must_use]
    pub fn has_headers(&self) -> bool {
        self.has_headers
    }

    /// Header names in document order.
    pub fn section_names(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.sections.iter().filter_map(|s| s.name)
    }
}

fn header<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    delimited(
        (space0, '['),
        (
            take_while(1, |c: char| c.is_ascii_alphabetic() || c == '_'),
            take_while(0.., |c: char| c.is_ascii_alphanumeric() || c == '_'),
        )
            .take(),
        (']', space0),
    )
    .parse_next(input)
}

fn header_name(line: &str) -> Option<&str> {
    header.parse(line).ok()
}
