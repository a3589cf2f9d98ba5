//! Suggested glue for undefined steps.
//!
//! The engine turns the step text into an expression by replacing pieces that
//! look like snippet-enabled parameter types with placeholders, then renders
//! the backend's [`Snippet`] template around it.

use std::collections::BTreeMap;

use convert_case::{Case, Casing};
use cukeglue_patterns::StepKeyword;
use regex::Regex;

use crate::backend::Snippet;
use crate::feature::StepArgument;
use crate::parameter::TargetType;
use crate::registry::TypeRegistry;

/// Expression text suggested for a step, with its parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedExpression {
    /// Expression text with `(`, `{` and `/` escaped.
    pub source: String,
    /// Suggested parameter names and types, in placeholder order.
    pub parameters: Vec<(String, TargetType)>,
}

struct Matcher {
    name: String,
    target_type: TargetType,
    regex: Regex,
    strong: bool,
}

struct Candidate<'m> {
    matcher: &'m Matcher,
    start: usize,
    end: usize,
}

fn is_word_char(ch: Option<char>) -> bool {
    ch.is_some_and(char::is_alphanumeric)
}

impl Matcher {
    /// First match at or after `from` that does not start or end inside a
    /// word.
    fn find_from(&self, text: &str, from: usize) -> Option<Candidate<'_>> {
        let mut start = from;
        while let Some(found) = self.regex.find_at(text, start) {
            let before = text.get(..found.start()).and_then(|s| s.chars().next_back());
            let after = text.get(found.end()..).and_then(|s| s.chars().next());
            if !found.is_empty() && !is_word_char(before) && !is_word_char(after) {
                return Some(Candidate {
                    matcher: self,
                    start: found.start(),
                    end: found.end(),
                });
            }
            let step = text
                .get(found.start()..)
                .and_then(|s| s.chars().next())
                .map_or(1, char::len_utf8);
            start = found.start() + step;
            if start > text.len() {
                break;
            }
        }
        None
    }
}

fn escape_literal(text: &str, out: &mut String) {
    for ch in text.chars() {
        if matches!(ch, '(' | '{' | '/') {
            out.push('\\');
        }
        out.push(ch);
    }
}

fn parameter_name(base: &str, used: &mut BTreeMap<String, usize>) -> String {
    let base = if base.is_empty() { "arg" } else { base };
    let count = used.entry(base.to_string()).or_insert(0);
    *count += 1;
    if *count == 1 {
        base.to_string()
    } else {
        format!("{base}{count}")
    }
}

/// Suggest an expression for `text` using the snippet-enabled types of
/// `registry`.
///
/// At each position the earliest match wins, then the longest. Between types
/// matching the same span, one with a strong type hint beats one without,
/// and otherwise the type registered first wins.
///
/// # Examples
/// ```
/// use cukeglue_host::{ParameterTypeRegistry, generate_expression};
///
/// let generated = generate_expression(&ParameterTypeRegistry::new(), r#"I have 42 "big" cukes (today)"#);
/// assert_eq!(generated.source, r"I have {int} {string} cukes \(today)");
/// ```
#[must_use]
pub fn generate_expression(registry: &dyn TypeRegistry, text: &str) -> GeneratedExpression {
    let matchers: Vec<Matcher> = registry
        .list_all_known_types()
        .iter()
        .filter(|t| t.is_used_for_snippets())
        .flat_map(|t| {
            t.regexps().iter().filter_map(move |regexp| {
                Regex::new(regexp).ok().map(|regex| Matcher {
                    name: t.name().to_string(),
                    target_type: t.target_type().clone(),
                    regex,
                    strong: t.has_strong_type_hint(),
                })
            })
        })
        .collect();

    let mut source = String::with_capacity(text.len());
    let mut parameters = Vec::new();
    let mut used = BTreeMap::new();
    let mut pos = 0;
    loop {
        let best = matchers
            .iter()
            .filter_map(|m| m.find_from(text, pos))
            .reduce(|best, next| {
                let same_span = next.start == best.start && next.end == best.end;
                let better = next.start < best.start
                    || (next.start == best.start && next.end > best.end)
                    || (same_span && next.matcher.strong && !best.matcher.strong);
                if better { next } else { best }
            });
        let Some(best) = best else {
            break;
        };
        escape_literal(text.get(pos..best.start).unwrap_or_default(), &mut source);
        source.push('{');
        source.push_str(&best.matcher.name);
        source.push('}');
        parameters.push((
            parameter_name(&best.matcher.name, &mut used),
            best.matcher.target_type.clone(),
        ));
        pos = best.end;
    }
    escape_literal(text.get(pos..).unwrap_or_default(), &mut source);
    GeneratedExpression { source, parameters }
}

/// Derive a snake-case function name from expression text.
///
/// # Examples
/// ```
/// use cukeglue_host::function_name;
///
/// assert_eq!(function_name("I have {int} cukes in my belly"), "i_have_cukes_in_my_belly");
/// assert_eq!(function_name("{int}"), "step");
/// ```
#[must_use]
pub fn function_name(expression: &str) -> String {
    let mut words = String::with_capacity(expression.len());
    let mut in_placeholder = false;
    for ch in expression.chars() {
        match ch {
            '{' => in_placeholder = true,
            '}' => in_placeholder = false,
            _ if in_placeholder => {}
            c if c.is_alphanumeric() => words.push(c),
            _ => words.push(' '),
        }
    }
    let name = words.trim().to_case(Case::Snake);
    match name.chars().next() {
        None => "step".to_string(),
        Some(first) if first.is_numeric() => format!("step_{name}"),
        Some(_) => name,
    }
}

/// Substitute `{0}`..`{9}` in `template`; other braces are copied verbatim.
#[must_use]
pub fn render_template(template: &str, slots: &[&str]) -> String {
    let mut out = String::with_capacity(template.len() + 64);
    let mut chars = template.chars();
    while let Some(ch) = chars.next() {
        if ch == '{' {
            let mut lookahead = chars.clone();
            let slot = lookahead
                .next()
                .and_then(|d| d.to_digit(10))
                .and_then(|d| usize::try_from(d).ok())
                .filter(|_| lookahead.next() == Some('}'))
                .and_then(|d| slots.get(d));
            if let Some(value) = slot {
                out.push_str(value);
                chars = lookahead;
                continue;
            }
        }
        out.push(ch);
    }
    out
}

/// Renders suggestions for undefined steps.
pub struct SnippetGenerator<'a> {
    registry: &'a dyn TypeRegistry,
    snippet: &'a dyn Snippet,
}

impl<'a> SnippetGenerator<'a> {
    /// Generate with the types of `registry` and the template of `snippet`.
    #[must_use]
    pub fn new(registry: &'a dyn TypeRegistry, snippet: &'a dyn Snippet) -> Self {
        Self { registry, snippet }
    }

    /// Render a suggestion for a step.
    ///
    /// `keyword` should already have `And`/`But` resolved.
    #[must_use]
    pub fn generate(
        &self,
        keyword: StepKeyword,
        text: &str,
        argument: Option<&StepArgument>,
    ) -> String {
        let generated = generate_expression(self.registry, text);
        let mut parameters = generated.parameters;
        match argument {
            Some(StepArgument::Table(_)) => {
                parameters.push(("table".to_string(), TargetType::DataTable));
            }
            Some(StepArgument::DocString(_)) => {
                parameters.push(("doc_string".to_string(), TargetType::DocString));
            }
            None => {}
        }
        let table_hint = if matches!(argument, Some(StepArgument::Table(_))) {
            self.snippet.table_hint()
        } else {
            ""
        };
        render_template(
            self.snippet.template(),
            &[
                keyword.as_str(),
                &self.snippet.escape_pattern(&generated.source),
                &function_name(&generated.source),
                &self.snippet.arguments(&parameters),
                self.snippet.hint_comment(),
                table_hint,
            ],
        )
    }
}
