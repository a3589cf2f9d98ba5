//! Suggested glue for undefined steps, written as builder calls.

use cukeglue_host::{Snippet, TargetType};

const TEMPLATE: &str = "step(StepKeyword::{0}, \"{1}\", |world, args| {
    // {2}({3})
    // {4}
{5}    Ok(world)
}),
";

const HINT_COMMENT: &str = "Write code here that turns the phrase above into concrete actions";

const TABLE_HINT: &str = "    // Chain .consumes_table() and read the table with args.table(N);
    // .consumes_transposed_table() swaps its rows and columns first.
";

/// Snippet text for glue declared with [`step`](crate::step).
#[derive(Debug, Clone, Copy, Default)]
pub struct RustSnippet;

impl Snippet for RustSnippet {
    fn template(&self) -> &str {
        TEMPLATE
    }

    fn table_hint(&self) -> &str {
        TABLE_HINT
    }

    fn hint_comment(&self) -> &str {
        HINT_COMMENT
    }

    fn arguments(&self, arguments: &[(String, TargetType)]) -> String {
        arguments
            .iter()
            .map(|(name, target)| format!("{name}: {}", target.type_name()))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn escape_pattern(&self, pattern: &str) -> String {
        pattern.replace('\\', "\\\\").replace('"', "\\\"")
    }
}
