//! Feature discovery and compilation into runnable scenarios.
//!
//! Each gherkin scenario becomes one [`Pickle`], and each outline example row
//! becomes its own pickle with `<name>` references substituted. Feature and
//! rule backgrounds are prepended to every pickle they apply to.

use std::fs;
use std::path::{Path, PathBuf};

use cukeglue_patterns::StepKeyword;
use gherkin::{Background, Examples, Feature, GherkinEnv, Scenario, Step};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::HostError;
use crate::value::DataTable;

/// Table or doc string attached to a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepArgument {
    /// Data table rows.
    Table(DataTable),
    /// Doc string content.
    DocString(String),
}

/// A step ready to be matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickleStep {
    /// Keyword as written, trimmed.
    pub keyword: String,
    /// Keyword with `And`/`But` resolved to the previous primary keyword.
    pub resolved_keyword: StepKeyword,
    /// Step text after outline substitution.
    pub text: String,
    /// Line in the feature file.
    pub line: u32,
    /// Attached table or doc string.
    pub argument: Option<StepArgument>,
}

/// A scenario ready to be run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pickle {
    /// Feature file path.
    pub uri: String,
    /// Feature name.
    pub feature: String,
    /// Scenario name after outline substitution.
    pub name: String,
    /// Line of the scenario, or of the example row.
    pub line: u32,
    /// Feature, rule, scenario and examples tags, each with `@`.
    pub tags: Vec<String>,
    /// Background steps followed by scenario steps.
    pub steps: Vec<PickleStep>,
}

fn line_of(line: usize) -> u32 {
    u32::try_from(line).unwrap_or(u32::MAX)
}

fn merge_tags(base: &[String], additions: &[String]) -> Vec<String> {
    let mut merged = base.to_vec();
    for tag in additions {
        let formatted = if tag.starts_with('@') {
            tag.clone()
        } else {
            format!("@{tag}")
        };
        if !merged.contains(&formatted) {
            merged.push(formatted);
        }
    }
    merged
}

/// Expand `paths` into feature files. Directories are walked recursively in
/// file-name order for `*.feature`.
///
/// # Errors
/// Returns [`HostError::FeatureNotFound`] for a missing path and
/// [`HostError::Io`] when a directory cannot be read.
pub fn discover_features(paths: &[PathBuf]) -> Result<Vec<PathBuf>, HostError> {
    let mut found = Vec::new();
    for path in paths {
        if path.is_file() {
            found.push(path.clone());
        } else if path.is_dir() {
            for entry in WalkDir::new(path).sort_by_file_name() {
                let entry = entry.map_err(std::io::Error::from)?;
                let is_feature = entry.path().extension().is_some_and(|ext| ext == "feature");
                if entry.file_type().is_file() && is_feature {
                    found.push(entry.into_path());
                }
            }
        } else {
            return Err(HostError::FeatureNotFound(path.clone()));
        }
    }
    Ok(found)
}

/// Parse one feature file.
///
/// # Errors
/// Returns [`HostError::FeatureParse`] when the file is not valid gherkin.
pub fn parse_feature(path: &Path) -> Result<Feature, HostError> {
    Feature::parse_path(path, GherkinEnv::default()).map_err(|err| HostError::FeatureParse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}

/// Parse feature text that did not come from a file.
///
/// # Errors
/// Returns [`HostError::FeatureParse`] when the text is not valid gherkin.
pub fn parse_feature_text(path: &Path, text: &str) -> Result<Feature, HostError> {
    Feature::parse(text, GherkinEnv::default()).map_err(|err| HostError::FeatureParse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}

/// Discover, parse and compile every feature under `paths`.
///
/// # Errors
/// Propagates discovery and parse failures.
pub fn load_pickles(paths: &[PathBuf]) -> Result<Vec<Pickle>, HostError> {
    let mut pickles = Vec::new();
    for path in discover_features(paths)? {
        let source = fs::read_to_string(&path)?;
        let feature = parse_feature_text(&path, &source)?;
        let compiled = compile_pickles_with_source(&feature, &path.display().to_string(), &source);
        debug!(path = %path.display(), scenarios = compiled.len(), "feature loaded");
        pickles.extend(compiled);
    }
    Ok(pickles)
}

struct Scope<'f> {
    uri: &'f str,
    source: Option<&'f str>,
    feature: &'f str,
    tags: Vec<String>,
    backgrounds: Vec<&'f Background>,
}

/// Compile a parsed feature into pickles.
///
/// Without the feature text, example rows are assumed to sit on consecutive
/// lines below their header. Use [`compile_pickles_with_source`] when the
/// text is at hand.
#[must_use]
pub fn compile_pickles(feature: &Feature, uri: &str) -> Vec<Pickle> {
    compile_feature(feature, uri, None)
}

/// Compile a parsed feature into pickles, reading example row lines from
/// `source` so comments and blank lines inside a table are accounted for.
#[must_use]
pub fn compile_pickles_with_source(feature: &Feature, uri: &str, source: &str) -> Vec<Pickle> {
    compile_feature(feature, uri, Some(source))
}

fn compile_feature<'f>(feature: &'f Feature, uri: &'f str, source: Option<&'f str>) -> Vec<Pickle> {
    let feature_scope = Scope {
        uri,
        source,
        feature: &feature.name,
        tags: merge_tags(&[], &feature.tags),
        backgrounds: feature.background.iter().collect(),
    };
    let mut pickles = Vec::new();
    for scenario in &feature.scenarios {
        compile_scenario(&feature_scope, scenario, &mut pickles);
    }
    for rule in &feature.rules {
        let mut backgrounds = feature_scope.backgrounds.clone();
        backgrounds.extend(rule.background.iter());
        let rule_scope = Scope {
            uri,
            source,
            feature: &feature.name,
            tags: merge_tags(&feature_scope.tags, &rule.tags),
            backgrounds,
        };
        for scenario in &rule.scenarios {
            compile_scenario(&rule_scope, scenario, &mut pickles);
        }
    }
    pickles
}

fn compile_scenario(scope: &Scope<'_>, scenario: &Scenario, out: &mut Vec<Pickle>) {
    let tags = merge_tags(&scope.tags, &scenario.tags);
    let background_steps = scope.backgrounds.iter().flat_map(|b| &b.steps);
    if scenario.examples.is_empty() {
        let steps = background_steps
            .chain(&scenario.steps)
            .map(|step| (step, substitute_step(step, &[])))
            .collect();
        out.push(pickle(scope, scenario.name.clone(), line_of(scenario.position.line), tags, steps));
        return;
    }
    for examples in &scenario.examples {
        for (line, row) in example_rows(examples, scope.source) {
            let name = substitute(&scenario.name, &row);
            let steps = background_steps
                .clone()
                .map(|step| (step, substitute_step(step, &[])))
                .chain(scenario.steps.iter().map(|step| (step, substitute_step(step, &row))))
                .collect();
            out.push(pickle(scope, name, line, merge_tags(&tags, &examples.tags), steps));
        }
    }
}

type Substituted = (String, Option<StepArgument>);

fn pickle(
    scope: &Scope<'_>,
    name: String,
    line: u32,
    tags: Vec<String>,
    steps: Vec<(&Step, Substituted)>,
) -> Pickle {
    let mut previous = None;
    let steps = steps
        .into_iter()
        .map(|(step, (text, argument))| {
            let written = StepKeyword::from_gherkin(&step.keyword, step.ty).ok();
            let resolved_keyword = written
                .unwrap_or(StepKeyword::Given)
                .resolve(&mut previous);
            PickleStep {
                keyword: step.keyword.trim().to_string(),
                resolved_keyword,
                text,
                line: line_of(step.position.line),
                argument,
            }
        })
        .collect();
    Pickle {
        uri: scope.uri.to_string(),
        feature: scope.feature.to_string(),
        name,
        line,
        tags,
        steps,
    }
}

/// Lines of the first `rows` table rows at or below `first_line`, skipping
/// blank and comment lines.
fn table_row_lines(source: &str, first_line: usize, rows: usize) -> Vec<usize> {
    source
        .lines()
        .enumerate()
        .skip(first_line.saturating_sub(1))
        .filter(|(_, text)| {
            let text = text.trim();
            !text.is_empty() && !text.starts_with('#')
        })
        .take_while(|(_, text)| text.trim_start().starts_with('|'))
        .take(rows)
        .map(|(index, _)| index + 1)
        .collect()
}

fn example_rows(examples: &Examples, source: Option<&str>) -> Vec<(u32, Vec<(String, String)>)> {
    let Some(table) = examples.table.as_ref() else {
        return Vec::new();
    };
    let Some((header, body)) = table.rows.split_first() else {
        return Vec::new();
    };
    let first_line = table.position.line;
    let row_lines = source
        .map(|text| table_row_lines(text, first_line, table.rows.len()))
        .unwrap_or_default();
    body.iter()
        .enumerate()
        .map(|(index, row)| {
            let values = header.iter().cloned().zip(row.iter().cloned()).collect();
            let line = row_lines
                .get(index + 1)
                .copied()
                .unwrap_or(first_line + index + 1);
            (line_of(line), values)
        })
        .collect()
}

fn substitute(text: &str, row: &[(String, String)]) -> String {
    row.iter().fold(text.to_string(), |acc, (name, value)| {
        acc.replace(&format!("<{name}>"), value)
    })
}

fn substitute_step(step: &Step, row: &[(String, String)]) -> Substituted {
    let text = substitute(&step.value, row);
    let argument = step
        .table
        .as_ref()
        .map(|table| {
            StepArgument::Table(DataTable::new(
                table
                    .rows
                    .iter()
                    .map(|cells| cells.iter().map(|cell| substitute(cell, row)).collect())
                    .collect(),
            ))
        })
        .or_else(|| {
            step.docstring
                .as_ref()
                .map(|doc| StepArgument::DocString(substitute(doc, row)))
        });
    (text, argument)
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "tests fail loudly on unexpected errors")]
mod tests {
    use super::*;
    use std::fs;

    fn compile(text: &str) -> Vec<Pickle> {
        let feature = parse_feature_text(Path::new("inline.feature"), text)
            .expect("feature should parse");
        compile_pickles(&feature, "inline.feature")
    }

    fn texts(pickle: &Pickle) -> Vec<&str> {
        pickle.steps.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn prepends_background_steps() {
        let pickles = compile(
            "Feature: Cukes\n\
             \n  Background:\n    Given a belly\n\
             \n  Scenario: eating\n    When I eat 3 cukes\n    Then I am full\n",
        );
        let [only] = pickles.as_slice() else {
            panic!("expected one pickle, got {}", pickles.len());
        };
        assert_eq!(texts(only), ["a belly", "I eat 3 cukes", "I am full"]);
        assert_eq!(only.name, "eating");
        assert_eq!(only.feature, "Cukes");
    }

    #[test]
    fn expands_outline_rows() {
        let pickles = compile(
            "Feature: Cukes\n\
             \n  Scenario Outline: eating <count>\n    Given I have <count> cukes\n\
             \n    Examples:\n      | count |\n      | 1     |\n      | 12    |\n",
        );
        let names: Vec<_> = pickles.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["eating 1", "eating 12"]);
        let steps: Vec<_> = pickles.iter().flat_map(texts).collect();
        assert_eq!(steps, ["I have 1 cukes", "I have 12 cukes"]);
        assert!(pickles.iter().all(|p| p.line > 3));
    }

    #[test]
    fn example_row_lines_skip_comments_and_blank_lines() {
        let text = "Feature: Cukes\n\
             \n  Scenario Outline: eating <count>\n    Given I have <count> cukes\n\
             \n    Examples:\n      | count |\n      # small\n      | 1     |\n\
             \n      | 12    |\n";
        let feature = parse_feature_text(Path::new("inline.feature"), text)
            .expect("feature should parse");
        let lines: Vec<_> = compile_pickles_with_source(&feature, "inline.feature", text)
            .iter()
            .map(|p| p.line)
            .collect();
        assert_eq!(lines, [9, 11]);
    }

    #[test]
    fn example_row_lines_without_source_follow_the_header() {
        let lines: Vec<_> = compile(
            "Feature: Cukes\n  Scenario Outline: o\n    Given <n>\n    Examples:\n      | n |\n      | 1 |\n      | 2 |\n",
        )
        .iter()
        .map(|p| p.line)
        .collect();
        assert_eq!(lines, [6, 7]);
    }

    #[test]
    fn resolves_conjunctions_for_snippets() {
        let pickles = compile(
            "Feature: Cukes\n  Scenario: s\n    Given a\n    And b\n    When c\n    But d\n",
        );
        let keywords: Vec<_> = pickles
            .iter()
            .flat_map(|p| &p.steps)
            .map(|s| (s.keyword.as_str(), s.resolved_keyword))
            .collect();
        assert_eq!(
            keywords,
            [
                ("Given", StepKeyword::Given),
                ("And", StepKeyword::Given),
                ("When", StepKeyword::When),
                ("But", StepKeyword::When),
            ]
        );
    }

    #[test]
    fn carries_tables_and_doc_strings() {
        let pickles = compile(
            "Feature: Cukes\n  Scenario: s\n    Given a table\n      | a | b |\n      | 1 | 2 |\n\
             \n    And a doc string\n      \"\"\"\n      hello\n      \"\"\"\n",
        );
        let arguments: Vec<_> = pickles
            .iter()
            .flat_map(|p| &p.steps)
            .map(|s| s.argument.clone())
            .collect();
        assert!(matches!(
            arguments.as_slice(),
            [Some(StepArgument::Table(t)), Some(StepArgument::DocString(d))]
                if t.height() == 2 && d.trim() == "hello"
        ));
    }

    #[test]
    fn tags_are_inherited_with_at_sign() {
        let pickles = compile("@slow\nFeature: Cukes\n  @wip\n  Scenario: s\n    Given a\n");
        assert_eq!(
            pickles.first().map(|p| p.tags.clone()),
            Some(vec!["@slow".to_string(), "@wip".to_string()])
        );
    }

    #[test]
    fn discovers_feature_files_in_directories() {
        let dir = tempfile::tempdir().expect("temp dir is created");
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).expect("directory is created");
        for path in [dir.path().join("b.feature"), nested.join("a.feature")] {
            fs::write(&path, "Feature: x\n").expect("file is written");
        }
        fs::write(dir.path().join("notes.txt"), "").expect("file is written");

        let found = discover_features(&[dir.path().to_path_buf()])
            .expect("features are discovered");
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|p| p.extension().is_some_and(|e| e == "feature")));
    }

    #[test]
    fn missing_path_is_reported() {
        let result = discover_features(&[PathBuf::from("definitely/not/here")]);
        assert!(matches!(result, Err(HostError::FeatureNotFound(_))));
    }
}
