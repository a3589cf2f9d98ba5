//! End-to-end runs of glue definitions through the host engine.
#![expect(clippy::expect_used, reason = "integration tests fail loudly on setup errors")]

use std::fs;
use std::path::{Path, PathBuf};

use cukeglue::{
    DEFAULT_HOST_ARGS, EXIT_CONFIG, EXIT_FAILURE, EXIT_SUCCESS, GlueBackend, GlueDefinition,
    ParameterTypeSpec, StepKeyword, TargetType, Value, World, after, after_all, before,
    before_all, before_step, parameter_type, run, step,
};
use cukeglue_host::{HostConfig, HostError, RunSummary, Runtime, RuntimeOptions, Status};
use rstest::{fixture, rstest};
use serial_test::serial;
use tempfile::TempDir;

type Log = Vec<String>;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn feature(&self, name: &str, text: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, text).expect("feature file is written");
        path
    }

    fn report_plugin(&self) -> String {
        format!("json:{}", self.dir.path().join("report.json").display())
    }

    fn report(&self) -> String {
        fs::read_to_string(self.dir.path().join("report.json"))
            .expect("report is readable")
    }
}

#[fixture]
fn workspace() -> Workspace {
    Workspace {
        dir: tempfile::tempdir().expect("temp dir is created"),
    }
}

fn execute(
    workspace: &Workspace,
    glue: Vec<GlueDefinition<Log>>,
    feature: &Path,
) -> Result<(RunSummary, World<Log>), HostError> {
    let plugin = workspace.report_plugin();
    let feature = feature.display().to_string();
    let options = RuntimeOptions::parse_args(["--plugin", plugin.as_str(), feature.as_str()])?;
    let runtime = Runtime::new(options, HostConfig::default());
    let mut backend = GlueBackend::new(glue);
    let mut world = World::new();
    let summary = runtime.run(&mut backend, &mut world)?;
    Ok((summary, world))
}

fn entries(world: &World<Log>) -> Vec<String> {
    world.get().cloned().unwrap_or_default()
}

fn statuses(summary: &RunSummary) -> Vec<Vec<Status>> {
    summary
        .scenarios
        .iter()
        .map(|s| s.steps.iter().map(|step| step.status).collect())
        .collect()
}

fn push(world: Option<Log>, entry: String) -> Option<Log> {
    let mut log = world.unwrap_or_default();
    log.push(entry);
    Some(log)
}

fn logging_glue() -> Vec<GlueDefinition<Log>> {
    vec![
        before(|world, scenario| Ok(push(world, format!("h {}", scenario.name())))).into(),
        step(StepKeyword::Given, "I have {int} cukes", |world, args| {
            Ok(push(world, format!("s1 {}", args.integer(0)?)))
        })
        .into(),
        step(StepKeyword::When, r"^I eat (\d+) (\w+) cukes$", |world, args| {
            let kinds: Vec<_> = args.iter().map(Value::kind).collect();
            Ok(push(world, format!("s2 {}", kinds.join(","))))
        })
        .into(),
    ]
}

const CUKES: &str = "\
Feature: Cukes

  Scenario: eating
    Given I have 42 cukes
    When I eat 3 green cukes
";

#[rstest]
#[serial]
fn hooks_and_steps_thread_one_world(workspace: Workspace) {
    let feature = workspace.feature("cukes.feature", CUKES);
    let (summary, world) =
        execute(&workspace, logging_glue(), &feature).expect("run completes");

    assert!(summary.is_success());
    assert_eq!(entries(&world), ["h eating", "s1 42", "s2 integer,text"]);
    assert!(workspace.report().contains("\"status\": \"passed\""));
}

#[rstest]
#[serial]
fn world_is_shared_across_scenarios(workspace: Workspace) {
    let feature = workspace.feature(
        "twice.feature",
        "Feature: Twice\n  Scenario: one\n    Given I have 1 cukes\n  Scenario: two\n    Given I have 2 cukes\n",
    );
    let (_, world) =
        execute(&workspace, logging_glue(), &feature).expect("run completes");

    assert_eq!(entries(&world), ["h one", "s1 1", "h two", "s1 2"]);
}

#[derive(Debug, Clone, PartialEq)]
struct Colour(String);

#[rstest]
#[serial]
fn custom_parameter_types_transform_their_text(workspace: Workspace) {
    let glue = vec![
        step(StepKeyword::Given, "I pick {colour}", |world, args| {
            let colour = args.custom::<Colour>(0)?;
            Ok(push(world, colour.0.clone()))
        })
        .into(),
        parameter_type(ParameterTypeSpec::new(
            "colour",
            vec!["red|blue".into()],
            TargetType::Named("Colour".into()),
            |text| Ok(Value::custom(Colour(text.to_uppercase()))),
        ))
        .into(),
    ];
    let feature = workspace.feature(
        "colour.feature",
        "Feature: Colour\n  Scenario: pick\n    Given I pick red\n",
    );
    let (summary, world) =
        execute(&workspace, glue, &feature).expect("run completes");

    assert!(summary.is_success());
    assert_eq!(entries(&world), ["RED"]);
}

#[rstest]
#[serial]
fn failed_step_keeps_world_and_skips_the_rest(workspace: Workspace) {
    let glue = vec![
        step(StepKeyword::Given, "I have {int} cukes", |world, args| {
            Ok(push(world, format!("have {}", args.integer(0)?)))
        })
        .into(),
        step(StepKeyword::When, "the belly growls", |world, _| {
            let _discarded = push(world, "growl".into());
            Err("grumble".into())
        })
        .into(),
    ];
    let feature = workspace.feature(
        "growl.feature",
        "Feature: Growl\n  Scenario: hungry\n    Given I have 1 cukes\n    When the belly growls\n    Then I have 2 cukes\n",
    );
    let (summary, world) =
        execute(&workspace, glue, &feature).expect("run completes");

    assert_eq!(
        statuses(&summary),
        [vec![Status::Passed, Status::Failed, Status::Skipped]]
    );
    assert_eq!(entries(&world), ["have 1"]);
}

#[rstest]
#[serial]
fn panics_map_back_to_the_defining_step(workspace: Workspace) {
    let line = line!() + 1;
    let boom = step(StepKeyword::Given, "the belly explodes", |_, _| panic!("kaboom"));
    let glue: Vec<GlueDefinition<Log>> = vec![boom.into()];
    let feature = workspace.feature(
        "boom.feature",
        "Feature: Boom\n  Scenario: greedy\n    Given the belly explodes\n",
    );
    let (summary, _) =
        execute(&workspace, glue, &feature).expect("run completes");

    let result = summary
        .scenarios
        .first()
        .and_then(|s| s.steps.first())
        .expect("expected a step result");
    let here = format!("{}:{line}", file!());
    assert_eq!(result.error.as_deref(), Some("kaboom"));
    assert_eq!(result.location.as_deref(), Some(here.as_str()));
    assert_eq!(result.failure_location.as_deref(), Some(here.as_str()));
}

#[rstest]
#[serial]
fn tables_and_doc_strings_follow_captures(workspace: Workspace) {
    let glue = vec![
        step(StepKeyword::Given, "the {word} menu:", |world, args| {
            let table = args.table(1)?;
            Ok(push(world, format!("{} {}", args.text(0)?, table.height())))
        })
        .consumes_transposed_table()
        .into(),
        step(StepKeyword::Then, "the chef says:", |world, args| {
            Ok(push(world, args.doc_string(0)?.trim().to_string()))
        })
        .consumes_doc_string()
        .into(),
    ];
    let feature = workspace.feature(
        "menu.feature",
        "Feature: Menu\n  Scenario: lunch\n    Given the lunch menu:\n      | dish | salad | soup |\n    Then the chef says:\n      \"\"\"\n      bon appetit\n      \"\"\"\n",
    );
    let (summary, world) =
        execute(&workspace, glue, &feature).expect("run completes");

    assert!(summary.is_success(), "{:?}", statuses(&summary));
    assert_eq!(entries(&world), ["lunch 3", "bon appetit"]);
}

#[rstest]
#[serial]
fn symbols_arrive_without_their_colon(workspace: Workspace) {
    let glue = vec![
        step(StepKeyword::When, "I choose {symbol}", |world, args| {
            Ok(push(world, args.symbol(0)?.to_string()))
        })
        .into(),
    ];
    let feature = workspace.feature(
        "symbol.feature",
        "Feature: Symbol\n  Scenario: choose\n    When I choose :fast\n",
    );
    let (_, world) = execute(&workspace, glue, &feature).expect("run completes");

    assert_eq!(entries(&world), ["fast"]);
}

#[rstest]
#[serial]
fn hook_phases_run_in_lifecycle_order(workspace: Workspace) {
    let glue = vec![
        after_all(|world| Ok(push(world, "after all".into()))).into(),
        after(|world, _| Ok(push(world, "after".into()))).into(),
        before_step(|world, _| Ok(push(world, "before step".into()))).into(),
        before(|world, _| Ok(push(world, "late".into()))).with_order(20).into(),
        before(|world, _| Ok(push(world, "early".into()))).with_order(5).into(),
        before_all(|world| {
            assert!(world.is_none(), "the world starts absent");
            Ok(push(world, "before all".into()))
        })
        .into(),
        step(StepKeyword::Given, "a step", |world, _| Ok(push(world, "step".into()))).into(),
    ];
    let feature = workspace.feature(
        "hooks.feature",
        "Feature: Hooks\n  Scenario: phases\n    Given a step\n",
    );
    let (summary, world) =
        execute(&workspace, glue, &feature).expect("run completes");

    assert!(summary.is_success());
    assert_eq!(
        entries(&world),
        ["before all", "early", "late", "before step", "step", "after", "after all"]
    );
}

#[rstest]
#[serial]
fn undefined_parameter_type_aborts_the_run(workspace: Workspace) {
    let glue = vec![step(StepKeyword::Given, "I pick {shade}", |world, _| Ok(world)).into()];
    let feature = workspace.feature("cukes.feature", CUKES);

    let result = execute(&workspace, glue.clone(), &feature);
    assert!(matches!(result, Err(HostError::Backend(_))));
    let plugin = workspace.report_plugin();
    let code = run(&feature, glue, Some(["--plugin", plugin.as_str()].as_slice()));
    assert_eq!(code, EXIT_CONFIG);
}

#[rstest]
#[serial]
fn empty_glue_fails_and_suggests_a_snippet(workspace: Workspace) {
    let feature = workspace.feature(
        "undefined.feature",
        "Feature: Undefined\n  Scenario: missing\n    Given I have 42 cukes\n",
    );
    let (summary, _) =
        execute(&workspace, Vec::new(), &feature).expect("run completes");

    assert_eq!(statuses(&summary), [vec![Status::Undefined]]);
    let snippets = summary.snippets();
    let snippet = snippets.first().expect("one snippet");
    assert!(snippet.contains("StepKeyword::Given"), "{snippet}");
    assert!(snippet.contains("\"I have {int} cukes\""), "{snippet}");

    let plugin = workspace.report_plugin();
    let args = ["--plugin", plugin.as_str()];
    let code = run(&feature, Vec::<GlueDefinition<Log>>::new(), Some(args.as_slice()));
    assert_ne!(code, EXIT_SUCCESS);
}

#[rstest]
#[serial]
fn default_pretty_output_marks_undefined_steps_and_shows_snippets(workspace: Workspace) {
    let feature = workspace.feature(
        "undefined.feature",
        "Feature: Undefined\n  Scenario: missing\n    Given I have 42 cukes\n",
    );
    let pretty = workspace.dir.path().join("pretty.txt");
    let plugin = format!("pretty:{}", pretty.display());
    let args: Vec<&str> = DEFAULT_HOST_ARGS
        .iter()
        .map(|arg| if *arg == "pretty" { plugin.as_str() } else { *arg })
        .collect();

    let code = run(&feature, Vec::<GlueDefinition<Log>>::new(), Some(args.as_slice()));
    assert_eq!(code, EXIT_FAILURE);
    let text = fs::read_to_string(&pretty).expect("pretty output is readable");
    assert!(text.contains("Given I have 42 cukes (undefined)"), "{text}");
    assert!(text.contains("\"I have {int} cukes\""), "{text}");
}

#[rstest]
#[serial]
fn passing_run_exits_with_success(workspace: Workspace) {
    let feature = workspace.feature("cukes.feature", CUKES);
    let plugin = workspace.report_plugin();
    let code = run(&feature, logging_glue(), Some(["--plugin", plugin.as_str()].as_slice()));
    assert_eq!(code, EXIT_SUCCESS);
}

#[rstest]
#[serial]
fn invalid_host_arguments_exit_with_config_status(workspace: Workspace) {
    let feature = workspace.feature("cukes.feature", CUKES);
    let code = run(&feature, logging_glue(), Some(["--plugin", "telepathy"].as_slice()));
    assert_eq!(code, EXIT_CONFIG);
}
