//! Component C6: lowers a parsed program's pure definitions into
//! workflow graphs.
//!
//! A definition is "pure" when it has no free variables and no
//! pipeline-local variables (`Definition::is_pure`); only pure
//! definitions have anything to build, since an impure definition's
//! pipelines can't be wired without knowing what its variables are
//! bound to. One [`Workflow`] is produced per pure definition.

use std::collections::HashMap;

use flowc_diagnostics::{DiagnosticLevel, DiagnosticLog, DiagnosticSource, ErrorCode};
use flowc_ir::ast::{Output, Pipeline, PipelineArgument, Worker};
use flowc_ir::workflow::{MAX_PIPELINE_INPUT, MAX_PIPELINE_OUTPUT, MAX_WORKFLOW_PIPES, MAX_WORKFLOW_WORKERS};
use flowc_ir::{Definition, PipeId, Program, Span, Workflow};

const NUMERIC_PIPE_LABEL: &str = "numeric pipeline";
const IMPLICIT_PIPE_LABEL: &str = "implicit pipe";

/// A definition-local mapping from declared pipe name to its id in the
/// workflow being built. All-digit names never go through this table:
/// they always mint a fresh, unreachable-by-name pipe.
struct PipeTable {
    by_name: HashMap<String, PipeId>,
}

impl PipeTable {
    fn new() -> Self {
        PipeTable {
            by_name: HashMap::new(),
        }
    }
}

fn add_pipe(
    workflow: &mut Workflow,
    diagnostics: &mut DiagnosticLog,
    name: impl Into<String>,
    span: Span,
) -> PipeId {
    let id = workflow.pipes.len();
    if id >= MAX_WORKFLOW_PIPES {
        diagnostics.emit(
            DiagnosticSource::Workflow,
            DiagnosticLevel::Error,
            format!("{}: too many pipes in workflow", ErrorCode::TooManyWorkflowPipes),
            span,
        );
    }
    workflow.pipes.push(flowc_ir::Pipe {
        name: name.into(),
        span,
    });
    id
}

fn add_worker(
    workflow: &mut Workflow,
    diagnostics: &mut DiagnosticLog,
    name: impl Into<String>,
    span: Span,
) -> usize {
    let id = workflow.workers.len();
    if id >= MAX_WORKFLOW_WORKERS {
        diagnostics.emit(
            DiagnosticSource::Workflow,
            DiagnosticLevel::Error,
            format!("{}: too many workers in workflow", ErrorCode::TooManyWorkflowWorkers),
            span,
        );
    }
    workflow.workers.push(flowc_ir::WorkerInstance {
        name: name.into(),
        span,
        inputs: Vec::new(),
        outputs: Vec::new(),
    });
    id
}

/// Resolves a referenced pipe name to an id. An all-digit name always
/// mints a brand-new pipe (never deduplicated against an earlier
/// occurrence of the same digits); any other name is looked up in the
/// definition-local table, logging an error and returning `None` on a
/// miss.
fn get_pipe(
    workflow: &mut Workflow,
    table: &PipeTable,
    diagnostics: &mut DiagnosticLog,
    name: &str,
    span: Span,
) -> Option<PipeId> {
    if is_all_digits(name) {
        return Some(add_pipe(workflow, diagnostics, NUMERIC_PIPE_LABEL, span));
    }
    match table.by_name.get(name) {
        Some(&id) => Some(id),
        None => {
            diagnostics.emit(
                DiagnosticSource::Workflow,
                DiagnosticLevel::Error,
                format!(
                    "{}: wrong name of pipe: this pipe name doesn't exist",
                    ErrorCode::UnknownPipeName
                ),
                span,
            );
            None
        }
    }
}

fn is_all_digits(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit())
}

fn push_input(
    workflow: &mut Workflow,
    diagnostics: &mut DiagnosticLog,
    worker_id: usize,
    pipe_id: PipeId,
    span: Span,
) {
    let worker = &mut workflow.workers[worker_id];
    if worker.inputs.len() < MAX_PIPELINE_INPUT {
        worker.inputs.push(pipe_id);
    } else {
        diagnostics.emit(
            DiagnosticSource::Workflow,
            DiagnosticLevel::Error,
            "worker has too many inputs",
            span,
        );
    }
}

fn push_output(
    workflow: &mut Workflow,
    diagnostics: &mut DiagnosticLog,
    worker_id: usize,
    pipe_id: PipeId,
    span: Span,
) {
    let worker = &mut workflow.workers[worker_id];
    if worker.outputs.len() < MAX_PIPELINE_OUTPUT {
        worker.outputs.push(pipe_id);
    } else {
        diagnostics.emit(
            DiagnosticSource::Workflow,
            DiagnosticLevel::Error,
            "worker has too many outputs",
            span,
        );
    }
}

/// Registers every name this pipeline declares as an output, ahead of
/// wiring any pipeline's workers, so a reference to it from anywhere
/// in the definition (including an earlier pipeline) resolves.
fn predeclare_outputs(
    outputs: &[Output],
    workflow: &mut Workflow,
    table: &mut PipeTable,
    diagnostics: &mut DiagnosticLog,
) {
    for output in outputs {
        let id = add_pipe(workflow, diagnostics, output.name.clone(), output.span);
        table.by_name.insert(output.name.clone(), id);
    }
}

/// Wires one pipeline's workers into the workflow: the first worker's
/// inputs come from the pipeline's arguments, each later worker is
/// joined to its predecessor by a fresh implicit pipe, and (if the
/// pipeline declares outputs) the last worker's outputs are the
/// pre-declared output pipes.
fn build_pipeline(
    pipeline: &Pipeline,
    workflow: &mut Workflow,
    table: &mut PipeTable,
    diagnostics: &mut DiagnosticLog,
) {
    if pipeline.workers.is_empty() {
        return;
    }

    let worker_ids: Vec<usize> = pipeline
        .workers
        .iter()
        .map(|worker: &Worker| add_worker(workflow, diagnostics, worker.name.clone(), worker.span))
        .collect();

    // First worker's inputs, from the pipeline's own arguments.
    for argument in &pipeline.arguments {
        match argument {
            PipelineArgument::Name { name, span } => {
                if let Some(pipe_id) = get_pipe(workflow, table, diagnostics, name, *span) {
                    push_input(workflow, diagnostics, worker_ids[0], pipe_id, *span);
                }
            }
            PipelineArgument::InlinePipeline { pipeline, span } => {
                build_inline_pipeline(pipeline, *span, workflow, table, diagnostics);
            }
        }
    }

    // Chain subsequent workers with implicit pipes.
    for (ids, ast_workers) in worker_ids.windows(2).zip(pipeline.workers.windows(2)) {
        let (prev_id, curr_id) = (ids[0], ids[1]);
        let implicit_span = ast_workers[0].span.gap_to(ast_workers[1].span);
        let pipe_id = add_pipe(workflow, diagnostics, IMPLICIT_PIPE_LABEL, implicit_span);
        push_output(workflow, diagnostics, prev_id, pipe_id, implicit_span);
        push_input(workflow, diagnostics, curr_id, pipe_id, implicit_span);
    }

    if !pipeline.outputs.is_empty() {
        let last = *worker_ids.last().unwrap();
        for output in &pipeline.outputs {
            if let Some(pipe_id) = get_pipe(workflow, table, diagnostics, &output.name, output.span) {
                push_output(workflow, diagnostics, last, pipe_id, output.span);
            }
        }
    }
}

/// Builds an inline pipeline given as a pipeline argument or
/// substitution value. Its own workers and pipes are added to the
/// enclosing workflow, but its terminal output is never wired into
/// whatever enclosing worker it was passed to — only a pipeline's own
/// declared outputs ever feed forward.
fn build_inline_pipeline(
    pipeline: &Pipeline,
    span: Span,
    workflow: &mut Workflow,
    table: &mut PipeTable,
    diagnostics: &mut DiagnosticLog,
) {
    if !pipeline.outputs.is_empty() {
        diagnostics.emit(
            DiagnosticSource::Workflow,
            DiagnosticLevel::Error,
            format!(
                "{}: unsupported for now: inline pipelines with output pipes",
                ErrorCode::UnsupportedInlinePipelineWithOutputs
            ),
            span,
        );
    }
    build_pipeline(pipeline, workflow, table, diagnostics);
}

/// Builds the workflow for one pure definition: pre-declares every
/// output name across all of its pipelines, then wires each pipeline
/// in turn.
pub fn build_definition_workflow(
    definition: &Definition,
    diagnostics: &mut DiagnosticLog,
) -> Workflow {
    let mut workflow = Workflow::new(definition.name.clone());
    let mut table = PipeTable::new();

    for pipeline in &definition.pipelines {
        predeclare_outputs(&pipeline.outputs, &mut workflow, &mut table, diagnostics);
    }
    for pipeline in &definition.pipelines {
        build_pipeline(pipeline, &mut workflow, &mut table, diagnostics);
    }

    workflow
}

/// Builds workflows for every pure definition in a program. Logs a
/// single error at [`Span::NONE`] if the program has no pure
/// definitions at all.
pub fn build_program_workflows(program: &Program, diagnostics: &mut DiagnosticLog) -> Vec<Workflow> {
    let workflows: Vec<Workflow> = program
        .definitions
        .iter()
        .filter(|definition| definition.is_pure())
        .map(|definition| build_definition_workflow(definition, diagnostics))
        .collect();

    if workflows.is_empty() {
        diagnostics.emit(
            DiagnosticSource::Workflow,
            DiagnosticLevel::Error,
            format!(
                "{}: wrong function: no pure functions to build found",
                ErrorCode::NoPureDefinitionsFound
            ),
            Span::NONE,
        );
    }

    workflows
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowc_ir::ast::{FreeVar, PipelineVar};

    fn name_arg(name: &str) -> PipelineArgument {
        PipelineArgument::Name {
            name: name.to_string(),
            span: Span::NONE,
        }
    }

    fn worker(name: &str) -> Worker {
        Worker {
            name: name.to_string(),
            span: Span::NONE,
            substitutions: Vec::new(),
        }
    }

    fn output(name: &str) -> Output {
        Output {
            name: name.to_string(),
            span: Span::NONE,
        }
    }

    fn pure_definition(pipelines: Vec<Pipeline>) -> Definition {
        Definition {
            name: "d".into(),
            span: Span::NONE,
            free_vars: Vec::new(),
            pipeline_vars: Vec::new(),
            pipelines,
        }
    }

    #[test]
    fn simple_chain_gets_implicit_pipes() {
        let pipeline = Pipeline {
            span: Span::NONE,
            arguments: vec![name_arg("src")],
            workers: vec![worker("a"), worker("b")],
            outputs: vec![output("out")],
        };
        let mut diagnostics = DiagnosticLog::new();
        let workflow = build_definition_workflow(&pure_definition(vec![pipeline]), &mut diagnostics);
        assert!(!diagnostics.has_errors());
        assert_eq!(workflow.workers.len(), 2);
        assert_eq!(workflow.workers[0].inputs.len(), 1);
        assert_eq!(workflow.workers[0].outputs.len(), 1);
        assert_eq!(workflow.workers[1].inputs.len(), 1);
        assert_eq!(workflow.workers[1].outputs.len(), 1);
    }

    #[test]
    fn numeric_argument_always_mints_a_fresh_pipe() {
        let pipeline_a = Pipeline {
            span: Span::NONE,
            arguments: vec![name_arg("7")],
            workers: vec![worker("a")],
            outputs: vec![],
        };
        let pipeline_b = Pipeline {
            span: Span::NONE,
            arguments: vec![name_arg("7")],
            workers: vec![worker("b")],
            outputs: vec![],
        };
        let mut diagnostics = DiagnosticLog::new();
        let workflow = build_definition_workflow(
            &pure_definition(vec![pipeline_a, pipeline_b]),
            &mut diagnostics,
        );
        assert!(!diagnostics.has_errors());
        let pipe_a = workflow.workers[0].inputs[0];
        let pipe_b = workflow.workers[1].inputs[0];
        assert_ne!(pipe_a, pipe_b);
    }

    #[test]
    fn numeric_output_name_mints_a_fresh_pipe_not_the_predeclared_one() {
        let pipeline = Pipeline {
            span: Span::NONE,
            arguments: vec![name_arg("3")],
            workers: vec![worker("a")],
            outputs: vec![output("7")],
        };
        let mut diagnostics = DiagnosticLog::new();
        let workflow = build_definition_workflow(&pure_definition(vec![pipeline]), &mut diagnostics);
        assert!(!diagnostics.has_errors());
        let worker_output = workflow.workers[0].outputs[0];
        // The predeclared pipe for "7" (added by predeclare_outputs) is
        // pipe 0; get_pipe must mint a fresh one for the digit name
        // rather than resolving to it.
        assert_ne!(worker_output, 0);
    }

    #[test]
    fn unknown_pipe_name_is_diagnosed() {
        let pipeline = Pipeline {
            span: Span::NONE,
            arguments: vec![name_arg("does-not-exist")],
            workers: vec![worker("a")],
            outputs: vec![],
        };
        let mut diagnostics = DiagnosticLog::new();
        build_definition_workflow(&pure_definition(vec![pipeline]), &mut diagnostics);
        assert!(diagnostics.has_errors());
    }

    #[test]
    fn forward_reference_to_a_later_pipelines_output_resolves() {
        let first = Pipeline {
            span: Span::NONE,
            arguments: vec![name_arg("later")],
            workers: vec![worker("consumer")],
            outputs: vec![],
        };
        let second = Pipeline {
            span: Span::NONE,
            arguments: vec![name_arg("src")],
            workers: vec![worker("producer")],
            outputs: vec![output("later")],
        };
        let mut diagnostics = DiagnosticLog::new();
        let workflow =
            build_definition_workflow(&pure_definition(vec![first, second]), &mut diagnostics);
        assert!(!diagnostics.has_errors());
        assert_eq!(workflow.workers[0].inputs.len(), 1);
    }

    #[test]
    fn inline_pipeline_output_is_not_wired_into_enclosing_worker() {
        let inner = Pipeline {
            span: Span::NONE,
            arguments: vec![name_arg("src")],
            workers: vec![worker("inner_worker")],
            outputs: vec![],
        };
        let outer = Pipeline {
            span: Span::NONE,
            arguments: vec![PipelineArgument::InlinePipeline {
                pipeline: Box::new(inner),
                span: Span::NONE,
            }],
            workers: vec![worker("outer_worker")],
            outputs: vec![],
        };
        let mut diagnostics = DiagnosticLog::new();
        let workflow = build_definition_workflow(&pure_definition(vec![outer]), &mut diagnostics);
        assert!(!diagnostics.has_errors());
        let outer_worker = workflow
            .workers
            .iter()
            .find(|w| w.name == "outer_worker")
            .unwrap();
        assert!(outer_worker.inputs.is_empty());
    }

    #[test]
    fn inline_pipeline_with_outputs_is_diagnosed() {
        let inner = Pipeline {
            span: Span::NONE,
            arguments: vec![name_arg("src")],
            workers: vec![worker("inner_worker")],
            outputs: vec![output("leftover")],
        };
        let outer = Pipeline {
            span: Span::NONE,
            arguments: vec![PipelineArgument::InlinePipeline {
                pipeline: Box::new(inner),
                span: Span::NONE,
            }],
            workers: vec![worker("outer_worker")],
            outputs: vec![],
        };
        let mut diagnostics = DiagnosticLog::new();
        build_definition_workflow(&pure_definition(vec![outer]), &mut diagnostics);
        assert!(diagnostics.has_errors());
    }

    #[test]
    fn impure_definitions_are_skipped() {
        let program = Program {
            file_name: "f".into(),
            line_count: 1,
            char_count: 1,
            definitions: vec![Definition {
                name: "impure".into(),
                span: Span::NONE,
                free_vars: vec![FreeVar {
                    name: "x".into(),
                    span: Span::NONE,
                }],
                pipeline_vars: vec![PipelineVar {
                    name: "p".into(),
                    span: Span::NONE,
                }],
                pipelines: vec![],
            }],
        };
        let mut diagnostics = DiagnosticLog::new();
        let workflows = build_program_workflows(&program, &mut diagnostics);
        assert!(workflows.is_empty());
        assert!(diagnostics.has_errors());
    }

    #[test]
    fn empty_program_logs_one_error_at_span_none() {
        let program = Program {
            file_name: "f".into(),
            line_count: 1,
            char_count: 0,
            definitions: vec![],
        };
        let mut diagnostics = DiagnosticLog::new();
        let workflows = build_program_workflows(&program, &mut diagnostics);
        assert!(workflows.is_empty());
        assert_eq!(diagnostics.error_count(), 1);
        let only_record = diagnostics.iter().next().unwrap();
        assert!(only_record.span.is_none());
    }
}
