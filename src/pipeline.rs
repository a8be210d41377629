//! A small staged pipeline, in the same `and_then`-chainable shape used
//! elsewhere for multi-phase compilation: each stage either carries its
//! pipeline state forward with new data, or stops it with a reason.
//! Parsing and workflow-building never actually stop here — malformed
//! dataflow source becomes diagnostics, not a halted pipeline — so the
//! only stage that can fail is the one at the true collaborator
//! boundary: reading the input file.

use flowc_diagnostics::DiagnosticLog;
use flowc_ir::{Program, Workflow};

pub struct BuildPipeline {
    pub file_name: String,
    pub diagnostics: DiagnosticLog,
}

pub enum Stage<T> {
    Success { pipeline: BuildPipeline, data: T },
    Failed { pipeline: BuildPipeline, reason: String },
}

impl<T> Stage<T> {
    pub fn and_then<U>(self, f: impl FnOnce(BuildPipeline, T) -> Stage<U>) -> Stage<U> {
        match self {
            Stage::Success { pipeline, data } => f(pipeline, data),
            Stage::Failed { pipeline, reason } => Stage::Failed { pipeline, reason },
        }
    }
}

impl BuildPipeline {
    pub fn new(file_name: impl Into<String>) -> Self {
        BuildPipeline {
            file_name: file_name.into(),
            diagnostics: DiagnosticLog::new(),
        }
    }

    pub fn parse(mut self, source: &str) -> Stage<Program> {
        let program = flowc_frontend::parse_program(source, &self.file_name, &mut self.diagnostics);
        Stage::Success {
            pipeline: self,
            data: program,
        }
    }

    pub fn build_workflows(mut self, program: &Program) -> Stage<Vec<Workflow>> {
        let workflows = flowc_workflow::build_program_workflows(program, &mut self.diagnostics);
        Stage::Success {
            pipeline: self,
            data: workflows,
        }
    }
}

/// Runs the whole pipeline over already-read source text, returning the
/// parsed program, its built workflows, and the accumulated
/// diagnostics. This stage chain cannot fail; it is provided so the CLI
/// reads the same way the staged compilation pipeline it's modeled on
/// does.
pub fn run(source: &str, file_name: &str) -> (Program, Vec<Workflow>, DiagnosticLog) {
    let pipeline = BuildPipeline::new(file_name);
    let outcome = pipeline
        .parse(source)
        .and_then(|pipeline, program| {
            pipeline.build_workflows(&program).and_then(|pipeline, workflows| Stage::Success {
                pipeline,
                data: (program, workflows),
            })
        });
    match outcome {
        Stage::Success { pipeline, data } => (data.0, data.1, pipeline.diagnostics),
        Stage::Failed { pipeline, .. } => (
            Program {
                file_name: file_name.to_string(),
                line_count: 0,
                char_count: 0,
                definitions: Vec::new(),
            },
            Vec::new(),
            pipeline.diagnostics,
        ),
    }
}
