//! A plain recursive printer for the parsed AST (component C5).
//!
//! The original dumps a fixed-depth indent string built from `'|'`
//! every two columns; this prints the same indentation style and the
//! same Arguments/Workers/Substitutions/Outputs summary-then-detail
//! shape, but as ordinary recursive functions rather than a visitor —
//! this AST has no polymorphic node type needing double dispatch, just
//! two places (pipeline arguments, worker substitutions) that recurse
//! into a nested `Pipeline`.

use std::fmt::Write as _;

use crate::ast::{Pipeline, PipelineArgument, Program, Substitution, SubstitutionValue};

fn indent(level: usize) -> String {
    "| ".repeat(level)
}

fn print_pipeline(out: &mut String, pipeline: &Pipeline, level: usize) {
    let pad = indent(level);
    let _ = writeln!(out, "{pad}Pipeline");

    let _ = writeln!(out, "{pad}Arguments: {}", pipeline.arguments.len());
    for argument in &pipeline.arguments {
        match argument {
            PipelineArgument::Name { name, .. } => {
                let _ = writeln!(out, "{pad}  Name: {name}");
            }
            PipelineArgument::InlinePipeline { pipeline, .. } => {
                let _ = writeln!(out, "{pad}  InlinePipeline:");
                print_pipeline(out, pipeline, level + 1);
            }
        }
    }

    let _ = writeln!(out, "{pad}Workers: {}", pipeline.workers.len());
    for worker in &pipeline.workers {
        let _ = writeln!(out, "{pad}  Worker: {}", worker.name);
        let _ = writeln!(
            out,
            "{pad}    Substitutions: {}",
            worker.substitutions.len()
        );
        for substitution in &worker.substitutions {
            print_substitution(out, substitution, level);
        }
    }

    let _ = writeln!(out, "{pad}Outputs: {}", pipeline.outputs.len());
    for output in &pipeline.outputs {
        let _ = writeln!(out, "{pad}  Output: {}", output.name);
    }
}

fn print_substitution(out: &mut String, substitution: &Substitution, level: usize) {
    let pad = indent(level);
    match &substitution.value {
        SubstitutionValue::Symbol { symbol, .. } => {
            let _ = writeln!(out, "{pad}      {} = {}", substitution.name, symbol);
        }
        SubstitutionValue::Pipeline { pipeline, .. } => {
            let _ = writeln!(out, "{pad}      {} = (", substitution.name);
            print_pipeline(out, pipeline, level + 1);
            let _ = writeln!(out, "{pad}      )");
        }
    }
}

/// Renders the full program: a header line with file name, line count,
/// and character count, followed by each definition's name, free
/// variables, pipeline variables, and pipeline trees.
pub fn dump_program(program: &Program) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Program from file {} of {} lines of code {} characters total",
        program.file_name, program.line_count, program.char_count
    );

    for definition in &program.definitions {
        let _ = writeln!(out, "Definition: {}", definition.name);
        let _ = writeln!(out, "Free vars: {}", definition.free_vars.len());
        for free_var in &definition.free_vars {
            let _ = writeln!(out, "  {}", free_var.name);
        }
        let _ = writeln!(out, "Piped vars: {}", definition.pipeline_vars.len());
        for pipeline_var in &definition.pipeline_vars {
            let _ = writeln!(out, "  {}", pipeline_var.name);
        }
        let _ = writeln!(out, "Pipelines: {}", definition.pipelines.len());
        for pipeline in &definition.pipelines {
            print_pipeline(&mut out, pipeline, 1);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Definition, Output, Pipeline, PipelineArgument, Worker};
    use crate::span::Span;

    fn minimal_program() -> Program {
        Program {
            file_name: "in.flow".into(),
            line_count: 1,
            char_count: 10,
            definitions: vec![Definition {
                name: "main".into(),
                span: Span::NONE,
                free_vars: vec![],
                pipeline_vars: vec![],
                pipelines: vec![Pipeline {
                    span: Span::NONE,
                    arguments: vec![PipelineArgument::Name {
                        name: "src".into(),
                        span: Span::NONE,
                    }],
                    workers: vec![Worker {
                        name: "sink".into(),
                        span: Span::NONE,
                        substitutions: vec![],
                    }],
                    outputs: vec![Output {
                        name: "out".into(),
                        span: Span::NONE,
                    }],
                }],
            }],
        }
    }

    #[test]
    fn dump_includes_header_and_counts() {
        let dump = dump_program(&minimal_program());
        assert!(dump.contains("Program from file in.flow of 1 lines of code 10 characters total"));
        assert!(dump.contains("Definition: main"));
        assert!(dump.contains("Arguments: 1"));
        assert!(dump.contains("Workers: 1"));
        assert!(dump.contains("Outputs: 1"));
    }
}
