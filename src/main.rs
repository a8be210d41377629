mod cli;
mod error;
mod exit;
mod pipeline;

use std::fs;

use clap::Parser as _;
use colored::Colorize;
use flowc_ir::Workflow;

use error::CliError;

fn main() {
    let cli = cli::Cli::parse();

    let source = match read_source(&cli.input_file) {
        Ok(source) => source,
        Err(error) => exit::with_code(exit::Code::NoInput, &format!("Error: {error}")),
    };

    let file_name = cli.input_file.display().to_string();
    let (program, workflows, diagnostics) = pipeline::run(&source, &file_name);

    // The AST dump always runs before the workflow build is reported,
    // matching the fixed ordering of the file this CLI is modeled on.
    println!("{}", flowc_ir::dump_program(&program));

    println!("get workflow for {file_name}...");
    for workflow in &workflows {
        print_workflow(workflow);
    }

    let source_index = flowc_ir::SourceIndex::new(&source);
    let mut stderr = std::io::stderr();
    let _ = flowc_diagnostics::write_diagnostics(&diagnostics, &source_index, &file_name, &mut stderr);
    eprintln!("{}", flowc_diagnostics::report::summary_line(&diagnostics));

    // Syntax and workflow errors are reported, never fatal: the parser
    // always proceeds to EOF and a non-zero exit is reserved for the
    // CLI's own collaborator-level failures (missing/unreadable input).
}

fn read_source(path: &std::path::Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::UnreadableInput {
        path: path.to_path_buf(),
        source,
    })
}

fn print_workflow(workflow: &Workflow) {
    println!("{}", format!("Workflow: {}", workflow.definition_name).bold());
    println!("Pipes: {}", workflow.pipes.len());
    for pipe in &workflow.pipes {
        println!("  {}", pipe.name);
    }
    println!("Workers: {}", workflow.workers.len());
    for worker in &workflow.workers {
        let inputs: Vec<&str> = worker
            .inputs
            .iter()
            .map(|&id| workflow.pipe(id).name.as_str())
            .collect();
        let outputs: Vec<&str> = worker
            .outputs
            .iter()
            .map(|&id| workflow.pipe(id).name.as_str())
            .collect();
        println!(
            "  {} : inputs [{}] outputs [{}]",
            worker.name,
            inputs.join(", "),
            outputs.join(", ")
        );
    }
}
