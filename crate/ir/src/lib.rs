pub mod ast;
pub mod ast_printer;
pub mod span;
pub mod workflow;

pub use ast::{
    Definition, FreeVar, Output, Pipeline, PipelineArgument, PipelineVar, Program, Substitution,
    SubstitutionValue, Worker,
};
pub use ast_printer::dump_program;
pub use span::{LineCol, SourceIndex, Span};
pub use workflow::{Pipe, PipeId, Workflow, WorkerId, WorkerInstance};
