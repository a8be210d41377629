use crate::span::Span;

pub const MAX_PIPELINE_INPUT: usize = 16;
pub const MAX_PIPELINE_OUTPUT: usize = 16;
pub const MAX_WORKFLOW_PIPES: usize = 4096;
pub const MAX_WORKFLOW_WORKERS: usize = 1024;

pub type PipeId = usize;
pub type WorkerId = usize;

/// A named data channel between workers in a built workflow.
#[derive(Debug, Clone)]
pub struct Pipe {
    pub name: String,
    pub span: Span,
}

/// One worker occurrence in a built workflow, wired to its input and
/// output pipes by id.
#[derive(Debug, Clone)]
pub struct WorkerInstance {
    pub name: String,
    pub span: Span,
    pub inputs: Vec<PipeId>,
    pub outputs: Vec<PipeId>,
}

/// The lowered graph for one pure definition: every pipe and worker
/// instance it contains, named within this definition's own scope.
#[derive(Debug, Clone, Default)]
pub struct Workflow {
    pub definition_name: String,
    pub pipes: Vec<Pipe>,
    pub workers: Vec<WorkerInstance>,
}

impl Workflow {
    pub fn new(definition_name: impl Into<String>) -> Self {
        Workflow {
            definition_name: definition_name.into(),
            pipes: Vec::new(),
            workers: Vec::new(),
        }
    }

    pub fn pipe(&self, id: PipeId) -> &Pipe {
        &self.pipes[id]
    }

    pub fn worker(&self, id: WorkerId) -> &WorkerInstance {
        &self.workers[id]
    }
}
