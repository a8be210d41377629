//! Stable numeric codes for every diagnosable condition, grouped by
//! component the way the low-numbered ranges are reserved for parser
//! conditions and the higher ones for workflow-building conditions.

/// A stable identifier for one kind of diagnosable condition.
///
/// Codes are part of the external contract (scripts may match on them)
/// so existing discriminants are never renumbered, only added to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    // 1000s: parser conditions (component C4).
    ExpectedArgumentSeparator = 1001,
    ExpectedWorkerSeparator = 1002,
    ForbiddenPipeInWorker = 1003,
    ForbiddenArrowInOutput = 1004,
    ForbiddenPipeInOutput = 1005,
    InvalidArgumentName = 1006,
    InvalidWorkerName = 1007,
    InvalidSubstitutionName = 1008,
    InvalidSubstitutionSymbol = 1009,
    ExpectedDefinitionSeparator = 1010,
    InvalidDefinitionName = 1011,
    InvalidOutputName = 1020,
    TooManyPipelineArguments = 1012,
    TooManyPipelineWorkers = 1013,
    TooManyWorkerSubstitutions = 1014,
    TooManyPipelineOutputs = 1015,
    TooManyFreeVars = 1016,
    TooManyPipelineVars = 1017,
    TooManyPipelines = 1018,
    UnexpectedEndOfInput = 1019,

    // 2000s: workflow-building conditions (component C6).
    UnknownPipeName = 2001,
    UnsupportedInlinePipelineWithOutputs = 2002,
    NoPureDefinitionsFound = 2003,
    TooManyWorkflowPipes = 2004,
    TooManyWorkflowWorkers = 2005,
}

impl ErrorCode {
    pub fn code(self) -> u16 {
        self as u16
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}
