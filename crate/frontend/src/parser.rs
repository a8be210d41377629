//! Component C4: the recursive-descent parser.
//!
//! No token stream and no exceptions: every sub-parser takes a byte
//! position and returns the position it stopped at, diagnostics are
//! appended to the log as they're found, and a malformed construct is
//! always recovered from by skipping forward — never by aborting the
//! whole parse. Every sub-parser is guaranteed to advance `pos`, so the
//! driving loops in [`Parser::parse_program`] always terminate.

use flowc_diagnostics::{DiagnosticLevel, DiagnosticLog, DiagnosticSource, ErrorCode};
use flowc_ir::ast::{
    MAX_FREE_VARS, MAX_PIPELINES, MAX_PIPELINE_ARGUMENTS, MAX_PIPELINE_OUTPUTS,
    MAX_PIPELINE_VARS, MAX_PIPELINE_WORKERS, MAX_PIPELINE_WORKER_SUBS,
};
use flowc_ir::{
    Definition, FreeVar, Output, Pipeline, PipelineArgument, PipelineVar, Program, Span,
    Substitution, SubstitutionValue, Worker,
};

use crate::lex::{balanced_scan, is_all_key, scan_whitespace_run, skip_key_run, skip_spaces, ScanEnd};

pub struct Parser<'a> {
    source: &'a str,
    pos: usize,
    diagnostics: &'a mut DiagnosticLog,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str, diagnostics: &'a mut DiagnosticLog) -> Self {
        Parser {
            source,
            pos: 0,
            diagnostics,
        }
    }

    fn error(&mut self, code: ErrorCode, message: impl Into<String>, span: Span) {
        self.diagnostics.emit(
            DiagnosticSource::Parser,
            DiagnosticLevel::Error,
            format!("{code}: {}", message.into()),
            span,
        );
    }

    fn len(&self) -> usize {
        self.source.len()
    }

    fn byte_at(&self, pos: usize) -> Option<u8> {
        self.source.as_bytes().get(pos).copied()
    }

    /// Skips whitespace and `#`-to-end-of-line comments.
    fn skip_trivia(&mut self) {
        loop {
            self.pos = skip_spaces(self.source, self.pos);
            if self.byte_at(self.pos) == Some(b'#') {
                while self.pos < self.len() && self.byte_at(self.pos) != Some(b'\n') {
                    self.pos += 1;
                }
                continue;
            }
            break;
        }
    }

    pub fn parse_program(mut self, file_name: &str) -> Program {
        let mut definitions = Vec::new();
        loop {
            self.skip_trivia();
            if self.pos >= self.len() {
                break;
            }
            let before = self.pos;
            definitions.push(self.parse_definition());
            if self.pos <= before {
                // Guarantee forward progress even if a sub-parser
                // somehow returned without consuming anything.
                self.pos = before + 1;
            }
        }

        let line_count = self.source.bytes().filter(|&b| b == b'\n').count() + 1;
        Program {
            file_name: file_name.to_string(),
            line_count,
            char_count: self.source.len(),
            definitions,
        }
    }

    fn parse_definition(&mut self) -> Definition {
        let start = self.pos;
        let pipelines = self.parse_pipeline_many();

        self.pos = skip_spaces(self.source, self.pos);
        if self.source.as_bytes()[self.pos.min(self.len())..].starts_with(b"|:") {
            self.pos += 2;
        } else {
            self.error(
                ErrorCode::ExpectedDefinitionSeparator,
                "expected '|:' after pipeline body",
                Span::new(self.pos, self.pos),
            );
        }

        self.pos = skip_spaces(self.source, self.pos);
        let name_start = self.pos;
        let name_end = skip_key_run(self.source, name_start);
        if name_end == name_start {
            self.error(
                ErrorCode::InvalidDefinitionName,
                "expected a definition name",
                Span::new(name_start, name_start),
            );
        }
        let name = self.source[name_start..name_end].to_string();
        self.pos = name_end;

        let pipeline_vars = self.maybe_parse_name_list(b'(', b')', MAX_PIPELINE_VARS, |n, s| {
            PipelineVar { name: n, span: s }
        }, ErrorCode::TooManyPipelineVars);

        let free_vars = self.maybe_parse_name_list(b'{', b'}', MAX_FREE_VARS, |n, s| FreeVar {
            name: n,
            span: s,
        }, ErrorCode::TooManyFreeVars);

        Definition {
            name,
            span: Span::new(start, self.pos),
            free_vars,
            pipeline_vars,
            pipelines,
        }
    }

    /// Parses an optional `open ... close` comma-separated name list,
    /// used for both the pipeline-variable tuple and the free-variable
    /// set. Returns an empty vec if `open` isn't present at the
    /// current position.
    fn maybe_parse_name_list<T>(
        &mut self,
        open: u8,
        close: u8,
        cap: usize,
        make: impl Fn(String, Span) -> T,
        overflow_code: ErrorCode,
    ) -> Vec<T> {
        self.pos = skip_spaces(self.source, self.pos);
        if self.byte_at(self.pos) != Some(open) {
            return Vec::new();
        }
        self.pos += 1;
        let mut items = Vec::new();
        loop {
            self.pos = skip_spaces(self.source, self.pos);
            if self.byte_at(self.pos) == Some(close) {
                self.pos += 1;
                break;
            }
            if self.pos >= self.len() {
                self.error(
                    ErrorCode::UnexpectedEndOfInput,
                    "unterminated name list",
                    Span::new(self.pos, self.pos),
                );
                break;
            }
            let name_start = self.pos;
            let name_end = skip_key_run(self.source, name_start);
            if name_end == name_start {
                self.pos += 1;
                continue;
            }
            let span = Span::new(name_start, name_end);
            if items.len() < cap {
                items.push(make(self.source[name_start..name_end].to_string(), span));
            } else {
                self.error(overflow_code, "too many entries in name list", span);
            }
            self.pos = skip_spaces(self.source, name_end);
            match self.byte_at(self.pos) {
                Some(b',') => {
                    self.pos += 1;
                }
                Some(b) if b == close => {
                    self.pos += 1;
                    break;
                }
                _ => {
                    self.pos += 1;
                }
            }
        }
        items
    }

    fn parse_pipeline_many(&mut self) -> Vec<Pipeline> {
        self.pos = skip_spaces(self.source, self.pos);
        if self.byte_at(self.pos) != Some(b'{') {
            return vec![self.parse_pipeline()];
        }
        self.pos += 1;
        let mut pipelines = Vec::new();
        loop {
            self.pos = skip_spaces(self.source, self.pos);
            if self.byte_at(self.pos) == Some(b'}') {
                self.pos += 1;
                break;
            }
            if self.pos >= self.len() {
                self.error(
                    ErrorCode::UnexpectedEndOfInput,
                    "unterminated pipeline group",
                    Span::new(self.pos, self.pos),
                );
                break;
            }
            let before = self.pos;
            if pipelines.len() < MAX_PIPELINES {
                pipelines.push(self.parse_pipeline());
            } else {
                self.error(
                    ErrorCode::TooManyPipelines,
                    "too many pipelines in group",
                    Span::new(self.pos, self.pos),
                );
                self.parse_pipeline();
            }
            if self.pos <= before {
                self.pos = before + 1;
            }
            self.pos = skip_spaces(self.source, self.pos);
            match self.byte_at(self.pos) {
                Some(b';') => {
                    self.pos += 1;
                }
                Some(b'}') => {
                    self.pos += 1;
                    break;
                }
                _ => break,
            }
        }
        pipelines
    }

    fn parse_pipeline(&mut self) -> Pipeline {
        let start = self.pos;
        let arguments = self.parse_pipeline_arguments();
        let (workers, broke_on_double_arrow) = self.parse_pipeline_workers();
        let outputs = if broke_on_double_arrow {
            self.parse_pipeline_outputs()
        } else {
            Vec::new()
        };
        Pipeline {
            span: Span::new(start, self.pos),
            arguments,
            workers,
            outputs,
        }
    }

    fn parse_pipeline_arguments(&mut self) -> Vec<PipelineArgument> {
        let mut arguments = Vec::new();
        loop {
            self.pos = skip_spaces(self.source, self.pos);
            let arg_start = self.pos;
            let scan = close_paren_as_eof(balanced_scan(
                self.source,
                self.pos,
                &[b",".as_slice(), b">".as_slice()],
                &[],
            ));
            match scan {
                ScanEnd::Terminator {
                    position,
                    terminator_len,
                } => {
                    let text = &self.source[arg_start..position];
                    let argument = self.parse_pipeline_argument(text, arg_start);
                    self.push_bounded(
                        &mut arguments,
                        argument,
                        MAX_PIPELINE_ARGUMENTS,
                        ErrorCode::TooManyPipelineArguments,
                        Span::new(arg_start, position),
                    );
                    let terminator = self.source.as_bytes()[position];
                    self.pos = position + terminator_len;
                    if terminator == b'>' {
                        return arguments;
                    }
                }
                ScanEnd::Forbidden { .. } => unreachable!("argument scan has no forbidden bytes"),
                ScanEnd::EndOfInput { position } => {
                    let text = &self.source[arg_start..position];
                    if !text.trim().is_empty() {
                        let argument = self.parse_pipeline_argument(text, arg_start);
                        self.push_bounded(
                            &mut arguments,
                            argument,
                            MAX_PIPELINE_ARGUMENTS,
                            ErrorCode::TooManyPipelineArguments,
                            Span::new(arg_start, position),
                        );
                    }
                    self.error(
                        ErrorCode::UnexpectedEndOfInput,
                        "pipeline ended before any worker",
                        Span::new(position, position),
                    );
                    self.pos = position;
                    return arguments;
                }
            }
        }
    }

    fn push_bounded<T>(
        &mut self,
        into: &mut Vec<T>,
        value: T,
        cap: usize,
        overflow_code: ErrorCode,
        span: Span,
    ) {
        if into.len() < cap {
            into.push(value);
        } else {
            self.error(overflow_code, "bound exceeded", span);
        }
    }

    fn parse_pipeline_argument(&mut self, text: &str, offset: usize) -> PipelineArgument {
        let (trimmed, begin) = trim_with_offset(text, offset);
        let span = Span::new(begin, begin + trimmed.len());
        if is_wrapped_in_parens(trimmed) {
            let saved_pos = self.pos;
            self.pos = begin + 1;
            let pipeline = self.parse_pipeline();
            self.pos = saved_pos;
            return PipelineArgument::InlinePipeline {
                pipeline: Box::new(pipeline),
                span,
            };
        }
        if !is_all_key(trimmed) {
            self.error(
                ErrorCode::InvalidArgumentName,
                format!("'{trimmed}' is not a valid argument name"),
                span,
            );
        }
        PipelineArgument::Name {
            name: trimmed.to_string(),
            span,
        }
    }

    /// Returns `(workers, broke_on_double_arrow)`.
    fn parse_pipeline_workers(&mut self) -> (Vec<Worker>, bool) {
        let mut workers = Vec::new();
        loop {
            self.pos = skip_spaces(self.source, self.pos);
            let worker_start = self.pos;
            let scan = balanced_scan(
                self.source,
                self.pos,
                &[
                    b">".as_slice(),
                    b"|:".as_slice(),
                    b";".as_slice(),
                    b"}".as_slice(),
                    b")".as_slice(),
                ],
                &[b'|'],
            );
            match scan {
                ScanEnd::Forbidden { position, .. } => {
                    self.error(
                        ErrorCode::ForbiddenPipeInWorker,
                        "symbol '|' inside worker definition, probably forgot to end previous definition",
                        Span::new(position, position + 1),
                    );
                    let text = &self.source[worker_start..position];
                    if !text.trim().is_empty() {
                        let worker = self.parse_pipeline_worker(text, worker_start);
                        self.push_bounded(
                            &mut workers,
                            worker,
                            MAX_PIPELINE_WORKERS,
                            ErrorCode::TooManyPipelineWorkers,
                            Span::new(worker_start, position),
                        );
                    }
                    self.pos = position + 1;
                }
                ScanEnd::Terminator {
                    position,
                    terminator_len,
                } => {
                    let text = &self.source[worker_start..position];
                    if !text.trim().is_empty() {
                        let worker = self.parse_pipeline_worker(text, worker_start);
                        self.push_bounded(
                            &mut workers,
                            worker,
                            MAX_PIPELINE_WORKERS,
                            ErrorCode::TooManyPipelineWorkers,
                            Span::new(worker_start, position),
                        );
                    }
                    let terminator = &self.source.as_bytes()[position..position + terminator_len];
                    if terminator == b">" {
                        if self.byte_at(position + 1) == Some(b'>') {
                            self.pos = position + 2;
                            return (workers, true);
                        }
                        self.pos = position + 1;
                    } else {
                        self.pos = position;
                        return (workers, false);
                    }
                }
                ScanEnd::EndOfInput { position } => {
                    let text = &self.source[worker_start..position];
                    if !text.trim().is_empty() {
                        let worker = self.parse_pipeline_worker(text, worker_start);
                        self.push_bounded(
                            &mut workers,
                            worker,
                            MAX_PIPELINE_WORKERS,
                            ErrorCode::TooManyPipelineWorkers,
                            Span::new(worker_start, position),
                        );
                    }
                    self.error(
                        ErrorCode::UnexpectedEndOfInput,
                        "unterminated pipeline",
                        Span::new(position, position),
                    );
                    self.pos = position;
                    return (workers, false);
                }
            }
        }
    }

    fn parse_pipeline_worker(&mut self, text: &str, offset: usize) -> Worker {
        let span = Span::new(offset, offset + text.len());
        let name_end = skip_key_run(text, 0);
        if name_end == 0 {
            self.error(
                ErrorCode::InvalidWorkerName,
                "expected a worker name",
                Span::new(offset, offset),
            );
        }
        let name = text[..name_end].to_string();

        let bytes = text.as_bytes();
        let mut whitespace_at = None;
        let mut i = name_end;
        while i < bytes.len() {
            if bytes[i].is_ascii_whitespace() {
                whitespace_at = Some(i);
                break;
            }
            i += 1;
        }
        let subs_start = match whitespace_at {
            Some(p) => p + 1,
            None => text.len(),
        };
        let subs_text = if subs_start < text.len() {
            &text[subs_start..]
        } else {
            ""
        };
        let substitutions = if subs_text.trim().is_empty() {
            Vec::new()
        } else {
            self.parse_substitutions(subs_text, offset + subs_start)
        };

        Worker {
            name,
            span,
            substitutions,
        }
    }

    /// Substitutions are whitespace-separated groups, each itself
    /// paren-balanced (so a pipeline-valued substitution's own `>`/`>>`
    /// content can contain spaces without being split apart).
    fn parse_substitutions(&mut self, text: &str, offset: usize) -> Vec<Substitution> {
        let mut subs = Vec::new();
        let mut pos = 0usize;
        loop {
            pos = skip_spaces(text, pos);
            if pos >= text.len() {
                break;
            }
            let entry_start = pos;
            let entry_end = scan_whitespace_run(text, pos);
            let entry = &text[entry_start..entry_end];
            if !entry.is_empty() {
                let sub = self.parse_one_substitution(entry, offset + entry_start);
                self.push_bounded(
                    &mut subs,
                    sub,
                    MAX_PIPELINE_WORKER_SUBS,
                    ErrorCode::TooManyWorkerSubstitutions,
                    Span::new(offset + entry_start, offset + entry_end),
                );
            }
            if entry_end >= text.len() {
                break;
            }
            pos = entry_end;
        }
        subs
    }

    fn parse_one_substitution(&mut self, entry: &str, offset: usize) -> Substitution {
        let (trimmed, begin) = trim_with_offset(entry, offset);
        let span = Span::new(begin, begin + trimmed.len());
        let Some(eq) = trimmed.find('=') else {
            self.error(
                ErrorCode::InvalidSubstitutionName,
                format!("'{trimmed}' is not a 'name = value' substitution"),
                span,
            );
            return Substitution {
                name: trimmed.to_string(),
                span,
                value: SubstitutionValue::Symbol {
                    symbol: String::new(),
                    span,
                },
            };
        };
        let (left, left_begin) = trim_with_offset(&trimmed[..eq], begin);
        let (right, right_begin) = trim_with_offset(&trimmed[eq + 1..], begin + eq + 1);

        if !is_all_key(left) {
            self.error(
                ErrorCode::InvalidSubstitutionName,
                format!("'{left}' is not a valid substitution name"),
                Span::new(left_begin, left_begin + left.len()),
            );
        }

        let value_span = Span::new(right_begin, right_begin + right.len());
        let value = if is_wrapped_in_parens(right) {
            let saved_pos = self.pos;
            self.pos = right_begin + 1;
            let pipeline = self.parse_pipeline();
            self.pos = saved_pos;
            SubstitutionValue::Pipeline {
                pipeline: Box::new(pipeline),
                span: value_span,
            }
        } else {
            if !is_all_key(right) {
                self.error(
                    ErrorCode::InvalidSubstitutionSymbol,
                    format!("'{right}' is not a valid substitution value"),
                    value_span,
                );
            }
            SubstitutionValue::Symbol {
                symbol: right.to_string(),
                span: value_span,
            }
        };

        Substitution {
            name: left.to_string(),
            span,
            value,
        }
    }

    fn parse_pipeline_outputs(&mut self) -> Vec<Output> {
        let mut outputs = Vec::new();
        loop {
            self.pos = skip_spaces(self.source, self.pos);
            let output_start = self.pos;
            let scan = close_paren_as_eof(balanced_scan(
                self.source,
                self.pos,
                &[
                    b",".as_slice(),
                    b"|:".as_slice(),
                    b"}".as_slice(),
                    b";".as_slice(),
                    b")".as_slice(),
                ],
                &[b'>', b'|'],
            ));
            match scan {
                ScanEnd::Forbidden { position, byte } => {
                    let code = if byte == b'>' {
                        ErrorCode::ForbiddenArrowInOutput
                    } else {
                        ErrorCode::ForbiddenPipeInOutput
                    };
                    self.error(
                        code,
                        format!("symbol '{}' inside output list", byte as char),
                        Span::new(position, position + 1),
                    );
                    let text = &self.source[output_start..position];
                    if !text.trim().is_empty() {
                        let output = self.parse_pipeline_output(text, output_start);
                        self.push_bounded(
                            &mut outputs,
                            output,
                            MAX_PIPELINE_OUTPUTS,
                            ErrorCode::TooManyPipelineOutputs,
                            Span::new(output_start, position),
                        );
                    }
                    self.pos = position + 1;
                }
                ScanEnd::Terminator {
                    position,
                    terminator_len,
                } => {
                    let text = &self.source[output_start..position];
                    if !text.trim().is_empty() {
                        let output = self.parse_pipeline_output(text, output_start);
                        self.push_bounded(
                            &mut outputs,
                            output,
                            MAX_PIPELINE_OUTPUTS,
                            ErrorCode::TooManyPipelineOutputs,
                            Span::new(output_start, position),
                        );
                    }
                    let terminator = self.source.as_bytes()[position];
                    if terminator == b',' {
                        self.pos = position + terminator_len;
                    } else {
                        self.pos = position;
                        return outputs;
                    }
                }
                ScanEnd::EndOfInput { position } => {
                    let text = &self.source[output_start..position];
                    if !text.trim().is_empty() {
                        let output = self.parse_pipeline_output(text, output_start);
                        self.push_bounded(
                            &mut outputs,
                            output,
                            MAX_PIPELINE_OUTPUTS,
                            ErrorCode::TooManyPipelineOutputs,
                            Span::new(output_start, position),
                        );
                    }
                    self.error(
                        ErrorCode::UnexpectedEndOfInput,
                        "unterminated output list",
                        Span::new(position, position),
                    );
                    self.pos = position;
                    return outputs;
                }
            }
        }
    }

    fn parse_pipeline_output(&mut self, text: &str, offset: usize) -> Output {
        let (trimmed, begin) = trim_with_offset(text, offset);
        let span = Span::new(begin, begin + trimmed.len());
        if !is_all_key(trimmed) {
            self.error(
                ErrorCode::InvalidOutputName,
                format!("'{trimmed}' is not a valid output name"),
                span,
            );
        }
        Output {
            name: trimmed.to_string(),
            span,
        }
    }
}

/// An unmatched `)` (`terminator_len == 0`) belongs to an outer
/// context the local scan never opened; there is nothing left for this
/// phase to recognize, so treat it exactly like running out of input
/// rather than letting a zero-length terminator stall the caller's loop.
fn close_paren_as_eof(scan: ScanEnd) -> ScanEnd {
    match scan {
        ScanEnd::Terminator {
            position,
            terminator_len: 0,
        } => ScanEnd::EndOfInput { position },
        other => other,
    }
}

fn trim_with_offset(text: &str, offset: usize) -> (&str, usize) {
    let trimmed_start = text.len() - text.trim_start().len();
    (text.trim(), offset + trimmed_start)
}

fn is_wrapped_in_parens(text: &str) -> bool {
    if !(text.starts_with('(') && text.ends_with(')') && text.len() >= 2) {
        return false;
    }
    let bytes = text.as_bytes();
    let mut depth = 0i32;
    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'(' => depth += 1,
            b')' => depth -= 1,
            _ => {}
        }
        if depth == 0 {
            // Closes before the final byte: not a single wrapping pair.
            return i == bytes.len() - 1;
        }
    }
    false
}

pub fn parse_program(source: &str, file_name: &str, diagnostics: &mut DiagnosticLog) -> Program {
    Parser::new(source, diagnostics).parse_program(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> (Program, DiagnosticLog) {
        let mut log = DiagnosticLog::new();
        let program = parse_program(src, "test.flow", &mut log);
        (program, log)
    }

    #[test]
    fn parses_simple_pipeline_definition() {
        let (program, log) = parse("a > worker >> out |: main\n");
        assert!(!log.has_errors());
        assert_eq!(program.definitions.len(), 1);
        let def = &program.definitions[0];
        assert_eq!(def.name, "main");
        assert!(def.is_pure());
        assert_eq!(def.pipelines.len(), 1);
        let pipeline = &def.pipelines[0];
        assert_eq!(pipeline.arguments.len(), 1);
        assert_eq!(pipeline.workers.len(), 1);
        assert_eq!(pipeline.outputs.len(), 1);
    }

    #[test]
    fn parses_multi_worker_chain() {
        let (program, log) = parse("a > w1 > w2 > w3 >> out |: chain\n");
        assert!(!log.has_errors());
        assert_eq!(program.definitions[0].pipelines[0].workers.len(), 3);
    }

    #[test]
    fn parses_free_vars_and_pipeline_vars() {
        let (program, log) = parse("a > w >> out |: f(p1, p2){fv1, fv2}\n");
        assert!(!log.has_errors());
        let def = &program.definitions[0];
        assert_eq!(def.pipeline_vars.len(), 2);
        assert_eq!(def.free_vars.len(), 2);
        assert!(!def.is_pure());
    }

    #[test]
    fn parses_worker_substitutions() {
        let (program, log) = parse("a > w x=1 y=val >> out |: main\n");
        assert!(!log.has_errors());
        let worker = &program.definitions[0].pipelines[0].workers[0];
        assert_eq!(worker.substitutions.len(), 2);
    }

    #[test]
    fn parses_mixed_symbol_and_pipeline_substitutions() {
        let (program, log) = parse("a > worker k=sym m=(b > f >> c) >> d |: main\n");
        assert!(!log.has_errors());
        let worker = &program.definitions[0].pipelines[0].workers[0];
        assert_eq!(worker.substitutions.len(), 2);
        assert_eq!(worker.substitutions[0].name, "k");
        assert!(matches!(
            worker.substitutions[0].value,
            SubstitutionValue::Symbol { .. }
        ));
        assert_eq!(worker.substitutions[1].name, "m");
        assert!(matches!(
            worker.substitutions[1].value,
            SubstitutionValue::Pipeline { .. }
        ));
    }

    #[test]
    fn inline_pipeline_output_scan_stops_at_enclosing_paren() {
        let (program, log) = parse("(1 > f >> z), 2 > g >> w |: main\n");
        assert!(!log.has_errors());
        let pipeline = &program.definitions[0].pipelines[0];
        assert_eq!(pipeline.outputs.len(), 1);
        assert_eq!(pipeline.outputs[0].name, "w");
        let PipelineArgument::InlinePipeline { pipeline: inner, .. } = &pipeline.arguments[0] else {
            panic!("expected an inline pipeline argument");
        };
        assert_eq!(inner.outputs.len(), 1);
        assert_eq!(inner.outputs[0].name, "z");
    }

    #[test]
    fn parses_inline_pipeline_argument() {
        let (program, log) = parse("(a > w1) > w2 >> out |: main\n");
        assert!(!log.has_errors());
        let arg = &program.definitions[0].pipelines[0].arguments[0];
        assert!(matches!(arg, PipelineArgument::InlinePipeline { .. }));
    }

    #[test]
    fn forbidden_pipe_in_worker_is_diagnosed() {
        let (_program, log) = parse("a > w1 | w2 >> out |: main\n");
        assert!(log.has_errors());
    }

    #[test]
    fn missing_separator_is_diagnosed_but_recovers() {
        let (program, log) = parse("a > w >> out main\n");
        assert!(log.has_errors());
        assert_eq!(program.definitions.len(), 1);
    }

    #[test]
    fn parser_always_terminates_on_garbage_input() {
        let (_program, _log) = parse(")))}}}>>>|:|:|:,,,");
    }

    #[test]
    fn grouped_pipelines_are_all_parsed() {
        let (program, log) = parse("{a > w1 >> o1; b > w2 >> o2} |: grouped\n");
        assert!(!log.has_errors());
        assert_eq!(program.definitions[0].pipelines.len(), 2);
    }
}
