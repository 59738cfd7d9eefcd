//! The compiler driver: CLI argument handling, source-file I/O, and
//! invoking the fused parser/analyzer.
//!
//! A small `Config`/`Session` split between library-side compile logic and
//! a thin `main.rs`: no optimization level, emit-type selection, target
//! triple, or incremental cache, since this driver never optimizes,
//! allocates registers, or emits native code.

use std::path::PathBuf;

use anyhow::{bail, Context};

/// One input file, an optional output file (stdout if absent), and a
/// verbosity flag toggling `OK.` against the full symbol-table/IR/warnings
/// dump.
#[derive(Debug, Clone)]
pub struct Config {
    pub input_file: PathBuf,
    pub output_file: Option<PathBuf>,
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_file: PathBuf::new(),
            output_file: None,
            verbose: false,
        }
    }
}

impl Config {
    /// Parses `args` (the program name already stripped). Accepts exactly
    /// one positional source path plus `-o`/`--output <path>` and
    /// `-v`/`--verbose`.
    pub fn parse(args: &[String]) -> anyhow::Result<Self> {
        let mut config = Config::default();
        let mut positional: Option<PathBuf> = None;
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "-v" | "--verbose" => config.verbose = true,
                "-o" | "--output" => {
                    let path = iter.next().context("-o/--output requires a path")?;
                    config.output_file = Some(PathBuf::from(path));
                }
                other if positional.is_none() => positional = Some(PathBuf::from(other)),
                other => bail!("unexpected argument: {other}"),
            }
        }
        config.input_file = positional.context("missing input source file")?;
        Ok(config)
    }
}

/// One compilation attempt's result, already rendered to the text the
/// driver prints.
pub enum CompileOutcome {
    Success(String),
    Fatal(String),
}

/// One invocation's state: just the configuration. No source map, interner,
/// or incremental cache to own here — one file in, one diagnostic handler
/// owned entirely by the analyzer for the call's duration.
pub struct Session {
    pub config: Config,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn compile_source(&self, source: &str) -> CompileOutcome {
        let tokens = match c3e_lex::Lexer::tokenize(source) {
            Ok(tokens) => tokens,
            Err(err) => return CompileOutcome::Fatal(err.to_string()),
        };
        match c3e_par::analyze(&tokens) {
            Ok(program) => CompileOutcome::Success(render_success(&program, self.config.verbose)),
            Err(fatal) => CompileOutcome::Fatal(fatal.0.to_string()),
        }
    }
}

/// §4.4/§6's verbose dump: symbol table, blank line, `Intermediary Code`
/// (the global-initializer stream, `goto main`, then function bodies in
/// declaration order), blank line, then a warnings section if any warnings
/// were collected.
fn render_success(program: &c3e_par::CompiledProgram, verbose: bool) -> String {
    if !verbose {
        return "OK.".to_string();
    }

    let mut out = String::new();
    out.push_str(&program.symbols.print_all());
    out.push_str("\n\nIntermediary Code:\n");
    for instr in &program.global_code {
        out.push_str(&instr.to_string());
        out.push('\n');
    }
    out.push_str("goto main\n");
    for instr in &program.function_code {
        out.push_str(&instr.to_string());
        out.push('\n');
    }
    if !program.warnings.is_empty() {
        out.push_str("\nWarnings:\n");
        for warning in &program.warnings {
            out.push_str(&warning.to_string());
            out.push('\n');
        }
    }
    out
}

/// Reads the configured source file, runs the pipeline, and writes the
/// rendered result to the configured output (stdout if none). Returns the
/// process exit code: `0` on success, `1` on a fatal compilation error.
pub fn run(args: &[String]) -> anyhow::Result<u8> {
    let config = Config::parse(args)?;
    let source = std::fs::read_to_string(&config.input_file)
        .with_context(|| format!("reading {}", config.input_file.display()))?;

    let session = Session::new(config);
    let (text, code) = match session.compile_source(&source) {
        CompileOutcome::Success(text) => (text, 0),
        CompileOutcome::Fatal(text) => (text, 1),
    };

    match &session.config.output_file {
        Some(path) => std::fs::write(path, format!("{text}\n"))
            .with_context(|| format!("writing {}", path.display()))?,
        None => println!("{text}"),
    }

    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_main_prints_ok_by_default() {
        let session = Session::new(Config::default());
        match session.compile_source("void main(){}") {
            CompileOutcome::Success(text) => assert_eq!(text, "OK."),
            CompileOutcome::Fatal(_) => panic!("expected success"),
        }
    }

    #[test]
    fn empty_main_verbose_dump_contains_the_synthesized_return() {
        let mut config = Config::default();
        config.verbose = true;
        let session = Session::new(config);
        match session.compile_source("void main(){}") {
            CompileOutcome::Success(text) => {
                assert!(text.contains("goto main"));
                assert!(text.contains("main:"));
                assert!(text.contains(":= 0"));
                assert!(text.contains("return"));
            }
            CompileOutcome::Fatal(_) => panic!("expected success"),
        }
    }

    #[test]
    fn undeclared_identifier_is_reported_as_a_fatal_error() {
        let session = Session::new(Config::default());
        match session.compile_source("void main(){ y = 1; }") {
            CompileOutcome::Fatal(text) => assert!(text.contains("\"y\" undeclared.")),
            CompileOutcome::Success(_) => panic!("expected a fatal error"),
        }
    }

    #[test]
    fn config_parse_rejects_missing_input_file() {
        assert!(Config::parse(&["-v".to_string()]).is_err());
    }

    #[test]
    fn config_parse_reads_verbose_and_output_flags() {
        let args: Vec<String> = vec!["-v".into(), "-o".into(), "out.c3e".into(), "main.c".into()];
        let config = Config::parse(&args).unwrap();
        assert!(config.verbose);
        assert_eq!(config.output_file, Some(PathBuf::from("out.c3e")));
        assert_eq!(config.input_file, PathBuf::from("main.c"));
    }
}
