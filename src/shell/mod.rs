use std::env;
use std::io::{self, IsTerminal, Write};
use std::sync::Arc;

mod prompt;

pub use prompt::Prompt;

use crate::{
    core::{
        commands::{CommandError, CommandExecutor, Flow},
        config::Config,
        env::Environment,
    },
    error::ShellError,
    input::{Editor, LineReader, PlainReader, ReadOutcome},
    process::{ProcessExecutor, Resolver, Shutdown},
    report::Reporter,
    tokenizer::Tokenizer,
};

/// The read-tokenize-dispatch loop.
///
/// Strictly sequential: at most one child exists at a time and the next
/// prompt is rendered only after it has been reaped.
pub struct Shell<R, W> {
    reader: R,
    out: W,
    tokenizer: Tokenizer,
    executor: CommandExecutor,
    prompt: Prompt,
    shutdown: Arc<Shutdown>,
    reporter: Reporter,
}

impl Shell<Box<dyn LineReader>, io::Stdout> {
    /// Interactive shell on the process's stdin/stdout. Installs the signal
    /// handlers; failing to do so is reported but not fatal.
    pub fn new(config: &Config, reporter: Reporter) -> Result<Self, ShellError> {
        let shutdown = Shutdown::new();
        for err in shutdown.install() {
            reporter.error(&format!("esh: could not catch signals: {}", err));
        }

        let reader: Box<dyn LineReader> = if io::stdin().is_terminal() {
            Box::new(Editor::new(config.history)?)
        } else {
            Box::new(PlainReader::new(io::stdin().lock(), io::stdout()))
        };

        Ok(Shell::with_reader(reader, io::stdout(), config, reporter, shutdown))
    }
}

impl<R: LineReader, W: Write> Shell<R, W> {
    pub fn with_reader(
        reader: R,
        out: W,
        config: &Config,
        reporter: Reporter,
        shutdown: Arc<Shutdown>,
    ) -> Self {
        let process_executor = ProcessExecutor::new(
            Resolver::new(&config.prefix, config.path_search),
            Arc::new(Environment::capture()),
            Arc::clone(&shutdown),
            reporter,
        );

        Shell {
            reader,
            out,
            tokenizer: Tokenizer::new(config.max_args),
            executor: CommandExecutor::new(process_executor),
            prompt: Prompt::new(config.color),
            shutdown,
            reporter,
        }
    }

    /// Returns `Ok` on `exit`, end of input or a shutdown request.
    pub fn run(&mut self) -> Result<(), ShellError> {
        loop {
            if self.shutdown.is_requested() {
                self.reporter.debug("shutdown requested");
                return Ok(());
            }

            let cwd = env::current_dir().map_err(ShellError::WorkingDirectory)?;
            let prompt = self.prompt.render(&cwd);
            self.out.flush().map_err(ShellError::Flush)?;

            let line = match self.reader.read_line(&prompt)? {
                ReadOutcome::Line(line) => line,
                ReadOutcome::Eof => return Ok(()),
                ReadOutcome::Interrupted => {
                    self.reporter.debug("interrupted");
                    return Ok(());
                }
                ReadOutcome::Invalid => {
                    self.reporter.error("esh: input is not valid UTF-8, line ignored");
                    continue;
                }
            };

            if self.execute_line(&line)? == Flow::Exit {
                return Ok(());
            }
        }
    }

    /// User errors are reported here; only fatal ones propagate.
    pub fn execute_line(&mut self, line: &str) -> Result<Flow, ShellError> {
        let argv = self.tokenizer.tokenize(line);
        if argv.is_empty() {
            return Ok(Flow::Continue);
        }
        if argv.is_truncated() {
            self.reporter.debug(&format!(
                "line truncated to {} fields",
                self.tokenizer.max_fields().unwrap_or(argv.len())
            ));
        }

        match self.executor.execute(&argv, &mut self.out) {
            Ok(flow) => Ok(flow),
            Err(CommandError::ProcessError(e)) if e.is_fatal() => Err(e.into()),
            Err(e) => {
                self.reporter.error(&e.to_string());
                Ok(Flow::Continue)
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn into_parts(self) -> (R, W) {
        (self.reader, self.out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::time::{Duration, Instant};

    /// Feeds canned lines and records when each prompt was shown.
    struct Script {
        lines: VecDeque<ReadOutcome>,
        prompts: Vec<(String, Instant)>,
    }

    impl Script {
        fn new(lines: &[&str]) -> Self {
            Self {
                lines: lines
                    .iter()
                    .map(|line| ReadOutcome::Line(line.to_string()))
                    .collect(),
                prompts: Vec::new(),
            }
        }
    }

    impl LineReader for Script {
        fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome, ShellError> {
            self.prompts.push((prompt.to_string(), Instant::now()));
            Ok(self.lines.pop_front().unwrap_or(ReadOutcome::Eof))
        }
    }

    fn shell(script: Script) -> Shell<Script, Vec<u8>> {
        Shell::with_reader(
            script,
            Vec::new(),
            &Config::default(),
            Reporter::new(true, false, false),
            Shutdown::new(),
        )
    }

    #[test]
    fn test_blank_lines_reprompt() {
        let mut shell = shell(Script::new(&["\n", "   \n", "\t\n", ""]));
        shell.run().unwrap();

        let (script, out) = shell.into_parts();
        assert_eq!(script.prompts.len(), 5);
        assert!(out.is_empty());
    }

    #[test]
    fn test_prompt_shows_cwd() {
        let mut shell = shell(Script::new(&[]));
        shell.run().unwrap();

        let cwd = env::current_dir().unwrap();
        let (script, _) = shell.into_parts();
        assert_eq!(script.prompts[0].0, format!("\x1B[34m{} $\x1B[0m ", cwd.display()));
    }

    #[test]
    fn test_exit_stops_reading() {
        let mut shell = shell(Script::new(&["exit\n", "true\n"]));
        shell.run().unwrap();

        let (script, _) = shell.into_parts();
        assert_eq!(script.prompts.len(), 1);
        assert_eq!(script.lines.len(), 1);
    }

    #[test]
    fn test_waits_for_child_before_prompting() {
        let mut shell = shell(Script::new(&["sleep 0.3\n"]));
        shell.run().unwrap();

        let (script, _) = shell.into_parts();
        assert_eq!(script.prompts.len(), 2);
        let elapsed = script.prompts[1].1.duration_since(script.prompts[0].1);
        assert!(elapsed >= Duration::from_millis(300), "reprompted after {:?}", elapsed);
    }

    #[test]
    fn test_unknown_command_keeps_running() {
        let mut shell = shell(Script::new(&["esh-no-such-command --flag\n", "exit\n"]));
        assert!(shell.run().is_ok());

        let (script, _) = shell.into_parts();
        assert_eq!(script.prompts.len(), 2);
        assert!(script.lines.is_empty());
    }

    #[test]
    fn test_failed_cd_keeps_running() {
        let before = env::current_dir().unwrap();
        let mut shell = shell(Script::new(&["cd\n", "cd /esh/missing\n", "exit\n"]));
        shell.run().unwrap();

        let (script, _) = shell.into_parts();
        assert_eq!(script.prompts.len(), 3);
        assert_eq!(env::current_dir().unwrap(), before);
    }

    #[test]
    fn test_clear_goes_to_output() {
        let mut shell = shell(Script::new(&["clear\n"]));
        shell.run().unwrap();

        let (_, out) = shell.into_parts();
        assert_eq!(out, b"\x1B[2J\x1B[1;1H");
    }

    #[test]
    fn test_invalid_line_is_skipped() {
        let mut script = Script::new(&[]);
        script.lines.push_back(ReadOutcome::Invalid);
        script.lines.push_back(ReadOutcome::Line("exit\n".into()));
        let mut shell = shell(script);
        assert!(shell.run().is_ok());

        let (script, _) = shell.into_parts();
        assert_eq!(script.prompts.len(), 2);
        assert!(script.lines.is_empty());
    }

    #[test]
    fn test_interrupt_ends_loop() {
        let mut script = Script::new(&[]);
        script.lines.push_back(ReadOutcome::Interrupted);
        script.lines.push_back(ReadOutcome::Line("true\n".into()));
        let mut shell = shell(script);
        shell.run().unwrap();

        let (script, _) = shell.into_parts();
        assert_eq!(script.prompts.len(), 1);
    }

    #[test]
    fn test_requested_shutdown_skips_prompt() {
        let shutdown = Shutdown::new();
        shutdown.track(1);
        // A tracked child defers the exit to the loop.
        shutdown.request(None);

        let mut shell = Shell::with_reader(
            Script::new(&["true\n"]),
            Vec::new(),
            &Config::default(),
            Reporter::new(true, false, false),
            shutdown,
        );
        shell.run().unwrap();

        let (script, _) = shell.into_parts();
        assert!(script.prompts.is_empty());
    }

    #[test]
    fn test_truncated_line_still_runs() {
        let config = Config {
            max_args: Some(1),
            ..Config::default()
        };
        let mut shell = Shell::with_reader(
            Script::new(&["exit now please\n", "true\n"]),
            Vec::new(),
            &config,
            Reporter::new(true, false, false),
            Shutdown::new(),
        );
        shell.run().unwrap();

        let (script, _) = shell.into_parts();
        assert_eq!(script.prompts.len(), 1);
    }
}
