use esh::core::config::Config;
use esh::error::ShellError;
use esh::flags::Flags;
use esh::highlight::SyntaxHighlighter;
use esh::report::Reporter;
use esh::shell::Shell;
use std::env;
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut color = true;
    match run(&mut color) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let message = format!("esh: {}", e);
            eprintln!("{}", SyntaxHighlighter::new(color).highlight_error(&message));
            ExitCode::FAILURE
        }
    }
}

/// `color` tracks the colour setting as far as it is known, for the final
/// error message.
fn run(color: &mut bool) -> Result<(), ShellError> {
    let mut flags = Flags::new();
    let args: Vec<String> = env::args().skip(1).collect();
    flags.parse(&args)?;
    *color = !flags.is_set("no-color");

    if flags.is_set("help") {
        flags.print_help();
        return Ok(());
    }

    if flags.is_set("version") {
        println!("esh {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let config = Config::from_flags(&flags)?;
    *color = config.color;
    let reporter = Reporter::new(flags.is_set("quiet"), flags.is_set("debug"), config.color);
    reporter.debug(&format!("{:?}", config));

    let mut shell = Shell::new(&config, reporter)?;
    shell.run()
}
