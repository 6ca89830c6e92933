use crate::error::ShellError;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct Flags {
    flags: HashMap<String, Flag>,
}

#[derive(Debug, Clone)]
pub struct Flag {
    pub short: Option<String>,
    pub long: String,
    pub description: String,
    pub takes_value: bool,
    pub value: Option<String>,
}

impl Default for Flags {
    fn default() -> Self {
        Self::new()
    }
}

impl Flags {
    pub fn new() -> Self {
        let mut flags = HashMap::new();

        let table: [(&str, Option<&str>, &str, bool, &str); 9] = [
            ("help", Some("-h"), "--help", false, "Print this help message"),
            ("version", Some("-v"), "--version", false, "Show version information"),
            ("quiet", Some("-q"), "--quiet", false, "Suppress non-error output"),
            ("debug", Some("-d"), "--debug", false, "Trace resolution and child status"),
            ("config", Some("-c"), "--config", true, "Read settings from this file"),
            ("prefix", Some("-p"), "--prefix", true, "Fallback directory for programs"),
            ("max-args", Some("-m"), "--max-args", true, "Fields kept per line (0 = no limit)"),
            ("no-path", None, "--no-path", false, "Only look up programs in the prefix"),
            ("no-color", None, "--no-color", false, "Plain prompt and messages"),
        ];

        for (name, short, long, takes_value, description) in table {
            flags.insert(
                name.to_string(),
                Flag {
                    short: short.map(str::to_string),
                    long: long.to_string(),
                    description: description.to_string(),
                    takes_value,
                    value: None,
                },
            );
        }

        Flags { flags }
    }

    pub fn parse(&mut self, args: &[String]) -> Result<(), ShellError> {
        let mut args = args.iter();
        while let Some(arg) = args.next() {
            let flag = self
                .flags
                .values_mut()
                .find(|flag| flag.short.as_deref() == Some(arg.as_str()) || &flag.long == arg)
                .ok_or_else(|| ShellError::FlagError(format!("unknown flag {}", arg)))?;

            if flag.takes_value {
                let value = args
                    .next()
                    .ok_or_else(|| ShellError::FlagError(format!("Flag {} requires a value", arg)))?;
                flag.value = Some(value.clone());
            } else {
                flag.value = Some("true".to_string());
            }
        }
        Ok(())
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.flags
            .get(name)
            .and_then(|f| f.value.as_ref())
            .is_some()
    }

    pub fn get_value(&self, name: &str) -> Option<&String> {
        self.flags.get(name).and_then(|f| f.value.as_ref())
    }

    pub fn help(&self) -> String {
        let mut flags: Vec<&Flag> = self.flags.values().collect();
        flags.sort_by(|a, b| a.long.cmp(&b.long));

        let mut help = String::from("Usage: esh [OPTIONS]\n\nOptions:\n");
        for flag in flags {
            let short = flag.short.as_deref().map(|s| format!("{},", s)).unwrap_or_default();
            let long = if flag.takes_value {
                format!("{} <value>", flag.long)
            } else {
                flag.long.clone()
            };
            help.push_str(&format!("  {:<4}{:<22} {}\n", short, long, flag.description));
        }
        help
    }

    pub fn print_help(&self) {
        print!("{}", self.help());
    }
}
