/// Default cap on the number of fields kept from one input line.
pub const DEFAULT_MAX_ARGS: usize = 256;

/// Characters that separate fields.
pub const DEFAULT_DELIMITERS: &[char] = &[' ', '\t'];

/// The fields of one input line. The first field is the command name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgVector {
    fields: Vec<String>,
    truncated: bool,
}

impl ArgVector {
    pub fn command(&self) -> Option<&str> {
        self.fields.first().map(String::as_str)
    }

    /// Everything after the command name.
    pub fn args(&self) -> &[String] {
        self.fields.get(1..).unwrap_or(&[])
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// True when fields past the limit were dropped.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for ArgVector {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(Into::into).collect(),
            truncated: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Tokenizer {
    delimiters: Vec<char>,
    max_fields: Option<usize>,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(Some(DEFAULT_MAX_ARGS))
    }
}

impl Tokenizer {
    /// `None` keeps every field.
    pub fn new(max_fields: Option<usize>) -> Self {
        Self {
            delimiters: DEFAULT_DELIMITERS.to_vec(),
            max_fields,
        }
    }

    pub fn with_delimiters(mut self, delimiters: &[char]) -> Self {
        self.delimiters = delimiters.to_vec();
        self
    }

    pub fn max_fields(&self) -> Option<usize> {
        self.max_fields
    }

    /// Splits `line` into non-empty fields after stripping the line ending.
    ///
    /// Fields past the configured limit are dropped and the result is marked
    /// as truncated; this is the one place input can be lost silently.
    pub fn tokenize(&self, line: &str) -> ArgVector {
        let line = strip_line_ending(line);
        let mut fields = Vec::new();
        let mut truncated = false;

        for field in line
            .split(|c: char| self.delimiters.contains(&c))
            .filter(|s| !s.is_empty())
        {
            if self.max_fields.is_some_and(|max| fields.len() >= max) {
                truncated = true;
                break;
            }
            fields.push(field.to_owned());
        }

        ArgVector { fields, truncated }
    }
}

fn strip_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}
