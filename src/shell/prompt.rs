use std::path::Path;

const BLUE: &str = "\x1B[34m";
const RESET: &str = "\x1B[0m";

#[derive(Debug, Clone, Copy)]
pub struct Prompt {
    color: bool,
}

impl Prompt {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// `<cwd> $ `, the cwd and `$` in blue when colour is on.
    pub fn render(&self, cwd: &Path) -> String {
        if self.color {
            format!("{}{} ${} ", BLUE, cwd.display(), RESET)
        } else {
            format!("{} $ ", cwd.display())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colored() {
        let prompt = Prompt::new(true).render(Path::new("/home/user"));
        assert_eq!(prompt, "\x1B[34m/home/user $\x1B[0m ");
    }

    #[test]
    fn test_plain() {
        let prompt = Prompt::new(false).render(Path::new("/tmp"));
        assert_eq!(prompt, "/tmp $ ");
    }
}
