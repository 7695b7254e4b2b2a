use std::fmt;
use std::path::PathBuf;

/// Which action produced a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunKind {
    Info,
    Crack,
    Probe,
}

impl fmt::Display for RunKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunKind::Info => write!(f, "info"),
            RunKind::Crack => write!(f, "crack"),
            RunKind::Probe => write!(f, "probe"),
        }
    }
}

/// A validated program plus argument vector. Only the builders create these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl CommandLine {
    pub(crate) fn new(program: PathBuf, args: Vec<String>) -> Self {
        Self { program, args }
    }

    /// Builds a command without validation. Used by callers that drive
    /// arbitrary programs through the runner, such as tests.
    pub fn unchecked<I, S>(program: impl Into<PathBuf>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl CommandLine {
    /// Program and arguments quoted for a POSIX shell, for echoing to the user.
    pub fn quoted(&self) -> String {
        let program = self.program.to_string_lossy();
        shell_words::join(
            std::iter::once(program.as_ref()).chain(self.args.iter().map(String::as_str)),
        )
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.quoted())
    }
}
