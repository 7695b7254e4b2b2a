use std::fmt;
use std::path::{Path, PathBuf};

/// The four built-in character classes the retriever understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacterClasses {
    pub uppercase: bool,
    pub lowercase: bool,
    pub digits: bool,
    pub special: bool,
}

impl CharacterClasses {
    pub fn all() -> Self {
        Self {
            uppercase: true,
            lowercase: true,
            digits: true,
            special: true,
        }
    }

    pub fn none() -> Self {
        Self {
            uppercase: false,
            lowercase: false,
            digits: false,
            special: false,
        }
    }

    pub fn any(&self) -> bool {
        self.uppercase || self.lowercase || self.digits || self.special
    }

    /// Class names paired with their flag, in wire order.
    pub(crate) fn in_wire_order(&self) -> [(&'static str, bool); 4] {
        [
            ("uppercase", self.uppercase),
            ("lowercase", self.lowercase),
            ("digits", self.digits),
            ("special", self.special),
        ]
    }
}

impl Default for CharacterClasses {
    fn default() -> Self {
        Self::all()
    }
}

/// Options chosen for one retriever invocation.
///
/// Built fresh for every action and dropped once the argument vector exists.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionState {
    pub binary_path: PathBuf,
    pub target_file: Option<PathBuf>,
    pub wordlist: Option<PathBuf>,
    pub min_length: Option<u32>,
    pub max_length: Option<u32>,
    pub threads: Option<u32>,
    pub custom_characters: String,
    pub use_custom_only: bool,
    pub classes: CharacterClasses,
}

impl SelectionState {
    pub fn new(binary_path: impl Into<PathBuf>) -> Self {
        Self {
            binary_path: binary_path.into(),
            ..Self::default()
        }
    }

    /// Target path, treating an empty path as absent.
    pub(crate) fn target(&self) -> Option<&Path> {
        non_empty(self.target_file.as_deref())
    }

    /// Wordlist path, treating an empty path as absent.
    pub(crate) fn wordlist(&self) -> Option<&Path> {
        non_empty(self.wordlist.as_deref())
    }
}

fn non_empty(path: Option<&Path>) -> Option<&Path> {
    path.filter(|p| !p.as_os_str().is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashMode {
    #[default]
    None,
    Sha256,
}

impl HashMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            HashMode::None => "none",
            HashMode::Sha256 => "sha256",
        }
    }
}

impl fmt::Display for HashMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options chosen for one benchmark probe invocation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProbeSelection {
    pub binary_path: PathBuf,
    pub lengths: Vec<u32>,
    pub attempts: Option<u32>,
    pub hash: HashMode,
    pub include_special: bool,
    pub custom: String,
    /// Free-form option string, split on shell-word boundaries.
    pub extra_options: String,
}

impl ProbeSelection {
    pub fn new(binary_path: impl Into<PathBuf>) -> Self {
        Self {
            binary_path: binary_path.into(),
            ..Self::default()
        }
    }
}
