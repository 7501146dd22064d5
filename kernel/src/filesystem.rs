use std::collections::HashMap;

/// A loaded program: an ordered sequence of opaque instruction tokens.
/// One-operand instructions occupy two consecutive entries (mnemonic,
/// then operand); zero-operand ones occupy one.
pub type Program = Vec<String>;

/// Read-mostly store of programs, addressed by path. Entries are
/// immutable once written: `write` replaces wholesale, there is no
/// partial-update or delete, matching the loader/file-system boundary
/// this simulator models (no persistence, no directory structure).
#[derive(Default)]
pub struct FileSystem {
    entries: HashMap<String, Program>,
}

impl FileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write(&mut self, path: impl Into<String>, program: Program) {
        self.entries.insert(path.into(), program);
    }

    pub fn read(&self, path: &str) -> Option<Program> {
        self.entries.get(path).cloned()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }
}
