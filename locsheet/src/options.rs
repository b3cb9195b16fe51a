//! Options controlling how sheets are read and written and how trees are rebuilt.

use crate::formats::FormatType;

/// What to do with a data row that has no usable key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowPolicy {
    /// Drop the row, log a warning and keep reading.
    #[default]
    Skip,
    /// Abort the whole read with [`crate::Error::MalformedRow`].
    FailFast,
}

/// What to do when a flat key would turn a value into a group or a group into a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictPolicy {
    /// The later key replaces whatever occupied the slot.
    #[default]
    LastWriteWins,
    /// Abort with [`crate::Error::StructuralConflict`].
    Error,
}

/// Read behavior options for sheet-loading APIs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReadOptions {
    pub row_policy: RowPolicy,
}

impl ReadOptions {
    /// Creates default read options.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_row_policy(mut self, row_policy: RowPolicy) -> Self {
        self.row_policy = row_policy;
        self
    }
}

/// Write behavior options for sheet-writing APIs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WriteOptions {
    /// Prefix the output with a UTF-8 byte order mark.
    pub bom: bool,
}

impl WriteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bom(mut self, bom: bool) -> Self {
        self.bom = bom;
        self
    }
}

/// Nesting levels materialized by default when rebuilding a tree from flat keys.
pub const DEFAULT_MAX_DEPTH: usize = 2;

/// Options for [`crate::flatten::unflatten_with`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnflattenOptions {
    /// Number of group levels created below the root. Segments past this depth are
    /// joined back with dots into the leaf name. `0` keeps every key flat.
    pub max_depth: usize,
    pub on_conflict: ConflictPolicy,
}

impl Default for UnflattenOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            on_conflict: ConflictPolicy::default(),
        }
    }
}

impl UnflattenOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_conflict_policy(mut self, on_conflict: ConflictPolicy) -> Self {
        self.on_conflict = on_conflict;
        self
    }
}

/// Everything the import pipeline needs besides the file paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOptions {
    pub read: ReadOptions,
    pub write: WriteOptions,
    pub unflatten: UnflattenOptions,
    /// Format of the rebuilt per-locale files.
    pub tree_format: FormatType,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            read: ReadOptions::default(),
            write: WriteOptions::default(),
            unflatten: UnflattenOptions::default(),
            tree_format: FormatType::JsModule,
        }
    }
}

impl ImportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_read_options(mut self, read: ReadOptions) -> Self {
        self.read = read;
        self
    }

    pub fn with_write_options(mut self, write: WriteOptions) -> Self {
        self.write = write;
        self
    }

    pub fn with_unflatten_options(mut self, unflatten: UnflattenOptions) -> Self {
        self.unflatten = unflatten;
        self
    }

    pub fn with_tree_format(mut self, tree_format: FormatType) -> Self {
        self.tree_format = tree_format;
        self
    }
}
