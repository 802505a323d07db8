//! Error type records and the ancestry query.

use std::fmt;

/// A statically defined failure classification.
///
/// Types form a single-rooted hierarchy. The root is the one type whose
/// parent is itself, which is expressed here as `parent: None`.
pub struct ErrorType {
    code: i32,
    name: &'static str,
    fatal: bool,
    parent: Option<&'static ErrorType>,
}

impl ErrorType {
    /// Declare a type below `parent`.
    pub const fn new(
        code: i32,
        name: &'static str,
        fatal: bool,
        parent: &'static ErrorType,
    ) -> Self {
        Self {
            code,
            name,
            fatal,
            parent: Some(parent),
        }
    }

    /// Declare a hierarchy root (its parent is itself).
    pub const fn root(code: i32, name: &'static str) -> Self {
        Self {
            code,
            name,
            fatal: false,
            parent: None,
        }
    }

    /// Numeric code, also used as the process exit status.
    pub fn code(&self) -> i32 {
        self.code
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_fatal(&self) -> bool {
        self.fatal
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// The declared parent. The root returns itself.
    pub fn parent(&'static self) -> &'static ErrorType {
        self.parent.unwrap_or(self)
    }

    /// True when `self` is `ancestor` or extends it.
    pub fn is_a(&'static self, ancestor: &ErrorType) -> bool {
        std::ptr::eq(self, ancestor) || extends(self, ancestor)
    }
}

/// Does `candidate` extend `ancestor`?
///
/// The walk starts at the candidate's parent, so a type never extends
/// itself, except the root, whose parent is itself.
pub fn extends(candidate: &'static ErrorType, ancestor: &ErrorType) -> bool {
    let mut scan = candidate;

    loop {
        let parent = scan.parent();

        if std::ptr::eq(parent, ancestor) {
            return true;
        }

        if std::ptr::eq(parent, scan) {
            return false;
        }

        scan = parent;
    }
}

// Types are identified by address: every type is a distinct static.
impl PartialEq for ErrorType {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl Eq for ErrorType {}

impl fmt::Debug for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorType")
            .field("code", &self.code)
            .field("name", &self.name)
            .field("fatal", &self.fatal)
            .field("parent", &self.parent.map(|p| p.name))
            .finish()
    }
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
