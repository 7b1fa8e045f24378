/// System type announced by Windows servers
pub const SYSTEM_TYPE_WINDOWS: &str = "Windows_NT";

/// Grammar of the lines in a raw directory listing.
///
/// Chosen once per query from the server's system type and applied to every
/// line of that query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// `PERMS LINKS OWNER GROUP SIZE MONTH DAY TIME-OR-YEAR NAME`
    Unix,
    /// `MM-DD-YY HH:MM(AM|PM) (SIZE|<DIR>) NAME`
    Windows,
}

impl Dialect {
    /// Maps a `SYST` answer to a dialect. Only `Windows_NT` selects the
    /// Windows grammar, everything else is read as Unix.
    #[must_use]
    pub fn from_system_type(system_type: &str) -> Self {
        match system_type.split_whitespace().next() {
            Some(SYSTEM_TYPE_WINDOWS) => Self::Windows,
            _ => Self::Unix,
        }
    }

    /// Some Windows servers reject `SITE CHMOD`, so permissions are only
    /// applied under the Unix dialect.
    #[must_use]
    pub const fn supports_permissions(self) -> bool {
        matches!(self, Self::Unix)
    }
}
