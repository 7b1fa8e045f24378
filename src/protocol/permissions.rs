use serde::{Deserialize, Serialize};

/// Unix mode bits sent with a permission change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permissions(u32);

bitflags! {
    impl Permissions: u32 {
        const SETUID = 0o4000;
        const SETGID = 0o2000;
        const STICKY = 0o1000;
        const OWNER_READ = 0o400;
        const OWNER_WRITE = 0o200;
        const OWNER_EXEC = 0o100;
        const GROUP_READ = 0o040;
        const GROUP_WRITE = 0o020;
        const GROUP_EXEC = 0o010;
        const OTHER_READ = 0o004;
        const OTHER_WRITE = 0o002;
        const OTHER_EXEC = 0o001;
    }
}

impl Permissions {
    /// `0644`, applied to uploaded files
    pub const FILE: Self = Self(0o644);
    /// `0755`, applied to directories created by a tree upload
    pub const DIRECTORY: Self = Self(0o755);
    /// `0777`, applied to directories created by a tree copy
    pub const OPEN: Self = Self(0o777);

    /// Builds the set from an octal mode, ignoring file-type bits.
    #[must_use]
    pub const fn from_mode(mode: u32) -> Self {
        Self::from_bits_truncate(mode)
    }

    /// Octal rendering as used by `SITE CHMOD`, e.g. `755`.
    #[must_use]
    pub fn to_octal(self) -> String {
        format!("{:o}", self.bits())
    }
}

impl Default for Permissions {
    fn default() -> Self {
        Self::FILE
    }
}
