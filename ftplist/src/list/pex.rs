use std::fmt;
use std::str::FromStr;

use super::{ParseError, ParseResult};
use crate::regex::LS_MODE_RE;

/// This enum is used to query about posix permissions on a file
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum PosixPexQuery {
    Owner,
    Group,
    Others,
}

/// Describes the permissions on POSIX system.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash)]
pub struct PosixPex {
    read: bool,
    write: bool,
    execute: bool,
}

impl PosixPex {
    /// Returns whether read permission is true
    pub fn can_read(&self) -> bool {
        self.read
    }

    /// Returns whether write permission is true
    pub fn can_write(&self) -> bool {
        self.write
    }

    /// Returns whether execute permission is true
    pub fn can_execute(&self) -> bool {
        self.execute
    }

    /// Returns the octal digit for these permissions
    pub fn bits(&self) -> u8 {
        (u8::from(self.read) << 2) | (u8::from(self.write) << 1) | u8::from(self.execute)
    }

    /// Decode a `rwx` triplet
    fn from_triplet(triplet: &[u8]) -> ParseResult<Self> {
        let &[r, w, x] = triplet else {
            return Err(ParseError::UnsupportedLine);
        };
        let read = match r {
            b'r' => true,
            b'-' => false,
            _ => return Err(ParseError::UnsupportedLine),
        };
        let write = match w {
            b'w' => true,
            b'-' => false,
            _ => return Err(ParseError::UnsupportedLine),
        };
        // setuid, setgid and sticky bits are not tracked, they just mean "executable" here
        let execute = match x {
            b'x' | b's' | b'S' | b't' | b'T' => true,
            b'-' => false,
            _ => return Err(ParseError::UnsupportedLine),
        };
        Ok(Self {
            read,
            write,
            execute,
        })
    }

    fn fmt_triplet(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            if self.read { 'r' } else { '-' },
            if self.write { 'w' } else { '-' },
            if self.execute { 'x' } else { '-' }
        )
    }
}

/// The item-type bit of a [`Mode`]
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash)]
pub enum ModeType {
    /// Regular file, or anything which is neither a directory nor a symlink (pipes, sockets, devices, doors)
    #[default]
    Regular,
    Directory,
    Symlink,
}

impl ModeType {
    /// Map the leading character of a `ls -l` mode token
    fn from_type_char(c: char) -> ParseResult<Self> {
        match c {
            'd' => Ok(Self::Directory),
            'l' => Ok(Self::Symlink),
            '-' | 'p' | 's' | 'b' | 'c' | 'D' => Ok(Self::Regular),
            _ => Err(ParseError::UnknownEntryType),
        }
    }

    /// `st_mode` file type bits
    fn bits(&self) -> u32 {
        match self {
            Self::Regular => 0o100000,
            Self::Directory => 0o040000,
            Self::Symlink => 0o120000,
        }
    }
}

/// Unix-like mode of an entry: the item type plus read/write/execute bits for owner, group and others.
///
/// Parsed from a `ls -l` mode token such as `drwxr-xr-x`; an optional trailing ACL marker (`+`) is ignored.
///
/// ```rust
/// use ftplist::list::{Mode, PosixPexQuery};
///
/// let mode: Mode = "-rwxrw-r--+".parse().unwrap();
/// assert_eq!(mode.bits() & 0o777, 0o764);
/// assert!(mode.pex(PosixPexQuery::Group).can_write());
/// assert_eq!(mode.to_string(), "-rwxrw-r--");
/// ```
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Mode {
    mode_type: ModeType,
    owner: PosixPex,
    group: PosixPex,
    others: PosixPex,
}

impl Mode {
    /// A mode with the given type and no permission bits set
    pub fn empty(mode_type: ModeType) -> Self {
        Self {
            mode_type,
            ..Default::default()
        }
    }

    /// Returns the item type bit
    pub fn mode_type(&self) -> ModeType {
        self.mode_type
    }

    /// Returns the permissions for `who`
    pub fn pex(&self, who: PosixPexQuery) -> PosixPex {
        match who {
            PosixPexQuery::Owner => self.owner,
            PosixPexQuery::Group => self.group,
            PosixPexQuery::Others => self.others,
        }
    }

    /// Returns the mode as `st_mode` bits (file type and permissions)
    pub fn bits(&self) -> u32 {
        self.mode_type.bits()
            | (u32::from(self.owner.bits()) << 6)
            | (u32::from(self.group.bits()) << 3)
            | u32::from(self.others.bits())
    }

    /// Force the type bit, keeping the permissions
    pub(crate) fn with_type(self, mode_type: ModeType) -> Self {
        Self { mode_type, ..self }
    }
}

impl FromStr for Mode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = LS_MODE_RE.captures(s).ok_or(ParseError::UnsupportedLine)?;
        let type_char = caps[1].chars().next().ok_or(ParseError::UnsupportedLine)?;
        let mode_type = ModeType::from_type_char(type_char)?;
        let pex = caps[2].as_bytes();
        Ok(Self {
            mode_type,
            owner: PosixPex::from_triplet(&pex[0..3])?,
            group: PosixPex::from_triplet(&pex[3..6])?,
            others: PosixPex::from_triplet(&pex[6..9])?,
        })
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let type_char = match self.mode_type {
            ModeType::Regular => '-',
            ModeType::Directory => 'd',
            ModeType::Symlink => 'l',
        };
        write!(f, "{type_char}")?;
        self.owner.fmt_triplet(f)?;
        self.group.fmt_triplet(f)?;
        self.others.fmt_triplet(f)
    }
}
