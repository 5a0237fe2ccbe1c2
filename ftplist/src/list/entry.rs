use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};

use super::{FileType, Mode, PosixPexQuery};

/// Describes a file entry on the remote system.
/// This data type is returned after parsing a line of the `LIST` or `MLSD` output.
///
/// Each entry comes with its name, type (file, directory, symlink), size, modification time
/// and POSIX permissions. Owner and group are reported when the line exposes them.
///
/// The modification time is expressed in the time zone `Tz` provided to the [`super::ListParser`].
///
/// # Invariants
///
/// - the name is never empty and never contains the ` -> target` suffix of symlinks
/// - the size is `0` for anything which is not a regular file
/// - a symlink target is available if and only if the entry is a symlink
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Entry<Tz: TimeZone = Utc> {
    /// File name
    pub(crate) name: String,
    /// File type describes whether it is a directory, a file or a symlink
    pub(crate) file_type: FileType,
    /// POSIX mode
    pub(crate) mode: Mode,
    /// File size in bytes
    pub(crate) size: u64,
    /// Last time the file was modified
    pub(crate) modified: DateTime<Tz>,
    /// Owner user, when reported
    pub(crate) owner: Option<String>,
    /// Owner group, when reported
    pub(crate) group: Option<String>,
}

impl<Tz: TimeZone> Entry<Tz> {
    /// Get file name
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Get whether file is a directory
    pub fn is_directory(&self) -> bool {
        self.file_type.is_directory()
    }

    /// Get whether file is a file
    pub fn is_file(&self) -> bool {
        self.file_type.is_file()
    }

    /// Get whether file is a symlink
    pub fn is_symlink(&self) -> bool {
        self.file_type.is_symlink()
    }

    /// Returns, if available, the file the symlink is pointing to.
    ///
    /// The path is empty when the server lists a symlink (`l` type) without the ` -> target` part.
    pub fn symlink(&self) -> Option<&Path> {
        self.file_type.symlink()
    }

    /// Returns a reference to the file type
    pub fn file_type(&self) -> &FileType {
        &self.file_type
    }

    /// Returns the POSIX mode
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returned file size in bytes
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Returns the last time the file was modified
    pub fn modified(&self) -> &DateTime<Tz> {
        &self.modified
    }

    /// Returns when available the owner user of the file
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    /// Returns when available the owner group of the file
    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    /// Returns whether `who` can read file
    pub fn can_read(&self, who: PosixPexQuery) -> bool {
        self.mode.pex(who).can_read()
    }

    /// Returns whether `who` can write file
    pub fn can_write(&self, who: PosixPexQuery) -> bool {
        self.mode.pex(who).can_write()
    }

    /// Returns whether `who` can execute file
    pub fn can_execute(&self, who: PosixPexQuery) -> bool {
        self.mode.pex(who).can_execute()
    }
}
