use crate::error::io::IoError;
use crate::error::io::IoErrorKind::{
    CreateDirectoryFailed, CreateFileFailed, NoParent, ReadFileFailed, ReadPermissionsFailed,
    RenameFailed, WriteFileFailed, WritePermissionsFailed,
};

use std::fs::{File, Permissions};
use std::path::{Path, PathBuf};

pub fn create_dir_all(path: &Path) -> Result<(), IoError> {
    std::fs::create_dir_all(path)
        .map_err(|err| IoError::new(CreateDirectoryFailed(path.to_path_buf(), err)))
}

pub fn create_file(path: &Path) -> Result<File, IoError> {
    File::create(path).map_err(|err| IoError::new(CreateFileFailed(path.to_path_buf(), err)))
}

pub fn parent(path: &Path) -> Result<PathBuf, IoError> {
    match path.parent() {
        None => Err(IoError::new(NoParent(path.to_path_buf()))),
        Some(parent) => Ok(parent.to_path_buf()),
    }
}

pub fn read(path: &Path) -> Result<Vec<u8>, IoError> {
    std::fs::read(path).map_err(|err| IoError::new(ReadFileFailed(path.to_path_buf(), err)))
}

pub fn rename(from: &Path, to: &Path) -> Result<(), IoError> {
    std::fs::rename(from, to).map_err(|err| {
        IoError::new(RenameFailed(
            Box::new(from.to_path_buf()),
            Box::new(to.to_path_buf()),
            err,
        ))
    })
}

pub fn read_permissions(path: &Path) -> Result<Permissions, IoError> {
    std::fs::metadata(path)
        .map_err(|err| IoError::new(ReadPermissionsFailed(path.to_path_buf(), err)))
        .map(|x| x.permissions())
}

pub fn set_permissions(path: &Path, permissions: Permissions) -> Result<(), IoError> {
    std::fs::set_permissions(path, permissions)
        .map_err(|err| IoError::new(WritePermissionsFailed(path.to_path_buf(), err)))
}

pub fn write<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> Result<(), IoError> {
    std::fs::write(path.as_ref(), contents)
        .map_err(|err| IoError::new(WriteFileFailed(path.as_ref().to_path_buf(), err)))
}

/// Restricts a file to its owner (read/write on *nix).
pub fn set_owner_only(path: &Path) -> Result<(), IoError> {
    #[allow(unused_mut)]
    let mut permissions = read_permissions(path)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        permissions.set_mode(0o600);
    }
    set_permissions(path, permissions)
}
