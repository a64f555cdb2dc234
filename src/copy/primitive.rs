use std::fs::{self, File};
use std::path::Path;

use crate::error::{Error, Result};

/// Duplicates file contents. Returns the number of bytes written.
pub trait ByteCopier {
    fn copy(&self, src: &Path, dst: &Path) -> Result<u64>;
}

/// Copies through the filesystem, leaving the copy writable so tags can be
/// applied even when the source is read-only.
#[derive(Debug, Clone, Copy)]
pub struct FsCopier {
    pub preserve_mtime: bool,
}

impl FsCopier {
    pub fn new(preserve_mtime: bool) -> Self {
        Self { preserve_mtime }
    }
}

fn make_writable(path: &Path) -> Result<()> {
    let meta = fs::metadata(path).map_err(|e| Error::io("stat copy", path, e))?;
    let mut perms = meta.permissions();
    if !perms.readonly() {
        return Ok(());
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        perms.set_mode(perms.mode() | 0o200);
    }
    #[cfg(not(unix))]
    #[allow(clippy::permissions_set_readonly_false)]
    perms.set_readonly(false);
    fs::set_permissions(path, perms).map_err(|e| Error::io("make copy writable", path, e))
}

impl ByteCopier for FsCopier {
    fn copy(&self, src: &Path, dst: &Path) -> Result<u64> {
        let op = format!("copy \"{}\" to", src.display());
        let bytes = fs::copy(src, dst).map_err(|e| Error::io(op, dst, e))?;
        make_writable(dst)?;

        if self.preserve_mtime {
            let mtime = fs::metadata(src)
                .and_then(|m| m.modified())
                .map_err(|e| Error::io("read modification time", src, e))?;
            File::options()
                .write(true)
                .open(dst)
                .and_then(|f| f.set_modified(mtime))
                .map_err(|e| Error::io("set modification time", dst, e))?;
        }
        Ok(bytes)
    }
}
