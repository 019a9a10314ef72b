//! Single-subtree move primitive.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::MoveError;

/// Moves a file or directory subtree from `src` to `dst`.
///
/// The destination parent is created if missing. An already-present
/// destination fails closed, no merging and no overwriting. Renames that
/// cross a filesystem boundary fall back to copy-then-delete (storage and
/// donor roots commonly straddle mounts).
pub fn move_subtree(src: &Path, dst: &Path) -> Result<(), MoveError> {
    if !src.exists() {
        return Err(MoveError::SourceMissing(src.to_path_buf()));
    }
    if dst.exists() {
        return Err(MoveError::DestinationExists(dst.to_path_buf()));
    }
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)?;
    }

    match fs::rename(src, dst) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            copy_all(src, dst)?;
            remove_all(src)?;
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn copy_all(src: &Path, dst: &Path) -> io::Result<()> {
    if src.is_dir() {
        fs::create_dir_all(dst)?;
        for entry in fs::read_dir(src)? {
            let entry = entry?;
            copy_all(&entry.path(), &dst.join(entry.file_name()))?;
        }
    } else {
        fs::copy(src, dst)?;
    }
    Ok(())
}

fn remove_all(path: &Path) -> io::Result<()> {
    if path.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moves_directory_tree() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("src");
        fs::create_dir_all(src.join("nested")).unwrap();
        fs::write(src.join("a.bin"), b"aaa").unwrap();
        fs::write(src.join("nested").join("b.bin"), b"bbb").unwrap();

        let dst = tmp.path().join("out").join("dst");
        move_subtree(&src, &dst).unwrap();

        assert!(!src.exists());
        assert_eq!(fs::read(dst.join("a.bin")).unwrap(), b"aaa");
        assert_eq!(fs::read(dst.join("nested").join("b.bin")).unwrap(), b"bbb");
    }

    #[test]
    fn moves_single_file() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("RomFs.bin");
        fs::write(&src, b"image").unwrap();

        let dst = tmp.path().join("titles").join("X").join("RomFs.bin");
        move_subtree(&src, &dst).unwrap();

        assert!(!src.exists());
        assert_eq!(fs::read(dst).unwrap(), b"image");
    }

    #[test]
    fn missing_source_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let err = move_subtree(&tmp.path().join("nope"), &tmp.path().join("dst")).unwrap_err();
        assert!(matches!(err, MoveError::SourceMissing(_)));
    }

    #[test]
    fn existing_destination_fails_closed() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("src");
        fs::create_dir(&src).unwrap();
        fs::write(src.join("keep"), b"src data").unwrap();

        let dst = tmp.path().join("dst");
        fs::create_dir(&dst).unwrap();
        fs::write(dst.join("other"), b"dst data").unwrap();

        let err = move_subtree(&src, &dst).unwrap_err();
        assert!(matches!(err, MoveError::DestinationExists(_)));

        // Neither side touched.
        assert_eq!(fs::read(src.join("keep")).unwrap(), b"src data");
        assert_eq!(fs::read(dst.join("other")).unwrap(), b"dst data");
    }
}
