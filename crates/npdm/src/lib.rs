//! Binary NPDM manifest patching.
//!
//! The loader reads the title id out of `main.npdm`. To launch a game
//! under a donor's identity, the 8-byte id field inside the ACI0 section
//! is rewritten with the donor's id in its on-disk little-endian form.
//! The pristine manifest is copied to `<name>.bak` before the first edit
//! and never overwritten after that.

use std::fs;
use std::path::{Path, PathBuf};

use donorswap_types::TitleId;
use tracing::{debug, warn};

/// ASCII marker opening the ACI0 section.
const ACI0_MARKER: &[u8] = b"ACI0";
/// Title id field offset from the start of the marker.
const TITLE_ID_OFFSET: usize = 0x10;
/// Title id field width.
const TITLE_ID_LEN: usize = 0x8;

/// Errors produced while patching a manifest.
#[derive(Debug, thiserror::Error)]
pub enum NpdmError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file holds no usable ACI0 marker, or is too short to hold the
    /// id field behind one. Fatal to this patch attempt only.
    #[error("ACI0 marker not found in {0}")]
    MarkerNotFound(PathBuf),
}

/// Backup path for a manifest: `main.npdm` -> `main.npdm.bak`.
pub fn backup_path(npdm: &Path) -> PathBuf {
    let mut name = npdm.file_name().unwrap_or_default().to_os_string();
    name.push(".bak");
    npdm.with_file_name(name)
}

/// Rewrites the title id field in `npdm` with the donor's identity.
///
/// If no backup exists yet, the current manifest is copied to
/// [`backup_path`] first, so the backup always reflects the pristine
/// original. The backup copy is best-effort: a failure there is logged
/// and does not block the patch. Failures on the patch itself propagate.
pub fn patch(npdm: &Path, donor: &TitleId) -> Result<(), NpdmError> {
    let backup = backup_path(npdm);
    if !backup.exists() {
        if let Err(e) = fs::copy(npdm, &backup) {
            warn!(path = %npdm.display(), error = %e, "could not back up npdm");
        } else {
            debug!(path = %backup.display(), "backed up pristine npdm");
        }
    }

    let mut content = fs::read(npdm)?;
    let offset = find_title_id_field(&content)
        .ok_or_else(|| NpdmError::MarkerNotFound(npdm.to_path_buf()))?;

    content[offset..offset + TITLE_ID_LEN].copy_from_slice(&donor.le_bytes());
    fs::write(npdm, &content)?;

    debug!(path = %npdm.display(), donor = %donor, "patched npdm title id");
    Ok(())
}

/// Locates the title id field: 8 bytes starting 0x10 past the first ACI0
/// marker. None when the marker is absent or the field would run past the
/// end of the file.
fn find_title_id_field(content: &[u8]) -> Option<usize> {
    let marker = content
        .windows(ACI0_MARKER.len())
        .position(|w| w == ACI0_MARKER)?;
    let offset = marker + TITLE_ID_OFFSET;
    if offset + TITLE_ID_LEN > content.len() {
        return None;
    }
    Some(offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds a fake npdm with the ACI0 marker at `marker_at` and a
    /// recognizable original id in the field.
    fn fake_npdm(marker_at: usize, total_len: usize) -> Vec<u8> {
        let mut buf = vec![0xAAu8; total_len];
        buf[marker_at..marker_at + 4].copy_from_slice(ACI0_MARKER);
        let field = marker_at + TITLE_ID_OFFSET;
        buf[field..field + TITLE_ID_LEN].copy_from_slice(&[0x11; 8]);
        buf
    }

    #[test]
    fn patch_writes_reversed_octet_pairs() {
        let tmp = tempfile::tempdir().unwrap();
        let npdm = tmp.path().join("main.npdm");
        fs::write(&npdm, fake_npdm(0x40, 0x100)).unwrap();

        let donor = TitleId::parse("0100C6E00AF2C000").unwrap();
        patch(&npdm, &donor).unwrap();

        let patched = fs::read(&npdm).unwrap();
        assert_eq!(patched.len(), 0x100, "length must be preserved");
        assert_eq!(
            &patched[0x50..0x58],
            &[0x00, 0xC0, 0xF2, 0x0A, 0xE0, 0xC6, 0x00, 0x01]
        );
        // Bytes around the field untouched.
        assert_eq!(patched[0x4F], 0xAA);
        assert_eq!(patched[0x58], 0xAA);
    }

    #[test]
    fn backup_created_once_and_kept_pristine() {
        let tmp = tempfile::tempdir().unwrap();
        let npdm = tmp.path().join("main.npdm");
        let original = fake_npdm(0x20, 0x80);
        fs::write(&npdm, &original).unwrap();

        let first = TitleId::parse("010043500A17A000").unwrap();
        patch(&npdm, &first).unwrap();
        let bak = backup_path(&npdm);
        assert!(bak.exists());
        assert_eq!(fs::read(&bak).unwrap(), original);

        // Second patch with a different donor must not touch the backup.
        let second = TitleId::parse("0100DB7003828000").unwrap();
        patch(&npdm, &second).unwrap();
        assert_eq!(
            fs::read(&bak).unwrap(),
            original,
            "backup must stay pristine"
        );

        let patched = fs::read(&npdm).unwrap();
        assert_eq!(&patched[0x30..0x38], &second.le_bytes());
    }

    #[test]
    fn marker_missing_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let npdm = tmp.path().join("main.npdm");
        fs::write(&npdm, vec![0u8; 0x100]).unwrap();

        let donor = TitleId::parse("0100C6E00AF2C000").unwrap();
        let err = patch(&npdm, &donor).unwrap_err();
        assert!(matches!(err, NpdmError::MarkerNotFound(_)));
    }

    #[test]
    fn truncated_field_counts_as_marker_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let npdm = tmp.path().join("main.npdm");
        // Marker present but the file ends inside the id field.
        let mut buf = vec![0u8; 0x16];
        buf[0..4].copy_from_slice(ACI0_MARKER);
        fs::write(&npdm, buf).unwrap();

        let donor = TitleId::parse("0100C6E00AF2C000").unwrap();
        assert!(matches!(
            patch(&npdm, &donor).unwrap_err(),
            NpdmError::MarkerNotFound(_)
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let donor = TitleId::parse("0100C6E00AF2C000").unwrap();
        let err = patch(Path::new("/nonexistent/main.npdm"), &donor).unwrap_err();
        assert!(matches!(err, NpdmError::Io(_)));
    }

    #[test]
    fn backup_path_appends_suffix() {
        assert_eq!(
            backup_path(Path::new("/games/G/ExeFs/main.npdm")),
            PathBuf::from("/games/G/ExeFs/main.npdm.bak")
        );
    }
}
