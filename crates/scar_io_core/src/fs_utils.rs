use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::ScarIoError;

pub fn join_paths<I, P>(segments: I) -> PathBuf
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    segments
        .into_iter()
        .fold(PathBuf::new(), |joined, segment| joined.join(segment))
}

/// Lists every file below `dir`, in traversal order.
///
/// Symlinks that resolve to a file are reported by their link path.
/// Directories are not reported and symlinked directories are not descended.
pub fn list_files_recursive(dir: &Path) -> Result<Vec<PathBuf>, ScarIoError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).follow_links(false) {
        let entry = entry.map_err(|error| {
            let path = error
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| dir.to_path_buf());
            ScarIoError::io(path, error.into())
        })?;

        let file_type = entry.file_type();
        let is_file = file_type.is_file()
            || (file_type.is_symlink()
                && fs::metadata(entry.path()).is_ok_and(|metadata| metadata.is_file()));
        if is_file {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Writes `content` to `path`, truncating any previous file, then adds the
/// execute bits for owner, group and others.
///
/// The process umask only shapes the mode of a newly created file; the
/// execute bits are added to whatever mode the file ends up with.
pub fn write_executable_script(path: &Path, content: &str) -> Result<(), ScarIoError> {
    fs::write(path, content).map_err(|source| ScarIoError::io(path, source))?;
    mark_executable(path)
}

#[cfg(unix)]
fn mark_executable(path: &Path) -> Result<(), ScarIoError> {
    use std::os::unix::fs::PermissionsExt;

    let mut permissions = fs::metadata(path)
        .map_err(|source| ScarIoError::io(path, source))?
        .permissions();
    permissions.set_mode(permissions.mode() | 0o111);
    fs::set_permissions(path, permissions).map_err(|source| ScarIoError::io(path, source))
}

#[cfg(not(unix))]
fn mark_executable(_path: &Path) -> Result<(), ScarIoError> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_segments_in_order() {
        assert_eq!(
            join_paths(["/tmp", "input", "script.sh"]),
            PathBuf::from("/tmp/input/script.sh")
        );
    }

    #[test]
    fn lists_nested_files_but_not_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::create_dir_all(dir.path().join("a/b")).unwrap();
        fs::create_dir_all(dir.path().join("empty")).unwrap();
        fs::write(dir.path().join("top.txt"), b"top").unwrap();
        fs::write(dir.path().join("a/mid.txt"), b"mid").unwrap();
        fs::write(dir.path().join("a/b/deep.txt"), b"deep").unwrap();

        let mut files = list_files_recursive(dir.path()).expect("listing should succeed");
        files.sort();

        assert_eq!(
            files,
            vec![
                dir.path().join("a/b/deep.txt"),
                dir.path().join("a/mid.txt"),
                dir.path().join("top.txt"),
            ]
        );
    }

    #[test]
    fn listing_missing_directory_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let error = list_files_recursive(&dir.path().join("absent"))
            .expect_err("missing directory should fail");
        assert!(matches!(error, ScarIoError::Io { .. }));
    }

    #[test]
    fn writes_script_and_truncates_previous_content() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("script.sh");
        fs::write(&path, "a much longer previous script body").unwrap();

        write_executable_script(&path, "echo hi").expect("write should succeed");

        assert_eq!(fs::read_to_string(&path).unwrap(), "echo hi");
    }

    #[cfg(unix)]
    #[test]
    fn lists_symlinked_files_but_not_symlinked_directories() {
        use std::os::unix::fs::symlink;

        let outside = tempfile::tempdir().expect("tempdir");
        fs::write(outside.path().join("target.txt"), b"target").unwrap();
        fs::create_dir_all(outside.path().join("linked_dir")).unwrap();
        fs::write(outside.path().join("linked_dir/hidden.txt"), b"hidden").unwrap();

        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("plain.txt"), b"plain").unwrap();
        symlink(outside.path().join("target.txt"), dir.path().join("link.txt")).unwrap();
        symlink(outside.path().join("linked_dir"), dir.path().join("dir_link")).unwrap();
        symlink(outside.path().join("missing.txt"), dir.path().join("dangling.txt")).unwrap();

        let mut files = list_files_recursive(dir.path()).expect("listing should succeed");
        files.sort();

        assert_eq!(
            files,
            vec![dir.path().join("link.txt"), dir.path().join("plain.txt")]
        );
    }

    #[cfg(unix)]
    #[test]
    fn execute_bits_are_added_to_existing_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("script.sh");
        fs::write(&path, "old").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o600)).unwrap();

        write_executable_script(&path, "echo hi").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o711);
    }

    #[cfg(unix)]
    #[test]
    fn script_is_executable_by_everyone() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("script.sh");
        write_executable_script(&path, "echo hi").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o111, 0o111);
    }
}
