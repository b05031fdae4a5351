//! Reads the cluster's on-disk state back into its settings.

use super::BoxError;
use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use postgresql_embedded::Settings;
use std::io::ErrorKind;
use std::path::Path;

/// Line of `postmaster.pid` that holds the listening port.
const PID_FILE_PORT_LINE: usize = 3;

/// Opens the directory holding `path` and returns it with the file name.
fn open_parent(path: &Path) -> Result<(Dir, String), BoxError> {
    let utf8 = Utf8Path::from_path(path).ok_or_else(|| {
        Box::new(std::io::Error::new(
            ErrorKind::InvalidData,
            format!("path is not valid UTF-8: {}", path.display()),
        )) as BoxError
    })?;
    let file_name = utf8
        .file_name()
        .ok_or_else(|| Box::new(std::io::Error::other("path has no file name")) as BoxError)?;
    let parent = utf8.parent().unwrap_or_else(|| Utf8Path::new("."));
    let dir = Dir::open_ambient_dir(parent, ambient_authority())
        .map_err(|err| Box::new(err) as BoxError)?;
    Ok((dir, file_name.to_owned()))
}

/// Reads a file, treating a missing file as `None`.
fn read_optional(path: &Path) -> Result<Option<String>, BoxError> {
    let (dir, file_name) = open_parent(path)?;
    match dir.read_to_string(&file_name) {
        Ok(contents) => Ok(Some(contents)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(Box::new(err) as BoxError),
    }
}

/// Picks up a password the bootstrap wrote to disk.
pub(super) fn sync_password_from_file(settings: &mut Settings) -> Result<(), BoxError> {
    let Some(contents) = read_optional(&settings.password_file)? else {
        return Ok(());
    };
    let password = contents.trim_end();
    if !password.is_empty() {
        password.clone_into(&mut settings.password);
    }
    Ok(())
}

/// Picks up the port the running server actually bound.
pub(super) fn sync_port_from_pid(settings: &mut Settings) -> Result<(), BoxError> {
    let Some(contents) = read_optional(&settings.data_dir.join("postmaster.pid"))? else {
        return Ok(());
    };
    let port = contents
        .lines()
        .nth(PID_FILE_PORT_LINE)
        .and_then(|line| line.trim().parse::<u16>().ok());
    if let Some(found) = port {
        settings.port = found;
    }
    Ok(())
}
