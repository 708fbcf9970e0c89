use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::{RampError, RampResult};

/// Environment variable to override the path to the `hey` binary.
pub const HEY_PATH_ENV: &str = "THROUGHPUTRAMP_HEY_PATH";

/// Resolve the load generator executable.
///
/// A bare program name such as the default "hey" is looked up in the user's `PATH`. Anything with
/// a directory component is used as given, as long as it exists.
pub fn resolve_hey_path(path: &str) -> RampResult<PathBuf> {
    resolve_in(path, std::env::var_os("PATH"))
}

fn resolve_in(path: &str, search_path: Option<OsString>) -> RampResult<PathBuf> {
    let candidate = Path::new(path);
    let is_bare_name = candidate
        .parent()
        .map_or(true, |parent| parent.as_os_str().is_empty());

    if is_bare_name {
        log::debug!("'{path}' is not a path so looking in user's 'PATH'");
        return which::which_in(path, search_path, ".").map_err(|source| {
            RampError::LoadGeneratorNotFound {
                name: path.to_string(),
                source,
            }
        });
    }

    if !candidate.exists() {
        return Err(RampError::LoadGeneratorMissing {
            path: candidate.to_path_buf(),
        });
    }

    Ok(candidate.to_path_buf())
}
