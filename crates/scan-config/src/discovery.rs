//! Locating `scanfmt.yaml`.

use std::path::{Path, PathBuf};

/// File name searched for.
pub const CONFIG_FILE_NAME: &str = "scanfmt.yaml";

/// Environment variable naming the config file directly.
pub const CONFIG_FILE_ENV: &str = "SCANFMT_CONFIG";

/// Find the config file for a run started in `start`.
///
/// `SCANFMT_CONFIG` wins when it names an existing file. Otherwise walks up
/// from `start` and returns the first `scanfmt.yaml` found, or `None` at the
/// filesystem root.
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    if let Ok(env_path) = std::env::var(CONFIG_FILE_ENV) {
        let env_path = PathBuf::from(env_path);
        if env_path.is_file() {
            return Some(env_path);
        }
    }

    let start = start.canonicalize().ok()?;
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_finds_file_in_parent() {
        Jail::expect_with(|jail| {
            jail.create_file(CONFIG_FILE_NAME, "")?;
            let nested = jail.directory().join("a").join("b");
            std::fs::create_dir_all(&nested).map_err(|e| e.to_string())?;

            let found = find_config_file(&nested).expect("config file");
            assert_eq!(
                found.canonicalize().map_err(|e| e.to_string())?,
                jail.directory()
                    .join(CONFIG_FILE_NAME)
                    .canonicalize()
                    .map_err(|e| e.to_string())?
            );
            Ok(())
        });
    }

    #[test]
    fn test_env_var_wins() {
        Jail::expect_with(|jail| {
            jail.create_file(CONFIG_FILE_NAME, "")?;
            jail.create_file("other.yaml", "")?;
            let other = jail.directory().join("other.yaml");
            jail.set_env(CONFIG_FILE_ENV, other.display());

            assert_eq!(find_config_file(jail.directory()), Some(other));
            Ok(())
        });
    }

    #[test]
    fn test_missing_start_dir() {
        Jail::expect_with(|_jail| {
            assert_eq!(find_config_file(Path::new("/nonexistent/scanfmt/dir")), None);
            Ok(())
        });
    }
}
