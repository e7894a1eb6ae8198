use directories::{BaseDirs, ProjectDirs};
use std::path::{Path, PathBuf};

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn config_path() -> PathBuf {
        if let Some(pd) = ProjectDirs::from("", "", "keydrill") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("keydrill_config.json")
        }
    }
}

/// Replace a leading `~` with the user's home directory
pub fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match BaseDirs::new() {
            Some(dirs) => dirs.home_dir().join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaves_plain_paths_alone() {
        assert_eq!(
            expand_home(Path::new("/etc/alphabet.csv")),
            PathBuf::from("/etc/alphabet.csv")
        );
        assert_eq!(
            expand_home(Path::new("~user/file")),
            PathBuf::from("~user/file")
        );
    }

    #[test]
    fn expands_tilde_prefix() {
        let expanded = expand_home(Path::new("~/.talon/user"));
        if let Some(dirs) = BaseDirs::new() {
            assert_eq!(expanded, dirs.home_dir().join(".talon/user"));
        }
    }

    #[test]
    fn config_path_ends_in_json() {
        assert!(AppDirs::config_path().ends_with("config.json")
            || AppDirs::config_path().ends_with("keydrill_config.json"));
    }
}
