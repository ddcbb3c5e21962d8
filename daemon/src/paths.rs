/// Location of the optional procmon config file.
///
/// Resolution order:
///   - `$PROCMON_CONFIG`                        explicit override
///   - `$XDG_CONFIG_HOME/procmon/config.toml`
///   - `$HOME/.config/procmon/config.toml`
use std::ffi::OsString;
use std::path::PathBuf;

pub const CONFIG_ENV_VAR: &str = "PROCMON_CONFIG";
const APP_DIR_NAME: &str = "procmon";
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Returns the config file path for this environment, or `None` when no
/// candidate directory is known.
pub fn config_file_path() -> Option<PathBuf> {
    resolve(
        std::env::var_os(CONFIG_ENV_VAR),
        std::env::var_os("XDG_CONFIG_HOME"),
        std::env::var_os("HOME"),
    )
}

fn resolve(
    explicit: Option<OsString>,
    xdg_config_home: Option<OsString>,
    home: Option<OsString>,
) -> Option<PathBuf> {
    let non_empty = |v: Option<OsString>| v.filter(|s| !s.is_empty()).map(PathBuf::from);

    if let Some(path) = non_empty(explicit) {
        return Some(path);
    }
    let config_dir = non_empty(xdg_config_home).or_else(|| non_empty(home).map(|h| h.join(".config")))?;
    Some(config_dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn os(s: &str) -> Option<OsString> {
        Some(OsString::from(s))
    }

    #[test]
    fn explicit_override_wins() {
        let path = resolve(os("/etc/procmon.toml"), os("/xdg"), os("/home/u"));
        assert_eq!(path, Some(PathBuf::from("/etc/procmon.toml")));
    }

    #[test]
    fn xdg_config_home_is_used_next() {
        let path = resolve(None, os("/xdg"), os("/home/u"));
        assert_eq!(path, Some(PathBuf::from("/xdg/procmon/config.toml")));
    }

    #[test]
    fn home_dot_config_is_the_fallback() {
        let path = resolve(None, None, os("/home/u"));
        assert_eq!(path, Some(PathBuf::from("/home/u/.config/procmon/config.toml")));
    }

    #[test]
    fn empty_variables_are_ignored() {
        let path = resolve(os(""), os(""), os("/home/u"));
        assert_eq!(path, Some(PathBuf::from("/home/u/.config/procmon/config.toml")));
    }

    #[test]
    fn nothing_set_yields_none() {
        assert_eq!(resolve(None, None, None), None);
    }

    #[test]
    fn config_file_has_expected_name() {
        let path = resolve(None, os("/xdg"), None).unwrap();
        assert_eq!(path.file_name().unwrap(), CONFIG_FILE_NAME);
    }
}
