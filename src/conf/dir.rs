//! Configuration directory discovery
//!
//! Provides:
//! - Listing config files by extension, in file name order
//! - Finding a network by name across a directory of `.conf`/`.conflist` files

use crate::conf::{NetworkConfigList, conf_from_bytes, conflist_from_bytes};
use crate::error::{Error, NotFoundCause, Result};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Document shape a config file was recognized as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfFormat {
    /// Plugin list
    List,
    /// Single plugin definition, promoted to a list
    Single,
}

impl fmt::Display for ConfFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfFormat::List => write!(f, "conflist"),
            ConfFormat::Single => write!(f, "conf"),
        }
    }
}

type ConfParser = fn(&[u8]) -> Result<NetworkConfigList>;

/// Parsers tried against every candidate file, in order
const CONF_PARSERS: &[(ConfFormat, ConfParser)] = &[
    (ConfFormat::List, conflist_from_bytes),
    (ConfFormat::Single, promoted_from_bytes),
];

fn promoted_from_bytes(bytes: &[u8]) -> Result<NetworkConfigList> {
    conf_from_bytes(bytes)?.promote()
}

/// Try each known format until one parses
///
/// The error lists every attempt's diagnostic.
pub fn parse_any(bytes: &[u8]) -> std::result::Result<(ConfFormat, NetworkConfigList), String> {
    let mut failures = Vec::new();
    for (format, parser) in CONF_PARSERS {
        match parser(bytes) {
            Ok(list) => return Ok((*format, list)),
            Err(e) => failures.push(format!("as {}: {}", format, e)),
        }
    }
    Err(failures.join("; "))
}

/// List files in `dir` whose extension is in `extensions`, sorted by name
///
/// Extensions match with or without a leading dot. Subdirectories are
/// skipped. A directory that does not exist yields no files.
pub fn conf_files<S: AsRef<str>>(dir: &Path, extensions: &[S]) -> Result<Vec<PathBuf>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_dir() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        if extensions
            .iter()
            .any(|wanted| wanted.as_ref().trim_start_matches('.') == ext)
        {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Find the network called `name` in `dir`
///
/// Files are visited in name order; each is read as a plugin list first and
/// as a single plugin second. Files that parse as neither are skipped. The
/// first network whose name matches wins, so a single-plugin match comes
/// back promoted.
pub fn load_conf<S: AsRef<str>>(dir: &Path, name: &str, extensions: &[S]) -> Result<NetworkConfigList> {
    if name.is_empty() {
        return Err(Error::InvalidArgument("network name is empty".into()));
    }

    let files = conf_files(dir, extensions)?;
    if files.is_empty() {
        return Err(not_found(dir, name, NotFoundCause::NoConfigFiles));
    }

    let mut failures = Vec::new();
    let mut parsed = 0;
    for path in files {
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                failures.push((path, e.to_string()));
                continue;
            }
        };

        match parse_any(&bytes) {
            Ok((format, list)) => {
                parsed += 1;
                if list.name() == name {
                    debug!("Found network {} in {} ({})", name, path.display(), format);
                    return Ok(list);
                }
            }
            Err(reason) => {
                warn!("Skipping {}: {}", path.display(), reason);
                failures.push((path, reason));
            }
        }
    }

    let cause = if parsed == 0 {
        NotFoundCause::AllUnparsable(failures)
    } else {
        NotFoundCause::NoMatch { parsed, failures }
    };
    Err(not_found(dir, name, cause))
}

fn not_found(dir: &Path, name: &str, cause: NotFoundCause) -> Error {
    Error::NotFound {
        name: name.to_string(),
        dir: dir.to_path_buf(),
        cause,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_CONF_EXTENSIONS;

    fn write(dir: &Path, file: &str, content: &str) {
        fs::write(dir.join(file), content).unwrap();
    }

    fn file_names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn test_conf_files_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "z.conflist", "{}");
        write(dir.path(), "y.txt", "{}");
        write(dir.path(), "x.conf", "{}");
        fs::create_dir(dir.path().join("sub.conf")).unwrap();

        let files = conf_files(dir.path(), &[".conf", ".conflist"]).unwrap();
        assert_eq!(file_names(&files), vec!["x.conf", "z.conflist"]);
    }

    #[test]
    fn test_conf_files_accepts_bare_extensions() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.json", "{}");
        write(dir.path(), "b", "{}");

        let files = conf_files(dir.path(), &["json"]).unwrap();
        assert_eq!(file_names(&files), vec!["a.json"]);
    }

    #[test]
    fn test_conf_files_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let files = conf_files(&dir.path().join("absent"), DEFAULT_CONF_EXTENSIONS).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_load_conf_by_name() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.conf", r#"{"cniVersion":"0.4.0","name":"foo","type":"bridge"}"#);
        write(
            dir.path(),
            "b.conflist",
            r#"{"cniVersion":"1.0.0","name":"bar","plugins":[{"type":"ptp"},{"type":"tuning"}]}"#,
        );

        let bar = load_conf(dir.path(), "bar", DEFAULT_CONF_EXTENSIONS).unwrap();
        assert_eq!(bar.name(), "bar");
        assert_eq!(bar.plugins().len(), 2);

        let foo = load_conf(dir.path(), "foo", DEFAULT_CONF_EXTENSIONS).unwrap();
        assert_eq!(foo.name(), "foo");
        assert_eq!(foo.cni_version(), Some("0.4.0"));
        assert_eq!(foo.plugins()[0].plugin_type(), "bridge");

        let err = load_conf(dir.path(), "baz", DEFAULT_CONF_EXTENSIONS).unwrap_err();
        match err {
            Error::NotFound { name, cause, .. } => {
                assert_eq!(name, "baz");
                assert_eq!(
                    cause,
                    NotFoundCause::NoMatch {
                        parsed: 2,
                        failures: Vec::new()
                    }
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_conf_first_file_wins() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "20-second.conf", r#"{"name":"dup","type":"macvlan"}"#);
        write(dir.path(), "10-first.conf", r#"{"name":"dup","type":"ipvlan"}"#);

        let list = load_conf(dir.path(), "dup", DEFAULT_CONF_EXTENSIONS).unwrap();
        assert_eq!(list.plugins()[0].plugin_type(), "ipvlan");
    }

    #[test]
    fn test_load_conf_skips_broken_files() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "00-broken.conf", "{ nope");
        write(dir.path(), "10-good.conf", r#"{"name":"good","type":"bridge"}"#);

        let list = load_conf(dir.path(), "good", DEFAULT_CONF_EXTENSIONS).unwrap();
        assert_eq!(list.name(), "good");
    }

    #[test]
    fn test_load_conf_no_match_keeps_skipped_diagnostics() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.conf", "{ broken");
        write(dir.path(), "b.conf", r#"{"name":"x","type":"bridge"}"#);

        let err = load_conf(dir.path(), "y", DEFAULT_CONF_EXTENSIONS).unwrap_err();
        let message = err.to_string();
        match err {
            Error::NotFound {
                cause: NotFoundCause::NoMatch { parsed, failures },
                ..
            } => {
                assert_eq!(parsed, 1);
                assert_eq!(failures.len(), 1);
                assert!(failures[0].0.ends_with("a.conf"));
                assert!(failures[0].1.contains("as conf"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(message.contains("a.conf: as conflist"));
    }

    #[test]
    fn test_load_conf_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "notes.txt", "hello");

        let err = load_conf(dir.path(), "foo", DEFAULT_CONF_EXTENSIONS).unwrap_err();
        assert!(matches!(
            err,
            Error::NotFound {
                cause: NotFoundCause::NoConfigFiles,
                ..
            }
        ));
    }

    #[test]
    fn test_load_conf_all_unparsable() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.conf", "{ nope");
        write(dir.path(), "b.conflist", r#"{"name":"b"}"#);

        let err = load_conf(dir.path(), "foo", DEFAULT_CONF_EXTENSIONS).unwrap_err();
        match err {
            Error::NotFound {
                cause: NotFoundCause::AllUnparsable(failures),
                ..
            } => {
                assert_eq!(failures.len(), 2);
                assert!(failures[0].0.ends_with("a.conf"));
                assert!(failures[1].1.contains("as conflist"));
                assert!(failures[1].1.contains("as conf"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_conf_rejects_empty_name() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_conf(dir.path(), "", DEFAULT_CONF_EXTENSIONS).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_parse_any_prefers_list() {
        let (format, list) =
            parse_any(br#"{"name":"n","type":"bridge","plugins":[{"type":"ptp"}]}"#).unwrap();
        assert_eq!(format, ConfFormat::List);
        assert_eq!(list.plugins()[0].plugin_type(), "ptp");

        let (format, _) = parse_any(br#"{"name":"n","type":"bridge"}"#).unwrap();
        assert_eq!(format, ConfFormat::Single);
    }
}
