//! Tests for the history store.

use super::*;
use anyhow::Result;
use shtg_types::{Dialect, ShtgError};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn init() {
    let _ = tracing_subscriber::fmt::try_init();
}

const ZSH_HISTORY: &str = ": 1700000000:0;ls\n: 1700000010:2;cd /tmp\n: 1700000020:0;ls\n";
const FISH_HISTORY: &str =
    "- cmd: ls\n  when: 1700000100\n- cmd: pwd\n  when: 1700000200\n  paths:\n    - /tmp\n";

fn store_with(dir: &Path, dialect: Dialect, contents: &str) -> Result<HistoryStore> {
    let path = dir.join(format!("{dialect}_history"));
    fs::write(&path, contents)?;
    let mut store = HistoryStore::new(dialect, path);
    store.read()?;
    Ok(store)
}

fn commands(store: &HistoryStore) -> Result<Vec<String>> {
    Ok(store.entries()?.iter().map(|e| e.command.clone()).collect())
}

#[test]
fn test_unread_store() {
    init();
    let mut store = HistoryStore::new(Dialect::Zsh, "/nonexistent/.zsh_history");
    assert!(matches!(store.len(), Err(ShtgError::NotRead { dialect: Dialect::Zsh })));
    assert!(matches!(
        store.apply(&Transform::Dedup, 0),
        Err(ShtgError::NotRead { .. })
    ));
    assert!(matches!(
        store.write(&Destination::Real),
        Err(ShtgError::NotRead { .. })
    ));

    let other = HistoryStore::new(Dialect::Fish, "/nonexistent/fish_history");
    assert!(matches!(store.combine(&other), Err(ShtgError::NotRead { .. })));
}

#[test]
fn test_read_missing_file() {
    init();
    let dir = tempdir().unwrap();
    let mut store = HistoryStore::new(Dialect::Fish, dir.path().join("missing"));
    let err = store.read().unwrap_err();
    assert!(matches!(err, ShtgError::Io { operation: "read", .. }));
    assert!(matches!(store.len(), Err(ShtgError::NotRead { .. })));
}

#[test]
fn test_read_parse_error_leaves_file() -> Result<()> {
    init();
    let dir = tempdir()?;
    let path = dir.path().join("fish_history");
    fs::write(&path, "oops\n")?;
    let mut store = HistoryStore::new(Dialect::Fish, &path);
    assert!(matches!(store.read(), Err(ShtgError::Parse(_))));
    assert_eq!(fs::read_to_string(&path)?, "oops\n");
    Ok(())
}

#[test]
fn test_dedup_and_write() -> Result<()> {
    init();
    let dir = tempdir()?;
    let mut store = store_with(dir.path(), Dialect::Zsh, ZSH_HISTORY)?;
    assert_eq!(store.len()?, 3);

    let removed = store.apply(&Transform::Dedup, current_time_secs())?;
    assert_eq!(removed, 1);
    assert_eq!(commands(&store)?, vec!["ls", "cd /tmp"]);

    let written = store.write(&Destination::Real)?;
    assert_eq!(written, store.path());
    assert_eq!(
        fs::read_to_string(store.path())?,
        ": 1700000000:0;ls\n: 1700000010:2;cd /tmp\n"
    );
    Ok(())
}

#[test]
fn test_untouched_write_is_identical() -> Result<()> {
    init();
    let dir = tempdir()?;
    for (dialect, contents) in [(Dialect::Zsh, ZSH_HISTORY), (Dialect::Fish, FISH_HISTORY)] {
        let mut store = store_with(dir.path(), dialect, contents)?;
        store.write(&Destination::Real)?;
        assert_eq!(fs::read_to_string(store.path())?, contents);
    }
    Ok(())
}

#[test]
#[cfg(unix)]
fn test_write_keeps_permissions() -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    init();
    let dir = tempdir()?;
    let mut store = store_with(dir.path(), Dialect::Zsh, ZSH_HISTORY)?;
    fs::set_permissions(store.path(), fs::Permissions::from_mode(0o640))?;
    store.write(&Destination::Real)?;
    let mode = fs::metadata(store.path())?.permissions().mode() & 0o777;
    assert_eq!(mode, 0o640);
    Ok(())
}

#[test]
fn test_dry_run_leaves_real_file() -> Result<()> {
    init();
    let dir = tempdir()?;
    let preview = dir.path().join("preview");
    let mut store = store_with(dir.path(), Dialect::Zsh, ZSH_HISTORY)?;
    store.apply(&Transform::pattern("^cd ")?, current_time_secs())?;

    let written = store.write(&Destination::Preview(preview.clone()))?;
    assert_eq!(written, preview);
    assert_eq!(fs::read_to_string(store.path())?, ZSH_HISTORY);
    assert_eq!(
        fs::read_to_string(&preview)?,
        ": 1700000000:0;ls\n: 1700000020:0;ls\n"
    );
    Ok(())
}

#[test]
fn test_written_store_is_final() -> Result<()> {
    init();
    let dir = tempdir()?;
    let mut store = store_with(dir.path(), Dialect::Fish, FISH_HISTORY)?;
    store.write(&Destination::Preview(dir.path().join("preview")))?;
    assert_eq!(store.len()?, 2);
    assert!(matches!(
        store.apply(&Transform::Dedup, 0),
        Err(ShtgError::AlreadyWritten { dialect: Dialect::Fish })
    ));
    assert!(matches!(
        store.write(&Destination::Real),
        Err(ShtgError::AlreadyWritten { .. })
    ));
    Ok(())
}

#[test]
fn test_recent_removes_only_dated_entries() -> Result<()> {
    init();
    let dir = tempdir()?;
    let now = current_time_secs();
    let history = format!(": {}:0;old\nundated\n: {}:0;fresh\n", now - 7200, now - 60);
    let mut store = store_with(dir.path(), Dialect::Zsh, &history)?;
    let removed = store.apply(&Transform::recency("1h")?, now)?;
    assert_eq!(removed, 1);
    assert_eq!(commands(&store)?, vec!["old", "undated"]);
    Ok(())
}

#[test]
fn test_sync_both_directions() -> Result<()> {
    init();
    let dir = tempdir()?;
    let mut zsh = store_with(dir.path(), Dialect::Zsh, ZSH_HISTORY)?;
    let mut fish = store_with(dir.path(), Dialect::Fish, FISH_HISTORY)?;
    let zsh_before = zsh.entries()?.to_vec();
    let fish_before = fish.entries()?.to_vec();

    let fish_added = fish.combine(&zsh)?;
    let zsh_added = zsh.combine(&fish)?;
    assert_eq!(fish_added, 1);
    assert_eq!(zsh_added, 1);

    // append only
    assert_eq!(&zsh.entries()?[..zsh_before.len()], &zsh_before[..]);
    assert_eq!(&fish.entries()?[..fish_before.len()], &fish_before[..]);

    let zsh_set: HashSet<_> = commands(&zsh)?.into_iter().collect();
    let fish_set: HashSet<_> = commands(&fish)?.into_iter().collect();
    assert_eq!(zsh_set, fish_set);

    zsh.write(&Destination::Real)?;
    fish.write(&Destination::Real)?;
    assert_eq!(
        fs::read_to_string(zsh.path())?,
        format!("{ZSH_HISTORY}: 1700000200:0;pwd\n")
    );
    assert_eq!(
        fs::read_to_string(fish.path())?,
        format!("{FISH_HISTORY}- cmd: cd /tmp\n  when: 1700000010\n")
    );

    let mut reread = HistoryStore::new(Dialect::Fish, fish.path());
    reread.read()?;
    assert_eq!(reread.len()?, 3);
    Ok(())
}

#[test]
fn test_sync_order_independent() -> Result<()> {
    init();
    let dir = tempdir()?;
    let run = |fish_first: bool| -> Result<(Vec<String>, Vec<String>)> {
        let mut zsh = store_with(dir.path(), Dialect::Zsh, ZSH_HISTORY)?;
        let mut fish = store_with(dir.path(), Dialect::Fish, FISH_HISTORY)?;
        if fish_first {
            fish.combine(&zsh)?;
            zsh.combine(&fish)?;
        } else {
            zsh.combine(&fish)?;
            fish.combine(&zsh)?;
        }
        Ok((commands(&zsh)?, commands(&fish)?))
    };
    assert_eq!(run(true)?, run(false)?);
    Ok(())
}

#[test]
fn test_dedup_then_combine_scenario() -> Result<()> {
    init();
    let dir = tempdir()?;
    let mut zsh = store_with(dir.path(), Dialect::Zsh, "ls\ncd /tmp\nls\n")?;
    let fish = store_with(dir.path(), Dialect::Fish, "- cmd: ls\n- cmd: pwd\n")?;

    assert_eq!(zsh.apply(&Transform::Dedup, 0)?, 1);
    assert_eq!(commands(&zsh)?, vec!["ls", "cd /tmp"]);
    assert_eq!(zsh.combine(&fish)?, 1);
    assert_eq!(commands(&zsh)?, vec!["ls", "cd /tmp", "pwd"]);
    Ok(())
}

#[test]
#[cfg(unix)]
fn test_write_through_symlink() -> Result<()> {
    init();
    let dir = tempdir()?;
    let target = dir.path().join("dotfiles_zsh_history");
    let link = dir.path().join(".zsh_history");
    fs::write(&target, "ls\nls\n")?;
    std::os::unix::fs::symlink(&target, &link)?;

    let mut store = HistoryStore::new(Dialect::Zsh, &link);
    store.read()?;
    store.apply(&Transform::Dedup, 0)?;
    store.write(&Destination::Real)?;

    assert!(fs::symlink_metadata(&link)?.file_type().is_symlink());
    assert_eq!(fs::read_to_string(&target)?, "ls\n");
    assert_eq!(fs::read_to_string(&link)?, "ls\n");
    Ok(())
}

#[test]
fn test_metafied_commands_stay_distinct() -> Result<()> {
    init();
    let dir = tempdir()?;
    let path = dir.path().join("zsh_history");
    let contents: &[u8] = b"echo \xc3\x83\xbf\necho \xc3\x83\x80\necho \xc3\x83\xbf\n";
    fs::write(&path, contents)?;
    let mut zsh = HistoryStore::new(Dialect::Zsh, &path);
    zsh.read()?;

    assert_eq!(zsh.apply(&Transform::Dedup, 0)?, 1);
    assert_eq!(commands(&zsh)?, vec!["echo ß", "echo à"]);
    assert_eq!(zsh.apply(&Transform::pattern("ß$")?, 0)?, 1);
    assert_eq!(commands(&zsh)?, vec!["echo à"]);
    zsh.write(&Destination::Real)?;
    assert_eq!(fs::read(&path)?, b"echo \xc3\x83\x80\n".to_vec());
    Ok(())
}

#[test]
fn test_sync_metafied_into_fish() -> Result<()> {
    init();
    let dir = tempdir()?;
    let zsh_path = dir.path().join("zsh_history");
    fs::write(
        &zsh_path,
        b": 1700000000:0;echo \xc3\x83\xbf\n: 1700000001:0;echo \xc3\x83\x80\n",
    )?;
    let mut zsh = HistoryStore::new(Dialect::Zsh, &zsh_path);
    zsh.read()?;
    let mut fish = store_with(dir.path(), Dialect::Fish, "- cmd: echo à\n  when: 1\n")?;

    assert_eq!(fish.combine(&zsh)?, 1);
    assert_eq!(zsh.combine(&fish)?, 0);
    fish.write(&Destination::Real)?;
    assert_eq!(
        fs::read_to_string(fish.path())?,
        "- cmd: echo à\n  when: 1\n- cmd: echo ß\n  when: 1700000000\n"
    );
    Ok(())
}
