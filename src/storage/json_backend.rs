use chrono::{NaiveDateTime, Utc};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    time::SystemTime,
};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    core::utils::{app_data_dir, backups_dir_in, data_dir_in, ensure_dir},
    errors::{Result, TrackerError},
    ledger::BudgetPatch,
};

use super::{BudgetRecord, Database, PersistenceBackend, TransactionRecord};

const STORE_NAME: &str = "tracker";
const BACKUP_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const BACKUP_TIMESTAMP_LEN: usize = 15;
const TMP_SUFFIX: &str = "tmp";
pub const DEFAULT_RETENTION: usize = 5;

/// File-backed store keeping both tables in a single JSON document.
///
/// Every call reads the document from disk, so two shells pointed at the same
/// home see each other's writes after a `reload`.
#[derive(Debug, Clone)]
pub struct JsonStore {
    root: PathBuf,
    data_path: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonStore {
    pub fn new(root: Option<PathBuf>, retention: Option<usize>) -> Result<Self> {
        let root = root.unwrap_or_else(app_data_dir);
        let data_dir = data_dir_in(&root);
        let backups_dir = backups_dir_in(&root);
        ensure_dir(&data_dir)?;
        ensure_dir(&backups_dir)?;
        Ok(Self {
            data_path: data_dir.join(format!("{}.json", STORE_NAME)),
            root,
            backups_dir,
            retention: retention.unwrap_or(DEFAULT_RETENTION).max(1),
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    fn load(&self) -> Result<Database> {
        if !self.data_path.exists() {
            return Ok(Database::default());
        }
        let data = fs::read_to_string(&self.data_path)?;
        let database: Database = serde_json::from_str(&data)?;
        database.ensure_supported()?;
        Ok(database)
    }

    fn save(&self, database: &Database) -> Result<()> {
        if self.data_path.exists() {
            self.backup_existing_file()?;
        }
        let json = serde_json::to_string_pretty(database)?;
        write_atomic(&self.data_path, &json)
    }

    fn mutate<T>(&self, apply: impl FnOnce(&mut Database) -> Result<T>) -> Result<T> {
        let mut database = self.load()?;
        let outcome = apply(&mut database)?;
        self.save(&database)?;
        Ok(outcome)
    }

    /// Writes a snapshot of the current document into the backups directory
    /// and returns the backup file name. Noted backups are exempt from
    /// retention pruning.
    pub fn backup(&self, note: Option<&str>) -> Result<String> {
        let database = self.load()?;
        let label = sanitize_backup_note(note);
        let name = self.free_backup_name(label.as_deref())?;
        let json = serde_json::to_string_pretty(&database)?;
        write_atomic(&self.backups_dir.join(&name), &json)?;
        self.prune_backups()?;
        info!(backup = %name, "store backup written");
        Ok(name)
    }

    /// Backup file names, newest first.
    pub fn list_backups(&self) -> Result<Vec<String>> {
        Ok(self
            .backup_entries()?
            .into_iter()
            .map(|entry| entry.name)
            .collect())
    }

    /// Replaces the live document with the named backup. The document being
    /// replaced is itself backed up first.
    pub fn restore_backup(&self, backup_name: &str) -> Result<()> {
        let path = self.backups_dir.join(backup_name);
        if backup_name.contains(['/', '\\']) || !path.exists() {
            return Err(TrackerError::Persistence(format!(
                "backup `{}` not found",
                backup_name
            )));
        }
        let data = fs::read_to_string(&path)?;
        let database: Database = serde_json::from_str(&data)?;
        database.ensure_supported()?;
        self.save(&database)?;
        info!(backup = %backup_name, "store restored from backup");
        Ok(())
    }

    fn backup_existing_file(&self) -> Result<()> {
        let name = self.free_backup_name(None)?;
        let target = self.backups_dir.join(&name);
        let tmp = tmp_path(&target);
        fs::copy(&self.data_path, &tmp)?;
        fs::rename(&tmp, &target)?;
        debug!(backup = %name, "previous store document copied");
        self.prune_backups()
    }

    /// Keeps the newest `retention` automatic backups. Noted and unrecognised
    /// files are left alone.
    fn prune_backups(&self) -> Result<()> {
        let automatic = self
            .backup_entries()?
            .into_iter()
            .filter(|entry| entry.stamp.is_some() && entry.note.is_none());
        for entry in automatic.skip(self.retention) {
            let _ = fs::remove_file(self.backups_dir.join(&entry.name));
        }
        Ok(())
    }

    /// `tracker_<stamp>[-<seq>][_<note>].json`, with `seq` one past the
    /// highest already used for this stamp.
    fn free_backup_name(&self, note: Option<&str>) -> Result<String> {
        let stamp = timestamp();
        let prefix = format!("{}_{}", STORE_NAME, stamp);
        let taken = self
            .backup_entries()?
            .into_iter()
            .filter(|entry| entry.name.starts_with(&prefix))
            .map(|entry| entry.seq + 1)
            .max()
            .unwrap_or(0);
        let mut stem = prefix;
        if taken > 0 {
            stem.push_str(&format!("-{}", taken));
        }
        if let Some(label) = note {
            stem.push('_');
            stem.push_str(label);
        }
        Ok(format!("{}.{}", stem, BACKUP_EXTENSION))
    }

    /// Every backup file, newest first: by stamp, then modification time,
    /// then sequence number.
    fn backup_entries(&self) -> Result<Vec<BackupEntry>> {
        if !self.backups_dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.backups_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(BACKUP_EXTENSION) {
                continue;
            }
            let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            let modified = entry.metadata().and_then(|meta| meta.modified()).ok();
            entries.push(BackupEntry::parse(name, modified));
        }
        entries.sort_by(|a, b| {
            b.stamp
                .cmp(&a.stamp)
                .then_with(|| b.modified.cmp(&a.modified))
                .then_with(|| b.seq.cmp(&a.seq))
                .then_with(|| b.name.cmp(&a.name))
        });
        Ok(entries)
    }
}

impl PersistenceBackend for JsonStore {
    fn list_transactions(&self, owner: &str) -> Result<Vec<TransactionRecord>> {
        Ok(self.load()?.transactions_for(owner))
    }

    fn insert_transaction(&self, record: TransactionRecord) -> Result<TransactionRecord> {
        self.mutate(|db| db.insert_transaction(record))
    }

    fn delete_transaction(&self, id: Uuid) -> Result<()> {
        self.mutate(|db| db.delete_transaction(id))
    }

    fn list_budgets(&self, owner: &str) -> Result<Vec<BudgetRecord>> {
        Ok(self.load()?.budgets_for(owner))
    }

    fn insert_budget(&self, record: BudgetRecord) -> Result<BudgetRecord> {
        self.mutate(|db| db.insert_budget(record))
    }

    fn update_budget(&self, id: Uuid, patch: &BudgetPatch) -> Result<()> {
        self.mutate(|db| db.update_budget(id, patch))
    }

    fn delete_budget(&self, id: Uuid) -> Result<()> {
        self.mutate(|db| db.delete_budget(id))
    }

    fn describe(&self) -> String {
        format!("json store at {}", self.data_path.display())
    }
}

fn timestamp() -> String {
    Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string()
}

fn sanitize_backup_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    let mut sanitized = String::new();
    let mut last_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if (ch.is_whitespace() || matches!(ch, '-' | '.' | '_'))
            && !sanitized.is_empty()
            && !last_dash
        {
            sanitized.push('-');
            last_dash = true;
        }
    }
    let trimmed = sanitized.trim_matches('-');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// A file in the backups directory, split into its name parts.
#[derive(Debug)]
struct BackupEntry {
    name: String,
    stamp: Option<NaiveDateTime>,
    seq: u32,
    note: Option<String>,
    modified: Option<SystemTime>,
}

impl BackupEntry {
    /// Splits `tracker_YYYYMMDD_HHMMSS[-seq][_note].json`. Names that do not
    /// follow the pattern keep `stamp: None` and sort last.
    fn parse(name: &str, modified: Option<SystemTime>) -> Self {
        let mut entry = Self {
            name: name.to_string(),
            stamp: None,
            seq: 0,
            note: None,
            modified,
        };
        let Some(rest) = name
            .strip_suffix(&format!(".{}", BACKUP_EXTENSION))
            .and_then(|stem| stem.strip_prefix(STORE_NAME))
            .and_then(|stem| stem.strip_prefix('_'))
        else {
            return entry;
        };
        let Some(stamp) = rest.get(..BACKUP_TIMESTAMP_LEN) else {
            return entry;
        };
        let Ok(stamp) = NaiveDateTime::parse_from_str(stamp, BACKUP_TIMESTAMP_FORMAT) else {
            return entry;
        };
        let mut tail = &rest[BACKUP_TIMESTAMP_LEN..];
        if let Some(after_dash) = tail.strip_prefix('-') {
            let digits = after_dash
                .find(|ch: char| !ch.is_ascii_digit())
                .unwrap_or(after_dash.len());
            let Ok(seq) = after_dash[..digits].parse() else {
                return entry;
            };
            entry.seq = seq;
            tail = &after_dash[digits..];
        }
        match tail.strip_prefix('_') {
            Some(note) if !note.is_empty() => entry.note = Some(note.to_string()),
            _ if tail.is_empty() => {}
            _ => return entry,
        }
        entry.stamp = Some(stamp);
        entry
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

/// Writes `data` to a `.tmp` sibling, then renames it over `path`.
fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let tmp = tmp_path(path);
    let mut file = File::create(&tmp)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    fs::rename(&tmp, path)?;
    Ok(())
}
