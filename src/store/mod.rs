//! Group store: maps filenames in the data directory to group documents.
//!
//! - [`serialization`] — atomic write and validated parse of one file
//! - [`locks`] — per-filename mutual exclusion for load-mutate-write spans
//!
//! The store is an explicit object built from the configured data directory
//! and shared through [`crate::state::AppState`]; nothing here is global.

pub mod locks;
pub mod serialization;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::error::AppError;
use crate::form::{CopyInput, GroupInput};
use crate::members;
use crate::models::{Group, DEFAULT_GROUP_NAME};

use locks::{FileHandle, FileLocks};

/// Extension every stored group file carries.
pub const EXTENSION: &str = ".json";

/// Normalize a caller-supplied filename into a safe storage key.
///
/// Appends [`EXTENSION`] when missing. Rejects blank names, anything that
/// could escape the data directory or collide with temp/hidden files, and
/// quotes or control characters, which cannot appear in a download header.
pub fn normalize_filename(raw: &str) -> Result<String, AppError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AppError::InvalidFormat(
            "Please provide a filename".to_string(),
        ));
    }
    if name.contains(['/', '\\', '"'])
        || name.contains(char::is_control)
        || name.contains("..")
        || name.starts_with('.')
    {
        return Err(AppError::InvalidFormat(format!(
            "\"{name}\" is not a valid filename"
        )));
    }
    if name.ends_with(EXTENSION) {
        Ok(name.to_string())
    } else {
        Ok(format!("{name}{EXTENSION}"))
    }
}

fn file_not_found(filename: &str) -> AppError {
    AppError::NotFound(format!("File \"{filename}\" not found"))
}

fn file_exists(filename: &str) -> AppError {
    AppError::Conflict(format!("File \"{filename}\" already exists"))
}

/// Map an I/O error on `filename`, turning "missing" into [`AppError::NotFound`].
fn io_error(filename: &str, e: std::io::Error) -> AppError {
    if e.kind() == ErrorKind::NotFound {
        file_not_found(filename)
    } else {
        AppError::Io(format!("{filename}: {e}"))
    }
}

#[derive(Debug)]
pub struct GroupStore {
    root: PathBuf,
    locks: FileLocks,
}

impl GroupStore {
    /// Open the store rooted at `root`, creating the directory if absent.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, AppError> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|e| {
            AppError::Io(format!(
                "cannot create data directory {}: {e}",
                root.display()
            ))
        })?;
        Ok(Self {
            root,
            locks: FileLocks::default(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, filename: &str) -> PathBuf {
        self.root.join(filename)
    }

    fn exists(&self, filename: &str) -> bool {
        self.path(filename).is_file()
    }

    fn read_group(&self, filename: &str) -> Result<Group, AppError> {
        let bytes = std::fs::read(self.path(filename)).map_err(|e| io_error(filename, e))?;
        serialization::decode(&bytes, filename)
    }

    fn write_group(&self, filename: &str, group: &Group) -> Result<(), AppError> {
        let bytes = serialization::encode(group)?;
        serialization::write_atomic(&self.path(filename), &bytes)
    }

    // ── list ──────────────────────────────────────────────────────────────

    /// Every stored group filename, sorted lexicographically.
    pub fn list(&self) -> Result<Vec<String>, AppError> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.ends_with(EXTENSION) && !name.starts_with('.') {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    // ── create / load / save ──────────────────────────────────────────────

    /// Create and persist a new, empty group.
    ///
    /// The filename is `input.filename` (normalized) or
    /// `group_<first 8 uuid chars>.json`. An existing file with that name is
    /// overwritten. Returns the filename and the stored group.
    pub fn create(&self, input: &GroupInput) -> Result<(String, Group), AppError> {
        let name = input
            .name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(DEFAULT_GROUP_NAME);
        let group = Group::new(
            name.to_string(),
            input.formation_bonus.clone().unwrap_or_default(),
            input.group_label.clone().unwrap_or_default(),
        );

        let filename = match &input.filename {
            Some(raw) => normalize_filename(raw)?,
            None => format!("group_{}{EXTENSION}", &group.uuid[..8]),
        };

        let handle = self.locks.handle(&filename)?;
        let _guard = handle.acquire()?;
        if self.exists(&filename) {
            tracing::warn!(%filename, "create is overwriting an existing group file");
        }
        self.write_group(&filename, &group)?;
        tracing::info!(%filename, uuid = %group.uuid, "group created");
        Ok((filename, group))
    }

    /// Read and parse a stored group.
    pub fn load(&self, filename: &str) -> Result<Group, AppError> {
        let filename = normalize_filename(filename)?;
        let handle = self.locks.handle(&filename)?;
        let _guard = handle.acquire()?;
        self.read_group(&filename)
    }

    /// Persist `group` under `filename`, replacing any existing file.
    pub fn save(&self, filename: &str, group: &Group) -> Result<(), AppError> {
        let filename = normalize_filename(filename)?;
        let handle = self.locks.handle(&filename)?;
        let _guard = handle.acquire()?;
        self.write_group(&filename, group)
    }

    /// Load `filename`, apply `mutate`, and persist the result, all under the
    /// file's lock. Nothing is written when `mutate` fails.
    pub fn modify<T>(
        &self,
        filename: &str,
        mutate: impl FnOnce(&mut Group) -> Result<T, AppError>,
    ) -> Result<T, AppError> {
        let filename = normalize_filename(filename)?;
        let handle = self.locks.handle(&filename)?;
        let _guard = handle.acquire()?;

        let mut group = self.read_group(&filename)?;
        let out = mutate(&mut group)?;
        self.write_group(&filename, &group)?;
        Ok(out)
    }

    // ── metadata ──────────────────────────────────────────────────────────

    /// Overwrite the group's metadata and refresh `lastUpdated`.
    ///
    /// `name` keeps its current value when not submitted; `formationBonus`
    /// and `groupLabel` become empty when not submitted.
    pub fn update_metadata(&self, filename: &str, input: &GroupInput) -> Result<Group, AppError> {
        let group = self.modify(filename, |group| {
            if let Some(name) = &input.name {
                group.name = name.clone();
            }
            group.formation_bonus = input.formation_bonus.clone().unwrap_or_default();
            group.group_label = input.group_label.clone().unwrap_or_default();
            group.touch();
            Ok(group.clone())
        })?;
        tracing::info!(%filename, "group metadata updated");
        Ok(group)
    }

    // ── rename / copy / delete ────────────────────────────────────────────

    /// Move `filename` to `new_filename`; contents are not touched.
    ///
    /// Returns the normalized destination name. Renaming a file onto itself
    /// is a no-op.
    pub fn rename(&self, filename: &str, new_filename: &str) -> Result<String, AppError> {
        let from = normalize_filename(filename)?;
        if !self.exists(&from) {
            return Err(file_not_found(&from));
        }
        let to = normalize_filename(new_filename)?;
        if to == from {
            return Ok(to);
        }

        let (first, second) = self.ordered_handles(&from, &to)?;
        let _g1 = first.acquire()?;
        let _g2 = second.acquire()?;

        if !self.exists(&from) {
            return Err(file_not_found(&from));
        }
        if self.path(&to).exists() {
            return Err(file_exists(&to));
        }
        std::fs::rename(self.path(&from), self.path(&to)).map_err(|e| io_error(&from, e))?;
        tracing::info!(%from, %to, "group renamed");
        Ok(to)
    }

    /// Store a copy of `filename` under a new identity.
    ///
    /// The copy gets a fresh group uuid and timestamp; with
    /// `update_member_uuids` every member also gets a fresh uuid. The source
    /// file is not modified.
    pub fn copy(&self, filename: &str, input: &CopyInput) -> Result<(String, Group), AppError> {
        let from = normalize_filename(filename)?;
        if !self.exists(&from) {
            return Err(file_not_found(&from));
        }
        let to = normalize_filename(&input.new_filename)?;
        if to == from {
            return Err(file_exists(&to));
        }

        let (first, second) = self.ordered_handles(&from, &to)?;
        let _g1 = first.acquire()?;
        let _g2 = second.acquire()?;

        if self.path(&to).exists() {
            return Err(file_exists(&to));
        }
        let mut group = self.read_group(&from)?;
        group.uuid = Uuid::new_v4().to_string();
        group.touch();
        if input.update_member_uuids {
            members::reassign_member_ids(&mut group);
        }
        self.write_group(&to, &group)?;
        tracing::info!(
            %from,
            %to,
            reassigned_members = input.update_member_uuids,
            "group copied"
        );
        Ok((to, group))
    }

    /// Remove a stored group.
    pub fn delete(&self, filename: &str) -> Result<(), AppError> {
        let filename = normalize_filename(filename)?;
        let handle = self.locks.handle(&filename)?;
        let _guard = handle.acquire()?;
        std::fs::remove_file(self.path(&filename)).map_err(|e| io_error(&filename, e))?;
        tracing::info!(%filename, "group deleted");
        Ok(())
    }

    // ── import / export ───────────────────────────────────────────────────

    /// Store uploaded bytes verbatim under `filename`.
    ///
    /// The upload must be a `.json` file whose content parses as a group
    /// document. No identity is reassigned and an existing file with the
    /// same name is replaced. Returns the stored filename.
    pub fn import_document(&self, bytes: &[u8], filename: &str) -> Result<String, AppError> {
        // Browsers may send a client-side path; only the last component counts.
        let base = filename
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or_default()
            .trim();
        if base.is_empty() {
            return Err(AppError::InvalidFormat("No file selected".to_string()));
        }
        if !base.ends_with(EXTENSION) {
            return Err(AppError::InvalidFormat(
                "Only JSON files are allowed".to_string(),
            ));
        }
        let filename = normalize_filename(base)?;
        serialization::decode(bytes, &filename)
            .map_err(|e| AppError::InvalidFormat(format!("Invalid JSON file: {e}")))?;

        let handle = self.locks.handle(&filename)?;
        let _guard = handle.acquire()?;
        serialization::write_atomic(&self.path(&filename), bytes)?;
        tracing::info!(%filename, bytes = bytes.len(), "group imported");
        Ok(filename)
    }

    /// The stored bytes of `filename`, unchanged.
    pub fn export_document(&self, filename: &str) -> Result<Vec<u8>, AppError> {
        let filename = normalize_filename(filename)?;
        let handle = self.locks.handle(&filename)?;
        let _guard = handle.acquire()?;
        std::fs::read(self.path(&filename)).map_err(|e| io_error(&filename, e))
    }

    /// Lock handles for two distinct files in a fixed (lexicographic) order,
    /// so concurrent two-file operations cannot deadlock.
    fn ordered_handles(
        &self,
        a: &str,
        b: &str,
    ) -> Result<(FileHandle<'_>, FileHandle<'_>), AppError> {
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        Ok((self.locks.handle(first)?, self.locks.handle(second)?))
    }
}
