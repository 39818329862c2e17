//! Selective archive extraction.
//!
//! Two modes: full extraction for source archives, rule-filtered extraction
//! for prebuilt binary archives. Archive decoding sits behind a small
//! entry-visitor capability ([`visit_entries`]) so the rest of the crate
//! never reaches into a decoder's internals.

use crate::config::ToolConfig;
use crate::error::InstallError;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Component, Path, PathBuf};

/// Archive container formats the distribution publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    TarGz,
    Zip,
}

/// Detect the container format from a filename.
pub fn detect_format(name: &str) -> Option<ArchiveFormat> {
    let lower = name.to_lowercase();
    if lower.ends_with(".tar.gz") || lower.ends_with(".tgz") {
        Some(ArchiveFormat::TarGz)
    } else if lower.ends_with(".zip") {
        Some(ArchiveFormat::Zip)
    } else {
        None
    }
}

/// One archive member as seen by the visitor.
///
/// The content reader is only valid for the duration of the visit; entries
/// are never retained after extraction completes.
pub struct ArchiveEntry<'a> {
    pub path: PathBuf,
    pub is_dir: bool,
    pub mode: Option<u32>,
    pub reader: &'a mut dyn Read,
}

/// Walk every entry of `archive`, invoking `visit` once per member.
///
/// Symlink and other special members are skipped; the installed tree only
/// ever needs regular files and directories.
pub fn visit_entries<F>(
    archive: &Path,
    format: ArchiveFormat,
    mut visit: F,
) -> Result<(), InstallError>
where
    F: FnMut(ArchiveEntry<'_>) -> Result<(), InstallError>,
{
    match format {
        ArchiveFormat::TarGz => visit_tar_gz(archive, &mut visit),
        ArchiveFormat::Zip => visit_zip(archive, &mut visit),
    }
}

fn visit_tar_gz(
    archive: &Path,
    visit: &mut dyn FnMut(ArchiveEntry<'_>) -> Result<(), InstallError>,
) -> Result<(), InstallError> {
    let file = File::open(archive)
        .map_err(|e| InstallError::fs(format!("cannot open {}", archive.display()), e))?;
    let decoder = flate2::read::GzDecoder::new(BufReader::new(file));
    let mut tar = tar::Archive::new(decoder);

    for entry in tar
        .entries()
        .map_err(|e| InstallError::Archive(format!("tar read error: {e}")))?
    {
        let mut entry = entry.map_err(|e| InstallError::Archive(format!("tar entry error: {e}")))?;

        let path = entry
            .path()
            .map_err(|e| InstallError::Archive(format!("tar path error: {e}")))?
            .into_owned();

        let entry_type = entry.header().entry_type();
        if !entry_type.is_file() && !entry_type.is_dir() {
            continue;
        }

        let mode = entry.header().mode().ok();
        visit(ArchiveEntry {
            path,
            is_dir: entry_type.is_dir(),
            mode,
            reader: &mut entry,
        })?;
    }

    Ok(())
}

fn visit_zip(
    archive: &Path,
    visit: &mut dyn FnMut(ArchiveEntry<'_>) -> Result<(), InstallError>,
) -> Result<(), InstallError> {
    let file = File::open(archive)
        .map_err(|e| InstallError::fs(format!("cannot open {}", archive.display()), e))?;
    let mut zip = zip::ZipArchive::new(file)
        .map_err(|e| InstallError::Archive(format!("zip read error: {e}")))?;

    for i in 0..zip.len() {
        let mut entry = zip
            .by_index(i)
            .map_err(|e| InstallError::Archive(format!("zip entry error: {e}")))?;

        // Entries whose stored name escapes the destination have no
        // enclosed form; skip them.
        let Some(path) = entry.enclosed_name() else {
            continue;
        };

        let is_dir = entry.is_dir();
        let mode = entry.unix_mode();
        visit(ArchiveEntry {
            path,
            is_dir,
            mode,
            reader: &mut entry,
        })?;
    }

    Ok(())
}

// ============================================================================
// Filtered extraction (prebuilt binary archives)
// ============================================================================

/// A single filter for binary-archive extraction.
///
/// Rules are evaluated independently per archive entry; an entry may match
/// zero, one, or several rules. Entries matching no rule are skipped
/// silently. Matching is suffix/substring based rather than exact so the
/// archive-root folder name may vary across platforms.
#[derive(Debug, Clone)]
pub enum ExtractionRule {
    /// An entry whose path ends with `target` is written to `<dest>/<target>`
    /// with `mode` applied (Unix executable bits; no-op elsewhere).
    NamedFile { target: String, mode: u32 },
    /// An entry whose path contains `fragment` is written with its path
    /// rewritten relative to the start of the fragment, preserving nested
    /// structure while dropping the archive-root folder name.
    DirectoryFragment { fragment: String },
}

/// The static rule set for a prebuilt CMake archive: both executables plus
/// the version-qualified Modules and Templates trees.
pub fn binary_rules(config: &ToolConfig) -> Vec<ExtractionRule> {
    let exe = std::env::consts::EXE_SUFFIX;
    let share = config.share_dir();

    vec![
        ExtractionRule::NamedFile {
            target: format!("bin/cmake{exe}"),
            mode: 0o755,
        },
        ExtractionRule::NamedFile {
            target: format!("bin/cpack{exe}"),
            mode: 0o755,
        },
        ExtractionRule::DirectoryFragment {
            fragment: format!("share/{share}/Modules"),
        },
        ExtractionRule::DirectoryFragment {
            fragment: format!("share/{share}/Templates"),
        },
    ]
}

/// Extract only the entries matching `rules` into `dest`.
pub fn extract_filtered(
    archive: &Path,
    dest: &Path,
    rules: &[ExtractionRule],
) -> Result<(), InstallError> {
    let format = format_of(archive)?;
    create_dir_all(dest)?;

    visit_entries(archive, format, |entry| {
        if entry.is_dir {
            return Ok(());
        }

        let entry_path = slash_path(&entry.path);

        // Collect destinations first: the entry's reader can only be
        // drained once, and an entry may match several rules.
        let mut targets: Vec<(PathBuf, Option<u32>)> = Vec::new();
        for rule in rules {
            match rule {
                ExtractionRule::NamedFile { target, mode } => {
                    if entry_path.ends_with(target.as_str()) {
                        targets.push((dest.join(target), Some(*mode)));
                    }
                }
                ExtractionRule::DirectoryFragment { fragment } => {
                    if let Some(pos) = entry_path.find(fragment.as_str()) {
                        targets.push((dest.join(&entry_path[pos..]), None));
                    }
                }
            }
        }

        if targets.is_empty() {
            return Ok(());
        }

        let mut content = Vec::new();
        entry
            .reader
            .read_to_end(&mut content)
            .map_err(|e| InstallError::Archive(format!("read error for {entry_path}: {e}")))?;

        for (path, mode) in targets {
            write_file(&path, &content, mode)?;
        }

        Ok(())
    })
}

/// Extract every entry into `dest`, reproducing the archive tree verbatim.
pub fn extract_full(archive: &Path, dest: &Path) -> Result<(), InstallError> {
    let format = format_of(archive)?;
    create_dir_all(dest)?;

    visit_entries(archive, format, |entry| {
        // Reject paths that could escape the destination.
        if entry.path.is_absolute()
            || entry
                .path
                .components()
                .any(|c| c == Component::ParentDir)
        {
            return Err(InstallError::Archive(format!(
                "archive contains unsafe path: {}",
                entry.path.display()
            )));
        }

        // Some archives contain a "." entry; treat it as a no-op.
        if entry.path.as_os_str().is_empty() || entry.path == Path::new(".") {
            return Ok(());
        }

        let out = dest.join(&entry.path);

        if entry.is_dir {
            create_dir_all(&out)
        } else {
            let mut content = Vec::new();
            entry.reader.read_to_end(&mut content).map_err(|e| {
                InstallError::Archive(format!("read error for {}: {e}", entry.path.display()))
            })?;
            write_file(&out, &content, entry.mode)
        }
    })
}

// ============================================================================
// Archive root derivation
// ============================================================================

/// Derive the expected root folder name from a download filename: strip one
/// trailing archive extension plus, when present, the `.tar` segment of a
/// double extension. Names without an archive extension pass through
/// unchanged, which makes the derivation idempotent.
///
/// `cmake-3.24.2-Linux-x86_64.tar.gz` → `cmake-3.24.2-Linux-x86_64`
pub fn archive_root_name(filename: &str) -> String {
    let lower = filename.to_lowercase();
    for ext in [".tar.gz", ".tgz", ".tar", ".zip"] {
        if lower.ends_with(ext) {
            return filename[..filename.len() - ext.len()].to_string();
        }
    }
    filename.to_string()
}

/// Locate the extracted source root under `dest` for a download filename.
///
/// Darwin archives nest the usable tree inside an application bundle, so the
/// true root sits one level deeper. A missing root fails with the attempted
/// path in the message.
pub fn source_root(dest: &Path, filename: &str) -> Result<PathBuf, InstallError> {
    let folder = archive_root_name(filename);
    let mut root = dest.join(&folder);

    if folder.contains("Darwin") {
        root = root.join("CMake.app").join("Contents");
    }

    if root.exists() {
        Ok(root)
    } else {
        Err(InstallError::ArchiveIntegrity { path: root })
    }
}

// ============================================================================
// Internal helpers
// ============================================================================

fn format_of(archive: &Path) -> Result<ArchiveFormat, InstallError> {
    let name = archive
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    detect_format(&name)
        .ok_or_else(|| InstallError::Archive(format!("cannot detect archive format: {name}")))
}

/// Render an entry path with single forward-slash separators. Container
/// formats sometimes split directory and filename across fields or encode
/// trailing separators; going through `components()` guarantees no doubled
/// separator regardless.
fn slash_path(path: &Path) -> String {
    let mut out = String::new();
    for component in path.components() {
        if let Component::Normal(seg) = component {
            if !out.is_empty() {
                out.push('/');
            }
            out.push_str(&seg.to_string_lossy());
        }
    }
    out
}

fn create_dir_all(path: &Path) -> Result<(), InstallError> {
    std::fs::create_dir_all(path)
        .map_err(|e| InstallError::fs(format!("cannot create directory {}", path.display()), e))
}

fn write_file(path: &Path, content: &[u8], mode: Option<u32>) -> Result<(), InstallError> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }

    std::fs::write(path, content)
        .map_err(|e| InstallError::fs(format!("cannot write {}", path.display()), e))?;

    if let Some(mode) = mode {
        set_mode(path, mode)?;
    }

    Ok(())
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> Result<(), InstallError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
        .map_err(|e| InstallError::fs(format!("chmod failed for {}", path.display()), e))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> Result<(), InstallError> {
    Ok(()) // No executable bits to set
}
