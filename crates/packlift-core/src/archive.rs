//! Archive creation and extraction
//!
//! Packages a directory into a `.tar.gz` archive with a glob ignore list,
//! and extracts archives back into a working directory. Headers are
//! normalized (epoch mtime, mode 0644) so the same inputs produce
//! equivalent archives.

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use glob::Pattern;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tar::{Archive, Builder, Header};
use walkdir::WalkDir;

use crate::error::{CoreError, Result};

/// Request to archive a directory
#[derive(Debug, Clone)]
pub struct ArchiveOptions {
    /// Destination archive file
    pub output_file: PathBuf,
    /// Directory to package; must exist
    pub source_dir: PathBuf,
    /// Glob patterns excluded from the archive
    pub ignore: Vec<String>,
}

/// Request to extract an archive
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Archive file to extract; must exist
    pub archive_file: PathBuf,
    /// Destination directory, created if necessary
    pub dest_dir: PathBuf,
}

/// Archive/extract capability
///
/// The storage workflows depend on this seam rather than on a concrete
/// codec, so embedders can substitute their own packaging.
pub trait Archiver: Send + Sync {
    /// Package a directory into an archive, excluding ignored paths
    fn archive(&self, options: &ArchiveOptions) -> Result<()>;

    /// Extract an archive into a directory, overwriting conflicts
    fn extract(&self, options: &ExtractOptions) -> Result<()>;
}

/// Default tar.gz codec
#[derive(Debug, Clone, Copy, Default)]
pub struct TarGzArchiver;

impl Archiver for TarGzArchiver {
    fn archive(&self, options: &ArchiveOptions) -> Result<()> {
        create_archive(&options.output_file, &options.source_dir, &options.ignore)
    }

    fn extract(&self, options: &ExtractOptions) -> Result<()> {
        extract_archive(&options.archive_file, &options.dest_dir)
    }
}

/// Create a tar.gz archive from a directory
///
/// An empty source directory yields an empty archive; a missing source
/// directory is an error.
pub fn create_archive(output_file: &Path, source_dir: &Path, ignore: &[String]) -> Result<()> {
    if !source_dir.is_dir() {
        return Err(CoreError::Archive {
            message: format!("source directory not found: {}", source_dir.display()),
        });
    }

    let patterns = compile_patterns(ignore)?;

    let file = File::create(output_file).map_err(|error| CoreError::Archive {
        message: format!("failed to create {}: {error}", output_file.display()),
    })?;
    let encoder = GzEncoder::new(file, Compression::default());
    let mut builder = Builder::new(encoder);

    for entry in WalkDir::new(source_dir).sort_by_file_name() {
        let entry = entry.map_err(|error| CoreError::Archive {
            message: format!("failed to walk {}: {error}", source_dir.display()),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let rel_path = entry
            .path()
            .strip_prefix(source_dir)
            .unwrap_or(entry.path());
        if is_ignored(&patterns, rel_path) {
            continue;
        }

        let content = std::fs::read(entry.path()).map_err(|error| CoreError::Archive {
            message: format!("failed to read {}: {error}", entry.path().display()),
        })?;
        add_bytes_to_archive(&mut builder, &rel_path.to_string_lossy(), &content)?;
    }

    let encoder = builder.into_inner()?;
    encoder.finish()?;

    tracing::debug!(archive = %output_file.display(), "created archive");
    Ok(())
}

/// Extract a tar.gz archive into a destination directory
pub fn extract_archive(archive_file: &Path, dest_dir: &Path) -> Result<()> {
    let file = File::open(archive_file).map_err(|error| CoreError::Extract {
        message: format!("failed to open {}: {error}", archive_file.display()),
    })?;
    let decoder = GzDecoder::new(file);
    let mut archive = Archive::new(decoder);

    std::fs::create_dir_all(dest_dir)?;
    archive.unpack(dest_dir).map_err(|error| CoreError::Extract {
        message: format!("failed to unpack {}: {error}", archive_file.display()),
    })?;

    tracing::debug!(dest = %dest_dir.display(), "extracted archive");
    Ok(())
}

/// List file paths contained in an archive
pub fn list_archive(archive_file: &Path) -> Result<Vec<String>> {
    let file = File::open(archive_file).map_err(|error| CoreError::Extract {
        message: format!("failed to open {}: {error}", archive_file.display()),
    })?;
    let decoder = GzDecoder::new(file);
    let mut archive = Archive::new(decoder);

    let mut paths = Vec::new();
    for entry in archive.entries()? {
        let entry = entry?;
        paths.push(entry.path()?.to_string_lossy().to_string());
    }
    Ok(paths)
}

fn compile_patterns(ignore: &[String]) -> Result<Vec<Pattern>> {
    ignore
        .iter()
        .map(|raw| {
            Pattern::new(raw).map_err(|error| CoreError::Archive {
                message: format!("invalid ignore pattern {raw}: {error}"),
            })
        })
        .collect()
}

/// A path is ignored when a pattern matches it or any of its ancestors,
/// so ignoring a directory name excludes its whole subtree.
fn is_ignored(patterns: &[Pattern], rel_path: &Path) -> bool {
    let mut current = Some(rel_path);
    while let Some(path) = current {
        if patterns.iter().any(|pattern| pattern.matches_path(path)) {
            return true;
        }
        current = path.parent().filter(|p| !p.as_os_str().is_empty());
    }
    false
}

fn add_bytes_to_archive<W: Write>(
    builder: &mut Builder<W>,
    archive_path: &str,
    content: &[u8],
) -> Result<()> {
    let mut header = Header::new_gnu();
    header.set_size(content.len() as u64);
    header.set_mode(0o644);
    header.set_mtime(0); // Reproducible archives: use epoch time
    header.set_cksum();

    builder.append_data(&mut header, archive_path, content)?;

    Ok(())
}
