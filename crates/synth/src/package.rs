// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deterministic gzip-compressed tar packages of a synthesized project.
//!
//! Layout:
//! - `<Project>.xcodeproj/project.pbxproj`
//! - `<Project>.xcodeproj/xcshareddata/xcschemes/<Project>.xcscheme`
//! - `<Project>/<relative path>` for each source and synthesized file
//!
//! Entries are sorted by path and carry zero mtime/uid/gid with mode 0644,
//! so the same inputs always produce the same bytes.

use crate::scheme::scheme_path;
use crate::synthesize::{inspect, synthesize, ProjectSpec, SynthError, Synthesis};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use nb_core::{validate_file_set, FileSetError, SourceFile};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use tar::{Archive, Builder, Header};
use thiserror::Error;

const DESCRIPTOR_FILE: &str = "project.pbxproj";
const ENTRY_MODE: u32 = 0o644;

#[derive(Debug, Error)]
pub enum PackageError {
    #[error("no Swift source files to package")]
    NoSourceFiles,

    #[error("invalid file set: {0}")]
    InvalidFileSet(#[from] FileSetError),

    #[error(transparent)]
    Synth(SynthError),

    #[error("invalid project descriptor: {0}")]
    InvalidDescriptor(String),

    #[error("included file {0} has no content")]
    MissingFile(String),

    #[error("archive I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<SynthError> for PackageError {
    fn from(err: SynthError) -> Self {
        match err {
            SynthError::NoSourceFiles => PackageError::NoSourceFiles,
            other => PackageError::Synth(other),
        }
    }
}

/// A finished archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub filename: String,
    pub bytes: Vec<u8>,
    /// Entry paths in archive order.
    pub entries: Vec<String>,
}

impl Package {
    pub fn content_disposition(&self) -> String {
        content_disposition(&self.filename)
    }
}

/// Download name for a project's archive.
pub fn archive_filename(project: &str) -> String {
    format!("{project}.tar.gz")
}

pub fn content_disposition(filename: &str) -> String {
    format!("attachment; filename=\"{}\"", filename.replace('"', ""))
}

/// Synthesize and package in one step.
pub fn export(files: &[SourceFile], spec: &ProjectSpec) -> Result<(Synthesis, Package), PackageError> {
    let synthesis = synthesize(files, spec)?;
    let package = package(&synthesis, files)?;
    Ok((synthesis, package))
}

/// Archive `synthesis` together with the source `files` it was built from.
///
/// The descriptor is parsed back before anything is written: dangling
/// identifiers, or references to files the archive would not contain, are
/// [`PackageError::InvalidDescriptor`].
pub fn package(synthesis: &Synthesis, files: &[SourceFile]) -> Result<Package, PackageError> {
    let files = validate_file_set(files)?;
    let project = synthesis.project_name.as_str();
    let mut contents: BTreeMap<String, Vec<u8>> = files
        .into_iter()
        .filter(SourceFile::is_swift)
        .map(|f| (format!("{project}/{}", f.path), f.content.into_bytes()))
        .collect();
    if contents.is_empty() {
        return Err(PackageError::NoSourceFiles);
    }
    for file in &synthesis.auxiliary_files {
        contents.insert(format!("{project}/{}", file.path), file.content.clone().into_bytes());
    }

    let inspection =
        inspect(&synthesis.descriptor_text).map_err(|e| PackageError::InvalidDescriptor(e.to_string()))?;
    if let Some(id) = inspection.dangling.first() {
        return Err(PackageError::InvalidDescriptor(format!("dangling object reference {id}")));
    }
    for path in inspection.file_paths.iter().chain(inspection.infoplist_paths.iter()) {
        if !contents.contains_key(path) {
            return Err(PackageError::InvalidDescriptor(format!(
                "references {path}, which is not in the archive"
            )));
        }
    }
    for path in &synthesis.included_paths {
        if !contents.contains_key(path) {
            return Err(PackageError::MissingFile(path.clone()));
        }
    }

    let bundle = synthesis.bundle_dir();
    contents.insert(format!("{bundle}/{DESCRIPTOR_FILE}"), synthesis.descriptor_text.clone().into_bytes());
    contents.insert(format!("{bundle}/{}", scheme_path(project)), synthesis.scheme_text.clone().into_bytes());

    let bytes = write_archive(&contents)?;
    tracing::debug!(project, entries = contents.len(), bytes = bytes.len(), "packaged project");
    Ok(Package {
        filename: archive_filename(project),
        bytes,
        entries: contents.into_keys().collect(),
    })
}

fn write_archive(contents: &BTreeMap<String, Vec<u8>>) -> Result<Vec<u8>, PackageError> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = Builder::new(encoder);
    for (path, bytes) in contents {
        let mut header = Header::new_gnu();
        header.set_size(bytes.len() as u64);
        header.set_mode(ENTRY_MODE);
        header.set_mtime(0);
        header.set_uid(0);
        header.set_gid(0);
        header.set_cksum();
        builder.append_data(&mut header, path, bytes.as_slice())?;
    }
    let encoder = builder.into_inner()?;
    Ok(encoder.finish()?)
}

/// Read every entry of an archive into memory, keyed by path.
pub fn read_entries(bytes: &[u8]) -> Result<BTreeMap<String, Vec<u8>>, PackageError> {
    let mut archive = Archive::new(GzDecoder::new(bytes));
    let mut entries = BTreeMap::new();
    for entry in archive.entries()? {
        let mut entry = entry?;
        let path = entry.path()?.to_string_lossy().to_string();
        let mut data = Vec::new();
        entry.read_to_end(&mut data)?;
        entries.insert(path, data);
    }
    Ok(entries)
}

/// Extract an archive under `dir`. Entries that would escape `dir` are
/// skipped by the tar reader.
pub fn unpack(bytes: &[u8], dir: &Path) -> Result<(), PackageError> {
    let mut archive = Archive::new(GzDecoder::new(bytes));
    archive.unpack(dir)?;
    Ok(())
}

#[cfg(test)]
#[path = "package_tests.rs"]
mod tests;
