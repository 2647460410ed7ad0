// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Project synthesis: from a flat set of generated sources to a descriptor,
//! a shared scheme and the list of files the package must carry.

use crate::assemble::{assemble, Layout};
use crate::naming::{bundle_id_or_default, sanitize_project_name};
use crate::pbx::{self, PbxError};
use crate::rules::{detect_baseline, detect_permissions, Baseline};
use crate::scheme;
use crate::widget::{self, ActivityAttributes, WidgetTargetSpec};
use nb_core::{validate_file_set, BuildRequest, FileSetError, SourceFile};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// File name of the widget manifest inside the widget directory.
const MANIFEST_FILE: &str = "Info.plist";

#[derive(Debug, Error)]
pub enum SynthError {
    #[error("no Swift source files to compile")]
    NoSourceFiles,

    #[error("invalid file set: {0}")]
    InvalidFileSet(#[from] FileSetError),

    #[error("descriptor failed validation: {0}")]
    Descriptor(#[from] PbxError),
}

/// Caller-side description of the project to synthesize.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSpec {
    pub project_name: String,
    pub bundle_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub development_team: Option<String>,
    /// Used only when higher than what the sources imply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_baseline: Option<Baseline>,
    /// Descriptions that replace the default text for detected keys.
    #[serde(default)]
    pub privacy_permissions: BTreeMap<String, String>,
    /// Overrides the derived widget target name and bundle id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget_target: Option<WidgetTargetSpec>,
}

impl ProjectSpec {
    pub fn new(project_name: impl Into<String>, bundle_id: impl Into<String>) -> Self {
        Self { project_name: project_name.into(), bundle_id: bundle_id.into(), ..Self::default() }
    }

    nb_core::setters! {
        option {
            development_team: String,
            deployment_baseline: Baseline,
            widget_target: WidgetTargetSpec,
        }
    }

    pub fn permission(mut self, key: impl Into<String>, description: impl Into<String>) -> Self {
        self.privacy_permissions.insert(key.into(), description.into());
        self
    }

    pub fn from_request(request: &BuildRequest) -> Self {
        Self {
            project_name: request.project_name.clone(),
            bundle_id: request.bundle_id.clone(),
            development_team: request.development_team.clone(),
            ..Self::default()
        }
    }
}

/// Result of synthesis; everything the exporter needs besides the sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Synthesis {
    /// Sanitized project and main target name.
    pub project_name: String,
    pub bundle_id: String,
    pub descriptor_text: String,
    pub scheme_text: String,
    /// Every path the descriptor references, as `<Project>/<relative path>`.
    pub included_paths: Vec<String>,
    pub privacy_permissions: BTreeMap<String, String>,
    /// Synthesized files (widget sources and manifest), relative to the
    /// source root.
    pub auxiliary_files: Vec<SourceFile>,
    pub deployment_baseline: Baseline,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget: Option<WidgetTargetSpec>,
}

impl Synthesis {
    /// Directory of the descriptor bundle, `<Project>.xcodeproj`.
    pub fn bundle_dir(&self) -> String {
        format!("{}.xcodeproj", self.project_name)
    }
}

/// Synthesize a project descriptor for `files`.
///
/// Non-Swift files are ignored. Paths are normalized first; an invalid or
/// duplicate path fails the whole set.
pub fn synthesize(files: &[SourceFile], spec: &ProjectSpec) -> Result<Synthesis, SynthError> {
    let files = validate_file_set(files)?;
    let swift: Vec<SourceFile> = files.into_iter().filter(SourceFile::is_swift).collect();
    if swift.is_empty() {
        return Err(SynthError::NoSourceFiles);
    }

    let project = sanitize_project_name(&spec.project_name);
    let bundle_id = bundle_id_or_default(&spec.bundle_id);
    let combined: String = swift.iter().map(|f| f.content.as_str()).collect::<Vec<_>>().join("\n");

    let (app_files, widget_files) = widget::partition(&swift);
    let attributes = widget::detect_activity_attributes(&swift);
    let mut auxiliary_files = Vec::new();
    let widget = plan_widget(&project, &bundle_id, spec, &app_files, &widget_files, attributes.as_ref())
        .map(|(target, synthesized)| {
            auxiliary_files.extend(synthesized);
            auxiliary_files.push(SourceFile::new(target.manifest_path.clone(), widget::manifest()));
            target
        });

    let mut baseline = detect_baseline(&combined);
    if widget.is_some() {
        baseline = baseline.max(Baseline::WIDGET);
    }
    if let Some(requested) = spec.deployment_baseline {
        baseline = baseline.max(requested);
    }

    let mut privacy_permissions = detect_permissions(&combined);
    for (key, description) in &spec.privacy_permissions {
        privacy_permissions.insert(key.clone(), description.clone());
    }

    let app_sources: Vec<String> = app_files.iter().map(|f| f.path.clone()).collect();
    let assembled = assemble(&Layout {
        project: &project,
        bundle_id: &bundle_id,
        development_team: spec.development_team.as_deref(),
        baseline,
        app_sources: &app_sources,
        permissions: &privacy_permissions,
        widget: widget.as_ref(),
    });

    let included: BTreeSet<String> = swift
        .iter()
        .chain(auxiliary_files.iter())
        .map(|f| format!("{project}/{}", f.path))
        .collect();
    assembled.graph.validate(&included)?;

    let descriptor_text = pbx::serialize(&assembled.graph);
    let scheme_text = scheme::scheme(&project, &assembled.app_target);
    tracing::debug!(
        project = %project,
        sources = swift.len(),
        auxiliary = auxiliary_files.len(),
        baseline = %baseline,
        widget = widget.is_some(),
        "synthesized project descriptor"
    );

    Ok(Synthesis {
        project_name: project,
        bundle_id,
        descriptor_text,
        scheme_text,
        included_paths: included.into_iter().collect(),
        privacy_permissions,
        auxiliary_files,
        deployment_baseline: baseline,
        widget,
    })
}

/// Decide the widget target, if any, and the widget sources to synthesize.
///
/// Supplied widget files win; otherwise a detected attributes type gets a
/// minimal synthesized bundle. The file declaring the attributes type is
/// compiled into both targets.
fn plan_widget(
    project: &str,
    bundle_id: &str,
    spec: &ProjectSpec,
    app_files: &[SourceFile],
    widget_files: &[SourceFile],
    attributes: Option<&ActivityAttributes>,
) -> Option<(WidgetTargetSpec, Vec<SourceFile>)> {
    let (dir, synthesized) = match (widget_files.first(), attributes) {
        (Some(first), _) => (first.top_dir().unwrap_or_default().to_string(), Vec::new()),
        (None, Some(attributes)) => {
            (widget::target_name(project), widget::synthesize_sources(project, attributes))
        }
        (None, None) => return None,
    };

    let mut source_paths: Vec<String> =
        widget_files.iter().chain(synthesized.iter()).map(|f| f.path.clone()).collect();
    if let Some(attributes) = attributes {
        let declared_in_app = app_files.iter().any(|f| f.path == attributes.path);
        if declared_in_app && !source_paths.contains(&attributes.path) {
            source_paths.push(attributes.path.clone());
        }
    }

    let (name, widget_bundle_id) = match &spec.widget_target {
        Some(target) => (target.name.clone(), target.bundle_id.clone()),
        None => (widget::target_name(project), widget::bundle_id(bundle_id)),
    };
    let target = WidgetTargetSpec {
        name,
        bundle_id: widget_bundle_id,
        source_paths,
        manifest_path: format!("{dir}/{MANIFEST_FILE}"),
    };
    Some((target, synthesized))
}

/// What a serialized descriptor declares, read back from its text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inspection {
    pub object_count: usize,
    pub isa_counts: BTreeMap<String, usize>,
    /// Source file paths resolved through the group tree.
    pub file_paths: Vec<String>,
    pub target_names: Vec<String>,
    pub dangling: Vec<String>,
    pub infoplist_paths: Vec<String>,
}

/// Parse descriptor text and report its declared objects and references.
pub fn inspect(descriptor_text: &str) -> Result<Inspection, PbxError> {
    let graph = pbx::read(descriptor_text)?;
    let mut isa_counts = BTreeMap::new();
    for object in graph.objects.values() {
        *isa_counts.entry(object.isa.clone()).or_insert(0) += 1;
    }
    Ok(Inspection {
        object_count: graph.objects.len(),
        isa_counts,
        file_paths: graph.file_paths().into_iter().map(|(path, _)| path).collect(),
        target_names: graph.target_names(),
        dangling: graph.dangling().iter().map(|id| id.to_string()).collect(),
        infoplist_paths: graph.setting_values("INFOPLIST_FILE"),
    })
}

#[cfg(test)]
#[path = "synthesize_tests.rs"]
mod tests;
