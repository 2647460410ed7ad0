// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Widget extension target: source partitioning, live-activity detection and
//! the minimal bundle synthesized when only the attributes type exists.

use nb_core::SourceFile;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Directory names that place a file in the widget target.
const WIDGET_DIR_SUFFIXES: &[&str] = &["WidgetExtension", "Widgets", "Widget"];

/// `struct DeliveryAttributes: ActivityAttributes` and variants with other
/// conformances listed first.
#[allow(clippy::expect_used)]
static ACTIVITY_ATTRIBUTES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"struct\s+([A-Za-z_][A-Za-z0-9_]*)\s*:\s*(?:[A-Za-z0-9_.]+\s*,\s*)*ActivityAttributes\b")
        .expect("constant regex pattern is valid")
});

/// The secondary target embedded in the app bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetTargetSpec {
    pub name: String,
    pub bundle_id: String,
    /// Paths compiled into the widget target, relative to the source root.
    pub source_paths: Vec<String>,
    /// Widget manifest (Info.plist), relative to the source root.
    pub manifest_path: String,
}

impl WidgetTargetSpec {
    /// Directory holding the widget manifest.
    pub fn dir(&self) -> &str {
        self.manifest_path.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
    }
}

/// Whether a path's first component names a widget directory.
pub fn is_widget_path(path: &str) -> bool {
    match path.split_once('/') {
        Some((dir, _)) => WIDGET_DIR_SUFFIXES.iter().any(|suffix| dir.ends_with(suffix)),
        None => false,
    }
}

/// Split sources into `(app, widget)` by directory convention, keeping order.
pub fn partition(files: &[SourceFile]) -> (Vec<SourceFile>, Vec<SourceFile>) {
    files.iter().cloned().partition(|f| !is_widget_path(&f.path))
}

/// A detected `ActivityAttributes` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityAttributes {
    pub type_name: String,
    /// File that declares the type.
    pub path: String,
}

/// Find the first `ActivityAttributes` declaration across the files, in order.
pub fn detect_activity_attributes(files: &[SourceFile]) -> Option<ActivityAttributes> {
    files.iter().find_map(|file| {
        ACTIVITY_ATTRIBUTES.captures(&file.content).and_then(|caps| {
            caps.get(1).map(|m| ActivityAttributes {
                type_name: m.as_str().to_string(),
                path: file.path.clone(),
            })
        })
    })
}

/// Name of the widget target for a project.
pub fn target_name(project: &str) -> String {
    format!("{project}Widget")
}

/// Bundle id of the widget extension, nested under the app's.
pub fn bundle_id(app_bundle_id: &str) -> String {
    format!("{app_bundle_id}.widget")
}

/// Minimal widget bundle and live-activity view for `attributes`.
pub fn synthesize_sources(project: &str, attributes: &ActivityAttributes) -> Vec<SourceFile> {
    let dir = target_name(project);
    let bundle = BUNDLE_TEMPLATE.replace("{project}", project);
    let activity = LIVE_ACTIVITY_TEMPLATE
        .replace("{project}", project)
        .replace("{attributes}", &attributes.type_name);
    vec![
        SourceFile::new(format!("{dir}/{project}WidgetBundle.swift"), bundle),
        SourceFile::new(format!("{dir}/{project}LiveActivity.swift"), activity),
    ]
}

const BUNDLE_TEMPLATE: &str = r#"import WidgetKit
import SwiftUI

@main
struct {project}WidgetBundle: WidgetBundle {
    var body: some Widget {
        {project}LiveActivity()
    }
}
"#;

const LIVE_ACTIVITY_TEMPLATE: &str = r#"import ActivityKit
import WidgetKit
import SwiftUI

struct {project}LiveActivity: Widget {
    var body: some WidgetConfiguration {
        ActivityConfiguration(for: {attributes}.self) { context in
            VStack(alignment: .leading) {
                Text("{project}")
                    .font(.headline)
                Text("Live")
                    .font(.caption)
            }
            .padding()
        } dynamicIsland: { context in
            DynamicIsland {
                DynamicIslandExpandedRegion(.center) {
                    Text("{project}")
                }
            } compactLeading: {
                Image(systemName: "bolt.fill")
            } compactTrailing: {
                Text("Live")
            } minimal: {
                Image(systemName: "bolt.fill")
            }
        }
    }
}
"#;

/// Widget extension manifest declaring the WidgetKit extension point.
pub fn manifest() -> String {
    concat!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
        "<!DOCTYPE plist PUBLIC \"-//Apple//DTD PLIST 1.0//EN\" \"http://www.apple.com/DTDs/PropertyList-1.0.dtd\">\n",
        "<plist version=\"1.0\">\n",
        "<dict>\n",
        "\t<key>NSExtension</key>\n",
        "\t<dict>\n",
        "\t\t<key>NSExtensionPointIdentifier</key>\n",
        "\t\t<string>com.apple.widgetkit-extension</string>\n",
        "\t</dict>\n",
        "</dict>\n",
        "</plist>\n",
    )
    .to_string()
}

#[cfg(test)]
#[path = "widget_tests.rs"]
mod tests;
