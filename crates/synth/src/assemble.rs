// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Builds the project object graph: file references, groups, targets, build
//! phases and configurations for the app and an optional widget extension.

use crate::pbx::{IdGen, ObjectId, PbxGraph, PbxObject, Value};
use crate::rules::Baseline;
use crate::widget::WidgetTargetSpec;
use std::collections::{BTreeMap, BTreeSet};

const ALL_ACTIONS: &str = "2147483647";
/// `dstSubfolderSpec` for the PlugIns folder of an app bundle.
const PLUGINS_FOLDER: &str = "13";
const SWIFT_VERSION: &str = "5.0";
const TOOLS_VERSION: &str = "1500";

/// Everything the descriptor declares.
pub(crate) struct Layout<'a> {
    pub project: &'a str,
    pub bundle_id: &'a str,
    pub development_team: Option<&'a str>,
    pub baseline: Baseline,
    /// Compiled into the app target, relative to the source root.
    pub app_sources: &'a [String],
    pub permissions: &'a BTreeMap<String, String>,
    pub widget: Option<&'a WidgetTargetSpec>,
}

pub(crate) struct Assembled {
    pub graph: PbxGraph,
    pub app_target: ObjectId,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum TargetKind {
    App,
    Extension,
}

impl TargetKind {
    fn product_type(self) -> &'static str {
        match self {
            TargetKind::App => "com.apple.product-type.application",
            TargetKind::Extension => "com.apple.product-type.app-extension",
        }
    }

    fn wrapper(self) -> (&'static str, &'static str) {
        match self {
            TargetKind::App => ("app", "wrapper.application"),
            TargetKind::Extension => ("appex", "wrapper.app-extension"),
        }
    }
}

struct Builder<'a> {
    layout: &'a Layout<'a>,
    ids: IdGen,
    graph: PbxGraph,
    project_id: ObjectId,
    /// File reference per relative path.
    file_refs: BTreeMap<String, ObjectId>,
}

pub(crate) fn assemble(layout: &Layout<'_>) -> Assembled {
    let mut ids = IdGen::new(format!("{}|{}", layout.project, layout.bundle_id));
    let project_id = ids.next("PBXProject", layout.project);
    let builder = Builder {
        layout,
        ids,
        graph: PbxGraph::new(project_id.clone()),
        project_id,
        file_refs: BTreeMap::new(),
    };
    builder.build()
}

impl Builder<'_> {
    fn id(&mut self, kind: &str, key: &str) -> ObjectId {
        self.ids.next(kind, key)
    }

    fn build(mut self) -> Assembled {
        let layout = self.layout;
        let mut all_paths: BTreeSet<&str> = layout.app_sources.iter().map(String::as_str).collect();
        if let Some(widget) = layout.widget {
            all_paths.extend(widget.source_paths.iter().map(String::as_str));
            all_paths.insert(widget.manifest_path.as_str());
        }
        for path in all_paths {
            self.file_reference(path);
        }

        let widget = layout.widget.map(|spec| {
            let settings = self.widget_settings(spec);
            self.target(&spec.name, TargetKind::Extension, &spec.source_paths, settings, None)
        });

        let embed = widget.as_ref().map(|(target, product)| {
            let name = layout.widget.map(|w| w.name.as_str()).unwrap_or_default();
            (self.embed_phase(name, product), self.dependency(name, target))
        });

        let app_settings = self.app_settings();
        let (app_target, app_product) =
            self.target(layout.project, TargetKind::App, layout.app_sources, app_settings, embed);

        let mut products = vec![app_product];
        let mut targets = vec![app_target.clone()];
        if let Some((target, product)) = widget {
            products.push(product);
            targets.push(target);
        }
        let (main_group, products_group) = self.groups(products);
        self.project_object(main_group, products_group, targets);

        Assembled { graph: self.graph, app_target }
    }

    fn file_reference(&mut self, path: &str) -> ObjectId {
        let id = self.id("PBXFileReference", path);
        let name = path.rsplit('/').next().unwrap_or(path);
        let mut object = PbxObject::new("PBXFileReference")
            .comment(name)
            .with("lastKnownFileType", file_type(path))
            .with("path", path)
            .with("sourceTree", "<group>");
        if name != path {
            object = object.with("name", name);
        }
        self.graph.insert(id.clone(), object);
        self.file_refs.insert(path.to_string(), id.clone());
        id
    }

    fn build_file(&mut self, owner: &str, file_ref: &ObjectId, path: &str, phase: &str) -> ObjectId {
        let id = self.id("PBXBuildFile", &format!("{owner}:{phase}:{path}"));
        let name = path.rsplit('/').next().unwrap_or(path);
        self.graph.insert(
            id.clone(),
            PbxObject::new("PBXBuildFile")
                .comment(format!("{name} in {phase}"))
                .with("fileRef", file_ref),
        );
        id
    }

    fn phase(&mut self, owner: &str, isa: &str, name: &str, files: Vec<ObjectId>) -> ObjectId {
        let id = self.id(isa, owner);
        self.graph.insert(
            id.clone(),
            PbxObject::new(isa)
                .comment(name)
                .with("buildActionMask", ALL_ACTIONS)
                .with("files", Value::list(files))
                .with("runOnlyForDeploymentPostprocessing", "0"),
        );
        id
    }

    /// A native target with its product, phases and configurations.
    ///
    /// `embed` carries the copy phase and dependency that pull an extension
    /// into this target.
    fn target(
        &mut self,
        name: &str,
        kind: TargetKind,
        sources: &[String],
        settings: Vec<(String, Value)>,
        embed: Option<(ObjectId, ObjectId)>,
    ) -> (ObjectId, ObjectId) {
        let (ext, file_type) = kind.wrapper();
        let product_name = format!("{name}.{ext}");
        let product = self.id("PBXFileReference", &format!("product:{product_name}"));
        self.graph.insert(
            product.clone(),
            PbxObject::new("PBXFileReference")
                .comment(product_name.as_str())
                .with("explicitFileType", file_type)
                .with("includeInIndex", "0")
                .with("path", product_name.as_str())
                .with("sourceTree", "BUILT_PRODUCTS_DIR"),
        );

        let mut source_files = Vec::new();
        for path in sources {
            if let Some(file_ref) = self.file_refs.get(path).cloned() {
                source_files.push(self.build_file(name, &file_ref, path, "Sources"));
            }
        }
        let mut phases = vec![
            self.phase(name, "PBXSourcesBuildPhase", "Sources", source_files),
            self.phase(name, "PBXFrameworksBuildPhase", "Frameworks", Vec::new()),
            self.phase(name, "PBXResourcesBuildPhase", "Resources", Vec::new()),
        ];
        let mut dependencies = Vec::new();
        if let Some((copy_phase, dependency)) = embed {
            phases.push(copy_phase);
            dependencies.push(dependency);
        }

        let config_list = self.configuration_list("PBXNativeTarget", name, settings.clone(), settings);
        let id = self.id("PBXNativeTarget", name);
        self.graph.insert(
            id.clone(),
            PbxObject::new("PBXNativeTarget")
                .comment(name)
                .with("buildConfigurationList", config_list)
                .with("buildPhases", Value::list(phases))
                .with("buildRules", Value::List(Vec::new()))
                .with("dependencies", Value::list(dependencies))
                .with("name", name)
                .with("productName", name)
                .with("productReference", product.clone())
                .with("productType", kind.product_type()),
        );
        (id, product)
    }

    fn embed_phase(&mut self, extension: &str, product: &ObjectId) -> ObjectId {
        let file_name = format!("{extension}.appex");
        let build_file = self.id("PBXBuildFile", &format!("embed:{file_name}"));
        self.graph.insert(
            build_file.clone(),
            PbxObject::new("PBXBuildFile")
                .comment(format!("{file_name} in Embed Foundation Extensions"))
                .with("fileRef", product)
                .with("settings", Value::map([("ATTRIBUTES", Value::list(["RemoveHeadersOnCopy"]))])),
        );
        let id = self.id("PBXCopyFilesBuildPhase", extension);
        self.graph.insert(
            id.clone(),
            PbxObject::new("PBXCopyFilesBuildPhase")
                .comment("Embed Foundation Extensions")
                .with("buildActionMask", ALL_ACTIONS)
                .with("dstPath", "")
                .with("dstSubfolderSpec", PLUGINS_FOLDER)
                .with("files", Value::list([build_file]))
                .with("name", "Embed Foundation Extensions")
                .with("runOnlyForDeploymentPostprocessing", "0"),
        );
        id
    }

    fn dependency(&mut self, extension: &str, target: &ObjectId) -> ObjectId {
        let proxy = self.id("PBXContainerItemProxy", extension);
        self.graph.insert(
            proxy.clone(),
            PbxObject::new("PBXContainerItemProxy")
                .comment("PBXContainerItemProxy")
                .with("containerPortal", self.project_id.clone())
                .with("proxyType", "1")
                .with("remoteGlobalIDString", target)
                .with("remoteInfo", extension),
        );
        let id = self.id("PBXTargetDependency", extension);
        self.graph.insert(
            id.clone(),
            PbxObject::new("PBXTargetDependency")
                .comment("PBXTargetDependency")
                .with("target", target)
                .with("targetProxy", proxy),
        );
        id
    }

    /// Main group holding the source group and the products group; returns both
    /// the main and products group ids.
    fn groups(&mut self, products: Vec<ObjectId>) -> (ObjectId, ObjectId) {
        let project = self.layout.project;
        let children: Vec<ObjectId> = self.file_refs.values().cloned().collect();
        let source_group = self.id("PBXGroup", "sources");
        self.graph.insert(
            source_group.clone(),
            PbxObject::new("PBXGroup")
                .comment(project)
                .with("children", Value::list(children))
                .with("path", project)
                .with("sourceTree", "<group>"),
        );
        let products_group = self.id("PBXGroup", "products");
        self.graph.insert(
            products_group.clone(),
            PbxObject::new("PBXGroup")
                .comment("Products")
                .with("children", Value::list(products))
                .with("name", "Products")
                .with("sourceTree", "<group>"),
        );
        let main = self.id("PBXGroup", "main");
        self.graph.insert(
            main.clone(),
            PbxObject::new("PBXGroup")
                .with("children", Value::list([source_group, products_group.clone()]))
                .with("sourceTree", "<group>"),
        );
        (main, products_group)
    }

    fn project_object(&mut self, main_group: ObjectId, products_group: ObjectId, targets: Vec<ObjectId>) {
        let project = self.layout.project;
        let debug = project_settings(self.layout, true);
        let release = project_settings(self.layout, false);
        let config_list = self.configuration_list("PBXProject", project, debug, release);
        let object = PbxObject::new("PBXProject")
            .comment("Project object")
            .with(
                "attributes",
                Value::map([
                    ("BuildIndependentTargetsInParallel", "1"),
                    ("LastSwiftUpdateCheck", TOOLS_VERSION),
                    ("LastUpgradeCheck", TOOLS_VERSION),
                ]),
            )
            .with("buildConfigurationList", config_list)
            .with("compatibilityVersion", "Xcode 14.0")
            .with("developmentRegion", "en")
            .with("hasScannedForEncodings", "0")
            .with("knownRegions", Value::list(["en", "Base"]))
            .with("mainGroup", main_group)
            .with("productRefGroup", products_group)
            .with("projectDirPath", "")
            .with("projectRoot", "")
            .with("targets", Value::list(targets));
        self.graph.insert(self.project_id.clone(), object);
    }

    fn configuration_list(
        &mut self,
        owner_isa: &str,
        owner: &str,
        debug: Vec<(String, Value)>,
        release: Vec<(String, Value)>,
    ) -> ObjectId {
        let mut configs = Vec::new();
        for (name, settings) in [("Debug", debug), ("Release", release)] {
            let id = self.id("XCBuildConfiguration", &format!("{owner_isa}:{owner}:{name}"));
            self.graph.insert(
                id.clone(),
                PbxObject::new("XCBuildConfiguration")
                    .comment(name)
                    .with("buildSettings", Value::Map(settings))
                    .with("name", name),
            );
            configs.push(id);
        }
        let id = self.id("XCConfigurationList", &format!("{owner_isa}:{owner}"));
        self.graph.insert(
            id.clone(),
            PbxObject::new("XCConfigurationList")
                .comment(format!("Build configuration list for {owner_isa} \"{owner}\""))
                .with("buildConfigurations", Value::list(configs))
                .with("defaultConfigurationIsVisible", "0")
                .with("defaultConfigurationName", "Release"),
        );
        id
    }

    fn app_settings(&self) -> Vec<(String, Value)> {
        let layout = self.layout;
        let mut settings = common_target_settings(layout, layout.bundle_id);
        settings.extend(strings([
            ("INFOPLIST_KEY_UIApplicationSceneManifest_Generation", "YES"),
            ("INFOPLIST_KEY_UIApplicationSupportsIndirectInputEvents", "YES"),
            ("INFOPLIST_KEY_UILaunchScreen_Generation", "YES"),
            (
                "INFOPLIST_KEY_UISupportedInterfaceOrientations_iPad",
                "UIInterfaceOrientationPortrait UIInterfaceOrientationPortraitUpsideDown UIInterfaceOrientationLandscapeLeft UIInterfaceOrientationLandscapeRight",
            ),
            (
                "INFOPLIST_KEY_UISupportedInterfaceOrientations_iPhone",
                "UIInterfaceOrientationPortrait UIInterfaceOrientationLandscapeLeft UIInterfaceOrientationLandscapeRight",
            ),
        ]));
        if layout.widget.is_some() {
            settings.push(("INFOPLIST_KEY_NSSupportsLiveActivities".into(), "YES".into()));
        }
        for (key, description) in layout.permissions {
            settings.push((format!("INFOPLIST_KEY_{key}"), description.into()));
        }
        settings.push((
            "LD_RUNPATH_SEARCH_PATHS".into(),
            Value::list(["$(inherited)", "@executable_path/Frameworks"]),
        ));
        settings
    }

    fn widget_settings(&self, spec: &WidgetTargetSpec) -> Vec<(String, Value)> {
        let mut settings = common_target_settings(self.layout, &spec.bundle_id);
        settings.extend(strings([
            ("INFOPLIST_FILE", format!("{}/{}", self.layout.project, spec.manifest_path).as_str()),
            ("INFOPLIST_KEY_CFBundleDisplayName", spec.name.as_str()),
            ("INFOPLIST_KEY_NSHumanReadableCopyright", ""),
            ("SKIP_INSTALL", "YES"),
        ]));
        settings.push((
            "LD_RUNPATH_SEARCH_PATHS".into(),
            Value::list(["$(inherited)", "@executable_path/Frameworks", "@executable_path/../../Frameworks"]),
        ));
        settings
    }
}

fn strings<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Vec<(String, Value)> {
    pairs.into_iter().map(|(k, v)| (k.to_string(), Value::from(v))).collect()
}

fn common_target_settings(layout: &Layout<'_>, bundle_id: &str) -> Vec<(String, Value)> {
    let mut settings = strings([
        ("CODE_SIGN_STYLE", "Automatic"),
        ("CURRENT_PROJECT_VERSION", "1"),
        ("GENERATE_INFOPLIST_FILE", "YES"),
        ("MARKETING_VERSION", "1.0"),
        ("PRODUCT_BUNDLE_IDENTIFIER", bundle_id),
        ("PRODUCT_NAME", "$(TARGET_NAME)"),
        ("SWIFT_EMIT_LOC_STRINGS", "YES"),
        ("SWIFT_VERSION", SWIFT_VERSION),
        ("TARGETED_DEVICE_FAMILY", "1,2"),
    ]);
    settings.push(("IPHONEOS_DEPLOYMENT_TARGET".into(), layout.baseline.to_string().into()));
    if let Some(team) = layout.development_team {
        settings.push(("DEVELOPMENT_TEAM".into(), team.into()));
    }
    settings
}

fn project_settings(layout: &Layout<'_>, debug: bool) -> Vec<(String, Value)> {
    let mut settings = strings([
        ("ALWAYS_SEARCH_USER_PATHS", "NO"),
        ("CLANG_ENABLE_MODULES", "YES"),
        ("CLANG_ENABLE_OBJC_ARC", "YES"),
        ("ENABLE_STRICT_OBJC_MSGSEND", "YES"),
        ("ENABLE_USER_SCRIPT_SANDBOXING", "YES"),
        ("GCC_C_LANGUAGE_STANDARD", "gnu17"),
        ("LOCALIZATION_PREFERS_STRING_CATALOGS", "YES"),
        ("MTL_FAST_MATH", "YES"),
        ("SDKROOT", "iphoneos"),
    ]);
    settings.push(("IPHONEOS_DEPLOYMENT_TARGET".into(), layout.baseline.to_string().into()));
    if debug {
        settings.extend(strings([
            ("COPY_PHASE_STRIP", "NO"),
            ("DEBUG_INFORMATION_FORMAT", "dwarf"),
            ("ENABLE_TESTABILITY", "YES"),
            ("GCC_DYNAMIC_NO_PIC", "NO"),
            ("GCC_OPTIMIZATION_LEVEL", "0"),
            ("MTL_ENABLE_DEBUG_INFO", "INCLUDE_SOURCE"),
            ("ONLY_ACTIVE_ARCH", "YES"),
            ("SWIFT_ACTIVE_COMPILATION_CONDITIONS", "DEBUG $(inherited)"),
            ("SWIFT_OPTIMIZATION_LEVEL", "-Onone"),
        ]));
        settings.push(("GCC_PREPROCESSOR_DEFINITIONS".into(), Value::list(["DEBUG=1", "$(inherited)"])));
    } else {
        settings.extend(strings([
            ("COPY_PHASE_STRIP", "NO"),
            ("DEBUG_INFORMATION_FORMAT", "dwarf-with-dsym"),
            ("ENABLE_NS_ASSERTIONS", "NO"),
            ("MTL_ENABLE_DEBUG_INFO", "NO"),
            ("SWIFT_COMPILATION_MODE", "wholemodule"),
            ("VALIDATE_PRODUCT", "YES"),
        ]));
    }
    settings
}

/// `lastKnownFileType` for a path.
fn file_type(path: &str) -> &'static str {
    match path.rsplit_once('.').map(|(_, ext)| ext) {
        Some("swift") => "sourcecode.swift",
        Some("plist") => "text.plist.xml",
        Some("json") => "text.json",
        _ => "text",
    }
}

#[cfg(test)]
#[path = "assemble_tests.rs"]
mod tests;
