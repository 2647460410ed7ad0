// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remediation hints per category.

use crate::classify::extract_symbol;
use nb_core::{ErrorCategory, RuleTable};
use std::sync::LazyLock;

/// Symbol shape → framework that declares it.
const FRAMEWORK_TABLE: &[(&[&str], &str)] = &[
    (
        &[
            r"^(?:View|Text|Color|Image|Button|Label|List|Form|Section|Toggle|Picker|Slider|Stepper|Spacer|Divider)$",
            r"^(?:VStack|HStack|ZStack|LazyVStack|LazyHStack|LazyVGrid|LazyHGrid|GridItem|ScrollView|GeometryReader)$",
            r"^(?:NavigationStack|NavigationView|NavigationLink|NavigationPath|TabView|Sheet|Alert)$",
            r"^(?:State|Binding|StateObject|ObservedObject|EnvironmentObject|Environment|AppStorage|FocusState)$",
            r"^(?:App|Scene|WindowGroup|ViewBuilder|ViewModifier|Font|Angle|Animation|LinearGradient)$",
        ],
        "SwiftUI",
    ),
    (&[r"^(?:Model|ModelContainer|ModelContext|Query|FetchDescriptor|Relationship|Attribute)$"], "SwiftData"),
    (&[r"^(?:Observable|ObservationIgnored|Bindable)$"], "Observation"),
    (&[r"^(?:AnyCancellable|PassthroughSubject|CurrentValueSubject|Published|ObservableObject)$"], "Combine"),
    (&[r"^(?:Chart|BarMark|LineMark|PointMark|AreaMark|RuleMark|SectorMark|RectangleMark)$"], "Charts"),
    (&[r"^(?:Map|MapMarker|MapAnnotation|MapCameraPosition|Marker|Annotation)$", r"^MK[A-Z]\w*$"], "MapKit"),
    (&[r"^CL[A-Z]\w*$"], "CoreLocation"),
    (&[r"^AV[A-Z]\w*$"], "AVFoundation"),
    (&[r"^(?:PhotosPicker|PhotosPickerItem)$", r"^PHPicker\w*$"], "PhotosUI"),
    (&[r"^PH[A-Z]\w*$"], "Photos"),
    (&[r"^(?:Activity|ActivityAttributes|ActivityContent|ActivityState)$"], "ActivityKit"),
    (
        &[r"^(?:Widget|WidgetBundle|WidgetConfiguration|StaticConfiguration|ActivityConfiguration|WidgetCenter)$", r"^Timeline\w*$"],
        "WidgetKit",
    ),
    (&[r"^UN[A-Z]\w*$"], "UserNotifications"),
    (&[r"^HK[A-Z]\w*$"], "HealthKit"),
    (&[r"^CN[A-Z]\w*$"], "Contacts"),
    (&[r"^EK[A-Z]\w*$"], "EventKit"),
    (&[r"^CM[A-Z]\w*$"], "CoreMotion"),
    (&[r"^LA[A-Z]\w*$"], "LocalAuthentication"),
    (&[r"^SF[A-Z]\w*$"], "Speech"),
    (&[r"^CB[A-Z]\w*$"], "CoreBluetooth"),
    (&[r"^(?:Product|Transaction|AppStore)$", r"^SK[A-Z]\w*$"], "StoreKit"),
    (&[r"^NS(?:ManagedObject\w*|PersistentContainer|FetchRequest\w*)$", r"^FetchRequest$"], "CoreData"),
    (&[r"^UI[A-Z]\w*$"], "UIKit"),
    (
        &[r"^(?:Date|URL|UUID|Data|JSONDecoder|JSONEncoder|UserDefaults|NotificationCenter|DateFormatter|Timer|Locale)$"],
        "Foundation",
    ),
];

#[allow(clippy::expect_used)]
static FRAMEWORKS: LazyLock<RuleTable<&'static str>> =
    LazyLock::new(|| RuleTable::new(FRAMEWORK_TABLE).expect("constant regex pattern is valid"));

/// Deprecated API → current replacement. Matched as substrings; the longest
/// hit is the most specific.
const DEPRECATED_TABLE: &[(&str, &str)] = &[
    ("NavigationView", "NavigationStack"),
    ("NavigationLink(destination:isActive:", "navigationDestination(isPresented:destination:)"),
    ("navigationBarTitle", "navigationTitle"),
    ("navigationBarItems", "toolbar"),
    ("foregroundColor", "foregroundStyle"),
    ("accentColor", "tint"),
    ("cornerRadius", "clipShape(.rect(cornerRadius:))"),
    ("edgesIgnoringSafeArea", "ignoresSafeArea"),
    ("onChange", "onChange(of:initial:_:)"),
    ("onChange(of:perform:)", "onChange(of:) { oldValue, newValue in }"),
    ("actionSheet", "confirmationDialog"),
    ("alert(isPresented:content:)", "alert(_:isPresented:actions:message:)"),
    ("autocapitalization", "textInputAutocapitalization"),
    ("UIScreen.main", "the window scene's screen"),
    ("PreviewProvider", "#Preview"),
];

/// Framework that declares `symbol`, if known.
pub fn framework_for(symbol: &str) -> Option<&'static str> {
    FRAMEWORKS.first(symbol).map(|hit| *hit.effect)
}

/// The most specific deprecated API named in `message` and its replacement.
pub fn replacement_for(message: &str) -> Option<(&'static str, &'static str)> {
    let lowered = message.to_lowercase();
    DEPRECATED_TABLE
        .iter()
        .filter(|(old, _)| lowered.contains(&old.to_lowercase()))
        .max_by_key(|(old, _)| old.len())
        .copied()
}

/// Remediation hint for a diagnostic.
pub fn suggestion(category: ErrorCategory, message: &str) -> String {
    match category {
        ErrorCategory::MissingImport => match extract_symbol(category, message) {
            Some(symbol) => match framework_for(&symbol) {
                Some(framework) => format!("Add `import {framework}` to the file that uses `{symbol}`."),
                None => format!(
                    "`{symbol}` is not declared in scope. Declare it in the project or import the module that provides it."
                ),
            },
            None => "Declare the missing symbol or import the module that provides it.".to_string(),
        },
        ErrorCategory::MemberNotFound => match extract_symbol(category, message) {
            Some(member) => format!(
                "`{member}` is not a member of that type. Check the spelling or add `{member}` to the type."
            ),
            None => "The referenced member does not exist on that type. Check the spelling.".to_string(),
        },
        ErrorCategory::DeprecatedApi => match replacement_for(message) {
            Some((old, new)) => format!("Replace `{old}` with `{new}`."),
            None => "Replace the deprecated API with the alternative named in the warning.".to_string(),
        },
        ErrorCategory::TypeMismatch => {
            "Convert the value to the expected type or change the declaration so the types agree.".to_string()
        }
        ErrorCategory::TrailingClosure => {
            "Pass the closure as a labeled argument or remove the extra trailing closure.".to_string()
        }
        ErrorCategory::MissingConformance => {
            "Declare the missing protocol conformance on the type and implement its requirements.".to_string()
        }
        ErrorCategory::MissingReturn => {
            "Return a value on every path, or wrap a multi-statement view body in a container view.".to_string()
        }
        ErrorCategory::AmbiguousReference => {
            "Add an explicit type annotation or qualify the name with its module.".to_string()
        }
        ErrorCategory::ArgumentMismatch => {
            "Match the argument labels and count to the function's declaration.".to_string()
        }
        ErrorCategory::BindingError => {
            "Pass a binding with `$` where a Binding is expected, or use `.constant(_:)` in previews.".to_string()
        }
        ErrorCategory::Other => "No automatic hint for this diagnostic; read the full compiler message.".to_string(),
    }
}

#[cfg(test)]
#[path = "suggest_tests.rs"]
mod tests;
