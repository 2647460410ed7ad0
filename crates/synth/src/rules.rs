// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Declarative `{patterns, effect}` tables scanned over combined source text.

use nb_core::RuleTable;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

// ── Deployment baseline ─────────────────────────────────────────────────

/// An iOS deployment target such as `16.2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Baseline {
    pub major: u16,
    pub minor: u16,
}

impl Baseline {
    pub const DEFAULT: Baseline = Baseline::new(16, 0);
    /// Lowest target that runs live activities.
    pub const WIDGET: Baseline = Baseline::new(16, 2);
    /// Target required by the newer UI system markers.
    pub const MODERN_UI: Baseline = Baseline::new(17, 0);

    pub const fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }

    /// Parse `"17"` or `"16.2"`; anything else is `None`.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let (major, minor) = s.split_once('.').unwrap_or((s, "0"));
        Some(Self::new(major.parse().ok()?, minor.parse().ok()?))
    }
}

impl fmt::Display for Baseline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl TryFrom<String> for Baseline {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Baseline::parse(&s).ok_or_else(|| format!("invalid deployment baseline: {s:?}"))
    }
}

impl From<Baseline> for String {
    fn from(baseline: Baseline) -> Self {
        baseline.to_string()
    }
}

const BASELINE_TABLE: &[(&[&str], Baseline)] = &[(
    &[
        r"@Observable\b",
        r"import\s+SwiftData\b",
        r"@Model\b",
        r"#Preview\b",
        r"\.containerRelativeFrame\b",
        r"@Bindable\b",
        r"\.scrollPosition\(",
    ],
    Baseline::MODERN_UI,
)];

#[allow(clippy::expect_used)]
static BASELINE_MARKERS: LazyLock<RuleTable<Baseline>> =
    LazyLock::new(|| RuleTable::new(BASELINE_TABLE).expect("constant regex pattern is valid"));

/// Baseline implied by API markers in the source text.
pub fn detect_baseline(text: &str) -> Baseline {
    BASELINE_MARKERS.first(text).map(|hit| *hit.effect).unwrap_or(Baseline::DEFAULT)
}

// ── Privacy permissions ─────────────────────────────────────────────────

/// A usage-description key the app manifest needs, and the text used when
/// the caller supplies none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permission {
    pub key: &'static str,
    pub default_description: &'static str,
}

const fn permission(key: &'static str, default_description: &'static str) -> Permission {
    Permission { key, default_description }
}

const PRIVACY_TABLE: &[(&[&str], Permission)] = &[
    (
        &[r"AVCaptureDevice", r"AVCaptureSession", r"\.sourceType\s*=\s*\.camera", r"DataScannerViewController"],
        permission("NSCameraUsageDescription", "This app uses the camera to capture photos and video."),
    ),
    (
        &[r"PhotosPicker", r"PHPickerViewController", r"PHPhotoLibrary", r"UIImagePickerController"],
        permission("NSPhotoLibraryUsageDescription", "This app accesses your photo library to choose images."),
    ),
    (
        &[r"UIImageWriteToSavedPhotosAlbum", r"PHAssetChangeRequest"],
        permission("NSPhotoLibraryAddUsageDescription", "This app saves images to your photo library."),
    ),
    (
        &[r"CLLocationManager", r"requestWhenInUseAuthorization", r"CLLocationUpdate", r"CLMonitor\b"],
        permission("NSLocationWhenInUseUsageDescription", "This app uses your location to show nearby information."),
    ),
    (
        &[r"AVAudioRecorder", r"AVAudioEngine", r"requestRecordPermission", r"AVAudioApplication\.requestRecordPermission"],
        permission("NSMicrophoneUsageDescription", "This app uses the microphone to record audio."),
    ),
    (
        &[r"CNContactStore", r"CNContactPickerViewController", r"import\s+Contacts\b"],
        permission("NSContactsUsageDescription", "This app accesses your contacts."),
    ),
    (
        &[r"EKEventStore", r"import\s+EventKit\b"],
        permission("NSCalendarsUsageDescription", "This app accesses your calendar to manage events."),
    ),
    (
        &[r"CMMotionManager", r"CMPedometer", r"CMMotionActivityManager"],
        permission("NSMotionUsageDescription", "This app uses motion data to track activity."),
    ),
    (
        &[r"LAContext", r"\.evaluatePolicy\("],
        permission("NSFaceIDUsageDescription", "This app uses Face ID to keep your data secure."),
    ),
    (
        &[r"SFSpeechRecognizer", r"import\s+Speech\b"],
        permission("NSSpeechRecognitionUsageDescription", "This app uses speech recognition to transcribe audio."),
    ),
    (
        &[r"HKHealthStore", r"import\s+HealthKit\b"],
        permission("NSHealthShareUsageDescription", "This app reads health data to show your progress."),
    ),
    (
        &[r"CBCentralManager", r"CBPeripheralManager", r"import\s+CoreBluetooth\b"],
        permission("NSBluetoothAlwaysUsageDescription", "This app uses Bluetooth to connect to nearby devices."),
    ),
];

#[allow(clippy::expect_used)]
static PRIVACY_RULES: LazyLock<RuleTable<Permission>> =
    LazyLock::new(|| RuleTable::new(PRIVACY_TABLE).expect("constant regex pattern is valid"));

/// Usage-description keys required by the source text, with default text.
///
/// Keys are independent: every rule that matches contributes its key.
pub fn detect_permissions(text: &str) -> BTreeMap<String, String> {
    PRIVACY_RULES
        .hits(text)
        .map(|hit| (hit.effect.key.to_string(), hit.effect.default_description.to_string()))
        .collect()
}

/// The privacy rule table, for listing and tests.
pub fn privacy_rules() -> &'static RuleTable<Permission> {
    &PRIVACY_RULES
}

#[cfg(test)]
#[path = "rules_tests.rs"]
mod tests;
