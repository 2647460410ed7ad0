// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    plain = { "struct A: View {}", "16.0" },
    observable = { "@Observable class Store {}", "17.0" },
    swiftdata = { "import SwiftData", "17.0" },
    model = { "@Model final class Item {}", "17.0" },
    preview = { "#Preview { ContentView() }", "17.0" },
    relative_frame = { "Text(\"a\").containerRelativeFrame(.horizontal)", "17.0" },
    bindable = { "@Bindable var store: Store", "17.0" },
    scroll_position = { "ScrollView {}.scrollPosition(id: $id)", "17.0" },
    observable_object = { "class Store: ObservableObject {}", "16.0" },
)]
fn baseline(source: &str, expected: &str) {
    assert_eq!(detect_baseline(source).to_string(), expected);
}

#[yare::parameterized(
    whole = { "17", Some(Baseline::new(17, 0)) },
    minor = { "16.2", Some(Baseline::new(16, 2)) },
    padded = { " 15.4 ", Some(Baseline::new(15, 4)) },
    garbage = { "latest", None },
    empty = { "", None },
)]
fn baseline_parse(input: &str, expected: Option<Baseline>) {
    assert_eq!(Baseline::parse(input), expected);
}

#[test]
fn baselines_order() {
    assert!(Baseline::DEFAULT < Baseline::WIDGET);
    assert!(Baseline::WIDGET < Baseline::MODERN_UI);
}

#[test]
fn independent_permissions_all_match() {
    let source = "let session = AVCaptureSession()\nlet manager = CLLocationManager()\n";
    let perms = detect_permissions(source);
    let keys: Vec<&str> = perms.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["NSCameraUsageDescription", "NSLocationWhenInUseUsageDescription"]);
}

#[test]
fn no_permissions_for_plain_views() {
    assert!(detect_permissions("struct ContentView: View { var body: some View { Text(\"hi\") } }").is_empty());
}

#[yare::parameterized(
    photos_picker = { "PhotosPicker(selection: $item) { Text(\"Pick\") }", "NSPhotoLibraryUsageDescription" },
    recorder = { "let recorder = try AVAudioRecorder(url: url, settings: [:])", "NSMicrophoneUsageDescription" },
    contacts = { "let store = CNContactStore()", "NSContactsUsageDescription" },
    calendar = { "let store = EKEventStore()", "NSCalendarsUsageDescription" },
    motion = { "let pedometer = CMPedometer()", "NSMotionUsageDescription" },
    face_id = { "let context = LAContext()", "NSFaceIDUsageDescription" },
    speech = { "SFSpeechRecognizer(locale: .current)", "NSSpeechRecognitionUsageDescription" },
    health = { "let store = HKHealthStore()", "NSHealthShareUsageDescription" },
    bluetooth = { "CBCentralManager(delegate: self, queue: nil)", "NSBluetoothAlwaysUsageDescription" },
)]
fn permission_rule(source: &str, key: &str) {
    let perms = detect_permissions(source);
    assert!(perms.contains_key(key), "{key} not detected in {source:?}: {perms:?}");
    assert!(!perms[key].is_empty());
}

#[test]
fn every_privacy_rule_has_usage_key() {
    assert!(!privacy_rules().is_empty());
    let text = "AVCaptureSession PHPhotoLibrary UIImageWriteToSavedPhotosAlbum CLLocationManager AVAudioEngine \
                CNContactStore EKEventStore CMMotionManager LAContext SFSpeechRecognizer HKHealthStore CBCentralManager";
    let hits: Vec<_> = privacy_rules().hits(text).collect();
    assert_eq!(hits.len(), privacy_rules().len());
    assert!(hits.iter().all(|h| h.effect.key.starts_with("NS") && h.effect.key.ends_with("UsageDescription")));
}

#[test]
fn baseline_serializes_as_version_string() {
    let json = serde_json::to_string(&Baseline::WIDGET).unwrap();
    assert_eq!(json, "\"16.2\"");
    let back: Baseline = serde_json::from_str(&json).unwrap();
    assert_eq!(back, Baseline::WIDGET);
    assert!(serde_json::from_str::<Baseline>("\"latest\"").is_err());
}
