use medsim_core::catalog::{all_test_kinds, display_label, get_test_kind, resolve_test_kind};

#[test]
fn menu_matches_ordering_panel() {
    let ids: Vec<&str> = all_test_kinds().iter().map(|k| k.id).collect();
    assert_eq!(
        ids,
        vec!["x-ray", "mri", "ct_scan", "blood_test", "ultrasound", "ecg", "echo"]
    );
    assert_eq!(get_test_kind("echo").unwrap().label, "Echocardiogram");
}

#[test]
fn resolves_loose_input() {
    assert_eq!(resolve_test_kind("CT scan").unwrap().id, "ct_scan");
    assert_eq!(resolve_test_kind("xray").unwrap().id, "x-ray");
    assert_eq!(resolve_test_kind("Echocardiogram").unwrap().id, "echo");
    assert!(resolve_test_kind("pet scan").is_none());
    assert!(resolve_test_kind("   ").is_none());
}

#[test]
fn labels_for_unlisted_types() {
    assert_eq!(display_label("blood_test"), "Blood Test");
    assert_eq!(display_label("bone_density_scan"), "Bone Density Scan");
    assert_eq!(display_label("eeg"), "Eeg");
}
