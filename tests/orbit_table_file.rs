use c4life_io::IoError;
use c4life_lib::model::persistence::OrbitTableFile;
use c4life_lib::model::OrbitIndex;
use std::path::PathBuf;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("c4life_{}_{}.json", name, std::process::id()))
}

#[test]
fn test_save_load_rebuilds_same_index() {
    let path = temp_path("orbits_roundtrip");
    let built = OrbitIndex::build();
    OrbitTableFile::from_index(&built).save(&path).unwrap();

    let loaded = OrbitTableFile::load(&path).unwrap();
    assert_eq!(loaded.summary.total_orbits, 140);
    assert_eq!(loaded.summary.total_patterns, 512);
    let index = loaded.into_index().unwrap();
    assert_eq!(index.lookup(), built.lookup());
    assert_eq!(index.orbits(), built.orbits());
    std::fs::remove_file(&path).ok();
}

#[test]
fn test_file_uses_documented_field_names() {
    let path = temp_path("orbits_fields");
    OrbitTableFile::from_index(&OrbitIndex::build()).save(&path).unwrap();
    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();

    assert_eq!(raw["summary"]["totalOrbits"], 140);
    let orbits = raw["orbits"].as_array().unwrap();
    assert_eq!(orbits.len(), 140);
    for key in ["id", "representative", "size", "stabilizer", "patterns"] {
        assert!(orbits[0].get(key).is_some(), "missing {key}");
    }
    std::fs::remove_file(&path).ok();
}

#[test]
fn test_duplicate_pattern_is_rejected() {
    let mut table = OrbitTableFile::from_index(&OrbitIndex::build());
    // Orbit 1 claims the zero pattern as well.
    let stolen = table.orbits[0].members[0];
    table.orbits[1].members[0] = stolen;
    assert!(matches!(table.into_index(), Err(IoError::Core(_))));
}

#[test]
fn test_missing_file_reports_path() {
    let err = OrbitTableFile::load("/nonexistent/c4life/orbits.json").unwrap_err();
    assert!(err.to_string().contains("orbits.json"));
}
