use std::{fs, time::Duration};

use objconf::{
    CodecError, Format, NamedContainer, SettingsStore, StoreConfig, build_tree, introspect,
    introspect_enum, walk,
};
use serde::{Deserialize, Serialize};
use tempfile::TempDir;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
enum Mode {
    #[default]
    Idle,
    Sweep,
}

introspect_enum!(Mode { Idle, Sweep });

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct Probe {
    name: String,
    mode: Mode,
    settle: Duration,
    setpoints: Vec<f64>,
    note: Option<String>,
}

introspect! {
    Probe {
        name,
        mode,
        settle,
        setpoints,
        note,
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct Bench {
    name: String,
    probes: NamedContainer<Probe>,
    spare: Option<Probe>,
}

introspect! {
    Bench {
        name,
        probes: [Expandable],
        spare: [Expandable],
    }
}

fn sample() -> Bench {
    Bench {
        name: "Bench".to_string(),
        probes: NamedContainer::with_items(
            "Probes",
            [
                Probe {
                    name: "inlet".to_string(),
                    mode: Mode::Sweep,
                    settle: Duration::from_millis(1500),
                    setpoints: vec![0.5, 1.0, 2.5],
                    note: Some("upstream".to_string()),
                },
                Probe {
                    name: "outlet".to_string(),
                    ..Default::default()
                },
            ],
        ),
        spare: None,
    }
}

fn stores(dir: &TempDir) -> [SettingsStore; 2] {
    let _ = env_logger::builder().is_test(true).try_init();
    [Format::Toml, Format::Json]
        .map(|f| SettingsStore::new(StoreConfig::new(dir.path()).with_format(f)))
}

#[test]
fn save_then_load_is_equal() {
    let dir = TempDir::new().unwrap();
    for store in stores(&dir) {
        let bench = sample();
        store.save(&bench, "Bench One").unwrap();
        let loaded: Bench = store.load("Bench One").unwrap();
        assert_eq!(loaded, bench);
        assert_eq!(loaded.probes.name(), "Probes");
    }
}

#[test]
fn missing_file_loads_defaults_without_writing() {
    let dir = TempDir::new().unwrap();
    let [store, _] = stores(&dir);
    let loaded: Bench = store.load("Nothing Here").unwrap();
    assert_eq!(loaded, Bench::default());
    assert!(!store.exists("Nothing Here"));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn empty_or_null_document_loads_defaults() {
    let dir = TempDir::new().unwrap();
    let [toml, json] = stores(&dir);

    fs::write(toml.path_for("blank"), "  \n").unwrap();
    assert_eq!(toml.load::<Bench>("blank").unwrap(), Bench::default());

    fs::write(json.path_for("null"), "null\n").unwrap();
    assert_eq!(json.load::<Bench>("null").unwrap(), Bench::default());
}

#[test]
fn corrupted_document_is_an_error() {
    let dir = TempDir::new().unwrap();
    let [toml, json] = stores(&dir);

    fs::write(toml.path_for("broken"), "name = [unterminated").unwrap();
    assert!(matches!(
        toml.load::<Bench>("broken"),
        Err(CodecError::Malformed(_))
    ));

    fs::write(json.path_for("wrong"), r#"{"name": "x", "extra": 1}"#).unwrap();
    assert!(matches!(
        json.load::<Bench>("wrong"),
        Err(CodecError::Malformed(_))
    ));
}

#[test]
fn name_maps_to_one_file() {
    let dir = TempDir::new().unwrap();
    let [store, _] = stores(&dir);
    store.save(&sample(), "My Settings").unwrap();

    let entries: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(entries, ["My_Settings.toml"]);
}

#[test]
fn saving_twice_writes_identical_bytes() {
    let dir = TempDir::new().unwrap();
    for store in stores(&dir) {
        let bench = sample();
        store.save(&bench, "twice").unwrap();
        let first = fs::read(store.path_for("twice")).unwrap();
        let reloaded: Bench = store.load("twice").unwrap();
        store.save(&reloaded, "twice").unwrap();
        assert_eq!(fs::read(store.path_for("twice")).unwrap(), first);
    }
}

#[test]
fn tree_lists_every_container_element() {
    let bench = sample();
    let tree = build_tree(&bench, "name").unwrap();
    assert_eq!(tree.label(), "Bench");
    let probes = &tree.children()[0];
    assert_eq!(probes.label(), "Probes");
    let labels: Vec<_> = probes.children().iter().map(|c| c.label()).collect();
    assert_eq!(labels, ["inlet", "outlet"]);
}

#[test]
fn absent_branches_are_not_nodes() {
    let mut bench = sample();
    let w = walk(&bench, "name");
    assert_eq!(w.root.unwrap().len(), 4);
    assert!(w.skipped.is_empty());

    bench.spare = Some(Probe {
        name: "reserve".to_string(),
        ..Default::default()
    });
    let tree = build_tree(&bench, "name").unwrap();
    assert_eq!(tree.children()[1].label(), "reserve");
    assert_eq!(tree.children()[1].path(), "spare");
}

#[test]
fn schema_is_written_next_to_settings() {
    #[derive(schemars::JsonSchema)]
    #[allow(dead_code)]
    struct Small {
        name: String,
        level: u8,
    }

    let dir = TempDir::new().unwrap();
    let [store, _] = stores(&dir);
    let path = store.save_schema::<Small>("My Settings").unwrap();
    assert_eq!(path, dir.path().join("My_Settings-schema.json"));
    let schema: serde_json::Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
    assert!(schema["properties"]["level"].is_object());
}

#[test]
fn measured_floats_survive_save_and_load() {
    let dir = TempDir::new().unwrap();
    for store in stores(&dir) {
        let mut bench = sample();
        bench.probes[0].setpoints = vec![983.0571047624649, 989.9951327998887, 0.1 + 0.2];
        store.save(&bench, "floats").unwrap();
        let loaded: Bench = store.load("floats").unwrap();
        assert_eq!(loaded.probes[0].setpoints, bench.probes[0].setpoints);
    }
}
