// crates/factory-core/tests/replica_scenarios.rs
//
// Scripted replica scenarios. Each script line is one broadcast:
//
//   S id:name id:name ...   snapshot
//   I id:name               insert
//   U id:name               update
//   D id                    delete
//
// and the expected replica is listed as `id:name` in display order.

use factory_core::{CollectionStore, GeneratorUnit, UnitId};

fn parse_unit(token: &str) -> GeneratorUnit {
    let (id, name) = token.split_once(':').expect("token is id:name");
    GeneratorUnit::new(id.parse().expect("numeric id"), name, 1, 1000, vec![1, 2, 3])
}

fn run_script(script: &str) -> CollectionStore {
    let mut store = CollectionStore::new();

    for raw_line in script.lines() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("S") => store.apply_snapshot(tokens.map(parse_unit).collect()),
            Some("I") => store.apply_insert(parse_unit(tokens.next().expect("unit"))),
            Some("U") => {
                store.apply_update(parse_unit(tokens.next().expect("unit")));
            }
            Some("D") => {
                let id = tokens.next().expect("id").parse().expect("numeric id");
                store.apply_delete(UnitId(id));
            }
            other => panic!("bad script line {:?}", other),
        }
    }

    store
}

fn render(store: &CollectionStore) -> Vec<String> {
    store
        .snapshot()
        .into_iter()
        .map(|u| format!("{}:{}", u.id.0, u.name))
        .collect()
}

#[test]
fn snapshot_then_delete_keeps_relative_order() {
    let store = run_script(
        "
        S 1:one 2:two
        D 1
        ",
    );
    assert_eq!(render(&store), vec!["2:two"]);
}

#[test]
fn last_delete_or_upsert_wins_per_id() {
    let scenarios: &[(&str, &[&str])] = &[
        ("I 1:A\nD 1\nU 1:B", &[]),
        ("I 1:A\nD 1\nI 1:B", &["1:B"]),
        ("I 1:A\nI 1:A\nU 1:B\nU 1:B", &["1:B"]),
        ("U 1:A\nI 1:B", &["1:B"]),
        ("I 1:A\nI 2:B\nD 1\nD 1\nI 3:C", &["2:B", "3:C"]),
    ];

    for (script, expected) in scenarios {
        let store = run_script(script);
        assert_eq!(render(&store), *expected, "script:\n{}", script);
    }
}

#[test]
fn snapshot_supersedes_any_history() {
    let store = run_script(
        "
        # incremental history
        I 1:a
        I 2:b
        U 1:a2
        D 2
        I 3:c
        # fresh snapshot after reconnect
        S 9:x 4:y
        ",
    );
    assert_eq!(render(&store), vec!["9:x", "4:y"]);
}

#[test]
fn redelivered_script_is_idempotent() {
    let script = "S 1:a 2:b\nI 3:c\nU 2:B\nD 1";
    let once = run_script(script);
    let twice = run_script(&format!("{}\n{}", script, "I 3:c\nU 2:B\nD 1"));

    assert_eq!(render(&once), render(&twice));
}
