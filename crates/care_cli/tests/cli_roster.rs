use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("sheltercare-{nanos}-{file_name}"))
}

fn write_store(path: &PathBuf, document: serde_json::Value) {
    std::fs::write(path, serde_json::to_string_pretty(&document).unwrap()).unwrap();
}

fn run(exe: &str, store_path: &PathBuf, args: &[&str]) -> std::process::Output {
    Command::new(exe)
        .args(args)
        .env("SHELTERCARE_STORE_PATH", store_path)
        .env("SHELTERCARE_CONFIG_PATH", temp_path("no-config.json"))
        .output()
        .expect("failed to run sheltercare")
}

#[test]
fn animal_add_creates_a_healthy_animal() {
    let exe = env!("CARGO_BIN_EXE_sheltercare");
    let store_path = temp_path("cli-animal-add.json");

    let output = run(exe, &store_path, &["animal", "add", "Clover", "--species", "goat"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Registered animal: Clover"));

    let stored: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&store_path).unwrap()).unwrap();
    std::fs::remove_file(&store_path).ok();

    assert_eq!(stored["schema_version"], 1);
    assert_eq!(stored["animals"][0]["name"], "Clover");
    assert_eq!(stored["animals"][0]["species"], "goat");
    assert_eq!(stored["animals"][0]["status"], "healthy");
}

#[test]
fn clear_attention_resets_a_flagged_animal() {
    let exe = env!("CARGO_BIN_EXE_sheltercare");
    let store_path = temp_path("cli-clear-attention.json");
    write_store(
        &store_path,
        serde_json::json!({
            "schema_version": 1,
            "animals": [
                { "id": "animal-1", "name": "Clover", "species": "goat", "status": "needs_attention" }
            ]
        }),
    );

    let output = run(exe, &store_path, &["animal", "clear-attention", "animal-1"]);
    assert!(output.status.success());

    let stored: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&store_path).unwrap()).unwrap();
    std::fs::remove_file(&store_path).ok();

    assert_eq!(stored["animals"][0]["status"], "healthy");
}

#[test]
fn user_add_accepts_the_vet_shorthand() {
    let exe = env!("CARGO_BIN_EXE_sheltercare");
    let store_path = temp_path("cli-user-add.json");

    let output = run(exe, &store_path, &["user", "add", "Dr. Osei", "--role", "vet"]);
    assert!(output.status.success());

    let stored: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&store_path).unwrap()).unwrap();
    std::fs::remove_file(&store_path).ok();

    assert_eq!(stored["users"][0]["name"], "Dr. Osei");
    assert_eq!(stored["users"][0]["role"], "veterinarian");
}

#[test]
fn unknown_role_is_rejected() {
    let exe = env!("CARGO_BIN_EXE_sheltercare");
    let store_path = temp_path("cli-user-bad-role.json");

    let output = run(exe, &store_path, &["user", "add", "Sam", "--role", "janitor"]);
    std::fs::remove_file(&store_path).ok();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_input"));
    assert!(stderr.contains("janitor"));
}

#[test]
fn animal_show_reports_missing_animal() {
    let exe = env!("CARGO_BIN_EXE_sheltercare");
    let store_path = temp_path("cli-animal-missing.json");
    write_store(
        &store_path,
        serde_json::json!({ "schema_version": 1, "animals": [] }),
    );

    let output = run(exe, &store_path, &["animal", "show", "animal-9"]);
    std::fs::remove_file(&store_path).ok();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: not_found"));
}

#[test]
fn default_actor_from_config_is_used() {
    let exe = env!("CARGO_BIN_EXE_sheltercare");
    let store_path = temp_path("cli-default-actor.json");
    let config_path = temp_path("cli-default-actor-config.json");
    write_store(
        &store_path,
        serde_json::json!({
            "schema_version": 1,
            "animals": [
                { "id": "animal-1", "name": "Clover", "species": "goat", "status": "healthy" }
            ],
            "users": [
                { "id": "user-care", "name": "Sam", "role": "caretaker" }
            ],
            "tasks": [
                {
                    "id": "task-1",
                    "task_type": "feeding",
                    "assigned_to": "user-care",
                    "animal_id": "animal-1",
                    "schedule": {
                        "schedule_date": "2024-06-01",
                        "schedule_times": ["08:00"]
                    },
                    "status": "pending",
                    "created_at": "2024-05-01T00:00:00Z"
                }
            ]
        }),
    );
    std::fs::write(
        &config_path,
        serde_json::to_string(&serde_json::json!({ "default_actor": "user-care" })).unwrap(),
    )
    .unwrap();

    let output = Command::new(exe)
        .args(["task", "done", "task-1"])
        .env("SHELTERCARE_STORE_PATH", &store_path)
        .env("SHELTERCARE_CONFIG_PATH", &config_path)
        .output()
        .expect("failed to run sheltercare");

    let stored: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&store_path).unwrap()).unwrap();
    std::fs::remove_file(&store_path).ok();
    std::fs::remove_file(&config_path).ok();

    assert!(output.status.success());
    assert_eq!(stored["tasks"][0]["status"], "completed");
}

#[test]
fn broken_config_warns_but_does_not_block() {
    let exe = env!("CARGO_BIN_EXE_sheltercare");
    let store_path = temp_path("cli-broken-config.json");
    let config_path = temp_path("cli-broken-config-config.json");
    std::fs::write(&config_path, "{ not json ").unwrap();

    let output = Command::new(exe)
        .args(["animal", "add", "Pip", "--species", "hen"])
        .env("SHELTERCARE_STORE_PATH", &store_path)
        .env("SHELTERCARE_CONFIG_PATH", &config_path)
        .output()
        .expect("failed to run sheltercare");

    std::fs::remove_file(&store_path).ok();
    std::fs::remove_file(&config_path).ok();

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("WARNING:"));
}
