//! Cross-crate resolution scenarios
//!
//! Each test builds a project tree with `seedconf-test-utils`, resolves it
//! through `seedconf-core`, and talks to a mock Vault server where remote
//! secrets are involved.

use mockito::Matcher;
use pretty_assertions::assert_eq;
use seedconf_core::remote::{MemoryBackend, RemoteSource, SourceKind};
use seedconf_core::source::EnvSource;
use seedconf_core::sync::{SecretSync, SyncDirection, read_cached};
use seedconf_core::{ConfigRequest, Initializer, LazySettings, Matrix, ProjectLayout, Settings};
use seedconf_fs::NormalizedPath;
use seedconf_test_utils::TestProject;
use serde_json::json;
use std::thread;

// =============================================================================
// Test Infrastructure
// =============================================================================

const DEV_SECRET: &str = "/v1/secret/data/org/team/dev/secrets";

fn vault_team(project: &TestProject, vault_url: &str) {
    project.write_team_settings(
        "org/team",
        &format!(
            "[team_commons]\n\
             SEED_CONF_VAULT_HOST_IP = \"{vault_url}\"\n\
             SEED_CONF_VAULT_KEY = \"root\"\n\
             region = \"eu\"\n\n\
             [dev]\nregion = \"eu-dev\"\n"
        ),
    );
}

fn initializer(project: &TestProject) -> Initializer {
    let layout = ProjectLayout::discover(project.root()).unwrap();
    Initializer::new(layout).with_env(EnvSource::from_vars("CONF_", Vec::<(String, String)>::new()))
}

// =============================================================================
// Scenarios
// =============================================================================

/// Pull secrets on one run, edit the cache by hand, push them on the next.
#[test]
fn pull_then_push_round_trip_through_cache() {
    let mut server = mockito::Server::new();
    let project = TestProject::new();
    vault_team(&project, &server.url());
    let init = initializer(&project);

    let pull = server
        .mock("GET", DEV_SECRET)
        .with_status(200)
        .with_body(r#"{"data":{"data":{"api_key":"v1"},"metadata":{"version":1}}}"#)
        .expect(1)
        .create();
    let store = init
        .initialize(&ConfigRequest::new("org_team", "dev").remote(SourceKind::Vault))
        .unwrap();
    pull.assert();
    pull.remove();
    assert_eq!(store.get("api_key"), Some(json!("v1")));
    project.assert_file_contains("custom_conf/teams/org/team/.secrets.toml", "v1");

    project.write_secrets("org/team", "[dev]\napi_key = \"v2\"\n");
    let push = server
        .mock("POST", DEV_SECRET)
        .match_header("x-vault-token", "root")
        .match_body(Matcher::Json(json!({"data": {"api_key": "v2"}})))
        .with_status(200)
        .with_body(r#"{"data":{"version":2}}"#)
        .expect(1)
        .create();
    let read_back = server
        .mock("GET", DEV_SECRET)
        .with_status(200)
        .with_body(r#"{"data":{"data":{"api_key":"v2"},"metadata":{"version":2}}}"#)
        .create();

    let store = init
        .initialize(
            &ConfigRequest::new("org_team", "dev")
                .remote(SourceKind::Vault)
                .allow_remote_update(true),
        )
        .unwrap();

    push.assert();
    read_back.assert();
    assert_eq!(store.get("api_key"), Some(json!("v2")));
    assert_eq!(store.get("region"), Some(json!("eu-dev")));
}

/// A process-wide lazily created store filled from a resolution.
#[test]
fn lazy_settings_hold_resolved_configuration() {
    static SETTINGS: LazySettings = LazySettings::new();

    let project = TestProject::new();
    project.write_team_settings("org/team", "[team_commons]\nretries = 3\n");

    assert!(!SETTINGS.is_initialized());
    let store = initializer(&project)
        .initialize(&ConfigRequest::new("org_team", "dev"))
        .unwrap();
    SETTINGS.merge(store.snapshot());

    assert!(SETTINGS.is_initialized());
    assert_eq!(SETTINGS.get("retries"), Some(json!(3)));
}

/// Independent resolutions share nothing but the project tree.
#[test]
fn concurrent_resolutions_are_independent() {
    let project = TestProject::new();
    for team in ["alpha", "beta", "gamma", "delta"] {
        project.write_team_settings(
            &format!("org/{team}"),
            &format!("[team_commons]\nname = \"{team}\"\n"),
        );
    }
    let init = initializer(&project);

    thread::scope(|scope| {
        let handles: Vec<_> = ["alpha", "beta", "gamma", "delta"]
            .into_iter()
            .map(|team| {
                let init = &init;
                scope.spawn(move || {
                    let store = init
                        .initialize(&ConfigRequest::new(format!("org_{team}"), "dev"))
                        .unwrap();
                    (team, store.get_str("name"))
                })
            })
            .collect();

        for handle in handles {
            let (team, name) = handle.join().unwrap();
            assert_eq!(name.as_deref(), Some(team));
        }
    });
}

/// The matrix drives a mix of local-only and vault-backed teams.
#[test]
fn matrix_mixes_local_and_remote_teams() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", DEV_SECRET)
        .with_status(200)
        .with_body(r#"{"data":{"data":{"token":"t"},"metadata":{}}}"#)
        .create();

    let project = TestProject::new();
    vault_team(&project, &server.url());
    project.write_team_settings("org/local", "[team_commons]\nlocal = true\n");
    project.write_matrix(
        r#"{"teams": [
            {"team_key": "org_team", "environments": ["dev"], "detect_env_vars": false,
             "remote_config_src_type": "vault", "allow_remote_update": false},
            {"team_key": "org.local", "environments": ["dev", "prd"], "detect_env_vars": false,
             "remote_config_src_type": null, "allow_remote_update": false}
        ]}"#,
    );

    let init = initializer(&project);
    let requests = Matrix::load(&init.layout().matrix_file())
        .unwrap()
        .requests()
        .unwrap();
    let stores: Vec<_> = requests
        .iter()
        .map(|r| init.initialize(r).unwrap())
        .collect();

    assert_eq!(stores.len(), 3);
    assert_eq!(stores[0].get_str("token").as_deref(), Some("t"));
    assert_eq!(stores[1].get("local"), Some(json!(true)));
    assert!(!stores[2].contains_key("token"));
}

/// The sync protocol can run against any backend, not just HTTP ones.
#[test]
fn sync_protocol_against_in_memory_backend() {
    let temp = tempfile::tempdir().unwrap();
    let cache = NormalizedPath::new(temp.path().join(".secrets.toml"));
    let remote: Settings = [("password".to_string(), json!("hunter2"))]
        .into_iter()
        .collect();
    let backend = MemoryBackend::new(SourceKind::Vault).with_secret("org/team/stg/secrets", remote.clone());
    let sync = SecretSync::new(RemoteSource::with_backend(
        "org/team/stg/secrets",
        Box::new(backend.clone()),
    ));

    let outcome = sync.reconcile(&cache, "stg", false).unwrap();

    assert_eq!(outcome.direction, SyncDirection::Pull);
    assert_eq!(read_cached(&cache, "stg").unwrap(), remote);
    assert_eq!(backend.read_count(), 1);

    let written: toml::Table = toml::from_str(&std::fs::read_to_string(cache.to_native()).unwrap()).unwrap();
    assert_eq!(written.len(), 1);
}
