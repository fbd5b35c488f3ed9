//! Resolution matrix
//!
//! `input_params/main_conf.json` lists teams and the environments each one
//! should be resolved for:
//!
//! ```json
//! {"teams": [{"team_key": "org_team", "environments": ["dev", "stg"],
//!   "detect_env_vars": true, "remote_config_src_type": "vault",
//!   "allow_remote_update": false}]}
//! ```

use crate::Result;
use crate::init::ConfigRequest;
use crate::remote::SourceKind;
use seedconf_fs::{ConfigStore, NormalizedPath};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matrix {
    pub teams: Vec<MatrixTeam>,
}

/// One team row of the matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixTeam {
    pub team_key: String,
    pub environments: Vec<String>,
    #[serde(default)]
    pub detect_env_vars: bool,
    /// Null or empty means no remote source
    #[serde(default)]
    pub remote_config_src_type: Option<String>,
    #[serde(default)]
    pub allow_remote_update: bool,
}

impl Matrix {
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        Ok(ConfigStore::new().load(path)?)
    }

    /// One request per team and environment, in file order.
    ///
    /// Fails on the first unsupported remote kind, before anything runs.
    pub fn requests(&self) -> Result<Vec<ConfigRequest>> {
        let mut requests = Vec::new();
        for team in &self.teams {
            let kind = match team.remote_config_src_type.as_deref().map(str::trim) {
                None | Some("") => None,
                Some(kind) => Some(kind.parse::<SourceKind>()?),
            };
            for environment in &team.environments {
                requests.push(ConfigRequest {
                    team_key: team.team_key.clone(),
                    environment: environment.clone(),
                    detect_env_vars: team.detect_env_vars,
                    remote_config_src_type: kind,
                    allow_remote_update: team.allow_remote_update,
                });
            }
        }
        Ok(requests)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use pretty_assertions::assert_eq;

    #[test]
    fn expands_team_rows_per_environment() {
        let matrix: Matrix = serde_json::from_str(
            r#"{"teams": [
                {"team_key": "org_team", "environments": ["dev", "stg"],
                 "detect_env_vars": true, "remote_config_src_type": "vault",
                 "allow_remote_update": false},
                {"team_key": "org.other", "environments": ["prod"],
                 "detect_env_vars": false, "remote_config_src_type": null,
                 "allow_remote_update": false}
            ]}"#,
        )
        .unwrap();

        let requests = matrix.requests().unwrap();

        assert_eq!(
            requests,
            vec![
                ConfigRequest::new("org_team", "dev")
                    .detect_env_vars(true)
                    .remote(SourceKind::Vault),
                ConfigRequest::new("org_team", "stg")
                    .detect_env_vars(true)
                    .remote(SourceKind::Vault),
                ConfigRequest::new("org.other", "prod"),
            ]
        );
    }

    #[test]
    fn optional_flags_default_to_off() {
        let matrix: Matrix =
            serde_json::from_str(r#"{"teams": [{"team_key": "t", "environments": ["dev"]}]}"#)
                .unwrap();

        assert_eq!(matrix.requests().unwrap(), vec![ConfigRequest::new("t", "dev")]);
    }

    #[test]
    fn unsupported_kind_fails_whole_matrix() {
        let matrix: Matrix = serde_json::from_str(
            r#"{"teams": [{"team_key": "t", "environments": ["dev"],
                "remote_config_src_type": "consul"}]}"#,
        )
        .unwrap();

        assert!(matches!(
            matrix.requests(),
            Err(Error::UnsupportedSource { .. })
        ));
    }
}
