//! Resolve command implementation

use std::path::Path;

use colored::Colorize;
use seedconf_core::{ConfigRequest, Initializer, ProjectLayout, Settings};
use serde_json::Value;

use crate::error::Result;
use crate::retry::RetryPolicy;

/// How resolved settings are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    KeysOnly,
}

/// Run the resolve command
pub fn run_resolve(
    start: &Path,
    request: &ConfigRequest,
    format: OutputFormat,
    policy: &RetryPolicy,
) -> Result<()> {
    let initializer = Initializer::new(ProjectLayout::discover(start)?);
    let store = policy.run(|| initializer.initialize(request))?;

    print!("{}", render(request, &store.snapshot(), format)?);
    Ok(())
}

pub(crate) fn render(
    request: &ConfigRequest,
    settings: &Settings,
    format: OutputFormat,
) -> Result<String> {
    let mut out = String::new();
    match format {
        OutputFormat::Json => {
            out.push_str(&serde_json::to_string_pretty(settings)?);
            out.push('\n');
        }
        OutputFormat::KeysOnly => {
            for key in settings.keys() {
                out.push_str(key);
                out.push('\n');
            }
        }
        OutputFormat::Text => {
            out.push_str(&format!(
                "{} {}/{} ({} keys)\n",
                "Resolved".green().bold(),
                request.team_key.cyan(),
                request.environment.cyan(),
                settings.len()
            ));
            for (key, value) in settings {
                out.push_str(&format!("  {} = {}\n", key.bold(), display_value(value)));
            }
        }
    }
    Ok(out)
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn settings() -> Settings {
        [("b", json!("two")), ("a", json!(1)), ("c", json!({"x": true}))]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    #[test]
    fn test_keys_only_lists_sorted_keys() {
        let out = render(&ConfigRequest::new("t", "dev"), &settings(), OutputFormat::KeysOnly)
            .unwrap();
        assert_eq!(out, "a\nb\nc\n");
    }

    #[test]
    fn test_json_output_round_trips() {
        let out =
            render(&ConfigRequest::new("t", "dev"), &settings(), OutputFormat::Json).unwrap();
        let parsed: Settings = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, settings());
    }

    #[test]
    fn test_text_output_shows_values() {
        colored::control::set_override(false);
        let out =
            render(&ConfigRequest::new("org_team", "dev"), &settings(), OutputFormat::Text)
                .unwrap();

        assert!(out.starts_with("Resolved org_team/dev (3 keys)\n"));
        assert!(out.contains("  b = two\n"));
        assert!(out.contains("  c = {\"x\":true}\n"));
    }
}
