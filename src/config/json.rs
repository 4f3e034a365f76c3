//! JSON configuration file parsing

use super::Config;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Parse JSON configuration file
pub fn parse_json_file(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_json_string(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse JSON configuration from string
pub fn parse_json_string(contents: &str) -> Result<Config> {
    let config: Config = serde_json::from_str(contents)
        .context("Failed to parse JSON configuration")?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParamValue;

    #[test]
    fn test_parse_json_entries_and_groups() {
        let json = r#"
{
  "queries": [
    { "frequency": 3, "query": "select * from users where id = :id",
      "parameters": { "id": [1, 2.5, "abc", true] } },
    { "frequency": 1, "queryGroup": "checkout", "parameters": null },
    { "frequency": 0, "query": null, "queryGroup": "checkout" }
  ],
  "queryGroups": [
    { "name": "checkout", "queries": ["begin", "commit"] }
  ]
}
"#;

        let config = parse_json_string(json).unwrap();
        assert_eq!(config.queries.len(), 3);
        assert_eq!(config.queries[0].frequency, 3);

        let ids = &config.queries[0].parameters.as_ref().unwrap()["id"];
        assert_eq!(
            ids,
            &vec![
                ParamValue::Int(1),
                ParamValue::Float(2.5),
                ParamValue::Text("abc".to_string()),
                ParamValue::Bool(true),
            ]
        );

        assert_eq!(config.queries[1].group_name(), Some("checkout"));
        assert!(config.queries[1].parameters.is_none());
        assert_eq!(config.queries[2].query_text(), None);
        assert_eq!(config.query_groups[0].queries, vec!["begin", "commit"]);
    }

    #[test]
    fn test_parse_json_large_unsigned_value() {
        let json = r#"{ "queries": [ { "frequency": 1, "query": "select :id",
            "parameters": { "id": [18446744073709551615, -1] } } ] }"#;
        let config = parse_json_string(json).unwrap();
        let ids = &config.queries[0].parameters.as_ref().unwrap()["id"];
        assert_eq!(ids, &vec![ParamValue::UInt(u64::MAX), ParamValue::Int(-1)]);

        let template = crate::query::Template::new("select :id");
        let only_max = crate::config::ParameterPool::from([("id".to_string(), vec![ids[0].clone()])]);
        let mut rng = rand::thread_rng();
        assert_eq!(crate::query::render::render(&template, &only_max, &mut rng), "select 18446744073709551615");
    }

    #[test]
    fn test_parse_json_defaults() {
        let config = parse_json_string(r#"{ "queries": [ { "query": "select 1" } ] }"#).unwrap();
        assert_eq!(config.queries[0].frequency, 0);
        assert!(config.query_groups.is_empty());
    }

    #[test]
    fn test_parse_json_rejects_negative_frequency() {
        let result = parse_json_string(r#"{ "queries": [ { "frequency": -1, "query": "select 1" } ] }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_json_file_missing() {
        let err = parse_json_file(Path::new("/nonexistent/sqlpulse.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
