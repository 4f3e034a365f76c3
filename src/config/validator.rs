//! Configuration validation
//!
//! Hard errors that make a configuration unusable are reported by
//! [`DistributionIndex::build`](crate::distribution::DistributionIndex::build).
//! This module adds the checks that run before it: an empty configuration is
//! rejected, and suspicious but legal setups are reported as warnings.

use super::*;
use crate::query::Template;
use anyhow::Result;
use std::collections::{BTreeSet, HashMap};

/// Validate complete configuration
///
/// Fails when no query entry is configured; every lint finding is logged as a
/// warning.
pub fn validate_config(config: &Config) -> Result<()> {
    if config.queries.is_empty() {
        anyhow::bail!("configuration has no query entries");
    }

    for warning in lint_config(config) {
        tracing::warn!("{}", warning);
    }

    Ok(())
}

/// Collect warnings for legal but likely unintended configuration
pub fn lint_config(config: &Config) -> Vec<String> {
    let mut warnings = Vec::new();

    let mut group_counts: HashMap<&str, usize> = HashMap::new();
    for group in &config.query_groups {
        *group_counts.entry(group.name.as_str()).or_default() += 1;
    }

    let mut duplicates: Vec<_> = group_counts.iter().filter(|(_, n)| **n > 1).collect();
    duplicates.sort();
    for (name, count) in duplicates {
        warnings.push(format!(
            "query group {:?} is defined {} times; references use the queries of all of them",
            name, count
        ));
    }

    let mut referenced = BTreeSet::new();
    for (index, entry) in config.queries.iter().enumerate() {
        if entry.frequency == 0 {
            warnings.push(format!("query entry {} has frequency 0 and will never be selected", index));
        }

        let texts: Vec<&str> = match (entry.query_text(), entry.group_name()) {
            (Some(query), None) => vec![query],
            (None, Some(name)) => {
                referenced.insert(name);
                config.group_queries(name).unwrap_or_default()
            }
            // Reported as errors when the index is built
            _ => continue,
        };

        let pool = entry.parameters.as_ref();
        if let Some(pool) = pool {
            for (name, values) in pool {
                if values.is_empty() {
                    warnings.push(format!(
                        "query entry {} parameter {:?} has no values; its token is left unreplaced",
                        index, name
                    ));
                }
            }
        }

        let mut unmatched = BTreeSet::new();
        for text in texts {
            for token in Template::new(text).tokens() {
                if !pool.map(|p| p.contains_key(token)).unwrap_or(false) {
                    unmatched.insert(token.to_string());
                }
            }
        }
        for token in unmatched {
            warnings.push(format!(
                "query entry {} uses token :{} with no parameter values; it is sent verbatim",
                index, token
            ));
        }
    }

    let mut seen = BTreeSet::new();
    for group in &config.query_groups {
        if !referenced.contains(group.name.as_str()) && seen.insert(group.name.as_str()) {
            warnings.push(format!("query group {:?} is never referenced", group.name));
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_empty_config() {
        assert!(validate_config(&Config::default()).is_err());
    }

    #[test]
    fn test_clean_config_has_no_warnings() {
        let config = Config {
            queries: vec![
                QueryEntry::direct(1, "select * from t where id = :id").with_parameter("id", [1]),
                QueryEntry::group(1, "g"),
            ],
            query_groups: vec![QueryGroup::new("g", ["select 1"])],
        };
        assert!(lint_config(&config).is_empty());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_lint_findings() {
        let config = Config {
            queries: vec![
                QueryEntry::direct(0, "select :a, :b").with_parameter("a", Vec::<i64>::new()),
                QueryEntry::group(1, "dup"),
            ],
            query_groups: vec![
                QueryGroup::new("dup", ["select :x"]),
                QueryGroup::new("dup", ["select 2"]),
                QueryGroup::new("unused", ["select 3"]),
            ],
        };

        let warnings = lint_config(&config);
        let has = |needle: &str| warnings.iter().any(|w| w.contains(needle));

        assert!(has("\"dup\" is defined 2 times"));
        assert!(has("query entry 0 has frequency 0"));
        assert!(has("parameter \"a\" has no values"));
        assert!(has("token :b"));
        assert!(!has("token :a"));
        assert!(has("query entry 1 uses token :x"));
        assert!(has("\"unused\" is never referenced"));
        assert_eq!(warnings.len(), 6);
    }

    #[test]
    fn test_lint_and_build_expand_duplicate_groups_alike() {
        let config = Config {
            queries: vec![QueryEntry::group(1, "dup").with_parameter("x", [1])],
            query_groups: vec![
                QueryGroup::new("dup", ["select :x"]),
                QueryGroup::new("dup", ["select :y"]),
            ],
        };

        let index = crate::distribution::DistributionIndex::build(&config).unwrap();
        let built: Vec<&str> = index.matchers()[0].queries().iter().map(|q| q.template.text()).collect();
        assert_eq!(built, vec!["select :x", "select :y"]);

        let warnings = lint_config(&config);
        assert!(warnings.iter().any(|w| w.contains("query entry 0 uses token :y")));
        assert!(!warnings.iter().any(|w| w.contains("token :x")));
    }

    #[test]
    fn test_malformed_entries_are_left_to_build() {
        let config = Config {
            queries: vec![QueryEntry { frequency: 1, ..Default::default() }],
            query_groups: vec![],
        };
        assert!(lint_config(&config).is_empty());
    }
}
