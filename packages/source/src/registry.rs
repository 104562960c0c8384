//! Dataset registry: every dataset definition, parsed from embedded TOML.
//!
//! Each `.toml` file in `packages/source/datasets/` is baked into the binary
//! at compile time via [`include_str!`].

use crate::dataset_def::{DatasetDefinition, parse_dataset_toml};

/// Identifier of the dataset used when none is requested.
pub const DEFAULT_DATASET_ID: &str = "nypd_shootings";

/// TOML configs embedded at compile time.
const DATASET_TOMLS: &[(&str, &str)] = &[(
    "nypd_shootings",
    include_str!("../datasets/nypd_shootings.toml"),
)];

/// Returns all configured dataset definitions, parsed from embedded TOML.
///
/// # Panics
///
/// Panics if any TOML config is malformed (the configs are embedded, so
/// this is caught by the tests below).
#[must_use]
pub fn all_datasets() -> Vec<DatasetDefinition> {
    DATASET_TOMLS
        .iter()
        .map(|(name, toml)| {
            parse_dataset_toml(toml).unwrap_or_else(|e| panic!("Failed to parse {name}.toml: {e}"))
        })
        .collect()
}

/// Looks up a dataset definition by id.
#[must_use]
pub fn find_dataset(id: &str) -> Option<DatasetDefinition> {
    all_datasets().into_iter().find(|d| d.id == id)
}

#[cfg(test)]
mod tests {
    use incident_trends_incident_models::SourceColumn;

    use super::*;

    #[test]
    fn loads_all_datasets() {
        assert_eq!(all_datasets().len(), DATASET_TOMLS.len());
    }

    #[test]
    fn dataset_ids_are_unique() {
        let datasets = all_datasets();
        let mut ids: Vec<&str> = datasets.iter().map(|d| d.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), DATASET_TOMLS.len());
    }

    #[test]
    fn default_dataset_exists() {
        assert!(find_dataset(DEFAULT_DATASET_ID).is_some());
        assert!(find_dataset("no_such_dataset").is_none());
    }

    #[test]
    fn nypd_columns_match_published_schema() {
        let def = find_dataset("nypd_shootings").unwrap();
        let expected: Vec<String> = SourceColumn::all().iter().map(ToString::to_string).collect();
        assert_eq!(def.columns, expected);
    }

    #[test]
    fn all_datasets_have_required_fields() {
        for def in &all_datasets() {
            assert!(!def.name.is_empty(), "{} name is empty", def.id);
            assert!(!def.url.is_empty(), "{} url is empty", def.id);
            assert!(
                def.columns.is_empty() || def.columns.contains(&def.fields.date),
                "{} does not document its date column",
                def.id
            );
            assert!(
                def.columns.is_empty() || def.columns.contains(&def.fields.region),
                "{} does not document its region column",
                def.id
            );
        }
    }
}
