//! Experiment catalog.
//!
//! The catalog is built once at startup, either from the built-in default
//! or from a YAML file, and is read-only afterwards.

use serde::{Deserialize, Serialize};

use crate::factors::SieveFactors;

/// Metadata of one laboratory experiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experiment {
    /// URL segment, e.g. "sieve-analysis"
    pub slug: String,

    pub title: String,

    /// Aim statement shown above the procedure
    #[serde(default)]
    pub aim: String,

    /// Ordered procedure steps
    #[serde(default)]
    pub procedure: Vec<String>,

    /// Sieve mesh numbers used by the GFN computation
    #[serde(default)]
    pub factors: SieveFactors,
}

impl Experiment {
    /// The sieve analysis experiment shipped with the application.
    pub fn sieve_analysis() -> Self {
        Self {
            slug: "sieve-analysis".to_string(),
            title: "Sieve Analysis – GFN".to_string(),
            aim: "To determine the Grain Fineness Number of a given sand sample.".to_string(),
            procedure: vec![
                "Take 500g of sand.".to_string(),
                "Put it through a series of sieves.".to_string(),
                "Shake for 15 minutes.".to_string(),
                "Weigh retained sand on each sieve.".to_string(),
                "Calculate GFN using P×F method.".to_string(),
            ],
            factors: SieveFactors::default(),
        }
    }
}

/// Ordered, immutable set of experiments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub experiments: Vec<Experiment>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self { experiments: vec![Experiment::sieve_analysis()] }
    }
}

impl Catalog {
    /// Load from YAML file
    pub fn from_yaml(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> anyhow::Result<Self> {
        let catalog: Self = serde_yaml::from_str(content)?;
        if let Some(dup) = catalog.duplicate_slug() {
            anyhow::bail!("duplicate experiment slug in catalog: {dup}");
        }
        tracing::debug!(count = catalog.experiments.len(), "experiment catalog parsed");
        Ok(catalog)
    }

    pub fn get(&self, slug: &str) -> Option<&Experiment> {
        self.experiments.iter().find(|e| e.slug == slug)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Experiment> {
        self.experiments.iter()
    }

    pub fn len(&self) -> usize {
        self.experiments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.experiments.is_empty()
    }

    fn duplicate_slug(&self) -> Option<&str> {
        self.experiments.iter().enumerate().find_map(|(i, e)| {
            self.experiments[..i]
                .iter()
                .any(|prev| prev.slug == e.slug)
                .then_some(e.slug.as_str())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_catalog_has_sieve_analysis() {
        let catalog = Catalog::default();
        assert_eq!(catalog.len(), 1);
        let exp = catalog.get("sieve-analysis").expect("sieve analysis present");
        assert_eq!(exp.title, "Sieve Analysis – GFN");
        assert_eq!(exp.procedure.len(), 5);
        assert!(catalog.get("unknown").is_none());
    }

    #[test]
    fn test_yaml_roundtrip() {
        let catalog = Catalog::default();
        let yaml = serde_yaml::to_string(&catalog).unwrap();
        let parsed = Catalog::from_yaml_str(&yaml).unwrap();
        assert_eq!(catalog, parsed);
    }

    #[test]
    fn test_example_file_matches_builtin() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../experiments.example.yaml");
        let catalog = Catalog::from_yaml(path).unwrap();
        assert_eq!(catalog, Catalog::default());
    }

    #[test]
    fn test_yaml_defaults_factors() {
        let yaml = r#"
experiments:
  - slug: coarse-sand
    title: Coarse Sand
"#;
        let catalog = Catalog::from_yaml_str(yaml).unwrap();
        let exp = catalog.get("coarse-sand").unwrap();
        assert_eq!(exp.factors, SieveFactors::default());
        assert!(exp.procedure.is_empty());
    }

    #[test]
    fn test_yaml_rejects_duplicate_slugs() {
        let yaml = r#"
experiments:
  - { slug: a, title: A }
  - { slug: a, title: Again }
"#;
        let err = Catalog::from_yaml_str(yaml).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_yaml_rejects_bad_factor_count() {
        let yaml = r#"
experiments:
  - { slug: a, title: A, factors: [1, 2, 3] }
"#;
        assert!(Catalog::from_yaml_str(yaml).is_err());
    }
}
