use super::labels::AnnotationMask;
use crate::core::rings::StackingCutoffs;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{parameter}': {reason}")]
    InvalidValue {
        parameter: &'static str,
        reason: String,
    },
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
}

/// Which scorer weighs hydrogen-bond candidates in the pairing network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scorer {
    #[default]
    Statistical,
    Binary,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct NetworkCutoffs {
    /// Heavy atom to hydrogen or lone pair distance below which the two form a site.
    pub covalent_distance: f64,
    /// Candidates scoring at or below this are discarded.
    pub min_score: f64,
    pub scorer: Scorer,
}

impl Default for NetworkCutoffs {
    fn default() -> Self {
        Self {
            covalent_distance: 1.7,
            min_score: 0.01,
            scorer: Scorer::Statistical,
        }
    }
}

/// Numeric cutoffs of every analysis.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Criteria {
    /// Maximum O3'-P (or C-N) distance of covalently adjacent residues.
    pub adjacency_bond_length: f64,
    pub stacking: StackingCutoffs,
    pub network: NetworkCutoffs,
    /// Minimum summed flow of an accepted pairing.
    pub pairing_cutoff: f64,
    /// Summed flow below which a pairing is tagged as a single hydrogen bond.
    pub one_hbond_cutoff: f64,
    /// Summed flow below which a pairing is treated as two hydrogen bonds.
    pub two_hbond_cutoff: f64,
    /// Open interval of base-backbone contact distances.
    pub bh_min_distance: f64,
    pub bh_max_distance: f64,
}

impl Default for Criteria {
    fn default() -> Self {
        Self {
            adjacency_bond_length: 2.0,
            stacking: StackingCutoffs::default(),
            network: NetworkCutoffs::default(),
            pairing_cutoff: 0.8,
            one_hbond_cutoff: 1.5,
            two_hbond_cutoff: 2.1,
            bh_min_distance: 1.7,
            bh_max_distance: 3.2,
        }
    }
}

impl Criteria {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("adjacency-bond-length", self.adjacency_bond_length),
            ("stacking.distance", self.stacking.distance),
            ("network.covalent-distance", self.network.covalent_distance),
            ("pairing-cutoff", self.pairing_cutoff),
        ];
        for (parameter, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidValue {
                    parameter,
                    reason: format!("expected a positive number, got {value}"),
                });
            }
        }
        if self.one_hbond_cutoff > self.two_hbond_cutoff {
            return Err(ConfigError::InvalidValue {
                parameter: "one-hbond-cutoff",
                reason: "must not exceed two-hbond-cutoff".to_string(),
            });
        }
        if self.bh_min_distance >= self.bh_max_distance {
            return Err(ConfigError::InvalidValue {
                parameter: "bh-min-distance",
                reason: "must be below bh-max-distance".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationConfig {
    pub mask: AnnotationMask,
    pub criteria: Criteria,
    /// Pairs whose reference-frame origins are farther apart are not examined.
    pub neighbor_cutoff: Option<f64>,
    /// Keep relations that ended up without any label.
    pub keep_empty: bool,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            mask: AnnotationMask::ALL,
            criteria: Criteria::default(),
            neighbor_cutoff: Some(DEFAULT_NEIGHBOR_CUTOFF),
            keep_empty: false,
        }
    }
}

const DEFAULT_NEIGHBOR_CUTOFF: f64 = 20.0;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialAnnotationConfig {
    mask: Option<Vec<MaskName>>,
    #[serde(default)]
    criteria: Criteria,
    neighbor_cutoff: Option<f64>,
    keep_empty: Option<bool>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum MaskName {
    Adjacent,
    Stacking,
    Pairing,
    Bhbond,
    All,
}

impl From<MaskName> for AnnotationMask {
    fn from(name: MaskName) -> Self {
        match name {
            MaskName::Adjacent => AnnotationMask::ADJACENT,
            MaskName::Stacking => AnnotationMask::STACKING,
            MaskName::Pairing => AnnotationMask::PAIRING,
            MaskName::Bhbond => AnnotationMask::BHBOND,
            MaskName::All => AnnotationMask::ALL,
        }
    }
}

impl AnnotationConfig {
    /// Loads a configuration from a TOML file.
    ///
    /// Every key is optional; missing keys take their default values.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            ConfigError::Toml { source, .. } => ConfigError::Toml {
                path: path.to_string_lossy().to_string(),
                source,
            },
            other => other,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let partial: PartialAnnotationConfig =
            toml::from_str(content).map_err(|e| ConfigError::Toml {
                path: "<string>".to_string(),
                source: e,
            })?;

        let mut builder = AnnotationConfigBuilder::new().criteria(partial.criteria);
        if let Some(names) = partial.mask {
            let mask = names
                .into_iter()
                .fold(AnnotationMask::empty(), |mask, name| mask | AnnotationMask::from(name));
            builder = builder.mask(mask);
        }
        if let Some(cutoff) = partial.neighbor_cutoff {
            builder = builder.neighbor_cutoff(cutoff);
        }
        if let Some(keep_empty) = partial.keep_empty {
            builder = builder.keep_empty(keep_empty);
        }
        builder.build()
    }
}

#[derive(Default)]
pub struct AnnotationConfigBuilder {
    mask: Option<AnnotationMask>,
    criteria: Option<Criteria>,
    neighbor_cutoff: Option<Option<f64>>,
    keep_empty: Option<bool>,
}

impl AnnotationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mask(mut self, mask: AnnotationMask) -> Self {
        self.mask = Some(mask);
        self
    }
    pub fn criteria(mut self, criteria: Criteria) -> Self {
        self.criteria = Some(criteria);
        self
    }
    pub fn neighbor_cutoff(mut self, cutoff: f64) -> Self {
        self.neighbor_cutoff = Some(Some(cutoff));
        self
    }
    pub fn without_neighbor_cutoff(mut self) -> Self {
        self.neighbor_cutoff = Some(None);
        self
    }
    pub fn keep_empty(mut self, keep: bool) -> Self {
        self.keep_empty = Some(keep);
        self
    }

    pub fn build(self) -> Result<AnnotationConfig, ConfigError> {
        let defaults = AnnotationConfig::default();
        let mask = self.mask.unwrap_or(defaults.mask);
        if mask.is_empty() {
            return Err(ConfigError::MissingParameter("mask"));
        }
        let criteria = self.criteria.unwrap_or(defaults.criteria);
        criteria.validate()?;
        let neighbor_cutoff = self.neighbor_cutoff.unwrap_or(defaults.neighbor_cutoff);
        if let Some(cutoff) = neighbor_cutoff.filter(|c| !(c.is_finite() && *c > 0.0)) {
            return Err(ConfigError::InvalidValue {
                parameter: "neighbor-cutoff",
                reason: format!("expected a positive number, got {cutoff}"),
            });
        }
        Ok(AnnotationConfig {
            mask,
            criteria,
            neighbor_cutoff,
            keep_empty: self.keep_empty.unwrap_or(defaults.keep_empty),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn builder_defaults_match_documented_cutoffs() {
        let config = AnnotationConfigBuilder::new().build().unwrap();
        assert_eq!(config.mask, AnnotationMask::ALL);
        assert_eq!(config.criteria.pairing_cutoff, 0.8);
        assert_eq!(config.criteria.one_hbond_cutoff, 1.5);
        assert_eq!(config.criteria.two_hbond_cutoff, 2.1);
        assert_eq!(config.criteria.adjacency_bond_length, 2.0);
        assert_eq!(config.criteria.stacking.distance, 4.5);
        assert_eq!(config.criteria.network.min_score, 0.01);
        assert!(!config.keep_empty);
    }

    #[test]
    fn builder_rejects_an_empty_mask() {
        let result = AnnotationConfigBuilder::new()
            .mask(AnnotationMask::empty())
            .build();
        assert!(matches!(result, Err(ConfigError::MissingParameter("mask"))));
    }

    #[test]
    fn builder_rejects_inconsistent_cutoffs() {
        let criteria = Criteria {
            bh_min_distance: 3.5,
            ..Criteria::default()
        };
        let result = AnnotationConfigBuilder::new().criteria(criteria).build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue {
                parameter: "bh-min-distance",
                ..
            })
        ));

        let result = AnnotationConfigBuilder::new().neighbor_cutoff(-1.0).build();
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn loads_partial_toml_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
mask = ["pairing", "stacking"]
keep-empty = true

[criteria]
pairing-cutoff = 0.9

[criteria.network]
scorer = "binary"

[criteria.stacking]
tilt-degrees = 30.0
"#
        )
        .unwrap();

        let config = AnnotationConfig::load(file.path()).unwrap();
        assert_eq!(config.mask, AnnotationMask::PAIRING | AnnotationMask::STACKING);
        assert!(config.keep_empty);
        assert_eq!(config.criteria.pairing_cutoff, 0.9);
        assert_eq!(config.criteria.network.scorer, Scorer::Binary);
        assert_eq!(config.criteria.network.covalent_distance, 1.7);
        assert_eq!(config.criteria.stacking.tilt_degrees, 30.0);
        assert_eq!(config.criteria.stacking.distance, 4.5);
        assert_eq!(config.neighbor_cutoff, Some(20.0));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = AnnotationConfig::from_toml_str("pairing-cut = 0.5");
        assert!(matches!(result, Err(ConfigError::Toml { .. })));
    }

    #[test]
    fn missing_file_reports_its_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        match AnnotationConfig::load(&path) {
            Err(ConfigError::Io { path: reported, .. }) => assert!(reported.ends_with("absent.toml")),
            other => panic!("expected an I/O error, got {other:?}"),
        }
    }
}
