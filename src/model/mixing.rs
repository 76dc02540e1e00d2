use std::collections::BTreeMap;

use anyhow::Context;
use log::{debug, log_enabled, Level};
use serde::{Deserialize, Serialize};

use crate::error::MixingError;
use crate::math::matrix::ContactMatrix;
use crate::model::aggregate::{aggregate_ages, AgeCount, BracketCount};
use crate::model::brackets::{AgeBrackets, AgeToBracket};
use crate::model::contact::{aggregate_matrix, combine, symmetric_community_matrix, to_asymmetric};
use crate::model::setting::Setting;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MixingConfig {
    /// Inclusive `(min_age, max_age)` per bracket; bracket ids follow this order.
    pub brackets: Vec<(usize, usize)>,
    /// Weight of each setting in the combined matrix. Settings left out here do
    /// not contribute even when a matrix is supplied for them.
    pub weights: BTreeMap<Setting, f64>,
    /// Build the community layer from population when no community matrix is given.
    #[serde(default = "default_community_from_population")]
    pub community_from_population: bool,
}

fn default_community_from_population() -> bool {
    true
}

impl MixingConfig {
    pub fn check(&self) -> anyhow::Result<()> {
        anyhow::ensure!(!self.brackets.is_empty(), "at least one age bracket is required");
        for (i, (lo, hi)) in self.brackets.iter().enumerate() {
            anyhow::ensure!(lo <= hi, "bracket {} has min_age {} > max_age {}", i, lo, hi);
        }
        for (setting, w) in &self.weights {
            anyhow::ensure!(
                setting.is_canonical(),
                "custom setting {:?} shadows a built-in setting name",
                setting.code()
            );
            anyhow::ensure!(
                w.is_finite() && *w >= 0.0,
                "weight for setting {} must be finite and >= 0, got {}",
                setting,
                w
            );
        }
        AgeBrackets::from_bounds(&self.brackets)
            .context("age brackets do not partition the age range")?;
        Ok(())
    }
}

/// Per-bracket result of [`MixingModel::build`].
#[derive(Debug, Clone, Serialize)]
pub struct MixingOutput {
    /// Population of each bracket.
    pub bracket_sizes: BracketCount,
    /// Per-capita matrix of each weighted setting, at bracket level.
    pub per_setting: BTreeMap<Setting, ContactMatrix>,
    /// Weighted sum of `per_setting`.
    pub combined: ContactMatrix,
}

pub struct MixingModel {
    pub cfg: MixingConfig,
    brackets: AgeBrackets,
    age_by_brackets: AgeToBracket,
}

impl MixingModel {
    pub fn new(cfg: MixingConfig) -> anyhow::Result<Self> {
        cfg.check()?;
        let brackets = AgeBrackets::from_bounds(&cfg.brackets)?;
        let age_by_brackets = brackets.age_by_brackets();
        Ok(Self { cfg, brackets, age_by_brackets })
    }

    pub fn brackets(&self) -> &AgeBrackets {
        &self.brackets
    }

    pub fn age_by_brackets(&self) -> &AgeToBracket {
        &self.age_by_brackets
    }

    pub fn num_brackets(&self) -> usize {
        self.brackets.len()
    }

    /// Number of single-year ages the brackets cover, the dimension every
    /// per-age setting matrix must have.
    pub fn num_ages(&self) -> usize {
        self.age_by_brackets.len()
    }

    /// Bracket-level contact matrix from single-year population counts and
    /// per-age symmetric (total contact) matrices, one per setting.
    ///
    /// Each weighted setting matrix is block-summed into brackets and divided
    /// by bracket population. A weighted community setting without a matrix is
    /// synthesized from population when the config allows it. Every bracket
    /// must have a positive population, and every setting matrix must cover
    /// exactly the ages of the brackets.
    pub fn build(
        &self,
        ages: &AgeCount,
        matrices: &BTreeMap<Setting, ContactMatrix>,
    ) -> anyhow::Result<MixingOutput> {
        let bracket_sizes = aggregate_ages(ages, &self.age_by_brackets)
            .context("aggregating population into brackets")?;
        let labels = self.brackets.labels();
        for (b, n) in &bracket_sizes {
            anyhow::ensure!(*n > 0.0, "bracket {} ({}) has no population", b, labels[*b]);
        }
        debug!("bracket sizes: {:?}", bracket_sizes);

        let mut per_setting = BTreeMap::new();
        for setting in self.cfg.weights.keys() {
            let layer = match matrices.get(setting) {
                Some(m) => {
                    if m.dim() != self.num_ages() {
                        return Err(MixingError::ShapeMismatch {
                            expected: self.num_ages(),
                            found: format!("{0}x{0} for setting {1}", m.dim(), setting),
                        }
                        .into());
                    }
                    let total = aggregate_matrix(m, &self.age_by_brackets)
                        .with_context(|| format!("aggregating {} matrix into brackets", setting))?;
                    to_asymmetric(&total, &bracket_sizes)?
                }
                None if *setting == Setting::Community && self.cfg.community_from_population => {
                    let sizes: Vec<f64> = bracket_sizes.values().copied().collect();
                    let total =
                        symmetric_community_matrix(&sizes).context("building community matrix")?;
                    to_asymmetric(&total, &bracket_sizes)?
                }
                // left for combine to report
                None => continue,
            };
            if log_enabled!(Level::Debug) {
                debug!("setting {}: spectral radius {:.4}", setting, layer.spectral_radius());
            }
            per_setting.insert(setting.clone(), layer);
        }

        let combined = combine(&per_setting, &self.cfg.weights, self.num_brackets())
            .context("combining settings")?;
        Ok(MixingOutput { bracket_sizes, per_setting, combined })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(weights: &[(Setting, f64)]) -> MixingConfig {
        MixingConfig {
            brackets: vec![(0, 1), (2, 3)],
            weights: weights.iter().cloned().collect(),
            community_from_population: true,
        }
    }

    #[test]
    fn check_rejects_bad_configs() {
        let mut cfg = config(&[(Setting::Household, 1.0)]);
        assert!(cfg.check().is_ok());

        cfg.brackets = vec![(0, 1), (3, 4)];
        assert!(cfg.check().is_err());

        cfg.brackets = vec![(2, 1)];
        assert!(cfg.check().is_err());

        let neg = config(&[(Setting::Work, -1.0)]);
        assert!(neg.check().is_err());
    }

    #[test]
    fn missing_weighted_matrix_is_an_error() {
        let model = MixingModel::new(config(&[(Setting::School, 1.0)])).unwrap();
        let ages: AgeCount = (0..4).map(|a| (a, 10.0)).collect();
        let err = model.build(&ages, &BTreeMap::new()).unwrap_err();
        assert!(format!("{err:#}").contains("matrix for setting: S"));
    }

    #[test]
    fn empty_bracket_is_an_error() {
        let model = MixingModel::new(config(&[(Setting::Community, 1.0)])).unwrap();
        let ages: AgeCount = [(0, 5.0), (1, 5.0)].into_iter().collect();
        assert!(model.build(&ages, &BTreeMap::new()).is_err());
    }

    #[test]
    fn check_rejects_custom_setting_with_builtin_name() {
        let cfg = config(&[(Setting::Other("school".into()), 1.0)]);
        assert!(cfg.check().is_err());

        let ok = config(&[(Setting::Other("LTCF".into()), 1.0)]);
        assert!(ok.check().is_ok());
    }

    #[test]
    fn setting_matrix_must_cover_every_age() {
        let cfg = MixingConfig {
            brackets: vec![(0, 4), (5, 9)],
            weights: [(Setting::Household, 1.0)].into_iter().collect(),
            community_from_population: false,
        };
        let model = MixingModel::new(cfg).unwrap();
        assert_eq!(model.num_ages(), 10);
        let ages: AgeCount = (0..10).map(|a| (a, 10.0)).collect();

        let short: BTreeMap<Setting, ContactMatrix> =
            [(Setting::Household, ContactMatrix::from_fn(5, |_, _| 1.0))].into_iter().collect();
        let err = model.build(&ages, &short).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<MixingError>(),
            Some(MixingError::ShapeMismatch { expected: 10, .. })
        ));
        assert!(format!("{err}").contains("for setting H"));

        let full: BTreeMap<Setting, ContactMatrix> =
            [(Setting::Household, ContactMatrix::from_fn(10, |_, _| 1.0))].into_iter().collect();
        let out = model.build(&ages, &full).unwrap();
        // 25 contacts per block over 50 people per bracket
        assert_eq!(out.combined.rows(), &[vec![0.5, 0.5], vec![0.5, 0.5]]);
    }
}
