//! Serializable graph configuration.
//!
//! [`GraphConfig`] mirrors the flat key set of a `[graph]` table in a TOML
//! file. It is deliberately loose (an orientation is a string, `k` may be
//! zero) so that a file always deserializes; [`GraphConfig::strategy`] is
//! where the values are checked and turned into a [`GraphStrategy`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use voxgraph_core::{Error, Result};

use crate::strategy::GraphStrategy;
use crate::symmetrize::{Directedness, Orientation};
use crate::triangulate::JoggledDelaunay;

/// Strategy selector as written in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    Loop,
    #[default]
    Complete,
    Delaunay,
    Mst,
    Knn,
    Bipartite,
}

impl FromStr for StrategyKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "loop" => Ok(Self::Loop),
            "complete" => Ok(Self::Complete),
            "delaunay" => Ok(Self::Delaunay),
            "mst" => Ok(Self::Mst),
            "knn" => Ok(Self::Knn),
            "bipartite" => Ok(Self::Bipartite),
            other => Err(Error::UnknownStrategy(other.to_string())),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Loop => "loop",
            Self::Complete => "complete",
            Self::Delaunay => "delaunay",
            Self::Mst => "mst",
            Self::Knn => "knn",
            Self::Bipartite => "bipartite",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DelaunayConfig {
    #[serde(default = "default_jitter")]
    pub jitter: f64,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for DelaunayConfig {
    fn default() -> Self {
        Self {
            jitter: default_jitter(),
            seed: default_seed(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl DelaunayConfig {
    const fn triangulator(&self) -> JoggledDelaunay {
        JoggledDelaunay {
            jitter: self.jitter,
            seed: self.seed,
            max_attempts: self.max_attempts,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphConfig {
    #[serde(default)]
    pub strategy: StrategyKind,
    #[serde(default)]
    pub max_dist: Option<f64>,
    #[serde(default = "default_k")]
    pub k: usize,
    #[serde(default = "default_true")]
    pub directed: bool,
    #[serde(default = "default_directed_to")]
    pub directed_to: String,
    #[serde(default)]
    pub delaunay: DelaunayConfig,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::default(),
            max_dist: None,
            k: default_k(),
            directed: default_true(),
            directed_to: default_directed_to(),
            delaunay: DelaunayConfig::default(),
        }
    }
}

impl GraphConfig {
    /// Validate the configuration and resolve it into a [`GraphStrategy`].
    ///
    /// Only the fields the selected strategy uses are checked.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidParameter`] for `k == 0` (kNN), a NaN `max_dist`,
    ///   or bad Delaunay jitter settings.
    /// - [`Error::UnknownOrientation`] for a directed bipartite graph whose
    ///   `directed_to` is not `primary` or `secondary`.
    pub fn strategy(&self) -> Result<GraphStrategy> {
        if self.max_dist.is_some_and(f64::is_nan) {
            return Err(Error::InvalidParameter {
                name: "max_dist",
                reason: "must not be NaN".into(),
            });
        }
        let max_dist = self.max_dist;
        Ok(match self.strategy {
            StrategyKind::Loop => GraphStrategy::Loop,
            StrategyKind::Complete => GraphStrategy::Complete { max_dist },
            StrategyKind::Delaunay => {
                let triangulator = self.delaunay.triangulator();
                triangulator.validate()?;
                GraphStrategy::Delaunay {
                    max_dist,
                    triangulator,
                }
            }
            StrategyKind::Mst => GraphStrategy::Mst { max_dist },
            StrategyKind::Knn => {
                if self.k == 0 {
                    return Err(Error::InvalidParameter {
                        name: "k",
                        reason: "must be at least 1".into(),
                    });
                }
                GraphStrategy::Knn { k: self.k }
            }
            StrategyKind::Bipartite => GraphStrategy::Bipartite {
                max_dist,
                directedness: Directedness::from_flags(self.directed, &self.directed_to)?,
            },
        })
    }
}

fn default_true() -> bool {
    true
}

fn default_k() -> usize {
    5
}

fn default_directed_to() -> String {
    Orientation::default().to_string()
}

fn default_jitter() -> f64 {
    JoggledDelaunay::default().jitter
}

fn default_seed() -> u64 {
    JoggledDelaunay::default().seed
}

fn default_max_attempts() -> u32 {
    JoggledDelaunay::default().max_attempts
}
