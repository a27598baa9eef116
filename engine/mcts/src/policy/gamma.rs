//! Gamma shaping for the Plackett-Luce policy.
//!
//! Gamma sharpens (gamma > 1) or flattens (gamma < 1) the estimated skill
//! distribution before sampling. It grows with the number of visits of a
//! node: no support means uniform choice, a well-observed node is exploited.

use std::f64::consts::PI;

use crate::config::ConfigError;

/// Maps node statistics to a gamma exponent.
pub trait GammaFunction {
    /// * `visits` - playouts that went through the node
    /// * `node_probability` - product of the local selection probabilities on
    ///   the way from the root
    /// * `relative_depth` - position of the node in the longest playout through
    ///   it, divided by that playout's length
    /// * `num_children` - branching factor of the node
    fn gamma(
        &self,
        visits: u64,
        node_probability: f64,
        relative_depth: f64,
        num_children: usize,
    ) -> f64;
}

/// Half-cosine ramp to 1, then linear ramp to `max_gamma`.
///
/// Below the support threshold gamma is 0. The threshold is
/// `max(min_support_abs, round(min_support_init * node_probability))`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CosLinGamma {
    pub max_gamma: f64,
    pub visits_for_one: u64,
    pub visits_for_max: u64,
    pub min_support_init: u64,
    pub min_support_abs: u64,
}

impl CosLinGamma {
    pub fn new(
        max_gamma: f64,
        visits_for_one: u64,
        visits_for_max: u64,
        min_support_init: u64,
        min_support_abs: u64,
    ) -> Self {
        Self {
            max_gamma,
            visits_for_one,
            visits_for_max,
            min_support_init,
            min_support_abs,
        }
    }

    /// Same shape with all visit counts multiplied by `factor`
    pub fn scaled(&self, factor: u64) -> Self {
        Self {
            max_gamma: self.max_gamma,
            visits_for_one: self.visits_for_one * factor,
            visits_for_max: self.visits_for_max * factor,
            min_support_init: self.min_support_init * factor,
            min_support_abs: self.min_support_abs * factor,
        }
    }

    pub fn support_threshold(&self, node_probability: f64) -> u64 {
        let scaled = (self.min_support_init as f64 * node_probability).round() as u64;
        self.min_support_abs.max(scaled)
    }

    pub fn value(&self, visits: u64, node_probability: f64) -> f64 {
        let threshold = self.support_threshold(node_probability);
        if visits < threshold {
            return 0.0;
        }
        if visits < self.visits_for_one {
            let span = (self.visits_for_one - threshold) as f64;
            let progress = (visits - threshold) as f64 / span;
            return (1.0 - (PI * progress).cos()) / 2.0;
        }
        if visits < self.visits_for_max {
            let span = (self.visits_for_max - self.visits_for_one) as f64;
            let progress = (visits - self.visits_for_one) as f64 / span;
            return 1.0 + (self.max_gamma - 1.0) * progress;
        }
        self.max_gamma
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_gamma < 1.0 {
            return Err(ConfigError::Invalid {
                field: "max_gamma",
                reason: "must be at least 1".into(),
            });
        }
        if self.visits_for_max < self.visits_for_one {
            return Err(ConfigError::Invalid {
                field: "visits_for_max",
                reason: "must not be below visits_for_one".into(),
            });
        }
        Ok(())
    }
}

impl GammaFunction for CosLinGamma {
    fn gamma(&self, visits: u64, node_probability: f64, _relative_depth: f64, _num_children: usize) -> f64 {
        self.value(visits, node_probability)
    }
}

/// Blend of a short- and a long-horizon shape by relative depth.
///
/// Deep nodes follow the short horizon, shallow nodes the long one. The long
/// shape is given per child and scaled by the branching factor at each call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CombinedGamma {
    pub short: CosLinGamma,
    pub long_per_child: CosLinGamma,
}

impl CombinedGamma {
    pub fn new(short: CosLinGamma, long_per_child: CosLinGamma) -> Self {
        Self {
            short,
            long_per_child,
        }
    }
}

impl GammaFunction for CombinedGamma {
    fn gamma(
        &self,
        visits: u64,
        node_probability: f64,
        relative_depth: f64,
        num_children: usize,
    ) -> f64 {
        let depth = relative_depth.clamp(0.0, 1.0);
        let long = self.long_per_child.scaled(num_children.max(1) as u64);
        let short_gamma = self.short.value(visits, node_probability);
        let long_gamma = long.value(visits, node_probability);
        depth * short_gamma + (1.0 - depth) * long_gamma
    }
}
