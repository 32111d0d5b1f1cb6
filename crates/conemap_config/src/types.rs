//! Configuration types deserialized from `conemap.toml`.

use serde::Deserialize;

/// Largest cut size the mapper is allowed to configure.
pub const MAX_CUT_SIZE_LIMIT: usize = 16;

/// The top-level configuration parsed from `conemap.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct MapperConfig {
    /// Cut and cone bounds guaranteed by the upstream mapper.
    #[serde(default)]
    pub mapper: MapperSection,
    /// Depth-class delay model.
    pub delay: DelayConfig,
    /// Output constraint settings.
    #[serde(default)]
    pub required: RequiredConfig,
}

/// Bounds on cut structure that the cut-selection stage upholds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MapperSection {
    /// Maximum number of leaves in a best cut.
    #[serde(default = "default_max_cut_size")]
    pub max_cut_size: usize,
    /// Capacity of the queue used to walk the cone enclosed by a cut.
    ///
    /// Exceeding it means the mapper selected a cut whose enclosed cone is
    /// larger than it promised.
    #[serde(default = "default_cone_capacity")]
    pub cone_capacity: usize,
}

impl Default for MapperSection {
    fn default() -> Self {
        Self {
            max_cut_size: default_max_cut_size(),
            cone_capacity: default_cone_capacity(),
        }
    }
}

fn default_max_cut_size() -> usize {
    6
}

fn default_cone_capacity() -> usize {
    64
}

/// The delay model: one propagation delay per implementation depth class.
#[derive(Debug, Clone, Deserialize)]
pub struct DelayConfig {
    /// Delay in nanoseconds, indexed by a cut's depth class.
    pub table: Vec<f64>,
}

/// Output constraint settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequiredConfig {
    /// Required time in nanoseconds applied to every combinational output
    /// before propagation. When unset, the outputs keep the required times
    /// stored in the network.
    pub output: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapper_section_defaults() {
        let section = MapperSection::default();
        assert_eq!(section.max_cut_size, 6);
        assert_eq!(section.cone_capacity, 64);
    }

    #[test]
    fn partial_mapper_section_fills_defaults() {
        let section: MapperSection = toml::from_str("max_cut_size = 4").unwrap();
        assert_eq!(section.max_cut_size, 4);
        assert_eq!(section.cone_capacity, 64);
    }

    #[test]
    fn required_output_is_optional() {
        let required: RequiredConfig = toml::from_str("").unwrap();
        assert!(required.output.is_none());
        let required: RequiredConfig = toml::from_str("output = 12.5").unwrap();
        assert_eq!(required.output, Some(12.5));
    }
}
