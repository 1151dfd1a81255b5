//! Pass specifications for the render graph.
//!
//! This module defines the data model for passes used by the render graph
//! subsystem. Each [`PassSpec`] names one fragment function, its parameters and
//! the texture slots it reads.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::passgraph::PassId;

/// Default for float parameters left unset.
pub const DEFAULT_FLOAT_PARAM: f32 = 1.0;

/// Parameters for the distance-ring pass.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CircleFieldParams {
    /// Vertical swing of the ring center, multiplied by `sin(time)`.
    pub amplitude: f32,
    /// Repetitions of the horizontal `fract` ramp across the frame.
    pub ramp_frequency: f32,
}

impl CircleFieldParams {
    pub fn new(amplitude: f32, ramp_frequency: f32) -> Self {
        Self {
            amplitude,
            ramp_frequency,
        }
    }
}

impl Default for CircleFieldParams {
    fn default() -> Self {
        Self::new(DEFAULT_FLOAT_PARAM, DEFAULT_FLOAT_PARAM)
    }
}

/// Parameters for the box-blur pass.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxBlurParams {
    /// Blur strength; the sample radius is `floor(blur_amount * 10)` texels.
    pub blur_amount: f32,
}

impl BoxBlurParams {
    pub fn new(blur_amount: f32) -> Self {
        Self { blur_amount }
    }
}

impl Default for BoxBlurParams {
    fn default() -> Self {
        Self::new(DEFAULT_FLOAT_PARAM)
    }
}

/// Where a texture slot reads from.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TextureSource {
    /// A texture registered in the [`crate::passgraph::TextureRegistry`].
    External(String),
    /// The rendered output of another pass in the same graph.
    Pass(PassId),
}

impl TextureSource {
    pub fn external(id: impl Into<String>) -> Self {
        TextureSource::External(id.into())
    }

    pub fn pass(id: impl Into<PassId>) -> Self {
        TextureSource::Pass(id.into())
    }

    /// The pass this slot depends on, if it is a render-graph edge.
    pub fn pass_id(&self) -> Option<&PassId> {
        match self {
            TextureSource::Pass(id) => Some(id),
            TextureSource::External(_) => None,
        }
    }
}

/// Specification of a pass in the render graph.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub enum PassSpec {
    CircleField {
        /// Ring parameters.
        params: CircleFieldParams,
    },
    Gradient,
    RadialField,
    AnimatedRadial {
        /// Texture multiplied into the radial field.
        texture: TextureSource,
    },
    BoxBlur {
        /// The image to blur, normally a prior pass.
        source: TextureSource,
        /// Blur parameters.
        params: BoxBlurParams,
    },
}

impl PassSpec {
    /// Returns the texture slots read by this pass.
    pub fn texture_inputs(&self) -> Vec<&TextureSource> {
        match self {
            PassSpec::AnimatedRadial { texture } => vec![texture],
            PassSpec::BoxBlur { source, .. } => vec![source],
            PassSpec::CircleField { .. } | PassSpec::Gradient | PassSpec::RadialField => {
                Vec::new()
            }
        }
    }

    /// Returns the passes this pass reads from.
    pub fn pass_inputs(&self) -> Vec<&PassId> {
        self.texture_inputs()
            .into_iter()
            .filter_map(TextureSource::pass_id)
            .collect()
    }

    /// Short, stable name of the pass kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            PassSpec::CircleField { .. } => "circle-field",
            PassSpec::Gradient => "gradient",
            PassSpec::RadialField => "radial-field",
            PassSpec::AnimatedRadial { .. } => "animated-radial",
            PassSpec::BoxBlur { .. } => "box-blur",
        }
    }

    /// Creates a distance-ring pass specification.
    pub fn circle_field(amplitude: f32, ramp_frequency: f32) -> Self {
        PassSpec::CircleField {
            params: CircleFieldParams::new(amplitude, ramp_frequency),
        }
    }

    /// Creates a linear gradient pass specification.
    pub fn gradient() -> Self {
        PassSpec::Gradient
    }

    /// Creates a radial field pass specification.
    pub fn radial_field() -> Self {
        PassSpec::RadialField
    }

    /// Creates an animated radial pass tinted by a registered texture.
    pub fn animated_radial(texture: TextureSource) -> Self {
        PassSpec::AnimatedRadial { texture }
    }

    /// Creates a box-blur pass reading the output of another pass.
    pub fn box_blur(source_pass: impl Into<PassId>, blur_amount: f32) -> Self {
        PassSpec::BoxBlur {
            source: TextureSource::Pass(source_pass.into()),
            params: BoxBlurParams::new(blur_amount),
        }
    }

    /// Creates a box-blur pass reading an arbitrary texture slot.
    pub fn box_blur_from(source: TextureSource, blur_amount: f32) -> Self {
        PassSpec::BoxBlur {
            source,
            params: BoxBlurParams::new(blur_amount),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_params_default_to_one() {
        assert_eq!(CircleFieldParams::default(), CircleFieldParams::new(1.0, 1.0));
        assert_eq!(BoxBlurParams::default().blur_amount, 1.0);
    }

    #[test]
    fn pass_inputs_only_list_graph_edges() {
        let blur = PassSpec::box_blur("main", 0.3);
        assert_eq!(blur.pass_inputs(), vec![&"main".to_string()]);

        let tinted = PassSpec::animated_radial(TextureSource::external("albedo"));
        assert_eq!(tinted.texture_inputs().len(), 1);
        assert!(tinted.pass_inputs().is_empty());

        assert!(PassSpec::gradient().texture_inputs().is_empty());
        assert!(PassSpec::circle_field(1.0, 1.0).texture_inputs().is_empty());
    }

    #[test]
    fn kind_names_are_stable() {
        assert_eq!(PassSpec::radial_field().kind_name(), "radial-field");
        assert_eq!(PassSpec::box_blur("a", 0.0).kind_name(), "box-blur");
    }
}
