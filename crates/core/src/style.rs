//! The closed set of photography styles offered by the presentation layer.

use serde::{Deserialize, Serialize};

/// Visual style applied to generation prompts.
///
/// Exactly one style is active at a time in the presentation layer and is
/// passed along with each generation request. Changing it does not
/// invalidate already-generated images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageStyle {
    BrightModern,
    RusticDark,
    SocialMedia,
}

impl ImageStyle {
    /// Every style, in the order the presentation layer lists them.
    pub const ALL: &'static [ImageStyle] = &[
        ImageStyle::BrightModern,
        ImageStyle::RusticDark,
        ImageStyle::SocialMedia,
    ];

    /// Human-readable label shown in the style picker.
    pub fn label(self) -> &'static str {
        match self {
            ImageStyle::BrightModern => "Bright & Modern",
            ImageStyle::RusticDark => "Rustic & Dark",
            ImageStyle::SocialMedia => "Social Media",
        }
    }

    /// Fixed prompt fragment appended to every generation prompt for
    /// this style.
    pub fn prompt_fragment(self) -> &'static str {
        match self {
            ImageStyle::BrightModern => {
                "bright and airy, minimalist, clean white marble background, \
                 modern food photography, soft shadows, vibrant colors, professional"
            }
            ImageStyle::RusticDark => {
                "dramatic lighting, dark and moody, rustic wooden background, \
                 cinematic food photography, highly detailed, professional"
            }
            ImageStyle::SocialMedia => {
                "top-down flat lay, vibrant colors, popular on instagram, \
                 shot on a colorful surface, styled with fresh ingredients, professional"
            }
        }
    }
}

impl Default for ImageStyle {
    fn default() -> Self {
        ImageStyle::BrightModern
    }
}
