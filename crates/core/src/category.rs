//! Image categories and the aspect ratio each one is generated at.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The two kinds of graphics a run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageCategory {
    /// Wide banner background (1500x500 target).
    Header,
    /// Square avatar.
    Profile,
}

impl ImageCategory {
    /// Processing order for a run: headers before profiles.
    pub const ALL: [ImageCategory; 2] = [ImageCategory::Header, ImageCategory::Profile];

    pub fn as_str(self) -> &'static str {
        match self {
            ImageCategory::Header => "header",
            ImageCategory::Profile => "profile",
        }
    }

    /// Plural form used in batch tags, e.g. `headers_batch_1`.
    pub fn plural(self) -> &'static str {
        match self {
            ImageCategory::Header => "headers",
            ImageCategory::Profile => "profiles",
        }
    }

    pub fn aspect_ratio(self) -> AspectRatio {
        match self {
            ImageCategory::Header => AspectRatio::Wide,
            ImageCategory::Profile => AspectRatio::Square,
        }
    }
}

impl fmt::Display for ImageCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape hint passed to the image-generation provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "3:1")]
    Wide,
    #[serde(rename = "1:1")]
    Square,
}

impl AspectRatio {
    pub fn as_str(self) -> &'static str {
        match self {
            AspectRatio::Wide => "3:1",
            AspectRatio::Square => "1:1",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
