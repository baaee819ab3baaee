//! Output file naming convention.
//!
//! Filenames are a pure function of category and id so that re-running a
//! plan overwrites the same files instead of accumulating copies.

use crate::category::ImageCategory;
use crate::types::ImageId;

/// Generate the PNG filename for an image.
///
/// Convention: `{category}_{id:03}.png`.
///
/// # Examples
///
/// ```
/// use xgen_core::naming::image_filename;
/// use xgen_core::ImageCategory;
///
/// assert_eq!(image_filename(ImageCategory::Header, 7), "header_007.png");
/// assert_eq!(image_filename(ImageCategory::Profile, 151), "profile_151.png");
/// ```
pub fn image_filename(category: ImageCategory, image_id: ImageId) -> String {
    format!("{}_{:03}.png", category.as_str(), image_id)
}
