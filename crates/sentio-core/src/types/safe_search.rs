//! Image safety annotations.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

/// Likelihood scale used by the vision backend.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, AsRefStr,
    Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Likelihood {
    #[default]
    Unknown,
    VeryUnlikely,
    Unlikely,
    Possible,
    Likely,
    VeryLikely,
}

/// Safe-search verdicts for a single image.
///
/// Observed and logged only; never part of a published payload.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafeSearchAnnotation {
    pub adult: Likelihood,
    pub spoof: Likelihood,
    pub medical: Likelihood,
    pub violence: Likelihood,
}

impl SafeSearchAnnotation {
    /// Returns the highest likelihood across all categories.
    pub fn max_likelihood(&self) -> Likelihood {
        [self.adult, self.spoof, self.medical, self.violence]
            .into_iter()
            .max()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn annotation_wire_format() {
        let annotation: SafeSearchAnnotation = serde_json::from_str(
            r#"{"adult":"VERY_UNLIKELY","spoof":"POSSIBLE","medical":"UNLIKELY","violence":"LIKELY","racy":"UNLIKELY"}"#,
        )
        .unwrap();
        assert_eq!(annotation.spoof, Likelihood::Possible);
        assert_eq!(annotation.max_likelihood(), Likelihood::Likely);
        assert_eq!(Likelihood::VeryUnlikely.to_string(), "VERY_UNLIKELY");
    }
}
