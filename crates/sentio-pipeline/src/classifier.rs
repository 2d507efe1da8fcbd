//! Sentiment classification of consumed text results.

use sentio_core::types::{ClassificationBucket, Entity};

/// Maps a sentiment score and magnitude to a discrete bucket.
///
/// Total and deterministic. The negative branch compares against `0.5`
/// exactly like the positive one, so every negative score with a positive
/// magnitude is `ClearlyNegative`. NaN scores are `Neutral`.
pub fn classify(score: f32, magnitude: f32) -> ClassificationBucket {
    if score > 0.0 {
        if score > 0.5 && magnitude > 0.0 {
            ClassificationBucket::ClearlyPositive
        } else {
            ClassificationBucket::Positive
        }
    } else if score < 0.0 {
        if score < 0.5 && magnitude > 0.0 {
            ClassificationBucket::ClearlyNegative
        } else {
            ClassificationBucket::Negative
        }
    } else {
        ClassificationBucket::Neutral
    }
}

/// Classifies the sentiment expressed towards an entity.
#[inline]
pub fn classify_entity(entity: &Entity) -> ClassificationBucket {
    classify(entity.sentiment.score, entity.sentiment.magnitude)
}

/// Renders the text artifact: one `"\n" + bucket + name` line per entity,
/// in the given order.
pub fn render_entities(entities: &[Entity]) -> String {
    entities.iter().fold(String::new(), |mut out, entity| {
        out.push('\n');
        out.push_str(classify_entity(entity).as_ref());
        out.push_str(&entity.name);
        out
    })
}

#[cfg(test)]
mod tests {
    use sentio_core::types::SentimentScore;

    use super::*;

    fn entity(name: &str, score: f32, magnitude: f32) -> Entity {
        Entity::new(name, SentimentScore { score, magnitude })
    }

    #[test]
    fn positive_branch() {
        assert_eq!(classify(0.6, 1.0), ClassificationBucket::ClearlyPositive);
        assert_eq!(classify(0.3, 1.0), ClassificationBucket::Positive);
        assert_eq!(classify(0.5, 1.0), ClassificationBucket::Positive);
        assert_eq!(classify(0.9, 0.0), ClassificationBucket::Positive);
    }

    #[test]
    fn negative_branch() {
        assert_eq!(classify(-0.6, 1.0), ClassificationBucket::ClearlyNegative);
        assert_eq!(classify(-0.1, 0.2), ClassificationBucket::ClearlyNegative);
        assert_eq!(classify(-0.6, 0.0), ClassificationBucket::Negative);
    }

    #[test]
    fn neutral() {
        assert_eq!(classify(0.0, 0.0), ClassificationBucket::Neutral);
        assert_eq!(classify(0.0, 3.0), ClassificationBucket::Neutral);
        assert_eq!(classify(-0.0, 1.0), ClassificationBucket::Neutral);
        assert_eq!(classify(f32::NAN, 1.0), ClassificationBucket::Neutral);
    }

    #[test]
    fn render_preserves_order() {
        let rendered = render_entities(&[
            entity("Acme", 0.6, 2.0),
            entity("Globex", -0.4, 1.0),
            entity("Initech", 0.0, 0.0),
        ]);
        assert_eq!(
            rendered,
            "\nClearlyPositiveAcme\nClearlyNegativeGlobex\nNeutralInitech"
        );
    }

    #[test]
    fn render_empty() {
        assert_eq!(render_entities(&[]), "");
    }
}
