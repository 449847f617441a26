//! Emotion - facial-emotion reading for one frame
//!
//! Scores are only ever used to rank. Ranking is a stable descending sort,
//! so equal scores keep the order the service returned them in. NaN scores
//! rank below every real score.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Top-K used when the reading is taken at startup
pub const DEFAULT_TOP_EMOTIONS: usize = 5;

/// A named emotion with its confidence score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionScore {
    pub name: String,
    pub score: f64,
}

impl EmotionScore {
    pub fn new(name: impl Into<String>, score: f64) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

/// Emotion list for the first detected face of a frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmotionReading {
    /// Identity assigned by the service when face tracking is enabled
    #[serde(default)]
    pub face_id: Option<String>,
    pub emotions: Vec<EmotionScore>,
}

impl EmotionReading {
    pub fn new(emotions: Vec<EmotionScore>) -> Self {
        Self {
            face_id: None,
            emotions,
        }
    }

    pub fn with_face_id(mut self, face_id: impl Into<String>) -> Self {
        self.face_id = Some(face_id.into());
        self
    }

    /// Highest-scoring `n` emotions, descending
    pub fn top_n(&self, n: usize) -> Vec<&EmotionScore> {
        let mut ranked: Vec<&EmotionScore> = self.emotions.iter().collect();
        // sort_by is stable
        ranked.sort_by(|a, b| by_score_desc(a.score, b.score));
        ranked.truncate(n);
        ranked
    }

    /// Top `n` names joined with ", ", or `None` when nothing is left
    pub fn top_phrase(&self, n: usize) -> Option<String> {
        let names: Vec<&str> = self.top_n(n).iter().map(|e| e.name.as_str()).collect();
        if names.is_empty() {
            None
        } else {
            Some(names.join(", "))
        }
    }
}

fn by_score_desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a)
        .unwrap_or_else(|| a.is_nan().cmp(&b.is_nan()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(scores: &[(&str, f64)]) -> EmotionReading {
        EmotionReading::new(
            scores
                .iter()
                .map(|(name, score)| EmotionScore::new(*name, *score))
                .collect(),
        )
    }

    #[test]
    fn test_top_n_sorted_descending() {
        let r = reading(&[
            ("Calmness", 0.2),
            ("Joy", 0.9),
            ("Boredom", 0.05),
            ("Interest", 0.6),
            ("Tiredness", 0.4),
            ("Confusion", 0.1),
        ]);

        let names: Vec<&str> = r.top_n(3).iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Joy", "Interest", "Tiredness"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let r = reading(&[("A", 0.5), ("B", 0.7), ("C", 0.5), ("D", 0.5)]);
        assert_eq!(r.top_phrase(4).as_deref(), Some("B, A, C, D"));
        assert_eq!(r.top_phrase(2).as_deref(), Some("B, A"));
    }

    #[test]
    fn test_fewer_than_k_returns_all() {
        let r = reading(&[("Joy", 0.3), ("Interest", 0.8)]);
        assert_eq!(r.top_phrase(5).as_deref(), Some("Interest, Joy"));
    }

    #[test]
    fn test_exactly_k_names() {
        let r = reading(&[
            ("a", 0.1),
            ("b", 0.2),
            ("c", 0.3),
            ("d", 0.4),
            ("e", 0.5),
            ("f", 0.6),
            ("g", 0.7),
        ]);
        let top = r.top_n(DEFAULT_TOP_EMOTIONS);
        assert_eq!(top.len(), DEFAULT_TOP_EMOTIONS);
        assert!(top.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_empty_reading_has_no_phrase() {
        assert_eq!(EmotionReading::default().top_phrase(5), None);
        assert_eq!(reading(&[("Joy", 0.9)]).top_phrase(0), None);
    }

    #[test]
    fn test_nan_scores_rank_last() {
        let r = reading(&[
            ("Glitch", f64::NAN),
            ("Joy", 0.9),
            ("Noise", -f64::NAN),
            ("Calm", 0.1),
        ]);
        assert_eq!(r.top_phrase(2).as_deref(), Some("Joy, Calm"));
        assert_eq!(r.top_phrase(4).as_deref(), Some("Joy, Calm, Glitch, Noise"));
    }
}
