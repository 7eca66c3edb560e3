//! # Mock Recommender
//!
//! Deterministic stand-in for the live recommendation source. Used whenever no
//! access token is configured, and whenever the live call fails.
//!
//! The output is a pure function of `(seed, mood, catalog)`: the catalog is a
//! constant table passed in by the caller, the per-slot multipliers are fixed,
//! and nothing is randomized. Two calls with the same input produce
//! byte-identical candidates, reasons included.
//!
//! ```
//! use moodmix::mock;
//! use moodmix::track::{MoodVector, Track};
//!
//! let seed = Track::new("t1", "Test Track", "Someone");
//! let mood = MoodVector::new(0.5, 0.5, 0.5);
//! let candidates = mock::synthesize(&seed, &mood);
//! assert_eq!(candidates.len(), 6);
//! assert!(candidates[0].reason.contains("50% energy"));
//! ```

use crate::track::{clamp_unit, parse_duration, Candidate, MoodEstimate, MoodVector, Track};

/// How a slot's reason sentence is worded. `{e}`/`{v}` are the rounded
/// percentages, `{seed}` the seed's display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReasonTemplate {
    Shares,
    Aligns,
    CloselyMatches,
    Rhythmic,
    MatchFor,
}

impl ReasonTemplate {
    fn render(self, energy_pct: i64, valence_pct: i64, seed: &str) -> String {
        match self {
            ReasonTemplate::Shares => format!(
                "Recommended because it shares {energy_pct}% energy and {valence_pct}% valence with \"{seed}\"."
            ),
            ReasonTemplate::Aligns => format!(
                "Recommended because this track aligns with {energy_pct}% of the energy profile and {valence_pct}% of the mood of \"{seed}\"."
            ),
            ReasonTemplate::CloselyMatches => format!(
                "Recommended because it closely matches {energy_pct}% energy and {valence_pct}% valence of \"{seed}\"."
            ),
            ReasonTemplate::Rhythmic => format!(
                "Recommended because it shares {energy_pct}% rhythmic energy and {valence_pct}% emotional tone with \"{seed}\"."
            ),
            ReasonTemplate::MatchFor => format!(
                "Recommended for its {energy_pct}% energy match and {valence_pct}% mood similarity with \"{seed}\"."
            ),
        }
    }
}

/// One fixed row of the mock catalog.
#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    pub id: &'static str,
    pub title: &'static str,
    pub artist: &'static str,
    pub album: &'static str,
    pub duration: &'static str,
    pub image_url: &'static str,
    /// Energy multiplier, in percent.
    pub energy_multiplier: f64,
    /// Valence multiplier, in percent.
    pub valence_multiplier: f64,
    pub template: ReasonTemplate,
}

/// Constant table the recommender draws from.
#[derive(Debug, Clone, Copy)]
pub struct MockCatalog {
    pub entries: &'static [CatalogEntry],
}

const BUILTIN_ENTRIES: &[CatalogEntry] = &[
    CatalogEntry {
        id: "g1",
        title: "Midnight Dreams",
        artist: "Luna Wave",
        album: "Nocturnal",
        duration: "3:42",
        image_url: "https://images.unsplash.com/photo-1470225620780-dba8ba36b745?w=400&h=400&fit=crop",
        energy_multiplier: 100.0,
        valence_multiplier: 100.0,
        template: ReasonTemplate::Shares,
    },
    CatalogEntry {
        id: "g2",
        title: "Electric Horizon",
        artist: "Neon Coast",
        album: "Skywave",
        duration: "4:05",
        image_url: "https://images.unsplash.com/photo-1526170375885-4d8ecf77b99f?w=400&h=400&fit=crop",
        energy_multiplier: 95.0,
        valence_multiplier: 90.0,
        template: ReasonTemplate::Shares,
    },
    CatalogEntry {
        id: "g3",
        title: "Violet Echoes",
        artist: "Astral Bloom",
        album: "Reflections",
        duration: "2:58",
        image_url: "https://images.unsplash.com/photo-1507875703980-84f7b92febe1?w=400&h=400&fit=crop",
        energy_multiplier: 110.0,
        valence_multiplier: 85.0,
        template: ReasonTemplate::Aligns,
    },
    CatalogEntry {
        id: "g4",
        title: "Chrome Streetlights",
        artist: "Echo District",
        album: "Afterglow",
        duration: "3:21",
        image_url: "https://images.unsplash.com/photo-1507874457470-272b3c8d8ee2?w=400&h=400&fit=crop",
        energy_multiplier: 88.0,
        valence_multiplier: 92.0,
        template: ReasonTemplate::CloselyMatches,
    },
    CatalogEntry {
        id: "g5",
        title: "Crystal Pulse",
        artist: "Nova Circuit",
        album: "Lumina",
        duration: "3:55",
        image_url: "https://images.unsplash.com/photo-1535223289827-42f1e9919769?w=400&h=400&fit=crop",
        energy_multiplier: 102.0,
        valence_multiplier: 98.0,
        template: ReasonTemplate::Rhythmic,
    },
    CatalogEntry {
        id: "g6",
        title: "Silver Haze",
        artist: "Moon District",
        album: "Nebula Streets",
        duration: "4:11",
        image_url: "https://images.unsplash.com/photo-1526170375885-4d8ecf77b99f?w=400&h=400&fit=crop",
        energy_multiplier: 93.0,
        valence_multiplier: 87.0,
        template: ReasonTemplate::MatchFor,
    },
];

impl MockCatalog {
    /// The catalog shipped with this build.
    #[must_use]
    pub const fn builtin() -> Self {
        Self {
            entries: BUILTIN_ENTRIES,
        }
    }
}

impl Default for MockCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Synthesizes candidates from the builtin catalog.
#[must_use]
pub fn synthesize(seed: &Track, mood: &MoodVector) -> Vec<Candidate> {
    synthesize_with(&MockCatalog::builtin(), seed, mood)
}

/// Synthesizes one candidate per catalog entry, in catalog order.
///
/// Percentages are `round(axis * multiplier)`, half away from zero.
#[must_use]
pub fn synthesize_with(catalog: &MockCatalog, seed: &Track, mood: &MoodVector) -> Vec<Candidate> {
    let seed_name = seed.display_name();

    catalog
        .entries
        .iter()
        .map(|entry| {
            let energy_pct = percentage(mood.energy, entry.energy_multiplier);
            let valence_pct = percentage(mood.valence, entry.valence_multiplier);

            Candidate {
                track: Track {
                    id: entry.id.to_string(),
                    title: entry.title.to_string(),
                    artist: entry.artist.to_string(),
                    album_image_url: Some(entry.image_url.to_string()),
                    duration_ms: parse_duration(entry.duration),
                },
                album: entry.album.to_string(),
                reason: entry.template.render(energy_pct, valence_pct, seed_name),
                estimate: Some(MoodEstimate {
                    energy: clamp_unit(mood.energy * entry.energy_multiplier / 100.0),
                    valence: clamp_unit(mood.valence * entry.valence_multiplier / 100.0),
                }),
            }
        })
        .collect()
}

#[allow(clippy::cast_possible_truncation)]
fn percentage(axis: f64, multiplier: f64) -> i64 {
    (axis * multiplier).round() as i64
}

/// Seed tracks offered when search runs without a live source.
const MOCK_SEEDS: &[(&str, &str, &str, &str)] = &[
    (
        "s1",
        "Blinding Lights",
        "The Weeknd",
        "https://images.unsplash.com/photo-1526470608268-f674ce90ebd4?w=400&h=400&fit=crop",
    ),
    (
        "s2",
        "Save Your Tears",
        "The Weeknd",
        "https://images.unsplash.com/photo-1470229722913-7c0e2dbbafd3?w=400&h=400&fit=crop",
    ),
];

/// Case-insensitive substring search over title and artist of the mock seeds.
#[must_use]
pub fn search_mock(query: &str) -> Vec<Track> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }

    MOCK_SEEDS
        .iter()
        .filter(|(_, title, artist, _)| {
            title.to_lowercase().contains(&query) || artist.to_lowercase().contains(&query)
        })
        .map(|(id, title, artist, image)| Track {
            id: (*id).to_string(),
            title: (*title).to_string(),
            artist: (*artist).to_string(),
            album_image_url: Some((*image).to_string()),
            duration_ms: None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed() -> Track {
        Track::new("t1", "Test Track", "Tester")
    }

    #[test]
    fn test_synthesize_is_deterministic() {
        let mood = MoodVector::new(0.73, 0.2, 0.41);
        let first = synthesize(&seed(), &mood);
        let second = synthesize(&seed(), &mood);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_always_six_candidates_in_catalog_order() {
        let candidates = synthesize(&seed(), &MoodVector::default());
        let ids: Vec<&str> = candidates.iter().map(Candidate::id).collect();
        assert_eq!(ids, ["g1", "g2", "g3", "g4", "g5", "g6"]);
    }

    #[test]
    fn test_first_slot_percentage() {
        let mood = MoodVector::new(0.5, 0.1, 0.5);
        let candidates = synthesize(&seed(), &mood);
        let expected = format!("{}% energy", (0.5_f64 * 100.0).round() as i64);
        assert!(candidates[0].reason.contains(&expected));
        assert!(candidates[0].reason.contains("\"Test Track\""));
    }

    #[test]
    fn test_multipliers_and_rounding() {
        let mood = MoodVector::new(0.5, 0.5, 0.5);
        let candidates = synthesize(&seed(), &mood);
        // 0.5 * 95 = 47.5 rounds up, 0.5 * 90 = 45
        assert!(candidates[1].reason.contains("48% energy and 45% valence"));
        // 0.5 * 110 = 55, 0.5 * 85 = 42.5 rounds up
        assert!(candidates[2].reason.contains("55% of the energy profile and 43% of the mood"));
    }

    #[test]
    fn test_estimates_stay_in_range() {
        let mood = MoodVector::new(1.0, 1.0, 1.0);
        for candidate in synthesize(&seed(), &mood) {
            let estimate = candidate.estimate.expect("mock candidates carry estimates");
            assert!((0.0..=1.0).contains(&estimate.energy));
            assert!((0.0..=1.0).contains(&estimate.valence));
        }
    }

    #[test]
    fn test_untitled_seed_uses_fallback_name() {
        let untitled = Track::new("t9", "", "");
        let candidates = synthesize(&untitled, &MoodVector::default());
        assert!(candidates[0].reason.contains("\"your selected track\""));
    }

    #[test]
    fn test_injected_catalog() {
        const ONE: &[CatalogEntry] = &[CatalogEntry {
            id: "x1",
            title: "Only",
            artist: "Solo",
            album: "Single",
            duration: "1:00",
            image_url: "",
            energy_multiplier: 50.0,
            valence_multiplier: 50.0,
            template: ReasonTemplate::MatchFor,
        }];
        let catalog = MockCatalog { entries: ONE };
        let candidates = synthesize_with(&catalog, &seed(), &MoodVector::new(1.0, 0.0, 1.0));
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].track.duration_ms, Some(60_000));
        assert!(candidates[0].reason.starts_with("Recommended for its 50% energy match"));
    }

    #[test]
    fn test_mock_search() {
        assert_eq!(search_mock("weeknd").len(), 2);
        assert_eq!(search_mock("  TEARS ")[0].id, "s2");
        assert!(search_mock("").is_empty());
        assert!(search_mock("zzz").is_empty());
    }
}
