//! Learning-style profile: quiz scoring and persistence.
//!
//! The personalization quiz tallies one vote per question; the dominant
//! style personalizes the tutor's tone. The profile lives as a small JSON
//! file in the platform data directory.

use std::fs;
use std::io;

use serde::{Deserialize, Serialize};

use crate::core::paths;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LearningStyle {
    Interactor,
    Architect,
    ProblemSolver,
    Adventurer,
}

impl LearningStyle {
    pub const ALL: [LearningStyle; 4] = [
        LearningStyle::Interactor,
        LearningStyle::Architect,
        LearningStyle::ProblemSolver,
        LearningStyle::Adventurer,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            LearningStyle::Interactor => "The Interactor",
            LearningStyle::Architect => "The Architect",
            LearningStyle::ProblemSolver => "The Problem Solver",
            LearningStyle::Adventurer => "The Adventurer",
        }
    }

    /// One-line study strategy fed into the tutor's system prompt.
    pub fn strategy(&self) -> &'static str {
        match self {
            LearningStyle::Interactor => {
                "explain ideas out loud and check understanding through dialogue"
            }
            LearningStyle::Architect => {
                "structured notes and methodical step-by-step derivations"
            }
            LearningStyle::ProblemSolver => {
                "worked examples and trial-and-error problem practice"
            }
            LearningStyle::Adventurer => {
                "hands-on exercises, varied activities, and collaborative work"
            }
        }
    }

    /// Parse a style from its short or display form, case-insensitively.
    pub fn from_name(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        let s = s.strip_prefix("the ").unwrap_or(&s);
        match s {
            "interactor" => Some(LearningStyle::Interactor),
            "architect" => Some(LearningStyle::Architect),
            "problem solver" | "problemsolver" | "problem-solver" => {
                Some(LearningStyle::ProblemSolver)
            }
            "adventurer" => Some(LearningStyle::Adventurer),
            _ => None,
        }
    }
}

/// Dominant style from per-style vote counts. On a tie the later style in
/// declaration order wins, matching the quiz's original resolution.
pub fn dominant_style(votes: &[(LearningStyle, u32)]) -> Option<LearningStyle> {
    let mut best: Option<(LearningStyle, u32)> = None;
    for &(style, count) in votes {
        match best {
            Some((_, best_count)) if best_count > count => {}
            _ => best = Some((style, count)),
        }
    }
    best.map(|(style, _)| style)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningProfile {
    pub user_id: u32,
    #[serde(default)]
    pub style: Option<LearningStyle>,
    /// 0-100 self-reported mastery, drives the progressive question tier.
    #[serde(default)]
    pub mastery: u8,
}

impl LearningProfile {
    pub fn new(user_id: u32) -> Self {
        Self {
            user_id,
            style: None,
            mastery: 0,
        }
    }
}

/// Load the profile, falling back to a fresh one for a missing or corrupt
/// file (with a warning, never an error: personalization is best-effort).
pub fn load(user_id: u32) -> LearningProfile {
    let Some(path) = paths::profile_file() else {
        return LearningProfile::new(user_id);
    };
    match fs::read_to_string(&path) {
        Ok(raw) => match serde_json::from_str(&raw) {
            Ok(profile) => profile,
            Err(e) => {
                log::warn!("corrupt profile at {}: {}", path.display(), e);
                LearningProfile::new(user_id)
            }
        },
        Err(_) => LearningProfile::new(user_id),
    }
}

pub fn save(profile: &LearningProfile) -> io::Result<()> {
    let path = paths::profile_file()
        .ok_or_else(|| io::Error::other("no home directory for profile"))?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(profile)
        .map_err(|e| io::Error::other(format!("serialize profile: {}", e)))?;
    fs::write(&path, json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dominant_style_picks_max() {
        let votes = [
            (LearningStyle::Interactor, 1),
            (LearningStyle::Architect, 3),
            (LearningStyle::ProblemSolver, 1),
            (LearningStyle::Adventurer, 0),
        ];
        assert_eq!(dominant_style(&votes), Some(LearningStyle::Architect));
    }

    #[test]
    fn dominant_style_tie_prefers_later() {
        let votes = [
            (LearningStyle::Interactor, 2),
            (LearningStyle::Architect, 2),
            (LearningStyle::ProblemSolver, 0),
            (LearningStyle::Adventurer, 2),
        ];
        assert_eq!(dominant_style(&votes), Some(LearningStyle::Adventurer));
    }

    #[test]
    fn dominant_style_empty() {
        assert_eq!(dominant_style(&[]), None);
    }

    #[test]
    fn style_from_name_variants() {
        assert_eq!(
            LearningStyle::from_name("The Problem Solver"),
            Some(LearningStyle::ProblemSolver)
        );
        assert_eq!(
            LearningStyle::from_name("architect"),
            Some(LearningStyle::Architect)
        );
        assert_eq!(LearningStyle::from_name("wizard"), None);
    }

    #[test]
    fn profile_round_trips_through_json() {
        let profile = LearningProfile {
            user_id: 7,
            style: Some(LearningStyle::Interactor),
            mastery: 55,
        };
        let json = serde_json::to_string(&profile).unwrap();
        let back: LearningProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(back.user_id, 7);
        assert_eq!(back.style, Some(LearningStyle::Interactor));
        assert_eq!(back.mastery, 55);
    }

    #[test]
    fn save_and_load_via_test_dir() {
        let tmp = tempfile::TempDir::new().unwrap();
        // Serialize access to the env var with a fixed test path.
        unsafe {
            std::env::set_var("NALA_TEST_DATA_DIR", tmp.path());
        }
        let mut profile = LearningProfile::new(3);
        profile.style = Some(LearningStyle::Adventurer);
        save(&profile).unwrap();
        let loaded = load(3);
        assert_eq!(loaded.style, Some(LearningStyle::Adventurer));
        unsafe {
            std::env::remove_var("NALA_TEST_DATA_DIR");
        }
    }
}
