use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Eating {
    Normal,
    Low,
    None,
}

impl Eating {
    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Low => "low",
            Self::None => "none",
        }
    }
}

impl FromStr for Eating {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "low" => Ok(Self::Low),
            "none" => Ok(Self::None),
            other => Err(format!("unknown eating value '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Movement {
    Active,
    Lazy,
    Limping,
}

impl Movement {
    pub fn label(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Lazy => "lazy",
            Self::Limping => "limping",
        }
    }
}

impl FromStr for Movement {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "lazy" => Ok(Self::Lazy),
            "limping" => Ok(Self::Limping),
            other => Err(format!("unknown movement value '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Calm,
    Aggressive,
    Anxious,
}

impl Mood {
    pub fn label(self) -> &'static str {
        match self {
            Self::Calm => "calm",
            Self::Aggressive => "aggressive",
            Self::Anxious => "anxious",
        }
    }
}

impl FromStr for Mood {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "calm" => Ok(Self::Calm),
            "aggressive" => Ok(Self::Aggressive),
            "anxious" => Ok(Self::Anxious),
            other => Err(format!("unknown mood value '{other}'")),
        }
    }
}

/// Any single qualifying field is enough to flag the observation; there
/// is no weighting or partial credit. The verdict is derived on every
/// read rather than persisted, so list and detail views recompute it
/// from the stored enums.
pub fn is_critical(eating: Eating, movement: Movement, mood: Mood) -> bool {
    eating == Eating::None || movement == Movement::Limping || mood == Mood::Aggressive
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BehaviorRecord {
    pub id: String,
    pub animal_id: String,
    pub recorded_by: String,
    pub eating: Eating,
    pub movement: Movement,
    pub mood: Mood,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub video_proof: Option<String>,
    pub recorded_at: String,
}

impl BehaviorRecord {
    pub fn is_critical(&self) -> bool {
        is_critical(self.eating, self.movement, self.mood)
    }
}

#[cfg(test)]
mod tests {
    use super::{Eating, Mood, Movement, is_critical};

    #[test]
    fn any_single_qualifying_field_is_critical() {
        assert!(is_critical(Eating::None, Movement::Active, Mood::Calm));
        assert!(is_critical(Eating::Normal, Movement::Limping, Mood::Calm));
        assert!(is_critical(Eating::Normal, Movement::Active, Mood::Aggressive));
    }

    #[test]
    fn non_qualifying_combinations_are_normal() {
        assert!(!is_critical(Eating::Normal, Movement::Active, Mood::Calm));
        assert!(!is_critical(Eating::Low, Movement::Active, Mood::Calm));
        assert!(!is_critical(Eating::Low, Movement::Lazy, Mood::Anxious));
        assert!(!is_critical(Eating::Normal, Movement::Lazy, Mood::Calm));
    }

    #[test]
    fn classifier_is_total_over_all_combinations() {
        let eatings = [Eating::Normal, Eating::Low, Eating::None];
        let movements = [Movement::Active, Movement::Lazy, Movement::Limping];
        let moods = [Mood::Calm, Mood::Aggressive, Mood::Anxious];

        let mut critical = 0;
        for eating in eatings {
            for movement in movements {
                for mood in moods {
                    if is_critical(eating, movement, mood) {
                        critical += 1;
                    }
                }
            }
        }

        // 27 combinations; the normal ones are exactly the 2x2x2 block
        // where no axis holds its qualifying value.
        assert_eq!(critical, 27 - 8);
    }

    #[test]
    fn parse_rejects_unknown_values() {
        assert!("grazing".parse::<Eating>().is_err());
        assert!("sprinting".parse::<Movement>().is_err());
        assert!("bored".parse::<Mood>().is_err());
    }
}
