use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::loader::{
    COL_ATTACK_TYPE, COL_DEFENSE_TYPE, COL_GOALKEEPER_STATUS, COL_PASS_STATUS, COL_SHOT_STATUS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Pass,
    Shot,
    Attack,
    Defense,
    Goalkeeper,
}

pub const CATEGORIES: [Category; 5] = [
    Category::Pass,
    Category::Shot,
    Category::Attack,
    Category::Defense,
    Category::Goalkeeper,
];

pub const PASS_STATUSES: [&str; 3] = ["succès", "manquée", "interceptée"];

/// Elimination bucket covering three or more beaten players.
pub const ELIMINATION_BUCKET: &str = "+2";
pub const ELIMINATION_BUCKET_MIN: u32 = 3;

const PASS_FILTERS: &[&str] = &["succès", "manquée", "interceptée", "0", "1", "2", "+2"];

const ATTACK_FILTERS: &[&str] = &[
    "joueurs franchis",
    "faute provoquée",
    "perte de balle",
    "possession conséquente",
];

const DEFENSE_FILTERS: &[&str] = &[
    "récupération avec ballon",
    "récupération provoquée",
    "interception",
    "interception manquée",
    "faute subie",
    "faute provoquée",
    "action défensive sans rec",
    "duel perdu",
];

const SHOT_FILTERS: &[&str] = &["but", "cadré", "contré", "non cadré", "poteau", "bar"];

const GOALKEEPER_FILTERS: &[&str] = &[
    "arrêt avec récupération",
    "arrêt avec possession adverse",
    "ballon capté",
    "but encaissé",
    "sortie avec interception",
    "sortie manquée",
];

static FILTERS: Lazy<HashMap<Category, &'static [&'static str]>> = Lazy::new(|| {
    HashMap::from([
        (Category::Pass, PASS_FILTERS),
        (Category::Attack, ATTACK_FILTERS),
        (Category::Defense, DEFENSE_FILTERS),
        (Category::Shot, SHOT_FILTERS),
        (Category::Goalkeeper, GOALKEEPER_FILTERS),
    ])
});

impl Category {
    /// Key used in match files and on the command line.
    pub fn key(self) -> &'static str {
        match self {
            Category::Pass => "passe",
            Category::Shot => "tir",
            Category::Attack => "attaque",
            Category::Defense => "défense",
            Category::Goalkeeper => "gardien",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Pass => "Passe",
            Category::Shot => "Tir",
            Category::Attack => "Attaque",
            Category::Defense => "Défense",
            Category::Goalkeeper => "Gardien",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim().to_lowercase();
        CATEGORIES.into_iter().find(|c| {
            c.key() == key || (key == "defense" && *c == Category::Defense)
        })
    }

    /// Column holding the outcome value tested by this category's filter.
    pub fn outcome_column(self) -> &'static str {
        match self {
            Category::Pass => COL_PASS_STATUS,
            Category::Shot => COL_SHOT_STATUS,
            Category::Attack => COL_ATTACK_TYPE,
            Category::Defense => COL_DEFENSE_TYPE,
            Category::Goalkeeper => COL_GOALKEEPER_STATUS,
        }
    }

    pub fn next(self) -> Self {
        let idx = CATEGORIES.iter().position(|c| *c == self).unwrap_or(0);
        CATEGORIES[(idx + 1) % CATEGORIES.len()]
    }

    pub fn prev(self) -> Self {
        let idx = CATEGORIES.iter().position(|c| *c == self).unwrap_or(0);
        CATEGORIES[(idx + CATEGORIES.len() - 1) % CATEGORIES.len()]
    }
}

pub fn filter_values(category: Category) -> &'static [&'static str] {
    FILTERS.get(&category).copied().unwrap_or(&[])
}

/// Lookup by raw category key; unknown keys have no selectable values.
pub fn filter_values_for_key(key: &str) -> &'static [&'static str] {
    Category::from_key(key)
        .map(filter_values)
        .unwrap_or(&[])
}

pub fn is_pass_status(token: &str) -> bool {
    PASS_STATUSES.contains(&token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_category_has_values() {
        for category in CATEGORIES {
            assert!(!filter_values(category).is_empty(), "{category:?}");
        }
    }

    #[test]
    fn unknown_key_is_empty() {
        assert!(filter_values_for_key("corner").is_empty());
        assert_eq!(filter_values_for_key("tir").len(), 6);
    }

    #[test]
    fn accented_and_plain_defense_keys() {
        assert_eq!(Category::from_key("défense"), Some(Category::Defense));
        assert_eq!(Category::from_key("Defense"), Some(Category::Defense));
    }

    #[test]
    fn category_cycle_wraps() {
        assert_eq!(Category::Goalkeeper.next(), Category::Pass);
        assert_eq!(Category::Pass.prev(), Category::Goalkeeper);
    }
}
