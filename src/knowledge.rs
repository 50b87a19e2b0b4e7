//! Subject domains and the domain-scoped knowledge base.
//!
//! Domain detection is keyword voting over four fixed domains. The knowledge
//! base maps each domain to ordered categories of canonical concept names; the
//! built-in content can be replaced by a TOML file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{KnowledgeError, KnowledgeResult};

/// Coarse subject domain of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    History,
    Economics,
    Mathematics,
    Physics,
    /// No domain keyword matched.
    General,
}

impl Domain {
    /// Detectable domains in tie-break order.
    pub const DETECTABLE: [Domain; 4] = [
        Domain::History,
        Domain::Economics,
        Domain::Mathematics,
        Domain::Physics,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::History => "history",
            Self::Economics => "economics",
            Self::Mathematics => "mathematics",
            Self::Physics => "physics",
            Self::General => "general",
        }
    }

    /// Keywords whose presence votes for this domain.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Self::History => &[
                "civilization", "empire", "period", "ancient", "medieval", "ruler", "dynasty",
            ],
            Self::Economics => &[
                "economy", "market", "price", "policy", "gdp", "inflation", "trade",
            ],
            Self::Mathematics => &[
                "equation", "formula", "theorem", "calculate", "solve", "derivative", "integral",
            ],
            Self::Physics => &[
                "force", "energy", "motion", "electric", "magnetic", "wave", "particle",
            ],
            Self::General => &[],
        }
    }

    /// Label returned when nothing at all was extracted.
    pub fn default_label(&self) -> &'static str {
        match self {
            Self::History => "Historical Analysis",
            Self::Economics => "Economic Theory",
            Self::Mathematics => "Mathematical Concepts",
            Self::Physics => "Physics Principles",
            Self::General => "Academic Knowledge",
        }
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detect the domain of already-lowercased text.
///
/// Each domain scores one point per keyword present (substring match). The
/// highest score wins; ties go to the earlier domain in
/// [`Domain::DETECTABLE`]. All-zero scores yield [`Domain::General`].
pub fn detect_domain(text_lower: &str) -> Domain {
    let mut best = Domain::General;
    let mut best_score = 0usize;
    for domain in Domain::DETECTABLE {
        let score = domain
            .keywords()
            .iter()
            .filter(|kw| text_lower.contains(*kw))
            .count();
        if score > best_score {
            best = domain;
            best_score = score;
        }
    }
    best
}

/// A named group of canonical concepts within a domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeCategory {
    pub name: String,
    pub concepts: Vec<String>,
}

impl KnowledgeCategory {
    fn new(name: &str, concepts: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            concepts: concepts.iter().map(|c| (*c).to_string()).collect(),
        }
    }
}

/// Domain → ordered categories of canonical concept names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeBase {
    #[serde(default)]
    pub history: Vec<KnowledgeCategory>,
    #[serde(default)]
    pub economics: Vec<KnowledgeCategory>,
    #[serde(default)]
    pub mathematics: Vec<KnowledgeCategory>,
    #[serde(default)]
    pub physics: Vec<KnowledgeCategory>,
}

impl KnowledgeBase {
    /// Categories for a domain. [`Domain::General`] has none.
    pub fn categories(&self, domain: Domain) -> &[KnowledgeCategory] {
        match domain {
            Domain::History => &self.history,
            Domain::Economics => &self.economics,
            Domain::Mathematics => &self.mathematics,
            Domain::Physics => &self.physics,
            Domain::General => &[],
        }
    }

    /// Parse a knowledge base from TOML.
    pub fn from_toml_str(content: &str) -> KnowledgeResult<Self> {
        toml::from_str(content).map_err(|e| KnowledgeError::Parse {
            message: e.to_string(),
        })
    }

    /// Read a knowledge base TOML file.
    pub fn load(path: &Path) -> KnowledgeResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| KnowledgeError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Total number of concepts across all domains.
    pub fn concept_count(&self) -> usize {
        Domain::DETECTABLE
            .iter()
            .flat_map(|d| self.categories(*d))
            .map(|c| c.concepts.len())
            .sum()
    }

    /// The built-in knowledge base.
    pub fn builtin() -> Self {
        Self {
            history: vec![
                KnowledgeCategory::new(
                    "civilizations",
                    &["Indus Valley Civilization", "Harappan Civilization", "Mesopotamian Civilization"],
                ),
                KnowledgeCategory::new(
                    "empires",
                    &["Mauryan Empire", "Gupta Empire", "Mughal Empire", "British Empire", "Roman Empire"],
                ),
                KnowledgeCategory::new(
                    "periods",
                    &["Ancient Period", "Medieval Period", "Modern Period", "Vedic Period", "Colonial Period"],
                ),
                KnowledgeCategory::new(
                    "rulers",
                    &["Ashoka", "Chandragupta Maurya", "Akbar", "Shah Jahan", "Aurangzeb"],
                ),
                KnowledgeCategory::new(
                    "concepts",
                    &[
                        "Land Revenue Systems",
                        "Village Administration",
                        "Temple Architecture",
                        "Trade and Commerce",
                        "Social Structure",
                        "Religious Movements",
                    ],
                ),
                KnowledgeCategory::new(
                    "art_culture",
                    &[
                        "Gandhara Art",
                        "Mathura School",
                        "Temple Architecture",
                        "Sculpture",
                        "Literature",
                        "Painting",
                        "Music and Dance",
                    ],
                ),
            ],
            economics: vec![
                KnowledgeCategory::new(
                    "theories",
                    &["Keynesian Economics", "Classical Economics", "Monetarism", "Supply-side Economics"],
                ),
                KnowledgeCategory::new(
                    "policies",
                    &["Monetary Policy", "Fiscal Policy", "Trade Policy", "Industrial Policy"],
                ),
                KnowledgeCategory::new(
                    "concepts",
                    &["Inflation", "Deflation", "GDP", "GNP", "Balance of Payments", "Exchange Rates"],
                ),
                KnowledgeCategory::new(
                    "markets",
                    &["Perfect Competition", "Monopoly", "Oligopoly", "Monopolistic Competition"],
                ),
                KnowledgeCategory::new(
                    "indicators",
                    &["Consumer Price Index", "Producer Price Index", "Unemployment Rate", "Interest Rates"],
                ),
            ],
            mathematics: vec![
                KnowledgeCategory::new(
                    "calculus",
                    &["Differential Calculus", "Integral Calculus", "Limits and Continuity"],
                ),
                KnowledgeCategory::new(
                    "algebra",
                    &["Linear Algebra", "Abstract Algebra", "Polynomial Equations", "Matrix Theory"],
                ),
                KnowledgeCategory::new(
                    "geometry",
                    &["Euclidean Geometry", "Coordinate Geometry", "Trigonometry", "Solid Geometry"],
                ),
                KnowledgeCategory::new(
                    "statistics",
                    &["Probability Theory", "Statistical Inference", "Regression Analysis"],
                ),
                KnowledgeCategory::new(
                    "number_theory",
                    &["Prime Numbers", "Number Systems", "Modular Arithmetic"],
                ),
            ],
            physics: vec![
                KnowledgeCategory::new(
                    "mechanics",
                    &["Classical Mechanics", "Quantum Mechanics", "Fluid Mechanics"],
                ),
                KnowledgeCategory::new(
                    "thermodynamics",
                    &["Laws of Thermodynamics", "Heat Transfer", "Kinetic Theory"],
                ),
                KnowledgeCategory::new(
                    "electromagnetism",
                    &["Electrostatics", "Magnetism", "Electromagnetic Induction", "Maxwell Equations"],
                ),
                KnowledgeCategory::new(
                    "optics",
                    &["Geometrical Optics", "Wave Optics", "Laser Physics"],
                ),
                KnowledgeCategory::new(
                    "modern_physics",
                    &["Relativity Theory", "Atomic Structure", "Nuclear Physics", "Particle Physics"],
                ),
            ],
        }
    }
}
