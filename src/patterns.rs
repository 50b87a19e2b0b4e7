//! Regex-driven concept recognition.
//!
//! Pattern tables are declarative data (category → rules) compiled once when
//! an extractor is built. A rule either names a fixed concept or turns the
//! matched text itself into a title-cased concept label.

use regex::Regex;

use crate::error::{PatternError, PatternResult};
use crate::scoring::{Candidate, CandidateSource};
use crate::text::title_case;

/// Confidence of every match produced by the hybrid pattern table.
pub const MATCHED_TEXT_CONFIDENCE: f32 = 0.8;

/// Hybrid strategy patterns: the matched text becomes the concept.
const HYBRID_PATTERNS: &[(&str, &[&str])] = &[
    (
        "historical_periods",
        &[
            r"\b(\d+(?:st|nd|rd|th)?\s+century)\b",
            r"\b(ancient|medieval|modern)\s+period\b",
            r"\b(harappan|mauryan|gupta|mughal|british)\s+(?:period|era|empire)\b",
        ],
    ),
    (
        "scientific_concepts",
        &[
            r"\b(law|principle|theorem|theory)\s+of\s+\w+\b",
            r"\b\w+(?:'s)?\s+(law|principle|theorem|theory)\b",
            r"\b(speed|velocity|acceleration|force|energy|power)\s+of\s+\w+\b",
        ],
    ),
    (
        "mathematical_concepts",
        &[
            r"\b(derivative|integral|equation|formula|function)\s+of\s+\w+\b",
            r"\b\w+\s+(equation|formula|function|theorem)\b",
            r"\b(area|volume|perimeter|surface)\s+of\s+\w+\b",
        ],
    ),
    (
        "economic_concepts",
        &[
            r"\b(law|principle|theory)\s+of\s+\w+\b",
            r"\b(monetary|fiscal|trade)\s+policy\b",
            r"\b(supply|demand|market|price)\s+\w+\b",
        ],
    ),
];

/// Knowledge-base strategy rules: (pattern, concept, confidence).
const DOMAIN_RULES: &[(&str, &[(&str, &str, f32)])] = &[
    (
        "historical_entities",
        &[
            (r"\b(harappan|indus valley)\b", "Indus Valley Civilization", 0.95),
            (r"\b(mauryan|chandragupta|ashoka)\b", "Mauryan Empire", 0.90),
            (r"\b(gupta)\b", "Gupta Period", 0.85),
            (r"\b(mughal|akbar|shah jahan|aurangzeb)\b", "Mughal Empire", 0.90),
            (r"\b(vedic|veda)\b", "Vedic Period", 0.85),
            (r"\b(british|colonial)\b", "Colonial Period", 0.80),
        ],
    ),
    (
        "economic_terms",
        &[
            (r"\b(gdp|gross domestic product)\b", "National Income Accounting", 0.95),
            (r"\b(inflation|price level)\b", "Inflation and Price Theory", 0.90),
            (r"\b(monetary policy|central bank)\b", "Monetary Policy", 0.95),
            (r"\b(fiscal policy|government spending)\b", "Fiscal Policy", 0.95),
            (r"\b(supply and demand|market)\b", "Market Theory", 0.85),
            (r"\b(perfect competition|monopoly)\b", "Market Structures", 0.90),
        ],
    ),
    (
        "mathematical_concepts",
        &[
            (r"\b(derivative|differentiation)\b", "Differential Calculus", 0.95),
            (r"\b(integral|integration)\b", "Integral Calculus", 0.95),
            (r"\b(matrix|matrices)\b", "Linear Algebra", 0.90),
            (r"\b(trigonometry|sine|cosine|tangent)\b", "Trigonometry", 0.90),
            (r"\b(probability|statistics)\b", "Probability and Statistics", 0.85),
            (r"\b(geometry|triangle|circle)\b", "Geometry", 0.80),
        ],
    ),
    (
        "physics_concepts",
        &[
            (r"\b(newton|force|motion)\b", "Classical Mechanics", 0.90),
            (r"\b(electric|electricity|current)\b", "Electricity and Magnetism", 0.90),
            (r"\b(light|optics|lens)\b", "Optics", 0.85),
            (r"\b(heat|temperature|thermodynamics)\b", "Thermodynamics", 0.90),
            (r"\b(atom|nuclear|particle)\b", "Modern Physics", 0.85),
            (r"\b(wave|frequency|wavelength)\b", "Wave Physics", 0.80),
        ],
    ),
];

/// What concept label a rule produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConceptTemplate {
    /// The title-cased text of each match.
    MatchedText,
    /// A fixed canonical label.
    Fixed(String),
}

/// One compiled recognition rule.
#[derive(Debug, Clone)]
pub struct PatternRule {
    pub category: String,
    pub regex: Regex,
    pub concept: ConceptTemplate,
    pub confidence: f32,
}

/// A compiled collection of rules, kept in table order.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    rules: Vec<PatternRule>,
}

impl PatternSet {
    /// The hybrid strategy's built-in table.
    pub fn hybrid() -> PatternResult<Self> {
        let mut set = Self::default();
        for (category, patterns) in HYBRID_PATTERNS {
            for pattern in *patterns {
                set.push(category, pattern, ConceptTemplate::MatchedText, MATCHED_TEXT_CONFIDENCE)?;
            }
        }
        Ok(set)
    }

    /// The knowledge-base strategy's built-in rule table.
    pub fn domain_rules() -> PatternResult<Self> {
        let mut set = Self::default();
        for (category, rules) in DOMAIN_RULES {
            for (pattern, concept, confidence) in *rules {
                set.push(
                    category,
                    pattern,
                    ConceptTemplate::Fixed((*concept).to_string()),
                    *confidence,
                )?;
            }
        }
        Ok(set)
    }

    /// Compile and append a rule.
    pub fn push(
        &mut self,
        category: &str,
        pattern: &str,
        concept: ConceptTemplate,
        confidence: f32,
    ) -> PatternResult<()> {
        let regex = Regex::new(pattern).map_err(|source| PatternError::InvalidRegex {
            category: category.to_string(),
            pattern: pattern.to_string(),
            source,
        })?;
        self.rules.push(PatternRule {
            category: category.to_string(),
            regex,
            concept,
            confidence,
        });
        Ok(())
    }

    /// Run every rule over already-lowercased text.
    ///
    /// Every non-overlapping match of every rule is one candidate; repeated
    /// labels are left for the caller's merge step.
    pub fn candidates(&self, text_lower: &str) -> Vec<Candidate> {
        let mut out = Vec::new();
        for rule in &self.rules {
            for m in rule.regex.find_iter(text_lower) {
                let concept = match &rule.concept {
                    ConceptTemplate::MatchedText => title_case(m.as_str().trim()),
                    ConceptTemplate::Fixed(label) => label.clone(),
                };
                if concept.is_empty() {
                    continue;
                }
                out.push(Candidate::new(concept, rule.confidence, CandidateSource::Pattern));
            }
        }
        out
    }

    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(cands: &[Candidate]) -> Vec<&str> {
        cands.iter().map(|c| c.concept.as_str()).collect()
    }

    #[test]
    fn builtin_tables_compile() {
        assert_eq!(PatternSet::hybrid().unwrap().len(), 12);
        assert_eq!(PatternSet::domain_rules().unwrap().len(), 24);
    }

    #[test]
    fn hybrid_matched_text_is_title_cased() {
        let set = PatternSet::hybrid().unwrap();
        let cands = set.candidates("how did monetary policy change in the 19th century?");
        let l = labels(&cands);
        assert!(l.contains(&"Monetary Policy"));
        assert!(l.contains(&"19th Century"));
        assert!(cands.iter().all(|c| c.confidence == MATCHED_TEXT_CONFIDENCE));
    }

    #[test]
    fn each_occurrence_is_a_candidate() {
        let set = PatternSet::hybrid().unwrap();
        let cands = set.candidates("fiscal policy versus fiscal policy");
        let count = cands.iter().filter(|c| c.concept == "Fiscal Policy").count();
        assert_eq!(count, 2);
    }

    #[test]
    fn domain_rules_emit_fixed_labels() {
        let set = PatternSet::domain_rules().unwrap();
        let cands = set.candidates("what is the effect of monetary policy on inflation?");
        let l = labels(&cands);
        assert!(l.contains(&"Monetary Policy"));
        assert!(l.contains(&"Inflation and Price Theory"));
        let mp = cands.iter().find(|c| c.concept == "Monetary Policy").unwrap();
        assert_eq!(mp.confidence, 0.95);
    }

    #[test]
    fn invalid_pattern_is_reported_with_category() {
        let mut set = PatternSet::default();
        let err = set
            .push("broken", r"(unclosed", ConceptTemplate::MatchedText, 0.5)
            .unwrap_err();
        let PatternError::InvalidRegex { category, .. } = err;
        assert_eq!(category, "broken");
    }
}
