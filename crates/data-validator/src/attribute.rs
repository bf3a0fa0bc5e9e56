//! Declared Request Attributes

use serde::Serialize;

/// Extra bound checked after the declared range
///
/// Used for realism floors/ceilings that are stricter than the field range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rule {
    /// Values below this are rejected
    pub min: Option<f64>,
    /// Values above this are rejected
    pub max: Option<f64>,
    /// Reported when the rule fails
    pub message: &'static str,
}

impl Rule {
    /// Reject values below `min`
    pub const fn at_least(min: f64, message: &'static str) -> Self {
        Self {
            min: Some(min),
            max: None,
            message,
        }
    }

    /// Reject values above `max`
    pub const fn at_most(max: f64, message: &'static str) -> Self {
        Self {
            min: None,
            max: Some(max),
            message,
        }
    }

    /// Whether `value` satisfies the rule
    pub fn allows(&self, value: f64) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }
}

/// Constraint attached to an attribute
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Constraint {
    /// Inclusive numeric range
    Range {
        range: (f64, f64),
        integer: bool,
        rules: Vec<Rule>,
    },
    /// Case-insensitive membership in a fixed set (stored lower-case)
    OneOf { categories: &'static [&'static str] },
}

/// One declared request attribute
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub constraint: Constraint,
}

impl AttributeSpec {
    /// Integer attribute with inclusive bounds
    pub fn integer(name: &'static str, min: f64, max: f64, description: &'static str) -> Self {
        Self {
            name,
            description,
            constraint: Constraint::Range {
                range: (min, max),
                integer: true,
                rules: Vec::new(),
            },
        }
    }

    /// Float attribute with inclusive bounds
    pub fn float(name: &'static str, min: f64, max: f64, description: &'static str) -> Self {
        Self {
            name,
            description,
            constraint: Constraint::Range {
                range: (min, max),
                integer: false,
                rules: Vec::new(),
            },
        }
    }

    /// Categorical attribute
    pub fn categorical(
        name: &'static str,
        categories: &'static [&'static str],
        description: &'static str,
    ) -> Self {
        Self {
            name,
            description,
            constraint: Constraint::OneOf { categories },
        }
    }

    /// Add a realism rule; ignored for categorical attributes
    pub fn with_rule(mut self, rule: Rule) -> Self {
        if let Constraint::Range { rules, .. } = &mut self.constraint {
            rules.push(rule);
        }
        self
    }

    /// Categories of a categorical attribute
    pub fn categories(&self) -> Option<&'static [&'static str]> {
        match self.constraint {
            Constraint::OneOf { categories } => Some(categories),
            Constraint::Range { .. } => None,
        }
    }

    pub fn is_categorical(&self) -> bool {
        self.categories().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_bounds() {
        let floor = Rule::at_least(40.0, "too low");
        assert!(!floor.allows(39.0));
        assert!(floor.allows(40.0));

        let ceiling = Rule::at_most(15.0, "too high");
        assert!(ceiling.allows(15.0));
        assert!(!ceiling.allows(16.0));
    }

    #[test]
    fn test_rules_only_attach_to_numbers() {
        let attr = AttributeSpec::categorical("sex", &["male", "female"], "")
            .with_rule(Rule::at_least(1.0, "ignored"));
        assert_eq!(
            attr.constraint,
            Constraint::OneOf {
                categories: &["male", "female"],
            }
        );
        assert!(attr.is_categorical());
    }
}
