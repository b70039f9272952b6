use super::library::{aed_rules, asme_rules, rule_from_definition, RuleLibrary, SharedRule};
use super::{AED, ASME_Y14};
use crate::config::ReviewConfig;
use crate::error::CatalogError;
use std::collections::HashMap;

/// An ordered, named sequence of rules. Verdicts come back in this order.
#[derive(Clone)]
pub struct RuleSet {
    pub name: String,
    pub rules: Vec<SharedRule>,
}

impl RuleSet {
    pub fn new(name: impl Into<String>, rules: Vec<SharedRule>) -> Self {
        Self {
            name: name.into(),
            rules,
        }
    }

    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rule_ids(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.id()).collect()
    }
}

impl std::fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleSet")
            .field("name", &self.name)
            .field("rules", &self.rule_ids())
            .finish()
    }
}

/// Immutable registry of rule sets, built once and shared by reference.
///
/// There is no way to add or remove sets after construction; extra sets come
/// from [`ReviewConfig`] and are validated here, before any document is seen.
pub struct RuleCatalog {
    sets: HashMap<String, RuleSet>,
    order: Vec<String>,
    default_set: String,
}

impl RuleCatalog {
    /// The two built-in sets with default thresholds
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_config(&ReviewConfig::default())
    }

    pub fn from_config(config: &ReviewConfig) -> Result<Self, CatalogError> {
        let mut library = RuleLibrary::builtin(&config.thresholds)?;
        for definition in &config.custom_rules {
            library.insert(rule_from_definition(definition)?)?;
        }

        let mut catalog = Self {
            sets: HashMap::new(),
            order: Vec::new(),
            default_set: config.default_rule_set.clone(),
        };
        catalog.register(RuleSet::new(AED, aed_rules()?))?;
        catalog.register(RuleSet::new(ASME_Y14, asme_rules(&config.thresholds)?))?;

        for set_config in &config.rule_sets {
            if !set_config.enabled {
                tracing::debug!(rule_set = %set_config.name, "skipping disabled rule set");
                continue;
            }
            let mut rules = Vec::with_capacity(set_config.rules.len());
            for rule_id in &set_config.rules {
                let rule = library
                    .get(rule_id)
                    .ok_or_else(|| CatalogError::UnknownRule {
                        set: set_config.name.clone(),
                        rule: rule_id.clone(),
                    })?;
                rules.push(rule.clone());
            }
            catalog.register(RuleSet::new(set_config.name.clone(), rules))?;
        }

        tracing::debug!(
            rule_sets = catalog.order.len(),
            library_size = library.len(),
            "rule catalog built"
        );
        Ok(catalog)
    }

    fn register(&mut self, set: RuleSet) -> Result<(), CatalogError> {
        if self.sets.contains_key(&set.name) {
            return Err(CatalogError::DuplicateRuleSet(set.name));
        }
        self.order.push(set.name.clone());
        self.sets.insert(set.name.clone(), set);
        Ok(())
    }

    /// Resolve a rule set by name. Unknown names yield an empty set.
    pub fn get(&self, name: &str) -> RuleSet {
        match self.sets.get(name) {
            Some(set) => set.clone(),
            None => {
                tracing::warn!(rule_set = name, "unknown rule set, evaluating nothing");
                RuleSet::empty(name)
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sets.contains_key(name)
    }

    /// Set names in registration order
    pub fn names(&self) -> &[String] {
        &self.order
    }

    pub fn default_set(&self) -> &str {
        &self.default_set
    }
}
