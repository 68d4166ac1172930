//! Indicator registry for dynamic evaluator creation.

use std::collections::HashMap;

use crate::error::IndicatorError;
use crate::impl_::{
    extension::Extension, inside_bar::InsideBar, market_cycle::MarketCycle,
    relative_strength::RelativeStrength, volatility::RangeVolatility,
    volume_classifier::VolumeClassifier,
};
use crate::traits::Evaluator;

/// Factory function type for creating evaluators from JSON parameters.
pub type EvaluatorFactory =
    Box<dyn Fn(&serde_json::Value) -> Result<Box<dyn Evaluator>, IndicatorError> + Send + Sync>;

/// Registry for evaluator factories.
///
/// Allows evaluators to be registered by name and instantiated
/// dynamically from host configuration.
pub struct IndicatorRegistry {
    factories: HashMap<String, EvaluatorFactory>,
}

impl IndicatorRegistry {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Creates a registry with all shipped indicators pre-registered.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register("market_cycle", |params| {
            Ok(Box::new(MarketCycle::from_params(params)?))
        });
        registry.register("relative_strength", |params| {
            Ok(Box::new(RelativeStrength::from_params(params)?))
        });
        registry.register("extension", |params| {
            Ok(Box::new(Extension::from_params(params)?))
        });
        registry.register("range_volatility", |params| {
            Ok(Box::new(RangeVolatility::from_params(params)?))
        });
        registry.register("volume", |params| {
            Ok(Box::new(VolumeClassifier::from_params(params)?))
        });
        registry.register("inside_bar", |params| {
            Ok(Box::new(InsideBar::from_params(params)?))
        });

        registry
    }

    /// Registers an evaluator factory.
    ///
    /// # Arguments
    /// * `name` - Indicator name (case-insensitive)
    /// * `factory` - Factory function that creates the evaluator
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&serde_json::Value) -> Result<Box<dyn Evaluator>, IndicatorError>
            + Send
            + Sync
            + 'static,
    {
        self.factories
            .insert(name.into().to_lowercase(), Box::new(factory));
    }

    /// Creates an evaluator by name.
    ///
    /// # Errors
    /// Returns [`IndicatorError::UnknownIndicator`] if the name is not
    /// registered, and the factory's validation errors otherwise.
    pub fn create(
        &self,
        name: &str,
        params: &serde_json::Value,
    ) -> Result<Box<dyn Evaluator>, IndicatorError> {
        let factory = self
            .factories
            .get(&name.to_lowercase())
            .ok_or_else(|| IndicatorError::UnknownIndicator(name.to_string()))?;
        factory(params)
    }

    /// Checks if an indicator is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(&name.to_lowercase())
    }

    /// Returns all registered indicator names.
    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.factories.keys()
    }

    /// Returns the number of registered indicators.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Checks if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl Default for IndicatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_all_indicators() {
        let registry = IndicatorRegistry::with_defaults();
        assert_eq!(registry.len(), 6);
        for name in [
            "market_cycle",
            "relative_strength",
            "extension",
            "range_volatility",
            "volume",
            "inside_bar",
        ] {
            assert!(registry.contains(name), "{name} missing");
        }
    }

    #[test]
    fn test_create_is_case_insensitive() {
        let registry = IndicatorRegistry::with_defaults();
        let evaluator = registry
            .create("Inside_Bar", &serde_json::json!({}))
            .unwrap();
        assert_eq!(evaluator.meta().id, "inside_bar");
    }

    #[test]
    fn test_unknown_indicator() {
        let registry = IndicatorRegistry::with_defaults();
        let err = registry.create("macd", &serde_json::json!({}));
        assert!(matches!(err, Err(IndicatorError::UnknownIndicator(_))));
    }

    #[test]
    fn test_factory_surfaces_param_errors() {
        let registry = IndicatorRegistry::with_defaults();
        let err = registry.create("extension", &serde_json::json!({"length": 0}));
        assert!(matches!(err, Err(IndicatorError::ParamOutOfRange { .. })));
    }

    #[test]
    fn test_metadata_arity_matches_outputs() {
        // Tuple order is load-bearing: pin each indicator's arity.
        let registry = IndicatorRegistry::with_defaults();
        let expected = [
            ("market_cycle", 2),
            ("relative_strength", 3),
            ("extension", 1),
            ("range_volatility", 1),
            ("volume", 3),
            ("inside_bar", 1),
        ];
        for (name, arity) in expected {
            let evaluator = registry.create(name, &serde_json::json!({})).unwrap();
            assert_eq!(evaluator.meta().plot_count(), arity, "{name}");
        }
    }
}
