use std::collections::BTreeMap;

use crate::fading::curve::{CurveKind, CurveTable, FadingCurve};

/// Named store of brightness curves shared by all devices of a setup.
pub trait CurveRegistry {
    /// Curve registered under `name`, if any.
    fn get(&self, name: &str) -> Option<FadingCurve>;

    /// Register (or replace) `table` under `name`.
    fn insert(&mut self, name: &str, table: CurveTable);
}

/// In-memory [`CurveRegistry`] keyed by curve name.
#[derive(Clone, Debug, Default)]
pub struct CurveList {
    curves: BTreeMap<String, CurveTable>,
}

impl CurveList {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with_curve(mut self, name: &str, table: CurveTable) -> Self {
        self.insert(name, table);
        self
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.curves.contains_key(name)
    }

    /// Number of registered curves.
    pub fn len(&self) -> usize {
        self.curves.len()
    }

    /// Whether no curve is registered.
    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }
}

impl CurveRegistry for CurveList {
    fn get(&self, name: &str) -> Option<FadingCurve> {
        self.curves
            .get(name)
            .map(|t| FadingCurve::named(name, *t))
    }

    fn insert(&mut self, name: &str, table: CurveTable) {
        self.curves.insert(name.to_string(), table);
    }
}

/// Resolve the fading curve configured as `name`.
///
/// Order: a registry entry named `name`; a built-in generator named `name`;
/// for any other non-blank name a new linear curve registered under `name`;
/// a blank name yields an anonymous linear curve.
pub fn resolve_fading_curve(registry: &mut dyn CurveRegistry, name: &str) -> FadingCurve {
    if let Some(curve) = registry.get(name) {
        return curve;
    }
    if name.trim().is_empty() {
        return FadingCurve::linear();
    }
    if let Ok(kind) = name.parse::<CurveKind>() {
        return FadingCurve::from_kind(kind);
    }

    tracing::debug!(curve = name, "registering linear fading curve for unknown name");
    let table = CurveKind::Linear.table();
    registry.insert(name, table);
    FadingCurve::named(name, table)
}

#[cfg(test)]
#[path = "../../tests/unit/fading/registry.rs"]
mod tests;
