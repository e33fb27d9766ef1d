use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Closed set of makers and the models offered under each one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    makers: BTreeMap<String, Vec<String>>,
}

impl Catalog {
    pub fn new(makers: BTreeMap<String, Vec<String>>) -> Self {
        Self { makers }
    }

    pub fn makers(&self) -> impl Iterator<Item = &str> {
        self.makers.keys().map(String::as_str)
    }

    /// Models offered for `maker` (case-insensitive), empty for unknown makers.
    pub fn models_for(&self, maker: &str) -> &[String] {
        self.lookup_maker(maker)
            .map(|(_, models)| models.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains(&self, maker: &str, model: &str) -> bool {
        self.resolve(maker, model).is_some()
    }

    /// Canonical spelling of a maker/model pair, matched case-insensitively.
    pub fn resolve(&self, maker: &str, model: &str) -> Option<(&str, &str)> {
        let (maker, models) = self.lookup_maker(maker)?;
        let model = models
            .iter()
            .find(|m| m.eq_ignore_ascii_case(model.trim()))?;
        Some((maker, model.as_str()))
    }

    pub fn resolve_maker(&self, maker: &str) -> Option<&str> {
        self.lookup_maker(maker).map(|(name, _)| name)
    }

    pub fn is_empty(&self) -> bool {
        self.makers.is_empty()
    }

    fn lookup_maker(&self, maker: &str) -> Option<(&str, &Vec<String>)> {
        let maker = maker.trim();
        self.makers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(maker))
            .map(|(name, models)| (name.as_str(), models))
    }
}

impl Default for Catalog {
    fn default() -> Self {
        let makers = [
            ("Audi", &["A3", "A4", "A6", "Q5", "Q7"][..]),
            ("BMW", &["1 Series", "3 Series", "5 Series", "X3", "X5"][..]),
            ("Ford", &["Fiesta", "Focus", "Mondeo", "Kuga", "Mustang"][..]),
            ("Saab", &["900", "9-3", "9-5"][..]),
            ("Tesla", &["Model 3", "Model S", "Model X", "Model Y"][..]),
            ("Toyota", &["Corolla", "Yaris", "Camry", "RAV4", "Prius"][..]),
            ("Volkswagen", &["Golf", "Polo", "Passat", "Tiguan"][..]),
            ("Volvo", &["240", "V70", "V90", "XC60", "XC90"][..]),
        ];

        Self::new(
            makers
                .into_iter()
                .map(|(maker, models)| {
                    (
                        maker.to_string(),
                        models.iter().map(|m| m.to_string()).collect(),
                    )
                })
                .collect(),
        )
    }
}
