use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Free-form nutrient amounts keyed by nutrient name (e.g. "iron", "vitaminC").
pub type NutrientMap = BTreeMap<String, f64>;

/// Core macro nutrients for one serving of a food.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NutritionalContent {
    pub protein: f64,
    pub carbohydrates: f64,
    pub calories: f64,
    pub fiber: f64,
    pub fat: f64,
}

impl NutritionalContent {
    /// Multiplies every field by `ratio`, rounding to two decimals.
    pub fn scaled(&self, ratio: f64) -> Self {
        Self {
            protein: round2(self.protein * ratio),
            carbohydrates: round2(self.carbohydrates * ratio),
            calories: round2(self.calories * ratio),
            fiber: round2(self.fiber * ratio),
            fat: round2(self.fat * ratio),
        }
    }

    /// True when no field is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        [
            self.protein,
            self.carbohydrates,
            self.calories,
            self.fiber,
            self.fat,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

impl fmt::Display for NutritionalContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  calories:      {}", self.calories)?;
        writeln!(f, "  protein:       {} g", self.protein)?;
        writeln!(f, "  carbohydrates: {} g", self.carbohydrates)?;
        writeln!(f, "  fiber:         {} g", self.fiber)?;
        write!(f, "  fat:           {} g", self.fat)
    }
}

/// Scales each amount in a nutrient map, rounding to two decimals.
pub fn scale_nutrients(nutrients: &NutrientMap, ratio: f64) -> NutrientMap {
    nutrients
        .iter()
        .map(|(name, amount)| (name.clone(), round2(amount * ratio)))
        .collect()
}

/// Rounds half away from zero to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Nutrition for an arbitrary quantity of a food, as returned by the
/// calculate operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NutritionReport {
    /// Food name
    pub food: String,
    pub category: String,
    /// Requested quantity in grams
    pub quantity: f64,
    pub nutrition: NutritionalContent,
    /// Omitted entirely when the food has no additional nutrients
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_nutrients: Option<NutrientMap>,
}

impl fmt::Display for NutritionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({}) - {} g", self.food, self.category, self.quantity)?;
        write!(f, "{}", self.nutrition)?;
        if let Some(extra) = &self.additional_nutrients {
            writeln!(f)?;
            write!(f, "Additional:")?;
            for (name, amount) in extra {
                write!(f, "\n  {}: {}", name, amount)?;
            }
        }
        Ok(())
    }
}
