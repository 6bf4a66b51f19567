use serde::{Deserialize, Serialize};
use std::fmt;

use super::nutrition::{NutrientMap, NutritionalContent};

/// Serving size in grams assumed when a record does not specify one.
pub const DEFAULT_SERVING_SIZE: f64 = 100.0;

fn default_serving_size() -> f64 {
    DEFAULT_SERVING_SIZE
}

/// A food item as stored in `food_database.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FoodRecord {
    pub id: String,
    pub name: String,
    pub category: String,
    /// Grams per serving; nutrient values are per serving
    #[serde(default = "default_serving_size")]
    pub serving_size: f64,
    pub nutritional_content: NutritionalContent,
    #[serde(default)]
    pub additional_nutrients: NutrientMap,
}

impl FoodRecord {
    /// Serving size used for scaling. Zero or unset falls back to 100 g.
    pub fn effective_serving_size(&self) -> f64 {
        if self.serving_size == 0.0 || self.serving_size.is_nan() {
            DEFAULT_SERVING_SIZE
        } else {
            self.serving_size
        }
    }

    /// Lowercased name, the key used by the name index.
    pub fn index_key(&self) -> String {
        self.name.to_lowercase()
    }
}

impl fmt::Display for FoodRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} [{}]", self.name, self.id)?;
        writeln!(
            f,
            "{}",
            "=".repeat(self.name.chars().count() + self.id.chars().count() + 3)
        )?;
        writeln!(f, "Category: {}", self.category)?;
        writeln!(f, "\nNutrition (per {} g):", self.serving_size)?;
        write!(f, "{}", self.nutritional_content)?;

        if !self.additional_nutrients.is_empty() {
            writeln!(f, "\n\nAdditional nutrients:")?;
            let lines: Vec<String> = self
                .additional_nutrients
                .iter()
                .map(|(name, amount)| format!("  {}: {}", name, amount))
                .collect();
            write!(f, "{}", lines.join("\n"))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{
            "id": "IND0001",
            "name": "Dal",
            "category": "Indian",
            "servingSize": 150,
            "nutritionalContent": {
                "protein": 9, "carbohydrates": 20, "calories": 116, "fiber": 8, "fat": 0.4
            },
            "additionalNutrients": {"iron": 3.3}
        }"#;

        let food: FoodRecord = serde_json::from_str(json).unwrap();
        assert_eq!(food.id, "IND0001");
        assert_eq!(food.serving_size, 150.0);
        assert_eq!(food.nutritional_content.protein, 9.0);
        assert_eq!(food.additional_nutrients["iron"], 3.3);
    }

    #[test]
    fn test_serving_size_defaults_to_100() {
        let json = r#"{
            "id": "GEN0001",
            "name": "Rice",
            "category": "Grains",
            "nutritionalContent": {"protein": 2.7}
        }"#;

        let food: FoodRecord = serde_json::from_str(json).unwrap();
        assert_eq!(food.serving_size, 100.0);
        assert!(food.additional_nutrients.is_empty());
    }

    #[test]
    fn test_effective_serving_size_zero() {
        let json = r#"{
            "id": "GEN0001",
            "name": "Rice",
            "category": "Grains",
            "servingSize": 0,
            "nutritionalContent": {}
        }"#;

        let food: FoodRecord = serde_json::from_str(json).unwrap();
        assert_eq!(food.effective_serving_size(), 100.0);
    }

    #[test]
    fn test_serializes_camel_case_keys() {
        let food = FoodRecord {
            id: "CUS0003".to_string(),
            name: "Protein Bar".to_string(),
            category: "Custom".to_string(),
            serving_size: 60.0,
            nutritional_content: NutritionalContent::default(),
            additional_nutrients: NutrientMap::new(),
        };

        let json = serde_json::to_value(&food).unwrap();
        assert_eq!(json["servingSize"], 60.0);
        assert!(json.get("nutritionalContent").is_some());
        assert!(json.get("additionalNutrients").is_some());
    }

    #[test]
    fn test_display() {
        let mut food = FoodRecord {
            id: "GEN0001".to_string(),
            name: "Rice".to_string(),
            category: "Grains".to_string(),
            serving_size: 100.0,
            nutritional_content: NutritionalContent {
                protein: 2.7,
                ..Default::default()
            },
            additional_nutrients: NutrientMap::new(),
        };
        food.additional_nutrients.insert("iron".to_string(), 0.2);

        let output = format!("{}", food);
        assert!(output.contains("Rice [GEN0001]"));
        assert!(output.contains("Category: Grains"));
        assert!(output.contains("protein:       2.7 g"));
        assert!(output.contains("iron: 0.2"));
    }

    #[test]
    fn test_display_underline_counts_characters() {
        let food = FoodRecord {
            id: "SWT0001".to_string(),
            name: "Crème Brûlée".to_string(),
            category: "Sweets".to_string(),
            serving_size: 100.0,
            nutritional_content: NutritionalContent::default(),
            additional_nutrients: NutrientMap::new(),
        };

        let output = format!("{}", food);
        let mut lines = output.lines();
        let title = lines.next().unwrap();
        let underline = lines.next().unwrap();
        assert_eq!(title, "Crème Brûlée [SWT0001]");
        assert_eq!(underline, "=".repeat(title.chars().count()));
    }
}
