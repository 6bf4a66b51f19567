use serde::{Deserialize, Serialize};

use super::nutrition::{NutrientMap, NutritionalContent};

/// Input for creating a food. Every field is optional at the type level so
/// that missing required fields surface as validation errors rather than
/// deserialization failures.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewFood {
    pub name: Option<String>,
    pub category: Option<String>,
    pub serving_size: Option<f64>,
    pub nutritional_content: Option<NutritionalContent>,
    pub additional_nutrients: Option<NutrientMap>,
}

impl NewFood {
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            category: Some(category.into()),
            ..Default::default()
        }
    }

    pub fn with_nutrition(mut self, nutrition: NutritionalContent) -> Self {
        self.nutritional_content = Some(nutrition);
        self
    }

    pub fn with_serving_size(mut self, grams: f64) -> Self {
        self.serving_size = Some(grams);
        self
    }

    pub fn with_additional_nutrients(mut self, nutrients: NutrientMap) -> Self {
        self.additional_nutrients = Some(nutrients);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let food = NewFood::new("Paneer", "Indian")
            .with_serving_size(50.0)
            .with_nutrition(NutritionalContent {
                protein: 18.0,
                ..Default::default()
            });

        assert_eq!(food.name.as_deref(), Some("Paneer"));
        assert_eq!(food.category.as_deref(), Some("Indian"));
        assert_eq!(food.serving_size, Some(50.0));
        assert_eq!(food.nutritional_content.map(|n| n.protein), Some(18.0));
        assert!(food.additional_nutrients.is_none());
    }

    #[test]
    fn test_deserialize_partial_body() {
        let food: NewFood = serde_json::from_str(r#"{"name": "Test"}"#).unwrap();
        assert_eq!(food.name.as_deref(), Some("Test"));
        assert!(food.category.is_none());
        assert!(food.nutritional_content.is_none());
    }

    #[test]
    fn test_deserialize_partial_nutrition() {
        let food: NewFood = serde_json::from_str(
            r#"{"name": "Test", "category": "Custom", "nutritionalContent": {"protein": 4}}"#,
        )
        .unwrap();
        let nutrition = food.nutritional_content.unwrap();
        assert_eq!(nutrition.protein, 4.0);
        assert_eq!(nutrition.calories, 0.0);
    }
}
