mod food;
mod new_food;
mod nutrition;

pub use food::{FoodRecord, DEFAULT_SERVING_SIZE};
pub use new_food::NewFood;
pub use nutrition::{round2, scale_nutrients, NutrientMap, NutritionReport, NutritionalContent};
