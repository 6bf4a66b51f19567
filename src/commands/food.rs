use clap::{Args, Subcommand};

use super::OutputFormat;
use nutridb::api::{SEARCH_LIMIT, SUGGESTION_LIMIT};
use nutridb::models::{FoodRecord, NewFood, NutrientMap, NutritionalContent};
use nutridb::store::{FoodStore, DEFAULT_MIN_PROTEIN};

#[derive(Args)]
pub struct FoodCommand {
    #[command(subcommand)]
    pub command: FoodSubcommand,
}

#[derive(Subcommand)]
pub enum FoodSubcommand {
    /// Show a food by exact name (case-insensitive)
    Show {
        /// Food name
        name: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show a food by id
    Get {
        /// Food id (e.g. IND0001)
        id: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Search foods by partial name
    Search {
        /// Text to look for in food names
        query: String,

        /// Maximum number of results
        #[arg(long, default_value_t = SEARCH_LIMIT)]
        limit: usize,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// List foods in a category (case-sensitive)
    Category {
        category: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// List foods with at least the given grams of protein per serving
    HighProtein {
        #[arg(long, default_value_t = DEFAULT_MIN_PROTEIN)]
        min: f64,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Calculate nutrition for a quantity of a food
    Calc {
        /// Food id
        id: String,

        /// Quantity in grams
        #[arg(allow_negative_numbers = true)]
        grams: f64,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Add a new food
    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        category: String,

        /// Grams per serving (default 100)
        #[arg(long)]
        serving_size: Option<f64>,

        #[arg(long, default_value_t = 0.0)]
        protein: f64,

        #[arg(long, default_value_t = 0.0)]
        carbohydrates: f64,

        #[arg(long, default_value_t = 0.0)]
        calories: f64,

        #[arg(long, default_value_t = 0.0)]
        fiber: f64,

        #[arg(long, default_value_t = 0.0)]
        fat: f64,

        /// Additional nutrient as NAME=AMOUNT (can be repeated)
        #[arg(long = "nutrient", value_name = "NAME=AMOUNT", value_parser = parse_nutrient)]
        nutrients: Vec<(String, f64)>,
    },
}

/// Parses `NAME=AMOUNT` into a nutrient entry.
fn parse_nutrient(s: &str) -> Result<(String, f64), String> {
    let (name, amount) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=AMOUNT, got '{}'", s))?;
    let name = name.trim();
    if name.is_empty() {
        return Err("nutrient name cannot be empty".to_string());
    }
    let amount = amount
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("invalid amount for {}: '{}'", name, amount))?;
    Ok((name.to_string(), amount))
}

fn print_food(food: &FoodRecord, format: &OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(food)?),
        OutputFormat::Text => println!("{}", food),
    }
    Ok(())
}

fn print_foods(foods: &[FoodRecord], format: &OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    if let OutputFormat::Json = format {
        println!("{}", serde_json::to_string_pretty(foods)?);
        return Ok(());
    }

    if foods.is_empty() {
        println!("No foods found");
        return Ok(());
    }

    println!(
        "{:<9}  {:<30}  {:<14}  {:>8}  {:>8}",
        "ID", "NAME", "CATEGORY", "PROTEIN", "KCAL"
    );
    println!("{}", "-".repeat(77));
    for food in foods {
        let name = if food.name.chars().count() > 30 {
            format!("{}...", food.name.chars().take(27).collect::<String>())
        } else {
            food.name.clone()
        };
        println!(
            "{:<9}  {:<30}  {:<14}  {:>8}  {:>8}",
            food.id,
            name,
            food.category,
            food.nutritional_content.protein,
            food.nutritional_content.calories
        );
    }
    println!("\nTotal: {} food(s)", foods.len());
    Ok(())
}

impl FoodCommand {
    pub fn run(&self, store: &FoodStore) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            FoodSubcommand::Show { name, format } => match store.get_food_by_name(name) {
                Some(food) => print_food(&food, format),
                None => {
                    let mut suggestions = store.search_foods(name);
                    suggestions.truncate(SUGGESTION_LIMIT);
                    if suggestions.is_empty() {
                        return Err(format!("Food not found: {}", name).into());
                    }
                    println!("No exact match for '{}'. Did you mean:", name);
                    print_foods(&suggestions, format)
                }
            },

            FoodSubcommand::Get { id, format } => match store.get_food_by_id(id) {
                Some(food) => print_food(&food, format),
                None => Err(format!("Food not found: {}", id).into()),
            },

            FoodSubcommand::Search {
                query,
                limit,
                format,
            } => {
                let mut results = store.search_foods(query);
                results.truncate(*limit);
                print_foods(&results, format)
            }

            FoodSubcommand::Category { category, format } => {
                print_foods(&store.get_foods_by_category(category), format)
            }

            FoodSubcommand::HighProtein { min, format } => {
                print_foods(&store.get_high_protein_foods(*min), format)
            }

            FoodSubcommand::Calc { id, grams, format } => {
                let report = store
                    .calculate_nutrition(id, *grams)
                    .ok_or_else(|| format!("Food not found: {}", id))?;
                match format {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
                    OutputFormat::Text => println!("{}", report),
                }
                Ok(())
            }

            FoodSubcommand::Add {
                name,
                category,
                serving_size,
                protein,
                carbohydrates,
                calories,
                fiber,
                fat,
                nutrients,
            } => {
                let mut new_food = NewFood::new(name.trim(), category.trim()).with_nutrition(
                    NutritionalContent {
                        protein: *protein,
                        carbohydrates: *carbohydrates,
                        calories: *calories,
                        fiber: *fiber,
                        fat: *fat,
                    },
                );
                if let Some(grams) = serving_size {
                    new_food = new_food.with_serving_size(*grams);
                }
                if !nutrients.is_empty() {
                    let map: NutrientMap = nutrients.iter().cloned().collect();
                    new_food = new_food.with_additional_nutrients(map);
                }

                let created = store.add_food(new_food)?;
                println!("Created food:");
                println!("{}", created);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nutrient() {
        assert_eq!(parse_nutrient("iron=3.3"), Ok(("iron".to_string(), 3.3)));
        assert_eq!(
            parse_nutrient(" vitaminC = 12 "),
            Ok(("vitaminC".to_string(), 12.0))
        );
    }

    #[test]
    fn test_parse_nutrient_errors() {
        assert!(parse_nutrient("iron").is_err());
        assert!(parse_nutrient("=3").is_err());
        assert!(parse_nutrient("iron=lots").is_err());
    }
}
