//! In-memory food catalog: the record list, its name index and the id
//! sequence. All lookup, search and scaling logic lives here; persistence
//! and locking are handled by [`super::FoodStore`].

use std::collections::{BTreeMap, HashSet};

use super::error::StoreError;
use super::ids::{prefix_for_category, IdSequence};
use crate::models::{
    scale_nutrients, FoodRecord, NewFood, NutrientMap, NutritionReport, DEFAULT_SERVING_SIZE,
};

/// Lowercased food name -> food id.
pub type NameIndex = BTreeMap<String, String>;

pub const MISSING_FIELDS: &str = "Missing required fields: name, category, or nutritionalContent";
pub const NON_FINITE_VALUES: &str = "servingSize and nutrient amounts must be finite numbers";

#[derive(Debug, Clone)]
pub struct Catalog {
    foods: Vec<FoodRecord>,
    index: NameIndex,
    ids: IdSequence,
}

impl Catalog {
    /// Builds a catalog from loaded data, repairing the name index so every
    /// record is reachable by name and no entry points at a missing id.
    pub fn new(foods: Vec<FoodRecord>, mut index: NameIndex) -> Result<Self, StoreError> {
        let mut seen = HashSet::with_capacity(foods.len());
        for food in &foods {
            if !seen.insert(food.id.as_str()) {
                return Err(StoreError::DuplicateId(food.id.clone()));
            }
        }

        index.retain(|name, id| {
            let known = seen.contains(id.as_str());
            if !known {
                tracing::warn!("Dropping name index entry '{}' for unknown id {}", name, id);
            }
            known
        });

        for food in &foods {
            let key = food.index_key();
            if !index.contains_key(&key) {
                tracing::warn!("Food {} ({}) missing from name index, adding", food.id, food.name);
                index.insert(key, food.id.clone());
            }
        }

        let ids = IdSequence::starting_after(foods.len(), foods.iter().map(|f| f.id.as_str()));

        Ok(Self { foods, index, ids })
    }

    pub fn empty() -> Self {
        Self {
            foods: Vec::new(),
            index: NameIndex::new(),
            ids: IdSequence::starting_after(0, std::iter::empty()),
        }
    }

    pub fn foods(&self) -> &[FoodRecord] {
        &self.foods
    }

    pub fn index(&self) -> &NameIndex {
        &self.index
    }

    pub fn len(&self) -> usize {
        self.foods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.foods.is_empty()
    }

    /// Case-insensitive exact name match via the name index.
    pub fn get_by_name(&self, name: &str) -> Option<&FoodRecord> {
        let id = self.index.get(&name.to_lowercase())?;
        self.get_by_id(id)
    }

    pub fn get_by_id(&self, id: &str) -> Option<&FoodRecord> {
        self.foods.iter().find(|food| food.id == id)
    }

    /// Case-insensitive substring match on names, in catalog order.
    pub fn search(&self, query: &str) -> Vec<&FoodRecord> {
        let query = query.to_lowercase();
        self.foods
            .iter()
            .filter(|food| food.name.to_lowercase().contains(&query))
            .collect()
    }

    /// Case-sensitive exact category match.
    pub fn by_category(&self, category: &str) -> Vec<&FoodRecord> {
        self.foods
            .iter()
            .filter(|food| food.category == category)
            .collect()
    }

    pub fn high_protein(&self, min_protein: f64) -> Vec<&FoodRecord> {
        self.foods
            .iter()
            .filter(|food| food.nutritional_content.protein >= min_protein)
            .collect()
    }

    /// Scales a food's nutrients to `grams`. Any quantity is accepted,
    /// including zero and negative values.
    pub fn calculate(&self, food_id: &str, grams: f64) -> Option<NutritionReport> {
        let food = self.get_by_id(food_id)?;
        let ratio = grams / food.effective_serving_size();

        let additional_nutrients = if food.additional_nutrients.is_empty() {
            None
        } else {
            Some(scale_nutrients(&food.additional_nutrients, ratio))
        };

        Some(NutritionReport {
            food: food.name.clone(),
            category: food.category.clone(),
            quantity: grams,
            nutrition: food.nutritional_content.scaled(ratio),
            additional_nutrients,
        })
    }

    /// Validates `new_food` and builds the record it would create, without
    /// modifying the catalog.
    pub fn prepare(&self, new_food: NewFood) -> Result<(FoodRecord, u64), StoreError> {
        let NewFood {
            name,
            category,
            serving_size,
            nutritional_content,
            additional_nutrients,
        } = new_food;

        let (name, category, nutrition) = match (
            name.filter(|n| !n.is_empty()),
            category.filter(|c| !c.is_empty()),
            nutritional_content,
        ) {
            (Some(name), Some(category), Some(nutrition)) => (name, category, nutrition),
            _ => return Err(StoreError::Validation(MISSING_FIELDS.to_string())),
        };

        // JSON has no encoding for NaN or infinity; storing one would make
        // the database file unreadable.
        let extras_finite = additional_nutrients
            .as_ref()
            .map_or(true, |extra| extra.values().all(|v| v.is_finite()));
        if !nutrition.is_finite()
            || !extras_finite
            || serving_size.is_some_and(|grams| !grams.is_finite())
        {
            return Err(StoreError::Validation(NON_FINITE_VALUES.to_string()));
        }

        let serving_size = match serving_size {
            Some(grams) if grams != 0.0 => grams,
            _ => DEFAULT_SERVING_SIZE,
        };

        let (id, seq) = self
            .ids
            .peek(&category, |candidate| self.get_by_id(candidate).is_some())
            .ok_or_else(|| StoreError::IdsExhausted(prefix_for_category(&category)))?;

        let record = FoodRecord {
            id,
            name,
            category,
            serving_size,
            nutritional_content: nutrition,
            additional_nutrients: additional_nutrients.unwrap_or_else(NutrientMap::new),
        };

        Ok((record, seq))
    }

    /// Appends a prepared record and indexes its name.
    ///
    /// Returns the id previously indexed under the same name, if any, so the
    /// insert can be undone with [`Catalog::rollback`].
    pub fn insert(&mut self, record: FoodRecord) -> Option<String> {
        let previous = self.index.insert(record.index_key(), record.id.clone());
        self.foods.push(record);
        previous
    }

    /// Commits the sequence number of a successfully persisted record.
    pub fn commit(&mut self, seq: u64) {
        self.ids.commit(seq);
    }

    /// Undoes the last [`Catalog::insert`].
    pub fn rollback(&mut self, previous_index_entry: Option<String>) {
        if let Some(record) = self.foods.pop() {
            let key = record.index_key();
            match previous_index_entry {
                Some(id) => {
                    self.index.insert(key, id);
                }
                None => {
                    self.index.remove(&key);
                }
            }
        }
    }
}
