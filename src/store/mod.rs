//! The food store: an in-memory catalog of food records persisted to two
//! JSON files.
//!
//! A [`FoodStore`] only exists once its data has loaded successfully, so
//! load failure is reported once, at startup, instead of on every call.
//! Reads never fail after that. Writes hold the catalog's write lock across
//! the in-memory change and the save, and undo the in-memory change if the
//! save fails.

mod catalog;
mod error;
mod ids;
mod storage;

pub use catalog::{Catalog, NameIndex, MISSING_FIELDS, NON_FINITE_VALUES};
pub use error::StoreError;
pub use ids::{format_id, prefix_for_category};
pub use storage::{JsonStorage, DATABASE_FILE, NAME_INDEX_FILE};

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::models::{FoodRecord, NewFood, NutritionReport};

/// Protein threshold (grams per serving) used when none is given.
pub const DEFAULT_MIN_PROTEIN: f64 = 15.0;

/// Shared, thread-safe food store.
#[derive(Debug)]
pub struct FoodStore {
    storage: JsonStorage,
    catalog: RwLock<Catalog>,
}

impl FoodStore {
    /// Loads the food database and name index from `storage`.
    pub fn load(storage: JsonStorage) -> Result<Self, StoreError> {
        tracing::info!(
            "Loading nutrition database from {}",
            storage.database_path().display()
        );

        let (foods, index) = storage.load().map_err(|e| {
            tracing::error!("Error loading database: {}", e);
            e
        })?;
        let catalog = Catalog::new(foods, index)?;

        tracing::info!("Database loaded with {} food items", catalog.len());

        Ok(Self {
            storage,
            catalog: RwLock::new(catalog),
        })
    }

    /// Creates empty data files and returns a store over them.
    pub fn initialize(storage: JsonStorage) -> Result<Self, StoreError> {
        storage.initialize()?;
        tracing::info!(
            "Initialized empty database at {}",
            storage.database_path().display()
        );
        Ok(Self {
            storage,
            catalog: RwLock::new(Catalog::empty()),
        })
    }

    pub fn storage(&self) -> &JsonStorage {
        &self.storage
    }

    // Writers never leave the catalog half-updated between statements, so a
    // poisoned lock still guards consistent data.
    fn read(&self) -> RwLockReadGuard<'_, Catalog> {
        self.catalog.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Catalog> {
        self.catalog.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Case-insensitive exact name lookup.
    pub fn get_food_by_name(&self, name: &str) -> Option<FoodRecord> {
        self.read().get_by_name(name).cloned()
    }

    pub fn get_food_by_id(&self, id: &str) -> Option<FoodRecord> {
        self.read().get_by_id(id).cloned()
    }

    /// All foods whose name contains `query`, ignoring case.
    pub fn search_foods(&self, query: &str) -> Vec<FoodRecord> {
        self.read().search(query).into_iter().cloned().collect()
    }

    /// All foods in exactly `category` (case-sensitive).
    pub fn get_foods_by_category(&self, category: &str) -> Vec<FoodRecord> {
        self.read()
            .by_category(category)
            .into_iter()
            .cloned()
            .collect()
    }

    /// All foods with at least `min_protein` grams of protein per serving.
    pub fn get_high_protein_foods(&self, min_protein: f64) -> Vec<FoodRecord> {
        self.read()
            .high_protein(min_protein)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Nutrition for `grams` of the food with id `food_id`, or `None` if no
    /// such food exists.
    pub fn calculate_nutrition(&self, food_id: &str, grams: f64) -> Option<NutritionReport> {
        self.read().calculate(food_id, grams)
    }

    /// Validates and stores a new food, persisting both data files.
    ///
    /// On a save failure the store is left exactly as it was.
    pub fn add_food(&self, new_food: NewFood) -> Result<FoodRecord, StoreError> {
        let mut catalog = self.write();

        let (record, seq) = catalog.prepare(new_food)?;
        let previous = catalog.insert(record.clone());

        if let Err(e) = self.persist(&catalog) {
            catalog.rollback(previous);
            return Err(e);
        }

        catalog.commit(seq);
        tracing::info!("Added food {} ({})", record.id, record.name);
        Ok(record)
    }

    /// Writes the current catalog to disk.
    pub fn save(&self) -> Result<(), StoreError> {
        let catalog = self.read();
        self.persist(&catalog)
    }

    fn persist(&self, catalog: &Catalog) -> Result<(), StoreError> {
        match self.storage.save(catalog.foods(), catalog.index()) {
            Ok(()) => {
                tracing::info!("Database saved successfully");
                Ok(())
            }
            Err(e) => {
                tracing::error!("Error saving database: {}", e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NutritionalContent;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    const DATABASE: &str = r#"[
        {
            "id": "GEN0001",
            "name": "Rice",
            "category": "Grains",
            "servingSize": 100,
            "nutritionalContent": {
                "protein": 2.7, "carbohydrates": 28, "calories": 130, "fiber": 0.4, "fat": 0.3
            }
        },
        {
            "id": "HPR0002",
            "name": "Chicken Breast",
            "category": "High-Protein",
            "servingSize": 100,
            "nutritionalContent": {
                "protein": 31, "carbohydrates": 0, "calories": 165, "fiber": 0, "fat": 3.6
            },
            "additionalNutrients": {"niacin": 13.7}
        }
    ]"#;

    const INDEX: &str = r#"{"rice": "GEN0001", "chicken breast": "HPR0002"}"#;

    fn setup() -> (FoodStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(DATABASE_FILE), DATABASE).unwrap();
        fs::write(temp_dir.path().join(NAME_INDEX_FILE), INDEX).unwrap();
        let store = FoodStore::load(JsonStorage::new(temp_dir.path())).unwrap();
        (store, temp_dir)
    }

    fn test_food() -> NewFood {
        NewFood::new("Test", "Indian").with_nutrition(NutritionalContent {
            protein: 10.0,
            carbohydrates: 5.0,
            calories: 100.0,
            fiber: 1.0,
            fat: 2.0,
        })
    }

    #[test]
    fn test_load_missing_files_fails() {
        let temp_dir = TempDir::new().unwrap();
        let result = FoodStore::load(JsonStorage::new(temp_dir.path()));
        assert!(matches!(result, Err(StoreError::Io { .. })));
    }

    #[test]
    fn test_load_counts_records() {
        let (store, _temp) = setup();
        assert_eq!(store.len(), 2);
        assert!(!store.is_empty());
    }

    #[test]
    fn test_lookups() {
        let (store, _temp) = setup();

        assert_eq!(store.get_food_by_name("RICE").unwrap().id, "GEN0001");
        assert_eq!(store.get_food_by_id("HPR0002").unwrap().name, "Chicken Breast");
        assert!(store.get_food_by_name("pasta").is_none());
        assert!(store.get_food_by_id("GEN9999").is_none());
    }

    #[test]
    fn test_search_and_filters() {
        let (store, _temp) = setup();

        assert_eq!(store.search_foods("chick").len(), 1);
        assert!(store.search_foods("xyznotfound").is_empty());
        assert_eq!(store.get_foods_by_category("High-Protein").len(), 1);
        assert!(store.get_foods_by_category("high-protein").is_empty());

        let high = store.get_high_protein_foods(DEFAULT_MIN_PROTEIN);
        assert_eq!(high.len(), 1);
        assert_eq!(high[0].id, "HPR0002");
    }

    #[test]
    fn test_calculate_nutrition() {
        let (store, _temp) = setup();

        let rice = store.calculate_nutrition("GEN0001", 50.0).unwrap();
        assert_eq!(rice.nutrition.protein, 1.35);
        assert!(rice.additional_nutrients.is_none());

        let chicken = store.calculate_nutrition("HPR0002", 200.0).unwrap();
        assert_eq!(chicken.nutrition.protein, 62.0);
        assert_eq!(chicken.additional_nutrients.unwrap()["niacin"], 27.4);

        assert!(store.calculate_nutrition("NOPE", 100.0).is_none());
    }

    #[test]
    fn test_add_food_persists() {
        let (store, temp) = setup();

        let created = store.add_food(test_food()).unwrap();
        assert_eq!(created.id, "IND0003");
        assert_eq!(store.get_food_by_name("test"), Some(created.clone()));

        // A fresh load sees the new record and its index entry
        let reloaded = FoodStore::load(JsonStorage::new(temp.path())).unwrap();
        assert_eq!(reloaded.len(), 3);
        assert_eq!(reloaded.get_food_by_name("TEST"), Some(created));
    }

    #[test]
    fn test_add_food_validation_does_not_mutate() {
        let (store, temp) = setup();
        let before = fs::read_to_string(temp.path().join(DATABASE_FILE)).unwrap();

        let input = NewFood {
            category: None,
            ..test_food()
        };
        let err = store.add_food(input).unwrap_err();

        assert!(err.is_validation());
        assert_eq!(store.len(), 2);
        let after = fs::read_to_string(temp.path().join(DATABASE_FILE)).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_add_food_rejects_non_finite_and_stays_loadable() {
        let temp_dir = TempDir::new().unwrap();
        let store = FoodStore::initialize(JsonStorage::new(temp_dir.path())).unwrap();

        let input = NewFood::new("Weird", "Custom")
            .with_serving_size(f64::INFINITY)
            .with_nutrition(NutritionalContent {
                protein: f64::INFINITY,
                ..Default::default()
            });
        let err = store.add_food(input).unwrap_err();
        assert!(err.is_validation());
        assert!(store.is_empty());

        let created = store.add_food(test_food()).unwrap();

        let reloaded = FoodStore::load(JsonStorage::new(temp_dir.path())).unwrap();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.get_food_by_id(&created.id), Some(created));
    }

    #[test]
    fn test_add_food_rolls_back_on_save_failure() {
        let (store, temp) = setup();

        // Make the index temp file impossible to create
        fs::create_dir(temp.path().join("food_name_index.json.tmp")).unwrap();

        let result = store.add_food(test_food());
        assert!(matches!(result, Err(StoreError::Io { .. })));
        assert_eq!(store.len(), 2);
        assert!(store.get_food_by_name("test").is_none());

        // The files on disk are untouched
        let reloaded = FoodStore::load(JsonStorage::new(temp.path())).unwrap();
        assert_eq!(reloaded.len(), 2);
    }

    #[test]
    fn test_concurrent_adds_get_unique_ids() {
        let (store, _temp) = setup();
        let store = Arc::new(store);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    let input = NewFood::new(format!("Food {}", i), "Custom")
                        .with_nutrition(NutritionalContent::default());
                    store.add_food(input).unwrap().id
                })
            })
            .collect();

        let mut ids: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 8);
        assert_eq!(store.len(), 10);
    }

    #[test]
    fn test_initialize_then_add() {
        let temp_dir = TempDir::new().unwrap();
        let store = FoodStore::initialize(JsonStorage::new(temp_dir.path())).unwrap();
        assert!(store.is_empty());

        let created = store.add_food(test_food()).unwrap();
        assert_eq!(created.id, "IND0001");
    }

    #[test]
    fn test_save_writes_current_state() {
        let (store, temp) = setup();
        fs::remove_file(temp.path().join(NAME_INDEX_FILE)).unwrap();

        store.save().unwrap();

        let reloaded = FoodStore::load(JsonStorage::new(temp.path())).unwrap();
        assert_eq!(reloaded.get_food_by_name("rice").unwrap().id, "GEN0001");
    }
}
