//! # Recipe Catalog
//!
//! Recipes and their ordered ingredient lists. Editing a recipe replaces it
//! wholesale; meal logs keep their own copy, so a logged recipe never changes.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::errors::{error_logging, AppError, AppResult};
use crate::model::{new_id, Recipe, RecipeIngredient};
use crate::validation;

/// Category given to recipes saved without one
pub const DEFAULT_CATEGORY: &str = "Uncategorized";

/// Raw ingredient row from the recipe form
#[derive(Debug, Clone, Default)]
pub struct IngredientDraft {
    pub name: String,
    pub quantity: String,
    pub unit: String,
    /// Optional link to the inventory item this ingredient draws from
    pub inventory_item_id: Option<String>,
}

/// Raw recipe form input with already-built ingredients
#[derive(Debug, Clone, Default)]
pub struct RecipeDraft {
    pub name: String,
    pub description: String,
    pub category: String,
    pub ingredients: Vec<RecipeIngredient>,
}

/// Validate an ingredient row and turn it into a recipe ingredient
pub fn build_ingredient(draft: &IngredientDraft) -> AppResult<RecipeIngredient> {
    let result = (|| -> AppResult<RecipeIngredient> {
        let name = validation::require_text("ingredient name", &draft.name)?;
        validation::require_text("ingredient quantity", &draft.quantity)?;
        let quantity = validation::parse_positive_quantity("ingredient quantity", &draft.quantity)?;
        let unit = validation::require_text("ingredient unit", &draft.unit)?;

        Ok(RecipeIngredient {
            id: new_id(),
            name: name.to_string(),
            quantity,
            unit: unit.to_string(),
            inventory_item_id: draft
                .inventory_item_id
                .as_deref()
                .and_then(validation::optional_text),
        })
    })();

    if let Err(e) = &result {
        error_logging::log_validation_error(e, "build_ingredient", "ingredient", Some(&draft.name));
    }
    result
}

fn build_recipe(id: String, draft: &RecipeDraft, now: DateTime<Utc>) -> AppResult<Recipe> {
    let name = validation::require_text("recipe name", &draft.name)?;

    if draft.ingredients.is_empty() {
        return Err(AppError::Validation(
            "a recipe needs at least one ingredient".to_string(),
        ));
    }

    Ok(Recipe {
        id,
        name: name.to_string(),
        description: draft.description.trim().to_string(),
        category: validation::optional_text(&draft.category)
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        ingredients: draft.ingredients.clone(),
        created_at: now,
    })
}

/// Validate a draft and add it to the catalog
pub fn create_recipe(
    recipes: &mut Vec<Recipe>,
    draft: &RecipeDraft,
    now: DateTime<Utc>,
) -> AppResult<Recipe> {
    let recipe = build_recipe(new_id(), draft, now).inspect_err(|e| {
        error_logging::log_validation_error(e, "create_recipe", "recipe", Some(&draft.name));
    })?;

    info!(
        recipe_id = %recipe.id,
        name = %recipe.name,
        ingredient_count = recipe.ingredients.len(),
        "Recipe created"
    );
    recipes.push(recipe.clone());
    Ok(recipe)
}

/// Replace an existing recipe, keeping its id and stamping a new creation time
pub fn replace_recipe(
    recipes: &mut [Recipe],
    id: &str,
    draft: &RecipeDraft,
    now: DateTime<Utc>,
) -> AppResult<Recipe> {
    let recipe = build_recipe(id.to_string(), draft, now)?;

    let slot = recipes
        .iter_mut()
        .find(|recipe| recipe.id == id)
        .ok_or_else(|| AppError::not_found("recipe", id))?;
    *slot = recipe.clone();

    debug!(recipe_id = %id, "Recipe replaced");
    Ok(recipe)
}

/// Remove a recipe, returning whether it existed
pub fn remove_recipe(recipes: &mut Vec<Recipe>, id: &str) -> bool {
    let before = recipes.len();
    recipes.retain(|recipe| recipe.id != id);
    recipes.len() < before
}

pub fn find_recipe<'a>(recipes: &'a [Recipe], id: &str) -> Option<&'a Recipe> {
    recipes.iter().find(|recipe| recipe.id == id)
}

/// Case-insensitive search on recipe name or category
pub fn search<'a>(recipes: &'a [Recipe], query: &str) -> Vec<&'a Recipe> {
    let needle = query.trim().to_lowercase();
    recipes
        .iter()
        .filter(|recipe| {
            recipe.name.to_lowercase().contains(&needle)
                || recipe.category.to_lowercase().contains(&needle)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ingredient(name: &str, quantity: &str, unit: &str) -> IngredientDraft {
        IngredientDraft {
            name: name.to_string(),
            quantity: quantity.to_string(),
            unit: unit.to_string(),
            inventory_item_id: None,
        }
    }

    fn sauce_draft() -> RecipeDraft {
        RecipeDraft {
            name: " Tomato Sauce ".to_string(),
            description: "Classic Italian tomato sauce for pasta".to_string(),
            category: "".to_string(),
            ingredients: vec![
                build_ingredient(&ingredient("Tomatoes", "2", "kg")).unwrap(),
                build_ingredient(&ingredient("Onions", "1/2", "kg")).unwrap(),
            ],
        }
    }

    #[test]
    fn test_build_ingredient_validation() {
        let built = build_ingredient(&ingredient("Onions", "0,5", "kg")).unwrap();
        assert_eq!(built.quantity, 0.5);
        assert_eq!(built.inventory_item_id, None);

        assert!(build_ingredient(&ingredient("", "1", "kg")).is_err());
        assert!(build_ingredient(&ingredient("Salt", "", "g")).is_err());
        assert!(build_ingredient(&ingredient("Salt", "0", "g")).is_err());
        assert!(build_ingredient(&ingredient("Salt", "pinch", "g")).is_err());
        assert!(build_ingredient(&ingredient("Salt", "1", " ")).is_err());
    }

    #[test]
    fn test_blank_inventory_link_is_dropped() {
        let mut draft = ingredient("Tomatoes", "2", "kg");
        draft.inventory_item_id = Some("  ".to_string());
        assert_eq!(build_ingredient(&draft).unwrap().inventory_item_id, None);

        draft.inventory_item_id = Some("inv-1".to_string());
        assert_eq!(
            build_ingredient(&draft).unwrap().inventory_item_id.as_deref(),
            Some("inv-1")
        );
    }

    #[test]
    fn test_create_recipe_defaults_category() {
        let mut recipes = Vec::new();
        let recipe = create_recipe(&mut recipes, &sauce_draft(), Utc::now()).unwrap();

        assert_eq!(recipe.name, "Tomato Sauce");
        assert_eq!(recipe.category, DEFAULT_CATEGORY);
        assert_eq!(recipe.ingredients.len(), 2);
        assert_eq!(recipes.len(), 1);
    }

    #[test]
    fn test_create_recipe_requires_name_and_ingredients() {
        let mut recipes = Vec::new();

        let mut draft = sauce_draft();
        draft.name = "  ".to_string();
        assert!(create_recipe(&mut recipes, &draft, Utc::now()).is_err());

        let mut draft = sauce_draft();
        draft.ingredients.clear();
        assert!(create_recipe(&mut recipes, &draft, Utc::now()).is_err());

        assert!(recipes.is_empty());
    }

    #[test]
    fn test_replace_recipe_keeps_id() {
        let mut recipes = Vec::new();
        let original = create_recipe(&mut recipes, &sauce_draft(), Utc::now()).unwrap();

        let mut draft = sauce_draft();
        draft.category = "Sauces".to_string();
        let replaced = replace_recipe(&mut recipes, &original.id, &draft, Utc::now()).unwrap();

        assert_eq!(replaced.id, original.id);
        assert_eq!(recipes[0].category, "Sauces");
        assert!(matches!(
            replace_recipe(&mut recipes, "missing", &draft, Utc::now()),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_search_by_name_or_category() {
        let mut recipes = Vec::new();
        let mut draft = sauce_draft();
        draft.category = "Sauces".to_string();
        create_recipe(&mut recipes, &draft, Utc::now()).unwrap();

        assert_eq!(search(&recipes, "tomato").len(), 1);
        assert_eq!(search(&recipes, "SAUCES").len(), 1);
        assert!(search(&recipes, "dessert").is_empty());

        let id = recipes[0].id.clone();
        assert!(find_recipe(&recipes, &id).is_some());
        assert!(remove_recipe(&mut recipes, &id));
        assert!(find_recipe(&recipes, &id).is_none());
    }
}
