use crate::internal::error::ChefError;
use crate::internal::kitchen::Kitchen;
use crate::internal::{Ingredient, IngredientType};

/// Empty baking dishes `0..servings` in order, top first, into a string.
pub fn serve(kitchen: &mut Kitchen, servings: usize) -> Result<String, ChefError> {
    let mut output = String::new();
    for dish in kitchen.dishes_served(servings) {
        while let Some(ingredient) = dish.pop() {
            output.push(render(&ingredient)?);
        }
    }
    Ok(output)
}

fn render(ingredient: &Ingredient) -> Result<char, ChefError> {
    let unrenderable = |reason: String| ChefError::Unrenderable {
        name: ingredient.name.clone(),
        reason,
    };
    if ingredient.ingredient_type != IngredientType::Liquid {
        return Err(unrenderable(format!(
            "cannot render a {:?} ingredient",
            ingredient.ingredient_type
        )));
    }
    let value = ingredient
        .value
        .ok_or_else(|| unrenderable("it has no value".to_string()))?;
    u32::try_from(value)
        .ok()
        .and_then(char::from_u32)
        .ok_or_else(|| unrenderable(format!("{} is not a character", value)))
}
