use std::collections::BTreeMap;

use crate::internal::{Ingredient, IngredientType};

/// A mixing bowl or baking dish. The last element is the top of the stack.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Container {
    ingredients: Vec<Ingredient>,
}

impl Container {
    pub fn push(&mut self, ingredient: Ingredient) {
        self.ingredients.push(ingredient);
    }

    pub fn pop(&mut self) -> Option<Ingredient> {
        self.ingredients.pop()
    }

    pub fn top(&self) -> Option<&Ingredient> {
        self.ingredients.last()
    }

    pub fn len(&self) -> usize {
        self.ingredients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ingredients.is_empty()
    }

    /// Bottom to top.
    pub fn ingredients(&self) -> &[Ingredient] {
        &self.ingredients
    }

    pub fn liquefy(&mut self) {
        for ingredient in &mut self.ingredients {
            ingredient.ingredient_type = IngredientType::Liquid;
        }
    }

    /// Move the top ingredient `minutes` places down. Past the bottom it
    /// simply lands at the bottom.
    pub fn stir(&mut self, minutes: usize) {
        let Some(top) = self.ingredients.pop() else {
            return;
        };
        let depth = minutes.min(self.ingredients.len());
        let at = self.ingredients.len() - depth;
        self.ingredients.insert(at, top);
    }
}

impl From<Vec<Ingredient>> for Container {
    fn from(ingredients: Vec<Ingredient>) -> Self {
        Container { ingredients }
    }
}

/// Mixing bowls and baking dishes for one run, created on first use and
/// keyed by index so a far-off ordinal costs one entry.
#[derive(Debug, Default)]
pub struct Kitchen {
    mixing_bowls: BTreeMap<usize, Container>,
    baking_dishes: BTreeMap<usize, Container>,
}

impl Kitchen {
    pub fn new() -> Self {
        Kitchen::default()
    }

    pub fn mixing_bowl(&mut self, index: usize) -> &mut Container {
        self.mixing_bowls.entry(index).or_default()
    }

    pub fn baking_dish(&mut self, index: usize) -> &mut Container {
        self.baking_dishes.entry(index).or_default()
    }

    /// Baking dishes that have been used, below `servings`, in index order.
    pub fn dishes_served(&mut self, servings: usize) -> impl Iterator<Item = &mut Container> {
        self.baking_dishes.range_mut(..servings).map(|(_, dish)| dish)
    }

    /// Copy the bowl's contents, in order, on top of the dish. The bowl keeps them.
    pub fn pour(&mut self, bowl: usize, dish: usize) {
        let contents = self.mixing_bowl(bowl).ingredients.clone();
        self.baking_dish(dish).ingredients.extend(contents);
    }
}
