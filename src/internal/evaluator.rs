use tracing::{debug, info, trace};

use crate::internal::error::ChefError;
use crate::internal::kitchen::{Container, Kitchen};
use crate::internal::serve::serve;
use crate::internal::util::is_past_tense_of;
use crate::internal::*;

pub const DEFAULT_MAX_LOOP_ITERATIONS: u64 = 1_000_000;

/// Bounds on a single run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Limits {
    /// Iterations any one loop may make before the run is aborted.
    pub max_loop_iterations: u64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_loop_iterations: DEFAULT_MAX_LOOP_ITERATIONS,
        }
    }
}

pub struct Evaluator<'a> {
    recipe: &'a Recipe,
    limits: Limits,
    kitchen: Kitchen,
}

impl<'a> Evaluator<'a> {
    pub fn new(recipe: &'a Recipe, limits: Limits) -> Evaluator<'a> {
        Evaluator {
            recipe,
            limits,
            kitchen: Kitchen::new(),
        }
    }

    /// Cook `main` in a fresh kitchen and serve the baking dishes.
    pub fn run(&mut self) -> Result<String, ChefError> {
        info!(title = %self.recipe.title, servings = self.recipe.servings, "cooking recipe");
        self.kitchen = Kitchen::new();
        self.run_function(MAIN)?;
        let output = serve(&mut self.kitchen, self.recipe.servings)?;
        info!(chars = output.chars().count(), "recipe served");
        Ok(output)
    }

    /// Execute one function against the current kitchen and hand back its
    /// first mixing bowl.
    pub fn run_function(&mut self, name: &str) -> Result<Container, ChefError> {
        let recipe = self.recipe;
        let function = recipe
            .function(name)
            .ok_or_else(|| ChefError::Runtime(format!("Unknown recipe: {}", name)))?;
        let mut pantry = function.ingredients.clone();
        self.resolve_statements(&function.statements, &mut pantry)
            .map_err(|e| e.with_context(format!("in recipe '{}'", function.title)))?;
        Ok(self.kitchen.mixing_bowl(0).clone())
    }

    pub fn kitchen(&mut self) -> &mut Kitchen {
        &mut self.kitchen
    }

    fn resolve_statements(
        &mut self,
        statements: &[Statement],
        pantry: &mut IngredientTable,
    ) -> Result<(), ChefError> {
        let mut i = 0;
        while i < statements.len() {
            let statement = &statements[i];
            debug!(%statement, "resolve statement");
            match statement {
                Statement::Put { ingredient, bowl } => {
                    let item = lookup(pantry, ingredient)?.clone();
                    self.kitchen.mixing_bowl(*bowl).push(item);
                }
                Statement::Combine { ingredient, bowl } => {
                    self.resolve_combine(lookup(pantry, ingredient)?, *bowl)?;
                }
                Statement::Liquefy { bowl } => self.kitchen.mixing_bowl(*bowl).liquefy(),
                Statement::Pour { bowl, dish } => self.kitchen.pour(*bowl, *dish),
                Statement::Stir { bowl, minutes } => {
                    self.kitchen.mixing_bowl(*bowl).stir(*minutes)
                }
                Statement::LoopStart { verb, ingredient } => {
                    let end = find_loop_end(statements, i, verb)?;
                    let until = match &statements[end] {
                        Statement::LoopEnd { ingredient, .. } => ingredient.as_deref(),
                        _ => None,
                    };
                    self.resolve_loop(&statements[i + 1..end], verb, ingredient, until, pantry)?;
                    i = end;
                }
                Statement::LoopEnd { verbed, .. } => {
                    return Err(ChefError::Runtime(format!(
                        "'until {}' has no matching loop",
                        verbed
                    )));
                }
            }
            i += 1;
        }
        Ok(())
    }

    fn resolve_combine(&mut self, named: &Ingredient, bowl: usize) -> Result<(), ChefError> {
        let factor = named.value.ok_or_else(|| {
            ChefError::Runtime(format!("Cannot combine '{}': it has no value", named.name))
        })?;
        let container = self.kitchen.mixing_bowl(bowl);
        let top = container.top().ok_or_else(|| {
            ChefError::Runtime(format!(
                "Cannot combine '{}' into empty mixing bowl #{}",
                named.name,
                bowl + 1
            ))
        })?;
        let value = top.value.ok_or_else(|| {
            ChefError::Runtime(format!(
                "Cannot combine '{}' with '{}': it has no value",
                named.name, top.name
            ))
        })?;
        let product = factor.checked_mul(value).ok_or_else(|| {
            ChefError::Runtime(format!("Combining '{}' overflowed", named.name))
        })?;
        container.push(Ingredient {
            name: named.name.clone(),
            value: Some(product),
            ingredient_type: named.ingredient_type,
        });
        Ok(())
    }

    /// Run `body` while `ingredient` is non-zero, decrementing `until` (or
    /// `ingredient` itself) after every pass.
    fn resolve_loop(
        &mut self,
        body: &[Statement],
        verb: &str,
        ingredient: &str,
        until: Option<&str>,
        pantry: &mut IngredientTable,
    ) -> Result<(), ChefError> {
        let counter = until.unwrap_or(ingredient);
        let mut iterations = 0u64;
        loop {
            let value = lookup(pantry, ingredient)?.value.ok_or_else(|| {
                ChefError::Runtime(format!("Loop ingredient '{}' has no value", ingredient))
            })?;
            if value == 0 {
                break;
            }
            if iterations >= self.limits.max_loop_iterations {
                return Err(ChefError::LoopLimit {
                    verb: verb.to_string(),
                    limit: self.limits.max_loop_iterations,
                });
            }
            iterations += 1;
            trace!(verb, ingredient, value, iterations, "loop iteration");

            self.resolve_statements(body, pantry)?;
            decrement(pantry, counter)?;
        }
        debug!(verb, ingredient, iterations, "loop finished");
        Ok(())
    }
}

fn lookup<'p>(pantry: &'p IngredientTable, name: &str) -> Result<&'p Ingredient, ChefError> {
    pantry
        .get(name)
        .ok_or_else(|| ChefError::UnknownIngredient(name.to_string()))
}

fn decrement(pantry: &mut IngredientTable, name: &str) -> Result<(), ChefError> {
    let ingredient = pantry
        .get_mut(name)
        .ok_or_else(|| ChefError::UnknownIngredient(name.to_string()))?;
    let value = ingredient.value.ok_or_else(|| {
        ChefError::Runtime(format!("Cannot decrement '{}': it has no value", name))
    })?;
    ingredient.value = Some(value.checked_sub(1).ok_or_else(|| {
        ChefError::Runtime(format!("Decrementing '{}' overflowed", name))
    })?);
    Ok(())
}

/// Index of the first statement after `start` that closes a loop opened by `verb`.
fn find_loop_end(statements: &[Statement], start: usize, verb: &str) -> Result<usize, ChefError> {
    statements
        .iter()
        .enumerate()
        .skip(start + 1)
        .find(|(_, statement)| {
            matches!(statement, Statement::LoopEnd { verbed, .. } if is_past_tense_of(verbed, verb))
        })
        .map(|(index, _)| index)
        .ok_or_else(|| ChefError::Runtime(format!("Could not find end of loop '{}'", verb)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cook(source: &str) -> Result<String, ChefError> {
        let recipe = Recipe::parse(source).unwrap();
        Evaluator::new(&recipe, Limits::default()).run()
    }

    fn bowl_values(source: &str) -> Vec<i64> {
        let recipe = Recipe::parse(source).unwrap();
        let mut evaluator = Evaluator::new(&recipe, Limits::default());
        evaluator
            .run_function(MAIN)
            .unwrap()
            .ingredients()
            .iter()
            .filter_map(|i| i.value)
            .collect()
    }

    fn recipe(ingredients: &str, method: &str) -> String {
        format!(
            "Test Dish.\n\nIngredients.\n{}\n\nMethod.\n{}\n\nServes 1.\n",
            ingredients, method
        )
    }

    #[test]
    fn put_liquefy_pour_renders() {
        let source = recipe(
            "105 ml i\n104 g h",
            "Put i into the mixing bowl. Put h into the mixing bowl. \
             Liquefy contents of the mixing bowl. \
             Pour contents of the mixing bowl into the baking dish.",
        );
        assert_eq!(cook(&source).unwrap(), "hi");
    }

    #[test]
    fn put_copies_are_independent() {
        let source = recipe(
            "66 g b",
            "Put b into the mixing bowl. Liquefy contents of the mixing bowl. \
             Put b into the mixing bowl.",
        );
        let recipe = Recipe::parse(&source).unwrap();
        let mut evaluator = Evaluator::new(&recipe, Limits::default());
        let bowl = evaluator.run_function(MAIN).unwrap();
        let types: Vec<_> = bowl.ingredients().iter().map(|i| i.ingredient_type).collect();
        assert_eq!(types, vec![IngredientType::Liquid, IngredientType::Dry]);
        assert_eq!(
            recipe.main().unwrap().ingredients["b"].ingredient_type,
            IngredientType::Dry
        );
    }

    #[test]
    fn combine_multiplies_top_and_keeps_named_ingredient() {
        let source = recipe(
            "6 g flour\n7 ml milk",
            "Put flour into the mixing bowl. Combine milk into the mixing bowl.",
        );
        let recipe = Recipe::parse(&source).unwrap();
        let mut evaluator = Evaluator::new(&recipe, Limits::default());
        let bowl = evaluator.run_function(MAIN).unwrap();
        let top = bowl.top().unwrap();
        assert_eq!(top.value, Some(42));
        assert_eq!(top.name, "milk");
        assert_eq!(top.ingredient_type, IngredientType::Liquid);
        assert_eq!(bowl.len(), 2);
    }

    #[test]
    fn combine_into_empty_bowl_fails() {
        let source = recipe("7 ml milk", "Combine milk into the mixing bowl.");
        let err = cook(&source).unwrap_err();
        assert!(err.to_string().contains("empty mixing bowl"));
    }

    #[test]
    fn combine_unknown_ingredient_fails_at_runtime() {
        let source = recipe(
            "7 ml milk",
            "Put milk into the mixing bowl. Combine cream into the mixing bowl.",
        );
        let err = cook(&source).unwrap_err();
        assert!(!err.is_parse_error());
        assert!(matches!(
            err,
            ChefError::WithContext { ref source, .. }
                if matches!(**source, ChefError::UnknownIngredient(ref name) if name == "cream")
        ));
    }

    #[test]
    fn combine_onto_valueless_top_fails() {
        let source = recipe(
            "salt\n7 ml milk",
            "Put salt into the mixing bowl. Combine milk into the mixing bowl.",
        );
        let err = cook(&source).unwrap_err();
        assert!(!err.is_parse_error());
        assert!(err.to_string().contains("with 'salt': it has no value"));
    }

    #[test]
    fn combine_overflow_fails() {
        let source = recipe(
            "9223372036854775807 g big\n2 g two",
            "Put big into the mixing bowl. Combine two into the mixing bowl.",
        );
        let err = cook(&source).unwrap_err();
        assert!(err.to_string().contains("Combining 'two' overflowed"));
    }

    #[test]
    fn loop_ingredient_without_value_fails() {
        let source = recipe(
            "counter\n1 g pip",
            "Repeat the counter.\nPut pip into the mixing bowl.\nWait until repeated.",
        );
        let err = cook(&source).unwrap_err();
        assert!(!err.is_parse_error());
        assert!(err.to_string().contains("Loop ingredient 'counter' has no value"));
    }

    #[test]
    fn far_off_ordinal_runs_without_allocating_the_gap() {
        let source = recipe(
            "72 ml h",
            "Put h into the 18446744073709551615th mixing bowl. \
             Pour contents of the 18446744073709551615th mixing bowl into the baking dish.",
        );
        assert_eq!(cook(&source).unwrap(), "H");
    }

    #[test]
    fn stir_with_huge_minutes_moves_top_to_bottom() {
        let source = recipe(
            "1 g a\n2 g b\n3 g c",
            "Put a into the mixing bowl. Put b into the mixing bowl. Put c into the mixing bowl. \
             Stir for 99999999999999999999 minutes.",
        );
        assert_eq!(bowl_values(&source), vec![3, 1, 2]);
    }

    #[test]
    fn unknown_ingredient_fails_at_runtime() {
        let source = recipe("7 ml milk", "Put cream into the mixing bowl.");
        let err = cook(&source).unwrap_err();
        assert!(!err.is_parse_error());
        assert!(err.to_string().contains("Unknown ingredient: cream"));
    }

    #[test]
    fn stir_addresses_numbered_bowl() {
        let source = recipe(
            "1 g a\n2 g b\n3 g c",
            "Put a into the 2nd mixing bowl. Put b into the 2nd mixing bowl. \
             Put c into the 2nd mixing bowl. Stir the 2nd mixing bowl for 2 minutes. \
             Pour contents of the 2nd mixing bowl into the baking dish.",
        );
        let recipe = Recipe::parse(&source).unwrap();
        let mut evaluator = Evaluator::new(&recipe, Limits::default());
        evaluator.run_function(MAIN).unwrap();
        let dish: Vec<_> = evaluator
            .kitchen()
            .baking_dish(0)
            .ingredients()
            .iter()
            .filter_map(|i| i.value)
            .collect();
        assert_eq!(dish, vec![3, 1, 2]);
    }

    #[test]
    fn serves_renders_dishes_in_index_order() {
        let source = "Two Plates.\n\nIngredients.\n65 ml a\n66 ml b\n\nMethod.\n\
                      Put a into the mixing bowl. Put b into the 2nd mixing bowl. \
                      Pour contents of the 2nd mixing bowl into the 2nd baking dish. \
                      Pour contents of the mixing bowl into the baking dish.\n\nServes 2.\n";
        assert_eq!(cook(source).unwrap(), "AB");
    }

    #[test]
    fn dry_ingredient_cannot_be_served() {
        let source = recipe(
            "65 g a",
            "Put a into the mixing bowl. Pour contents of the mixing bowl into the baking dish.",
        );
        assert!(matches!(
            cook(&source).unwrap_err(),
            ChefError::Unrenderable { .. }
        ));
    }

    // Loops follow the canonical decrement semantics: the body may hold any
    // number of statements and the counter is decremented after every pass.
    // Single-statement loops that spin without decrementing are not supported.

    #[test]
    fn canonical_loop_repeats_body_until_counter_is_zero() {
        let source = recipe(
            "3 counter\n33 ml bang",
            "Repeat the counter.\nPut bang into the mixing bowl.\nWait until repeated.",
        );
        assert_eq!(bowl_values(&source), vec![33, 33, 33]);
    }

    #[test]
    fn canonical_loop_with_multi_statement_body() {
        let source = recipe(
            "2 eggs\n3 g flour\n2 g sugar",
            "Beat the eggs.\nPut flour into the mixing bowl.\n\
             Combine sugar into the mixing bowl.\nWhisk the eggs until beated.",
        );
        assert_eq!(bowl_values(&source), vec![3, 6, 3, 6]);
    }

    #[test]
    fn canonical_loop_skipped_when_counter_is_zero() {
        let source = recipe(
            "0 counter\n33 ml bang",
            "Repeat the counter.\nPut bang into the mixing bowl.\nWait until repeated.\n\
             Put counter into the mixing bowl.",
        );
        assert_eq!(bowl_values(&source), vec![0]);
    }

    #[test]
    fn canonical_loop_decrements_named_until_ingredient() {
        // the closing statement counts down `outer`, so `inner` stays at 1 and
        // the limit trips
        let source = recipe(
            "1 inner\n5 outer\n1 g pip",
            "Chop the inner.\nPut pip into the mixing bowl.\nMash the outer until chopped.",
        );
        let recipe = Recipe::parse(&source).unwrap();
        let limits = Limits {
            max_loop_iterations: 10,
        };
        let err = Evaluator::new(&recipe, limits).run().unwrap_err();
        assert!(matches!(
            err,
            ChefError::WithContext { ref source, .. }
                if matches!(**source, ChefError::LoopLimit { limit: 10, .. })
        ));
    }

    #[test]
    fn nested_loops_with_different_verbs() {
        let source = recipe(
            "2 rows\n3 cols\n3 reset\n1 g x",
            "Knead the rows.\nPut reset into the 2nd mixing bowl.\nFold the cols.\n\
             Put x into the mixing bowl.\nWait until folded.\nRest the rows until kneaded.",
        );
        // `cols` is exhausted after the first row
        assert_eq!(bowl_values(&source), vec![1, 1, 1]);
    }

    #[test]
    fn loop_without_end_fails() {
        let source = recipe("1 counter", "Repeat the counter.");
        let err = cook(&source).unwrap_err();
        assert!(err.to_string().contains("Could not find end of loop"));
    }

    #[test]
    fn stray_loop_end_fails() {
        let source = recipe("1 counter", "Wait until repeated.");
        let err = cook(&source).unwrap_err();
        assert!(err.to_string().contains("no matching loop"));
    }

    #[test]
    fn run_starts_from_an_empty_kitchen() {
        let source = recipe(
            "72 ml h",
            "Put h into the mixing bowl. Pour contents of the mixing bowl into the baking dish.",
        );
        let recipe = Recipe::parse(&source).unwrap();
        let mut evaluator = Evaluator::new(&recipe, Limits::default());
        assert_eq!(evaluator.run().unwrap(), "H");
        assert_eq!(evaluator.run().unwrap(), "H");
    }
}
