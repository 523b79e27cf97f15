//! Parser and interpreter for recipes written in the Chef esoteric language.
//!
//! ```
//! let output = chef::cook(
//!     "Hi.\n\nIngredients.\n105 ml i\n72 ml h\n\nMethod.\n\
//!      Put i into the mixing bowl. Put h into the mixing bowl. \
//!      Pour contents of the mixing bowl into the baking dish.\n\nServes 1.\n",
//! )
//! .unwrap();
//! assert_eq!(output, "Hi");
//! ```

pub mod internal;

pub use internal::error::ChefError;
pub use internal::evaluator::{Evaluator, Limits};
pub use internal::kitchen::{Container, Kitchen};
pub use internal::{Function, Ingredient, IngredientTable, IngredientType, Recipe, Statement};

/// Parse `source` and run its main recipe with default limits.
pub fn cook(source: &str) -> Result<String, ChefError> {
    let recipe = Recipe::parse(source)?;
    Evaluator::new(&recipe, Limits::default()).run()
}
