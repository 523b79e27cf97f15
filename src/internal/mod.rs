use std::collections::HashMap;
use std::str::FromStr;

use crate::internal::error::ChefError;
use crate::internal::lexer::Lexer;
use crate::internal::parser::Parser;

pub use crate::internal::statement::Statement;

pub mod error;
pub mod evaluator;
pub mod kitchen;
pub mod lexer;
pub mod parser;
pub mod serve;
pub mod statement;
mod token;
mod util;

pub const MAIN: &str = "main";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IngredientType {
    Dry,
    Liquid,
    Either,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Ingredient {
    pub name: String,
    pub value: Option<i64>,
    pub ingredient_type: IngredientType,
}

pub type IngredientTable = HashMap<String, Ingredient>;

#[derive(Clone, Debug)]
pub struct Function {
    pub title: String,
    pub ingredients: IngredientTable,
    pub statements: Vec<Statement>,
    pub oven_temperature: Option<u32>,
}

#[derive(Clone, Debug)]
pub struct Recipe {
    pub title: String,
    pub servings: usize,
    pub functions: HashMap<String, Function>,
}

impl Recipe {
    pub fn parse(source: &str) -> Result<Recipe, ChefError> {
        Parser::new(Lexer::new(source.to_string())).parse()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn servings(&self) -> usize {
        self.servings
    }

    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.get(name)
    }

    pub fn main(&self) -> Option<&Function> {
        self.function(MAIN)
    }

    pub fn oven_temperature(&self) -> Option<u32> {
        self.main().and_then(|f| f.oven_temperature)
    }
}

impl FromStr for Recipe {
    type Err = ChefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Recipe::parse(s)
    }
}
