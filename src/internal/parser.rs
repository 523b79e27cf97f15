use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::internal::error::ChefError;
use crate::internal::lexer::Lexer;
use crate::internal::token::{lookup_measure, Token, Type};
use crate::internal::util::saturating_count;
use crate::internal::{
    Function, Ingredient, IngredientTable, IngredientType, MAIN, Recipe, Statement,
};

static INGREDIENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        concat!(
            r"^(?:([0-9]+)\s)?(?:(heaped|level)\s)?",
            r"(?:(g|kg|pinch|pinches|ml|l|dash|dashes|cup|cups",
            r"|teaspoon|teaspoons|tablespoon|tablespoons)\s)?(.*)$",
        ),
    )
    .unwrap()
});
static SERVES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Serves ([0-9]+)\.$").unwrap());
static PREHEAT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Pre-heat oven to ([0-9]+) degrees").unwrap());

pub struct Parser {
    lexer: Lexer,
}

impl Parser {
    pub fn new(lexer: Lexer) -> Parser {
        Parser { lexer }
    }

    pub fn parse(&mut self) -> Result<Recipe, ChefError> {
        let title = self.lexer.next_token();
        if title.token_type == Type::EOF {
            return Err(ChefError::parse(0, "Empty recipe"));
        }
        let title = title.literal;

        let (main, mut servings) = self.parse_function(title.clone(), true)?;
        self.lexer.skip_blank_lines();
        if servings.is_none() {
            servings = Some(self.parse_serves()?);
        }

        let mut functions = HashMap::new();
        functions.insert(MAIN.to_string(), main);

        self.lexer.skip_blank_lines();
        while !self.lexer.is_eof() {
            let token = self.lexer.next_token();
            let line_num = token.line_num;
            let (function, _) = self.parse_function(token.literal, false)?;
            debug!(title = %function.title, "parsed auxiliary recipe");
            if functions.contains_key(&function.title) {
                return Err(ChefError::parse(
                    line_num,
                    format!("Duplicate recipe: {}", function.title),
                ));
            }
            functions.insert(function.title.clone(), function);
            self.lexer.skip_blank_lines();
        }

        Ok(Recipe {
            title,
            servings: servings.unwrap_or_default(),
            functions,
        })
    }

    /// Everything after the title line: ingredient list, optional serving
    /// count (main only), and method.
    fn parse_function(
        &mut self,
        title: String,
        is_main: bool,
    ) -> Result<(Function, Option<usize>), ChefError> {
        self.skip_to(Type::INGREDIENTS, "Ingredients.")?;
        let ingredients = self.parse_ingredients()?;

        self.lexer.skip_blank_lines();
        let mut servings = None;
        if is_main && SERVES_RE.is_match(&self.lexer.peek_token().literal) {
            servings = Some(self.parse_serves()?);
        }

        let oven_temperature = self.skip_to(Type::METHOD, "Method.")?;
        let statements = self.parse_statements()?;

        Ok((
            Function {
                title,
                ingredients,
                statements,
                oven_temperature,
            },
            servings,
        ))
    }

    /// Discard lines up to and including the header line. Returns the oven
    /// temperature if a pre-heat line was passed on the way.
    fn skip_to(&mut self, header: Type, literal: &str) -> Result<Option<u32>, ChefError> {
        let mut oven_temperature = None;
        loop {
            let token = self.lexer.next_token();
            if token.token_type == header {
                return Ok(oven_temperature);
            }
            if token.token_type == Type::EOF {
                return Err(ChefError::parse(
                    token.line_num,
                    format!("Expected '{}' before end of recipe", literal),
                ));
            }
            if let Some(caps) = PREHEAT_RE.captures(&token.literal) {
                oven_temperature = caps[1].parse::<u32>().ok();
            }
        }
    }

    fn parse_ingredients(&mut self) -> Result<IngredientTable, ChefError> {
        let mut ingredients = IngredientTable::new();
        while self.lexer.peek_token().token_type == Type::TEXT {
            let token = self.lexer.next_token();
            let ingredient = parse_ingredient(&token)?;
            if ingredients.contains_key(&ingredient.name) {
                return Err(ChefError::parse(
                    token.line_num,
                    format!("Duplicate ingredient: {}", ingredient.name),
                ));
            }
            ingredients.insert(ingredient.name.clone(), ingredient);
        }
        Ok(ingredients)
    }

    fn parse_serves(&mut self) -> Result<usize, ChefError> {
        let token = self.lexer.next_token();
        SERVES_RE
            .captures(&token.literal)
            .map(|caps| saturating_count(&caps[1]))
            .ok_or_else(|| {
                ChefError::parse(token.line_num, format!("Unknown line: {}", token.literal))
            })
    }

    fn parse_statements(&mut self) -> Result<Vec<Statement>, ChefError> {
        let mut statements = Vec::new();
        loop {
            let next = self.lexer.peek_token();
            if matches!(next.token_type, Type::BLANK | Type::EOF)
                || SERVES_RE.is_match(&next.literal)
            {
                break;
            }
            let token = self.lexer.next_token();
            for part in token.literal.split('.') {
                let part = part.trim();
                if part.is_empty() {
                    continue;
                }
                let (verb, argument) = match part.split_once(char::is_whitespace) {
                    Some((verb, rest)) => (verb, rest.trim()),
                    None => (part, ""),
                };
                statements.push(Statement::decode(verb, argument, token.line_num)?);
            }
        }
        Ok(statements)
    }
}

fn parse_ingredient(token: &Token) -> Result<Ingredient, ChefError> {
    let caps = INGREDIENT_RE
        .captures(&token.literal)
        .filter(|caps| !caps[4].trim().is_empty())
        .ok_or_else(|| {
            ChefError::parse(
                token.line_num,
                format!("Invalid ingredient: {}", token.literal),
            )
        })?;

    let value = match caps.get(1) {
        Some(quantity) => Some(quantity.as_str().parse::<i64>().map_err(|_| {
            ChefError::parse(
                token.line_num,
                format!("Quantity out of range: {}", quantity.as_str()),
            )
        })?),
        None => None,
    };

    let mut ingredient_type = match caps.get(3) {
        Some(measure) => lookup_measure(measure.as_str()).ok_or_else(|| {
            ChefError::parse(
                token.line_num,
                format!("Unknown measure: {}", measure.as_str()),
            )
        })?,
        None => IngredientType::Either,
    };
    // heaped and level only ever describe dry goods
    if caps.get(2).is_some() {
        ingredient_type = IngredientType::Dry;
    }

    Ok(Ingredient {
        name: caps[4].trim().to_string(),
        value,
        ingredient_type,
    })
}
