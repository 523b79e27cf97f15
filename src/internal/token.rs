use crate::internal::IngredientType;

/// One source line, classified.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub token_type: Type,
    pub literal: String,
    pub line_num: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Type {
    EOF,
    BLANK,
    INGREDIENTS,
    METHOD,
    TEXT,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verb {
    Put,
    Combine,
    Liquefy,
    Pour,
    Stir,
}

pub fn lookup_line(line: &str) -> Type {
    match line {
        "Ingredients." => Type::INGREDIENTS,
        "Method." => Type::METHOD,
        _ if line.trim().is_empty() => Type::BLANK,
        _ => Type::TEXT,
    }
}

pub fn lookup_verb(verb: &str) -> Option<Verb> {
    match verb {
        "Put" => Some(Verb::Put),
        "Combine" => Some(Verb::Combine),
        "Liquefy" | "Liquify" => Some(Verb::Liquefy),
        "Pour" => Some(Verb::Pour),
        "Stir" => Some(Verb::Stir),
        _ => None,
    }
}

pub fn lookup_measure(measure: &str) -> Option<IngredientType> {
    match measure {
        "g" | "kg" | "pinch" | "pinches" => Some(IngredientType::Dry),
        "ml" | "l" | "dash" | "dashes" => Some(IngredientType::Liquid),
        "cup" | "cups" | "teaspoon" | "teaspoons" | "tablespoon" | "tablespoons" => {
            Some(IngredientType::Either)
        }
        _ => None,
    }
}
