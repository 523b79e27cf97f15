use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChefError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Runtime error: {0}")]
    Runtime(String),

    #[error("Unknown ingredient: {0}")]
    UnknownIngredient(String),

    #[error("Cannot render ingredient '{name}': {reason}")]
    Unrenderable { name: String, reason: String },

    #[error("Loop '{verb}' exceeded {limit} iterations")]
    LoopLimit { verb: String, limit: u64 },

    #[error("{source}\nContext: {context}")]
    WithContext {
        source: Box<ChefError>,
        context: String,
    },
}

impl ChefError {
    pub fn parse<S: Into<String>>(line: usize, message: S) -> Self {
        ChefError::Parse {
            line,
            message: message.into(),
        }
    }

    pub fn with_context<S: Into<String>>(self, context: S) -> Self {
        ChefError::WithContext {
            source: Box::new(self),
            context: context.into(),
        }
    }

    /// Whether this error was raised while reading the recipe rather than cooking it.
    pub fn is_parse_error(&self) -> bool {
        match self {
            ChefError::Parse { .. } => true,
            ChefError::WithContext { source, .. } => source.is_parse_error(),
            _ => false,
        }
    }
}
