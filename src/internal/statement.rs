use std::fmt;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::internal::error::ChefError;
use crate::internal::token::{lookup_verb, Verb};
use crate::internal::util::{container_index, saturating_count};

static PUT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+) into (?:the )?(?:([0-9]+)(?:st|nd|rd|th) )?mixing bowl$").unwrap()
});
static LIQUEFY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:the )?contents of the (?:([0-9]+)(?:st|nd|rd|th) )?mixing bowl$").unwrap()
});
static POUR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        concat!(
            r"^contents of (?:the )?(?:([0-9]+)(?:st|nd|rd|th) )?mixing bowl",
            r" into (?:the )?(?:([0-9]+)(?:st|nd|rd|th) )?baking dish$",
        ),
    )
    .unwrap()
});
static STIR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:(?:the )?(?:([0-9]+)(?:st|nd|rd|th) )?mixing bowl )?for ([0-9]+) minutes?$",
    )
    .unwrap()
});
static LOOP_END_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:(.*)\s)?until (\S+)$").unwrap());
static LOOP_START_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^the (.+)$").unwrap());

/// A method step, decoded once from its `(verb, argument)` text.
#[derive(Clone, Debug, PartialEq)]
pub enum Statement {
    Put { ingredient: String, bowl: usize },
    Combine { ingredient: String, bowl: usize },
    Liquefy { bowl: usize },
    Pour { bowl: usize, dish: usize },
    Stir { bowl: usize, minutes: usize },
    LoopStart { verb: String, ingredient: String },
    LoopEnd { verbed: String, ingredient: Option<String> },
}

impl Statement {
    pub fn decode(verb: &str, argument: &str, line_num: usize) -> Result<Statement, ChefError> {
        let bad = |what: &str| {
            ChefError::parse(line_num, format!("Bad {} statement: {} {}", what, verb, argument))
        };

        match lookup_verb(verb) {
            Some(Verb::Put) | Some(Verb::Combine) => {
                let caps = PUT_RE.captures(argument).ok_or_else(|| bad(verb))?;
                let ingredient = caps[1].to_string();
                let bowl = index_of(&caps, 2, line_num)?;
                if lookup_verb(verb) == Some(Verb::Put) {
                    Ok(Statement::Put { ingredient, bowl })
                } else {
                    Ok(Statement::Combine { ingredient, bowl })
                }
            }
            Some(Verb::Liquefy) => {
                let caps = LIQUEFY_RE.captures(argument).ok_or_else(|| bad("Liquefy"))?;
                Ok(Statement::Liquefy {
                    bowl: index_of(&caps, 1, line_num)?,
                })
            }
            Some(Verb::Pour) => {
                let caps = POUR_RE.captures(argument).ok_or_else(|| bad("Pour"))?;
                Ok(Statement::Pour {
                    bowl: index_of(&caps, 1, line_num)?,
                    dish: index_of(&caps, 2, line_num)?,
                })
            }
            Some(Verb::Stir) => {
                let caps = STIR_RE.captures(argument).ok_or_else(|| bad("Stir"))?;
                let minutes = saturating_count(&caps[2]);
                Ok(Statement::Stir {
                    bowl: index_of(&caps, 1, line_num)?,
                    minutes,
                })
            }
            None => {
                if let Some(caps) = LOOP_END_RE.captures(argument) {
                    let ingredient = caps.get(1).map(|m| {
                        let name = m.as_str().trim();
                        name.strip_prefix("the ").unwrap_or(name).to_string()
                    });
                    return Ok(Statement::LoopEnd {
                        verbed: caps[2].to_string(),
                        ingredient: ingredient.filter(|name| !name.is_empty()),
                    });
                }
                if let Some(caps) = LOOP_START_RE.captures(argument) {
                    return Ok(Statement::LoopStart {
                        verb: verb.to_string(),
                        ingredient: caps[1].to_string(),
                    });
                }
                Err(ChefError::parse(
                    line_num,
                    format!("Unknown statement: {} {}", verb, argument),
                ))
            }
        }
    }
}

fn index_of(caps: &Captures<'_>, group: usize, line_num: usize) -> Result<usize, ChefError> {
    container_index(caps.get(group).map(|m| m.as_str()))
        .map_err(|e| ChefError::parse(line_num, e))
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Statement::Put { ingredient, bowl } => {
                write!(f, "Put {} into mixing bowl #{}", ingredient, bowl + 1)
            }
            Statement::Combine { ingredient, bowl } => {
                write!(f, "Combine {} into mixing bowl #{}", ingredient, bowl + 1)
            }
            Statement::Liquefy { bowl } => write!(f, "Liquefy mixing bowl #{}", bowl + 1),
            Statement::Pour { bowl, dish } => write!(
                f,
                "Pour mixing bowl #{} into baking dish #{}",
                bowl + 1,
                dish + 1
            ),
            Statement::Stir { bowl, minutes } => {
                write!(f, "Stir mixing bowl #{} for {} minutes", bowl + 1, minutes)
            }
            Statement::LoopStart { verb, ingredient } => write!(f, "{} the {}", verb, ingredient),
            Statement::LoopEnd { verbed, ingredient } => match ingredient {
                Some(name) => write!(f, "{} until {}", name, verbed),
                None => write!(f, "until {}", verbed),
            },
        }
    }
}
