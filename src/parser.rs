//! Parser for single line rules of the form
//!
//! ```text
//! rule           := "if" condition-expr "then" conclusion
//! condition-expr := "(" condition-expr ")"
//!                 | condition-expr ("and" | "or") condition-expr
//!                 | single-cond
//! single-cond    := input-var "is" ["not"] [hedge] term
//! hedge          := "slightly" | "somewhat" | "very" | "extremely"
//! conclusion     := output-var "is" term-or-function
//! ```
//!
//! `and` and `or` have no precedence over each other, so mixing them at one
//! nesting level requires parentheses.

use crate::condition::{Combination, Condition, Operator, SingleCondition};
use crate::error::ParseError;
use crate::lexer::{normalize, Candidate, Keyword, Lexeme, LexemeTable, Token};
use crate::rules::Conclusion;
use crate::variable::{TermKey, VariableKey};

/// Deepest parenthesis nesting accepted in the condition part of a rule
pub(crate) const MAX_NESTING: usize = 64;

/// The names a rule may use for one variable and its terms or functions
#[derive(Clone, Debug)]
pub(crate) struct Vocabulary<'n, K, V> {
    pub(crate) name: &'n str,
    pub(crate) key: K,
    pub(crate) values: Vec<(&'n str, V)>,
}

/// Vocabulary of a variable with terms
pub(crate) type TermVocabulary<'n> = Vocabulary<'n, VariableKey, TermKey>;

/// A condition part element once single conditions have been extracted
#[derive(Clone, Copy, Debug)]
enum Item<'r> {
    Condition(SingleCondition, &'r str),
    Keyword(Keyword, &'r str),
}

impl<'r> Item<'r> {
    fn text(&self) -> &'r str {
        match self {
            Item::Condition(_, text) | Item::Keyword(_, text) => *text,
        }
    }

    fn is(&self, keyword: Keyword) -> bool {
        matches!(self, Item::Keyword(k, _) if *k == keyword)
    }
}

/// Parses `rule` into its condition tree and conclusion
pub(crate) fn parse_rule<O: Copy + Eq, V: Copy>(
    rule: &str,
    inputs: &[TermVocabulary<'_>],
    outputs: &[Vocabulary<'_, O, V>],
) -> Result<(Condition, Conclusion<O, V>), ParseError> {
    if rule.trim().is_empty() {
        return Err(ParseError::EmptyRule);
    }

    let normalized = normalize(rule);
    let table = LexemeTable::build(inputs, outputs)?;
    let tokens = table.tokenize(&normalized)?;

    if !tokens.first().is_some_and(|token| token.is(Keyword::If)) {
        return Err(ParseError::MissingIf);
    }

    let then_index = tokens
        .iter()
        .position(|token| token.is(Keyword::Then))
        .ok_or(ParseError::MissingThen)?;
    let condition_tokens = &tokens[1..then_index];
    let conclusion_tokens = &tokens[then_index + 1..];

    if condition_tokens.is_empty() {
        return Err(ParseError::EmptyCondition);
    }

    if conclusion_tokens.is_empty() {
        return Err(ParseError::EmptyConclusion);
    }

    let items = extract_single_conditions(condition_tokens)?;

    if nesting_depth(&items) > MAX_NESTING {
        return Err(ParseError::NestingTooDeep(MAX_NESTING));
    }

    let condition = parse_conditions(&items)?;
    let conclusion = parse_conclusion(conclusion_tokens)?;

    Ok((condition, conclusion))
}

/// Replaces every `variable is [not] [hedge] term` run with a single item,
/// leaving only `and`, `or` and parentheses around them.
fn extract_single_conditions<'r, O: Copy, V: Copy>(
    tokens: &[Token<'r, '_, O, V>],
) -> Result<Vec<Item<'r>>, ParseError> {
    let mut items = Vec::new();
    let mut rest = tokens;

    while let Some(first) = rest.first() {
        match first.lexeme {
            Lexeme::InputVariable(variable) => {
                let malformed = || ParseError::MalformedCondition(first.text.to_owned());

                if rest.len() < 3 || !rest[1].is(Keyword::Is) {
                    return Err(malformed());
                }

                let mut cur = 2;
                let not = rest[cur].is(Keyword::Not);

                if not {
                    cur += 1;
                }

                let hedge = match rest.get(cur).and_then(Token::keyword) {
                    Some(Keyword::Hedge(hedge)) => {
                        cur += 1;
                        hedge
                    },
                    _ => Default::default(),
                };

                let term_token = rest.get(cur).ok_or_else(malformed)?;
                let term = resolve_input_term(term_token, *variable)
                    .ok_or_else(|| ParseError::TermMismatch(term_token.text.to_owned(), first.text.to_owned()))?;

                items.push(Item::Condition(
                    SingleCondition {
                        variable: *variable,
                        term,
                        not,
                        hedge,
                    },
                    first.text,
                ));
                rest = &rest[cur + 1..];
            },
            Lexeme::OutputVariable(_) => return Err(ParseError::NotAnInputVariable(first.text.to_owned())),
            Lexeme::Keyword(keyword @ (Keyword::And | Keyword::Or | Keyword::Open | Keyword::Close)) => {
                items.push(Item::Keyword(*keyword, first.text));
                rest = &rest[1..];
            },
            _ => return Err(ParseError::MisplacedLexeme(first.text.to_owned())),
        }
    }

    Ok(items)
}

fn resolve_input_term<O, V>(token: &Token<'_, '_, O, V>, variable: VariableKey) -> Option<TermKey> {
    let Lexeme::Term(candidates) = token.lexeme else {
        return None;
    };

    candidates.iter().find_map(|candidate| match candidate {
        Candidate::Input(owner, term) if *owner == variable => Some(*term),
        _ => None,
    })
}

fn resolve_output_value<O: Copy + Eq, V: Copy>(token: &Token<'_, '_, O, V>, variable: O) -> Option<V> {
    let Lexeme::Term(candidates) = token.lexeme else {
        return None;
    };

    candidates.iter().find_map(|candidate| match candidate {
        Candidate::Output(owner, value) if *owner == variable => Some(*value),
        _ => None,
    })
}

/// Deepest level of open parentheses reached while scanning `items`
fn nesting_depth(items: &[Item<'_>]) -> usize {
    let mut depth = 0usize;
    let mut deepest = 0;

    for item in items {
        if item.is(Keyword::Open) {
            depth += 1;
            deepest = deepest.max(depth);
        } else if item.is(Keyword::Close) {
            depth = depth.saturating_sub(1);
        }
    }

    deepest
}

/// Index of the parenthesis closing the one at `items[0]`
fn find_pair_bracket(items: &[Item<'_>]) -> Option<usize> {
    let mut opened = 0usize;

    for (i, item) in items.iter().enumerate() {
        if item.is(Keyword::Open) {
            opened += 1;
        } else if item.is(Keyword::Close) {
            opened = opened.checked_sub(1)?;

            if opened == 0 {
                return Some(i);
            }
        }
    }

    None
}

/// Builds the condition tree of `items`. Recurses once per nesting level,
/// which `MAX_NESTING` bounds.
fn parse_conditions(items: &[Item<'_>]) -> Result<Condition, ParseError> {
    let mut items = items;

    // Remove extra brackets
    while items.first().is_some_and(|first| first.is(Keyword::Open))
        && find_pair_bracket(items) == Some(items.len() - 1)
    {
        items = &items[1..items.len() - 1];
    }

    if items.is_empty() {
        return Err(ParseError::EmptyCondition);
    }

    if let [Item::Condition(single, _)] = items {
        return Ok(Condition::Single(*single));
    }

    // One nesting level of conditions linked by and/or
    let mut children = Vec::new();
    let mut op = None;
    let mut rest = items;

    while let Some(first) = rest.first() {
        let child = match first {
            Item::Keyword(Keyword::Open, _) => {
                let close = find_pair_bracket(rest).ok_or(ParseError::UnbalancedParenthesis)?;
                let child = parse_conditions(&rest[1..close])?;

                rest = &rest[close + 1..];
                child
            },
            Item::Condition(single, _) => {
                rest = &rest[1..];
                Condition::Single(*single)
            },
            Item::Keyword(Keyword::Close, _) => return Err(ParseError::UnbalancedParenthesis),
            Item::Keyword(_, text) => return Err(ParseError::MisplacedLexeme((*text).to_owned())),
        };

        children.push(child);

        let Some(next) = rest.first() else {
            break;
        };
        let new_op = match next {
            Item::Keyword(Keyword::And, _) => Operator::And,
            Item::Keyword(Keyword::Or, _) => Operator::Or,
            Item::Keyword(Keyword::Close, _) => return Err(ParseError::UnbalancedParenthesis),
            _ => {
                return Err(ParseError::UnexpectedSequence(
                    first.text().to_owned(),
                    next.text().to_owned(),
                ))
            },
        };

        if rest.len() < 2 {
            return Err(ParseError::DanglingOperator(next.text().to_owned()));
        }

        match op {
            Some(op) if op != new_op => return Err(ParseError::MixedOperators),
            _ => op = Some(new_op),
        }

        rest = &rest[1..];
    }

    Combination::new(op.unwrap_or(Operator::And), children)
        .map(Condition::Combination)
        .map_err(|_| ParseError::EmptyCondition)
}

fn parse_conclusion<O: Copy + Eq, V: Copy>(tokens: &[Token<'_, '_, O, V>]) -> Result<Conclusion<O, V>, ParseError> {
    let mut tokens = tokens;

    // Remove extra brackets
    while tokens.len() >= 2 && tokens[0].is(Keyword::Open) && tokens[tokens.len() - 1].is(Keyword::Close) {
        tokens = &tokens[1..tokens.len() - 1];
    }

    let [var_token, is_token, value_token] = tokens else {
        return Err(ParseError::MalformedConclusion);
    };

    let variable = match var_token.lexeme {
        Lexeme::OutputVariable(variable) => *variable,
        Lexeme::InputVariable(_) => return Err(ParseError::NotAnOutputVariable(var_token.text.to_owned())),
        _ => return Err(ParseError::MalformedConclusion),
    };

    if !is_token.is(Keyword::Is) {
        return Err(ParseError::MalformedConclusion);
    }

    let value = resolve_output_value(value_token, variable)
        .ok_or_else(|| ParseError::TermMismatch(value_token.text.to_owned(), var_token.text.to_owned()))?;

    Ok(Conclusion { variable, value })
}
