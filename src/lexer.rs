use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::condition::Hedge;
use crate::error::ParseError;
use crate::names::KEYWORDS;
use crate::parser::Vocabulary;
use crate::variable::{TermKey, VariableKey};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Keyword {
    If,
    Then,
    Is,
    And,
    Or,
    Not,
    Open,
    Close,
    Hedge(Hedge),
}

impl Keyword {
    fn parse(word: &str) -> Option<Self> {
        let keyword = match word {
            "if" => Self::If,
            "then" => Self::Then,
            "is" => Self::Is,
            "and" => Self::And,
            "or" => Self::Or,
            "not" => Self::Not,
            "(" => Self::Open,
            ")" => Self::Close,
            _ => Self::Hedge(Hedge::from_keyword(word)?),
        };

        Some(keyword)
    }
}

/// A term spelling resolved to the variable owning it
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Candidate<O, V> {
    Input(VariableKey, TermKey),
    Output(O, V),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Lexeme<O, V> {
    Keyword(Keyword),
    InputVariable(VariableKey),
    OutputVariable(O),
    /// Identically spelled terms of different variables, in declaration order
    Term(Vec<Candidate<O, V>>),
}

#[derive(Debug)]
pub(crate) struct Token<'r, 't, O, V> {
    pub(crate) text: &'r str,
    pub(crate) lexeme: &'t Lexeme<O, V>,
}

// Manual impls so that O and V need not be Clone themselves
impl<O, V> Clone for Token<'_, '_, O, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<O, V> Copy for Token<'_, '_, O, V> {}

impl<O, V> Token<'_, '_, O, V> {
    pub(crate) fn keyword(&self) -> Option<Keyword> {
        match self.lexeme {
            Lexeme::Keyword(keyword) => Some(*keyword),
            _ => None,
        }
    }

    pub(crate) fn is(&self, keyword: Keyword) -> bool {
        self.keyword() == Some(keyword)
    }
}

/// Every spelling the rule language understands for one system
#[derive(Debug)]
pub(crate) struct LexemeTable<'n, O, V>(HashMap<&'n str, Lexeme<O, V>>);

impl<'n, O: Copy, V: Copy> LexemeTable<'n, O, V> {
    pub(crate) fn build(
        inputs: &[Vocabulary<'n, VariableKey, TermKey>],
        outputs: &[Vocabulary<'n, O, V>],
    ) -> Result<Self, ParseError> {
        let mut table: HashMap<&'n str, Lexeme<O, V>> = HashMap::new();

        for word in KEYWORDS {
            let keyword = Keyword::parse(word).expect("every keyword parses");

            table.insert(word, Lexeme::Keyword(keyword));
        }

        for var in inputs {
            insert_variable(&mut table, var.name, Lexeme::InputVariable(var.key))?;

            for (name, term) in &var.values {
                insert_term(&mut table, *name, Candidate::Input(var.key, *term))?;
            }
        }

        for var in outputs {
            insert_variable(&mut table, var.name, Lexeme::OutputVariable(var.key))?;

            for (name, value) in &var.values {
                insert_term(&mut table, *name, Candidate::Output(var.key, *value))?;
            }
        }

        Ok(Self(table))
    }

    /// Splits a normalized rule on whitespace and resolves each word
    pub(crate) fn tokenize<'r>(&self, rule: &'r str) -> Result<Vec<Token<'r, '_, O, V>>, ParseError> {
        rule.split_whitespace()
            .map(|word| {
                self.0
                    .get(word)
                    .map(|lexeme| Token { text: word, lexeme })
                    .ok_or_else(|| ParseError::UnknownIdentifier(word.to_owned()))
            })
            .collect()
    }
}

fn insert_variable<'n, O, V>(
    table: &mut HashMap<&'n str, Lexeme<O, V>>,
    name: &'n str,
    lexeme: Lexeme<O, V>,
) -> Result<(), ParseError> {
    match table.entry(name) {
        Entry::Vacant(entry) => {
            entry.insert(lexeme);
            Ok(())
        },
        Entry::Occupied(_) => Err(ParseError::LexemeCollision(name.to_owned())),
    }
}

fn insert_term<'n, O, V>(
    table: &mut HashMap<&'n str, Lexeme<O, V>>,
    name: &'n str,
    candidate: Candidate<O, V>,
) -> Result<(), ParseError> {
    match table.entry(name) {
        Entry::Vacant(entry) => {
            entry.insert(Lexeme::Term(vec![candidate]));
            Ok(())
        },
        Entry::Occupied(mut entry) => match entry.get_mut() {
            Lexeme::Term(candidates) => {
                candidates.push(candidate);
                Ok(())
            },
            _ => Err(ParseError::LexemeCollision(name.to_owned())),
        },
    }
}

/// Surrounds parentheses with single spaces and collapses whitespace runs
pub(crate) fn normalize(rule: &str) -> String {
    let mut out = String::with_capacity(rule.len() * 2);

    for ch in rule.chars() {
        if ch == '(' || ch == ')' {
            if !out.ends_with(' ') {
                out.push(' ');
            }

            out.push(ch);
            out.push(' ');
        } else if ch.is_whitespace() {
            if !out.is_empty() && !out.ends_with(' ') {
                out.push(' ');
            }
        } else {
            out.push(ch);
        }
    }

    out.trim().to_owned()
}

#[cfg(test)]
mod tests {
    use slotmap::SlotMap;

    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(
            normalize("if (service is poor )  or (food is rancid) then tips is cheap"),
            "if ( service is poor ) or ( food is rancid ) then tips is cheap"
        );
        assert_eq!(normalize("if ((a is b))then\tc is d"), "if ( ( a is b ) ) then c is d");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn test_keywords() {
        assert_eq!(Keyword::parse("("), Some(Keyword::Open));
        assert_eq!(Keyword::parse("somewhat"), Some(Keyword::Hedge(Hedge::Somewhat)));
        assert_eq!(Keyword::parse("service"), None);
    }

    #[test]
    fn test_table() {
        let mut vars = SlotMap::<VariableKey, ()>::with_key();
        let mut terms = SlotMap::<TermKey, ()>::with_key();
        let (a, b, out) = (vars.insert(()), vars.insert(()), vars.insert(()));
        let (a_zero, b_zero, out_zero) = (terms.insert(()), terms.insert(()), terms.insert(()));
        let inputs = vec![
            Vocabulary {
                name: "A",
                key: a,
                values: vec![("zero", a_zero)],
            },
            Vocabulary {
                name: "B",
                key: b,
                values: vec![("zero", b_zero)],
            },
        ];
        let outputs = vec![Vocabulary {
            name: "C",
            key: out,
            values: vec![("zero", out_zero)],
        }];
        let table = LexemeTable::build(&inputs, &outputs).unwrap();
        let tokens = table.tokenize("if A is zero").unwrap();

        assert_eq!(tokens.len(), 4);
        assert!(tokens[0].is(Keyword::If));
        assert_eq!(tokens[1].lexeme, &Lexeme::InputVariable(a));
        assert_eq!(
            tokens[3].lexeme,
            &Lexeme::Term(vec![
                Candidate::Input(a, a_zero),
                Candidate::Input(b, b_zero),
                Candidate::Output(out, out_zero),
            ])
        );
        assert_eq!(
            table.tokenize("if A is one").unwrap_err(),
            ParseError::UnknownIdentifier("one".into())
        );
    }

    #[test]
    fn test_collisions() {
        let mut vars = SlotMap::<VariableKey, ()>::with_key();
        let mut terms = SlotMap::<TermKey, ()>::with_key();
        let (a, b) = (vars.insert(()), vars.insert(()));
        let term = terms.insert(());

        let same_variable_names = vec![
            Vocabulary {
                name: "A",
                key: a,
                values: Vec::new(),
            },
            Vocabulary {
                name: "A",
                key: b,
                values: Vec::new(),
            },
        ];

        assert_eq!(
            LexemeTable::<VariableKey, TermKey>::build(&same_variable_names, &[]).unwrap_err(),
            ParseError::LexemeCollision("A".into())
        );

        let term_named_like_variable = vec![
            Vocabulary {
                name: "A",
                key: a,
                values: Vec::new(),
            },
            Vocabulary {
                name: "B",
                key: b,
                values: vec![("A", term)],
            },
        ];

        assert_eq!(
            LexemeTable::<VariableKey, TermKey>::build(&term_named_like_variable, &[]).unwrap_err(),
            ParseError::LexemeCollision("A".into())
        );
    }
}
