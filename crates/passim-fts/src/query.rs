//! Web-search style query parsing and compilation.
//!
//! Query strings follow the conventions of a web search box:
//!
//! - whitespace-separated words are ANDed together
//! - `"quoted words"` form a phrase
//! - `OR` (any case) between two clauses makes them alternatives and binds
//!   tighter than the implicit AND
//! - `-word`, `-"a phrase"` and `NOT word` negate a clause
//! - an explicit `AND` is accepted and ignored
//!
//! Parsing never fails. Unbalanced quotes close at end of input, dangling
//! operators are dropped, and parentheses are treated as separators.
//!
//! A parsed [`QueryNode`] is compiled against a language into a
//! [`CompiledQuery`] over lexemes, which the index store turns into a
//! tantivy query over one body field.

use std::collections::BTreeSet;

use tantivy::Term;
use tantivy::query::{
    BooleanQuery, ConstScoreQuery, EmptyQuery, Occur, PhraseQuery, Query, TermQuery,
};
use tantivy::schema::{Field, IndexRecordOption};

use crate::analyzer::Analyzer;

// ============================================================================
// Parse tree
// ============================================================================

/// A parsed, not yet analyzed, query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryNode {
    /// A single word as typed.
    Term(String),
    /// A quoted phrase as typed.
    Phrase(String),
    /// Negation.
    Not(Box<QueryNode>),
    /// All children must match.
    And(Vec<QueryNode>),
    /// Any child may match.
    Or(Vec<QueryNode>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Lex {
    Word { text: String, negated: bool },
    Quoted { text: String, negated: bool },
    Or,
    And,
    Not,
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || matches!(c, '(' | ')')
}

fn lex(input: &str) -> Vec<Lex> {
    let mut out = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        if is_separator(c) {
            chars.next();
            continue;
        }

        let mut negated = false;
        if c == '-' {
            chars.next();
            negated = true;
            match chars.peek() {
                Some(&next) if !is_separator(next) && next != '-' => {}
                _ => continue,
            }
        }

        if chars.peek() == Some(&'"') {
            chars.next();
            let mut text = String::new();
            for ch in chars.by_ref() {
                if ch == '"' {
                    break;
                }
                text.push(ch);
            }
            out.push(Lex::Quoted { text, negated });
            continue;
        }

        let mut text = String::new();
        while let Some(&ch) = chars.peek() {
            if is_separator(ch) || ch == '"' {
                break;
            }
            text.push(ch);
            chars.next();
        }

        let lexed = if negated {
            Lex::Word { text, negated }
        } else if text.eq_ignore_ascii_case("or") {
            Lex::Or
        } else if text == "AND" {
            Lex::And
        } else if text == "NOT" {
            Lex::Not
        } else {
            Lex::Word { text, negated }
        };
        out.push(lexed);
    }
    out
}

/// Parses a query string. Returns `None` when nothing searchable remains.
pub fn parse(input: &str) -> Option<QueryNode> {
    let mut groups: Vec<Vec<QueryNode>> = Vec::new();
    let mut pending_or = false;
    let mut pending_not = false;

    for item in lex(input) {
        let (node, negated) = match item {
            Lex::Or => {
                pending_or = !groups.is_empty();
                continue;
            }
            Lex::And => continue,
            Lex::Not => {
                pending_not = true;
                continue;
            }
            Lex::Word { text, negated } => (QueryNode::Term(text), negated),
            Lex::Quoted { text, negated } => (QueryNode::Phrase(text), negated),
        };

        let node = if negated != pending_not {
            QueryNode::Not(Box::new(node))
        } else {
            node
        };
        pending_not = false;

        match groups.last_mut() {
            Some(group) if pending_or => group.push(node),
            _ => groups.push(vec![node]),
        }
        pending_or = false;
    }

    let mut clauses: Vec<QueryNode> = groups
        .into_iter()
        .map(|mut group| {
            if group.len() == 1 {
                group.remove(0)
            } else {
                QueryNode::Or(group)
            }
        })
        .collect();

    match clauses.len() {
        0 => None,
        1 => clauses.pop(),
        _ => Some(QueryNode::And(clauses)),
    }
}

impl QueryNode {
    /// Analyzes every term under `analyzer`.
    ///
    /// Terms that analyze to several lexemes become phrases; terms that
    /// analyze to nothing (stop words, punctuation) are dropped. Returns
    /// `None` when nothing remains.
    pub fn compile(&self, analyzer: &Analyzer) -> Option<CompiledQuery> {
        match self {
            Self::Term(text) | Self::Phrase(text) => {
                let tokens = analyzer.tokens(text);
                let first = tokens.first()?.position;
                if tokens.len() == 1 {
                    return tokens.into_iter().next().map(|t| CompiledQuery::Lexeme(t.lexeme));
                }
                Some(CompiledQuery::Phrase(
                    tokens
                        .into_iter()
                        .map(|t| (t.lexeme, t.position - first))
                        .collect(),
                ))
            }
            Self::Not(inner) => inner
                .compile(analyzer)
                .map(|q| CompiledQuery::Not(Box::new(q))),
            Self::And(children) => {
                collapse(children.iter().filter_map(|c| c.compile(analyzer)), CompiledQuery::And)
            }
            Self::Or(children) => {
                collapse(children.iter().filter_map(|c| c.compile(analyzer)), CompiledQuery::Or)
            }
        }
    }
}

fn collapse(
    children: impl Iterator<Item = CompiledQuery>,
    wrap: fn(Vec<CompiledQuery>) -> CompiledQuery,
) -> Option<CompiledQuery> {
    let mut children: Vec<CompiledQuery> = children.collect();
    match children.len() {
        0 => None,
        1 => children.pop(),
        _ => Some(wrap(children)),
    }
}

/// Parses and compiles in one step.
pub fn compile(input: &str, analyzer: &Analyzer) -> Option<CompiledQuery> {
    parse(input)?.compile(analyzer)
}

// ============================================================================
// Compiled query
// ============================================================================

/// A query over lexemes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompiledQuery {
    /// A single lexeme.
    Lexeme(String),
    /// Lexemes at fixed offsets from the first one.
    Phrase(Vec<(String, u32)>),
    /// Negation.
    Not(Box<CompiledQuery>),
    /// All children must match.
    And(Vec<CompiledQuery>),
    /// Any child may match.
    Or(Vec<CompiledQuery>),
}

impl CompiledQuery {
    /// Lexemes that appear outside any negation. Used for highlighting.
    pub fn positive_lexemes(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        self.collect_positive(&mut out);
        out
    }

    fn collect_positive(&self, out: &mut BTreeSet<String>) {
        match self {
            Self::Lexeme(lexeme) => {
                out.insert(lexeme.clone());
            }
            Self::Phrase(phrase) => {
                out.extend(phrase.iter().map(|(lexeme, _)| lexeme.clone()));
            }
            Self::Not(_) => {}
            Self::And(children) | Self::Or(children) => {
                for child in children {
                    child.collect_positive(out);
                }
            }
        }
    }

    /// Builds the tantivy query over `field`.
    ///
    /// Negations select from the documents matching `scope`, which scores
    /// zero, so a query with no positive clause still ranks every document
    /// of the scope at 0.0 rather than matching nothing.
    pub fn to_tantivy(&self, field: Field, scope: &Term) -> Box<dyn Query> {
        match self {
            Self::Lexeme(lexeme) => term_query(field, lexeme),
            Self::Phrase(phrase) => match phrase.as_slice() {
                [] => Box::new(EmptyQuery),
                [(lexeme, _)] => term_query(field, lexeme),
                _ => Box::new(PhraseQuery::new_with_offset(
                    phrase
                        .iter()
                        .map(|(lexeme, offset)| {
                            (*offset as usize, Term::from_field_text(field, lexeme))
                        })
                        .collect(),
                )),
            },
            Self::Not(_) => conjunction(std::slice::from_ref(self), field, scope),
            Self::And(children) => conjunction(children, field, scope),
            Self::Or(children) => Box::new(BooleanQuery::new(
                children
                    .iter()
                    .map(|child| (Occur::Should, child.to_tantivy(field, scope)))
                    .collect(),
            )),
        }
    }
}

fn term_query(field: Field, lexeme: &str) -> Box<dyn Query> {
    Box::new(TermQuery::new(
        Term::from_field_text(field, lexeme),
        IndexRecordOption::WithFreqs,
    ))
}

/// `Must` for positive children, `MustNot` for negated ones. Without a
/// positive child the zero-scored scope supplies the candidates.
fn conjunction(children: &[CompiledQuery], field: Field, scope: &Term) -> Box<dyn Query> {
    let mut clauses: Vec<(Occur, Box<dyn Query>)> = children
        .iter()
        .map(|child| match child {
            CompiledQuery::Not(inner) => (Occur::MustNot, inner.to_tantivy(field, scope)),
            _ => (Occur::Must, child.to_tantivy(field, scope)),
        })
        .collect();
    if !clauses.iter().any(|(occur, _)| *occur == Occur::Must) {
        let everything = TermQuery::new(scope.clone(), IndexRecordOption::Basic);
        clauses.push((
            Occur::Must,
            Box::new(ConstScoreQuery::new(Box::new(everything), 0.0)),
        ));
    }
    Box::new(BooleanQuery::new(clauses))
}

// ============================================================================
// Tests
// ============================================================================
