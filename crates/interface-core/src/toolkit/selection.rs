//! Atom selection expressions and their two textual dialects.
//!
//! A [`Selection`] is an immutable expression tree over atom, group and chain predicates.
//! It is resolved against a concrete structure by a provider, which turns it into a per-atom
//! mask. Two dialects share one tokenizer and one recursive-descent grammar
//! (`not` binds tighter than `and`, which binds tighter than `or`; parentheses group):
//!
//! - [`SelectionSyntax::Comparison`]: `chain_id=="A" and atom_name==["CA","CB"]`,
//!   `group_index!=3`, `element=="C"`.
//! - [`SelectionSyntax::Keyword`]: `chain A and name CA CB`, `resid 10 to 20`,
//!   `not element H`.

use super::error::ToolkitError;
use crate::core::models::system::MolecularSystem;
use crate::core::utils::identifiers::normalize_element;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionSyntax {
    #[default]
    Comparison,
    Keyword,
}

impl fmt::Display for SelectionSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionSyntax::Comparison => write!(f, "comparison"),
            SelectionSyntax::Keyword => write!(f, "keyword"),
        }
    }
}

impl FromStr for SelectionSyntax {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "comparison" => Ok(SelectionSyntax::Comparison),
            "keyword" => Ok(SelectionSyntax::Keyword),
            _ => Err(format!(
                "unknown selection syntax '{}' (expected comparison or keyword)",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Selection {
    #[default]
    All,
    None,
    AtomIndices(Vec<usize>),
    AtomNames(Vec<String>),
    Elements(Vec<String>),
    GroupIndices(Vec<usize>),
    GroupNames(Vec<String>),
    GroupIds(Vec<isize>),
    ChainIds(Vec<char>),
    ChainIndices(Vec<usize>),
    Not(Box<Selection>),
    And(Box<Selection>, Box<Selection>),
    Or(Box<Selection>, Box<Selection>),
}

impl Selection {
    pub fn parse(text: &str, syntax: SelectionSyntax) -> Result<Self, ToolkitError> {
        let tokens = tokenize(text)?;
        let mut parser = Parser {
            text,
            tokens,
            pos: 0,
            syntax,
        };
        let selection = parser.parse_or()?;
        if let Some(token) = parser.peek() {
            return Err(parser.error(token.position, "unexpected trailing input"));
        }
        Ok(selection)
    }

    pub fn atoms(indices: impl IntoIterator<Item = usize>) -> Self {
        Selection::AtomIndices(indices.into_iter().collect())
    }

    pub fn groups(indices: impl IntoIterator<Item = usize>) -> Self {
        Selection::GroupIndices(indices.into_iter().collect())
    }

    pub fn and(self, other: Selection) -> Self {
        Selection::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: Selection) -> Self {
        Selection::Or(Box::new(self), Box::new(other))
    }

    pub fn negate(self) -> Self {
        Selection::Not(Box::new(self))
    }

    /// Evaluates this selection to one flag per atom of `system`.
    pub(crate) fn atom_mask(&self, system: &MolecularSystem) -> Result<Vec<bool>, ToolkitError> {
        let atoms = system.atoms();
        let residues = system.residues();
        let chains = system.chains();

        let mask = match self {
            Selection::All => vec![true; atoms.len()],
            Selection::None => vec![false; atoms.len()],
            Selection::AtomIndices(indices) => {
                let set = checked_index_set(indices, atoms.len(), "Atom")?;
                (0..atoms.len()).map(|i| set.contains(&i)).collect()
            }
            Selection::AtomNames(names) => {
                let set: HashSet<&str> = names.iter().map(String::as_str).collect();
                atoms.iter().map(|a| set.contains(a.name.as_str())).collect()
            }
            Selection::Elements(elements) => {
                let set: HashSet<String> = elements.iter().map(|e| normalize_element(e)).collect();
                atoms.iter().map(|a| set.contains(&a.element)).collect()
            }
            Selection::GroupIndices(indices) => {
                let set = checked_index_set(indices, residues.len(), "Group")?;
                atoms
                    .iter()
                    .map(|a| set.contains(&a.residue_index))
                    .collect()
            }
            Selection::GroupNames(names) => {
                let set: HashSet<&str> = names.iter().map(String::as_str).collect();
                atoms
                    .iter()
                    .map(|a| set.contains(residues[a.residue_index].name.as_str()))
                    .collect()
            }
            Selection::GroupIds(ids) => {
                let set: HashSet<isize> = ids.iter().copied().collect();
                atoms
                    .iter()
                    .map(|a| set.contains(&residues[a.residue_index].id))
                    .collect()
            }
            Selection::ChainIds(ids) => {
                let set: HashSet<char> = ids.iter().copied().collect();
                atoms
                    .iter()
                    .map(|a| set.contains(&chains[a.chain_index].id))
                    .collect()
            }
            Selection::ChainIndices(indices) => {
                let set = checked_index_set(indices, chains.len(), "Chain")?;
                atoms.iter().map(|a| set.contains(&a.chain_index)).collect()
            }
            Selection::Not(inner) => inner.atom_mask(system)?.into_iter().map(|m| !m).collect(),
            Selection::And(lhs, rhs) => lhs
                .atom_mask(system)?
                .into_iter()
                .zip(rhs.atom_mask(system)?)
                .map(|(a, b)| a && b)
                .collect(),
            Selection::Or(lhs, rhs) => lhs
                .atom_mask(system)?
                .into_iter()
                .zip(rhs.atom_mask(system)?)
                .map(|(a, b)| a || b)
                .collect(),
        };
        Ok(mask)
    }
}

impl FromStr for Selection {
    type Err = ToolkitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Selection::parse(s, SelectionSyntax::Comparison)
    }
}

fn checked_index_set(
    indices: &[usize],
    len: usize,
    kind: &'static str,
) -> Result<HashSet<usize>, ToolkitError> {
    if let Some(&index) = indices.iter().find(|&&i| i >= len) {
        return Err(ToolkitError::IndexOutOfRange { kind, index, len });
    }
    Ok(indices.iter().copied().collect())
}

fn write_list<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    key: &str,
    values: &[T],
    quoted: bool,
) -> fmt::Result {
    let render = |v: &T| {
        if quoted {
            format!("\"{}\"", v)
        } else {
            v.to_string()
        }
    };
    if values.len() == 1 {
        write!(f, "{}=={}", key, render(&values[0]))
    } else {
        let items: Vec<String> = values.iter().map(render).collect();
        write!(f, "{}==[{}]", key, items.join(","))
    }
}

/// Renders the selection in the comparison dialect.
impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => write!(f, "all"),
            Selection::None => write!(f, "none"),
            Selection::AtomIndices(v) => write_list(f, "atom_index", v, false),
            Selection::AtomNames(v) => write_list(f, "atom_name", v, true),
            Selection::Elements(v) => write_list(f, "element", v, true),
            Selection::GroupIndices(v) => write_list(f, "group_index", v, false),
            Selection::GroupNames(v) => write_list(f, "group_name", v, true),
            Selection::GroupIds(v) => write_list(f, "group_id", v, false),
            Selection::ChainIds(v) => write_list(f, "chain_id", v, true),
            Selection::ChainIndices(v) => write_list(f, "chain_index", v, false),
            Selection::Not(inner) => write!(f, "not ({})", inner),
            Selection::And(lhs, rhs) => write!(f, "({}) and ({})", lhs, rhs),
            Selection::Or(lhs, rhs) => write!(f, "({}) or ({})", lhs, rhs),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum TokenKind {
    Word(String),
    Quoted(String),
    Eq,
    Ne,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    position: usize,
}

const DELIMITERS: &str = "()[],=!\"'";

fn tokenize(text: &str) -> Result<Vec<Token>, ToolkitError> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();

    let error = |position: usize, message: &str| ToolkitError::SelectionParse {
        text: text.to_string(),
        position,
        message: message.to_string(),
    };

    while let Some(&(position, c)) = chars.peek() {
        let kind = match c {
            c if c.is_whitespace() => {
                chars.next();
                continue;
            }
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            ',' => TokenKind::Comma,
            '=' => {
                chars.next();
                if matches!(chars.peek(), Some(&(_, '='))) {
                    chars.next();
                }
                tokens.push(Token {
                    kind: TokenKind::Eq,
                    position,
                });
                continue;
            }
            '!' => {
                chars.next();
                match chars.next() {
                    Some((_, '=')) => {}
                    _ => return Err(error(position, "expected '!='")),
                }
                tokens.push(Token {
                    kind: TokenKind::Ne,
                    position,
                });
                continue;
            }
            '"' | '\'' => {
                chars.next();
                let mut value = String::new();
                let mut closed = false;
                for (_, ch) in chars.by_ref() {
                    if ch == c {
                        closed = true;
                        break;
                    }
                    value.push(ch);
                }
                if !closed {
                    return Err(error(position, "unterminated quoted value"));
                }
                tokens.push(Token {
                    kind: TokenKind::Quoted(value),
                    position,
                });
                continue;
            }
            _ => {
                let mut word = String::new();
                while let Some(&(_, ch)) = chars.peek() {
                    if ch.is_whitespace() || DELIMITERS.contains(ch) {
                        break;
                    }
                    word.push(ch);
                    chars.next();
                }
                tokens.push(Token {
                    kind: TokenKind::Word(word),
                    position,
                });
                continue;
            }
        };
        chars.next();
        tokens.push(Token { kind, position });
    }
    Ok(tokens)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    AtomIndex,
    AtomName,
    Element,
    GroupIndex,
    GroupName,
    GroupId,
    ChainId,
    ChainIndex,
}

impl Field {
    fn from_comparison_key(key: &str) -> Option<Field> {
        match key {
            "atom_index" => Some(Field::AtomIndex),
            "atom_name" => Some(Field::AtomName),
            "element" | "atom_element" => Some(Field::Element),
            "group_index" => Some(Field::GroupIndex),
            "group_name" => Some(Field::GroupName),
            "group_id" => Some(Field::GroupId),
            "chain_id" => Some(Field::ChainId),
            "chain_index" => Some(Field::ChainIndex),
            _ => None,
        }
    }

    fn from_keyword(key: &str) -> Option<Field> {
        match key.to_ascii_lowercase().as_str() {
            "index" => Some(Field::AtomIndex),
            "name" => Some(Field::AtomName),
            "element" => Some(Field::Element),
            "resindex" => Some(Field::GroupIndex),
            "resname" => Some(Field::GroupName),
            "resid" => Some(Field::GroupId),
            "chain" => Some(Field::ChainId),
            "chainindex" => Some(Field::ChainIndex),
            _ => None,
        }
    }

    fn is_numeric(self) -> bool {
        matches!(
            self,
            Field::AtomIndex | Field::GroupIndex | Field::GroupId | Field::ChainIndex
        )
    }
}

#[derive(Debug, Clone)]
enum Value {
    Text(String, usize),
    Range(i64, i64, usize),
}

const RESERVED_WORDS: [&str; 3] = ["and", "or", "not"];

struct Parser<'a> {
    text: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    syntax: SelectionSyntax,
}

impl Parser<'_> {
    fn error(&self, position: usize, message: impl Into<String>) -> ToolkitError {
        ToolkitError::SelectionParse {
            text: self.text.to_string(),
            position,
            message: message.into(),
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn end_position(&self) -> usize {
        self.text.len()
    }

    fn peek_word_is(&self, word: &str) -> bool {
        matches!(self.peek(), Some(Token { kind: TokenKind::Word(w), .. }) if w.eq_ignore_ascii_case(word))
    }

    fn parse_or(&mut self) -> Result<Selection, ToolkitError> {
        let mut lhs = self.parse_and()?;
        while self.peek_word_is("or") {
            self.advance();
            let rhs = self.parse_and()?;
            lhs = lhs.or(rhs);
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> Result<Selection, ToolkitError> {
        let mut lhs = self.parse_unary()?;
        while self.peek_word_is("and") {
            self.advance();
            let rhs = self.parse_unary()?;
            lhs = lhs.and(rhs);
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Selection, ToolkitError> {
        if self.peek_word_is("not") {
            self.advance();
            return Ok(self.parse_unary()?.negate());
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Selection, ToolkitError> {
        let Some(token) = self.advance() else {
            return Err(self.error(self.end_position(), "unexpected end of selection"));
        };
        match token.kind {
            TokenKind::LParen => {
                let inner = self.parse_or()?;
                match self.advance() {
                    Some(Token {
                        kind: TokenKind::RParen,
                        ..
                    }) => Ok(inner),
                    Some(other) => Err(self.error(other.position, "expected ')'")),
                    None => Err(self.error(self.end_position(), "missing closing ')'")),
                }
            }
            TokenKind::Word(word) if word.eq_ignore_ascii_case("all") => Ok(Selection::All),
            TokenKind::Word(word) if word.eq_ignore_ascii_case("none") => Ok(Selection::None),
            TokenKind::Word(word) => match self.syntax {
                SelectionSyntax::Comparison => self.parse_comparison(&word, token.position),
                SelectionSyntax::Keyword => self.parse_keyword(&word, token.position),
            },
            _ => Err(self.error(token.position, "expected a selection term")),
        }
    }

    fn parse_comparison(&mut self, key: &str, position: usize) -> Result<Selection, ToolkitError> {
        let field = Field::from_comparison_key(key)
            .ok_or_else(|| self.error(position, format!("unknown attribute '{}'", key)))?;

        let negated = match self.advance() {
            Some(Token {
                kind: TokenKind::Eq,
                ..
            }) => false,
            Some(Token {
                kind: TokenKind::Ne,
                ..
            }) => true,
            Some(other) => return Err(self.error(other.position, "expected '==' or '!='")),
            None => return Err(self.error(self.end_position(), "expected '==' or '!='")),
        };

        let mut values = Vec::new();
        if matches!(
            self.peek(),
            Some(Token {
                kind: TokenKind::LBracket,
                ..
            })
        ) {
            self.advance();
            loop {
                values.push(self.parse_value()?);
                match self.advance() {
                    Some(Token {
                        kind: TokenKind::Comma,
                        ..
                    }) => continue,
                    Some(Token {
                        kind: TokenKind::RBracket,
                        ..
                    }) => break,
                    Some(other) => return Err(self.error(other.position, "expected ',' or ']'")),
                    None => return Err(self.error(self.end_position(), "missing closing ']'")),
                }
            }
        } else {
            values.push(self.parse_value()?);
        }

        let leaf = self.build_leaf(field, values)?;
        Ok(if negated { leaf.negate() } else { leaf })
    }

    fn parse_value(&mut self) -> Result<Value, ToolkitError> {
        match self.advance() {
            Some(Token {
                kind: TokenKind::Word(w) | TokenKind::Quoted(w),
                position,
            }) => Ok(Value::Text(w, position)),
            Some(other) => Err(self.error(other.position, "expected a value")),
            None => Err(self.error(self.end_position(), "expected a value")),
        }
    }

    fn parse_keyword(&mut self, key: &str, position: usize) -> Result<Selection, ToolkitError> {
        let field = Field::from_keyword(key)
            .ok_or_else(|| self.error(position, format!("unknown keyword '{}'", key)))?;

        let mut values: Vec<Value> = Vec::new();
        while let Some(token) = self.peek().cloned() {
            let text = match &token.kind {
                TokenKind::Word(w)
                    if !RESERVED_WORDS.iter().any(|r| w.eq_ignore_ascii_case(r)) =>
                {
                    w.clone()
                }
                TokenKind::Quoted(w) => w.clone(),
                _ => break,
            };
            self.advance();

            if text.eq_ignore_ascii_case("to") && matches!(token.kind, TokenKind::Word(_)) {
                if !field.is_numeric() {
                    return Err(self.error(token.position, "ranges require a numeric keyword"));
                }
                let start = match values.pop() {
                    Some(Value::Text(start, start_pos)) => self.parse_i64(&start, start_pos)?,
                    _ => return Err(self.error(token.position, "'to' must follow a value")),
                };
                let (end_text, end_pos) = match self.parse_value()? {
                    Value::Text(t, p) => (t, p),
                    Value::Range(_, _, p) => {
                        return Err(self.error(p, "expected a range end"));
                    }
                };
                let end = self.parse_i64(&end_text, end_pos)?;
                if start > end {
                    return Err(self.error(token.position, "range start exceeds range end"));
                }
                values.push(Value::Range(start, end, token.position));
            } else {
                values.push(Value::Text(text, token.position));
            }
        }

        if values.is_empty() {
            let at = self.peek().map_or(self.end_position(), |t| t.position);
            return Err(self.error(at, format!("keyword '{}' requires at least one value", key)));
        }
        self.build_leaf(field, values)
    }

    fn parse_i64(&self, text: &str, position: usize) -> Result<i64, ToolkitError> {
        text.parse()
            .map_err(|_| self.error(position, format!("expected an integer, found '{}'", text)))
    }

    fn integers(&self, values: &[Value]) -> Result<Vec<i64>, ToolkitError> {
        let mut out = Vec::new();
        for value in values {
            match value {
                Value::Text(text, position) => out.push(self.parse_i64(text, *position)?),
                Value::Range(start, end, _) => out.extend(*start..=*end),
            }
        }
        Ok(out)
    }

    fn indices(&self, values: &[Value]) -> Result<Vec<usize>, ToolkitError> {
        let position = values.first().map_or(0, |v| match v {
            Value::Text(_, p) | Value::Range(_, _, p) => *p,
        });
        self.integers(values)?
            .into_iter()
            .map(|i| {
                usize::try_from(i)
                    .map_err(|_| self.error(position, format!("index {} must be non-negative", i)))
            })
            .collect()
    }

    fn texts(&self, values: Vec<Value>) -> Result<Vec<String>, ToolkitError> {
        values
            .into_iter()
            .map(|value| match value {
                Value::Text(text, _) => Ok(text),
                Value::Range(_, _, p) => Err(self.error(p, "ranges require a numeric keyword")),
            })
            .collect()
    }

    fn build_leaf(&self, field: Field, values: Vec<Value>) -> Result<Selection, ToolkitError> {
        Ok(match field {
            Field::AtomIndex => Selection::AtomIndices(self.indices(&values)?),
            Field::GroupIndex => Selection::GroupIndices(self.indices(&values)?),
            Field::ChainIndex => Selection::ChainIndices(self.indices(&values)?),
            Field::GroupId => Selection::GroupIds(
                self.integers(&values)?
                    .into_iter()
                    .map(|i| i as isize)
                    .collect(),
            ),
            Field::AtomName => Selection::AtomNames(self.texts(values)?),
            Field::Element => Selection::Elements(self.texts(values)?),
            Field::GroupName => Selection::GroupNames(self.texts(values)?),
            Field::ChainId => {
                let mut ids = Vec::with_capacity(values.len());
                for value in values {
                    match value {
                        Value::Text(text, position) => {
                            let mut chars = text.chars();
                            match (chars.next(), chars.next()) {
                                (Some(c), None) => ids.push(c),
                                _ => {
                                    return Err(self.error(
                                        position,
                                        format!("chain id must be one character, found '{}'", text),
                                    ));
                                }
                            }
                        }
                        Value::Range(_, _, p) => {
                            return Err(self.error(p, "ranges require a numeric keyword"));
                        }
                    }
                }
                Selection::ChainIds(ids)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::builder::MolecularSystemBuilder;
    use crate::core::models::chain::ChainType;
    use nalgebra::Point3;

    fn comparison(text: &str) -> Selection {
        Selection::parse(text, SelectionSyntax::Comparison).unwrap()
    }

    fn keyword(text: &str) -> Selection {
        Selection::parse(text, SelectionSyntax::Keyword).unwrap()
    }

    fn create_test_system() -> MolecularSystem {
        let mut builder = MolecularSystemBuilder::new();
        builder.start_chain('A', ChainType::Polymer);
        builder.start_residue(5, "ALA").unwrap();
        builder
            .add_atom(1, "N", Point3::new(0.0, 0.0, 0.0), 0.0, "N_R")
            .unwrap();
        builder
            .add_atom(2, "CA", Point3::new(1.5, 0.0, 0.0), 0.0, "C_3")
            .unwrap();
        builder
            .add_atom(3, "HA", Point3::new(1.5, 1.0, 0.0), 0.0, "H_")
            .unwrap();
        builder.start_residue(6, "GLY").unwrap();
        builder
            .add_atom(4, "CA", Point3::new(3.0, 0.0, 0.0), 0.0, "C_3")
            .unwrap();
        builder.start_chain('B', ChainType::Hetero);
        builder.start_residue(1, "LIG").unwrap();
        builder
            .add_atom(5, "O1", Point3::new(6.0, 0.0, 0.0), 0.0, "O_2")
            .unwrap();
        builder.build()
    }

    fn selected(selection: &Selection, system: &MolecularSystem) -> Vec<usize> {
        selection
            .atom_mask(system)
            .unwrap()
            .into_iter()
            .enumerate()
            .filter_map(|(i, m)| m.then_some(i))
            .collect()
    }

    #[test]
    fn both_dialects_produce_equivalent_trees() {
        assert_eq!(
            comparison("chain_id==\"A\" and atom_name==\"CA\""),
            keyword("chain A and name CA")
        );
        assert_eq!(
            comparison("group_name==[\"ALA\",\"GLY\"] or not element==\"H\""),
            keyword("resname ALA GLY or not element H")
        );
        assert_eq!(comparison("all"), keyword("all"));
    }

    #[test]
    fn precedence_is_not_then_and_then_or() {
        let parsed = comparison("atom_index==0 or atom_index==1 and not atom_index==2");
        let expected = Selection::atoms([0]).or(Selection::atoms([1]).and(Selection::atoms([2]).negate()));
        assert_eq!(parsed, expected);
    }

    #[test]
    fn parentheses_override_precedence() {
        let parsed = keyword("(index 0 or index 1) and chain A");
        let expected = Selection::atoms([0])
            .or(Selection::atoms([1]))
            .and(Selection::ChainIds(vec!['A']));
        assert_eq!(parsed, expected);
    }

    #[test]
    fn not_equal_comparison_negates_leaf() {
        assert_eq!(
            comparison("group_index!=3"),
            Selection::groups([3]).negate()
        );
    }

    #[test]
    fn keyword_ranges_expand_numeric_values() {
        assert_eq!(
            keyword("resid 3 to 5 8"),
            Selection::GroupIds(vec![3, 4, 5, 8])
        );
        assert_eq!(keyword("index 2 to 2"), Selection::atoms([2]));
    }

    #[test]
    fn single_equals_and_quotes_are_accepted() {
        assert_eq!(comparison("atom_name='CA'"), Selection::AtomNames(vec!["CA".into()]));
        assert_eq!(comparison("group_id==-2"), Selection::GroupIds(vec![-2]));
    }

    #[test]
    fn parse_errors_report_position() {
        let err = Selection::parse("atom_name==\"CA\" and", SelectionSyntax::Comparison)
            .unwrap_err();
        assert!(matches!(err, ToolkitError::SelectionParse { position: 19, .. }));

        let err = Selection::parse("residue_name==\"ALA\"", SelectionSyntax::Comparison)
            .unwrap_err();
        assert!(matches!(err, ToolkitError::SelectionParse { position: 0, .. }));

        let err = Selection::parse("chain AB", SelectionSyntax::Keyword).unwrap_err();
        assert!(matches!(err, ToolkitError::SelectionParse { position: 6, .. }));
    }

    #[test]
    fn parse_rejects_malformed_input() {
        for text in [
            "atom_name==\"CA",
            "(atom_index==1",
            "atom_index==[1,2",
            "atom_index 1",
            "atom_index==-1",
            "atom_index==1 atom_index==2",
            "",
        ] {
            assert!(
                Selection::parse(text, SelectionSyntax::Comparison).is_err(),
                "expected '{text}' to fail"
            );
        }
        for text in ["name", "name CA to CB", "resid 5 to 3", "to 5"] {
            assert!(
                Selection::parse(text, SelectionSyntax::Keyword).is_err(),
                "expected '{text}' to fail"
            );
        }
    }

    #[test]
    fn display_round_trips_through_comparison_dialect() {
        let original = keyword("(chain A and name CA CB) or not resid 1 to 2");
        let reparsed = comparison(&original.to_string());
        assert_eq!(original, reparsed);
    }

    #[test]
    fn atom_mask_evaluates_predicates() {
        let system = create_test_system();

        assert_eq!(selected(&comparison("atom_name==\"CA\""), &system), vec![1, 3]);
        assert_eq!(selected(&keyword("element h"), &system), vec![2]);
        assert_eq!(selected(&keyword("resid 6"), &system), vec![3]);
        assert_eq!(selected(&keyword("resindex 0"), &system), vec![0, 1, 2]);
        assert_eq!(selected(&keyword("chain B"), &system), vec![4]);
        assert_eq!(selected(&keyword("chainindex 0 and not name CA"), &system), vec![0, 2]);
        assert_eq!(selected(&keyword("resname LIG or index 0"), &system), vec![0, 4]);
        assert!(selected(&Selection::None, &system).is_empty());
        assert_eq!(selected(&Selection::All, &system).len(), 5);
    }

    #[test]
    fn atom_mask_rejects_out_of_range_indices() {
        let system = create_test_system();
        assert!(matches!(
            Selection::groups([7]).atom_mask(&system),
            Err(ToolkitError::IndexOutOfRange {
                kind: "Group",
                index: 7,
                len: 3
            })
        ));
        assert!(matches!(
            Selection::atoms([5]).atom_mask(&system),
            Err(ToolkitError::IndexOutOfRange { kind: "Atom", .. })
        ));
    }

    #[test]
    fn syntax_parses_from_text() {
        assert_eq!("Keyword".parse(), Ok(SelectionSyntax::Keyword));
        assert_eq!("comparison".parse(), Ok(SelectionSyntax::Comparison));
        assert!("molsysmt".parse::<SelectionSyntax>().is_err());
    }
}
