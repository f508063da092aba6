// SPDX-License-Identifier: MIT

//! Query text parser
//!
//! Parses the canonical text produced by rendering:
//! - `"Field" operator "value"`
//! - `submitted by me`
//! - `a and b`, `a or b`, `not a`, `(a)`
//!
//! Keywords ignore case. Literals use double or single quotes with `\` as
//! the escape character.

use once_cell::sync::Lazy;

use super::operator::{Comparison, Operator};
use super::{
    Criteria, DateCriteria, NumberCriteria, ProjectCriteria, StatusCriteria,
    SubmittedByMeCriteria, TextCriteria,
};
use crate::error::{CriteriaError, Result};
use crate::model::Field;

/// Operator phrases split into words, longest first
static OPERATOR_PHRASES: Lazy<Vec<(Vec<&'static str>, Operator)>> = Lazy::new(|| {
    let mut phrases: Vec<(Vec<&'static str>, Operator)> = Comparison::ALL
        .into_iter()
        .flat_map(|c| [Operator::natural(c), Operator::negated_of(c)])
        .map(|op| (op.keyword().split(' ').collect(), op))
        .collect();
    phrases.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    phrases
});

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Quoted(String),
    /// Bare word, lower-cased
    Word(String),
    Open,
    Close,
}

#[derive(Debug, Clone)]
struct Lexed {
    token: Token,
    offset: usize,
}

fn tokenize(input: &str) -> Result<Vec<Lexed>> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(offset, ch)) = chars.peek() {
        if ch.is_whitespace() {
            chars.next();
            continue;
        }
        let token = match ch {
            '(' => {
                chars.next();
                Token::Open
            }
            ')' => {
                chars.next();
                Token::Close
            }
            '"' | '\'' => {
                chars.next();
                let mut value = String::new();
                let mut closed = false;
                while let Some((_, c)) = chars.next() {
                    if c == '\\' {
                        match chars.next() {
                            Some((_, escaped)) => value.push(escaped),
                            None => break,
                        }
                    } else if c == ch {
                        closed = true;
                        break;
                    } else {
                        value.push(c);
                    }
                }
                if !closed {
                    return Err(CriteriaError::syntax(offset, "unterminated quoted value"));
                }
                Token::Quoted(value)
            }
            _ => {
                let mut word = String::new();
                while let Some(&(_, c)) = chars.peek() {
                    if c.is_whitespace() || matches!(c, '(' | ')' | '"' | '\'') {
                        break;
                    }
                    word.push(c);
                    chars.next();
                }
                Token::Word(word.to_lowercase())
            }
        };
        tokens.push(Lexed { token, offset });
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Lexed>,
    pos: usize,
    end: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    fn offset(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map(|t| t.offset)
            .unwrap_or(self.end)
    }

    fn error(&self, message: impl Into<String>) -> CriteriaError {
        CriteriaError::syntax(self.offset(), message)
    }

    fn is_word_at(&self, index: usize, word: &str) -> bool {
        matches!(self.tokens.get(index), Some(Lexed { token: Token::Word(w), .. }) if w == word)
    }

    fn eat_word(&mut self, word: &str) -> bool {
        if self.is_word_at(self.pos, word) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect_word(&mut self, word: &str) -> Result<()> {
        if self.eat_word(word) {
            Ok(())
        } else {
            Err(self.error(format!("expected '{}'", word)))
        }
    }

    fn expect_quoted(&mut self) -> Result<String> {
        match self.peek() {
            Some(Token::Quoted(value)) => {
                let value = value.clone();
                self.pos += 1;
                Ok(value)
            }
            _ => Err(self.error("expected a quoted value")),
        }
    }

    fn parse_or(&mut self) -> Result<Criteria> {
        let mut left = self.parse_and()?;
        while self.eat_word("or") {
            let right = self.parse_and()?;
            left = Criteria::or(left, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Criteria> {
        let mut left = self.parse_unary()?;
        while self.eat_word("and") {
            let right = self.parse_unary()?;
            left = Criteria::and(left, right);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Criteria> {
        if self.eat_word("not") {
            return Ok(Criteria::not(self.parse_unary()?));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Criteria> {
        match self.peek().cloned() {
            Some(Token::Open) => {
                self.pos += 1;
                let inner = self.parse_or()?;
                match self.peek() {
                    Some(Token::Close) => {
                        self.pos += 1;
                        Ok(Criteria::group(inner))
                    }
                    _ => Err(self.error("expected ')'")),
                }
            }
            Some(Token::Word(w)) if w == "submitted" => {
                self.pos += 1;
                self.expect_word("by")?;
                self.expect_word("me")?;
                Ok(SubmittedByMeCriteria.into())
            }
            Some(Token::Quoted(name)) => {
                self.pos += 1;
                let field = Field::from_name(&name).ok_or(CriteriaError::UnknownField(name))?;
                let operator = self.parse_operator()?;
                let operand = self.expect_quoted()?;
                build_leaf(field, &operand, operator)
            }
            _ => Err(self.error("expected criteria")),
        }
    }

    fn parse_operator(&mut self) -> Result<Operator> {
        for (words, operator) in OPERATOR_PHRASES.iter() {
            let matched = words
                .iter()
                .enumerate()
                .all(|(i, word)| self.is_word_at(self.pos + i, word));
            if matched {
                self.pos += words.len();
                return Ok(*operator);
            }
        }
        Err(self.error("expected operator"))
    }
}

fn build_leaf(field: Field, operand: &str, operator: Operator) -> Result<Criteria> {
    let leaf: Criteria = match field {
        Field::Project => ProjectCriteria::new(operand, operator)?.into(),
        Field::Number => NumberCriteria::parse(operand, operator)?.into(),
        Field::Status => StatusCriteria::parse(operand, operator)?.into(),
        Field::SubmitDate => DateCriteria::parse(operand, operator)?.into(),
        Field::Job | Field::Version | Field::Branch | Field::Tag | Field::Submitter => {
            TextCriteria::new(field, operand, operator)?.into()
        }
    };
    Ok(leaf)
}

/// Parse query text into a criteria tree
pub fn parse(input: &str) -> Result<Criteria> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(CriteriaError::syntax(0, "empty query"));
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        end: input.len(),
    };
    let criteria = parser.parse_or()?;
    if parser.pos < parser.tokens.len() {
        return Err(parser.error("unexpected trailing input"));
    }

    log::debug!("Parsed query '{}' as {:?}", input, criteria);
    Ok(criteria)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    fn text(field: Field, pattern: &str, op: Operator) -> Criteria {
        TextCriteria::new(field, pattern, op).unwrap().into()
    }

    #[test]
    fn test_parse_simple_equality() {
        let c = parse(r#""Version" is "*1.0*""#).unwrap();
        assert_eq!(c, text(Field::Version, "*1.0*", Operator::IS));
    }

    #[test]
    fn test_parse_negated_operators() {
        assert_eq!(
            parse(r#""Version" IS NOT "1.0""#).unwrap(),
            text(Field::Version, "1.0", Operator::IS_NOT)
        );
        assert_eq!(
            parse(r#""Job" does not contain "deploy""#).unwrap(),
            text(Field::Job, "deploy", Operator::DOES_NOT_CONTAIN)
        );
        assert_eq!(
            parse(r#""Number" is not greater than "5""#).unwrap(),
            Criteria::from(
                NumberCriteria::new(5, Operator::negated_of(Comparison::GreaterThan)).unwrap()
            )
        );
    }

    #[test]
    fn test_parse_single_quotes_and_escapes() {
        assert_eq!(
            parse(r#"'Tag' is 'say \'hi\''"#).unwrap(),
            text(Field::Tag, "say 'hi'", Operator::IS)
        );
        assert_eq!(
            parse(r#""Tag" is "a\\b""#).unwrap(),
            text(Field::Tag, r"a\b", Operator::IS)
        );
    }

    #[test]
    fn test_parse_precedence() {
        let c = parse(r#""Job" is "a" or "Job" is "b" and not "Job" is "c""#).unwrap();
        let expected = Criteria::or(
            text(Field::Job, "a", Operator::IS),
            Criteria::and(
                text(Field::Job, "b", Operator::IS),
                Criteria::not(text(Field::Job, "c", Operator::IS)),
            ),
        );
        assert_eq!(c, expected);
    }

    #[test]
    fn test_parse_left_associative() {
        let c = parse(r#""Job" is "a" and "Job" is "b" and "Job" is "c""#).unwrap();
        match c {
            Criteria::And(left, _) => assert!(matches!(left.as_ref(), Criteria::And(..))),
            other => panic!("Expected And, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_group_and_submitted_by_me() {
        let c = parse(r#"not (submitted by me or "Status" is "failed")"#).unwrap();
        let expected = Criteria::not(Criteria::group(Criteria::or(
            SubmittedByMeCriteria.into(),
            StatusCriteria::parse("Failed", Operator::IS).unwrap().into(),
        )));
        assert_eq!(c, expected);
        assert_eq!(
            c.to_string(),
            r#"not (submitted by me or "Status" is "Failed")"#
        );
    }

    #[test]
    fn test_parse_project_and_date() {
        let c = parse(r#""project" is "team/**" and "Submit Date" is after "2024-01-01""#).unwrap();
        assert_eq!(
            c.to_string(),
            r#""Project" is "team/**" and "Submit Date" is after "2024-01-01""#
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse(""), Err(CriteriaError::Syntax { position: 0, .. })));
        assert!(matches!(
            parse(r#""Version" is "1.0"#),
            Err(CriteriaError::Syntax { position: 13, .. })
        ));
        assert!(matches!(
            parse(r#""Commit" is "abc""#),
            Err(CriteriaError::UnknownField(name)) if name == "Commit"
        ));
        assert!(matches!(
            parse(r#""Version" equals "1.0""#),
            Err(CriteriaError::Syntax { position: 10, .. })
        ));
        assert!(matches!(
            parse(r#"("Version" is "1.0""#),
            Err(CriteriaError::Syntax { .. })
        ));
        assert!(matches!(
            parse(r#""Version" is "1.0" "Job""#),
            Err(CriteriaError::Syntax { position: 19, .. })
        ));
    }

    #[test]
    fn test_parse_validation_errors() {
        assert!(matches!(
            parse(r#""Version" is """#),
            Err(CriteriaError::Validation(ValidationError::EmptyOperand { .. }))
        ));
        assert!(matches!(
            parse(r#""Status" contains "Failed""#),
            Err(CriteriaError::Validation(ValidationError::UnsupportedOperator { .. }))
        ));
    }

    #[test]
    fn test_project_operand_whitespace_is_trimmed() {
        let c = parse(r#""Project" is "/ team""#).unwrap();
        assert_eq!(c.to_string(), r#""Project" is "team""#);
        assert_eq!(parse(&c.to_string()).unwrap(), c);
    }

    #[test]
    fn test_render_reparse_is_stable() {
        let inputs = [
            r#""Version" is not "*1.0*""#,
            r#"("Job" is "a" or "Job" is "b") and not "Branch" contains "x""#,
            r#"not not submitted by me"#,
            r#"(("Tag" is "v\"1\""))"#,
            r##""Number" is "#7" or "Status" is "timed out""##,
            r#""Project" is "/ team" or "Project" is " a / b* /""#,
        ];
        for input in inputs {
            let first = parse(input).unwrap();
            let rendered = first.to_string();
            let second = parse(&rendered).unwrap();
            assert_eq!(second.to_string(), rendered, "input {}", input);
            assert_eq!(second, first, "input {}", input);
        }
    }
}
