//! Path expression parser.
//!
//! Accepts both the `$`-rooted query form (`$.server.port`, `$['a.b'][0]`)
//! and the bare property form used in configuration files
//! (`server.port`, `servers[0].host`, `items.*`).

use super::ast::{PathSegment, YamlPath};
use super::error::YamlPathError;

/// Parser for path expressions.
pub struct Parser {
    input: String,
    position: usize,
}

impl Parser {
    /// Creates a new parser for the given expression.
    pub fn new(query: &str) -> Self {
        Self {
            input: query.to_string(),
            position: 0,
        }
    }

    /// Parses the expression into a YamlPath.
    pub fn parse(query: &str) -> Result<YamlPath, YamlPathError> {
        let mut parser = Parser::new(query);
        parser.parse_path()
    }

    fn parse_path(&mut self) -> Result<YamlPath, YamlPathError> {
        let mut segments = Vec::new();

        self.skip_whitespace();
        if self.is_eof() {
            return Err(YamlPathError::UnexpectedEnd {
                expected: "path expression".to_string(),
            });
        }

        if self.peek() == Some('$') {
            self.next();
        } else {
            // Bare property form: the first key has no leading dot
            match self.peek() {
                Some('[') => {}
                Some('*') => {
                    self.next();
                    segments.push(PathSegment::Wildcard);
                }
                _ => segments.push(PathSegment::Key(self.parse_identifier()?)),
            }
        }

        loop {
            self.skip_whitespace();
            let pos = self.position;
            match self.peek() {
                None => break,
                Some('.') => {
                    self.next();
                    self.skip_whitespace();
                    if self.peek() == Some('*') {
                        self.next();
                        segments.push(PathSegment::Wildcard);
                    } else {
                        let name = self.parse_identifier()?;
                        segments.push(PathSegment::Key(name));
                    }
                }
                Some('[') => segments.push(self.parse_bracket_expression()?),
                Some(ch) => {
                    return Err(YamlPathError::UnexpectedToken {
                        position: pos,
                        found: ch.to_string(),
                        expected: "'.' or '['".to_string(),
                    })
                }
            }
        }

        Ok(YamlPath::new(segments))
    }

    /// Returns the current character without advancing.
    fn peek(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    /// Returns the next character and advances position.
    fn next(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += ch.len_utf8();
        Some(ch)
    }

    /// Skips whitespace characters.
    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.next();
            } else {
                break;
            }
        }
    }

    /// Checks if we've reached the end of input.
    fn is_eof(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Expects a specific character and advances, or returns an error.
    fn expect(&mut self, expected: char) -> Result<(), YamlPathError> {
        self.skip_whitespace();
        let pos = self.position;
        match self.next() {
            Some(ch) if ch == expected => Ok(()),
            Some(ch) => Err(YamlPathError::UnexpectedToken {
                position: pos,
                found: ch.to_string(),
                expected: format!("'{}'", expected),
            }),
            None => Err(YamlPathError::UnexpectedEnd {
                expected: format!("'{}'", expected),
            }),
        }
    }

    /// Parses an identifier (property name).
    fn parse_identifier(&mut self) -> Result<String, YamlPathError> {
        let mut name = String::new();
        while let Some(ch) = self.peek() {
            if ch.is_alphanumeric() || ch == '_' || ch == '-' {
                name.push(ch);
                self.next();
            } else {
                break;
            }
        }
        if name.is_empty() {
            match self.peek() {
                Some(ch) => Err(YamlPathError::UnexpectedToken {
                    position: self.position,
                    found: ch.to_string(),
                    expected: "identifier".to_string(),
                }),
                None => Err(YamlPathError::UnexpectedEnd {
                    expected: "identifier".to_string(),
                }),
            }
        } else {
            Ok(name)
        }
    }

    /// Parses bracket expression: [index], ['key'], [*]
    fn parse_bracket_expression(&mut self) -> Result<PathSegment, YamlPathError> {
        self.expect('[')?;
        self.skip_whitespace();

        let segment = match self.peek() {
            Some('*') => {
                self.next();
                PathSegment::Wildcard
            }
            Some(quote @ ('\'' | '"')) => {
                self.next();
                PathSegment::Key(self.parse_quoted(quote)?)
            }
            Some('-') | Some('0'..='9') => PathSegment::Index(self.parse_bracket_number()?),
            Some(_) => {
                return Err(YamlPathError::InvalidSyntax {
                    message: "Invalid bracket expression".to_string(),
                })
            }
            None => {
                return Err(YamlPathError::UnexpectedEnd {
                    expected: "index, quoted key or '*'".to_string(),
                })
            }
        };

        self.expect(']')?;
        Ok(segment)
    }

    /// Parses the rest of a quoted key; the opening quote is already consumed.
    fn parse_quoted(&mut self, quote: char) -> Result<String, YamlPathError> {
        let mut value = String::new();
        loop {
            match self.next() {
                Some(ch) if ch == quote => return Ok(value),
                Some('\\') => match self.next() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some('r') => value.push('\r'),
                    Some('\\') => value.push('\\'),
                    Some('\'') => value.push('\''),
                    Some('"') => value.push('"'),
                    Some(_) | None => {
                        return Err(YamlPathError::InvalidSyntax {
                            message: "Invalid escape sequence".to_string(),
                        })
                    }
                },
                Some(ch) => value.push(ch),
                None => {
                    return Err(YamlPathError::UnexpectedEnd {
                        expected: format!("closing quote '{}'", quote),
                    })
                }
            }
        }
    }

    /// Parses a number inside brackets
    fn parse_bracket_number(&mut self) -> Result<isize, YamlPathError> {
        let mut num = String::new();
        if self.peek() == Some('-') {
            num.push('-');
            self.next();
        }
        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                num.push(ch);
                self.next();
            } else {
                break;
            }
        }
        num.parse::<isize>()
            .map_err(|_| YamlPathError::InvalidSyntax {
                message: format!("Invalid number: {}", num),
            })
    }
}
