use crate::error_handling::*;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TokenKind {
    identifier, number, operator, punctuation
}

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub content: String,
    pub kind: TokenKind,
}

impl Token {
    fn new(content: String, kind: TokenKind) -> Self {
        Self{content, kind}
    }
}

fn is_operator(character: char) -> bool {
    match character {
        '+' | '-' | '*' | '/' | '%' | '^' | '!' => true,
        _ => false
    }
}

fn is_punctuation(character: char) -> bool {
    match character {
        '(' | ')' => true,
        _ => false
    }
}

// ascii only: characters like '²' are numeric but not part of a literal
fn starts_number(view: &str) -> bool {
    let bytes = view.as_bytes();
    match bytes.first() {
        Some(first) if first.is_ascii_digit() => true,
        Some(b'.') => bytes.get(1).map_or(false, u8::is_ascii_digit),
        _ => false,
    }
}

fn is_identifier_start(character: char) -> bool {
    character.is_ascii_alphabetic() || character == '_'
}

fn is_identifier_part(character: char) -> bool {
    character.is_ascii_alphanumeric() || character == '_'
}

pub struct StringScanner {
    string: String,
    token: Option<Token>,
    index: usize,
}

impl StringScanner {
    pub fn new(string: String) -> Result<Self> {
        let mut source = Self {
            string,
            token: None,
            index: 0,
        };
        source.advance()?;
        Ok(source)
    }

    // byte length of the matching prefix, so index stays on a char boundary
    fn count<P: Fn(char) -> bool>(&self, predicate: P) -> usize {
        let mut counter = 0;
        for c in self.string[self.index..].chars() {
            if !predicate(c) {
                break;
            }
            counter += c.len_utf8();
        }
        counter
    }

    fn view(&self) -> &str {
        &self.string[self.index..]
    }

    fn skip_whitespace(&mut self) {
        let count = self.count(char::is_whitespace);
        self.index += count;
    }

    // digits with optional fraction, then an optional exponent such as
    // 'e5' or 'E-3' when digits actually follow it
    fn get_number(&self) -> Token {
        let bytes = self.view().as_bytes();
        let mut length = 0;
        while length < bytes.len() && (bytes[length].is_ascii_digit() || bytes[length] == b'.') {
            length += 1;
        }

        if length < bytes.len() && (bytes[length] == b'e' || bytes[length] == b'E') {
            let mut cursor = length + 1;
            if cursor < bytes.len() && (bytes[cursor] == b'+' || bytes[cursor] == b'-') {
                cursor += 1;
            }
            if cursor < bytes.len() && bytes[cursor].is_ascii_digit() {
                while cursor < bytes.len() && bytes[cursor].is_ascii_digit() {
                    cursor += 1;
                }
                length = cursor;
            }
        }

        Token::new(self.view()[..length].into(), TokenKind::number)
    }

    fn get_identifier(&self) -> Token {
        let count = self.count(is_identifier_part);
        Token::new(self.string[self.index..(self.index + count)].into(), TokenKind::identifier)
    }

    // '**' and '//' are single tokens, everything else is one character
    fn get_operator(&self) -> Token {
        let view = self.view();
        if view.starts_with("**") || view.starts_with("//") {
            Token::new(view[..2].into(), TokenKind::operator)
        } else {
            Token::new(view[..1].into(), TokenKind::operator)
        }
    }

    fn get_single(&self, kind: TokenKind) -> Token {
        Token::new(self.string[self.index..(self.index + 1)].into(), kind)
    }

    fn get_token(&mut self) -> Result<Option<Token>> {
        if self.view().is_empty() {
            Ok(None)
        } else if starts_number(self.view()) {
            Ok(Some(self.get_number()))
        } else if self.view().starts_with(is_identifier_start) {
            Ok(Some(self.get_identifier()))
        } else if self.view().starts_with(is_operator) {
            Ok(Some(self.get_operator()))
        } else if self.view().starts_with(is_punctuation) {
            Ok(Some(self.get_single(TokenKind::punctuation)))
        } else {
            let character = self.view().chars().next().unwrap();
            Err(CalcError::invalid_character(character))
        }
    }

    pub fn get_current(&self) -> Token {
        self.token.clone().unwrap()
    }

    pub fn advance(&mut self) -> Result<()> {
        self.skip_whitespace();
        let token = self.get_token()?;
        if let Some(token) = &token {
            self.index += token.content.len();
        }
        self.token = token;
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.token.is_some()
    }
}

/// Runs the scanner over the whole input and collects its tokens.
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut scanner = StringScanner::new(input.into())?;
    let mut tokens = Vec::new();
    while scanner.is_valid() {
        tokens.push(scanner.get_current());
        scanner.advance()?;
    }
    Ok(tokens)
}
