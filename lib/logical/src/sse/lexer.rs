//! Splits SSE text into a tree of lists and atoms.

use crate::error::SseParseError;

#[derive(Debug, Clone)]
pub(super) enum Sexp {
    List(Vec<Sexp>, usize),
    Atom(Atom, usize),
}

impl Sexp {
    pub(super) fn position(&self) -> usize {
        match self {
            Sexp::List(_, position) | Sexp::Atom(_, position) => *position,
        }
    }

    pub(super) fn as_symbol(&self) -> Option<&str> {
        match self {
            Sexp::Atom(Atom::Symbol(symbol), _) => Some(symbol),
            _ => None,
        }
    }

    pub(super) fn error(&self, message: impl Into<String>) -> SseParseError {
        SseParseError::new(message, self.position())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Atom {
    /// The content between `<` and `>`, not yet resolved.
    Iri(String),
    PrefixedName(String, String),
    Variable { name: String, distinguished: bool },
    BlankNode(String),
    Literal { value: String, suffix: LiteralSuffix },
    Number(String),
    Symbol(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum LiteralSuffix {
    None,
    Language(String),
    Datatype(Box<Atom>),
}

/// Parses a complete input into a single expression. Only whitespace and comments may follow it.
pub(super) fn parse_document(input: &str) -> Result<Sexp, SseParseError> {
    let mut lexer = Lexer { input, position: 0 };
    let sexp = lexer.parse_sexp()?;
    lexer.skip_ignored();
    if lexer.position < input.len() {
        return Err(SseParseError::new(
            "Unexpected content after the expression",
            lexer.position,
        ));
    }
    Ok(sexp)
}

struct Lexer<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> Lexer<'a> {
    fn rest(&self) -> &'a str {
        &self.input[self.position..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn skip_ignored(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => self.position += c.len_utf8(),
                Some(';' | '#') => {
                    self.position += self.rest().find('\n').unwrap_or(self.rest().len());
                }
                _ => return,
            }
        }
    }

    fn take_while(&mut self, predicate: impl Fn(char) -> bool) -> &'a str {
        let rest = self.rest();
        let end = rest.find(|c| !predicate(c)).unwrap_or(rest.len());
        self.position += end;
        &rest[..end]
    }

    fn parse_sexp(&mut self) -> Result<Sexp, SseParseError> {
        self.skip_ignored();
        let start = self.position;
        match self.peek() {
            None => Err(SseParseError::new("Unexpected end of input", start)),
            Some('(') => {
                self.position += 1;
                let mut items = Vec::new();
                loop {
                    self.skip_ignored();
                    match self.peek() {
                        Some(')') => {
                            self.position += 1;
                            return Ok(Sexp::List(items, start));
                        }
                        None => return Err(SseParseError::new("Unclosed parenthesis", start)),
                        Some(_) => items.push(self.parse_sexp()?),
                    }
                }
            }
            Some(')') => Err(SseParseError::new("Unexpected ')'", start)),
            Some(_) => Ok(Sexp::Atom(self.read_atom()?, start)),
        }
    }

    fn read_atom(&mut self) -> Result<Atom, SseParseError> {
        let start = self.position;
        let rest = self.rest();

        if let Some(iri) = rest.strip_prefix('<') {
            // `<` and `<=` are operators, an IRI never contains whitespace.
            let end = iri.find(|c: char| c == '>' || is_delimiter(c));
            if let Some(end) = end.filter(|end| iri[*end..].starts_with('>')) {
                self.position += end + 2;
                return Ok(Atom::Iri(iri[..end].to_owned()));
            }
        }
        if rest.starts_with('"') {
            return self.read_literal();
        }
        if let Some(variable) = rest.strip_prefix('?') {
            let distinguished = !variable.starts_with('?');
            self.position += if distinguished { 1 } else { 2 };
            let name = self.take_while(is_name_char);
            if name.is_empty() {
                return Err(SseParseError::new("Empty variable name", start));
            }
            return Ok(Atom::Variable {
                name: name.to_owned(),
                distinguished,
            });
        }
        if rest.starts_with("_:") {
            self.position += 2;
            let label = self.take_while(is_name_char);
            if label.is_empty() {
                return Err(SseParseError::new("Empty blank node label", start));
            }
            return Ok(Atom::BlankNode(label.to_owned()));
        }

        let word = self.take_while(|c| !is_delimiter(c));
        if word.is_empty() {
            return Err(SseParseError::new("Unexpected character", start));
        }
        Ok(classify_word(word))
    }

    fn read_literal(&mut self) -> Result<Atom, SseParseError> {
        let start = self.position;
        self.position += 1;
        let mut value = String::new();
        loop {
            let Some(c) = self.peek() else {
                return Err(SseParseError::new("Unterminated string", start));
            };
            self.position += c.len_utf8();
            match c {
                '"' => break,
                '\\' => value.push(self.read_escape()?),
                c => value.push(c),
            }
        }

        let suffix = if self.rest().starts_with('@') {
            self.position += 1;
            let language = self.take_while(|c| c.is_ascii_alphanumeric() || c == '-');
            if language.is_empty() {
                return Err(SseParseError::new("Empty language tag", self.position));
            }
            LiteralSuffix::Language(language.to_owned())
        } else if self.rest().starts_with("^^") {
            self.position += 2;
            let datatype = self.read_atom()?;
            if !matches!(datatype, Atom::Iri(_) | Atom::PrefixedName(..)) {
                return Err(SseParseError::new("Expected a datatype IRI", self.position));
            }
            LiteralSuffix::Datatype(Box::new(datatype))
        } else {
            LiteralSuffix::None
        };
        Ok(Atom::Literal { value, suffix })
    }

    fn read_escape(&mut self) -> Result<char, SseParseError> {
        let start = self.position;
        let Some(c) = self.peek() else {
            return Err(SseParseError::new("Unterminated escape sequence", start));
        };
        self.position += c.len_utf8();
        let escaped = match c {
            't' => '\t',
            'n' => '\n',
            'r' => '\r',
            'b' => '\u{8}',
            'f' => '\u{c}',
            '"' | '\'' | '\\' => c,
            'u' | 'U' => {
                let length = if c == 'u' { 4 } else { 8 };
                let hex = self.rest().get(..length).unwrap_or_default();
                self.position += hex.len();
                u32::from_str_radix(hex, 16)
                    .ok()
                    .filter(|_| hex.len() == length)
                    .and_then(char::from_u32)
                    .ok_or_else(|| SseParseError::new("Invalid unicode escape", start))?
            }
            _ => return Err(SseParseError::new("Invalid escape sequence", start)),
        };
        Ok(escaped)
    }
}

fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || c == '(' || c == ')'
}

/// Characters of variable names and blank node labels.
fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.')
}

fn classify_word(word: &str) -> Atom {
    let unsigned = word.strip_prefix(['+', '-']).unwrap_or(word);
    let is_number = unsigned.starts_with(|c: char| c.is_ascii_digit())
        || unsigned
            .strip_prefix('.')
            .is_some_and(|rest| rest.starts_with(|c: char| c.is_ascii_digit()));
    if is_number {
        return Atom::Number(word.to_owned());
    }
    match word.split_once(':') {
        Some((prefix, local)) => Atom::PrefixedName(prefix.to_owned(), local.to_owned()),
        None => Atom::Symbol(word.to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atoms(input: &str) -> Vec<Atom> {
        match parse_document(input).unwrap() {
            Sexp::List(items, _) => items
                .into_iter()
                .map(|item| match item {
                    Sexp::Atom(atom, _) => atom,
                    Sexp::List(..) => panic!("unexpected list"),
                })
                .collect(),
            Sexp::Atom(..) => panic!("unexpected atom"),
        }
    }

    #[test]
    fn operators_are_not_iris() {
        assert_eq!(
            atoms("(<= <http://e.org/a> <)"),
            vec![
                Atom::Symbol("<=".to_owned()),
                Atom::Iri("http://e.org/a".to_owned()),
                Atom::Symbol("<".to_owned()),
            ]
        );
    }

    #[test]
    fn variables_and_blank_nodes() {
        assert_eq!(
            atoms("(?x ??y _:b1)"),
            vec![
                Atom::Variable {
                    name: "x".to_owned(),
                    distinguished: true
                },
                Atom::Variable {
                    name: "y".to_owned(),
                    distinguished: false
                },
                Atom::BlankNode("b1".to_owned()),
            ]
        );
    }

    #[test]
    fn names_with_dashes_and_dots() {
        assert_eq!(
            atoms("(?bnode-b _:b.1)"),
            vec![
                Atom::Variable {
                    name: "bnode-b".to_owned(),
                    distinguished: true
                },
                Atom::BlankNode("b.1".to_owned()),
            ]
        );
    }

    #[test]
    fn literals_with_suffixes() {
        assert_eq!(
            atoms(r#"("a\"b" "chat"@fr "1"^^xsd:integer -1.5 ex:p)"#),
            vec![
                Atom::Literal {
                    value: "a\"b".to_owned(),
                    suffix: LiteralSuffix::None
                },
                Atom::Literal {
                    value: "chat".to_owned(),
                    suffix: LiteralSuffix::Language("fr".to_owned())
                },
                Atom::Literal {
                    value: "1".to_owned(),
                    suffix: LiteralSuffix::Datatype(Box::new(Atom::PrefixedName(
                        "xsd".to_owned(),
                        "integer".to_owned()
                    )))
                },
                Atom::Number("-1.5".to_owned()),
                Atom::PrefixedName("ex".to_owned(), "p".to_owned()),
            ]
        );
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(atoms("(a ; comment\n b)").len(), 2);
    }

    #[test]
    fn unclosed_list_reports_its_position() {
        let error = parse_document("  (bgp").unwrap_err();
        assert_eq!(error.position(), 2);
    }
}
