#![forbid(unsafe_code)]

//! CSS selector subset.
//!
//! Supported grammar:
//!
//! ```text
//! list      := complex ( "," complex )*
//! complex   := compound ( WS+ compound )*          descendant combinator only
//! compound  := ( tag | "*" )? simple*
//! simple    := "#" ident | "." ident | "[" ident ( "=" value )? "]" | ":" pseudo
//! pseudo    := "checked" | "selected" | "disabled"
//! value     := ident | '"' chars '"' | "'" chars "'"
//! ```
//!
//! Matching is evaluated right to left against a [`SelectorTarget`], which
//! the document implements for its nodes.

use std::fmt;

/// Parse failure with the byte offset where it occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorError {
    pub offset: usize,
    pub message: String,
}

impl fmt::Display for SelectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "selector error at {}: {}", self.offset, self.message)
    }
}

impl std::error::Error for SelectorError {}

/// State flags a `:pseudo` selector can test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pseudo {
    Checked,
    Selected,
    Disabled,
}

/// One simple selector inside a compound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Simple {
    Id(String),
    Class(String),
    Attr { name: String, value: Option<String> },
    Pseudo(Pseudo),
}

/// Tag plus simple selectors that must all hold for one node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Compound {
    pub tag: Option<String>,
    pub simples: Vec<Simple>,
}

/// Compounds joined by descendant combinators, outermost first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Complex {
    pub parts: Vec<Compound>,
}

/// Comma-separated selector list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList {
    pub alternatives: Vec<Complex>,
}

/// Node view needed for matching.
pub trait SelectorTarget: Sized {
    fn tag(&self) -> &str;
    fn attr(&self, name: &str) -> Option<String>;
    fn has_class(&self, class: &str) -> bool;
    fn state(&self, pseudo: Pseudo) -> bool;
    fn parent(&self) -> Option<Self>;
}

impl Compound {
    fn matches<T: SelectorTarget>(&self, node: &T) -> bool {
        if let Some(tag) = &self.tag
            && !tag.eq_ignore_ascii_case(node.tag())
        {
            return false;
        }
        self.simples.iter().all(|simple| match simple {
            Simple::Id(id) => node.attr("id").as_deref() == Some(id.as_str()),
            Simple::Class(class) => node.has_class(class),
            Simple::Attr { name, value: None } => node.attr(name).is_some(),
            Simple::Attr {
                name,
                value: Some(value),
            } => node.attr(name).as_deref() == Some(value.as_str()),
            Simple::Pseudo(pseudo) => node.state(*pseudo),
        })
    }
}

impl Complex {
    /// Whether `node` matches, looking at ancestors for outer compounds.
    fn matches<T: SelectorTarget>(&self, node: &T) -> bool {
        let Some((last, outer)) = self.parts.split_last() else {
            return false;
        };
        if !last.matches(node) {
            return false;
        }
        let mut remaining = outer.iter().rev().peekable();
        let mut current = node.parent();
        while let Some(compound) = remaining.peek() {
            let Some(ancestor) = current else {
                return false;
            };
            if compound.matches(&ancestor) {
                remaining.next();
            }
            current = ancestor.parent();
        }
        true
    }
}

impl SelectorList {
    /// Parse a selector list.
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        Parser::new(input).parse_list()
    }

    /// Whether `node` matches any alternative.
    pub fn matches<T: SelectorTarget>(&self, node: &T) -> bool {
        self.alternatives.iter().any(|complex| complex.matches(node))
    }
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn error(&self, message: impl Into<String>) -> SelectorError {
        SelectorError {
            offset: self.pos,
            message: message.into(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
        self.pos > start
    }

    fn expect(&mut self, wanted: char) -> Result<(), SelectorError> {
        match self.bump() {
            Some(c) if c == wanted => Ok(()),
            Some(c) => Err(self.error(format!("expected '{wanted}', found '{c}'"))),
            None => Err(self.error(format!("expected '{wanted}', found end of input"))),
        }
    }

    fn ident(&mut self) -> Result<String, SelectorError> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '-' || c == '_')
        {
            self.bump();
        }
        if self.pos == start {
            return Err(self.error("expected an identifier"));
        }
        Ok(self.input[start..self.pos].to_string())
    }

    fn attr_value(&mut self) -> Result<String, SelectorError> {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.bump();
                let start = self.pos;
                while self.peek().is_some_and(|c| c != quote) {
                    self.bump();
                }
                let value = self.input[start..self.pos].to_string();
                self.expect(quote)?;
                Ok(value)
            }
            _ => self.ident(),
        }
    }

    fn parse_list(&mut self) -> Result<SelectorList, SelectorError> {
        let mut alternatives = Vec::new();
        loop {
            self.skip_whitespace();
            alternatives.push(self.parse_complex()?);
            match self.bump() {
                Some(',') => continue,
                None => break,
                Some(c) => return Err(self.error(format!("unexpected '{c}'"))),
            }
        }
        Ok(SelectorList { alternatives })
    }

    fn parse_complex(&mut self) -> Result<Complex, SelectorError> {
        let mut parts = vec![self.parse_compound()?];
        loop {
            let spaced = self.skip_whitespace();
            match self.peek() {
                None | Some(',') => break,
                Some(_) if spaced => parts.push(self.parse_compound()?),
                Some(c) => return Err(self.error(format!("unexpected '{c}'"))),
            }
        }
        Ok(Complex { parts })
    }

    fn parse_compound(&mut self) -> Result<Compound, SelectorError> {
        let mut compound = Compound::default();
        let mut universal = false;
        match self.peek() {
            Some('*') => {
                self.bump();
                universal = true;
            }
            Some(c) if c.is_alphabetic() => compound.tag = Some(self.ident()?),
            _ => {}
        }
        loop {
            match self.peek() {
                Some('#') => {
                    self.bump();
                    compound.simples.push(Simple::Id(self.ident()?));
                }
                Some('.') => {
                    self.bump();
                    compound.simples.push(Simple::Class(self.ident()?));
                }
                Some('[') => {
                    self.bump();
                    let name = self.ident()?;
                    let value = if self.peek() == Some('=') {
                        self.bump();
                        Some(self.attr_value()?)
                    } else {
                        None
                    };
                    self.expect(']')?;
                    compound.simples.push(Simple::Attr { name, value });
                }
                Some(':') => {
                    self.bump();
                    let pseudo = match self.ident()?.as_str() {
                        "checked" => Pseudo::Checked,
                        "selected" => Pseudo::Selected,
                        "disabled" => Pseudo::Disabled,
                        other => {
                            return Err(self.error(format!("unsupported pseudo-class ':{other}'")));
                        }
                    };
                    compound.simples.push(Simple::Pseudo(pseudo));
                }
                _ => break,
            }
        }
        if !universal && compound.tag.is_none() && compound.simples.is_empty() {
            return Err(self.error("empty selector"));
        }
        Ok(compound)
    }
}
