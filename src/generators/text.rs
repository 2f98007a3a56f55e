//! Character and string generators.

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use crate::computation::{Gen, rand, sequence};

use super::ConfigError;
use super::collections::length;
use super::options::{Center, GenOptions};

/// Named character table. Every class except [`CharClass::Any`] is drawn from
/// ASCII; `Any` covers Latin-1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharClass {
    /// Letters and digits.
    Alnum,
    /// Letters.
    Alpha,
    /// Space and tab.
    Blank,
    /// Control characters.
    Cntrl,
    /// Decimal digits.
    Digit,
    /// Visible characters, excluding space.
    Graph,
    /// Lowercase letters.
    Lower,
    /// Visible characters and space.
    Print,
    /// Punctuation.
    Punct,
    /// Whitespace, including vertical tab.
    Space,
    /// Uppercase letters.
    Upper,
    /// Hexadecimal digits.
    Xdigit,
    /// All of `0x00..=0x7f`.
    Ascii,
    /// All of `0x00..=0xff`.
    Any,
}

impl CharClass {
    /// Every class, in table order.
    pub const ALL: [CharClass; 14] = [
        CharClass::Alnum,
        CharClass::Alpha,
        CharClass::Blank,
        CharClass::Cntrl,
        CharClass::Digit,
        CharClass::Graph,
        CharClass::Lower,
        CharClass::Print,
        CharClass::Punct,
        CharClass::Space,
        CharClass::Upper,
        CharClass::Xdigit,
        CharClass::Ascii,
        CharClass::Any,
    ];

    /// Lowercase name, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            CharClass::Alnum => "alnum",
            CharClass::Alpha => "alpha",
            CharClass::Blank => "blank",
            CharClass::Cntrl => "cntrl",
            CharClass::Digit => "digit",
            CharClass::Graph => "graph",
            CharClass::Lower => "lower",
            CharClass::Print => "print",
            CharClass::Punct => "punct",
            CharClass::Space => "space",
            CharClass::Upper => "upper",
            CharClass::Xdigit => "xdigit",
            CharClass::Ascii => "ascii",
            CharClass::Any => "any",
        }
    }

    /// Whether `c` belongs to the class.
    pub fn contains(self, c: char) -> bool {
        match self {
            CharClass::Alnum => c.is_ascii_alphanumeric(),
            CharClass::Alpha => c.is_ascii_alphabetic(),
            CharClass::Blank => c == ' ' || c == '\t',
            CharClass::Cntrl => c.is_ascii_control(),
            CharClass::Digit => c.is_ascii_digit(),
            CharClass::Graph => c.is_ascii_graphic(),
            CharClass::Lower => c.is_ascii_lowercase(),
            CharClass::Print => c.is_ascii_graphic() || c == ' ',
            CharClass::Punct => c.is_ascii_punctuation(),
            CharClass::Space => c.is_ascii_whitespace() || c == '\x0b',
            CharClass::Upper => c.is_ascii_uppercase(),
            CharClass::Xdigit => c.is_ascii_hexdigit(),
            CharClass::Ascii => c.is_ascii(),
            CharClass::Any => (c as u32) <= 0xff,
        }
    }
}

impl fmt::Display for CharClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CharClass {
    type Err = ConfigError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        CharClass::ALL
            .into_iter()
            .find(|class| class.name() == name)
            .ok_or_else(|| ConfigError::UnknownCharClass(name.to_string()))
    }
}

/// Characters a text generator may draw.
#[derive(Debug, Clone, Copy)]
pub enum Charset {
    /// A named class.
    Class(CharClass),
    /// Latin-1 characters accepted by a predicate.
    Predicate(fn(char) -> bool),
}

impl Charset {
    /// Materialize the set as a table, in code point order.
    pub fn table(self) -> Vec<char> {
        (0u8..=0xff)
            .map(char::from)
            .filter(|c| match self {
                Charset::Class(class) => class.contains(*c),
                Charset::Predicate(accepts) => accepts(*c),
            })
            .collect()
    }
}

impl Default for Charset {
    fn default() -> Self {
        Charset::Class(CharClass::Print)
    }
}

impl From<CharClass> for Charset {
    fn from(class: CharClass) -> Self {
        Charset::Class(class)
    }
}

impl From<fn(char) -> bool> for Charset {
    fn from(predicate: fn(char) -> bool) -> Self {
        Charset::Predicate(predicate)
    }
}

/// One character drawn uniformly from `charset`.
pub fn character(charset: impl Into<Charset>) -> Result<Gen<char>, ConfigError> {
    let table: Rc<[char]> = charset.into().table().into();
    if table.is_empty() {
        return Err(ConfigError::EmptyCharset);
    }
    Ok(rand(table.len() as u128).map(move |index| table[index as usize]))
}

/// Strings whose length follows `options` (default `0..=10`, centered at the
/// minimum) over `options.charset` (default [`CharClass::Print`]).
pub fn string(options: &GenOptions<usize>) -> Result<Gen<String>, ConfigError> {
    let letter = character(options.charset.unwrap_or_default())?;
    Ok(length(options)?.bind(move |n| {
        sequence(vec![letter.clone(); n]).map(|letters| letters.into_iter().collect::<String>())
    }))
}

fn is_symbol_char(c: char) -> bool {
    c.is_ascii_lowercase() || c == '_'
}

/// Identifier-like strings over `[a-z_]`, one to ten characters long.
pub fn symbol() -> Result<Gen<String>, ConfigError> {
    string(
        &GenOptions::between(1, 10)
            .with_center(Center::Min)
            .with_charset(is_symbol_char as fn(char) -> bool),
    )
}
