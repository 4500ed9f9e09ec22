// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! STEP tokenizer using nom combinators
//!
//! Turns `#12=IFCWALL('2O2Fr$t4X7Zf8NOew3FLOH',$,'wall1',...);` records into
//! [`Entity`] values.

use crate::encoding::decode_string;
use ifc_author_model::{AttributeValue, Entity, EntityId, IfcType, ModelError, Result};
use nom::{
    branch::alt,
    bytes::complete::{tag, take_until, take_while, take_while1},
    character::complete::{char, multispace1},
    combinator::{opt, recognize, value},
    multi::{many0, separated_list0},
    sequence::{delimited, pair},
    IResult, Parser,
};

/// Raw token borrowed from the input
#[derive(Clone, Debug, PartialEq)]
pub enum Token<'a> {
    /// Entity reference (#123)
    EntityRef(u32),
    /// String content between the quotes, still escaped
    String(&'a str),
    /// Integer value
    Integer(i64),
    /// Float value
    Float(f64),
    /// Enumeration (.VALUE.)
    Enum(&'a str),
    /// List of tokens
    List(Vec<Token<'a>>),
    /// Typed value like IFCLABEL('text')
    TypedValue(&'a str, Vec<Token<'a>>),
    /// Null value ($)
    Null,
    /// Derived value (*)
    Derived,
}

impl<'a> Token<'a> {
    /// Convert token to an owned AttributeValue, decoding string escapes
    pub fn to_attribute_value(&self) -> AttributeValue {
        match self {
            Token::EntityRef(id) => AttributeValue::EntityRef(EntityId(*id)),
            Token::String(s) => AttributeValue::String(decode_string(s)),
            Token::Integer(i) => AttributeValue::Integer(*i),
            Token::Float(f) => AttributeValue::Float(*f),
            Token::Enum(s) => match *s {
                "T" => AttributeValue::Bool(true),
                "F" => AttributeValue::Bool(false),
                _ => AttributeValue::Enum((*s).to_string()),
            },
            Token::List(items) => {
                AttributeValue::List(items.iter().map(|t| t.to_attribute_value()).collect())
            }
            Token::TypedValue(name, args) => AttributeValue::TypedValue(
                name.to_ascii_uppercase(),
                args.iter().map(|t| t.to_attribute_value()).collect(),
            ),
            Token::Null => AttributeValue::Null,
            Token::Derived => AttributeValue::Derived,
        }
    }
}

// ============================================================================
// Parsing Primitives
// ============================================================================

/// Skip whitespace and `/* ... */` comments
pub(crate) fn ws(input: &str) -> IResult<&str, ()> {
    value(
        (),
        many0(alt((
            value((), multispace1),
            value((), (tag("/*"), take_until("*/"), tag("*/"))),
        ))),
    )
    .parse(input)
}

fn keyword(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-').parse(input)
}

/// Parse an entity reference (#123)
fn entity_ref(input: &str) -> IResult<&str, Token<'_>> {
    let (rest, digits) = (char('#'), take_while1(|c: char| c.is_ascii_digit()))
        .map(|(_, digits)| digits)
        .parse(input)?;
    let id = digits.parse::<u32>().map_err(|_| {
        nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Digit))
    })?;
    Ok((rest, Token::EntityRef(id)))
}

/// Parse a STEP string ('text' with '' for escaped quotes)
fn step_string(input: &str) -> IResult<&str, Token<'_>> {
    let (body, _) = char('\'').parse(input)?;

    let bytes = body.as_bytes();
    let mut end = 0;
    while end < bytes.len() {
        if bytes[end] == b'\'' {
            if bytes.get(end + 1) == Some(&b'\'') {
                end += 2;
                continue;
            }
            return Ok((&body[end + 1..], Token::String(&body[..end])));
        }
        end += 1;
    }

    // Unterminated string
    Err(nom::Err::Error(nom::error::Error::new(
        input,
        nom::error::ErrorKind::Char,
    )))
}

/// Parse a number (integer or float)
fn number(input: &str) -> IResult<&str, Token<'_>> {
    let (rest, num_str) = recognize((
        opt(alt((char('-'), char('+')))),
        take_while1(|c: char| c.is_ascii_digit()),
        opt(pair(char('.'), take_while(|c: char| c.is_ascii_digit()))),
        opt((
            alt((char('e'), char('E'))),
            opt(alt((char('+'), char('-')))),
            take_while1(|c: char| c.is_ascii_digit()),
        )),
    ))
    .parse(input)?;

    let invalid = || nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Float));

    if num_str.contains(['.', 'e', 'E']) {
        // lexical-core rejects a bare trailing dot before the exponent ("1.E-05")
        let f = lexical_core::parse::<f64>(num_str.as_bytes())
            .ok()
            .or_else(|| num_str.replace(".E", ".0E").parse::<f64>().ok())
            .ok_or_else(invalid)?;
        Ok((rest, Token::Float(f)))
    } else {
        let i = lexical_core::parse::<i64>(num_str.as_bytes()).map_err(|_| invalid())?;
        Ok((rest, Token::Integer(i)))
    }
}

/// Parse an enumeration (.VALUE.)
fn enumeration(input: &str) -> IResult<&str, Token<'_>> {
    delimited(
        char('.'),
        take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_'),
        char('.'),
    )
    .map(Token::Enum)
    .parse(input)
}

/// Parse null ($)
fn null_value(input: &str) -> IResult<&str, Token<'_>> {
    value(Token::Null, char('$')).parse(input)
}

/// Parse derived (*)
fn derived_value(input: &str) -> IResult<&str, Token<'_>> {
    value(Token::Derived, char('*')).parse(input)
}

/// Parenthesised, comma separated tokens
pub(crate) fn token_list(input: &str) -> IResult<&str, Vec<Token<'_>>> {
    delimited(
        pair(char('('), ws),
        separated_list0((ws, char(','), ws), token),
        pair(ws, char(')')),
    )
    .parse(input)
}

/// Parse a list of tokens
fn list(input: &str) -> IResult<&str, Token<'_>> {
    token_list.map(Token::List).parse(input)
}

/// Parse a typed value like IFCLABEL('text')
fn typed_value(input: &str) -> IResult<&str, Token<'_>> {
    let (input, type_name) = keyword(input)?;
    let (input, _) = ws(input)?;
    let (input, args) = token_list(input)?;
    Ok((input, Token::TypedValue(type_name, args)))
}

/// Parse any token
pub(crate) fn token(input: &str) -> IResult<&str, Token<'_>> {
    alt((
        entity_ref,
        step_string,
        null_value,
        derived_value,
        enumeration,
        number,
        list,
        typed_value,
    ))
    .parse(input)
}

// ============================================================================
// Record Parsing
// ============================================================================

/// Parse a header record such as `FILE_NAME('a.ifc',...);`
///
/// Returns the keyword and its argument tokens.
pub fn parse_record(input: &str) -> Result<(&str, Vec<Token<'_>>)> {
    let parsed: IResult<&str, (&str, Vec<Token<'_>>)> =
        (ws, keyword, ws, token_list, ws, opt(char(';')))
            .map(|(_, name, _, args, _, _)| (name, args))
            .parse(input);

    parsed
        .map(|(_, record)| record)
        .map_err(|e| ModelError::format(format!("invalid header record: {:?}", e)))
}

/// Parse a complete entity definition
///
/// Format: `#123=IFCWALL(attr1,attr2,...);`
pub fn parse_entity(input: &str) -> Result<Entity> {
    let parsed: IResult<&str, (&str, &str, Vec<Token<'_>>)> = (
        ws,
        char('#'),
        take_while1(|c: char| c.is_ascii_digit()),
        (ws, char('='), ws),
        keyword,
        ws,
        token_list,
        ws,
        opt(char(';')),
    )
        .map(|(_, _, id, _, name, _, args, _, _)| (id, name, args))
        .parse(input);

    let (_, (id_str, type_name, tokens)) =
        parsed.map_err(|e| ModelError::format(format!("invalid entity instance: {:?}", e)))?;

    let id = id_str
        .parse::<u32>()
        .map_err(|_| ModelError::format(format!("invalid entity id #{}", id_str)))?;

    Ok(Entity::new(
        EntityId(id),
        IfcType::parse(type_name),
        tokens.iter().map(|t| t.to_attribute_value()).collect(),
    ))
}

/// Parse entity from a byte range of the file
pub fn parse_entity_at(content: &str, start: usize, end: usize) -> Result<Entity> {
    let slice = content
        .get(start..end)
        .ok_or_else(|| {
            ModelError::format(format!("entity range {}..{} out of bounds", start, end))
        })?;
    parse_entity(slice)
}
