// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! STEP file tokenizer using nom combinators
//!
//! Parses STEP/IFC entity definitions and header records into tokens.

use ifc_json_model::{AttributeValue, DecodedEntity, EntityId, IfcType};
use nom::{
    branch::alt,
    bytes::complete::{take_while, take_while1},
    character::complete::{char, multispace0},
    combinator::{opt, recognize},
    error::{Error, ErrorKind},
    multi::separated_list0,
    sequence::{delimited, pair},
    IResult, Parser,
};

/// Raw token from STEP file (before conversion to AttributeValue)
#[derive(Clone, Debug, PartialEq)]
pub enum Token<'a> {
    /// Entity reference (#123)
    EntityRef(u32),
    /// String value, still STEP-escaped
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
    /// Convert token to owned AttributeValue
    ///
    /// Strings are unescaped and the logicals `.T.`/`.F.` become booleans.
    pub fn to_attribute_value(&self) -> AttributeValue {
        match self {
            Token::EntityRef(id) => AttributeValue::EntityRef(EntityId(*id)),
            Token::String(s) => AttributeValue::String(decode_step_string(s)),
            Token::Integer(i) => AttributeValue::Integer(*i),
            Token::Float(f) => AttributeValue::Float(*f),
            Token::Enum("T") => AttributeValue::Bool(true),
            Token::Enum("F") => AttributeValue::Bool(false),
            Token::Enum(s) => AttributeValue::Enum((*s).to_string()),
            Token::List(items) => {
                AttributeValue::List(items.iter().map(|t| t.to_attribute_value()).collect())
            }
            Token::TypedValue(name, args) => AttributeValue::TypedValue(
                (*name).to_string(),
                args.iter().map(|t| t.to_attribute_value()).collect(),
            ),
            Token::Null => AttributeValue::Null,
            Token::Derived => AttributeValue::Derived,
        }
    }
}

// ============================================================================
// String decoding
// ============================================================================

/// Resolve STEP string escapes
///
/// Handles `''`, `\\`, `\S\c` (upper half of ISO 8859), `\X\hh`
/// (single ISO 8859-1 byte), `\X2\...\X0\` (UTF-16) and `\X4\...\X0\`
/// (UTF-32). Code page switches (`\P?\`) are dropped. Unrecognised escapes
/// are kept verbatim.
pub fn decode_step_string(raw: &str) -> String {
    if !raw.contains('\'') && !raw.contains('\\') {
        return raw.to_string();
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(c) = rest.chars().next() {
        if c == '\'' && rest.starts_with("''") {
            out.push('\'');
            rest = &rest[2..];
        } else if c == '\\' {
            rest = decode_escape(rest, &mut out);
        } else {
            out.push(c);
            rest = &rest[c.len_utf8()..];
        }
    }

    out
}

/// Decode one escape starting at `input[0] == '\\'`; returns the remainder
fn decode_escape<'a>(input: &'a str, out: &mut String) -> &'a str {
    if let Some(rest) = input.strip_prefix("\\\\") {
        out.push('\\');
        return rest;
    }
    if let Some(rest) = input.strip_prefix("\\X2\\") {
        if let Some(end) = rest.find("\\X0\\") {
            let units: Vec<u16> = hex_chunks(&rest[..end], 4)
                .filter_map(|h| u16::from_str_radix(h, 16).ok())
                .collect();
            out.extend(char::decode_utf16(units).map(|r| r.unwrap_or('\u{FFFD}')));
            return &rest[end + 4..];
        }
    }
    if let Some(rest) = input.strip_prefix("\\X4\\") {
        if let Some(end) = rest.find("\\X0\\") {
            out.extend(
                hex_chunks(&rest[..end], 8)
                    .filter_map(|h| u32::from_str_radix(h, 16).ok())
                    .map(|cp| char::from_u32(cp).unwrap_or('\u{FFFD}')),
            );
            return &rest[end + 4..];
        }
    }
    if let Some(rest) = input.strip_prefix("\\X\\") {
        if let Some(code) = rest.get(..2).and_then(|h| u8::from_str_radix(h, 16).ok()) {
            out.push(char::from(code));
            return &rest[2..];
        }
    }
    if let Some(rest) = input.strip_prefix("\\S\\") {
        if let Some(c) = rest.chars().next() {
            if c.is_ascii() {
                out.push(char::from(c as u8 + 128));
                return &rest[1..];
            }
        }
    }
    if let Some(rest) = input.strip_prefix("\\P") {
        if rest.len() >= 2 && rest.as_bytes()[1] == b'\\' {
            return &rest[2..];
        }
    }

    out.push('\\');
    &input[1..]
}

fn hex_chunks(s: &str, width: usize) -> impl Iterator<Item = &str> {
    (0..s.len() / width).filter_map(move |i| s.get(i * width..(i + 1) * width))
}

// ============================================================================
// Parsing Primitives
// ============================================================================

/// Parse whitespace, including `/* ... */` comments
fn ws(input: &str) -> IResult<&str, ()> {
    let mut input = input;
    loop {
        let (rest, _) = multispace0(input)?;
        match rest.strip_prefix("/*") {
            Some(comment) => match comment.find("*/") {
                Some(end) => input = &comment[end + 2..],
                None => return Ok(("", ())),
            },
            None => return Ok((rest, ())),
        }
    }
}

/// Parse an entity reference (#123)
fn entity_ref(input: &str) -> IResult<&str, Token<'_>> {
    let (rest, _) = char('#')(input)?;
    let (rest, digits) = take_while1(|c: char| c.is_ascii_digit())(rest)?;
    let id = digits
        .parse::<u32>()
        .map_err(|_| nom::Err::Error(Error::new(input, ErrorKind::Digit)))?;
    Ok((rest, Token::EntityRef(id)))
}

/// Parse a STEP string ('text' with '' for escaped quotes)
fn step_string(input: &str) -> IResult<&str, Token<'_>> {
    let (input, _) = char('\'')(input)?;

    let bytes = input.as_bytes();
    let mut end = 0;
    while end < bytes.len() {
        if bytes[end] == b'\'' {
            if end + 1 < bytes.len() && bytes[end + 1] == b'\'' {
                end += 2;
                continue;
            }
            break;
        }
        end += 1;
    }

    if end >= bytes.len() {
        // Unterminated string
        return Err(nom::Err::Error(Error::new(input, ErrorKind::Char)));
    }

    Ok((&input[end + 1..], Token::String(&input[..end])))
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

    let digits = num_str.strip_prefix('+').unwrap_or(num_str);

    if digits.contains(['.', 'e', 'E']) {
        // lexical-core rejects a bare trailing dot ("1.")
        let normalized = if digits.ends_with('.') {
            format!("{}0", digits)
        } else {
            digits.to_string()
        };
        lexical_core::parse::<f64>(normalized.as_bytes())
            .map(|f| (rest, Token::Float(f)))
            .map_err(|_| nom::Err::Error(Error::new(input, ErrorKind::Float)))
    } else {
        lexical_core::parse::<i64>(digits.as_bytes())
            .map(|i| (rest, Token::Integer(i)))
            .map_err(|_| nom::Err::Error(Error::new(input, ErrorKind::Digit)))
    }
}

/// Parse an enumeration (.VALUE.)
fn enumeration(input: &str) -> IResult<&str, Token<'_>> {
    let (input, _) = char('.')(input)?;
    let (input, name) = take_while1(|c: char| c.is_alphanumeric() || c == '_')(input)?;
    let (input, _) = char('.')(input)?;
    Ok((input, Token::Enum(name)))
}

/// Parse null ($)
fn null_value(input: &str) -> IResult<&str, Token<'_>> {
    let (input, _) = char('$')(input)?;
    Ok((input, Token::Null))
}

/// Parse derived (*)
fn derived_value(input: &str) -> IResult<&str, Token<'_>> {
    let (input, _) = char('*')(input)?;
    Ok((input, Token::Derived))
}

/// Parse a parenthesised, comma separated token list
fn parameter_list(input: &str) -> IResult<&str, Vec<Token<'_>>> {
    delimited(
        pair(char('('), ws),
        separated_list0((ws, char(','), ws), token),
        pair(ws, char(')')),
    )
    .parse(input)
}

/// Parse a list of tokens
fn list(input: &str) -> IResult<&str, Token<'_>> {
    let (input, items) = parameter_list(input)?;
    Ok((input, Token::List(items)))
}

/// Parse a typed value like IFCLABEL('text')
fn typed_value(input: &str) -> IResult<&str, Token<'_>> {
    let (input, type_name) = take_while1(|c: char| c.is_alphanumeric() || c == '_')(input)?;
    let (input, _) = ws(input)?;
    let (input, args) = parameter_list(input)?;
    Ok((input, Token::TypedValue(type_name, args)))
}

/// Parse any token
fn token(input: &str) -> IResult<&str, Token<'_>> {
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
// Entity Parsing
// ============================================================================

/// Parse a complete entity definition
///
/// Format: `#123=IFCWALL(attr1,attr2,...);`
pub fn parse_entity(input: &str) -> Result<DecodedEntity, String> {
    let input = input.trim_start();

    let (input, _) = char::<&str, Error<&str>>('#')
        .parse(input)
        .map_err(|_| "Expected # at start of entity")?;

    let (input, id_str) = take_while1::<_, &str, Error<&str>>(|c: char| c.is_ascii_digit())
        .parse(input)
        .map_err(|_| "Expected entity ID")?;

    let id: u32 = id_str.parse().map_err(|_| "Invalid entity ID")?;

    let (input, _) = (ws, char('='), ws)
        .parse(input)
        .map_err(|_: nom::Err<Error<&str>>| "Expected = after entity ID")?;

    let (input, type_name) =
        take_while1::<_, &str, Error<&str>>(|c: char| c.is_alphanumeric() || c == '_')
            .parse(input)
            .map_err(|_| "Expected type name")?;

    let (input, _) = ws(input).map_err(|e| format!("{:?}", e))?;

    let (_, tokens) =
        parameter_list(input).map_err(|e| format!("Failed to parse attributes: {:?}", e))?;

    Ok(DecodedEntity {
        id: EntityId(id),
        ifc_type: IfcType::parse(type_name),
        attributes: tokens.iter().map(|t| t.to_attribute_value()).collect(),
    })
}

/// Parse entity from the byte range the scanner recorded
pub fn parse_entity_at(content: &str, start: usize, end: usize) -> Result<DecodedEntity, String> {
    let slice = content
        .get(start..end)
        .ok_or_else(|| format!("Byte range {}..{} out of bounds", start, end))?;
    parse_entity(slice)
}

/// Parse the parameter list of a header record, e.g. the `(...)` after
/// `FILE_NAME`
pub fn parse_parameters(input: &str) -> Result<Vec<AttributeValue>, String> {
    let (input, _) = ws(input).map_err(|e| format!("{:?}", e))?;
    let (_, tokens) =
        parameter_list(input).map_err(|e| format!("Failed to parse parameters: {:?}", e))?;
    Ok(tokens.iter().map(|t| t.to_attribute_value()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_entity_ref() {
        let (remaining, token) = entity_ref("#123").unwrap();
        assert_eq!(remaining, "");
        assert_eq!(token, Token::EntityRef(123));
    }

    #[test]
    fn test_parse_string_with_escaped_quote() {
        let (remaining, token) = step_string("'it''s a test'").unwrap();
        assert_eq!(remaining, "");
        assert_eq!(token, Token::String("it''s a test"));
        assert_eq!(token.to_attribute_value().as_string(), Some("it's a test"));
    }

    #[test]
    fn test_unterminated_string_is_error() {
        assert!(step_string("'never closed").is_err());
    }

    #[test]
    fn test_decode_unicode_escapes() {
        assert_eq!(decode_step_string("W\\X2\\00E4\\X0\\nde"), "Wände");
        assert_eq!(decode_step_string("\\X\\E9t\\X\\E9"), "été");
        assert_eq!(decode_step_string("\\S\\d"), "ä");
        assert_eq!(decode_step_string("plain"), "plain");
    }

    #[test]
    fn test_parse_number_float() {
        let (remaining, token) = number("3.14159").unwrap();
        assert_eq!(remaining, "");
        if let Token::Float(f) = token {
            assert!((f - 3.14159).abs() < 1e-10);
        } else {
            panic!("Expected float");
        }
    }

    #[test]
    fn test_parse_number_trailing_dot_and_exponent() {
        assert_eq!(number("1.").unwrap().1, Token::Float(1.0));
        if let Token::Float(f) = number("1.5E-3").unwrap().1 {
            assert!((f - 0.0015).abs() < 1e-10);
        } else {
            panic!("Expected float");
        }
        assert_eq!(number("-42").unwrap().1, Token::Integer(-42));
    }

    #[test]
    fn test_logicals_become_bools() {
        assert_eq!(Token::Enum("T").to_attribute_value(), AttributeValue::Bool(true));
        assert_eq!(Token::Enum("F").to_attribute_value(), AttributeValue::Bool(false));
        assert_eq!(
            Token::Enum("U").to_attribute_value(),
            AttributeValue::Enum("U".to_string())
        );
    }

    #[test]
    fn test_parse_entity_with_typed_value_and_comment() {
        let entity =
            parse_entity("#7 = IFCPROPERTYSINGLEVALUE('Width', /* note */ $, IFCLENGTHMEASURE(0.2), $);")
                .unwrap();
        assert_eq!(entity.id, EntityId(7));
        assert_eq!(entity.attributes.len(), 4);
        assert_eq!(entity.get_float(2), Some(0.2));
    }

    #[test]
    fn test_parse_entity() {
        let entity = parse_entity("#1=IFCWALL('abc',$,#2);").unwrap();
        assert_eq!(entity.id, EntityId(1));
        assert_eq!(entity.ifc_type, IfcType::IfcWall);
        assert_eq!(entity.attributes.len(), 3);
    }

    #[test]
    fn test_parse_malformed_entity() {
        assert!(parse_entity("#1=IFCWALL('abc',$,#2;").is_err());
        assert!(parse_entity("IFCWALL('abc');").is_err());
    }

    #[test]
    fn test_parse_parameters() {
        let params = parse_parameters(" (('IFC4'))").unwrap();
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].as_list().map(|l| l.len()), Some(1));
    }
}
