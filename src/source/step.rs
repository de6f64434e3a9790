//! Minimal reader for ISO 10303-21 (STEP physical file) content.
//!
//! Only the parts needed to list type objects are modelled: instance ids,
//! entity keywords and attribute values. Statements may span lines.

use crate::error::SourceError;
use std::iter::Peekable;
use std::str::Chars;

#[derive(Debug, Clone, PartialEq)]
pub enum StepValue {
    String(String),
    Number(f64),
    Enum(String),
    Reference(u64),
    List(Vec<StepValue>),
    /// A typed value such as `IFCLABEL('x')`.
    Typed(String, Box<StepValue>),
    Null,
    Derived,
}

impl StepValue {
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            StepValue::String(s) => Some(s),
            StepValue::Typed(_, inner) => inner.as_str(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StepEntity {
    pub id: u64,
    pub keyword: String,
    pub attributes: Vec<StepValue>,
}

impl StepEntity {
    /// String attribute at `index`, if present and non-empty.
    #[must_use]
    pub fn string_at(&self, index: usize) -> Option<&str> {
        self.attributes
            .get(index)
            .and_then(StepValue::as_str)
            .filter(|s| !s.is_empty())
    }
}

#[derive(Debug)]
pub struct StepFile {
    pub schema: String,
    /// Entities in file order.
    pub entities: Vec<StepEntity>,
}

impl StepFile {
    pub fn parse(content: &str) -> Result<Self, SourceError> {
        let statements = split_statements(content);
        let data_start = statements
            .iter()
            .position(|s| s.trim() == "DATA")
            .ok_or_else(|| SourceError::InvalidStep {
                message: "missing DATA section".into(),
            })?;

        let schema = statements[..data_start]
            .iter()
            .find_map(|s| extract_schema(s.trim()))
            .unwrap_or_default();
        let mut entities = Vec::new();

        for statement in &statements[data_start + 1..] {
            let statement = statement.trim();
            if statement == "ENDSEC" {
                break;
            }
            if !statement.starts_with('#') {
                continue;
            }
            match parse_entity(statement) {
                Some(entity) => entities.push(entity),
                None => tracing::debug!(statement, "skipping unparsable STEP statement"),
            }
        }

        Ok(StepFile { schema, entities })
    }

    /// Entities with the given keyword, in file order.
    pub fn entities_of<'a>(&'a self, keyword: &'a str) -> impl Iterator<Item = &'a StepEntity> + 'a {
        self.entities.iter().filter(move |e| e.keyword == keyword)
    }
}

fn extract_schema(statement: &str) -> Option<String> {
    let rest = statement.strip_prefix("FILE_SCHEMA")?;
    let start = rest.find('\'')? + 1;
    let len = rest[start..].find('\'')?;
    Some(rest[start..start + len].to_string())
}

// Splits on `;` outside quoted strings and drops `/* ... */` comments. A
// doubled quote toggles twice and so needs no special case.
fn split_statements(content: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut in_string = false;
    let mut chars = content.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\'' => {
                in_string = !in_string;
                current.push(ch);
            }
            '/' if !in_string && chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for c in chars.by_ref() {
                    if prev == '*' && c == '/' {
                        break;
                    }
                    prev = c;
                }
            }
            ';' if !in_string => statements.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }

    statements
}

fn parse_entity(statement: &str) -> Option<StepEntity> {
    // #123=IFCDOORTYPE('guid',#5,'Name',...)
    let eq = statement.find('=')?;
    let id = statement[1..eq].trim().parse().ok()?;

    let body = statement[eq + 1..].trim();
    let open = body.find('(')?;
    let keyword = body[..open].trim().to_ascii_uppercase();
    if keyword.is_empty() {
        return None;
    }

    let mut cursor = body[open..].chars().peekable();
    let attributes = match parse_value(&mut cursor)? {
        StepValue::List(values) => values,
        _ => return None,
    };

    Some(StepEntity {
        id,
        keyword,
        attributes,
    })
}

fn skip_whitespace(cursor: &mut Peekable<Chars<'_>>) {
    while cursor.peek().is_some_and(|c| c.is_whitespace()) {
        cursor.next();
    }
}

fn parse_value(cursor: &mut Peekable<Chars<'_>>) -> Option<StepValue> {
    skip_whitespace(cursor);
    match *cursor.peek()? {
        '(' => {
            cursor.next();
            let mut items = Vec::new();
            loop {
                skip_whitespace(cursor);
                match cursor.peek()? {
                    ')' => {
                        cursor.next();
                        break;
                    }
                    ',' => {
                        cursor.next();
                    }
                    _ => items.push(parse_value(cursor)?),
                }
            }
            Some(StepValue::List(items))
        }
        '\'' => {
            cursor.next();
            let mut raw = String::new();
            loop {
                let c = cursor.next()?;
                if c == '\'' {
                    if cursor.peek() == Some(&'\'') {
                        cursor.next();
                        raw.push('\'');
                        continue;
                    }
                    break;
                }
                raw.push(c);
            }
            Some(StepValue::String(decode_step_string(&raw)))
        }
        '#' => {
            cursor.next();
            let digits = take_while(cursor, |c| c.is_ascii_digit());
            digits.parse().ok().map(StepValue::Reference)
        }
        '$' => {
            cursor.next();
            Some(StepValue::Null)
        }
        '*' => {
            cursor.next();
            Some(StepValue::Derived)
        }
        '.' => {
            cursor.next();
            let name = take_while(cursor, |c| c != '.');
            cursor.next();
            Some(StepValue::Enum(name))
        }
        c if c.is_ascii_alphabetic() => {
            let name = take_while(cursor, |c| c.is_ascii_alphanumeric() || c == '_');
            match parse_value(cursor)? {
                StepValue::List(mut inner) if inner.len() == 1 => {
                    Some(StepValue::Typed(name.to_ascii_uppercase(), Box::new(inner.remove(0))))
                }
                other => Some(StepValue::Typed(name.to_ascii_uppercase(), Box::new(other))),
            }
        }
        _ => {
            let token = take_while(cursor, |c| !matches!(c, ',' | ')') && !c.is_whitespace());
            token.parse().ok().map(StepValue::Number)
        }
    }
}

fn take_while(cursor: &mut Peekable<Chars<'_>>, keep: impl Fn(char) -> bool) -> String {
    let mut out = String::new();
    while let Some(&c) = cursor.peek() {
        if !keep(c) {
            break;
        }
        out.push(c);
        cursor.next();
    }
    out
}

/// Decodes STEP string escapes. `''` has already been collapsed by the
/// tokenizer. Handles `\\`, `\X2\hhhh…\X0\` (UCS-2), `\X\hh` (ISO 8859-1)
/// and `\S\c` (high half of ISO 8859-1).
pub(crate) fn decode_step_string(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }

        match chars.peek().copied() {
            Some('\\') => {
                chars.next();
                out.push('\\');
            }
            Some('S') => {
                chars.next();
                if chars.next_if_eq(&'\\').is_some() {
                    if let Some(c) = chars.next().and_then(|c| char::from_u32(u32::from(c) + 0x80)) {
                        out.push(c);
                    }
                } else {
                    out.push_str("\\S");
                }
            }
            Some('X') => {
                chars.next();
                if chars.next_if_eq(&'2').is_some() && chars.next_if_eq(&'\\').is_some() {
                    let hex = take_while(&mut chars, |c| c.is_ascii_hexdigit());
                    for chunk in hex.as_bytes().chunks(4) {
                        let code = std::str::from_utf8(chunk)
                            .ok()
                            .and_then(|s| u32::from_str_radix(s, 16).ok())
                            .and_then(char::from_u32);
                        if let Some(c) = code {
                            out.push(c);
                        }
                    }
                    // Terminator \X0\
                    for expected in ['\\', 'X', '0', '\\'] {
                        chars.next_if_eq(&expected);
                    }
                } else if chars.next_if_eq(&'\\').is_some() {
                    let hex: String = (0..2).filter_map(|_| chars.next()).collect();
                    match u8::from_str_radix(&hex, 16) {
                        Ok(code) => out.push(char::from(code)),
                        Err(_) => {
                            out.push_str("\\X\\");
                            out.push_str(&hex);
                        }
                    }
                } else {
                    out.push_str("\\X");
                }
            }
            _ => out.push('\\'),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "ISO-10303-21;
HEADER;
FILE_SCHEMA(('IFC4'));
ENDSEC;
DATA;
#1=IFCDOORTYPE('2aG1gZj7PD2PztLOx2$IVX',#2,'Door-A:36in',$,$,$,$,'36in',$,.DOOR.,.SINGLE_SWING_LEFT.,.F.,$);
#2=IFCOWNERHISTORY(#3,#4,$,.ADDED.,$,$,$,1418084874);
#3=IFCPROPERTYSINGLEVALUE('Width',$,IFCLENGTHMEASURE(915.),$);
#4=IFCWALLTYPE('0LV8Pqx5z1DgbTR$C7ec3z',#2,'Basic Wall:It''s; thick',
  $,$,(#5,#6),$,$,$,.STANDARD.);
ENDSEC;
END-ISO-10303-21;
";

    #[test]
    fn reads_schema_and_entities_in_order() {
        let file = StepFile::parse(SAMPLE).unwrap();

        assert_eq!(file.schema, "IFC4");
        let ids: Vec<u64> = file.entities.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(file.entities[0].keyword, "IFCDOORTYPE");
    }

    #[test]
    fn handles_quotes_semicolons_and_line_breaks_in_statements() {
        let file = StepFile::parse(SAMPLE).unwrap();
        let wall = file.entities_of("IFCWALLTYPE").next().unwrap();

        assert_eq!(wall.string_at(2), Some("Basic Wall:It's; thick"));
        assert_eq!(
            wall.attributes[5],
            StepValue::List(vec![StepValue::Reference(5), StepValue::Reference(6)])
        );
        assert_eq!(wall.attributes[9], StepValue::Enum("STANDARD".into()));
    }

    #[test]
    fn parses_typed_values_and_numbers() {
        let file = StepFile::parse(SAMPLE).unwrap();
        let prop = &file.entities[2];

        assert_eq!(
            prop.attributes[2],
            StepValue::Typed("IFCLENGTHMEASURE".into(), Box::new(StepValue::Number(915.0)))
        );
        assert_eq!(file.entities[1].attributes[7], StepValue::Number(1_418_084_874.0));
        assert_eq!(prop.string_at(1), None);
    }

    #[test]
    fn comments_do_not_hide_later_entities() {
        let content = "ISO-10303-21;
HEADER;
FILE_DESCRIPTION(('ViewDefinition [DATA; ignored]'),'2;1');
FILE_SCHEMA(('IFC2X3'));
ENDSEC;
DATA;
/* Revit's export; do not edit */
#1=IFCWALLTYPE('a',$,'Basic Wall:Generic',$,$,$,$,$,$,.STANDARD.);
#2=IFCDOORTYPE('b',$,/* inline 'note' */'Door-A:36in',$,$,$,$,$,$,.DOOR.,.NOTDEFINED.,.F.,$);
ENDSEC;
END-ISO-10303-21;
";
        let file = StepFile::parse(content).unwrap();

        assert_eq!(file.schema, "IFC2X3");
        let ids: Vec<u64> = file.entities.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(file.entities[0].string_at(2), Some("Basic Wall:Generic"));
        assert_eq!(file.entities[1].string_at(2), Some("Door-A:36in"));
    }

    #[test]
    fn comment_markers_inside_strings_are_text() {
        let content = "DATA;\n#1=IFCWALLTYPE('a',$,'Wall /* not a comment */',$);\nENDSEC;\n";
        let file = StepFile::parse(content).unwrap();

        assert_eq!(file.entities[0].string_at(2), Some("Wall /* not a comment */"));
    }

    #[test]
    fn missing_data_section_is_invalid() {
        let err = StepFile::parse("ISO-10303-21;\nHEADER;\nENDSEC;\n").unwrap_err();
        assert!(matches!(err, SourceError::InvalidStep { .. }));
    }

    #[test]
    fn decodes_unicode_escapes() {
        assert_eq!(
            decode_step_string(r"\X2\0414043204350440044C\X0\-A"),
            "Дверь-A"
        );
        assert_eq!(decode_step_string(r"Gr\X\F6\X\DFe"), "Größe");
        assert_eq!(decode_step_string(r"caf\S\i"), "café");
        assert_eq!(decode_step_string(r"a\\b"), r"a\b");
    }
}
