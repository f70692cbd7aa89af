//! PHP `serialize()` format for `application/php`, and `var_export()`
//! source text for `text/php`.
//!
//! Arrays become PHP lists with integer keys, objects become arrays with
//! string keys. Decoding turns an array whose keys are exactly `0..n` back
//! into a JSON array, so an empty object decodes as an empty array.

use serde_json::{Map, Number, Value};
use std::io::Write;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PhpError {
    #[error("Unexpected end of input")]
    UnexpectedEnd,

    #[error("Unexpected byte {byte:?} at offset {offset}")]
    UnexpectedByte { byte: char, offset: usize },

    #[error("Invalid {what} at offset {offset}")]
    Invalid { what: &'static str, offset: usize },

    #[error("Trailing data at offset {0}")]
    TrailingData(usize),
}

pub type Result<T> = std::result::Result<T, PhpError>;

pub fn to_vec(value: &Value) -> Vec<u8> {
    let mut out = Vec::new();
    write_value(&mut out, value);
    out
}

pub fn to_string(value: &Value) -> String {
    String::from_utf8_lossy(&to_vec(value)).into_owned()
}

fn write_value(out: &mut Vec<u8>, value: &Value) {
    // Writes into a Vec cannot fail
    let _ = match value {
        Value::Null => write!(out, "N;"),
        Value::Bool(b) => write!(out, "b:{};", u8::from(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => write!(out, "i:{};", i),
            None => write!(out, "d:{};", n.as_f64().unwrap_or_default()),
        },
        Value::String(s) => {
            write_string(out, s);
            Ok(())
        }
        Value::Array(items) => {
            let _ = write!(out, "a:{}:{{", items.len());
            for (index, item) in items.iter().enumerate() {
                let _ = write!(out, "i:{};", index);
                write_value(out, item);
            }
            write!(out, "}}")
        }
        Value::Object(map) => {
            let _ = write!(out, "a:{}:{{", map.len());
            for (key, item) in map {
                write_string(out, key);
                write_value(out, item);
            }
            write!(out, "}}")
        }
    };
}

fn write_string(out: &mut Vec<u8>, s: &str) {
    let _ = write!(out, "s:{}:\"", s.len());
    out.extend_from_slice(s.as_bytes());
    out.extend_from_slice(b"\";");
}

/// Render a value as PHP literal source, the way `var_export($v, true)` does.
pub fn export(value: &Value) -> String {
    let mut out = String::new();
    export_value(&mut out, value, 0);
    out
}

fn export_value(out: &mut String, value: &Value, depth: usize) {
    match value {
        Value::Null => out.push_str("NULL"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => out.push_str(&i.to_string()),
            (None, Some(f)) if f.is_finite() && f.fract() == 0.0 => out.push_str(&format!("{:.1}", f)),
            (None, f) => out.push_str(&f.unwrap_or_default().to_string()),
        },
        Value::String(s) => export_string(out, s),
        Value::Array(items) => {
            export_array(out, depth, items.iter().enumerate().map(|(i, item)| (i.to_string(), item)))
        }
        Value::Object(map) => export_array(
            out,
            depth,
            map.iter().map(|(key, item)| {
                let mut quoted = String::new();
                export_string(&mut quoted, key);
                (quoted, item)
            }),
        ),
    }
}

fn export_array<'v>(out: &mut String, depth: usize, entries: impl Iterator<Item = (String, &'v Value)>) {
    let indent = "  ".repeat(depth);
    out.push_str("array (\n");
    for (key, item) in entries {
        out.push_str(&indent);
        out.push_str("  ");
        out.push_str(&key);
        out.push_str(" => ");
        if matches!(item, Value::Array(_) | Value::Object(_)) {
            out.push('\n');
            out.push_str(&indent);
            out.push_str("  ");
        }
        export_value(out, item, depth + 1);
        out.push_str(",\n");
    }
    out.push_str(&indent);
    out.push(')');
}

fn export_string(out: &mut String, s: &str) {
    out.push('\'');
    for c in s.chars() {
        if c == '\\' || c == '\'' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('\'');
}

pub fn from_slice(input: &[u8]) -> Result<Value> {
    let mut parser = Parser { input, pos: 0 };
    let value = parser.value()?;
    if parser.pos != input.len() {
        return Err(PhpError::TrailingData(parser.pos));
    }
    Ok(value)
}

pub fn from_str(input: &str) -> Result<Value> {
    from_slice(input.as_bytes())
}

struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn next(&mut self) -> Result<u8> {
        let byte = *self.input.get(self.pos).ok_or(PhpError::UnexpectedEnd)?;
        self.pos += 1;
        Ok(byte)
    }

    fn expect(&mut self, expected: u8) -> Result<()> {
        let offset = self.pos;
        match self.next()? {
            byte if byte == expected => Ok(()),
            byte => Err(PhpError::UnexpectedByte {
                byte: byte as char,
                offset,
            }),
        }
    }

    /// Bytes up to `end`, consuming the terminator
    fn until(&mut self, end: u8) -> Result<&'a [u8]> {
        let input = self.input;
        let start = self.pos;
        let len = input[start..]
            .iter()
            .position(|b| *b == end)
            .ok_or(PhpError::UnexpectedEnd)?;
        self.pos = start + len + 1;
        Ok(&input[start..start + len])
    }

    fn number<T: std::str::FromStr>(&mut self, end: u8, what: &'static str) -> Result<T> {
        let offset = self.pos;
        let raw = self.until(end)?;
        std::str::from_utf8(raw)
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or(PhpError::Invalid { what, offset })
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let input = self.input;
        let end = self.pos.checked_add(len).ok_or(PhpError::UnexpectedEnd)?;
        let bytes = input.get(self.pos..end).ok_or(PhpError::UnexpectedEnd)?;
        self.pos = end;
        Ok(bytes)
    }

    fn string(&mut self) -> Result<String> {
        self.expect(b':')?;
        let len: usize = self.number(b':', "string length")?;
        self.expect(b'"')?;
        let offset = self.pos;
        let bytes = self.take(len)?;
        let s = String::from_utf8(bytes.to_vec()).map_err(|_| PhpError::Invalid {
            what: "UTF-8 string",
            offset,
        })?;
        self.expect(b'"')?;
        self.expect(b';')?;
        Ok(s)
    }

    fn value(&mut self) -> Result<Value> {
        let offset = self.pos;
        match self.next()? {
            b'N' => {
                self.expect(b';')?;
                Ok(Value::Null)
            }
            b'b' => {
                self.expect(b':')?;
                match self.number::<u8>(b';', "boolean")? {
                    0 => Ok(Value::Bool(false)),
                    1 => Ok(Value::Bool(true)),
                    _ => Err(PhpError::Invalid { what: "boolean", offset }),
                }
            }
            b'i' => {
                self.expect(b':')?;
                Ok(Value::from(self.number::<i64>(b';', "integer")?))
            }
            b'd' => {
                self.expect(b':')?;
                let f: f64 = self.number(b';', "float")?;
                Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or(PhpError::Invalid { what: "finite float", offset })
            }
            b's' => Ok(Value::String(self.string()?)),
            b'a' => self.array(),
            byte => Err(PhpError::UnexpectedByte {
                byte: byte as char,
                offset,
            }),
        }
    }

    fn array(&mut self) -> Result<Value> {
        self.expect(b':')?;
        let len: usize = self.number(b':', "array length")?;
        self.expect(b'{')?;

        let mut entries = Vec::with_capacity(len.min(1024));
        for _ in 0..len {
            let offset = self.pos;
            let key = match self.next()? {
                b'i' => {
                    self.expect(b':')?;
                    self.number::<i64>(b';', "integer key")?.to_string()
                }
                b's' => self.string()?,
                byte => {
                    return Err(PhpError::UnexpectedByte {
                        byte: byte as char,
                        offset,
                    })
                }
            };
            entries.push((key, self.value()?));
        }
        self.expect(b'}')?;

        let is_list = entries
            .iter()
            .enumerate()
            .all(|(index, (key, _))| *key == index.to_string());
        if is_list {
            Ok(Value::Array(entries.into_iter().map(|(_, v)| v).collect()))
        } else {
            Ok(Value::Object(entries.into_iter().collect::<Map<String, Value>>()))
        }
    }
}
