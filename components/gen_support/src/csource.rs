//! Line-oriented C source and header writer

use std::fmt::Display;

/// Maximum line width used when wrapping array initializers
const ARRAY_LINE_WIDTH: usize = 76;

/// Declaration qualifiers for an emitted byte array
#[derive(Debug, Clone, Copy)]
pub struct ArrayDecl<'a> {
    /// Visibility macro, e.g. `DUK_INTERNAL`
    pub visibility: Option<&'a str>,
    /// Element type name
    pub typename: &'a str,
    /// Emit `const`
    pub constant: bool,
}

impl Default for ArrayDecl<'_> {
    fn default() -> Self {
        Self {
            visibility: Some("DUK_INTERNAL"),
            typename: "duk_uint8_t",
            constant: true,
        }
    }
}

/// Accumulates generated C text
#[derive(Debug, Clone, Default)]
pub struct CSourceWriter {
    lines: Vec<String>,
}

impl CSourceWriter {
    /// Create an empty writer
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit the standard "generated file" comment
    pub fn emit_header(&mut self, generator: &str) {
        self.emit_line("/*");
        self.emit_line(format!(
            " *  Automatically generated by {}, do not edit!",
            generator
        ));
        self.emit_line(" */");
        self.emit_line("");
    }

    /// Emit one line of text
    pub fn emit_line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Emit several lines
    pub fn emit_lines<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lines.extend(lines.into_iter().map(Into::into));
    }

    /// Emit `#define NAME VALUE`
    pub fn emit_define(&mut self, name: &str, value: impl Display) {
        self.emit_line(format!("#define {} {}", name, value));
    }

    /// Emit `#define NAME VALUE  /* comment */`
    pub fn emit_define_commented(&mut self, name: &str, value: impl Display, comment: &str) {
        self.emit_line(format!(
            "#define {} {}  /* {} */",
            name,
            value,
            sanitize_comment(comment)
        ));
    }

    /// Emit a sized byte array initializer with integer element values
    pub fn emit_array(&mut self, name: &str, data: &[u8], decl: ArrayDecl<'_>) {
        let mut head = String::new();
        if let Some(vis) = decl.visibility {
            head.push_str(vis);
            head.push(' ');
        }
        if decl.constant {
            head.push_str("const ");
        }
        self.emit_line(format!(
            "{}{} {}[{}] = {{",
            head,
            decl.typename,
            name,
            data.len()
        ));

        let mut line = String::new();
        for byte in data {
            let item = format!("{},", c_byte_literal(*byte));
            if line.len() + item.len() >= ARRAY_LINE_WIDTH {
                self.emit_line(std::mem::take(&mut line));
            }
            line.push_str(&item);
        }
        if !line.is_empty() {
            self.emit_line(line);
        }
        self.emit_line("};");
    }

    /// Number of lines emitted so far
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Render the accumulated text, newline terminated
    pub fn into_string(self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }
}

/// Integer literal for a byte; values above 127 get a `U` suffix
pub fn c_byte_literal(byte: u8) -> String {
    if byte >= 128 {
        format!("{}U", byte)
    } else {
        format!("{}", byte)
    }
}

/// Quote a byte string for use inside a C comment, escaping anything that is
/// not printable ASCII
pub fn quote_bytes(data: &[u8]) -> String {
    let mut out = String::from("'");
    for byte in data {
        match byte {
            b'\'' => out.push_str("\\'"),
            b'\\' => out.push_str("\\\\"),
            0x20..=0x7e => out.push(*byte as char),
            _ => out.push_str(&format!("\\x{:02x}", byte)),
        }
    }
    out.push('\'');
    out
}

fn sanitize_comment(text: &str) -> String {
    text.replace("*/", "* /")
}
