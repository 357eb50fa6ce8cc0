//! Canonical formatting for the Go declarations produced by the generator.
//!
//! Only the subset of Go needed for struct definitions is understood: a package clause, import
//! declarations and `type X struct { ... }` declarations, each optionally preceded by line comments.
//! Anything else is reported as a syntax error, which makes this the last sanity check before
//! the code is written out.

use std::fmt;

use crate::error::Error;

const KEYWORDS: &[&str] = &[
    "break",
    "case",
    "chan",
    "const",
    "continue",
    "default",
    "defer",
    "else",
    "fallthrough",
    "for",
    "func",
    "go",
    "goto",
    "if",
    "import",
    "interface",
    "map",
    "package",
    "range",
    "return",
    "select",
    "struct",
    "switch",
    "type",
    "var",
];

/// Parse Go source and print it back the way gofmt would
pub fn format(source: &str) -> Result<String, Error> {
    let tokens = tokenize(source)?;
    let file = Parser { tokens, pos: 0 }.parse_file()?;
    Ok(print(&file))
}

// --------------------------------------------------------------------------------------------------------------------
// Lexer
// --------------------------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Number(String),
    // String literals keep their quotes
    Str(String),
    RawStr(String),
    Comment(String),
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Dot,
    Star,
    Newline,
    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Token::Ident(s) | Token::Number(s) | Token::Str(s) | Token::RawStr(s) | Token::Comment(s) => {
                write!(f, "{}", s)
            }
            Token::LBrace => write!(f, "'{{'"),
            Token::RBrace => write!(f, "'}}'"),
            Token::LParen => write!(f, "'('"),
            Token::RParen => write!(f, "')'"),
            Token::LBracket => write!(f, "'['"),
            Token::RBracket => write!(f, "']'"),
            Token::Dot => write!(f, "'.'"),
            Token::Star => write!(f, "'*'"),
            Token::Newline => write!(f, "newline"),
            Token::Eof => write!(f, "EOF"),
        }
    }
}

fn syntax_error(line: usize, message: impl Into<String>) -> Error {
    Error::Format {
        line,
        message: message.into(),
    }
}

fn is_letter(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

/// Split the source into tokens, each one with the line where it starts
fn tokenize(source: &str) -> Result<Vec<(Token, usize)>, Error> {
    let chars: Vec<char> = source.chars().collect();
    let text = |from: usize, to: usize| chars[from..to].iter().collect::<String>();
    let mut tokens = Vec::new();
    let mut line = 1;
    let mut i = 0;

    while i < chars.len() {
        let start = i;
        let start_line = line;
        let token = match chars[i] {
            ' ' | '\t' | '\r' => {
                i += 1;
                continue;
            }
            '\n' => {
                line += 1;
                i += 1;
                Token::Newline
            }
            '{' | '}' | '(' | ')' | '[' | ']' | '.' | '*' => {
                i += 1;
                match chars[start] {
                    '{' => Token::LBrace,
                    '}' => Token::RBrace,
                    '(' => Token::LParen,
                    ')' => Token::RParen,
                    '[' => Token::LBracket,
                    ']' => Token::RBracket,
                    '.' => Token::Dot,
                    _ => Token::Star,
                }
            }
            '/' if chars.get(i + 1) == Some(&'/') => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
                Token::Comment(text(start, i).trim_end().to_string())
            }
            '"' => {
                i += 1;
                loop {
                    match chars.get(i) {
                        None | Some('\n') => return Err(syntax_error(start_line, "string literal not terminated")),
                        Some('\\') => match chars.get(i + 1) {
                            None | Some('\n') => {
                                return Err(syntax_error(start_line, "string literal not terminated"))
                            }
                            Some(_) => i += 2,
                        },
                        Some('"') => break,
                        Some(_) => i += 1,
                    }
                }
                i += 1;
                Token::Str(text(start, i))
            }
            '`' => {
                i += 1;
                loop {
                    match chars.get(i) {
                        None => return Err(syntax_error(start_line, "raw string literal not terminated")),
                        Some('`') => break,
                        Some('\n') => {
                            line += 1;
                            i += 1;
                        }
                        Some(_) => i += 1,
                    }
                }
                i += 1;
                Token::RawStr(text(start, i))
            }
            c if is_letter(c) => {
                while i < chars.len() && (is_letter(chars[i]) || chars[i].is_numeric()) {
                    i += 1;
                }
                Token::Ident(text(start, i))
            }
            c if c.is_numeric() => {
                while i < chars.len() && (is_letter(chars[i]) || chars[i].is_numeric()) {
                    i += 1;
                }
                Token::Number(text(start, i))
            }
            c => return Err(syntax_error(line, format!("illegal character {:?}", c))),
        };
        tokens.push((token, start_line));
    }

    tokens.push((Token::Eof, line));
    Ok(tokens)
}

// --------------------------------------------------------------------------------------------------------------------
// Parser
// --------------------------------------------------------------------------------------------------------------------

#[derive(Debug, Default, PartialEq)]
struct File {
    comments: Vec<String>,
    package: String,
    imports: Vec<String>,
    types: Vec<TypeDecl>,
    trailing: Vec<String>,
}

#[derive(Debug, PartialEq)]
struct TypeDecl {
    docs: Vec<String>,
    name: String,
    fields: Vec<Field>,
}

#[derive(Debug, PartialEq)]
struct Field {
    name: String,
    typ: String,
    tag: Option<String>,
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos].0
    }

    fn line(&self) -> usize {
        self.tokens[self.pos].1
    }

    /// Consume the current token, the trailing EOF is never consumed
    fn bump(&mut self) -> Token {
        let token = self.tokens[self.pos].0.clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn unexpected<T>(&self, expected: &str) -> Result<T, Error> {
        Err(syntax_error(self.line(), format!("expected {}, found {}", expected, self.peek())))
    }

    fn skip_newlines(&mut self) {
        while *self.peek() == Token::Newline {
            self.bump();
        }
    }

    fn comments(&mut self) -> Vec<String> {
        let mut comments = Vec::new();
        loop {
            self.skip_newlines();
            match self.peek() {
                Token::Comment(text) => {
                    comments.push(text.clone());
                    self.bump();
                }
                _ => return comments,
            }
        }
    }

    fn expect(&mut self, expected: Token) -> Result<(), Error> {
        if *self.peek() == expected {
            self.bump();
            Ok(())
        } else {
            self.unexpected(&expected.to_string())
        }
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<(), Error> {
        match self.peek() {
            Token::Ident(word) if word == keyword => {
                self.bump();
                Ok(())
            }
            _ => self.unexpected(keyword),
        }
    }

    fn expect_ident(&mut self, what: &str) -> Result<String, Error> {
        match self.peek() {
            Token::Ident(word) if !KEYWORDS.contains(&word.as_str()) => {
                let word = word.clone();
                self.bump();
                Ok(word)
            }
            _ => self.unexpected(what),
        }
    }

    fn expect_line_end(&mut self) -> Result<(), Error> {
        match self.peek() {
            Token::Newline => {
                self.bump();
                Ok(())
            }
            Token::Eof => Ok(()),
            _ => self.unexpected("newline"),
        }
    }

    fn parse_file(&mut self) -> Result<File, Error> {
        let mut file = File {
            comments: self.comments(),
            ..File::default()
        };
        self.expect_keyword("package")?;
        file.package = self.expect_ident("package name")?;
        self.expect_line_end()?;

        loop {
            let docs = self.comments();
            match self.peek() {
                Token::Eof => {
                    file.trailing = docs;
                    return Ok(file);
                }
                Token::Ident(word) if word == "import" => {
                    if !file.types.is_empty() {
                        return Err(syntax_error(self.line(), "imports must appear before other declarations"));
                    }
                    self.bump();
                    self.parse_import(&mut file.imports)?;
                }
                Token::Ident(word) if word == "type" => {
                    self.bump();
                    let decl = self.parse_type_decl(docs)?;
                    file.types.push(decl);
                }
                _ => return self.unexpected("declaration"),
            }
        }
    }

    fn parse_import(&mut self, imports: &mut Vec<String>) -> Result<(), Error> {
        if *self.peek() != Token::LParen {
            self.parse_import_path(imports)?;
            return self.expect_line_end();
        }

        self.bump();
        loop {
            self.skip_newlines();
            if *self.peek() == Token::RParen {
                self.bump();
                return self.expect_line_end();
            }
            self.parse_import_path(imports)?;
            if *self.peek() != Token::RParen {
                self.expect_line_end()?;
            }
        }
    }

    fn parse_import_path(&mut self, imports: &mut Vec<String>) -> Result<(), Error> {
        match self.peek() {
            Token::Str(path) if path.len() > 2 => {
                imports.push(path.clone());
                self.bump();
                Ok(())
            }
            Token::Str(_) => Err(syntax_error(self.line(), "invalid import path")),
            _ => self.unexpected("import path"),
        }
    }

    fn parse_type_decl(&mut self, docs: Vec<String>) -> Result<TypeDecl, Error> {
        let name = self.expect_ident("type name")?;
        self.expect_keyword("struct")?;
        self.expect(Token::LBrace)?;

        let mut fields = Vec::new();
        loop {
            self.skip_newlines();
            if *self.peek() == Token::RBrace {
                self.bump();
                break;
            }

            let name = self.expect_ident("field name")?;
            let typ = self.parse_type()?;
            let tag = match self.peek() {
                Token::Str(tag) | Token::RawStr(tag) => {
                    let tag = tag.clone();
                    self.bump();
                    Some(tag)
                }
                _ => None,
            };
            fields.push(Field { name, typ, tag });

            match self.peek() {
                Token::RBrace => {}
                Token::Newline => {
                    self.bump();
                }
                _ => return self.unexpected("newline"),
            }
        }

        self.expect_line_end()?;
        Ok(TypeDecl { docs, name, fields })
    }

    fn parse_type(&mut self) -> Result<String, Error> {
        match self.peek() {
            Token::Star => {
                self.bump();
                Ok(format!("*{}", self.parse_type()?))
            }
            Token::LBracket => {
                self.bump();
                self.expect(Token::RBracket)?;
                Ok(format!("[]{}", self.parse_type()?))
            }
            Token::Ident(_) => {
                let name = self.expect_ident("type")?;
                if *self.peek() == Token::Dot {
                    self.bump();
                    let selector = self.expect_ident("type name")?;
                    Ok(format!("{}.{}", name, selector))
                } else {
                    Ok(name)
                }
            }
            _ => self.unexpected("type"),
        }
    }
}

// --------------------------------------------------------------------------------------------------------------------
// Printer
// --------------------------------------------------------------------------------------------------------------------

fn print(file: &File) -> String {
    let mut out = String::new();
    for comment in &file.comments {
        out.push_str(comment);
        out.push('\n');
    }
    out.push_str(&format!("package {}\n", file.package));

    if !file.imports.is_empty() {
        let mut imports = file.imports.clone();
        imports.sort();
        imports.dedup();
        out.push_str("\nimport (\n");
        for import in &imports {
            out.push_str(&format!("\t{}\n", import));
        }
        out.push_str(")\n");
    }

    for decl in &file.types {
        out.push('\n');
        for doc in &decl.docs {
            out.push_str(doc);
            out.push('\n');
        }
        out.push_str(&format!("type {} struct {{\n", decl.name));
        print_fields(&decl.fields, &mut out);
        out.push_str("}\n");
    }

    if !file.trailing.is_empty() {
        out.push('\n');
        for comment in &file.trailing {
            out.push_str(comment);
            out.push('\n');
        }
    }
    out
}

/// Print struct fields in aligned columns
///
/// Names are aligned across the whole struct, types only across consecutive tagged fields since
/// an untagged type ends its line.
fn print_fields(fields: &[Field], out: &mut String) {
    let width = |s: &str| s.chars().count();
    let name_width = fields.iter().map(|f| width(&f.name)).max().unwrap_or(0);

    let mut start = 0;
    while start < fields.len() {
        let tagged = fields[start].tag.is_some();
        let end = fields[start..]
            .iter()
            .position(|f| f.tag.is_some() != tagged)
            .map_or(fields.len(), |n| start + n);
        let type_width = fields[start..end].iter().map(|f| width(&f.typ)).max().unwrap_or(0);

        for field in &fields[start..end] {
            match &field.tag {
                Some(tag) => out.push_str(&format!(
                    "\t{:<nw$} {:<tw$} {}\n",
                    field.name,
                    field.typ,
                    tag,
                    nw = name_width,
                    tw = type_width
                )),
                None => out.push_str(&format!("\t{:<nw$} {}\n", field.name, field.typ, nw = name_width)),
            }
        }
        start = end;
    }
}
