//! Line-oriented syntax tree for module files.
//!
//! A module file is a sequence of statements. Each statement is either a
//! single directive line (`require example.com/a v1.0.0`), a block
//! (`require ( ... )`) grouping several lines under one verb, or a group of
//! standalone `//` comments. Blank lines and comments are kept so a file can
//! be rewritten without losing the author's annotations.
//!
//! # Canonical Formatting
//!
//! [`Document::render`] always produces the same text for the same tree:
//! - tokens are separated by a single space
//! - block lines are indented with a tab
//! - runs of blank lines collapse to one
//! - removed lines and blocks left without live lines are omitted, but the
//!   comments written above them are kept
//! - blocks stay blocks, even when only one line is left
//!
//! Rendering a parsed rendering yields identical text, which is what makes
//! byte comparison a reliable change detector.

use thiserror::Error;

/// A lexical or structural error, tagged with its 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct SyntaxError {
  pub line: usize,
  pub message: String,
}

impl SyntaxError {
  pub(crate) fn new(line: usize, message: impl Into<String>) -> Self {
    Self {
      line,
      message: message.into(),
    }
  }
}

/// Comments attached to a line or block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comments {
  /// Full-line comments directly above the statement.
  pub before: Vec<String>,
  /// Comment trailing the statement on the same line.
  pub suffix: Option<String>,
}

impl Comments {
  pub fn is_empty(&self) -> bool {
    self.before.is_empty() && self.suffix.is_none()
  }
}

/// A single directive, either top-level or inside a block.
///
/// Lines inside a block carry the block's verb so every directive can be
/// inspected the same way regardless of how it was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
  pub verb: String,
  /// Raw argument tokens; quoted tokens keep their quotes.
  pub args: Vec<String>,
  pub comments: Comments,
  /// Whether a blank line preceded this line in the source.
  pub blank_before: bool,
  /// 1-based source line, 0 for lines added after parsing.
  pub line_no: usize,
  removed: bool,
}

impl Line {
  pub fn new(verb: &str, args: Vec<String>) -> Self {
    Self {
      verb: verb.to_string(),
      args,
      comments: Comments::default(),
      blank_before: false,
      line_no: 0,
      removed: false,
    }
  }

  pub fn is_removed(&self) -> bool {
    self.removed
  }

  /// Tombstone the line. It stays in the tree, so later insertions still
  /// find its block, but only the comments above it are rendered again.
  pub fn mark_removed(&mut self) {
    self.removed = true;
    self.comments.suffix = None;
  }
}

/// A `verb ( ... )` group of lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
  pub verb: String,
  pub lines: Vec<Line>,
  /// Comments above the block and trailing its opening line.
  pub comments: Comments,
  /// Comments between the last line and the closing paren.
  pub closing: Vec<String>,
  pub blank_before: bool,
  pub line_no: usize,
}

impl Block {
  fn from_line(line: Line) -> Self {
    Self {
      verb: line.verb.clone(),
      comments: Comments::default(),
      closing: Vec::new(),
      blank_before: line.blank_before,
      line_no: line.line_no,
      lines: vec![Line {
        blank_before: false,
        ..line
      }],
    }
  }
}

/// Standalone comments separated from the next statement by a blank line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentGroup {
  pub lines: Vec<String>,
  pub blank_before: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
  Line(Line),
  Block(Block),
  Comment(CommentGroup),
}

/// A parsed module file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
  pub stmts: Vec<Stmt>,
}

impl Document {
  /// Parse module file text into a syntax tree.
  ///
  /// # Errors
  ///
  /// Returns [`SyntaxError`] for unterminated quotes or blocks, `/* */`
  /// comments and misplaced parentheses.
  pub fn parse(text: &str) -> Result<Self, SyntaxError> {
    Parser::default().run(text)
  }

  /// All live lines, top-level and inside blocks, in source order.
  pub fn lines(&self) -> impl Iterator<Item = &Line> {
    self
      .stmts
      .iter()
      .flat_map(|stmt| match stmt {
        Stmt::Line(line) => std::slice::from_ref(line).iter(),
        Stmt::Block(block) => block.lines.iter(),
        Stmt::Comment(_) => Default::default(),
      })
      .filter(|line| !line.removed)
  }

  /// Mutable access to all live lines in source order.
  pub fn lines_mut(&mut self) -> impl Iterator<Item = &mut Line> {
    self
      .stmts
      .iter_mut()
      .flat_map(|stmt| match stmt {
        Stmt::Line(line) => std::slice::from_mut(line).iter_mut(),
        Stmt::Block(block) => block.lines.iter_mut(),
        Stmt::Comment(_) => Default::default(),
      })
      .filter(|line| !line.removed)
  }

  /// Add a directive next to the existing ones with the same verb.
  ///
  /// - Appended to the last block for `verb`, even one whose lines were all removed
  /// - A lone live line for `verb` is turned into a block holding both lines
  /// - Otherwise appended as a new top-level line at the end of the file
  pub fn add_line(&mut self, verb: &str, args: Vec<String>) {
    let position = self.stmts.iter().rposition(|stmt| match stmt {
      Stmt::Line(line) => !line.removed && line.verb == verb,
      Stmt::Block(block) => block.verb == verb,
      Stmt::Comment(_) => false,
    });

    let Some(index) = position else {
      let blank_before = !self.stmts.is_empty();
      self.stmts.push(Stmt::Line(Line {
        blank_before,
        ..Line::new(verb, args)
      }));
      return;
    };

    if let Stmt::Line(existing) = &self.stmts[index] {
      self.stmts[index] = Stmt::Block(Block::from_line(existing.clone()));
    }

    if let Stmt::Block(block) = &mut self.stmts[index] {
      block.lines.push(Line::new(verb, args));
    }
  }

  /// Stable-sort the lines of every block for `verb` by `key`.
  pub fn sort_blocks_by_key<K: Ord>(&mut self, verb: &str, mut key: impl FnMut(&Line) -> K) {
    for stmt in &mut self.stmts {
      if let Stmt::Block(block) = stmt
        && block.verb == verb
      {
        block.lines.sort_by_key(&mut key);
      }
    }
  }

  /// Render the tree as canonical module file text.
  pub fn render(&self) -> String {
    let mut printer = Printer::default();

    for stmt in &self.stmts {
      match stmt {
        Stmt::Comment(group) => {
          printer.separate(group.blank_before);
          for comment in &group.lines {
            printer.text(false, comment);
          }
        }
        Stmt::Line(line) => {
          if line.removed && line.comments.before.is_empty() {
            continue;
          }
          printer.separate(line.blank_before);
          printer.comments(false, &line.comments.before);
          if !line.removed {
            printer.directive(false, Some(&line.verb), &line.args, line.comments.suffix.as_deref());
          }
        }
        Stmt::Block(block) => printer.block(block),
      }
    }

    printer.out
  }
}

#[derive(Default)]
struct Printer {
  out: String,
  started: bool,
}

impl Printer {
  fn separate(&mut self, blank_before: bool) {
    if self.started && blank_before {
      self.out.push('\n');
    }
    self.started = true;
  }

  fn text(&mut self, indent: bool, text: &str) {
    if indent {
      self.out.push('\t');
    }
    self.out.push_str(text);
    self.out.push('\n');
  }

  fn comments(&mut self, indent: bool, comments: &[String]) {
    for comment in comments {
      self.text(indent, comment);
    }
  }

  fn directive(&mut self, indent: bool, verb: Option<&str>, args: &[String], suffix: Option<&str>) {
    let mut text = verb.map(str::to_string).unwrap_or_default();
    for arg in args {
      if !text.is_empty() {
        text.push(' ');
      }
      text.push_str(arg);
    }
    if let Some(suffix) = suffix {
      text.push(' ');
      text.push_str(suffix);
    }
    self.text(indent, &text);
  }

  fn block(&mut self, block: &Block) {
    if block.lines.iter().all(|line| line.removed) {
      // Only comments survive; they become a plain comment group.
      let orphaned: Vec<&String> = block
        .comments
        .before
        .iter()
        .chain(block.lines.iter().flat_map(|line| &line.comments.before))
        .collect();
      if !orphaned.is_empty() {
        self.separate(block.blank_before);
        for comment in orphaned {
          self.text(false, comment);
        }
      }
      return;
    }

    self.separate(block.blank_before);
    self.comments(false, &block.comments.before);
    self.directive(
      false,
      Some(&block.verb),
      &["(".to_string()],
      block.comments.suffix.as_deref(),
    );

    let mut first = true;
    for line in &block.lines {
      if line.removed && line.comments.before.is_empty() {
        continue;
      }
      if !first && line.blank_before {
        self.out.push('\n');
      }
      first = false;
      self.comments(true, &line.comments.before);
      if !line.removed {
        self.directive(true, None, &line.args, line.comments.suffix.as_deref());
      }
    }
    self.comments(true, &block.closing);
    self.text(false, ")");
  }
}

/// Tokens and trailing comment of one physical line.
struct Lexed {
  tokens: Vec<String>,
  comment: Option<String>,
}

fn lex_line(text: &str, line: usize) -> Result<Lexed, SyntaxError> {
  let mut tokens = Vec::new();
  let mut rest = text;

  loop {
    rest = rest.trim_start();
    if rest.is_empty() {
      return Ok(Lexed { tokens, comment: None });
    }
    if rest.starts_with("//") {
      return Ok(Lexed {
        tokens,
        comment: Some(rest.trim_end().to_string()),
      });
    }
    if rest.starts_with("/*") {
      return Err(SyntaxError::new(
        line,
        "module files must use // comments (not /* */ comments)",
      ));
    }

    let len = match rest.as_bytes()[0] {
      b'(' | b')' => 1,
      b'"' => quoted_len(rest, '"', line)?,
      b'`' => quoted_len(rest, '`', line)?,
      _ => {
        let end = rest
          .find(|c: char| c.is_whitespace() || matches!(c, '(' | ')' | '"' | '`'))
          .unwrap_or(rest.len());
        match rest[..end].find("//") {
          Some(comment) => comment,
          None => end,
        }
      }
    };

    tokens.push(rest[..len].to_string());
    rest = &rest[len..];
  }
}

/// Byte length of the quoted token at the start of `text`, quotes included.
fn quoted_len(text: &str, quote: char, line: usize) -> Result<usize, SyntaxError> {
  let mut escaped = false;
  for (index, c) in text.char_indices().skip(1) {
    if escaped {
      escaped = false;
    } else if c == '\\' && quote == '"' {
      escaped = true;
    } else if c == quote {
      return Ok(index + c.len_utf8());
    }
  }
  Err(SyntaxError::new(line, "unterminated quoted string"))
}

fn is_paren(token: &str) -> bool {
  token == "(" || token == ")"
}

#[derive(Default)]
struct Parser {
  stmts: Vec<Stmt>,
  block: Option<Block>,
  comments: Vec<String>,
  comments_blank: bool,
  blank: bool,
}

impl Parser {
  fn run(mut self, text: &str) -> Result<Document, SyntaxError> {
    for (index, raw) in text.lines().enumerate() {
      let line_no = index + 1;
      let lexed = lex_line(raw, line_no)?;
      match (lexed.tokens.is_empty(), lexed.comment) {
        (true, None) => self.blank_line(),
        (true, Some(comment)) => self.comment_line(comment),
        (false, comment) => self.statement(lexed.tokens, comment, line_no)?,
      }
    }

    if let Some(block) = &self.block {
      return Err(SyntaxError::new(
        block.line_no,
        format!("unterminated {} block", block.verb),
      ));
    }

    self.flush_comments();
    Ok(Document { stmts: self.stmts })
  }

  fn blank_line(&mut self) {
    if self.block.is_none() {
      self.flush_comments();
    }
    self.blank = true;
  }

  fn comment_line(&mut self, comment: String) {
    if self.comments.is_empty() {
      self.comments_blank = self.blank;
      self.blank = false;
    }
    self.comments.push(comment);
  }

  fn flush_comments(&mut self) {
    if self.comments.is_empty() {
      return;
    }
    let lines = std::mem::take(&mut self.comments);
    self.stmts.push(Stmt::Comment(CommentGroup {
      lines,
      blank_before: self.comments_blank,
    }));
    self.comments_blank = false;
  }

  /// Pending comments plus whether a blank line preceded them.
  fn take_leading(&mut self) -> (Vec<String>, bool) {
    let blank = if self.comments.is_empty() {
      self.blank
    } else {
      self.comments_blank
    };
    self.blank = false;
    self.comments_blank = false;
    (std::mem::take(&mut self.comments), blank)
  }

  fn statement(&mut self, tokens: Vec<String>, suffix: Option<String>, line_no: usize) -> Result<(), SyntaxError> {
    let (before, blank_before) = self.take_leading();

    if let Some(mut block) = self.block.take() {
      if tokens.len() == 1 && tokens[0] == ")" {
        block.closing.extend(before);
        block.closing.extend(suffix);
        self.stmts.push(Stmt::Block(block));
        return Ok(());
      }
      if tokens.iter().any(|token| is_paren(token)) {
        return Err(SyntaxError::new(line_no, "unexpected parenthesis inside block"));
      }
      block.lines.push(Line {
        verb: block.verb.clone(),
        args: tokens,
        comments: Comments { before, suffix },
        blank_before,
        line_no,
        removed: false,
      });
      self.block = Some(block);
      return Ok(());
    }

    let verb = tokens[0].clone();
    if is_paren(&verb) {
      return Err(SyntaxError::new(line_no, format!("unexpected '{}'", verb)));
    }

    let comments = Comments { before, suffix };
    match &tokens[1..] {
      [open] if open == "(" => {
        self.block = Some(Block {
          verb,
          lines: Vec::new(),
          comments,
          closing: Vec::new(),
          blank_before,
          line_no,
        });
      }
      [open, close] if open == "(" && close == ")" => {
        self.stmts.push(Stmt::Block(Block {
          verb,
          lines: Vec::new(),
          comments,
          closing: Vec::new(),
          blank_before,
          line_no,
        }));
      }
      args if args.iter().any(|token| is_paren(token)) => {
        return Err(SyntaxError::new(line_no, format!("unexpected parenthesis in {} directive", verb)));
      }
      args => {
        self.stmts.push(Stmt::Line(Line {
          args: args.to_vec(),
          comments,
          blank_before,
          line_no,
          removed: false,
          verb,
        }));
      }
    }

    Ok(())
  }
}
