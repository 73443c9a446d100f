use crate::validator::{BracketValidator, JUSTIFICATION_MARKER, MAX_NESTING, Side};
use crate::{SyntaxKind, SyntaxNode, lexer::Lexer};
use rowan::{GreenNode, GreenNodeBuilder, TextRange, TextSize};

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SyntaxError {
    pub message: String,
    pub range: TextRange,
}

/// Builds a lossless syntax tree of one proof line.
///
/// The formula is split with the same leftmost-top-level rule the validator
/// uses, so the tree shows exactly which connective was taken as the main one.
/// Problems never stop the parser; they are collected in
/// [`ParseResult::errors`] and the tree still covers every byte of the input.
pub struct Parser<'a> {
    tokens: Vec<(SyntaxKind, &'a str)>,
    /// Start offset of every token, plus the end of the input.
    offsets: Vec<TextSize>,
    cursor: usize,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<SyntaxError>,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Self::with_marker(input, JUSTIFICATION_MARKER)
    }

    pub fn with_marker(input: &'a str, marker: char) -> Self {
        let tokens: Vec<_> = Lexer::with_justification(input, marker).collect();
        let mut offsets = Vec::with_capacity(tokens.len() + 1);
        let mut offset = TextSize::from(0);
        for (_, text) in &tokens {
            offsets.push(offset);
            offset += TextSize::of(*text);
        }
        offsets.push(offset);

        Self {
            tokens,
            offsets,
            cursor: 0,
            builder: GreenNodeBuilder::new(),
            errors: Vec::new(),
        }
    }

    pub fn parse(mut self) -> ParseResult {
        self.builder.start_node(SyntaxKind::Root.into());

        let end = self
            .tokens
            .iter()
            .position(|(kind, _)| *kind == SyntaxKind::Justification)
            .unwrap_or(self.tokens.len());

        self.report_invalid_symbols(end);
        if self.check_brackets(end) {
            self.formula(end, 0);
        } else {
            self.unbalanced(end);
        }

        // Justification
        while self.cursor < self.tokens.len() {
            self.bump();
        }

        self.builder.finish_node();
        ParseResult {
            green_node: self.builder.finish(),
            errors: self.errors,
        }
    }

    fn bump(&mut self) {
        if let Some(&(kind, text)) = self.tokens.get(self.cursor) {
            self.builder.token(kind.into(), text);
            self.cursor += 1;
        }
    }

    fn range(&self, index: usize) -> TextRange {
        TextRange::new(self.offsets[index], self.offsets[index + 1])
    }

    fn error(&mut self, message: String, range: TextRange) {
        self.errors.push(SyntaxError { message, range });
    }

    fn report_invalid_symbols(&mut self, end: usize) {
        for index in 0..end {
            let (kind, text) = self.tokens[index];
            if kind == SyntaxKind::Error {
                self.error(format!("Invalid TFL symbol '{text}'"), self.range(index));
            }
        }
    }

    /// Returns `true` when every bracket before `end` is matched.
    fn check_brackets(&mut self, end: usize) -> bool {
        let mut validator = BracketValidator::new();
        for index in 0..end {
            let (kind, text) = self.tokens[index];
            if kind.is_open_bracket() || kind.is_close_bracket() {
                if let Some(c) = text.chars().next() {
                    validator.feed(index, c);
                }
            }
        }
        validator.finish();

        for error in validator.errors() {
            self.error(error.to_string(), self.range(error.position()));
        }
        !validator.has_errors()
    }

    /// Index one past the last non-trivia token before `end`.
    fn trimmed_end(&self, end: usize) -> usize {
        let mut stop = end;
        while stop > self.cursor && self.tokens[stop - 1].0.is_trivia() {
            stop -= 1;
        }
        stop
    }

    fn skip_trivia(&mut self, end: usize) {
        while self.cursor < end && self.tokens[self.cursor].0.is_trivia() {
            self.bump();
        }
    }

    fn unbalanced(&mut self, end: usize) {
        self.skip_trivia(end);
        let stop = self.trimmed_end(end);
        if self.cursor < stop {
            self.builder.start_node(SyntaxKind::Unbalanced.into());
            while self.cursor < stop {
                self.bump();
            }
            self.builder.finish_node();
        }
        self.skip_trivia(end);
    }

    /// Parses the tokens up to `end`. Surrounding whitespace stays outside the
    /// formula node; a blank range produces no node at all.
    fn formula(&mut self, end: usize, depth: usize) {
        self.skip_trivia(end);
        let stop = self.trimmed_end(end);
        if self.cursor < stop {
            if depth > MAX_NESTING {
                self.too_deep(stop);
            } else {
                self.structure(stop, depth);
            }
        }
        self.skip_trivia(end);
    }

    /// Keeps the rest of an over-nested formula as one flat node.
    fn too_deep(&mut self, end: usize) {
        let range = TextRange::new(self.offsets[self.cursor], self.offsets[end]);
        self.error(
            format!("Formula is nested more than {MAX_NESTING} levels deep"),
            range,
        );
        self.builder.start_node(SyntaxKind::Unbalanced.into());
        while self.cursor < end {
            self.bump();
        }
        self.builder.finish_node();
    }

    fn operand(&mut self, end: usize, side: Side, connective: usize, depth: usize) {
        let blank = self.tokens[self.cursor..end]
            .iter()
            .all(|(kind, _)| kind.is_trivia());
        if blank {
            let text = self.tokens[connective].1;
            self.error(
                format!("Missing {side} operand for '{text}'"),
                self.range(connective),
            );
        }
        self.formula(end, depth);
    }

    /// Bracket depth after each token in `cursor..end`.
    fn depths(&self, end: usize) -> Vec<i32> {
        let mut depth = 0;
        self.tokens[self.cursor..end]
            .iter()
            .map(|(kind, _)| {
                if kind.is_open_bracket() {
                    depth += 1;
                } else if kind.is_close_bracket() {
                    depth -= 1;
                }
                depth
            })
            .collect()
    }

    fn structure(&mut self, end: usize, depth: usize) {
        let start = self.cursor;
        let depths = self.depths(end);

        let wrapped = match depths.as_slice() {
            [first, middle @ .., last] => {
                *first == 1 && *last == 0 && middle.iter().all(|d| *d > 0)
            }
            _ => false,
        };
        let main = if wrapped {
            None
        } else {
            (start..end).find(|index| {
                matches!(
                    self.tokens[*index].0,
                    SyntaxKind::Connective | SyntaxKind::Negation
                ) && depths[index - start] == 0
            })
        };
        drop(depths);

        if wrapped {
            self.builder.start_node(SyntaxKind::Group.into());
            self.bump();
            self.formula(end - 1, depth + 1);
            self.bump();
            self.builder.finish_node();
            return;
        }

        let Some(main) = main else {
            self.builder.start_node(SyntaxKind::Sentence.into());
            while self.cursor < end {
                self.bump();
            }
            self.builder.finish_node();
            return;
        };

        let negation = self.tokens[main].0 == SyntaxKind::Negation;
        if negation && main == start {
            self.builder.start_node(SyntaxKind::Unary.into());
            self.bump();
            self.operand(end, Side::Right, main, depth + 1);
            self.builder.finish_node();
            return;
        }

        self.builder.start_node(SyntaxKind::Binary.into());
        if negation {
            let text = self.tokens[main].1;
            self.error(
                format!("Negation '{text}' cannot take a left operand"),
                self.range(main),
            );
            self.formula(main, depth + 1);
        } else {
            self.operand(main, Side::Left, main, depth + 1);
        }
        self.bump();
        self.operand(end, Side::Right, main, depth + 1);
        self.builder.finish_node();
    }
}

pub struct ParseResult {
    pub green_node: GreenNode,
    pub errors: Vec<SyntaxError>,
}

impl ParseResult {
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green_node.clone())
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

pub fn parse(input: &str) -> ParseResult {
    Parser::new(input).parse()
}
