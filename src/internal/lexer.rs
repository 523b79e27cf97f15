use crate::internal::token::{lookup_line, Token, Type};

const LF: char = '\u{000A}';

/// Line cursor over a recipe. Each call to `next_token` consumes one line.
pub struct Lexer {
    initial_len: usize,
    read_len: usize,
    line_num: usize,
    source_code: String,
}

impl Lexer {
    pub fn new(mut input: String) -> Lexer {
        if input.contains('\r') {
            input = input.replace("\r\n", "\n");
        }
        Lexer {
            initial_len: input.len(),
            read_len: 0,
            line_num: 0,
            source_code: input,
        }
    }

    pub fn next_token(&mut self) -> Token {
        if self.is_eof() {
            return Token {
                token_type: Type::EOF,
                literal: String::new(),
                line_num: self.line_num,
            };
        }
        let rest = &self.source_code[self.read_len..];
        let (literal, consumed) = match rest.find(LF) {
            Some(end) => (&rest[..end], end + 1),
            None => (rest, rest.len()),
        };
        let literal = literal.to_string();
        self.read_len += consumed;
        self.line_num += 1;
        Token {
            token_type: lookup_line(&literal),
            literal,
            line_num: self.line_num,
        }
    }

    pub fn peek_token(&mut self) -> Token {
        let saved_len = self.read_len;
        let saved_line_num = self.line_num;

        let token = self.next_token();

        self.read_len = saved_len;
        self.line_num = saved_line_num;

        token
    }

    pub fn skip_blank_lines(&mut self) {
        while self.peek_token().token_type == Type::BLANK {
            self.next_token();
        }
    }

    /// True once the cursor has moved past the last line.
    pub fn is_eof(&self) -> bool {
        self.read_len >= self.initial_len
    }
}
