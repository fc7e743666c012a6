//! Token definitions

use logos::Logos;

/// Pascal token
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r\f]+")]
#[logos(skip r"\{[^}]*\}")]
#[logos(skip r"\(\*([^*]|\*+[^*)])*\*+\)")]
pub enum Token {
    // Keywords
    #[token("program", ignore(case))]
    Program,
    #[token("var", ignore(case))]
    Var,
    #[token("begin", ignore(case))]
    Begin,
    #[token("end", ignore(case))]
    End,
    #[token("if", ignore(case))]
    If,
    #[token("then", ignore(case))]
    Then,
    #[token("else", ignore(case))]
    Else,
    #[token("repeat", ignore(case))]
    Repeat,
    #[token("until", ignore(case))]
    Until,
    #[token("procedure", ignore(case))]
    Procedure,
    #[token("function", ignore(case))]
    Function,
    #[token("div", ignore(case))]
    Div,

    // Type names
    #[token("integer", ignore(case))]
    TyInteger,
    #[token("real", ignore(case))]
    TyReal,

    // Literals
    #[regex(r"[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
    IntConst(i64),
    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    RealConst(f64),
    #[regex(r"'([^']|'')*'", |lex| {
        let s = lex.slice();
        s[1..s.len() - 1].replace("''", "'")
    })]
    StrConst(String),

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),

    // Operators
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token(":=")]
    Assign,
    #[token("=")]
    Eq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,

    // Delimiters
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,

    // Punctuation
    #[token(";")]
    Semi,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,

    /// End of input, appended by [`super::Lexer`]
    Eof,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Program => write!(f, "`PROGRAM`"),
            Token::Var => write!(f, "`VAR`"),
            Token::Begin => write!(f, "`BEGIN`"),
            Token::End => write!(f, "`END`"),
            Token::If => write!(f, "`IF`"),
            Token::Then => write!(f, "`THEN`"),
            Token::Else => write!(f, "`ELSE`"),
            Token::Repeat => write!(f, "`REPEAT`"),
            Token::Until => write!(f, "`UNTIL`"),
            Token::Procedure => write!(f, "`PROCEDURE`"),
            Token::Function => write!(f, "`FUNCTION`"),
            Token::Div => write!(f, "`DIV`"),
            Token::TyInteger => write!(f, "`INTEGER`"),
            Token::TyReal => write!(f, "`REAL`"),
            Token::IntConst(n) => write!(f, "integer constant `{n}`"),
            Token::RealConst(x) => write!(f, "real constant `{x}`"),
            Token::StrConst(s) => write!(f, "string constant '{s}'"),
            Token::Ident(name) => write!(f, "identifier `{name}`"),
            Token::Plus => write!(f, "`+`"),
            Token::Minus => write!(f, "`-`"),
            Token::Star => write!(f, "`*`"),
            Token::Slash => write!(f, "`/`"),
            Token::Assign => write!(f, "`:=`"),
            Token::Eq => write!(f, "`=`"),
            Token::Lt => write!(f, "`<`"),
            Token::Gt => write!(f, "`>`"),
            Token::LParen => write!(f, "`(`"),
            Token::RParen => write!(f, "`)`"),
            Token::Semi => write!(f, "`;`"),
            Token::Colon => write!(f, "`:`"),
            Token::Comma => write!(f, "`,`"),
            Token::Dot => write!(f, "`.`"),
            Token::Eof => write!(f, "end of input"),
        }
    }
}
