//! The equation expression language.
//!
//! Equations assign a molecule directly from an arithmetic expression
//! over other molecule names:
//!
//! ```text
//! total = 2 * A + B ** 2 / (K + C) - exp(-D)
//! ```
//!
//! ## Precedence (lowest to highest)
//!
//! 1. `+`, `-` - left associative
//! 2. `*`, `/` - left associative
//! 3. Unary `-`, `+` - prefix
//! 4. `^`, `**` (power) - right associative, binds tighter than unary minus
//! 5. Calls: `exp`, `ln`, `log`, `log10`, `sqrt`, `abs`, `min`, `max`, `pow`
//!
//! Parsing produces an [`Expression`] that still refers to molecules by
//! name. [`Expression::bind`] resolves every name once, producing a
//! [`BoundExpr`] that is evaluated by index in the simulation hot path.

use logos::Logos;
use smallvec::SmallVec;

use crate::error::ExprError;
use crate::id::MolId;

// ── Lexer ──────────────────────────────────────────────────────────

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
enum Token {
    #[regex(r"[0-9]+(\.[0-9]*)?([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    Number(f64),
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("^")]
    #[token("**")]
    Pow,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,
}

impl Token {
    fn text(&self) -> String {
        match self {
            Self::Number(v) => v.to_string(),
            Self::Ident(s) => s.clone(),
            Self::Plus => "+".into(),
            Self::Minus => "-".into(),
            Self::Star => "*".into(),
            Self::Slash => "/".into(),
            Self::Pow => "**".into(),
            Self::LParen => "(".into(),
            Self::RParen => ")".into(),
            Self::Comma => ",".into(),
        }
    }
}

fn tokenize(source: &str) -> Result<Vec<(Token, usize)>, ExprError> {
    let mut out = Vec::new();
    let mut lexer = Token::lexer(source);
    while let Some(tok) = lexer.next() {
        let span = lexer.span();
        match tok {
            Ok(t) => out.push((t, span.start)),
            Err(()) => {
                return Err(ExprError::InvalidToken {
                    position: span.start,
                    text: lexer.slice().to_string(),
                })
            }
        }
    }
    Ok(out)
}

// ── AST ────────────────────────────────────────────────────────────

/// Binary arithmetic operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

/// Built-in functions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Func {
    Exp,
    Ln,
    Log10,
    Sqrt,
    Abs,
    Min,
    Max,
    Pow,
}

impl Func {
    fn lookup(name: &str, arity: usize) -> Option<Func> {
        let f = match name {
            "exp" => Func::Exp,
            "ln" | "log" => Func::Ln,
            "log10" => Func::Log10,
            "sqrt" => Func::Sqrt,
            "abs" => Func::Abs,
            "min" => Func::Min,
            "max" => Func::Max,
            "pow" => Func::Pow,
            _ => return None,
        };
        let expected = match f {
            Func::Min | Func::Max | Func::Pow => 2,
            _ => 1,
        };
        (arity == expected).then_some(f)
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Node<V> {
    Const(f64),
    Var(V),
    Neg(Box<Node<V>>),
    Binary(BinOp, Box<Node<V>>, Box<Node<V>>),
    Call(Func, Vec<Node<V>>),
}

impl<V> Node<V> {
    fn map_vars<W, E>(&self, f: &mut impl FnMut(&V) -> Result<W, E>) -> Result<Node<W>, E> {
        Ok(match self {
            Node::Const(c) => Node::Const(*c),
            Node::Var(v) => Node::Var(f(v)?),
            Node::Neg(inner) => Node::Neg(Box::new(inner.map_vars(f)?)),
            Node::Binary(op, l, r) => {
                Node::Binary(*op, Box::new(l.map_vars(f)?), Box::new(r.map_vars(f)?))
            }
            Node::Call(func, args) => Node::Call(
                *func,
                args.iter()
                    .map(|a| a.map_vars(f))
                    .collect::<Result<Vec<_>, E>>()?,
            ),
        })
    }

    fn visit_vars<'a>(&'a self, f: &mut impl FnMut(&'a V)) {
        match self {
            Node::Const(_) => {}
            Node::Var(v) => f(v),
            Node::Neg(inner) => inner.visit_vars(f),
            Node::Binary(_, l, r) => {
                l.visit_vars(f);
                r.visit_vars(f);
            }
            Node::Call(_, args) => args.iter().for_each(|a| a.visit_vars(f)),
        }
    }
}

impl Node<MolId> {
    fn eval(&self, conc: &[f64]) -> f64 {
        match self {
            Node::Const(c) => *c,
            Node::Var(id) => conc[id.index()],
            Node::Neg(inner) => -inner.eval(conc),
            Node::Binary(op, l, r) => {
                let (a, b) = (l.eval(conc), r.eval(conc));
                match op {
                    BinOp::Add => a + b,
                    BinOp::Sub => a - b,
                    BinOp::Mul => a * b,
                    BinOp::Div => a / b,
                    BinOp::Pow => a.powf(b),
                }
            }
            Node::Call(func, args) => {
                let x = args[0].eval(conc);
                match func {
                    Func::Exp => x.exp(),
                    Func::Ln => x.ln(),
                    Func::Log10 => x.log10(),
                    Func::Sqrt => x.sqrt(),
                    Func::Abs => x.abs(),
                    Func::Min => x.min(args[1].eval(conc)),
                    Func::Max => x.max(args[1].eval(conc)),
                    Func::Pow => x.powf(args[1].eval(conc)),
                }
            }
        }
    }
}

// ── Parser ─────────────────────────────────────────────────────────

/// Deepest expression tree, or paren/unary nesting, the parser accepts.
///
/// Parsing, binding and evaluation all recurse over the tree, so the
/// limit keeps every pass within a bounded stack.
pub const MAX_EXPR_DEPTH: usize = 256;

const UNARY_PREC: u8 = 25;

fn binary_op_info(token: &Token) -> Option<(u8, bool, BinOp)> {
    // (precedence, right-associative, op)
    match token {
        Token::Plus => Some((10, false, BinOp::Add)),
        Token::Minus => Some((10, false, BinOp::Sub)),
        Token::Star => Some((20, false, BinOp::Mul)),
        Token::Slash => Some((20, false, BinOp::Div)),
        Token::Pow => Some((30, true, BinOp::Pow)),
        _ => None,
    }
}

/// A parsed subtree and its height.
type Parsed = (Node<String>, usize);

struct TokenStream {
    tokens: Vec<(Token, usize)>,
    pos: usize,
    /// Byte offset reported for errors past the last token.
    end: usize,
    /// Active `parse_pratt` frames.
    nesting: usize,
}

impl TokenStream {
    fn new(tokens: Vec<(Token, usize)>, end: usize) -> Self {
        Self {
            tokens,
            pos: 0,
            end,
            nesting: 0,
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn position(&self) -> usize {
        self.tokens.get(self.pos).map_or(self.end, |(_, p)| *p)
    }

    fn advance(&mut self) -> Option<(Token, usize)> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn expect(&mut self, want: Token, expected: &'static str) -> Result<(), ExprError> {
        match self.advance() {
            Some((t, _)) if t == want => Ok(()),
            Some((t, position)) => Err(ExprError::UnexpectedToken {
                position,
                expected,
                found: t.text(),
            }),
            None => Err(ExprError::UnexpectedEnd { expected }),
        }
    }
}

fn check_depth(depth: usize, position: usize) -> Result<usize, ExprError> {
    if depth > MAX_EXPR_DEPTH {
        return Err(ExprError::TooDeep { position });
    }
    Ok(depth)
}

fn parse_pratt(stream: &mut TokenStream, min_prec: u8) -> Result<Parsed, ExprError> {
    if stream.nesting >= MAX_EXPR_DEPTH {
        return Err(ExprError::TooDeep {
            position: stream.position(),
        });
    }
    stream.nesting += 1;
    let result = parse_binary(stream, min_prec);
    stream.nesting -= 1;
    result
}

fn parse_binary(stream: &mut TokenStream, min_prec: u8) -> Result<Parsed, ExprError> {
    let (mut left, mut depth) = parse_prefix(stream)?;

    while let Some(token) = stream.peek() {
        let Some((prec, right_assoc, op)) = binary_op_info(token) else {
            break;
        };
        if prec < min_prec {
            break;
        }
        let position = stream.position();
        stream.advance();
        let next_prec = if right_assoc { prec } else { prec + 1 };
        let (right, right_depth) = parse_pratt(stream, next_prec)?;
        depth = check_depth(depth.max(right_depth) + 1, position)?;
        left = Node::Binary(op, Box::new(left), Box::new(right));
    }

    Ok((left, depth))
}

fn parse_prefix(stream: &mut TokenStream) -> Result<Parsed, ExprError> {
    match stream.peek() {
        Some(Token::Minus) => {
            let position = stream.position();
            stream.advance();
            let (operand, depth) = parse_pratt(stream, UNARY_PREC)?;
            let depth = check_depth(depth + 1, position)?;
            Ok((Node::Neg(Box::new(operand)), depth))
        }
        Some(Token::Plus) => {
            stream.advance();
            parse_pratt(stream, UNARY_PREC)
        }
        _ => parse_atom(stream),
    }
}

fn parse_atom(stream: &mut TokenStream) -> Result<Parsed, ExprError> {
    const EXPECTED: &str = "number, name or '('";
    match stream.advance() {
        Some((Token::Number(v), _)) => Ok((Node::Const(v), 1)),
        Some((Token::Ident(name), position)) => {
            if stream.peek() != Some(&Token::LParen) {
                return Ok((Node::Var(name), 1));
            }
            stream.advance();
            let mut args = Vec::new();
            let mut depth = 0;
            if stream.peek() != Some(&Token::RParen) {
                loop {
                    let (arg, arg_depth) = parse_pratt(stream, 0)?;
                    args.push(arg);
                    depth = depth.max(arg_depth);
                    if stream.peek() == Some(&Token::Comma) {
                        stream.advance();
                    } else {
                        break;
                    }
                }
            }
            stream.expect(Token::RParen, "')'")?;
            let func = Func::lookup(&name, args.len()).ok_or(ExprError::UnknownFunction {
                name,
                arity: args.len(),
            })?;
            let depth = check_depth(depth + 1, position)?;
            Ok((Node::Call(func, args), depth))
        }
        Some((Token::LParen, _)) => {
            let inner = parse_pratt(stream, 0)?;
            stream.expect(Token::RParen, "')'")?;
            Ok(inner)
        }
        Some((t, position)) => Err(ExprError::UnexpectedToken {
            position,
            expected: EXPECTED,
            found: t.text(),
        }),
        None => Err(ExprError::UnexpectedEnd { expected: EXPECTED }),
    }
}

// ── Public types ───────────────────────────────────────────────────

/// A parsed expression referring to molecules by name.
#[derive(Clone, Debug, PartialEq)]
pub struct Expression {
    source: String,
    root: Node<String>,
}

impl Expression {
    /// Parse `source` into an expression tree.
    pub fn parse(source: &str) -> Result<Self, ExprError> {
        let tokens = tokenize(source)?;
        if tokens.is_empty() {
            return Err(ExprError::Empty);
        }
        let mut stream = TokenStream::new(tokens, source.len());
        let (root, _) = parse_pratt(&mut stream, 0)?;
        if let Some((t, position)) = stream.advance() {
            return Err(ExprError::UnexpectedToken {
                position,
                expected: "operator or end of expression",
                found: t.text(),
            });
        }
        Ok(Self {
            source: source.to_string(),
            root,
        })
    }

    /// The original source text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Distinct molecule names referenced, in first-appearance order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        self.root.visit_vars(&mut |n| {
            if !names.contains(&n.as_str()) {
                names.push(n.as_str());
            }
        });
        names
    }

    /// Resolve every name to a molecule id.
    ///
    /// `lookup` is called once per reference; the first error it returns
    /// aborts binding.
    pub fn bind<E>(
        &self,
        mut lookup: impl FnMut(&str) -> Result<MolId, E>,
    ) -> Result<BoundExpr, E> {
        let root = self.root.map_vars(&mut |n: &String| lookup(n.as_str()))?;
        let mut inputs: SmallVec<[MolId; 4]> = SmallVec::new();
        root.visit_vars(&mut |id| inputs.push(*id));
        inputs.sort_unstable();
        inputs.dedup();
        Ok(BoundExpr { root, inputs })
    }
}

/// An expression with every molecule reference resolved to an index.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundExpr {
    root: Node<MolId>,
    inputs: SmallVec<[MolId; 4]>,
}

impl BoundExpr {
    /// Evaluate against a dense concentration vector.
    pub fn eval(&self, conc: &[f64]) -> f64 {
        self.root.eval(conc)
    }

    /// Distinct molecules read by the expression, sorted by id.
    pub fn inputs(&self) -> &[MolId] {
        &self.inputs
    }
}
