//! Recursive-descent parser for filter expressions.
//!
//! Precedence, loosest first: `||`, `&&`, equality, relational,
//! additive, multiplicative, unary, postfix (member access and calls).

use super::ast::{BinaryOp, ExprNode, Literal, LogicalOp, UnaryOp};
use super::errors::{ParseError, ParseResult};
use super::lexer::{tokenize, Token};

/// Parses one filter expression string into an AST.
pub fn parse_expression(src: &str) -> ParseResult<ExprNode> {
    let tokens = tokenize(src)?;
    let mut parser = Parser { tokens, pos: 0 };
    let node = parser.parse_or()?;
    if let Some(extra) = parser.peek() {
        return Err(ParseError::new("unexpected trailing input", extra.describe()));
    }
    Ok(node)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: Token, context: &str) -> ParseResult<()> {
        if self.eat(&expected) {
            Ok(())
        } else {
            let found = self
                .peek()
                .map_or_else(|| "end of input".to_string(), Token::describe);
            Err(ParseError::new(
                format!("expected {} {}", expected.describe(), context),
                found,
            ))
        }
    }

    fn parse_or(&mut self) -> ParseResult<ExprNode> {
        let mut left = self.parse_and()?;
        while self.eat(&Token::OrOr) {
            let right = self.parse_and()?;
            left = ExprNode::Logical {
                op: LogicalOp::Or,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> ParseResult<ExprNode> {
        let mut left = self.parse_equality()?;
        while self.eat(&Token::AndAnd) {
            let right = self.parse_equality()?;
            left = ExprNode::Logical {
                op: LogicalOp::And,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> ParseResult<ExprNode> {
        let mut left = self.parse_relational()?;
        loop {
            let op = match self.peek() {
                Some(Token::EqEq) => BinaryOp::Eq,
                Some(Token::NotEq) => BinaryOp::Ne,
                _ => break,
            };
            self.pos += 1;
            let right = self.parse_relational()?;
            left = ExprNode::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_relational(&mut self) -> ParseResult<ExprNode> {
        let mut left = self.parse_additive()?;
        loop {
            let op = match self.peek() {
                Some(Token::Gte) => BinaryOp::Gte,
                Some(Token::Lte) => BinaryOp::Lte,
                Some(Token::Gt) => BinaryOp::Gt,
                Some(Token::Lt) => BinaryOp::Lt,
                _ => break,
            };
            self.pos += 1;
            let right = self.parse_additive()?;
            left = ExprNode::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> ParseResult<ExprNode> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => break,
            };
            self.pos += 1;
            let right = self.parse_multiplicative()?;
            left = ExprNode::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> ParseResult<ExprNode> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                Some(Token::Percent) => BinaryOp::Mod,
                _ => break,
            };
            self.pos += 1;
            let right = self.parse_unary()?;
            left = ExprNode::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> ParseResult<ExprNode> {
        let op = match self.peek() {
            Some(Token::Bang) => Some(UnaryOp::Not),
            Some(Token::Minus) => Some(UnaryOp::Neg),
            _ => None,
        };
        if let Some(op) = op {
            self.pos += 1;
            let arg = self.parse_unary()?;
            return Ok(ExprNode::Unary {
                op,
                arg: Box::new(arg),
            });
        }
        self.parse_postfix()
    }

    /// Member access and call chains: `file.inFolder("x").length`
    fn parse_postfix(&mut self) -> ParseResult<ExprNode> {
        let mut node = self.parse_primary()?;
        loop {
            if self.eat(&Token::Dot) {
                let property = match self.advance() {
                    Some(Token::Ident(name)) => name,
                    other => {
                        let found = other
                            .map_or_else(|| "end of input".to_string(), |t| t.describe());
                        return Err(ParseError::new("expected property name after '.'", found));
                    }
                };
                node = ExprNode::Member {
                    object: Box::new(node),
                    property,
                };
                continue;
            }
            if self.eat(&Token::LParen) {
                let mut args = Vec::new();
                if !self.eat(&Token::RParen) {
                    loop {
                        args.push(self.parse_or()?);
                        if self.eat(&Token::Comma) {
                            continue;
                        }
                        self.expect(Token::RParen, "to close argument list")?;
                        break;
                    }
                }
                node = ExprNode::Call {
                    callee: Box::new(node),
                    args,
                };
                continue;
            }
            break;
        }
        Ok(node)
    }

    fn parse_primary(&mut self) -> ParseResult<ExprNode> {
        match self.advance() {
            Some(Token::Num(n)) => Ok(ExprNode::Literal(Literal::Num(n))),
            Some(Token::Str(s)) => Ok(ExprNode::Literal(Literal::Str(s))),
            Some(Token::True) => Ok(ExprNode::Literal(Literal::Bool(true))),
            Some(Token::False) => Ok(ExprNode::Literal(Literal::Bool(false))),
            Some(Token::Null) => Ok(ExprNode::Literal(Literal::Null)),
            Some(Token::Ident(name)) => Ok(ExprNode::Identifier(name)),
            Some(Token::LParen) => {
                let node = self.parse_or()?;
                self.expect(Token::RParen, "to close group")?;
                Ok(node)
            }
            other => {
                let found = other.map_or_else(|| "end of input".to_string(), |t| t.describe());
                Err(ParseError::new("expected an expression", found))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(name: &str) -> ExprNode {
        ExprNode::Identifier(name.into())
    }

    #[test]
    fn test_parse_member_comparison() {
        let node = parse_expression("file.ext == \"md\"").unwrap();
        assert_eq!(
            node,
            ExprNode::Binary {
                op: BinaryOp::Eq,
                left: Box::new(ExprNode::Member {
                    object: Box::new(ident("file")),
                    property: "ext".into(),
                }),
                right: Box::new(ExprNode::Literal(Literal::Str("md".into()))),
            }
        );
    }

    #[test]
    fn test_parse_call_with_args() {
        let node = parse_expression("file.inFolder(\"notes\")").unwrap();
        match node {
            ExprNode::Call { callee, args } => {
                assert_eq!(args.len(), 1);
                assert!(matches!(*callee, ExprNode::Member { .. }));
            }
            other => panic!("expected call, got {other:?}"),
        }
    }

    #[test]
    fn test_precedence_and_over_or() {
        // a || b && c parses as a || (b && c)
        let node = parse_expression("a || b && c").unwrap();
        match node {
            ExprNode::Logical {
                op: LogicalOp::Or,
                right,
                ..
            } => {
                assert!(matches!(
                    *right,
                    ExprNode::Logical {
                        op: LogicalOp::And,
                        ..
                    }
                ));
            }
            other => panic!("expected ||, got {other:?}"),
        }
    }

    #[test]
    fn test_precedence_arithmetic() {
        // 1 + 2 * 3 parses as 1 + (2 * 3)
        let node = parse_expression("1 + 2 * 3").unwrap();
        match node {
            ExprNode::Binary {
                op: BinaryOp::Add,
                right,
                ..
            } => {
                assert!(matches!(
                    *right,
                    ExprNode::Binary {
                        op: BinaryOp::Mul,
                        ..
                    }
                ));
            }
            other => panic!("expected +, got {other:?}"),
        }
    }

    #[test]
    fn test_unary_negation() {
        let node = parse_expression("!done").unwrap();
        assert_eq!(
            node,
            ExprNode::Unary {
                op: UnaryOp::Not,
                arg: Box::new(ident("done")),
            }
        );
    }

    #[test]
    fn test_parenthesized_grouping() {
        let node = parse_expression("(a + b) * c").unwrap();
        match node {
            ExprNode::Binary {
                op: BinaryOp::Mul,
                left,
                ..
            } => {
                assert!(matches!(
                    *left,
                    ExprNode::Binary {
                        op: BinaryOp::Add,
                        ..
                    }
                ));
            }
            other => panic!("expected *, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_error_carries_fragment() {
        let err = parse_expression("price >").unwrap_err();
        assert_eq!(err.fragment, "end of input");

        let err = parse_expression("price > 10 extra").unwrap_err();
        assert_eq!(err.fragment, "extra");
    }

    #[test]
    fn test_roundtrip_display_reparse() {
        let sources = [
            "file.ext == \"md\"",
            "price > 10 && file.inFolder(\"notes\")",
            "!(done || archived)",
            "(a + b) * c - -d",
            "tags.contains(\"rust\", \"db\")",
            "note.title.lower().startsWith(\"the\")",
            "if(score >= 0.5, \"pass\", \"fail\")",
        ];
        for src in sources {
            let first = parse_expression(src).unwrap();
            let reparsed = parse_expression(&first.to_string()).unwrap();
            assert_eq!(first, reparsed, "round-trip failed for {src}");
        }
    }
}
