use crate::error_handling::*;
use crate::scanning::*;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UnaryOperator {
    positive,
    negative,
}

impl UnaryOperator {
    pub fn call(&self, value: f64) -> f64 {
        use UnaryOperator::*;
        match self {
            positive => value,
            negative => -value,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct InvalidOperator;

impl FromStr for UnaryOperator {
    type Err = InvalidOperator;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        use UnaryOperator::*;
        match s {
            "+" => Ok(positive),
            "-" => Ok(negative),
            _ => Err(InvalidOperator),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BinaryOperator {
    addition,
    subtraction,
    multiplication,
    division,
    floor_division,
    modulo,
    exponentiation,
}

impl BinaryOperator {
    pub fn call(&self, left: f64, right: f64) -> Result<f64> {
        use BinaryOperator::*;

        match self {
            addition => Ok(left + right),
            subtraction => Ok(left - right),
            multiplication => Ok(left * right),
            division => {
                if right == 0.0 {
                    Err(CalcError::division_by_zero)
                } else {
                    Ok(left / right)
                }
            },
            floor_division => {
                if right == 0.0 {
                    Err(CalcError::division_by_zero)
                } else {
                    Ok((left / right).floor())
                }
            },
            // result carries the sign of the divisor
            modulo => {
                if right == 0.0 {
                    Err(CalcError::division_by_zero)
                } else {
                    Ok(left - right * (left / right).floor())
                }
            },
            exponentiation => {
                if left < 0.0 && right.fract() != 0.0 {
                    Err(CalcError::domain(
                        "negative base raised to a fractional exponent".into(),
                    ))
                } else {
                    Ok(left.powf(right))
                }
            },
        }
    }
}

impl FromStr for BinaryOperator {
    type Err = InvalidOperator;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        use BinaryOperator::*;
        match s {
            "+" => Ok(addition),
            "-" => Ok(subtraction),
            "*" => Ok(multiplication),
            "/" => Ok(division),
            "//" => Ok(floor_division),
            "%" => Ok(modulo),
            "**" | "^" => Ok(exponentiation),
            _ => Err(InvalidOperator),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Operator {
    unary(UnaryOperator),
    binary(BinaryOperator),
}

impl Operator {
    fn precedence(&self) -> i32 {
        use BinaryOperator::*;
        use Operator::*;
        match self {
            binary(operator) => match operator {
                addition | subtraction => 1,
                multiplication | division | floor_division | modulo => 2,
                exponentiation => 4,
            },
            unary(_) => 3,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FunctionName {
    sin, cos, tan,
    asin, acos, atan,
    exp, log, log10, sqrt,
    floor, ceil, round, abs,
    factorial,
}

#[derive(Debug, PartialEq, Eq)]
pub struct UnknownFunction;

impl FromStr for FunctionName {
    type Err = UnknownFunction;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        use FunctionName::*;
        match s {
            "sin" => Ok(sin),
            "cos" => Ok(cos),
            "tan" => Ok(tan),
            "asin" => Ok(asin),
            "acos" => Ok(acos),
            "atan" => Ok(atan),
            "exp" => Ok(exp),
            "log" | "ln" => Ok(log),
            "log10" => Ok(log10),
            "sqrt" => Ok(sqrt),
            "floor" => Ok(floor),
            "ceil" => Ok(ceil),
            "round" => Ok(round),
            "abs" => Ok(abs),
            "factorial" => Ok(factorial),
            _ => Err(UnknownFunction),
        }
    }
}

/// The whole grammar. The parser constructs these five shapes and nothing
/// else; unresolved names survive as `identifier` until evaluation.
#[derive(Clone, Debug, PartialEq)]
pub enum SyntaxNode {
    number(f64),
    identifier(String),
    unary(UnaryOperator, Box<SyntaxNode>),
    binary(BinaryOperator, Box<SyntaxNode>, Box<SyntaxNode>),
    call(FunctionName, Box<SyntaxNode>),
}

enum StackNode {
    operator(Operator),
    function(FunctionName),
    paren,
}

struct Yard {
    output: Vec<SyntaxNode>,
    stack: Vec<StackNode>,
}

impl Yard {
    fn new() -> Self {
        Self{output: Vec::new(), stack: Vec::new()}
    }

    fn pop_operand(&mut self) -> Result<SyntaxNode> {
        self.output
            .pop()
            .ok_or_else(|| CalcError::syntax("malformed expression".into()))
    }

    fn reduce(&mut self, node: StackNode) -> Result<()> {
        match node {
            StackNode::operator(Operator::unary(operator)) => {
                let operand = self.pop_operand()?;
                self.output.push(SyntaxNode::unary(operator, Box::new(operand)));
            },
            StackNode::operator(Operator::binary(operator)) => {
                let right = self.pop_operand()?;
                let left = self.pop_operand()?;
                self.output.push(SyntaxNode::binary(operator, Box::new(left), Box::new(right)));
            },
            StackNode::function(function) => {
                let argument = self.pop_operand()?;
                self.output.push(SyntaxNode::call(function, Box::new(argument)));
            },
            StackNode::paren => {
                return Err(CalcError::syntax("could not find matching ')'".into()));
            },
        }
        Ok(())
    }

    fn add_number(&mut self, content: &str) -> Result<()> {
        let value = content
            .parse()
            .map_err(|_| CalcError::syntax(format!("'{content}' is not a valid number")))?;
        self.output.push(SyntaxNode::number(value));
        Ok(())
    }

    fn add_identifier(&mut self, name: &str) {
        self.output.push(SyntaxNode::identifier(name.into()));
    }

    // Prefix operators bind to the operand still being read, so nothing pops.
    fn add_unary(&mut self, operator: UnaryOperator) {
        self.stack.push(StackNode::operator(Operator::unary(operator)));
    }

    fn add_binary(&mut self, operator: BinaryOperator) -> Result<()> {
        let operator = Operator::binary(operator);
        let precedence = operator.precedence();
        let right_associative = precedence == 4;

        while let Some(StackNode::operator(top)) = self.stack.last() {
            let top_precedence = top.precedence();
            if top_precedence > precedence
                || (top_precedence == precedence && !right_associative)
            {
                let node = self.stack.pop().unwrap();
                self.reduce(node)?;
            } else {
                break;
            }
        }
        self.stack.push(StackNode::operator(operator));
        Ok(())
    }

    // Postfix '!' applies to the most recent complete operand; 'n!' and
    // 'factorial(n)' come out as the same node.
    fn add_factorial(&mut self) -> Result<()> {
        let operand = self.pop_operand()?;
        self.output.push(SyntaxNode::call(FunctionName::factorial, Box::new(operand)));
        Ok(())
    }

    fn add_function(&mut self, function: FunctionName) {
        self.stack.push(StackNode::function(function));
    }

    fn add_left_paren(&mut self) {
        self.stack.push(StackNode::paren);
    }

    fn add_right_paren(&mut self) -> Result<()> {
        while let Some(stack_node) = self.stack.pop() {
            if let StackNode::paren = stack_node {
                if let Some(StackNode::function(_)) = self.stack.last() {
                    let Some(StackNode::function(function)) = self.stack.pop() else {
                        unreachable!();
                    };
                    let argument = self.pop_operand()?;
                    self.output.push(SyntaxNode::call(function, Box::new(argument)));
                }
                return Ok(());
            }
            self.reduce(stack_node)?;
        }
        Err(CalcError::syntax("could not find matching '('".into()))
    }

    fn finish(mut self) -> Result<SyntaxNode> {
        while let Some(stack_node) = self.stack.pop() {
            self.reduce(stack_node)?;
        }
        let root = self.pop_operand()?;
        if !self.output.is_empty() {
            return Err(CalcError::syntax("malformed expression".into()));
        }
        Ok(root)
    }
}

fn did_not_expect(content: &str) -> CalcError {
    CalcError::syntax(format!("did not expect '{content}'"))
}

pub fn parse(input: &str) -> Result<SyntaxNode> {
    use TokenKind::*;

    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(CalcError::empty_expression);
    }

    let mut yard = Yard::new();
    let mut is_edge = true;
    let mut index = 0;

    while index < tokens.len() {
        let token = &tokens[index];
        if is_edge {
            match token.kind {
                number => {
                    yard.add_number(&token.content)?;
                    is_edge = false;
                },
                identifier => {
                    let calls = tokens
                        .get(index + 1)
                        .map_or(false, |next| next.content == "(");
                    if calls {
                        let function = token
                            .content
                            .parse()
                            .map_err(|_| CalcError::unknown_identifier(token.content.clone()))?;
                        yard.add_function(function);
                        yard.add_left_paren();
                        index += 1;
                    } else {
                        yard.add_identifier(&token.content);
                        is_edge = false;
                    }
                },
                // 'op', not 'operator': the glob import above makes a bare
                // 'operator' match TokenKind::operator instead of binding
                operator => match token.content.parse() {
                    Ok(op) => yard.add_unary(op),
                    Err(InvalidOperator) => return Err(did_not_expect(&token.content)),
                },
                punctuation => match token.content.as_str() {
                    "(" => yard.add_left_paren(),
                    _ => return Err(did_not_expect(&token.content)),
                },
            }
        } else {
            match token.kind {
                operator if token.content == "!" => yard.add_factorial()?,
                operator => {
                    let op: BinaryOperator = token.content.parse().map_err(|InvalidOperator| {
                        CalcError::syntax(format!(
                            "the '{}' operator has been misplaced",
                            token.content
                        ))
                    })?;
                    yard.add_binary(op)?;
                    is_edge = true;
                },
                punctuation if token.content == ")" => yard.add_right_paren()?,
                _ => return Err(did_not_expect(&token.content)),
            }
        }
        index += 1;
    }

    if is_edge {
        return Err(CalcError::syntax("expression ended abruptly".into()));
    }
    yard.finish()
}
