use crate::error_handling::*;
use crate::parsing::*;
use crate::session::Session;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AngleMode {
    degrees,
    radians,
}

impl AngleMode {
    /// Forward trig takes its argument in the active mode.
    fn to_radians(&self, value: f64) -> f64 {
        match self {
            AngleMode::degrees => value.to_radians(),
            AngleMode::radians => value,
        }
    }

    /// Inverse trig reports its result in the active mode.
    fn from_radians(&self, value: f64) -> f64 {
        match self {
            AngleMode::degrees => value.to_degrees(),
            AngleMode::radians => value,
        }
    }
}

impl FunctionName {
    pub fn call(&self, argument: f64, mode: AngleMode) -> Result<f64> {
        use FunctionName::*;

        match self {
            sin => Ok(mode.to_radians(argument).sin()),
            cos => Ok(mode.to_radians(argument).cos()),
            tan => Ok(mode.to_radians(argument).tan()),
            asin => {
                if !(-1.0..=1.0).contains(&argument) {
                    Err(CalcError::domain("asin is only defined on [-1, 1]".into()))
                } else {
                    Ok(mode.from_radians(argument.asin()))
                }
            },
            acos => {
                if !(-1.0..=1.0).contains(&argument) {
                    Err(CalcError::domain("acos is only defined on [-1, 1]".into()))
                } else {
                    Ok(mode.from_radians(argument.acos()))
                }
            },
            atan => Ok(mode.from_radians(argument.atan())),
            exp => Ok(argument.exp()),
            log => {
                if argument <= 0.0 {
                    Err(CalcError::domain("log is only defined for positive numbers".into()))
                } else {
                    Ok(argument.ln())
                }
            },
            log10 => {
                if argument <= 0.0 {
                    Err(CalcError::domain("log10 is only defined for positive numbers".into()))
                } else {
                    Ok(argument.log10())
                }
            },
            sqrt => {
                if argument < 0.0 {
                    Err(CalcError::domain("sqrt is not defined for negative numbers".into()))
                } else {
                    Ok(argument.sqrt())
                }
            },
            floor => Ok(argument.floor()),
            ceil => Ok(argument.ceil()),
            round => Ok(argument.round()),
            abs => Ok(argument.abs()),
            factorial => call_factorial(argument),
        }
    }
}

// 170! is the largest factorial an f64 can hold.
fn call_factorial(argument: f64) -> Result<f64> {
    let nearest = argument.round();
    if (argument - nearest).abs() > 1e-12 || nearest < 0.0 {
        return Err(CalcError::domain(
            "factorial is only defined for non-negative integers".into(),
        ));
    }
    if nearest > 170.0 {
        return Err(CalcError::domain("factorial argument is too large".into()));
    }

    let mut product = 1.0;
    let mut step = 2.0;
    while step <= nearest {
        product *= step;
        step += 1.0;
    }
    Ok(product)
}

/// Looked up fresh on every evaluation, so `ans` and `mem` always reflect the
/// current session.
fn resolve_identifier(name: &str, session: &Session) -> Result<f64> {
    match name {
        "pi" => return Ok(std::f64::consts::PI),
        "e" => return Ok(std::f64::consts::E),
        "tau" => return Ok(std::f64::consts::TAU),
        "inf" => return Ok(f64::INFINITY),
        "nan" => return Ok(f64::NAN),
        _ => {},
    }
    match name.to_ascii_lowercase().as_str() {
        "ans" => Ok(session.last_answer),
        "mem" => Ok(session.memory),
        _ => Err(CalcError::unknown_identifier(name.into())),
    }
}

pub fn evaluate(node: &SyntaxNode, session: &Session) -> Result<f64> {
    match node {
        SyntaxNode::number(value) => Ok(*value),

        SyntaxNode::identifier(name) => resolve_identifier(name, session),

        SyntaxNode::unary(operator, operand) => {
            let value = evaluate(operand, session)?;
            Ok(operator.call(value))
        },

        SyntaxNode::binary(operator, left, right) => {
            let left = evaluate(left, session)?;
            let right = evaluate(right, session)?;
            operator.call(left, right)
        },

        SyntaxNode::call(function, argument) => {
            let argument = evaluate(argument, session)?;
            function.call(argument, session.angle_mode)
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::parse;

    const TOLERANCE: f64 = 1e-9;

    fn run(input: &str) -> Result<f64> {
        let session = Session::new();
        evaluate(&parse(input)?, &session)
    }

    fn run_degrees(input: &str) -> Result<f64> {
        let mut session = Session::new();
        session.angle_mode = AngleMode::degrees;
        evaluate(&parse(input)?, &session)
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= TOLERANCE * expected.abs().max(1.0),
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn evaluates_plain_arithmetic() {
        assert_close(run("2*(3+4)^2 / 7").unwrap(), 14.0);
        assert_close(run("1+2*3-4").unwrap(), 3.0);
        assert_close(run("2**3**2").unwrap(), 512.0);
        assert_close(run("-2**2").unwrap(), -4.0);
    }

    #[test]
    fn evaluates_dot_and_exponent_literals() {
        assert_close(run(".5+.25").unwrap(), 0.75);
        assert_close(run("1e3").unwrap(), 1000.0);
        assert_close(run("2.5e-1*4").unwrap(), 1.0);
    }

    #[test]
    fn evaluates_floor_division_and_modulo() {
        assert_close(run("7//2").unwrap(), 3.0);
        assert_close(run("-7//2").unwrap(), -4.0);
        assert_close(run("7%3").unwrap(), 1.0);
        // modulo takes the divisor's sign
        assert_close(run("-7%3").unwrap(), 2.0);
        assert_close(run("7%-3").unwrap(), -2.0);
    }

    #[test]
    fn evaluates_factorials() {
        assert_close(run("5!").unwrap(), 120.0);
        assert_close(run("0!").unwrap(), 1.0);
        assert_close(run("factorial(4)").unwrap(), 24.0);
        assert_close(run("3!!").unwrap(), 720.0);
    }

    #[test]
    fn factorial_rejects_non_integers_and_negatives() {
        assert!(matches!(run("2.5!"), Err(CalcError::domain(_))));
        assert!(matches!(run("(-1)!"), Err(CalcError::domain(_))));
        assert!(matches!(run("171!"), Err(CalcError::domain(_))));
    }

    #[test]
    fn evaluates_roots_and_logs() {
        assert_close(run("sqrt(16) + log10(100)").unwrap(), 6.0);
        assert_close(run("log(e)").unwrap(), 1.0);
        assert_close(run("ln(e)").unwrap(), 1.0);
        assert_close(run("exp(0)").unwrap(), 1.0);
    }

    #[test]
    fn division_by_zero_is_an_error() {
        assert_eq!(run("1/0"), Err(CalcError::division_by_zero));
        assert_eq!(run("1//0"), Err(CalcError::division_by_zero));
        assert_eq!(run("1%0"), Err(CalcError::division_by_zero));
    }

    #[test]
    fn domain_errors_are_reported() {
        assert!(matches!(run("sqrt(-1)"), Err(CalcError::domain(_))));
        assert!(matches!(run("log(0)"), Err(CalcError::domain(_))));
        assert!(matches!(run("log10(-5)"), Err(CalcError::domain(_))));
        assert!(matches!(run("asin(2)"), Err(CalcError::domain(_))));
        assert!(matches!(run("(-8)**0.5"), Err(CalcError::domain(_))));
    }

    #[test]
    fn trig_respects_radian_mode() {
        assert_close(run("sin(pi/2)").unwrap(), 1.0);
        assert_close(run("cos(pi)").unwrap(), -1.0);
        assert!(run("sin(3.14159265)").unwrap().abs() < 1e-6);
        assert_close(run("asin(1)").unwrap(), std::f64::consts::FRAC_PI_2);
    }

    #[test]
    fn trig_respects_degree_mode() {
        assert_close(run_degrees("sin(90)").unwrap(), 1.0);
        assert_close(run_degrees("cos(180)").unwrap(), -1.0);
        assert_close(run_degrees("tan(45)").unwrap(), 1.0);
        assert_close(run_degrees("asin(1)").unwrap(), 90.0);
        assert_close(run_degrees("atan(1)").unwrap(), 45.0);
    }

    #[test]
    fn angle_mode_does_not_affect_other_functions() {
        assert_close(run_degrees("sqrt(16)").unwrap(), 4.0);
        assert_close(run_degrees("log(e)").unwrap(), 1.0);
        assert_close(run_degrees("5!").unwrap(), 120.0);
    }

    #[test]
    fn resolves_constants() {
        assert_close(run("pi").unwrap(), std::f64::consts::PI);
        assert_close(run("tau").unwrap(), std::f64::consts::TAU);
        assert_close(run("e").unwrap(), std::f64::consts::E);
        assert!(run("inf").unwrap().is_infinite());
        assert!(run("nan").unwrap().is_nan());
    }

    #[test]
    fn resolves_session_variables() {
        let mut session = Session::new();
        session.last_answer = 7.0;
        session.memory = 3.0;
        assert_close(evaluate(&parse("ans*2").unwrap(), &session).unwrap(), 14.0);
        assert_close(evaluate(&parse("ANS+MEM").unwrap(), &session).unwrap(), 10.0);
    }

    #[test]
    fn unknown_identifiers_are_an_error() {
        assert_eq!(run("bogus"), Err(CalcError::unknown_identifier("bogus".into())));
    }

    #[test]
    fn rounding_functions_apply_directly() {
        assert_close(run("floor(2.7)").unwrap(), 2.0);
        assert_close(run("ceil(2.1)").unwrap(), 3.0);
        assert_close(run("round(2.5)").unwrap(), 3.0);
        assert_close(run("abs(-3)").unwrap(), 3.0);
    }
}
