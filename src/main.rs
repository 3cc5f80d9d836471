#![allow(nonstandard_style)]

mod error_handling;
mod evaluating;
mod formatting;
mod parsing;
mod scanning;
mod session;

use formatting::format_result;
use session::Session;

fn help_text() -> String {
    format!(
        "\
Commands:
  help             Show this help
  history          Show recent results (last {capacity})
  clear            Clear the history
  mode deg|rad     Set trig mode (default: rad)
  precision N      Set decimal digits for printing (default: {precision})
  m+ [expr]        Add expr (or ans if omitted) to memory
  m- [expr]        Subtract expr (or ans if omitted) from memory
  mr               Print the memory value
  mc               Clear memory (set to 0)
  reset            Reset ans, mem, mode, precision, history
  quit / exit      Leave the calculator

Usage:
  - Enter math expressions directly:
      2+2, 2*(3+4)^2, 5!, sqrt(2), log10(100), ln(5)
      sin(30) with mode deg OR sin(pi/6) with mode rad
  - Variables:
      ans (last answer), mem (memory register)",
        capacity = session::HISTORY_CAPACITY,
        precision = session::DEFAULT_PRECISION,
    )
}

fn history_text(session: &Session) -> String {
    if session.history.is_empty() {
        return "(no history)".into();
    }
    session
        .history
        .iter()
        .enumerate()
        .map(|(position, (input, result))| {
            let rendered = format_result(*result, session.precision);
            format!("{:>2}: {input}  =  {rendered}", position + 1)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// One reply per input line; None ends the session.
fn respond(session: &mut Session, line: &str) -> Option<String> {
    let lower = line.to_lowercase();

    match lower.as_str() {
        "quit" | "exit" => return None,
        "help" => return Some(help_text()),
        "history" => return Some(history_text(session)),
        "clear" => {
            session.clear_history();
            return Some("History cleared.".into());
        },
        "mr" => return Some(format_result(session.memory, session.precision)),
        "mc" => {
            session.clear_memory();
            return Some("Memory cleared.".into());
        },
        "reset" => {
            session.reset();
            return Some("State reset.".into());
        },
        _ => {},
    }

    if lower.starts_with("m+") || lower.starts_with("m-") {
        let subtracts = lower.starts_with("m-");
        return Some(match session.shift_memory(&line[2..], subtracts) {
            Ok(memory) => format!("Memory = {}", format_result(memory, session.precision)),
            Err(e) => format!("Error, {e}"),
        });
    }

    // command words claim the line even without an argument, so a bare
    // 'mode' reports usage instead of parsing as an expression
    let (command, argument) = match lower.split_once(char::is_whitespace) {
        Some((command, argument)) => (command, argument.trim()),
        None => (lower.as_str(), ""),
    };

    let reply = match command {
        "mode" => session
            .set_angle_mode(argument)
            .map(|()| format!("Trig mode set to {argument}.")),
        "precision" => session
            .set_precision(argument)
            .map(|()| format!("Precision set to {}.", session.precision)),
        _ => session
            .evaluate_line(line)
            .map(|value| format_result(value, session.precision)),
    };

    Some(match reply {
        Ok(text) => text,
        Err(e) => format!("Error, {e}"),
    })
}

fn main() {
    use std::io::Write;

    println!("Calculator. Type 'help' for commands.\n");
    print!("> ");
    std::io::stdout().flush().unwrap();

    let mut session = Session::new();

    for line in std::io::stdin().lines() {
        let Ok(line) = line else { break };
        let line = line.trim();

        if !line.is_empty() {
            match respond(&mut session, line) {
                Some(reply) => println!("{reply}"),
                None => break,
            }
        }

        print!("> ");
        std::io::stdout().flush().unwrap();
    }
    println!("Bye.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expressions_print_formatted_results() {
        let mut session = Session::new();
        assert_eq!(respond(&mut session, "3+4").unwrap(), "7");
        assert_eq!(respond(&mut session, "ans*2").unwrap(), "14");
        assert_eq!(respond(&mut session, "1/0").unwrap(), "Error, division by zero");
    }

    #[test]
    fn quit_and_exit_end_the_session() {
        let mut session = Session::new();
        assert_eq!(respond(&mut session, "quit"), None);
        assert_eq!(respond(&mut session, "EXIT"), None);
    }

    #[test]
    fn bare_mode_is_a_usage_error_not_an_expression() {
        let mut session = Session::new();
        let reply = respond(&mut session, "mode").unwrap();
        assert_eq!(reply, "Error, invalid value, mode must be 'deg' or 'rad'");
        assert!(!reply.contains("is not defined"));
    }

    #[test]
    fn bare_precision_is_a_usage_error_not_an_expression() {
        let mut session = Session::new();
        let reply = respond(&mut session, "precision").unwrap();
        assert!(reply.starts_with("Error, invalid value, precision"));
    }

    #[test]
    fn mode_command_confirms_and_applies() {
        let mut session = Session::new();
        assert_eq!(respond(&mut session, "mode deg").unwrap(), "Trig mode set to deg.");
        assert_eq!(respond(&mut session, "sin(90)").unwrap(), "1");
        assert_eq!(
            respond(&mut session, "mode grad").unwrap(),
            "Error, invalid value, mode must be 'deg' or 'rad'"
        );
    }

    #[test]
    fn precision_command_confirms_and_applies() {
        let mut session = Session::new();
        assert_eq!(respond(&mut session, "precision 2").unwrap(), "Precision set to 2.");
        assert_eq!(respond(&mut session, "1/3").unwrap(), "0.33");
    }

    #[test]
    fn memory_commands_round_trip() {
        let mut session = Session::new();
        assert_eq!(respond(&mut session, "m+ 3").unwrap(), "Memory = 3");
        assert_eq!(respond(&mut session, "m- 1").unwrap(), "Memory = 2");
        assert_eq!(respond(&mut session, "mr").unwrap(), "2");
        assert_eq!(respond(&mut session, "mc").unwrap(), "Memory cleared.");
        assert_eq!(respond(&mut session, "mr").unwrap(), "0");
    }

    #[test]
    fn history_replies_are_stable_between_evaluations() {
        let mut session = Session::new();
        assert_eq!(respond(&mut session, "history").unwrap(), "(no history)");
        respond(&mut session, "1+1").unwrap();
        respond(&mut session, "2*3").unwrap();
        let first = respond(&mut session, "history").unwrap();
        let second = respond(&mut session, "history").unwrap();
        assert_eq!(first, second);
        assert_eq!(first, " 1: 1+1  =  2\n 2: 2*3  =  6");
    }
}
