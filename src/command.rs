use log::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `TA <va>`
    Translate(i64),
    /// `RP <pa>`
    ReadPhysical(i64),
    /// `NL`
    NewLine,
}

/// Split a command stream into commands. Tokens may be spread over any
/// number of lines. A `TA`/`RP` without an integer operand and any unknown
/// token are skipped. Operands are kept whole, so an out-of-range address
/// still produces its command.
pub fn parse_commands(input: &str) -> Vec<Command> {
    let mut commands = Vec::new();
    let mut tokens = input.split_whitespace().peekable();

    while let Some(token) = tokens.next() {
        let command: fn(i64) -> Command = match token {
            "TA" => Command::Translate,
            "RP" => Command::ReadPhysical,
            "NL" => {
                commands.push(Command::NewLine);
                continue;
            }
            other => {
                warn!("Skipping unknown token {:?}", other);
                continue;
            }
        };
        match tokens.peek().and_then(|operand| parse_operand(operand)) {
            Some(operand) => {
                tokens.next();
                commands.push(command(operand));
            }
            None => warn!("Skipping {} without an integer operand", token),
        }
    }
    commands
}

/// A decimal integer, saturated to `i64` when it has more digits than fit.
fn parse_operand(token: &str) -> Option<i64> {
    if let Ok(value) = token.parse::<i64>() {
        return Some(value);
    }
    let (negative, digits) = match token.strip_prefix('-') {
        Some(digits) => (true, digits),
        None => (false, token.strip_prefix('+').unwrap_or(token)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(if negative { i64::MIN } else { i64::MAX })
}
