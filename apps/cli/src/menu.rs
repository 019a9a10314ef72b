//! Numbered-menu prompt.
//!
//! The whole UI contract is `choose(options) -> Option<index>`: print an
//! ordered list, read a 1-based pick from stdin, `None` when the user
//! cancels with an empty line or EOF.

use std::io::{self, BufRead, Write};

/// Presents `options` and returns the chosen zero-based index, or `None`
/// if the prompt was cancelled.
pub fn choose(title: &str, options: &[String]) -> Option<usize> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    choose_from(&mut stdin.lock(), &mut stdout.lock(), title, options)
}

fn choose_from(
    input: &mut impl BufRead,
    output: &mut impl Write,
    title: &str,
    options: &[String],
) -> Option<usize> {
    writeln!(output, "\n{title}").ok()?;
    for (i, opt) in options.iter().enumerate() {
        writeln!(output, "  {}) {opt}", i + 1).ok()?;
    }

    loop {
        write!(output, "> ").ok()?;
        output.flush().ok()?;

        let mut line = String::new();
        if input.read_line(&mut line).ok()? == 0 {
            return None;
        }
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        match line.parse::<usize>() {
            Ok(n) if (1..=options.len()).contains(&n) => return Some(n - 1),
            _ => {
                writeln!(
                    output,
                    "pick 1-{}, or press Enter to cancel",
                    options.len()
                )
                .ok()?;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn opts() -> Vec<String> {
        vec!["alpha".into(), "beta".into(), "gamma".into()]
    }

    #[test]
    fn picks_are_one_based() {
        let mut out = Vec::new();
        let got = choose_from(&mut Cursor::new("2\n"), &mut out, "t", &opts());
        assert_eq!(got, Some(1));
    }

    #[test]
    fn empty_line_cancels() {
        let mut out = Vec::new();
        let got = choose_from(&mut Cursor::new("\n"), &mut out, "t", &opts());
        assert_eq!(got, None);
    }

    #[test]
    fn eof_cancels() {
        let mut out = Vec::new();
        let got = choose_from(&mut Cursor::new(""), &mut out, "t", &opts());
        assert_eq!(got, None);
    }

    #[test]
    fn invalid_input_reprompts() {
        let mut out = Vec::new();
        let got = choose_from(&mut Cursor::new("zero\n9\n3\n"), &mut out, "t", &opts());
        assert_eq!(got, Some(2));
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("pick 1-3"));
    }
}
