use winnow::combinator::{alt, opt, repeat};
use winnow::error::{ContextError, ErrMode};
use winnow::token::{literal, take_till, take_while};
use winnow::{ModalResult, Parser};

pub(crate) fn ws(input: &mut &str) -> ModalResult<()> {
    repeat::<_, _, (), _, _>(0.., alt((whitespace, line_comment))).parse_next(input)?;
    Ok(())
}

pub(crate) fn whitespace(input: &mut &str) -> ModalResult<()> {
    take_while(1.., |c: char| c.is_whitespace() || c == ',')
        .map(|_| ())
        .parse_next(input)
}

pub(crate) fn line_comment(input: &mut &str) -> ModalResult<()> {
    literal(";").parse_next(input)?;
    take_till(0.., |c: char| c == '\n').parse_next(input)?;
    opt(literal("\n")).parse_next(input)?;
    Ok(())
}

pub(crate) fn is_delimiter(ch: char) -> bool {
    ch.is_whitespace() || "()[]\";,".contains(ch)
}

/// A run of non-delimiter characters: identifiers and numbers.
pub(crate) fn atom<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_while(1.., |c: char| !is_delimiter(c)).parse_next(input)
}

pub(crate) fn is_number(atom: &str) -> bool {
    let digits = atom.strip_prefix('-').unwrap_or(atom);
    digits.starts_with(|c: char| c.is_ascii_digit())
}

/// A `"..."` literal with `\n`, `\t`, `\r`, `\"`, `\\` and `\0` escapes.
pub(crate) fn string_literal(input: &mut &str) -> ModalResult<String> {
    literal("\"").parse_next(input)?;
    let mut out = String::new();
    let mut chars = input.char_indices();
    while let Some((idx, ch)) = chars.next() {
        match ch {
            '"' => {
                *input = &input[idx + 1..];
                return Ok(out);
            }
            '\\' => {
                let escaped = match chars.next() {
                    Some((_, 'n')) => '\n',
                    Some((_, 't')) => '\t',
                    Some((_, 'r')) => '\r',
                    Some((_, '0')) => '\0',
                    Some((_, '"')) => '"',
                    Some((_, '\\')) => '\\',
                    _ => return Err(ErrMode::Cut(ContextError::new())),
                };
                out.push(escaped);
            }
            _ => out.push(ch),
        }
    }
    Err(ErrMode::Cut(ContextError::new()))
}
