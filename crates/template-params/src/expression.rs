//! Character-class expansion engine.
//!
//! An expression is literal text interspersed with `[<class>]{<n>}` tokens.
//! Literal text is copied verbatim; each token is replaced by `n` characters
//! drawn independently and uniformly from the class alphabet.
//!
//! # Grammar
//!
//! - `\d` expands to the digits `0-9`.
//! - `\w` and `\a` expand to upper and lowercase letters plus digits.
//! - `x-y` is an inclusive range whose endpoints are both digits, both
//!   lowercase, or both uppercase letters.
//! - Any other alphanumeric character stands for itself.
//! - `-` is literal when it is the first or last character of the class.
//!
//! The class alphabet is the union of its parts in first-seen order.

use crate::error::GenerationError;
use crate::random::RandomSource;

/// Largest repetition count accepted in a `{n}` quantifier.
pub const MAX_REPETITIONS: usize = 1024;

const DIGITS: &str = "0123456789";
const ALPHANUMERIC: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// A parsed piece of an expression.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Draw { alphabet: Vec<char>, count: usize },
}

/// Expands every character-class token in `expression`.
///
/// The whole expression is parsed before any random draw, so a malformed
/// expression never consumes randomness. Draws happen token by token, left to
/// right, one per generated character.
///
/// # Errors
///
/// Returns [`GenerationError::MalformedExpression`] when a token has an
/// invalid class or quantifier.
///
/// # Example
///
/// ```
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
/// use template_params::expand;
///
/// let mut rng = ChaCha8Rng::seed_from_u64(1337);
/// let value = expand("0x[A-F0-9]{4}", &mut rng).expect("valid expression");
///
/// assert_eq!(value.len(), 6);
/// assert!(value.starts_with("0x"));
/// ```
pub fn expand<R>(expression: &str, rng: &mut R) -> Result<String, GenerationError>
where
    R: RandomSource + ?Sized,
{
    let segments = parse(expression)?;
    let mut output = String::with_capacity(expression.len());

    for segment in segments {
        match segment {
            Segment::Literal(text) => output.push_str(&text),
            Segment::Draw { alphabet, count } => {
                for _ in 0..count {
                    let index = rng.next_index(alphabet.len());
                    debug_assert!(
                        index < alphabet.len(),
                        "random index {index} out of range for alphabet of {}",
                        alphabet.len()
                    );
                    if let Some(symbol) = index
                        .checked_rem(alphabet.len())
                        .and_then(|wrapped| alphabet.get(wrapped))
                    {
                        output.push(*symbol);
                    }
                }
            }
        }
    }

    Ok(output)
}

fn parse(expression: &str) -> Result<Vec<Segment>, GenerationError> {
    let malformed = |message: String| GenerationError::MalformedExpression {
        expression: expression.to_owned(),
        message,
    };

    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = expression.chars();

    while let Some(c) = chars.next() {
        if c != '[' {
            literal.push(c);
            continue;
        }

        let class = take_until(&mut chars, ']')
            .ok_or_else(|| malformed("unterminated character class".to_owned()))?;
        let alphabet = parse_class(&class).map_err(malformed)?;
        let count = parse_quantifier(&mut chars).map_err(malformed)?;

        if !literal.is_empty() {
            segments.push(Segment::Literal(std::mem::take(&mut literal)));
        }
        segments.push(Segment::Draw { alphabet, count });
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }

    Ok(segments)
}

/// Consumes characters up to and including `terminator`.
///
/// Returns `None` if the input ends first.
fn take_until(chars: &mut std::str::Chars<'_>, terminator: char) -> Option<String> {
    let mut taken = String::new();
    for c in chars.by_ref() {
        if c == terminator {
            return Some(taken);
        }
        taken.push(c);
    }
    None
}

fn parse_quantifier(chars: &mut std::str::Chars<'_>) -> Result<usize, String> {
    if chars.next() != Some('{') {
        return Err("character class must be followed by a {n} quantifier".to_owned());
    }
    let digits = take_until(chars, '}').ok_or_else(|| "unterminated quantifier".to_owned())?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(format!("invalid quantifier '{{{digits}}}'"));
    }
    let count = digits
        .parse::<usize>()
        .map_err(|err| format!("invalid quantifier '{{{digits}}}': {err}"))?;
    if count > MAX_REPETITIONS {
        return Err(format!(
            "quantifier {count} exceeds the maximum of {MAX_REPETITIONS}"
        ));
    }
    Ok(count)
}

fn parse_class(class: &str) -> Result<Vec<char>, String> {
    let symbols: Vec<char> = class.chars().collect();
    if symbols.is_empty() {
        return Err("empty character class".to_owned());
    }

    let mut alphabet = Vec::new();
    let mut rest = symbols.as_slice();

    while !rest.is_empty() {
        let at_start = rest.len() == symbols.len();
        rest = match rest {
            ['\\', code, tail @ ..] => {
                extend_unique(&mut alphabet, escape_alphabet(*code)?.chars());
                tail
            }
            [start, '-', end, tail @ ..]
                if start.is_ascii_alphanumeric() && end.is_ascii_alphanumeric() =>
            {
                extend_unique(&mut alphabet, range_alphabet(*start, *end)?);
                tail
            }
            ['-', tail @ ..] if at_start || tail.is_empty() => {
                extend_unique(&mut alphabet, std::iter::once('-'));
                tail
            }
            [symbol, tail @ ..] if symbol.is_ascii_alphanumeric() => {
                extend_unique(&mut alphabet, std::iter::once(*symbol));
                tail
            }
            [symbol, ..] => {
                return Err(format!("unsupported character '{symbol}' in class"));
            }
            [] => rest,
        };
    }

    Ok(alphabet)
}

fn escape_alphabet(code: char) -> Result<&'static str, String> {
    match code {
        'd' => Ok(DIGITS),
        'w' | 'a' => Ok(ALPHANUMERIC),
        other => Err(format!("unsupported escape '\\{other}'")),
    }
}

fn range_alphabet(start: char, end: char) -> Result<std::ops::RangeInclusive<char>, String> {
    let same_category = (start.is_ascii_digit() && end.is_ascii_digit())
        || (start.is_ascii_lowercase() && end.is_ascii_lowercase())
        || (start.is_ascii_uppercase() && end.is_ascii_uppercase());
    if !same_category {
        return Err(format!("range '{start}-{end}' mixes character categories"));
    }
    if start > end {
        return Err(format!("reversed range '{start}-{end}'"));
    }
    Ok(start..=end)
}

fn extend_unique(alphabet: &mut Vec<char>, symbols: impl IntoIterator<Item = char>) {
    for symbol in symbols {
        if !alphabet.contains(&symbol) {
            alphabet.push(symbol);
        }
    }
}
