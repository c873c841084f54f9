use super::error::LangError;
use std::fmt::Display;
use std::str::FromStr;

/// Numeric base of a sized literal.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Base {
    Binary,
    Octal,
    Decimal,
    Hex,
}

impl Base {
    fn radix(&self) -> u64 {
        match self {
            Self::Binary => 2,
            Self::Octal => 8,
            Self::Decimal => 10,
            Self::Hex => 16,
        }
    }

    fn bits_per_digit(&self) -> u32 {
        match self {
            Self::Binary => 1,
            Self::Octal => 3,
            Self::Decimal => 4,
            Self::Hex => 4,
        }
    }

    fn from_char(c: char) -> Option<Self> {
        match c {
            'b' | 'B' => Some(Self::Binary),
            'o' | 'O' => Some(Self::Octal),
            'd' | 'D' => Some(Self::Decimal),
            'h' | 'H' => Some(Self::Hex),
            _ => None,
        }
    }
}

/// A parsed Verilog integer literal of the form `[size]'[s]<base><digits>`
/// or a plain decimal constant. Underscore separators are accepted anywhere
/// after the first digit; `x`/`z`/`?` digits are kept and masked to 0 for
/// value extraction.
#[derive(Debug, PartialEq, Clone)]
pub struct Number {
    size: Option<u32>,
    signed: bool,
    base: Base,
    digits: String,
    raw: String,
}

impl Number {
    /// Computes the literal's value with unknown digits (`x`/`z`/`?`)
    /// treated as 0. The flag reports whether any unknown digit was seen.
    /// Values wider than 64 bits saturate.
    pub fn value(&self) -> (u64, bool) {
        let mut acc: u64 = 0;
        let mut unknown = false;
        for c in self.digits.chars() {
            let d = match c {
                'x' | 'X' | 'z' | 'Z' | '?' => {
                    unknown = true;
                    0
                }
                _ => c.to_digit(16).unwrap_or(0) as u64,
            };
            acc = acc.saturating_mul(self.base.radix()).saturating_add(d);
        }
        (acc, unknown)
    }

    /// Returns the declared bit width, or the minimum width required to hold
    /// the literal when no size was written.
    pub fn bits(&self) -> u32 {
        if let Some(size) = self.size {
            return size;
        }
        match self.base {
            // sizeless decimal: count bits of the extracted value
            Base::Decimal => {
                let (value, _) = self.value();
                match value {
                    0 => 1,
                    v => 64 - v.leading_zeros(),
                }
            }
            // sizeless based: every written digit occupies its full width
            _ => (self.digits.chars().count() as u32) * self.base.bits_per_digit(),
        }
    }

    /// Checks if the literal carried the `s` signedness indicator.
    pub fn is_signed(&self) -> bool {
        self.signed
    }

    pub fn base(&self) -> Base {
        self.base
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    fn valid_digit(c: char, base: Base) -> bool {
        match c {
            'x' | 'X' | 'z' | 'Z' | '?' => true,
            _ => match c.to_digit(16) {
                Some(d) => (d as u64) < base.radix(),
                None => false,
            },
        }
    }
}

impl FromStr for Number {
    type Err = LangError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let invalid = || LangError::InvalidNumber(s.to_string());

        let (head, tail) = match text.find('\'') {
            Some(i) => (&text[..i], Some(&text[i + 1..])),
            None => (text, None),
        };

        // plain decimal constant
        let tail = match tail {
            None => {
                let digits: String = head.chars().filter(|c| c != &'_').collect();
                if digits.is_empty() == true || digits.chars().all(|c| c.is_ascii_digit()) == false
                {
                    return Err(invalid());
                }
                return Ok(Self {
                    size: None,
                    signed: false,
                    base: Base::Decimal,
                    digits: digits,
                    raw: text.to_string(),
                });
            }
            Some(t) => t,
        };

        // optional size before the apostrophe
        let head = head.trim();
        let size = match head.is_empty() {
            true => None,
            false => {
                let cleaned: String = head.chars().filter(|c| c != &'_').collect();
                match cleaned.parse::<u32>() {
                    Ok(n) => Some(n),
                    Err(_) => return Err(invalid()),
                }
            }
        };

        let mut chars = tail.chars().peekable();
        // optional signedness indicator precedes the base
        let signed = match chars.peek() {
            Some('s') | Some('S') => {
                chars.next();
                true
            }
            _ => false,
        };
        let base = match chars.next() {
            Some(c) => Base::from_char(c).ok_or_else(invalid)?,
            None => return Err(invalid()),
        };

        // whitespace is tolerated between the base and its digits
        let digits: String = chars
            .skip_while(|c| c.is_whitespace())
            .filter(|c| c != &'_')
            .collect();
        if digits.is_empty() == true {
            return Err(invalid());
        }
        if digits.chars().all(|c| Self::valid_digit(c, base)) == false {
            return Err(invalid());
        }

        Ok(Self {
            size: size,
            signed: signed,
            base: base,
            digits: digits,
            raw: text.to_string(),
        })
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ut_based_valid() {
        let n = Number::from_str("8'hFF").unwrap();
        assert_eq!(n.value(), (255, false));
        assert_eq!(n.bits(), 8);
        assert_eq!(n.is_signed(), false);

        let n = Number::from_str("8'shFF").unwrap();
        assert_eq!(n.is_signed(), true);

        let n = Number::from_str("4'b1x1").unwrap();
        assert_eq!(n.value(), (5, true));
        assert_eq!(n.bits(), 4);

        let n = Number::from_str("16'b0011_0101_0001_1111").unwrap();
        assert_eq!(n.value(), (0x351F, false));

        let n = Number::from_str("'h 837FF").unwrap();
        assert_eq!(n.value(), (0x837FF, false));
        assert_eq!(n.bits(), 20);
    }

    #[test]
    fn ut_plain_decimal() {
        let n = Number::from_str("1_000_000").unwrap();
        assert_eq!(n.value(), (1_000_000, false));
        assert_eq!(n.bits(), 20);

        let n = Number::from_str("0").unwrap();
        assert_eq!(n.bits(), 1);
    }

    #[test]
    fn ut_invalid() {
        for s in ["", "'h", "4'", "4'q1010", "8'hGG", "abc", "4af"] {
            assert!(Number::from_str(s).is_err(), "{} should not parse", s);
        }
    }

    #[test]
    fn ut_sizeless_decimal_base() {
        let n = Number::from_str("'d16").unwrap();
        assert_eq!(n.value(), (16, false));
        assert_eq!(n.bits(), 5);
    }
}
