pub mod error;
pub mod keyword;
pub mod number;
pub mod operator;
pub mod token;
pub mod tokenizer;

use error::LangError;
use keyword::Keyword;
use number::Number;
use std::fmt::Display;
use std::str::FromStr;
use std::sync::RwLock;

/// The revisions of IEEE 1364/1800 (and Verilog-AMS) this crate knows how
/// to classify words for.
#[derive(Debug, PartialEq, Clone, Copy, Eq, Hash)]
pub enum LanguageStandard {
    V1995,
    V2001,
    V2005,
    Sv2005,
    Sv2009,
    Sv2012,
    Sv2017,
    Sv2023,
    Vams,
}

impl LanguageStandard {
    pub fn is_system_verilog(&self) -> bool {
        match self {
            Self::Sv2005 | Self::Sv2009 | Self::Sv2012 | Self::Sv2017 | Self::Sv2023 => true,
            _ => false,
        }
    }

    /// Checks if implicit net declaration is available (it is in every
    /// revision unless `` `default_nettype none `` turned it off).
    pub fn allows_implicit_nets(&self) -> bool {
        true
    }
}

impl FromStr for LanguageStandard {
    type Err = LangError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "1995" | "1364-1995" | "v1995" => Self::V1995,
            "2001" | "1364-2001" | "v2001" => Self::V2001,
            "2005" | "1364-2005" | "v2005" => Self::V2005,
            "1800-2005" | "sv2005" => Self::Sv2005,
            "1800-2009" | "sv2009" => Self::Sv2009,
            "1800-2012" | "sv2012" => Self::Sv2012,
            "sv" | "1800-2017" | "sv2017" => Self::Sv2017,
            "1800-2023" | "sv2023" => Self::Sv2023,
            "vams" | "verilog-ams" => Self::Vams,
            _ => return Err(LangError::UnknownStandard(s.to_string())),
        })
    }
}

impl Display for LanguageStandard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::V1995 => "1364-1995",
                Self::V2001 => "1364-2001",
                Self::V2005 => "1364-2005",
                Self::Sv2005 => "1800-2005",
                Self::Sv2009 => "1800-2009",
                Self::Sv2012 => "1800-2012",
                Self::Sv2017 => "1800-2017",
                Self::Sv2023 => "1800-2023",
                Self::Vams => "verilog-ams",
            }
        )
    }
}

static DEFAULT_STANDARD: RwLock<LanguageStandard> = RwLock::new(LanguageStandard::Sv2017);

/// Reads the process-wide default standard. Every entry point that matters
/// accepts an explicit standard that takes precedence over this value.
pub fn language_standard() -> LanguageStandard {
    *DEFAULT_STANDARD.read().unwrap()
}

/// Replaces the process-wide default standard.
pub fn set_language_standard(standard: LanguageStandard) {
    *DEFAULT_STANDARD.write().unwrap() = standard;
}

/// Checks if `word` is reserved under `standard`.
pub fn is_keyword(word: &str, standard: LanguageStandard) -> bool {
    match Keyword::match_keyword(word) {
        Some(kw) => kw.is_reserved_in(standard),
        None => false,
    }
}

/// Checks if `word` (without its backtick) names a compiler directive the
/// preprocessor reacts to or deliberately passes through.
pub fn is_compiler_directive(word: &str) -> bool {
    match word {
        "define" | "undef" | "ifdef" | "ifndef" | "elsif" | "else" | "endif" | "include"
        | "resetall" | "timescale" | "celldefine" | "endcelldefine" | "default_nettype"
        | "line" | "pragma" | "begin_keywords" | "end_keywords" | "__FILE__" | "__LINE__" => true,
        _ => false,
    }
}

/// Checks if `word` names a built-in gate primitive.
pub fn is_gate_primitive(word: &str) -> bool {
    match Keyword::match_keyword(word) {
        Some(kw) => kw.is_gate_primitive(),
        None => false,
    }
}

/// Extracts the value of a Verilog integer literal with unknown digits
/// masked to 0; the flag reports whether any `x`/`z` digit was present.
pub fn number_value(text: &str) -> Result<(u64, bool), LangError> {
    Ok(Number::from_str(text)?.value())
}

/// Returns the declared size of a literal, or the minimum number of bits
/// required to hold it when unsized.
pub fn number_bits(text: &str) -> Result<u32, LangError> {
    Ok(Number::from_str(text)?.bits())
}

/// Checks if the literal carries the `s` signedness indicator before its base.
pub fn number_signed(text: &str) -> Result<bool, LangError> {
    Ok(Number::from_str(text)?.is_signed())
}

/// Expands a bus range `[msb:lsb]` into the per-bit selects it covers, in
/// range order. A single index or a scalar name passes through unchanged.
pub fn split_bus(range: &str) -> Result<Vec<String>, LangError> {
    let text = range.trim();
    if text.starts_with('[') == false || text.ends_with(']') == false {
        return Ok(vec![text.to_string()]);
    }
    let inner = &text[1..text.len() - 1];
    let mut parts = inner.splitn(2, ':');
    let msb = parts.next().unwrap_or("").trim();
    let lsb = match parts.next() {
        Some(p) => p.trim(),
        // single bit select
        None => {
            return match msb.parse::<i64>() {
                Ok(_) => Ok(vec![text.to_string()]),
                Err(_) => Err(LangError::InvalidBusRange(range.to_string())),
            };
        }
    };
    let msb: i64 = msb
        .parse()
        .map_err(|_| LangError::InvalidBusRange(range.to_string()))?;
    let lsb: i64 = lsb
        .parse()
        .map_err(|_| LangError::InvalidBusRange(range.to_string()))?;

    let mut bits = Vec::with_capacity((msb - lsb).unsigned_abs() as usize + 1);
    let mut i = msb;
    loop {
        bits.push(format!("[{}]", i));
        if i == lsb {
            break;
        }
        i += if lsb > msb { 1 } else { -1 };
    }
    Ok(bits)
}

/// Removes `//` line comments and non-nesting `/* */` block comments.
/// Comment delimiters inside string literals are left alone, and newlines
/// spanned by a block comment survive so line numbering is unaffected.
pub fn strip_comments(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' => {
                result.push(c);
                // copy the string literal, honoring escapes
                while let Some(d) = chars.next() {
                    result.push(d);
                    if d == '\\' {
                        if let Some(e) = chars.next() {
                            result.push(e);
                        }
                    } else if d == '"' {
                        break;
                    }
                }
            }
            '/' => match chars.peek() {
                Some('/') => {
                    while let Some(d) = chars.peek() {
                        if d == &'\n' {
                            break;
                        }
                        chars.next();
                    }
                }
                Some('*') => {
                    chars.next();
                    let mut last = ' ';
                    while let Some(d) = chars.next() {
                        if d == '\n' {
                            result.push('\n');
                        }
                        if last == '*' && d == '/' {
                            break;
                        }
                        last = d;
                    }
                }
                _ => result.push(c),
            },
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ut_split_bus() {
        assert_eq!(
            split_bus("[3:0]").unwrap(),
            vec!["[3]", "[2]", "[1]", "[0]"]
        );
        assert_eq!(split_bus("[0:2]").unwrap(), vec!["[0]", "[1]", "[2]"]);
        assert_eq!(split_bus("[5]").unwrap(), vec!["[5]"]);
        assert_eq!(split_bus("clk").unwrap(), vec!["clk"]);
        assert!(split_bus("[a:b]").is_err());
    }

    #[test]
    fn ut_strip_comments() {
        assert_eq!(strip_comments("a // note\nb"), "a \nb");
        assert_eq!(strip_comments("a /* x */ b"), "a  b");
        assert_eq!(strip_comments("a /* 1\n2 */ b"), "a \n b");
        // delimiters inside strings are not comments
        assert_eq!(strip_comments("x = \"//not\";"), "x = \"//not\";");
        assert_eq!(strip_comments("x = \"/*no*/\";"), "x = \"/*no*/\";");
    }

    #[test]
    fn ut_standard_facts() {
        assert_eq!(is_keyword("logic", LanguageStandard::Sv2012), true);
        assert_eq!(is_keyword("logic", LanguageStandard::V2001), false);
        assert_eq!(is_compiler_directive("ifdef"), true);
        assert_eq!(is_compiler_directive("wire"), false);
        assert_eq!(is_gate_primitive("nand"), true);
    }

    #[test]
    fn ut_number_facts() {
        assert_eq!(number_value("8'hFF").unwrap(), (255, false));
        assert_eq!(number_bits("8'hFF").unwrap(), 8);
        assert_eq!(number_signed("8'shFF").unwrap(), true);
        assert_eq!(number_value("4'b1x1").unwrap(), (5, true));
    }
}
