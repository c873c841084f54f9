pub mod condition;
pub mod define;
pub mod error;

use crate::core::lang::{self, LanguageStandard};
use crate::core::source::{normalize_line_endings, FileId, Origin, SourceMap};
use crate::diagnostic::{Diagnostic, DiagnosticKind, DiagnosticSink};
use condition::ConditionStack;
use define::{Define, DefineOutcome, DefineTable};
use error::PreprocError;
use std::path::PathBuf;

const DEFAULT_INCLUDE_LIMIT: usize = 100;

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

fn is_word_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// The macro/conditional/include state machine. One instance owns its macro
/// table, file table, and diagnostic sink; translation units processed in
/// sequence share defines the way a file list on a command line expects.
///
/// Output text keeps the line structure of its input: consumed directive
/// lines and skipped conditional regions come out as blank lines, and
/// `` `line `` markers re-anchor provenance across include boundaries.
#[derive(Debug)]
pub struct Preproc {
    defines: DefineTable,
    sources: SourceMap,
    standard: LanguageStandard,
    conditions: ConditionStack,
    diagnostics: DiagnosticSink,
    include_limit: usize,
    default_nettype: String,
}

impl Preproc {
    pub fn new(standard: LanguageStandard) -> Self {
        Self {
            defines: DefineTable::new(),
            sources: SourceMap::new(),
            standard: standard,
            conditions: ConditionStack::new(),
            diagnostics: DiagnosticSink::new(),
            include_limit: DEFAULT_INCLUDE_LIMIT,
            default_nettype: String::from("wire"),
        }
    }

    /// Seeds command-line style defines before any text is processed.
    pub fn with_defines(mut self, defines: Vec<(String, String)>) -> Self {
        for (name, body) in defines {
            self.defines.define(
                Define::new(name, body, Origin::new("<command-line>", 0)).predefined(),
            );
        }
        self
    }

    pub fn with_include_paths(mut self, paths: Vec<PathBuf>) -> Self {
        for p in paths {
            self.sources.add_include_path(p);
        }
        self
    }

    pub fn with_include_limit(mut self, limit: usize) -> Self {
        self.include_limit = limit;
        self
    }

    pub fn add_define(&mut self, name: &str, body: &str) {
        self.defines
            .define(Define::new(name, body, Origin::new("<command-line>", 0)).predefined());
    }

    pub fn undefine(&mut self, name: &str) {
        self.defines.undefine(name);
    }

    pub fn add_include_path(&mut self, path: PathBuf) {
        self.sources.add_include_path(path);
    }

    pub fn defines(&self) -> &DefineTable {
        &self.defines
    }

    pub fn diagnostics(&self) -> &DiagnosticSink {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        self.diagnostics.drain()
    }

    pub fn standard(&self) -> LanguageStandard {
        self.standard
    }

    pub fn sources(&self) -> &SourceMap {
        &self.sources
    }

    /// The net type implicit declarations currently resolve to, as steered
    /// by `` `default_nettype ``. The value `none` disables implicit nets.
    pub fn default_nettype(&self) -> &str {
        &self.default_nettype
    }

    /// Preprocesses the file at `path` into its expanded text.
    pub fn preprocess_file(&mut self, path: &str) -> Result<String, PreprocError> {
        let (text, id) = self.sources.open(path, None)?;
        self.run(&text, id)
    }

    /// Preprocesses in-memory text, attributing provenance to `origin`.
    pub fn preprocess_str(&mut self, text: &str, origin: &str) -> Result<String, PreprocError> {
        let text = normalize_line_endings(text);
        let id = self.sources.register(origin, &text);
        self.run(&text, id)
    }

    fn run(&mut self, text: &str, id: FileId) -> Result<String, PreprocError> {
        let result = self.process_text(text, id, 0);
        match result {
            Ok(lines) => {
                self.conditions.finish()?;
                Ok(lines.join("\n"))
            }
            Err(e) => {
                // leave no half-open regions behind for the next unit
                let _ = self.conditions.finish();
                Err(e)
            }
        }
    }

    fn process_text(
        &mut self,
        text: &str,
        file: FileId,
        depth: usize,
    ) -> Result<Vec<String>, PreprocError> {
        let mut file_alias = self.sources.path(file).display().to_string();
        let mut line_adjust: i64 = 0;
        let lines: Vec<&str> = text.split('\n').collect();
        let mut out: Vec<String> = Vec::with_capacity(lines.len());

        let mut i = 0;
        while i < lines.len() {
            let raw = lines[i];
            let physical = i + 1;
            let line_no = ((physical as i64) + line_adjust).max(1) as usize;
            let origin = Origin::new(file_alias.clone(), line_no);
            let active = self.conditions.is_active();

            let trimmed = raw.trim_start();
            if trimmed.starts_with('`') == true {
                let name: String = trimmed[1..].chars().take_while(|c| is_ident_char(*c)).collect();
                let rest = &trimmed[1 + name.len()..];
                match name.as_str() {
                    "define" => {
                        // gather the body across line continuations
                        let mut body_text = rest.to_string();
                        let mut consumed = 0;
                        while body_text.trim_end().ends_with('\\') == true {
                            let t = body_text.trim_end();
                            body_text = t[..t.len() - 1].to_string();
                            if i + consumed + 1 < lines.len() {
                                consumed += 1;
                                body_text.push(' ');
                                body_text.push_str(lines[i + consumed]);
                            } else {
                                break;
                            }
                        }
                        if active == true {
                            self.handle_define(&body_text, origin);
                        }
                        for _ in 0..=consumed {
                            out.push(String::new());
                        }
                        i += consumed;
                    }
                    "undef" => {
                        if active == true {
                            match first_word(rest) {
                                Some(target) => {
                                    self.defines.undefine(&target);
                                }
                                None => self.report_malformed("undef", origin),
                            }
                        }
                        out.push(String::new());
                    }
                    "ifdef" | "ifndef" => {
                        match first_word(rest) {
                            Some(symbol) => {
                                let mut cond = self.defines.is_defined(&symbol);
                                if name == "ifndef" {
                                    cond = cond == false;
                                }
                                self.conditions.push(cond, origin, &name);
                            }
                            None => self.report_malformed(&name, origin),
                        }
                        out.push(String::new());
                    }
                    "elsif" => {
                        match first_word(rest) {
                            Some(symbol) => {
                                let cond = self.defines.is_defined(&symbol);
                                self.conditions.elsif(cond, origin)?;
                            }
                            None => self.report_malformed("elsif", origin),
                        }
                        out.push(String::new());
                    }
                    "else" => {
                        self.conditions.orelse(origin)?;
                        out.push(String::new());
                    }
                    "endif" => {
                        self.conditions.pop(origin)?;
                        out.push(String::new());
                    }
                    "include" => {
                        if active == true {
                            let target = match include_target(rest) {
                                Some(t) => t,
                                None => {
                                    self.report_malformed("include", origin);
                                    out.push(String::new());
                                    i += 1;
                                    continue;
                                }
                            };
                            if depth + 1 > self.include_limit {
                                return Err(PreprocError::IncludeDepthExceeded(
                                    origin,
                                    self.include_limit,
                                ));
                            }
                            let (inc_text, inc_id) = self.sources.open(&target, Some(file))?;
                            out.push(format!(
                                "`line 1 \"{}\" 1",
                                self.sources.path(inc_id).display()
                            ));
                            let mut inc_lines = self.process_text(&inc_text, inc_id, depth + 1)?;
                            if inc_lines.last().is_some_and(|l| l.is_empty()) == true {
                                inc_lines.pop();
                            }
                            out.append(&mut inc_lines);
                            out.push(format!("`line {} \"{}\" 2", line_no + 1, file_alias));
                        } else {
                            out.push(String::new());
                        }
                    }
                    "line" => {
                        if active == true {
                            match line_marker(rest) {
                                Some((declared, named_file)) => {
                                    line_adjust = declared as i64 - (physical as i64 + 1);
                                    file_alias = named_file;
                                    out.push(raw.to_string());
                                }
                                None => {
                                    self.report_malformed("line", origin);
                                    out.push(String::new());
                                }
                            }
                        } else {
                            out.push(String::new());
                        }
                    }
                    "default_nettype" => {
                        if active == true {
                            if let Some(net) = first_word(rest) {
                                self.default_nettype = net;
                            }
                            out.push(raw.to_string());
                        } else {
                            out.push(String::new());
                        }
                    }
                    "resetall" | "timescale" | "celldefine" | "endcelldefine" | "pragma"
                    | "begin_keywords" | "end_keywords" => {
                        match active {
                            true => out.push(raw.to_string()),
                            false => out.push(String::new()),
                        }
                    }
                    "" => {
                        // a stray backtick; report once and keep the line
                        if active == true {
                            self.report_malformed("`", origin);
                            out.push(raw.to_string());
                        } else {
                            out.push(String::new());
                        }
                    }
                    _ => {
                        // macro invocation or an unrecognized directive
                        if active == true {
                            let mut hide = Vec::new();
                            let expanded =
                                self.expand_fragment(raw, &mut hide, &file_alias, line_no)?;
                            out.push(expanded);
                        } else {
                            out.push(String::new());
                        }
                    }
                }
            } else if active == true {
                let mut hide = Vec::new();
                let expanded = self.expand_fragment(raw, &mut hide, &file_alias, line_no)?;
                out.push(expanded);
            } else {
                out.push(String::new());
            }
            i += 1;
        }
        Ok(out)
    }

    fn report_malformed(&mut self, directive: &str, origin: Origin) {
        self.diagnostics.push(
            Diagnostic::new(
                DiagnosticKind::MalformedDirective,
                format!("malformed `{} directive", directive),
            )
            .at(origin),
        );
    }

    /// Registers a `` `define ``. `text` is everything after the directive
    /// name, with continuations already joined.
    fn handle_define(&mut self, text: &str, origin: Origin) {
        let s = text.trim_start();
        let name: String = s.chars().take_while(|c| is_ident_char(*c)).collect();
        if name.is_empty() == true || name.chars().next().is_some_and(|c| c.is_ascii_digit()) {
            self.report_malformed("define", origin);
            return;
        }
        let after = &s[name.len()..];
        let (params, body) = if after.starts_with('(') == true {
            match after.find(')') {
                Some(close) => {
                    let list = &after[1..close];
                    let params: Vec<String> = match list.trim().is_empty() {
                        true => Vec::new(),
                        false => list.split(',').map(|p| p.trim().to_string()).collect(),
                    };
                    (Some(params), after[close + 1..].trim().to_string())
                }
                None => {
                    self.report_malformed("define", origin);
                    return;
                }
            }
        } else {
            (None, after.trim().to_string())
        };
        let mut def = Define::new(name.clone(), body, origin.clone());
        if let Some(p) = params {
            def = def.with_params(p);
        }
        if let DefineOutcome::Redefined(prior) = self.defines.define(def) {
            self.diagnostics.push(
                Diagnostic::new(
                    DiagnosticKind::MacroRedefinition,
                    format!("macro `{} redefined with a different body (first defined at {})",
                        name, prior),
                )
                .at(origin),
            );
        }
    }

    /// Expands macros within one line of active text, rescanning substituted
    /// bodies while the hide set blocks recursive re-expansion.
    fn expand_fragment(
        &mut self,
        text: &str,
        hide: &mut Vec<String>,
        file: &str,
        line_no: usize,
    ) -> Result<String, PreprocError> {
        let chars: Vec<char> = text.chars().collect();
        let len = chars.len();
        let mut out = String::with_capacity(len);
        let mut i = 0;
        while i < len {
            let c = chars[i];
            if c == '"' {
                out.push(c);
                i += 1;
                while i < len {
                    let d = chars[i];
                    out.push(d);
                    i += 1;
                    if d == '\\' && i < len {
                        out.push(chars[i]);
                        i += 1;
                    } else if d == '"' {
                        break;
                    }
                }
            } else if c == '/' && i + 1 < len && chars[i + 1] == '/' {
                out.extend(chars[i..].iter());
                break;
            } else if c == '/' && i + 1 < len && chars[i + 1] == '*' {
                out.push('/');
                out.push('*');
                i += 2;
                while i < len {
                    if chars[i] == '*' && i + 1 < len && chars[i + 1] == '/' {
                        out.push('*');
                        out.push('/');
                        i += 2;
                        break;
                    }
                    out.push(chars[i]);
                    i += 1;
                }
            } else if c == '\\' {
                // escaped identifiers never expand
                out.push(c);
                i += 1;
                while i < len && chars[i].is_whitespace() == false {
                    out.push(chars[i]);
                    i += 1;
                }
            } else if c == '`' {
                i += 1;
                let mut name = String::new();
                while i < len && is_ident_char(chars[i]) == true {
                    name.push(chars[i]);
                    i += 1;
                }
                if name.is_empty() == true {
                    out.push('`');
                } else if name == "__FILE__" {
                    out.push('"');
                    out.push_str(file);
                    out.push('"');
                } else if name == "__LINE__" {
                    out.push_str(&line_no.to_string());
                } else if hide.contains(&name) == true {
                    out.push('`');
                    out.push_str(&name);
                } else if let Some(def) = self.defines.get(&name).cloned() {
                    i = self.expand_invocation(&def, "`", &chars, i, hide, file, line_no, &mut out)?;
                } else if lang::is_compiler_directive(&name) == true {
                    // a marker or passthrough directive riding mid-line
                    out.push('`');
                    out.push_str(&name);
                } else {
                    self.diagnostics.push(
                        Diagnostic::new(
                            DiagnosticKind::UnknownDirective,
                            format!("unknown directive or macro `{}", name),
                        )
                        .at(Origin::new(file, line_no)),
                    );
                    out.push('`');
                    out.push_str(&name);
                }
            } else if is_word_start(c) == true
                && (i == 0 || (is_ident_char(chars[i - 1]) == false && chars[i - 1] != '\''))
            {
                let mut word = String::new();
                while i < len && is_ident_char(chars[i]) == true {
                    word.push(chars[i]);
                    i += 1;
                }
                if word == "__FILE__" {
                    out.push('"');
                    out.push_str(file);
                    out.push('"');
                } else if word == "__LINE__" {
                    out.push_str(&line_no.to_string());
                } else if hide.contains(&word) == false && self.defines.is_defined(&word) == true {
                    let def = self.defines.get(&word).cloned().unwrap();
                    i = self.expand_invocation(&def, "", &chars, i, hide, file, line_no, &mut out)?;
                } else {
                    out.push_str(&word);
                }
            } else {
                out.push(c);
                i += 1;
            }
        }
        Ok(out)
    }

    /// Substitutes one macro invocation whose name was just consumed,
    /// appending the expansion to `out`. Returns the index after any
    /// argument list. `prefix` restores the original spelling when the name
    /// turns out not to be an invocation after all.
    fn expand_invocation(
        &mut self,
        def: &Define,
        prefix: &str,
        chars: &Vec<char>,
        start: usize,
        hide: &mut Vec<String>,
        file: &str,
        line_no: usize,
        out: &mut String,
    ) -> Result<usize, PreprocError> {
        let len = chars.len();
        let mut i = start;
        let args: Vec<String> = if def.is_function_like() == true {
            // optional whitespace and block comments before the argument list
            let mut j = i;
            loop {
                while j < len && chars[j].is_whitespace() == true {
                    j += 1;
                }
                if j + 1 < len && chars[j] == '/' && chars[j + 1] == '*' {
                    j += 2;
                    while j < len {
                        if chars[j] == '*' && j + 1 < len && chars[j + 1] == '/' {
                            j += 2;
                            break;
                        }
                        j += 1;
                    }
                    continue;
                }
                break;
            }
            if j >= len || chars[j] != '(' {
                // no argument list follows: keep the original spelling
                out.push_str(prefix);
                out.push_str(def.name());
                return Ok(i);
            }
            match scan_macro_args(chars, j) {
                Some((args, next)) => {
                    i = next;
                    args
                }
                None => {
                    return Err(PreprocError::Malformed(
                        Origin::new(file, line_no),
                        def.name().to_string(),
                    ))
                }
            }
        } else {
            Vec::new()
        };

        if def.is_function_like() == true {
            let supplied = match args.len() == 1 && args[0].is_empty() && def.arity() == 0 {
                true => 0,
                false => args.len(),
            };
            if supplied != def.arity() {
                return Err(PreprocError::MacroArity(
                    Origin::new(file, line_no),
                    def.name().to_string(),
                    def.arity(),
                    supplied,
                ));
            }
        }

        let substituted = substitute_body(def.body(), def.params(), &args);
        hide.push(def.name().to_string());
        let expanded = self.expand_fragment(&substituted, hide, file, line_no);
        hide.pop();
        out.push_str(&expanded?);
        Ok(i)
    }
}

/// Splits a parenthesized macro argument list starting at the `(` found at
/// `open`. Commas split only at depth zero; strings and block comments are
/// carried into the argument text untouched. Returns the arguments and the
/// index just past the closing `)`.
fn scan_macro_args(chars: &Vec<char>, open: usize) -> Option<(Vec<String>, usize)> {
    let len = chars.len();
    let mut args: Vec<String> = Vec::new();
    let mut cur = String::new();
    let mut depth = 0;
    let mut i = open + 1;
    while i < len {
        let c = chars[i];
        if c == '"' {
            cur.push(c);
            i += 1;
            while i < len {
                let d = chars[i];
                cur.push(d);
                i += 1;
                if d == '\\' && i < len {
                    cur.push(chars[i]);
                    i += 1;
                } else if d == '"' {
                    break;
                }
            }
            continue;
        }
        match c {
            '(' | '[' | '{' => {
                depth += 1;
                cur.push(c);
            }
            ')' if depth == 0 => {
                args.push(cur.trim().to_string());
                return Some((args, i + 1));
            }
            ')' | ']' | '}' => {
                depth -= 1;
                cur.push(c);
            }
            ',' if depth == 0 => {
                args.push(cur.trim().to_string());
                cur.clear();
            }
            _ => cur.push(c),
        }
        i += 1;
    }
    None
}

/// Replaces parameter references in a macro body with their argument text
/// and applies the body-only operators: stringification (`` `" ``, with the
/// embedded escapes `` `\`" `` → `"` and `` `\ `` → `\`) and token pasting
/// (`` `` ``).
fn substitute_body(body: &str, params: Option<&Vec<String>>, args: &Vec<String>) -> String {
    let empty = Vec::new();
    let params = params.unwrap_or(&empty);
    let chars: Vec<char> = body.chars().collect();
    let len = chars.len();
    let mut out = String::with_capacity(len);
    let mut i = 0;
    while i < len {
        let c = chars[i];
        if c == '`' && i + 1 < len {
            match chars[i + 1] {
                '`' => {
                    i += 2;
                    continue;
                }
                '"' => {
                    out.push('"');
                    i += 2;
                    continue;
                }
                '\\' => {
                    if i + 3 < len && chars[i + 2] == '`' && chars[i + 3] == '"' {
                        out.push('\\');
                        out.push('"');
                        i += 4;
                        continue;
                    }
                    out.push('\\');
                    i += 2;
                    continue;
                }
                _ => {
                    out.push(c);
                    i += 1;
                    continue;
                }
            }
        }
        if c == '"' {
            // parameters are not substituted inside ordinary strings
            out.push(c);
            i += 1;
            while i < len {
                let d = chars[i];
                out.push(d);
                i += 1;
                if d == '\\' && i < len {
                    out.push(chars[i]);
                    i += 1;
                } else if d == '"' {
                    break;
                }
            }
            continue;
        }
        if is_word_start(c) == true && (i == 0 || is_ident_char(chars[i - 1]) == false) {
            let mut word = String::new();
            while i < len && is_ident_char(chars[i]) == true {
                word.push(chars[i]);
                i += 1;
            }
            match params.iter().position(|p| p == &word) {
                Some(k) => out.push_str(args.get(k).map(|a| a.as_str()).unwrap_or("")),
                None => out.push_str(&word),
            }
            continue;
        }
        out.push(c);
        i += 1;
    }
    out
}

/// Extracts the first identifier-like word of a directive's remainder.
fn first_word(rest: &str) -> Option<String> {
    let s = rest.trim_start();
    let word: String = s.chars().take_while(|c| is_ident_char(*c)).collect();
    match word.is_empty() {
        true => None,
        false => Some(word),
    }
}

/// Extracts the target of an `` `include `` directive, accepting both the
/// quoted and angle-bracket spellings.
fn include_target(rest: &str) -> Option<String> {
    let s = rest.trim();
    let (open, close) = match s.chars().next()? {
        '"' => ('"', '"'),
        '<' => ('<', '>'),
        _ => return None,
    };
    let inner = &s[open.len_utf8()..];
    let end = inner.find(close)?;
    Some(inner[..end].to_string())
}

/// Parses `` `line <n> "<file>" <level> `` operands.
fn line_marker(rest: &str) -> Option<(usize, String)> {
    let s = rest.trim();
    let mut parts = s.splitn(2, char::is_whitespace);
    let n: usize = parts.next()?.parse().ok()?;
    let tail = parts.next()?.trim();
    let q0 = tail.find('"')?;
    let q1 = tail[q0 + 1..].find('"')? + q0 + 1;
    Some((n, tail[q0 + 1..q1].to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn pp() -> Preproc {
        Preproc::new(LanguageStandard::Sv2017)
    }

    #[test]
    fn object_macro_expands_bare_and_ticked() {
        let mut p = pp();
        let out = p
            .preprocess_str(
                "`define WIDTH 32\nwire [WIDTH-1:0] bus;\nwire [`WIDTH-1:0] bus2;\n",
                "t.v",
            )
            .unwrap();
        assert_eq!(out, "\nwire [32-1:0] bus;\nwire [32-1:0] bus2;\n");
    }

    #[test]
    fn rescan_substitutes_nested_macros() {
        let mut p = pp();
        let out = p
            .preprocess_str("`define A `B\n`define B 7\n$info(`A);\n", "t.v")
            .unwrap();
        assert_eq!(out, "\n\n$info(7);\n");
    }

    #[test]
    fn self_reference_is_hidden() {
        let mut p = pp();
        let out = p
            .preprocess_str("`define X X + 1\nassign y = X;\n", "t.v")
            .unwrap();
        assert_eq!(out, "\nassign y = X + 1;\n");
    }

    #[test]
    fn function_macro_args_and_arity() {
        let mut p = pp();
        let out = p
            .preprocess_str(
                "`define MAX(a, b) ((a) > (b) ? (a) : (b))\nassign m = `MAX(x, y[3:0]);\n",
                "t.v",
            )
            .unwrap();
        assert_eq!(out, "\nassign m = ((x) > (y[3:0]) ? (x) : (y[3:0]));\n");

        let mut p = pp();
        let err = p
            .preprocess_str("`define MAX(a, b) a\nassign m = `MAX(x);\n", "t.v")
            .unwrap_err();
        assert!(matches!(err, PreprocError::MacroArity(_, _, 2, 1)));
    }

    #[test]
    fn stringification_and_pasting() {
        let mut p = pp();
        let out = p
            .preprocess_str(
                "`define MSG(n) `\"value of n`\"\n$display(`MSG(clk));\n",
                "t.v",
            )
            .unwrap();
        assert_eq!(out, "\n$display(\"value of clk\");\n");

        // a lone `\ collapses to a single backslash inside the string
        let mut p = pp();
        let out = p
            .preprocess_str(
                "`define PATH(p) `\"C:`\\p`\"\n$display(`PATH(tmp));\n",
                "t.v",
            )
            .unwrap();
        assert_eq!(out, "\n$display(\"C:\\tmp\");\n");

        let mut p = pp();
        let out = p
            .preprocess_str("`define CAT(a, b) a``b\nwire `CAT(net, 0);\n", "t.v")
            .unwrap();
        assert_eq!(out, "\nwire net0;\n");
    }

    #[test]
    fn conditional_regions_blank_out() {
        let mut p = pp();
        let out = p
            .preprocess_str(
                "`define DEBUG\n`ifdef DEBUG\nkept;\n`else\ndropped;\n`endif\ntail;\n",
                "t.v",
            )
            .unwrap();
        assert_eq!(out, "\n\nkept;\n\n\n\ntail;\n");
    }

    #[test]
    fn elsif_chain() {
        let mut p = pp().with_defines(vec![("B".to_string(), "1".to_string())]);
        let out = p
            .preprocess_str(
                "`ifdef A\na;\n`elsif B\nb;\n`else\nc;\n`endif\n",
                "t.v",
            )
            .unwrap();
        assert_eq!(out, "\n\n\nb;\n\n\n\n");
    }

    #[test]
    fn dangling_and_unterminated_are_fatal() {
        assert!(matches!(
            pp().preprocess_str("`endif\n", "t.v").unwrap_err(),
            PreprocError::DanglingEndif(_)
        ));
        assert!(matches!(
            pp().preprocess_str("`else\n", "t.v").unwrap_err(),
            PreprocError::DanglingElse(..)
        ));
        let err = pp().preprocess_str("`ifdef X\n", "t.v").unwrap_err();
        match err {
            PreprocError::UnterminatedIfdef(origin, directive) => {
                assert_eq!(origin.line, 1);
                assert_eq!(directive, "ifdef");
            }
            _ => panic!("expected UnterminatedIfdef"),
        }
    }

    #[test]
    fn line_sentinels_survive() {
        let mut p = pp();
        let out = p
            .preprocess_str("one `__LINE__\ntwo `__LINE__\n", "t.v")
            .unwrap();
        assert_eq!(out, "one 1\ntwo 2\n");
    }

    #[test]
    fn file_sentinel_uses_origin() {
        let mut p = pp();
        let out = p.preprocess_str("x = `__FILE__;\n", "top.v").unwrap();
        assert_eq!(out, "x = \"top.v\";\n");
    }

    #[test]
    fn unknown_directive_passes_through_with_warning() {
        let mut p = pp();
        let out = p.preprocess_str("`mystery_pragma on\nwire w;\n", "t.v").unwrap();
        assert_eq!(out, "`mystery_pragma on\nwire w;\n");
        assert_eq!(p.diagnostics().count_of(DiagnosticKind::UnknownDirective), 1);
    }

    #[test]
    fn passthrough_directives_are_kept() {
        let mut p = pp();
        let out = p
            .preprocess_str("`timescale 1ns/1ps\n`default_nettype none\n", "t.v")
            .unwrap();
        assert_eq!(out, "`timescale 1ns/1ps\n`default_nettype none\n");
        assert_eq!(p.default_nettype(), "none");
    }

    #[test]
    fn redefinition_policy() {
        let mut p = pp();
        p.preprocess_str("`define W 8\n`define W 8\n", "t.v").unwrap();
        assert_eq!(p.diagnostics().len(), 0);
        p.preprocess_str("`define W 16\n", "t.v").unwrap();
        assert_eq!(
            p.diagnostics().count_of(DiagnosticKind::MacroRedefinition),
            1
        );
        assert_eq!(p.defines().get("W").unwrap().body(), "16");
    }

    #[test]
    fn define_with_continuation_keeps_line_count() {
        let mut p = pp();
        let out = p
            .preprocess_str("`define SUM a + \\\n  b\nwire s = SUM;\n", "t.v")
            .unwrap();
        assert_eq!(out, "\n\nwire s = a +    b;\n");
    }

    #[test]
    fn includes_emit_markers() {
        let root = tempfile::tempdir().unwrap();
        let inc = root.path().join("hdr.vh");
        write!(std::fs::File::create(&inc).unwrap(), "`define FROM_HDR 1\nwire h;\n").unwrap();
        let top = root.path().join("top.v");
        write!(
            std::fs::File::create(&top).unwrap(),
            "`include \"hdr.vh\"\nwire t;\n"
        )
        .unwrap();

        let mut p = pp();
        let out = p.preprocess_file(top.to_str().unwrap()).unwrap();
        let inc_display = format!("{}", inc.display());
        let top_display = format!("{}", top.display());
        let expected = format!(
            "`line 1 \"{}\" 1\n\nwire h;\n`line 2 \"{}\" 2\nwire t;\n",
            inc_display, top_display
        );
        assert_eq!(out, expected);
        assert_eq!(p.defines().is_defined("FROM_HDR"), true);
    }

    #[test]
    fn include_depth_limit() {
        let root = tempfile::tempdir().unwrap();
        let a = root.path().join("a.vh");
        write!(std::fs::File::create(&a).unwrap(), "`include \"a.vh\"\n").unwrap();
        let mut p = pp().with_include_limit(4);
        let err = p.preprocess_file(a.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, PreprocError::IncludeDepthExceeded(_, 4)));
    }

    #[test]
    fn missing_include_is_fatal() {
        let mut p = pp();
        let err = p
            .preprocess_str("`include \"no_such.vh\"\n", "t.v")
            .unwrap_err();
        assert!(matches!(err, PreprocError::Source(_)));
    }

    #[test]
    fn no_directives_round_trips() {
        let text = "module m;\n  wire a;\nendmodule\n";
        let mut p = pp();
        assert_eq!(p.preprocess_str(text, "t.v").unwrap(), text);
    }
}
