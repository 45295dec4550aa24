//! Decoders for the obfuscation schemes some listing sources use to hide
//! host or port text from naive scrapers. All pure functions over page
//! text, independently testable from the network pipeline.

use anyhow::{anyhow, Result};
use base64::{engine::general_purpose, Engine as _};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// Decode a base64 token carrying "host:port".
pub fn decode_base64_hostport(token: &str) -> Option<(String, String)> {
    let bytes = general_purpose::STANDARD.decode(token).ok()?;
    let text = String::from_utf8(bytes).ok()?;
    let (host, port) = text.split_once(':')?;
    Some((host.to_string(), port.to_string()))
}

/// Decode a hexadecimal port token to its decimal form.
pub fn hex_to_decimal_port(token: &str) -> Option<String> {
    u32::from_str_radix(token, 16).ok().map(|p| p.to_string())
}

// `a=7;b=2;c=9;` style inline symbol tables.
static DIGIT_TABLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b([a-z])=(\d);").unwrap());

/// Parse the page's single-letter symbol table into a letter→digit map.
/// Later definitions overwrite earlier ones, matching how the page's own
/// script would evaluate them.
pub fn parse_digit_table(page: &str) -> HashMap<char, char> {
    DIGIT_TABLE_RE
        .captures_iter(page)
        .map(|c| {
            let letter = c[1].chars().next().unwrap();
            let digit = c[2].chars().next().unwrap();
            (letter, digit)
        })
        .collect()
}

/// Rewrite every `wrapper`-matched concatenation expression (capture group 1,
/// e.g. `a+b+c` out of `(""+a+b+c)`) into the digits its symbols map to,
/// substituting the numeric result back into the page so the baseline
/// ip:port scan can run over the rewritten text. A symbol missing from the
/// table is an extraction error, caught per page by the pipeline.
pub fn rewrite_concat_ports(
    page: &str,
    table: &HashMap<char, char>,
    wrapper: &Regex,
) -> Result<String> {
    let mut out = String::with_capacity(page.len());
    let mut last = 0;
    for caps in wrapper.captures_iter(page) {
        let whole = caps.get(0).unwrap();
        let mut num = String::new();
        for ch in caps[1].chars().filter(|c| *c != '+') {
            let digit = table
                .get(&ch)
                .ok_or_else(|| anyhow!("symbol '{}' missing from digit table", ch))?;
            num.push(*digit);
        }
        out.push_str(&page[last..whole.start()]);
        out.push_str(&num);
        last = whole.end();
    }
    out.push_str(&page[last..]);
    Ok(out)
}

// `>i9w3m3=5` or `;k1y5=2^i9w3m3` style definitions, resolved top to bottom.
static XOR_TABLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[>;]([a-z\d]{4,})=([a-z\d^]+)").unwrap());

// Port rendered as a chain of `+(sym1^sym2)` groups, one digit per group.
static XOR_PORT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:\+\([a-z0-9^+]+\))+").unwrap());

/// Parse the XOR-keyed symbol table. Symbols are defined either directly as
/// a number or as `number^earlierSymbol`; definition order matters, so a
/// reference to a symbol not yet defined is an error.
pub fn parse_xor_table(page: &str) -> Result<HashMap<String, u32>> {
    let mut table: HashMap<String, u32> = HashMap::new();
    for caps in XOR_TABLE_RE.captures_iter(page) {
        let name = caps[1].to_string();
        let value = match caps[2].split_once('^') {
            Some((num, key)) => {
                let num: u32 = num.parse()?;
                let prior = table
                    .get(key)
                    .ok_or_else(|| anyhow!("symbol '{}' referenced before definition", key))?;
                num ^ prior
            }
            None => caps[2].parse()?,
        };
        table.insert(name, value);
    }
    Ok(table)
}

/// Rewrite every XOR port expression into its decimal digits: each
/// `(sym1^sym2)` group contributes one digit, the XOR of its two resolved
/// operands, concatenated in group order.
pub fn rewrite_xor_ports(page: &str, table: &HashMap<String, u32>) -> Result<String> {
    let mut out = String::with_capacity(page.len());
    let mut last = 0;
    for m in XOR_PORT_RE.find_iter(page) {
        let mut num = String::new();
        for group in m.as_str().split('+').skip(1) {
            let inner = group.trim_matches(|c| c == '(' || c == ')');
            let (left, right) = inner
                .split_once('^')
                .ok_or_else(|| anyhow!("malformed xor group '{}'", group))?;
            let a = table
                .get(left)
                .ok_or_else(|| anyhow!("symbol '{}' missing from xor table", left))?;
            let b = table
                .get(right)
                .ok_or_else(|| anyhow!("symbol '{}' missing from xor table", right))?;
            num.push_str(&(a ^ b).to_string());
        }
        out.push_str(&page[last..m.start()]);
        out.push_str(&num);
        last = m.end();
    }
    out.push_str(&page[last..]);
    Ok(out)
}
