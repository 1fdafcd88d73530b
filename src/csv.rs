//! Single-line CSV tokenizer.
//!
//! A `"` toggles quoted mode and is dropped; a `,` outside quotes ends the
//! field. Doubled quotes (`""`) inside a quoted field are not treated as an
//! escape: each one toggles the mode again.

/// Splits one CSV record into trimmed fields.
#[must_use]
pub fn parse_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    fields.push(current.trim().to_string());

    fields
}
