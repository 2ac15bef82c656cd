use std::collections::BTreeMap;

const BYTE_ORDER_MARK: char = '\u{feff}';

/// One data line of the export, keyed by header name.
///
/// Columns past the end of a short line are simply not present, which the
/// normalizer treats the same as an empty value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    /// 1-based line number in the source text (the header is line 1).
    pub line: usize,
    pub fields: BTreeMap<String, String>,
}

impl RawRecord {
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }
}

/// Splits CSV text into header-keyed records.
///
/// Accepts `\n` and `\r\n` line endings. The header is split on every comma.
/// In data lines, commas inside double quotes are kept as data and quote
/// characters themselves are dropped. Doubled quotes (`""`) are
/// not treated as an escaped quote, each one just toggles the quoted state.
/// Fewer than two lines yields no records.
pub fn tokenize(text: &str) -> Vec<RawRecord> {
    let text = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text);
    let lines: Vec<&str> = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();

    if lines.len() < 2 {
        return Vec::new();
    }

    let headers = split_header(lines[0]);

    lines
        .iter()
        .enumerate()
        .skip(1)
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| build_record(&headers, split_line(line), idx + 1))
        .collect()
}

/// Splits the header on every comma, trimming each name and removing a
/// leading and a trailing double quote.
fn split_header(line: &str) -> Vec<String> {
    line.split(',')
        .map(|name| {
            let name = name.trim();
            let name = name.strip_prefix('"').unwrap_or(name);
            name.strip_suffix('"').unwrap_or(name).to_string()
        })
        .collect()
}

/// Splits one line on commas that are outside double quotes, trimming each field.
pub fn split_line(line: &str) -> Vec<String> {
    let mut values = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                values.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    values.push(current.trim().to_string());

    values
}

fn build_record(headers: &[String], values: Vec<String>, line: usize) -> RawRecord {
    let mut fields = BTreeMap::new();
    let mut values = values.into_iter();

    // A repeated header takes the value of its last occurrence, even when that
    // occurrence is past the end of the line.
    for header in headers {
        match values.next() {
            Some(value) => {
                fields.insert(header.clone(), value);
            }
            None => {
                fields.remove(header);
            }
        }
    }

    RawRecord { line, fields }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_comma_stays_in_field() {
        let fields = split_line(r#"A,"B, still B",C"#);
        assert_eq!(fields, vec!["A", "B, still B", "C"]);
    }

    #[test]
    fn test_fields_are_trimmed_and_unquoted() {
        let fields = split_line(r#"  "Juan Perez" , 1500 ,"  x  ""#);
        assert_eq!(fields, vec!["Juan Perez", "1500", "x"]);
    }

    #[test]
    fn test_doubled_quotes_are_not_escapes() {
        // `""` toggles twice and leaves no quote in the output.
        let fields = split_line(r#"a,"say ""hi"", ok",b"#);
        assert_eq!(fields, vec!["a", "say hi, ok", "b"]);
    }

    #[test]
    fn test_fewer_than_two_lines_is_empty() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("Fecha Ingreso,Cuota Actual").is_empty());
    }

    #[test]
    fn test_header_only_with_trailing_newline_is_empty() {
        assert!(tokenize("Fecha Ingreso,Cuota Actual\n").is_empty());
    }

    #[test]
    fn test_crlf_and_blank_lines() {
        let text = "Fecha Ingreso,Cuota Actual\r\n2024-03-07,100\r\n\r\n   \r\n08/03/2024,200\r\n";
        let records = tokenize(text);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("Fecha Ingreso"), Some("2024-03-07"));
        assert_eq!(records[0].line, 2);
        assert_eq!(records[1].get("Cuota Actual"), Some("200"));
        assert_eq!(records[1].line, 5);
    }

    #[test]
    fn test_short_line_leaves_columns_absent() {
        let records = tokenize("a,b,c\n1,2");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("a"), Some("1"));
        assert_eq!(records[0].get("b"), Some("2"));
        assert_eq!(records[0].get("c"), None);
    }

    #[test]
    fn test_extra_values_are_ignored() {
        let records = tokenize("a,b\n1,2,3,4");
        assert_eq!(records[0].fields.len(), 2);
    }

    #[test]
    fn test_quoted_header_names() {
        let records = tokenize("\"Fecha Ingreso\", \"Producto\"\n2024-01-01,Curso de Rust");
        assert_eq!(records[0].get("Fecha Ingreso"), Some("2024-01-01"));
        assert_eq!(records[0].get("Producto"), Some("Curso de Rust"));
    }

    #[test]
    fn test_header_splits_on_every_comma() {
        let records = tokenize("\"a,b\",c\n1,2,3");
        assert_eq!(records[0].fields.len(), 3);
        assert_eq!(records[0].get("a"), Some("1"));
        assert_eq!(records[0].get("b"), Some("2"));
        assert_eq!(records[0].get("c"), Some("3"));
    }

    #[test]
    fn test_byte_order_mark_is_stripped() {
        let records = tokenize("\u{feff}Fecha Ingreso,Cuota Actual\n2024-01-01,5");
        assert_eq!(records[0].get("Fecha Ingreso"), Some("2024-01-01"));
    }

    #[test]
    fn test_repeated_header_last_wins() {
        let records = tokenize("x,y,x\n1,2,3\n4,5");
        assert_eq!(records[0].get("x"), Some("3"));
        assert_eq!(records[1].get("x"), None);
    }
}
