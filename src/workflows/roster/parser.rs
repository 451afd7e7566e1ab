use std::io::Read;

/// One data row from a roster table. Columns past the end of the row read as `""`.
#[derive(Debug, Clone)]
pub(crate) struct RawRow {
    fields: Vec<String>,
    line: u64,
}

impl RawRow {
    pub(crate) fn field(&self, index: usize) -> &str {
        self.fields.get(index).map_or("", String::as_str)
    }

    pub(crate) fn line(&self) -> u64 {
        self.line
    }

    pub(crate) fn is_blank(&self) -> bool {
        self.fields.iter().all(String::is_empty)
    }
}

/// Reads every data row, skipping the header. Rows may be shorter or longer than the header.
///
/// `csv` only frames lines and commas here. Quotes are resolved afterwards so a
/// quoted section may start anywhere in a field, and invalid UTF-8 decodes to
/// `U+FFFD` instead of failing the table.
pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<RawRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in csv_reader.byte_records() {
        let record = record?;
        let row = RawRow {
            line: record.position().map_or(0, |position| position.line()),
            fields: unquote(&record),
        };
        if row.is_blank() {
            continue;
        }
        rows.push(row);
    }

    Ok(rows)
}

/// Rejoins comma pieces that sit inside quotes, drops the quote marks, and trims.
fn unquote(record: &csv::ByteRecord) -> Vec<String> {
    let mut fields = Vec::with_capacity(record.len());
    let mut current = String::new();
    let mut in_quotes = false;

    for (index, piece) in record.iter().enumerate() {
        if index > 0 && in_quotes {
            current.push(',');
        }

        let text = String::from_utf8_lossy(piece);
        let mut chars = text.chars().peekable();
        while let Some(ch) = chars.next() {
            if ch != '"' {
                current.push(ch);
            } else if in_quotes && chars.peek() == Some(&'"') {
                current.push('"');
                chars.next();
            } else {
                in_quotes = !in_quotes;
            }
        }

        if !in_quotes {
            fields.push(current.trim().to_string());
            current.clear();
        }
    }

    // unterminated quote runs to the end of the line
    if in_quotes {
        fields.push(current.trim().to_string());
    }

    fields
}
