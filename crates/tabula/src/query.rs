use crate::error::{FrameError, FrameResult};
use crate::filter::CompareOp;
use crate::table::Table;
use crate::value::Scalar;

impl Table {
    /// Filter with a textual `column operator value` expression.
    ///
    /// Tokens are separated by whitespace. Any token may be wrapped in single or double quotes
    /// to include spaces, e.g. `name == "Ada Lovelace"`.
    pub fn query(&self, expr: &str) -> Table {
        self.chain("Query", |t| {
            let tokens = tokenize(expr)?;
            let [column, op, literal] = <[String; 3]>::try_from(tokens).map_err(|tokens| {
                FrameError::parse(
                    "Query",
                    format!(
                        "expected 'column operator value', got {} tokens",
                        tokens.len()
                    ),
                )
            })?;

            let op: CompareOp = op
                .parse()
                .map_err(|err| FrameError::wrap("Query", err))?;
            let kind = t.require_column("Query", &column)?.kind();
            let value = Scalar::parse(&literal, kind)
                .map_err(|err| FrameError::wrap("Query", err).with_column(column.as_str()))?;

            t.filter_rows("Query", &column, op, &value)
        })
    }
}

fn tokenize(expr: &str) -> FrameResult<Vec<String>> {
    let mut tokens = Vec::new();
    let mut chars = expr.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        let mut token = String::new();
        if c == '"' || c == '\'' {
            chars.next();
            loop {
                match chars.next() {
                    Some(ch) if ch == c => break,
                    Some(ch) => token.push(ch),
                    None => {
                        return Err(FrameError::parse(
                            "Query",
                            format!("unterminated {c} quote in expression"),
                        ))
                    }
                }
            }
        } else {
            while let Some(&ch) = chars.peek() {
                if ch.is_whitespace() {
                    break;
                }
                token.push(ch);
                chars.next();
            }
        }
        tokens.push(token);
    }
    Ok(tokens)
}
