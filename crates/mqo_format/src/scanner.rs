use crate::error::ParseError;

const INTEGER_CHARS: &str = "0123456789";
// deliberately loose, `str::parse` rejects lexemes like `1-2.3.4`
const FLOAT_CHARS: &str = "0123456789.-";

/// `name(content)` pair of a material or face line
pub(crate) type Argument<'a> = (&'a str, &'a str);

/// Cursor over `.mqo` text.
///
/// `pos..cur` is the pending slice: readers peek a char, advance `cur` while it belongs to the
/// current token and hand out the pending slice on `commit`. Running out of input ends a token
/// the same way a non-matching char does.
#[derive(Debug, Clone)]
pub(crate) struct Scanner<'a> {
    data: &'a str,
    pos: usize,
    cur: usize,
}

impl<'a> Scanner<'a> {
    pub(crate) fn new(data: &'a str) -> Self {
        Self {
            data,
            pos: 0,
            cur: 0,
        }
    }

    /// Byte offset of the first uncommitted char
    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn peek_char(&self) -> Option<char> {
        self.data[self.cur..].chars().next()
    }

    pub(crate) fn advance(&mut self, width: usize) {
        self.cur += width;
    }

    pub(crate) fn commit(&mut self) -> &'a str {
        let pending = &self.data[self.pos..self.cur];
        self.pos = self.cur;
        pending
    }

    fn take_while<F>(&mut self, accept: F) -> &'a str
    where
        F: Fn(char) -> bool,
    {
        while let Some(c) = self.peek_char() {
            if !accept(c) {
                break;
            }
            self.advance(c.len_utf8());
        }
        self.commit()
    }

    pub(crate) fn skip_space(&mut self) {
        self.take_while(char::is_whitespace);
    }

    /// Reads a run of letters and digits. Any other char is returned on its own, which makes
    /// `{`, `(`, `"` and friends single-char words. Empty at the end of input.
    pub(crate) fn read_word(&mut self) -> &'a str {
        self.skip_space();

        match self.peek_char() {
            Some(c) if !c.is_alphanumeric() => {
                self.advance(c.len_utf8());
                self.commit()
            }
            _ => self.take_while(char::is_alphanumeric),
        }
    }

    pub(crate) fn read_chars(&mut self, valid_chars: &str) -> &'a str {
        self.skip_space();
        self.take_while(|c| valid_chars.contains(c))
    }

    pub(crate) fn read_positive_integer(&mut self) -> Result<usize, ParseError> {
        let word = self.read_chars(INTEGER_CHARS);
        word.parse().map_err(|_| ParseError::MalformedNumber(word.to_owned()))
    }

    pub(crate) fn read_float(&mut self) -> Result<f32, ParseError> {
        let word = self.read_chars(FLOAT_CHARS);
        word.parse().map_err(|_| ParseError::MalformedNumber(word.to_owned()))
    }

    /// Reads up to, but not including, `delimiter`
    pub(crate) fn read_to(&mut self, delimiter: char) -> &'a str {
        self.skip_space();
        self.take_while(|c| c != delimiter)
    }

    /// Reads up to the next line feed, leaving it in place. A trailing `\r` is dropped.
    pub(crate) fn read_line(&mut self) -> &'a str {
        let line = self.take_while(|c| c != '\n');
        line.strip_suffix('\r').unwrap_or(line)
    }

    pub(crate) fn expect_word(&mut self, expected: &'static str) -> Result<(), ParseError> {
        let word = self.read_word();
        if word == expected {
            Ok(())
        } else {
            Err(ParseError::ExpectedToken {
                expected,
                found: word.to_owned(),
            })
        }
    }

    /// Reads `"content"` or `'content'`
    pub(crate) fn read_quote(&mut self) -> Result<&'a str, ParseError> {
        let open = self.read_word();
        let quote = match open {
            "\"" => '"',
            "'" => '\'',
            _ => return Err(ParseError::ExpectedQuote(open.to_owned())),
        };

        let content = self.read_to(quote);
        if self.read_word() != open {
            return Err(ParseError::UnterminatedQuote(quote));
        }

        Ok(content)
    }

    /// Reads `name(content)`. Returns `None` once the input is exhausted.
    pub(crate) fn read_parenthetic_arg(&mut self) -> Result<Option<Argument<'a>>, ParseError> {
        let name = self.read_word();
        if name.is_empty() {
            return Ok(None);
        }

        if self.read_word() != "(" {
            return Err(ParseError::ExpectedOpenParen(name.to_owned()));
        }

        let content = self.read_to(')');

        // only the presence of a closer is checked
        if self.read_word().is_empty() {
            return Err(ParseError::ExpectedCloseParen(name.to_owned()));
        }

        Ok(Some((name, content)))
    }

    /// Skips to the `}` that brings `depth` down to zero and consumes it
    pub(crate) fn skip_balanced_block(&mut self, mut depth: usize) {
        while let Some(c) = self.peek_char() {
            match c {
                '{' => depth += 1,
                '}' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        self.advance(c.len_utf8());
                        break;
                    }
                }
                _ => {}
            }
            self.advance(c.len_utf8());
        }
        self.commit();
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_read_word() {
        let mut scanner = Scanner::new("  Object \"bone\" {\n\tvertex8 -1.5}");

        assert_eq!(scanner.read_word(), "Object");
        assert_eq!(scanner.read_word(), "\"");
        assert_eq!(scanner.read_word(), "bone");
        assert_eq!(scanner.read_word(), "\"");
        assert_eq!(scanner.read_word(), "{");
        assert_eq!(scanner.read_word(), "vertex8");
        assert_eq!(scanner.read_word(), "-");
        assert_eq!(scanner.read_word(), "1");
        assert_eq!(scanner.read_word(), ".");
        assert_eq!(scanner.read_word(), "5");
        assert_eq!(scanner.read_word(), "}");
        assert_eq!(scanner.read_word(), "");
        assert_eq!(scanner.read_word(), "");
    }

    #[test]
    fn test_read_word_multibyte() {
        let mut scanner = Scanner::new("頂点 →x");

        assert_eq!(scanner.read_word(), "頂点");
        assert_eq!(scanner.read_word(), "→");
        assert_eq!(scanner.read_word(), "x");
    }

    #[test]
    fn test_read_line() {
        let mut scanner = Scanner::new("first\r\nsecond\n\nlast");

        assert_eq!(scanner.read_line(), "first");
        // the line feed is left for the next skip
        assert_eq!(scanner.peek_char(), Some('\n'));
        scanner.skip_space();
        assert_eq!(scanner.read_line(), "second");
        scanner.skip_space();
        assert_eq!(scanner.read_line(), "last");
        assert_eq!(scanner.read_line(), "");
    }

    #[test]
    fn test_read_numbers() -> Result<(), ParseError> {
        let mut scanner = Scanner::new("42 -0.25 02 6.125}");

        assert_eq!(scanner.read_positive_integer()?, 42);
        assert_eq!(scanner.read_float()?, -0.25);
        assert_eq!(scanner.read_float()?, 2.0);
        assert_eq!(scanner.read_float()?, 6.125);
        assert_eq!(
            scanner.read_float(),
            Err(ParseError::MalformedNumber(String::new()))
        );

        Ok(())
    }

    #[test]
    fn test_read_float_rejects_loose_lexeme() {
        let mut scanner = Scanner::new("1-2.3.4");
        assert_eq!(
            scanner.read_float(),
            Err(ParseError::MalformedNumber("1-2.3.4".into()))
        );

        let mut scanner = Scanner::new("-7");
        assert_eq!(
            scanner.read_positive_integer(),
            Err(ParseError::MalformedNumber(String::new()))
        );
    }

    #[test]
    fn test_read_to() {
        let mut scanner = Scanner::new("  0 1 2) M(1)");

        assert_eq!(scanner.read_to(')'), "0 1 2");
        assert_eq!(scanner.read_word(), ")");
        assert_eq!(scanner.read_to('#'), "M(1)");
    }

    #[test]
    fn test_read_quote() -> Result<(), ParseError> {
        assert_eq!(Scanner::new("\"bone:Bone\"").read_quote()?, "bone:Bone");
        assert_eq!(Scanner::new(" 'single quoted' ").read_quote()?, "single quoted");
        assert_eq!(Scanner::new("\"\"").read_quote()?, "");

        assert_eq!(
            Scanner::new("name").read_quote(),
            Err(ParseError::ExpectedQuote("name".into()))
        );
        assert_eq!(
            Scanner::new("\"mixed'").read_quote(),
            Err(ParseError::UnterminatedQuote('"'))
        );
        assert_eq!(
            Scanner::new("'mixed\"").read_quote(),
            Err(ParseError::UnterminatedQuote('\''))
        );

        Ok(())
    }

    #[test]
    fn test_read_parenthetic_arg() -> Result<(), ParseError> {
        let mut scanner = Scanner::new("power(5.00) tex(\"a b.bmp\")  ");

        assert_eq!(scanner.read_parenthetic_arg()?, Some(("power", "5.00")));
        assert_eq!(scanner.read_parenthetic_arg()?, Some(("tex", "\"a b.bmp\"")));
        assert_eq!(scanner.read_parenthetic_arg()?, None);

        assert_eq!(
            Scanner::new("V 0 1").read_parenthetic_arg(),
            Err(ParseError::ExpectedOpenParen("V".into()))
        );
        assert_eq!(
            Scanner::new("V(0 1").read_parenthetic_arg(),
            Err(ParseError::ExpectedCloseParen("V".into()))
        );

        Ok(())
    }

    #[test]
    fn test_skip_balanced_block() {
        let mut scanner = Scanner::new("Object { vertex 1 { -1 -1 -1 } } } Material");

        scanner.skip_balanced_block(1);
        assert_eq!(scanner.read_word(), "Material");

        let mut scanner = Scanner::new("{ never closed");
        scanner.skip_balanced_block(1);
        assert_eq!(scanner.read_word(), "");
    }
}
