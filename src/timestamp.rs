/// Recognizes the two timestamp prefixes the game server writes in front of log lines
pub struct TimestampPrefix;

impl TimestampPrefix {
    /// `[HH:MM:SS]`
    pub const SHORT_LEN: usize = 10;
    /// `[YYYY-MM-DD HH:MM:SS.mmm] `
    pub const LONG_LEN: usize = 26;

    /// Length of the recognized prefix at the start of `line`, if any.
    /// The short form is checked first; at most one prefix is ever reported.
    pub fn detect(line: &[u8]) -> Option<usize> {
        if line.len() >= Self::SHORT_LEN
            && line[0] == b'['
            && line[3] == b':'
            && line[6] == b':'
            && line[9] == b']'
        {
            return Some(Self::SHORT_LEN);
        }

        if line.len() >= Self::LONG_LEN
            && line[0] == b'['
            && line[5] == b'-'
            && line[14] == b':'
            && line[20] == b'.'
            && line[24] == b']'
        {
            return Some(Self::LONG_LEN);
        }

        None
    }

    /// Strip a recognized prefix from `line`, returning the remainder
    pub fn strip(line: &[u8]) -> &[u8] {
        match Self::detect(line) {
            Some(len) => &line[len..],
            None => line,
        }
    }
}
