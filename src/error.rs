/// Errors that can occur while loading a font description.
///
/// All variants are load-time fatal: a font that fails to load leaves no
/// partially usable state behind. Layout itself never fails (unknown code
/// points and malformed bytes are dropped, see [`crate::layout`]).
#[derive(Debug, Clone, PartialEq)]
pub enum FontError {
    /// The font description file could not be read.
    Io(String),

    /// A `char` record appeared before the `common` record that supplies the
    /// atlas dimensions and nominal line height.
    MissingCommonRecord { line: usize },

    /// The `common` record carries a zero or negative atlas dimension or
    /// line height, which would make metric normalization meaningless.
    InvalidCommonRecord { line: usize, key: &'static str },

    /// A recognized record is missing a required `key=value` field.
    MissingField {
        line: usize,
        record: &'static str,
        key: &'static str,
    },

    /// A required field carries a value that does not parse as a number.
    MalformedField {
        line: usize,
        key: &'static str,
        value: String,
    },

    /// A glyph id exceeds the maximum supported id.
    GlyphIdOutOfRange { line: usize, id: u32 },
}

impl std::fmt::Display for FontError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FontError::Io(msg) => write!(f, "Failed to read font description: {}", msg),
            FontError::MissingCommonRecord { line } => {
                write!(
                    f,
                    "Line {}: 'char' record before the 'common' record",
                    line
                )
            }
            FontError::InvalidCommonRecord { line, key } => {
                write!(
                    f,
                    "Line {}: 'common' record field '{}' must be positive",
                    line, key
                )
            }
            FontError::MissingField { line, record, key } => {
                write!(
                    f,
                    "Line {}: '{}' record is missing field '{}'",
                    line, record, key
                )
            }
            FontError::MalformedField { line, key, value } => {
                write!(
                    f,
                    "Line {}: field '{}' has non-numeric value '{}'",
                    line, key, value
                )
            }
            FontError::GlyphIdOutOfRange { line, id } => {
                write!(
                    f,
                    "Line {}: glyph id {} is out of range (max {})",
                    line,
                    id,
                    crate::atlas::MAX_GLYPH_ID
                )
            }
        }
    }
}

impl std::error::Error for FontError {}

impl From<std::io::Error> for FontError {
    fn from(err: std::io::Error) -> Self {
        FontError::Io(err.to_string())
    }
}

/// Result type for font loading operations.
pub type FontResult<T> = Result<T, FontError>;
