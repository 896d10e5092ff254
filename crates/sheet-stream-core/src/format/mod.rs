//! Best-effort rendering of numeric cells to the text a spreadsheet would display.
//!
//! Decoders resolve a cell's style to a [`NumberFormat`] and call
//! [`NumberFormat::render`]. Rendering covers the common cases (General,
//! fixed decimals, grouping, percent, scientific, dates and times); it is not
//! a complete implementation of the format-code language.

mod date;
mod number;

pub use date::DateSystem;

/// Number format for cell display
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NumberFormat {
    /// General format (default)
    #[default]
    General,

    /// Built-in format by ID
    BuiltIn(u32),

    /// Custom format string
    Custom(String),
}

impl NumberFormat {
    /// 0 - General
    pub const ID_GENERAL: u32 = 0;
    /// 14 - mm-dd-yy
    pub const ID_DATE_SHORT: u32 = 14;
    /// 22 - m/d/yy h:mm
    pub const ID_DATETIME: u32 = 22;
    /// 49 - @
    pub const ID_TEXT: u32 = 49;

    /// Resolve a format id against the document's custom format table.
    ///
    /// Custom codes take precedence; otherwise the id is treated as built-in.
    pub fn resolve(id: u32, custom: Option<&str>) -> Self {
        match custom {
            Some(code) => NumberFormat::Custom(code.to_string()),
            None if id == Self::ID_GENERAL => NumberFormat::General,
            None => NumberFormat::BuiltIn(id),
        }
    }

    /// Get the format string
    pub fn format_string(&self) -> &str {
        match self {
            NumberFormat::General => "General",
            NumberFormat::BuiltIn(id) => Self::builtin_format_string(*id),
            NumberFormat::Custom(s) => s,
        }
    }

    /// Get built-in format string by ID
    fn builtin_format_string(id: u32) -> &'static str {
        match id {
            0 => "General",
            1 => "0",
            2 => "0.00",
            3 => "#,##0",
            4 => "#,##0.00",
            9 => "0%",
            10 => "0.00%",
            11 => "0.00E+00",
            12 => "# ?/?",
            13 => "# ??/??",
            14 => "mm-dd-yy",
            15 => "d-mmm-yy",
            16 => "d-mmm",
            17 => "mmm-yy",
            18 => "h:mm AM/PM",
            19 => "h:mm:ss AM/PM",
            20 => "h:mm",
            21 => "h:mm:ss",
            22 => "m/d/yy h:mm",
            37 => "#,##0 ;(#,##0)",
            38 => "#,##0 ;[Red](#,##0)",
            39 => "#,##0.00;(#,##0.00)",
            40 => "#,##0.00;[Red](#,##0.00)",
            45 => "mm:ss",
            46 => "[h]:mm:ss",
            47 => "mmss.0",
            48 => "##0.0E+0",
            49 => "@",
            _ => "General",
        }
    }

    /// Check if this is a date/time format
    pub fn is_date_format(&self) -> bool {
        match self {
            NumberFormat::BuiltIn(id) => matches!(id, 14..=22 | 45..=47),
            NumberFormat::Custom(s) => date::has_date_tokens(first_section(s)),
            NumberFormat::General => false,
        }
    }

    /// Render a numeric cell value as display text.
    pub fn render(&self, value: f64, dates: DateSystem) -> String {
        let code = self.format_string();
        if code.eq_ignore_ascii_case("general") || code == "@" {
            return number::general(value);
        }
        let sections = split_sections(code);
        if self.is_date_format() {
            if let Some(text) = date::render(value, sections[0], dates) {
                return text;
            }
            return number::general(value);
        }
        number::render(value, &sections)
    }
}

/// Split a format code on `;` outside quoted literals. Always yields at least one section.
fn split_sections(code: &str) -> Vec<&str> {
    let mut sections = Vec::new();
    let mut in_quote = false;
    let mut start = 0;
    for (i, c) in code.char_indices() {
        match c {
            '"' => in_quote = !in_quote,
            ';' if !in_quote => {
                sections.push(&code[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    sections.push(&code[start..]);
    sections
}

/// The positive-number section of a format code.
fn first_section(code: &str) -> &str {
    split_sections(code)[0]
}
