// ============================================================
// Layer 4 - Cell and Header Preprocessor
// ============================================================
// Cleans raw strings read from the workout exports.
//
// Why do we need to clean cells?
//   App exports and spreadsheet round-trips often leave:
//   - Non-breaking spaces (U+00A0) and zero-width spaces (U+200B)
//   - A byte order mark (U+FEFF) glued to the first header
//   - Tabs and stray line breaks inside notes
//   - Runs of spaces from manual editing
//
// If we don't clean these, "Bench Press" and "Bench  Press"
// count as two exercises and " Date" is not the "Date" column.
//
// Cleaning steps for a cell (applied in order):
//   1. Replace Unicode whitespace variants and control chars with a space
//   2. Collapse multiple spaces into one
//   3. Trim leading/trailing whitespace
//
// Header names additionally go to snake_case:
//   "Exercise Name" → "exercise_name", "Set Order" → "set_order"
//
// Reference: Rust Book §8 (Strings in Rust)
//            Rust Book §13 (Iterators)

pub struct Preprocessor;

impl Preprocessor {
    /// Create a new Preprocessor instance
    pub fn new() -> Self {
        Self
    }

    /// Clean one cell to a single trimmed line.
    pub fn clean(&self, text: &str) -> String {
        // ── Step 1: Normalise individual characters ───────────────────────────
        let step1 = text.chars().map(|c| match c {
            '\t' | '\r' | '\n' => ' ',
            '\u{00A0}' | '\u{200B}' | '\u{FEFF}' => ' ',
            c if c.is_control() => ' ',
            c => c,
        });

        // ── Step 2: Collapse runs of spaces ───────────────────────────────────
        let mut out        = String::with_capacity(text.len());
        let mut last_space = false;
        for c in step1 {
            if c == ' ' {
                if !last_space {
                    out.push(' ');
                }
                last_space = true;
            } else {
                out.push(c);
                last_space = false;
            }
        }

        // ── Step 3: Trim ──────────────────────────────────────────────────────
        out.trim().to_string()
    }

    /// Clean a header and convert it to snake_case.
    /// Anything that isn't alphanumeric becomes a single underscore.
    pub fn normalize_header(&self, header: &str) -> String {
        let cleaned = self.clean(header).to_lowercase();

        let mut out        = String::with_capacity(cleaned.len());
        let mut last_under = true; // suppresses a leading underscore
        for c in cleaned.chars() {
            if c.is_alphanumeric() {
                out.push(c);
                last_under = false;
            } else if !last_under {
                out.push('_');
                last_under = true;
            }
        }
        out.trim_end_matches('_').to_string()
    }
}

/// Implement Default so Preprocessor can be created with Preprocessor::default()
impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}
