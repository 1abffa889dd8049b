//! Built-in metrics for the standard PDF fonts.
//!
//! Advance widths come from the Adobe AFM files for the base fonts and are in
//! units of 1/1000 em. The ASCII tables cover U+0020..=U+007E. A handful of
//! Latin-1 and typographic symbols that show up in product data (°, ±, ×, ½,
//! en dash, curly quotes) have explicit widths, and accented Latin-1 letters
//! take the width of their base letter, which matches the AFM data for these
//! faces.

use phf::phf_map;

/// Width tables shared by a family of standard faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandardFamily {
    /// Helvetica and Helvetica-Oblique
    Helvetica,
    /// Helvetica-Bold and Helvetica-BoldOblique
    HelveticaBold,
    /// Times-Roman
    Times,
    /// Times-Bold
    TimesBold,
    /// All Courier faces (monospaced, 600 units)
    Courier,
}

/// A standard (non-embedded) PDF font.
#[derive(Debug)]
pub struct StandardFont {
    /// PostScript name
    pub name: &'static str,
    /// Width table family
    pub family: StandardFamily,
    /// Ascender in 1/1000 em
    pub ascender: i16,
    /// Descender in 1/1000 em (negative)
    pub descender: i16,
    /// Whether the face is bold
    pub bold: bool,
}

static HELVETICA: StandardFont = StandardFont {
    name: "Helvetica",
    family: StandardFamily::Helvetica,
    ascender: 718,
    descender: -207,
    bold: false,
};
static HELVETICA_OBLIQUE: StandardFont = StandardFont {
    name: "Helvetica-Oblique",
    family: StandardFamily::Helvetica,
    ascender: 718,
    descender: -207,
    bold: false,
};
static HELVETICA_BOLD: StandardFont = StandardFont {
    name: "Helvetica-Bold",
    family: StandardFamily::HelveticaBold,
    ascender: 718,
    descender: -207,
    bold: true,
};
static HELVETICA_BOLD_OBLIQUE: StandardFont = StandardFont {
    name: "Helvetica-BoldOblique",
    family: StandardFamily::HelveticaBold,
    ascender: 718,
    descender: -207,
    bold: true,
};
static TIMES_ROMAN: StandardFont = StandardFont {
    name: "Times-Roman",
    family: StandardFamily::Times,
    ascender: 683,
    descender: -217,
    bold: false,
};
static TIMES_BOLD: StandardFont = StandardFont {
    name: "Times-Bold",
    family: StandardFamily::TimesBold,
    ascender: 683,
    descender: -217,
    bold: true,
};
static COURIER: StandardFont = StandardFont {
    name: "Courier",
    family: StandardFamily::Courier,
    ascender: 629,
    descender: -157,
    bold: false,
};
static COURIER_BOLD: StandardFont = StandardFont {
    name: "Courier-Bold",
    family: StandardFamily::Courier,
    ascender: 629,
    descender: -157,
    bold: true,
};
static COURIER_OBLIQUE: StandardFont = StandardFont {
    name: "Courier-Oblique",
    family: StandardFamily::Courier,
    ascender: 629,
    descender: -157,
    bold: false,
};
static COURIER_BOLD_OBLIQUE: StandardFont = StandardFont {
    name: "Courier-BoldOblique",
    family: StandardFamily::Courier,
    ascender: 629,
    descender: -157,
    bold: true,
};

/// Standard fonts by PostScript name.
pub static STANDARD_FONTS: phf::Map<&'static str, &'static StandardFont> = phf_map! {
    "Helvetica" => &HELVETICA,
    "Helvetica-Oblique" => &HELVETICA_OBLIQUE,
    "Helvetica-Bold" => &HELVETICA_BOLD,
    "Helvetica-BoldOblique" => &HELVETICA_BOLD_OBLIQUE,
    "Times-Roman" => &TIMES_ROMAN,
    "Times-Bold" => &TIMES_BOLD,
    "Courier" => &COURIER,
    "Courier-Bold" => &COURIER_BOLD,
    "Courier-Oblique" => &COURIER_OBLIQUE,
    "Courier-BoldOblique" => &COURIER_BOLD_OBLIQUE,
};

/// Look up a standard font by PostScript name.
pub fn standard_font(name: &str) -> Option<&'static StandardFont> {
    STANDARD_FONTS.get(name).copied()
}

/// The font used when a requested face is unavailable.
pub fn fallback_font(bold: bool) -> &'static StandardFont {
    if bold {
        &HELVETICA_BOLD
    } else {
        &HELVETICA
    }
}

#[rustfmt::skip]
const HELVETICA_ASCII: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,      // 'p'..'~'
];

#[rustfmt::skip]
const HELVETICA_BOLD_ASCII: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

#[rustfmt::skip]
const TIMES_ASCII: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 278, 278, 564, 564, 564, 444,
    921, 722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, 722, 722,
    556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, 333, 278, 333, 469, 500,
    333, 444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, 500, 500,
    500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, 480, 200, 480, 541,
];

#[rustfmt::skip]
const TIMES_BOLD_ASCII: [u16; 95] = [
    250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 570, 570, 570, 500,
    930, 722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944, 722, 778,
    611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667, 333, 278, 333, 581, 500,
    333, 500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833, 556, 500,
    556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444, 394, 220, 394, 520,
];

impl StandardFont {
    /// Advance width of `ch` in 1/1000 em, or `None` if the face has no glyph.
    pub fn advance(&self, ch: char) -> Option<f32> {
        let table = match self.family {
            StandardFamily::Helvetica => &HELVETICA_ASCII,
            StandardFamily::HelveticaBold => &HELVETICA_BOLD_ASCII,
            StandardFamily::Times => &TIMES_ASCII,
            StandardFamily::TimesBold => &TIMES_BOLD_ASCII,
            StandardFamily::Courier => {
                return courier_covers(ch)
                    .then_some(600.0)
                    .or_else(|| symbol_font_width(ch).map(f32::from));
            },
        };

        let code = ch as u32;
        if (0x20..=0x7E).contains(&code) {
            return Some(table[(code - 0x20) as usize] as f32);
        }
        if ch == '\u{00A0}' {
            return Some(table[0] as f32);
        }
        if let Some(width) = self.symbol_width(ch).or_else(|| symbol_font_width(ch)) {
            return Some(width as f32);
        }
        base_letter(ch).map(|base| table[(base as u32 - 0x20) as usize] as f32)
    }

    /// Widths of the non-ASCII symbols, per family:
    /// (Helvetica, Helvetica-Bold, Times-Roman, Times-Bold).
    fn symbol_width(&self, ch: char) -> Option<u16> {
        let widths: (u16, u16, u16, u16) = match ch {
            '°' => (400, 400, 400, 400),
            '±' | '×' | '÷' | '¬' => (584, 584, 564, 570),
            'µ' => (556, 611, 500, 556),
            '½' | '¼' | '¾' => (834, 834, 750, 750),
            '¹' | '²' | '³' => (333, 333, 300, 300),
            '©' | '®' => (737, 737, 760, 747),
            '™' => (1000, 1000, 980, 1000),
            '–' => (556, 556, 500, 500),
            '—' => (1000, 1000, 1000, 1000),
            '‘' | '’' | '‚' => (222, 278, 333, 333),
            '“' | '”' | '„' => (333, 500, 444, 500),
            '•' => (350, 350, 350, 350),
            '…' => (1000, 1000, 1000, 1000),
            '¢' | '£' | '¥' | '¤' => (556, 556, 500, 500),
            '§' => (556, 556, 500, 500),
            '¶' => (537, 556, 453, 540),
            '·' => (278, 278, 250, 250),
            '¦' => (260, 280, 200, 220),
            '¡' => (333, 333, 333, 333),
            '¿' => (611, 611, 444, 500),
            '«' | '»' => (556, 556, 500, 500),
            'ª' => (370, 370, 276, 300),
            'º' => (365, 365, 310, 330),
            'ß' => (611, 611, 500, 556),
            'Æ' => (1000, 1000, 889, 1000),
            'æ' => (889, 889, 667, 722),
            'Ø' => (778, 778, 722, 778),
            'ø' => (611, 611, 500, 500),
            _ => return None,
        };
        Some(match self.family {
            StandardFamily::Helvetica => widths.0,
            StandardFamily::HelveticaBold => widths.1,
            StandardFamily::Times => widths.2,
            StandardFamily::TimesBold | StandardFamily::Courier => widths.3,
        })
    }
}

/// Symbol font widths for the math and dimension marks the text fonts lack.
/// The Symbol font has no diameter sign; it measures as `emptyset`.
fn symbol_font_width(ch: char) -> Option<u16> {
    let width = match ch {
        '′' => 247,
        '″' => 411,
        '≤' | '≥' | '≈' | '≠' | 'π' => 549,
        '∞' => 713,
        'Δ' => 612,
        'Ω' | '\u{2126}' => 768,
        '∅' | '⌀' => 823,
        _ => return None,
    };
    Some(width)
}

fn courier_covers(ch: char) -> bool {
    let code = ch as u32;
    (0x20..=0x7E).contains(&code) || (0xA0..=0xFF).contains(&code) || "–—‘’‚“”„•…™".contains(ch)
}

/// Base letter of an accented Latin-1 letter.
fn base_letter(ch: char) -> Option<char> {
    let base = match ch {
        'À'..='Å' => 'A',
        'Ç' => 'C',
        'È'..='Ë' => 'E',
        'Ì'..='Ï' => 'I',
        'Ð' => 'D',
        'Ñ' => 'N',
        'Ò'..='Ö' => 'O',
        'Ù'..='Ü' => 'U',
        'Ý' => 'Y',
        'Þ' => 'P',
        'à'..='å' => 'a',
        'ç' => 'c',
        'è'..='ë' => 'e',
        'ì'..='ï' => 'i',
        'ð' => 'o',
        'ñ' => 'n',
        'ò'..='ö' => 'o',
        'ù'..='ü' => 'u',
        'ý' | 'ÿ' => 'y',
        'þ' => 'p',
        _ => return None,
    };
    Some(base)
}
