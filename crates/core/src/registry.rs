//! Symbol registry - the static braille catalog and mode queries
//!
//! The catalog is a data table built at compile time. Derived fields (the dot
//! mask and the Perkins key mapping) are computed from the dot list by pure
//! functions, so every entry is immutable and side-effect-free.
//!
//! Dot numbering reference:
//!
//! ```text
//! 1 4
//! 2 5
//! 3 6
//! ```

use crate::types::PERKINS_KEYS;

/// Set of modes an item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ModeTags(u8);

impl ModeTags {
    pub const GRADE1_LETTERS: ModeTags = ModeTags(1 << 0);
    pub const GRADE1_NUMBERS: ModeTags = ModeTags(1 << 1);
    pub const GRADE1_LETTERS_NUMBERS: ModeTags = ModeTags(1 << 2);
    pub const GRADE2_SYMBOLS: ModeTags = ModeTags(1 << 3);
    pub const GRADE2_WORDS: ModeTags = ModeTags(1 << 4);

    pub const fn union(self, other: ModeTags) -> ModeTags {
        ModeTags(self.0 | other.0)
    }

    pub const fn contains(self, other: ModeTags) -> bool {
        self.0 & other.0 == other.0
    }
}

/// Compute a dot mask: bit `n-1` is set for dot `n`. Dots outside 1-6 are ignored.
///
/// # Examples
///
/// ```
/// use whack_a_braille_core::registry::dots_to_mask;
///
/// assert_eq!(dots_to_mask(&[1]), 0b000001);
/// assert_eq!(dots_to_mask(&[1, 2, 4]), 0b001011);
/// assert_eq!(dots_to_mask(&[]), 0);
/// ```
pub const fn dots_to_mask(dots: &[u8]) -> u8 {
    let mut mask = 0u8;
    let mut i = 0;
    while i < dots.len() {
        let dot = dots[i];
        if dot >= 1 && dot <= 6 {
            mask |= 1 << (dot - 1);
        }
        i += 1;
    }
    mask
}

/// A catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BrailleItem {
    /// Unique lowercase identity, also the committed-text match key.
    pub id: &'static str,
    /// Short label drawn on the mole.
    pub display_label: &'static str,
    /// What speech says for this item.
    pub announce_text: &'static str,
    pub mode_tags: ModeTags,
    /// Raised dots in ascending order.
    pub dots: &'static [u8],
    pub dot_mask: u8,
    /// Direct QWERTY key, if the item has one.
    pub standard_key: Option<char>,
}

impl BrailleItem {
    pub const fn new(
        id: &'static str,
        announce_text: &'static str,
        mode_tags: ModeTags,
        dots: &'static [u8],
        standard_key: Option<char>,
    ) -> Self {
        Self {
            id,
            display_label: id,
            announce_text,
            mode_tags,
            dots,
            dot_mask: dots_to_mask(dots),
            standard_key,
        }
    }

    /// Perkins keys that must be chorded to type this item.
    pub fn perkins_keys(&self) -> impl Iterator<Item = char> + '_ {
        self.dots
            .iter()
            .filter(|&&d| (1..=6).contains(&d))
            .map(|&d| PERKINS_KEYS[(d - 1) as usize])
    }

    pub fn in_mode(&self, tags: ModeTags) -> bool {
        self.mode_tags.contains(tags)
    }
}

const LETTER: ModeTags = ModeTags::GRADE1_LETTERS.union(ModeTags::GRADE1_LETTERS_NUMBERS);
const NUMBER: ModeTags = ModeTags::GRADE1_NUMBERS.union(ModeTags::GRADE1_LETTERS_NUMBERS);
const SYMBOL: ModeTags = ModeTags::GRADE2_SYMBOLS;
const WORD: ModeTags = ModeTags::GRADE2_WORDS;

const fn letter(id: &'static str, key: char, dots: &'static [u8]) -> BrailleItem {
    BrailleItem::new(id, id, LETTER, dots, Some(key))
}

const fn number(id: &'static str, key: char, dots: &'static [u8]) -> BrailleItem {
    BrailleItem::new(id, id, NUMBER, dots, Some(key))
}

const fn symbol(id: &'static str, announce: &'static str, dots: &'static [u8]) -> BrailleItem {
    BrailleItem::new(id, announce, SYMBOL, dots, None)
}

const fn word(id: &'static str, dots: &'static [u8]) -> BrailleItem {
    BrailleItem::new(id, id, WORD, dots, None)
}

/// The full catalog, in presentation order.
pub static CATALOG: &[BrailleItem] = &[
    // Grade 1 letters
    letter("a", 'a', &[1]),
    letter("b", 'b', &[1, 2]),
    letter("c", 'c', &[1, 4]),
    letter("d", 'd', &[1, 4, 5]),
    letter("e", 'e', &[1, 5]),
    letter("f", 'f', &[1, 2, 4]),
    letter("g", 'g', &[1, 2, 4, 5]),
    letter("h", 'h', &[1, 2, 5]),
    letter("i", 'i', &[2, 4]),
    letter("j", 'j', &[2, 4, 5]),
    letter("k", 'k', &[1, 3]),
    letter("l", 'l', &[1, 2, 3]),
    letter("m", 'm', &[1, 3, 4]),
    letter("n", 'n', &[1, 3, 4, 5]),
    letter("o", 'o', &[1, 3, 5]),
    letter("p", 'p', &[1, 2, 3, 4]),
    letter("q", 'q', &[1, 2, 3, 4, 5]),
    letter("r", 'r', &[1, 2, 3, 5]),
    letter("s", 's', &[2, 3, 4]),
    letter("t", 't', &[2, 3, 4, 5]),
    letter("u", 'u', &[1, 3, 6]),
    letter("v", 'v', &[1, 2, 3, 6]),
    letter("w", 'w', &[2, 4, 5, 6]),
    letter("x", 'x', &[1, 3, 4, 6]),
    letter("y", 'y', &[1, 3, 4, 5, 6]),
    letter("z", 'z', &[1, 3, 5, 6]),
    // Grade 1 numbers (no number sign)
    number("1", '1', &[1]),
    number("2", '2', &[1, 2]),
    number("3", '3', &[1, 4]),
    number("4", '4', &[1, 4, 5]),
    number("5", '5', &[1, 5]),
    number("6", '6', &[1, 2, 4]),
    number("7", '7', &[1, 2, 4, 5]),
    number("8", '8', &[1, 2, 5]),
    number("9", '9', &[2, 4]),
    number("0", '0', &[2, 4, 5]),
    // Grade 2 symbol contractions, spoken as words
    symbol("and", "and", &[1, 2, 3, 4, 6]),
    symbol("for", "for", &[1, 2, 3, 4, 5, 6]),
    symbol("of", "of", &[1, 2, 3, 5, 6]),
    symbol("the", "the", &[2, 3, 4, 6]),
    symbol("with", "with", &[2, 3, 4, 5, 6]),
    symbol("ing", "ing", &[3, 4, 6]),
    // Grade 2 symbol contractions, letters spoken individually
    symbol("ch", "C H", &[1, 6]),
    symbol("gh", "G H", &[1, 2, 6]),
    symbol("sh", "S H", &[1, 4, 6]),
    symbol("th", "T H", &[1, 4, 5, 6]),
    symbol("wh", "W H", &[1, 5, 6]),
    symbol("ed", "E D", &[1, 2, 4, 6]),
    symbol("er", "E R", &[1, 2, 4, 5, 6]),
    symbol("ou", "O U", &[1, 2, 5, 6]),
    symbol("ow", "O W", &[2, 4, 6]),
    symbol("st", "S T", &[3, 4]),
    symbol("ar", "A R", &[3, 4, 5]),
    // Grade 2 whole-word contractions
    word("but", &[1, 2]),
    word("can", &[1, 4]),
    word("do", &[1, 4, 5]),
    word("every", &[1, 5]),
    word("from", &[1, 2, 4]),
    word("go", &[1, 2, 4, 5]),
    word("have", &[1, 2, 5]),
    word("just", &[2, 4, 5]),
    word("knowledge", &[1, 3]),
    word("like", &[1, 2, 3]),
    word("more", &[1, 3, 4]),
    word("not", &[1, 3, 4, 5]),
    word("people", &[1, 2, 3, 4]),
    word("quite", &[1, 2, 3, 4, 5]),
    word("rather", &[1, 2, 3, 5]),
    word("so", &[2, 3, 4]),
    word("that", &[2, 3, 4, 5]),
    word("us", &[1, 3, 6]),
    word("very", &[1, 2, 3, 6]),
    word("will", &[2, 4, 5, 6]),
    word("it", &[1, 3, 4, 6]),
    word("you", &[1, 3, 4, 5, 6]),
    word("as", &[1, 3, 5, 6]),
];

/// Selectable item pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BrailleMode {
    Grade1Letters,
    Grade1Numbers,
    Grade1LettersNumbers,
    Grade2Symbols,
    Grade2Words,
    /// The full catalog.
    Everything,
    /// Grade 1 letters from `a` through the given letter.
    LettersThrough(char),
}

impl BrailleMode {
    /// Every named mode, in menu order.
    pub const ALL: [BrailleMode; 6] = [
        BrailleMode::Grade1Letters,
        BrailleMode::Grade1Numbers,
        BrailleMode::Grade1LettersNumbers,
        BrailleMode::Grade2Symbols,
        BrailleMode::Grade2Words,
        BrailleMode::Everything,
    ];

    /// Parse a mode id (case-insensitive).
    ///
    /// # Examples
    ///
    /// ```
    /// use whack_a_braille_core::registry::BrailleMode;
    ///
    /// assert_eq!(BrailleMode::from_str("grade1Letters"), Some(BrailleMode::Grade1Letters));
    /// assert_eq!(BrailleMode::from_str("lettersAtoJ"), Some(BrailleMode::LettersThrough('j')));
    /// assert_eq!(BrailleMode::from_str("klingon"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase();
        match lower.as_str() {
            "grade1letters" => Some(BrailleMode::Grade1Letters),
            "grade1numbers" => Some(BrailleMode::Grade1Numbers),
            "grade1lettersnumbers" => Some(BrailleMode::Grade1LettersNumbers),
            "grade2symbols" => Some(BrailleMode::Grade2Symbols),
            "grade2words" => Some(BrailleMode::Grade2Words),
            "everything" => Some(BrailleMode::Everything),
            other => {
                let rest = other.strip_prefix("lettersato")?;
                let mut chars = rest.chars();
                match (chars.next(), chars.next()) {
                    (Some(end), None) if end.is_ascii_lowercase() => {
                        Some(BrailleMode::LettersThrough(end))
                    }
                    _ => None,
                }
            }
        }
    }

    /// Canonical mode id.
    pub fn id(&self) -> String {
        match self {
            BrailleMode::Grade1Letters => "grade1Letters".to_string(),
            BrailleMode::Grade1Numbers => "grade1Numbers".to_string(),
            BrailleMode::Grade1LettersNumbers => "grade1LettersNumbers".to_string(),
            BrailleMode::Grade2Symbols => "grade2Symbols".to_string(),
            BrailleMode::Grade2Words => "grade2Words".to_string(),
            BrailleMode::Everything => "everything".to_string(),
            BrailleMode::LettersThrough(end) => format!("lettersAto{}", end.to_ascii_uppercase()),
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> String {
        match self {
            BrailleMode::Grade1Letters => "Letters only (Grade 1)".to_string(),
            BrailleMode::Grade1Numbers => "Numbers only (Grade 1)".to_string(),
            BrailleMode::Grade1LettersNumbers => "Letters and numbers (Grade 1)".to_string(),
            BrailleMode::Grade2Symbols => "Grade 2 contractions (symbols)".to_string(),
            BrailleMode::Grade2Words => "Grade 2 whole-word contractions".to_string(),
            BrailleMode::Everything => "Everything".to_string(),
            BrailleMode::LettersThrough(end) => {
                format!("Letters A through {} (Grade 1)", end.to_ascii_uppercase())
            }
        }
    }

    /// Modes without single-key QWERTY targets must be played with Perkins input.
    pub fn requires_perkins(&self) -> bool {
        matches!(
            self,
            BrailleMode::Grade2Symbols | BrailleMode::Grade2Words | BrailleMode::Everything
        )
    }

    fn includes(&self, item: &BrailleItem) -> bool {
        match self {
            BrailleMode::Grade1Letters => item.in_mode(ModeTags::GRADE1_LETTERS),
            BrailleMode::Grade1Numbers => item.in_mode(ModeTags::GRADE1_NUMBERS),
            BrailleMode::Grade1LettersNumbers => item.in_mode(ModeTags::GRADE1_LETTERS_NUMBERS),
            BrailleMode::Grade2Symbols => item.in_mode(ModeTags::GRADE2_SYMBOLS),
            BrailleMode::Grade2Words => item.in_mode(ModeTags::GRADE2_WORDS),
            BrailleMode::Everything => true,
            BrailleMode::LettersThrough(end) => {
                if !item.in_mode(ModeTags::GRADE1_LETTERS) {
                    return false;
                }
                let mut chars = item.id.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => {
                        let c = c.to_ascii_lowercase() as u32;
                        c >= 'a' as u32 && c <= end.to_ascii_lowercase() as u32
                    }
                    _ => false,
                }
            }
        }
    }
}

/// Items for a mode, in catalog order.
pub fn items_for(mode: BrailleMode) -> Vec<&'static BrailleItem> {
    CATALOG.iter().filter(|item| mode.includes(item)).collect()
}

/// Items for a mode id. Unknown ids yield an empty pool.
///
/// # Examples
///
/// ```
/// use whack_a_braille_core::registry::items_for_mode;
///
/// assert_eq!(items_for_mode("grade1Letters").len(), 26);
/// assert!(items_for_mode("not-a-mode").is_empty());
/// ```
pub fn items_for_mode(mode_id: &str) -> Vec<&'static BrailleItem> {
    BrailleMode::from_str(mode_id)
        .map(items_for)
        .unwrap_or_default()
}

/// Whether a mode id forces Perkins input. Unknown ids do not.
pub fn mode_requires_perkins(mode_id: &str) -> bool {
    BrailleMode::from_str(mode_id).is_some_and(|m| m.requires_perkins())
}

pub fn find_by_id(id: &str) -> Option<&'static BrailleItem> {
    let id = id.trim().to_lowercase();
    CATALOG.iter().find(|item| item.id == id)
}

/// First catalog item (in catalog order) with the given dot mask.
pub fn find_by_dot_mask(dot_mask: u8) -> Option<&'static BrailleItem> {
    if dot_mask == 0 {
        return None;
    }
    CATALOG.iter().find(|item| item.dot_mask == dot_mask)
}
