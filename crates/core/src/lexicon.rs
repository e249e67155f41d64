//! Static lexicon tables used by prompt building and fallback synthesis.
//!
//! Tables are small enough that a linear scan over a `&[(key, value)]` slice
//! beats any map in both clarity and speed.

use crate::plan::Gender;

// ---------------------------------------------------------------------------
// Surnames
// ---------------------------------------------------------------------------

/// Common family names, in the order used for deterministic fallback picks.
pub const SURNAMES: [&str; 30] = [
    "王", "李", "张", "刘", "陈", "杨", "赵", "黄", "周", "吴", "徐", "孙", "胡", "朱", "高", "林",
    "何", "郭", "马", "罗", "梁", "宋", "郑", "谢", "韩", "唐", "冯", "于", "董", "萧",
];

const SURNAME_PINYIN: &[(&str, &str)] = &[
    ("王", "Wáng"),
    ("李", "Lǐ"),
    ("张", "Zhāng"),
    ("刘", "Liú"),
    ("陈", "Chén"),
    ("杨", "Yáng"),
    ("赵", "Zhào"),
    ("黄", "Huáng"),
    ("周", "Zhōu"),
    ("吴", "Wú"),
    ("徐", "Xú"),
    ("孙", "Sūn"),
    ("胡", "Hú"),
    ("朱", "Zhū"),
    ("高", "Gāo"),
    ("林", "Lín"),
    ("何", "Hé"),
    ("郭", "Guō"),
    ("马", "Mǎ"),
    ("罗", "Luó"),
    ("梁", "Liáng"),
    ("宋", "Sòng"),
    ("郑", "Zhèng"),
    ("谢", "Xiè"),
    ("韩", "Hán"),
    ("唐", "Táng"),
    ("冯", "Féng"),
    ("于", "Yú"),
    ("董", "Dǒng"),
    ("萧", "Xiāo"),
];

/// Reading used for a surname missing from [`SURNAME_PINYIN`].
pub const DEFAULT_SURNAME_PINYIN: &str = "Wáng";

// ---------------------------------------------------------------------------
// Given-name characters
// ---------------------------------------------------------------------------

/// `(character, pinyin, gloss)` for every character appearing in the
/// fallback given names.
const GIVEN_CHARS: &[(char, &str, &str)] = &[
    ('志', "Zhì", "Ambition"),
    ('明', "Míng", "Bright"),
    ('建', "Jiàn", "Build"),
    ('华', "Huá", "Splendor"),
    ('伟', "Wěi", "Great"),
    ('强', "Qiáng", "Strength"),
    ('俊', "Jùn", "Talented"),
    ('杰', "Jié", "Outstanding"),
    ('文', "Wén", "Cultured"),
    ('昊', "Hào", "Vast sky"),
    ('雅', "Yǎ", "Elegant"),
    ('昆', "Kūn", "Harmonious"),
    ('美', "Měi", "Beautiful"),
    ('丽', "Lì", "Beautiful"),
    ('慧', "Huì", "Wisdom"),
    ('敏', "Mǐn", "Agile"),
    ('雨', "Yǔ", "Rain"),
    ('晴', "Qíng", "Clear"),
    ('诗', "Shī", "Poetry"),
    ('涵', "Hán", "Depth"),
    ('婉', "Wǎn", "Graceful"),
    ('如', "Rú", "As/like"),
    ('和', "Hé", "Harmony"),
    ('谐', "Xié", "Harmony"),
    ('光', "Guāng", "Light"),
    ('希', "Xī", "Hope"),
    ('望', "Wàng", "Hope"),
    ('未', "Wèi", "Future"),
    ('来', "Lái", "Coming"),
    ('好', "Hǎo", "Good"),
    ('智', "Zhì", "Wisdom"),
];

/// Reading used for a given-name character missing from the table.
pub const DEFAULT_CHAR_PINYIN: &str = "Míng";

/// Gloss used for a given-name character missing from the table.
pub const DEFAULT_CHAR_MEANING: &str = "Meaningful";

// ---------------------------------------------------------------------------
// Fallback given names
// ---------------------------------------------------------------------------

const MALE_GIVEN_NAMES: [&str; 6] = ["志明", "建华", "伟强", "俊杰", "文昊", "雅昆"];
const FEMALE_GIVEN_NAMES: [&str; 6] = ["雅文", "美丽", "慧敏", "雨晴", "诗涵", "婉如"];
const NEUTRAL_GIVEN_NAMES: [&str; 6] = ["明智", "美好", "和谐", "光明", "希望", "未来"];

/// Names the provider is told never to produce because they are the first
/// thing every model reaches for.
pub const OVERUSED_NAMES: [&str; 7] = ["雨晴", "志明", "雅文", "建华", "小明", "美丽", "伟强"];

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

/// Surname reading, if the surname is in the table.
pub fn surname_pinyin(surname: &str) -> Option<&'static str> {
    SURNAME_PINYIN
        .iter()
        .find(|(s, _)| *s == surname)
        .map(|(_, p)| *p)
}

/// Reading of a given-name character, defaulting to [`DEFAULT_CHAR_PINYIN`].
pub fn char_pinyin(ch: char) -> &'static str {
    GIVEN_CHARS
        .iter()
        .find(|(c, _, _)| *c == ch)
        .map_or(DEFAULT_CHAR_PINYIN, |(_, p, _)| *p)
}

/// Gloss of a given-name character, defaulting to [`DEFAULT_CHAR_MEANING`].
pub fn char_meaning(ch: char) -> &'static str {
    GIVEN_CHARS
        .iter()
        .find(|(c, _, _)| *c == ch)
        .map_or(DEFAULT_CHAR_MEANING, |(_, _, m)| *m)
}

/// Fallback given-name templates for a gender.
pub fn given_names(gender: Gender) -> &'static [&'static str] {
    match gender {
        Gender::Male => &MALE_GIVEN_NAMES,
        Gender::Female => &FEMALE_GIVEN_NAMES,
        Gender::Other => &NEUTRAL_GIVEN_NAMES,
    }
}
