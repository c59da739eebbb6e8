//! Letter-pattern tables and the small predicates built on them
//!
//! Everything here looks only at the tail of a word (the last two or three
//! letters). `Y` counts with the vowels for run detection, since it carries
//! a syllable in words like SKY and RHYTHM.

use crate::game::is_vowel;
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Frequent English letter pairs
const COMMON_BIGRAMS: &[&str] = &[
    "TH", "HE", "IN", "ER", "AN", "RE", "ON", "AT", "EN", "ND", "TI", "ES", "OR", "TE", "OF",
    "ED", "IS", "IT", "AL", "AR", "ST", "TO", "NT", "NG", "SE", "HA", "AS", "OU", "IO", "LE",
    "VE", "CO", "ME", "DE", "HI", "RI", "RO", "IC", "NE", "EA", "RA", "CE", "LI", "CH", "LL",
    "BE", "MA", "SI", "OM", "UR", "CA", "EL", "TA", "LA", "NS", "DI", "FO", "HO", "PE", "EC",
    "PR", "NO", "CT", "US", "AC", "OT", "IL", "TR", "LY", "NC", "ET", "UT", "SS", "SO", "RS",
    "UN", "LO", "WA", "GE", "IE", "WH", "EE", "WI", "EM", "AD", "OL", "RT", "PO", "WE", "NA",
    "UL", "NI", "TS", "MO", "OW", "PA", "IM", "MI", "AI", "SH", "IR", "SU", "ID", "OS", "IV",
    "IA", "AM", "FI", "CI", "VI", "PL", "IG", "TU", "EV", "LD", "RY", "MP", "FE", "BL", "AB",
    "GH", "TY", "OP", "WO", "SA", "AY", "EX", "KE", "FR", "OO", "AV", "AG", "IF", "AP", "GR",
    "OD", "BO", "SP", "RD", "DO", "UC", "BU", "EI", "OV", "BY", "RM", "EP", "TT", "OC", "FA",
    "EF", "CU", "RN", "SC", "GI", "DA", "YO", "CR", "CL", "DU", "GA", "QU", "UE", "FF", "BA",
    "EY", "LS", "VA", "UM", "PP", "UA", "UP", "LU", "GO", "HT", "RU", "UG", "DS", "LT", "PI",
    "RC", "RR", "EG", "AU", "CK", "EW", "MU", "BR", "BI", "PT", "AK", "PU", "UI", "RG", "IB",
    "TL", "NY", "KI", "RK", "YS", "OB", "MM", "FU", "PH", "OG", "MS", "YE", "UD", "MB", "IP",
    "UB", "OI", "RL", "GU", "DR", "HR", "CC", "TW", "FT", "WN", "NU", "AF", "HU", "NN", "EO",
    "VO", "RV", "NF", "XP", "GN", "SM", "FL", "IZ", "EU", "SL", "OK", "SK", "SW", "SN", "DG",
];

/// Frequent English letter triples
const COMMON_TRIGRAMS: &[&str] = &[
    "THE", "AND", "ING", "ION", "TIO", "ENT", "ERE", "HER", "ATE", "VER", "TER", "THA", "ATI",
    "HAT", "ERS", "HIS", "RES", "ILL", "ARE", "CON", "NCE", "ALL", "EVE", "ITH", "TED", "AIN",
    "EST", "MAN", "RED", "THI", "IVE", "REA", "WIT", "ONS", "ESS", "AVE", "PER", "ECT", "ONE",
    "UND", "INT", "ANT", "HOU", "MEN", "WAS", "OUN", "PRO", "STA", "INE", "WHI", "OVE", "TIN",
    "AST", "DER", "OUR", "OUT", "STR", "TRA", "ICA", "ACT", "ENC", "ESE", "ARD", "LIN", "CHE",
    "IGH", "GHT", "OME", "ORE", "ABL", "BLE", "NDE", "TUR", "URE", "IST", "ITY", "ATT", "OUS",
    "LAN", "ELL", "RAN", "COM", "NTE", "SHE", "EAR", "PLA", "CAT", "OST", "HOS",
];

/// Three-consonant runs English actually uses
const CONSONANT_RUNS: &[&str] = &[
    "STR", "SCR", "SPR", "SPL", "SHR", "THR", "CHR", "SCH", "NCH", "NGS", "NTS", "NST", "RST",
    "RTH", "GHT", "TCH", "LCH", "MPS", "NDS", "RDS", "LDS", "NKS", "RKS", "CTS", "PTS", "MPL",
    "MBL", "NGL", "NTR", "NDR", "NGR", "LLS", "SST", "STL", "RCH", "RSH", "PHR", "NCL", "NGT",
    "LTS", "RMS", "RNS", "LMS", "XPL", "XTR", "DST", "MPT", "NCR", "TTL", "CKL", "CKS", "FFS",
    "GHS", "THS", "WNS", "GTH", "SSL", "RGL", "RBL", "PPL", "BBL", "DDL", "GGL", "ZZL", "TTS",
];

/// Three-vowel runs English actually uses
const VOWEL_RUNS: &[&str] = &["EAU", "IOU", "UEU", "UOU", "IEU", "OUE", "UEA", "UIE", "OOE", "EOU"];

static BIGRAMS: Lazy<HashSet<&'static str>> = Lazy::new(|| COMMON_BIGRAMS.iter().copied().collect());
static TRIGRAMS: Lazy<HashSet<&'static str>> = Lazy::new(|| COMMON_TRIGRAMS.iter().copied().collect());
static CONSONANT_TRIPLES: Lazy<HashSet<&'static str>> =
    Lazy::new(|| CONSONANT_RUNS.iter().copied().collect());
static VOWEL_TRIPLES: Lazy<HashSet<&'static str>> = Lazy::new(|| VOWEL_RUNS.iter().copied().collect());

/// Consonant pairs that can take a third consonant (first two letters of an allowed run)
static CONSONANT_STEMS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| CONSONANT_RUNS.iter().map(|run| &run[..2]).collect());

/// Vowel pairs that can take a third vowel
static VOWEL_STEMS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| VOWEL_RUNS.iter().map(|run| &run[..2]).collect());

/// Vowel for run detection (A, E, I, O, U or Y)
pub fn is_vowelish(c: char) -> bool {
    is_vowel(c) || c.eq_ignore_ascii_case(&'Y')
}

/// Last `n` characters of `word`, if it has that many
fn tail(word: &str, n: usize) -> Option<&str> {
    let (start, _) = word.char_indices().rev().nth(n.checked_sub(1)?)?;
    Some(&word[start..])
}

pub fn is_common_bigram(pair: &str) -> bool {
    BIGRAMS.contains(pair)
}

pub fn is_common_trigram(triple: &str) -> bool {
    TRIGRAMS.contains(triple)
}

/// Length of the run of consonants (`vowels == false`) or vowels at the end of `word`.
pub fn trailing_run(word: &str, vowels: bool) -> usize {
    word.chars()
        .rev()
        .take_while(|c| is_vowelish(*c) == vowels)
        .count()
}

/// Last two letters form a common pair
pub fn ends_with_common_bigram(word: &str) -> bool {
    tail(word, 2).is_some_and(is_common_bigram)
}

pub fn ends_with_common_trigram(word: &str) -> bool {
    tail(word, 3).is_some_and(is_common_trigram)
}

/// Ends in three consonants or three vowels English does not use.
pub fn has_bad_run(word: &str) -> bool {
    let Some(last3) = tail(word, 3) else {
        return false;
    };
    if trailing_run(word, false) >= 3 {
        return !CONSONANT_TRIPLES.contains(last3);
    }
    if trailing_run(word, true) >= 3 {
        return !VOWEL_TRIPLES.contains(last3);
    }
    false
}

/// Looks unlike English: a bad run, or a doubled rare letter.
pub fn is_implausible(word: &str) -> bool {
    if has_bad_run(word) {
        return true;
    }
    matches!(tail(word, 2), Some(pair) if is_rare_pair(pair))
}

fn is_rare_pair(pair: &str) -> bool {
    let mut chars = pair.chars();
    let (Some(a), Some(b)) = (chars.next(), chars.next()) else {
        return false;
    };
    let rare = |c: char| matches!(c, 'J' | 'Q' | 'X' | 'Z' | 'V');
    rare(a) && rare(b) && !is_common_bigram(pair)
}

/// A specific letter English requires next (Q takes U).
pub fn required_letter(prefix: &str) -> Option<char> {
    match prefix.chars().last() {
        Some('Q') => Some('U'),
        _ => None,
    }
}

/// The tail leaves no room for another consonant.
pub fn needs_vowel(prefix: &str) -> bool {
    match trailing_run(prefix, false) {
        0 | 1 => false,
        2 => tail(prefix, 2).is_some_and(|pair| !CONSONANT_STEMS.contains(pair)),
        _ => true,
    }
}

/// The tail leaves no room for another vowel.
pub fn needs_consonant(prefix: &str) -> bool {
    match trailing_run(prefix, true) {
        0 | 1 => false,
        2 => tail(prefix, 2).is_some_and(|pair| !VOWEL_STEMS.contains(pair)),
        _ => true,
    }
}

/// Share of A/E/I/O/U in a word. Zero for an empty word.
pub fn vowel_ratio(word: &str) -> f64 {
    if word.is_empty() {
        return 0.0;
    }
    let vowels = word.chars().filter(|c| is_vowel(*c)).count();
    vowels as f64 / word.len() as f64
}
