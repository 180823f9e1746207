//! Deterministic phonetic fallback used when no translation is available.
//!
//! Pure functions only: the same input always yields the same output, so the
//! result never needs caching.

use super::language::{Language, Script};

/// Renders `name` phonetically in the target language's script.
///
/// Japanese targets get a katakana approximation built by greedy syllable
/// matching ("Robert" becomes "ロベルト"). Other targets have no table and get
/// the name back unchanged.
pub fn transliterate(name: &str, language: &Language) -> String {
    match language.script {
        Script::Japanese => to_katakana(name),
        _ => name.to_string(),
    }
}

fn to_katakana(name: &str) -> String {
    let chars: Vec<char> = name.to_lowercase().chars().collect();
    let mut out = String::with_capacity(name.len() * 3);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            if !out.ends_with('・') && !out.is_empty() {
                out.push('・');
            }
            i += 1;
            continue;
        }

        if !c.is_ascii_alphabetic() {
            out.push(c);
            i += 1;
            continue;
        }

        // Doubled consonant becomes a small tsu before the syllable
        if i + 1 < chars.len() && c == chars[i + 1] && !is_vowel(c) && c != 'n' {
            out.push('ッ');
            i += 1;
            continue;
        }

        let matched = (1..=3).rev().find_map(|len| {
            let end = i + len;
            if end > chars.len() {
                return None;
            }
            let piece: String = chars[i..end].iter().collect();
            syllable(&piece).map(|kana| (kana, len))
        });

        match matched {
            Some((kana, len)) => {
                out.push_str(kana);
                i += len;
            }
            None => {
                out.push(c);
                i += 1;
            }
        }
    }

    out.trim_end_matches('・').to_string()
}

const fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

fn syllable(romaji: &str) -> Option<&'static str> {
    let kana = match romaji {
        "kya" => "キャ",
        "kyu" => "キュ",
        "kyo" => "キョ",
        "sha" => "シャ",
        "shi" => "シ",
        "shu" => "シュ",
        "she" => "シェ",
        "sho" => "ショ",
        "cha" => "チャ",
        "chi" => "チ",
        "chu" => "チュ",
        "che" => "チェ",
        "cho" => "チョ",
        "tsu" => "ツ",
        "nya" => "ニャ",
        "nyu" => "ニュ",
        "nyo" => "ニョ",
        "rya" => "リャ",
        "ryu" => "リュ",
        "ryo" => "リョ",

        "ka" | "ca" => "カ",
        "ki" => "キ",
        "ku" | "cu" => "ク",
        "ke" => "ケ",
        "ko" | "co" => "コ",
        "sa" => "サ",
        "si" | "ci" => "シ",
        "su" => "ス",
        "se" | "ce" => "セ",
        "so" => "ソ",
        "ta" => "タ",
        "ti" => "ティ",
        "tu" => "トゥ",
        "te" => "テ",
        "to" => "ト",
        "na" => "ナ",
        "ni" => "ニ",
        "nu" => "ヌ",
        "ne" => "ネ",
        "no" => "ノ",
        "ha" => "ハ",
        "hi" => "ヒ",
        "hu" | "fu" => "フ",
        "he" => "ヘ",
        "ho" => "ホ",
        "ma" => "マ",
        "mi" => "ミ",
        "mu" => "ム",
        "me" => "メ",
        "mo" => "モ",
        "ya" => "ヤ",
        "yu" => "ユ",
        "ye" => "イェ",
        "yo" => "ヨ",
        "ra" | "la" => "ラ",
        "ri" | "li" => "リ",
        "ru" | "lu" => "ル",
        "re" | "le" => "レ",
        "ro" | "lo" => "ロ",
        "wa" => "ワ",
        "wi" => "ウィ",
        "we" => "ウェ",
        "wo" => "ウォ",
        "ga" => "ガ",
        "gi" => "ギ",
        "gu" => "グ",
        "ge" => "ゲ",
        "go" => "ゴ",
        "za" => "ザ",
        "zi" | "ji" => "ジ",
        "zu" => "ズ",
        "ze" => "ゼ",
        "zo" => "ゾ",
        "ja" => "ジャ",
        "ju" => "ジュ",
        "je" => "ジェ",
        "jo" => "ジョ",
        "da" => "ダ",
        "di" => "ディ",
        "du" => "ドゥ",
        "de" => "デ",
        "do" => "ド",
        "ba" => "バ",
        "bi" => "ビ",
        "bu" => "ブ",
        "be" => "ベ",
        "bo" => "ボ",
        "pa" => "パ",
        "pi" => "ピ",
        "pu" => "プ",
        "pe" => "ペ",
        "po" => "ポ",
        "fa" => "ファ",
        "fi" => "フィ",
        "fe" => "フェ",
        "fo" => "フォ",
        "va" => "ヴァ",
        "vi" => "ヴィ",
        "vu" => "ヴ",
        "ve" => "ヴェ",
        "vo" => "ヴォ",

        "a" => "ア",
        "i" | "y" => "イ",
        "u" => "ウ",
        "e" => "エ",
        "o" => "オ",
        "n" => "ン",
        "b" => "ブ",
        "c" | "k" | "q" => "ク",
        "d" => "ド",
        "f" | "h" => "フ",
        "g" => "グ",
        "j" => "ジ",
        "l" | "r" => "ル",
        "m" => "ム",
        "p" => "プ",
        "s" => "ス",
        "t" => "ト",
        "v" => "ヴ",
        "w" => "ウ",
        "x" => "クス",
        "z" => "ズ",
        _ => return None,
    };
    Some(kana)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::translation::language::find_language;

    fn japanese() -> &'static Language {
        find_language("ja").unwrap()
    }

    #[test]
    fn test_robert_becomes_katakana() {
        assert_eq!(transliterate("Robert", japanese()), "ロベルト");
    }

    #[test]
    fn test_known_syllables() {
        assert_eq!(transliterate("Sakura", japanese()), "サクラ");
        assert_eq!(transliterate("Shinichi", japanese()), "シニチ");
        assert_eq!(transliterate("Ken", japanese()), "ケン");
    }

    #[test]
    fn test_doubled_consonant_uses_small_tsu() {
        assert_eq!(transliterate("Matt", japanese()), "マット");
    }

    #[test]
    fn test_spaces_and_symbols() {
        assert_eq!(transliterate("Anna  Maria", japanese()), "アンナ・マリア");
        assert_eq!(transliterate("Neo_42", japanese()), "ネオ_42");
    }

    #[test]
    fn test_is_deterministic() {
        let first = transliterate("Christopher", japanese());
        for _ in 0..10 {
            assert_eq!(transliterate("Christopher", japanese()), first);
        }
        assert!(!first.is_empty());
    }

    #[test]
    fn test_non_japanese_target_returns_input() {
        let fr = find_language("fr").unwrap();
        assert_eq!(transliterate("Robert", fr), "Robert");
    }
}
