use anyhow::{Result, anyhow};

/// Language utilities for the closed set of supported language codes
///
/// This module holds the static language tables: display names, the
/// backend's forced target-language tokens, per-language segmentation
/// statistics, and resource tiers used by the fallback translator.

/// Supported language codes with their human-readable display names
pub const SUPPORTED_LANGUAGES: [(&str, &str); 13] = [
    ("bn", "Bengali"),
    ("en", "English"),
    ("fil", "Filipino"),
    ("hi", "Hindi"),
    ("id", "Bahasa Indonesia"),
    ("ja", "Japanese"),
    ("km", "Khmer"),
    ("lo", "Lao"),
    ("ms", "Malay"),
    ("my", "Myanmar (Burmese)"),
    ("th", "Thai"),
    ("vi", "Vietnamese"),
    ("zh", "Chinese (Simplified)"),
];

/// Language substituted for unsupported target codes
pub const DEFAULT_TARGET_LANGUAGE: &str = "ja";

/// Writing system of a language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Script {
    Latin,
    Bengali,
    Devanagari,
    Japanese,
    Han,
    Thai,
    Lao,
    Khmer,
    Myanmar,
}

impl Script {
    /// Quote marks used to set off a word that could not be translated
    pub fn quote_marks(&self) -> (&'static str, &'static str) {
        match self {
            Script::Japanese => ("「", "」"),
            Script::Han => ("“", "”"),
            Script::Thai | Script::Lao | Script::Khmer | Script::Myanmar => ("\"", "\""),
            Script::Latin | Script::Bengali | Script::Devanagari => ("", ""),
        }
    }
}

/// Availability of training and reference data for a language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceTier {
    High,
    Medium,
    Low,
}

impl ResourceTier {
    /// Multiplier applied to heuristic fallback confidence
    pub fn availability_factor(&self) -> f64 {
        match self {
            ResourceTier::High => 1.0,
            ResourceTier::Medium => 0.85,
            ResourceTier::Low => 0.7,
        }
    }
}

/// Descriptive statistics about a language's written form
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LanguageStats {
    /// Average word length in characters
    pub average_word_length: f32,
    /// Whether words are separated by whitespace
    pub uses_whitespace_segmentation: bool,
    /// Script the language is written in
    pub script: Script,
    /// Data availability tier
    pub tier: ResourceTier,
}

const fn stats(average_word_length: f32, uses_whitespace_segmentation: bool, script: Script, tier: ResourceTier) -> LanguageStats {
    LanguageStats {
        average_word_length,
        uses_whitespace_segmentation,
        script,
        tier,
    }
}

/// Get the segmentation statistics for a language code
pub fn language_stats(code: &str) -> Option<LanguageStats> {
    let stats = match normalize_code(code).as_str() {
        "bn" => stats(5.2, true, Script::Bengali, ResourceTier::Medium),
        "en" => stats(4.7, true, Script::Latin, ResourceTier::High),
        "fil" => stats(5.4, true, Script::Latin, ResourceTier::Medium),
        "hi" => stats(4.3, true, Script::Devanagari, ResourceTier::High),
        "id" => stats(5.9, true, Script::Latin, ResourceTier::High),
        "ja" => stats(2.1, false, Script::Japanese, ResourceTier::High),
        "km" => stats(4.8, false, Script::Khmer, ResourceTier::Low),
        "lo" => stats(4.1, false, Script::Lao, ResourceTier::Low),
        "ms" => stats(5.8, true, Script::Latin, ResourceTier::Medium),
        "my" => stats(3.6, false, Script::Myanmar, ResourceTier::Low),
        "th" => stats(4.4, false, Script::Thai, ResourceTier::Medium),
        "vi" => stats(3.4, true, Script::Latin, ResourceTier::High),
        "zh" => stats(1.6, false, Script::Han, ResourceTier::High),
        _ => return None,
    };
    Some(stats)
}

/// Lowercase and trim a language code
pub fn normalize_code(code: &str) -> String {
    code.trim().to_lowercase()
}

/// Check whether a code belongs to the supported set
pub fn is_supported(code: &str) -> bool {
    let code = normalize_code(code);
    SUPPORTED_LANGUAGES.iter().any(|(c, _)| *c == code)
}

/// Get the display name for a supported language code
pub fn get_language_name(code: &str) -> Result<&'static str> {
    let code = normalize_code(code);
    SUPPORTED_LANGUAGES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
        .ok_or_else(|| anyhow!("Unsupported language code: {}", code))
}

/// Forced target-language token understood by the neural backend
///
/// Filipino and Malay have no dedicated token and decode through English.
pub fn backend_language_token(code: &str) -> Option<&'static str> {
    let token = match normalize_code(code).as_str() {
        "bn" => "bn_IN",
        "en" => "en_XX",
        "fil" => "en_XX",
        "hi" => "hi_IN",
        "id" => "id_ID",
        "ja" => "ja_XX",
        "km" => "km_KH",
        "lo" => "lo_LA",
        "ms" => "en_XX",
        "my" => "my_MM",
        "th" => "th_TH",
        "vi" => "vi_VN",
        "zh" => "zh_CN",
        _ => return None,
    };
    Some(token)
}

/// Map a requested target code onto the supported set
///
/// Returns the code to use and whether a substitution happened.
pub fn resolve_target_language(requested: &str, default: &str) -> (String, bool) {
    let code = normalize_code(requested);
    if is_supported(&code) {
        (code, false)
    } else {
        (normalize_code(default), true)
    }
}

/// Localized error message returned in place of a translation
pub fn localized_error_message(target_language: &str, error: &str) -> String {
    match normalize_code(target_language).as_str() {
        "ja" => format!("翻訳エラー: {}", error),
        "zh" => format!("翻译错误: {}", error),
        "hi" => format!("अनुवाद त्रुटि: {}", error),
        "bn" => format!("অনুবাদ ত্রুটি: {}", error),
        "th" => format!("ข้อผิดพลาดในการแปล: {}", error),
        _ => format!("Translation error: {}", error),
    }
}

/// Localized phrase used when nothing at all could be translated
pub fn localized_placeholder(target_language: &str) -> &'static str {
    match normalize_code(target_language).as_str() {
        "ja" => "翻訳できませんでした。",
        "zh" => "无法翻译。",
        "hi" => "अनुवाद उपलब्ध नहीं है।",
        "bn" => "অনুবাদ পাওয়া যায়নি।",
        "th" => "ไม่สามารถแปลได้",
        _ => "Translation unavailable.",
    }
}
