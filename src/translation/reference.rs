/*!
 * Reference examples: curated source/target phrase pairs.
 *
 * The same table serves three purposes:
 * - the exact-match shortcut in the orchestrator
 * - ground truth for scoring generated output
 * - the phrase dictionary of the fallback translator
 *
 * Lookups are keyed by `(target language, lowercased trimmed source phrase)`.
 * The table is built once and never mutated.
 */

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::language_utils::normalize_code;

/// A known-good translation of a canonical source phrase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceExample {
    /// Source phrase as written
    pub source: String,
    /// Target-language phrase
    pub target: String,
}

#[derive(Debug, Default)]
struct LanguageExamples {
    examples: Vec<ReferenceExample>,
    index: HashMap<String, usize>,
}

/// Reference examples for every target language
#[derive(Debug, Default)]
pub struct ReferenceExamples {
    languages: HashMap<String, LanguageExamples>,
}

/// Normalize a phrase into its lookup key
pub fn phrase_key(text: &str) -> String {
    text.trim().to_lowercase()
}

impl ReferenceExamples {
    /// Build a table from `(language, source, target)` triples.
    ///
    /// When the same source phrase appears twice for a language, the first
    /// entry wins.
    pub fn from_entries<I, L, S, T>(entries: I) -> Self
    where
        I: IntoIterator<Item = (L, S, T)>,
        L: AsRef<str>,
        S: Into<String>,
        T: Into<String>,
    {
        let mut table = Self::default();
        for (language, source, target) in entries {
            table.insert(language.as_ref(), source.into(), target.into());
        }
        table
    }

    fn insert(&mut self, language: &str, source: String, target: String) {
        let entry = self.languages.entry(normalize_code(language)).or_default();
        let key = phrase_key(&source);
        if key.is_empty() || entry.index.contains_key(&key) {
            return;
        }
        entry.index.insert(key, entry.examples.len());
        entry.examples.push(ReferenceExample { source, target });
    }

    /// The built-in table shipped with the crate
    pub fn builtin() -> Arc<ReferenceExamples> {
        Arc::clone(&BUILTIN_EXAMPLES)
    }

    /// Find the reference translation of `text` into `target_language`
    pub fn lookup(&self, target_language: &str, text: &str) -> Option<&str> {
        let language = self.languages.get(&normalize_code(target_language))?;
        let position = language.index.get(&phrase_key(text))?;
        Some(language.examples[*position].target.as_str())
    }

    /// All examples for a target language, in insertion order
    pub fn examples_for(&self, target_language: &str) -> &[ReferenceExample] {
        self.languages
            .get(&normalize_code(target_language))
            .map(|l| l.examples.as_slice())
            .unwrap_or(&[])
    }

    /// Number of examples for a target language
    pub fn count_for(&self, target_language: &str) -> usize {
        self.examples_for(target_language).len()
    }

    /// Longest source phrase in words, across all languages
    pub fn longest_phrase_words(&self) -> usize {
        self.languages
            .values()
            .flat_map(|l| l.examples.iter())
            .map(|e| e.source.split_whitespace().count())
            .max()
            .unwrap_or(0)
    }
}

type PhraseTable = (&'static str, &'static [(&'static str, &'static str)]);

const COMMON_PHRASES: &[PhraseTable] = &[
    ("ja", &[
        ("Hello", "こんにちは"),
        ("Good morning", "おはようございます"),
        ("Thank you", "ありがとうございます"),
        ("Welcome", "ようこそ"),
        ("Goodbye", "さようなら"),
        ("Yes", "はい"),
        ("No", "いいえ"),
        ("Please", "お願いします"),
        ("Sorry", "すみません"),
        ("Excuse me", "すみません"),
        ("How are you", "お元気ですか"),
        ("I'm fine", "元気です"),
        ("Good night", "おやすみなさい"),
        ("See you later", "またね"),
        ("Nice to meet you", "はじめまして"),
        ("What's your name", "お名前は何ですか"),
        ("My name is", "私の名前は"),
        ("I don't understand", "わかりません"),
        ("How much", "いくらですか"),
        ("Where is", "どこですか"),
    ]),
    ("zh", &[
        ("Hello", "你好"),
        ("Good morning", "早上好"),
        ("Thank you", "谢谢"),
        ("Welcome", "欢迎"),
        ("Goodbye", "再见"),
        ("Yes", "是的"),
        ("No", "不是"),
        ("Please", "请"),
        ("Sorry", "对不起"),
        ("Excuse me", "打扰一下"),
        ("How are you", "你好吗"),
        ("I'm fine", "我很好"),
        ("Good night", "晚安"),
        ("See you later", "再见"),
        ("Nice to meet you", "很高兴认识你"),
        ("What's your name", "你叫什么名字"),
        ("My name is", "我的名字是"),
        ("I don't understand", "我不明白"),
        ("How much", "多少钱"),
        ("Where is", "在哪里"),
    ]),
    ("hi", &[
        ("Hello", "नमस्ते"),
        ("Good morning", "सुप्रभात"),
        ("Thank you", "धन्यवाद"),
        ("Welcome", "स्वागत है"),
        ("Goodbye", "अलविदा"),
        ("Yes", "हां"),
        ("No", "नहीं"),
        ("Please", "कृपया"),
        ("Sorry", "माफ़ कीजिए"),
        ("Excuse me", "क्षमा कीजिए"),
        ("How are you", "आप कैसे हैं"),
        ("I'm fine", "मैं ठीक हूँ"),
        ("Good night", "शुभ रात्रि"),
        ("See you later", "फिर मिलेंगे"),
        ("Nice to meet you", "आपसे मिलकर अच्छा लगा"),
        ("What's your name", "आपका नाम क्या है"),
        ("My name is", "मेरा नाम है"),
        ("I don't understand", "मुझे समझ नहीं आता"),
        ("How much", "कितना है"),
        ("Where is", "कहां है"),
    ]),
    ("th", &[
        ("Hello", "สวัสดี"),
        ("Good morning", "สวัสดีตอนเช้า"),
        ("Thank you", "ขอบคุณ"),
        ("Welcome", "ยินดีต้อนรับ"),
        ("Goodbye", "ลาก่อน"),
        ("Yes", "ใช่"),
        ("No", "ไม่"),
        ("Please", "กรุณา"),
        ("Sorry", "ขอโทษ"),
        ("Excuse me", "ขอโทษ"),
        ("How are you", "คุณเป็นอย่างไรบ้าง"),
        ("I'm fine", "ฉันสบายดี"),
        ("Good night", "ราตรีสวัสดิ์"),
        ("See you later", "แล้วเจอกัน"),
        ("Nice to meet you", "ยินดีที่ได้รู้จัก"),
        ("What's your name", "คุณชื่ออะไร"),
        ("My name is", "ฉันชื่อ"),
        ("I don't understand", "ฉันไม่เข้าใจ"),
        ("How much", "เท่าไหร่"),
        ("Where is", "อยู่ที่ไหน"),
    ]),
    ("bn", &[
        ("Hello", "হ্যালো"),
        ("Good morning", "সুপ্রভাত"),
        ("Thank you", "ধন্যবাদ"),
        ("Welcome", "স্বাগতম"),
        ("Goodbye", "বিদায়"),
        ("Yes", "হ্যাঁ"),
        ("No", "না"),
        ("Please", "দয়া করে"),
        ("Sorry", "দুঃখিত"),
        ("Excuse me", "একটু শুনুন"),
        ("How are you", "কেমন আছেন"),
        ("I'm fine", "আমি ভালো আছি"),
        ("Good night", "শুভ রাত্রি"),
        ("See you later", "আবার দেখা হবে"),
        ("Nice to meet you", "আপনার সাথে দেখা করে ভালো লাগলো"),
        ("What's your name", "আপনার নাম কি"),
        ("My name is", "আমার নাম"),
        ("I don't understand", "আমি বুঝতে পারছি না"),
        ("How much", "কত"),
        ("Where is", "কোথায় আছে"),
    ]),
    ("vi", &[
        ("Hello", "Xin chào"),
        ("Good morning", "Chào buổi sáng"),
        ("Thank you", "Cảm ơn bạn"),
        ("Welcome", "Chào mừng"),
        ("Goodbye", "Tạm biệt"),
        ("Yes", "Vâng"),
        ("No", "Không"),
        ("Please", "Làm ơn"),
        ("Sorry", "Xin lỗi"),
        ("Excuse me", "Xin lỗi"),
        ("How are you", "Bạn khỏe không"),
        ("I'm fine", "Tôi khỏe"),
        ("Good night", "Chúc ngủ ngon"),
        ("See you later", "Hẹn gặp lại"),
        ("Nice to meet you", "Rất vui được gặp bạn"),
        ("What's your name", "Tên bạn là gì"),
        ("My name is", "Tên tôi là"),
        ("I don't understand", "Tôi không hiểu"),
        ("How much", "Bao nhiêu"),
        ("Where is", "Ở đâu"),
    ]),
    ("id", &[
        ("Hello", "Halo"),
        ("Good morning", "Selamat pagi"),
        ("Thank you", "Terima kasih"),
        ("Welcome", "Selamat datang"),
        ("Goodbye", "Selamat tinggal"),
        ("Yes", "Ya"),
        ("No", "Tidak"),
        ("Please", "Tolong"),
        ("Sorry", "Maaf"),
        ("Excuse me", "Permisi"),
        ("How are you", "Apa kabar"),
        ("I'm fine", "Saya baik-baik saja"),
        ("Good night", "Selamat malam"),
        ("See you later", "Sampai jumpa lagi"),
        ("Nice to meet you", "Senang bertemu dengan Anda"),
        ("What's your name", "Siapa nama Anda"),
        ("My name is", "Nama saya adalah"),
        ("I don't understand", "Saya tidak mengerti"),
        ("How much", "Berapa"),
        ("Where is", "Di mana"),
    ]),
    ("ms", &[
        ("Hello", "Helo"),
        ("Good morning", "Selamat pagi"),
        ("Thank you", "Terima kasih"),
        ("Welcome", "Selamat datang"),
        ("Goodbye", "Selamat tinggal"),
        ("Yes", "Ya"),
        ("No", "Tidak"),
        ("Please", "Sila"),
        ("Sorry", "Maaf"),
        ("Excuse me", "Maafkan saya"),
        ("How are you", "Apa khabar"),
        ("I'm fine", "Saya sihat"),
        ("Good night", "Selamat malam"),
        ("See you later", "Jumpa lagi"),
        ("Nice to meet you", "Senang berjumpa dengan anda"),
        ("What's your name", "Siapa nama anda"),
        ("My name is", "Nama saya ialah"),
        ("I don't understand", "Saya tidak faham"),
        ("How much", "Berapa"),
        ("Where is", "Di mana"),
    ]),
];

const DEMONSTRATION_PHRASES: &[PhraseTable] = &[
    ("bn", &[
        ("Hello", "হ্যালো"),
        ("Thank you", "ধন্যবাদ"),
        ("How are you?", "আপনি কেমন আছেন?"),
        ("Welcome", "স্বাগতম"),
        ("Good morning", "সুপ্রভাত"),
        ("My name is", "আমার নাম"),
        ("I love languages", "আমি ভাষা ভালবাসি"),
        ("This is a demonstration", "এটি একটি প্রদর্শন"),
    ]),
    ("en", &[
        ("Hello", "Hello"),
        ("Thank you", "Thank you"),
        ("How are you?", "How are you?"),
        ("Welcome", "Welcome"),
        ("Good morning", "Good morning"),
        ("My name is", "My name is"),
        ("I love languages", "I love languages"),
        ("This is a demonstration", "This is a demonstration"),
    ]),
    ("fil", &[
        ("Hello", "Kamusta"),
        ("Thank you", "Salamat"),
        ("How are you?", "Kumusta ka?"),
        ("Welcome", "Maligayang pagdating"),
        ("Good morning", "Magandang umaga"),
        ("My name is", "Ang pangalan ko ay"),
        ("I love languages", "Mahilig ako sa mga wika"),
        ("This is a demonstration", "Ito ay isang pagpapakita"),
    ]),
    ("hi", &[
        ("Hello", "नमस्ते"),
        ("Thank you", "धन्यवाद"),
        ("How are you?", "आप कैसे हैं?"),
        ("Welcome", "स्वागत है"),
        ("Good morning", "सुप्रभात"),
        ("My name is", "मेरा नाम है"),
        ("I love languages", "मुझे भाषाएँ पसंद हैं"),
        ("This is a demonstration", "यह एक प्रदर्शन है"),
    ]),
    ("id", &[
        ("Hello", "Halo"),
        ("Thank you", "Terima kasih"),
        ("How are you?", "Apa kabar?"),
        ("Welcome", "Selamat datang"),
        ("Good morning", "Selamat pagi"),
        ("My name is", "Nama saya adalah"),
        ("I love languages", "Saya suka bahasa"),
        ("This is a demonstration", "Ini adalah demonstrasi"),
    ]),
    ("ja", &[
        ("Hello", "こんにちは"),
        ("Thank you", "ありがとう"),
        ("How are you?", "お元気ですか？"),
        ("Welcome", "ようこそ"),
        ("Good morning", "おはようございます"),
        ("My name is", "私の名前は"),
        ("I love languages", "私は言語が大好きです"),
        ("This is a demonstration", "これはデモンストレーションです"),
    ]),
    ("km", &[
        ("Hello", "សួស្តី"),
        ("Thank you", "អរគុណ"),
        ("How are you?", "តើអ្នកសុខសប្បាយទេ?"),
        ("Welcome", "សូមស្វាគមន៍"),
        ("Good morning", "អរុណសួស្តី"),
        ("My name is", "ខ្ញុំឈ្មោះ"),
        ("I love languages", "ខ្ញុំស្រលាញ់ភាសា"),
        ("This is a demonstration", "នេះគឺជាការបង្ហាញ"),
    ]),
    ("lo", &[
        ("Hello", "ສະບາຍດີ"),
        ("Thank you", "ຂອບໃຈ"),
        ("How are you?", "ສະບາຍດີບໍ?"),
        ("Welcome", "ຍິນດີຕ້ອນຮັບ"),
        ("Good morning", "ອາລຸນສະຫວັດ"),
        ("My name is", "ຂ້ອຍຊື່"),
        ("I love languages", "ຂ້ອຍຮັກພາສາ"),
        ("This is a demonstration", "ນີ້ແມ່ນການສາທິດ"),
    ]),
    ("ms", &[
        ("Hello", "Hello"),
        ("Thank you", "Terima kasih"),
        ("How are you?", "Apa khabar?"),
        ("Welcome", "Selamat datang"),
        ("Good morning", "Selamat pagi"),
        ("My name is", "Nama saya ialah"),
        ("I love languages", "Saya suka bahasa"),
        ("This is a demonstration", "Ini adalah demonstrasi"),
    ]),
    ("my", &[
        ("Hello", "မင်္ဂလာပါ"),
        ("Thank you", "ကျေးဇူးတင်ပါတယ်"),
        ("How are you?", "နေကောင်းလား?"),
        ("Welcome", "ကြိုဆိုပါတယ်"),
        ("Good morning", "မင်္ဂလာနံနက်ခင်းပါ"),
        ("My name is", "ကျွန်တော်နာမည်က"),
        ("I love languages", "ကျွန်တော် ဘာသာစကားများကို နှစ်သက်သည်"),
        ("This is a demonstration", "ဤသည်မှာ သရုပ်ပြမှုဖြစ်သည်"),
    ]),
    ("th", &[
        ("Hello", "สวัสดี"),
        ("Thank you", "ขอบคุณ"),
        ("How are you?", "คุณเป็นอย่างไรบ้าง?"),
        ("Welcome", "ยินดีต้อนรับ"),
        ("Good morning", "สวัสดีตอนเช้า"),
        ("My name is", "ฉันชื่อ"),
        ("I love languages", "ฉันรักภาษา"),
        ("This is a demonstration", "นี่คือการสาธิต"),
    ]),
    ("vi", &[
        ("Hello", "Xin chào"),
        ("Thank you", "Cảm ơn bạn"),
        ("How are you?", "Bạn khỏe không?"),
        ("Welcome", "Chào mừng"),
        ("Good morning", "Chào buổi sáng"),
        ("My name is", "Tên tôi là"),
        ("I love languages", "Tôi yêu ngôn ngữ"),
        ("This is a demonstration", "Đây là một bản demo"),
    ]),
    ("zh", &[
        ("Hello", "你好"),
        ("Thank you", "谢谢"),
        ("How are you?", "你好吗？"),
        ("Welcome", "欢迎"),
        ("Good morning", "早上好"),
        ("My name is", "我的名字是"),
        ("I love languages", "我喜欢语言"),
        ("This is a demonstration", "这是一个演示"),
    ]),
];

static BUILTIN_EXAMPLES: Lazy<Arc<ReferenceExamples>> = Lazy::new(|| {
    Arc::new(ReferenceExamples::from_entries(
        COMMON_PHRASES
            .iter()
            .chain(DEMONSTRATION_PHRASES.iter())
            .flat_map(|(language, phrases)| {
                phrases
                    .iter()
                    .map(move |(source, target)| (*language, *source, *target))
            }),
    ))
});
