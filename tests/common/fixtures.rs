//! Upstream response bodies for Al-Fatihah (chapter 1, 7 verses)

use serde_json::{Value, json};

pub const FATIHA_VERSES: u32 = 7;

const FATIHA_ENGLISH: [&str; 7] = [
    "In the Name of Allah, the Most Compassionate, Most Merciful.",
    "All praise is for Allah, Lord of all worlds,",
    "the Most Compassionate, Most Merciful,",
    "Master of the Day of Judgment.",
    "You alone we worship and You alone we ask for help.",
    "Guide us along the Straight Path,",
    "the Path of those You have blessed, not those You are displeased with, or those who are astray.",
];

/// Chapter index containing only Al-Fatihah
pub fn chapter_index() -> Value {
    json!([{
        "surahName": "Al-Faatiha",
        "surahNameArabic": "الفاتحة",
        "surahNameArabicLong": "سورة الفاتحة",
        "surahNameTranslation": "The Opening",
        "revelationPlace": "Mecca",
        "totalAyah": 7
    }])
}

/// Verse endpoint body for `1:ayah`
pub fn verse_text(ayah: u32) -> Value {
    json!({
        "surahName": "Al-Faatiha",
        "surahNameArabic": "الفاتحة",
        "surahNo": 1,
        "ayahNo": ayah,
        "english": FATIHA_ENGLISH[(ayah - 1) as usize],
        "arabic1": format!("آية {ayah} (uthmani)"),
        "arabic2": format!("آية {ayah}"),
    })
}

/// Metadata endpoint body for `1:ayah`; the whole chapter sits on page 1, juz 1
pub fn verse_metadata(ayah: u32) -> Value {
    json!({
        "code": 200,
        "status": "OK",
        "data": {
            "number": ayah,
            "text": "...",
            "juz": 1,
            "manzil": 1,
            "page": 1,
            "ruku": 1,
            "hizbQuarter": 1,
            "sajda": false
        }
    })
}

/// Tafseer endpoint body for one source
pub fn tafseer(source: u32, ayah: u32) -> Value {
    json!({
        "tafseer_id": source,
        "tafseer_name": format!("Tafseer book {source}"),
        "ayah_url": format!("/quran/1/{ayah}"),
        "ayah_number": ayah,
        "text": format!("Commentary {source} on 1:{ayah}")
    })
}
