//! Generic Indonesian stop-words.
//!
//! Applied after the configured domain stop-words. Entries are lowercase,
//! so this list only has an effect on case-folded text.

use once_cell::sync::Lazy;
use std::collections::HashSet;

const INDONESIAN: &[&str] = &[
    "ada", "adalah", "agak", "agar", "akan", "aku", "amat", "anda", "antara", "apa", "apabila",
    "apakah", "atas", "atau", "bagai", "bagaimana", "bagi", "bahkan", "bahwa", "banyak", "beberapa",
    "begini", "begitu", "belum", "berapa", "bisa", "boleh", "bukan", "cukup", "dalam", "dan",
    "dapat", "dari", "daripada", "demi", "dengan", "di", "dia", "dimana", "hal", "hanya", "harus",
    "hingga", "ia", "ialah", "ini", "itu", "jadi", "jika", "juga", "jumlah", "justru", "kalau",
    "kami", "kamu", "kapan", "karena", "kata", "ke", "kecuali", "kembali", "kemudian", "kenapa",
    "kepada", "ketika", "kita", "lagi", "lah", "lain", "lalu", "lebih", "maka", "mampu", "mana",
    "masih", "mau", "melainkan", "melalui", "memang", "mengapa", "menjadi", "mereka", "merupakan",
    "meski", "meskipun", "misalnya", "mungkin", "namun", "nanti", "oleh", "pada", "padahal",
    "para", "pasti", "per", "perlu", "pernah", "pula", "pun", "saat", "saja", "salah", "sambil",
    "sampai", "sana", "sangat", "saya", "seakan", "sebab", "sebagai", "sebelum", "sebuah",
    "secara", "sedang", "sedangkan", "sehingga", "sejak", "sekarang", "selain", "selalu",
    "selama", "seluruh", "semua", "sementara", "sendiri", "seolah", "seperti", "sering", "serta",
    "setelah", "setiap", "sini", "suatu", "sudah", "supaya", "tak", "tanpa", "telah", "tentang",
    "tentu", "terhadap", "tersebut", "tetapi", "tiap", "tidak", "untuk", "yaitu", "yakni", "yang",
];

static INDONESIAN_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| INDONESIAN.iter().copied().collect());

/// Whether `word` is a generic Indonesian stop-word.
pub fn is_stopword(word: &str) -> bool {
    INDONESIAN_SET.contains(word)
}

/// Drop generic stop-words from whitespace-separated text.
pub fn remove_stopwords(text: &str) -> String {
    text.split_whitespace()
        .filter(|token| !is_stopword(token))
        .collect::<Vec<_>>()
        .join(" ")
}
