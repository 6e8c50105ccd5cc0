// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persona instructions: the role template, per-segment topic rules, the
//! banned-phrase list and the per-turn task instructions.
//!
//! The simulated customer speaks Indonesian, so the instruction text is
//! Indonesian as well.

use rolecall_core::{Audience, Segment};

/// Phrases that make the customer sound like a call-center agent, introduce
/// themselves unprompted, or negotiate a call time.
pub const STOP_PHRASES: &[&str] = &[
    "ada yang bisa saya bantu",
    "bagaimana saya bisa membantu",
    "bisa dibantu apa",
    "ada yang bisa dibantu",
    "apa yang bisa saya bantu",
    "bisa dihubungi",
    "bisa di hubungi",
    "bisa ditelepon",
    "bisa di telepon",
    "boleh telepon sekarang",
    "sekarang waktunya pas",
    "sekarang waktu yang pas",
    "waktunya pas",
    "ada waktu lain",
    "jadwal yang cocok",
    "kapan waktu yang tepat",
    "diskusi sebentar atau nanti",
    "apakah sekarang waktu",
    "ini bundanya",
    "ini ayahnya",
    "ini ibunya",
    "ini orang tua",
    "ini orangtua",
];

/// The role template used both as the system instruction and in `[SYSTEM]`.
pub fn system_prompt(audience: Audience, segment: Segment) -> String {
    [
        format!("Peran: Anda {audience} segmen {segment}."),
        "Tujuan: sampaikan masalah, konteks, harapan, dan batasan secara natural dari sudut pandang Anda.".to_string(),
        "Gaya: 1–3 kalimat, natural, tanpa daftar bullet, tanpa jargon pemasaran, tanpa pengulangan.".to_string(),
        "Interaksi: tutup dengan satu pertanyaan klarifikasi singkat bila relevan.".to_string(),
        "Larangan keras: jangan menawarkan produk, jangan menyebut nama/kode paket, jangan menyarankan program, jangan ajak membeli, jangan pitching.".to_string(),
        "Jika ditanya produk secara langsung: jawab tidak tahu detail produk; kembalikan fokus ke pengalaman pribadi dan kebutuhan.".to_string(),
    ]
    .join("\n")
}

/// Topics the persona may and may not raise at this school level.
pub fn segment_rule(segment: Segment) -> &'static str {
    match segment {
        Segment::Sd => {
            "Hindari istilah Fisika, Kimia, UTBK; fokus literasi, numerasi dasar, IPA sederhana, kebiasaan belajar."
        }
        Segment::Smp => {
            "Hindari UTBK dan materi SMA; fokus aljabar dasar, IPA terapan, manajemen waktu."
        }
        Segment::Sma => "Boleh UTBK dan materi lanjutan; hindari topik terlalu dasar SD/SMP.",
    }
}

/// Task for a regular reply to the salesperson's last message.
pub fn dialog_instruction(audience: Audience, segment: Segment) -> String {
    let rule = segment_rule(segment);
    let banned = STOP_PHRASES.join("; ");
    format!(
        "Anda tetap berperan sebagai {audience} segmen {segment}. \
         Patuh aturan segmen: {rule} \
         Tanggapi ketat sesuai konteks pesan terakhir. Tidak menawarkan bantuan. Tidak promosi produk. \
         Tidak menyebut ketersediaan, tidak menanyakan waktu/jadwal, tidak memperkenalkan identitas diri proaktif. \
         Hindari frasa: {banned}. \
         Jika pesan pengguna hanya sapaan/cek identitas, balas singkat dan netral tanpa perkenalan diri, contoh: \
         'Halo juga, ada apa ya?' atau 'Halo, siapa ya?'. \
         Gunakan orang pertama konsisten sesuai persona hanya jika ditanya."
    )
}

/// Task for the customer's unprompted opening message built around `scenario`.
pub fn opener_instruction(audience: Audience, segment: Segment, scenario: &str) -> String {
    let rule = segment_rule(segment);
    format!(
        "Buat pembuka percakapan 1–2 kalimat sebagai {audience} segmen {segment}. \
         Gunakan skenario: {scenario}. \
         Patuh aturan segmen: {rule} \
         Natural, tanpa menyebut produk atau paket. Variasikan diksi agar berbeda setiap kali."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_prompt_names_persona_and_has_six_lines() {
        let prompt = system_prompt(Audience::Parent, Segment::Smp);
        assert!(prompt.starts_with("Peran: Anda Orang Tua segmen SMP."));
        assert_eq!(prompt.lines().count(), 6);
        assert!(prompt.contains("jangan pitching"));
    }

    #[test]
    fn dialog_instruction_lists_every_stop_phrase() {
        let instruction = dialog_instruction(Audience::Student, Segment::Sd);
        assert!(instruction.contains("berperan sebagai Murid segmen SD"));
        assert!(instruction.contains(segment_rule(Segment::Sd)));
        for phrase in STOP_PHRASES {
            assert!(instruction.contains(phrase), "missing {phrase}");
        }
    }

    #[test]
    fn opener_instruction_embeds_scenario() {
        let instruction = opener_instruction(
            Audience::Parent,
            Segment::Sma,
            "Persiapan UTBK belum terarah; anak sulit konsisten.",
        );
        assert!(instruction.contains("Gunakan skenario: Persiapan UTBK belum terarah"));
        assert!(instruction.contains("Boleh UTBK"));
    }

    #[test]
    fn segment_rules_differ() {
        assert_ne!(segment_rule(Segment::Sd), segment_rule(Segment::Smp));
        assert_ne!(segment_rule(Segment::Smp), segment_rule(Segment::Sma));
    }
}
