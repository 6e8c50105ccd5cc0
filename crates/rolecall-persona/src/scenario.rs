// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Opener scenarios: short complaints the customer opens a conversation with.

use rand::Rng;
use rand::seq::SliceRandom;
use rolecall_core::{Audience, Segment};

/// Used when the pool has nothing for the requested persona.
pub const DEFAULT_SCENARIO: &str =
    "Keluhan belajar sesuai jenjang saat ini, tanpa menyebut produk.";

const STUDENT_SD: &[&str] = &[
    "Perkalian dan pembagian masih sering salah; PR Matematika terasa berat.",
    "Sulit memahami bacaan panjang; suka kebingungan cari ide pokok.",
    "IPA dasar tentang tumbuhan dan hewan membingungkan saat ulangan.",
    "Gampang terdistraksi main gim saat jam belajar; susah fokus 20 menit penuh.",
    "Kesulitan menulis rapi dan cepat saat dikte; ketinggalan materi.",
];

const STUDENT_SMP: &[&str] = &[
    "Nilai Fisika tentang gaya dan gerak turun; bingung rumus dan satuan.",
    "Aljabar dan persamaan linear bikin mentok; salah di langkah awal.",
    "Bahasa Inggris reading panjang bikin kewalahan; kosakata kurang.",
    "Sering kehabisan waktu karena ekskul; tugas menumpuk jelang ulangan.",
    "Kimia pengantar zat dan perubahan wujud masih rancu.",
];

const STUDENT_SMA: &[&str] = &[
    "Trigonometri dan limit membingungkan; nilai kuis turun.",
    "UTBK makin dekat; sulit konsisten belajar setiap hari.",
    "Fisika kinematika sering salah di konversi satuan.",
    "Kimia stoikiometri panjang; bingung analisis mol dan massa.",
    "Ekonomi mikro: elastisitas dan kurva permintaan-penawaran masih salah konsep.",
];

const PARENT_SD: &[&str] = &[
    "Anak mudah terdistraksi HP saat belajar; PR sering ditunda.",
    "Membaca pemahaman masih lemah; perlu latihan bertahap.",
    "Sulit duduk fokus lebih dari 15 menit; butuh pola belajar singkat.",
    "Ingin cara memantau progres tanpa harus mendampingi terus-menerus.",
];

const PARENT_SMP: &[&str] = &[
    "Nilai Matematika menurun dua bulan terakhir; remedial sering tidak tuntas.",
    "Anak malu bertanya di kelas; konsep IPA kurang kuat.",
    "Jadwal ekskul padat; tugas dan ulangan sering berbenturan.",
    "Butuh kebiasaan belajar teratur tanpa harus dimarahi.",
];

const PARENT_SMA: &[&str] = &[
    "Persiapan UTBK belum terarah; anak sulit konsisten.",
    "Bingung pemilihan jurusan; perlu arahan fokus mata pelajaran.",
    "Belajar mandiri tapi cepat burnout; perlu ritme yang sehat.",
    "Orangtua ingin laporan progres yang ringkas dan objektif.",
];

/// Scenarios available for a persona.
pub fn scenarios(audience: Audience, segment: Segment) -> &'static [&'static str] {
    match (audience, segment) {
        (Audience::Student, Segment::Sd) => STUDENT_SD,
        (Audience::Student, Segment::Smp) => STUDENT_SMP,
        (Audience::Student, Segment::Sma) => STUDENT_SMA,
        (Audience::Parent, Segment::Sd) => PARENT_SD,
        (Audience::Parent, Segment::Smp) => PARENT_SMP,
        (Audience::Parent, Segment::Sma) => PARENT_SMA,
    }
}

/// Picks a scenario uniformly at random.
///
/// An empty segment pool falls back to every scenario of the audience, then
/// to [`DEFAULT_SCENARIO`].
pub fn sample_scenario<R: Rng + ?Sized>(
    audience: Audience,
    segment: Segment,
    rng: &mut R,
) -> &'static str {
    if let Some(picked) = scenarios(audience, segment).choose(rng) {
        return picked;
    }
    let merged: Vec<&'static str> = Segment::ALL
        .iter()
        .flat_map(|s| scenarios(audience, *s).iter().copied())
        .collect();
    merged.choose(rng).copied().unwrap_or(DEFAULT_SCENARIO)
}
