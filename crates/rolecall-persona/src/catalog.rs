// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Product catalog and rule-based recommendation.
//!
//! Reference material for the salesperson practising the call. The persona
//! never sees it.

use rolecall_core::Segment;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogItem {
    pub code: &'static str,
    pub name: &'static str,
    pub features: &'static [&'static str],
    pub suited_for: &'static [&'static str],
}

const SD_ITEMS: &[CatalogItem] = &[
    CatalogItem {
        code: "RB-SD-LIVE",
        name: "RuangBelajar Live SD",
        features: &["Live interaktif", "Bank soal SD", "Rekaman kelas", "Kuis adaptif"],
        suited_for: &["kelas 4-6", "butuh latihan rutin"],
    },
    CatalogItem {
        code: "RB-SD-VIDEO",
        name: "RuangBelajar Video SD",
        features: &["Video konsep dasar", "Ringkasan materi", "Latihan ringan"],
        suited_for: &["kelas 1-3", "butuh penguatan konsep"],
    },
    CatalogItem {
        code: "RO-PRIV",
        name: "RuangOrtu Insight",
        features: &["Report progres", "Rencana belajar mingguan"],
        suited_for: &["orang tua ingin pantau"],
    },
];

const SMP_ITEMS: &[CatalogItem] = &[
    CatalogItem {
        code: "RB-SMP-LIVE",
        name: "RuangBelajar Live SMP",
        features: &["Live intensif", "Tryout mingguan", "Pembahasan detail"],
        suited_for: &["kelas 9", "target naik nilai rapor"],
    },
    CatalogItem {
        code: "RB-SMP-PAKET",
        name: "Paket Latihan SMP",
        features: &["Bank soal AKM", "Remedial adaptif"],
        suited_for: &["kelas 7-9", "butuh drilling"],
    },
];

const SMA_ITEMS: &[CatalogItem] = &[
    CatalogItem {
        code: "RB-SMA-LIVE",
        name: "RuangBelajar Live SMA",
        features: &["Live STEM dan Soshum", "Jadwal intensif"],
        suited_for: &["kelas 10-12", "persiapan ujian sekolah"],
    },
    CatalogItem {
        code: "RB-UTBK",
        name: "Paket UTBK",
        features: &["Tryout UTBK", "Pembahasan SKD", "Strategi waktu"],
        suited_for: &["kelas 12", "fokus kampus tujuan"],
    },
];

/// Catalog items offered for a segment.
pub fn catalog(segment: Segment) -> &'static [CatalogItem] {
    match segment {
        Segment::Sd => SD_ITEMS,
        Segment::Smp => SMP_ITEMS,
        Segment::Sma => SMA_ITEMS,
    }
}

/// Needs inferred from the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signals {
    pub exam_focus: bool,
    pub needs_live: bool,
    pub needs_practice: bool,
    pub basic_concepts: bool,
}

impl Default for Signals {
    fn default() -> Self {
        Self {
            exam_focus: false,
            needs_live: false,
            needs_practice: true,
            basic_concepts: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub score: u32,
    pub item: &'static CatalogItem,
}

fn score(segment: Segment, item: &CatalogItem, signals: &Signals) -> u32 {
    let mut score = 0;
    if signals.exam_focus && item.name.contains("UTBK") {
        score += 3;
    }
    if signals.needs_live
        && (item.name.contains("Live") || item.features.iter().any(|f| f.contains("Live")))
    {
        score += 2;
    }
    if signals.needs_practice
        && item
            .features
            .iter()
            .any(|f| f.contains("Bank soal") || f.contains("Tryout"))
    {
        score += 2;
    }
    if segment == Segment::Sd && item.name.contains("Video") && signals.basic_concepts {
        score += 2;
    }
    if matches!(segment, Segment::Smp | Segment::Sma) && item.name.contains("Paket") {
        score += 1;
    }
    score
}

/// Top three catalog items for `segment`, highest score first.
///
/// Ties keep catalog order.
pub fn recommend(segment: Segment, signals: &Signals) -> Vec<Recommendation> {
    let mut ranked: Vec<Recommendation> = catalog(segment)
        .iter()
        .map(|item| Recommendation {
            score: score(segment, item, signals),
            item,
        })
        .collect();
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked.truncate(3);
    ranked
}
