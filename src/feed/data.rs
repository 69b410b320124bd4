// Static feed content. The schedule feed is fetched and has no entry here.

use super::{FeedAction, FeedItem};

pub fn items(key: &str) -> &'static [FeedItem] {
    match key {
        "wtfis" => WTFIS,
        "archive" => ARCHIVE,
        "mixes" => MIXES,
        "marathoner" => MARATHONER,
        _ => &[],
    }
}

const fn soon(label: &'static str) -> Option<FeedAction> {
    Some(FeedAction::Disabled { label })
}

pub static WTFIS: &[FeedItem] = &[
    FeedItem {
        id: "logo-set",
        title: "DEVILTOWN LOGO SYSTEM",
        subtitle: "Main mark, mono variants, stamp drafts",
        date: "2025.11",
        cover: "LOGO",
        tags: &["logo", "graphics"],
        meta: &["asset kit", "brand core"],
        action: soon("Preview soon"),
    },
    FeedItem {
        id: "tees-drop",
        title: "TEE GRAPHICS V2",
        subtitle: "Front/back print experiments",
        date: "2025.10",
        cover: "TEES",
        tags: &["tees", "graphics"],
        meta: &["screen print", "drop prep"],
        action: soon("Lookbook soon"),
    },
    FeedItem {
        id: "poster-lab",
        title: "POSTER LAB CUTS",
        subtitle: "Flyer / poster studies for events",
        date: "2025.09",
        cover: "POSTER",
        tags: &["poster", "event", "graphics"],
        meta: &["A3 / digital", "night campaigns"],
        action: soon("Archive soon"),
    },
    FeedItem {
        id: "visual-experiment",
        title: "ASCII / NOISE VISUAL EXPERIMENT",
        subtitle: "Live visual fragments and motion tests",
        date: "2025.08",
        cover: "EXPERIMENT",
        tags: &["experiment", "visual", "graphics"],
        meta: &["stage visual", "web adaptation"],
        action: soon("Details soon"),
    },
];

pub static ARCHIVE: &[FeedItem] = &[
    FeedItem {
        id: "ready2drink",
        title: "READY 2 DRINK SESSION",
        subtitle: "6-track video drop",
        date: "2025.11",
        cover: "VIDEO SET",
        tags: &["video", "event", "night"],
        meta: &["youtube playlist", "live set"],
        action: Some(FeedAction::Playlist {
            label: "Open Playlist ▶",
            title: "ĐɆVłⱠ₮Ø₩₦ ⱤɆ₳ĐɎ 2 ĐⱤł₦₭",
            videos: &["o2_g_GyF1iE", "TzyiGAERKVw", "vbeBVo2jiRY", "_7P7_9RgDQM", "vbeBVo2jiRY", "w35YjgOUaZk"],
            titles: &["CHBS", "tejava_assassins", "VIC_CATLE", "FAACIA", "TENJU", "mhmd"],
            instagrams: &[
                "https://www.instagram.com/givemeazerocoke/",
                "https://www.instagram.com/tejava_assassins/",
                "https://www.instagram.com/vic_catle/",
                "https://www.instagram.com/faacia.or0/",
                "https://www.instagram.com/tenjumakes/",
                "https://www.instagram.com/mhmd_muhammmmmad/",
            ],
        }),
    },
    FeedItem {
        id: "anniv-photo",
        title: "2ND ANNIVERSARY SNAPSHOT",
        subtitle: "Crowd / backstage / moments",
        date: "2025.08",
        cover: "PHOTO LOG",
        tags: &["photo", "event"],
        meta: &["night venue", "community"],
        action: soon("Photo album soon"),
    },
    FeedItem {
        id: "artwork-archive",
        title: "ARTWORK ARCHIVE",
        subtitle: "Poster / tee / visual experiments",
        date: "2025.06",
        cover: "DESIGN DROP",
        tags: &["design", "logo", "poster"],
        meta: &["graphics", "brand study"],
        action: soon("Design index soon"),
    },
    FeedItem {
        id: "street-cuts",
        title: "AFTER-RUN STREET CUTS",
        subtitle: "City fragments after midnight runs",
        date: "2025.04",
        cover: "PHOTO CUTS",
        tags: &["photo", "night"],
        meta: &["street", "run culture"],
        action: soon("Archive in progress"),
    },
];

pub static MIXES: &[FeedItem] = &[
    FeedItem {
        id: "mix-1",
        title: "DEVILTOWN NIGHT BUS 001",
        subtitle: "Fast and dark warm-up run",
        date: "2026.01.12",
        cover: "MIX 001",
        tags: &["techno", "live", "2026"],
        meta: &["platform: soundcloud", "duration: 58m"],
        action: soon("Drop soon"),
    },
    FeedItem {
        id: "mix-2",
        title: "HELL GATE RADIO CUT",
        subtitle: "Pressure + drive focused set",
        date: "2026.01.03",
        cover: "MIX 002",
        tags: &["hard", "radio", "2026"],
        meta: &["platform: youtube", "duration: 46m"],
        action: soon("Drop soon"),
    },
    FeedItem {
        id: "mix-3",
        title: "CITY TUNNEL LIVE TAKE",
        subtitle: "Live-room recording",
        date: "2025.12.22",
        cover: "MIX 003",
        tags: &["techno", "live", "hard"],
        meta: &["platform: soundcloud", "duration: 1h 12m"],
        action: soon("Drop soon"),
    },
];

pub static MARATHONER: &[FeedItem] = &[
    FeedItem {
        id: "run-1",
        title: "Han River Long Run",
        subtitle: "Steady breathing, controlled finish",
        date: "2026-02-14",
        cover: "LONG RUN",
        tags: &["longrun", "raceprep"],
        meta: &["distance: 28.4km", "time: 2:28:10", "pace: 5:13/km", "route: Han Riverside", "mood: focused", "note: finish controlled"],
        action: soon("Route note"),
    },
    FeedItem {
        id: "run-2",
        title: "Track Intervals 8x1K",
        subtitle: "Sharp but stable recovery",
        date: "2026-02-10",
        cover: "INTERVAL",
        tags: &["interval", "raceprep"],
        meta: &["distance: 14.0km", "time: 1:07:22", "pace: 4:48/km", "route: Track 8x1K", "mood: sharp", "note: stable recovery"],
        action: soon("Session detail"),
    },
    FeedItem {
        id: "run-3",
        title: "Trail Recovery Loop",
        subtitle: "Light effort on soft ground",
        date: "2026-02-06",
        cover: "TRAIL",
        tags: &["trail", "easy"],
        meta: &["distance: 11.2km", "time: 1:05:41", "pace: 5:51/km", "route: Gwanak trail", "mood: reset", "note: easy effort"],
        action: soon("Trail note"),
    },
];
