#![allow(dead_code)]

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

static ENV_LOCK: Mutex<()> = Mutex::new(());
static NEXT_FILE: AtomicUsize = AtomicUsize::new(0);

/// Runs `f` with environment variables temporarily modified.
///
/// This is panic-safe (restores variables on unwind) and also serializes access to
/// process-global env vars to avoid flaky tests when Rust runs tests in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

/// File under the system temp directory, removed on drop.
pub struct TempFile {
    path: PathBuf,
}

impl TempFile {
    pub fn with_content(stem: &str, content: &str) -> Self {
        let file = Self::empty(stem);
        std::fs::write(&file.path, content).expect("write temp file");
        file
    }

    /// Unique path that does not exist yet.
    pub fn empty(stem: &str) -> Self {
        let n = NEXT_FILE.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!(
            "sightings-{}-{}-{}.csv",
            stem,
            std::process::id(),
            n
        ));
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

pub const HEADER: &str = "column-occurred,column-reported,column-shape,column-country,\
column-state,column-city,latitude,longitude,lat,lon,column-hasimage,column-summary";

/// One row in [`HEADER`] order.
pub struct Row<'a> {
    pub occurred: &'a str,
    pub reported: &'a str,
    pub shape: &'a str,
    pub country: &'a str,
    pub state: &'a str,
    pub city: &'a str,
    pub lat: &'a str,
    pub lon: &'a str,
    pub image: &'a str,
    pub summary: &'a str,
}

impl<'a> Row<'a> {
    pub fn new(shape: &'a str, country: &'a str) -> Self {
        Self {
            occurred: "",
            reported: "",
            shape,
            country,
            state: "",
            city: "",
            lat: "",
            lon: "",
            image: "",
            summary: "",
        }
    }

    fn quote(value: &str) -> String {
        if value.contains(',') || value.contains('"') || value.contains('\n') {
            format!("\"{}\"", value.replace('"', "\"\""))
        } else {
            value.to_string()
        }
    }

    /// Coordinates go in the short `lat`/`lon` columns.
    pub fn to_line(&self) -> String {
        [
            self.occurred,
            self.reported,
            self.shape,
            self.country,
            self.state,
            self.city,
            "",
            "",
            self.lat,
            self.lon,
            self.image,
            self.summary,
        ]
        .iter()
        .map(|v| Self::quote(v))
        .collect::<Vec<_>>()
        .join(",")
    }
}

pub fn csv(rows: &[Row<'_>]) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');
    for row in rows {
        out.push_str(&row.to_line());
        out.push('\n');
    }
    out
}

/// Small dataset covering every coordinate quality, both hemispheres,
/// several countries and a quoted multi-line summary.
///
/// | # | shape    | country   | coords      | occurred         |
/// |---|----------|-----------|-------------|------------------|
/// | 0 | Disk     | USA (NM)  | valid N     | 07/08/1947 10:00 |
/// | 1 | Light    | USA (AZ)  | valid N     | 03/13/1997 20:30 |
/// | 2 | Light    | Canada    | valid N     | 06/01/2005 23:15 |
/// | 3 | Orb      | USA (TX)  | placeholder | -                |
/// | 4 | Triangle | Australia | valid S     | 12/31/2010 01:00 |
/// | 5 | Disk     | UK        | zero        | 01/01/1980 00:00 |
/// | 6 | Disk     | USA (AZ)  | missing     | 02/02/2002 02:02 |
/// | 7 | (blank)  | (blank)   | out of range| 05/05/1955 05:05 |
pub fn sample_csv() -> String {
    csv(&[
        Row {
            occurred: "07/08/1947 10:00",
            reported: "07/09/1947",
            state: "NM",
            city: "Roswell",
            lat: "33.39",
            lon: "-104.52",
            image: "Yes",
            summary: "Bright disk, \"silent\"",
            ..Row::new("Disk", "USA")
        },
        Row {
            occurred: "03/13/1997 20:30",
            reported: "03/20/1997",
            state: "AZ",
            city: "Phoenix",
            lat: "33.45",
            lon: "-112.07",
            ..Row::new("Light", "USA")
        },
        Row {
            occurred: "06/01/2005 23:15",
            state: "ON",
            city: "Toronto",
            lat: "43.65",
            lon: "-79.38",
            ..Row::new("Light", "Canada")
        },
        Row {
            state: "TX",
            lat: "37.0902",
            lon: "-95.7129",
            ..Row::new("Orb", "USA")
        },
        Row {
            occurred: "12/31/2010 01:00",
            reported: "01/02/2011",
            city: "Sydney",
            lat: "-33.87",
            lon: "151.21",
            ..Row::new("Triangle", "Australia")
        },
        Row {
            occurred: "01/01/1980 00:00",
            reported: "12/31/1979",
            city: "London",
            lat: "0",
            lon: "0",
            ..Row::new("Disk", "UK")
        },
        Row {
            occurred: "02/02/2002 02:02",
            state: "AZ",
            city: "Tucson",
            summary: "line one\nline two",
            ..Row::new("Disk", "USA")
        },
        Row {
            occurred: "05/05/1955 05:05",
            lat: "95",
            lon: "10",
            ..Row::new("", "")
        },
    ])
}
