//! Image discovery by filename guessing.
//!
//! Static hosting cannot list a directory, so photos are found by probing
//! numbered names (`g01.jpg`, `g1.png`, ...) one index at a time. All
//! candidates for an index are checked together; indices run in ascending
//! order so results are deterministic regardless of network timing.

use std::collections::HashSet;

use futures::future::join_all;
use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::check::ExistenceCheck;
use crate::gallery::{ImageRef, ProbeResult, StopReason};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ProbeOptions {
    /// Highest index probed (inclusive).
    pub max_index: u32,
    /// Extensions tried for every stem, in order.
    pub extensions: Vec<String>,
    /// Consecutive empty indices that end the scan once something was found.
    pub miss_streak_limit: u32,
    /// Filename prefix before the index number.
    pub stem_prefix: String,
}

impl ProbeOptions {
    pub const DEFAULT_MAX_INDEX: u32 = 120;
    pub const DEFAULT_MISS_STREAK_LIMIT: u32 = 8;
    pub const DEFAULT_EXTENSIONS: &'static [&'static str] = &["jpg", "jpeg", "png", "webp", "avif"];
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            max_index: Self::DEFAULT_MAX_INDEX,
            extensions: Self::DEFAULT_EXTENSIONS
                .iter()
                .map(|e| (*e).to_owned())
                .collect(),
            miss_streak_limit: Self::DEFAULT_MISS_STREAK_LIMIT,
            stem_prefix: "g".to_owned(),
        }
    }
}

/// Ensure `base_dir` ends with exactly one `/` so names can be appended.
pub fn normalize_base_dir(base_dir: &str) -> String {
    if base_dir.is_empty() || base_dir.ends_with('/') {
        base_dir.to_owned()
    } else {
        format!("{base_dir}/")
    }
}

/// Zero-padded stem first, then the unpadded one (they coincide from 10 up).
pub fn stems(prefix: &str, index: u32) -> Vec<String> {
    let padded = format!("{prefix}{index:02}");
    let plain = format!("{prefix}{index}");
    if padded == plain {
        vec![padded]
    } else {
        vec![padded, plain]
    }
}

/// Every URL to try for `index`: stems × extensions, stem-major.
pub fn candidate_urls(base_dir: &str, index: u32, options: &ProbeOptions) -> Vec<String> {
    stems(&options.stem_prefix, index)
        .iter()
        .flat_map(|stem| {
            options
                .extensions
                .iter()
                .map(move |ext| format!("{base_dir}{stem}.{ext}"))
        })
        .collect()
}

/// Scan `base_dir` for the numbered images of `property_code`.
///
/// Stops at `max_index`, or earlier once `miss_streak_limit` consecutive
/// indices came back empty after at least one hit.
#[instrument(skip(options, check), fields(max_index = options.max_index))]
pub async fn discover<C>(
    base_dir: &str,
    property_code: &str,
    options: &ProbeOptions,
    check: &C,
) -> ProbeResult
where
    C: ExistenceCheck + ?Sized,
{
    let base_dir = normalize_base_dir(base_dir);
    let mut found: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut misses_in_row = 0u32;
    let mut found_any = false;
    let mut last_index = 0u32;
    let mut stop = StopReason::Exhausted;

    for index in 1..=options.max_index {
        last_index = index;
        let candidates = candidate_urls(&base_dir, index, options);
        let checks = join_all(candidates.iter().map(|url| check.exists(url))).await;
        let checks_len = checks.len();

        let mut hit = false;
        for (url, exists) in candidates.into_iter().zip(checks) {
            if !exists {
                continue;
            }
            hit = true;
            if seen.insert(url.clone()) {
                debug!(index, %url, "found image");
                found.push(url);
            }
        }

        debug!(index, candidates = checks_len, hit, "index probed");
        if hit {
            found_any = true;
            misses_in_row = 0;
        } else {
            misses_in_row += 1;
            if found_any && misses_in_row >= options.miss_streak_limit {
                stop = StopReason::MissStreak;
                break;
            }
        }
    }

    let images: Vec<ImageRef> = found
        .into_iter()
        .enumerate()
        .map(|(pos, src)| ImageRef::new(src, format!("{property_code} photo {}", pos + 1)))
        .collect();
    info!(
        count = images.len(),
        last_index,
        stop = ?stop,
        "image discovery finished"
    );
    ProbeResult {
        images,
        last_index,
        stop,
    }
}
