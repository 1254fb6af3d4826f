//! Gallery data model and fallback resolution.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::check::ExistenceCheck;
use crate::config::Configuration;
use crate::probe;

/// Alt text used for fallback images that do not declare one.
pub const DEFAULT_ALT: &str = "Property photo";

/// A single displayable image: where it lives and how to label it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub src: String,
    pub alt: String,
}

impl ImageRef {
    pub fn new(src: impl Into<String>, alt: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            alt: alt.into(),
        }
    }
}

/// Why a discovery scan stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StopReason {
    /// Every index up to `max-index` was probed.
    Exhausted,
    /// A run of empty indices after the first hit ended the scan.
    MissStreak,
}

/// Outcome of one discovery scan, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub images: Vec<ImageRef>,
    /// Highest index that was probed (0 when nothing was probed).
    pub last_index: u32,
    pub stop: StopReason,
}

impl ProbeResult {
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn into_images(self) -> Vec<ImageRef> {
        self.images
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GallerySource {
    Discovered,
    Fallback,
}

/// The list handed to the slideshow and lightbox. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Gallery {
    pub source: GallerySource,
    pub images: Vec<ImageRef>,
}

impl Gallery {
    /// Prefer discovered images, then the static fallback list.
    ///
    /// Returns `None` when both are empty; the gallery is then not rendered.
    pub fn resolve(discovered: Vec<ImageRef>, fallback: &[ImageRef]) -> Option<Self> {
        if !discovered.is_empty() {
            info!(count = discovered.len(), "using discovered images");
            return Some(Self {
                source: GallerySource::Discovered,
                images: discovered,
            });
        }
        if !fallback.is_empty() {
            info!(count = fallback.len(), "discovery found nothing; using fallback list");
            return Some(Self {
                source: GallerySource::Fallback,
                images: fallback.to_vec(),
            });
        }
        warn!("no discovered or fallback images; gallery will not render");
        None
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn manifest(&self, slideshow_interval: Duration) -> Manifest<'_> {
        Manifest {
            gallery: self,
            slideshow_interval,
        }
    }
}

/// What renderers are handed: the gallery plus the hero rotation period.
#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Manifest<'a> {
    #[serde(flatten)]
    pub gallery: &'a Gallery,
    #[serde(with = "humantime_serde")]
    pub slideshow_interval: Duration,
}

/// Discover images for the configured property and apply the fallback list.
///
/// Without a property code there is nothing to probe, so only the fallback
/// list is considered.
pub async fn discover_gallery<C>(cfg: &Configuration, check: &C) -> Option<Gallery>
where
    C: ExistenceCheck + ?Sized,
{
    let discovered = match (cfg.property_code(), cfg.base_dir()) {
        (Some(code), Some(base_dir)) => {
            info!(property = %code, %base_dir, "probing for images");
            probe::discover(&base_dir, code, &cfg.probe, check)
                .await
                .into_images()
        }
        _ => {
            info!("no property code; skipping discovery");
            Vec::new()
        }
    };
    Gallery::resolve(discovered, &cfg.fallback())
}
