use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use serde::Deserialize;

use crate::gallery::{DEFAULT_ALT, ImageRef};
use crate::probe::{ProbeOptions, normalize_base_dir};

/// How an HTTP source checks a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CheckMethod {
    /// Status plus `Content-Type` only.
    Head,
    /// Fetch and sniff the leading bytes, like an image load would.
    #[default]
    Get,
}

/// Where candidate images are looked up.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SourceConfig {
    Http {
        /// Page URL that relative image paths are resolved against.
        #[serde(default)]
        origin: Option<String>,
        #[serde(default)]
        method: CheckMethod,
        #[serde(
            default = "SourceConfig::default_request_timeout",
            with = "humantime_serde",
            rename = "request-timeout"
        )]
        request_timeout: Duration,
    },
    Local {
        /// Directory that URL paths are mapped onto.
        root: PathBuf,
        /// Page file under `root` that relative image paths are resolved
        /// against. Without it relative paths start at `root`.
        #[serde(default)]
        page: Option<PathBuf>,
    },
}

impl SourceConfig {
    const fn default_request_timeout() -> Duration {
        Duration::from_secs(5)
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self::Local {
            root: PathBuf::from("."),
            page: None,
        }
    }
}

/// A statically declared image used when discovery finds nothing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FallbackImage {
    pub src: String,
    #[serde(default)]
    pub alt: Option<String>,
}

impl From<&FallbackImage> for ImageRef {
    fn from(img: &FallbackImage) -> Self {
        let alt = img
            .alt
            .as_deref()
            .filter(|a| !a.is_empty())
            .unwrap_or(DEFAULT_ALT);
        ImageRef::new(img.src.clone(), alt)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SlideshowOptions {
    /// Time each hero slide stays up while autoplay runs. Drives
    /// `tasks::autoplay::run` and is echoed in the CLI manifest.
    #[serde(with = "humantime_serde")]
    pub interval: Duration,
}

impl Default for SlideshowOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(4000),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Configuration {
    /// Property identifier; names the image directory and the alt text.
    /// Without one, discovery is skipped and only the fallback list is used.
    pub property_code: Option<String>,
    /// Directory URL prefix for the numbered images. Derived from the
    /// property code when absent.
    pub base_dir: Option<String>,
    pub source: SourceConfig,
    pub probe: ProbeOptions,
    pub fallback_images: Vec<FallbackImage>,
    pub slideshow: SlideshowOptions,
}

impl Configuration {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Ok(serde_yaml::from_str(&s)?)
    }

    /// Validate runtime invariants that cannot be expressed via serde defaults alone.
    pub fn validated(mut self) -> Result<Self> {
        ensure!(self.probe.max_index >= 1, "probe.max-index must be >= 1");
        ensure!(
            self.probe.miss_streak_limit >= 1,
            "probe.miss-streak-limit must be >= 1"
        );

        let mut exts: Vec<String> = Vec::with_capacity(self.probe.extensions.len());
        for ext in &self.probe.extensions {
            let ext = ext.trim().trim_start_matches('.').to_ascii_lowercase();
            ensure!(
                !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()),
                "probe.extensions contains invalid entry {ext:?}"
            );
            if !exts.contains(&ext) {
                exts.push(ext);
            }
        }
        ensure!(!exts.is_empty(), "probe.extensions must not be empty");
        self.probe.extensions = exts;

        ensure!(
            !self.slideshow.interval.is_zero(),
            "slideshow.interval must be positive"
        );
        self.property_code = self
            .property_code
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_owned);
        Ok(self)
    }

    pub fn property_code(&self) -> Option<&str> {
        self.property_code.as_deref()
    }

    /// The directory probed for this property, always with a trailing `/`.
    /// `None` when there is no property code.
    ///
    /// The derived default is relative to a property page two levels deep,
    /// or root-relative for a local source without a page.
    pub fn base_dir(&self) -> Option<String> {
        let code = self.property_code()?;
        Some(match &self.base_dir {
            Some(dir) => normalize_base_dir(dir),
            None => match &self.source {
                SourceConfig::Local { page: None, .. } => {
                    format!("/assets/images/properties/{code}/")
                }
                _ => format!("../../assets/images/properties/{code}/"),
            },
        })
    }

    pub fn fallback(&self) -> Vec<ImageRef> {
        self.fallback_images.iter().map(ImageRef::from).collect()
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            property_code: None,
            base_dir: None,
            source: SourceConfig::default(),
            probe: ProbeOptions::default(),
            fallback_images: Vec::new(),
            slideshow: SlideshowOptions::default(),
        }
    }
}
