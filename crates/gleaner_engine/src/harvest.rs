//! Image batch: qualify each surveyed `img` tag, download the qualifying
//! ones and write them under running `image_<n>` names.

use std::path::PathBuf;

use url::Url;

use engine_logging::engine_debug;

use crate::fetch::{Fetcher, ProgressSink};
use crate::persist::ImageFileWriter;
use crate::survey::ImageRef;
use crate::types::{ImageAttempt, ImageOutcome, InvocationId, ScrapeEvent, SkipReason};

/// Directory images land in when the caller does not pick one.
pub const DEFAULT_OUTPUT_DIR: &str = "downloaded_images";

const DEFAULT_ALLOWED_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".svg"];

/// When the running filename counter advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotPolicy {
    /// Only a successful write consumes a number; a failed attempt leaves
    /// its number for the next candidate, so filenames stay dense.
    #[default]
    OnSuccess,
    /// Every download attempt consumes a number; failures leave gaps, so a
    /// filename always identifies the same attempt.
    PerAttempt,
}

/// Knobs for the image batch.
#[derive(Debug, Clone)]
pub struct HarvestSettings {
    pub output_dir: PathBuf,
    /// Dot-prefixed extensions, matched case-insensitively against the
    /// resolved URL's path.
    pub allowed_extensions: Vec<String>,
    pub slot_policy: SlotPolicy,
}

impl Default for HarvestSettings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            allowed_extensions: DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            slot_policy: SlotPolicy::OnSuccess,
        }
    }
}

impl HarvestSettings {
    fn is_extension_allowed(&self, extension: &str) -> bool {
        self.allowed_extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(extension))
    }
}

/// Resolve a raw `src` against the page URL the user submitted. Relative
/// and scheme-relative sources get absolutized; absolute ones pass through.
pub fn resolve_image_url(base: &Url, src: &str) -> Option<Url> {
    base.join(src.trim()).ok()
}

/// Extension of the URL's final path segment: the substring from the last
/// dot to the end, original case kept. A segment without a dot, or with
/// the dot first (".gitignore" style), has no extension. Query and
/// fragment never count.
pub fn image_extension(url: &Url) -> Option<String> {
    let segment = url.path_segments()?.last()?;
    match segment.rfind('.') {
        None | Some(0) => None,
        Some(idx) => Some(segment[idx..].to_string()),
    }
}

enum Qualified {
    Candidate { url: Url, extension: String },
    Skip {
        resolved_url: Option<String>,
        reason: SkipReason,
    },
}

fn qualify(page_url: &Url, image: &ImageRef, settings: &HarvestSettings) -> Qualified {
    let Some(src) = image.src.as_deref() else {
        return Qualified::Skip {
            resolved_url: None,
            reason: SkipReason::MissingSource,
        };
    };
    let Some(url) = resolve_image_url(page_url, src) else {
        return Qualified::Skip {
            resolved_url: None,
            reason: SkipReason::UnresolvableSource,
        };
    };
    match image_extension(&url) {
        Some(extension) if settings.is_extension_allowed(&extension) => {
            Qualified::Candidate { url, extension }
        }
        extension => Qualified::Skip {
            resolved_url: Some(url.to_string()),
            reason: SkipReason::ExtensionNotAllowed { extension },
        },
    }
}

/// Work through the surveyed images in document order. One attempt never
/// aborts the batch: failures are recorded and the loop moves on. Every
/// settled attempt is also emitted as an [`ScrapeEvent::ImageFinished`].
pub async fn harvest_images(
    invocation: InvocationId,
    page_url: &Url,
    images: &[ImageRef],
    settings: &HarvestSettings,
    fetcher: &dyn Fetcher,
    sink: &dyn ProgressSink,
) -> Vec<ImageAttempt> {
    let writer = ImageFileWriter::new(settings.output_dir.clone());
    let mut attempts = Vec::with_capacity(images.len());
    let mut slot = 1usize;

    for (index, image) in images.iter().enumerate() {
        let attempt = match qualify(page_url, image, settings) {
            Qualified::Skip { resolved_url, reason } => {
                engine_debug!("image {index} skipped: {reason}");
                ImageAttempt {
                    index,
                    source: image.src.clone(),
                    resolved_url,
                    outcome: ImageOutcome::Skipped { reason },
                }
            }
            Qualified::Candidate { url, extension } => {
                let filename = format!("image_{slot}{extension}");
                let outcome = match download_one(fetcher, &writer, &url, &filename).await {
                    Ok(path) => {
                        slot += 1;
                        ImageOutcome::Downloaded { path }
                    }
                    Err(error) => {
                        engine_debug!("image {index} ({url}) failed: {error}");
                        if settings.slot_policy == SlotPolicy::PerAttempt {
                            slot += 1;
                        }
                        ImageOutcome::Failed { error }
                    }
                };
                ImageAttempt {
                    index,
                    source: image.src.clone(),
                    resolved_url: Some(url.to_string()),
                    outcome,
                }
            }
        };
        sink.emit(ScrapeEvent::ImageFinished {
            invocation,
            attempt: attempt.clone(),
        });
        attempts.push(attempt);
    }

    attempts
}

async fn download_one(
    fetcher: &dyn Fetcher,
    writer: &ImageFileWriter,
    url: &Url,
    filename: &str,
) -> Result<PathBuf, String> {
    let body = fetcher
        .fetch_image(url.as_str())
        .await
        .map_err(|err| err.to_string())?;
    writer.write(filename, &body).map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn extension_is_the_last_dotted_suffix() {
        assert_eq!(
            image_extension(&url("http://site.test/a/photo.png")),
            Some(".png".to_string())
        );
        assert_eq!(
            image_extension(&url("http://site.test/archive.tar.gz")),
            Some(".gz".to_string())
        );
    }

    #[test]
    fn extension_keeps_its_case() {
        assert_eq!(
            image_extension(&url("http://site.test/logo.PNG")),
            Some(".PNG".to_string())
        );
    }

    #[test]
    fn dotless_and_dotfile_segments_have_no_extension() {
        assert_eq!(image_extension(&url("http://site.test/images")), None);
        assert_eq!(image_extension(&url("http://site.test/.hidden")), None);
        assert_eq!(image_extension(&url("http://site.test/")), None);
    }

    #[test]
    fn query_and_fragment_do_not_leak_into_the_extension() {
        assert_eq!(
            image_extension(&url("http://site.test/pic.jpg?size=large#top")),
            Some(".jpg".to_string())
        );
        assert_eq!(image_extension(&url("http://site.test/pic?name=a.jpg")), None);
    }

    #[test]
    fn allow_list_matching_ignores_case() {
        let settings = HarvestSettings::default();
        assert!(settings.is_extension_allowed(".png"));
        assert!(settings.is_extension_allowed(".PNG"));
        assert!(settings.is_extension_allowed(".JpEg"));
        assert!(!settings.is_extension_allowed(".bmp"));
        assert!(!settings.is_extension_allowed(".webp"));
    }

    #[test]
    fn sources_resolve_against_the_page_url() {
        let base = url("http://site.test/page");
        assert_eq!(
            resolve_image_url(&base, "a.png").unwrap().as_str(),
            "http://site.test/a.png"
        );
        assert_eq!(
            resolve_image_url(&base, "/b.jpg").unwrap().as_str(),
            "http://site.test/b.jpg"
        );
        assert_eq!(
            resolve_image_url(&base, "http://other.test/c.gif").unwrap().as_str(),
            "http://other.test/c.gif"
        );
        assert_eq!(
            resolve_image_url(&base, "//other.test/d.svg").unwrap().as_str(),
            "http://other.test/d.svg"
        );
    }

    #[test]
    fn a_relative_source_resolves_within_the_base_directory() {
        let base = url("http://site.test/gallery/page.html");
        assert_eq!(
            resolve_image_url(&base, "a.png").unwrap().as_str(),
            "http://site.test/gallery/a.png"
        );
    }

    #[test]
    fn surrounding_whitespace_in_src_is_ignored() {
        let base = url("http://site.test/");
        assert_eq!(
            resolve_image_url(&base, "  spaced.png  ").unwrap().as_str(),
            "http://site.test/spaced.png"
        );
    }
}
