use std::path::Path;

use crate::{error::Error, image::ImageFile, result::Result, Client};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Comic numbers inside `1..=latest` that the comic service does not serve.
pub const MISSING_COMICS: &[u32] = &[404];

/// Metadata of a single comic, as served by `/{index}/info.0.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comic {
    /// The comic number.
    num: u32,

    /// Hover text, used as the post caption.
    alt: String,

    /// Absolute URL of the comic image.
    img: String,

    /// Display title.
    #[serde(default)]
    title: String,

    /// Publication year, as text.
    #[serde(default)]
    year: String,

    /// Publication month, as text without padding.
    #[serde(default)]
    month: String,

    /// Publication day, as text without padding.
    #[serde(default)]
    day: String,
}

impl Comic {
    /// Fetches the metadata of comic `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIndex`] for index `0`, a network error if the
    /// request fails, or [`Error::Data`] if `alt`, `img` or `num` is absent.
    pub async fn new(client: &Client, index: u32) -> Result<Self> {
        if index == 0 {
            return Err(Error::InvalidIndex(index));
        }
        client.fetch_json(&client.comic_info_url(Some(index))).await
    }

    /// Fetches the metadata of the most recent comic.
    ///
    /// # Errors
    ///
    /// Same as [`Comic::new`].
    pub async fn latest(client: &Client) -> Result<Self> {
        client.fetch_json(&client.comic_info_url(None)).await
    }

    /// Downloads the image into `dir`.
    ///
    /// # Errors
    ///
    /// Returns a network error if the download fails, or an I/O error if the
    /// file cannot be written.
    pub async fn download_image(&self, client: &Client, dir: &Path) -> Result<ImageFile> {
        let bytes = client.fetch_bytes(&self.img).await?;
        if bytes.is_empty() {
            return Err(Error::Data(format!("{}: empty image", self.img)));
        }
        ImageFile::create(dir, &self.img, &bytes).await
    }

    /// Returns the comic number.
    pub fn num(&self) -> u32 {
        self.num
    }

    /// Returns the hover text.
    pub fn alt(&self) -> &str {
        &self.alt
    }

    /// Returns the image URL.
    pub fn img(&self) -> &str {
        &self.img
    }

    /// Returns the title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the publication date as `YYYY-M-D`, if the service reported one.
    pub fn published(&self) -> Option<String> {
        if self.year.is_empty() {
            None
        } else {
            Some(format!("{}-{}-{}", self.year, self.month, self.day))
        }
    }
}

/// A comic whose image sits on local disk, ready to be uploaded.
#[derive(Debug)]
pub struct FetchedComic {
    /// The comic number.
    pub index: u32,
    /// Caption text to publish with the image.
    pub caption: String,
    /// The downloaded image; removed when dropped.
    pub image: ImageFile,
}

/// Returns the number of the most recent comic.
///
/// # Errors
///
/// Returns a network error if the request fails, or [`Error::Data`] if the
/// response carries no `num`.
pub async fn latest_index(client: &Client) -> Result<u32> {
    let latest = Comic::latest(client).await?;
    log::info!("latest comic is #{}", latest.num());
    Ok(latest.num())
}

/// Fetches comic `index` and downloads its image into `dir`.
///
/// # Errors
///
/// Same as [`Comic::new`] and [`Comic::download_image`].
pub async fn fetch_comic(client: &Client, index: u32, dir: &Path) -> Result<FetchedComic> {
    let comic = Comic::new(client, index).await?;
    let image = comic.download_image(client, dir).await?;
    log::info!(
        "fetched comic #{} {:?} into {}",
        comic.num(),
        comic.title(),
        image.path().display()
    );
    Ok(FetchedComic {
        index,
        caption: comic.alt,
        image,
    })
}

/// Picks a comic number uniformly from `1..=latest`, skipping [`MISSING_COMICS`].
///
/// Returns `None` when there is nothing to pick.
pub fn pick_index<R>(rng: &mut R, latest: u32) -> Option<u32>
where
    R: Rng,
{
    let skipped = MISSING_COMICS.iter().filter(|&&m| m <= latest).count();
    let available = latest.checked_sub(u32::try_from(skipped).ok()?)?;
    if available == 0 {
        return None;
    }

    // map the draw onto 1..=latest by stepping over each missing number
    let mut index = rng.gen_range(1..=available);
    for &missing in MISSING_COMICS {
        if index >= missing {
            index += 1;
        }
    }
    Some(index)
}
